#[macro_use]
mod common;

expect_output!(instantiate: "class/instantiate.slate" =>
    "<class Widget>",
    "<instance Widget>");

expect_output!(method: "class/method.slate" => "hi");

expect_output!(methods_take_arguments: "class/methods_take_arguments.slate" => "6");

expect_failure!(construction_takes_no_arguments: "class/construction_takes_no_arguments.slate" =>
    "Expected 0 arguments but got 1.",
    "[line 4]");

expect_output!(init_is_an_ordinary_method: "class/init_is_an_ordinary_method.slate" =>
    "constructed",
    "explicit");

expect_output!(method_closes_over_declaration_scope: "class/method_closes_over_declaration_scope.slate" =>
    "captured");

expect_output!(class_can_name_itself: "class/class_can_name_itself.slate" => "<class Widget>");
