#[macro_use]
mod common;

expect_output!(in_method: "this/in_method.slate" => "I am Ada");

expect_output!(bound_method_keeps_receiver: "this/bound_method_keeps_receiver.slate" => "first");

expect_output!(each_instance_sees_itself: "this/each_instance_sees_itself.slate" => "one", "two");

expect_failure!(at_top_level: "this/at_top_level.slate" =>
    "[line 1] Error at 'this': Cannot use 'this' outside of a class");

expect_failure!(in_top_level_function: "this/in_top_level_function.slate" =>
    "[line 2] Error at 'this': Cannot use 'this' outside of a class");
