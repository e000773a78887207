#[macro_use]
mod common;

expect_output!(call: "function/call.slate" => "3");

expect_output!(print_function: "function/print_function.slate" =>
    "<fn f>",
    "<native fn clock>");

expect_output!(recursion: "function/recursion.slate" => "55");

expect_output!(default_return_is_nil: "function/default_return_is_nil.slate" => "nil");

expect_output!(statement_body: "function/statement_body.slate" => "hi!");

expect_output!(arguments_evaluate_left_to_right: "function/arguments_evaluate_left_to_right.slate" =>
    "first", "second", "3");

expect_failure!(wrong_arity: "function/wrong_arity.slate" =>
    "Expected 1 arguments but got 2.",
    "[line 4]");

expect_failure!(call_non_function: "function/call_non_function.slate" =>
    "Can only call functions and classes.",
    "[line 1]");

expect_failure!(too_many_parameters: "function/too_many_parameters.slate" =>
    "[line 1] Error at 'p255': Cannot have more than 255 parameters");

expect_failure!(too_many_arguments: "function/too_many_arguments.slate" =>
    "[line 1] Error at '9': Cannot have more than 255 arguments");
