#[macro_use]
mod common;

expect_output!(count: "for/count.slate" => "0", "1", "2");

expect_output!(matches_handwritten_while: "for/matches_handwritten_while.slate" =>
    "0", "1", "0", "1");

expect_output!(no_initializer: "for/no_initializer.slate" => "0", "1");

expect_output!(expression_initializer: "for/expression_initializer.slate" => "5", "6");

expect_output!(closure_in_body: "for/closure_in_body.slate" => "0", "1", "2");
