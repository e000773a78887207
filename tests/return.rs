#[macro_use]
mod common;

expect_output!(value: "return/value.slate" => "ok");

expect_output!(bare_returns_nil: "return/bare_returns_nil.slate" => "nil");

expect_output!(stops_execution: "return/stops_execution.slate" => "before", "value");

expect_failure!(at_top_level: "return/at_top_level.slate" =>
    "[line 1] Error at 'return': Can't return from top-level code.");

expect_failure!(in_block_at_top_level: "return/in_block_at_top_level.slate" =>
    "[line 2] Error at 'return': Can't return from top-level code.");
