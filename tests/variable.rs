#[macro_use]
mod common;

expect_output!(define_and_print: "variable/define_and_print.slate" => "1");

expect_output!(uninitialized: "variable/uninitialized.slate" => "nil");

expect_output!(redefine_global: "variable/redefine_global.slate" => "2");

expect_output!(assign_returns_value: "variable/assign_returns_value.slate" => "3", "3");

expect_failure!(undefined_global: "variable/undefined_global.slate" =>
    "Undefined variable 'notDefined'",
    "[line 1]");

expect_failure!(assign_undefined: "variable/assign_undefined.slate" =>
    "Undefined variable 'missing'",
    "[line 1]");

expect_failure!(use_local_in_initializer: "variable/use_local_in_initializer.slate" =>
    "[line 2] Error at 'a': Can't read local variable in its own initializer.");

expect_failure!(duplicate_local: "variable/duplicate_local.slate" =>
    "[line 3] Error at 'a': A variable is already defined with name 'a' in this scope");

expect_output!(early_bound: "variable/early_bound.slate" => "outer", "outer");

expect_output!(use_global_in_initializer: "variable/use_global_in_initializer.slate" => "value");
