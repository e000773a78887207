#[macro_use]
mod common;

expect_output!(line_comments: "comment/line_comments.slate" => "1");

expect_output!(only_comments: "comment/only_comments.slate" =>);

expect_output!(division_is_not_a_comment: "comment/division_is_not_a_comment.slate" => "2");
