//! Shared harness for the script fixtures under `tests/target/`.

/// Asserts that a fixture runs cleanly and prints exactly the given lines.
///
/// The fixture is interpreted in-process with a captured writer, so the
/// assertion sees the same bytes a user would get on stdout.
#[macro_export]
macro_rules! expect_output {
    ($name:ident: $path:literal => $($line:literal),* $(,)?) => {
        #[test]
        fn $name() {
            let mut output = Vec::new();
            let mut session = slate_lang::slate::new(&mut output);
            session.run_file(concat!("tests/target/", $path).to_string());
            drop(session);

            let printed = String::from_utf8(output).expect("program output to be utf-8");
            let expected: Vec<&str> = vec![$($line),*];
            assert_eq!(printed.lines().collect::<Vec<_>>(), expected);
        }
    };
}

/// Asserts that the `slate` binary exits nonzero on a fixture and writes
/// exactly the given lines to stderr.
#[macro_export]
macro_rules! expect_failure {
    ($name:ident: $path:literal => $($line:literal),+ $(,)?) => {
        #[test]
        fn $name() {
            let run = assert_cmd::Command::cargo_bin("slate")
                .expect("slate binary to be built")
                .arg(concat!("tests/target/", $path))
                .assert()
                .failure();

            let stderr = String::from_utf8(run.get_output().stderr.clone())
                .expect("diagnostics to be utf-8");
            let expected: Vec<&str> = vec![$($line),+];
            assert_eq!(stderr.lines().collect::<Vec<_>>(), expected);
        }
    };
}
