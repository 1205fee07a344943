//! Crate-level behaviour tests and shared doubles.

pub(crate) mod support;


use std::io::Cursor;
use std::process::ExitCode;

use rstest::rstest;

use crate::run;

fn invoke(args: &[&str], input: &str) -> (ExitCode, String, String) {
    let mut output = Vec::new();
    let mut stderr = Vec::new();
    let exit = run(
        args.iter().copied(),
        Cursor::new(input.as_bytes().to_vec()),
        &mut output,
        &mut stderr,
    );
    (
        exit,
        String::from_utf8(output).expect("stdout utf8"),
        String::from_utf8(stderr).expect("stderr utf8"),
    )
}

#[rstest]
#[case::help(&["kilnd", "--help"], "--go-binary")]
#[case::version(&["kilnd", "--version"], env!("CARGO_PKG_VERSION"))]
fn informational_flags_print_to_output(#[case] args: &[&str], #[case] expected: &str) {
    let (exit, output, stderr) = invoke(args, "");
    assert_eq!(exit, ExitCode::SUCCESS);
    assert!(output.contains(expected), "unexpected output: {output}");
    assert!(stderr.is_empty());
}

#[test]
fn unknown_flags_fail_before_serving() {
    let (exit, output, stderr) = invoke(&["kilnd", "--turbo"], "{\"method\":\"ping\"}\n");
    assert_eq!(exit, ExitCode::FAILURE);
    assert!(output.is_empty());
    assert!(stderr.contains("--turbo"), "unexpected stderr: {stderr}");
}

#[test]
fn run_serves_until_input_closes() {
    let (exit, output, _) = invoke(
        &["kilnd", "--log-filter", "off"],
        "{\"id\":\"1\",\"method\":\"ping\"}\n\n{\"method\":\"nope\"}\n",
    );
    assert_eq!(exit, ExitCode::SUCCESS);
    assert_eq!(
        output,
        concat!(
            "{\"id\":\"1\",\"result\":{\"ok\":true}}\n",
            "{\"error\":{\"code\":\"unknown_method\",\"message\":\"nope\"}}\n",
        )
    );
}
