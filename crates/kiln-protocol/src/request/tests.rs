//! Unit tests for request decoding.

use rstest::rstest;
use serde_json::json;

use super::*;

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

#[test]
fn decodes_full_request() {
    let request = Request::decode(r#"{"id":"1","method":"execute","params":{"code":"x"}}"#)
        .expect("decode");
    assert_eq!(request.id(), Some("1"));
    assert_eq!(request.method(), "execute");
    assert_eq!(request.params(), &json!({"code": "x"}));
}

#[test]
fn missing_params_decode_as_null() {
    let request = Request::decode(r#"{"id":"1","method":"ping"}"#).expect("decode");
    assert!(request.params().is_null());
}

#[rstest]
#[case::absent(r#"{"method":"ping"}"#)]
#[case::empty(r#"{"id":"","method":"ping"}"#)]
#[case::null(r#"{"id":null,"method":"ping"}"#)]
fn uncorrelated_ids_are_absent(#[case] line: &str) {
    let request = Request::decode(line).expect("decode");
    assert_eq!(request.id(), None);
}

#[test]
fn trailing_newline_is_ignored() {
    let request = Request::decode("{\"method\":\"ping\"}\r\n").expect("decode");
    assert_eq!(request.method(), "ping");
}

#[rstest]
#[case::truncated("{")]
#[case::not_json("not valid json")]
#[case::array(r#"["ping"]"#)]
#[case::numeric_id(r#"{"id":5,"method":"ping"}"#)]
#[case::numeric_method(r#"{"method":5}"#)]
fn rejects_lines_that_are_not_requests(#[case] line: &str) {
    let error = Request::decode(line).expect_err("decode should fail");
    assert!(!error.to_string().is_empty());
}

#[rstest]
#[case::missing(r#"{"id":"7","params":{}}"#, Some("7"))]
#[case::null(r#"{"id":"7","method":null}"#, Some("7"))]
#[case::bare_null("null", None)]
#[case::empty_object("{}", None)]
fn absent_methods_decode_as_empty_name(#[case] line: &str, #[case] id: Option<&str>) {
    let request = Request::decode(line).expect("decode");
    assert_eq!(request.method(), "");
    assert_eq!(request.id(), id);
}

// ---------------------------------------------------------------------------
// Params
// ---------------------------------------------------------------------------

#[test]
fn execute_params_decode_from_request() {
    let request = Request::new("execute").with_params(json!({"code": "fmt.Println(\"hi\")"}));
    let params: ExecuteParams = request.params_as().expect("params");
    assert_eq!(params.code(), "fmt.Println(\"hi\")");
}

#[rstest]
#[case::missing_code(json!({}))]
#[case::null_params(serde_json::Value::Null)]
#[case::non_string_code(json!({"code": 42}))]
fn execute_params_reject_bad_shapes(#[case] params: serde_json::Value) {
    let request = Request::new("execute").with_params(params);
    let error = request
        .params_as::<ExecuteParams>()
        .expect_err("params should be rejected");
    assert!(!error.to_string().is_empty());
}

#[test]
fn missing_code_error_names_the_field() {
    let request = Request::new("execute").with_params(json!({"other": 1}));
    let error = request
        .params_as::<ExecuteParams>()
        .expect_err("params should be rejected");
    assert!(error.to_string().contains("code"), "got: {error}");
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[rstest]
#[case::bare(Request::new("ping"))]
#[case::correlated(Request::new("restart").with_id("abc"))]
#[case::with_params(
    Request::new("execute")
        .with_id("cell-9")
        .with_params(json!({"code": "fmt.Println(1)"}))
)]
fn requests_round_trip(#[case] request: Request) {
    let line = serde_json::to_string(&request).expect("serialise");
    let back = Request::decode(&line).expect("decode");
    assert_eq!(back, request);
}
