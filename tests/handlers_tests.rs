use std::time::Duration;

use aws_tour::handlers::do_something::{self, WorkReport};
use aws_tour::handlers::forward::{self, ForwardedInvocation};
use serde_json::json;

#[test]
fn test_work_report_echoes_input() {
    let input = json!({"n": 3});
    let response = do_something::build_response("req-1", &input, Duration::from_millis(250));

    assert_eq!(response["statusCode"], 200);
    let report: WorkReport =
        serde_json::from_str(response["body"].as_str().expect("body is a string")).expect("json");
    assert_eq!(report.request_id, "req-1");
    assert_eq!(report.worked_ms, 250);
    assert_eq!(report.input, input);
}

#[test]
fn test_destination_body_carries_request() {
    let body = forward::destination_body("req-2", &json!({})).expect("serializable");
    let message: ForwardedInvocation = serde_json::from_str(&body).expect("json");

    assert_eq!(message.source, "lambda");
    assert_eq!(message.request_id, "req-2");
    assert_eq!(message.input, json!({}));
}
