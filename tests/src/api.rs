use crate::DISPATCHER_RUNTIME;
use axum::http::StatusCode;
use axum_test::TestServer;
use bytescope_api::app;
use serde_json::{Value, json};

#[tokio::test]
async fn test_decode_endpoint_returns_records_and_text() {
    let server = TestServer::new(app()).unwrap();

    let response = server
        .post("/decode")
        .json(&json!({ "bytecode": format!("0x{DISPATCHER_RUNTIME}") }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body = response.json::<Value>();
    assert_eq!(body["info"]["source"], "hex_string");
    assert_eq!(body["instructions"].as_array().unwrap().len(), 33);
    assert_eq!(body["instructions"][0]["mnemonic"], "PUSH1");
    assert!(body["disassembly"].as_str().unwrap().contains("0067 LOG2"));
}

#[tokio::test]
async fn test_decode_endpoint_honours_options() {
    let server = TestServer::new(app()).unwrap();

    let response = server
        .post("/decode")
        .json(&json!({
            "bytecode": "6001",
            "disassembly": { "descriptions": false, "offset_width": 2 }
        }))
        .await;
    let body = response.json::<Value>();
    assert_eq!(body["disassembly"], "00 PUSH1 0x01\n");
}

#[tokio::test]
async fn test_analyze_endpoint_with_inline_config() {
    let server = TestServer::new(app()).unwrap();

    let response = server
        .post("/analyze")
        .json(&json!({
            "bytecode": DISPATCHER_RUNTIME,
            "config": { "views": { "tree": false, "events": false } }
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body = response.json::<Value>();
    assert!(body.get("tree").is_none());
    assert!(body.get("events").is_none());
    assert_eq!(body["functions"]["segments"].as_array().unwrap().len(), 2);
    assert_eq!(body["entry_points"][0]["selector"], "a9059cbb");
}

#[tokio::test]
async fn test_bad_input_is_a_client_error() {
    let server = TestServer::new(app()).unwrap();

    let response = server.post("/analyze").json(&json!({ "bytecode": "0xZZ" })).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Invalid hex bytecode");
}
