mod common;

use axum::http::StatusCode;
use common::{post_rpc, seed_image, test_app};
use serde_json::{Value, json};

#[tokio::test]
async fn test_operation_on_missing_image_is_not_found() {
    let t = test_app().await;

    let cases = [
        ("removeObject", json!({ "image_id": 999999, "mask_data": "m" })),
        ("applyStyleTransfer", json!({ "image_id": 999999, "prompt": "van gogh" })),
        ("modifyImage", json!({ "image_id": 999999, "prompt": "add a hat" })),
    ];

    for (procedure, input) in cases {
        let (status, body) = post_rpc(&t.app, procedure, input).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", procedure);
        assert!(
            body["error"].as_str().unwrap().contains("999999"),
            "{}: {}",
            procedure,
            body
        );
    }

    let (_, ops) = post_rpc(&t.app, "listOperations", json!({})).await;
    assert_eq!(ops, json!([]));
}

#[tokio::test]
async fn test_new_operations_start_pending() {
    let t = test_app().await;
    let image = seed_image(&t.state.db, "source").await;

    let (status, op) = post_rpc(
        &t.app,
        "modifyImage",
        json!({ "image_id": image.id, "prompt": "make it snow" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(op["operation_type"], "image_modification");
    assert_eq!(op["status"], "pending");
    assert_eq!(op["prompt"], "make it snow");
    assert!(op["mask_data"].is_null());
    assert!(op["parameters"].is_null());
    assert!(op["result_image_path"].is_null());
    assert!(op["error_message"].is_null());
    assert!(op["processing_time"].is_null());
}

#[tokio::test]
async fn test_parameters_round_trip() {
    let t = test_app().await;
    let image = seed_image(&t.state.db, "source").await;

    let (status, op) = post_rpc(
        &t.app,
        "removeObject",
        json!({
            "image_id": image.id,
            "mask_data": "{\"points\":[[10,10],[20,20]]}",
            "parameters": { "inpaint_strength": 0.9, "guidance_scale": 10.0 }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(op["operation_type"], "object_removal");

    let (status, fetched) =
        post_rpc(&t.app, "getOperationResult", json!({ "operation_id": op["id"] })).await;
    assert_eq!(status, StatusCode::OK);

    let params: Value = serde_json::from_str(fetched["parameters"].as_str().unwrap()).unwrap();
    assert_eq!(params["inpaint_strength"], 0.9);
    assert_eq!(params["guidance_scale"], 10.0);
    assert_eq!(fetched["mask_data"], "{\"points\":[[10,10],[20,20]]}");
}

#[tokio::test]
async fn test_out_of_range_parameters_rejected() {
    let t = test_app().await;
    let image = seed_image(&t.state.db, "source").await;

    let (status, _) = post_rpc(
        &t.app,
        "applyStyleTransfer",
        json!({
            "image_id": image.id,
            "prompt": "watercolor",
            "parameters": { "num_inference_steps": 500 }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_rpc(
        &t.app,
        "applyStyleTransfer",
        json!({ "image_id": image.id, "prompt": "" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, ops) = post_rpc(&t.app, "listOperations", json!({})).await;
    assert_eq!(ops, json!([]));
}

#[tokio::test]
async fn test_unknown_operation_returns_null() {
    let t = test_app().await;

    let (status, body) = post_rpc(&t.app, "getOperationResult", json!({ "operation_id": 77 })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

#[tokio::test]
async fn test_list_operations_newest_first_and_filtered() {
    let t = test_app().await;
    let image = seed_image(&t.state.db, "a").await;
    let other = seed_image(&t.state.db, "b").await;

    let mut ids = Vec::new();
    for prompt in ["one", "two", "three"] {
        let (_, op) = post_rpc(
            &t.app,
            "applyStyleTransfer",
            json!({ "image_id": image.id, "prompt": prompt }),
        )
        .await;
        ids.push(op["id"].as_i64().unwrap());
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    post_rpc(
        &t.app,
        "modifyImage",
        json!({ "image_id": other.id, "prompt": "elsewhere" }),
    )
    .await;

    let (status, body) = post_rpc(&t.app, "listOperations", json!({ "image_id": image.id })).await;
    assert_eq!(status, StatusCode::OK);

    let listed: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_i64().unwrap())
        .collect();
    ids.reverse();
    assert_eq!(listed, ids);

    let (_, all) = post_rpc(&t.app, "listOperations", json!({})).await;
    assert_eq!(all.as_array().unwrap().len(), 4);
}
