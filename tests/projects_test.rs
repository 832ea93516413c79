mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{post_rpc, seed_image, test_app};
use serde_json::{Value, json};

fn timestamp(value: &Value) -> DateTime<Utc> {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_create_project_seeds_from_image() {
    let t = test_app().await;
    let image = seed_image(&t.state.db, "portrait").await;

    let (status, project) = post_rpc(
        &t.app,
        "createProject",
        json!({ "name": "Portrait edit", "original_image_id": image.id }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["current_image_path"], image.file_path);
    assert_eq!(project["operations_history"], "[]");
    assert_eq!(project["is_public"], false);
    assert!(project["description"].is_null());

    let (_, fetched) = post_rpc(&t.app, "getProject", json!({ "id": project["id"] })).await;
    assert_eq!(fetched, project);
}

#[tokio::test]
async fn test_create_project_for_missing_image() {
    let t = test_app().await;

    let (status, body) = post_rpc(
        &t.app,
        "createProject",
        json!({ "name": "Orphan", "original_image_id": 999999 }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("999999"));

    let (_, page) = post_rpc(&t.app, "listProjects", json!({})).await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn test_create_project_requires_name() {
    let t = test_app().await;
    let image = seed_image(&t.state.db, "img").await;

    let (status, _) = post_rpc(
        &t.app,
        "createProject",
        json!({ "name": "", "original_image_id": image.id }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_projects_pagination_and_visibility() {
    let t = test_app().await;
    let image = seed_image(&t.state.db, "img").await;

    for i in 0..5 {
        post_rpc(
            &t.app,
            "createProject",
            json!({
                "name": format!("Project {}", i),
                "original_image_id": image.id,
                "is_public": i % 2 == 0
            }),
        )
        .await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let (status, page) = post_rpc(&t.app, "listProjects", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 5);
    let names: Vec<&str> = page["projects"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["Project 4", "Project 3", "Project 2", "Project 1", "Project 0"]
    );

    let (_, page) = post_rpc(&t.app, "listProjects", json!({ "limit": 2, "offset": 4 })).await;
    assert_eq!(page["projects"].as_array().unwrap().len(), 1);
    assert_eq!(page["total"], 5);

    let (_, page) = post_rpc(&t.app, "listProjects", json!({ "public_only": true })).await;
    assert_eq!(page["total"], 3);
    assert!(
        page["projects"]
            .as_array()
            .unwrap()
            .iter()
            .all(|p| p["is_public"] == true)
    );
}

#[tokio::test]
async fn test_list_projects_rejects_bad_paging() {
    let t = test_app().await;

    let (status, _) = post_rpc(&t.app, "listProjects", json!({ "limit": 0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_rpc(&t.app, "listProjects", json!({ "limit": 101 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_rpc(&t.app, "listProjects", json!({ "offset": -1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_project_partial() {
    let t = test_app().await;
    let image = seed_image(&t.state.db, "img").await;

    let (_, project) = post_rpc(
        &t.app,
        "createProject",
        json!({ "name": "Draft", "description": "first pass", "original_image_id": image.id }),
    )
    .await;

    let (status, updated) = post_rpc(
        &t.app,
        "updateProject",
        json!({
            "id": project["id"],
            "current_image_path": "results/1-style_transfer.png",
            "operations_history": "[{\"op\":1}]"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Draft");
    assert_eq!(updated["description"], "first pass");
    assert_eq!(updated["current_image_path"], "results/1-style_transfer.png");
    assert_eq!(updated["operations_history"], "[{\"op\":1}]");
    assert_eq!(updated["created_at"], project["created_at"]);
    assert!(timestamp(&updated["updated_at"]) > timestamp(&project["updated_at"]));
}

#[tokio::test]
async fn test_update_with_only_id_still_touches() {
    let t = test_app().await;
    let image = seed_image(&t.state.db, "img").await;

    let (_, project) = post_rpc(
        &t.app,
        "createProject",
        json!({ "name": "Untouched", "original_image_id": image.id }),
    )
    .await;

    let (status, updated) = post_rpc(&t.app, "updateProject", json!({ "id": project["id"] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], project["name"]);
    assert_eq!(updated["is_public"], project["is_public"]);
    assert!(timestamp(&updated["updated_at"]) > timestamp(&project["updated_at"]));
}

#[tokio::test]
async fn test_update_unknown_project_returns_null() {
    let t = test_app().await;

    let (status, body) = post_rpc(
        &t.app,
        "updateProject",
        json!({ "id": 31337, "name": "Ghost" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

#[tokio::test]
async fn test_update_project_clears_description_with_null() {
    let t = test_app().await;
    let image = seed_image(&t.state.db, "img").await;

    let (_, project) = post_rpc(
        &t.app,
        "createProject",
        json!({ "name": "Notes", "description": "old", "original_image_id": image.id }),
    )
    .await;

    // Absent key leaves it alone
    let (_, kept) = post_rpc(
        &t.app,
        "updateProject",
        json!({ "id": project["id"], "name": "Notes v2" }),
    )
    .await;
    assert_eq!(kept["description"], "old");

    let (status, cleared) = post_rpc(
        &t.app,
        "updateProject",
        json!({ "id": project["id"], "description": null }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["description"].is_null());
    assert_eq!(cleared["name"], "Notes v2");

    let (_, fetched) = post_rpc(&t.app, "getProject", json!({ "id": project["id"] })).await;
    assert!(fetched["description"].is_null());
}

#[tokio::test]
async fn test_out_of_range_project_ids_resolve_to_null() {
    let t = test_app().await;

    for procedure in ["getProject", "updateProject"] {
        let (status, body) = post_rpc(&t.app, procedure, json!({ "id": 99999999999i64 })).await;
        assert_eq!(status, StatusCode::OK, "{}", procedure);
        assert!(body.is_null(), "{}: {}", procedure, body);
    }
}
