#![allow(dead_code)]

use ai_photo_editor::config::AppConfig;
use ai_photo_editor::entities::images;
use ai_photo_editor::infrastructure::database;
use ai_photo_editor::models::images::UploadImageRequest;
use ai_photo_editor::services::image_service::ImageService;
use ai_photo_editor::services::storage::LocalStorageService;
use ai_photo_editor::{AppState, create_app};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    // Dropping this removes the storage directory
    pub storage_dir: TempDir,
}

pub async fn setup_test_db() -> DatabaseConnection {
    let db = database::connect("sqlite::memory:").await.unwrap();
    database::run_migrations(&db).await.unwrap();
    db
}

pub async fn test_app() -> TestApp {
    let db = setup_test_db().await;
    let storage_dir = tempfile::tempdir().unwrap();

    let state = AppState {
        db,
        storage: Arc::new(LocalStorageService::new(storage_dir.path())),
        config: AppConfig::development(),
    };

    TestApp {
        app: create_app(state.clone()),
        state,
        storage_dir,
    }
}

pub async fn post_rpc(app: &Router, procedure: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/rpc/{}", procedure))
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    read_json(response).await
}

pub async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            panic!(
                "Non-JSON body with status {}: {}",
                status,
                String::from_utf8_lossy(&body)
            )
        })
    };
    (status, json)
}

pub fn upload_request(name: &str) -> UploadImageRequest {
    UploadImageRequest {
        filename: format!("{}.png", name),
        original_filename: format!("{} original.png", name),
        file_path: format!("uploads/{}.png", name),
        file_size: 2048,
        mime_type: "image/png".to_string(),
        width: 640,
        height: 480,
    }
}

pub async fn seed_image(db: &DatabaseConnection, name: &str) -> images::Model {
    ImageService::upload(db, upload_request(name)).await.unwrap()
}

/// Encodes a solid-colour PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 90]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageOutputFormat::Png)
        .unwrap();
    out.into_inner()
}
