use serde_json::json;

use crate::common::{TestApp, routes};

const CONTENT: &str = "def solve():\n    return 42\n";

async fn upload_sample(app: &TestApp, token: &str) -> String {
    let body = json!({
        "title": "Solver",
        "language": "python",
        "tags": [],
        "filename": "solve.py",
        "full_content": CONTENT,
    });
    let res = app.post_with_token(routes::UPLOAD, &body, token).await;
    assert_eq!(res.status, 201);
    res.body["uid"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn download_returns_the_original_content() {
    let app = TestApp::spawn().await;
    let token = app.token_for("alice");
    let uid = upload_sample(&app, &token).await;

    let res = app.get_raw(&routes::download(&uid)).await;

    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(res.text().await.unwrap(), CONTENT);
}

#[tokio::test]
async fn download_names_the_file_after_the_upload() {
    let app = TestApp::spawn().await;
    let token = app.token_for("alice");
    let uid = upload_sample(&app, &token).await;

    let res = app.get_raw(&routes::download(&uid)).await;

    let disposition = res
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("solve.py"));
}

#[tokio::test]
async fn download_needs_no_authentication() {
    let app = TestApp::spawn().await;
    let token = app.token_for("alice");
    let uid = upload_sample(&app, &token).await;

    // No Authorization header at all.
    let res = app.get_raw(&routes::download(&uid)).await;
    assert_eq!(res.status().as_u16(), 200);
}

#[tokio::test]
async fn download_of_unknown_id_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get_raw(&routes::download("no-such-snippet")).await;

    assert_eq!(res.status().as_u16(), 404);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["code"], "NOT_FOUND");
}
