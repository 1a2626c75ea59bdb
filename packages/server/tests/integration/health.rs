use crate::common::{TestApp, routes};

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::spawn().await;
    let res = app.get_raw(routes::HEALTH).await;

    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(res.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn root_serves_welcome_banner() {
    let app = TestApp::spawn().await;
    let res = app.get_raw("/").await;

    assert_eq!(res.status().as_u16(), 200);
    assert!(res.text().await.unwrap().contains("snippetd"));
}
