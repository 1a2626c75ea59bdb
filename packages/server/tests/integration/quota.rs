use serde_json::json;

use crate::common::{TestApp, routes};

fn small_upload_body(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "language": "rust",
        "tags": [],
        "filename": "snippet.rs",
        "full_content": "fn main() {}\n",
    })
}

/// Default quota of two uploads at 3KB each: two succeed, the third is
/// rejected, and the rejection does not disturb the stored snippets.
#[tokio::test]
async fn quota_of_two_admits_exactly_two_uploads() {
    let app = TestApp::spawn_with_quota(2, 3).await;
    let token = app.token_for("alice");

    let first = app
        .post_with_token(routes::UPLOAD, &small_upload_body("one"), &token)
        .await;
    let second = app
        .post_with_token(routes::UPLOAD, &small_upload_body("two"), &token)
        .await;
    assert_eq!(first.status, 201);
    assert_eq!(second.status, 201);

    let third = app
        .post_with_token(routes::UPLOAD, &small_upload_body("three"), &token)
        .await;
    assert_eq!(third.status, 400);
    assert_eq!(third.body["code"], "VALIDATION_ERROR");
    assert!(third.body["message"].as_str().unwrap().contains("quota"));

    // Both successful uploads are still downloadable.
    for res in [&first, &second] {
        let uid = res.body["uid"].as_str().unwrap();
        let download = app.get_raw(&routes::download(uid)).await;
        assert_eq!(download.status().as_u16(), 200);
    }

    // And the listing holds exactly the two committed records.
    let listing = app.get_with_token(routes::RECORDS, &token).await;
    assert_eq!(listing.body["total"], 2);
}

/// A rejected upload releases its reserved slot: after a structural
/// rejection the user can still fill the quota completely.
#[tokio::test]
async fn rejected_uploads_do_not_burn_quota_slots() {
    let app = TestApp::spawn_with_quota(2, 3).await;
    let token = app.token_for("alice");

    let mut invalid = small_upload_body("bad");
    invalid["title"] = json!("");
    for _ in 0..3 {
        let res = app.post_with_token(routes::UPLOAD, &invalid, &token).await;
        assert_eq!(res.status, 400);
    }

    // All slots are still available.
    for title in ["one", "two"] {
        let res = app
            .post_with_token(routes::UPLOAD, &small_upload_body(title), &token)
            .await;
        assert_eq!(res.status, 201);
    }
}

#[tokio::test]
async fn quotas_are_independent_per_user() {
    let app = TestApp::spawn_with_quota(1, 3).await;
    let alice = app.token_for("alice");
    let bob = app.token_for("bob");

    let res = app
        .post_with_token(routes::UPLOAD, &small_upload_body("one"), &alice)
        .await;
    assert_eq!(res.status, 201);
    let res = app
        .post_with_token(routes::UPLOAD, &small_upload_body("two"), &alice)
        .await;
    assert_eq!(res.status, 400);

    // Alice exhausting her quota does not affect Bob.
    let res = app
        .post_with_token(routes::UPLOAD, &small_upload_body("three"), &bob)
        .await;
    assert_eq!(res.status, 201);
}

/// Concurrent uploads against a nearly-full quota: the counter admits
/// exactly the remaining capacity and every rejected request rolls its
/// reservation back.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_uploads_cannot_exceed_the_quota() {
    const K: usize = 4;
    let app = TestApp::spawn_with_quota((K - 1) as i64, 3).await;
    let token = app.token_for("alice");

    let mut handles = Vec::new();
    for n in 0..K {
        let client = app.client.clone();
        let url = format!("http://{}{}", app.addr, routes::UPLOAD);
        let token = token.clone();
        let body = small_upload_body(&format!("upload-{n}"));
        handles.push(tokio::spawn(async move {
            client
                .post(url)
                .bearer_auth(token)
                .json(&body)
                .send()
                .await
                .expect("Request failed")
                .status()
                .as_u16()
        }));
    }

    let mut created = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            201 => created += 1,
            400 => rejected += 1,
            other => panic!("unexpected status: {other}"),
        }
    }
    assert_eq!(created, K - 1);
    assert_eq!(rejected, 1);

    // The listing reflects only the committed uploads, and the released
    // slot count leaves no room for another upload.
    let listing = app.get_with_token(routes::RECORDS, &token).await;
    assert_eq!(listing.body["total"], (K - 1) as u64);

    let res = app
        .post_with_token(routes::UPLOAD, &small_upload_body("late"), &token)
        .await;
    assert_eq!(res.status, 400);
}
