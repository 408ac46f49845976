use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn new_account_can_be_created() {
    let app = TestApp::spawn().await;

    let res = app
        .post(routes::ACCOUNTS, &json!({"user": "alice", "password": "pw1"}))
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert!(res.body["id"].is_number());
    assert_eq!(res.body["username"], "alice");
    assert!(res.body.get("password_hash").is_none());
}

#[tokio::test]
async fn username_alias_is_accepted() {
    let app = TestApp::spawn().await;

    let res = app
        .post(
            routes::ACCOUNTS,
            &json!({"username": "bob", "password": "pw"}),
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["username"], "bob");
}

#[tokio::test]
async fn taken_username_is_rejected_with_422() {
    let app = TestApp::spawn().await;

    let first = app
        .post(routes::ACCOUNTS, &json!({"user": "alice", "password": "pw1"}))
        .await;
    assert_eq!(first.status, 200, "{}", first.text);

    let res = app
        .post(routes::ACCOUNTS, &json!({"user": "alice", "password": "pw2"}))
        .await;

    assert_eq!(res.status, 422);
    assert_eq!(res.body["code"], "USERNAME_TAKEN");

    // The original password still works; the second call changed nothing.
    let login = app
        .post(
            routes::LOGIN,
            &json!({"username": "alice", "password": "pw1"}),
        )
        .await;
    assert_eq!(login.status, 200, "{}", login.text);
}

#[tokio::test]
async fn invalid_usernames_are_rejected() {
    let app = TestApp::spawn().await;

    let too_long = "a".repeat(33);
    for user in ["", "   ", "no spaces!", too_long.as_str()] {
        let res = app
            .post(routes::ACCOUNTS, &json!({"user": user, "password": "pw"}))
            .await;
        assert_eq!(res.status, 400, "username {user:?} was accepted");
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn empty_and_oversized_passwords_are_rejected() {
    let app = TestApp::spawn().await;

    for password in [String::new(), "a".repeat(129)] {
        let res = app
            .post(
                routes::ACCOUNTS,
                &json!({"user": "alice", "password": password}),
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = TestApp::spawn().await;

    let res = app
        .post(routes::ACCOUNTS, &json!({"password": "missing user"}))
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn account_routes_allow_cross_origin_requests() {
    let app = TestApp::spawn().await;

    let res = app
        .client
        .post(format!("http://{}{}", app.addr, routes::ACCOUNTS))
        .header("Origin", "https://gallery.example")
        .json(&json!({"user": "alice", "password": "pw"}))
        .send()
        .await
        .expect("request failed");

    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
