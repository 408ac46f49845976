use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use imagehost_server::entity::asset;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

use crate::common::{TINY_PNG, TestApp, routes, upload_body};

mod upload {
    use super::*;

    #[tokio::test]
    async fn stores_exact_bytes_under_a_generated_key() {
        let app = TestApp::spawn().await;
        let token = app.create_account_and_login("alice", "pw1").await;
        let bytes: Vec<u8> = (0u8..10).collect();

        let res = app
            .post(
                routes::IMAGES,
                &json!({
                    "type": "image/png",
                    "content": STANDARD.encode(&bytes),
                    "token": token,
                }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Image Uploaded Successfully!");
        assert_eq!(res.body["owner"], "alice");
        assert!(res.body["tag"].is_null());
        let path = res.body["path"].as_str().unwrap().to_string();
        assert!(path.ends_with(".png"), "unexpected path {path}");

        let rows = asset::Entity::find().all(&app.db).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].path, path);
        assert_eq!(rows[0].content_type, "image/png");
        assert_eq!(rows[0].size, 10);
        assert_eq!(app.blob_count(), 1);

        let fetched = app.get(&routes::image(&path)).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.content_type.as_deref(), Some("image/png"));
        assert_eq!(fetched.bytes, bytes);
    }

    #[tokio::test]
    async fn token_may_come_from_the_bearer_header() {
        let app = TestApp::spawn().await;
        let token = app.create_account_and_login("alice", "pw1").await;

        let res = app
            .post_with_token(
                routes::IMAGES,
                &json!({"type": "image/png", "content": STANDARD.encode(TINY_PNG)}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["owner"], "alice");
    }

    #[tokio::test]
    async fn foreign_authorization_scheme_does_not_block_body_token() {
        let app = TestApp::spawn().await;
        let token = app.create_account_and_login("alice", "pw1").await;

        let res = app
            .client
            .post(format!("http://{}{}", app.addr, routes::IMAGES))
            .header("Authorization", "Basic cHJveHk6c2VjcmV0")
            .json(&upload_body(&token, None))
            .send()
            .await
            .expect("request failed");

        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(app.blob_count(), 1);
    }

    #[tokio::test]
    async fn tag_is_trimmed_and_recorded() {
        let app = TestApp::spawn().await;
        let token = app.create_account_and_login("alice", "pw1").await;

        let res = app
            .post(routes::IMAGES, &upload_body(&token, Some("  vacation ")))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["tag"], "vacation");
    }

    #[tokio::test]
    async fn distinct_uploads_get_distinct_paths() {
        let app = TestApp::spawn().await;
        let token = app.create_account_and_login("alice", "pw1").await;

        let first = app.upload_png(&token, None).await;
        let second = app.upload_png(&token, None).await;

        assert_ne!(first, second);
        assert_eq!(app.blob_count(), 2);
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::IMAGES,
                &json!({"type": "image/png", "content": STANDARD.encode(TINY_PNG)}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn unknown_or_forged_tokens_store_nothing() {
        let app = TestApp::spawn().await;
        let token = app.create_account_and_login("alice", "pw1").await;

        let forged = {
            let mut t = token.clone();
            t.push('x');
            t
        };

        for bad in ["not-a-token", forged.as_str()] {
            let res = app.post(routes::IMAGES, &upload_body(bad, None)).await;
            assert_eq!(res.status, 401, "token {bad:?} was accepted");
            assert_eq!(res.body["code"], "TOKEN_INVALID");
        }

        assert_eq!(asset::Entity::find().count(&app.db).await.unwrap(), 0);
        assert_eq!(app.blob_count(), 0);
    }

    #[tokio::test]
    async fn token_signed_by_another_server_is_rejected() {
        let app = TestApp::spawn().await;
        let other = TestApp::spawn_with(|c| c.auth.jwt_secret = "another-secret".into()).await;
        let foreign = other.create_account_and_login("alice", "pw1").await;
        app.create_account_and_login("alice", "pw1").await;

        let res = app.post(routes::IMAGES, &upload_body(&foreign, None)).await;

        assert_eq!(res.status, 401);
        assert_eq!(app.blob_count(), 0);
    }

    #[tokio::test]
    async fn non_image_content_types_are_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_account_and_login("alice", "pw1").await;

        for ty in ["text/html", "application/pdf", "not a mime", ""] {
            let res = app
                .post(
                    routes::IMAGES,
                    &json!({"type": ty, "content": STANDARD.encode(TINY_PNG), "token": token}),
                )
                .await;
            assert_eq!(res.status, 400, "type {ty:?} was accepted");
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
        }
        assert_eq!(app.blob_count(), 0);
    }

    #[tokio::test]
    async fn invalid_base64_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_account_and_login("alice", "pw1").await;

        let res = app
            .post(
                routes::IMAGES,
                &json!({"type": "image/png", "content": "***not base64***", "token": token}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(app.blob_count(), 0);
    }

    #[tokio::test]
    async fn data_uri_prefix_is_accepted() {
        let app = TestApp::spawn().await;
        let token = app.create_account_and_login("alice", "pw1").await;
        let content = format!("data:image/png;base64,{}", STANDARD.encode(TINY_PNG));

        let res = app
            .post(
                routes::IMAGES,
                &json!({"type": "image/png", "content": content, "token": token}),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let fetched = app.get(&routes::image(res.body["path"].as_str().unwrap())).await;
        assert_eq!(fetched.bytes, TINY_PNG);
    }

    #[tokio::test]
    async fn oversized_images_are_rejected() {
        let app = TestApp::spawn_with(|c| c.storage.max_blob_size = 1024).await;
        let token = app.create_account_and_login("alice", "pw1").await;
        let big = vec![0u8; 2048];

        let res = app
            .post(
                routes::IMAGES,
                &json!({"type": "image/png", "content": STANDARD.encode(&big), "token": token}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(app.blob_count(), 0);
    }
}

mod query {
    use super::*;

    #[tokio::test]
    async fn filters_by_tag_owner_and_both() {
        let app = TestApp::spawn().await;
        let alice = app.create_account_and_login("alice", "pw1").await;
        let bob = app.create_account_and_login("bob", "pw2").await;

        let a_beach = app.upload_png(&alice, Some("beach")).await;
        let a_city = app.upload_png(&alice, Some("city")).await;
        let b_beach = app.upload_png(&bob, Some("beach")).await;
        let a_untagged = app.upload_png(&alice, None).await;

        let by_tag = app.get(&format!("{}?tag=beach", routes::IMAGES)).await;
        assert_eq!(by_tag.status, 200);
        let mut expected = vec![a_beach.clone(), b_beach.clone()];
        expected.sort();
        assert_eq!(by_tag.paths(), expected);
        for record in by_tag.body.as_array().unwrap() {
            assert_eq!(record["tag"], "beach");
        }

        let by_owner = app.get(&format!("{}?username=alice", routes::IMAGES)).await;
        let mut expected = vec![a_beach.clone(), a_city, a_untagged];
        expected.sort();
        assert_eq!(by_owner.paths(), expected);
        for record in by_owner.body.as_array().unwrap() {
            assert_eq!(record["user"], "alice");
        }

        let both = app
            .get(&format!("{}?tag=beach&username=alice", routes::IMAGES))
            .await;
        assert_eq!(both.paths(), vec![a_beach]);

        let none = app
            .get(&format!("{}?tag=city&username=bob", routes::IMAGES))
            .await;
        assert_eq!(none.status, 200);
        assert!(none.paths().is_empty());
    }

    #[tokio::test]
    async fn unfiltered_query_is_capped_by_the_default_limit() {
        let app = TestApp::spawn_with(|c| c.catalog.default_limit = 3).await;
        let token = app.create_account_and_login("alice", "pw1").await;
        for _ in 0..5 {
            app.upload_png(&token, Some("many")).await;
        }

        let all = app.get(routes::IMAGES).await;
        assert_eq!(all.status, 200);
        assert_eq!(all.paths().len(), 3);

        // Filtered queries are not capped.
        let tagged = app.get(&format!("{}?tag=many", routes::IMAGES)).await;
        assert_eq!(tagged.paths().len(), 5);
    }

    #[tokio::test]
    async fn empty_catalog_returns_an_empty_array() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::IMAGES).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn unknown_owner_matches_nothing() {
        let app = TestApp::spawn().await;
        let token = app.create_account_and_login("alice", "pw1").await;
        app.upload_png(&token, None).await;

        let res = app.get(&format!("{}?username=ghost", routes::IMAGES)).await;

        assert_eq!(res.status, 200);
        assert!(res.paths().is_empty());
    }
}

mod fetch {
    use super::*;

    #[tokio::test]
    async fn unknown_key_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::image("missing.png")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn malformed_key_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::image(".hidden")).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn responses_are_immutable_and_nosniff() {
        let app = TestApp::spawn().await;
        let token = app.create_account_and_login("alice", "pw1").await;
        let path = app.upload_png(&token, None).await;

        let res = app
            .client
            .get(format!("http://{}{}", app.addr, routes::image(&path)))
            .send()
            .await
            .expect("request failed");

        assert_eq!(res.status().as_u16(), 200);
        let headers = res.headers();
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert!(
            headers["cache-control"]
                .to_str()
                .unwrap()
                .contains("immutable")
        );
    }
}
