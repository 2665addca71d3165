//! API Integration Tests
//!
//! Each test starts the full HTTP stack on an ephemeral port, backed by the in-memory
//! store, so no external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use futures::future::join_all;
use integration_tests::{
    assert_error, assert_json, assert_status, test_config, thread_ids, ReadingGroup, TestServer,
    ALICE, BOB,
};
use readalong_common::RateLimitConfig;
use readalong_service::dto::MAX_REPLY_DEPTH;
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Carol writes at pages 10, 50, 70 and 95 of 100; then Alice is at 20, Bob at 60 and
/// Carol at 90.
async fn three_readers() -> (TestServer, ReadingGroup, Vec<String>) {
    let server = TestServer::start().await.unwrap();
    let group = ReadingGroup::seed(&server);
    let (g, b) = (group.group_id, group.book_id);

    let mut ids = Vec::new();
    for (page, content) in [(10, "early"), (50, "middle"), (70, "twist"), (95, "ending")] {
        server.set_progress(&group.carol, g, b, page, 100).await.unwrap();
        ids.push(
            server
                .post_comment(&group.carol, g, b, content, None)
                .await
                .unwrap(),
        );
    }

    server.set_progress(&group.alice, g, b, 20, 100).await.unwrap();
    server.set_progress(&group.bob, g, b, 60, 100).await.unwrap();
    server.set_progress(&group.carol, g, b, 90, 100).await.unwrap();

    (server, group, ids)
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready_without_redis() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["redis"], "disabled");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_rate_limit_throttles_and_recovers() {
    let mut config = test_config();
    config.rate_limit = RateLimitConfig {
        requests_per_second: 10,
        burst: 3,
    };
    let server = TestServer::start_with_config(config).await.unwrap();
    let group = ReadingGroup::seed(&server);
    let discussion = group.path("discussion");

    for _ in 0..3 {
        let response = server.get_auth(&discussion, &group.alice).await.unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }
    let response = server.get_auth(&discussion, &group.alice).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // Health checks are outside the limit
    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    let response = server.get_auth(&discussion, &group.alice).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let server = TestServer::start().await.unwrap();
    let group = ReadingGroup::seed(&server);

    let response = server.get(&group.comments()).await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_AUTHORIZATION");
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let server = TestServer::start().await.unwrap();
    let group = ReadingGroup::seed(&server);

    let response = server
        .get_auth(&group.comments(), "not-a-token")
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_outsider_is_forbidden() {
    let server = TestServer::start().await.unwrap();
    let group = ReadingGroup::seed(&server);

    let response = server
        .get_auth(&group.comments(), &group.outsider)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_GROUP_MEMBER");
}

// ============================================================================
// Progress Tests
// ============================================================================

#[tokio::test]
async fn test_set_and_get_progress() {
    let server = TestServer::start().await.unwrap();
    let group = ReadingGroup::seed(&server);

    let response = server
        .get_auth(&group.path("progress"), &group.alice)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_PROGRESS");

    let stored = server
        .set_progress(&group.alice, group.group_id, group.book_id, 45, 300)
        .await
        .unwrap();
    assert_eq!(stored["current_page"], 45);
    assert_eq!(stored["progress_percentage"], 15.0);

    let response = server
        .get_auth(&group.path("progress"), &group.alice)
        .await
        .unwrap();
    let fetched: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched["current_page"], 45);
    assert_eq!(fetched["total_pages"], 300);
}

#[tokio::test]
async fn test_invalid_progress_is_bad_request() {
    let server = TestServer::start().await.unwrap();
    let group = ReadingGroup::seed(&server);

    let body = json!({
        "group_id": group.group_id.to_string(),
        "book_id": group.book_id.to_string(),
        "current_page": 120,
        "total_pages": 100,
    });
    let response = server
        .post_auth("/api/v1/progress", &group.alice, &body)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PROGRESS");

    let response = server
        .post_raw_auth("/api/v1/progress", &group.alice, "{not json")
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_REQUEST_BODY");
}

#[tokio::test]
async fn test_group_progress_listing() {
    let (server, group, _) = three_readers().await;

    let response = server
        .get_auth(&group.path("progress/all"), &group.alice)
        .await
        .unwrap();
    let listing: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    let names: Vec<&str> = listing
        .iter()
        .filter_map(|p| p["display_name"].as_str())
        .collect();
    assert_eq!(names, ["Carol", "Bob", "Alice"]);

    let response = server
        .get_auth(
            &format!("/api/v1/progress?group_id={}", group.group_id),
            &group.bob,
        )
        .await
        .unwrap();
    let mine: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["user_id"], BOB.to_string());
}

// ============================================================================
// Visibility Tests
// ============================================================================

#[tokio::test]
async fn test_each_reader_sees_up_to_their_page() {
    let (server, group, ids) = three_readers().await;

    for (token, expected) in [
        (&group.alice, &ids[..1]),
        (&group.bob, &ids[..2]),
        (&group.carol, &ids[..]),
    ] {
        let response = server.get_auth(&group.comments(), token).await.unwrap();
        let threads: Value = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(thread_ids(&threads), expected);
    }
}

#[tokio::test]
async fn test_ahead_summary_has_no_content() {
    let (server, group, ids) = three_readers().await;

    let response = server
        .get_auth(&group.path("comments/ahead"), &group.bob)
        .await
        .unwrap();
    let ahead: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(ahead["count"], 2);

    let items = ahead["items"].as_array().unwrap();
    assert_eq!(items[0]["comment_id"], ids[2].as_str());
    assert_eq!(items[0]["progress_page"], 70);
    assert_eq!(items[1]["comment_id"], ids[3].as_str());
    for item in items {
        assert!(item.get("content").is_none());
        assert_eq!(item["author_name"], "Carol");
    }

    let raw = serde_json::to_string(&ahead).unwrap();
    assert!(!raw.contains("twist"));
    assert!(!raw.contains("ending"));
}

#[tokio::test]
async fn test_discussion_bundles_progress_and_ahead() {
    let (server, group, _) = three_readers().await;

    let response = server
        .get_auth(&group.path("discussion"), &group.alice)
        .await
        .unwrap();
    let view: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(view["progress"]["current_page"], 20);
    assert_eq!(view["comments"].as_array().unwrap().len(), 1);
    assert_eq!(view["ahead"]["count"], 3);
    assert!(view["poll_interval_seconds"].as_u64().unwrap() > 0);

    let raw = serde_json::to_string(&view).unwrap();
    for hidden in ["middle", "twist", "ending"] {
        assert!(!raw.contains(hidden), "{hidden} leaked");
    }
}

#[tokio::test]
async fn test_reader_without_progress_sees_nothing() {
    let (server, group, _) = three_readers().await;
    let dave_id = integration_tests::unique_id();
    server.add_member(group.group_id, dave_id, "Dave");
    let dave = server.token_for(dave_id);

    let response = server.get_auth(&group.path("discussion"), &dave).await.unwrap();
    let view: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(view["progress"].is_null());
    assert_eq!(view["comments"].as_array().unwrap().len(), 0);
    assert_eq!(view["ahead"]["count"], 0);
}

#[tokio::test]
async fn test_moving_forward_reveals_comments_immediately() {
    let (server, group, ids) = three_readers().await;

    server
        .set_progress(&group.alice, group.group_id, group.book_id, 70, 100)
        .await
        .unwrap();
    let response = server.get_auth(&group.comments(), &group.alice).await.unwrap();
    let threads: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(thread_ids(&threads), &ids[..3]);

    // A different edition is compared by fraction of the book
    server
        .set_progress(&group.alice, group.group_id, group.book_id, 60, 200)
        .await
        .unwrap();
    let response = server.get_auth(&group.comments(), &group.alice).await.unwrap();
    let threads: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(thread_ids(&threads), &ids[..1]);
}

#[tokio::test]
async fn test_single_comment_is_gated() {
    let (server, group, ids) = three_readers().await;

    let response = server
        .get_auth(&format!("/api/v1/comments/{}", ids[2]), &group.bob)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "COMMENT_AHEAD");

    let response = server
        .get_auth(&format!("/api/v1/comments/{}", ids[1]), &group.bob)
        .await
        .unwrap();
    let comment: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(comment["content"], "middle");

    let response = server
        .get_auth("/api/v1/comments/not-a-number", &group.bob)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");
}

// ============================================================================
// Posting Tests
// ============================================================================

#[tokio::test]
async fn test_post_without_progress_is_precondition_failed() {
    let server = TestServer::start().await.unwrap();
    let group = ReadingGroup::seed(&server);

    let response = server
        .post_auth(&group.comments(), &group.alice, &json!({ "content": "hi" }))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::PRECONDITION_FAILED)
        .await
        .unwrap();
    assert_eq!(code, "PROGRESS_REQUIRED");
}

#[tokio::test]
async fn test_post_rejects_bad_content() {
    let server = TestServer::start().await.unwrap();
    let group = ReadingGroup::seed(&server);
    server
        .set_progress(&group.alice, group.group_id, group.book_id, 5, 100)
        .await
        .unwrap();

    let response = server
        .post_auth(&group.comments(), &group.alice, &json!({ "content": "" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .post_auth(&group.comments(), &group.alice, &json!({ "content": "   " }))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "EMPTY_CONTENT");

    let long = "x".repeat(5001);
    let response = server
        .post_auth(&group.comments(), &group.alice, &json!({ "content": long }))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "CONTENT_TOO_LONG");
}

#[tokio::test]
async fn test_post_stamps_author_progress() {
    let server = TestServer::start().await.unwrap();
    let group = ReadingGroup::seed(&server);
    server
        .set_progress(&group.alice, group.group_id, group.book_id, 33, 100)
        .await
        .unwrap();

    let response = server
        .post_auth(&group.comments(), &group.alice, &json!({ "content": "chapter 3!" }))
        .await
        .unwrap();
    let created: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(created["progress_page"], 33);
    assert_eq!(created["progress_total_pages"], 100);
    assert_eq!(created["user_id"], ALICE.to_string());
    assert_eq!(created["author_name"], "Alice");
    assert_eq!(created["is_own"], true);
    assert_eq!(created["like_count"], 0);
}

#[tokio::test]
async fn test_replies_nest_and_orphans_are_promoted() {
    let server = TestServer::start().await.unwrap();
    let group = ReadingGroup::seed(&server);
    let (g, b) = (group.group_id, group.book_id);

    server.set_progress(&group.alice, g, b, 10, 100).await.unwrap();
    let root = server.post_comment(&group.alice, g, b, "root", None).await.unwrap();
    server.set_progress(&group.bob, g, b, 20, 100).await.unwrap();
    let reply = server
        .post_comment(&group.bob, g, b, "reply", Some(&root))
        .await
        .unwrap();

    // Carol replies to her own comment after moving back
    server.set_progress(&group.carol, g, b, 70, 100).await.unwrap();
    let hidden = server.post_comment(&group.carol, g, b, "hidden", None).await.unwrap();
    server.set_progress(&group.carol, g, b, 30, 100).await.unwrap();
    let orphan = server
        .post_comment(&group.carol, g, b, "orphan", Some(&hidden))
        .await
        .unwrap();

    server.set_progress(&group.bob, g, b, 40, 100).await.unwrap();
    let response = server.get_auth(&group.comments(), &group.bob).await.unwrap();
    let threads: Value = assert_json(response, StatusCode::OK).await.unwrap();

    let roots = threads.as_array().unwrap();
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0]["id"], root.as_str());
    assert_eq!(roots[0]["replies"][0]["id"], reply.as_str());
    assert_eq!(roots[1]["id"], orphan.as_str());
    assert_eq!(roots[1]["parent_comment_id"], hidden.as_str());

    // Bob cannot reply to a comment he cannot see
    let response = server
        .post_auth(
            &group.comments(),
            &group.bob,
            &json!({ "content": "peek", "parent_comment_id": hidden }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_PARENT_COMMENT");
}

#[tokio::test]
async fn test_long_reply_chain_stays_parseable() {
    let server = TestServer::start().await.unwrap();
    let group = ReadingGroup::seed(&server);
    let (g, b) = (group.group_id, group.book_id);
    server.set_progress(&group.alice, g, b, 10, 100).await.unwrap();

    let chain_len = MAX_REPLY_DEPTH + 100;
    let mut parent: Option<String> = None;
    let mut ids = Vec::with_capacity(chain_len);
    for i in 0..chain_len {
        let id = server
            .post_comment(&group.alice, g, b, &format!("reply {i}"), parent.as_deref())
            .await
            .unwrap();
        parent = Some(id.clone());
        ids.push(id);
    }

    // reqwest parses with serde_json's default recursion limit
    let response = server.get_auth(&group.comments(), &group.alice).await.unwrap();
    let threads: Value = assert_json(response, StatusCode::OK).await.unwrap();

    let mut level = &threads;
    for id in &ids[..MAX_REPLY_DEPTH] {
        assert_eq!(level[0]["id"], id.as_str());
        level = &level[0]["replies"];
    }
    let flat = level.as_array().unwrap();
    assert_eq!(flat.len(), chain_len - MAX_REPLY_DEPTH);
    for (node, id) in flat.iter().zip(&ids[MAX_REPLY_DEPTH..]) {
        assert_eq!(node["id"], id.as_str());
        assert_eq!(node["replies"], json!([]));
    }
    assert_eq!(flat[1]["parent_comment_id"], flat[0]["id"]);
}

// ============================================================================
// Like Tests
// ============================================================================

#[tokio::test]
async fn test_like_endpoints() {
    let (server, group, ids) = three_readers().await;
    let like = format!("/api/v1/comments/{}/like", ids[0]);

    // PUT twice counts once
    for _ in 0..2 {
        let response = server.put_auth(&like, &group.bob).await.unwrap();
        let state: Value = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(state["liked"], true);
        assert_eq!(state["like_count"], 1);
    }

    // POST toggles
    let response = server.post_empty_auth(&like, &group.alice).await.unwrap();
    let state: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(state["liked"], true);
    assert_eq!(state["like_count"], 2);

    let response = server.post_empty_auth(&like, &group.alice).await.unwrap();
    let state: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(state["liked"], false);
    assert_eq!(state["like_count"], 1);

    // DELETE twice removes once
    for _ in 0..2 {
        let response = server.delete_auth(&like, &group.bob).await.unwrap();
        let state: Value = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(state["liked"], false);
        assert_eq!(state["like_count"], 0);
    }
}

#[tokio::test]
async fn test_cannot_like_ahead_comment() {
    let (server, group, ids) = three_readers().await;

    let response = server
        .put_auth(&format!("/api/v1/comments/{}/like", ids[3]), &group.bob)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "COMMENT_AHEAD");

    let response = server
        .put_auth("/api/v1/comments/123456789/like", &group.bob)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_likes_are_counted_once() {
    let (server, group, ids) = three_readers().await;
    let like = format!("/api/v1/comments/{}/like", ids[0]);

    let requests = (0..10).map(|i| {
        let token = if i % 2 == 0 { &group.alice } else { &group.bob };
        server.put_auth(&like, token)
    });
    for response in join_all(requests).await {
        assert_status(response.unwrap(), StatusCode::OK).await.unwrap();
    }

    let response = server
        .get_auth(&format!("/api/v1/comments/{}", ids[0]), &group.carol)
        .await
        .unwrap();
    let comment: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(comment["like_count"], 2);
}

// ============================================================================
// Report Tests
// ============================================================================

#[tokio::test]
async fn test_report_comment() {
    let (server, group, ids) = three_readers().await;
    let report = format!("/api/v1/comments/{}/report", ids[1]);

    let response = server
        .post_auth(&report, &group.bob, &json!({ "reason": "names the killer" }))
        .await
        .unwrap();
    let created: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(created["status"], "pending");
    assert_eq!(created["reported_by"], BOB.to_string());

    // Reports never hide a comment
    let response = server
        .get_auth(&format!("/api/v1/comments/{}", ids[1]), &group.bob)
        .await
        .unwrap();
    let comment: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(comment["content"], "middle");
    assert_eq!(comment["report_count"], 1);

    let response = server
        .post_auth(&report, &group.carol, &json!({ "reason": "mine" }))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "CANNOT_REPORT_OWN_COMMENT");

    let response = server
        .post_auth(
            &format!("/api/v1/comments/{}/report", ids[3]),
            &group.alice,
            &json!({ "reason": "spoiler" }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "COMMENT_AHEAD");
}
