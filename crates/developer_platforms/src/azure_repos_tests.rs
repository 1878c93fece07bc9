use super::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PR_PATH: &str = "/contoso/Fabrikam/_apis/git/repositories/website/pullRequests/101";

fn create_provider(server: &MockServer) -> AzureReposProvider {
    AzureReposProvider::new(
        &format!("{}/contoso/", server.uri()),
        "Fabrikam",
        "website",
        101,
        "pat",
    )
    .expect("Failed to create provider")
}

#[test]
fn test_parse_thread_status() {
    assert_eq!(parse_thread_status("active"), Some(ThreadStatus::Active));
    assert_eq!(parse_thread_status("pending"), Some(ThreadStatus::Active));
    assert_eq!(parse_thread_status("fixed"), Some(ThreadStatus::Closed));
    assert_eq!(parse_thread_status("wontFix"), Some(ThreadStatus::Closed));
    assert_eq!(parse_thread_status("closed"), Some(ThreadStatus::Closed));
    assert_eq!(parse_thread_status("byDesign"), Some(ThreadStatus::Closed));
    assert_eq!(parse_thread_status("unknown"), None);
}

#[tokio::test]
async fn test_get_comments_splits_threads_by_context() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/threads", PR_PATH)))
        .and(query_param("api-version", "7.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {
                    "id": 1,
                    "status": "closed",
                    "threadContext": null,
                    "comments": [{ "id": 1, "content": "# PR Metrics\nbody" }]
                },
                {
                    "id": 2,
                    "status": "fixed",
                    "threadContext": { "filePath": "/package-lock.json" },
                    "comments": [{ "id": 1, "content": "❗ **This file may not need to be reviewed.**" }]
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = create_provider(&server);
    let comments = provider.get_comments().await.expect("Failed to get comments");

    assert_eq!(comments.pull_request_comments.len(), 1);
    assert_eq!(comments.pull_request_comments[0].id, 1);
    assert_eq!(
        comments.pull_request_comments[0].status,
        Some(ThreadStatus::Closed)
    );
    assert_eq!(comments.file_comments.len(), 1);
    assert_eq!(comments.file_comments[0].file_name, "/package-lock.json");
    assert_eq!(comments.file_comments[0].status, Some(ThreadStatus::Closed));
}

#[tokio::test]
async fn test_get_comments_skips_malformed_threads() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/threads", PR_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                { "status": "active", "comments": [{ "id": 1, "content": "no thread id" }] },
                { "id": 2, "status": "active" },
                { "id": 3, "status": "active", "comments": [] },
                { "id": 4, "status": "active", "comments": [{ "content": "no comment id" }] },
                { "id": 5, "status": "active", "isDeleted": true, "comments": [{ "id": 1, "content": "gone" }] },
                { "id": 6, "status": "active", "comments": [{ "id": 1, "content": "kept" }] }
            ]
        })))
        .mount(&server)
        .await;

    let provider = create_provider(&server);
    let comments = provider.get_comments().await.expect("Failed to get comments");

    assert_eq!(comments.pull_request_comments.len(), 1);
    assert_eq!(comments.pull_request_comments[0].id, 6);
    assert_eq!(comments.pull_request_comments[0].content, "kept");
    assert!(comments.file_comments.is_empty());
}

#[tokio::test]
async fn test_get_comments_uses_basic_auth() {
    let server = MockServer::start().await;

    // base64(":pat")
    Mock::given(method("GET"))
        .and(path(format!("{}/threads", PR_PATH)))
        .and(header("authorization", "Basic OnBhdA=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = create_provider(&server);
    let comments = provider.get_comments().await.expect("Failed to get comments");

    assert_eq!(comments, CommentData::default());
}

#[tokio::test]
async fn test_get_comments_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let provider = create_provider(&server);
    let result = provider.get_comments().await;

    assert!(matches!(result, Err(Error::RateLimitExceeded)));
}

#[tokio::test]
async fn test_create_pull_request_thread() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/threads", PR_PATH)))
        .and(body_partial_json(json!({
            "status": "active",
            "comments": [{ "parentCommentId": 0, "content": "# PR Metrics", "commentType": 1 }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 9 })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = create_provider(&server);
    provider
        .create_comment("# PR Metrics", ThreadStatus::Active, None, false)
        .await
        .expect("Failed to create thread");
}

#[tokio::test]
async fn test_create_file_thread_anchors_right_side() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/threads", PR_PATH)))
        .and(body_partial_json(json!({
            "status": "closed",
            "threadContext": {
                "filePath": "/docs/readme.md",
                "rightFileStart": { "line": 1, "offset": 1 },
                "rightFileEnd": { "line": 1, "offset": 2 }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 10 })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = create_provider(&server);
    provider
        .create_comment("no review", ThreadStatus::Closed, Some("docs/readme.md"), false)
        .await
        .expect("Failed to create file thread");
}

#[tokio::test]
async fn test_create_file_thread_for_deleted_file_anchors_left_side() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/threads", PR_PATH)))
        .and(body_partial_json(json!({
            "threadContext": {
                "filePath": "/old.md",
                "leftFileStart": { "line": 1, "offset": 1 },
                "leftFileEnd": { "line": 1, "offset": 2 }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 11 })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = create_provider(&server);
    provider
        .create_comment("no review", ThreadStatus::Closed, Some("old.md"), true)
        .await
        .expect("Failed to create file thread");
}

#[tokio::test]
async fn test_update_comment_status_and_content() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("{}/threads/4", PR_PATH)))
        .and(body_partial_json(json!({ "status": "closed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(format!("{}/threads/4/comments/1", PR_PATH)))
        .and(body_partial_json(json!({ "content": "new body" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let provider = create_provider(&server);
    provider
        .update_comment(4, Some("new body"), Some(ThreadStatus::Closed))
        .await
        .expect("Failed to update thread");
}

#[tokio::test]
async fn test_update_comment_content_only() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("{}/threads/4", PR_PATH)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(format!("{}/threads/4/comments/1", PR_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let provider = create_provider(&server);
    provider
        .update_comment(4, Some("new body"), None)
        .await
        .expect("Failed to update thread");
}

#[tokio::test]
async fn test_delete_comment_thread_deletes_first_comment() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{}/threads/8/comments/1", PR_PATH)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let provider = create_provider(&server);
    provider
        .delete_comment_thread(8)
        .await
        .expect("Failed to delete thread");
}

#[tokio::test]
async fn test_delete_comment_thread_failure() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = create_provider(&server);
    let result = provider.delete_comment_thread(8).await;

    assert!(matches!(result, Err(Error::FailedToUpdatePullRequest(_))));
}

#[tokio::test]
async fn test_get_title_and_description() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pullRequestId": 101,
            "title": "Add parser",
            "description": "Parses things"
        })))
        .mount(&server)
        .await;

    let provider = create_provider(&server);
    let details = provider
        .get_title_and_description()
        .await
        .expect("Failed to get details");

    assert_eq!(details.title, "Add parser");
    assert_eq!(details.description.as_deref(), Some("Parses things"));
}

#[tokio::test]
async fn test_set_title_and_description() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(PR_PATH))
        .and(body_partial_json(json!({
            "title": "XS✔ ◾ Add parser",
            "description": "❌ **Add a description.**"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let provider = create_provider(&server);
    provider
        .set_title_and_description(Some("XS✔ ◾ Add parser"), Some("❌ **Add a description.**"))
        .await
        .expect("Failed to update pull request");
}

#[tokio::test]
async fn test_add_metadata_sends_json_patch() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("{}/properties", PR_PATH)))
        .and(header("content-type", "application/json-patch+json"))
        .and(body_partial_json(json!([
            { "op": "replace", "path": "/PRMetrics.Size", "value": "XS" },
            { "op": "replace", "path": "/PRMetrics.ProductCode", "value": "10" }
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let provider = create_provider(&server);
    provider
        .add_metadata(&[
            MetadataEntry::new("Size", "XS"),
            MetadataEntry::new("ProductCode", "10"),
        ])
        .await
        .expect("Failed to add metadata");
}

#[tokio::test]
async fn test_add_metadata_with_no_entries_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider = create_provider(&server);
    provider
        .add_metadata(&[])
        .await
        .expect("Empty metadata should be accepted");
}

#[tokio::test]
async fn test_get_metadata_strips_prefix_and_skips_foreign_keys() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/properties", PR_PATH)))
        .and(query_param("api-version", "7.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "value": {
                "PRMetrics.Size": { "$type": "System.String", "$value": "XS" },
                "PRMetrics.ProductCode": { "$type": "System.Int32", "$value": 10 },
                "CodeReview.Other": { "$type": "System.String", "$value": "x" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = create_provider(&server);
    let metadata = provider
        .get_metadata()
        .await
        .expect("Failed to get metadata")
        .expect("Azure Repos stores metadata");

    assert_eq!(
        metadata,
        vec![
            MetadataEntry::new("ProductCode", "10"),
            MetadataEntry::new("Size", "XS"),
        ]
    );
}

#[tokio::test]
async fn test_get_metadata_without_properties() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/properties", PR_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 0 })))
        .mount(&server)
        .await;

    let provider = create_provider(&server);
    let metadata = provider
        .get_metadata()
        .await
        .expect("Failed to get metadata");

    assert_eq!(metadata, Some(Vec::new()));
}
