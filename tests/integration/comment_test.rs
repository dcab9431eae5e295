//! Integration tests for chapter comments, discussions, and moderation.

mod helpers;

use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

struct Scope {
    app: helpers::TestApp,
    owner_token: String,
    course_id: Uuid,
    chapter_id: Uuid,
}

/// Course with one chapter, owned by a fresh user.
async fn chapter_scope(slug: &str) -> Option<Scope> {
    let app = helpers::TestApp::try_new().await?;
    let owner = Uuid::new_v4();
    let owner_token = app.mint_token(owner, "user");
    let course_id = app.create_course(&owner_token, "Course", slug, 1000).await;
    let chapter_id = app
        .create_chapter(&owner_token, course_id, "Chapter 1", 0)
        .await;
    Some(Scope {
        app,
        owner_token,
        course_id,
        chapter_id,
    })
}

#[tokio::test]
async fn test_comment_threads_order_and_nesting() {
    let Some(scope) = chapter_scope("threads-order").await else {
        return;
    };
    let app = &scope.app;

    let alice = app.mint_token(Uuid::new_v4(), "user");
    let bob = app.mint_token(Uuid::new_v4(), "user");

    let path = format!("/api/chapters/{}/comments", scope.chapter_id);

    let first = app
        .request("POST", &path, Some(json!({"body": "First!"})), Some(&alice))
        .await;
    assert_eq!(first.status, StatusCode::OK, "body: {:?}", first.body);
    let first_id = helpers::parse_id(&first.body);

    let second = app
        .request(
            "POST",
            &path,
            Some(json!({"body": "Second thread"})),
            Some(&bob),
        )
        .await;
    assert_eq!(second.status, StatusCode::OK);

    let reply = app
        .request(
            "POST",
            &path,
            Some(json!({"body": "Replying to first", "parent_id": first_id})),
            Some(&bob),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["parent_id"], json!(first_id));

    let list = app.request("GET", &path, None, Some(&alice)).await;
    assert_eq!(list.status, StatusCode::OK);

    let items = list.body["items"].as_array().expect("items array");
    assert_eq!(items.len(), 2);
    // Newest top-level thread first; replies hang off their parent.
    assert_eq!(items[0]["comment"]["body"], "Second thread");
    assert_eq!(items[1]["comment"]["body"], "First!");
    let replies = items[1]["replies"].as_array().expect("replies array");
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0]["body"], "Replying to first");
    assert_eq!(list.body["total_items"], 2);
}

#[tokio::test]
async fn test_reply_to_reply_is_rejected() {
    let Some(scope) = chapter_scope("reply-depth").await else {
        return;
    };
    let app = &scope.app;
    let token = app.mint_token(Uuid::new_v4(), "user");
    let path = format!("/api/chapters/{}/comments", scope.chapter_id);

    let top = app
        .request("POST", &path, Some(json!({"body": "Top"})), Some(&token))
        .await;
    let top_id = helpers::parse_id(&top.body);

    let reply = app
        .request(
            "POST",
            &path,
            Some(json!({"body": "Reply", "parent_id": top_id})),
            Some(&token),
        )
        .await;
    let reply_id = helpers::parse_id(&reply.body);

    let nested = app
        .request(
            "POST",
            &path,
            Some(json!({"body": "Too deep", "parent_id": reply_id})),
            Some(&token),
        )
        .await;
    assert_eq!(nested.status, StatusCode::BAD_REQUEST);
    assert_eq!(nested.body["status"], 400);
}

#[tokio::test]
async fn test_reply_across_chapters_is_rejected() {
    let Some(scope) = chapter_scope("reply-scope").await else {
        return;
    };
    let app = &scope.app;
    let token = app.mint_token(Uuid::new_v4(), "user");

    let other_chapter = app
        .create_chapter(&scope.owner_token, scope.course_id, "Chapter 2", 1)
        .await;

    let top = app
        .request(
            "POST",
            &format!("/api/chapters/{}/comments", scope.chapter_id),
            Some(json!({"body": "In chapter one"})),
            Some(&token),
        )
        .await;
    let top_id = helpers::parse_id(&top.body);

    let cross = app
        .request(
            "POST",
            &format!("/api/chapters/{}/comments", other_chapter),
            Some(json!({"body": "Wrong chapter", "parent_id": top_id})),
            Some(&token),
        )
        .await;
    assert_eq!(cross.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_only_author_can_edit() {
    let Some(scope) = chapter_scope("edit-rights").await else {
        return;
    };
    let app = &scope.app;
    let author = app.mint_token(Uuid::new_v4(), "user");
    let intruder = app.mint_token(Uuid::new_v4(), "user");

    let created = app
        .request(
            "POST",
            &format!("/api/chapters/{}/comments", scope.chapter_id),
            Some(json!({"body": "Original"})),
            Some(&author),
        )
        .await;
    let comment_id = helpers::parse_id(&created.body);
    let edit_path = format!("/api/comments/{}", comment_id);

    let denied = app
        .request(
            "PUT",
            &edit_path,
            Some(json!({"body": "Hijacked"})),
            Some(&intruder),
        )
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    // The course owner cannot edit either, only delete.
    let owner_denied = app
        .request(
            "PUT",
            &edit_path,
            Some(json!({"body": "Moderated"})),
            Some(&scope.owner_token),
        )
        .await;
    assert_eq!(owner_denied.status, StatusCode::FORBIDDEN);

    let edited = app
        .request(
            "PUT",
            &edit_path,
            Some(json!({"body": "Revised"})),
            Some(&author),
        )
        .await;
    assert_eq!(edited.status, StatusCode::OK);
    assert_eq!(edited.body["body"], "Revised");
}

#[tokio::test]
async fn test_delete_permissions() {
    let Some(scope) = chapter_scope("delete-rights").await else {
        return;
    };
    let app = &scope.app;
    let author = app.mint_token(Uuid::new_v4(), "user");
    let stranger = app.mint_token(Uuid::new_v4(), "user");
    let path = format!("/api/chapters/{}/comments", scope.chapter_id);

    let created = app
        .request("POST", &path, Some(json!({"body": "Delete me"})), Some(&author))
        .await;
    let comment_id = helpers::parse_id(&created.body);

    let denied = app
        .request(
            "DELETE",
            &format!("/api/comments/{}", comment_id),
            None,
            Some(&stranger),
        )
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    // Course owner moderates comments under their course.
    let removed = app
        .request(
            "DELETE",
            &format!("/api/comments/{}", comment_id),
            None,
            Some(&scope.owner_token),
        )
        .await;
    assert_eq!(removed.status, StatusCode::OK);

    let list = app.request("GET", &path, None, Some(&author)).await;
    assert_eq!(list.body["total_items"], 0);
}

#[tokio::test]
async fn test_admin_can_delete_anywhere() {
    let Some(scope) = chapter_scope("admin-delete").await else {
        return;
    };
    let app = &scope.app;
    let author = app.mint_token(Uuid::new_v4(), "user");
    let admin = app.mint_token(Uuid::new_v4(), "admin");

    let created = app
        .request(
            "POST",
            &format!("/api/chapters/{}/comments", scope.chapter_id),
            Some(json!({"body": "Admin target"})),
            Some(&author),
        )
        .await;
    let comment_id = helpers::parse_id(&created.body);

    let removed = app
        .request(
            "DELETE",
            &format!("/api/comments/{}", comment_id),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(removed.status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_removes_replies() {
    let Some(scope) = chapter_scope("delete-cascade").await else {
        return;
    };
    let app = &scope.app;
    let token = app.mint_token(Uuid::new_v4(), "user");
    let path = format!("/api/chapters/{}/comments", scope.chapter_id);

    let top = app
        .request("POST", &path, Some(json!({"body": "Parent"})), Some(&token))
        .await;
    let top_id = helpers::parse_id(&top.body);
    app.request(
        "POST",
        &path,
        Some(json!({"body": "Child", "parent_id": top_id})),
        Some(&token),
    )
    .await;

    let removed = app
        .request(
            "DELETE",
            &format!("/api/comments/{}", top_id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(removed.status, StatusCode::OK);

    let list = app.request("GET", &path, None, Some(&token)).await;
    assert_eq!(list.body["total_items"], 0);
}

#[tokio::test]
async fn test_report_and_dismiss_flow() {
    let Some(scope) = chapter_scope("report-flow").await else {
        return;
    };
    let app = &scope.app;
    let author = app.mint_token(Uuid::new_v4(), "user");
    let reporter_id = Uuid::new_v4();
    let reporter = app.mint_token(reporter_id, "user");

    let created = app
        .request(
            "POST",
            &format!("/api/chapters/{}/comments", scope.chapter_id),
            Some(json!({"body": "Questionable"})),
            Some(&author),
        )
        .await;
    let comment_id = helpers::parse_id(&created.body);
    let report_path = format!("/api/comments/{}/report", comment_id);

    // Authors cannot report themselves.
    let own = app
        .request(
            "POST",
            &report_path,
            Some(json!({"reason": "Testing"})),
            Some(&author),
        )
        .await;
    assert_eq!(own.status, StatusCode::FORBIDDEN);

    let reported = app
        .request(
            "POST",
            &report_path,
            Some(json!({"reason": "Spam link"})),
            Some(&reporter),
        )
        .await;
    assert_eq!(reported.status, StatusCode::OK);
    assert_eq!(reported.body["report"]["reason"], "Spam link");
    assert_eq!(reported.body["report"]["reported_by"], json!(reporter_id));

    // Only the course owner or an admin sees the reported queue.
    let queue_path = format!("/api/courses/{}/comments/reported", scope.course_id);
    let denied = app.request("GET", &queue_path, None, Some(&reporter)).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let queue = app
        .request("GET", &queue_path, None, Some(&scope.owner_token))
        .await;
    assert_eq!(queue.status, StatusCode::OK);
    let items = queue.body["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], json!(comment_id));

    let dismissed = app
        .request("DELETE", &report_path, None, Some(&scope.owner_token))
        .await;
    assert_eq!(dismissed.status, StatusCode::OK);
    assert!(dismissed.body["report"].is_null());

    // Dismissing an unreported comment is a no-op, not an error.
    let again = app
        .request("DELETE", &report_path, None, Some(&scope.owner_token))
        .await;
    assert_eq!(again.status, StatusCode::OK);

    let empty_queue = app
        .request("GET", &queue_path, None, Some(&scope.owner_token))
        .await;
    assert_eq!(empty_queue.body["total_items"], 0);
}

#[tokio::test]
async fn test_deleting_reported_comment_clears_queue() {
    let Some(scope) = chapter_scope("delete-reported").await else {
        return;
    };
    let app = &scope.app;
    let author = app.mint_token(Uuid::new_v4(), "user");
    let reporter = app.mint_token(Uuid::new_v4(), "user");

    let created = app
        .request(
            "POST",
            &format!("/api/chapters/{}/comments", scope.chapter_id),
            Some(json!({"body": "Removed for spam"})),
            Some(&author),
        )
        .await;
    let comment_id = helpers::parse_id(&created.body);

    let reported = app
        .request(
            "POST",
            &format!("/api/comments/{}/report", comment_id),
            Some(json!({"reason": "Spam"})),
            Some(&reporter),
        )
        .await;
    assert_eq!(reported.status, StatusCode::OK);

    let deleted = app
        .request(
            "DELETE",
            &format!("/api/comments/{}", comment_id),
            None,
            Some(&scope.owner_token),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let queue = app
        .request(
            "GET",
            &format!("/api/courses/{}/comments/reported", scope.course_id),
            None,
            Some(&scope.owner_token),
        )
        .await;
    assert_eq!(queue.body["total_items"], 0);
}

#[tokio::test]
async fn test_discussions_are_separate_from_chapter_comments() {
    let Some(scope) = chapter_scope("discussions").await else {
        return;
    };
    let app = &scope.app;
    let token = app.mint_token(Uuid::new_v4(), "user");

    let discussion_path = format!("/api/courses/{}/discussions", scope.course_id);
    let created = app
        .request(
            "POST",
            &discussion_path,
            Some(json!({"body": "Is this course right for beginners?"})),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "body: {:?}", created.body);
    assert!(created.body["chapter_id"].is_null());

    let discussions = app
        .request("GET", &discussion_path, None, Some(&token))
        .await;
    assert_eq!(discussions.body["total_items"], 1);

    let chapter_comments = app
        .request(
            "GET",
            &format!("/api/chapters/{}/comments", scope.chapter_id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(chapter_comments.body["total_items"], 0);
}

#[tokio::test]
async fn test_comment_body_validation() {
    let Some(scope) = chapter_scope("body-validation").await else {
        return;
    };
    let app = &scope.app;
    let token = app.mint_token(Uuid::new_v4(), "user");
    let path = format!("/api/chapters/{}/comments", scope.chapter_id);

    let empty = app
        .request("POST", &path, Some(json!({"body": ""})), Some(&token))
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let oversized = app
        .request(
            "POST",
            &path,
            Some(json!({"body": "x".repeat(2001)})),
            Some(&token),
        )
        .await;
    assert_eq!(oversized.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_comments_on_unknown_chapter_404() {
    let Some(app) = helpers::TestApp::try_new().await else {
        return;
    };
    let token = app.mint_token(Uuid::new_v4(), "user");

    let response = app
        .request(
            "GET",
            &format!("/api/chapters/{}/comments", Uuid::new_v4()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["status"], 404);
}
