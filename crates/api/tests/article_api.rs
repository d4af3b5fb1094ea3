//! HTTP-level integration tests for the `/article` resource.
//!
//! Covers the public/admin visibility split, listing filters and pagination,
//! owner-checked mutations, and the index writes each mutation queues.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{
    body_json, create_user, delete_auth, get, get_auth, patch_json_auth, post_json_auth,
};
use quill_core::roles::Role;
use quill_core::types::DbId;
use quill_core::visibility::Visibility;
use quill_db::models::article::{Article, CreateArticle};
use quill_db::repositories::{ArticleRepo, TopicRepo};
use quill_search::IndexCommand;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Insert an article directly, bypassing the API (and the index queue).
async fn insert_article(
    pool: &PgPool,
    owner: DbId,
    title: &str,
    visibility: Visibility,
    topics: Vec<DbId>,
) -> Article {
    let input = CreateArticle {
        title: title.to_string(),
        description: format!("About {title}"),
        image: "cover.png".to_string(),
        content: "word ".repeat(50),
        visibility,
        topics,
    };
    let url = quill_core::slug::slugify(title).unwrap();
    ArticleRepo::create(pool, &input, &url, "1min", owner)
        .await
        .unwrap()
}

fn article_body(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "description": "A short description",
        "image": "https://example.com/cover.png",
        "content": "Some body text",
    })
}

fn titles(json: &serde_json::Value) -> Vec<String> {
    json["articles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_article_slugifies_and_queues_index(pool: PgPool) {
    let (admin, token) = create_user(&pool, "admin@test.com", Role::Admin).await;
    let topic = TopicRepo::create(&pool, "Rust", "rust", 1).await.unwrap();
    let (app, mut index_rx) = common::build_test_app_with_queue(pool);

    let mut body = article_body("Rust & Đà Lạt");
    body["topics"] = json!([topic.id]);
    body["visibility"] = json!("public");
    let response = post_json_auth(app, "/article/admin/articles", &token, body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["url"], "rust-da-lat");
    assert_eq!(json["timeToRead"], "1min");
    assert_eq!(json["visibility"], "public");
    assert_eq!(json["deleteSoft"], false);
    assert_eq!(json["createdBy"], admin.id);
    assert_eq!(json["topics"][0]["url"], "rust");

    let id = json["id"].as_i64().unwrap();
    assert_matches!(
        index_rx.try_recv(),
        Ok(IndexCommand::Index(doc)) if doc.id == id && doc.title == "Rust & Đà Lạt"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_defaults_to_private(pool: PgPool) {
    let (_admin, token) = create_user(&pool, "admin@test.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let response =
        post_json_auth(app, "/article/admin/articles", &token, article_body("Draft")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["visibility"], "private");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_title_is_conflict(pool: PgPool) {
    let (_admin, token) = create_user(&pool, "admin@test.com", Role::Admin).await;

    let app = common::build_test_app(pool.clone());
    let first =
        post_json_auth(app, "/article/admin/articles", &token, article_body("Same Title")).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let second =
        post_json_auth(app, "/article/admin/articles", &token, article_body("same title!")).await;

    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(second).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rejects_empty_title(pool: PgPool) {
    let (_admin, token) = create_user(&pool, "admin@test.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/article/admin/articles", &token, article_body("")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("title"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_without_alphanumerics_is_rejected(pool: PgPool) {
    let (_admin, token) = create_user(&pool, "admin@test.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let response =
        post_json_auth(app, "/article/admin/articles", &token, article_body("!!!")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_body_field_is_validation_error(pool: PgPool) {
    let (_admin, token) = create_user(&pool, "admin@test.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let mut body = article_body("Untitled");
    body.as_object_mut().unwrap().remove("title");
    let response = post_json_auth(app, "/article/admin/articles", &token, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("title"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_numeric_article_id_is_validation_error(pool: PgPool) {
    let (_admin, token) = create_user(&pool, "admin@test.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let response = delete_auth(app, "/article/admin/articles/abc", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_routes_require_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/article/admin/articles").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_member_is_forbidden_on_admin_routes(pool: PgPool) {
    let (_member, token) = create_user(&pool, "member@test.com", Role::Member).await;

    let app = common::build_test_app(pool.clone());
    let list = get_auth(app, "/article/admin/articles", &token).await;
    assert_eq!(list.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let create =
        post_json_auth(app, "/article/admin/articles", &token, article_body("Nope")).await;
    assert_eq!(create.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_systemadmin_may_use_admin_routes(pool: PgPool) {
    let (_sys, token) = create_user(&pool, "sys@test.com", Role::SystemAdmin).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/article/admin/articles", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_query_value_is_validation_error(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/article/articles?sortByDate=asc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("sortByDate"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_listing_hides_private_link_and_deleted(pool: PgPool) {
    let (admin, _token) = create_user(&pool, "admin@test.com", Role::Admin).await;
    insert_article(&pool, admin.id, "Visible", Visibility::Public, vec![]).await;
    insert_article(&pool, admin.id, "Hidden", Visibility::Private, vec![]).await;
    insert_article(&pool, admin.id, "Shared", Visibility::WithLink, vec![]).await;
    let gone = insert_article(&pool, admin.id, "Gone", Visibility::Public, vec![]).await;
    ArticleRepo::soft_delete(&pool, gone.id).await.unwrap();

    let app = common::build_test_app(pool);
    let response = get(app, "/article/articles").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(titles(&json), vec!["Visible"]);
    assert_eq!(json["meta"]["total"], 1);
    assert!(json["articles"][0]["topics"].is_array());
    assert_eq!(json["articles"][0]["createdBy"]["id"], admin.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_listing_filters_by_visibility(pool: PgPool) {
    let (admin, token) = create_user(&pool, "admin@test.com", Role::Admin).await;
    insert_article(&pool, admin.id, "Visible", Visibility::Public, vec![]).await;
    insert_article(&pool, admin.id, "Hidden", Visibility::Private, vec![]).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/article/admin/articles?visibilities=private", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(titles(&json), vec!["Hidden"]);
    assert!(
        json["articles"][0].get("topics").is_none(),
        "admin rows omit topics without a topic filter"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_listing_filters_by_delete_soft(pool: PgPool) {
    let (admin, token) = create_user(&pool, "admin@test.com", Role::Admin).await;
    insert_article(&pool, admin.id, "Live", Visibility::Private, vec![]).await;
    let gone = insert_article(&pool, admin.id, "Gone", Visibility::Public, vec![]).await;
    ArticleRepo::soft_delete(&pool, gone.id).await.unwrap();

    let app = common::build_test_app(pool.clone());
    let all = body_json(get_auth(app, "/article/admin/articles", &token).await).await;
    assert_eq!(all["meta"]["total"], 2);

    let app = common::build_test_app(pool);
    let deleted =
        body_json(get_auth(app, "/article/admin/articles?deleteSoft=true", &token).await).await;
    assert_eq!(titles(&deleted), vec!["Gone"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_listing_rejects_unknown_visibility(pool: PgPool) {
    let (_admin, token) = create_user(&pool, "admin@test.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/article/admin/articles?visibilities=secret", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_page_returns_items_eleven_to_twenty(pool: PgPool) {
    let (admin, _token) = create_user(&pool, "admin@test.com", Role::Admin).await;
    for n in 1..=25 {
        let title = format!("Article {n}");
        insert_article(&pool, admin.id, &title, Visibility::Public, vec![]).await;
    }

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/article/articles?page=2&perPage=10").await).await;

    let expected: Vec<String> = (11..=20).map(|n| format!("Article {n}")).collect();
    assert_eq!(titles(&json), expected);
    assert_eq!(json["meta"], json!({ "total": 25, "page": 2, "perPage": 10 }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_descending_sort_by_date(pool: PgPool) {
    let (admin, _token) = create_user(&pool, "admin@test.com", Role::Admin).await;
    insert_article(&pool, admin.id, "Older", Visibility::Public, vec![]).await;
    insert_article(&pool, admin.id, "Newer", Visibility::Public, vec![]).await;

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/article/articles?sortByDate=DESC").await).await;

    assert_eq!(titles(&json), vec!["Newer", "Older"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_topic_filter(pool: PgPool) {
    let (admin, token) = create_user(&pool, "admin@test.com", Role::Admin).await;
    let rust = TopicRepo::create(&pool, "Rust", "rust", 1).await.unwrap();
    let go = TopicRepo::create(&pool, "Go", "go", 2).await.unwrap();
    insert_article(&pool, admin.id, "Ownership", Visibility::Public, vec![rust.id]).await;
    insert_article(&pool, admin.id, "Goroutines", Visibility::Private, vec![go.id]).await;
    insert_article(&pool, admin.id, "Untagged", Visibility::Public, vec![]).await;

    let app = common::build_test_app(pool.clone());
    let public = body_json(get(app, "/article/articles?topicUrls=rust,go").await).await;
    assert_eq!(titles(&public), vec!["Ownership"]);

    let app = common::build_test_app(pool);
    let admin_json =
        body_json(get_auth(app, "/article/admin/articles?topicUrls=go", &token).await).await;
    assert_eq!(titles(&admin_json), vec!["Goroutines"]);
    assert_eq!(admin_json["articles"][0]["topics"][0]["url"], "go");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_text_search_with_unreachable_index_applies_no_id_filter(pool: PgPool) {
    let (admin, _token) = create_user(&pool, "admin@test.com", Role::Admin).await;
    insert_article(&pool, admin.id, "First", Visibility::Public, vec![]).await;
    insert_article(&pool, admin.id, "Second", Visibility::Public, vec![]).await;

    let app = common::build_test_app(pool.clone());
    let plain = body_json(get(app, "/article/articles").await).await;

    let app = common::build_test_app(pool);
    let searched =
        body_json(get(app, "/article/articles?textSearch=nothing-matches").await).await;

    assert_eq!(titles(&plain), titles(&searched));
    assert_eq!(plain["meta"], searched["meta"]);
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_detail_by_slug_respects_visibility(pool: PgPool) {
    let (admin, _token) = create_user(&pool, "admin@test.com", Role::Admin).await;
    let topic = TopicRepo::create(&pool, "Rust", "rust", 1).await.unwrap();
    insert_article(&pool, admin.id, "Open Post", Visibility::Public, vec![topic.id]).await;
    insert_article(&pool, admin.id, "Link Post", Visibility::WithLink, vec![]).await;
    insert_article(&pool, admin.id, "Secret Post", Visibility::Private, vec![]).await;

    let app = common::build_test_app(pool.clone());
    let open = get(app, "/article/articles/open-post").await;
    assert_eq!(open.status(), StatusCode::OK);
    let json = body_json(open).await;
    assert_eq!(json["title"], "Open Post");
    assert_eq!(json["topics"][0]["name"], "Rust");

    let app = common::build_test_app(pool.clone());
    assert_eq!(get(app, "/article/articles/link-post").await.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let secret = get(app, "/article/articles/secret-post").await;
    assert_eq!(secret.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(secret).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_owner_update_regenerates_slug_and_reindexes(pool: PgPool) {
    let (admin, token) = create_user(&pool, "admin@test.com", Role::Admin).await;
    let article = insert_article(&pool, admin.id, "Old Title", Visibility::Private, vec![]).await;
    let (app, mut index_rx) = common::build_test_app_with_queue(pool);

    let response = patch_json_auth(
        app,
        &format!("/article/admin/articles/{}", article.id),
        &token,
        json!({ "title": "New Title", "visibility": "withLink" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["url"], "new-title");
    assert_eq!(json["visibility"], "withLink");
    assert_eq!(json["description"], "About Old Title");

    assert_matches!(
        index_rx.try_recv(),
        Ok(IndexCommand::Index(doc)) if doc.id == article.id && doc.title == "New Title"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_owner_update_is_wrong_credentials(pool: PgPool) {
    let (owner, _) = create_user(&pool, "owner@test.com", Role::Admin).await;
    let (_other, token) = create_user(&pool, "other@test.com", Role::Admin).await;
    let article = insert_article(&pool, owner.id, "Mine", Visibility::Public, vec![]).await;
    let app = common::build_test_app(pool);

    let response = patch_json_auth(
        app,
        &format!("/article/admin/articles/{}", article.id),
        &token,
        json!({ "title": "Hijacked" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "WRONG_CREDENTIALS");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_owner_delete_is_wrong_credentials(pool: PgPool) {
    let (owner, _) = create_user(&pool, "owner@test.com", Role::Admin).await;
    let (_other, token) = create_user(&pool, "other@test.com", Role::Admin).await;
    let article = insert_article(&pool, owner.id, "Mine", Visibility::Public, vec![]).await;
    let (app, mut index_rx) = common::build_test_app_with_queue(pool.clone());

    let uri = format!("/article/admin/articles/{}", article.id);
    let response = delete_auth(app, &uri, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "WRONG_CREDENTIALS");
    let stored = ArticleRepo::find_by_id(&pool, article.id).await.unwrap().unwrap();
    assert!(!stored.delete_soft);
    assert!(index_rx.try_recv().is_err(), "nothing queued on rejection");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_owner_delete_flags_row_and_queues_removal(pool: PgPool) {
    let (owner, token) = create_user(&pool, "owner@test.com", Role::Admin).await;
    let article = insert_article(&pool, owner.id, "Mine", Visibility::Public, vec![]).await;
    let (app, mut index_rx) = common::build_test_app_with_queue(pool.clone());

    let uri = format!("/article/admin/articles/{}", article.id);
    let response = delete_auth(app, &uri, &token).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let stored = ArticleRepo::find_by_id(&pool, article.id).await.unwrap().unwrap();
    assert!(stored.delete_soft, "row is kept with the flag set");
    assert_eq!(index_rx.try_recv().unwrap(), IndexCommand::Remove(article.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_missing_article_is_not_found(pool: PgPool) {
    let (_admin, token) = create_user(&pool, "admin@test.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let response = delete_auth(app, "/article/admin/articles/999999", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
