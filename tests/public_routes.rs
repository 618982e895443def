mod common;

use axum::http::{StatusCode, header};
use gazette::application::repos::ArticlesRepo;
use sqlx::SqlitePool;
use time::{OffsetDateTime, macros::datetime};

use common::{
    body_string, get, post_form, public_router, repositories, seed_article, seed_category,
};

#[sqlx::test(migrations = "./migrations")]
async fn home_shows_at_most_three_newest_articles(pool: SqlitePool) {
    let repos = repositories(pool);
    let category = seed_category(&repos, "Blog").await;
    for (day, title) in [
        (1, "Oldest"),
        (2, "Older"),
        (3, "Third"),
        (4, "Second"),
        (5, "Newest"),
    ] {
        seed_article(
            &repos,
            category.id,
            title,
            Some(datetime!(2026-01-01 00:00 UTC) + time::Duration::days(day)),
        )
        .await;
    }

    let router = public_router(&repos);
    let response = get(&router, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Newest"));
    assert!(body.contains("Second"));
    assert!(body.contains("Third"));
    assert!(!body.contains("Oldest"));
    assert!(!body.contains("Older"));

    let newest = body.find("Newest").expect("newest on page");
    let second = body.find("Second").expect("second on page");
    let third = body.find("Third").expect("third on page");
    assert!(newest < second);
    assert!(second < third);
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_title_is_reported_and_not_persisted(pool: SqlitePool) {
    let repos = repositories(pool);
    let category = seed_category(&repos, "Blog").await;
    let router = public_router(&repos);

    let form = format!(
        "category_select={}&title=Same+Title&introduction=First&article_text=Body",
        category.id
    );
    let first = post_form(&router, "/new_post", &form).await;
    assert_eq!(first.status(), StatusCode::SEE_OTHER);

    let second = post_form(&router, "/new_post", &form).await;
    assert_eq!(second.status(), StatusCode::OK);
    let content_type = second
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"));
    let body = body_string(second).await;
    assert!(body.contains("Failed to add the article"));
    assert!(body.contains("UNIQUE constraint failed"));

    assert_eq!(repos.count_articles().await.expect("count"), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn overlong_title_is_rejected_by_storage(pool: SqlitePool) {
    let repos = repositories(pool);
    let category = seed_category(&repos, "Blog").await;
    let router = public_router(&repos);

    let long_title = "x".repeat(51);
    let form = format!(
        "category_select={}&title={long_title}&introduction=Intro&article_text=Body",
        category.id
    );
    let response = post_form(&router, "/new_post", &form).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Failed to add the article"));

    assert_eq!(repos.count_articles().await.expect("count"), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn new_post_defaults_publication_time_to_now(pool: SqlitePool) {
    let repos = repositories(pool);
    let category = seed_category(&repos, "Blog").await;
    let router = public_router(&repos);

    let before = OffsetDateTime::now_utc();
    let form = format!(
        "category_select={}&title=Fresh&introduction=Intro&article_text=Body",
        category.id
    );
    let response = post_form(&router, "/new_post", &form).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let after = OffsetDateTime::now_utc();

    let articles = repos.list_latest(1).await.expect("latest");
    let created = articles.first().expect("created article");
    assert!(created.pub_date >= before);
    assert!(created.pub_date <= after);
}

#[sqlx::test(migrations = "./migrations")]
async fn detail_page_renders_article_with_category(pool: SqlitePool) {
    let repos = repositories(pool);
    let category = seed_category(&repos, "Blog").await;
    let article = seed_article(
        &repos,
        category.id,
        "Deep Dive",
        Some(datetime!(2026-03-07 09:30 UTC)),
    )
    .await;

    let router = public_router(&repos);
    let response = get(&router, &format!("/detailed_post/{}", article.id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Deep Dive"));
    assert!(body.contains("Blog"));
    assert!(body.contains("Second paragraph."));
    assert!(body.contains("March 7, 2026"));
}

#[sqlx::test(migrations = "./migrations")]
async fn missing_article_detail_is_not_found(pool: SqlitePool) {
    let repos = repositories(pool);
    let router = public_router(&repos);

    let response = get(&router, "/detailed_post/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn edit_changes_fields_but_keeps_identity(pool: SqlitePool) {
    let repos = repositories(pool);
    let blog = seed_category(&repos, "Blog").await;
    let news = seed_category(&repos, "News").await;
    let original_date = datetime!(2026-02-01 12:00 UTC);
    let article = seed_article(&repos, blog.id, "Before", Some(original_date)).await;

    let router = public_router(&repos);
    let form = format!(
        "category_select={}&title=After&introduction=Changed&article_text=Rewritten",
        news.id
    );
    let response = post_form(&router, &format!("/edit/{}", article.id), &form).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let updated = repos
        .find_by_id(article.id)
        .await
        .expect("lookup")
        .expect("article still present");
    assert_eq!(updated.id, article.id);
    assert_eq!(updated.title, "After");
    assert_eq!(updated.introduction, "Changed");
    assert_eq!(updated.text, "Rewritten");
    assert_eq!(updated.category_id, news.id);
    assert_eq!(updated.pub_date, original_date);
}

#[sqlx::test(migrations = "./migrations")]
async fn editing_missing_article_is_not_found(pool: SqlitePool) {
    let repos = repositories(pool);
    seed_category(&repos, "Blog").await;
    let router = public_router(&repos);

    let response = get(&router, "/edit/42").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_form(
        &router,
        "/edit/42",
        "category_select=1&title=X&introduction=Y&article_text=Z",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_removes_only_the_named_article(pool: SqlitePool) {
    let repos = repositories(pool);
    let category = seed_category(&repos, "Blog").await;
    let doomed = seed_article(
        &repos,
        category.id,
        "Doomed",
        Some(datetime!(2026-01-01 00:00 UTC)),
    )
    .await;
    let survivor = seed_article(
        &repos,
        category.id,
        "Survivor",
        Some(datetime!(2026-01-02 00:00 UTC)),
    )
    .await;

    let router = public_router(&repos);
    let response = get(&router, &format!("/delete/{}", doomed.id)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = get(&router, &format!("/detailed_post/{}", doomed.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&router, &format!("/delete/{}", doomed.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let remaining = repos
        .find_by_id(survivor.id)
        .await
        .expect("lookup")
        .expect("survivor kept");
    assert_eq!(remaining.title, "Survivor");
}

#[sqlx::test(migrations = "./migrations")]
async fn blog_page_lists_only_the_blog_category(pool: SqlitePool) {
    let repos = repositories(pool);
    let blog = seed_category(&repos, "Blog").await;
    let news = seed_category(&repos, "News").await;
    seed_article(
        &repos,
        blog.id,
        "Blog Entry",
        Some(datetime!(2026-01-01 00:00 UTC)),
    )
    .await;
    seed_article(
        &repos,
        news.id,
        "News Flash",
        Some(datetime!(2026-01-02 00:00 UTC)),
    )
    .await;

    let router = public_router(&repos);
    let response = get(&router, "/blog").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Blog Entry"));
    assert!(!body.contains("News Flash"));
}

#[sqlx::test(migrations = "./migrations")]
async fn missing_listing_category_is_a_server_error(pool: SqlitePool) {
    let repos = repositories(pool);
    let router = public_router(&repos);

    let response = get(&router, "/blog").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[sqlx::test(migrations = "./migrations")]
async fn base_and_health_routes_respond(pool: SqlitePool) {
    let repos = repositories(pool);
    let router = public_router(&repos);

    let response = get(&router, "/base").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&router, "/_health/db").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&router, "/no-such-page").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
