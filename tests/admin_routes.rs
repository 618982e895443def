mod common;

use axum::http::StatusCode;
use gazette::application::repos::{ArticlesRepo, CategoriesRepo};
use sqlx::SqlitePool;
use time::macros::datetime;

use common::{
    admin_router, body_string, get, post_form, repositories, seed_article, seed_category,
};

#[sqlx::test(migrations = "./migrations")]
async fn dashboard_reports_table_counts(pool: SqlitePool) {
    let repos = repositories(pool);
    let category = seed_category(&repos, "Blog").await;
    seed_article(
        &repos,
        category.id,
        "Entry",
        Some(datetime!(2026-01-01 00:00 UTC)),
    )
    .await;

    let router = admin_router(&repos);
    let response = get(&router, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Categories"));
    assert!(body.contains("Articles"));
}

#[sqlx::test(migrations = "./migrations")]
async fn category_create_edit_and_delete_flow(pool: SqlitePool) {
    let repos = repositories(pool);
    let router = admin_router(&repos);

    let response = post_form(&router, "/categories/create", "name=Blog").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("created"));
    assert!(body.contains("Blog"));

    let category = repos
        .find_by_name("Blog")
        .await
        .expect("lookup")
        .expect("category persisted");

    let response = post_form(
        &router,
        &format!("/categories/{}/edit", category.id),
        "name=Updates",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("updated"));
    assert!(body.contains("Updates"));

    let response = post_form(&router, &format!("/categories/{}/delete", category.id), "").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(repos.count_categories().await.expect("count"), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_category_name_shows_an_error_flash(pool: SqlitePool) {
    let repos = repositories(pool);
    seed_category(&repos, "Blog").await;
    let router = admin_router(&repos);

    let response = post_form(&router, "/categories/create", "name=Blog").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("UNIQUE constraint failed"));

    assert_eq!(repos.count_categories().await.expect("count"), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn overlong_category_name_is_rejected(pool: SqlitePool) {
    let repos = repositories(pool);
    let router = admin_router(&repos);

    let long_name = "x".repeat(21);
    let response = post_form(&router, "/categories/create", &format!("name={long_name}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("constraint failed"));

    assert_eq!(repos.count_categories().await.expect("count"), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn category_with_articles_cannot_be_deleted(pool: SqlitePool) {
    let repos = repositories(pool);
    let category = seed_category(&repos, "Blog").await;
    seed_article(
        &repos,
        category.id,
        "Entry",
        Some(datetime!(2026-01-01 00:00 UTC)),
    )
    .await;

    let router = admin_router(&repos);
    let response = post_form(&router, &format!("/categories/{}/delete", category.id), "").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("FOREIGN KEY constraint failed"));

    assert_eq!(repos.count_categories().await.expect("count"), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn article_create_honours_an_explicit_publication_time(pool: SqlitePool) {
    let repos = repositories(pool);
    let category = seed_category(&repos, "Blog").await;
    let router = admin_router(&repos);

    let form = format!(
        "category_select={}&title=Scheduled&introduction=Intro&article_text=Body&pub_date=2026-01-02T03:04",
        category.id
    );
    let response = post_form(&router, "/articles/create", &form).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("created"));

    let articles = repos.list_latest(1).await.expect("latest");
    let created = articles.first().expect("created article");
    assert_eq!(created.pub_date, datetime!(2026-01-02 03:04 UTC));
}

#[sqlx::test(migrations = "./migrations")]
async fn article_edit_with_blank_time_keeps_the_stored_value(pool: SqlitePool) {
    let repos = repositories(pool);
    let category = seed_category(&repos, "Blog").await;
    let original_date = datetime!(2026-02-01 12:00 UTC);
    let article = seed_article(&repos, category.id, "Before", Some(original_date)).await;

    let router = admin_router(&repos);
    let form = format!(
        "category_select={}&title=After&introduction=Changed&article_text=Rewritten&pub_date=",
        category.id
    );
    let response = post_form(&router, &format!("/articles/{}/edit", article.id), &form).await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = ArticlesRepo::find_by_id(repos.as_ref(), article.id)
        .await
        .expect("lookup")
        .expect("article present");
    assert_eq!(updated.title, "After");
    assert_eq!(updated.pub_date, original_date);
}

#[sqlx::test(migrations = "./migrations")]
async fn malformed_publication_time_rerenders_the_form(pool: SqlitePool) {
    let repos = repositories(pool);
    let category = seed_category(&repos, "Blog").await;
    let router = admin_router(&repos);

    let form = format!(
        "category_select={}&title=Bad&introduction=Intro&article_text=Body&pub_date=tomorrow",
        category.id
    );
    let response = post_form(&router, "/articles/create", &form).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Invalid publication time"));

    assert_eq!(repos.count_articles().await.expect("count"), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn article_delete_and_missing_edit_form(pool: SqlitePool) {
    let repos = repositories(pool);
    let category = seed_category(&repos, "Blog").await;
    let article = seed_article(
        &repos,
        category.id,
        "Entry",
        Some(datetime!(2026-01-01 00:00 UTC)),
    )
    .await;

    let router = admin_router(&repos);
    let response = post_form(&router, &format!("/articles/{}/delete", article.id), "").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(repos.count_articles().await.expect("count"), 0);

    let response = get(&router, &format!("/articles/{}/edit", article.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn admin_health_route_responds(pool: SqlitePool) {
    let repos = repositories(pool);
    let router = admin_router(&repos);

    let response = get(&router, "/_health/db").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
