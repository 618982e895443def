#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tower::ServiceExt;

use gazette::{
    application::{
        admin::AdminTableService,
        compose::ComposeService,
        feed::FeedService,
        repos::{ArticlesRepo, CategoriesRepo, CreateArticleParams, CreateCategoryParams},
    },
    config::SiteSettings,
    domain::entities::{ArticleRecord, CategoryRecord},
    infra::{
        db::SqliteRepositories,
        http::{AdminState, HttpState, build_admin_router, build_router},
    },
};

pub fn repositories(pool: SqlitePool) -> Arc<SqliteRepositories> {
    Arc::new(SqliteRepositories::new(pool))
}

pub fn site_settings() -> SiteSettings {
    SiteSettings {
        blog_category: "Blog".to_string(),
        news_category: "News".to_string(),
    }
}

pub fn public_router(repositories: &Arc<SqliteRepositories>) -> Router {
    let articles: Arc<dyn ArticlesRepo> = repositories.clone();
    let categories: Arc<dyn CategoriesRepo> = repositories.clone();

    build_router(HttpState {
        feed: Arc::new(FeedService::new(articles.clone(), categories.clone())),
        compose: Arc::new(ComposeService::new(articles, categories)),
        site: site_settings(),
        db: repositories.clone(),
    })
}

pub fn admin_router(repositories: &Arc<SqliteRepositories>) -> Router {
    let articles: Arc<dyn ArticlesRepo> = repositories.clone();
    let categories: Arc<dyn CategoriesRepo> = repositories.clone();

    build_admin_router(AdminState {
        tables: Arc::new(AdminTableService::new(categories, articles)),
        db: repositories.clone(),
    })
}

pub async fn seed_category(repositories: &Arc<SqliteRepositories>, name: &str) -> CategoryRecord {
    repositories
        .create_category(CreateCategoryParams {
            name: name.to_string(),
        })
        .await
        .expect("seed category")
}

pub async fn seed_article(
    repositories: &Arc<SqliteRepositories>,
    category_id: i64,
    title: &str,
    pub_date: Option<OffsetDateTime>,
) -> ArticleRecord {
    repositories
        .create_article(CreateArticleParams {
            category_id,
            title: title.to_string(),
            introduction: format!("Introduction for {title}"),
            text: format!("Body for {title}.\n\nSecond paragraph."),
            pub_date,
        })
        .await
        .expect("seed article")
}

pub async fn get(router: &Router, path: &str) -> Response<axum::body::Body> {
    router
        .clone()
        .oneshot(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response")
}

pub async fn post_form(router: &Router, path: &str, body: &str) -> Response<axum::body::Body> {
    router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("response")
}

pub async fn body_string(response: Response<axum::body::Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
