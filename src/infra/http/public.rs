use std::sync::Arc;

use axum::{
    Router,
    extract::{Form, Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;

use crate::{
    application::{
        compose::{ArticleDraft, ArticlePatch, ComposeError, ComposeService},
        error::HttpError,
        feed::FeedService,
    },
    config::SiteSettings,
    domain::entities::CategoryRecord,
    infra::db::SqliteRepositories,
    presentation::views::{
        BaseTemplate, BlogTemplate, CategoryOption, DetailTemplate, EditPostContext,
        EditPostTemplate, HomeTemplate, NewPostTemplate, NewsTemplate, render_not_found_response,
        render_template_response,
    },
};

use super::{
    constraint_rejection, db_health_response,
    middleware::{log_responses, set_request_context},
};

#[derive(Clone)]
pub struct HttpState {
    pub feed: Arc<FeedService>,
    pub compose: Arc<ComposeService>,
    pub site: SiteSettings,
    pub db: Arc<SqliteRepositories>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/base", get(base))
        .route("/", get(index))
        .route("/blog", get(blog))
        .route("/news", get(news))
        .route("/new_post", get(new_post_form).post(new_post_submit))
        .route("/detailed_post/{id}", get(detailed_post))
        .route("/edit/{id}", get(edit_form).post(edit_submit))
        .route("/delete/{id}", get(delete_post))
        .route("/_health/db", get(public_health))
        .fallback(fallback_not_found)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

/// Field names match the posting form markup.
#[derive(Debug, Deserialize)]
struct ArticleForm {
    category_select: i64,
    title: String,
    introduction: String,
    article_text: String,
}

async fn base() -> Response {
    render_template_response(BaseTemplate, StatusCode::OK)
}

async fn index(State(state): State<HttpState>) -> Response {
    match state.feed.home_context().await {
        Ok(content) => render_template_response(HomeTemplate { content }, StatusCode::OK),
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn blog(State(state): State<HttpState>) -> Response {
    match state.feed.listing_context(&state.site.blog_category).await {
        Ok(content) => render_template_response(BlogTemplate { content }, StatusCode::OK),
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn news(State(state): State<HttpState>) -> Response {
    match state.feed.listing_context(&state.site.news_category).await {
        Ok(content) => render_template_response(NewsTemplate { content }, StatusCode::OK),
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn detailed_post(State(state): State<HttpState>, Path(id): Path<i64>) -> Response {
    match state.feed.article_detail(id).await {
        Ok(Some(content)) => render_template_response(DetailTemplate { content }, StatusCode::OK),
        Ok(None) => render_not_found_response(),
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn new_post_form(State(state): State<HttpState>) -> Response {
    match state.compose.category_choices().await {
        Ok(categories) => render_template_response(
            NewPostTemplate {
                categories: category_options(categories, None),
            },
            StatusCode::OK,
        ),
        Err(err) => compose_error_to_response("Failed to load the posting form", err),
    }
}

async fn new_post_submit(
    State(state): State<HttpState>,
    Form(form): Form<ArticleForm>,
) -> Response {
    let draft = ArticleDraft {
        category_id: form.category_select,
        title: form.title,
        introduction: form.introduction,
        text: form.article_text,
    };

    match state.compose.create_article(draft).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(err) => compose_error_to_response("Failed to add the article", err),
    }
}

async fn edit_form(State(state): State<HttpState>, Path(id): Path<i64>) -> Response {
    match state.compose.edit_context(id).await {
        Ok(Some((article, categories))) => render_template_response(
            EditPostTemplate {
                content: EditPostContext {
                    id: article.id,
                    title: article.title,
                    introduction: article.introduction,
                    text: article.text,
                    categories: category_options(categories, Some(article.category_id)),
                },
            },
            StatusCode::OK,
        ),
        Ok(None) => render_not_found_response(),
        Err(err) => compose_error_to_response("Failed to load the article", err),
    }
}

async fn edit_submit(
    State(state): State<HttpState>,
    Path(id): Path<i64>,
    Form(form): Form<ArticleForm>,
) -> Response {
    let patch = ArticlePatch {
        category_id: form.category_select,
        title: form.title,
        introduction: form.introduction,
        text: form.article_text,
    };

    match state.compose.update_article(id, patch).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(err) => compose_error_to_response("Failed to update the article", err),
    }
}

// Deletion stays on GET for compatibility with the original interface.
async fn delete_post(State(state): State<HttpState>, Path(id): Path<i64>) -> Response {
    match state.compose.delete_article(id).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(err) => compose_error_to_response("Failed to delete the article", err),
    }
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.db.health_check().await)
}

async fn fallback_not_found() -> Response {
    render_not_found_response()
}

fn compose_error_to_response(context: &'static str, err: ComposeError) -> Response {
    match err {
        ComposeError::NotFound => render_not_found_response(),
        ComposeError::Constraint(detail) => constraint_rejection(context, &detail),
        ComposeError::Repo(err) => HttpError::from_error(
            "infra::http::public::compose",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            &err,
        )
        .into_response(),
    }
}

fn category_options(categories: Vec<CategoryRecord>, selected: Option<i64>) -> Vec<CategoryOption> {
    categories
        .into_iter()
        .map(|category| CategoryOption {
            selected: selected == Some(category.id),
            id: category.id,
            name: category.name,
        })
        .collect()
}
