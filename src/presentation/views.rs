use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::application::error::{ErrorReport, HttpError};

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response() -> Response {
    let mut response = render_template_response(
        ErrorTemplate {
            heading: "Not found".to_string(),
            message: "The page you were looking for does not exist.".to_string(),
        },
        StatusCode::NOT_FOUND,
    );
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

/// One article summary as the feed and listing pages show it.
#[derive(Clone)]
pub struct ArticleCard {
    pub id: i64,
    pub title: String,
    pub introduction: String,
    pub published: String,
    pub iso_date: String,
}

#[derive(Clone)]
pub struct HomeContext {
    pub articles: Vec<ArticleCard>,
}

#[derive(Clone)]
pub struct ListingContext {
    pub heading: String,
    pub articles: Vec<ArticleCard>,
}

#[derive(Clone)]
pub struct ArticleDetailContext {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub introduction: String,
    pub published: String,
    pub iso_date: String,
    pub paragraphs: Vec<String>,
}

#[derive(Clone)]
pub struct CategoryOption {
    pub id: i64,
    pub name: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "base.html")]
pub struct BaseTemplate;

#[derive(Template)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub content: HomeContext,
}

#[derive(Template)]
#[template(path = "blog.html")]
pub struct BlogTemplate {
    pub content: ListingContext,
}

#[derive(Template)]
#[template(path = "news.html")]
pub struct NewsTemplate {
    pub content: ListingContext,
}

#[derive(Template)]
#[template(path = "detailed.html")]
pub struct DetailTemplate {
    pub content: ArticleDetailContext,
}

#[derive(Template)]
#[template(path = "new_post.html")]
pub struct NewPostTemplate {
    pub categories: Vec<CategoryOption>,
}

#[derive(Clone)]
pub struct EditPostContext {
    pub id: i64,
    pub title: String,
    pub introduction: String,
    pub text: String,
    pub categories: Vec<CategoryOption>,
}

#[derive(Template)]
#[template(path = "edit_post.html")]
pub struct EditPostTemplate {
    pub content: EditPostContext,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub heading: String,
    pub message: String,
}
