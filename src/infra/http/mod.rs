mod admin;
mod middleware;
mod public;

pub use admin::{AdminState, build_admin_router};
pub use public::{HttpState, build_router};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sqlx::Error as SqlxError;

use crate::application::error::ErrorReport;

fn db_health_response(result: Result<(), SqlxError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

/// Constraint rejections on the posting forms come back as a plain-text
/// page carrying the storage diagnostic, with a success status. The
/// original interface behaves this way and clients scrape the body.
fn constraint_rejection(context: &str, detail: &str) -> Response {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        format!("{context}: {detail}"),
    )
        .into_response()
}
