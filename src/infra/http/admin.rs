use std::sync::Arc;

use axum::{
    Router,
    extract::{Form, Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use time::{
    OffsetDateTime, PrimitiveDateTime, error::Parse as ParseError, format_description::FormatItem,
    macros::format_description,
};

use crate::{
    application::{
        admin::{
            ARTICLE_TABLE, AdminArticleInput, AdminError, AdminTableService, CATEGORY_TABLE,
            TableDescriptor, TableRow,
        },
        error::HttpError,
    },
    domain::entities::CategoryRecord,
    infra::db::SqliteRepositories,
    presentation::admin::{
        AdminArticleFormTemplate, AdminArticleFormView, AdminCategoryFormTemplate,
        AdminCategoryFormView, AdminDashboardTemplate, AdminDashboardView, AdminFlash,
        AdminLayout, AdminMetricView, AdminRowView, AdminTableTemplate, AdminTableView,
    },
    presentation::views::{CategoryOption, render_not_found_response, render_template_response},
};

use super::{
    db_health_response,
    middleware::{log_responses, set_request_context},
};

/// Value format of an HTML `datetime-local` input. Submitted times are
/// taken as UTC.
const DATETIME_LOCAL_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");

#[derive(Clone)]
pub struct AdminState {
    pub tables: Arc<AdminTableService>,
    pub db: Arc<SqliteRepositories>,
}

pub fn build_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/categories", get(categories_index))
        .route("/categories/create", post(category_create))
        .route(
            "/categories/{id}/edit",
            get(category_edit_form).post(category_edit_submit),
        )
        .route("/categories/{id}/delete", post(category_delete))
        .route("/articles", get(articles_index))
        .route("/articles/new", get(article_new_form))
        .route("/articles/create", post(article_create))
        .route(
            "/articles/{id}/edit",
            get(article_edit_form).post(article_edit_submit),
        )
        .route("/articles/{id}/delete", post(article_delete))
        .route("/_health/db", get(admin_health))
        .fallback(fallback_not_found)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Deserialize)]
struct CategoryForm {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AdminArticleForm {
    category_select: i64,
    title: String,
    introduction: String,
    article_text: String,
    #[serde(default)]
    pub_date: String,
}

async fn dashboard(State(state): State<AdminState>) -> Response {
    match state.tables.table_counts().await {
        Ok(counts) => {
            let content = AdminDashboardView {
                metrics: vec![
                    AdminMetricView {
                        label: "Categories",
                        value: counts.categories,
                        href: "/categories",
                    },
                    AdminMetricView {
                        label: "Articles",
                        value: counts.articles,
                        href: "/articles",
                    },
                ],
            };
            render_template_response(
                AdminDashboardTemplate {
                    view: AdminLayout::new("Dashboard", "dashboard", content),
                },
                StatusCode::OK,
            )
        }
        Err(err) => admin_error_to_response(err),
    }
}

async fn categories_index(State(state): State<AdminState>) -> Response {
    render_categories_table(&state.tables, None).await
}

async fn category_create(
    State(state): State<AdminState>,
    Form(form): Form<CategoryForm>,
) -> Response {
    match state.tables.create_category(form.name).await {
        Ok(category) => {
            let flash = AdminFlash::success(format!("Category `{}` created", category.name));
            render_categories_table(&state.tables, Some(flash)).await
        }
        Err(AdminError::Constraint(detail)) => {
            render_categories_table(&state.tables, Some(AdminFlash::error(detail))).await
        }
        Err(err) => admin_error_to_response(err),
    }
}

async fn category_edit_form(State(state): State<AdminState>, Path(id): Path<i64>) -> Response {
    match state.tables.find_category(id).await {
        Ok(category) => render_category_form(category, None),
        Err(err) => admin_error_to_response(err),
    }
}

async fn category_edit_submit(
    State(state): State<AdminState>,
    Path(id): Path<i64>,
    Form(form): Form<CategoryForm>,
) -> Response {
    match state.tables.update_category(id, form.name.clone()).await {
        Ok(category) => {
            let flash = AdminFlash::success(format!("Category `{}` updated", category.name));
            render_categories_table(&state.tables, Some(flash)).await
        }
        Err(AdminError::Constraint(detail)) => render_category_form(
            CategoryRecord {
                id,
                name: form.name,
            },
            Some(AdminFlash::error(detail)),
        ),
        Err(err) => admin_error_to_response(err),
    }
}

async fn category_delete(State(state): State<AdminState>, Path(id): Path<i64>) -> Response {
    match state.tables.delete_category(id).await {
        Ok(()) => {
            let flash = AdminFlash::success("Category deleted");
            render_categories_table(&state.tables, Some(flash)).await
        }
        Err(AdminError::Constraint(detail)) => {
            render_categories_table(&state.tables, Some(AdminFlash::error(detail))).await
        }
        Err(err) => admin_error_to_response(err),
    }
}

async fn articles_index(State(state): State<AdminState>) -> Response {
    render_articles_table(&state.tables, None).await
}

async fn article_new_form(State(state): State<AdminState>) -> Response {
    let categories = match state.tables.category_choices().await {
        Ok(categories) => categories,
        Err(err) => return admin_error_to_response(err),
    };

    render_article_form(
        AdminArticleFormView {
            heading: "New article".to_string(),
            form_action: "/articles/create".to_string(),
            title: String::new(),
            introduction: String::new(),
            text: String::new(),
            pub_date: String::new(),
            categories: category_options(categories, None),
        },
        None,
    )
}

async fn article_create(
    State(state): State<AdminState>,
    Form(form): Form<AdminArticleForm>,
) -> Response {
    let input = match article_input_from_form(&state, &form, "/articles/create", "New article")
        .await
    {
        Ok(input) => input,
        Err(response) => return response,
    };

    match state.tables.create_article(input).await {
        Ok(article) => {
            let flash = AdminFlash::success(format!("Article `{}` created", article.title));
            render_articles_table(&state.tables, Some(flash)).await
        }
        Err(AdminError::Constraint(detail)) => {
            rerender_article_form(&state, &form, "/articles/create", "New article", detail).await
        }
        Err(err) => admin_error_to_response(err),
    }
}

async fn article_edit_form(State(state): State<AdminState>, Path(id): Path<i64>) -> Response {
    let article = match state.tables.find_article(id).await {
        Ok(article) => article,
        Err(err) => return admin_error_to_response(err),
    };
    let categories = match state.tables.category_choices().await {
        Ok(categories) => categories,
        Err(err) => return admin_error_to_response(err),
    };

    render_article_form(
        AdminArticleFormView {
            heading: format!("Edit article #{id}"),
            form_action: format!("/articles/{id}/edit"),
            title: article.title,
            introduction: article.introduction,
            text: article.text,
            pub_date: format_datetime_local(article.pub_date),
            categories: category_options(categories, Some(article.category_id)),
        },
        None,
    )
}

async fn article_edit_submit(
    State(state): State<AdminState>,
    Path(id): Path<i64>,
    Form(form): Form<AdminArticleForm>,
) -> Response {
    let action = format!("/articles/{id}/edit");
    let heading = format!("Edit article #{id}");
    let input = match article_input_from_form(&state, &form, &action, &heading).await {
        Ok(input) => input,
        Err(response) => return response,
    };

    match state.tables.update_article(id, input).await {
        Ok(article) => {
            let flash = AdminFlash::success(format!("Article `{}` updated", article.title));
            render_articles_table(&state.tables, Some(flash)).await
        }
        Err(AdminError::Constraint(detail)) => {
            rerender_article_form(&state, &form, &action, &heading, detail).await
        }
        Err(err) => admin_error_to_response(err),
    }
}

async fn article_delete(State(state): State<AdminState>, Path(id): Path<i64>) -> Response {
    match state.tables.delete_article(id).await {
        Ok(()) => {
            let flash = AdminFlash::success("Article deleted");
            render_articles_table(&state.tables, Some(flash)).await
        }
        Err(err) => admin_error_to_response(err),
    }
}

async fn admin_health(State(state): State<AdminState>) -> Response {
    db_health_response(state.db.health_check().await)
}

async fn fallback_not_found() -> Response {
    render_not_found_response()
}

async fn render_categories_table(
    service: &AdminTableService,
    flash: Option<AdminFlash>,
) -> Response {
    match service.category_rows().await {
        Ok(rows) => render_table(
            CATEGORY_TABLE,
            rows,
            Some("/categories/create"),
            None,
            flash,
        ),
        Err(err) => admin_error_to_response(err),
    }
}

async fn render_articles_table(service: &AdminTableService, flash: Option<AdminFlash>) -> Response {
    match service.article_rows().await {
        Ok(rows) => render_table(ARTICLE_TABLE, rows, None, Some("/articles/new"), flash),
        Err(err) => admin_error_to_response(err),
    }
}

fn render_table(
    descriptor: TableDescriptor,
    rows: Vec<TableRow>,
    create_action: Option<&'static str>,
    new_href: Option<&'static str>,
    flash: Option<AdminFlash>,
) -> Response {
    let content = AdminTableView {
        heading: descriptor.title,
        columns: descriptor.columns.iter().map(|column| column.label).collect(),
        rows: rows
            .into_iter()
            .map(|row| AdminRowView {
                edit_href: format!("/{}/{}/edit", descriptor.slug, row.id),
                delete_action: format!("/{}/{}/delete", descriptor.slug, row.id),
                cells: row.cells,
            })
            .collect(),
        create_action,
        new_href,
    };

    let mut view = AdminLayout::new(descriptor.title, descriptor.slug, content);
    if let Some(flash) = flash {
        view = view.with_flash(flash);
    }
    render_template_response(AdminTableTemplate { view }, StatusCode::OK)
}

fn render_category_form(category: CategoryRecord, flash: Option<AdminFlash>) -> Response {
    let content = AdminCategoryFormView {
        heading: format!("Edit category #{}", category.id),
        form_action: format!("/categories/{}/edit", category.id),
        name: category.name,
    };

    let mut view = AdminLayout::new("Edit category", "categories", content);
    if let Some(flash) = flash {
        view = view.with_flash(flash);
    }
    render_template_response(AdminCategoryFormTemplate { view }, StatusCode::OK)
}

fn render_article_form(content: AdminArticleFormView, flash: Option<AdminFlash>) -> Response {
    let mut view = AdminLayout::new(content.heading.clone(), "articles", content);
    if let Some(flash) = flash {
        view = view.with_flash(flash);
    }
    render_template_response(AdminArticleFormTemplate { view }, StatusCode::OK)
}

/// Builds the repository input from the submitted form, or an error
/// response when the publication time does not parse.
async fn article_input_from_form(
    state: &AdminState,
    form: &AdminArticleForm,
    action: &str,
    heading: &str,
) -> Result<AdminArticleInput, Response> {
    let pub_date = match parse_datetime_local(&form.pub_date) {
        Ok(pub_date) => pub_date,
        Err(err) => {
            let detail = format!("Invalid publication time: {err}");
            return Err(rerender_article_form(state, form, action, heading, detail).await);
        }
    };

    Ok(AdminArticleInput {
        category_id: form.category_select,
        title: form.title.clone(),
        introduction: form.introduction.clone(),
        text: form.article_text.clone(),
        pub_date,
    })
}

async fn rerender_article_form(
    state: &AdminState,
    form: &AdminArticleForm,
    action: &str,
    heading: &str,
    detail: String,
) -> Response {
    let categories = match state.tables.category_choices().await {
        Ok(categories) => categories,
        Err(err) => return admin_error_to_response(err),
    };

    render_article_form(
        AdminArticleFormView {
            heading: heading.to_string(),
            form_action: action.to_string(),
            title: form.title.clone(),
            introduction: form.introduction.clone(),
            text: form.article_text.clone(),
            pub_date: form.pub_date.clone(),
            categories: category_options(categories, Some(form.category_select)),
        },
        Some(AdminFlash::error(detail)),
    )
}

fn admin_error_to_response(err: AdminError) -> Response {
    match err {
        AdminError::NotFound => render_not_found_response(),
        AdminError::Constraint(detail) => HttpError::new(
            "infra::http::admin",
            StatusCode::CONFLICT,
            "Constraint violated",
            detail,
        )
        .into_response(),
        AdminError::Repo(err) => HttpError::from_error(
            "infra::http::admin",
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

fn parse_datetime_local(raw: &str) -> Result<Option<OffsetDateTime>, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let parsed = PrimitiveDateTime::parse(trimmed, DATETIME_LOCAL_FORMAT)?;
    Ok(Some(parsed.assume_utc()))
}

fn format_datetime_local(time: OffsetDateTime) -> String {
    PrimitiveDateTime::new(time.date(), time.time())
        .format(DATETIME_LOCAL_FORMAT)
        .unwrap_or_default()
}
