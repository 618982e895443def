//! View structs for the admin surface. Every page wraps its content in
//! [`AdminLayout`], which carries the shared chrome and an optional
//! flash message from the last action.

use askama::Template;

use crate::presentation::views::CategoryOption;

#[derive(Clone)]
pub struct AdminFlash {
    pub kind: &'static str,
    pub text: String,
}

impl AdminFlash {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: "success",
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: "error",
            text: text.into(),
        }
    }
}

#[derive(Clone)]
pub struct AdminLayout<T> {
    pub title: String,
    /// Slug of the table the navigation should highlight.
    pub active: &'static str,
    pub flash: Option<AdminFlash>,
    pub content: T,
}

impl<T> AdminLayout<T> {
    pub fn new(title: impl Into<String>, active: &'static str, content: T) -> Self {
        Self {
            title: title.into(),
            active,
            flash: None,
            content,
        }
    }

    pub fn with_flash(mut self, flash: AdminFlash) -> Self {
        self.flash = Some(flash);
        self
    }
}

#[derive(Clone)]
pub struct AdminMetricView {
    pub label: &'static str,
    pub value: u64,
    pub href: &'static str,
}

#[derive(Clone)]
pub struct AdminDashboardView {
    pub metrics: Vec<AdminMetricView>,
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub view: AdminLayout<AdminDashboardView>,
}

#[derive(Clone)]
pub struct AdminRowView {
    pub cells: Vec<String>,
    pub edit_href: String,
    pub delete_action: String,
}

/// A rendered table panel. `create_action` switches on the inline
/// create form (used by categories); `new_href` links to a dedicated
/// form page (used by articles).
#[derive(Clone)]
pub struct AdminTableView {
    pub heading: &'static str,
    pub columns: Vec<&'static str>,
    pub rows: Vec<AdminRowView>,
    pub create_action: Option<&'static str>,
    pub new_href: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "admin/table.html")]
pub struct AdminTableTemplate {
    pub view: AdminLayout<AdminTableView>,
}

#[derive(Clone)]
pub struct AdminCategoryFormView {
    pub heading: String,
    pub form_action: String,
    pub name: String,
}

#[derive(Template)]
#[template(path = "admin/category_form.html")]
pub struct AdminCategoryFormTemplate {
    pub view: AdminLayout<AdminCategoryFormView>,
}

#[derive(Clone)]
pub struct AdminArticleFormView {
    pub heading: String,
    pub form_action: String,
    pub title: String,
    pub introduction: String,
    pub text: String,
    /// Value for the `datetime-local` input, empty to keep the stored
    /// publication time.
    pub pub_date: String,
    pub categories: Vec<CategoryOption>,
}

#[derive(Template)]
#[template(path = "admin/article_form.html")]
pub struct AdminArticleFormTemplate {
    pub view: AdminLayout<AdminArticleFormView>,
}
