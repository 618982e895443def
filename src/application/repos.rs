//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::entities::{ArticleRecord, CategoryRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint: {constraint}")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("integrity constraint violated: {message}")]
    Constraint { message: String },
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    /// True for the failure modes the write handlers surface to the user
    /// as a plain-text message rather than an error status.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Duplicate { .. } | Self::Constraint { .. })
    }
}

#[derive(Debug, Clone)]
pub struct CreateCategoryParams {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct UpdateCategoryParams {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CreateArticleParams {
    pub category_id: i64,
    pub title: String,
    pub introduction: String,
    pub text: String,
    /// Storage assigns the current UTC time when absent.
    pub pub_date: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct UpdateArticleParams {
    pub id: i64,
    pub category_id: i64,
    pub title: String,
    pub introduction: String,
    pub text: String,
    /// `None` leaves the stored publication time untouched.
    pub pub_date: Option<OffsetDateTime>,
}

/// An article joined with the name of its category, for listings and
/// the detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleDetailRecord {
    pub id: i64,
    pub category_id: i64,
    pub category_name: String,
    pub title: String,
    pub introduction: String,
    pub text: String,
    pub pub_date: OffsetDateTime,
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<CategoryRecord>, RepoError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<CategoryRecord>, RepoError>;

    async fn list_all(&self) -> Result<Vec<CategoryRecord>, RepoError>;

    async fn update_category(
        &self,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;

    async fn delete_category(&self, id: i64) -> Result<(), RepoError>;

    async fn count_categories(&self) -> Result<u64, RepoError>;

    /// Size of the derived `articles` back-reference for one category.
    async fn count_articles_in(&self, id: i64) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait ArticlesRepo: Send + Sync {
    async fn create_article(&self, params: CreateArticleParams)
    -> Result<ArticleRecord, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ArticleRecord>, RepoError>;

    async fn find_detailed(&self, id: i64) -> Result<Option<ArticleDetailRecord>, RepoError>;

    /// Newest first by publication time, at most `limit` rows.
    async fn list_latest(&self, limit: u32) -> Result<Vec<ArticleRecord>, RepoError>;

    async fn list_by_category(&self, category_id: i64) -> Result<Vec<ArticleRecord>, RepoError>;

    /// Every article joined with its category name, newest first.
    async fn list_detailed(&self) -> Result<Vec<ArticleDetailRecord>, RepoError>;

    async fn update_article(&self, params: UpdateArticleParams)
    -> Result<ArticleRecord, RepoError>;

    async fn delete_article(&self, id: i64) -> Result<(), RepoError>;

    async fn count_articles(&self) -> Result<u64, RepoError>;
}
