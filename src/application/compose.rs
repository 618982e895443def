//! Write paths for the public site: creating, editing, and deleting
//! articles through the posting forms.

use std::sync::Arc;

use thiserror::Error;

use crate::application::repos::{
    ArticlesRepo, CategoriesRepo, CreateArticleParams, RepoError, UpdateArticleParams,
};
use crate::domain::entities::{ArticleRecord, CategoryRecord};

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("article not found")]
    NotFound,
    /// A storage constraint rejected the write: duplicate title, length
    /// cap, missing field, or a dangling category reference. The message
    /// carries the storage diagnostic verbatim.
    #[error("{0}")]
    Constraint(String),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for ComposeError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => ComposeError::NotFound,
            err if err.is_constraint_violation() => ComposeError::Constraint(err.to_string()),
            other => ComposeError::Repo(other),
        }
    }
}

/// Fields accepted from the posting form, publication time defaulted.
#[derive(Debug, Clone)]
pub struct ArticleDraft {
    pub category_id: i64,
    pub title: String,
    pub introduction: String,
    pub text: String,
}

/// The mutable fields of an existing article, applied as one typed
/// update. `id` and `pub_date` are never touched by an edit.
#[derive(Debug, Clone)]
pub struct ArticlePatch {
    pub category_id: i64,
    pub title: String,
    pub introduction: String,
    pub text: String,
}

#[derive(Clone)]
pub struct ComposeService {
    articles: Arc<dyn ArticlesRepo>,
    categories: Arc<dyn CategoriesRepo>,
}

impl ComposeService {
    pub fn new(articles: Arc<dyn ArticlesRepo>, categories: Arc<dyn CategoriesRepo>) -> Self {
        Self {
            articles,
            categories,
        }
    }

    pub async fn category_choices(&self) -> Result<Vec<CategoryRecord>, ComposeError> {
        Ok(self.categories.list_all().await?)
    }

    pub async fn create_article(&self, draft: ArticleDraft) -> Result<ArticleRecord, ComposeError> {
        let ArticleDraft {
            category_id,
            title,
            introduction,
            text,
        } = draft;

        let created = self
            .articles
            .create_article(CreateArticleParams {
                category_id,
                title,
                introduction,
                text,
                pub_date: None,
            })
            .await?;

        Ok(created)
    }

    /// The article plus category choices, for pre-filling the edit form.
    pub async fn edit_context(
        &self,
        id: i64,
    ) -> Result<Option<(ArticleRecord, Vec<CategoryRecord>)>, ComposeError> {
        let Some(article) = self.articles.find_by_id(id).await? else {
            return Ok(None);
        };
        let categories = self.categories.list_all().await?;
        Ok(Some((article, categories)))
    }

    pub async fn update_article(
        &self,
        id: i64,
        patch: ArticlePatch,
    ) -> Result<ArticleRecord, ComposeError> {
        if self.articles.find_by_id(id).await?.is_none() {
            return Err(ComposeError::NotFound);
        }

        let ArticlePatch {
            category_id,
            title,
            introduction,
            text,
        } = patch;

        let updated = self
            .articles
            .update_article(UpdateArticleParams {
                id,
                category_id,
                title,
                introduction,
                text,
                pub_date: None,
            })
            .await?;

        Ok(updated)
    }

    pub async fn delete_article(&self, id: i64) -> Result<(), ComposeError> {
        if self.articles.find_by_id(id).await?.is_none() {
            return Err(ComposeError::NotFound);
        }
        self.articles.delete_article(id).await?;
        Ok(())
    }
}
