//! Table-editor services for the admin surface.
//!
//! Each editable entity is described by a hand-declared [`TableDescriptor`]
//! naming its display columns; no runtime reflection is involved. The
//! services operate directly against the repositories, independent of the
//! public read/write paths.

use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;

use crate::application::repos::{
    ArticlesRepo, CategoriesRepo, CreateArticleParams, CreateCategoryParams, RepoError,
    UpdateArticleParams, UpdateCategoryParams,
};
use crate::domain::articles::format_iso_date;
use crate::domain::entities::{ArticleRecord, CategoryRecord};

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub key: &'static str,
    pub label: &'static str,
}

/// Static description of one editable table: its title and the columns
/// its list view displays, in order.
#[derive(Debug, Clone, Copy)]
pub struct TableDescriptor {
    pub slug: &'static str,
    pub title: &'static str,
    pub columns: &'static [ColumnSpec],
}

pub const CATEGORY_TABLE: TableDescriptor = TableDescriptor {
    slug: "categories",
    title: "Categories",
    columns: &[
        ColumnSpec {
            key: "id",
            label: "Id",
        },
        ColumnSpec {
            key: "name",
            label: "Name",
        },
        ColumnSpec {
            key: "articles",
            label: "Articles",
        },
    ],
};

pub const ARTICLE_TABLE: TableDescriptor = TableDescriptor {
    slug: "articles",
    title: "Articles",
    columns: &[
        ColumnSpec {
            key: "id",
            label: "Id",
        },
        ColumnSpec {
            key: "category",
            label: "Category",
        },
        ColumnSpec {
            key: "title",
            label: "Title",
        },
        ColumnSpec {
            key: "introduction",
            label: "Introduction",
        },
        ColumnSpec {
            key: "pub_date",
            label: "Published",
        },
    ],
};

/// One rendered list row: the record id plus one cell per descriptor
/// column.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub id: i64,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TableCounts {
    pub categories: u64,
    pub articles: u64,
}

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("record not found")]
    NotFound,
    #[error("{0}")]
    Constraint(String),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for AdminError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AdminError::NotFound,
            err if err.is_constraint_violation() => AdminError::Constraint(err.to_string()),
            other => AdminError::Repo(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminArticleInput {
    pub category_id: i64,
    pub title: String,
    pub introduction: String,
    pub text: String,
    /// Admin edits may set the publication time explicitly; `None` keeps
    /// the stored value (or defaults it on create).
    pub pub_date: Option<OffsetDateTime>,
}

#[derive(Clone)]
pub struct AdminTableService {
    categories: Arc<dyn CategoriesRepo>,
    articles: Arc<dyn ArticlesRepo>,
}

impl AdminTableService {
    pub fn new(categories: Arc<dyn CategoriesRepo>, articles: Arc<dyn ArticlesRepo>) -> Self {
        Self {
            categories,
            articles,
        }
    }

    pub async fn table_counts(&self) -> Result<TableCounts, AdminError> {
        Ok(TableCounts {
            categories: self.categories.count_categories().await?,
            articles: self.articles.count_articles().await?,
        })
    }

    /// Rows for the category table, cells ordered per [`CATEGORY_TABLE`].
    pub async fn category_rows(&self) -> Result<Vec<TableRow>, AdminError> {
        let categories = self.categories.list_all().await?;
        let mut rows = Vec::with_capacity(categories.len());
        for category in categories {
            let article_count = self.categories.count_articles_in(category.id).await?;
            rows.push(TableRow {
                id: category.id,
                cells: vec![
                    category.id.to_string(),
                    category.name,
                    article_count.to_string(),
                ],
            });
        }
        Ok(rows)
    }

    pub async fn find_category(&self, id: i64) -> Result<CategoryRecord, AdminError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or(AdminError::NotFound)
    }

    pub async fn create_category(&self, name: String) -> Result<CategoryRecord, AdminError> {
        Ok(self
            .categories
            .create_category(CreateCategoryParams { name })
            .await?)
    }

    pub async fn update_category(
        &self,
        id: i64,
        name: String,
    ) -> Result<CategoryRecord, AdminError> {
        Ok(self
            .categories
            .update_category(UpdateCategoryParams { id, name })
            .await?)
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), AdminError> {
        self.categories.delete_category(id).await?;
        Ok(())
    }

    /// Rows for the article table, cells ordered per [`ARTICLE_TABLE`].
    pub async fn article_rows(&self) -> Result<Vec<TableRow>, AdminError> {
        let articles = self.articles.list_detailed().await?;
        Ok(articles
            .into_iter()
            .map(|article| TableRow {
                id: article.id,
                cells: vec![
                    article.id.to_string(),
                    article.category_name,
                    article.title,
                    article.introduction,
                    format_iso_date(article.pub_date),
                ],
            })
            .collect())
    }

    pub async fn find_article(&self, id: i64) -> Result<ArticleRecord, AdminError> {
        self.articles
            .find_by_id(id)
            .await?
            .ok_or(AdminError::NotFound)
    }

    pub async fn category_choices(&self) -> Result<Vec<CategoryRecord>, AdminError> {
        Ok(self.categories.list_all().await?)
    }

    pub async fn create_article(
        &self,
        input: AdminArticleInput,
    ) -> Result<ArticleRecord, AdminError> {
        let AdminArticleInput {
            category_id,
            title,
            introduction,
            text,
            pub_date,
        } = input;

        Ok(self
            .articles
            .create_article(CreateArticleParams {
                category_id,
                title,
                introduction,
                text,
                pub_date,
            })
            .await?)
    }

    pub async fn update_article(
        &self,
        id: i64,
        input: AdminArticleInput,
    ) -> Result<ArticleRecord, AdminError> {
        if self.articles.find_by_id(id).await?.is_none() {
            return Err(AdminError::NotFound);
        }

        let AdminArticleInput {
            category_id,
            title,
            introduction,
            text,
            pub_date,
        } = input;

        Ok(self
            .articles
            .update_article(UpdateArticleParams {
                id,
                category_id,
                title,
                introduction,
                text,
                pub_date,
            })
            .await?)
    }

    pub async fn delete_article(&self, id: i64) -> Result<(), AdminError> {
        self.articles.delete_article(id).await?;
        Ok(())
    }
}
