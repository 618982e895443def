//! Read paths for the public site: home feed, category listings, and
//! the article detail page.

use std::sync::Arc;

use thiserror::Error;

use crate::application::repos::{ArticlesRepo, CategoriesRepo, RepoError};
use crate::domain::articles::{body_paragraphs, format_human_date, format_iso_date};
use crate::domain::entities::ArticleRecord;
use crate::presentation::views::{
    ArticleCard, ArticleDetailContext, HomeContext, ListingContext,
};

/// The home page shows the newest articles only.
const HOME_PAGE_LIMIT: u32 = 3;

#[derive(Debug, Error)]
pub enum FeedError {
    /// The fixed listing category was never created. There is no
    /// recovery path; the caller surfaces an internal error.
    #[error("category `{0}` does not exist")]
    MissingCategory(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct FeedService {
    articles: Arc<dyn ArticlesRepo>,
    categories: Arc<dyn CategoriesRepo>,
}

impl FeedService {
    pub fn new(articles: Arc<dyn ArticlesRepo>, categories: Arc<dyn CategoriesRepo>) -> Self {
        Self {
            articles,
            categories,
        }
    }

    pub async fn home_context(&self) -> Result<HomeContext, FeedError> {
        let latest = self.articles.list_latest(HOME_PAGE_LIMIT).await?;
        Ok(HomeContext {
            articles: latest.iter().map(article_card).collect(),
        })
    }

    /// Listing for a fixed category name. The category is expected to be
    /// provisioned ahead of time; its absence is fatal for the route.
    pub async fn listing_context(&self, category_name: &str) -> Result<ListingContext, FeedError> {
        let category = self
            .categories
            .find_by_name(category_name)
            .await?
            .ok_or_else(|| FeedError::MissingCategory(category_name.to_string()))?;

        let articles = self.articles.list_by_category(category.id).await?;
        Ok(ListingContext {
            heading: category.name,
            articles: articles.iter().map(article_card).collect(),
        })
    }

    pub async fn article_detail(
        &self,
        id: i64,
    ) -> Result<Option<ArticleDetailContext>, FeedError> {
        let Some(detail) = self.articles.find_detailed(id).await? else {
            return Ok(None);
        };

        Ok(Some(ArticleDetailContext {
            id: detail.id,
            title: detail.title,
            category: detail.category_name,
            introduction: detail.introduction,
            published: format_human_date(detail.pub_date),
            iso_date: format_iso_date(detail.pub_date),
            paragraphs: body_paragraphs(&detail.text),
        }))
    }
}

fn article_card(article: &ArticleRecord) -> ArticleCard {
    ArticleCard {
        id: article.id,
        title: article.title.clone(),
        introduction: article.introduction.clone(),
        published: format_human_date(article.pub_date),
        iso_date: format_iso_date(article.pub_date),
    }
}
