use async_trait::async_trait;
use sqlx::query_as;
use time::OffsetDateTime;

use crate::application::repos::{
    ArticleDetailRecord, ArticlesRepo, CreateArticleParams, RepoError, UpdateArticleParams,
};
use crate::domain::entities::ArticleRecord;

use super::SqliteRepositories;
use super::util::{convert_count, map_sqlx_error};

const ARTICLE_COLUMNS: &str = "id, category_id, title, introduction, text, pub_date";

#[derive(sqlx::FromRow)]
struct ArticleRow {
    id: i64,
    category_id: i64,
    title: String,
    introduction: String,
    text: String,
    pub_date: OffsetDateTime,
}

impl From<ArticleRow> for ArticleRecord {
    fn from(row: ArticleRow) -> Self {
        Self {
            id: row.id,
            category_id: row.category_id,
            title: row.title,
            introduction: row.introduction,
            text: row.text,
            pub_date: row.pub_date,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ArticleDetailRow {
    id: i64,
    category_id: i64,
    category_name: String,
    title: String,
    introduction: String,
    text: String,
    pub_date: OffsetDateTime,
}

impl From<ArticleDetailRow> for ArticleDetailRecord {
    fn from(row: ArticleDetailRow) -> Self {
        Self {
            id: row.id,
            category_id: row.category_id,
            category_name: row.category_name,
            title: row.title,
            introduction: row.introduction,
            text: row.text,
            pub_date: row.pub_date,
        }
    }
}

#[async_trait]
impl ArticlesRepo for SqliteRepositories {
    async fn create_article(
        &self,
        params: CreateArticleParams,
    ) -> Result<ArticleRecord, RepoError> {
        let CreateArticleParams {
            category_id,
            title,
            introduction,
            text,
            pub_date,
        } = params;

        let pub_date = pub_date.unwrap_or_else(OffsetDateTime::now_utc);

        let row = query_as::<_, ArticleRow>(&format!(
            r#"
            INSERT INTO articles (category_id, title, introduction, text, pub_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING {ARTICLE_COLUMNS}
            "#
        ))
        .bind(category_id)
        .bind(title)
        .bind(introduction)
        .bind(text)
        .bind(pub_date)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(ArticleRecord::from(row))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ArticleRecord>, RepoError> {
        let row = query_as::<_, ArticleRow>(&format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM articles
            WHERE id = ?1
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ArticleRecord::from))
    }

    async fn find_detailed(&self, id: i64) -> Result<Option<ArticleDetailRecord>, RepoError> {
        let row = query_as::<_, ArticleDetailRow>(
            r#"
            SELECT a.id, a.category_id, c.name AS category_name,
                   a.title, a.introduction, a.text, a.pub_date
            FROM articles a
            INNER JOIN categories c ON c.id = a.category_id
            WHERE a.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ArticleDetailRecord::from))
    }

    async fn list_latest(&self, limit: u32) -> Result<Vec<ArticleRecord>, RepoError> {
        let rows = query_as::<_, ArticleRow>(&format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM articles
            ORDER BY pub_date DESC, id DESC
            LIMIT ?1
            "#
        ))
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ArticleRecord::from).collect())
    }

    async fn list_by_category(&self, category_id: i64) -> Result<Vec<ArticleRecord>, RepoError> {
        let rows = query_as::<_, ArticleRow>(&format!(
            r#"
            SELECT {ARTICLE_COLUMNS}
            FROM articles
            WHERE category_id = ?1
            ORDER BY pub_date DESC, id DESC
            "#
        ))
        .bind(category_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ArticleRecord::from).collect())
    }

    async fn list_detailed(&self) -> Result<Vec<ArticleDetailRecord>, RepoError> {
        let rows = query_as::<_, ArticleDetailRow>(
            r#"
            SELECT a.id, a.category_id, c.name AS category_name,
                   a.title, a.introduction, a.text, a.pub_date
            FROM articles a
            INNER JOIN categories c ON c.id = a.category_id
            ORDER BY a.pub_date DESC, a.id DESC
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ArticleDetailRecord::from).collect())
    }

    async fn update_article(
        &self,
        params: UpdateArticleParams,
    ) -> Result<ArticleRecord, RepoError> {
        let UpdateArticleParams {
            id,
            category_id,
            title,
            introduction,
            text,
            pub_date,
        } = params;

        // COALESCE keeps the stored publication time when no override
        // is supplied.
        let row = query_as::<_, ArticleRow>(&format!(
            r#"
            UPDATE articles
            SET category_id = ?2,
                title = ?3,
                introduction = ?4,
                text = ?5,
                pub_date = COALESCE(?6, pub_date)
            WHERE id = ?1
            RETURNING {ARTICLE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(category_id)
        .bind(title)
        .bind(introduction)
        .bind(text)
        .bind(pub_date)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(ArticleRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_article(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM articles
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn count_articles(&self) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        convert_count(count)
    }
}
