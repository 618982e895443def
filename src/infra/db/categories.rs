use async_trait::async_trait;
use sqlx::query_as;

use crate::application::repos::{
    CategoriesRepo, CreateCategoryParams, RepoError, UpdateCategoryParams,
};
use crate::domain::entities::CategoryRecord;

use super::SqliteRepositories;
use super::util::{convert_count, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
}

impl From<CategoryRow> for CategoryRecord {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

#[async_trait]
impl CategoriesRepo for SqliteRepositories {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let row = query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (name)
            VALUES (?1)
            RETURNING id, name
            "#,
        )
        .bind(params.name)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(CategoryRecord::from(row))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CategoryRecord>, RepoError> {
        let row = query_as::<_, CategoryRow>(
            r#"
            SELECT id, name
            FROM categories
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(CategoryRecord::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<CategoryRecord>, RepoError> {
        let row = query_as::<_, CategoryRow>(
            r#"
            SELECT id, name
            FROM categories
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(CategoryRecord::from))
    }

    async fn list_all(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        let rows = query_as::<_, CategoryRow>(
            r#"
            SELECT id, name
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CategoryRecord::from).collect())
    }

    async fn update_category(
        &self,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let row = query_as::<_, CategoryRow>(
            r#"
            UPDATE categories
            SET name = ?2
            WHERE id = ?1
            RETURNING id, name
            "#,
        )
        .bind(params.id)
        .bind(params.name)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(CategoryRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_category(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM categories
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

    async fn count_categories(&self) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        convert_count(count)
    }

    async fn count_articles_in(&self, id: i64) -> Result<u64, RepoError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE category_id = ?1")
                .bind(id)
                .fetch_one(self.pool())
                .await
                .map_err(map_sqlx_error)?;

        convert_count(count)
    }
}
