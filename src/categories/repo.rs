use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{Category, CategoryChanges, NewCategory};
use crate::db::PgStore;

#[async_trait]
pub trait CategoryRepo: Send + Sync {
    /// All categories owned by `user_id`, ordered by name.
    async fn list_categories(&self, user_id: Uuid) -> anyhow::Result<Vec<Category>>;

    async fn find_category(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Category>>;

    async fn find_category_by_name(
        &self,
        user_id: Uuid,
        name: &str,
    ) -> anyhow::Result<Option<Category>>;

    async fn create_category(&self, user_id: Uuid, new: NewCategory) -> anyhow::Result<Category>;

    async fn update_category(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: CategoryChanges,
    ) -> anyhow::Result<Option<Category>>;

    /// Deletes the category together with its transactions.
    /// Returns the number of transactions removed, or `None` if the caller
    /// owns no such category.
    async fn delete_category(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<u64>>;
}

#[async_trait]
impl CategoryRepo for PgStore {
    async fn list_categories(&self, user_id: Uuid) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, color, created_at
              FROM categories
             WHERE user_id = $1
             ORDER BY lower(name) ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_category(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, color, created_at
              FROM categories
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_category_by_name(
        &self,
        user_id: Uuid,
        name: &str,
    ) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, color, created_at
              FROM categories
             WHERE user_id = $1 AND lower(name) = lower($2)
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_category(&self, user_id: Uuid, new: NewCategory) -> anyhow::Result<Category> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, user_id, name, color)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, color, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&new.name)
        .bind(&new.color)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_category(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: CategoryChanges,
    ) -> anyhow::Result<Option<Category>> {
        let (set_color, color) = match changes.color {
            Some(c) => (true, c),
            None => (false, None),
        };
        let row = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
               SET name = COALESCE($3, name),
                   color = CASE WHEN $4 THEN $5 ELSE color END
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, color, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(changes.name)
        .bind(set_color)
        .bind(color)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_category(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<u64>> {
        let mut tx = self.pool.begin().await.context("begin tx")?;

        // Lock the category row first so concurrent deletes serialize on it.
        let owned = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM categories WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .context("lock category")?;
        if owned.is_none() {
            tx.rollback().await.context("rollback tx")?;
            return Ok(None);
        }

        let removed = sqlx::query("DELETE FROM transactions WHERE category_id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .context("delete category transactions")?
            .rows_affected();

        sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .context("delete category")?;

        tx.commit().await.context("commit tx")?;
        Ok(Some(removed))
    }
}
