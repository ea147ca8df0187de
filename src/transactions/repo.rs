use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{NewTransaction, Transaction, TransactionFilter, TransactionRow};
use crate::db::PgStore;

const TRANSACTION_COLUMNS: &str =
    "id, user_id, category_id, amount, kind, description, date, created_at, updated_at";

#[async_trait]
pub trait TransactionRepo: Send + Sync {
    /// Newest date first, ties broken by creation time.
    async fn list_transactions(
        &self,
        user_id: Uuid,
        filter: &TransactionFilter,
    ) -> anyhow::Result<Vec<Transaction>>;

    async fn find_transaction(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<Transaction>>;

    async fn create_transaction(
        &self,
        user_id: Uuid,
        new: NewTransaction,
    ) -> anyhow::Result<Transaction>;

    /// Overwrites every editable field. Returns `None` if the caller owns no
    /// such transaction.
    async fn replace_transaction(
        &self,
        user_id: Uuid,
        id: Uuid,
        fields: NewTransaction,
    ) -> anyhow::Result<Option<Transaction>>;

    async fn delete_transaction(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

#[async_trait]
impl TransactionRepo for PgStore {
    async fn list_transactions(
        &self,
        user_id: Uuid,
        filter: &TransactionFilter,
    ) -> anyhow::Result<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
              FROM transactions
             WHERE user_id = $1
               AND ($2::date IS NULL OR date >= $2)
               AND ($3::date IS NULL OR date <= $3)
               AND ($4::uuid IS NULL OR category_id = $4)
               AND ($5::text IS NULL OR kind = $5)
             ORDER BY date DESC, created_at DESC
             LIMIT $6 OFFSET $7
            "#
        ))
        .bind(user_id)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.category_id)
        .bind(filter.kind.map(|k| k.as_str()))
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Transaction::try_from).collect()
    }

    async fn find_transaction(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Transaction::try_from).transpose()
    }

    async fn create_transaction(
        &self,
        user_id: Uuid,
        new: NewTransaction,
    ) -> anyhow::Result<Transaction> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            INSERT INTO transactions (id, user_id, category_id, amount, kind, description, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(new.category_id)
        .bind(new.amount)
        .bind(new.kind.as_str())
        .bind(&new.description)
        .bind(new.date)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn replace_transaction(
        &self,
        user_id: Uuid,
        id: Uuid,
        fields: NewTransaction,
    ) -> anyhow::Result<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            UPDATE transactions
               SET category_id = $3,
                   amount = $4,
                   kind = $5,
                   description = $6,
                   date = $7,
                   updated_at = now()
             WHERE id = $1 AND user_id = $2
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(fields.category_id)
        .bind(fields.amount)
        .bind(fields.kind.as_str())
        .bind(&fields.description)
        .bind(fields.date)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Transaction::try_from).transpose()
    }

    async fn delete_transaction(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let done = sqlx::query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}
