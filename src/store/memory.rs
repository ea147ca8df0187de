use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    categories::{
        repo::CategoryRepo,
        repo_types::{Category, CategoryChanges, NewCategory},
    },
    logs::{
        repo::LogRepo,
        repo_types::{LogEntry, LogFilter, NewLogEntry},
    },
    transactions::{
        repo::TransactionRepo,
        repo_types::{NewTransaction, Transaction, TransactionFilter},
    },
    users::{
        repo::UserRepo,
        repo_types::{NewUser, ProfileChanges, Role, User},
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    logs: Vec<LogEntry>,
}

/// In-process store with the same ownership and cascade rules as `PgStore`.
/// A single lock makes every operation atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        let mut guard = self.tables.lock().expect("memory store lock poisoned");
        f(&mut guard)
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create_user(&self, new: NewUser) -> anyhow::Result<User> {
        self.with(|t| {
            if t.users.iter().any(|u| u.email == new.email) {
                anyhow::bail!("duplicate key value violates unique constraint \"users_email_key\"");
            }
            let now = OffsetDateTime::now_utc();
            let user = User {
                id: Uuid::new_v4(),
                email: new.email,
                name: new.name,
                password_hash: new.password_hash,
                role: Role::User,
                monthly_goal: 0.0,
                created_at: now,
                updated_at: now,
            };
            t.users.push(user.clone());
            Ok(user)
        })
    }

    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.with(|t| t.users.iter().find(|u| u.id == id).cloned()))
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.with(|t| t.users.iter().find(|u| u.email == email).cloned()))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> anyhow::Result<Option<User>> {
        Ok(self.with(|t| {
            let user = t.users.iter_mut().find(|u| u.id == id)?;
            if let Some(name) = changes.name {
                user.name = name;
            }
            if let Some(goal) = changes.monthly_goal {
                user.monthly_goal = goal;
            }
            user.updated_at = OffsetDateTime::now_utc();
            Some(user.clone())
        }))
    }

    async fn set_role_by_email(&self, email: &str, role: Role) -> anyhow::Result<Option<User>> {
        Ok(self.with(|t| {
            let user = t.users.iter_mut().find(|u| u.email == email)?;
            user.role = role;
            user.updated_at = OffsetDateTime::now_utc();
            Some(user.clone())
        }))
    }
}

#[async_trait]
impl CategoryRepo for MemoryStore {
    async fn list_categories(&self, user_id: Uuid) -> anyhow::Result<Vec<Category>> {
        Ok(self.with(|t| {
            let mut rows: Vec<Category> = t
                .categories
                .iter()
                .filter(|c| c.user_id == user_id)
                .cloned()
                .collect();
            rows.sort_by_key(|c| c.name.to_lowercase());
            rows
        }))
    }

    async fn find_category(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Category>> {
        Ok(self.with(|t| {
            t.categories
                .iter()
                .find(|c| c.id == id && c.user_id == user_id)
                .cloned()
        }))
    }

    async fn find_category_by_name(
        &self,
        user_id: Uuid,
        name: &str,
    ) -> anyhow::Result<Option<Category>> {
        let name = name.to_lowercase();
        Ok(self.with(|t| {
            t.categories
                .iter()
                .find(|c| c.user_id == user_id && c.name.to_lowercase() == name)
                .cloned()
        }))
    }

    async fn create_category(&self, user_id: Uuid, new: NewCategory) -> anyhow::Result<Category> {
        Ok(self.with(|t| {
            let category = Category {
                id: Uuid::new_v4(),
                user_id,
                name: new.name,
                color: new.color,
                created_at: OffsetDateTime::now_utc(),
            };
            t.categories.push(category.clone());
            category
        }))
    }

    async fn update_category(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: CategoryChanges,
    ) -> anyhow::Result<Option<Category>> {
        Ok(self.with(|t| {
            let category = t
                .categories
                .iter_mut()
                .find(|c| c.id == id && c.user_id == user_id)?;
            if let Some(name) = changes.name {
                category.name = name;
            }
            if let Some(color) = changes.color {
                category.color = color;
            }
            Some(category.clone())
        }))
    }

    async fn delete_category(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<u64>> {
        Ok(self.with(|t| {
            let pos = t
                .categories
                .iter()
                .position(|c| c.id == id && c.user_id == user_id)?;
            t.categories.remove(pos);
            let before = t.transactions.len();
            t.transactions
                .retain(|tx| !(tx.category_id == id && tx.user_id == user_id));
            Some((before - t.transactions.len()) as u64)
        }))
    }
}

#[async_trait]
impl TransactionRepo for MemoryStore {
    async fn list_transactions(
        &self,
        user_id: Uuid,
        filter: &TransactionFilter,
    ) -> anyhow::Result<Vec<Transaction>> {
        Ok(self.with(|t| {
            let mut rows: Vec<Transaction> = t
                .transactions
                .iter()
                .filter(|tx| tx.user_id == user_id && filter.matches(tx))
                .cloned()
                .collect();
            rows.sort_by(|a, b| {
                b.date
                    .cmp(&a.date)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            });
            let offset = filter.offset.max(0) as usize;
            let limit = filter.limit.map_or(usize::MAX, |l| l.max(0) as usize);
            rows.into_iter().skip(offset).take(limit).collect()
        }))
    }

    async fn find_transaction(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<Transaction>> {
        Ok(self.with(|t| {
            t.transactions
                .iter()
                .find(|tx| tx.id == id && tx.user_id == user_id)
                .cloned()
        }))
    }

    async fn create_transaction(
        &self,
        user_id: Uuid,
        new: NewTransaction,
    ) -> anyhow::Result<Transaction> {
        self.with(|t| {
            if !t
                .categories
                .iter()
                .any(|c| c.id == new.category_id && c.user_id == user_id)
            {
                anyhow::bail!("foreign key violation on transactions.category_id");
            }
            let now = OffsetDateTime::now_utc();
            let tx = Transaction {
                id: Uuid::new_v4(),
                user_id,
                category_id: new.category_id,
                amount: new.amount,
                kind: new.kind,
                description: new.description,
                date: new.date,
                created_at: now,
                updated_at: now,
            };
            t.transactions.push(tx.clone());
            Ok(tx)
        })
    }

    async fn replace_transaction(
        &self,
        user_id: Uuid,
        id: Uuid,
        fields: NewTransaction,
    ) -> anyhow::Result<Option<Transaction>> {
        Ok(self.with(|t| {
            let tx = t
                .transactions
                .iter_mut()
                .find(|tx| tx.id == id && tx.user_id == user_id)?;
            tx.category_id = fields.category_id;
            tx.amount = fields.amount;
            tx.kind = fields.kind;
            tx.description = fields.description;
            tx.date = fields.date;
            tx.updated_at = OffsetDateTime::now_utc();
            Some(tx.clone())
        }))
    }

    async fn delete_transaction(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.with(|t| {
            let before = t.transactions.len();
            t.transactions
                .retain(|tx| !(tx.id == id && tx.user_id == user_id));
            t.transactions.len() < before
        }))
    }
}

#[async_trait]
impl LogRepo for MemoryStore {
    async fn append_log(&self, user_id: Uuid, entry: NewLogEntry) -> anyhow::Result<LogEntry> {
        Ok(self.with(|t| {
            let log = LogEntry {
                id: Uuid::new_v4(),
                user_id,
                level: entry.level,
                message: entry.message,
                context: entry.context,
                created_at: OffsetDateTime::now_utc(),
            };
            t.logs.push(log.clone());
            log
        }))
    }

    async fn list_logs(&self, filter: &LogFilter) -> anyhow::Result<Vec<LogEntry>> {
        Ok(self.with(|t| {
            t.logs
                .iter()
                .rev()
                .filter(|l| filter.user_id.map_or(true, |u| l.user_id == u))
                .filter(|l| filter.level.map_or(true, |lvl| l.level == lvl))
                .skip(filter.offset.max(0) as usize)
                .take(filter.limit.max(0) as usize)
                .cloned()
                .collect()
        }))
    }
}
