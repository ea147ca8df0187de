//! The data-access seam handlers talk to. `PgStore` is the production
//! implementation; tests run against [`memory::MemoryStore`].

use crate::{
    categories::repo::CategoryRepo, logs::repo::LogRepo, transactions::repo::TransactionRepo,
    users::repo::UserRepo,
};

#[cfg(test)]
pub mod memory;

pub trait Store: UserRepo + CategoryRepo + TransactionRepo + LogRepo {}

impl<T> Store for T where T: UserRepo + CategoryRepo + TransactionRepo + LogRepo {}
