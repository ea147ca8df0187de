//! Maintenance operations run from the command line, outside the server.

use anyhow::Context;
use tracing::info;

use crate::{
    auth::services::normalize_email,
    store::Store,
    users::{
        repo::UserRepo,
        repo_types::{Role, User},
    },
};

/// Grants the admin role to the user with `email`. Running it twice is a no-op.
pub async fn assign_admin(store: &dyn Store, email: &str) -> anyhow::Result<User> {
    let email = normalize_email(email)?;
    let user = store
        .set_role_by_email(&email, Role::Admin)
        .await?
        .with_context(|| format!("no user registered with email {email}"))?;
    info!(user_id = %user.id, %email, "admin role assigned");
    Ok(user)
}
