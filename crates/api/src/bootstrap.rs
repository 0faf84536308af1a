//! Startup tasks run by the binary before it accepts traffic.

use compliance_core::error::CoreError;
use compliance_db::models::user::{CreateUser, User};
use compliance_db::repositories::UserRepo;
use compliance_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::handlers::users::normalize_email;

/// Display name given to a seeded admin.
pub const BOOTSTRAP_ADMIN_NAME: &str = "System Administrator";

/// Create the first admin account unless a user with `email` already exists.
///
/// Returns the new user, or `None` when nothing was created. Safe to run on
/// every start.
pub async fn seed_admin(pool: &DbPool, email: &str, password: &str) -> AppResult<Option<User>> {
    let email = normalize_email(email);
    if UserRepo::find_by_email(pool, &email).await?.is_some() {
        return Ok(None);
    }

    validate_password_strength(password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email,
            password_hash,
            full_name: BOOTSTRAP_ADMIN_NAME.to_string(),
            is_admin: true,
            client_id: None,
        },
    )
    .await?;

    Ok(Some(user))
}
