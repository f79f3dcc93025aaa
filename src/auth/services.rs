use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use super::dto::{PublicUser, Session};
use super::jwt::JwtKeys;
use super::password::{hash_password_blocking, verify_dummy_blocking, verify_password_blocking};
use crate::error::AppError;
use crate::store::CredentialStore;

pub const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validate_email(email: &str) -> Result<(), AppError> {
    if !is_valid_email(email) {
        return Err(AppError::validation("email", "must be a valid email address"));
    }
    Ok(())
}

fn issue_session(keys: &JwtKeys, id: i64, email: String) -> Result<Session, AppError> {
    let token = keys.issue(id, &email).map_err(anyhow::Error::new)?;
    Ok(Session {
        token,
        user: PublicUser { id, email },
    })
}

/// Creates the account and logs it in.
#[instrument(skip(store, keys, password))]
pub async fn register(
    store: &dyn CredentialStore,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> Result<Session, AppError> {
    let email = email.trim();
    validate_email(email)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::validation(
            "password",
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }

    if store.exists_by_email(email).await? {
        warn!("email already registered");
        return Err(AppError::Conflict);
    }

    let hash = hash_password_blocking(password.to_string()).await?;
    // A concurrent register for the same email surfaces here as Conflict.
    let user = store.insert_user(email, &hash).await?;

    info!(user_id = user.id, "user registered");
    issue_session(keys, user.id, user.email)
}

/// Unknown email and wrong password produce the same error.
#[instrument(skip(store, keys, password))]
pub async fn login(
    store: &dyn CredentialStore,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> Result<Session, AppError> {
    let email = email.trim();
    validate_email(email)?;

    let Some(user) = store.find_user_by_email(email).await? else {
        verify_dummy_blocking(password.to_string()).await;
        warn!("login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    let ok = verify_password_blocking(password.to_string(), user.password_hash.clone()).await?;
    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = user.id, "user logged in");
    issue_session(keys, user.id, user.email)
}
