// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential verification.
//!
//! Unknown identifiers and wrong passwords produce the same error, and both
//! paths run one Argon2 verification, so neither the message nor the timing
//! tells a caller whether an account exists.

use crate::db::{CredentialRecord, Db, StoreError};
use crate::models::{Credentials, Identity, UserId};
use crate::services::password::{self, PasswordError};

/// Errors from [`Authenticator::authenticate`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown identifier or wrong secret. Deliberately indistinguishable.
    #[error("authentication failed")]
    NotFoundOrBadSecret,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Verifies login credentials against stored Argon2 hashes.
#[derive(Clone)]
pub struct Authenticator {
    db: Db,
}

impl Authenticator {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Authenticate a login attempt. Read-only.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        let identifier = credentials.username.trim();

        let Some(record) = self.db.get_credentials(identifier).await? else {
            password::verify_dummy(credentials.password.clone()).await?;
            tracing::info!("Login rejected");
            return Err(AuthError::NotFoundOrBadSecret);
        };

        let matches =
            password::verify(record.password_hash.clone(), credentials.password.clone()).await?;
        if !matches {
            tracing::info!(user_id = record.user_id, "Login rejected");
            return Err(AuthError::NotFoundOrBadSecret);
        }

        tracing::info!(user_id = record.user_id, role = %record.role_name, "Login accepted");
        Ok(identity_from(record))
    }
}

fn identity_from(record: CredentialRecord) -> Identity {
    Identity {
        user_id: UserId(record.user_id),
        display_name: format!("{} {}", record.first_name, record.last_name),
        email: record.email,
        role: record.role_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewUser, RoleId};

    async fn setup() -> (Authenticator, UserId) {
        let db = Db::new_in_memory().await.unwrap();
        let role = db.create_role("ADMIN", "2024-01-01T00:00:00Z").await.unwrap();
        let user = NewUser {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            password: String::new(),
            profile_image: "upload/nopfp.png".to_string(),
            role_id: role.id,
        };
        let hash = password::hash_password("cobol").unwrap();
        let user_id = db
            .insert_user(&user, &hash, "2024-01-01T00:00:00Z")
            .await
            .unwrap();
        (Authenticator::new(db), user_id)
    }

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_correct_credentials_yield_identity() {
        let (auth, user_id) = setup().await;
        let identity = auth
            .authenticate(&creds("grace@example.com", "cobol"))
            .await
            .unwrap();

        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.display_name, "Grace Hopper");
        assert_eq!(identity.email, "grace@example.com");
        assert_eq!(identity.role, "ADMIN");
    }

    #[tokio::test]
    async fn test_wrong_secret_and_unknown_user_are_indistinguishable() {
        let (auth, _) = setup().await;

        let wrong_secret = auth
            .authenticate(&creds("grace@example.com", "fortran"))
            .await
            .unwrap_err();
        let unknown_user = auth
            .authenticate(&creds("nobody@example.com", "cobol"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_secret, AuthError::NotFoundOrBadSecret));
        assert!(matches!(unknown_user, AuthError::NotFoundOrBadSecret));
        assert_eq!(wrong_secret.to_string(), unknown_user.to_string());
        assert_eq!(wrong_secret.to_string(), "authentication failed");
    }

    #[tokio::test]
    async fn test_plaintext_password_column_is_not_accepted() {
        let db = Db::new_in_memory().await.unwrap();
        let role = db.create_role("STAFF", "2024-01-01T00:00:00Z").await.unwrap();
        let user = NewUser {
            first_name: "Legacy".to_string(),
            last_name: "Row".to_string(),
            email: "legacy@example.com".to_string(),
            password: String::new(),
            profile_image: "upload/nopfp.png".to_string(),
            role_id: RoleId(role.id.get()),
        };
        db.insert_user(&user, "plaintext", "2024-01-01T00:00:00Z")
            .await
            .unwrap();

        let auth = Authenticator::new(db);
        let err = auth
            .authenticate(&creds("legacy@example.com", "plaintext"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotFoundOrBadSecret));
    }
}
