// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Roles (create, list, lookup by name)
//! - Users (role-joined profiles, credentials, updates, deletion)
//! - Clockings (per-user event ledger, transactional append)

use crate::db::tables;
use crate::models::{
    Clocking, ClockingId, ClockingType, NewUser, Profile, ProfileUpdate, Role, RoleId, UserId,
};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use std::time::Duration;

const MAX_CONNECTIONS: u32 = 8;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// Primary result codes (low byte of the extended code) for lock contention.
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Errors at the store boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record already exists")]
    Duplicate,

    #[error("Referenced record does not exist")]
    ForeignKey,

    #[error("Concurrent write conflict: {0}")]
    Conflict(String),

    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Duplicate;
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKey;
            }
            if db_err.code().is_some_and(|code| is_contention_code(&code)) {
                return StoreError::Conflict(db_err.message().to_string());
            }
        }
        StoreError::Database(err.to_string())
    }
}

fn is_contention_code(code: &str) -> bool {
    code.parse::<i32>()
        .map(|c| matches!(c & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
        .unwrap_or(false)
}

/// Stored credentials for one user, joined with the role name.
///
/// This is the only type that carries the password hash.
#[derive(sqlx::FromRow)]
pub struct CredentialRecord {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role_name: String,
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("role_name", &self.role_name)
            .finish_non_exhaustive()
    }
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    role_id: i64,
    name: String,
    created_at: String,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Role {
            id: RoleId(row.role_id),
            name: row.name,
            created_at: row.created_at,
        }
    }
}

/// User joined with its role. The password column is never selected.
#[derive(sqlx::FromRow)]
struct ProfileRow {
    user_id: i64,
    first_name: String,
    last_name: String,
    email: String,
    profile_image: String,
    created_at: String,
    role_id: i64,
    role_name: String,
    role_created_at: String,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: UserId(row.user_id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            profile_image: row.profile_image,
            created_at: row.created_at,
            role: Role {
                id: RoleId(row.role_id),
                name: row.role_name,
                created_at: row.role_created_at,
            },
        }
    }
}

#[derive(sqlx::FromRow)]
struct ClockingRow {
    clocking_id: i64,
    #[sqlx(rename = "type")]
    kind: String,
    register: DateTime<Utc>,
    seq: i64,
    user_id_fk: i64,
}

impl TryFrom<ClockingRow> for Clocking {
    type Error = StoreError;

    fn try_from(row: ClockingRow) -> Result<Self, Self::Error> {
        let kind = ClockingType::from_str(&row.kind).map_err(StoreError::Corrupt)?;
        Ok(Clocking {
            id: ClockingId(row.clocking_id),
            kind,
            registered_at: row.register,
            user_id: UserId(row.user_id_fk),
            seq: row.seq,
        })
    }
}

const PROFILE_SELECT: &str = "SELECT u.user_id, u.first_name, u.last_name, u.email, \
     u.profile_image, u.created_at, r.role_id, r.name AS role_name, \
     r.created_at AS role_created_at \
     FROM users u JOIN roles r ON u.role_id_fk = r.role_id";

const CLOCKING_COLUMNS: &str = "clocking_id, type, register, seq, user_id_fk";

/// SQLite database client.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Connect to a SQLite database, creating the file if needed.
    ///
    /// Accepts any `sqlite:` URL, e.g. `sqlite://employees.db`.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        tracing::info!(url, "Connected to SQLite");

        Ok(Self { pool })
    }

    /// Create a private in-memory database with the schema applied.
    ///
    /// The pool is pinned to a single connection that never expires: every
    /// SQLite connection to `:memory:` opens its own empty database.
    pub async fn new_in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Create tables if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in tables::SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::debug!("Schema ready");
        Ok(())
    }

    /// Close all pooled connections. Later queries fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    // ─── Role Operations ─────────────────────────────────────────

    /// Insert a role. The caller normalizes the name.
    pub async fn create_role(&self, name: &str, created_at: &str) -> Result<Role, StoreError> {
        let result = sqlx::query("INSERT INTO roles (name, created_at) VALUES (?, ?)")
            .bind(name)
            .bind(created_at)
            .execute(&self.pool)
            .await?;

        Ok(Role {
            id: RoleId(result.last_insert_rowid()),
            name: name.to_string(),
            created_at: created_at.to_string(),
        })
    }

    /// All roles, oldest first.
    pub async fn list_roles(&self) -> Result<Vec<Role>, StoreError> {
        let rows: Vec<RoleRow> =
            sqlx::query_as("SELECT role_id, name, created_at FROM roles ORDER BY role_id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Role::from).collect())
    }

    pub async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>, StoreError> {
        let row: Option<RoleRow> =
            sqlx::query_as("SELECT role_id, name, created_at FROM roles WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Role::from))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Insert a user with an already-hashed password.
    ///
    /// The plaintext `user.password` is never written.
    pub async fn insert_user(
        &self,
        user: &NewUser,
        password_hash: &str,
        created_at: &str,
    ) -> Result<UserId, StoreError> {
        let result = sqlx::query(
            "INSERT INTO users \
             (first_name, last_name, email, password_hash, profile_image, created_at, role_id_fk) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(password_hash)
        .bind(&user.profile_image)
        .bind(created_at)
        .bind(user.role_id.get())
        .execute(&self.pool)
        .await?;

        Ok(UserId(result.last_insert_rowid()))
    }

    /// Role-joined profile for one user.
    pub async fn get_profile(&self, user_id: UserId) -> Result<Option<Profile>, StoreError> {
        let query = format!("{} WHERE u.user_id = ?", PROFILE_SELECT);
        let row: Option<ProfileRow> = sqlx::query_as(&query)
            .bind(user_id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Profile::from))
    }

    /// Role-joined profiles for all users, oldest first.
    pub async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let query = format!("{} ORDER BY u.user_id", PROFILE_SELECT);
        let rows: Vec<ProfileRow> = sqlx::query_as(&query).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }

    pub async fn find_user_id_by_email(&self, email: &str) -> Result<Option<UserId>, StoreError> {
        let id: Option<i64> = sqlx::query_scalar("SELECT user_id FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id.map(UserId))
    }

    /// Credentials and role name for a login identifier.
    pub async fn get_credentials(
        &self,
        email: &str,
    ) -> Result<Option<CredentialRecord>, StoreError> {
        let record = sqlx::query_as::<_, CredentialRecord>(
            "SELECT u.user_id, u.first_name, u.last_name, u.email, u.password_hash, \
             r.name AS role_name \
             FROM users u JOIN roles r ON u.role_id_fk = r.role_id \
             WHERE u.email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// Update first name, last name and email. Returns rows affected.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE users SET first_name = ?, last_name = ?, email = ? WHERE user_id = ?",
        )
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.email)
        .bind(user_id.get())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete a user and (by cascade) its clockings. Returns rows affected.
    pub async fn delete_user(&self, user_id: UserId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = ?")
            .bind(user_id.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // ─── Clocking Operations ─────────────────────────────────────

    /// All clockings of one user in the order they were recorded.
    pub async fn list_clockings(&self, user_id: UserId) -> Result<Vec<Clocking>, StoreError> {
        let query = format!(
            "SELECT {} FROM clockings WHERE user_id_fk = ? ORDER BY seq ASC",
            CLOCKING_COLUMNS
        );
        let rows: Vec<ClockingRow> = sqlx::query_as(&query)
            .bind(user_id.get())
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Clocking::try_from).collect()
    }

    /// Begin a transaction for a read-last/append pair.
    ///
    /// Dropping the returned handle without calling
    /// [`ClockingTx::commit`] rolls the transaction back.
    pub async fn begin_clocking(&self) -> Result<ClockingTx, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(ClockingTx { tx })
    }
}

/// A store transaction scoped to clocking writes.
pub struct ClockingTx {
    tx: Transaction<'static, Sqlite>,
}

impl ClockingTx {
    /// The user's most recent clocking, if any.
    pub async fn last_clocking(&mut self, user_id: UserId) -> Result<Option<Clocking>, StoreError> {
        let query = format!(
            "SELECT {} FROM clockings WHERE user_id_fk = ? ORDER BY seq DESC LIMIT 1",
            CLOCKING_COLUMNS
        );
        let row: Option<ClockingRow> = sqlx::query_as(&query)
            .bind(user_id.get())
            .fetch_optional(&mut *self.tx)
            .await?;
        row.map(Clocking::try_from).transpose()
    }

    /// Append a clocking at position `seq` of the user's sequence.
    ///
    /// `(user, seq)` is unique; a writer that lost a race for the same
    /// position gets [`StoreError::Duplicate`] or [`StoreError::Conflict`].
    pub async fn insert_clocking(
        &mut self,
        user_id: UserId,
        kind: ClockingType,
        registered_at: DateTime<Utc>,
        seq: i64,
    ) -> Result<Clocking, StoreError> {
        let result = sqlx::query(
            "INSERT INTO clockings (type, register, seq, user_id_fk) VALUES (?, ?, ?, ?)",
        )
        .bind(kind.as_str())
        .bind(registered_at)
        .bind(seq)
        .bind(user_id.get())
        .execute(&mut *self.tx)
        .await?;

        Ok(Clocking {
            id: ClockingId(result.last_insert_rowid()),
            kind,
            registered_at,
            user_id,
            seq,
        })
    }

    pub async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}
