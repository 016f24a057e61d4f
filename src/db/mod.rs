//! Database layer (SQLite).

pub mod sqlite;

pub use sqlite::{ClockingTx, CredentialRecord, Db, StoreError};

/// Table definitions, applied in order by [`Db::migrate`].
pub mod tables {
    pub const ROLES: &str = "CREATE TABLE IF NOT EXISTS roles (
        role_id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL
    )";

    pub const USERS: &str = "CREATE TABLE IF NOT EXISTS users (
        user_id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        profile_image TEXT NOT NULL,
        created_at TEXT NOT NULL,
        role_id_fk INTEGER NOT NULL REFERENCES roles (role_id)
    )";

    /// `seq` is the 1-based position in the user's event sequence. The
    /// unique key on `(user_id_fk, seq)` rejects a second writer that read
    /// the same previous event.
    pub const CLOCKINGS: &str = "CREATE TABLE IF NOT EXISTS clockings (
        clocking_id INTEGER PRIMARY KEY AUTOINCREMENT,
        type TEXT NOT NULL CHECK (type IN ('in', 'out')),
        register TEXT NOT NULL,
        seq INTEGER NOT NULL CHECK (seq > 0),
        user_id_fk INTEGER NOT NULL REFERENCES users (user_id) ON DELETE CASCADE,
        UNIQUE (user_id_fk, seq)
    )";

    pub const SCHEMA: [&str; 3] = [ROLES, USERS, CLOCKINGS];
}
