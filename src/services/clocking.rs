// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Clocking ledger.
//!
//! Each user's clocking events must alternate between `in` and `out`. The
//! ledger enforces this in two layers:
//! 1. Read the last event and check the transition, inside a transaction
//! 2. Insert at sequence position `last.seq + 1`; the store's unique key on
//!    `(user, seq)` rejects a concurrent writer that read the same last event

use crate::db::{Db, StoreError};
use crate::models::{Clocking, ClockingState, ClockingType, UserId};
use chrono::{DateTime, Utc};
use std::str::FromStr;

/// Which event a user with no history may start with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockingStartPolicy {
    /// No history means clocked out, so the first event must be `in`.
    #[default]
    RequireIn,
    /// Either type is accepted as the first event.
    Any,
}

impl FromStr for ClockingStartPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" => Ok(ClockingStartPolicy::RequireIn),
            "any" => Ok(ClockingStartPolicy::Any),
            other => Err(format!("expected \"in\" or \"any\", got {:?}", other)),
        }
    }
}

/// Errors from [`ClockingLedger::record_clocking`].
#[derive(Debug, thiserror::Error)]
pub enum ClockingError {
    /// Same type as the previous event.
    #[error("type \"{0}\" already registered")]
    DuplicateState(ClockingType),

    /// Timestamp earlier than the previous event.
    #[error("timestamp {attempted} is earlier than the previous event at {previous}")]
    OutOfOrder {
        previous: DateTime<Utc>,
        attempted: DateTime<Utc>,
    },

    /// Another write for the same user won the race.
    #[error("conflicting clocking write, please retry")]
    StorageConflict,

    #[error("clocking storage error: {0}")]
    Internal(StoreError),
}

impl From<StoreError> for ClockingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate | StoreError::Conflict(_) => ClockingError::StorageConflict,
            other => ClockingError::Internal(other),
        }
    }
}

/// Records and lists clocking events.
#[derive(Clone)]
pub struct ClockingLedger {
    db: Db,
    policy: ClockingStartPolicy,
}

impl ClockingLedger {
    pub fn new(db: Db, policy: ClockingStartPolicy) -> Self {
        Self { db, policy }
    }

    pub fn policy(&self) -> ClockingStartPolicy {
        self.policy
    }

    /// Record an event for `user_id`, which must come from the
    /// authenticated session.
    pub async fn record_clocking(
        &self,
        user_id: UserId,
        kind: ClockingType,
        registered_at: DateTime<Utc>,
    ) -> Result<Clocking, ClockingError> {
        let mut tx = self.db.begin_clocking().await?;

        let last = tx.last_clocking(user_id).await?;
        let seq = self.next_seq(last.as_ref(), kind, registered_at)?;

        let record = tx
            .insert_clocking(user_id, kind, registered_at, seq)
            .await?;
        tx.commit().await?;

        tracing::info!(
            user_id = %user_id,
            clocking_id = %record.id,
            kind = %kind,
            seq,
            "Clocking recorded"
        );

        Ok(record)
    }

    /// All events of `user_id` in the order they were recorded.
    pub async fn list_clockings(&self, user_id: UserId) -> Result<Vec<Clocking>, ClockingError> {
        Ok(self.db.list_clockings(user_id).await?)
    }

    /// Check the transition from `last` and return the sequence position
    /// for the new event.
    fn next_seq(
        &self,
        last: Option<&Clocking>,
        kind: ClockingType,
        registered_at: DateTime<Utc>,
    ) -> Result<i64, ClockingError> {
        let Some(prev) = last else {
            return match (self.policy, kind) {
                (ClockingStartPolicy::RequireIn, ClockingType::Out) => {
                    tracing::debug!("Rejected first clocking of type out");
                    Err(ClockingError::DuplicateState(kind))
                }
                _ => Ok(1),
            };
        };

        if ClockingState::after(prev.kind).apply(kind).is_none() {
            tracing::debug!(user_id = %prev.user_id, kind = %kind, "Rejected repeated clocking type");
            return Err(ClockingError::DuplicateState(kind));
        }

        if registered_at < prev.registered_at {
            return Err(ClockingError::OutOfOrder {
                previous: prev.registered_at,
                attempted: registered_at,
            });
        }

        Ok(prev.seq + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use chrono::Duration;

    async fn setup(policy: ClockingStartPolicy) -> (ClockingLedger, UserId) {
        let db = Db::new_in_memory().await.unwrap();
        let role = db.create_role("STAFF", "2024-01-01T00:00:00Z").await.unwrap();
        let user = NewUser {
            first_name: "Clock".to_string(),
            last_name: "Watcher".to_string(),
            email: "clock@example.com".to_string(),
            password: String::new(),
            profile_image: "upload/nopfp.png".to_string(),
            role_id: role.id,
        };
        let user_id = db
            .insert_user(&user, "$argon2id$fake", "2024-01-01T00:00:00Z")
            .await
            .unwrap();
        (ClockingLedger::new(db, policy), user_id)
    }

    fn t(minutes: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_704_103_200, 0).unwrap() + Duration::minutes(minutes)
    }

    #[test]
    fn test_parse_start_policy() {
        assert_eq!(
            "in".parse::<ClockingStartPolicy>().unwrap(),
            ClockingStartPolicy::RequireIn
        );
        assert_eq!(
            "ANY".parse::<ClockingStartPolicy>().unwrap(),
            ClockingStartPolicy::Any
        );
        assert!("out".parse::<ClockingStartPolicy>().is_err());
    }

    #[tokio::test]
    async fn test_in_in_out_sequence() {
        let (ledger, user_id) = setup(ClockingStartPolicy::RequireIn).await;

        let first = ledger
            .record_clocking(user_id, ClockingType::In, t(0))
            .await
            .unwrap();
        assert!(first.id.get() > 0);
        assert_eq!(first.user_id, user_id);

        let err = ledger
            .record_clocking(user_id, ClockingType::In, t(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ClockingError::DuplicateState(ClockingType::In)));
        assert_eq!(err.to_string(), "type \"in\" already registered");

        let third = ledger
            .record_clocking(user_id, ClockingType::Out, t(2))
            .await
            .unwrap();
        assert_eq!(third.kind, ClockingType::Out);

        let all = ledger.list_clockings(user_id).await.unwrap();
        let kinds: Vec<_> = all.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ClockingType::In, ClockingType::Out]);
    }

    #[tokio::test]
    async fn test_first_out_rejected_when_in_required() {
        let (ledger, user_id) = setup(ClockingStartPolicy::RequireIn).await;
        let err = ledger
            .record_clocking(user_id, ClockingType::Out, t(0))
            .await
            .unwrap_err();
        assert!(matches!(err, ClockingError::DuplicateState(ClockingType::Out)));
        assert!(ledger.list_clockings(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_first_out_accepted_with_any_policy() {
        let (ledger, user_id) = setup(ClockingStartPolicy::Any).await;
        ledger
            .record_clocking(user_id, ClockingType::Out, t(0))
            .await
            .unwrap();
        let err = ledger
            .record_clocking(user_id, ClockingType::Out, t(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ClockingError::DuplicateState(ClockingType::Out)));
    }

    #[tokio::test]
    async fn test_earlier_timestamp_rejected() {
        let (ledger, user_id) = setup(ClockingStartPolicy::RequireIn).await;
        ledger
            .record_clocking(user_id, ClockingType::In, t(10))
            .await
            .unwrap();
        let err = ledger
            .record_clocking(user_id, ClockingType::Out, t(5))
            .await
            .unwrap_err();
        assert!(matches!(err, ClockingError::OutOfOrder { .. }));
    }

    #[tokio::test]
    async fn test_list_is_empty_not_missing() {
        let (ledger, user_id) = setup(ClockingStartPolicy::RequireIn).await;
        assert!(ledger.list_clockings(user_id).await.unwrap().is_empty());
        assert!(ledger.list_clockings(UserId(12345)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_long_sequence_alternates() {
        let (ledger, user_id) = setup(ClockingStartPolicy::RequireIn).await;
        let attempts = [
            ClockingType::In,
            ClockingType::In,
            ClockingType::Out,
            ClockingType::Out,
            ClockingType::In,
            ClockingType::Out,
            ClockingType::In,
            ClockingType::In,
        ];
        for (minute, kind) in attempts.iter().enumerate() {
            let _ = ledger.record_clocking(user_id, *kind, t(minute as i64)).await;
        }

        let all = ledger.list_clockings(user_id).await.unwrap();
        assert_eq!(all.len(), 5);
        for pair in all.windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind);
            assert!(pair[0].registered_at <= pair[1].registered_at);
            assert_eq!(pair[0].seq + 1, pair[1].seq);
        }
    }

    #[test]
    fn test_store_error_mapping() {
        assert!(matches!(
            ClockingError::from(StoreError::Duplicate),
            ClockingError::StorageConflict
        ));
        assert!(matches!(
            ClockingError::from(StoreError::Conflict("database is locked".into())),
            ClockingError::StorageConflict
        ));
        assert!(matches!(
            ClockingError::from(StoreError::Database("disk I/O error".into())),
            ClockingError::Internal(_)
        ));
    }
}
