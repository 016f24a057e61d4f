// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Concurrent clocking writes against a file database.
//!
//! Several connections race to record the same event type for one user.
//! Exactly one may win; every other attempt must be rejected either by the
//! transition check or by the store's uniqueness guard.

use chrono::Utc;
use employee_service::db::Db;
use employee_service::models::{ClockingType, NewUser};
use employee_service::services::{ClockingError, ClockingLedger, ClockingStartPolicy};
use std::sync::Arc;
use tokio::sync::Barrier;

const WRITERS: usize = 8;

async fn file_db(dir: &tempfile::TempDir) -> Db {
    let path = dir.path().join("clockings.db");
    let db = Db::connect(&format!("sqlite://{}", path.display()))
        .await
        .expect("Failed to open file database");
    db.migrate().await.unwrap();
    db
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_type_has_single_winner() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_db(&dir).await;

    let role = db.create_role("STAFF", "2024-01-01T00:00:00Z").await.unwrap();
    let user = NewUser {
        first_name: "Race".to_string(),
        last_name: "Condition".to_string(),
        email: "race@example.com".to_string(),
        password: String::new(),
        profile_image: "upload/nopfp.png".to_string(),
        role_id: role.id,
    };
    let user_id = db
        .insert_user(&user, "$argon2id$unused", "2024-01-01T00:00:00Z")
        .await
        .unwrap();

    let ledger = ClockingLedger::new(db.clone(), ClockingStartPolicy::RequireIn);
    let barrier = Arc::new(Barrier::new(WRITERS));

    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let ledger = ledger.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                ledger
                    .record_clocking(user_id, ClockingType::In, Utc::now())
                    .await
            })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(ClockingError::DuplicateState(ClockingType::In))
            | Err(ClockingError::StorageConflict) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);

    let recorded = ledger.list_clockings(user_id).await.unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].kind, ClockingType::In);

    db.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sequential_writes_after_race_still_alternate() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_db(&dir).await;

    let role = db.create_role("STAFF", "2024-01-01T00:00:00Z").await.unwrap();
    let user = NewUser {
        first_name: "Steady".to_string(),
        last_name: "Worker".to_string(),
        email: "steady@example.com".to_string(),
        password: String::new(),
        profile_image: "upload/nopfp.png".to_string(),
        role_id: role.id,
    };
    let user_id = db
        .insert_user(&user, "$argon2id$unused", "2024-01-01T00:00:00Z")
        .await
        .unwrap();
    let ledger = ClockingLedger::new(db.clone(), ClockingStartPolicy::RequireIn);

    let a = ledger.clone();
    let b = ledger.clone();
    let (first, second) = tokio::join!(
        a.record_clocking(user_id, ClockingType::In, Utc::now()),
        b.record_clocking(user_id, ClockingType::In, Utc::now()),
    );
    assert!(first.is_ok() ^ second.is_ok());

    ledger
        .record_clocking(user_id, ClockingType::Out, Utc::now())
        .await
        .unwrap();

    let kinds: Vec<_> = ledger
        .list_clockings(user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.kind)
        .collect();
    assert_eq!(kinds, vec![ClockingType::In, ClockingType::Out]);

    db.close().await;
}
