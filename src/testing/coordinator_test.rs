use super::backend::{MockCleanupBackend, SessionToken};
use super::coordinator::*;
use super::error::{CleanupError, CleanupResult};
use crate::config::{CleanupSettings, Credentials};
use mockall::Sequence;
use std::future::ready;

fn settings_with_credentials() -> CleanupSettings {
    CleanupSettings {
        api_origin: "http://api.local".to_string(),
        id_origin: "http://id.local".to_string(),
        credentials: Some(Credentials {
            email: "dev@example.com".to_string(),
            password: "hunter2".to_string(),
        }),
    }
}

fn settings_without_credentials() -> CleanupSettings {
    CleanupSettings {
        credentials: None,
        ..settings_with_credentials()
    }
}

fn expect_login(
    backend: &mut MockCleanupBackend,
    seq: &mut Sequence,
    result: CleanupResult<SessionToken>,
) {
    backend
        .expect_login()
        .withf(|credentials: &Credentials| credentials.email == "dev@example.com")
        .times(1)
        .in_sequence(seq)
        .returning(move |_| Box::pin(ready(result.clone())));
}

fn expect_delete(
    backend: &mut MockCleanupBackend,
    seq: &mut Sequence,
    id: &'static str,
    result: CleanupResult<()>,
) {
    backend
        .expect_delete_app()
        .withf(move |session: &SessionToken, app_id: &str| {
            session.as_str() == "session-1" && app_id == id
        })
        .times(1)
        .in_sequence(seq)
        .returning(move |_, _| Box::pin(ready(result.clone())));
}

fn session() -> CleanupResult<SessionToken> {
    Ok(SessionToken::new("session-1"))
}

// =============================================================================
// Marking
// =============================================================================

#[test]
fn test_new_coordinator_is_empty() {
    let coordinator = CleanupCoordinator::new();
    assert!(coordinator.is_empty());
    assert_eq!(coordinator.len(), 0);
}

#[test]
fn test_marks_keep_order_and_duplicates() {
    let coordinator = CleanupCoordinator::new();
    coordinator.mark_for_deletion("app-1");
    coordinator.mark_for_deletion("app-2".to_string());
    coordinator.mark_for_deletion("app-1");
    coordinator.mark_for_deletion("");

    assert_eq!(coordinator.pending(), vec!["app-1", "app-2", "app-1", ""]);
    assert_eq!(coordinator.len(), 4);
}

#[test]
fn test_concurrent_marks_lose_nothing() {
    let coordinator = CleanupCoordinator::new();
    let threads = 16;
    let per_thread = 250;

    std::thread::scope(|s| {
        for t in 0..threads {
            let coordinator = &coordinator;
            s.spawn(move || {
                for i in 0..per_thread {
                    coordinator.mark_for_deletion(format!("app-{}-{}", t, i));
                }
            });
        }
    });

    let mut pending = coordinator.pending();
    assert_eq!(pending.len(), threads * per_thread);

    let mut expected: Vec<String> = (0..threads)
        .flat_map(|t| (0..per_thread).map(move |i| format!("app-{}-{}", t, i)))
        .collect();
    pending.sort();
    expected.sort();
    assert_eq!(pending, expected);
}

#[test]
fn test_concurrent_marks_keep_per_thread_order() {
    let coordinator = CleanupCoordinator::new();

    std::thread::scope(|s| {
        for t in 0..4 {
            let coordinator = &coordinator;
            s.spawn(move || {
                for i in 0..100 {
                    coordinator.mark_for_deletion(format!("{}:{:03}", t, i));
                }
            });
        }
    });

    let pending = coordinator.pending();
    for t in 0..4 {
        let prefix = format!("{}:", t);
        let mine: Vec<&String> = pending.iter().filter(|id| id.starts_with(&prefix)).collect();
        assert_eq!(mine.len(), 100);
        assert!(mine.windows(2).all(|w| w[0] < w[1]));
    }
}

// =============================================================================
// Running cleanup
// =============================================================================

#[tokio::test]
async fn test_run_empty_registry_makes_no_calls() {
    let backend = MockCleanupBackend::new();
    let outcome = CleanupCoordinator::new()
        .run(&settings_with_credentials(), &backend)
        .await
        .unwrap();

    assert_eq!(outcome, CleanupOutcome::NothingPending);
}

#[tokio::test]
async fn test_run_without_credentials_skips() {
    let coordinator = CleanupCoordinator::new();
    coordinator.mark_for_deletion("app-1");
    coordinator.mark_for_deletion("app-2");

    let backend = MockCleanupBackend::new();
    let outcome = coordinator
        .run(&settings_without_credentials(), &backend)
        .await
        .unwrap();

    assert_eq!(outcome, CleanupOutcome::Skipped { pending: 2 });
}

#[tokio::test]
async fn test_run_logs_in_once_then_deletes_in_order() {
    let coordinator = CleanupCoordinator::new();
    for id in ["app-3", "app-1", "app-2"] {
        coordinator.mark_for_deletion(id);
    }

    let mut seq = Sequence::new();
    let mut backend = MockCleanupBackend::new();
    expect_login(&mut backend, &mut seq, session());
    expect_delete(&mut backend, &mut seq, "app-3", Ok(()));
    expect_delete(&mut backend, &mut seq, "app-1", Ok(()));
    expect_delete(&mut backend, &mut seq, "app-2", Ok(()));

    let outcome = coordinator
        .run(&settings_with_credentials(), &backend)
        .await
        .unwrap();

    assert_eq!(outcome, CleanupOutcome::Deleted { count: 3 });
}

#[tokio::test]
async fn test_run_login_rejected_deletes_nothing() {
    let coordinator = CleanupCoordinator::new();
    coordinator.mark_for_deletion("app-1");

    let mut seq = Sequence::new();
    let mut backend = MockCleanupBackend::new();
    expect_login(
        &mut backend,
        &mut seq,
        Err(CleanupError::LoginRejected { status: 401 }),
    );

    let err = coordinator
        .run(&settings_with_credentials(), &backend)
        .await
        .unwrap_err();

    assert_eq!(err, CleanupError::LoginRejected { status: 401 });
}

#[tokio::test]
async fn test_run_missing_session_token_deletes_nothing() {
    let coordinator = CleanupCoordinator::new();
    coordinator.mark_for_deletion("app-1");

    let mut seq = Sequence::new();
    let mut backend = MockCleanupBackend::new();
    expect_login(&mut backend, &mut seq, Err(CleanupError::MissingSessionToken));

    let err = coordinator
        .run(&settings_with_credentials(), &backend)
        .await
        .unwrap_err();

    assert_eq!(err, CleanupError::MissingSessionToken);
}

#[tokio::test]
async fn test_run_stops_at_first_failed_delete() {
    let coordinator = CleanupCoordinator::new();
    for id in ["app-1", "app-2", "app-3", "app-4"] {
        coordinator.mark_for_deletion(id);
    }

    let rejected = CleanupError::DeleteRejected {
        id: "app-2".to_string(),
        status: 500,
    };
    let mut seq = Sequence::new();
    let mut backend = MockCleanupBackend::new();
    expect_login(&mut backend, &mut seq, session());
    expect_delete(&mut backend, &mut seq, "app-1", Ok(()));
    expect_delete(&mut backend, &mut seq, "app-2", Err(rejected.clone()));

    let err = coordinator
        .run(&settings_with_credentials(), &backend)
        .await
        .unwrap_err();

    assert_eq!(err, rejected);
}

#[tokio::test]
async fn test_run_stops_at_delete_transport_failure() {
    let coordinator = CleanupCoordinator::new();
    coordinator.mark_for_deletion("app-1");
    coordinator.mark_for_deletion("app-2");

    let failed = CleanupError::DeleteFailed {
        id: "app-1".to_string(),
        message: "connection refused".to_string(),
    };
    let mut seq = Sequence::new();
    let mut backend = MockCleanupBackend::new();
    expect_login(&mut backend, &mut seq, session());
    expect_delete(&mut backend, &mut seq, "app-1", Err(failed.clone()));

    let err = coordinator
        .run(&settings_with_credentials(), &backend)
        .await
        .unwrap_err();

    assert_eq!(err, failed);
}

#[tokio::test]
async fn test_run_deletes_duplicates_twice() {
    let coordinator = CleanupCoordinator::new();
    coordinator.mark_for_deletion("app-1");
    coordinator.mark_for_deletion("app-1");

    let mut seq = Sequence::new();
    let mut backend = MockCleanupBackend::new();
    expect_login(&mut backend, &mut seq, session());
    expect_delete(&mut backend, &mut seq, "app-1", Ok(()));
    expect_delete(&mut backend, &mut seq, "app-1", Ok(()));

    let outcome = coordinator
        .run(&settings_with_credentials(), &backend)
        .await
        .unwrap();

    assert_eq!(outcome, CleanupOutcome::Deleted { count: 2 });
}
