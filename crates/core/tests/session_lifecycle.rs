//! Session lifecycle: hydration, the keystroke-to-debounced-write path,
//! and teardown.

mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use profilesync_core::ProfileSession;
use profilesync_domain::{CoopStatus, FieldEdit, FieldGroup, ProfileSyncError};
use serde_json::json;
use support::{settle, test_user, IdentityCall, MockAssetStore, MockDocumentStore, MockIdentity};

async fn session_with(documents: Arc<MockDocumentStore>) -> (ProfileSession, Arc<MockIdentity>) {
    let identity = MockIdentity::new();
    let session = ProfileSession::create(
        identity.clone(),
        documents,
        MockAssetStore::new(),
        test_user(),
    )
    .await
    .unwrap();
    (session, identity)
}

#[tokio::test]
async fn session_hydrates_from_the_stored_document() {
    let documents = MockDocumentStore::with_document(
        "uid-123",
        json!({
            "displayName": "Jamie Lee",
            "faculty": "Mathematics",
            "program": "Statistics",
            "coop": "no",
            "gradTerm": "Winter",
            "gradYear": 2027,
        }),
    );
    let (session, _identity) = session_with(documents).await;

    let snapshot = session.snapshot();
    assert_eq!(snapshot.display_name, "Jamie Lee");
    assert_eq!(snapshot.settings.faculty, "Mathematics");
    assert_eq!(snapshot.settings.program, "Statistics");
    assert_eq!(snapshot.settings.coop, CoopStatus::No);
    assert_eq!(snapshot.settings.grad_year, Some(2027));
}

#[tokio::test]
async fn failed_settings_load_falls_back_to_defaults() {
    let documents = MockDocumentStore::new();
    documents.fail_reads.store(true, Ordering::SeqCst);
    let (session, _identity) = session_with(documents).await;

    // Still a usable session, just with defaults.
    let snapshot = session.snapshot();
    assert_eq!(snapshot.display_name, "Jamie");
    assert_eq!(snapshot.settings.faculty, "");
    assert_eq!(snapshot.settings.coop, CoopStatus::Yes);
}

#[tokio::test(start_paused = true)]
async fn locked_edit_is_rejected_and_schedules_nothing() {
    let documents = MockDocumentStore::new();
    let (mut session, _identity) = session_with(documents.clone()).await;

    let err = session.edit(FieldEdit::Faculty("Science".into())).unwrap_err();
    assert!(matches!(err, ProfileSyncError::FieldLocked(FieldGroup::Settings)));

    tokio::time::advance(Duration::from_secs(2)).await;
    settle().await;
    assert!(documents.merge_calls().is_empty());
    assert_eq!(session.snapshot().settings.faculty, "");
}

#[tokio::test(start_paused = true)]
async fn settings_keystrokes_coalesce_into_one_full_object_write() {
    let documents = MockDocumentStore::new();
    let (mut session, _identity) = session_with(documents.clone()).await;

    session.unlock(FieldGroup::Settings);
    session.edit(FieldEdit::Faculty("Mathematics".into())).unwrap();
    session.edit(FieldEdit::Program("Computer Science".into())).unwrap();
    settle().await;

    tokio::time::advance(Duration::from_millis(500)).await;
    settle().await;

    let merges = documents.merge_calls();
    assert_eq!(merges.len(), 1);
    assert_eq!(merges[0].collection, "users");
    assert_eq!(merges[0].key, "uid-123");
    // The whole settings sub-object goes out, untouched fields included.
    assert_eq!(
        merges[0].partial,
        json!({
            "faculty": "Mathematics",
            "program": "Computer Science",
            "coop": "yes",
            "gradTerm": "",
            "gradYear": null,
        })
    );

    tokio::time::advance(Duration::from_secs(5)).await;
    settle().await;
    assert_eq!(documents.merge_calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn faculty_change_mid_edit_resets_the_program_in_the_flush() {
    let documents = MockDocumentStore::new();
    let (mut session, _identity) = session_with(documents.clone()).await;

    session.unlock(FieldGroup::Settings);
    session.edit(FieldEdit::Faculty("Mathematics".into())).unwrap();
    session.edit(FieldEdit::Program("Statistics".into())).unwrap();
    session.edit(FieldEdit::Faculty("Engineering".into())).unwrap();
    settle().await;

    tokio::time::advance(Duration::from_millis(450)).await;
    settle().await;

    let merges = documents.merge_calls();
    assert_eq!(merges.len(), 1);
    assert_eq!(merges[0].partial["faculty"], json!("Engineering"));
    assert_eq!(merges[0].partial["program"], json!(""));
}

#[tokio::test(start_paused = true)]
async fn flush_failure_surfaces_as_a_sync_error() {
    let documents = MockDocumentStore::new();
    documents.fail_merge_writes.store(true, Ordering::SeqCst);
    let (mut session, _identity) = session_with(documents.clone()).await;

    session.unlock(FieldGroup::Settings);
    session.edit(FieldEdit::Faculty("Arts".into())).unwrap();
    settle().await;
    assert!(session.next_sync_error().is_none());

    tokio::time::advance(Duration::from_millis(450)).await;
    settle().await;

    assert!(matches!(
        session.next_sync_error(),
        Some(ProfileSyncError::RemoteUnavailable(_))
    ));
    // The failure never disturbs the edit state.
    assert!(session.is_editing(FieldGroup::Settings));
}

#[tokio::test(start_paused = true)]
async fn sign_out_discards_the_pending_debounced_write() {
    let documents = MockDocumentStore::new();
    let (mut session, identity) = session_with(documents.clone()).await;

    session.unlock(FieldGroup::Settings);
    session.edit(FieldEdit::Faculty("Mathematics".into())).unwrap();
    settle().await;

    // Tear down inside the quiescence window.
    session.sign_out().await.unwrap();
    assert_eq!(identity.calls(), vec![IdentityCall::SignOut]);

    tokio::time::advance(Duration::from_secs(2)).await;
    settle().await;
    assert!(documents.merge_calls().is_empty());
}

#[tokio::test]
async fn sign_up_enforces_the_password_policy_locally() {
    let identity = MockIdentity::new();
    let documents = MockDocumentStore::new();
    let assets = MockAssetStore::new();

    // 6 characters: under the minimum, blocked before the provider call.
    let err = ProfileSession::sign_up(
        identity.clone(),
        documents.clone(),
        assets.clone(),
        "new@uwaterloo.ca",
        "Ab1!xy",
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ProfileSyncError::Validation(_)));
    assert!(identity.calls().is_empty());

    let session = ProfileSession::sign_up(
        identity.clone(),
        documents,
        assets,
        "new@uwaterloo.ca",
        "Abcdefg1!",
    )
    .await
    .unwrap();
    assert_eq!(
        identity.calls(),
        vec![IdentityCall::SignUp { email: "new@uwaterloo.ca".into() }]
    );
    session.teardown().await;
}

#[tokio::test]
async fn cancel_restores_the_committed_name_and_relocks() {
    let documents = MockDocumentStore::new();
    let (mut session, _identity) = session_with(documents).await;

    session.unlock(FieldGroup::Name);
    session.edit(FieldEdit::DisplayName("Typo Name".into())).unwrap();
    assert_eq!(session.snapshot().display_name, "Typo Name");

    session.cancel(FieldGroup::Name);
    assert_eq!(session.snapshot().display_name, "Jamie");
    assert!(!session.is_editing(FieldGroup::Name));
    session.teardown().await;
}
