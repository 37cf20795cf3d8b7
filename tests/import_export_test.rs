//! JSON import and export
//!
//! The export is a plain JSON array of rows; the import accepts the same
//! shape back, assigning fresh ids where they are missing and re-homing
//! every record under the importing store's owner.

mod helpers;

use std::fs;

use assert_matches::assert_matches;
use helpers::*;
use StudyCal::models::EventType;
use StudyCal::utils::errors::StudyCalError;

#[tokio::test]
async fn non_list_payload_is_rejected_without_writes() {
    let events = memory_store("owner-1");

    let result = events.import_events(r#"{"date": "2025-04-10"}"#).await;
    assert_matches!(result, Err(StudyCalError::InvalidImport(_)));

    let result = events.import_events("not json at all").await;
    assert_matches!(result, Err(StudyCalError::InvalidImport(_)));

    events.load().await.expect("load should succeed");
    assert!(events.snapshot().is_empty());
}

#[tokio::test]
async fn records_missing_ids_get_fresh_ones() {
    let events = memory_store("owner-1");

    let summary = events
        .import_events(
            r#"[
                {"date": "2025-04-10", "title": "Field trip"},
                {"id": "", "date": "2025-04-11", "title": "Cleanup", "type": "club_activity"},
                {"id": "keep-me", "date": "2025-04-12", "title": "Exam", "type": "exam"}
            ]"#,
        )
        .await
        .expect("import should succeed");
    assert_eq!(summary.imported, 3);

    let rows = events.snapshot();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| !row.id.is_empty()));
    assert!(rows.iter().all(|row| row.owner == "owner-1"));
    assert!(rows.iter().any(|row| row.id == "keep-me"));
    assert_eq!(rows[1].event_type, EventType::ClubActivity);
}

#[tokio::test]
async fn unknown_event_type_fails_the_whole_import() {
    let events = memory_store("owner-1");

    let result = events
        .import_events(r#"[{"date": "2025-04-10", "type": "picnic"}]"#)
        .await;

    assert_matches!(result, Err(StudyCalError::InvalidImport(_)));
    events.load().await.expect("load should succeed");
    assert!(events.snapshot().is_empty());
}

#[tokio::test]
async fn export_file_round_trips_into_another_store() {
    let source = memory_store("owner-1");
    let target = memory_store("owner-2");

    let group_id = source
        .create_range(
            draft("Sports week", "", EventType::ClubActivity),
            date(2025, 5, 12),
            date(2025, 5, 14),
        )
        .await
        .expect("range should be created");
    source
        .create_single(draft("Report", "Biology", EventType::Submission), date(2025, 5, 20))
        .await
        .expect("create should succeed");

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("calendar-export.json");
    fs::write(&path, source.export_json().expect("export should serialize")).expect("write file");

    let payload = fs::read_to_string(&path).expect("read file");
    let summary = target
        .import_events(&payload)
        .await
        .expect("import should succeed");
    assert_eq!(summary.imported, 4);

    let rows = target.snapshot();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|row| row.owner == "owner-2"));

    // the imported range still hangs together as a group
    let grouped: Vec<_> = rows
        .iter()
        .filter(|row| row.group_ref() == Some(group_id.as_str()))
        .collect();
    assert_eq!(grouped.len(), 3);

    // and the source owner's calendar is untouched
    let source_rows = source.load().await.expect("load should succeed");
    assert_eq!(source_rows.len(), 4);
    assert!(source_rows.iter().all(|row| row.owner == "owner-1"));
}

#[tokio::test]
async fn import_failure_mid_sequence_reports_applied_rows() {
    let (events, repository) = flaky_store("owner-1");
    repository.fail_upserts_after(2);

    let result = events
        .import_events(
            r#"[
                {"date": "2025-04-10", "title": "One"},
                {"date": "2025-04-11", "title": "Two"},
                {"date": "2025-04-12", "title": "Three"},
                {"date": "2025-04-13", "title": "Four"}
            ]"#,
        )
        .await;

    assert_matches!(
        result,
        Err(StudyCalError::PartialWrite {
            applied: 2,
            attempted: 4,
            ..
        })
    );

    repository.heal();
    let rows = events.load().await.expect("load should succeed");
    let titles: Vec<&str> = rows.iter().map(|row| row.title.as_str()).collect();
    assert_eq!(titles, vec!["One", "Two"]);
}
