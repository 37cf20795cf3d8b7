//! Editor and delete flows against a live store
//!
//! Drives the form and the delete confirmation dialog end to end, checking
//! that what they resolve to actually lands in the backend.

mod helpers;

use helpers::*;
use StudyCal::flows::{DeleteFlow, DeletePrompt, EditorForm, FlowStep, SaveOutcome};
use StudyCal::models::{EventType, DEFAULT_TITLE};

#[tokio::test]
async fn submitting_a_blank_form_creates_an_untitled_event() {
    let events = memory_store("owner-1");

    let outcome = EditorForm::for_new(date(2025, 4, 10))
        .submit(&events)
        .await
        .expect("submit should succeed");

    let created = match outcome {
        SaveOutcome::Created(event) => event,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(created.title, DEFAULT_TITLE);
    assert_eq!(created.date, date(2025, 4, 10));
    assert_eq!(created.group_ref(), None);
    assert_eq!(events.snapshot().len(), 1);
}

#[tokio::test]
async fn multi_day_form_creates_a_grouped_range() {
    let events = memory_store("owner-1");

    let mut form = EditorForm::for_new(date(2025, 4, 10));
    form.multi_day = true;
    form.end_date = Some(date(2025, 4, 12));
    form.fields = draft("School festival", "", EventType::ClubActivity);

    let outcome = form.submit(&events).await.expect("submit should succeed");
    let (group_id, days) = match outcome {
        SaveOutcome::RangeCreated { group_id, days } => (group_id, days),
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(days, 3);

    let rows = events.snapshot();
    assert_eq!(rows.len(), 3);
    assert!(rows
        .iter()
        .all(|row| row.group_ref() == Some(group_id.as_str())));
}

#[tokio::test]
async fn typed_events_drop_the_course_on_save() {
    let events = memory_store("owner-1");

    // the course input is disabled for non-default types, so whatever the
    // form still holds must not be saved
    let mut form = EditorForm::for_new(date(2025, 4, 10));
    form.fields = draft("Finals", "Math", EventType::Exam);
    let outcome = form.submit(&events).await.expect("submit should succeed");
    let exam = match outcome {
        SaveOutcome::Created(event) => event,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(exam.course, "");

    // submissions keep theirs
    let mut form = EditorForm::for_new(date(2025, 4, 11));
    form.fields = draft("Essay", "English", EventType::Submission);
    let outcome = form.submit(&events).await.expect("submit should succeed");
    let submission = match outcome {
        SaveOutcome::Created(event) => event,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(submission.course, "English");
}

#[tokio::test]
async fn editing_through_the_form_fans_out_to_the_group() {
    let events = memory_store("owner-1");
    events
        .create_range(
            draft("Trip", "", EventType::LongBreak),
            date(2025, 4, 10),
            date(2025, 4, 11),
        )
        .await
        .expect("range should be created");

    let member = events.snapshot()[0].clone();
    let mut form = EditorForm::for_event(&member);
    assert_eq!(form.fields.title, "Trip");
    assert!(!form.multi_day);

    form.fields.title = "Kyoto trip".to_string();
    let outcome = form.submit(&events).await.expect("submit should succeed");
    assert_eq!(
        outcome,
        SaveOutcome::Updated {
            id: member.id.clone()
        }
    );

    let rows = events.snapshot();
    assert!(rows.iter().all(|row| row.title == "Kyoto trip"));
}

#[tokio::test]
async fn confirming_whole_group_delete_clears_every_member() {
    let events = memory_store("owner-1");
    events
        .create_range(
            draft("Exams", "", EventType::TermExam),
            date(2025, 4, 14),
            date(2025, 4, 16),
        )
        .await
        .expect("range should be created");
    events
        .create_single(draft("Club", "", EventType::ClubActivity), date(2025, 4, 15))
        .await
        .expect("create should succeed");

    let member = events.snapshot()[0].clone();
    let membership = events.group_membership(&member);
    let decision =
        DeleteFlow::resolve(&member, &membership, &[true]).expect("flow should resolve");

    let deleted = events
        .apply_delete(&decision)
        .await
        .expect("delete should succeed");
    assert!(deleted);

    let rows = events.snapshot();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].event_type, EventType::ClubActivity);
}

#[tokio::test]
async fn declining_group_delete_then_confirming_removes_one_day() {
    let events = memory_store("owner-1");
    events
        .create_range(
            draft("Break", "", EventType::LongBreak),
            date(2025, 7, 20),
            date(2025, 7, 22),
        )
        .await
        .expect("range should be created");

    let middle = events.snapshot()[1].clone();
    let membership = events.group_membership(&middle);

    let mut flow = DeleteFlow::new(&middle, &membership);
    match flow.current() {
        FlowStep::Ask(DeletePrompt::ConfirmWholeGroup { days, .. }) => assert_eq!(days, 3),
        step => panic!("unexpected step: {step:?}"),
    }

    flow.answer(false).expect("flow should advance");
    match flow.current() {
        FlowStep::Ask(DeletePrompt::ConfirmSingleDay { date: day }) => {
            assert_eq!(day, date(2025, 7, 21));
        }
        step => panic!("unexpected step: {step:?}"),
    }

    flow.answer(true).expect("flow should resolve");
    let decision = flow.decision().expect("decision").clone();
    events
        .apply_delete(&decision)
        .await
        .expect("delete should succeed");

    let dates: Vec<_> = events.snapshot().iter().map(|row| row.date).collect();
    assert_eq!(dates, vec![date(2025, 7, 20), date(2025, 7, 22)]);
}

#[tokio::test]
async fn aborting_the_dialog_deletes_nothing() {
    let events = memory_store("owner-1");
    events
        .create_range(
            draft("Break", "", EventType::LongBreak),
            date(2025, 7, 20),
            date(2025, 7, 21),
        )
        .await
        .expect("range should be created");

    let member = events.snapshot()[0].clone();
    let membership = events.group_membership(&member);
    let decision =
        DeleteFlow::resolve(&member, &membership, &[false, false]).expect("flow should resolve");

    let deleted = events
        .apply_delete(&decision)
        .await
        .expect("apply should succeed");
    assert!(!deleted);
    assert_eq!(events.snapshot().len(), 2);
}

#[tokio::test]
async fn standalone_event_gets_a_single_question() {
    let events = memory_store("owner-1");
    let event = events
        .create_single(draft("Essay", "English", EventType::Submission), date(2025, 4, 10))
        .await
        .expect("create should succeed");

    let membership = events.group_membership(&event);
    let mut flow = DeleteFlow::new(&event, &membership);
    assert_eq!(flow.current(), FlowStep::Ask(DeletePrompt::ConfirmDelete));

    flow.answer(true).expect("flow should resolve");
    let decision = flow.decision().expect("decision").clone();
    events
        .apply_delete(&decision)
        .await
        .expect("delete should succeed");
    assert!(events.snapshot().is_empty());
}
