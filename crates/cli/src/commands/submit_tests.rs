use super::*;
use serial_test::serial;

#[test]
fn priority_from_u8_maps_the_documented_range() {
    assert!(matches!(priority_from_u8(0).unwrap(), Priority::Critical));
    assert!(matches!(priority_from_u8(3).unwrap(), Priority::Low));
    assert!(priority_from_u8(4).is_err());
}

#[tokio::test]
#[serial]
async fn run_inserts_a_queued_task_with_a_generated_id() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("SDLC_STATE_DIR", dir.path());

    run(SubmitArgs { task_type: "IMPLEMENT".into(), priority: 1, id: None, submitter: None }).await.unwrap();

    let handles = crate::store::open().await.unwrap();
    let queued = handles.state.tasks_by_state(TaskState::Queued).await.unwrap();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].task_type.as_str(), "IMPLEMENT");
    assert!(matches!(queued[0].priority, Priority::High));

    std::env::remove_var("SDLC_STATE_DIR");
}

#[tokio::test]
#[serial]
async fn run_records_submitter_in_metadata_and_trace_id() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("SDLC_STATE_DIR", dir.path());

    run(SubmitArgs {
        task_type: "REVIEW".into(),
        priority: 2,
        id: Some("fixed-id".into()),
        submitter: Some("alice".into()),
    })
    .await
    .unwrap();

    let handles = crate::store::open().await.unwrap();
    let task = handles.state.get_task(&sdlc_core::TaskId::new("fixed-id")).await.unwrap().unwrap();
    assert_eq!(task.trace_id, "alice:fixed-id");
    assert_eq!(task.metadata["submitter"], "alice");

    std::env::remove_var("SDLC_STATE_DIR");
}
