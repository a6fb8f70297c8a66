use super::*;
use sdlc_core::test_support::TaskBuilder;
use sdlc_core::TaskState;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn run_requeues_a_rejected_task() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("SDLC_STATE_DIR", dir.path());

    let handles = crate::store::open().await.unwrap();
    let task = TaskBuilder::new("t1").state(TaskState::Rejected).build();
    handles.state.insert_task(&task).await.unwrap();

    run(ResubmitArgs { task_id: "t1".into() }).await.unwrap();

    let reloaded = handles.state.get_task(&task.id).await.unwrap().unwrap();
    assert_eq!(reloaded.state, TaskState::Queued);

    std::env::remove_var("SDLC_STATE_DIR");
}

#[tokio::test]
#[serial]
async fn run_fails_for_a_task_that_is_not_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("SDLC_STATE_DIR", dir.path());

    let handles = crate::store::open().await.unwrap();
    let task = TaskBuilder::new("t1").state(TaskState::Running).build();
    handles.state.insert_task(&task).await.unwrap();

    assert!(run(ResubmitArgs { task_id: "t1".into() }).await.is_err());

    std::env::remove_var("SDLC_STATE_DIR");
}
