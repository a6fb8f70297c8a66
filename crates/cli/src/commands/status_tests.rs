use super::*;
use sdlc_core::test_support::TaskBuilder;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn run_reports_counts_across_formats_without_failing() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("SDLC_STATE_DIR", dir.path());

    let handles = crate::store::open().await.unwrap();
    handles.state.insert_task(&TaskBuilder::new("t1").state(TaskState::Queued).build()).await.unwrap();
    handles.state.insert_task(&TaskBuilder::new("t2").state(TaskState::Running).build()).await.unwrap();

    run(StatusArgs {}, OutputFormat::Text).await.unwrap();
    run(StatusArgs {}, OutputFormat::Json).await.unwrap();

    std::env::remove_var("SDLC_STATE_DIR");
}
