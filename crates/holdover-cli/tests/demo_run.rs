//! Demo runner behaviour with paused time.

use holdover_cli::{BarOutput, DemoOptions, DemoReport, run_demo};
use holdover_core::ProgressConfig;

fn options(ticks: u32) -> DemoOptions {
    DemoOptions {
        output: BarOutput::Hidden,
        ..DemoOptions::new(ProgressConfig::new(ticks, 100))
    }
}

#[tokio::test(start_paused = true)]
async fn test_uninterrupted_run_completes_and_releases() {
    let report = run_demo(options(10)).await.unwrap();

    assert_eq!(
        report,
        DemoReport {
            final_progress: 10,
            completed: true,
            recreations: 0,
            presenters_created: 1,
            retained_after_exit: false,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_recreations_reuse_one_presenter() {
    let report = run_demo(DemoOptions {
        recreate_at: vec![6, 3, 3],
        ..options(10)
    })
    .await
    .unwrap();

    assert_eq!(report.recreations, 2);
    assert_eq!(report.presenters_created, 1);
    assert!(report.completed);
    assert_eq!(report.final_progress, 10);
    assert!(!report.retained_after_exit);
}

#[tokio::test(start_paused = true)]
async fn test_leaving_mid_run_stops_progress() {
    let report = run_demo(DemoOptions {
        recreate_at: vec![2],
        leave_at: Some(4),
        ..options(10)
    })
    .await
    .unwrap();

    assert!(!report.completed);
    assert_eq!(report.final_progress, 4);
    assert_eq!(report.recreations, 1);
    assert!(!report.retained_after_exit);
}

#[tokio::test(start_paused = true)]
async fn test_recreation_points_past_the_end_are_skipped() {
    let report = run_demo(DemoOptions {
        recreate_at: vec![50],
        ..options(5)
    })
    .await
    .unwrap();

    assert!(report.completed);
    assert_eq!(report.recreations, 0);
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let err = run_demo(options(0)).await.unwrap_err();
    assert!(err.to_string().contains("invalid progress config"));
}
