use stability_engine::backpressure::{BackpressureController, Strategy};
use stability_engine::types::Milliseconds;

#[test]
fn custom_thresholds_change_classification() {
    let mut controller =
        BackpressureController::with_thresholds(Milliseconds::new(2.0).get(), Milliseconds::new(4.0).get());
    for _ in 0..4 {
        controller.record_render(Milliseconds::new(3.0), 0);
    }
    assert_eq!(controller.strategy(), Strategy::Buffer);
}

#[test]
fn snapshot_reports_zero_mean_before_any_sample() {
    let controller = BackpressureController::new();
    let snapshot = controller.snapshot(3);
    assert_eq!(snapshot.strategy, Strategy::Nominal);
    assert_eq!(snapshot.queue_depth, 3);
    assert!((snapshot.avg_render_ms - 0.0).abs() < f64::EPSILON);
}
