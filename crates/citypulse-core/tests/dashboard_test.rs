// Async lifecycle tests for `Dashboard`, driven by tokio's paused clock.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use futures::StreamExt;
use tokio::time::sleep;
use tokio_test::assert_pending;

use citypulse_core::{
    AnalyticsRange, ClockState, CoreError, Dashboard, DeviceFilter, DeviceKind, SimulationConfig,
    Visibility,
};

// ── Helpers ─────────────────────────────────────────────────────────

const PERIOD: Duration = Duration::from_millis(3_000);
const JUST_OVER: Duration = Duration::from_millis(3_010);

fn dashboard() -> Dashboard {
    Dashboard::new(SimulationConfig::seeded(42)).unwrap()
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_snapshot_available_before_start() {
    let dashboard = dashboard();
    let snap = dashboard.snapshot();
    assert_eq!(snap.tick, 0);
    assert_eq!(snap.devices.len(), 2947);
    assert_eq!(snap.feed.len(), 50);
    assert!(!dashboard.is_started());
}

#[tokio::test(start_paused = true)]
async fn test_ticks_fire_once_per_period() {
    let dashboard = dashboard();
    dashboard.start().await.unwrap();
    assert!(dashboard.is_running());

    sleep(Duration::from_millis(2_990)).await;
    assert_eq!(dashboard.snapshot().tick, 0);

    sleep(Duration::from_millis(20)).await;
    assert_eq!(dashboard.snapshot().tick, 1);

    sleep(PERIOD * 3).await;
    assert_eq!(dashboard.snapshot().tick, 4);

    dashboard.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_double_start_does_not_double_schedule() {
    let dashboard = dashboard();
    dashboard.start().await.unwrap();
    dashboard.start().await.unwrap();

    sleep(JUST_OVER).await;
    assert_eq!(dashboard.snapshot().tick, 1);
    dashboard.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_no_tick_after_stop_and_restart_continues() {
    let dashboard = dashboard();
    dashboard.start().await.unwrap();
    sleep(JUST_OVER).await;
    dashboard.stop().await.unwrap();
    assert!(!dashboard.is_running());

    sleep(PERIOD * 10).await;
    assert_eq!(dashboard.snapshot().tick, 1);

    dashboard.start().await.unwrap();
    sleep(JUST_OVER).await;
    assert_eq!(dashboard.snapshot().tick, 2);
    dashboard.stop().await.unwrap();
}

// ── Visibility ──────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_hidden_pauses_and_resume_does_not_replay() {
    let dashboard = dashboard();
    dashboard.start().await.unwrap();
    sleep(JUST_OVER).await;

    let state = dashboard.set_visibility(Visibility::Hidden).await.unwrap();
    assert_eq!(state, ClockState::Paused);
    assert!(!dashboard.is_running());

    sleep(PERIOD * 20).await;
    assert_eq!(dashboard.snapshot().tick, 1);

    let state = dashboard.set_visibility(Visibility::Visible).await.unwrap();
    assert_eq!(state, ClockState::Running);

    // The fresh timer waits one full period; nothing missed is replayed.
    sleep(Duration::from_millis(2_900)).await;
    assert_eq!(dashboard.snapshot().tick, 1);
    sleep(Duration::from_millis(200)).await;
    assert_eq!(dashboard.snapshot().tick, 2);

    dashboard.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_explicit_pause_survives_visibility() {
    let dashboard = dashboard();
    dashboard.start().await.unwrap();
    dashboard.set_paused(true).await.unwrap();
    dashboard.set_visibility(Visibility::Hidden).await.unwrap();
    let state = dashboard.set_visibility(Visibility::Visible).await.unwrap();
    assert_eq!(state, ClockState::Paused);

    sleep(PERIOD * 4).await;
    assert_eq!(dashboard.snapshot().tick, 0);
    dashboard.stop().await.unwrap();
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_commands_publish_snapshots_while_running() {
    let dashboard = dashboard();
    dashboard.start().await.unwrap();

    let filter = DeviceFilter::Kind(DeviceKind::WeatherStation);
    dashboard.set_filter(filter).await.unwrap();
    let snap = dashboard.snapshot();
    assert_eq!(snap.filter, filter);
    assert_eq!(snap.filtered_devices().count(), 85);

    let view = dashboard
        .change_analytics_range(AnalyticsRange::Month)
        .await
        .unwrap();
    assert_eq!(view.range, AnalyticsRange::Month);
    assert_eq!(dashboard.snapshot().analytics.range, AnalyticsRange::Month);

    let removed = dashboard.clear_info_alerts().await.unwrap();
    assert_eq!(removed, 1);
    assert_eq!(dashboard.snapshot().metrics.warning_alerts, 11);

    dashboard.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_commands_apply_while_stopped() {
    let dashboard = dashboard();
    dashboard
        .set_filter(DeviceFilter::Kind(DeviceKind::AirSensor))
        .await
        .unwrap();
    assert_eq!(
        dashboard.snapshot().filter,
        DeviceFilter::Kind(DeviceKind::AirSensor)
    );
}

#[tokio::test(start_paused = true)]
async fn test_select_device() {
    let dashboard = dashboard();
    let device = dashboard.select_device("air_sensor_451").unwrap();
    assert_eq!(device.name, "Air Sensor 451");
    assert!(device.battery.is_some());

    let err = dashboard.select_device("nonexistent_999").unwrap_err();
    assert!(matches!(err, CoreError::DeviceNotFound { .. }));
}

// ── Streams ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_snapshot_stream_sees_each_tick() {
    let dashboard = dashboard();
    let mut stream = dashboard.snapshots();
    assert_eq!(stream.current().tick, 0);

    {
        let mut changed = tokio_test::task::spawn(stream.changed());
        assert_pending!(changed.poll());
    }

    dashboard.start().await.unwrap();
    let snap = stream.changed().await.unwrap();
    assert_eq!(snap.tick, 1);
    assert_eq!(stream.current().tick, 1);

    let mut ticks = dashboard.snapshots().into_stream();
    let first = ticks.next().await.unwrap();
    let second = ticks.next().await.unwrap();
    assert_eq!(second.tick, first.tick + 1);

    dashboard.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_stream_ends_when_dashboard_dropped() {
    let dashboard = dashboard();
    let mut stream = dashboard.snapshots();
    drop(dashboard);
    assert!(stream.changed().await.is_none());
    assert_eq!(stream.latest().tick, 0);
}
