use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use vitals_cell::models::{AvgBp, Vital};
use vitals_cell::services::rollup::{recent_entries, summarize, trend_points};

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap() + Duration::days(n)
}

fn entry(n: i64, systolic: Option<i32>, diastolic: Option<i32>) -> Vital {
    Vital {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        recorded_at: day(n),
        systolic_bp: systolic,
        diastolic_bp: diastolic,
        heart_rate: None,
        temperature: None,
        glucose: None,
        notes: None,
        created_at: day(n),
    }
}

#[test]
fn empty_window_gives_empty_summary() {
    let summary = summarize(&[], &[], 0);
    assert!(summary.avg_bp.is_none());
    assert!(summary.max_hr.is_none());
    assert!(summary.temp_trend.is_none());
    assert!(summary.last_entry_at.is_none());
    assert_eq!(summary.entries_this_week, 0);
    assert_eq!(summary.flagged_entries, 0);
}

#[test]
fn averages_round_to_one_decimal() {
    let rows = vec![
        entry(0, Some(118), Some(79)),
        entry(1, Some(121), Some(82)),
        entry(2, Some(125), Some(80)),
    ];
    let summary = summarize(&rows, &[], 3);
    assert_eq!(
        summary.avg_bp,
        Some(AvgBp {
            systolic: 121.3,
            diastolic: 80.3
        })
    );
    assert_eq!(summary.entries_this_week, 3);
    assert_eq!(summary.last_entry_at, Some(day(2)));
}

#[test]
fn bp_average_needs_both_sides() {
    // Only systolic readings recorded: no average is reported.
    let rows = vec![entry(0, Some(120), None), entry(1, Some(130), None)];
    assert!(summarize(&rows, &[], 2).avg_bp.is_none());
}

#[test]
fn max_heart_rate_and_avg_temp() {
    let mut a = entry(0, None, None);
    a.heart_rate = Some(72);
    a.temperature = Some(98.6);
    let mut b = entry(1, None, None);
    b.heart_rate = Some(91);
    b.temperature = Some(99.0);

    let summary = summarize(&[a, b], &[], 2);
    assert_eq!(summary.max_hr, Some(91));
    assert_eq!(summary.avg_temp, Some(98.8));
}

#[test]
fn temperature_trend_compares_windows() {
    let mut warm = entry(0, None, None);
    warm.temperature = Some(99.2);

    let up = summarize(&[warm.clone()], &[98.4, 98.6], 1);
    assert_eq!(up.temp_trend.as_deref(), Some("up"));

    let down = summarize(&[warm], &[99.8, 99.9], 1);
    assert_eq!(down.temp_trend.as_deref(), Some("down"));
}

#[test]
fn trend_needs_both_windows() {
    let mut warm = entry(0, None, None);
    warm.temperature = Some(99.2);
    assert!(summarize(&[warm], &[], 1).temp_trend.is_none());

    let cold_window = entry(0, Some(120), Some(80));
    assert!(summarize(&[cold_window], &[98.6], 1).temp_trend.is_none());
}

#[test]
fn flags_hypertensive_and_febrile_entries() {
    let high_bp = entry(0, Some(150), Some(95));
    let mut fever = entry(1, None, None);
    fever.temperature = Some(101.2);
    let mut fine = entry(2, Some(118), Some(76));
    fine.temperature = Some(98.6);

    let summary = summarize(&[high_bp, fever, fine], &[], 3);
    assert_eq!(summary.flagged_entries, 2);
}

#[test]
fn boundary_values_are_flagged() {
    let at_threshold_bp = entry(0, Some(140), Some(90));
    let mut at_threshold_temp = entry(1, None, None);
    at_threshold_temp.temperature = Some(100.4);

    let summary = summarize(&[at_threshold_bp, at_threshold_temp], &[], 2);
    assert_eq!(summary.flagged_entries, 2);
}

#[test]
fn rolling_mean_tracks_last_seven_readings() {
    let rows: Vec<Vital> = (0..9)
        .map(|n| entry(n, Some(100 + n as i32), Some(80)))
        .collect();

    let points = trend_points(&rows);
    assert_eq!(points.len(), 9);

    // First point: window of one.
    assert_eq!(points[0].systolic_roll7, Some(100.0));
    // Seventh point: mean of 100..=106.
    assert_eq!(points[6].systolic_roll7, Some(103.0));
    // Ninth point: window slides to 102..=108.
    assert_eq!(points[8].systolic_roll7, Some(105.0));
}

#[test]
fn missing_systolic_does_not_advance_the_window() {
    let rows = vec![
        entry(0, Some(100), Some(80)),
        entry(1, None, Some(80)),
        entry(2, Some(110), Some(80)),
    ];

    let points = trend_points(&rows);
    assert_eq!(points[1].systolic_roll7, None);
    // The gap contributes nothing: mean of {100, 110}.
    assert_eq!(points[2].systolic_roll7, Some(105.0));
}

#[test]
fn recent_entries_preserve_order_and_fields() {
    let rows = vec![entry(2, Some(122), Some(81)), entry(1, Some(119), Some(78))];
    let items = recent_entries(&rows);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].date, day(2));
    assert_eq!(items[0].systolic, Some(122));
    assert_eq!(items[1].diastolic, Some(78));
}
