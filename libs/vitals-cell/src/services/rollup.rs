// libs/vitals-cell/src/services/rollup.rs
//
// Pure rollup math over fetched vitals rows. Kept free of storage so the
// dashboards' numbers are testable in isolation.

use crate::models::{AvgBp, RecentEntry, SummaryResponse, TrendPoint, Vital};

/// Entries considered clinically notable on the dashboard.
const FLAG_SYSTOLIC: i32 = 140;
const FLAG_TEMP_F: f64 = 100.4;

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Summarize one window of vitals. `prev_temps` holds the temperatures of
/// the preceding window of equal length (empty when the range is `all`,
/// which carries no trend); `entries_this_week` is counted separately
/// because it always covers the trailing seven days regardless of range.
pub fn summarize(
    rows: &[Vital],
    prev_temps: &[f64],
    entries_this_week: i64,
) -> SummaryResponse {
    if rows.is_empty() {
        return SummaryResponse::empty();
    }

    let systolics: Vec<f64> = rows.iter().filter_map(|v| v.systolic_bp).map(f64::from).collect();
    let diastolics: Vec<f64> = rows.iter().filter_map(|v| v.diastolic_bp).map(f64::from).collect();
    let heart_rates: Vec<i32> = rows.iter().filter_map(|v| v.heart_rate).collect();
    let temperatures: Vec<f64> = rows.iter().filter_map(|v| v.temperature).collect();

    let avg_bp = match (mean(&systolics), mean(&diastolics)) {
        (Some(s), Some(d)) => Some(AvgBp {
            systolic: round1(s),
            diastolic: round1(d),
        }),
        _ => None,
    };

    let max_hr = heart_rates.iter().max().copied();
    let avg_temp = mean(&temperatures).map(round1);

    let temp_trend = match (mean(prev_temps), mean(&temperatures)) {
        (Some(prev), Some(curr)) => Some(if curr > prev { "up" } else { "down" }.to_string()),
        _ => None,
    };

    let last_entry_at = rows.iter().map(|v| v.recorded_at).max();

    let flagged_entries = rows
        .iter()
        .filter(|v| {
            v.systolic_bp.is_some_and(|s| s >= FLAG_SYSTOLIC)
                || v.temperature.is_some_and(|t| t >= FLAG_TEMP_F)
        })
        .count() as i64;

    SummaryResponse {
        avg_bp,
        max_hr,
        avg_temp,
        temp_trend,
        entries_this_week,
        last_entry_at,
        flagged_entries,
    }
}

/// Chart points in recorded order with a rolling mean over the last seven
/// present systolic readings. Rows without a systolic value carry no
/// rolling figure and do not advance the window.
pub fn trend_points(rows: &[Vital]) -> Vec<TrendPoint> {
    let mut window: Vec<f64> = Vec::new();
    let mut points = Vec::with_capacity(rows.len());

    for v in rows {
        let systolic_roll7 = match v.systolic_bp {
            Some(s) => {
                window.push(f64::from(s));
                if window.len() > 7 {
                    window.remove(0);
                }
                mean(&window).map(round1)
            }
            None => None,
        };

        points.push(TrendPoint {
            date: v.recorded_at,
            systolic: v.systolic_bp,
            diastolic: v.diastolic_bp,
            heart_rate: v.heart_rate,
            temperature: v.temperature,
            systolic_roll7,
        });
    }

    points
}

pub fn recent_entries(rows: &[Vital]) -> Vec<RecentEntry> {
    rows.iter()
        .map(|v| RecentEntry {
            id: v.id,
            date: v.recorded_at,
            systolic: v.systolic_bp,
            diastolic: v.diastolic_bp,
            heart_rate: v.heart_rate,
            temperature: v.temperature,
            notes: v.notes.clone(),
        })
        .collect()
}
