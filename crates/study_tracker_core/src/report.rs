//! crates/study_tracker_core/src/report.rs
//!
//! The report query service: loads study sessions for a window and folds them
//! into totals, averages and a per-day timeline.

use crate::domain::{ReportData, StudySession, TimelinePoint};
use crate::ports::{DatabaseService, PortResult};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

/// Loads the user's sessions in `[from, to]` and aggregates them.
///
/// An empty `subject_ids` slice means no subject filter.
pub async fn get_report_data(
    db: &dyn DatabaseService,
    user_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    subject_ids: &[Uuid],
) -> PortResult<ReportData> {
    let sessions = db.get_sessions_in_range(user_id, from, to, subject_ids).await?;
    debug!(
        "Aggregating {} sessions for user {} between {} and {}",
        sessions.len(),
        user_id,
        from,
        to
    );
    Ok(aggregate(&sessions))
}

/// Folds sessions into a `ReportData`. No sessions gives all zeros.
pub fn aggregate(sessions: &[StudySession]) -> ReportData {
    let mut days: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    let mut total_minutes = 0.0;

    for session in sessions {
        let minutes = f64::from(session.duration_minutes);
        total_minutes += minutes;
        let day = days.entry(session.started_at.date_naive()).or_default();
        day.0 += minutes;
        day.1 += 1;
    }

    ReportData {
        total_minutes,
        total_sessions: sessions.len() as u32,
        avg_focus: average_score(sessions.iter().filter_map(|s| s.focus_score)),
        avg_honesty: average_score(sessions.iter().filter_map(|s| s.honesty_score)),
        timeline: days
            .into_iter()
            .map(|(date, (minutes, sessions))| TimelinePoint { date, minutes, sessions })
            .collect(),
    }
}

fn average_score(scores: impl Iterator<Item = u8>) -> f64 {
    let (sum, count) = scores.fold((0u64, 0u64), |(sum, count), s| (sum + u64::from(s), count + 1));
    if count == 0 {
        return 0.0;
    }
    (sum as f64 / count as f64).clamp(0.0, 100.0)
}

/// Display values for the four summary cards on the reports page.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCards {
    /// Hours to one decimal place, e.g. `"12.5"`.
    pub total_hours: String,
    pub total_sessions: u32,
    pub avg_focus: u32,
    pub avg_honesty: u32,
}

impl From<&ReportData> for SummaryCards {
    fn from(data: &ReportData) -> Self {
        Self {
            total_hours: format_hours(data.total_minutes),
            total_sessions: data.total_sessions,
            avg_focus: data.avg_focus.clamp(0.0, 100.0).round() as u32,
            avg_honesty: data.avg_honesty.clamp(0.0, 100.0).round() as u32,
        }
    }
}

/// One decimal, with ties rounded away from zero (15 minutes shows as `0.3`).
fn format_hours(minutes: f64) -> String {
    let hours = minutes.max(0.0) / 60.0;
    format!("{:.1}", (hours * 10.0).round() / 10.0)
}
