//! crates/study_tracker_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

// Represents a user - used throughout app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub email: Option<String>,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

/// The fixed palette a subject's color is chosen from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectColor {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Pink,
}

impl SubjectColor {
    /// Palette order, as offered by the subject picker.
    pub const PALETTE: [SubjectColor; 8] = [
        SubjectColor::Red,
        SubjectColor::Orange,
        SubjectColor::Yellow,
        SubjectColor::Green,
        SubjectColor::Cyan,
        SubjectColor::Blue,
        SubjectColor::Purple,
        SubjectColor::Pink,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            SubjectColor::Red => "#ef4444",
            SubjectColor::Orange => "#f97316",
            SubjectColor::Yellow => "#eab308",
            SubjectColor::Green => "#22c55e",
            SubjectColor::Cyan => "#06b6d4",
            SubjectColor::Blue => "#3b82f6",
            SubjectColor::Purple => "#a855f7",
            SubjectColor::Pink => "#ec4899",
        }
    }

    /// Parses a palette hex value, case-insensitively.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        Self::PALETTE
            .into_iter()
            .find(|c| c.hex().eq_ignore_ascii_case(hex))
    }
}

impl Default for SubjectColor {
    fn default() -> Self {
        SubjectColor::PALETTE[4]
    }
}

/// A user-defined category used to tag study sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: SubjectColor,
}

/// A single logged block of study time.
#[derive(Debug, Clone)]
pub struct StudySession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub focus_score: Option<u8>,
    pub honesty_score: Option<u8>,
    pub notes: Option<String>,
}

/// The fields a caller supplies when logging a study session.
#[derive(Debug, Clone)]
pub struct NewStudySession {
    pub subject_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub focus_score: Option<u8>,
    pub honesty_score: Option<u8>,
    pub notes: Option<String>,
}

/// One day's worth of study in a report timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub minutes: f64,
    pub sessions: u32,
}

/// Aggregated totals for a set of study sessions. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportData {
    pub total_minutes: f64,
    pub total_sessions: u32,
    pub avg_focus: f64,
    pub avg_honesty: f64,
    pub timeline: Vec<TimelinePoint>,
}
