//! services/api/src/web/reports.rs
//!
//! The reports page and the dashboard landing page.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use study_tracker_core::{Period, ReportData, SummaryCards, TimelinePoint};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::{client::UserClient, state::AppState, subjects::SubjectDto};

#[derive(Serialize, ToSchema)]
pub struct TimelinePointDto {
    pub date: NaiveDate,
    pub minutes: f64,
    pub sessions: u32,
}

impl From<TimelinePoint> for TimelinePointDto {
    fn from(p: TimelinePoint) -> Self {
        Self {
            date: p.date,
            minutes: p.minutes,
            sessions: p.sessions,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ReportSummary {
    pub total_minutes: f64,
    pub total_sessions: u32,
    pub avg_focus: f64,
    pub avg_honesty: f64,
    pub timeline: Vec<TimelinePointDto>,
}

impl From<ReportData> for ReportSummary {
    fn from(d: ReportData) -> Self {
        Self {
            total_minutes: d.total_minutes,
            total_sessions: d.total_sessions,
            avg_focus: d.avg_focus,
            avg_honesty: d.avg_honesty,
            timeline: d.timeline.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SummaryCardsDto {
    pub total_hours: String,
    pub total_sessions: u32,
    pub avg_focus: u32,
    pub avg_honesty: u32,
}

impl From<SummaryCards> for SummaryCardsDto {
    fn from(c: SummaryCards) -> Self {
        Self {
            total_hours: c.total_hours,
            total_sessions: c.total_sessions,
            avg_focus: c.avg_focus,
            avg_honesty: c.avg_honesty,
        }
    }
}

/// A subject as offered by the report filters.
#[derive(Serialize, ToSchema)]
pub struct SubjectOption {
    pub id: Uuid,
    pub name: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReportView {
    pub period: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub subject_ids: Vec<Uuid>,
    pub subjects: Vec<SubjectOption>,
    pub summary: ReportSummary,
    pub cards: SummaryCardsDto,
}

#[derive(Serialize, ToSchema)]
pub struct DashboardView {
    pub user_id: Uuid,
    pub week: SummaryCardsDto,
    pub subjects: Vec<SubjectDto>,
}

/// The report filters as read from the query string.
#[derive(Debug, PartialEq)]
pub struct ReportFilters {
    pub period: Period,
    pub subject_ids: Vec<Uuid>,
}

impl ReportFilters {
    /// `period` counts only when given once; `subject` may repeat and blank values
    /// are skipped.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, ApiError> {
        let periods: Vec<&str> = pairs
            .iter()
            .filter(|(k, _)| k == "period")
            .map(|(_, v)| v.as_str())
            .collect();
        let period = match periods.as_slice() {
            [single] => Period::from_query(Some(*single)),
            _ => Period::default(),
        };

        let subject_ids = pairs
            .iter()
            .filter(|(k, v)| k == "subject" && !v.is_empty())
            .map(|(_, v)| {
                Uuid::parse_str(v)
                    .map_err(|_| ApiError::BadRequest(format!("'{}' is not a valid subject id", v)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            period,
            subject_ids,
        })
    }
}

/// Aggregated study report for a period, optionally filtered by subject.
#[utoipa::path(
    get,
    path = "/reports",
    params(
        ("period" = Option<String>, Query, description = "week (default), month, year or all"),
        ("subject" = Option<Vec<Uuid>>, Query, description = "Repeatable subject filter")
    ),
    responses(
        (status = 200, description = "The report", body = ReportView),
        (status = 400, description = "Malformed subject id"),
        (status = 307, description = "Not signed in; redirected to sign-in")
    )
)]
pub async fn reports_handler(
    State(state): State<Arc<AppState>>,
    client: UserClient,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ReportView>, ApiError> {
    let filters = ReportFilters::from_pairs(&pairs)?;
    let range = filters
        .period
        .range(Utc::now(), state.config.week_window);

    let data = client.report(range.from, range.to, &filters.subject_ids).await?;
    let subjects = client
        .subjects()
        .await?
        .into_iter()
        .map(|s| SubjectOption {
            id: s.id,
            name: s.name,
        })
        .collect();

    Ok(Json(ReportView {
        period: filters.period.to_string(),
        from: range.from,
        to: range.to,
        subject_ids: filters.subject_ids,
        subjects,
        cards: SummaryCards::from(&data).into(),
        summary: data.into(),
    }))
}

/// Landing page for signed-in users: this week's cards and the subject list.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = DashboardView),
        (status = 307, description = "Not signed in; redirected to sign-in")
    )
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    client: UserClient,
) -> Result<Json<DashboardView>, ApiError> {
    let range = Period::Week.range(Utc::now(), state.config.week_window);
    let data = client.report(range.from, range.to, &[]).await?;
    let subjects = client.subjects().await?;

    Ok(Json(DashboardView {
        user_id: client.user_id(),
        week: SummaryCards::from(&data).into(),
        subjects: subjects.into_iter().map(SubjectDto::from).collect(),
    }))
}
