//! Trait abstraction for the daemon client to enable mocking in tests

use crate::state::{
    Answer, AttendanceSummary, BackendInfo, Criterion, Event, FormDoc, LeaderboardRow,
    Registration, TeamAssignment,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::client::AttendanceResult;

/// Trait for daemon client operations, enabling mocking in tests
#[allow(dead_code)]
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DaemonClientTrait: Send + Sync {
    /// Check if the daemon is reachable
    async fn check_connection(&self) -> bool;

    /// Get daemon information
    async fn get_daemon_info(&mut self) -> Result<BackendInfo>;

    /// List events
    async fn list_events(&mut self, include_archived: bool) -> Result<Vec<Event>>;

    /// Get a single event
    async fn get_event(&mut self, event_id: &str) -> Result<Event>;

    /// Create a new event
    async fn create_event(
        &mut self,
        name: &str,
        description: &str,
        venue: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        capacity: u32,
    ) -> Result<String>;

    /// Update an existing event
    #[allow(clippy::too_many_arguments)]
    async fn update_event(
        &mut self,
        event_id: &str,
        name: &str,
        description: &str,
        venue: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        capacity: u32,
        status: &str,
    ) -> Result<()>;

    /// Delete an event
    async fn delete_event(&mut self, event_id: &str) -> Result<()>;

    /// List forms for an event
    async fn list_forms(&mut self, event_id: &str) -> Result<Vec<FormDoc>>;

    /// Get a single form
    async fn get_form(&mut self, form_id: &str) -> Result<FormDoc>;

    /// Save a form (create or replace)
    async fn save_form(&mut self, event_id: &str, form: &FormDoc) -> Result<String>;

    /// Delete a form
    async fn delete_form(&mut self, form_id: &str) -> Result<()>;

    /// Submit a completed form response
    async fn submit_form_response(&mut self, form_id: &str, answers: &[Answer]) -> Result<String>;

    /// List registrations for an event
    async fn list_registrations(&mut self, event_id: &str) -> Result<Vec<Registration>>;

    /// Record a check-in or check-out scan
    async fn record_attendance(
        &mut self,
        event_id: &str,
        attendee_code: &str,
        check_out: bool,
    ) -> Result<AttendanceResult>;

    /// Get attendance counts for an event
    async fn get_attendance_summary(&mut self, event_id: &str) -> Result<AttendanceSummary>;

    /// List teams assigned to a judge
    async fn list_judging_assignments(
        &mut self,
        event_id: &str,
        judge_id: &str,
    ) -> Result<Vec<TeamAssignment>>;

    /// List scoring criteria for an event
    async fn list_criteria(&mut self, event_id: &str) -> Result<Vec<Criterion>>;

    /// Submit a judge's scores for one team
    async fn submit_scores(
        &mut self,
        event_id: &str,
        judge_id: &str,
        team_id: &str,
        scores: &[(String, u32)],
    ) -> Result<()>;

    /// Get the current leaderboard
    async fn get_leaderboard(&mut self, event_id: &str) -> Result<Vec<LeaderboardRow>>;
}
