//! gRPC client for communicating with the Summit daemon
//!
//! This module provides a client for communicating with the Summit daemon
//! via gRPC using the generated proto types.

use crate::state::{
    Answer, AnswerValue, AttendanceSummary, BackendInfo, BranchRule, Criterion, Event, FormDoc,
    FormMeta, LeaderboardRow, Page, PageTarget, Question, QuestionKind, Registration,
    TeamAssignment,
};
use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;

// Include the generated proto types
pub mod proto {
    tonic::include_proto!("summit");
}

use proto::summit_daemon_client::SummitDaemonClient;

/// Default daemon address
const DEFAULT_ADDRESS: &str = "http://127.0.0.1:50061";

/// Result of recording one attendance scan
#[derive(Debug, Clone)]
pub struct AttendanceResult {
    /// One of: accepted, duplicate, not_registered, not_checked_in
    pub status: String,
    pub attendee_name: String,
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Client for communicating with the Summit daemon
pub struct DaemonClient {
    /// The gRPC client
    client: Option<SummitDaemonClient<tonic::transport::Channel>>,
    /// The daemon address
    address: String,
}

impl DaemonClient {
    /// Create a new daemon client
    pub async fn new() -> Result<Self> {
        let address =
            std::env::var("SUMMIT_DAEMON_ADDRESS").unwrap_or_else(|_| DEFAULT_ADDRESS.to_string());

        // Try to connect to the daemon
        let client = match SummitDaemonClient::connect(address.clone()).await {
            Ok(client) => Some(client),
            Err(_) => None,
        };

        Ok(Self { client, address })
    }

    /// Ensure connection is established
    async fn ensure_connected(
        &mut self,
    ) -> Result<&mut SummitDaemonClient<tonic::transport::Channel>> {
        if self.client.is_none() {
            self.client = Some(
                SummitDaemonClient::connect(self.address.clone())
                    .await
                    .map_err(|e| anyhow!("Failed to connect to daemon: {}", e))?,
            );
        }
        self.client
            .as_mut()
            .ok_or_else(|| anyhow!("Client not connected"))
    }

    /// Check if the daemon is reachable
    pub async fn check_connection(&self) -> bool {
        self.client.is_some()
    }

    /// Get daemon information
    pub async fn get_daemon_info(&mut self) -> Result<BackendInfo> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::GetDaemonInfoRequest {});

        let response = client
            .get_daemon_info(request)
            .await
            .map_err(|e| anyhow!("Failed to get daemon info: {}", e))?;

        let inner = response.into_inner();
        Ok(BackendInfo {
            version: inner.version,
            uptime_seconds: inner.uptime_seconds,
            event_count: inner.event_count,
        })
    }

    /// List events
    pub async fn list_events(&mut self, include_archived: bool) -> Result<Vec<Event>> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::ListEventsRequest { include_archived });

        let response = client
            .list_events(request)
            .await
            .map_err(|e| anyhow!("Failed to list events: {}", e))?;

        Ok(response
            .into_inner()
            .events
            .into_iter()
            .map(event_from_proto)
            .collect())
    }

    /// Get a single event
    pub async fn get_event(&mut self, event_id: &str) -> Result<Event> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::GetEventRequest {
            event_id: event_id.to_string(),
        });

        let response = client
            .get_event(request)
            .await
            .map_err(|e| anyhow!("Failed to get event: {}", e))?;

        response
            .into_inner()
            .event
            .map(event_from_proto)
            .ok_or_else(|| anyhow!("Event not found"))
    }

    /// Create a new event
    pub async fn create_event(
        &mut self,
        name: &str,
        description: &str,
        venue: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        capacity: u32,
    ) -> Result<String> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::CreateEventRequest {
            name: name.to_string(),
            description: description.to_string(),
            venue: venue.to_string(),
            starts_at: starts_at.to_rfc3339(),
            ends_at: ends_at.to_rfc3339(),
            capacity,
        });

        let response = client
            .create_event(request)
            .await
            .map_err(|e| anyhow!("Failed to create event: {}", e))?;

        Ok(response.into_inner().event_id)
    }

    /// Update an existing event
    #[allow(clippy::too_many_arguments)]
    pub async fn update_event(
        &mut self,
        event_id: &str,
        name: &str,
        description: &str,
        venue: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        capacity: u32,
        status: &str,
    ) -> Result<()> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::UpdateEventRequest {
            event_id: event_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            venue: venue.to_string(),
            starts_at: starts_at.to_rfc3339(),
            ends_at: ends_at.to_rfc3339(),
            capacity,
            status: status.to_string(),
        });

        client
            .update_event(request)
            .await
            .map_err(|e| anyhow!("Failed to update event: {}", e))?;

        Ok(())
    }

    /// Delete an event
    pub async fn delete_event(&mut self, event_id: &str) -> Result<()> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::DeleteEventRequest {
            event_id: event_id.to_string(),
        });

        client
            .delete_event(request)
            .await
            .map_err(|e| anyhow!("Failed to delete event: {}", e))?;

        Ok(())
    }

    /// List forms for an event
    pub async fn list_forms(&mut self, event_id: &str) -> Result<Vec<FormDoc>> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::ListFormsRequest {
            event_id: event_id.to_string(),
        });

        let response = client
            .list_forms(request)
            .await
            .map_err(|e| anyhow!("Failed to list forms: {}", e))?;

        Ok(response
            .into_inner()
            .forms
            .into_iter()
            .map(form_from_proto)
            .collect())
    }

    /// Get a single form
    pub async fn get_form(&mut self, form_id: &str) -> Result<FormDoc> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::GetFormRequest {
            form_id: form_id.to_string(),
        });

        let response = client
            .get_form(request)
            .await
            .map_err(|e| anyhow!("Failed to get form: {}", e))?;

        response
            .into_inner()
            .form
            .map(form_from_proto)
            .ok_or_else(|| anyhow!("Form not found"))
    }

    /// Save a form (create or replace)
    pub async fn save_form(&mut self, event_id: &str, form: &FormDoc) -> Result<String> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::SaveFormRequest {
            event_id: event_id.to_string(),
            form: Some(form_to_proto(form)),
        });

        let response = client
            .save_form(request)
            .await
            .map_err(|e| anyhow!("Failed to save form: {}", e))?;

        Ok(response.into_inner().form_id)
    }

    /// Delete a form
    pub async fn delete_form(&mut self, form_id: &str) -> Result<()> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::DeleteFormRequest {
            form_id: form_id.to_string(),
        });

        client
            .delete_form(request)
            .await
            .map_err(|e| anyhow!("Failed to delete form: {}", e))?;

        Ok(())
    }

    /// Submit a completed form response
    pub async fn submit_form_response(
        &mut self,
        form_id: &str,
        answers: &[Answer],
    ) -> Result<String> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::SubmitFormResponseRequest {
            form_id: form_id.to_string(),
            answers: answers.iter().map(answer_to_proto).collect(),
        });

        let response = client
            .submit_form_response(request)
            .await
            .map_err(|e| anyhow!("Failed to submit response: {}", e))?;

        Ok(response.into_inner().response_id)
    }

    /// List registrations for an event
    pub async fn list_registrations(&mut self, event_id: &str) -> Result<Vec<Registration>> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::ListRegistrationsRequest {
            event_id: event_id.to_string(),
        });

        let response = client
            .list_registrations(request)
            .await
            .map_err(|e| anyhow!("Failed to list registrations: {}", e))?;

        Ok(response
            .into_inner()
            .registrations
            .into_iter()
            .map(|r| Registration {
                attendee_code: r.attendee_code,
                name: r.name,
                email: r.email,
                checked_in: r.checked_in,
                checked_in_at: parse_optional_timestamp(&r.checked_in_at),
            })
            .collect())
    }

    /// Record a check-in or check-out scan
    pub async fn record_attendance(
        &mut self,
        event_id: &str,
        attendee_code: &str,
        check_out: bool,
    ) -> Result<AttendanceResult> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::RecordAttendanceRequest {
            event_id: event_id.to_string(),
            attendee_code: attendee_code.to_string(),
            check_out,
        });

        let response = client
            .record_attendance(request)
            .await
            .map_err(|e| anyhow!("Failed to record attendance: {}", e))?;

        let inner = response.into_inner();
        Ok(AttendanceResult {
            status: inner.status,
            attendee_name: inner.attendee_name,
            recorded_at: parse_optional_timestamp(&inner.recorded_at),
        })
    }

    /// Get attendance counts for an event
    pub async fn get_attendance_summary(&mut self, event_id: &str) -> Result<AttendanceSummary> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::GetAttendanceSummaryRequest {
            event_id: event_id.to_string(),
        });

        let response = client
            .get_attendance_summary(request)
            .await
            .map_err(|e| anyhow!("Failed to get attendance summary: {}", e))?;

        let inner = response.into_inner();
        Ok(AttendanceSummary {
            registered: inner.registered,
            checked_in: inner.checked_in,
            checked_out: inner.checked_out,
        })
    }

    /// List teams assigned to a judge
    pub async fn list_judging_assignments(
        &mut self,
        event_id: &str,
        judge_id: &str,
    ) -> Result<Vec<TeamAssignment>> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::ListJudgingAssignmentsRequest {
            event_id: event_id.to_string(),
            judge_id: judge_id.to_string(),
        });

        let response = client
            .list_judging_assignments(request)
            .await
            .map_err(|e| anyhow!("Failed to list judging assignments: {}", e))?;

        Ok(response
            .into_inner()
            .teams
            .into_iter()
            .map(|t| TeamAssignment {
                team_id: t.team_id,
                team_name: t.team_name,
                project_title: t.project_title,
                scored: t.scored,
            })
            .collect())
    }

    /// List scoring criteria for an event
    pub async fn list_criteria(&mut self, event_id: &str) -> Result<Vec<Criterion>> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::ListCriteriaRequest {
            event_id: event_id.to_string(),
        });

        let response = client
            .list_criteria(request)
            .await
            .map_err(|e| anyhow!("Failed to list criteria: {}", e))?;

        Ok(response
            .into_inner()
            .criteria
            .into_iter()
            .map(|c| Criterion {
                id: c.id,
                label: c.label,
                max_score: c.max_score,
                weight: c.weight,
            })
            .collect())
    }

    /// Submit a judge's scores for one team
    pub async fn submit_scores(
        &mut self,
        event_id: &str,
        judge_id: &str,
        team_id: &str,
        scores: &[(String, u32)],
    ) -> Result<()> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::SubmitScoresRequest {
            event_id: event_id.to_string(),
            judge_id: judge_id.to_string(),
            team_id: team_id.to_string(),
            scores: scores
                .iter()
                .map(|(criterion_id, score)| proto::ScoreEntry {
                    criterion_id: criterion_id.clone(),
                    score: *score,
                })
                .collect(),
        });

        client
            .submit_scores(request)
            .await
            .map_err(|e| anyhow!("Failed to submit scores: {}", e))?;

        Ok(())
    }

    /// Get the current leaderboard
    pub async fn get_leaderboard(&mut self, event_id: &str) -> Result<Vec<LeaderboardRow>> {
        let client = self.ensure_connected().await?;

        let request = tonic::Request::new(proto::GetLeaderboardRequest {
            event_id: event_id.to_string(),
        });

        let response = client
            .get_leaderboard(request)
            .await
            .map_err(|e| anyhow!("Failed to get leaderboard: {}", e))?;

        Ok(response
            .into_inner()
            .rows
            .into_iter()
            .map(|r| LeaderboardRow {
                rank: r.rank,
                team_name: r.team_name,
                weighted_score: r.weighted_score,
                judge_count: r.judge_count,
            })
            .collect())
    }
}

/// Parse an ISO timestamp string to DateTime<Utc>
fn parse_timestamp(s: &str) -> DateTime<Utc> {
    if s.is_empty() {
        return Utc::now();
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_optional_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

fn parse_optional_date(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn event_from_proto(e: proto::EventRecord) -> Event {
    Event {
        id: e.id,
        name: e.name,
        description: e.description,
        venue: e.venue,
        starts_at: parse_timestamp(&e.starts_at),
        ends_at: parse_timestamp(&e.ends_at),
        capacity: e.capacity,
        status: e.status,
        registered_count: e.registered_count,
        checked_in_count: e.checked_in_count,
    }
}

fn question_from_proto(q: proto::QuestionRecord) -> Question {
    use proto::question_record::Kind;

    let kind = match q.kind {
        Some(Kind::Essay(k)) => QuestionKind::Essay {
            max_length: match k.max_length {
                0 => None,
                n => Some(n as usize),
            },
        },
        Some(Kind::MultipleChoice(k)) => QuestionKind::MultipleChoice { choices: k.choices },
        Some(Kind::Date(k)) => QuestionKind::Date {
            min_date: parse_optional_date(&k.min_date),
            max_date: parse_optional_date(&k.max_date),
        },
        Some(Kind::Numeric(k)) => QuestionKind::Number {
            is_integer: k.is_integer,
            min: k.min,
            max: k.max,
        },
        Some(Kind::Upload(k)) => QuestionKind::Upload {
            allowed_extensions: k.allowed_extensions,
            max_size_mb: match k.max_size_mb {
                0 => None,
                n => Some(n),
            },
        },
        None => QuestionKind::Essay { max_length: None },
    };

    Question {
        id: q.id,
        number: q.number,
        prompt: q.prompt,
        help_text: if q.help_text.is_empty() {
            None
        } else {
            Some(q.help_text)
        },
        mandatory: q.mandatory,
        kind,
    }
}

fn question_to_proto(q: &Question) -> proto::QuestionRecord {
    use proto::question_record::Kind;

    let kind = match &q.kind {
        QuestionKind::Essay { max_length } => Kind::Essay(proto::EssayKind {
            max_length: max_length.unwrap_or(0) as u32,
        }),
        QuestionKind::MultipleChoice { choices } => Kind::MultipleChoice(proto::ChoiceKind {
            choices: choices.clone(),
        }),
        QuestionKind::Date { min_date, max_date } => Kind::Date(proto::DateKind {
            min_date: min_date.map(|d| d.to_string()).unwrap_or_default(),
            max_date: max_date.map(|d| d.to_string()).unwrap_or_default(),
        }),
        QuestionKind::Number {
            is_integer,
            min,
            max,
        } => Kind::Numeric(proto::NumberKind {
            is_integer: *is_integer,
            min: *min,
            max: *max,
        }),
        QuestionKind::Upload {
            allowed_extensions,
            max_size_mb,
        } => Kind::Upload(proto::UploadKind {
            allowed_extensions: allowed_extensions.clone(),
            max_size_mb: max_size_mb.unwrap_or(0),
        }),
    };

    proto::QuestionRecord {
        id: q.id.clone(),
        number: q.number,
        prompt: q.prompt.clone(),
        help_text: q.help_text.clone().unwrap_or_default(),
        mandatory: q.mandatory,
        kind: Some(kind),
    }
}

fn form_from_proto(f: proto::FormRecord) -> FormDoc {
    let pages = f
        .pages
        .into_iter()
        .map(|p| {
            let branches: HashMap<String, BranchRule> = p
                .branches
                .into_iter()
                .map(|b| {
                    let target = if b.to_submit {
                        PageTarget::Submit
                    } else {
                        PageTarget::Page(b.target_page as usize)
                    };
                    (
                        b.question_id,
                        BranchRule {
                            assert_on: b.assert_on,
                            target,
                        },
                    )
                })
                .collect();
            Page {
                title: p.title,
                description: p.description,
                questions: p.questions.into_iter().map(question_from_proto).collect(),
                branches,
            }
        })
        .collect();

    FormDoc {
        id: f.id,
        title: f.title,
        description: f.description,
        pages,
        meta: FormMeta {
            sheet_id: if f.sheet_id.is_empty() {
                None
            } else {
                Some(f.sheet_id)
            },
            drive_folder: if f.drive_folder.is_empty() {
                None
            } else {
                Some(f.drive_folder)
            },
        },
        updated_at: parse_optional_timestamp(&f.updated_at),
    }
}

fn form_to_proto(form: &FormDoc) -> proto::FormRecord {
    proto::FormRecord {
        id: form.id.clone(),
        title: form.title.clone(),
        description: form.description.clone(),
        pages: form
            .pages
            .iter()
            .map(|p| proto::PageRecord {
                title: p.title.clone(),
                description: p.description.clone(),
                questions: p.questions.iter().map(question_to_proto).collect(),
                branches: p
                    .branches
                    .iter()
                    .map(|(question_id, rule)| proto::BranchRecord {
                        question_id: question_id.clone(),
                        assert_on: rule.assert_on.clone(),
                        target_page: match rule.target {
                            PageTarget::Page(idx) => idx as u32,
                            PageTarget::Submit => 0,
                        },
                        to_submit: rule.target == PageTarget::Submit,
                    })
                    .collect(),
            })
            .collect(),
        sheet_id: form.meta.sheet_id.clone().unwrap_or_default(),
        drive_folder: form.meta.drive_folder.clone().unwrap_or_default(),
        updated_at: form
            .updated_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default(),
    }
}

fn answer_to_proto(answer: &Answer) -> proto::AnswerRecord {
    use proto::answer_record::Value;

    let value = match &answer.value {
        AnswerValue::Text(s) => Value::Text(s.clone()),
        AnswerValue::Choice(s) => Value::Choice(s.clone()),
        AnswerValue::Date(d) => Value::Date(d.to_string()),
        AnswerValue::Number(n) => Value::Number(*n),
        AnswerValue::File { name, size_bytes } => Value::File(proto::FileAnswer {
            name: name.clone(),
            size_bytes: *size_bytes,
        }),
    };

    proto::AnswerRecord {
        question_id: answer.question_id.clone(),
        value: Some(value),
    }
}
