//! QR badge parsing and the attendance scan state machine

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Version prefix every Summit badge payload carries
pub const BADGE_PREFIX: &str = "SMT1";

/// Parsed badge payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub event_id: String,
    pub attendee_code: String,
}

/// Why a raw scan could not be parsed into a badge
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BadgeError {
    #[error("badge payload is empty")]
    Empty,
    #[error("badge payload is malformed")]
    BadShape,
    #[error("unsupported badge version \"{0}\"")]
    WrongVersion(String),
    #[error("badge belongs to a different event")]
    WrongEvent,
}

/// Parse a raw scanner payload: `SMT1:<event id>:<attendee code>`
pub fn parse_badge(raw: &str) -> Result<Badge, BadgeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BadgeError::Empty);
    }
    let mut parts = trimmed.split(':');
    let version = parts.next().unwrap_or_default();
    let event_id = parts.next().ok_or(BadgeError::BadShape)?;
    let attendee_code = parts.next().ok_or(BadgeError::BadShape)?;
    if parts.next().is_some() {
        return Err(BadgeError::BadShape);
    }
    if version != BADGE_PREFIX {
        return Err(BadgeError::WrongVersion(version.to_string()));
    }
    if event_id.is_empty() || attendee_code.is_empty() {
        return Err(BadgeError::BadShape);
    }
    Ok(Badge {
        event_id: event_id.to_string(),
        attendee_code: attendee_code.to_string(),
    })
}

/// Scan direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    #[default]
    CheckIn,
    CheckOut,
}

impl ScanMode {
    pub fn toggle(&mut self) {
        *self = match self {
            Self::CheckIn => Self::CheckOut,
            Self::CheckOut => Self::CheckIn,
        };
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CheckIn => "Check-in",
            Self::CheckOut => "Check-out",
        }
    }
}

/// Result of one scan, after the backend lookup
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    Accepted {
        name: String,
        at: Option<DateTime<Utc>>,
    },
    AlreadyRecorded {
        name: String,
    },
    NotRegistered {
        code: String,
    },
    NotCheckedIn {
        code: String,
    },
    BadBadge(BadgeError),
}

/// Per-session scan tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanTally {
    pub accepted: u32,
    pub duplicates: u32,
    pub rejected: u32,
}

/// Keyboard-wedge scan loop: characters accumulate in a buffer, Enter
/// submits, the outcome is shown until the next scan starts.
#[derive(Debug, Clone, Default)]
pub struct ScanMachine {
    pub mode: ScanMode,
    pub buffer: String,
    pub last: Option<ScanOutcome>,
    pub tally: ScanTally,
}

impl ScanMachine {
    pub fn push_char(&mut self, c: char) {
        // A new scan replaces the previous outcome display
        if self.buffer.is_empty() {
            self.last = None;
        }
        self.buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    /// Drain the buffer for submission; None when nothing was scanned
    pub fn take_scan(&mut self) -> Option<String> {
        let raw = self.buffer.trim().to_string();
        self.buffer.clear();
        if raw.is_empty() {
            None
        } else {
            Some(raw)
        }
    }

    /// Record the outcome of the submitted scan
    pub fn record(&mut self, outcome: ScanOutcome) {
        match &outcome {
            ScanOutcome::Accepted { .. } => self.tally.accepted += 1,
            ScanOutcome::AlreadyRecorded { .. } => self.tally.duplicates += 1,
            ScanOutcome::NotRegistered { .. }
            | ScanOutcome::NotCheckedIn { .. }
            | ScanOutcome::BadBadge(_) => self.tally.rejected += 1,
        }
        self.last = Some(outcome);
    }

    /// Reset buffer, outcome, and tallies (switching events)
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.last = None;
        self.tally = ScanTally::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod badge_parsing {
        use super::*;

        #[test]
        fn test_well_formed_badge() {
            let badge = parse_badge("SMT1:ev-42:att-007").unwrap();
            assert_eq!(badge.event_id, "ev-42");
            assert_eq!(badge.attendee_code, "att-007");
        }

        #[test]
        fn test_surrounding_whitespace_tolerated() {
            let badge = parse_badge("  SMT1:ev-42:att-007\n").unwrap();
            assert_eq!(badge.attendee_code, "att-007");
        }

        #[test]
        fn test_empty_payload() {
            assert_eq!(parse_badge("   "), Err(BadgeError::Empty));
        }

        #[test]
        fn test_missing_segments() {
            assert_eq!(parse_badge("SMT1:ev-42"), Err(BadgeError::BadShape));
            assert_eq!(parse_badge("SMT1"), Err(BadgeError::BadShape));
        }

        #[test]
        fn test_extra_segments_rejected() {
            assert_eq!(
                parse_badge("SMT1:ev-42:att-007:extra"),
                Err(BadgeError::BadShape)
            );
        }

        #[test]
        fn test_blank_segments_rejected() {
            assert_eq!(parse_badge("SMT1::att-007"), Err(BadgeError::BadShape));
            assert_eq!(parse_badge("SMT1:ev-42:"), Err(BadgeError::BadShape));
        }

        #[test]
        fn test_wrong_version() {
            assert_eq!(
                parse_badge("SMT9:ev-42:att-007"),
                Err(BadgeError::WrongVersion("SMT9".into()))
            );
        }
    }

    mod scan_machine {
        use super::*;

        fn type_scan(machine: &mut ScanMachine, payload: &str) {
            for c in payload.chars() {
                machine.push_char(c);
            }
        }

        #[test]
        fn test_take_scan_drains_buffer() {
            let mut machine = ScanMachine::default();
            type_scan(&mut machine, "SMT1:ev:att");
            assert_eq!(machine.take_scan().as_deref(), Some("SMT1:ev:att"));
            assert!(machine.buffer.is_empty());
            assert_eq!(machine.take_scan(), None);
        }

        #[test]
        fn test_backspace_edits_buffer() {
            let mut machine = ScanMachine::default();
            type_scan(&mut machine, "ab");
            machine.backspace();
            assert_eq!(machine.buffer, "a");
        }

        #[test]
        fn test_new_scan_clears_last_outcome() {
            let mut machine = ScanMachine::default();
            machine.record(ScanOutcome::NotRegistered { code: "x".into() });
            assert!(machine.last.is_some());
            machine.push_char('S');
            assert!(machine.last.is_none());
        }

        #[test]
        fn test_tally_counts_by_outcome() {
            let mut machine = ScanMachine::default();
            machine.record(ScanOutcome::Accepted {
                name: "Ada".into(),
                at: None,
            });
            machine.record(ScanOutcome::AlreadyRecorded { name: "Ada".into() });
            machine.record(ScanOutcome::BadBadge(BadgeError::BadShape));
            machine.record(ScanOutcome::NotRegistered { code: "y".into() });
            machine.record(ScanOutcome::NotCheckedIn { code: "z".into() });
            assert_eq!(machine.tally.accepted, 1);
            assert_eq!(machine.tally.duplicates, 1);
            assert_eq!(machine.tally.rejected, 3);
        }

        #[test]
        fn test_reset_clears_everything() {
            let mut machine = ScanMachine::default();
            type_scan(&mut machine, "abc");
            machine.record(ScanOutcome::Accepted {
                name: "Ada".into(),
                at: None,
            });
            machine.reset();
            assert!(machine.buffer.is_empty());
            assert!(machine.last.is_none());
            assert_eq!(machine.tally, ScanTally::default());
        }

        #[test]
        fn test_mode_toggle() {
            let mut mode = ScanMode::default();
            assert_eq!(mode, ScanMode::CheckIn);
            mode.toggle();
            assert_eq!(mode, ScanMode::CheckOut);
            assert_eq!(mode.label(), "Check-out");
        }
    }
}
