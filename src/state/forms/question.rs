//! Question model for dynamic forms

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type-specific constraints, tagged by question type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Free text, optionally length-limited
    Essay { max_length: Option<usize> },
    /// Pick one of a fixed list of choices
    MultipleChoice { choices: Vec<String> },
    /// Calendar date within an optional window
    Date {
        min_date: Option<NaiveDate>,
        max_date: Option<NaiveDate>,
    },
    /// Numeric answer, optionally integer-only and range-bound
    Number {
        is_integer: bool,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// File upload restricted by extension and size
    Upload {
        allowed_extensions: Vec<String>,
        max_size_mb: Option<u32>,
    },
}

impl QuestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Essay { .. } => "Essay",
            Self::MultipleChoice { .. } => "Multiple Choice",
            Self::Date { .. } => "Date",
            Self::Number { .. } => "Number",
            Self::Upload { .. } => "Upload",
        }
    }

    /// Cycle to the next kind with default constraints (used by the builder)
    pub fn next(&self) -> Self {
        match self {
            Self::Essay { .. } => Self::MultipleChoice {
                choices: Vec::new(),
            },
            Self::MultipleChoice { .. } => Self::Date {
                min_date: None,
                max_date: None,
            },
            Self::Date { .. } => Self::Number {
                is_integer: false,
                min: None,
                max: None,
            },
            Self::Number { .. } => Self::Upload {
                allowed_extensions: Vec::new(),
                max_size_mb: None,
            },
            Self::Upload { .. } => Self::Essay { max_length: None },
        }
    }
}

impl Default for QuestionKind {
    fn default() -> Self {
        Self::Essay { max_length: None }
    }
}

/// A single form question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    /// Global question number, unique and monotonic across all pages.
    /// Assigned by `FormDoc::renumber`; 0 until the question is placed.
    pub number: u32,
    pub prompt: String,
    pub help_text: Option<String>,
    pub mandatory: bool,
    pub kind: QuestionKind,
}

#[allow(dead_code)]
impl Question {
    pub fn new(prompt: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            number: 0,
            prompt: prompt.into(),
            help_text: None,
            mandatory: false,
            kind,
        }
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help_text = Some(help.into());
        self
    }
}

/// A collected answer value; the variant must match the question kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnswerValue {
    Text(String),
    Choice(String),
    Date(NaiveDate),
    Number(f64),
    File { name: String, size_bytes: u64 },
}

impl AnswerValue {
    /// Canonical string form, used for branch matching and display
    pub fn canonical(&self) -> String {
        match self {
            Self::Text(s) | Self::Choice(s) => s.clone(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Self::File { name, .. } => name.clone(),
        }
    }
}

/// An answer bound to its question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub value: AnswerValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod question_kind {
        use super::*;

        #[test]
        fn test_default_is_essay() {
            assert_eq!(QuestionKind::default(), QuestionKind::Essay { max_length: None });
        }

        #[test]
        fn test_next_cycles_through_all_kinds() {
            let mut kind = QuestionKind::default();
            let mut seen = vec![kind.label()];
            for _ in 0..4 {
                kind = kind.next();
                seen.push(kind.label());
            }
            assert_eq!(
                seen,
                vec!["Essay", "Multiple Choice", "Date", "Number", "Upload"]
            );
            // Full cycle returns to the start
            assert_eq!(kind.next().label(), "Essay");
        }
    }

    mod question {
        use super::*;

        #[test]
        fn test_new_assigns_fresh_id_and_zero_number() {
            let a = Question::new("Name?", QuestionKind::default());
            let b = Question::new("Name?", QuestionKind::default());
            assert_ne!(a.id, b.id);
            assert_eq!(a.number, 0);
            assert!(!a.mandatory);
        }

        #[test]
        fn test_builder_helpers() {
            let q = Question::new("Age?", QuestionKind::default())
                .mandatory()
                .with_help("In years");
            assert!(q.mandatory);
            assert_eq!(q.help_text.as_deref(), Some("In years"));
        }
    }

    mod answer_value {
        use super::*;

        #[test]
        fn test_canonical_text_and_choice() {
            assert_eq!(AnswerValue::Text("hi".into()).canonical(), "hi");
            assert_eq!(AnswerValue::Choice("Yes".into()).canonical(), "Yes");
        }

        #[test]
        fn test_canonical_date_is_iso() {
            let d = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
            assert_eq!(AnswerValue::Date(d).canonical(), "2025-03-09");
        }

        #[test]
        fn test_canonical_number_drops_trailing_zero() {
            assert_eq!(AnswerValue::Number(42.0).canonical(), "42");
            assert_eq!(AnswerValue::Number(2.5).canonical(), "2.5");
        }

        #[test]
        fn test_canonical_file_is_name() {
            let v = AnswerValue::File {
                name: "cv.pdf".into(),
                size_bytes: 1024,
            };
            assert_eq!(v.canonical(), "cv.pdf");
        }

        #[test]
        fn test_serde_round_trip() {
            let v = AnswerValue::Choice("Track A".into());
            let json = serde_json::to_string(&v).unwrap();
            let back: AnswerValue = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }
}
