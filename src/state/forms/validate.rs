//! Stateless per-type answer validators

use super::question::{AnswerValue, Question, QuestionKind};
use chrono::NaiveDate;
use thiserror::Error;

/// Why an answer was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnswerError {
    #[error("an answer is required")]
    Required,
    #[error("answer is {len} characters, limit is {max}")]
    TooLong { len: usize, max: usize },
    #[error("\"{0}\" is not one of the offered choices")]
    NotAChoice(String),
    #[error("date must not be before {0}")]
    BeforeMinDate(NaiveDate),
    #[error("date must not be after {0}")]
    AfterMaxDate(NaiveDate),
    #[error("enter a date as YYYY-MM-DD")]
    NotADate,
    #[error("a whole number is required")]
    NotAnInteger,
    #[error("enter a number")]
    NotANumber,
    #[error("number must be at least {0}")]
    BelowMin(f64),
    #[error("number must be at most {0}")]
    AboveMax(f64),
    #[error("file type \"{0}\" is not accepted")]
    ExtensionNotAllowed(String),
    #[error("file exceeds the {0} MB limit")]
    FileTooLarge(u32),
    #[error("answer does not match the question type")]
    WrongKind,
}

/// Validate a collected value against a question's rule set.
///
/// `None` means the question was left blank; that is only an error for
/// mandatory questions. A present value must match the question kind and
/// satisfy the kind's constraints.
pub fn validate_answer(
    question: &Question,
    value: Option<&AnswerValue>,
) -> Result<(), AnswerError> {
    let Some(value) = value else {
        return if question.mandatory {
            Err(AnswerError::Required)
        } else {
            Ok(())
        };
    };

    match (&question.kind, value) {
        (QuestionKind::Essay { max_length }, AnswerValue::Text(text)) => {
            if let Some(max) = max_length {
                let len = text.chars().count();
                if len > *max {
                    return Err(AnswerError::TooLong { len, max: *max });
                }
            }
            Ok(())
        }
        (QuestionKind::MultipleChoice { choices }, AnswerValue::Choice(choice)) => {
            if choices.iter().any(|c| c == choice) {
                Ok(())
            } else {
                Err(AnswerError::NotAChoice(choice.clone()))
            }
        }
        (QuestionKind::Date { min_date, max_date }, AnswerValue::Date(date)) => {
            if let Some(min) = min_date {
                if date < min {
                    return Err(AnswerError::BeforeMinDate(*min));
                }
            }
            if let Some(max) = max_date {
                if date > max {
                    return Err(AnswerError::AfterMaxDate(*max));
                }
            }
            Ok(())
        }
        (
            QuestionKind::Number {
                is_integer,
                min,
                max,
            },
            AnswerValue::Number(n),
        ) => {
            if *is_integer && n.fract() != 0.0 {
                return Err(AnswerError::NotAnInteger);
            }
            if let Some(min) = min {
                if n < min {
                    return Err(AnswerError::BelowMin(*min));
                }
            }
            if let Some(max) = max {
                if n > max {
                    return Err(AnswerError::AboveMax(*max));
                }
            }
            Ok(())
        }
        (
            QuestionKind::Upload {
                allowed_extensions,
                max_size_mb,
            },
            AnswerValue::File { name, size_bytes },
        ) => {
            if !allowed_extensions.is_empty() {
                let ext = name
                    .rsplit_once('.')
                    .map(|(_, ext)| ext.to_ascii_lowercase())
                    .unwrap_or_default();
                if !allowed_extensions
                    .iter()
                    .any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(&ext))
                {
                    return Err(AnswerError::ExtensionNotAllowed(ext));
                }
            }
            if let Some(max_mb) = max_size_mb {
                if *size_bytes > u64::from(*max_mb) * 1024 * 1024 {
                    return Err(AnswerError::FileTooLarge(*max_mb));
                }
            }
            Ok(())
        }
        _ => Err(AnswerError::WrongKind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn essay(max: Option<usize>) -> Question {
        Question::new("Tell us", QuestionKind::Essay { max_length: max })
    }

    fn mcq(choices: &[&str]) -> Question {
        Question::new(
            "Pick one",
            QuestionKind::MultipleChoice {
                choices: choices.iter().map(|s| s.to_string()).collect(),
            },
        )
    }

    fn date_q(min: Option<(i32, u32, u32)>, max: Option<(i32, u32, u32)>) -> Question {
        let to_date = |(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        Question::new(
            "When",
            QuestionKind::Date {
                min_date: min.map(to_date),
                max_date: max.map(to_date),
            },
        )
    }

    fn number_q(is_integer: bool, min: Option<f64>, max: Option<f64>) -> Question {
        Question::new(
            "How many",
            QuestionKind::Number {
                is_integer,
                min,
                max,
            },
        )
    }

    fn upload_q(exts: &[&str], max_mb: Option<u32>) -> Question {
        Question::new(
            "Attach",
            QuestionKind::Upload {
                allowed_extensions: exts.iter().map(|s| s.to_string()).collect(),
                max_size_mb: max_mb,
            },
        )
    }

    mod mandatory {
        use super::*;

        #[test]
        fn test_blank_optional_passes() {
            let q = essay(None);
            assert_eq!(validate_answer(&q, None), Ok(()));
        }

        #[test]
        fn test_blank_mandatory_is_required() {
            let q = essay(None).mandatory();
            assert_eq!(validate_answer(&q, None), Err(AnswerError::Required));
        }
    }

    mod essay_rules {
        use super::*;

        #[test]
        fn test_within_limit_passes() {
            let q = essay(Some(10));
            let v = AnswerValue::Text("short".into());
            assert_eq!(validate_answer(&q, Some(&v)), Ok(()));
        }

        #[test]
        fn test_over_limit_rejected() {
            let q = essay(Some(5));
            let v = AnswerValue::Text("too long for this".into());
            assert_eq!(
                validate_answer(&q, Some(&v)),
                Err(AnswerError::TooLong { len: 17, max: 5 })
            );
        }

        #[test]
        fn test_limit_counts_chars_not_bytes() {
            let q = essay(Some(4));
            let v = AnswerValue::Text("héllo".into());
            assert_eq!(
                validate_answer(&q, Some(&v)),
                Err(AnswerError::TooLong { len: 5, max: 4 })
            );
        }

        #[test]
        fn test_no_limit_accepts_anything() {
            let q = essay(None);
            let v = AnswerValue::Text("x".repeat(10_000));
            assert_eq!(validate_answer(&q, Some(&v)), Ok(()));
        }
    }

    mod choice_rules {
        use super::*;

        #[test]
        fn test_offered_choice_passes() {
            let q = mcq(&["Yes", "No"]);
            let v = AnswerValue::Choice("No".into());
            assert_eq!(validate_answer(&q, Some(&v)), Ok(()));
        }

        #[test]
        fn test_unknown_choice_rejected() {
            let q = mcq(&["Yes", "No"]);
            let v = AnswerValue::Choice("Maybe".into());
            assert_eq!(
                validate_answer(&q, Some(&v)),
                Err(AnswerError::NotAChoice("Maybe".into()))
            );
        }

        #[test]
        fn test_choice_match_is_case_sensitive() {
            let q = mcq(&["Yes"]);
            let v = AnswerValue::Choice("yes".into());
            assert!(validate_answer(&q, Some(&v)).is_err());
        }
    }

    mod date_rules {
        use super::*;

        #[test]
        fn test_inside_window_passes() {
            let q = date_q(Some((2025, 1, 1)), Some((2025, 12, 31)));
            let v = AnswerValue::Date(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
            assert_eq!(validate_answer(&q, Some(&v)), Ok(()));
        }

        #[test]
        fn test_window_bounds_are_inclusive() {
            let q = date_q(Some((2025, 1, 1)), Some((2025, 12, 31)));
            let lo = AnswerValue::Date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
            let hi = AnswerValue::Date(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
            assert_eq!(validate_answer(&q, Some(&lo)), Ok(()));
            assert_eq!(validate_answer(&q, Some(&hi)), Ok(()));
        }

        #[test]
        fn test_before_min_rejected() {
            let q = date_q(Some((2025, 1, 1)), None);
            let v = AnswerValue::Date(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
            assert!(matches!(
                validate_answer(&q, Some(&v)),
                Err(AnswerError::BeforeMinDate(_))
            ));
        }

        #[test]
        fn test_after_max_rejected() {
            let q = date_q(None, Some((2025, 12, 31)));
            let v = AnswerValue::Date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
            assert!(matches!(
                validate_answer(&q, Some(&v)),
                Err(AnswerError::AfterMaxDate(_))
            ));
        }
    }

    mod number_rules {
        use super::*;

        #[test]
        fn test_integer_question_rejects_fraction() {
            let q = number_q(true, None, None);
            let v = AnswerValue::Number(2.5);
            assert_eq!(validate_answer(&q, Some(&v)), Err(AnswerError::NotAnInteger));
        }

        #[test]
        fn test_integer_question_accepts_whole() {
            let q = number_q(true, None, None);
            let v = AnswerValue::Number(3.0);
            assert_eq!(validate_answer(&q, Some(&v)), Ok(()));
        }

        #[test]
        fn test_range_enforced() {
            let q = number_q(false, Some(1.0), Some(10.0));
            assert_eq!(
                validate_answer(&q, Some(&AnswerValue::Number(0.5))),
                Err(AnswerError::BelowMin(1.0))
            );
            assert_eq!(
                validate_answer(&q, Some(&AnswerValue::Number(10.5))),
                Err(AnswerError::AboveMax(10.0))
            );
            assert_eq!(validate_answer(&q, Some(&AnswerValue::Number(10.0))), Ok(()));
        }
    }

    mod upload_rules {
        use super::*;

        #[test]
        fn test_allowed_extension_passes() {
            let q = upload_q(&["pdf", "docx"], None);
            let v = AnswerValue::File {
                name: "resume.PDF".into(),
                size_bytes: 100,
            };
            assert_eq!(validate_answer(&q, Some(&v)), Ok(()));
        }

        #[test]
        fn test_dotted_extension_config_accepted() {
            let q = upload_q(&[".pdf"], None);
            let v = AnswerValue::File {
                name: "resume.pdf".into(),
                size_bytes: 100,
            };
            assert_eq!(validate_answer(&q, Some(&v)), Ok(()));
        }

        #[test]
        fn test_disallowed_extension_rejected() {
            let q = upload_q(&["pdf"], None);
            let v = AnswerValue::File {
                name: "virus.exe".into(),
                size_bytes: 100,
            };
            assert_eq!(
                validate_answer(&q, Some(&v)),
                Err(AnswerError::ExtensionNotAllowed("exe".into()))
            );
        }

        #[test]
        fn test_size_limit_enforced() {
            let q = upload_q(&[], Some(1));
            let v = AnswerValue::File {
                name: "big.zip".into(),
                size_bytes: 2 * 1024 * 1024,
            };
            assert_eq!(validate_answer(&q, Some(&v)), Err(AnswerError::FileTooLarge(1)));
        }

        #[test]
        fn test_no_restrictions_accepts_any_file() {
            let q = upload_q(&[], None);
            let v = AnswerValue::File {
                name: "anything.xyz".into(),
                size_bytes: u64::MAX,
            };
            assert_eq!(validate_answer(&q, Some(&v)), Ok(()));
        }
    }

    mod kind_mismatch {
        use super::*;

        #[test]
        fn test_text_for_number_question_is_wrong_kind() {
            let q = number_q(false, None, None);
            let v = AnswerValue::Text("five".into());
            assert_eq!(validate_answer(&q, Some(&v)), Err(AnswerError::WrongKind));
        }

        #[test]
        fn test_choice_for_essay_question_is_wrong_kind() {
            let q = essay(None);
            let v = AnswerValue::Choice("Yes".into());
            assert_eq!(validate_answer(&q, Some(&v)), Err(AnswerError::WrongKind));
        }
    }
}
