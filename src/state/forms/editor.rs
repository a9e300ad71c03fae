//! Editor state management and editor form structs

use super::document::{BranchRule, Page, PageTarget};
use super::field::FormField;
use super::question::{Question, QuestionKind};
use crate::state::Event;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

/// Trait for common editor form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
    fn get_active_field_mut(&mut self) -> &mut FormField;
    fn get_field(&self, index: usize) -> Option<&FormField>;
}

/// Enum representing all possible editor states
#[derive(Debug, Clone, Default)]
pub enum EditorState {
    #[default]
    None,
    EventCreate(EventCreateForm),
    EventEdit(EventEditForm),
    Question(QuestionForm),
    Page(PageForm),
    Branch(BranchForm),
}

impl EditorState {
    pub fn next_field(&mut self) {
        match self {
            EditorState::None => {}
            EditorState::EventCreate(f) => f.next_field(),
            EditorState::EventEdit(f) => f.next_field(),
            EditorState::Question(f) => f.next_field(),
            EditorState::Page(f) => f.next_field(),
            EditorState::Branch(f) => f.next_field(),
        }
    }

    pub fn prev_field(&mut self) {
        match self {
            EditorState::None => {}
            EditorState::EventCreate(f) => f.prev_field(),
            EditorState::EventEdit(f) => f.prev_field(),
            EditorState::Question(f) => f.prev_field(),
            EditorState::Page(f) => f.prev_field(),
            EditorState::Branch(f) => f.prev_field(),
        }
    }

    pub fn get_active_field_mut(&mut self) -> Option<&mut FormField> {
        match self {
            EditorState::None => None,
            EditorState::EventCreate(f) => Some(f.get_active_field_mut()),
            EditorState::EventEdit(f) => Some(f.get_active_field_mut()),
            EditorState::Question(f) => Some(f.get_active_field_mut()),
            EditorState::Page(f) => Some(f.get_active_field_mut()),
            EditorState::Branch(f) => Some(f.get_active_field_mut()),
        }
    }

    pub fn is_active_field_multiline(&self) -> bool {
        let field = match self {
            EditorState::None => None,
            EditorState::EventCreate(f) => f.get_field(f.active_field()),
            EditorState::EventEdit(f) => f.get_field(f.active_field()),
            EditorState::Question(f) => f.get_field(f.active_field()),
            EditorState::Page(f) => f.get_field(f.active_field()),
            EditorState::Branch(f) => f.get_field(f.active_field()),
        };
        field.is_some_and(|f| f.is_multiline)
    }
}

/// Parse an event timestamp entered as "YYYY-MM-DD HH:MM"
pub fn parse_event_time(input: &str) -> Result<DateTime<Utc>, String> {
    NaiveDateTime::parse_from_str(input.trim(), "%Y-%m-%d %H:%M")
        .map(|dt| dt.and_utc())
        .map_err(|_| format!("\"{}\" is not a valid time (YYYY-MM-DD HH:MM)", input.trim()))
}

// Event Create Form
#[derive(Debug, Clone)]
pub struct EventCreateForm {
    pub name: FormField,
    pub venue: FormField,
    pub description: FormField,
    pub starts_at: FormField,
    pub ends_at: FormField,
    pub capacity: FormField,
    pub active_field_index: usize,
}

impl EventCreateForm {
    pub fn new() -> Self {
        Self {
            name: FormField::text("name", "Name", false),
            venue: FormField::text("venue", "Venue", false),
            description: FormField::text("description", "Description", true),
            starts_at: FormField::text("starts_at", "Starts (YYYY-MM-DD HH:MM)", false),
            ends_at: FormField::text("ends_at", "Ends (YYYY-MM-DD HH:MM)", false),
            capacity: FormField::count("capacity", "Capacity (0 = unlimited)"),
            active_field_index: 0,
        }
    }

    pub fn start_time(&self) -> Result<DateTime<Utc>, String> {
        parse_event_time(self.starts_at.as_text())
    }

    pub fn end_time(&self) -> Result<DateTime<Utc>, String> {
        parse_event_time(self.ends_at.as_text())
    }
}

impl Default for EventCreateForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for EventCreateForm {
    fn field_count(&self) -> usize {
        6
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(5);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.name,
            1 => &mut self.venue,
            2 => &mut self.description,
            3 => &mut self.starts_at,
            4 => &mut self.ends_at,
            _ => &mut self.capacity,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.name),
            1 => Some(&self.venue),
            2 => Some(&self.description),
            3 => Some(&self.starts_at),
            4 => Some(&self.ends_at),
            5 => Some(&self.capacity),
            _ => None,
        }
    }
}

// Event Edit Form
#[derive(Debug, Clone)]
pub struct EventEditForm {
    pub name: FormField,
    pub venue: FormField,
    pub description: FormField,
    pub starts_at: FormField,
    pub ends_at: FormField,
    pub capacity: FormField,
    pub status: FormField,
    pub active_field_index: usize,
}

impl EventEditForm {
    pub fn from_event(event: &Event) -> Self {
        Self {
            name: FormField::text_with_value("name", "Name", event.name.clone(), false),
            venue: FormField::text_with_value("venue", "Venue", event.venue.clone(), false),
            description: FormField::text_with_value(
                "description",
                "Description",
                event.description.clone(),
                true,
            ),
            starts_at: FormField::text_with_value(
                "starts_at",
                "Starts (YYYY-MM-DD HH:MM)",
                event.starts_at.format("%Y-%m-%d %H:%M").to_string(),
                false,
            ),
            ends_at: FormField::text_with_value(
                "ends_at",
                "Ends (YYYY-MM-DD HH:MM)",
                event.ends_at.format("%Y-%m-%d %H:%M").to_string(),
                false,
            ),
            capacity: FormField::count_with_value(
                "capacity",
                "Capacity (0 = unlimited)",
                event.capacity,
            ),
            status: FormField::text_with_value(
                "status",
                "Status",
                event.status.clone(),
                false,
            ),
            active_field_index: 0,
        }
    }

    pub fn start_time(&self) -> Result<DateTime<Utc>, String> {
        parse_event_time(self.starts_at.as_text())
    }

    pub fn end_time(&self) -> Result<DateTime<Utc>, String> {
        parse_event_time(self.ends_at.as_text())
    }
}

impl Form for EventEditForm {
    fn field_count(&self) -> usize {
        7
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(6);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.name,
            1 => &mut self.venue,
            2 => &mut self.description,
            3 => &mut self.starts_at,
            4 => &mut self.ends_at,
            5 => &mut self.capacity,
            _ => &mut self.status,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.name),
            1 => Some(&self.venue),
            2 => Some(&self.description),
            3 => Some(&self.starts_at),
            4 => Some(&self.ends_at),
            5 => Some(&self.capacity),
            6 => Some(&self.status),
            _ => None,
        }
    }
}

// Question Form (create or edit one question in the builder)
#[derive(Debug, Clone)]
pub struct QuestionForm {
    /// Current question type; cycled with a key, constraint fields below
    /// apply only to the active type
    pub kind: QuestionKind,
    pub prompt: FormField,
    pub help_text: FormField,
    pub mandatory: FormField,
    pub max_length: FormField,
    pub choices: FormField,
    pub min_date: FormField,
    pub max_date: FormField,
    pub is_integer: FormField,
    pub min_value: FormField,
    pub max_value: FormField,
    pub extensions: FormField,
    pub max_size_mb: FormField,
    pub active_field_index: usize,
    /// (id, number) when editing an existing question
    pub editing: Option<(String, u32)>,
}

impl QuestionForm {
    pub fn new() -> Self {
        Self {
            kind: QuestionKind::default(),
            prompt: FormField::text("prompt", "Prompt", false),
            help_text: FormField::text("help_text", "Help text (optional)", false),
            mandatory: FormField::toggle_with_value("mandatory", "Required", false),
            max_length: FormField::count("max_length", "Max length (0 = none)"),
            choices: FormField::text("choices", "Choices (one per line)", true),
            min_date: FormField::text("min_date", "Earliest date (YYYY-MM-DD)", false),
            max_date: FormField::text("max_date", "Latest date (YYYY-MM-DD)", false),
            is_integer: FormField::toggle_with_value("is_integer", "Whole numbers only", false),
            min_value: FormField::text("min_value", "Minimum", false),
            max_value: FormField::text("max_value", "Maximum", false),
            extensions: FormField::text("extensions", "Allowed types (comma separated)", false),
            max_size_mb: FormField::count("max_size_mb", "Max size MB (0 = none)"),
            active_field_index: 0,
            editing: None,
        }
    }

    pub fn from_question(question: &Question) -> Self {
        let mut form = Self::new();
        form.kind = question.kind.clone();
        form.prompt = FormField::text_with_value("prompt", "Prompt", question.prompt.clone(), false);
        form.help_text = FormField::text_with_value(
            "help_text",
            "Help text (optional)",
            question.help_text.clone().unwrap_or_default(),
            false,
        );
        form.mandatory = FormField::toggle_with_value("mandatory", "Required", question.mandatory);
        match &question.kind {
            QuestionKind::Essay { max_length } => {
                form.max_length = FormField::count_with_value(
                    "max_length",
                    "Max length (0 = none)",
                    max_length.unwrap_or(0) as u32,
                );
            }
            QuestionKind::MultipleChoice { choices } => {
                form.choices = FormField::text_with_value(
                    "choices",
                    "Choices (one per line)",
                    choices.join("\n"),
                    true,
                );
            }
            QuestionKind::Date { min_date, max_date } => {
                if let Some(d) = min_date {
                    form.min_date.value = super::field::FieldValue::Text(d.to_string());
                }
                if let Some(d) = max_date {
                    form.max_date.value = super::field::FieldValue::Text(d.to_string());
                }
            }
            QuestionKind::Number {
                is_integer,
                min,
                max,
            } => {
                form.is_integer =
                    FormField::toggle_with_value("is_integer", "Whole numbers only", *is_integer);
                if let Some(n) = min {
                    form.min_value.value = super::field::FieldValue::Text(n.to_string());
                }
                if let Some(n) = max {
                    form.max_value.value = super::field::FieldValue::Text(n.to_string());
                }
            }
            QuestionKind::Upload {
                allowed_extensions,
                max_size_mb,
            } => {
                form.extensions = FormField::text_with_value(
                    "extensions",
                    "Allowed types (comma separated)",
                    allowed_extensions.join(", "),
                    false,
                );
                form.max_size_mb = FormField::count_with_value(
                    "max_size_mb",
                    "Max size MB (0 = none)",
                    max_size_mb.unwrap_or(0),
                );
            }
        }
        form.editing = Some((question.id.clone(), question.number));
        form
    }

    /// Switch to the next question type, keeping the common fields
    pub fn cycle_kind(&mut self) {
        self.kind = self.kind.next();
        let max = self.field_count() - 1;
        if self.active_field_index > max {
            self.active_field_index = max;
        }
    }

    /// Build the question from the current field values
    pub fn to_question(&self) -> Result<Question, String> {
        let kind = match &self.kind {
            QuestionKind::Essay { .. } => QuestionKind::Essay {
                max_length: match self.max_length.as_count() {
                    0 => None,
                    n => Some(n as usize),
                },
            },
            QuestionKind::MultipleChoice { .. } => QuestionKind::MultipleChoice {
                choices: self
                    .choices
                    .as_text()
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from)
                    .collect(),
            },
            QuestionKind::Date { .. } => QuestionKind::Date {
                min_date: parse_optional_date(self.min_date.as_text())?,
                max_date: parse_optional_date(self.max_date.as_text())?,
            },
            QuestionKind::Number { .. } => QuestionKind::Number {
                is_integer: self.is_integer.as_toggle(),
                min: parse_optional_number(self.min_value.as_text())?,
                max: parse_optional_number(self.max_value.as_text())?,
            },
            QuestionKind::Upload { .. } => QuestionKind::Upload {
                allowed_extensions: self
                    .extensions
                    .as_text()
                    .split(',')
                    .map(|s| s.trim().trim_start_matches('.').to_ascii_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect(),
                max_size_mb: match self.max_size_mb.as_count() {
                    0 => None,
                    n => Some(n),
                },
            },
        };

        let help = self.help_text.as_text().trim();
        let (id, number) = self
            .editing
            .clone()
            .unwrap_or_else(|| (Uuid::new_v4().to_string(), 0));
        Ok(Question {
            id,
            number,
            prompt: self.prompt.as_text().to_string(),
            help_text: if help.is_empty() {
                None
            } else {
                Some(help.to_string())
            },
            mandatory: self.mandatory.as_toggle(),
            kind,
        })
    }
}

fn parse_optional_date(input: &str) -> Result<Option<NaiveDate>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("\"{trimmed}\" is not a valid date (YYYY-MM-DD)"))
}

fn parse_optional_number(input: &str) -> Result<Option<f64>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("\"{trimmed}\" is not a number"))
}

impl Default for QuestionForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for QuestionForm {
    fn field_count(&self) -> usize {
        3 + match self.kind {
            QuestionKind::Essay { .. } => 1,
            QuestionKind::MultipleChoice { .. } => 1,
            QuestionKind::Date { .. } => 2,
            QuestionKind::Number { .. } => 3,
            QuestionKind::Upload { .. } => 2,
        }
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.field_count() - 1);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.prompt,
            1 => &mut self.help_text,
            2 => &mut self.mandatory,
            i => match self.kind {
                QuestionKind::Essay { .. } => &mut self.max_length,
                QuestionKind::MultipleChoice { .. } => &mut self.choices,
                QuestionKind::Date { .. } => {
                    if i == 3 {
                        &mut self.min_date
                    } else {
                        &mut self.max_date
                    }
                }
                QuestionKind::Number { .. } => match i {
                    3 => &mut self.is_integer,
                    4 => &mut self.min_value,
                    _ => &mut self.max_value,
                },
                QuestionKind::Upload { .. } => {
                    if i == 3 {
                        &mut self.extensions
                    } else {
                        &mut self.max_size_mb
                    }
                }
            },
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.prompt),
            1 => Some(&self.help_text),
            2 => Some(&self.mandatory),
            i if i < self.field_count() => Some(match self.kind {
                QuestionKind::Essay { .. } => &self.max_length,
                QuestionKind::MultipleChoice { .. } => &self.choices,
                QuestionKind::Date { .. } => {
                    if i == 3 {
                        &self.min_date
                    } else {
                        &self.max_date
                    }
                }
                QuestionKind::Number { .. } => match i {
                    3 => &self.is_integer,
                    4 => &self.min_value,
                    _ => &self.max_value,
                },
                QuestionKind::Upload { .. } => {
                    if i == 3 {
                        &self.extensions
                    } else {
                        &self.max_size_mb
                    }
                }
            }),
            _ => None,
        }
    }
}

// Page Form (title/description of a builder page)
#[derive(Debug, Clone)]
pub struct PageForm {
    pub title: FormField,
    pub description: FormField,
    pub active_field_index: usize,
    /// Index of the page being edited; None when adding a new page
    pub editing: Option<usize>,
}

impl PageForm {
    pub fn new() -> Self {
        Self {
            title: FormField::text("title", "Title", false),
            description: FormField::text("description", "Description", true),
            active_field_index: 0,
            editing: None,
        }
    }

    pub fn from_page(index: usize, page: &Page) -> Self {
        Self {
            title: FormField::text_with_value("title", "Title", page.title.clone(), false),
            description: FormField::text_with_value(
                "description",
                "Description",
                page.description.clone(),
                true,
            ),
            active_field_index: 0,
            editing: Some(index),
        }
    }
}

impl Default for PageForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for PageForm {
    fn field_count(&self) -> usize {
        2
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(1);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.title,
            _ => &mut self.description,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.title),
            1 => Some(&self.description),
            _ => None,
        }
    }
}

// Branch Form (conditional jump for one question)
#[derive(Debug, Clone)]
pub struct BranchForm {
    /// Question the rule is attached to
    pub question_id: String,
    pub question_prompt: String,
    /// Page the question lives on
    pub source_page: usize,
    pub assert_on: FormField,
    /// 1-based page number shown to the user
    pub target_page: FormField,
    pub to_submit: FormField,
    pub active_field_index: usize,
}

impl BranchForm {
    pub fn new(source_page: usize, question: &Question) -> Self {
        Self {
            question_id: question.id.clone(),
            question_prompt: question.prompt.clone(),
            source_page,
            assert_on: FormField::text("assert_on", "When the answer is", false),
            target_page: FormField::count("target_page", "Jump to page"),
            to_submit: FormField::toggle_with_value("to_submit", "Submit instead", false),
            active_field_index: 0,
        }
    }

    pub fn from_rule(source_page: usize, question: &Question, rule: &BranchRule) -> Self {
        let mut form = Self::new(source_page, question);
        form.assert_on = FormField::text_with_value(
            "assert_on",
            "When the answer is",
            rule.assert_on.clone(),
            false,
        );
        match rule.target {
            PageTarget::Page(idx) => {
                form.target_page =
                    FormField::count_with_value("target_page", "Jump to page", idx as u32 + 1);
            }
            PageTarget::Submit => {
                form.to_submit = FormField::toggle_with_value("to_submit", "Submit instead", true);
            }
        }
        form
    }

    pub fn to_rule(&self) -> Result<BranchRule, String> {
        let assert_on = self.assert_on.as_text().trim().to_string();
        if assert_on.is_empty() {
            return Err("enter the answer value that triggers the jump".to_string());
        }
        let target = if self.to_submit.as_toggle() {
            PageTarget::Submit
        } else {
            match self.target_page.as_count() {
                0 => return Err("enter a target page number".to_string()),
                n => PageTarget::Page(n as usize - 1),
            }
        };
        Ok(BranchRule { assert_on, target })
    }
}

impl Form for BranchForm {
    fn field_count(&self) -> usize {
        3
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(2);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.assert_on,
            1 => &mut self.target_page,
            _ => &mut self.to_submit,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.assert_on),
            1 => Some(&self.target_page),
            2 => Some(&self.to_submit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_event() -> Event {
        Event {
            id: "ev-1".to_string(),
            name: "Demo Day".to_string(),
            description: "Annual showcase".to_string(),
            venue: "Hall B".to_string(),
            starts_at: Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2025, 5, 1, 17, 0, 0).unwrap(),
            capacity: 300,
            status: "published".to_string(),
            registered_count: 120,
            checked_in_count: 0,
        }
    }

    mod editor_state_enum {
        use super::*;

        #[test]
        fn test_default_is_none() {
            let state = EditorState::default();
            assert!(matches!(state, EditorState::None));
        }

        #[test]
        fn test_next_field_on_none_is_noop() {
            let mut state = EditorState::None;
            state.next_field(); // Should not panic
        }

        #[test]
        fn test_get_active_field_mut_none_returns_none() {
            let mut state = EditorState::None;
            assert!(state.get_active_field_mut().is_none());
        }

        #[test]
        fn test_next_field_cycles_through_form() {
            let mut state = EditorState::EventCreate(EventCreateForm::new());
            state.next_field();
            if let EditorState::EventCreate(ref f) = state {
                assert_eq!(f.active_field_index, 1);
            }
        }

        #[test]
        fn test_is_active_field_multiline_tracks_description() {
            let mut form = EventCreateForm::new();
            form.active_field_index = 2; // description
            let state = EditorState::EventCreate(form);
            assert!(state.is_active_field_multiline());
        }
    }

    mod event_forms {
        use super::*;

        #[test]
        fn test_create_form_defaults() {
            let form = EventCreateForm::new();
            assert_eq!(form.field_count(), 6);
            assert_eq!(form.active_field_index, 0);
            assert_eq!(form.name.as_text(), "");
            assert_eq!(form.capacity.as_count(), 0);
        }

        #[test]
        fn test_create_form_field_wrap() {
            let mut form = EventCreateForm::new();
            for _ in 0..6 {
                form.next_field();
            }
            assert_eq!(form.active_field_index, 0);
            form.prev_field();
            assert_eq!(form.active_field_index, 5);
        }

        #[test]
        fn test_edit_form_loads_event_values() {
            let form = EventEditForm::from_event(&test_event());
            assert_eq!(form.name.as_text(), "Demo Day");
            assert_eq!(form.venue.as_text(), "Hall B");
            assert_eq!(form.starts_at.as_text(), "2025-05-01 09:00");
            assert_eq!(form.capacity.as_count(), 300);
            assert_eq!(form.status.as_text(), "published");
        }

        #[test]
        fn test_start_time_parses_back() {
            let form = EventEditForm::from_event(&test_event());
            assert_eq!(form.start_time().unwrap(), test_event().starts_at);
        }

        #[test]
        fn test_bad_time_is_rejected() {
            let mut form = EventCreateForm::new();
            form.starts_at =
                FormField::text_with_value("starts_at", "Starts", "next tuesday".into(), false);
            assert!(form.start_time().is_err());
        }
    }

    mod question_form {
        use super::*;

        #[test]
        fn test_field_count_varies_by_kind() {
            let mut form = QuestionForm::new();
            assert_eq!(form.field_count(), 4); // essay
            form.cycle_kind();
            assert_eq!(form.field_count(), 4); // multiple choice
            form.cycle_kind();
            assert_eq!(form.field_count(), 5); // date
            form.cycle_kind();
            assert_eq!(form.field_count(), 6); // number
            form.cycle_kind();
            assert_eq!(form.field_count(), 5); // upload
        }

        #[test]
        fn test_cycle_kind_clamps_active_field() {
            let mut form = QuestionForm::new();
            form.cycle_kind(); // mcq
            form.cycle_kind(); // date
            form.cycle_kind(); // number (6 fields)
            form.active_field_index = 5;
            form.cycle_kind(); // upload (5 fields)
            assert_eq!(form.active_field_index, 4);
        }

        #[test]
        fn test_to_question_builds_essay() {
            let mut form = QuestionForm::new();
            form.prompt = FormField::text_with_value("prompt", "Prompt", "Tell us".into(), false);
            form.max_length = FormField::count_with_value("max_length", "Max", 200);
            form.mandatory.flip();
            let q = form.to_question().unwrap();
            assert_eq!(q.prompt, "Tell us");
            assert!(q.mandatory);
            assert_eq!(q.kind, QuestionKind::Essay { max_length: Some(200) });
        }

        #[test]
        fn test_to_question_parses_choices_per_line() {
            let mut form = QuestionForm::new();
            form.kind = QuestionKind::MultipleChoice { choices: vec![] };
            form.choices = FormField::text_with_value(
                "choices",
                "Choices",
                "Yes\n  No  \n\nMaybe".into(),
                true,
            );
            let q = form.to_question().unwrap();
            assert_eq!(
                q.kind,
                QuestionKind::MultipleChoice {
                    choices: vec!["Yes".into(), "No".into(), "Maybe".into()]
                }
            );
        }

        #[test]
        fn test_to_question_rejects_bad_date() {
            let mut form = QuestionForm::new();
            form.kind = QuestionKind::Date {
                min_date: None,
                max_date: None,
            };
            form.min_date = FormField::text_with_value("min_date", "Min", "soon".into(), false);
            assert!(form.to_question().is_err());
        }

        #[test]
        fn test_to_question_normalizes_extensions() {
            let mut form = QuestionForm::new();
            form.kind = QuestionKind::Upload {
                allowed_extensions: vec![],
                max_size_mb: None,
            };
            form.extensions =
                FormField::text_with_value("extensions", "Types", ".PDF, docx ,".into(), false);
            let q = form.to_question().unwrap();
            assert_eq!(
                q.kind,
                QuestionKind::Upload {
                    allowed_extensions: vec!["pdf".into(), "docx".into()],
                    max_size_mb: None
                }
            );
        }

        #[test]
        fn test_from_question_round_trips_id_and_number() {
            let mut original = Question::new("Pick", QuestionKind::MultipleChoice {
                choices: vec!["A".into(), "B".into()],
            });
            original.number = 4;
            let form = QuestionForm::from_question(&original);
            let rebuilt = form.to_question().unwrap();
            assert_eq!(rebuilt.id, original.id);
            assert_eq!(rebuilt.number, 4);
            assert_eq!(rebuilt.kind, original.kind);
        }

        #[test]
        fn test_new_question_gets_fresh_id() {
            let mut form = QuestionForm::new();
            form.prompt = FormField::text_with_value("prompt", "Prompt", "Q".into(), false);
            let a = form.to_question().unwrap();
            let b = form.to_question().unwrap();
            assert_ne!(a.id, b.id);
            assert_eq!(a.number, 0);
        }
    }

    mod branch_form {
        use super::*;

        fn question() -> Question {
            Question::new(
                "Attending?",
                QuestionKind::MultipleChoice {
                    choices: vec!["Yes".into(), "No".into()],
                },
            )
        }

        #[test]
        fn test_to_rule_builds_page_target() {
            let mut form = BranchForm::new(0, &question());
            form.assert_on =
                FormField::text_with_value("assert_on", "When", "No".into(), false);
            form.target_page = FormField::count_with_value("target_page", "Jump", 3);
            let rule = form.to_rule().unwrap();
            assert_eq!(rule.assert_on, "No");
            assert_eq!(rule.target, PageTarget::Page(2));
        }

        #[test]
        fn test_to_rule_submit_overrides_page() {
            let mut form = BranchForm::new(0, &question());
            form.assert_on =
                FormField::text_with_value("assert_on", "When", "No".into(), false);
            form.to_submit.flip();
            let rule = form.to_rule().unwrap();
            assert_eq!(rule.target, PageTarget::Submit);
        }

        #[test]
        fn test_to_rule_requires_assert_value() {
            let form = BranchForm::new(0, &question());
            assert!(form.to_rule().is_err());
        }

        #[test]
        fn test_to_rule_requires_target() {
            let mut form = BranchForm::new(0, &question());
            form.assert_on =
                FormField::text_with_value("assert_on", "When", "No".into(), false);
            assert!(form.to_rule().is_err());
        }

        #[test]
        fn test_from_rule_loads_existing() {
            let q = question();
            let rule = BranchRule {
                assert_on: "No".into(),
                target: PageTarget::Page(2),
            };
            let form = BranchForm::from_rule(0, &q, &rule);
            assert_eq!(form.assert_on.as_text(), "No");
            assert_eq!(form.target_page.as_count(), 3);
        }
    }
}
