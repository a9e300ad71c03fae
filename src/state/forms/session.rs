//! Fill-flow runtime for a form document

use super::document::{FormDoc, PageTarget};
use super::question::{Answer, AnswerValue, Question, QuestionKind};
use super::validate::{validate_answer, AnswerError};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Draft input for one question on the current page.
///
/// Entries implement the answer collection protocol: `validate`, `collect`,
/// `clear`, and `reassign` (load a committed answer back into the draft
/// when a page is revisited).
#[derive(Debug, Clone)]
pub struct QuestionEntry {
    pub question: Question,
    /// Text buffer for essay/date/number/upload input
    pub input: String,
    /// Selected choice index for multiple-choice questions
    pub choice: Option<usize>,
    /// Last validation error, shown inline until the entry changes
    pub error: Option<AnswerError>,
}

impl QuestionEntry {
    pub fn new(question: Question) -> Self {
        Self {
            question,
            input: String::new(),
            choice: None,
            error: None,
        }
    }

    /// Parse the draft into an answer value; `None` means left blank
    pub fn collect(&self) -> Result<Option<AnswerValue>, AnswerError> {
        match &self.question.kind {
            QuestionKind::Essay { .. } => {
                if self.input.trim().is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(AnswerValue::Text(self.input.clone())))
                }
            }
            QuestionKind::MultipleChoice { choices } => Ok(self
                .choice
                .and_then(|i| choices.get(i))
                .map(|c| AnswerValue::Choice(c.clone()))),
            QuestionKind::Date { .. } => {
                let trimmed = self.input.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                    .map(|d| Some(AnswerValue::Date(d)))
                    .map_err(|_| AnswerError::NotADate)
            }
            QuestionKind::Number { .. } => {
                let trimmed = self.input.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse::<f64>()
                    .map(|n| Some(AnswerValue::Number(n)))
                    .map_err(|_| AnswerError::NotANumber)
            }
            QuestionKind::Upload { .. } => {
                let trimmed = self.input.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                // The draft holds a file path; only the name is collected.
                // Size and existence are the backend's concern.
                let name = trimmed
                    .rsplit(['/', '\\'])
                    .next()
                    .unwrap_or(trimmed)
                    .to_string();
                Ok(Some(AnswerValue::File { name, size_bytes: 0 }))
            }
        }
    }

    /// Run the question's rule set against the current draft
    pub fn validate(&self) -> Result<(), AnswerError> {
        let value = self.collect()?;
        validate_answer(&self.question, value.as_ref())
    }

    /// Reset the draft to blank
    pub fn clear(&mut self) {
        self.input.clear();
        self.choice = None;
        self.error = None;
    }

    /// Load a committed answer back into the draft
    pub fn reassign(&mut self, value: &AnswerValue) {
        self.error = None;
        match (&self.question.kind, value) {
            (QuestionKind::MultipleChoice { choices }, AnswerValue::Choice(c)) => {
                self.choice = choices.iter().position(|x| x == c);
            }
            (QuestionKind::Date { .. }, AnswerValue::Date(d)) => {
                self.input = d.format("%Y-%m-%d").to_string();
            }
            (QuestionKind::Number { .. }, AnswerValue::Number(n)) => {
                self.input = AnswerValue::Number(*n).canonical();
            }
            (QuestionKind::Upload { .. }, AnswerValue::File { name, .. }) => {
                self.input = name.clone();
            }
            (_, AnswerValue::Text(t)) => {
                self.input = t.clone();
            }
            _ => {}
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
        self.error = None;
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
        self.error = None;
    }

    pub fn choice_count(&self) -> usize {
        match &self.question.kind {
            QuestionKind::MultipleChoice { choices } => choices.len(),
            _ => 0,
        }
    }

    pub fn next_choice(&mut self) {
        let count = self.choice_count();
        if count == 0 {
            return;
        }
        self.choice = Some(self.choice.map_or(0, |c| (c + 1) % count));
        self.error = None;
    }

    pub fn prev_choice(&mut self) {
        let count = self.choice_count();
        if count == 0 {
            return;
        }
        self.choice = Some(self.choice.map_or(count - 1, |c| (c + count - 1) % count));
        self.error = None;
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    InProgress,
    Complete,
}

/// A respondent's pass through a form: draft entries for the current page,
/// committed answers, and the trail of visited pages
#[derive(Debug, Clone)]
pub struct FormSession {
    doc: FormDoc,
    pub current_page: usize,
    pub entries: Vec<QuestionEntry>,
    pub active_entry: usize,
    pub phase: SessionPhase,
    answers: HashMap<String, AnswerValue>,
    trail: Vec<usize>,
}

impl FormSession {
    pub fn new(doc: FormDoc) -> Self {
        let mut session = Self {
            doc,
            current_page: 0,
            entries: Vec::new(),
            active_entry: 0,
            phase: SessionPhase::InProgress,
            answers: HashMap::new(),
            trail: Vec::new(),
        };
        session.load_entries();
        session
    }

    pub fn doc(&self) -> &FormDoc {
        &self.doc
    }

    /// (pages visited so far including the current one, total pages)
    pub fn progress(&self) -> (usize, usize) {
        (self.trail.len() + 1, self.doc.pages.len())
    }

    pub fn next_entry(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.active_entry = (self.active_entry + 1) % self.entries.len();
    }

    pub fn prev_entry(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let len = self.entries.len();
        self.active_entry = (self.active_entry + len - 1) % len;
    }

    /// Validate every entry on the page; on success commit the answers and
    /// move to the branch-resolved next page (or complete the session).
    ///
    /// On failure the per-entry errors are stored for inline display and
    /// returned.
    pub fn advance(&mut self) -> Result<SessionPhase, Vec<(String, AnswerError)>> {
        let mut errors = Vec::new();
        for entry in &mut self.entries {
            match entry.validate() {
                Ok(()) => entry.error = None,
                Err(err) => {
                    entry.error = Some(err.clone());
                    errors.push((entry.question.id.clone(), err));
                }
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        self.commit_entries();

        let target = self.resolve_target();
        self.trail.push(self.current_page);
        match target {
            PageTarget::Submit => self.phase = SessionPhase::Complete,
            PageTarget::Page(next) if next >= self.doc.pages.len() => {
                self.phase = SessionPhase::Complete;
            }
            PageTarget::Page(next) => {
                self.current_page = next;
                self.active_entry = 0;
                self.load_entries();
            }
        }
        Ok(self.phase)
    }

    /// Return to the previously visited page, keeping any parseable drafts
    pub fn back(&mut self) -> bool {
        let Some(prev) = self.trail.pop() else {
            return false;
        };
        self.commit_entries();
        self.current_page = prev;
        self.active_entry = 0;
        self.phase = SessionPhase::InProgress;
        self.load_entries();
        true
    }

    /// Answers for the pages actually visited, in question-number order.
    ///
    /// Pages skipped by a branch contribute nothing, even if the respondent
    /// answered them on an earlier path through the form.
    pub fn submission(&self) -> Vec<Answer> {
        let mut visited: Vec<usize> = self.trail.clone();
        if self.phase == SessionPhase::InProgress {
            visited.push(self.current_page);
        }
        visited.sort_unstable();
        visited.dedup();

        let mut out = Vec::new();
        for page_idx in visited {
            let Some(page) = self.doc.pages.get(page_idx) else {
                continue;
            };
            for question in &page.questions {
                if let Some(value) = self.answers.get(&question.id) {
                    out.push(Answer {
                        question_id: question.id.clone(),
                        value: value.clone(),
                    });
                }
            }
        }
        out
    }

    fn load_entries(&mut self) {
        let questions = self
            .doc
            .pages
            .get(self.current_page)
            .map(|p| p.questions.clone())
            .unwrap_or_default();
        self.entries = questions
            .into_iter()
            .map(|q| {
                let mut entry = QuestionEntry::new(q);
                if let Some(value) = self.answers.get(&entry.question.id) {
                    entry.reassign(value);
                }
                entry
            })
            .collect();
    }

    /// Commit parseable drafts; blank drafts clear the committed answer
    fn commit_entries(&mut self) {
        for entry in &self.entries {
            match entry.collect() {
                Ok(Some(value)) => {
                    self.answers.insert(entry.question.id.clone(), value);
                }
                Ok(None) => {
                    self.answers.remove(&entry.question.id);
                }
                Err(_) => {}
            }
        }
    }

    /// First matching branch rule in question order wins; non-matching
    /// answers fall through to the next page. Backward rules are ignored
    /// defensively even though the document forbids creating them.
    fn resolve_target(&self) -> PageTarget {
        if let Some(page) = self.doc.pages.get(self.current_page) {
            for question in &page.questions {
                let Some(rule) = page.branches.get(&question.id) else {
                    continue;
                };
                let Some(value) = self.answers.get(&question.id) else {
                    continue;
                };
                if rule.matches(value) {
                    match rule.target {
                        PageTarget::Submit => return PageTarget::Submit,
                        PageTarget::Page(t) if t > self.current_page => {
                            return PageTarget::Page(t);
                        }
                        PageTarget::Page(_) => {}
                    }
                }
            }
        }
        PageTarget::Page(self.current_page + 1)
    }
}
