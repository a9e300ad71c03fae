//! Form document: pages, questions, and conditional branches

use super::question::{AnswerValue, Question};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Where a branch rule sends the respondent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageTarget {
    /// Jump to the page at this index
    Page(usize),
    /// End the form immediately
    Submit,
}

/// Conditional page transition, keyed on one question's answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchRule {
    /// The answer value (canonical string form) that triggers the jump
    pub assert_on: String,
    pub target: PageTarget,
}

impl BranchRule {
    pub fn matches(&self, value: &AnswerValue) -> bool {
        value.canonical() == self.assert_on
    }
}

/// One page of a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
    /// question id -> branch rule; absent questions fall through
    pub branches: HashMap<String, BranchRule>,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            questions: Vec::new(),
            branches: HashMap::new(),
        }
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

/// Export bindings owned by the backend, shown read-only in the TUI
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormMeta {
    pub sheet_id: Option<String>,
    pub drive_folder: Option<String>,
}

/// Structural problems reported by `FormDoc::validate`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormIssue {
    EmptyTitle,
    EmptyPage { page: usize },
    BlankPrompt { page: usize, question: u32 },
    TooFewChoices { page: usize, question: u32 },
    BranchOnNonChoice { page: usize, question: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormDocError {
    #[error("page index {0} is out of bounds")]
    PageOutOfBounds(usize),
    #[error("question is not on this page")]
    QuestionNotOnPage,
    #[error("a branch may only target a later page")]
    BackwardBranch,
    #[error("branch target {0} is out of bounds")]
    TargetOutOfBounds(usize),
}

/// A complete form document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDoc {
    pub id: String,
    pub title: String,
    pub description: String,
    pub pages: Vec<Page>,
    pub meta: FormMeta,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FormDoc {
    /// A new form always starts with one empty page
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            pages: vec![Page::new("Page 1")],
            meta: FormMeta::default(),
            updated_at: None,
        }
    }

    pub fn question_count(&self) -> usize {
        self.pages.iter().map(|p| p.questions.len()).sum()
    }

    /// Find a question anywhere in the form
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.pages.iter().find_map(|p| p.question(question_id))
    }

    /// Reassign global question numbers: 1..n in page order.
    ///
    /// Called after every structural edit so numbers stay unique and
    /// monotonic across all pages.
    pub fn renumber(&mut self) {
        let mut next = 1;
        for page in &mut self.pages {
            for question in &mut page.questions {
                question.number = next;
                next += 1;
            }
        }
    }

    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
        self.renumber();
    }

    /// Remove a page; branch rules targeting it are dropped and later
    /// targets are shifted down
    pub fn remove_page(&mut self, index: usize) -> Result<Page, FormDocError> {
        if index >= self.pages.len() {
            return Err(FormDocError::PageOutOfBounds(index));
        }
        let removed = self.pages.remove(index);
        self.remap_branches(|target| {
            if target == index {
                None
            } else if target > index {
                Some(target - 1)
            } else {
                Some(target)
            }
        });
        self.drop_backward_branches();
        self.renumber();
        Ok(removed)
    }

    /// Move a page to a new position, re-pointing branch targets
    pub fn move_page(&mut self, from: usize, to: usize) -> Result<(), FormDocError> {
        if from >= self.pages.len() {
            return Err(FormDocError::PageOutOfBounds(from));
        }
        let to = to.min(self.pages.len() - 1);
        if from == to {
            return Ok(());
        }
        let page = self.pages.remove(from);
        self.pages.insert(to, page);

        self.remap_branches(|target| {
            if target == from {
                Some(to)
            } else if from < to && target > from && target <= to {
                Some(target - 1)
            } else if to < from && target >= to && target < from {
                Some(target + 1)
            } else {
                Some(target)
            }
        });
        // A reorder can turn a forward branch into a backward one
        self.drop_backward_branches();
        self.renumber();
        Ok(())
    }

    pub fn add_question(&mut self, page: usize, question: Question) -> Result<(), FormDocError> {
        let p = self
            .pages
            .get_mut(page)
            .ok_or(FormDocError::PageOutOfBounds(page))?;
        p.questions.push(question);
        self.renumber();
        Ok(())
    }

    pub fn remove_question(
        &mut self,
        page: usize,
        question_id: &str,
    ) -> Result<Question, FormDocError> {
        let p = self
            .pages
            .get_mut(page)
            .ok_or(FormDocError::PageOutOfBounds(page))?;
        let pos = p
            .questions
            .iter()
            .position(|q| q.id == question_id)
            .ok_or(FormDocError::QuestionNotOnPage)?;
        let removed = p.questions.remove(pos);
        p.branches.remove(question_id);
        self.renumber();
        Ok(removed)
    }

    /// Move a question up or down within its page
    pub fn move_question(
        &mut self,
        page: usize,
        question_id: &str,
        up: bool,
    ) -> Result<(), FormDocError> {
        let p = self
            .pages
            .get_mut(page)
            .ok_or(FormDocError::PageOutOfBounds(page))?;
        let pos = p
            .questions
            .iter()
            .position(|q| q.id == question_id)
            .ok_or(FormDocError::QuestionNotOnPage)?;
        let new_pos = if up {
            pos.saturating_sub(1)
        } else {
            (pos + 1).min(p.questions.len() - 1)
        };
        p.questions.swap(pos, new_pos);
        self.renumber();
        Ok(())
    }

    /// Attach a branch rule to a question. The target must be a later page
    /// (or Submit); forward-only branches keep the fill flow acyclic.
    pub fn set_branch(
        &mut self,
        page: usize,
        question_id: &str,
        rule: BranchRule,
    ) -> Result<(), FormDocError> {
        if page >= self.pages.len() {
            return Err(FormDocError::PageOutOfBounds(page));
        }
        if let PageTarget::Page(target) = rule.target {
            if target >= self.pages.len() {
                return Err(FormDocError::TargetOutOfBounds(target));
            }
            if target <= page {
                return Err(FormDocError::BackwardBranch);
            }
        }
        let p = &mut self.pages[page];
        if p.question(question_id).is_none() {
            return Err(FormDocError::QuestionNotOnPage);
        }
        p.branches.insert(question_id.to_string(), rule);
        Ok(())
    }

    pub fn clear_branch(&mut self, page: usize, question_id: &str) -> Result<(), FormDocError> {
        let p = self
            .pages
            .get_mut(page)
            .ok_or(FormDocError::PageOutOfBounds(page))?;
        p.branches.remove(question_id);
        Ok(())
    }

    /// Structural check run before publishing
    pub fn validate(&self) -> Vec<FormIssue> {
        use super::question::QuestionKind;

        let mut issues = Vec::new();
        if self.title.trim().is_empty() {
            issues.push(FormIssue::EmptyTitle);
        }
        for (idx, page) in self.pages.iter().enumerate() {
            if page.questions.is_empty() {
                issues.push(FormIssue::EmptyPage { page: idx });
            }
            for question in &page.questions {
                if question.prompt.trim().is_empty() {
                    issues.push(FormIssue::BlankPrompt {
                        page: idx,
                        question: question.number,
                    });
                }
                if let QuestionKind::MultipleChoice { choices } = &question.kind {
                    if choices.len() < 2 {
                        issues.push(FormIssue::TooFewChoices {
                            page: idx,
                            question: question.number,
                        });
                    }
                }
                if page.branches.contains_key(&question.id)
                    && !matches!(question.kind, QuestionKind::MultipleChoice { .. })
                {
                    issues.push(FormIssue::BranchOnNonChoice {
                        page: idx,
                        question: question.number,
                    });
                }
            }
        }
        issues
    }

    /// Apply `remap` to every Page(..) branch target; None drops the rule
    fn remap_branches<F>(&mut self, remap: F)
    where
        F: Fn(usize) -> Option<usize>,
    {
        for page in &mut self.pages {
            page.branches.retain(|_, rule| match rule.target {
                PageTarget::Submit => true,
                PageTarget::Page(target) => match remap(target) {
                    Some(new_target) => {
                        rule.target = PageTarget::Page(new_target);
                        true
                    }
                    None => false,
                },
            });
        }
    }

    fn drop_backward_branches(&mut self) {
        for (idx, page) in self.pages.iter_mut().enumerate() {
            page.branches.retain(|_, rule| match rule.target {
                PageTarget::Submit => true,
                PageTarget::Page(target) => target > idx,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::question::QuestionKind;
    use pretty_assertions::assert_eq;

    fn mcq(prompt: &str, choices: &[&str]) -> Question {
        Question::new(
            prompt,
            QuestionKind::MultipleChoice {
                choices: choices.iter().map(|s| s.to_string()).collect(),
            },
        )
    }

    fn essay(prompt: &str) -> Question {
        Question::new(prompt, QuestionKind::Essay { max_length: None })
    }

    /// Three pages, two questions each
    fn three_page_form() -> FormDoc {
        let mut doc = FormDoc::new("Registration");
        doc.pages[0].title = "About you".to_string();
        doc.add_question(0, essay("Name?")).unwrap();
        doc.add_question(0, mcq("Attending?", &["Yes", "No"])).unwrap();
        doc.add_page(Page::new("Logistics"));
        doc.add_question(1, essay("Dietary needs?")).unwrap();
        doc.add_question(1, essay("Arrival time?")).unwrap();
        doc.add_page(Page::new("Wrap up"));
        doc.add_question(2, essay("Comments?")).unwrap();
        doc.add_question(2, mcq("Rate us", &["1", "2", "3"])).unwrap();
        doc
    }

    mod numbering {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_numbers_are_monotonic_across_pages() {
            let doc = three_page_form();
            let numbers: Vec<u32> = doc
                .pages
                .iter()
                .flat_map(|p| p.questions.iter().map(|q| q.number))
                .collect();
            assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
        }

        #[test]
        fn test_remove_page_renumbers() {
            let mut doc = three_page_form();
            doc.remove_page(1).unwrap();
            let numbers: Vec<u32> = doc
                .pages
                .iter()
                .flat_map(|p| p.questions.iter().map(|q| q.number))
                .collect();
            assert_eq!(numbers, vec![1, 2, 3, 4]);
        }

        #[test]
        fn test_remove_question_renumbers() {
            let mut doc = three_page_form();
            let first_id = doc.pages[0].questions[0].id.clone();
            doc.remove_question(0, &first_id).unwrap();
            let numbers: Vec<u32> = doc
                .pages
                .iter()
                .flat_map(|p| p.questions.iter().map(|q| q.number))
                .collect();
            assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        }

        #[test]
        fn test_move_page_renumbers_in_new_order() {
            let mut doc = three_page_form();
            doc.move_page(2, 1).unwrap();
            assert_eq!(doc.pages[1].title, "Wrap up");
            // First question of the moved page now carries number 3
            assert_eq!(doc.pages[1].questions[0].number, 3);
        }

        #[test]
        fn test_move_question_within_page() {
            let mut doc = three_page_form();
            let second_id = doc.pages[0].questions[1].id.clone();
            doc.move_question(0, &second_id, true).unwrap();
            assert_eq!(doc.pages[0].questions[0].id, second_id);
            assert_eq!(doc.pages[0].questions[0].number, 1);
        }
    }

    mod branches {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_set_branch_forward_ok() {
            let mut doc = three_page_form();
            let qid = doc.pages[0].questions[1].id.clone();
            let rule = BranchRule {
                assert_on: "No".into(),
                target: PageTarget::Page(2),
            };
            assert!(doc.set_branch(0, &qid, rule).is_ok());
            assert!(doc.pages[0].branches.contains_key(&qid));
        }

        #[test]
        fn test_set_branch_backward_rejected() {
            let mut doc = three_page_form();
            let qid = doc.pages[1].questions[0].id.clone();
            let rule = BranchRule {
                assert_on: "x".into(),
                target: PageTarget::Page(0),
            };
            assert_eq!(doc.set_branch(1, &qid, rule), Err(FormDocError::BackwardBranch));
        }

        #[test]
        fn test_set_branch_to_own_page_rejected() {
            let mut doc = three_page_form();
            let qid = doc.pages[0].questions[0].id.clone();
            let rule = BranchRule {
                assert_on: "x".into(),
                target: PageTarget::Page(0),
            };
            assert_eq!(doc.set_branch(0, &qid, rule), Err(FormDocError::BackwardBranch));
        }

        #[test]
        fn test_set_branch_unknown_question_rejected() {
            let mut doc = three_page_form();
            let rule = BranchRule {
                assert_on: "x".into(),
                target: PageTarget::Page(1),
            };
            assert_eq!(
                doc.set_branch(0, "nope", rule),
                Err(FormDocError::QuestionNotOnPage)
            );
        }

        #[test]
        fn test_remove_page_drops_rules_targeting_it() {
            let mut doc = three_page_form();
            let qid = doc.pages[0].questions[1].id.clone();
            doc.set_branch(
                0,
                &qid,
                BranchRule {
                    assert_on: "No".into(),
                    target: PageTarget::Page(1),
                },
            )
            .unwrap();
            doc.remove_page(1).unwrap();
            assert!(doc.pages[0].branches.is_empty());
        }

        #[test]
        fn test_remove_page_shifts_later_targets() {
            let mut doc = three_page_form();
            let qid = doc.pages[0].questions[1].id.clone();
            doc.set_branch(
                0,
                &qid,
                BranchRule {
                    assert_on: "No".into(),
                    target: PageTarget::Page(2),
                },
            )
            .unwrap();
            doc.remove_page(1).unwrap();
            assert_eq!(
                doc.pages[0].branches[&qid].target,
                PageTarget::Page(1)
            );
        }

        #[test]
        fn test_submit_target_survives_page_removal() {
            let mut doc = three_page_form();
            let qid = doc.pages[0].questions[1].id.clone();
            doc.set_branch(
                0,
                &qid,
                BranchRule {
                    assert_on: "No".into(),
                    target: PageTarget::Submit,
                },
            )
            .unwrap();
            doc.remove_page(2).unwrap();
            assert_eq!(doc.pages[0].branches[&qid].target, PageTarget::Submit);
        }

        #[test]
        fn test_move_page_drops_now_backward_rules() {
            let mut doc = three_page_form();
            let qid = doc.pages[0].questions[1].id.clone();
            doc.set_branch(
                0,
                &qid,
                BranchRule {
                    assert_on: "No".into(),
                    target: PageTarget::Page(1),
                },
            )
            .unwrap();
            // Moving the source page after its target invalidates the rule
            doc.move_page(0, 2).unwrap();
            let moved = doc.pages.iter().position(|p| p.title == "About you").unwrap();
            assert!(doc.pages[moved].branches.is_empty());
        }

        #[test]
        fn test_rule_matches_canonical_value() {
            let rule = BranchRule {
                assert_on: "Yes".into(),
                target: PageTarget::Submit,
            };
            assert!(rule.matches(&AnswerValue::Choice("Yes".into())));
            assert!(!rule.matches(&AnswerValue::Choice("No".into())));
        }
    }

    mod structural_validation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_well_formed_doc_has_no_issues() {
            let doc = three_page_form();
            assert!(doc.validate().is_empty());
        }

        #[test]
        fn test_empty_title_flagged() {
            let mut doc = three_page_form();
            doc.title = "  ".to_string();
            assert!(doc.validate().contains(&FormIssue::EmptyTitle));
        }

        #[test]
        fn test_page_without_questions_flagged() {
            let mut doc = three_page_form();
            doc.add_page(Page::new("Empty"));
            assert!(doc.validate().contains(&FormIssue::EmptyPage { page: 3 }));
        }

        #[test]
        fn test_single_choice_mcq_flagged() {
            let mut doc = FormDoc::new("F");
            doc.add_question(0, mcq("Pick", &["Only"])).unwrap();
            assert!(doc
                .validate()
                .contains(&FormIssue::TooFewChoices { page: 0, question: 1 }));
        }

        #[test]
        fn test_branch_on_essay_flagged() {
            let mut doc = three_page_form();
            let qid = doc.pages[0].questions[0].id.clone();
            doc.set_branch(
                0,
                &qid,
                BranchRule {
                    assert_on: "anything".into(),
                    target: PageTarget::Page(1),
                },
            )
            .unwrap();
            assert!(doc
                .validate()
                .contains(&FormIssue::BranchOnNonChoice { page: 0, question: 1 }));
        }
    }

    mod lookups {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_question_lookup_across_pages() {
            let doc = three_page_form();
            let id = doc.pages[2].questions[0].id.clone();
            assert_eq!(doc.question(&id).unwrap().prompt, "Comments?");
            assert!(doc.question("missing").is_none());
        }

        #[test]
        fn test_new_form_has_one_page() {
            let doc = FormDoc::new("Fresh");
            assert_eq!(doc.pages.len(), 1);
            assert_eq!(doc.question_count(), 0);
        }
    }
}
