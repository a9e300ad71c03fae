//! Builder cursor state for authoring a form

use super::document::FormDoc;

/// Which builder pane has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuilderFocus {
    #[default]
    Pages,
    Questions,
}

impl BuilderFocus {
    pub fn toggle(&mut self) {
        *self = match self {
            Self::Pages => Self::Questions,
            Self::Questions => Self::Pages,
        };
    }
}

/// Working copy of a form plus the builder cursor
#[derive(Debug, Clone)]
pub struct BuilderState {
    pub doc: FormDoc,
    pub selected_page: usize,
    pub selected_question: usize,
    pub focus: BuilderFocus,
    /// Set on every edit, cleared on save
    pub dirty: bool,
}

impl BuilderState {
    pub fn new(doc: FormDoc) -> Self {
        Self {
            doc,
            selected_page: 0,
            selected_question: 0,
            focus: BuilderFocus::default(),
            dirty: false,
        }
    }

    pub fn select_next_page(&mut self) {
        if self.selected_page + 1 < self.doc.pages.len() {
            self.selected_page += 1;
            self.selected_question = 0;
        }
    }

    pub fn select_prev_page(&mut self) {
        if self.selected_page > 0 {
            self.selected_page -= 1;
            self.selected_question = 0;
        }
    }

    pub fn select_next_question(&mut self) {
        let count = self.question_count();
        if count > 0 && self.selected_question + 1 < count {
            self.selected_question += 1;
        }
    }

    pub fn select_prev_question(&mut self) {
        if self.selected_question > 0 {
            self.selected_question -= 1;
        }
    }

    pub fn question_count(&self) -> usize {
        self.doc
            .pages
            .get(self.selected_page)
            .map(|p| p.questions.len())
            .unwrap_or(0)
    }

    pub fn selected_question_id(&self) -> Option<String> {
        self.doc
            .pages
            .get(self.selected_page)?
            .questions
            .get(self.selected_question)
            .map(|q| q.id.clone())
    }

    /// Clamp both cursors after a structural edit
    pub fn clamp_cursor(&mut self) {
        if self.doc.pages.is_empty() {
            self.selected_page = 0;
            self.selected_question = 0;
            return;
        }
        self.selected_page = self.selected_page.min(self.doc.pages.len() - 1);
        let count = self.question_count();
        self.selected_question = if count == 0 {
            0
        } else {
            self.selected_question.min(count - 1)
        };
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::document::Page;
    use crate::state::forms::question::{Question, QuestionKind};

    fn builder_with_two_pages() -> BuilderState {
        let mut doc = FormDoc::new("Survey");
        doc.add_question(0, Question::new("A", QuestionKind::default()))
            .unwrap();
        doc.add_question(0, Question::new("B", QuestionKind::default()))
            .unwrap();
        doc.add_page(Page::new("Second"));
        doc.add_question(1, Question::new("C", QuestionKind::default()))
            .unwrap();
        BuilderState::new(doc)
    }

    #[test]
    fn test_page_navigation_resets_question_cursor() {
        let mut state = builder_with_two_pages();
        state.selected_question = 1;
        state.select_next_page();
        assert_eq!(state.selected_page, 1);
        assert_eq!(state.selected_question, 0);
    }

    #[test]
    fn test_page_navigation_clamps_at_ends() {
        let mut state = builder_with_two_pages();
        state.select_prev_page();
        assert_eq!(state.selected_page, 0);
        state.select_next_page();
        state.select_next_page();
        assert_eq!(state.selected_page, 1);
    }

    #[test]
    fn test_question_navigation_clamps() {
        let mut state = builder_with_two_pages();
        state.select_next_question();
        assert_eq!(state.selected_question, 1);
        state.select_next_question();
        assert_eq!(state.selected_question, 1);
    }

    #[test]
    fn test_selected_question_id() {
        let state = builder_with_two_pages();
        let id = state.selected_question_id().unwrap();
        assert_eq!(state.doc.pages[0].questions[0].id, id);
    }

    #[test]
    fn test_clamp_cursor_after_removal() {
        let mut state = builder_with_two_pages();
        state.selected_page = 1;
        state.doc.remove_page(1).unwrap();
        state.clamp_cursor();
        assert_eq!(state.selected_page, 0);
        assert_eq!(state.selected_question, 0);
    }

    #[test]
    fn test_focus_toggle() {
        let mut focus = BuilderFocus::default();
        focus.toggle();
        assert_eq!(focus, BuilderFocus::Questions);
        focus.toggle();
        assert_eq!(focus, BuilderFocus::Pages);
    }
}
