//! Application state definitions

use super::attendance::ScanMachine;
use super::forms::{BuilderState, EditorState, FormDoc, FormSession};
use super::judging::{Criterion, LeaderboardRow, ScoreSheet, TeamAssignment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current view in the application
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    /// Splash screen with logo animation
    Splash,
    #[default]
    Events,
    EventDetail,
    EventCreate,
    EventEdit,
    Attendance,
    Forms,
    FormBuilder,
    QuestionEdit,
    PageEdit,
    BranchEdit,
    FormPreview,
    Judging,
    ScoreEntry,
    Leaderboard,
    Config,
}

impl View {
    /// Editor views are skipped when walking back through history
    pub fn is_editor(&self) -> bool {
        matches!(
            self,
            View::EventCreate
                | View::EventEdit
                | View::QuestionEdit
                | View::PageEdit
                | View::BranchEdit
        )
    }
}

/// View parameters for navigation
#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct ViewParams {
    pub event_id: Option<String>,
    pub form_id: Option<String>,
    pub team_id: Option<String>,
}

/// Sort field for the events list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventSortField {
    #[default]
    StartsAt,
    Name,
    Status,
    Registered,
}

impl EventSortField {
    pub fn next(&self) -> Self {
        match self {
            Self::StartsAt => Self::Name,
            Self::Name => Self::Status,
            Self::Status => Self::Registered,
            Self::Registered => Self::StartsAt,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::StartsAt => "Start",
            Self::Name => "Name",
            Self::Status => "Status",
            Self::Registered => "Registered",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

/// Event information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: String,
    pub venue: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub capacity: u32,
    pub status: String,
    pub registered_count: u32,
    pub checked_in_count: u32,
}

impl Event {
    #[allow(dead_code)]
    pub fn status_color(&self) -> &'static str {
        match self.status.as_str() {
            "draft" => "gray",
            "published" => "green",
            "archived" => "red",
            _ => "gray",
        }
    }

    /// Remaining seats; None when the event is uncapped
    pub fn seats_left(&self) -> Option<u32> {
        if self.capacity == 0 {
            None
        } else {
            Some(self.capacity.saturating_sub(self.registered_count))
        }
    }
}

/// One registration row for an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub attendee_code: String,
    pub name: String,
    pub email: String,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
}

/// Attendance counts for an event
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub registered: u32,
    pub checked_in: u32,
    pub checked_out: u32,
}

/// Daemon information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendInfo {
    pub version: String,
    pub uptime_seconds: u64,
    pub event_count: u32,
}

/// What a delete confirmation dialog is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteKind {
    Event,
    Form,
}

impl DeleteKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Form => "form",
        }
    }
}

/// Pending destructive action awaiting confirmation
#[derive(Debug, Clone)]
pub struct PendingDelete {
    pub kind: DeleteKind,
    pub id: String,
    pub display: String,
    /// false = Cancel highlighted, true = Delete highlighted
    pub selected_confirm: bool,
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub view_params: ViewParams,
    pub view_history: Vec<(View, ViewParams)>,

    // Events
    pub events: Vec<Event>,
    pub selected_event_id: Option<String>,

    // Forms
    pub forms: Vec<FormDoc>,
    pub builder: Option<BuilderState>,
    pub preview: Option<FormSession>,
    pub editor: EditorState,

    // Attendance
    pub registrations: Vec<Registration>,
    pub attendance: AttendanceSummary,
    pub scan: ScanMachine,

    // Judging
    pub teams: Vec<TeamAssignment>,
    pub criteria: Vec<Criterion>,
    pub leaderboard: Vec<LeaderboardRow>,
    pub sheet: Option<ScoreSheet>,

    // Selection
    pub selected_index: usize,

    // Sorting / filters
    pub event_sort_field: EventSortField,
    pub event_sort_direction: SortDirection,
    pub show_archived_events: bool,

    // UI state
    pub scroll_offset: usize,
    pub daemon_connected: bool,
    pub pending_delete: Option<PendingDelete>,
    pub errors: Vec<String>,
}

impl AppState {
    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Reset selection
    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    /// Scroll down
    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
    }

    /// Scroll up
    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Scroll down a page (10 lines)
    pub fn scroll_down_page(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(10);
    }

    /// Scroll up a page (10 lines)
    pub fn scroll_up_page(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(10);
    }

    /// Cycle event sort field
    pub fn cycle_event_sort_field(&mut self) {
        self.event_sort_field = self.event_sort_field.next();
        self.reset_selection();
    }

    /// Toggle event sort direction
    pub fn toggle_event_sort_direction(&mut self) {
        self.event_sort_direction = self.event_sort_direction.toggle();
        self.reset_selection();
    }

    /// Get sorted events honoring the archived filter
    pub fn sorted_events(&self) -> Vec<&Event> {
        let mut events: Vec<_> = self
            .events
            .iter()
            .filter(|e| self.show_archived_events || e.status != "archived")
            .collect();

        events.sort_by(|a, b| {
            let cmp = match self.event_sort_field {
                EventSortField::StartsAt => a.starts_at.cmp(&b.starts_at),
                EventSortField::Name => a.name.cmp(&b.name),
                EventSortField::Status => a.status.cmp(&b.status),
                EventSortField::Registered => a.registered_count.cmp(&b.registered_count),
            };

            match self.event_sort_direction {
                SortDirection::Asc => cmp,
                SortDirection::Desc => cmp.reverse(),
            }
        });

        events
    }

    pub fn selected_event(&self) -> Option<&Event> {
        let id = self.selected_event_id.as_ref()?;
        self.events.iter().find(|e| &e.id == id)
    }

    /// Push an error for the error dialog queue
    pub fn push_error(&mut self, message: String) {
        self.errors.push(message);
    }

    /// Dismiss the currently shown error
    pub fn dismiss_error(&mut self) {
        if !self.errors.is_empty() {
            self.errors.remove(0);
        }
    }

    pub fn current_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(id: &str, name: &str, status: &str, registered: u32, day: u32) -> Event {
        Event {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            venue: "Main hall".to_string(),
            starts_at: Utc.with_ymd_and_hms(2025, 6, day, 9, 0, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2025, 6, day, 17, 0, 0).unwrap(),
            capacity: 100,
            status: status.to_string(),
            registered_count: registered,
            checked_in_count: 0,
        }
    }

    mod selection {
        use super::*;

        #[test]
        fn test_move_selection_bounds() {
            let mut state = AppState::default();
            state.move_selection_up();
            assert_eq!(state.selected_index, 0);
            state.move_selection_down(3);
            state.move_selection_down(3);
            state.move_selection_down(3);
            assert_eq!(state.selected_index, 2);
        }

        #[test]
        fn test_move_selection_down_empty_list() {
            let mut state = AppState::default();
            state.move_selection_down(0);
            assert_eq!(state.selected_index, 0);
        }

        #[test]
        fn test_reset_selection_clears_scroll() {
            let mut state = AppState::default();
            state.selected_index = 5;
            state.scroll_down_page();
            state.reset_selection();
            assert_eq!(state.selected_index, 0);
            assert_eq!(state.scroll_offset, 0);
        }

        #[test]
        fn test_scroll_saturates_at_zero() {
            let mut state = AppState::default();
            state.scroll_up();
            assert_eq!(state.scroll_offset, 0);
            state.scroll_down_page();
            state.scroll_up_page();
            assert_eq!(state.scroll_offset, 0);
        }
    }

    mod sorting {
        use super::*;

        #[test]
        fn test_sort_field_cycles() {
            let mut field = EventSortField::default();
            let mut labels = vec![field.label()];
            for _ in 0..3 {
                field = field.next();
                labels.push(field.label());
            }
            assert_eq!(labels, vec!["Start", "Name", "Status", "Registered"]);
            assert_eq!(field.next(), EventSortField::StartsAt);
        }

        #[test]
        fn test_sorted_events_by_start_date() {
            let mut state = AppState::default();
            state.events = vec![
                event("b", "Beta", "published", 10, 20),
                event("a", "Alpha", "published", 50, 10),
            ];
            let sorted = state.sorted_events();
            assert_eq!(sorted[0].id, "a");
            assert_eq!(sorted[1].id, "b");
        }

        #[test]
        fn test_sort_direction_reverses() {
            let mut state = AppState::default();
            state.events = vec![
                event("b", "Beta", "published", 10, 20),
                event("a", "Alpha", "published", 50, 10),
            ];
            state.toggle_event_sort_direction();
            let sorted = state.sorted_events();
            assert_eq!(sorted[0].id, "b");
        }

        #[test]
        fn test_archived_events_hidden_by_default() {
            let mut state = AppState::default();
            state.events = vec![
                event("a", "Alpha", "published", 0, 10),
                event("z", "Zulu", "archived", 0, 11),
            ];
            assert_eq!(state.sorted_events().len(), 1);
            state.show_archived_events = true;
            assert_eq!(state.sorted_events().len(), 2);
        }

        #[test]
        fn test_sorted_by_registered_count() {
            let mut state = AppState::default();
            state.events = vec![
                event("a", "Alpha", "published", 50, 10),
                event("b", "Beta", "published", 10, 20),
            ];
            state.event_sort_field = EventSortField::Registered;
            let sorted = state.sorted_events();
            assert_eq!(sorted[0].id, "b");
        }
    }

    mod lookups {
        use super::*;

        #[test]
        fn test_selected_event() {
            let mut state = AppState::default();
            state.events = vec![event("a", "Alpha", "published", 0, 10)];
            assert!(state.selected_event().is_none());
            state.selected_event_id = Some("a".to_string());
            assert_eq!(state.selected_event().unwrap().name, "Alpha");
        }

        #[test]
        fn test_seats_left() {
            let mut e = event("a", "Alpha", "published", 90, 10);
            assert_eq!(e.seats_left(), Some(10));
            e.capacity = 0;
            assert_eq!(e.seats_left(), None);
            e.capacity = 50;
            assert_eq!(e.seats_left(), Some(0));
        }

        #[test]
        fn test_status_color() {
            assert_eq!(event("a", "A", "published", 0, 1).status_color(), "green");
            assert_eq!(event("a", "A", "draft", 0, 1).status_color(), "gray");
            assert_eq!(event("a", "A", "archived", 0, 1).status_color(), "red");
            assert_eq!(event("a", "A", "unknown", 0, 1).status_color(), "gray");
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn test_error_queue_fifo() {
            let mut state = AppState::default();
            state.push_error("first".to_string());
            state.push_error("second".to_string());
            assert_eq!(state.current_error(), Some("first"));
            state.dismiss_error();
            assert_eq!(state.current_error(), Some("second"));
            state.dismiss_error();
            assert_eq!(state.current_error(), None);
        }

        #[test]
        fn test_dismiss_on_empty_queue_is_noop() {
            let mut state = AppState::default();
            state.dismiss_error();
            assert!(state.errors.is_empty());
        }
    }
}
