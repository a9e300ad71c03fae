//! Application state and core logic

use crate::backend::DaemonClient;
use crate::config::TuiConfig;
use crate::state::{
    parse_badge, AppState, BackendInfo, BranchForm, BuilderFocus, BuilderState, DeleteKind,
    EditorState, EventCreateForm, EventEditForm, EventSortField, FieldValue, FormDoc,
    FormSession, Page, PageForm, PendingDelete, QuestionForm, ScanMode, ScanOutcome,
    ScoreSheet, SessionPhase, SortDirection, SplashState, View, ViewParams,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

/// Allowed event status values, as the daemon understands them
const EVENT_STATUSES: &[&str] = &["draft", "published", "archived"];

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Daemon client for gRPC communication
    pub daemon: DaemonClient,
    /// Whether the app should quit
    quit: bool,
    /// Transient status message shown in the status bar
    pub status_message: Option<String>,
    /// Splash screen animation state
    pub splash_state: Option<SplashState>,
    /// Daemon info for the config panel
    pub backend_info: Option<BackendInfo>,
    /// Judge identity used when scoring
    pub judge_id: String,
    /// Loaded user configuration
    pub config: TuiConfig,
    /// Timestamp of last Ctrl+C press for double-tap quit
    pub last_ctrl_c: Option<Instant>,
}

impl App {
    /// Create a new App instance
    pub async fn new() -> Result<Self> {
        let config = TuiConfig::load().unwrap_or_default();
        let mut daemon = DaemonClient::new().await?;
        let mut state = AppState::default();

        // Start with splash screen
        state.current_view = View::Splash;

        // Apply saved preferences
        state.event_sort_field = sort_field_from_config(config.event_sort_field.as_deref());
        state.event_sort_direction =
            sort_direction_from_config(config.event_sort_direction.as_deref());
        state.show_archived_events = config.show_archived_events.unwrap_or(false);
        let judge_id = config
            .judge_id
            .clone()
            .unwrap_or_else(|| "judge-local".to_string());

        // Check daemon connection
        state.daemon_connected = daemon.check_connection().await;

        // Load events if connected
        if state.daemon_connected {
            if let Ok(events) = daemon.list_events(state.show_archived_events).await {
                state.events = events;
            }
        }

        Ok(Self {
            state,
            daemon,
            quit: false,
            status_message: None,
            splash_state: Some(SplashState::new()),
            backend_info: None,
            judge_id,
            config,
            last_ctrl_c: None,
        })
    }

    /// Update splash animation state.
    /// Returns true if animation is complete and we should transition.
    pub fn update_splash(&mut self, terminal_height: u16) -> bool {
        if let Some(ref mut splash) = self.splash_state {
            splash.update(terminal_height);
            if splash.is_complete() {
                self.splash_state = None;
                self.state.current_view = View::Events;
                return true;
            }
        }
        false
    }

    /// Check if in splash screen
    pub fn in_splash(&self) -> bool {
        matches!(self.state.current_view, View::Splash)
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Persist current preferences to the config file
    pub fn save_config(&mut self) {
        self.config.event_sort_field =
            Some(sort_field_to_config(self.state.event_sort_field).to_string());
        self.config.event_sort_direction = Some(
            match self.state.event_sort_direction {
                SortDirection::Asc => "asc",
                SortDirection::Desc => "desc",
            }
            .to_string(),
        );
        self.config.show_archived_events = Some(self.state.show_archived_events);
        self.config.judge_id = Some(self.judge_id.clone());
        if let Err(err) = self.config.save() {
            tracing::warn!("Failed to save config: {err}");
        }
    }

    /// Handle a key event, dispatching on overlay state then current view
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Error dialog swallows input until dismissed
        if self.state.current_error().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Confirm dialog
        if self.state.pending_delete.is_some() {
            return self.handle_confirm_key(key).await;
        }

        // Double Ctrl+C quits from anywhere outside the splash
        if !self.in_splash()
            && key.code == KeyCode::Char('c')
            && key.modifiers.contains(KeyModifiers::CONTROL)
        {
            let again = self
                .last_ctrl_c
                .is_some_and(|t| t.elapsed() < Duration::from_millis(1500));
            if again {
                self.quit = true;
            } else {
                self.last_ctrl_c = Some(Instant::now());
                self.status_message = Some("Press Ctrl+C again to quit".to_string());
            }
            return Ok(());
        }

        match self.state.current_view {
            View::Splash => self.handle_splash_key(key).await,
            View::Events => self.handle_events_key(key).await,
            View::EventDetail => self.handle_event_detail_key(key).await,
            View::EventCreate => self.handle_event_create_key(key).await,
            View::EventEdit => self.handle_event_edit_key(key).await,
            View::Attendance => self.handle_attendance_key(key).await,
            View::Forms => self.handle_forms_key(key).await,
            View::FormBuilder => self.handle_builder_key(key).await,
            View::QuestionEdit => self.handle_question_edit_key(key).await,
            View::PageEdit => self.handle_page_edit_key(key).await,
            View::BranchEdit => self.handle_branch_edit_key(key).await,
            View::FormPreview => self.handle_form_preview_key(key).await,
            View::Judging => self.handle_judging_key(key).await,
            View::ScoreEntry => self.handle_score_entry_key(key).await,
            View::Leaderboard => self.handle_leaderboard_key(key).await,
            View::Config => self.handle_config_key(key).await,
        }
    }

    /// Navigate to a view, remembering where we came from
    pub fn navigate(&mut self, view: View, params: ViewParams) {
        self.state.view_history.push((
            self.state.current_view.clone(),
            self.state.view_params.clone(),
        ));
        self.state.current_view = view;
        self.state.view_params = params;
        self.state.reset_selection();
    }

    /// Walk back through the view history, skipping editor views
    pub fn go_back(&mut self) {
        while let Some((view, params)) = self.state.view_history.pop() {
            if view.is_editor() {
                continue;
            }
            self.state.current_view = view;
            self.state.view_params = params;
            self.state.reset_selection();
            return;
        }
        // History exhausted: land on the events list
        self.state.current_view = View::Events;
        self.state.view_params = ViewParams::default();
        self.state.reset_selection();
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Overlays

    async fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('k') | KeyCode::Tab => {
                if let Some(pending) = self.state.pending_delete.as_mut() {
                    pending.selected_confirm = !pending.selected_confirm;
                }
            }
            KeyCode::Esc => {
                self.state.pending_delete = None;
            }
            KeyCode::Enter => {
                if let Some(pending) = self.state.pending_delete.take() {
                    if pending.selected_confirm {
                        match pending.kind {
                            DeleteKind::Event => self.delete_event(&pending.id).await,
                            DeleteKind::Form => self.delete_form(&pending.id).await,
                        }
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn delete_event(&mut self, event_id: &str) {
        match self.daemon.delete_event(event_id).await {
            Ok(()) => {
                self.state.events.retain(|e| e.id != event_id);
                if self.state.selected_event_id.as_deref() == Some(event_id) {
                    self.state.selected_event_id = None;
                }
                self.state.reset_selection();
                self.status_message = Some("Event deleted".to_string());
            }
            Err(err) => {
                tracing::error!("delete_event failed: {err}");
                self.push_error("Failed to delete event");
            }
        }
    }

    async fn delete_form(&mut self, form_id: &str) {
        match self.daemon.delete_form(form_id).await {
            Ok(()) => {
                self.state.forms.retain(|f| f.id != form_id);
                self.state.reset_selection();
                self.status_message = Some("Form deleted".to_string());
            }
            Err(err) => {
                tracing::error!("delete_form failed: {err}");
                self.push_error("Failed to delete form");
            }
        }
    }

    // ------------------------------------------------------------------
    // Splash

    async fn handle_splash_key(&mut self, _key: KeyEvent) -> Result<()> {
        if let Some(ref mut splash) = self.splash_state {
            splash.skip();
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Events

    async fn handle_events_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.state.sorted_events().len();
                self.state.move_selection_down(max);
            }
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Enter => {
                if let Some(id) = self.selected_event_row_id() {
                    self.state.selected_event_id = Some(id.clone());
                    self.navigate(
                        View::EventDetail,
                        ViewParams {
                            event_id: Some(id),
                            ..Default::default()
                        },
                    );
                }
            }
            KeyCode::Char('n') => {
                self.state.editor = EditorState::EventCreate(EventCreateForm::new());
                self.navigate(View::EventCreate, ViewParams::default());
            }
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_event_row_id() {
                    self.state.selected_event_id = Some(id);
                    if let Some(event) = self.state.selected_event().cloned() {
                        self.state.editor =
                            EditorState::EventEdit(EventEditForm::from_event(&event));
                        self.navigate(View::EventEdit, ViewParams::default());
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_event_row_id() {
                    let display = self
                        .state
                        .events
                        .iter()
                        .find(|e| e.id == id)
                        .map(|e| e.name.clone())
                        .unwrap_or_default();
                    self.state.pending_delete = Some(PendingDelete {
                        kind: DeleteKind::Event,
                        id,
                        display,
                        selected_confirm: false,
                    });
                }
            }
            KeyCode::Char('s') => self.state.cycle_event_sort_field(),
            KeyCode::Char('S') => self.state.toggle_event_sort_direction(),
            KeyCode::Char('a') => {
                self.state.show_archived_events = !self.state.show_archived_events;
                self.state.reset_selection();
                self.refresh_events().await;
            }
            KeyCode::Char('y') => {
                if let Some(id) = self.selected_event_row_id() {
                    match self.copy_to_clipboard(&id) {
                        Ok(()) => self.status_message = Some("Event id copied".to_string()),
                        Err(_) => self.push_error("Clipboard unavailable"),
                    }
                }
            }
            KeyCode::Char('r') => self.refresh_events().await,
            KeyCode::Char('c') => {
                self.backend_info = self.daemon.get_daemon_info().await.ok();
                self.navigate(View::Config, ViewParams::default());
            }
            _ => {}
        }
        Ok(())
    }

    fn selected_event_row_id(&self) -> Option<String> {
        self.state
            .sorted_events()
            .get(self.state.selected_index)
            .map(|e| e.id.clone())
    }

    async fn refresh_events(&mut self) {
        match self
            .daemon
            .list_events(self.state.show_archived_events)
            .await
        {
            Ok(events) => {
                self.state.events = events;
                self.state.daemon_connected = true;
            }
            Err(err) => {
                tracing::error!("list_events failed: {err}");
                self.state.daemon_connected = false;
                self.push_error("Failed to load events");
            }
        }
    }

    async fn handle_event_detail_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('e') => {
                if let Some(event) = self.state.selected_event().cloned() {
                    self.state.editor =
                        EditorState::EventEdit(EventEditForm::from_event(&event));
                    self.navigate(View::EventEdit, ViewParams::default());
                }
            }
            KeyCode::Char('1') => self.open_attendance().await,
            KeyCode::Char('2') => self.open_forms().await,
            KeyCode::Char('3') => self.open_judging().await,
            KeyCode::Char('4') => self.open_leaderboard().await,
            KeyCode::Down | KeyCode::Char('j') => self.state.scroll_down(),
            KeyCode::Up | KeyCode::Char('k') => self.state.scroll_up(),
            KeyCode::Char('d') => self.state.scroll_down_page(),
            KeyCode::Char('u') => self.state.scroll_up_page(),
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
        Ok(())
    }

    /// Handle keys in the event create editor
    async fn handle_event_create_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.save_event_create().await;
            }
            KeyCode::Char('w') if key.modifiers.contains(crate::platform::COPY_MODIFIER) => {
                self.save_event_create().await;
            }
            KeyCode::Esc => {
                self.state.editor = EditorState::None;
                self.go_back();
            }
            _ => self.editor_input(&key),
        }
        Ok(())
    }

    async fn save_event_create(&mut self) {
        let EditorState::EventCreate(form) = &self.state.editor else {
            return;
        };
        let name = form.name.as_text().trim().to_string();
        if name.is_empty() {
            self.push_error("Event name is required");
            return;
        }
        let (starts_at, ends_at) = match (form.start_time(), form.end_time()) {
            (Ok(s), Ok(e)) => (s, e),
            (Err(msg), _) | (_, Err(msg)) => {
                self.push_error(msg);
                return;
            }
        };
        if ends_at < starts_at {
            self.push_error("Event cannot end before it starts");
            return;
        }
        let description = form.description.as_text().to_string();
        let venue = form.venue.as_text().to_string();
        let capacity = form.capacity.as_count();

        let result = self
            .daemon
            .create_event(&name, &description, &venue, starts_at, ends_at, capacity)
            .await;
        match result {
            Ok(new_id) => {
                self.refresh_events().await;
                self.state.selected_event_id = Some(new_id.clone());
                self.state.editor = EditorState::None;
                self.status_message = Some("Event created".to_string());
                self.go_back();
                self.navigate(
                    View::EventDetail,
                    ViewParams {
                        event_id: Some(new_id),
                        ..Default::default()
                    },
                );
            }
            Err(err) => {
                tracing::error!("create_event failed: {err}");
                self.push_error("Failed to create event");
            }
        }
    }

    /// Handle keys in the event edit editor
    async fn handle_event_edit_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.save_event_edit().await;
            }
            KeyCode::Char('w') if key.modifiers.contains(crate::platform::COPY_MODIFIER) => {
                self.save_event_edit().await;
            }
            KeyCode::Esc => {
                self.state.editor = EditorState::None;
                self.go_back();
            }
            _ => self.editor_input(&key),
        }
        Ok(())
    }

    async fn save_event_edit(&mut self) {
        let Some(event_id) = self.state.selected_event_id.clone() else {
            self.push_error("No event selected");
            return;
        };
        let EditorState::EventEdit(form) = &self.state.editor else {
            return;
        };
        let status = form.status.as_text().trim().to_string();
        if !EVENT_STATUSES.contains(&status.as_str()) {
            self.push_error(format!(
                "Status must be one of: {}",
                EVENT_STATUSES.join(", ")
            ));
            return;
        }
        let (starts_at, ends_at) = match (form.start_time(), form.end_time()) {
            (Ok(s), Ok(e)) => (s, e),
            (Err(msg), _) | (_, Err(msg)) => {
                self.push_error(msg);
                return;
            }
        };
        let name = form.name.as_text().to_string();
        let description = form.description.as_text().to_string();
        let venue = form.venue.as_text().to_string();
        let capacity = form.capacity.as_count();

        let result = self
            .daemon
            .update_event(
                &event_id,
                &name,
                &description,
                &venue,
                starts_at,
                ends_at,
                capacity,
                &status,
            )
            .await;
        if result.is_ok() {
            self.refresh_events().await;
            self.state.editor = EditorState::None;
            self.status_message = Some("Event updated".to_string());
            self.go_back();
        } else {
            self.push_error("Failed to update event");
        }
    }

    /// Shared editor field input: Tab cycling, typing, toggles, newlines
    fn editor_input(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Tab => self.state.editor.next_field(),
            KeyCode::BackTab => self.state.editor.prev_field(),
            KeyCode::Char(' ') => {
                if let Some(field) = self.state.editor.get_active_field_mut() {
                    if matches!(field.value, FieldValue::Toggle(_)) {
                        field.flip();
                    } else {
                        field.push_char(' ');
                    }
                }
            }
            KeyCode::Char(c) => {
                let shift = key.modifiers.contains(KeyModifiers::SHIFT);
                let ch = if shift { c.to_ascii_uppercase() } else { c };
                if let Some(field) = self.state.editor.get_active_field_mut() {
                    field.push_char(ch);
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.state.editor.get_active_field_mut() {
                    field.pop_char();
                }
            }
            KeyCode::Enter => {
                // Enter in a multiline field adds a newline
                if self.state.editor.is_active_field_multiline() {
                    if let Some(field) = self.state.editor.get_active_field_mut() {
                        field.push_char('\n');
                    }
                }
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Attendance

    async fn open_attendance(&mut self) {
        let Some(event_id) = self.state.selected_event_id.clone() else {
            self.push_error("Select an event first");
            return;
        };
        self.state.scan.reset();
        self.load_registrations(&event_id).await;
        self.load_attendance_summary(&event_id).await;
        self.navigate(
            View::Attendance,
            ViewParams {
                event_id: Some(event_id),
                ..Default::default()
            },
        );
    }

    async fn load_registrations(&mut self, event_id: &str) {
        match self.daemon.list_registrations(event_id).await {
            Ok(registrations) => self.state.registrations = registrations,
            Err(err) => {
                tracing::error!("list_registrations failed: {err}");
                self.push_error("Failed to load registrations");
            }
        }
    }

    async fn load_attendance_summary(&mut self, event_id: &str) {
        if let Ok(summary) = self.daemon.get_attendance_summary(event_id).await {
            self.state.attendance = summary;
        }
    }

    async fn handle_attendance_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => self.go_back(),
            KeyCode::Enter => {
                if let Some(raw) = self.state.scan.take_scan() {
                    self.process_scan(&raw).await;
                }
            }
            KeyCode::Backspace => self.state.scan.backspace(),
            KeyCode::Down => {
                let max = self.state.registrations.len();
                self.state.move_selection_down(max);
            }
            KeyCode::Up => self.state.move_selection_up(),
            // Single-letter commands only apply to an empty buffer so they
            // cannot eat scanner payload characters
            KeyCode::Char('m') if self.state.scan.buffer.is_empty() => {
                self.state.scan.mode.toggle();
            }
            KeyCode::Char('r') if self.state.scan.buffer.is_empty() => {
                if let Some(event_id) = self.state.view_params.event_id.clone() {
                    self.load_registrations(&event_id).await;
                    self.load_attendance_summary(&event_id).await;
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.scan.push_char(c);
            }
            _ => {}
        }
        Ok(())
    }

    /// Parse a raw badge payload and record the scan against the daemon
    async fn process_scan(&mut self, raw: &str) {
        let Some(event_id) = self.state.view_params.event_id.clone() else {
            return;
        };

        let badge = match parse_badge(raw) {
            Ok(badge) => badge,
            Err(err) => {
                self.state.scan.record(ScanOutcome::BadBadge(err));
                return;
            }
        };
        if badge.event_id != event_id {
            self.state
                .scan
                .record(ScanOutcome::BadBadge(crate::state::BadgeError::WrongEvent));
            return;
        }

        let check_out = self.state.scan.mode == ScanMode::CheckOut;
        let result = self
            .daemon
            .record_attendance(&event_id, &badge.attendee_code, check_out)
            .await;

        let outcome = match result {
            Ok(res) => match res.status.as_str() {
                "accepted" => {
                    self.apply_accepted_scan(&badge.attendee_code, check_out, res.recorded_at);
                    ScanOutcome::Accepted {
                        name: res.attendee_name,
                        at: res.recorded_at,
                    }
                }
                "duplicate" => ScanOutcome::AlreadyRecorded {
                    name: res.attendee_name,
                },
                "not_registered" => ScanOutcome::NotRegistered {
                    code: badge.attendee_code.clone(),
                },
                "not_checked_in" => ScanOutcome::NotCheckedIn {
                    code: badge.attendee_code.clone(),
                },
                other => {
                    tracing::warn!("Unknown attendance status: {other}");
                    ScanOutcome::NotRegistered {
                        code: badge.attendee_code.clone(),
                    }
                }
            },
            Err(err) => {
                tracing::error!("record_attendance failed: {err}");
                self.push_error("Failed to record attendance");
                return;
            }
        };
        self.state.scan.record(outcome);
    }

    /// Keep the roster and counters in sync with an accepted scan
    fn apply_accepted_scan(
        &mut self,
        attendee_code: &str,
        check_out: bool,
        at: Option<chrono::DateTime<chrono::Utc>>,
    ) {
        if let Some(reg) = self
            .state
            .registrations
            .iter_mut()
            .find(|r| r.attendee_code == attendee_code)
        {
            reg.checked_in = !check_out;
            reg.checked_in_at = if check_out { None } else { at };
        }
        if check_out {
            self.state.attendance.checked_out += 1;
            self.state.attendance.checked_in = self.state.attendance.checked_in.saturating_sub(1);
        } else {
            self.state.attendance.checked_in += 1;
        }
    }

    // ------------------------------------------------------------------
    // Forms

    async fn open_forms(&mut self) {
        let Some(event_id) = self.state.selected_event_id.clone() else {
            self.push_error("Select an event first");
            return;
        };
        self.load_forms(&event_id).await;
        self.navigate(
            View::Forms,
            ViewParams {
                event_id: Some(event_id),
                ..Default::default()
            },
        );
    }

    async fn load_forms(&mut self, event_id: &str) {
        match self.daemon.list_forms(event_id).await {
            Ok(forms) => self.state.forms = forms,
            Err(err) => {
                tracing::error!("list_forms failed: {err}");
                self.push_error("Failed to load forms");
            }
        }
    }

    async fn handle_forms_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.state.forms.len();
                self.state.move_selection_down(max);
            }
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Enter => {
                if let Some(form) = self.state.forms.get(self.state.selected_index).cloned() {
                    let form_id = form.id.clone();
                    self.state.builder = Some(BuilderState::new(form));
                    self.navigate(
                        View::FormBuilder,
                        ViewParams {
                            form_id: Some(form_id),
                            ..Default::default()
                        },
                    );
                }
            }
            KeyCode::Char('n') => {
                let doc = FormDoc::new("Untitled form");
                let form_id = doc.id.clone();
                let mut builder = BuilderState::new(doc);
                builder.mark_dirty();
                self.state.builder = Some(builder);
                self.navigate(
                    View::FormBuilder,
                    ViewParams {
                        form_id: Some(form_id),
                        ..Default::default()
                    },
                );
            }
            KeyCode::Char('p') => {
                if let Some(form) = self.state.forms.get(self.state.selected_index).cloned() {
                    let form_id = form.id.clone();
                    self.state.preview = Some(FormSession::new(form));
                    self.navigate(
                        View::FormPreview,
                        ViewParams {
                            form_id: Some(form_id),
                            ..Default::default()
                        },
                    );
                }
            }
            KeyCode::Char('d') => {
                if let Some(form) = self.state.forms.get(self.state.selected_index) {
                    self.state.pending_delete = Some(PendingDelete {
                        kind: DeleteKind::Form,
                        id: form.id.clone(),
                        display: form.title.clone(),
                        selected_confirm: false,
                    });
                }
            }
            KeyCode::Char('r') => {
                if let Some(event_id) = self.state.view_params.event_id.clone() {
                    self.load_forms(&event_id).await;
                }
            }
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
        Ok(())
    }

    async fn handle_builder_key(&mut self, key: KeyEvent) -> Result<()> {
        // Save first: it needs &mut self beyond the builder
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.save_builder_form().await;
            return Ok(());
        }

        let Some(builder) = self.state.builder.as_mut() else {
            if key.code == KeyCode::Esc {
                self.go_back();
            }
            return Ok(());
        };

        match key.code {
            KeyCode::Tab => builder.focus.toggle(),
            KeyCode::Down | KeyCode::Char('j') => match builder.focus {
                BuilderFocus::Pages => builder.select_next_page(),
                BuilderFocus::Questions => builder.select_next_question(),
            },
            KeyCode::Up | KeyCode::Char('k') => match builder.focus {
                BuilderFocus::Pages => builder.select_prev_page(),
                BuilderFocus::Questions => builder.select_prev_question(),
            },
            KeyCode::Char('J') => {
                match builder.focus {
                    BuilderFocus::Pages => {
                        let from = builder.selected_page;
                        if builder.doc.move_page(from, from + 1).is_ok() {
                            builder.selected_page =
                                (from + 1).min(builder.doc.pages.len() - 1);
                            builder.mark_dirty();
                        }
                    }
                    BuilderFocus::Questions => {
                        if let Some(id) = builder.selected_question_id() {
                            let page = builder.selected_page;
                            if builder.doc.move_question(page, &id, false).is_ok() {
                                builder.select_next_question();
                                builder.mark_dirty();
                            }
                        }
                    }
                }
            }
            KeyCode::Char('K') => match builder.focus {
                BuilderFocus::Pages => {
                    let from = builder.selected_page;
                    if from > 0 && builder.doc.move_page(from, from - 1).is_ok() {
                        builder.selected_page = from - 1;
                        builder.mark_dirty();
                    }
                }
                BuilderFocus::Questions => {
                    if let Some(id) = builder.selected_question_id() {
                        let page = builder.selected_page;
                        if builder.doc.move_question(page, &id, true).is_ok() {
                            builder.select_prev_question();
                            builder.mark_dirty();
                        }
                    }
                }
            },
            KeyCode::Char('x') => match builder.focus {
                BuilderFocus::Pages => {
                    if builder.doc.pages.len() <= 1 {
                        self.push_error("A form needs at least one page");
                        return Ok(());
                    }
                    let page = builder.selected_page;
                    if builder.doc.remove_page(page).is_ok() {
                        builder.clamp_cursor();
                        builder.mark_dirty();
                    }
                }
                BuilderFocus::Questions => {
                    if let Some(id) = builder.selected_question_id() {
                        let page = builder.selected_page;
                        if builder.doc.remove_question(page, &id).is_ok() {
                            builder.clamp_cursor();
                            builder.mark_dirty();
                        }
                    }
                }
            },
            KeyCode::Char('q') => {
                self.state.editor = EditorState::Question(QuestionForm::new());
                self.navigate(View::QuestionEdit, ViewParams::default());
            }
            KeyCode::Enter => match builder.focus {
                BuilderFocus::Questions => {
                    let page = builder.selected_page;
                    if let Some(question) = builder
                        .doc
                        .pages
                        .get(page)
                        .and_then(|p| p.questions.get(builder.selected_question))
                    {
                        self.state.editor =
                            EditorState::Question(QuestionForm::from_question(question));
                        self.navigate(View::QuestionEdit, ViewParams::default());
                    }
                }
                BuilderFocus::Pages => {
                    let page_idx = builder.selected_page;
                    if let Some(page) = builder.doc.pages.get(page_idx) {
                        self.state.editor = EditorState::Page(PageForm::from_page(page_idx, page));
                        self.navigate(View::PageEdit, ViewParams::default());
                    }
                }
            },
            KeyCode::Char('g') => {
                self.state.editor = EditorState::Page(PageForm::new());
                self.navigate(View::PageEdit, ViewParams::default());
            }
            KeyCode::Char('b') => {
                let page_idx = builder.selected_page;
                if let Some(question) = builder
                    .doc
                    .pages
                    .get(page_idx)
                    .and_then(|p| p.questions.get(builder.selected_question))
                {
                    let existing = builder.doc.pages[page_idx].branches.get(&question.id);
                    let form = match existing {
                        Some(rule) => BranchForm::from_rule(page_idx, question, rule),
                        None => BranchForm::new(page_idx, question),
                    };
                    self.state.editor = EditorState::Branch(form);
                    self.navigate(View::BranchEdit, ViewParams::default());
                }
            }
            KeyCode::Char('B') => {
                if let Some(id) = builder.selected_question_id() {
                    let page = builder.selected_page;
                    if builder.doc.clear_branch(page, &id).is_ok() {
                        builder.mark_dirty();
                    }
                }
            }
            KeyCode::Char('p') => {
                let doc = builder.doc.clone();
                self.state.preview = Some(FormSession::new(doc));
                self.navigate(View::FormPreview, ViewParams::default());
            }
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
        Ok(())
    }

    async fn save_builder_form(&mut self) {
        let Some(event_id) = self.state.view_params.event_id.clone().or_else(|| {
            self.state.selected_event_id.clone()
        }) else {
            self.push_error("No event selected");
            return;
        };
        let Some(builder) = self.state.builder.as_ref() else {
            return;
        };

        let issues = builder.doc.validate();
        if let Some(issue) = issues.first() {
            self.push_error(describe_form_issue(issue));
            return;
        }

        let doc = builder.doc.clone();
        match self.daemon.save_form(&event_id, &doc).await {
            Ok(form_id) => {
                if let Some(builder) = self.state.builder.as_mut() {
                    builder.doc.id = form_id.clone();
                    builder.dirty = false;
                }
                self.state.view_params.form_id = Some(form_id);
                self.load_forms(&event_id).await;
                self.status_message = Some("Form saved".to_string());
            }
            Err(err) => {
                tracing::error!("save_form failed: {err}");
                self.push_error("Failed to save form");
            }
        }
    }

    async fn handle_question_edit_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let EditorState::Question(form) = &mut self.state.editor {
                    form.cycle_kind();
                }
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.save_question_edit();
            }
            KeyCode::Char('w') if key.modifiers.contains(crate::platform::COPY_MODIFIER) => {
                self.save_question_edit();
            }
            KeyCode::Esc => {
                self.state.editor = EditorState::None;
                self.go_back();
            }
            _ => self.editor_input(&key),
        }
        Ok(())
    }

    fn save_question_edit(&mut self) {
        let EditorState::Question(form) = &self.state.editor else {
            return;
        };
        if form.prompt.as_text().trim().is_empty() {
            self.push_error("Prompt is required");
            return;
        }
        let question = match form.to_question() {
            Ok(q) => q,
            Err(msg) => {
                self.push_error(msg);
                return;
            }
        };
        let editing = form.editing.is_some();

        let Some(builder) = self.state.builder.as_mut() else {
            return;
        };
        let page = builder.selected_page;
        if editing {
            if let Some(slot) = builder
                .doc
                .pages
                .get_mut(page)
                .and_then(|p| p.questions.iter_mut().find(|q| q.id == question.id))
            {
                *slot = question;
            }
            builder.doc.renumber();
        } else if builder.doc.add_question(page, question).is_err() {
            self.push_error("Failed to add question");
            return;
        }
        builder.mark_dirty();
        builder.clamp_cursor();
        self.state.editor = EditorState::None;
        self.go_back();
    }

    async fn handle_page_edit_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.save_page_edit();
            }
            KeyCode::Char('w') if key.modifiers.contains(crate::platform::COPY_MODIFIER) => {
                self.save_page_edit();
            }
            KeyCode::Esc => {
                self.state.editor = EditorState::None;
                self.go_back();
            }
            _ => self.editor_input(&key),
        }
        Ok(())
    }

    fn save_page_edit(&mut self) {
        let EditorState::Page(form) = &self.state.editor else {
            return;
        };
        let title = form.title.as_text().trim().to_string();
        if title.is_empty() {
            self.push_error("Page title is required");
            return;
        }
        let description = form.description.as_text().to_string();
        let editing = form.editing;

        let Some(builder) = self.state.builder.as_mut() else {
            return;
        };
        match editing {
            Some(idx) => {
                if let Some(page) = builder.doc.pages.get_mut(idx) {
                    page.title = title;
                    page.description = description;
                }
            }
            None => {
                let mut page = Page::new(title);
                page.description = description;
                builder.doc.add_page(page);
                builder.selected_page = builder.doc.pages.len() - 1;
                builder.selected_question = 0;
            }
        }
        builder.mark_dirty();
        self.state.editor = EditorState::None;
        self.go_back();
    }

    async fn handle_branch_edit_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.save_branch_edit();
            }
            KeyCode::Char('w') if key.modifiers.contains(crate::platform::COPY_MODIFIER) => {
                self.save_branch_edit();
            }
            KeyCode::Esc => {
                self.state.editor = EditorState::None;
                self.go_back();
            }
            _ => self.editor_input(&key),
        }
        Ok(())
    }

    fn save_branch_edit(&mut self) {
        let EditorState::Branch(form) = &self.state.editor else {
            return;
        };
        let rule = match form.to_rule() {
            Ok(rule) => rule,
            Err(msg) => {
                self.push_error(msg);
                return;
            }
        };
        let page = form.source_page;
        let question_id = form.question_id.clone();

        let Some(builder) = self.state.builder.as_mut() else {
            return;
        };
        match builder.doc.set_branch(page, &question_id, rule) {
            Ok(()) => {
                builder.mark_dirty();
                self.state.editor = EditorState::None;
                self.go_back();
            }
            Err(err) => self.push_error(err.to_string()),
        }
    }

    // ------------------------------------------------------------------
    // Form preview / fill flow

    async fn handle_form_preview_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(session) = self.state.preview.as_mut() else {
            if key.code == KeyCode::Esc {
                self.go_back();
            }
            return Ok(());
        };

        if session.phase == SessionPhase::Complete {
            match key.code {
                KeyCode::Enter => self.submit_preview().await,
                KeyCode::Backspace => {
                    session.back();
                }
                KeyCode::Esc => {
                    self.state.preview = None;
                    self.go_back();
                }
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => session.next_entry(),
            KeyCode::BackTab | KeyCode::Up => session.prev_entry(),
            KeyCode::Enter => {
                if let Err(errors) = session.advance() {
                    self.status_message =
                        Some(format!("{} answer(s) need attention", errors.len()));
                }
            }
            KeyCode::Char('b') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                session.back();
            }
            KeyCode::Esc => {
                self.state.preview = None;
                self.go_back();
            }
            KeyCode::Left => {
                if let Some(entry) = session.entries.get_mut(session.active_entry) {
                    entry.prev_choice();
                }
            }
            KeyCode::Right => {
                if let Some(entry) = session.entries.get_mut(session.active_entry) {
                    entry.next_choice();
                }
            }
            KeyCode::Backspace => {
                if let Some(entry) = session.entries.get_mut(session.active_entry) {
                    entry.pop_char();
                }
            }
            KeyCode::Delete => {
                if let Some(entry) = session.entries.get_mut(session.active_entry) {
                    entry.clear();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(entry) = session.entries.get_mut(session.active_entry) {
                    entry.push_char(c);
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn submit_preview(&mut self) {
        let Some(session) = self.state.preview.as_ref() else {
            return;
        };
        let form_id = session.doc().id.clone();
        let answers = session.submission();
        match self.daemon.submit_form_response(&form_id, &answers).await {
            Ok(_response_id) => {
                self.state.preview = None;
                self.status_message = Some("Response recorded".to_string());
                self.go_back();
            }
            Err(err) => {
                tracing::error!("submit_form_response failed: {err}");
                self.push_error("Failed to submit response");
            }
        }
    }

    // ------------------------------------------------------------------
    // Judging

    async fn open_judging(&mut self) {
        let Some(event_id) = self.state.selected_event_id.clone() else {
            self.push_error("Select an event first");
            return;
        };
        let judge_id = self.judge_id.clone();
        match self
            .daemon
            .list_judging_assignments(&event_id, &judge_id)
            .await
        {
            Ok(teams) => self.state.teams = teams,
            Err(err) => {
                tracing::error!("list_judging_assignments failed: {err}");
                self.push_error("Failed to load judging assignments");
                return;
            }
        }
        if let Ok(criteria) = self.daemon.list_criteria(&event_id).await {
            self.state.criteria = criteria;
        }
        self.navigate(
            View::Judging,
            ViewParams {
                event_id: Some(event_id),
                ..Default::default()
            },
        );
    }

    async fn handle_judging_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.state.teams.len();
                self.state.move_selection_down(max);
            }
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Enter => {
                if self.state.criteria.is_empty() {
                    self.push_error("No scoring criteria configured for this event");
                    return Ok(());
                }
                if let Some(team) = self.state.teams.get(self.state.selected_index) {
                    let sheet = ScoreSheet::new(team.team_id.clone(), self.state.criteria.len());
                    let team_id = team.team_id.clone();
                    self.state.sheet = Some(sheet);
                    self.navigate(
                        View::ScoreEntry,
                        ViewParams {
                            team_id: Some(team_id),
                            ..Default::default()
                        },
                    );
                }
            }
            KeyCode::Char('l') => self.open_leaderboard().await,
            KeyCode::Char('r') => {
                if let Some(event_id) = self.state.view_params.event_id.clone() {
                    let judge_id = self.judge_id.clone();
                    if let Ok(teams) = self
                        .daemon
                        .list_judging_assignments(&event_id, &judge_id)
                        .await
                    {
                        self.state.teams = teams;
                    }
                }
            }
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
        Ok(())
    }

    async fn handle_score_entry_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.submit_scores().await;
            return Ok(());
        }

        let Some(sheet) = self.state.sheet.as_mut() else {
            if key.code == KeyCode::Esc {
                self.go_back();
            }
            return Ok(());
        };

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => sheet.next_criterion(),
            KeyCode::Up | KeyCode::Char('k') => sheet.prev_criterion(),
            KeyCode::Right => {
                if let Some(criterion) = self.state.criteria.get(sheet.active) {
                    sheet.bump_score(criterion, true);
                }
            }
            KeyCode::Left => {
                if let Some(criterion) = self.state.criteria.get(sheet.active) {
                    sheet.bump_score(criterion, false);
                }
            }
            KeyCode::Char('c') => sheet.clear_active(),
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                if let Some(criterion) = self.state.criteria.get(sheet.active) {
                    let value = ch.to_digit(10).unwrap_or(0);
                    sheet.set_score(criterion, value);
                }
            }
            KeyCode::Esc => {
                self.state.sheet = None;
                self.go_back();
            }
            _ => {}
        }
        Ok(())
    }

    async fn submit_scores(&mut self) {
        let Some(sheet) = self.state.sheet.as_ref() else {
            return;
        };
        if !sheet.is_complete() {
            self.push_error("Score every criterion before submitting");
            return;
        }
        let Some(event_id) = self
            .state
            .selected_event_id
            .clone()
            .or_else(|| self.state.view_params.event_id.clone())
        else {
            self.push_error("No event selected");
            return;
        };
        let judge_id = self.judge_id.clone();
        let team_id = sheet.team_id.clone();
        let entries = sheet.entries(&self.state.criteria);

        match self
            .daemon
            .submit_scores(&event_id, &judge_id, &team_id, &entries)
            .await
        {
            Ok(()) => {
                if let Some(team) = self
                    .state
                    .teams
                    .iter_mut()
                    .find(|t| t.team_id == team_id)
                {
                    team.scored = true;
                }
                self.state.sheet = None;
                self.status_message = Some("Scores submitted".to_string());
                self.go_back();
            }
            Err(err) => {
                tracing::error!("submit_scores failed: {err}");
                self.push_error("Failed to submit scores");
            }
        }
    }

    async fn open_leaderboard(&mut self) {
        let Some(event_id) = self.state.selected_event_id.clone() else {
            self.push_error("Select an event first");
            return;
        };
        match self.daemon.get_leaderboard(&event_id).await {
            Ok(rows) => {
                self.state.leaderboard = rows;
                self.navigate(
                    View::Leaderboard,
                    ViewParams {
                        event_id: Some(event_id),
                        ..Default::default()
                    },
                );
            }
            Err(err) => {
                tracing::error!("get_leaderboard failed: {err}");
                self.push_error("Failed to load leaderboard");
            }
        }
    }

    async fn handle_leaderboard_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('r') => {
                if let Some(event_id) = self.state.view_params.event_id.clone() {
                    if let Ok(rows) = self.daemon.get_leaderboard(&event_id).await {
                        self.state.leaderboard = rows;
                    }
                }
            }
            KeyCode::Down | KeyCode::Char('j') => self.state.scroll_down(),
            KeyCode::Up | KeyCode::Char('k') => self.state.scroll_up(),
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Config

    async fn handle_config_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.state.scroll_down(),
            KeyCode::Up | KeyCode::Char('k') => self.state.scroll_up(),
            KeyCode::Char('r') => {
                self.backend_info = self.daemon.get_daemon_info().await.ok();
            }
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
        Ok(())
    }
}

fn sort_field_from_config(value: Option<&str>) -> EventSortField {
    match value {
        Some("name") => EventSortField::Name,
        Some("status") => EventSortField::Status,
        Some("registered") => EventSortField::Registered,
        _ => EventSortField::StartsAt,
    }
}

fn sort_field_to_config(field: EventSortField) -> &'static str {
    match field {
        EventSortField::StartsAt => "starts_at",
        EventSortField::Name => "name",
        EventSortField::Status => "status",
        EventSortField::Registered => "registered",
    }
}

fn sort_direction_from_config(value: Option<&str>) -> SortDirection {
    match value {
        Some("desc") => SortDirection::Desc,
        _ => SortDirection::Asc,
    }
}

fn describe_form_issue(issue: &crate::state::FormIssue) -> String {
    use crate::state::FormIssue;
    match issue {
        FormIssue::EmptyTitle => "The form needs a title".to_string(),
        FormIssue::EmptyPage { page } => format!("Page {} has no questions", page + 1),
        FormIssue::BlankPrompt { question, .. } => {
            format!("Question {question} has a blank prompt")
        }
        FormIssue::TooFewChoices { question, .. } => {
            format!("Question {question} needs at least two choices")
        }
        FormIssue::BranchOnNonChoice { question, .. } => {
            format!("Question {question} has a branch but is not multiple choice")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DaemonClientTrait, MockDaemonClientTrait};
    use crate::state::Event;
    use chrono::{TimeZone, Utc};

    /// Test-only struct that mirrors App but doesn't require DaemonClient.
    /// Only use this for testing synchronous methods that don't touch the daemon.
    struct TestApp {
        state: AppState,
        quit: bool,
        splash_state: Option<SplashState>,
    }

    impl TestApp {
        fn new() -> Self {
            Self {
                state: AppState::default(),
                quit: false,
                splash_state: None,
            }
        }

        fn should_quit(&self) -> bool {
            self.quit
        }

        fn in_splash(&self) -> bool {
            matches!(self.state.current_view, View::Splash)
        }

        fn navigate(&mut self, view: View, params: ViewParams) {
            self.state.view_history.push((
                self.state.current_view.clone(),
                self.state.view_params.clone(),
            ));
            self.state.current_view = view;
            self.state.view_params = params;
            self.state.reset_selection();
        }

        fn go_back(&mut self) {
            while let Some((view, params)) = self.state.view_history.pop() {
                if view.is_editor() {
                    continue;
                }
                self.state.current_view = view;
                self.state.view_params = params;
                self.state.reset_selection();
                return;
            }
            self.state.current_view = View::Events;
            self.state.view_params = ViewParams::default();
            self.state.reset_selection();
        }

        fn update_splash(&mut self, terminal_height: u16) -> bool {
            if let Some(ref mut splash) = self.splash_state {
                splash.update(terminal_height);
                if splash.is_complete() {
                    self.splash_state = None;
                    self.state.current_view = View::Events;
                    return true;
                }
            }
            false
        }
    }

    fn test_event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            name: format!("Event {id}"),
            description: String::new(),
            venue: "Hall".to_string(),
            starts_at: Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2025, 7, 1, 18, 0, 0).unwrap(),
            capacity: 100,
            status: "published".to_string(),
            registered_count: 10,
            checked_in_count: 0,
        }
    }

    mod app_basic_tests {
        use super::*;

        #[test]
        fn test_should_quit_initially_false() {
            let app = TestApp::new();
            assert!(!app.should_quit());
        }

        #[test]
        fn test_in_splash_false_for_default_view() {
            let app = TestApp::new();
            // Default view is Events
            assert!(!app.in_splash());
        }

        #[test]
        fn test_in_splash_true_when_splash_view() {
            let mut app = TestApp::new();
            app.state.current_view = View::Splash;
            assert!(app.in_splash());
        }

        #[test]
        fn test_update_splash_without_state_is_noop() {
            let mut app = TestApp::new();
            assert!(!app.update_splash(24));
        }
    }

    mod navigation_tests {
        use super::*;

        #[test]
        fn test_navigate_pushes_history() {
            let mut app = TestApp::new();
            app.navigate(View::EventDetail, ViewParams::default());
            assert_eq!(app.state.current_view, View::EventDetail);
            assert_eq!(app.state.view_history.len(), 1);
        }

        #[test]
        fn test_go_back_restores_previous_view() {
            let mut app = TestApp::new();
            app.navigate(View::EventDetail, ViewParams::default());
            app.navigate(View::Attendance, ViewParams::default());
            app.go_back();
            assert_eq!(app.state.current_view, View::EventDetail);
        }

        #[test]
        fn test_go_back_skips_editor_views() {
            let mut app = TestApp::new();
            app.navigate(View::EventDetail, ViewParams::default());
            // Simulate: editor was pushed onto the history by a later navigate
            app.navigate(View::EventEdit, ViewParams::default());
            app.navigate(View::Forms, ViewParams::default());
            app.go_back();
            // Lands on EventDetail, not the editor
            assert_eq!(app.state.current_view, View::EventDetail);
        }

        #[test]
        fn test_go_back_on_empty_history_lands_on_events() {
            let mut app = TestApp::new();
            app.state.current_view = View::Config;
            app.go_back();
            assert_eq!(app.state.current_view, View::Events);
        }

        #[test]
        fn test_navigate_resets_selection() {
            let mut app = TestApp::new();
            app.state.selected_index = 7;
            app.navigate(View::Forms, ViewParams::default());
            assert_eq!(app.state.selected_index, 0);
        }

        #[test]
        fn test_view_params_carry_event_id() {
            let mut app = TestApp::new();
            app.navigate(
                View::Attendance,
                ViewParams {
                    event_id: Some("ev-9".to_string()),
                    ..Default::default()
                },
            );
            assert_eq!(app.state.view_params.event_id.as_deref(), Some("ev-9"));
        }
    }

    mod config_mapping_tests {
        use super::*;

        #[test]
        fn test_sort_field_round_trip() {
            for field in [
                EventSortField::StartsAt,
                EventSortField::Name,
                EventSortField::Status,
                EventSortField::Registered,
            ] {
                let text = sort_field_to_config(field);
                assert_eq!(sort_field_from_config(Some(text)), field);
            }
        }

        #[test]
        fn test_unknown_sort_field_defaults_to_start() {
            assert_eq!(
                sort_field_from_config(Some("bogus")),
                EventSortField::StartsAt
            );
            assert_eq!(sort_field_from_config(None), EventSortField::StartsAt);
        }

        #[test]
        fn test_sort_direction_parsing() {
            assert_eq!(sort_direction_from_config(Some("desc")), SortDirection::Desc);
            assert_eq!(sort_direction_from_config(Some("asc")), SortDirection::Asc);
            assert_eq!(sort_direction_from_config(None), SortDirection::Asc);
        }
    }

    mod form_issue_messages {
        use super::*;
        use crate::state::FormIssue;

        #[test]
        fn test_messages_are_one_based() {
            assert_eq!(
                describe_form_issue(&FormIssue::EmptyPage { page: 0 }),
                "Page 1 has no questions"
            );
            assert_eq!(
                describe_form_issue(&FormIssue::TooFewChoices { page: 0, question: 3 }),
                "Question 3 needs at least two choices"
            );
        }
    }

    mod mock_daemon_tests {
        use super::*;

        #[test]
        fn test_mocked_list_events() {
            let mut mock = MockDaemonClientTrait::new();
            mock.expect_list_events()
                .withf(|include_archived| !include_archived)
                .returning(|_| Ok(vec![test_event("a"), test_event("b")]));

            let events = tokio_test::block_on(mock.list_events(false)).unwrap();
            assert_eq!(events.len(), 2);
            assert_eq!(events[0].id, "a");
        }

        #[test]
        fn test_mocked_record_attendance() {
            use crate::backend::AttendanceResult;

            let mut mock = MockDaemonClientTrait::new();
            mock.expect_record_attendance()
                .withf(|event_id, code, check_out| {
                    event_id == "ev-1" && code == "att-1" && !check_out
                })
                .returning(|_, _, _| {
                    Ok(AttendanceResult {
                        status: "accepted".to_string(),
                        attendee_name: "Ada".to_string(),
                        recorded_at: None,
                    })
                });

            let result =
                tokio_test::block_on(mock.record_attendance("ev-1", "att-1", false)).unwrap();
            assert_eq!(result.status, "accepted");
            assert_eq!(result.attendee_name, "Ada");
        }
    }
}
