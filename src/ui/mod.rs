//! UI module for rendering the TUI

mod attendance;
mod components;
mod config_panel;
mod editors;
mod events;
mod form_preview;
mod forms;
mod judging;
mod layout;
mod splash;
mod widgets;

use crate::app::App;
use crate::state::View;
use components::{render_confirm_dialog, render_error_dialog};
use ratatui::Frame;
pub use widgets::render_scrollable_list;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Splash takes over the whole screen
    if let (View::Splash, Some(splash_state)) = (&app.state.current_view, &app.splash_state) {
        splash::draw(frame, area, splash_state);
        return;
    }

    // Draw the main layout with sidebar
    let (sidebar_area, main_area) = layout::create_layout(area);

    // Draw sidebar
    layout::draw_sidebar(frame, sidebar_area, app);

    // Draw main content based on current view
    match &app.state.current_view {
        View::Splash => {}
        View::Events => events::draw_list(frame, main_area, app),
        View::EventDetail => events::draw_detail(frame, main_area, app),
        View::EventCreate => editors::draw_event_create(frame, main_area, app),
        View::EventEdit => editors::draw_event_edit(frame, main_area, app),
        View::Attendance => attendance::draw(frame, main_area, app),
        View::Forms => forms::draw_list(frame, main_area, app),
        View::FormBuilder => forms::draw_builder(frame, main_area, app),
        View::QuestionEdit => editors::draw_question_edit(frame, main_area, app),
        View::PageEdit => editors::draw_page_edit(frame, main_area, app),
        View::BranchEdit => editors::draw_branch_edit(frame, main_area, app),
        View::FormPreview => form_preview::draw(frame, main_area, app),
        View::Judging => judging::draw_teams(frame, main_area, app),
        View::ScoreEntry => judging::draw_score_sheet(frame, main_area, app),
        View::Leaderboard => judging::draw_leaderboard(frame, main_area, app),
        View::Config => config_panel::draw(frame, main_area, app),
    }

    // Draw status bar
    layout::draw_status_bar(frame, app);

    // Overlays
    if let Some(pending) = &app.state.pending_delete {
        render_confirm_dialog(frame, pending);
    }
    if let Some(error) = app.state.current_error() {
        render_error_dialog(frame, error);
    }
}
