use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::StatusBar;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

pub fn draw_ui(frame: &mut Frame, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0)]);
    let [status_area, main_area] = layout.areas(frame.area());

    let mut status_bar = StatusBar::from_console(tui.console_view.console());
    status_bar.message = tui.status_message.clone();
    status_bar.render(frame, status_area);

    tui.console_view.render(frame, main_area);
}
