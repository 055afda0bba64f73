use crate::core::state::App;
use crate::tui::theme::Theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

const HELP: &str = "↑/↓ move · Enter select · Esc back · Ctrl+C quit";

pub fn draw_ui(frame: &mut Frame, app: &App, theme: &Theme) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Min(0), Length(1)]);
    let [menu_area, status_area] = layout.areas(frame.area());

    let lines: Vec<Line> = app
        .active_menu()
        .map(|menu| menu.visible_fragments())
        .unwrap_or_default()
        .into_iter()
        .map(|fragment| Line::styled(fragment.text, theme.style(fragment.class)))
        .collect();
    frame.render_widget(Paragraph::new(lines), menu_area);

    // Status bar
    let status = match &app.status_message {
        Some(message) => Span::raw(message.as_str()),
        None => Span::styled(HELP, Style::default().add_modifier(Modifier::DIM)),
    };
    frame.render_widget(status, status_area);
}
