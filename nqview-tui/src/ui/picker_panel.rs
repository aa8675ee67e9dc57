//! Date range row: start and end pickers plus the fetch state.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, DateField, Phase};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(app.phase != Phase::Fetching))
        .title(format!(" {} ", app.instrument_label))
        .title_style(theme::panel_title(true));

    let picker = &app.picker;
    let field = |label: &'static str, value: String, focused: bool| {
        let value_style = if focused {
            theme::accent_bold().add_modifier(Modifier::REVERSED)
        } else {
            theme::accent()
        };
        vec![
            Span::styled(label, theme::muted()),
            Span::styled(format!(" {value} "), value_style),
            Span::raw("  "),
        ]
    };

    let mut spans = Vec::new();
    spans.extend(field(
        "Start",
        picker.start.format("%Y-%m-%d").to_string(),
        picker.focus == DateField::Start,
    ));
    spans.extend(field(
        "End",
        picker.end.format("%Y-%m-%d").to_string(),
        picker.focus == DateField::End,
    ));
    spans.push(Span::styled(
        format!("(max {})  ", picker.max.format("%Y-%m-%d")),
        theme::muted(),
    ));

    let state = match app.phase {
        Phase::Fetching => Span::styled("[ Fetching... ]", theme::warning()),
        Phase::Displayed => Span::styled("[ Ready ]", theme::positive()),
        Phase::Idle => Span::styled("[ Enter to fetch ]", theme::neutral()),
    };
    spans.push(state);

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
