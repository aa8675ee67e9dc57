//! Top-level UI layout: picker row, main area, status bar.

pub mod overlays;
pub mod picker_panel;
pub mod status_bar;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{AppState, Display, Overlay, Phase};
use crate::panels::{CandleChartPanel, RawTablePanel, SummaryTablePanel};
use crate::theme::{self, Theme};

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let picker_area = chunks[0];
    let main_area = chunks[1];
    let status_area = chunks[2];

    picker_panel::render(f, picker_area, app);
    draw_main(f, main_area, app);
    status_bar::render(f, status_area, app);

    match app.overlay {
        Overlay::Welcome => overlays::render_welcome(f, main_area, app),
        Overlay::Help => overlays::render_help(f, main_area),
        Overlay::ErrorHistory => overlays::render_error_history(f, main_area, app),
        Overlay::None => {}
    }
}

fn draw_main(f: &mut Frame, area: Rect, app: &AppState) {
    match (app.phase, &app.display) {
        (Phase::Fetching, _) => {
            let message = match app.pending {
                Some(range) => format!("Fetching {range}..."),
                None => "Fetching...".to_string(),
            };
            notice(f, area, Span::styled(message, theme::warning()));
        }
        (Phase::Displayed, Some(display)) if display.result.is_empty() => notice(
            f,
            area,
            Span::styled(
                "No data available for the selected date range.",
                theme::warning(),
            ),
        ),
        (Phase::Displayed, Some(display)) => draw_display(f, area, app, display),
        _ => notice(
            f,
            area,
            Span::styled(
                "Select a date range and press Enter to fetch data.",
                theme::muted(),
            ),
        ),
    }
}

fn draw_display(f: &mut Frame, area: Rect, app: &AppState, display: &Display) {
    let theme = Theme::default();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(50), Constraint::Min(20)])
        .split(rows[1]);

    f.render_widget(
        CandleChartPanel::new(&display.bars, &app.symbol, &theme),
        rows[0],
    );
    f.render_widget(SummaryTablePanel::new(&display.summary, &theme), bottom[0]);
    f.render_widget(
        RawTablePanel::new(&display.result, display.raw_scroll, &theme),
        bottom[1],
    );
}

fn notice(f: &mut Frame, area: Rect, message: Span<'_>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);
    let para = Paragraph::new(Line::from(message))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(para, vertical[1]);
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
