//! Summary table panel: Min / Max / Mean per numeric column.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, Widget},
};

use nqview_core::table::{with_thousands, ColumnSummary};

use crate::theme::Theme;

/// Summary statistics widget
pub struct SummaryTablePanel<'a> {
    summaries: &'a [ColumnSummary],
    theme: &'a Theme,
}

impl<'a> SummaryTablePanel<'a> {
    pub fn new(summaries: &'a [ColumnSummary], theme: &'a Theme) -> Self {
        Self { summaries, theme }
    }
}

/// Volume reads as an integer count with separators; everything else is a
/// price with 2 decimals.
pub fn format_stat(column: &str, value: Option<f64>) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if column == "volume" => with_thousands(v.round() as i64),
        Some(v) => format!("{v:.2}"),
    }
}

impl<'a> Widget for SummaryTablePanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Summary ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));

        let header_cells = ["Column", "Min", "Max", "Mean"].iter().map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
        });
        let header = Row::new(header_cells).height(1);

        let rows = self.summaries.iter().map(|s| {
            Row::new(vec![
                Cell::from(s.column.clone()).style(Style::default().fg(self.theme.neutral)),
                Cell::from(format_stat(&s.column, s.min)),
                Cell::from(format_stat(&s.column, s.max)),
                Cell::from(format_stat(&s.column, s.mean)),
            ])
            .style(Style::default().fg(self.theme.text_primary))
        });

        let widths = [
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Min(12),
        ];

        Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(1)
            .render(area, buf);
    }
}
