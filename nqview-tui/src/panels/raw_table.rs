//! Raw rows panel: the fetched result as a scrollable table.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, Widget},
};

use nqview_core::table::TabularResult;

use crate::theme::Theme;

/// Header label for the index column, matching the exported CSV.
const INDEX_LABEL: &str = "timestamp";

/// Raw row table widget
pub struct RawTablePanel<'a> {
    result: &'a TabularResult,
    offset: usize,
    theme: &'a Theme,
}

impl<'a> RawTablePanel<'a> {
    pub fn new(result: &'a TabularResult, offset: usize, theme: &'a Theme) -> Self {
        Self {
            result,
            offset,
            theme,
        }
    }

    fn headers(&self) -> Vec<String> {
        let index = self.result.index_name();
        self.result
            .column_names()
            .into_iter()
            .map(|name| {
                if Some(name.as_str()) == index {
                    INDEX_LABEL.to_string()
                } else {
                    name
                }
            })
            .collect()
    }
}

impl<'a> Widget for RawTablePanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let total = self.result.height();
        let offset = self.offset.min(total.saturating_sub(1));
        // Borders plus the header row.
        let visible = area.height.saturating_sub(3) as usize;

        let title = if total == 0 {
            " Rows (0) ".to_string()
        } else {
            format!(
                " Rows {}-{} of {} ",
                offset + 1,
                (offset + visible).min(total),
                total
            )
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));

        let headers = self.headers();
        let widths: Vec<Constraint> = headers
            .iter()
            .map(|h| {
                if h == INDEX_LABEL {
                    Constraint::Length(19)
                } else {
                    Constraint::Min(10)
                }
            })
            .collect();

        let header = Row::new(headers.into_iter().map(|h| {
            Cell::from(h).style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
        }))
        .height(1);

        let rows = self
            .result
            .rows(offset, visible)
            .into_iter()
            .map(|cells| {
                Row::new(cells.into_iter().map(Cell::from))
                    .style(Style::default().fg(self.theme.text_primary))
            });

        Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(1)
            .render(area, buf);
    }
}
