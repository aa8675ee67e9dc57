//! Candle chart panel: OHLC candles over a volume strip.
//!
//! Renders with direct buffer writes:
//! - Each candle = 1 terminal column, newest bars kept when they do not fit
//! - Body: block char, positive color if close >= open, negative otherwise
//! - Wicks: vertical line chars to high/low
//! - Volume: bottom strip of bars scaled to the largest volume shown

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Widget},
};

use nqview_core::domain::Bar;

use crate::theme::Theme;

/// Rows reserved for the volume strip when the plot is tall enough.
const VOLUME_ROWS: u16 = 4;

/// Eighth-block glyphs for the volume strip, index = eighths filled.
const VOLUME_GLYPHS: [&str; 9] = [
    " ", "\u{2581}", "\u{2582}", "\u{2583}", "\u{2584}", "\u{2585}", "\u{2586}", "\u{2587}",
    "\u{2588}",
];

/// Candle chart panel widget
pub struct CandleChartPanel<'a> {
    bars: &'a [Bar],
    symbol: &'a str,
    theme: &'a Theme,
}

impl<'a> CandleChartPanel<'a> {
    pub fn new(bars: &'a [Bar], symbol: &'a str, theme: &'a Theme) -> Self {
        Self {
            bars,
            symbol,
            theme,
        }
    }

    /// Map a price to a Y position in the plot area (0 = top)
    fn price_to_y(&self, price: f64, y_min: f64, y_max: f64, plot_height: u16) -> u16 {
        if (y_max - y_min).abs() < 1e-9 || plot_height == 0 {
            return 0;
        }
        let frac = (price - y_min) / (y_max - y_min);
        let y = plot_height.saturating_sub(1) as f64 * (1.0 - frac);
        y.round().max(0.0).min(plot_height.saturating_sub(1) as f64) as u16
    }

    fn render_volume(&self, bars: &[Bar], left: u16, top: u16, height: u16, buf: &mut Buffer) {
        let max_volume = bars.iter().map(|b| b.volume).fold(0.0, f64::max);
        if max_volume <= 0.0 || height == 0 {
            return;
        }
        let eighths_total = height as f64 * 8.0;
        for (i, bar) in bars.iter().enumerate() {
            let style = Style::default().fg(self.theme.candle_color(bar.open, bar.close));
            let mut eighths = ((bar.volume / max_volume) * eighths_total).round() as u16;
            // Bottom-up fill, one row at a time.
            for row in (0..height).rev() {
                let fill = eighths.min(8);
                eighths -= fill;
                if fill > 0 {
                    buf.set_string(left + i as u16, top + row, VOLUME_GLYPHS[fill as usize], style);
                }
            }
        }
    }
}

impl<'a> Widget for CandleChartPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.bars.is_empty() {
            let block = Block::default()
                .title(format!(" Candle Chart: {} [No Data] ", self.symbol))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.muted))
                .style(Style::default().bg(self.theme.background));
            block.render(area, buf);
            return;
        }

        let priced = self.bars.iter().filter(|b| !b.is_void());
        let (up_count, down_count) = priced.fold((0, 0), |(up, down), b| {
            if b.is_up() {
                (up + 1, down)
            } else {
                (up, down + 1)
            }
        });

        let title = format!(
            " {} | {} bars | {} up {} down ",
            self.symbol,
            self.bars.len(),
            up_count,
            down_count,
        );

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));

        let inner = block.inner(area);
        block.render(area, buf);

        // Left margin for Y-axis labels (8 chars), bottom row for the time axis.
        let label_width: u16 = 8;
        let plot_left = inner.x + label_width;
        let plot_top = inner.y;
        let plot_width = inner.width.saturating_sub(label_width);
        let body_height = inner.height.saturating_sub(1);
        let volume_height = if body_height > VOLUME_ROWS * 2 {
            VOLUME_ROWS
        } else {
            0
        };
        let plot_height = body_height - volume_height;

        if plot_width == 0 || plot_height == 0 {
            return;
        }

        let start_bar = self.bars.len().saturating_sub(plot_width as usize);
        let visible = &self.bars[start_bar..];

        // Void bars leave a gap and never drive the scale.
        let y_min = visible
            .iter()
            .filter(|b| !b.is_void())
            .map(|b| b.low)
            .fold(f64::INFINITY, f64::min);
        let y_max = visible
            .iter()
            .filter(|b| !b.is_void())
            .map(|b| b.high)
            .fold(f64::NEG_INFINITY, f64::max);
        if !y_min.is_finite() || !y_max.is_finite() {
            buf.set_string(
                plot_left,
                plot_top,
                "no priced bars in view",
                Style::default().fg(self.theme.muted),
            );
            return;
        }

        let range = y_max - y_min;
        let pad = if range > 0.0 { range * 0.05 } else { 1.0 };
        let y_lower = y_min - pad;
        let y_upper = y_max + pad;

        let y_labels = [y_upper, (y_upper + y_lower) / 2.0, y_lower];
        let y_positions = [0u16, plot_height / 2, plot_height.saturating_sub(1)];
        for (label_val, y_pos) in y_labels.iter().zip(y_positions.iter()) {
            let label = format!("{:>7.2}", label_val);
            buf.set_string(
                inner.x,
                plot_top + y_pos,
                &label,
                Style::default().fg(self.theme.muted),
            );
        }

        for (i, bar) in visible.iter().enumerate() {
            let x = plot_left + i as u16;
            if x >= inner.right() {
                break;
            }
            if bar.is_void() {
                continue;
            }

            let style = Style::default().fg(self.theme.candle_color(bar.open, bar.close));

            let high_y = self.price_to_y(bar.high, y_lower, y_upper, plot_height);
            let low_y = self.price_to_y(bar.low, y_lower, y_upper, plot_height);
            let body_top_y =
                self.price_to_y(bar.open.max(bar.close), y_lower, y_upper, plot_height);
            let body_bot_y =
                self.price_to_y(bar.open.min(bar.close), y_lower, y_upper, plot_height);

            for y in high_y..body_top_y {
                buf.set_string(x, plot_top + y, "|", style);
            }

            // full block vs medium shade
            let body_char = if bar.is_up() { "\u{2588}" } else { "\u{2593}" };
            for y in body_top_y..=body_bot_y {
                buf.set_string(x, plot_top + y, body_char, style);
            }

            for y in (body_bot_y + 1)..=low_y {
                buf.set_string(x, plot_top + y, "|", style);
            }
        }

        if volume_height > 0 {
            buf.set_string(
                inner.x,
                plot_top + plot_height,
                "    vol",
                Style::default().fg(self.theme.muted),
            );
            self.render_volume(visible, plot_left, plot_top + plot_height, volume_height, buf);
        }

        // Time axis: first and last visible timestamps.
        let axis_y = plot_top + body_height;
        if axis_y < inner.bottom() {
            let style = Style::default().fg(self.theme.muted);
            if let Some(first) = visible.first() {
                buf.set_string(
                    plot_left,
                    axis_y,
                    first.ts_event.format("%m-%d %H:%M").to_string(),
                    style,
                );
            }
            if let Some(last) = visible.last() {
                let label = last.ts_event.format("%m-%d %H:%M").to_string();
                let x = inner
                    .right()
                    .saturating_sub(label.len() as u16)
                    .max(plot_left);
                if visible.len() > 1 {
                    buf.set_string(x, axis_y, label, style);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar(minute: u32, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Bar {
        Bar {
            ts_event: Utc.with_ymd_and_hms(2025, 3, 21, 9, 30 + minute, 0).unwrap(),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    fn make_test_bars() -> Vec<Bar> {
        vec![
            bar(0, 100.0, 102.0, 99.0, 101.0, 1000.0),  // up
            bar(1, 101.0, 103.0, 100.0, 100.5, 800.0),  // down
            bar(2, 100.5, 104.0, 99.5, 103.0, 1500.0),  // up
            bar(3, 103.0, 105.0, 101.0, 102.0, 600.0),  // down
            bar(4, 102.0, 106.0, 101.5, 105.5, 2000.0), // up
        ]
    }

    fn content(buf: &Buffer, area: Rect) -> String {
        let mut content = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                content.push_str(buf.cell((x, y)).unwrap().symbol());
            }
        }
        content
    }

    #[test]
    fn test_candle_chart_renders_without_panic() {
        let theme = Theme::default();
        let bars = make_test_bars();
        let panel = CandleChartPanel::new(&bars, "NQ.v.0", &theme);

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        panel.render(area, &mut buf);

        let text = content(&buf, area);
        assert!(text.contains("5 bars"));
        assert!(text.contains("3 up 2 down"));
        assert!(text.contains("vol"));
    }

    #[test]
    fn test_candle_chart_empty_bars() {
        let theme = Theme::default();
        let panel = CandleChartPanel::new(&[], "NQ.v.0", &theme);

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        panel.render(area, &mut buf);

        assert!(content(&buf, area).contains("No Data"));
    }

    #[test]
    fn test_up_candle_uses_positive_color() {
        let theme = Theme::default();
        let bars = vec![bar(0, 100.0, 102.0, 99.0, 101.0, 10.0)];
        let panel = CandleChartPanel::new(&bars, "NQ.v.0", &theme);

        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        panel.render(area, &mut buf);

        assert!(content(&buf, area).contains("1 up 0 down"));
        let candle_column: u16 = 1 + 8;
        let colored = (1..area.height - 1)
            .filter_map(|y| buf.cell((candle_column, y)))
            .any(|cell| cell.symbol() == "\u{2588}" && cell.fg == theme.positive);
        assert!(colored);
    }

    #[test]
    fn test_void_bar_is_skipped_in_scale_and_counts() {
        let theme = Theme::default();
        let mut bars = make_test_bars();
        bars[2].high = f64::NAN;
        bars[2].low = f64::NAN;
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        CandleChartPanel::new(&bars, "NQ.v.0", &theme).render(area, &mut buf);

        let text = content(&buf, area);
        assert!(text.contains("5 bars"));
        assert!(text.contains("2 up 2 down"));
        // Top label is the padded high of the priced bars: 106 + 0.35.
        assert!(text.contains(" 106.35"));
        assert!(!text.contains("NaN"));

        // Gap where the void candle would be, above the volume strip.
        let void_column: u16 = 1 + 8 + 2;
        let plot_rows = 1..1 + 17u16;
        let drawn = plot_rows
            .filter_map(|y| buf.cell((void_column, y)))
            .filter(|cell| matches!(cell.symbol(), "|" | "\u{2588}" | "\u{2593}"))
            .count();
        assert_eq!(drawn, 0);
    }

    #[test]
    fn test_all_void_bars_render_notice() {
        let theme = Theme::default();
        let mut bars = make_test_bars();
        for b in &mut bars {
            b.open = f64::NAN;
        }
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        CandleChartPanel::new(&bars, "NQ.v.0", &theme).render(area, &mut buf);

        let text = content(&buf, area);
        assert!(text.contains("0 up 0 down"));
        assert!(text.contains("no priced bars in view"));
    }

    #[test]
    fn test_tiny_area_does_not_panic() {
        let theme = Theme::default();
        let bars = make_test_bars();
        let area = Rect::new(0, 0, 6, 3);
        let mut buf = Buffer::empty(area);
        CandleChartPanel::new(&bars, "NQ.v.0", &theme).render(area, &mut buf);
    }

    #[test]
    fn test_newest_bars_kept_when_narrow() {
        let theme = Theme::default();
        let bars: Vec<Bar> = (0..30)
            .map(|i| bar(i, 100.0, 101.0, 99.0, 100.5, 100.0))
            .collect();
        let area = Rect::new(0, 0, 30, 20);
        let mut buf = Buffer::empty(area);
        CandleChartPanel::new(&bars, "NQ.v.0", &theme).render(area, &mut buf);

        // Title still counts every bar even though only the tail is drawn.
        assert!(content(&buf, area).contains("30 bars"));
    }
}
