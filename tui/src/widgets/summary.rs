//! Summary Widget
//!
//! Side panel with line counts and the bill total. Out-of-stock and unknown
//! lines are counted but never priced.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use smart_editor_core::{BillTotals, ChipRenderer};

use crate::theme::{ACCENT_CYAN, DIM_GRAY, NEUTRAL_GRAY};

/// Bill summary panel
pub struct SummaryPanel<'a> {
    totals: BillTotals,
    renderer: &'a ChipRenderer,
}

impl<'a> SummaryPanel<'a> {
    /// Panel for `totals`, formatting money with `renderer`
    #[must_use]
    pub fn new(totals: BillTotals, renderer: &'a ChipRenderer) -> Self {
        Self { totals, renderer }
    }

    fn row(label: &str, value: String, width: usize, style: Style) -> Line<'static> {
        let padding = width.saturating_sub(label.width() + value.width());
        Line::from(vec![
            Span::styled(label.to_string(), Style::default().fg(NEUTRAL_GRAY)),
            Span::raw(" ".repeat(padding)),
            Span::styled(value, style),
        ])
    }
}

impl Widget for SummaryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::LEFT)
            .border_style(Style::default().fg(DIM_GRAY))
            .title(Span::styled(" Bill ", Style::default().fg(ACCENT_CYAN)));
        let width = usize::from(block.inner(area).width.saturating_sub(1));

        let totals = &self.totals;
        let money = Style::default();
        let lines = vec![
            Self::row(
                "Lines",
                (totals.billable_lines + totals.excluded_lines).to_string(),
                width,
                money,
            ),
            Self::row("Billable", totals.billable_lines.to_string(), width, money),
            Self::row(
                "Excluded",
                totals.excluded_lines.to_string(),
                width,
                Style::default().fg(NEUTRAL_GRAY),
            ),
            Line::default(),
            Self::row(
                "Subtotal",
                self.renderer.format_currency(totals.subtotal),
                width,
                money,
            ),
            Self::row(
                "Total",
                self.renderer.format_currency(totals.grand_total()),
                width,
                Style::default().fg(ACCENT_CYAN).add_modifier(Modifier::BOLD),
            ),
        ];

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
