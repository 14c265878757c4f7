//! ChipList Widget
//!
//! The bill draft as a scrollable column: one chip per line, the inline
//! editor in place of the chip being edited, and the tail input last.
//!
//! Rendering also records where each chip landed so mouse clicks can be
//! mapped back to line indices, and where the caret of the focused input is.

use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use unicode_width::UnicodeWidthStr;

use smart_editor_core::{ChipRenderer, DisplayAttrs, FocusTarget, SmartEditor, TextBuffer};

use crate::theme::{self, DIM_GRAY, SELECTED_BG};

/// Narrowest area worth drawing into
const MIN_WIDTH: u16 = 16;

/// Quantity column, right-aligned
const QUANTITY_WIDTH: usize = 4;

const EDITOR_PREFIX: &str = " > ";
const TAIL_PREFIX: &str = " + ";
const PENDING_LABEL: &str = "recognizing...";
const CHIP_DOT: char = '●';

/// Scroll position, hit regions and caret of the last render
#[derive(Debug)]
pub struct ChipListState {
    /// First visible row
    pub scroll_offset: usize,
    /// Rows in the last render (lines plus the tail)
    pub total_rows: usize,
    /// Keep the focused row in view
    follow_focus: bool,
    area: Rect,
    hit_regions: Vec<(Rect, usize)>,
    cursor: Option<Position>,
}

impl Default for ChipListState {
    fn default() -> Self {
        Self {
            scroll_offset: 0,
            total_rows: 0,
            follow_focus: true,
            area: Rect::default(),
            hit_regions: Vec::new(),
            cursor: None,
        }
    }
}

impl ChipListState {
    /// Scroll by delta rows (positive = down). Stops following focus until
    /// [`follow_focus`](Self::follow_focus) is called.
    pub fn scroll(&mut self, delta: i32) {
        let offset = i64::try_from(self.scroll_offset).unwrap_or(i64::MAX) + i64::from(delta);
        self.scroll_offset = usize::try_from(offset.max(0)).unwrap_or(0);
        self.follow_focus = false;
    }

    /// Bring the focused row back into view on the next render
    pub fn follow_focus(&mut self) {
        self.follow_focus = true;
    }

    /// Line index of the chip under (`x`, `y`)
    #[must_use]
    pub fn chip_at(&self, x: u16, y: u16) -> Option<usize> {
        let position = Position::new(x, y);
        self.hit_regions
            .iter()
            .find(|(region, _)| region.contains(position))
            .map(|(_, index)| *index)
    }

    /// Whether (`x`, `y`) falls inside the list
    #[must_use]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        self.area.contains(Position::new(x, y))
    }

    /// Caret position of the focused input, if visible
    #[must_use]
    pub fn cursor(&self) -> Option<Position> {
        self.cursor
    }
}

/// Chip list over an editor
pub struct ChipList<'a> {
    editor: &'a SmartEditor,
    renderer: &'a ChipRenderer,
}

impl<'a> ChipList<'a> {
    /// List for `editor`, projecting lines through `renderer`
    #[must_use]
    pub fn new(editor: &'a SmartEditor, renderer: &'a ChipRenderer) -> Self {
        Self { editor, renderer }
    }
}

impl StatefulWidget for ChipList<'_> {
    type State = ChipListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.area = area;
        state.hit_regions.clear();
        state.cursor = None;

        if area.width < MIN_WIDTH || area.height == 0 {
            return;
        }

        let store = self.editor.store();
        state.total_rows = store.len() + 1;
        let focus_row = match self.editor.focus() {
            FocusTarget::TailInput => store.len(),
            FocusTarget::InlineEditor(index) => index,
        };

        let height = usize::from(area.height);
        if state.follow_focus {
            if focus_row < state.scroll_offset {
                state.scroll_offset = focus_row;
            } else if focus_row >= state.scroll_offset + height {
                state.scroll_offset = focus_row + 1 - height;
            }
        }
        state.scroll_offset = state
            .scroll_offset
            .min(state.total_rows.saturating_sub(height));

        let editing = self.editor.state().editing_index();
        let visible = (state.scroll_offset..state.total_rows).take(height);

        for (screen_row, row) in visible.enumerate() {
            let Ok(dy) = u16::try_from(screen_row) else {
                break;
            };
            let row_area = Rect::new(area.x, area.y + dy, area.width, 1);

            if row == store.len() {
                let cursor = render_tail(buf, row_area, self.editor);
                if focus_row == row {
                    state.cursor = Some(cursor);
                }
                continue;
            }

            let Some(line) = store.get(row) else {
                break;
            };
            if editing == Some(row) {
                let preview = self.renderer.render(line, true);
                if let Some(buffer) = self.editor.inline_buffer() {
                    let pending = self.editor.focused_is_pending();
                    state.cursor = Some(render_editor(buf, row_area, buffer, &preview, pending));
                }
            } else {
                render_chip(buf, row_area, &self.renderer.render(line, false));
            }
            state.hit_regions.push((row_area, row));
        }
    }
}

/// Draw one chip: confidence dot, quantity, name, right-aligned price
fn render_chip(buf: &mut Buffer, area: Rect, attrs: &DisplayAttrs) {
    let style = theme::chip_style(attrs.category, attrs.emphasized);
    if attrs.emphasized {
        buf.set_style(area, style);
    }

    let quantity = attrs.quantity.as_deref().unwrap_or("-");
    let left = format!(" {CHIP_DOT}{quantity:>QUANTITY_WIDTH$}  {}", attrs.name);
    draw_row(buf, area, &left, style, &attrs.price_text, style);
}

/// Draw the inline editor with the chip's price as a preview.
///
/// Returns the caret position.
fn render_editor(
    buf: &mut Buffer,
    area: Rect,
    buffer: &TextBuffer,
    preview: &DisplayAttrs,
    pending: bool,
) -> Position {
    let selected = Style::default().bg(SELECTED_BG);
    buf.set_style(area, selected);

    let left = format!("{EDITOR_PREFIX}{}", buffer.text());
    let (right, right_style) = if pending {
        (PENDING_LABEL, theme::placeholder_style().bg(SELECTED_BG))
    } else {
        (
            preview.price_text.as_str(),
            theme::chip_style(preview.category, true),
        )
    };
    draw_row(buf, area, &left, theme::input_style().bg(SELECTED_BG), right, right_style);

    caret_position(area, EDITOR_PREFIX, buffer)
}

/// Draw the tail input, or its placeholder when empty.
///
/// Returns the caret position.
fn render_tail(buf: &mut Buffer, area: Rect, editor: &SmartEditor) -> Position {
    let tail = editor.tail();
    let (text, style) = if tail.is_empty() {
        (editor.placeholder(), theme::placeholder_style())
    } else {
        (tail.text(), theme::input_style())
    };

    let left = format!("{TAIL_PREFIX}{text}");
    let right = if editor.state().editing_index().is_none() && editor.focused_is_pending() {
        PENDING_LABEL
    } else {
        ""
    };
    draw_row(buf, area, &left, style, right, Style::default().fg(DIM_GRAY));

    caret_position(area, TAIL_PREFIX, tail)
}

/// Left text truncated to leave room for the right text
fn draw_row(buf: &mut Buffer, area: Rect, left: &str, left_style: Style, right: &str, right_style: Style) {
    let width = usize::from(area.width);
    let right_width = right.width();
    let left_room = width.saturating_sub(right_width + 1);

    buf.set_stringn(area.x, area.y, left, left_room, left_style);

    if right_width > 0 && right_width < width {
        let x = area.x + u16::try_from(width - right_width - 1).unwrap_or(0);
        buf.set_string(x, area.y, right, right_style);
    }
}

fn caret_position(area: Rect, prefix: &str, buffer: &TextBuffer) -> Position {
    let before_caret: String = buffer.text().chars().take(buffer.caret()).collect();
    let offset = prefix.width() + before_caret.width();
    let max_x = area.x + area.width.saturating_sub(1);
    let x = area
        .x
        .saturating_add(u16::try_from(offset).unwrap_or(u16::MAX))
        .min(max_x);
    Position::new(x, area.y)
}
