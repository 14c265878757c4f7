//! Editing State Machine
//!
//! [`SmartEditor`] owns the bill draft and everything needed to edit it:
//! the [`LineStore`], the tail input buffer and the [`EditingState`].
//! Every transition is synchronous. Recognition calls leave the editor as a
//! [`RecognitionRequest`] and come back through [`SmartEditor::apply`], which
//! rejects results whose target has moved on.
//!
//! # States
//!
//! ```text
//!            ArrowUp (tail empty)          ArrowUp / ArrowDown
//!   AtTail ─────────────────────▶ Editing(i) ◀──────────────┐
//!     ▲                                │  └─────────────────┘
//!     └── Enter ok / Escape / Delete ──┘
//!         / ArrowDown at last / blur
//! ```

use crate::buffer::TextBuffer;
use crate::model::SaleLine;
use crate::recognition::{RecognitionOutcome, RecognitionRequest, RecognitionTarget, RequestId};
use crate::store::LineStore;

/// Tail placeholder on an empty bill
pub const EMPTY_BILL_PLACEHOLDER: &str = "Scan item or type (e.g. dolo 12)...";

/// Tail placeholder once the bill has lines
pub const ADD_MORE_PLACEHOLDER: &str = "Add more...";

/// Where the editor's attention is
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EditingState {
    /// Tail input focused; typed text becomes a new line
    #[default]
    AtTail,
    /// The line at `index` is open in the inline editor
    Editing {
        /// Line being edited
        index: usize,
        /// Inline editor text, seeded from the line
        buffer: TextBuffer,
        /// Recognition call in flight for this edit
        pending: Option<RequestId>,
    },
}

impl EditingState {
    /// Which input the surface should focus
    #[must_use]
    pub fn focus(&self) -> FocusTarget {
        match self {
            Self::AtTail => FocusTarget::TailInput,
            Self::Editing { index, .. } => FocusTarget::InlineEditor(*index),
        }
    }

    /// Index of the line being edited, if any
    #[must_use]
    pub fn editing_index(&self) -> Option<usize> {
        match self {
            Self::AtTail => None,
            Self::Editing { index, .. } => Some(*index),
        }
    }
}

/// Focus intent derived from [`EditingState`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusTarget {
    /// The always-present input after the last chip
    TailInput,
    /// The inline editor replacing the chip at this index
    InlineEditor(usize),
}

/// What applying a recognition outcome did
#[derive(Clone, Debug, PartialEq)]
pub enum ApplyResult {
    /// Lines appended after the tail; tail text cleared
    Appended(usize),
    /// The edited line was replaced by `inserted` lines
    Replaced {
        /// Position of the edited line
        index: usize,
        /// Number of lines spliced in
        inserted: usize,
    },
    /// The edited line was re-recognized as nothing and removed
    Removed(usize),
    /// Tail text produced no actionable line; text kept
    NoLines,
    /// The call failed; text and state kept
    Failed(String),
    /// The target moved on before the result arrived; store untouched
    Discarded,
}

/// The sale-line editor: store, tail input and editing state
#[derive(Debug, Default)]
pub struct SmartEditor {
    store: LineStore,
    state: EditingState,
    tail: TextBuffer,
    tail_pending: Option<RequestId>,
    next_request: u64,
}

impl SmartEditor {
    /// Empty bill, tail focused
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor over existing lines
    #[must_use]
    pub fn with_lines(lines: impl IntoIterator<Item = SaleLine>) -> Self {
        let mut editor = Self::new();
        editor.store.append(lines);
        editor
    }

    /// The bill draft
    #[must_use]
    pub fn store(&self) -> &LineStore {
        &self.store
    }

    /// Current editing state
    #[must_use]
    pub fn state(&self) -> &EditingState {
        &self.state
    }

    /// Tail input buffer
    #[must_use]
    pub fn tail(&self) -> &TextBuffer {
        &self.tail
    }

    /// Inline editor buffer while editing
    #[must_use]
    pub fn inline_buffer(&self) -> Option<&TextBuffer> {
        match &self.state {
            EditingState::AtTail => None,
            EditingState::Editing { buffer, .. } => Some(buffer),
        }
    }

    /// Which input has focus
    #[must_use]
    pub fn focus(&self) -> FocusTarget {
        self.state.focus()
    }

    /// Tail placeholder text
    #[must_use]
    pub fn placeholder(&self) -> &'static str {
        if self.store.is_empty() {
            EMPTY_BILL_PLACEHOLDER
        } else {
            ADD_MORE_PLACEHOLDER
        }
    }

    /// Whether any recognition call is awaited
    #[must_use]
    pub fn is_recognizing(&self) -> bool {
        self.tail_pending.is_some()
            || matches!(self.state, EditingState::Editing { pending: Some(_), .. })
    }

    /// Whether the focused input is locked by an in-flight call
    #[must_use]
    pub fn focused_is_pending(&self) -> bool {
        match &self.state {
            EditingState::AtTail => self.tail_pending.is_some(),
            EditingState::Editing { pending, .. } => pending.is_some(),
        }
    }

    /// Commit the focused input.
    ///
    /// Returns the recognition call to run, or `None` when the commit was
    /// handled locally (blank inline edit deletes the line) or ignored
    /// (blank tail, call already in flight).
    pub fn commit(&mut self) -> Option<RecognitionRequest> {
        if self.focused_is_pending() {
            tracing::debug!("Commit ignored: recognition already in flight");
            return None;
        }

        match &self.state {
            EditingState::AtTail => {
                if self.tail.is_blank() {
                    return None;
                }
                let text = self.tail.committed_text().to_string();
                let id = self.issue_request_id();
                self.tail_pending = Some(id);
                tracing::debug!(%id, text = %text, "Recognizing tail input");
                Some(RecognitionRequest {
                    id,
                    target: RecognitionTarget::Tail,
                    text,
                })
            }
            EditingState::Editing { index, buffer, .. } => {
                let index = *index;
                if buffer.is_blank() {
                    self.delete_editing();
                    return None;
                }
                let text = buffer.committed_text().to_string();
                let id = self.issue_request_id();
                if let EditingState::Editing { pending, .. } = &mut self.state {
                    *pending = Some(id);
                }
                tracing::debug!(%id, index, text = %text, "Recognizing edited line");
                Some(RecognitionRequest {
                    id,
                    target: RecognitionTarget::Line(index),
                    text,
                })
            }
        }
    }

    /// Open the line at `index` in the inline editor, seeded from the line.
    ///
    /// Returns false when `index` names no line. Any edit in progress
    /// elsewhere is discarded.
    pub fn select(&mut self, index: usize) -> bool {
        let Some(line) = self.store.get(index) else {
            return false;
        };
        self.state = EditingState::Editing {
            index,
            buffer: TextBuffer::seeded(line.edit_text()),
            pending: None,
        };
        true
    }

    /// Move the edit one line up. No-op at the first line and at a non-empty
    /// tail.
    pub fn move_up(&mut self) -> bool {
        match self.state.editing_index() {
            None => match self.store.last_index() {
                Some(last) if self.tail.is_empty() => self.select(last),
                _ => false,
            },
            Some(0) => false,
            Some(index) => self.select(index - 1),
        }
    }

    /// Move the edit one line down; past the last line returns to the tail
    pub fn move_down(&mut self) -> bool {
        match self.state.editing_index() {
            None => false,
            Some(index) if index + 1 < self.store.len() => self.select(index + 1),
            Some(_) => self.return_to_tail(),
        }
    }

    /// Leave the inline editor, discarding its text. Returns false when
    /// already at the tail.
    pub fn return_to_tail(&mut self) -> bool {
        if let EditingState::Editing { index, pending, .. } = &self.state {
            if let Some(id) = pending {
                tracing::debug!(%id, index, "Abandoning pending line edit");
            }
            self.state = EditingState::AtTail;
            return true;
        }
        false
    }

    /// Remove the line being edited and return to the tail
    pub fn delete_editing(&mut self) -> bool {
        let Some(index) = self.state.editing_index() else {
            return false;
        };
        self.state = EditingState::AtTail;
        match self.store.remove_at(index) {
            Ok(removed) => {
                tracing::debug!(index, name = removed.display_name(), "Deleted line");
                true
            }
            Err(err) => {
                tracing::warn!(%err, "Delete of edited line failed");
                false
            }
        }
    }

    /// Remove the last line. Only from an empty, idle tail.
    pub fn delete_last(&mut self) -> bool {
        if self.state != EditingState::AtTail || !self.tail.is_empty() {
            return false;
        }
        let Some(last) = self.store.last_index() else {
            return false;
        };
        match self.store.remove_at(last) {
            Ok(removed) => {
                tracing::debug!(index = last, name = removed.display_name(), "Deleted last line");
                true
            }
            Err(err) => {
                tracing::warn!(%err, "Delete of last line failed");
                false
            }
        }
    }

    /// Mutate the focused buffer.
    ///
    /// Returns false without calling `edit` while a recognition call holds
    /// the focused input.
    pub fn edit_focused(&mut self, edit: impl FnOnce(&mut TextBuffer)) -> bool {
        if self.focused_is_pending() {
            return false;
        }
        match &mut self.state {
            EditingState::AtTail => edit(&mut self.tail),
            EditingState::Editing { buffer, .. } => edit(buffer),
        }
        true
    }

    /// Move the caret of the focused buffer; allowed while a call is pending
    pub fn move_caret(&mut self, motion: impl FnOnce(&mut TextBuffer)) {
        match &mut self.state {
            EditingState::AtTail => motion(&mut self.tail),
            EditingState::Editing { buffer, .. } => motion(buffer),
        }
    }

    /// Reconcile a finished recognition call with the current state
    pub fn apply(&mut self, outcome: RecognitionOutcome) -> ApplyResult {
        let RecognitionOutcome { request, result } = outcome;

        match request.target {
            RecognitionTarget::Tail => {
                if self.tail_pending != Some(request.id) {
                    tracing::debug!(id = %request.id, "Discarding stale tail result");
                    return ApplyResult::Discarded;
                }
                self.tail_pending = None;

                let lines = match result {
                    Ok(lines) => committable(lines),
                    Err(err) => {
                        tracing::warn!(id = %request.id, %err, "Tail recognition failed");
                        return ApplyResult::Failed(err.to_string());
                    }
                };
                if lines.is_empty() {
                    tracing::info!(text = %request.text, "No actionable line recognized");
                    return ApplyResult::NoLines;
                }

                let count = lines.len();
                self.store.append(lines);
                self.tail.clear();
                tracing::info!(count, total = self.store.len(), "Appended lines");
                ApplyResult::Appended(count)
            }
            RecognitionTarget::Line(index) => {
                let current = matches!(
                    &self.state,
                    EditingState::Editing { index: i, pending: Some(id), .. }
                        if *i == index && *id == request.id
                );
                if !current {
                    tracing::debug!(id = %request.id, index, "Discarding stale line result");
                    return ApplyResult::Discarded;
                }
                if let EditingState::Editing { pending, .. } = &mut self.state {
                    *pending = None;
                }

                let lines = match result {
                    Ok(lines) => committable(lines),
                    Err(err) => {
                        tracing::warn!(id = %request.id, index, %err, "Line recognition failed");
                        return ApplyResult::Failed(err.to_string());
                    }
                };

                self.state = EditingState::AtTail;
                if lines.is_empty() {
                    return match self.store.remove_at(index) {
                        Ok(_) => {
                            tracing::info!(index, "Edited line recognized as nothing; removed");
                            ApplyResult::Removed(index)
                        }
                        Err(err) => {
                            tracing::warn!(%err, "Edited line vanished before removal");
                            ApplyResult::Discarded
                        }
                    };
                }

                match self.store.replace_at(index, lines) {
                    Ok(inserted) => {
                        tracing::info!(index, inserted, "Replaced edited line");
                        ApplyResult::Replaced { index, inserted }
                    }
                    Err(err) => {
                        tracing::warn!(%err, "Edited line vanished before replacement");
                        ApplyResult::Discarded
                    }
                }
            }
        }
    }

    /// Start a new bill. Pending calls can no longer land.
    pub fn reset(&mut self) {
        self.store.clear();
        self.state = EditingState::AtTail;
        self.tail.clear();
        self.tail_pending = None;
        tracing::info!("Editor reset");
    }

    fn issue_request_id(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }
}

/// Lines the recognizer wants kept
fn committable(lines: Vec<SaleLine>) -> Vec<SaleLine> {
    lines.into_iter().filter(SaleLine::is_committable).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::RecognitionError;
    use crate::test_utils::{line, numbered_lines};
    use pretty_assertions::assert_eq;

    fn type_text(editor: &mut SmartEditor, text: &str) {
        for c in text.chars() {
            editor.edit_focused(|buf| buf.insert(c));
        }
    }

    fn ok(request: RecognitionRequest, lines: Vec<SaleLine>) -> RecognitionOutcome {
        RecognitionOutcome {
            request,
            result: Ok(lines),
        }
    }

    #[test]
    fn test_initial_state() {
        let editor = SmartEditor::new();
        assert_eq!(editor.state(), &EditingState::AtTail);
        assert_eq!(editor.focus(), FocusTarget::TailInput);
        assert_eq!(editor.placeholder(), EMPTY_BILL_PLACEHOLDER);
        assert!(!editor.is_recognizing());
    }

    #[test]
    fn test_tail_commit_appends_and_clears() {
        let mut editor = SmartEditor::new();
        type_text(&mut editor, "  dolo 12 ");

        let request = editor.commit().unwrap();
        assert_eq!(request.target, RecognitionTarget::Tail);
        assert_eq!(request.text, "dolo 12");
        assert!(editor.is_recognizing());

        let result = editor.apply(ok(request, vec![line("dolo", "Dolo 650", 2.5, 12, 0.92)]));
        assert_eq!(result, ApplyResult::Appended(1));
        assert_eq!(editor.store().len(), 1);
        assert!(editor.tail().is_empty());
        assert_eq!(editor.placeholder(), ADD_MORE_PLACEHOLDER);
    }

    #[test]
    fn test_blank_tail_commit_is_ignored() {
        let mut editor = SmartEditor::new();
        type_text(&mut editor, "   ");
        assert!(editor.commit().is_none());
        assert!(!editor.is_recognizing());
    }

    #[test]
    fn test_commit_while_pending_is_ignored() {
        let mut editor = SmartEditor::new();
        type_text(&mut editor, "dolo 12");
        assert!(editor.commit().is_some());
        assert!(editor.commit().is_none());
        assert!(!editor.edit_focused(|buf| buf.insert('x')));
        assert_eq!(editor.tail().text(), "dolo 12");
    }

    #[test]
    fn test_empty_tail_result_keeps_text() {
        let mut editor = SmartEditor::new();
        type_text(&mut editor, "asdf");
        let request = editor.commit().unwrap();

        assert_eq!(editor.apply(ok(request, vec![])), ApplyResult::NoLines);
        assert_eq!(editor.tail().text(), "asdf");
        assert!(editor.store().is_empty());
    }

    #[test]
    fn test_zero_quantity_lines_are_dropped() {
        let mut editor = SmartEditor::new();
        type_text(&mut editor, "dolo 0, crocin 2");
        let request = editor.commit().unwrap();

        let result = editor.apply(ok(
            request,
            vec![
                line("dolo", "Dolo 650", 2.5, 0, 0.9),
                line("crocin", "Crocin", 3.0, 2, 0.9),
            ],
        ));
        assert_eq!(result, ApplyResult::Appended(1));
        assert_eq!(editor.store().get(0).unwrap().display_name(), "Crocin");
    }

    #[test]
    fn test_failure_keeps_text_and_unlocks() {
        let mut editor = SmartEditor::new();
        type_text(&mut editor, "dolo 12");
        let request = editor.commit().unwrap();

        let result = editor.apply(RecognitionOutcome {
            request,
            result: Err(RecognitionError::Unavailable("offline".to_string())),
        });
        assert_eq!(result, ApplyResult::Failed("recognition failed: offline".to_string()));
        assert_eq!(editor.tail().text(), "dolo 12");
        assert!(!editor.is_recognizing());
        assert!(editor.commit().is_some());
    }

    #[test]
    fn test_arrow_up_seeds_last_line() {
        let mut editor = SmartEditor::with_lines(vec![
            line("dolo", "Dolo 650", 2.5, 12, 0.92),
            line("crocin", "Crocin", 3.0, 2, 0.85),
        ]);

        assert!(editor.move_up());
        assert_eq!(editor.focus(), FocusTarget::InlineEditor(1));
        assert_eq!(editor.inline_buffer().unwrap().text(), "crocin 2");

        assert!(editor.move_up());
        assert_eq!(editor.inline_buffer().unwrap().text(), "dolo 12");
        assert!(!editor.move_up());
        assert_eq!(editor.focus(), FocusTarget::InlineEditor(0));
    }

    #[test]
    fn test_arrow_up_needs_empty_tail() {
        let mut editor = SmartEditor::with_lines(numbered_lines(2));
        type_text(&mut editor, "x");
        assert!(!editor.move_up());
        assert_eq!(editor.state(), &EditingState::AtTail);
    }

    #[test]
    fn test_arrow_down_past_last_returns_to_tail() {
        let mut editor = SmartEditor::with_lines(numbered_lines(2));
        editor.select(0);
        assert!(editor.move_down());
        assert_eq!(editor.focus(), FocusTarget::InlineEditor(1));
        assert!(editor.move_down());
        assert_eq!(editor.state(), &EditingState::AtTail);
        assert!(!editor.move_down());
    }

    #[test]
    fn test_blank_inline_commit_deletes() {
        let mut editor = SmartEditor::with_lines(numbered_lines(3));
        editor.select(1);
        editor.edit_focused(TextBuffer::clear);

        assert!(editor.commit().is_none());
        assert_eq!(editor.state(), &EditingState::AtTail);
        let names: Vec<_> = editor.store().iter().map(SaleLine::display_name).collect();
        assert_eq!(names, vec!["item-0", "item-2"]);
    }

    #[test]
    fn test_line_edit_replaces_in_place() {
        let mut editor = SmartEditor::with_lines(numbered_lines(3));
        editor.select(1);
        let request = editor.commit().unwrap();
        assert_eq!(request.target, RecognitionTarget::Line(1));

        let result = editor.apply(ok(
            request,
            vec![
                line("a", "Alpha", 1.0, 1, 0.9),
                line("b", "Beta", 1.0, 1, 0.9),
            ],
        ));
        assert_eq!(result, ApplyResult::Replaced { index: 1, inserted: 2 });
        assert_eq!(editor.state(), &EditingState::AtTail);
        let names: Vec<_> = editor.store().iter().map(SaleLine::display_name).collect();
        assert_eq!(names, vec!["item-0", "Alpha", "Beta", "item-2"]);
    }

    #[test]
    fn test_empty_line_result_removes_line() {
        let mut editor = SmartEditor::with_lines(numbered_lines(2));
        editor.select(0);
        let request = editor.commit().unwrap();

        assert_eq!(editor.apply(ok(request, vec![])), ApplyResult::Removed(0));
        assert_eq!(editor.store().len(), 1);
    }

    #[test]
    fn test_line_failure_stays_editing() {
        let mut editor = SmartEditor::with_lines(numbered_lines(1));
        editor.select(0);
        let request = editor.commit().unwrap();

        let result = editor.apply(RecognitionOutcome {
            request,
            result: Err(RecognitionError::EmptyInput),
        });
        assert!(matches!(result, ApplyResult::Failed(_)));
        assert_eq!(
            editor.state(),
            &EditingState::Editing {
                index: 0,
                buffer: TextBuffer::seeded("item-0 1"),
                pending: None,
            }
        );
    }

    #[test]
    fn test_abandoned_edit_result_is_discarded() {
        let mut editor = SmartEditor::with_lines(numbered_lines(2));
        editor.select(0);
        let request = editor.commit().unwrap();

        // Same line reopened: a fresh edit, not the one that was committed
        editor.return_to_tail();
        editor.select(0);

        let before = editor.store().clone();
        let result = editor.apply(ok(request, vec![line("x", "X", 1.0, 1, 0.9)]));
        assert_eq!(result, ApplyResult::Discarded);
        assert_eq!(editor.store(), &before);
    }

    #[test]
    fn test_reset_invalidates_pending_calls() {
        let mut editor = SmartEditor::with_lines(numbered_lines(2));
        type_text(&mut editor, "dolo 12");
        let request = editor.commit().unwrap();

        editor.reset();
        let result = editor.apply(ok(request, vec![line("dolo", "Dolo 650", 2.5, 12, 0.92)]));
        assert_eq!(result, ApplyResult::Discarded);
        assert!(editor.store().is_empty());
        assert!(editor.tail().is_empty());
    }

    #[test]
    fn test_delete_last_only_from_empty_tail() {
        let mut editor = SmartEditor::with_lines(numbered_lines(2));
        type_text(&mut editor, "d");
        assert!(!editor.delete_last());

        editor.edit_focused(TextBuffer::clear);
        assert!(editor.delete_last());
        assert_eq!(editor.store().len(), 1);

        editor.select(0);
        assert!(!editor.delete_last());
    }

    #[test]
    fn test_escape_leaves_store_identical() {
        let mut editor = SmartEditor::with_lines(numbered_lines(3));
        let before = editor.store().clone();

        editor.select(2);
        type_text(&mut editor, " more");
        assert!(editor.return_to_tail());
        assert!(!editor.return_to_tail());
        assert_eq!(editor.store(), &before);
    }

    #[test]
    fn test_caret_moves_while_pending() {
        let mut editor = SmartEditor::new();
        type_text(&mut editor, "dolo");
        editor.commit();
        editor.move_caret(TextBuffer::move_home);
        assert_eq!(editor.tail().caret(), 0);
    }
}
