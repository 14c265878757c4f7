//! Keyboard Dispatcher
//!
//! The only code that turns input into editor transitions. Surfaces map
//! their native events onto [`EditorEvent`] and act on the returned
//! [`KeyOutcome`]; they never call store operations directly.
//!
//! [`KeyboardDispatcher`] adds the async half: it runs recognition calls on
//! the tokio runtime and feeds their outcomes back through a channel, so the
//! store keeps a single writer (whoever owns the dispatcher).

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::buffer::TextBuffer;
use crate::recognition::{run_request, RecognitionClient, RecognitionOutcome, RecognitionRequest};
use crate::state::{ApplyResult, EditingState, SmartEditor};

/// Channel capacity for finished recognition calls
const OUTCOME_CHANNEL_CAPACITY: usize = 32;

/// Keys the editor understands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Printable character
    Char(char),
    /// Delete before the caret
    Backspace,
    /// Delete after the caret
    Delete,
    /// Commit
    Enter,
    /// Leave the inline editor
    Escape,
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Arrow left
    Left,
    /// Arrow right
    Right,
    /// Caret to start
    Home,
    /// Caret to end
    End,
}

/// A key press with the one modifier the editor cares about
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    /// The key
    pub key: Key,
    /// Shift held
    pub shift: bool,
}

impl KeyPress {
    /// Unmodified key
    #[must_use]
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    /// Key with Shift held
    #[must_use]
    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

impl From<Key> for KeyPress {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

/// Surface-agnostic input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorEvent {
    /// Key pressed in the focused input
    Key(KeyPress),
    /// Chip at this index clicked
    ChipClicked(usize),
    /// Empty editor area clicked
    BackgroundClicked,
    /// The focused input lost focus
    FocusLost,
}

impl From<Key> for EditorEvent {
    fn from(key: Key) -> Self {
        Self::Key(key.into())
    }
}

/// What dispatching an event did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// No transition defined; the surface may handle the event itself
    Ignored,
    /// Focused buffer edited or caret moved
    Typed,
    /// A defined transition ran (possibly a no-op at a boundary)
    Consumed,
    /// A recognition call must be run
    Recognize(RecognitionRequest),
}

impl KeyOutcome {
    /// Whether the surface must suppress its own default handling
    #[must_use]
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::Consumed | Self::Recognize(_))
    }
}

impl SmartEditor {
    /// Run the transition `event` triggers in the current state
    pub fn dispatch(&mut self, event: EditorEvent) -> KeyOutcome {
        match event {
            EditorEvent::Key(press) => self.dispatch_key(press),
            // Clicking inside the open inline editor keeps its text
            EditorEvent::ChipClicked(index) if self.state().editing_index() == Some(index) => {
                KeyOutcome::Consumed
            }
            EditorEvent::ChipClicked(index) => {
                if self.select(index) {
                    KeyOutcome::Consumed
                } else {
                    KeyOutcome::Ignored
                }
            }
            EditorEvent::BackgroundClicked => {
                self.return_to_tail();
                KeyOutcome::Consumed
            }
            EditorEvent::FocusLost => {
                if self.return_to_tail() {
                    KeyOutcome::Consumed
                } else {
                    KeyOutcome::Ignored
                }
            }
        }
    }

    fn dispatch_key(&mut self, press: KeyPress) -> KeyOutcome {
        let at_tail = matches!(self.state(), EditingState::AtTail);

        match press.key {
            Key::Enter => self
                .commit()
                .map_or(KeyOutcome::Consumed, KeyOutcome::Recognize),
            Key::Up => {
                self.move_up();
                KeyOutcome::Consumed
            }
            Key::Down => {
                self.move_down();
                KeyOutcome::Consumed
            }
            Key::Escape if at_tail => KeyOutcome::Ignored,
            Key::Escape => {
                self.return_to_tail();
                KeyOutcome::Consumed
            }
            Key::Backspace if press.shift => {
                self.edit_focused(TextBuffer::clear);
                KeyOutcome::Consumed
            }
            Key::Backspace if at_tail && self.tail().is_empty() => {
                self.delete_last();
                KeyOutcome::Consumed
            }
            Key::Backspace => self.buffer_edit(|buf| {
                buf.backspace();
            }),
            Key::Delete if at_tail => self.buffer_edit(|buf| {
                buf.delete_forward();
            }),
            Key::Delete => {
                self.delete_editing();
                KeyOutcome::Consumed
            }
            Key::Char(c) => self.buffer_edit(|buf| buf.insert(c)),
            Key::Left => self.caret_motion(TextBuffer::move_left),
            Key::Right => self.caret_motion(TextBuffer::move_right),
            Key::Home => self.caret_motion(TextBuffer::move_home),
            Key::End => self.caret_motion(TextBuffer::move_end),
        }
    }

    /// Buffer mutation; swallowed while the focused input is locked
    fn buffer_edit(&mut self, edit: impl FnOnce(&mut TextBuffer)) -> KeyOutcome {
        if self.edit_focused(edit) {
            KeyOutcome::Typed
        } else {
            KeyOutcome::Consumed
        }
    }

    fn caret_motion(&mut self, motion: impl FnOnce(&mut TextBuffer)) -> KeyOutcome {
        self.move_caret(motion);
        KeyOutcome::Typed
    }
}

/// Async driver: dispatches events and runs recognition calls
///
/// Calls run as spawned tokio tasks. Their outcomes queue on a channel and
/// only touch the editor when the owner drains them with
/// [`poll_recognitions`](Self::poll_recognitions) or
/// [`settle`](Self::settle).
pub struct KeyboardDispatcher<C: RecognitionClient + 'static> {
    editor: SmartEditor,
    client: Arc<C>,
    outcome_tx: mpsc::Sender<RecognitionOutcome>,
    outcome_rx: mpsc::Receiver<RecognitionOutcome>,
    in_flight: usize,
}

impl<C: RecognitionClient + 'static> KeyboardDispatcher<C> {
    /// Dispatcher over an empty bill
    pub fn new(client: Arc<C>) -> Self {
        Self::with_editor(client, SmartEditor::new())
    }

    /// Dispatcher over an existing editor
    pub fn with_editor(client: Arc<C>, editor: SmartEditor) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel(OUTCOME_CHANNEL_CAPACITY);
        Self {
            editor,
            client,
            outcome_tx,
            outcome_rx,
            in_flight: 0,
        }
    }

    /// The editor being driven
    pub fn editor(&self) -> &SmartEditor {
        &self.editor
    }

    /// Recognition client
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Calls spawned whose outcome has not been drained yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Dispatch `event`, spawning a recognition call if it asks for one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn handle(&mut self, event: EditorEvent) -> KeyOutcome {
        let outcome = self.editor.dispatch(event);
        if let KeyOutcome::Recognize(request) = &outcome {
            self.spawn_recognition(request.clone());
        }
        outcome
    }

    /// Apply every outcome that has already arrived, without waiting
    pub fn poll_recognitions(&mut self) -> Vec<ApplyResult> {
        let mut results = Vec::new();
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            results.push(self.apply(outcome));
        }
        results
    }

    /// Wait for the next outcome and apply it.
    ///
    /// Returns `None` when no call is in flight.
    pub async fn settle(&mut self) -> Option<ApplyResult> {
        if self.in_flight == 0 {
            return None;
        }
        let outcome = self.outcome_rx.recv().await?;
        Some(self.apply(outcome))
    }

    /// Start a new bill; calls still running will be discarded on arrival
    pub fn reset(&mut self) {
        self.editor.reset();
    }

    fn apply(&mut self, outcome: RecognitionOutcome) -> ApplyResult {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.editor.apply(outcome)
    }

    fn spawn_recognition(&mut self, request: RecognitionRequest) {
        let client = Arc::clone(&self.client);
        let tx = self.outcome_tx.clone();
        self.in_flight += 1;

        tracing::debug!(id = %request.id, client = client.name(), "Spawning recognition call");
        tokio::spawn(async move {
            let outcome = run_request(client.as_ref(), request).await;
            // Receiver gone means the dispatcher was dropped; nothing to apply
            let _ = tx.send(outcome).await;
        });
    }
}
