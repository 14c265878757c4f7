//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse, focus)
//! - KeyboardDispatcher for all editing
//! - Widgets for rendering
//!
//! The App never touches the line store. Terminal events become
//! [`InputAction`]s; editor actions go through the dispatcher, and finished
//! recognition calls are drained once per frame.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::{Frame, Terminal};
use tokio::sync::oneshot;

use smart_editor_core::{
    ApplyResult, ChipRenderer, DisplayConfig, EditorEvent, KeyOutcome, KeyboardDispatcher,
    RecognitionClient, SmartEditor,
};

use crate::input::{self, InputAction};
use crate::theme::{ACCENT_CYAN, DIM_GRAY};
use crate::widgets::{ChipList, ChipListState, ServiceHealth, StatusBar, StatusMessage, SummaryPanel};

/// Frame tick; recognition results are applied at this rate when idle
const TICK: Duration = Duration::from_millis(50);

/// Width of the summary panel
const SUMMARY_WIDTH: u16 = 28;

/// Main application state
pub struct App<C: RecognitionClient + 'static> {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Editor ===
    /// Owns the editor and runs recognition calls
    dispatcher: KeyboardDispatcher<C>,
    /// Chip projection
    renderer: ChipRenderer,

    // === UI State ===
    /// Chip list scroll, hit regions and caret
    chips: ChipListState,
    /// Startup reachability probe
    service: ServiceHealth,
    /// Pending probe result
    health_rx: Option<oneshot::Receiver<bool>>,
    /// Last operator-facing message
    message: Option<StatusMessage>,
}

impl<C: RecognitionClient + 'static> App<C> {
    /// Create a new App over an empty bill
    pub fn new(client: Arc<C>, display: &DisplayConfig) -> Self {
        Self {
            running: true,
            dispatcher: KeyboardDispatcher::new(client),
            renderer: ChipRenderer::from_config(display),
            chips: ChipListState::default(),
            service: ServiceHealth::Checking,
            health_rx: None,
            message: None,
        }
    }

    /// Whether the event loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The editor being displayed
    pub fn editor(&self) -> &SmartEditor {
        self.dispatcher.editor()
    }

    /// Service reachability as last probed
    pub fn service(&self) -> ServiceHealth {
        self.service
    }

    /// Last status message
    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    /// Probe the recognition service in the background
    pub fn start_health_check(&mut self) {
        let client = Arc::clone(self.dispatcher.client());
        let (tx, rx) = oneshot::channel();
        self.health_rx = Some(rx);
        self.service = ServiceHealth::Checking;

        tokio::spawn(async move {
            let online = client.health_check().await;
            let _ = tx.send(online);
        });
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();
        let mut ticker = tokio::time::interval(TICK);

        self.start_health_check();

        // Render initial frame immediately so the operator sees the UI
        terminal.draw(|frame| self.draw(frame))?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(&event),
                    Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                    None => self.running = false,
                },

                _ = ticker.tick() => {}
            }

            self.tick();
            terminal.draw(|frame| self.draw(frame))?;
        }

        Ok(())
    }

    /// Handle one terminal event
    pub fn handle_event(&mut self, event: &Event) {
        if let Some(action) = input::translate(event, &self.chips) {
            self.handle_action(action);
        }
    }

    /// Handle a mapped input action
    pub fn handle_action(&mut self, action: InputAction) {
        match action {
            InputAction::Quit => self.running = false,
            InputAction::NewBill => {
                self.dispatcher.reset();
                self.message = Some(StatusMessage::Info("New bill".to_string()));
                self.chips.follow_focus();
            }
            InputAction::Scroll(delta) => self.chips.scroll(delta),
            InputAction::Editor(event) => self.handle_editor_event(event),
        }
    }

    fn handle_editor_event(&mut self, event: EditorEvent) {
        let focus_before = self.dispatcher.editor().focus();
        let outcome = self.dispatcher.handle(event);
        self.chips.follow_focus();

        // Messages describe the input that had focus
        if self.dispatcher.editor().focus() != focus_before {
            self.message = None;
        }

        if let KeyOutcome::Recognize(request) = outcome {
            tracing::debug!(id = %request.id, "Recognition requested");
            self.message = None;
        }
    }

    /// Per-frame work: apply finished recognition calls, read probe result
    pub fn tick(&mut self) {
        for result in self.dispatcher.poll_recognitions() {
            self.report(result);
        }

        if let Some(rx) = self.health_rx.as_mut() {
            match rx.try_recv() {
                Ok(online) => {
                    self.service = if online {
                        ServiceHealth::Online
                    } else {
                        ServiceHealth::Offline
                    };
                    self.health_rx = None;
                    tracing::info!(online, "Recognition service probe finished");
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    self.service = ServiceHealth::Offline;
                    self.health_rx = None;
                }
            }
        }
    }

    /// Wait for the next recognition result and apply it
    pub async fn settle(&mut self) {
        if let Some(result) = self.dispatcher.settle().await {
            self.report(result);
        }
    }

    fn report(&mut self, result: ApplyResult) {
        match result {
            ApplyResult::Appended(_) | ApplyResult::Replaced { .. } | ApplyResult::Removed(_) => {
                self.service = ServiceHealth::Online;
                self.message = None;
            }
            ApplyResult::NoLines => {
                self.service = ServiceHealth::Online;
                self.message = Some(StatusMessage::Info(
                    "No item recognized. Edit the text and press Enter".to_string(),
                ));
            }
            ApplyResult::Failed(error) => {
                self.message = Some(StatusMessage::Error(format!(
                    "{error}. Press Enter to retry"
                )));
            }
            ApplyResult::Discarded => {}
        }
    }

    /// Render the UI
    pub fn draw(&mut self, frame: &mut Frame) {
        let [title, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [list, summary] =
            Layout::horizontal([Constraint::Min(16), Constraint::Length(SUMMARY_WIDTH)])
                .areas(body);

        let editor = self.dispatcher.editor();
        frame.render_widget(
            Line::from(vec![
                Span::styled(
                    " Smart Editor",
                    Style::default().fg(ACCENT_CYAN).add_modifier(Modifier::BOLD),
                ),
                Span::styled("  new sale", Style::default().fg(DIM_GRAY)),
            ]),
            title,
        );
        frame.render_stateful_widget(ChipList::new(editor, &self.renderer), list, &mut self.chips);
        frame.render_widget(
            SummaryPanel::new(editor.store().totals(), &self.renderer),
            summary,
        );
        frame.render_widget(
            StatusBar {
                service: self.service,
                recognizing: editor.is_recognizing(),
                message: self.message.as_ref(),
                focus: editor.focus(),
            },
            status,
        );

        if let Some(cursor) = self.chips.cursor() {
            frame.set_cursor_position(cursor);
        }
    }

    /// Summary printed after the terminal is restored
    pub fn farewell(&self) -> Option<String> {
        let store = self.dispatcher.editor().store();
        if store.is_empty() {
            return None;
        }
        let totals = store.totals();
        Some(format!(
            "Bill draft closed: {} line(s), total {}",
            store.len(),
            self.renderer.format_currency(totals.grand_total())
        ))
    }
}
