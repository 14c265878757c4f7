//! StatusBar Widget
//!
//! One line at the bottom: service reachability, in-flight indicator, the
//! last non-modal message and key hints for whichever input has focus.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use smart_editor_core::FocusTarget;

use crate::theme::{ACCENT_CYAN, DIM_GRAY, ERROR_RED, HIGH_CONFIDENCE_GREEN, MEDIUM_CONFIDENCE_AMBER};

const TAIL_HINTS: &str = "Enter add | Up edit | Bksp drop last | Ctrl+N new bill | Ctrl+C quit";
const EDITOR_HINTS: &str = "Enter save | Up/Down move | Del remove | Esc cancel";

/// Result of the startup reachability probe
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceHealth {
    /// Probe still running
    Checking,
    /// Service answered
    Online,
    /// Service did not answer
    Offline,
}

impl ServiceHealth {
    fn label(self) -> (&'static str, Color) {
        match self {
            Self::Checking => ("service ...", DIM_GRAY),
            Self::Online => ("service online", HIGH_CONFIDENCE_GREEN),
            Self::Offline => ("service offline", ERROR_RED),
        }
    }
}

/// A one-line note for the operator
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusMessage {
    /// Informational
    Info(String),
    /// Something failed; the operator can retry
    Error(String),
}

/// Status bar contents
pub struct StatusBar<'a> {
    /// Service reachability
    pub service: ServiceHealth,
    /// A recognition call is pending
    pub recognizing: bool,
    /// Last message, if any
    pub message: Option<&'a StatusMessage>,
    /// Focused input, selects the hints
    pub focus: FocusTarget,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (service, service_color) = self.service.label();
        let separator = Span::styled(" | ", Style::default().fg(DIM_GRAY));

        let mut spans = vec![
            Span::raw(" "),
            Span::styled(service, Style::default().fg(service_color)),
        ];

        if self.recognizing {
            spans.push(separator.clone());
            spans.push(Span::styled(
                "recognizing...",
                Style::default().fg(MEDIUM_CONFIDENCE_AMBER),
            ));
        }

        match self.message {
            Some(StatusMessage::Info(text)) => {
                spans.push(separator.clone());
                spans.push(Span::styled(text.as_str(), Style::default().fg(ACCENT_CYAN)));
            }
            Some(StatusMessage::Error(text)) => {
                spans.push(separator.clone());
                spans.push(Span::styled(text.as_str(), Style::default().fg(ERROR_RED)));
            }
            None => {
                let hints = match self.focus {
                    FocusTarget::TailInput => TAIL_HINTS,
                    FocusTarget::InlineEditor(_) => EDITOR_HINTS,
                };
                spans.push(separator);
                spans.push(Span::styled(hints, Style::default().fg(DIM_GRAY)));
            }
        }

        Line::from(spans).render(area, buf);
    }
}
