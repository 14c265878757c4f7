//! Input Mapping
//!
//! Converts crossterm events into editor events or app-level commands.
//! The editor never sees crossterm types.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use smart_editor_core::{EditorEvent, Key, KeyPress};

use crate::widgets::ChipListState;

/// Rows moved per mouse wheel notch
const WHEEL_ROWS: i32 = 3;

/// Rows moved per PageUp/PageDown
const PAGE_ROWS: i32 = 10;

/// What a terminal event means to the app
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    /// Forward to the editor
    Editor(EditorEvent),
    /// Leave the app
    Quit,
    /// Clear the bill and start over
    NewBill,
    /// Scroll the chip list (positive = down)
    Scroll(i32),
}

/// Map any terminal event
#[must_use]
pub fn translate(event: &Event, chips: &ChipListState) -> Option<InputAction> {
    match event {
        Event::Key(key) => translate_key(key),
        Event::Mouse(mouse) => translate_mouse(mouse, chips),
        Event::FocusLost => Some(InputAction::Editor(EditorEvent::FocusLost)),
        _ => None,
    }
}

/// Map a key press
#[must_use]
pub fn translate_key(key: &KeyEvent) -> Option<InputAction> {
    // Only handle Press events (not Release or Repeat)
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => return Some(InputAction::Quit),
        KeyCode::Char('n') if ctrl => return Some(InputAction::NewBill),
        KeyCode::PageUp => return Some(InputAction::Scroll(-PAGE_ROWS)),
        KeyCode::PageDown => return Some(InputAction::Scroll(PAGE_ROWS)),
        _ => {}
    }
    if ctrl || key.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }

    let editor_key = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => return None,
    };

    Some(InputAction::Editor(EditorEvent::Key(KeyPress {
        key: editor_key,
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
    })))
}

/// Map a mouse event using the hit regions of the last render
#[must_use]
pub fn translate_mouse(mouse: &MouseEvent, chips: &ChipListState) -> Option<InputAction> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(index) = chips.chip_at(mouse.column, mouse.row) {
                Some(InputAction::Editor(EditorEvent::ChipClicked(index)))
            } else if chips.contains(mouse.column, mouse.row) {
                Some(InputAction::Editor(EditorEvent::BackgroundClicked))
            } else {
                None
            }
        }
        MouseEventKind::ScrollUp => Some(InputAction::Scroll(-WHEEL_ROWS)),
        MouseEventKind::ScrollDown => Some(InputAction::Scroll(WHEEL_ROWS)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_plain_keys_reach_editor() {
        assert_eq!(
            translate_key(&key(KeyCode::Char('d'), KeyModifiers::NONE)),
            Some(InputAction::Editor(Key::Char('d').into()))
        );
        assert_eq!(
            translate_key(&key(KeyCode::Up, KeyModifiers::NONE)),
            Some(InputAction::Editor(Key::Up.into()))
        );
    }

    #[test]
    fn test_shift_is_carried() {
        assert_eq!(
            translate_key(&key(KeyCode::Backspace, KeyModifiers::SHIFT)),
            Some(InputAction::Editor(EditorEvent::Key(KeyPress::shifted(
                Key::Backspace
            ))))
        );
    }

    #[test]
    fn test_app_shortcuts() {
        assert_eq!(
            translate_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(InputAction::Quit)
        );
        assert_eq!(
            translate_key(&key(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            Some(InputAction::NewBill)
        );
        assert_eq!(translate_key(&key(KeyCode::Char('x'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut release = key(KeyCode::Enter, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(translate_key(&release), None);
    }

    #[test]
    fn test_wheel_scrolls() {
        let chips = ChipListState::default();
        let wheel = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(translate_mouse(&wheel, &chips), Some(InputAction::Scroll(WHEEL_ROWS)));
    }

    #[test]
    fn test_focus_lost() {
        let chips = ChipListState::default();
        assert_eq!(
            translate(&Event::FocusLost, &chips),
            Some(InputAction::Editor(EditorEvent::FocusLost))
        );
    }
}
