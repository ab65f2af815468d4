use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollUp,
    ScrollDown,
    /// One keyboard pull step toward the top edge
    PullDown,
    /// One keyboard pull step toward the bottom edge
    PullUp,
    /// Lift the keyboard or mouse finger
    Release,
    RefreshHeader,
    LoadFooter,
    ToggleNoMoreData,
    SwitchFooterMode,
    /// Mouse button pressed on a row
    PressAt(u16),
    /// Mouse dragged to a row
    DragTo(u16),
    /// Wheel notch; negative moves toward the top
    Wheel(i8),
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::Quit,

        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => Action::ScrollDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => Action::ScrollUp,

        (KeyCode::Char('K'), _) => Action::PullDown,
        (KeyCode::Char('J'), _) => Action::PullUp,
        (KeyCode::Char(' '), _) => Action::Release,

        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::RefreshHeader,
        (KeyCode::Char('l'), KeyModifiers::NONE) => Action::LoadFooter,
        (KeyCode::Char('n'), KeyModifiers::NONE) => Action::ToggleNoMoreData,
        (KeyCode::Char('m'), KeyModifiers::NONE) => Action::SwitchFooterMode,

        _ => Action::None,
    }
}

/// Map mouse input to gestures
pub fn handle_mouse_event(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Action::PressAt(mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => Action::DragTo(mouse.row),
        MouseEventKind::Up(MouseButton::Left) => Action::Release,
        MouseEventKind::ScrollUp => Action::Wheel(-1),
        MouseEventKind::ScrollDown => Action::Wheel(1),
        _ => Action::None,
    }
}
