//! Key events to player intent.
//!
//! Terminal events are translated into [`InputEvent`]s, folded into an
//! [`Intent`], and read once per step as an [`InputSnapshot`]. The session
//! never sees key codes.

use std::time::{Duration, Instant};

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    JumpPressed,
    DuckPressed,
    DuckReleased,
    Restart,
    Quit,
}

/// What the player wants during one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    /// A jump was requested since the previous step.
    pub jump: bool,
    /// Duck is being held.
    pub duck: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Intent {
    jump_pending: bool,
    duck_held: bool,
}

impl Intent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event in. Restart and quit are not player intent and are ignored.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::JumpPressed => self.jump_pending = true,
            InputEvent::DuckPressed => self.duck_held = true,
            InputEvent::DuckReleased => self.duck_held = false,
            InputEvent::Restart | InputEvent::Quit => {}
        }
    }

    /// Snapshot for the next step. Consumes the jump request.
    pub fn take_snapshot(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            jump: self.jump_pending,
            duck: self.duck_held,
        };
        self.jump_pending = false;
        snapshot
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

pub fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(InputEvent::Quit);
    }

    let released = key.kind == KeyEventKind::Release;
    match key.code {
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(if released {
            InputEvent::DuckReleased
        } else {
            InputEvent::DuckPressed
        }),
        _ if released => None,
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(InputEvent::JumpPressed)
        }
        KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => Some(InputEvent::Restart),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(InputEvent::Quit),
        _ => None,
    }
}

/// On-screen controls: a click in the upper half of the screen jumps, a
/// click in the lower half ducks until the button comes back up.
pub fn map_mouse(mouse: MouseEvent, rows: u16) -> Option<InputEvent> {
    let lower = mouse.row >= rows / 2;
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if lower => Some(InputEvent::DuckPressed),
        MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::JumpPressed),
        MouseEventKind::Up(MouseButton::Left) => Some(InputEvent::DuckReleased),
        _ => None,
    }
}

/// Synthesises duck releases for terminals that only report presses.
///
/// Each press or auto-repeat refreshes the latch; once `hold` passes with
/// no refresh, [`DuckLatch::poll`] reports a release exactly once.
#[derive(Debug, Clone)]
pub struct DuckLatch {
    hold: Duration,
    last_press: Option<Instant>,
}

impl DuckLatch {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            last_press: None,
        }
    }

    pub fn pressed(&mut self, now: Instant) {
        self.last_press = Some(now);
    }

    pub fn poll(&mut self, now: Instant) -> Option<InputEvent> {
        match self.last_press {
            Some(at) if now.duration_since(at) >= self.hold => {
                self.last_press = None;
                Some(InputEvent::DuckReleased)
            }
            _ => None,
        }
    }
}
