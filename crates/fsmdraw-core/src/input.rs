//! Input event vocabulary and pointer/keyboard state tracking.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

/// Keyboard event carrying the key name ("a", "Backspace", "ArrowLeft", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Tracks pointer and modifier state between events, including double-click
/// detection, which the host's event source usually does not provide.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Current pointer position in canvas coordinates.
    pub pointer_position: Point,
    pressed_buttons: HashSet<MouseButton>,
    pub modifiers: Modifiers,
    last_click_time: Option<Instant>,
    last_click_position: Option<Point>,
    double_click_detected: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            pointer_position: Point::ZERO,
            pressed_buttons: HashSet::new(),
            modifiers: Modifiers::default(),
            last_click_time: None,
            last_click_position: None,
            double_click_detected: false,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                self.pressed_buttons.insert(button);
                if button == MouseButton::Left {
                    let now = Instant::now();
                    let is_double = match (self.last_click_time, self.last_click_position) {
                        (Some(last_time), Some(last_pos)) => {
                            now.duration_since(last_time).as_millis() < DOUBLE_CLICK_TIME_MS
                                && position.distance(last_pos) < DOUBLE_CLICK_DISTANCE
                        }
                        _ => false,
                    };
                    if is_double {
                        self.double_click_detected = true;
                        // Reset so a triple click is not a second double click.
                        self.last_click_time = None;
                        self.last_click_position = None;
                    } else {
                        self.last_click_time = Some(now);
                        self.last_click_position = Some(position);
                    }
                }
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                self.pressed_buttons.remove(&button);
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
            }
        }
    }

    /// Process a key event, tracking the modifier keys.
    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        let (key, pressed) = match event {
            KeyEvent::Pressed(key) => (key.as_str(), true),
            KeyEvent::Released(key) => (key.as_str(), false),
        };
        match key {
            "Shift" => self.modifiers.shift = pressed,
            "Control" => self.modifiers.ctrl = pressed,
            "Alt" => self.modifiers.alt = pressed,
            "Meta" => self.modifiers.meta = pressed,
            _ => {}
        }
    }

    /// Replace the modifier state wholesale (for hosts that deliver
    /// modifiers with every event).
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Consume a pending double-click detection.
    pub fn take_double_click(&mut self) -> bool {
        std::mem::replace(&mut self.double_click_detected, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_press_and_release() {
        let mut input = InputState::new();
        input.handle_pointer_event(&PointerEvent::Down {
            position: Point::new(100.0, 100.0),
            button: MouseButton::Left,
        });
        assert!(input.is_button_pressed(MouseButton::Left));
        assert!(!input.is_button_pressed(MouseButton::Right));

        input.handle_pointer_event(&PointerEvent::Up {
            position: Point::new(100.0, 100.0),
            button: MouseButton::Left,
        });
        assert!(!input.is_button_pressed(MouseButton::Left));
    }

    #[test]
    fn test_double_click_detection() {
        let mut input = InputState::new();
        let pos = Point::new(100.0, 100.0);
        let down = PointerEvent::Down { position: pos, button: MouseButton::Left };
        let up = PointerEvent::Up { position: pos, button: MouseButton::Left };

        input.handle_pointer_event(&down);
        assert!(!input.take_double_click());
        input.handle_pointer_event(&up);

        input.handle_pointer_event(&down);
        assert!(input.take_double_click());
        // Consumed.
        assert!(!input.take_double_click());
    }

    #[test]
    fn test_triple_click_is_one_double_click() {
        let mut input = InputState::new();
        let pos = Point::new(100.0, 100.0);
        let down = PointerEvent::Down { position: pos, button: MouseButton::Left };

        input.handle_pointer_event(&down);
        input.handle_pointer_event(&down);
        assert!(input.take_double_click());
        input.handle_pointer_event(&down);
        assert!(!input.take_double_click());
    }

    #[test]
    fn test_double_click_too_far_apart() {
        let mut input = InputState::new();
        input.handle_pointer_event(&PointerEvent::Down {
            position: Point::new(100.0, 100.0),
            button: MouseButton::Left,
        });
        input.handle_pointer_event(&PointerEvent::Down {
            position: Point::new(200.0, 200.0),
            button: MouseButton::Left,
        });
        assert!(!input.take_double_click());
    }

    #[test]
    fn test_modifier_tracking_from_keys() {
        let mut input = InputState::new();
        input.handle_key_event(&KeyEvent::Pressed("Shift".into()));
        assert!(input.modifiers.shift);
        input.handle_key_event(&KeyEvent::Released("Shift".into()));
        assert!(!input.modifiers.shift);
    }
}
