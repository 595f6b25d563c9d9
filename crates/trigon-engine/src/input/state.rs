use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, Modifiers};

/// Current input state for the window.
///
/// Holds "is down" information; per-frame transitions are recorded into an
/// `InputFrame`. A key enters `keys_pressed` only on the down transition,
/// so OS key repeat and continued holding never re-trigger it.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // On focus loss, clear the "down" set. Avoids stuck keys
                    // when focus changes mid-press.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key {
                key,
                state,
                modifiers,
                ..
            } => {
                self.modifiers = *modifiers;

                match state {
                    KeyState::Pressed => {
                        let inserted = self.keys_down.insert(*key);
                        if inserted {
                            frame.keys_pressed.insert(*key);
                        }
                    }
                    KeyState::Released => {
                        let removed = self.keys_down.remove(key);
                        if removed {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: Key, repeat: bool) -> InputEvent {
        InputEvent::Key {
            key,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            code: 0,
            repeat,
        }
    }

    fn release(key: Key) -> InputEvent {
        InputEvent::Key {
            key,
            state: KeyState::Released,
            modifiers: Modifiers::default(),
            code: 0,
            repeat: false,
        }
    }

    #[test]
    fn press_is_recorded_once_per_transition() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(Key::Escape, false));

        assert!(state.key_down(Key::Escape));
        assert!(frame.keys_pressed.contains(&Key::Escape));
    }

    #[test]
    fn key_repeat_does_not_retrigger_pressed() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(Key::Escape, false));
        frame.clear();

        // OS-generated repeats while the key stays held.
        state.apply_event(&mut frame, press(Key::Escape, true));
        state.apply_event(&mut frame, press(Key::Escape, true));

        assert!(state.key_down(Key::Escape));
        assert!(!frame.keys_pressed.contains(&Key::Escape));
    }

    #[test]
    fn release_then_press_triggers_again() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(Key::Escape, false));
        frame.clear();

        state.apply_event(&mut frame, release(Key::Escape));
        assert!(frame.keys_released.contains(&Key::Escape));
        frame.clear();

        state.apply_event(&mut frame, press(Key::Escape, false));
        assert!(frame.keys_pressed.contains(&Key::Escape));
    }

    #[test]
    fn spurious_release_records_nothing() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, release(Key::A));

        assert!(frame.keys_released.is_empty());
        assert_eq!(frame.events.len(), 1);
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(Key::W, false));
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(!state.key_down(Key::W));
        assert!(!state.focused);
    }

    #[test]
    fn modifiers_follow_events() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        let mods = Modifiers { shift: true, ..Modifiers::default() };
        state.apply_event(&mut frame, InputEvent::ModifiersChanged(mods));

        assert_eq!(state.modifiers, mods);
        assert!(state.modifiers.any());
    }
}
