//! Hold-to-repeat input handler for terminal environments.
//!
//! Pressing a movement control (left, right, down) acts immediately; while it
//! stays held the same action repeats on a fixed period (150ms by default).
//! Rotation and session keys never repeat.
//!
//! Supports terminals that do not emit key release events by using a timeout.

use std::time::Instant;

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::types::{GameAction, HOLD_REPEAT_MS};

/// Most actions a single `update` can emit.
pub const MAX_REPEATS_PER_UPDATE: usize = 16;

/// In terminals without key-release events, a short timeout prevents a single
/// tap from turning into a sustained "held" state.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Direction for horizontal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    Left,
    Right,
    None,
}

impl HorizontalDirection {
    fn action(&self) -> Option<GameAction> {
        match self {
            HorizontalDirection::Left => Some(GameAction::MoveLeft),
            HorizontalDirection::Right => Some(GameAction::MoveRight),
            HorizontalDirection::None => None,
        }
    }
}

/// Tracks which repeating controls are held and when they fire next.
#[derive(Debug, Clone)]
pub struct InputHandler {
    horizontal: HorizontalDirection,
    down_held: bool,
    last_key_time: Instant,
    last_update: Instant,
    horizontal_timer: u32,
    down_timer: u32,
    /// Part of the next `update` delta that elapsed before the press.
    horizontal_skip_ms: u32,
    down_skip_ms: u32,
    repeat_ms: u32,
    key_release_timeout_ms: u32,
}

fn horizontal_for(code: KeyCode) -> HorizontalDirection {
    match code {
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h' | 'H') => HorizontalDirection::Left,
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l' | 'L') => HorizontalDirection::Right,
        _ => HorizontalDirection::None,
    }
}

fn is_down(code: KeyCode) -> bool {
    matches!(code, KeyCode::Down | KeyCode::Char('s' | 'S' | 'j' | 'J'))
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_repeat_ms(HOLD_REPEAT_MS)
    }

    pub fn with_repeat_ms(repeat_ms: u32) -> Self {
        Self {
            horizontal: HorizontalDirection::None,
            down_held: false,
            last_key_time: Instant::now(),
            last_update: Instant::now(),
            horizontal_timer: 0,
            down_timer: 0,
            horizontal_skip_ms: 0,
            down_skip_ms: 0,
            repeat_ms: repeat_ms.max(1),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn repeat_ms(&self) -> u32 {
        self.repeat_ms
    }

    fn ms_since_update(&self, now: Instant) -> u32 {
        let since = now.saturating_duration_since(self.last_update);
        u32::try_from(since.as_millis()).unwrap_or(u32::MAX)
    }

    /// Register a key press. Returns the immediate action for a newly held
    /// movement control; a press of an already-held control only refreshes
    /// the release timeout.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<GameAction> {
        let horizontal = horizontal_for(code);
        if horizontal != HorizontalDirection::None {
            let now = Instant::now();
            self.last_key_time = now;
            if self.horizontal == horizontal {
                return None;
            }
            self.horizontal = horizontal;
            self.horizontal_timer = 0;
            self.horizontal_skip_ms = self.ms_since_update(now);
            return horizontal.action();
        }

        if is_down(code) {
            let now = Instant::now();
            self.last_key_time = now;
            if self.down_held {
                return None;
            }
            self.down_held = true;
            self.down_timer = 0;
            self.down_skip_ms = self.ms_since_update(now);
            return Some(GameAction::SoftDrop);
        }

        None
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        let horizontal = horizontal_for(code);
        if horizontal != HorizontalDirection::None && self.horizontal == horizontal {
            self.horizontal = HorizontalDirection::None;
            self.horizontal_timer = 0;
        }
        if is_down(code) {
            self.down_held = false;
            self.down_timer = 0;
        }
    }

    /// Advance held-control timers and collect the repeats that came due.
    ///
    /// `elapsed_ms` is the time since the previous call. A control pressed in
    /// between is only credited with the time since its press, so a tap is
    /// released before its first repeat when the release timeout is no shorter
    /// than the repeat period.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<GameAction, MAX_REPEATS_PER_UPDATE> {
        let mut actions = ArrayVec::new();
        let now = Instant::now();
        self.last_update = now;

        // Auto-release when terminal does not emit release events. Idle time
        // rounds up: a credited repeat timer never exceeds it.
        let idle = now.saturating_duration_since(self.last_key_time);
        let idle_ms = idle.as_millis() + u128::from(idle.subsec_nanos() % 1_000_000 != 0);
        if idle_ms >= u128::from(self.key_release_timeout_ms) {
            self.horizontal = HorizontalDirection::None;
            self.horizontal_timer = 0;
            self.down_held = false;
            self.down_timer = 0;
        }

        let horizontal_credit = elapsed_ms.saturating_sub(self.horizontal_skip_ms);
        let down_credit = elapsed_ms.saturating_sub(self.down_skip_ms);
        self.horizontal_skip_ms = 0;
        self.down_skip_ms = 0;

        if let Some(action) = self.horizontal.action() {
            self.horizontal_timer = self.horizontal_timer.saturating_add(horizontal_credit);
            while self.horizontal_timer >= self.repeat_ms {
                self.horizontal_timer -= self.repeat_ms;
                let _ = actions.try_push(action);
            }
        }

        if self.down_held {
            self.down_timer = self.down_timer.saturating_add(down_credit);
            while self.down_timer >= self.repeat_ms {
                self.down_timer -= self.repeat_ms;
                let _ = actions.try_push(GameAction::SoftDrop);
            }
        }

        actions
    }

    pub fn reset(&mut self) {
        self.horizontal = HorizontalDirection::None;
        self.down_held = false;
        self.last_key_time = Instant::now();
        self.horizontal_timer = 0;
        self.down_timer = 0;
        self.horizontal_skip_ms = 0;
        self.down_skip_ms = 0;
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn held() -> InputHandler {
        InputHandler::new().with_key_release_timeout_ms(10_000)
    }

    #[test]
    fn test_press_acts_immediately_then_repeats_every_period() {
        let mut ih = held();

        assert_eq!(ih.handle_key_press(KeyCode::Left), Some(GameAction::MoveLeft));

        assert!(ih.update(149).is_empty());
        assert_eq!(ih.update(1).as_slice(), &[GameAction::MoveLeft]);
        assert!(ih.update(100).is_empty());
        assert_eq!(ih.update(50).as_slice(), &[GameAction::MoveLeft]);
    }

    #[test]
    fn test_repeated_press_of_held_key_is_ignored() {
        let mut ih = held();
        assert_eq!(ih.handle_key_press(KeyCode::Right), Some(GameAction::MoveRight));
        assert_eq!(ih.handle_key_press(KeyCode::Right), None);
        assert_eq!(ih.handle_key_press(KeyCode::Char('d')), None);
    }

    #[test]
    fn test_switching_direction_acts_immediately() {
        let mut ih = held();
        assert_eq!(ih.handle_key_press(KeyCode::Left), Some(GameAction::MoveLeft));
        assert_eq!(ih.handle_key_press(KeyCode::Right), Some(GameAction::MoveRight));
        assert_eq!(ih.update(150).as_slice(), &[GameAction::MoveRight]);
    }

    #[test]
    fn test_down_repeats_alongside_horizontal() {
        let mut ih = held();
        assert_eq!(ih.handle_key_press(KeyCode::Down), Some(GameAction::SoftDrop));
        assert_eq!(ih.handle_key_press(KeyCode::Left), Some(GameAction::MoveLeft));

        let actions = ih.update(300);
        assert_eq!(
            actions.as_slice(),
            &[
                GameAction::MoveLeft,
                GameAction::MoveLeft,
                GameAction::SoftDrop,
                GameAction::SoftDrop
            ]
        );
    }

    #[test]
    fn test_release_stops_repeats() {
        let mut ih = held();
        ih.handle_key_press(KeyCode::Left);
        ih.handle_key_release(KeyCode::Left);
        assert!(ih.update(1000).is_empty());

        ih.handle_key_press(KeyCode::Down);
        ih.handle_key_release(KeyCode::Char('s'));
        assert!(ih.update(1000).is_empty());
    }

    #[test]
    fn test_rotation_does_not_repeat() {
        let mut ih = held();
        assert_eq!(ih.handle_key_press(KeyCode::Up), None);
        assert!(ih.update(1000).is_empty());
    }

    #[test]
    fn test_auto_release_triggers_after_timeout_without_key_release_events() {
        let mut ih = InputHandler::new();
        ih.key_release_timeout_ms = 50;

        assert_eq!(ih.handle_key_press(KeyCode::Left), Some(GameAction::MoveLeft));
        assert_eq!(ih.horizontal, HorizontalDirection::Left);

        // Simulate no key-release events by moving the last key time into the past.
        ih.last_key_time = Instant::now() - Duration::from_millis(51);

        assert!(ih.update(500).is_empty());
        assert_eq!(ih.horizontal, HorizontalDirection::None);
    }

    #[test]
    fn test_tap_mid_frame_is_released_before_first_repeat() {
        let mut ih = InputHandler::new();

        // Press lands 12ms after the last update.
        ih.last_update = Instant::now() - Duration::from_millis(12);
        assert_eq!(ih.handle_key_press(KeyCode::Left), Some(GameAction::MoveLeft));
        assert_eq!(ih.horizontal_skip_ms, 12);

        // Ten 16ms frames credit 4 + 9 * 16 = 148ms: still short of a repeat.
        for _ in 0..10 {
            assert!(ih.update(16).is_empty());
        }

        // By the next frame the tap has been idle past the release timeout.
        ih.last_key_time = Instant::now() - Duration::from_millis(150);
        assert!(ih.update(16).is_empty());
        assert_eq!(ih.horizontal, HorizontalDirection::None);
    }

    #[test]
    fn test_held_key_repeat_counts_from_press_not_frame_start() {
        let mut ih = held();

        ih.last_update = Instant::now() - Duration::from_millis(12);
        ih.handle_key_press(KeyCode::Down);

        assert!(ih.update(16).is_empty());
        assert!(ih.update(145).is_empty());
        assert_eq!(ih.update(1).as_slice(), &[GameAction::SoftDrop]);
    }

    #[test]
    fn test_update_output_is_bounded() {
        let mut ih = held();
        ih.handle_key_press(KeyCode::Left);
        let actions = ih.update(1_000_000);
        assert_eq!(actions.len(), MAX_REPEATS_PER_UPDATE);
    }

    #[test]
    fn test_reset_clears_held_state_and_stops_repeats() {
        let mut ih = held();

        assert_eq!(ih.handle_key_press(KeyCode::Left), Some(GameAction::MoveLeft));
        assert!(!ih.update(200).is_empty(), "expected repeats before reset");

        ih.reset();
        assert!(ih.update(200).is_empty(), "reset should stop repeats");
    }
}
