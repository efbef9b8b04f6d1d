//! Game state module - manages the complete game session
//!
//! This module ties together all core components: board, shapes, piece source,
//! scoring and the drop clock. It owns every piece of mutable game state, and
//! exposes the handful of operations input and the frame loop drive it with.

use log::{debug, info};

use crate::board::Board;
use crate::clock::DropClock;
use crate::rng::{PieceQueue, PieceSource};
use crate::scoring::{drop_interval_ms, score_sweep};
use crate::shapes::{kick_offsets, template, PieceMatrix};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::*;

/// Active falling piece: an owned copy of its template plus a grid offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub matrix: PieceMatrix,
    /// Column of the matrix's top-left corner
    pub x: i8,
    /// Row of the matrix's top-left corner
    pub y: i8,
}

impl ActivePiece {
    /// Create a piece at the spawn position: top row, horizontally centered.
    pub fn spawn(kind: PieceKind) -> Self {
        let matrix = *template(kind);
        let x = (BOARD_WIDTH as i8 - matrix.size() as i8) / 2;
        Self {
            kind,
            matrix,
            x,
            y: 0,
        }
    }

    pub fn collides(&self, board: &Board) -> bool {
        board.collides(&self.matrix, self.x, self.y)
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState<S: PieceSource = PieceQueue> {
    board: Board,
    active: Option<ActivePiece>,
    next: Option<PieceKind>,
    source: S,
    score: u32,
    level: u32,
    lines: u32,
    status: SessionStatus,
    end_reason: Option<EndReason>,
    clock: DropClock,
    /// Last lock/line-clear event (consumed by observers).
    last_event: Option<LockEvent>,
    started: bool,
}

impl GameState<PieceQueue> {
    /// Create a new game with the given RNG seed
    pub fn new(seed: u64) -> Self {
        Self::with_source(PieceQueue::new(seed))
    }

    pub fn seed(&self) -> u64 {
        self.source.seed()
    }
}

impl<S: PieceSource> GameState<S> {
    /// Create a new game drawing pieces from `source`.
    pub fn with_source(source: S) -> Self {
        Self {
            board: Board::new(),
            active: None,
            next: None,
            source,
            score: 0,
            level: START_LEVEL,
            lines: 0,
            status: SessionStatus::Running,
            end_reason: None,
            clock: DropClock::new(),
            last_event: None,
            started: false,
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.spawn_next();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.started && self.status == SessionStatus::Running
    }

    pub fn game_over(&self) -> bool {
        self.status == SessionStatus::GameOver
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn next(&self) -> Option<PieceKind> {
        self.next
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access, for setting up scenarios before `start`.
    #[doc(hidden)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn clock(&self) -> &DropClock {
        &self.clock
    }

    /// Current auto-drop interval
    pub fn drop_interval_ms(&self) -> u32 {
        drop_interval_ms(self.level)
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    fn end(&mut self, reason: EndReason) {
        self.status = SessionStatus::GameOver;
        self.end_reason = Some(reason);
        info!(
            "game over ({:?}): score={} level={} lines={}",
            reason, self.score, self.level, self.lines
        );
    }

    /// Promote the queued piece to active and queue a new one.
    ///
    /// Returns false (and ends the game) if the new piece collides at its
    /// spawn position.
    pub fn spawn_next(&mut self) -> bool {
        let kind = match self.next.take() {
            Some(kind) => kind,
            None => self.source.draw(),
        };
        self.next = Some(self.source.draw());

        let piece = ActivePiece::spawn(kind);
        self.active = Some(piece);
        debug!("spawn {:?} at x={} (next {:?})", kind, piece.x, self.next);

        if piece.collides(&self.board) {
            self.end(EndReason::ToppedOut);
            return false;
        }

        true
    }

    /// Shift the active piece one column; reverts if the new spot collides.
    pub fn move_horizontal(&mut self, dir: Direction) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        active.x += dir.delta();
        if self.board.collides(&active.matrix, active.x, active.y) {
            active.x -= dir.delta();
            return false;
        }

        true
    }

    /// Raw-integer form of [`move_horizontal`](Self::move_horizontal).
    ///
    /// Only -1 and +1 are accepted.
    pub fn move_by(&mut self, dx: i8) -> Result<bool, InvalidDirection> {
        let dir = Direction::try_from(dx)?;
        Ok(self.move_horizontal(dir))
    }

    /// Drop the active piece one row.
    ///
    /// If the piece is resting, it is merged into the board, full rows are
    /// swept and scored, and the next piece spawns instead. Either way the
    /// auto-drop timer restarts. Returns false only when the game is not
    /// running.
    pub fn soft_drop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(mut active) = self.active else {
            return false;
        };

        self.clock.reset_counter();

        active.y += 1;
        if !active.collides(&self.board) {
            self.active = Some(active);
            return true;
        }
        active.y -= 1;

        self.lock(active);
        true
    }

    fn lock(&mut self, piece: ActivePiece) {
        self.board.merge(&piece.matrix, piece.x, piece.y);
        self.active = None;

        let swept = self.board.sweep();
        let rows = swept.len() as u32;
        let result = score_sweep(rows, self.lines, self.level);

        self.score = self.score.saturating_add(result.points);
        self.lines = result.lines;
        self.level = result.level;

        if rows > 0 {
            debug!(
                "swept rows {:?}: +{} (score={} lines={} level={})",
                swept.as_slice(),
                result.points,
                self.score,
                self.lines,
                self.level
            );
        }

        let spawned = self.spawn_next();
        self.last_event = Some(LockEvent {
            rows_cleared: rows,
            points: result.points,
            level_up: result.level_up,
            topped_out: !spawned,
        });
    }

    /// Rotate the active piece a quarter turn, kicking sideways if needed.
    ///
    /// When neither the rotated spot nor any kick offset is free, the piece
    /// is restored exactly (matrix and position).
    pub fn rotate(&mut self, dir: Direction) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(before) = self.active else {
            return false;
        };

        let mut rotated = before;
        rotated.matrix.rotate(dir);

        if !rotated.collides(&self.board) {
            self.active = Some(rotated);
            return true;
        }

        for dx in kick_offsets(rotated.matrix.size()) {
            let x = before.x + dx;
            if !self.board.collides(&rotated.matrix, x, before.y) {
                self.active = Some(ActivePiece { x, ..rotated });
                return true;
            }
        }

        false
    }

    /// Lowest row the active piece could fall to from where it is now.
    pub fn ghost_y(&self) -> Option<i8> {
        let active = self.active?;
        let mut y = active.y;
        while !self.board.collides(&active.matrix, active.x, y + 1) {
            y += 1;
        }
        Some(y)
    }

    /// Advance game time by `elapsed_ms`.
    ///
    /// At most one automatic drop happens per call, however large the delta.
    /// Returns true if a drop happened.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.is_running() {
            return false;
        }

        if self.clock.advance(elapsed_ms, self.drop_interval_ms()) {
            return self.soft_drop();
        }

        false
    }

    /// Advance game time to the frame timestamp `now_ms`.
    pub fn frame(&mut self, now_ms: u64) -> bool {
        if !self.is_running() {
            return false;
        }
        let elapsed = self.clock.frame_delta(now_ms);
        self.tick(elapsed)
    }

    /// Clear the board, reset score/lines/level and spawn a fresh piece.
    ///
    /// The queued next piece carries over into the new game.
    pub fn restart(&mut self) {
        self.board.clear();
        self.score = 0;
        self.lines = 0;
        self.level = START_LEVEL;
        self.clock.reset();
        self.status = SessionStatus::Running;
        self.end_reason = None;
        self.last_event = None;
        self.started = true;
        info!("restart");
        self.spawn_next();
    }

    /// End the current game regardless of the board.
    ///
    /// Quitting a game that already topped out relabels it as quit.
    pub fn quit(&mut self) {
        if self.game_over() {
            self.end_reason = Some(EndReason::Quit);
            return;
        }
        self.end(EndReason::Quit);
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_horizontal(Direction::Left),
            GameAction::MoveRight => self.move_horizontal(Direction::Right),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::RotateCw => self.rotate(Direction::CW),
            GameAction::RotateCcw => self.rotate(Direction::CCW),
            GameAction::Restart => {
                self.restart();
                true
            }
            GameAction::Quit => {
                let changed = self.end_reason != Some(EndReason::Quit);
                self.quit();
                changed
            }
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);

        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.next = self.next;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.status = self.status;
        out.end_reason = self.end_reason;
        out.drop_interval_ms = self.drop_interval_ms();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState<PieceQueue> {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedQueue;

    fn scripted(kinds: &[PieceKind]) -> GameState<ScriptedQueue> {
        GameState::with_source(ScriptedQueue::new(kinds.to_vec()))
    }

    fn fill_row_except(board: &mut Board, y: i8, gaps: &[i8]) {
        for x in 0..BOARD_WIDTH as i8 {
            if !gaps.contains(&x) {
                board.set(x, y, 1);
            }
        }
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);

        assert!(!state.started);
        assert!(!state.game_over());
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lines, 0);
        assert!(state.active.is_none());
        assert!(state.next.is_none());
        assert_eq!(state.seed(), 12345);
    }

    #[test]
    fn test_game_start() {
        let mut state = GameState::new(12345);
        state.start();
        assert!(state.started);
        assert!(state.active.is_some());
        assert!(state.next.is_some());

        // Starting twice does not respawn.
        let active = state.active;
        state.start();
        assert_eq!(state.active, active);
    }

    #[test]
    fn test_spawn_promotes_next() {
        let mut state = scripted(&[PieceKind::I, PieceKind::T, PieceKind::S]);
        state.start();
        assert_eq!(state.active.unwrap().kind, PieceKind::I);
        assert_eq!(state.next, Some(PieceKind::T));

        assert!(state.spawn_next());
        assert_eq!(state.active.unwrap().kind, PieceKind::T);
        assert_eq!(state.next, Some(PieceKind::S));
    }

    #[test]
    fn test_spawn_is_centered() {
        assert_eq!(ActivePiece::spawn(PieceKind::I).x, 3);
        assert_eq!(ActivePiece::spawn(PieceKind::O).x, 4);
        assert_eq!(ActivePiece::spawn(PieceKind::T).x, 3);
        assert_eq!(ActivePiece::spawn(PieceKind::Z).y, 0);
    }

    #[test]
    fn test_active_piece_owns_its_matrix() {
        let mut state = scripted(&[PieceKind::T]);
        state.start();
        assert!(state.rotate(Direction::CW));
        assert_ne!(state.active.unwrap().matrix, *template(PieceKind::T));
        assert_eq!(template(PieceKind::T).get(1, 0), 3);
    }

    #[test]
    fn test_move_stops_at_walls() {
        let mut state = scripted(&[PieceKind::T]);
        state.start();

        let mut moved = 0;
        for _ in 0..10 {
            if state.move_horizontal(Direction::Right) {
                moved += 1;
            }
        }
        // T spawns at x=3 with width 3; rightmost x is 7.
        assert_eq!(moved, 4);
        assert_eq!(state.active.unwrap().x, 7);
    }

    #[test]
    fn test_move_by_rejects_invalid_direction() {
        let mut state = scripted(&[PieceKind::T]);
        state.start();
        assert_eq!(state.move_by(2), Err(InvalidDirection(2)));
        assert_eq!(state.move_by(0), Err(InvalidDirection(0)));
        assert_eq!(state.active.unwrap().x, 3);
        assert_eq!(state.move_by(-1), Ok(true));
        assert_eq!(state.active.unwrap().x, 2);
    }

    #[test]
    fn test_soft_drop_moves_then_locks() {
        let mut state = scripted(&[PieceKind::O, PieceKind::T]);
        state.start();

        for _ in 0..18 {
            assert!(state.soft_drop());
        }
        assert_eq!(state.active.unwrap().y, 18);
        assert_eq!(state.board.occupied_count(), 0);

        assert!(state.soft_drop());
        assert_eq!(state.board.occupied_count(), 4);
        assert_eq!(state.board.get(4, 19), Some(2));
        assert_eq!(state.active.unwrap().kind, PieceKind::T);
        assert_eq!(state.active.unwrap().y, 0);

        let ev = state.take_last_event().unwrap();
        assert_eq!(ev.rows_cleared, 0);
        assert!(!ev.topped_out);
        assert!(state.take_last_event().is_none());
    }

    #[test]
    fn test_lock_clears_and_scores() {
        let mut state = scripted(&[PieceKind::O]);
        fill_row_except(&mut state.board, 19, &[0, 1]);
        fill_row_except(&mut state.board, 18, &[0, 1]);
        state.start();

        for _ in 0..4 {
            assert!(state.move_horizontal(Direction::Left));
        }
        while state.take_last_event().is_none() {
            state.soft_drop();
        }

        assert_eq!(state.score, 300);
        assert_eq!(state.lines, 2);
        assert_eq!(state.level, 1);
        assert_eq!(state.board.occupied_count(), 0);
    }

    #[test]
    fn test_rotate_kicks_off_right_wall() {
        let mut state = scripted(&[PieceKind::T]);
        state.start();
        // Pointing left, the T leaves matrix column 2 empty and can hug the right wall.
        assert!(state.rotate(Direction::CCW));
        while state.move_horizontal(Direction::Right) {}
        assert_eq!(state.active.unwrap().x, 8);

        // Back to spawn orientation needs column 2 at x=10: kicked one column left.
        assert!(state.rotate(Direction::CW));
        let active = state.active.unwrap();
        assert_eq!(active.x, 7);
        assert_eq!(active.matrix, *template(PieceKind::T));
        assert!(!active.collides(&state.board));
    }

    #[test]
    fn test_rotate_reverts_when_boxed_in() {
        let mut state = scripted(&[PieceKind::I]);
        // The horizontal I sits on board row 1; row 2 below it is solid.
        for x in 0..BOARD_WIDTH as i8 {
            state.board.set(x, 2, 1);
        }
        state.start();
        let before = state.active.unwrap();

        // Any vertical I would need rows 0..=3 in one column.
        assert!(!state.rotate(Direction::CW));
        assert_eq!(state.active.unwrap(), before);
    }

    #[test]
    fn test_ghost_y() {
        let mut state = scripted(&[PieceKind::O]);
        state.start();
        assert_eq!(state.ghost_y(), Some(18));

        state.board.set(4, 10, 3);
        assert_eq!(state.ghost_y(), Some(8));
    }

    #[test]
    fn test_tick_drops_once_past_interval() {
        let mut state = scripted(&[PieceKind::O]);
        state.start();

        assert!(!state.tick(1000));
        assert_eq!(state.active.unwrap().y, 0);
        assert!(state.tick(1));
        assert_eq!(state.active.unwrap().y, 1);

        // A huge frame still only drops one row.
        assert!(state.tick(60_000));
        assert_eq!(state.active.unwrap().y, 2);
    }

    #[test]
    fn test_manual_drop_resets_timer() {
        let mut state = scripted(&[PieceKind::O]);
        state.start();
        assert!(!state.tick(900));
        state.soft_drop();
        assert!(!state.tick(900));
        assert_eq!(state.active.unwrap().y, 1);
    }

    #[test]
    fn test_frame_uses_timestamps() {
        let mut state = scripted(&[PieceKind::O]);
        state.start();
        assert!(!state.frame(10_000));
        assert!(!state.frame(11_000));
        assert!(state.frame(11_001));
        assert_eq!(state.active.unwrap().y, 1);
    }

    #[test]
    fn test_game_over_on_blocked_spawn() {
        let mut state = scripted(&[PieceKind::O]);
        state.board.set(4, 0, 5);
        state.start();

        assert!(state.game_over());
        assert_eq!(state.end_reason(), Some(EndReason::ToppedOut));
        assert!(!state.soft_drop());
        assert!(!state.move_horizontal(Direction::Left));
        assert!(!state.rotate(Direction::CW));
        assert!(!state.tick(5000));
    }

    #[test]
    fn test_quit_forces_game_over() {
        let mut state = GameState::new(3);
        state.start();
        assert!(state.apply_action(GameAction::Quit));
        assert!(state.game_over());
        assert_eq!(state.end_reason(), Some(EndReason::Quit));
        assert!(!state.apply_action(GameAction::Quit));
        assert_eq!(state.end_reason(), Some(EndReason::Quit));
    }

    #[test]
    fn test_quit_after_top_out_relabels_end_reason() {
        let mut state = scripted(&[PieceKind::O]);
        state.start();
        state.end(EndReason::ToppedOut);

        assert!(state.apply_action(GameAction::Quit));
        assert!(state.game_over());
        assert_eq!(state.end_reason(), Some(EndReason::Quit));
        assert!(!state.apply_action(GameAction::Quit));
    }

    #[test]
    fn test_restart_resets_session() {
        let mut state = scripted(&[PieceKind::O, PieceKind::I]);
        state.start();
        state.score = 1200;
        state.lines = 12;
        state.level = 2;
        state.board.set(0, 19, 1);
        state.quit();

        let queued = state.next;
        state.restart();
        assert!(state.is_running());
        assert_eq!(state.end_reason(), None);
        assert_eq!((state.score, state.lines, state.level), (0, 0, 1));
        assert_eq!(state.board.occupied_count(), 0);
        assert_eq!(state.active.map(|a| a.kind), queued);
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = scripted(&[PieceKind::T, PieceKind::L]);
        state.board.set(0, 19, 6);
        state.start();

        let snap = state.snapshot();
        assert_eq!(snap.board[19][0], 6);
        assert_eq!(snap.active.unwrap().kind, PieceKind::T);
        assert_eq!(snap.ghost_y, state.ghost_y());
        assert_eq!(snap.next, Some(PieceKind::L));
        assert_eq!(snap.level, 1);
        assert_eq!(snap.drop_interval_ms, 1000);
        assert!(snap.playable());
    }
}
