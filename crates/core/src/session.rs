//! Session module - one running game
//!
//! A [`Session`] owns the grid, the active and next pieces, the score, gravity,
//! the shape RNG and the renderer hook. All of it lives behind a single mutex, so
//! every operation (player action, gravity tick, finalize, lifecycle call) is one
//! critical section and never observes a half-applied change.
//!
//! Gravity ticks arrive on the ticker thread and hold only a weak reference to the
//! session state. Each tick carries a [`TickStamp`]; ticks from a ticker that was
//! paused or replaced after firing are dropped instead of being applied late.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::{debug, info, warn};

use crate::grid::{BoardDimensions, Grid};
use crate::gravity::{Gravity, GravityCallback};
use crate::piece::{MoveOutcome, Piece};
use crate::rng::SimpleRng;
use crate::scoring::{gravity_rate_for, Score};
use crate::snapshot::{GameSnapshot, LockEvent, PieceSnapshot};
use crate::ticker::TickStamp;
use crate::types::{Direction, GameAction, INITIAL_SPEED};

/// Receives a snapshot after every board-visible change
pub trait Renderer: Send {
    fn render(&mut self, snapshot: &GameSnapshot);

    /// Forget what is on screen so the next render repaints everything
    fn invalidate(&mut self) {}
}

/// Renderer that draws nothing (headless sessions, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _snapshot: &GameSnapshot) {}
}

struct SessionState {
    grid: Grid,
    active: Piece,
    next: Piece,
    score: Score,
    gravity: Gravity,
    rng: SimpleRng,
    started: bool,
    paused: bool,
    game_over: bool,
    render_suspended: bool,
    renderer: Option<Box<dyn Renderer>>,
    events: Option<Sender<LockEvent>>,
}

pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

impl Session {
    /// Create a headless session with the given RNG seed
    pub fn new(dims: BoardDimensions, seed: u32) -> Self {
        Self::build(dims, seed, None)
    }

    /// Create a session that renders through `renderer`
    pub fn with_renderer(dims: BoardDimensions, seed: u32, renderer: Box<dyn Renderer>) -> Self {
        Self::build(dims, seed, Some(renderer))
    }

    fn build(dims: BoardDimensions, seed: u32, renderer: Option<Box<dyn Renderer>>) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<Mutex<SessionState>>| {
            let weak = weak.clone();
            let on_tick: GravityCallback = Arc::new(move |direction, stamp| {
                if let Some(inner) = weak.upgrade() {
                    gravity_tick(&inner, direction, stamp);
                }
            });

            let grid = Grid::new(dims);
            let mut rng = SimpleRng::new(seed);
            let active = Piece::spawn(rng.next_shape(), grid.width());
            let next = Piece::spawn(rng.next_shape(), grid.width());
            let mut gravity = Gravity::new(on_tick);
            gravity.set_rate(INITIAL_SPEED);

            Mutex::new(SessionState {
                grid,
                active,
                next,
                score: Score::new(),
                gravity,
                rng,
                started: false,
                paused: false,
                game_over: false,
                render_suspended: true,
                renderer,
                events: None,
            })
        });

        info!(
            width = dims.width(),
            height = dims.height(),
            seed,
            "session created"
        );
        Self { inner }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        lock_state(&self.inner)
    }

    /// Enable rendering, draw the board and let gravity run
    pub fn start(&self) {
        let mut state = self.state();
        state.started = true;
        state.paused = false;
        state.render_suspended = false;
        state.render();
        if !state.game_over {
            state.gravity.unfreeze();
        }
        debug!("session started");
    }

    /// Freeze gravity and suspend rendering. The last frame shows the pause.
    pub fn pause(&self) {
        let mut state = self.state();
        if state.paused {
            return;
        }
        state.paused = true;
        state.gravity.freeze();
        state.render();
        state.render_suspended = true;
        debug!("session paused");
    }

    /// Same as [`Session::start`]
    pub fn resume(&self) {
        self.start();
    }

    /// Stop gravity for good and stop drawing (quit path)
    pub fn stop(&self) {
        let mut state = self.state();
        state.gravity.stop();
        state.render_suspended = true;
        state.started = false;
        debug!("session stopped");
    }

    pub fn toggle_pause(&self) {
        if self.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn move_left(&self) -> MoveOutcome {
        self.move_piece(Direction::Left)
    }

    pub fn move_right(&self) -> MoveOutcome {
        self.move_piece(Direction::Right)
    }

    /// Move down one row; a blocked drop locks the piece
    pub fn soft_drop(&self) -> MoveOutcome {
        self.move_piece(Direction::Down)
    }

    /// Unit move of the active piece. Ignored (reported as blocked) while paused
    /// and after gameover.
    pub fn move_piece(&self, direction: Direction) -> MoveOutcome {
        let mut state = self.state();
        if !state.accepts_input() {
            return MoveOutcome::Blocked;
        }
        state.step(direction)
    }

    /// Rotate the active piece, kicking one column right or left if needed
    pub fn rotate(&self) -> bool {
        let mut state = self.state();
        if !state.accepts_input() {
            return false;
        }

        let SessionState { grid, active, .. } = &mut *state;
        let rotated = active.try_rotate(grid);
        if rotated {
            state.render();
        }
        rotated
    }

    /// Repaint the whole screen
    pub fn redraw(&self) {
        let mut state = self.state();
        if let Some(renderer) = state.renderer.as_mut() {
            renderer.invalidate();
        }
        state.render();
    }

    /// Dispatch a player action. Returns false once the player asked to quit.
    pub fn apply_action(&self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => {
                self.move_left();
            }
            GameAction::MoveRight => {
                self.move_right();
            }
            GameAction::SoftDrop => {
                self.soft_drop();
            }
            GameAction::Rotate => {
                self.rotate();
            }
            GameAction::Pause => self.toggle_pause(),
            GameAction::Redraw => self.redraw(),
            GameAction::Quit => {
                self.stop();
                return false;
            }
        }
        true
    }

    /// Replace the gravity rate (moves per second, negative rises). The new
    /// ticker runs right away unless the session is paused, unstarted or over.
    pub fn set_gravity_rate(&self, rate: f64) {
        let mut state = self.state();
        state.gravity.set_rate(rate);
        if state.gravity_enabled() {
            state.gravity.unfreeze();
        }
        state.render();
    }

    pub fn gravity_rate(&self) -> f64 {
        self.state().gravity.rate()
    }

    pub fn is_gravity_running(&self) -> bool {
        self.state().gravity.is_running()
    }

    /// Send every [`LockEvent`] to `sink` from now on
    pub fn set_event_sink(&self, sink: Sender<LockEvent>) {
        self.state().events = Some(sink);
    }

    pub fn suspend_rendering(&self) {
        self.state().render_suspended = true;
    }

    pub fn resume_rendering(&self) {
        let mut state = self.state();
        state.render_suspended = false;
        state.render();
    }

    pub fn width(&self) -> usize {
        self.state().grid.width()
    }

    pub fn height(&self) -> usize {
        self.state().grid.height()
    }

    pub fn score(&self) -> u32 {
        self.state().score.points()
    }

    pub fn is_game_over(&self) -> bool {
        self.state().game_over
    }

    pub fn is_paused(&self) -> bool {
        self.state().paused
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state().snapshot()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("Session")
            .field("width", &state.grid.width())
            .field("height", &state.grid.height())
            .field("score", &state.score.points())
            .field("gravity", &state.gravity)
            .field("paused", &state.paused)
            .field("game_over", &state.game_over)
            .finish()
    }
}

fn lock_state(inner: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    inner.lock().unwrap_or_else(|poisoned| {
        warn!("session lock poisoned, recovering state");
        poisoned.into_inner()
    })
}

/// Entry point of the ticker thread
fn gravity_tick(inner: &Mutex<SessionState>, direction: Direction, stamp: TickStamp) {
    let mut state = lock_state(inner);
    if !state.gravity.accepts(stamp) {
        debug!(?stamp, "stale gravity tick dropped");
        return;
    }
    if state.game_over {
        return;
    }
    debug!(?direction, "gravity tick");
    state.step(direction);
}

impl SessionState {
    fn accepts_input(&self) -> bool {
        !self.game_over && !self.paused
    }

    fn gravity_enabled(&self) -> bool {
        self.started && !self.paused && !self.game_over
    }

    fn step(&mut self, direction: Direction) -> MoveOutcome {
        let outcome = self.active.try_move(&self.grid, direction);
        match outcome {
            MoveOutcome::Moved => self.render(),
            MoveOutcome::Blocked => {}
            MoveOutcome::Finalize => self.finalize(),
        }
        outcome
    }

    /// Settle the active piece, clear rows, score, and bring in the next piece
    fn finalize(&mut self) {
        if self.game_over {
            return;
        }
        self.gravity.freeze();

        let piece = self.active;
        if piece.overlaps(&self.grid) {
            self.game_over = true;
        }
        self.grid.settle(piece.x, piece.y, &piece.shape);

        let mut rows_cleared = 0;
        let mut points_awarded = 0;
        if !self.game_over {
            let row_start = piece.y.max(0) as usize;
            rows_cleared = self
                .grid
                .scan_completed(row_start, row_start + piece.height());
            if rows_cleared > 0 {
                points_awarded = self.score.rows_completed(rows_cleared);
                let rate = gravity_rate_for(self.score.points());
                self.gravity.set_rate(rate);
                info!(
                    rows = rows_cleared,
                    points = points_awarded,
                    score = self.score.points(),
                    rate,
                    "rows cleared"
                );
            }
        }

        if !self.game_over {
            if self.next.overlaps(&self.grid) {
                self.game_over = true;
                let stuck = self.next;
                self.grid.settle(stuck.x, stuck.y, &stuck.shape);
            } else {
                self.active = self.next;
                self.next = Piece::spawn(self.rng.next_shape(), self.grid.width());
                if self.gravity_enabled() {
                    self.gravity.unfreeze();
                }
            }
        }

        if self.game_over {
            self.gravity.stop();
            info!(score = self.score.points(), "game over");
        } else {
            debug!(kind = ?piece.kind, x = piece.x, y = piece.y, "piece locked");
        }

        self.emit(LockEvent {
            kind: piece.kind,
            x: piece.x,
            y: piece.y,
            rows_cleared,
            points_awarded,
            score: self.score.points(),
            gravity_rate: self.gravity.rate(),
            game_over: self.game_over,
        });
        self.render();
    }

    fn emit(&mut self, event: LockEvent) {
        let Some(sink) = &self.events else {
            return;
        };
        if sink.send(event).is_err() {
            debug!("lock event receiver gone, detaching sink");
            self.events = None;
        }
    }

    fn render(&mut self) {
        if self.render_suspended || self.renderer.is_none() {
            return;
        }
        let snapshot = self.snapshot();
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render(&snapshot);
        }
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            cells: self.grid.cells().to_vec(),
            active: (!self.game_over).then(|| PieceSnapshot::from(self.active)),
            next: PieceSnapshot::from(self.next),
            score: self.score.points(),
            gravity_rate: self.gravity.rate(),
            paused: self.paused,
            game_over: self.game_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::catalog_shape;
    use crate::types::{ShapeKind, FILLED_CELL};
    use std::sync::mpsc;

    fn session(w: i64, h: i64) -> Session {
        Session::new(BoardDimensions::new(w, h).unwrap(), 12345)
    }

    fn fill_row_except(state: &mut SessionState, y: usize, holes: &[usize]) {
        for x in 0..state.grid.width() {
            if !holes.contains(&x) {
                state.grid.set(x, y, FILLED_CELL);
            }
        }
    }

    fn drop_until_locked(session: &Session) -> usize {
        let mut moves = 0;
        while session.soft_drop() == MoveOutcome::Moved {
            moves += 1;
        }
        moves
    }

    struct Recording(Arc<Mutex<Vec<GameSnapshot>>>);

    impl Renderer for Recording {
        fn render(&mut self, snapshot: &GameSnapshot) {
            self.0.lock().unwrap().push(snapshot.clone());
        }
    }

    #[test]
    fn test_new_session_has_two_free_pieces() {
        let s = session(10, 20);
        let state = s.state();
        assert!(!state.active.overlaps(&state.grid));
        assert!(!state.next.overlaps(&state.grid));
        assert_eq!(state.gravity.rate(), INITIAL_SPEED);
        assert!(!state.gravity.is_running());
    }

    #[test]
    fn test_o_piece_lands_on_floor() {
        let s = session(10, 20);
        s.state().active = Piece::spawn(ShapeKind::O, 10);

        assert_eq!(drop_until_locked(&s), 18);

        let state = s.state();
        assert_eq!(state.grid.filled_count(), 4);
        assert_eq!(state.grid.get(4, 18), 1);
        assert_eq!(state.grid.get(5, 19), 1);
        assert_eq!(state.score.points(), 0);
        assert!(!state.game_over);
        // The next piece took over at the top.
        assert_eq!(state.active.y, 0);
    }

    #[test]
    fn test_single_row_clear() {
        let s = session(10, 20);
        {
            let mut state = s.state();
            fill_row_except(&mut state, 19, &[0]);
            let vertical = catalog_shape(ShapeKind::I).rotated();
            state.active = Piece::new(ShapeKind::I, vertical, 0, 0);
        }

        drop_until_locked(&s);

        let state = s.state();
        assert_eq!(state.score.points(), 40);
        assert_eq!(state.grid.width(), 10);
        assert_eq!(state.grid.height(), 20);
        // The three I cells above the cleared row fell one row.
        assert_eq!(state.grid.filled_count(), 3);
        for y in 17..20 {
            assert_eq!(state.grid.get(0, y), 1);
        }
        assert_eq!(state.gravity.rate(), gravity_rate_for(40));
    }

    #[test]
    fn test_non_adjacent_rows_clear_in_one_lock() {
        let s = session(10, 20);
        {
            let mut state = s.state();
            fill_row_except(&mut state, 16, &[0]);
            fill_row_except(&mut state, 17, &[0, 5]);
            fill_row_except(&mut state, 18, &[0]);
            fill_row_except(&mut state, 19, &[0]);
            let vertical = catalog_shape(ShapeKind::I).rotated();
            state.active = Piece::new(ShapeKind::I, vertical, 0, 0);
        }

        drop_until_locked(&s);

        let state = s.state();
        assert_eq!(state.score.points(), 300);
        assert_eq!(state.grid.filled_count(), 9);
        assert_eq!(state.grid.get(5, 19), 0);
        assert_eq!(state.grid.get(0, 19), 1);
    }

    #[test]
    fn test_blocked_spawn_ends_game() {
        let s = session(10, 20);
        {
            let mut state = s.state();
            for x in 3..7 {
                state.grid.set(x, 0, FILLED_CELL);
                state.grid.set(x, 1, FILLED_CELL);
            }
            let mut o = Piece::spawn(ShapeKind::O, 10);
            o.x = 0;
            o.y = 18;
            state.active = o;
        }

        let stuck = s.state().next;
        assert_eq!(s.soft_drop(), MoveOutcome::Finalize);

        assert!(s.is_game_over());
        let state = s.state();
        // The stuck next piece was written over the filled spawn block, so each
        // of its cells reads 2.
        let written = stuck.cells();
        assert_eq!(written.len(), 4);
        for &(x, y) in &written {
            assert_eq!(state.grid.get(x as usize, y as usize), 2, "({}, {})", x, y);
        }
        // The O locked at the floor is settled once.
        assert_eq!(state.grid.get(0, 19), 1);
        assert_eq!(state.grid.get(1, 18), 1);
        assert!(!state.grid.is_consistent());
        assert!(!state.gravity.is_running());
        assert!(state.snapshot().active.is_none());
    }

    #[test]
    fn test_actions_after_game_over_are_ignored() {
        let s = session(10, 20);
        s.state().game_over = true;
        let before = s.snapshot();

        assert_eq!(s.move_left(), MoveOutcome::Blocked);
        assert_eq!(s.soft_drop(), MoveOutcome::Blocked);
        assert!(!s.rotate());
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn test_lock_event_sent_to_sink() {
        let s = session(10, 20);
        let (tx, rx) = mpsc::channel();
        s.set_event_sink(tx);
        {
            let mut state = s.state();
            fill_row_except(&mut state, 19, &[0]);
            let vertical = catalog_shape(ShapeKind::I).rotated();
            state.active = Piece::new(ShapeKind::I, vertical, 0, 0);
        }

        drop_until_locked(&s);

        let event = rx.try_recv().unwrap();
        assert_eq!(event.kind, ShapeKind::I);
        assert_eq!((event.x, event.y), (0, 16));
        assert_eq!(event.rows_cleared, 1);
        assert_eq!(event.points_awarded, 40);
        assert_eq!(event.score, 40);
        assert!(!event.game_over);
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let s = session(10, 20);
        let y0 = s.state().active.y;
        let stale = TickStamp {
            ticker_id: u64::MAX,
            epoch: 0,
        };
        gravity_tick(&s.inner, Direction::Down, stale);
        assert_eq!(s.state().active.y, y0);
    }

    #[test]
    fn test_current_tick_moves_piece() {
        let s = session(10, 20);
        s.start();
        let stamp = {
            let state = s.state();
            assert!(state.gravity.is_running());
            state.gravity.current_stamp().unwrap()
        };
        let y0 = s.state().active.y;
        gravity_tick(&s.inner, Direction::Down, stamp);
        assert_eq!(s.state().active.y, y0 + 1);
        s.stop();
    }

    #[test]
    fn test_pause_blocks_input_and_freezes_gravity() {
        let s = session(10, 20);
        s.start();
        s.pause();
        assert!(s.is_paused());
        assert!(!s.is_gravity_running());
        assert_eq!(s.move_right(), MoveOutcome::Blocked);

        s.toggle_pause();
        assert!(!s.is_paused());
        assert!(s.is_gravity_running());
        s.stop();
        assert!(!s.is_gravity_running());
    }

    #[test]
    fn test_renderer_sees_changes_only_when_enabled() {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let s = Session::with_renderer(
            BoardDimensions::default(),
            7,
            Box::new(Recording(Arc::clone(&frames))),
        );

        s.move_left();
        assert!(frames.lock().unwrap().is_empty());

        s.start();
        s.move_right();
        let count = frames.lock().unwrap().len();
        assert_eq!(count, 2);

        s.suspend_rendering();
        s.move_right();
        assert_eq!(frames.lock().unwrap().len(), count);
        s.stop();
    }

    #[test]
    fn test_unrepresentable_gravity_rate_disables_gravity() {
        let s = session(10, 20);
        s.start();
        s.set_gravity_rate(1e-300);
        assert_eq!(s.gravity_rate(), 0.0);
        assert!(!s.is_gravity_running());

        // The lock is still healthy and gravity can be turned back on.
        assert_eq!(s.move_left(), MoveOutcome::Moved);
        s.set_gravity_rate(2.0);
        assert_eq!(s.gravity_rate(), 2.0);
        assert!(s.is_gravity_running());
        s.stop();
    }

    #[test]
    fn test_quit_action_stops_session() {
        let s = session(10, 20);
        s.start();
        assert!(s.apply_action(GameAction::MoveLeft));
        assert!(!s.apply_action(GameAction::Quit));
        assert!(!s.is_gravity_running());
    }
}
