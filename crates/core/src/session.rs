//! Session module - the state machine driving a game
//!
//! A [`Session`] owns the [`Grid`] and everything derived from play: status,
//! mode, score, target, selection and the Time-mode countdown. Frontends feed
//! it commands ([`Session::apply_command`]) and elapsed time
//! ([`Session::tick`]), and read it back through [`Session::snapshot`].
//!
//! A successful selection is resolved in two steps. The matched tiles are
//! scored and flagged `is_removing` at once; compaction, the new target and
//! (in Classic mode) the row injection follow after the settle delay. While a
//! clear is pending, selections are queued and elapsed time is held back, then
//! both are replayed once the grid has settled, so no mutation ever lands on a
//! half-cleared board.

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::config::{ConfigError, GridConfig, LayoutError};
use crate::grid::{Grid, InjectOutcome, SelectionOutcome};
use crate::rng::RandomSource;
use crate::scoring::{clear_points, is_big_clear, level_for_score};
use crate::snapshot::GameSnapshot;
use crate::tile::Tile;
use crate::types::{GameCommand, GameMode, GameStatus, TileId, COUNTDOWN_STEP_MS};

/// Notable transitions, drained by the frontend after each update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    GameStarted { mode: GameMode },
    /// Selection went past the target and was dropped
    Overshoot { sum: u32 },
    /// Selection matched the target and was scored
    Cleared { matched: usize, points: u32, big: bool },
    RowInjected,
    GameOver { score: u32 },
}

#[derive(Debug, Clone)]
struct PendingClear {
    matched: Vec<TileId>,
    remaining_ms: u32,
}

/// One game session and its controller.
#[derive(Debug, Clone)]
pub struct Session<R> {
    grid: Grid<R>,
    status: GameStatus,
    mode: GameMode,
    score: u32,
    target: u32,
    selected: Vec<TileId>,
    time_left: u32,
    /// Milliseconds accumulated toward the next countdown step.
    countdown_ms: u32,
    paused: bool,
    pending: Option<PendingClear>,
    deferred_selects: VecDeque<TileId>,
    /// Elapsed time held back while a clear is pending.
    deferred_ms: u32,
    events: Vec<SessionEvent>,
}

impl<R: RandomSource> Session<R> {
    /// Create a session sitting in the menu.
    pub fn new(config: GridConfig, rng: R) -> Result<Self, ConfigError> {
        let grid = Grid::new(config, rng)?;
        Ok(Self {
            time_left: config.time_limit_secs,
            grid,
            status: GameStatus::Menu,
            mode: GameMode::Classic,
            score: 0,
            target: 0,
            selected: Vec::new(),
            countdown_ms: 0,
            paused: false,
            pending: None,
            deferred_selects: VecDeque::new(),
            deferred_ms: 0,
            events: Vec::new(),
        })
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Always `score / 500 + 1`.
    pub fn level(&self) -> u32 {
        level_for_score(self.score)
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn selected_ids(&self) -> &[TileId] {
        &self.selected
    }

    pub fn selection_sum(&self) -> u32 {
        self.grid.evaluate(&self.selected, self.target).sum()
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn is_clear_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn config(&self) -> &GridConfig {
        self.grid.config()
    }

    pub fn grid(&self) -> &Grid<R> {
        &self.grid
    }

    pub fn tiles(&self) -> &[Tile] {
        self.grid.tiles()
    }

    /// Replace the board and target of a running game, e.g. to replay a
    /// known position.
    ///
    /// Only accepted while playing with no clear settling. The layout and
    /// target are checked against the grid configuration; on error nothing
    /// changes. The selection is dropped.
    pub fn load_layout(&mut self, tiles: Vec<Tile>, target: u32) -> Result<(), LayoutError> {
        if self.status != GameStatus::Playing {
            return Err(LayoutError::NotPlaying);
        }
        if self.pending.is_some() {
            return Err(LayoutError::ClearPending);
        }
        self.grid.config().check_target(target)?;
        self.grid.set_tiles(tiles)?;

        self.target = target;
        self.selected.clear();
        debug!(tiles = self.grid.len(), target, "layout loaded");
        Ok(())
    }

    /// Take all events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start a fresh game from the menu or after game over.
    pub fn start_game(&mut self, mode: GameMode) -> bool {
        if self.status == GameStatus::Playing {
            return false;
        }

        self.grid.fill_initial();
        self.status = GameStatus::Playing;
        self.mode = mode;
        self.score = 0;
        self.target = self.grid.generate_target();
        self.selected.clear();
        self.time_left = self.grid.config().time_limit_secs;
        self.countdown_ms = 0;
        self.paused = false;
        self.pending = None;
        self.deferred_selects.clear();
        self.deferred_ms = 0;

        info!(mode = mode.as_str(), target = self.target, "game started");
        self.events.push(SessionEvent::GameStarted { mode });
        true
    }

    /// Start again in the same mode after game over.
    pub fn restart(&mut self) -> bool {
        if self.status != GameStatus::GameOver {
            return false;
        }
        self.start_game(self.mode)
    }

    /// Abandon the session and go back to the menu.
    pub fn return_to_menu(&mut self) -> bool {
        if self.status == GameStatus::Menu {
            return false;
        }

        self.grid.clear();
        self.status = GameStatus::Menu;
        self.score = 0;
        self.target = 0;
        self.selected.clear();
        self.time_left = self.grid.config().time_limit_secs;
        self.countdown_ms = 0;
        self.paused = false;
        self.pending = None;
        self.deferred_selects.clear();
        self.deferred_ms = 0;

        debug!("returned to menu");
        true
    }

    /// External status change. Only a move to the menu is accepted.
    pub fn set_status(&mut self, status: GameStatus) -> bool {
        match status {
            GameStatus::Menu => self.return_to_menu(),
            GameStatus::Playing | GameStatus::GameOver => false,
        }
    }

    pub fn set_paused(&mut self, paused: bool) -> bool {
        if self.status != GameStatus::Playing || self.paused == paused {
            return false;
        }
        self.paused = paused;
        debug!(paused, "pause toggled");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.set_paused(!self.paused)
    }

    /// Toggle `id` in the selection and evaluate the result.
    ///
    /// Ignored unless playing and unpaused, or when `id` is not on the board.
    /// While a clear is pending the toggle is queued instead.
    pub fn select_tile(&mut self, id: TileId) -> bool {
        if self.status != GameStatus::Playing || self.paused {
            return false;
        }
        if !self.grid.contains(id) {
            return false;
        }
        if self.pending.is_some() {
            self.deferred_selects.push_back(id);
            return true;
        }

        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
        self.evaluate_selection();
        true
    }

    /// Advance time by `elapsed_ms`.
    ///
    /// Drives the settle delay and, in Time mode, the countdown. Returns true
    /// when the board changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.status != GameStatus::Playing || self.paused {
            return false;
        }

        let mut changed = false;

        if let Some(pending) = self.pending.as_mut() {
            if elapsed_ms < pending.remaining_ms {
                pending.remaining_ms -= elapsed_ms;
                self.deferred_ms = self.deferred_ms.saturating_add(elapsed_ms);
                return false;
            }
            self.finish_clear();
            changed = true;
        }

        let elapsed = std::mem::take(&mut self.deferred_ms).saturating_add(elapsed_ms);
        if self.pending.is_some() {
            // A replayed selection matched again; hold the time for it too.
            self.deferred_ms = elapsed;
            return changed;
        }

        if self.status == GameStatus::Playing && self.mode.is_timed() {
            changed |= self.advance_countdown(elapsed);
        }
        changed
    }

    /// Dispatch a frontend command.
    pub fn apply_command(&mut self, command: GameCommand) -> bool {
        match command {
            GameCommand::Start(mode) => self.start_game(mode),
            GameCommand::Select(id) => self.select_tile(id),
            GameCommand::Restart => self.restart(),
            GameCommand::Menu => self.return_to_menu(),
            GameCommand::TogglePause => self.toggle_pause(),
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        let config = self.grid.config();

        out.status = self.status;
        out.mode = self.mode;
        out.tiles.clear();
        out.tiles.extend_from_slice(self.grid.tiles());
        out.score = self.score;
        out.target = self.target;
        out.selected_ids.clear();
        out.selected_ids.extend_from_slice(&self.selected);
        out.selection_sum = self.selection_sum();
        out.time_left = self.time_left;
        out.time_limit = config.time_limit_secs;
        out.level = self.level();
        out.paused = self.paused;
        out.clear_pending = self.pending.is_some();
        out.cols = config.cols;
        out.rows = config.rows;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    fn evaluate_selection(&mut self) {
        match self.grid.evaluate(&self.selected, self.target) {
            SelectionOutcome::Success { matched, .. } => self.begin_clear(matched),
            SelectionOutcome::Overshoot { sum } => {
                debug!(sum, target = self.target, "selection overshot");
                self.selected.clear();
                self.events.push(SessionEvent::Overshoot { sum });
            }
            SelectionOutcome::Unmatched { .. } => {}
        }
    }

    fn begin_clear(&mut self, matched: Vec<TileId>) {
        let level = self.level();
        let points = clear_points(matched.len(), level);
        self.score = self.score.saturating_add(points);
        self.grid.mark_removing(&matched);

        info!(
            matched = matched.len(),
            points,
            level,
            score = self.score,
            "selection cleared"
        );
        self.events.push(SessionEvent::Cleared {
            matched: matched.len(),
            points,
            big: is_big_clear(matched.len()),
        });

        let settle_ms = self.grid.config().settle_delay_ms;
        self.pending = Some(PendingClear {
            matched,
            remaining_ms: settle_ms,
        });
        if settle_ms == 0 {
            self.finish_clear();
        }
    }

    fn finish_clear(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        self.grid.resolve_clear(&pending.matched);
        self.selected.clear();
        self.target = self.grid.generate_target();

        if self.mode.injects_on_clear() {
            self.inject_row();
        }

        while self.status == GameStatus::Playing && self.pending.is_none() {
            let Some(id) = self.deferred_selects.pop_front() else {
                break;
            };
            self.select_tile(id);
        }
    }

    fn inject_row(&mut self) -> InjectOutcome {
        let outcome = self.grid.inject_row();
        match outcome {
            InjectOutcome::Injected => {
                self.events.push(SessionEvent::RowInjected);
                if !self.selected.is_empty() {
                    self.evaluate_selection();
                }
            }
            InjectOutcome::Overflow => self.game_over(),
        }
        outcome
    }

    fn advance_countdown(&mut self, elapsed_ms: u32) -> bool {
        let mut changed = false;
        self.countdown_ms = self.countdown_ms.saturating_add(elapsed_ms);

        while self.countdown_ms >= COUNTDOWN_STEP_MS
            && self.status == GameStatus::Playing
            && self.pending.is_none()
        {
            self.countdown_ms -= COUNTDOWN_STEP_MS;
            self.time_left = self.time_left.saturating_sub(1);
            changed = true;

            if self.time_left == 0 {
                match self.inject_row() {
                    InjectOutcome::Injected => {
                        self.time_left = self.grid.config().time_limit_secs;
                    }
                    InjectOutcome::Overflow => break,
                }
            }
        }
        changed
    }

    fn game_over(&mut self) {
        self.status = GameStatus::GameOver;
        self.countdown_ms = 0;
        self.paused = false;
        self.deferred_selects.clear();
        self.deferred_ms = 0;

        info!(
            score = self.score,
            level = self.level(),
            mode = self.mode.as_str(),
            "game over"
        );
        self.events.push(SessionEvent::GameOver { score: self.score });
    }
}
