use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::sync::watch;
use tracing::{debug, info, trace};

use super::{
    config::GameConfig,
    direction::Direction,
    error::ConfigResult,
    state::{EndReason, GameState, GameStatus, Position, Snake, Snapshot},
};

/// Outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickResult {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Set when this tick ended the game
    pub ended: Option<EndReason>,
}

/// The game engine: sole owner of the game state.
///
/// State only changes through [`reset`](Self::reset), [`tick`](Self::tick),
/// [`set_direction`](Self::set_direction) and [`toggle_pause`](Self::toggle_pause); each of them
/// publishes a fresh [`Snapshot`] to every subscriber.
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    rng: StdRng,
    snapshots: watch::Sender<Snapshot>,
}

impl GameEngine {
    /// Create an engine and start the first game
    pub fn new(config: GameConfig) -> ConfigResult<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = Self::initial_state(&config, &mut rng);
        let (snapshots, _) = watch::channel(state.snapshot());

        Ok(Self {
            config,
            state,
            rng,
            snapshots,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Receiver that always holds the snapshot published after the latest mutation
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    /// Start a new game. Safe to call in any status.
    pub fn reset(&mut self) {
        self.state = Self::initial_state(&self.config, &mut self.rng);
        info!(
            grid_size = self.config.grid_size,
            food = ?self.state.food,
            "game reset"
        );
        self.publish();
    }

    /// Change heading. Reversals and changes after game over are ignored.
    ///
    /// Returns whether the heading was accepted. Changes made between two ticks coalesce: only
    /// the heading in place when the next tick runs is used. A turn that reverses either the
    /// current heading or the last move is rejected, so two quick turns cannot fold the head back
    /// onto the neck.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.state.is_game_over() {
            return false;
        }
        if self.state.direction.is_opposite(direction)
            || self.state.last_moved.is_opposite(direction)
        {
            trace!(
                current = ?self.state.direction,
                moving = ?self.state.last_moved,
                requested = ?direction,
                "reversal ignored"
            );
            return false;
        }

        if self.state.direction != direction {
            self.state.direction = direction;
            self.publish();
        }
        true
    }

    /// Flip between running and paused. No effect once the game is over.
    pub fn toggle_pause(&mut self) -> GameStatus {
        self.state.status = match self.state.status {
            GameStatus::Running => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Running,
            over @ GameStatus::GameOver(_) => return over,
        };
        debug!(status = ?self.state.status, "pause toggled");
        self.publish();
        self.state.status
    }

    /// Advance the game by one step. No-op while paused or over.
    pub fn tick(&mut self) -> TickResult {
        if self.state.status != GameStatus::Running {
            return TickResult::default();
        }

        let new_head = self
            .state
            .snake
            .head()
            .moved_in_direction(self.state.direction);

        if let Some(reason) = self.check_collision(new_head) {
            self.end_game(reason);
            return TickResult {
                ate_food: false,
                ended: Some(reason),
            };
        }

        let ate_food = new_head == self.state.food;
        self.state.snake.advance(new_head, ate_food);
        self.state.last_moved = self.state.direction;
        self.state.steps += 1;

        let mut ended = None;
        if ate_food {
            self.state.score += self.config.food_score;
            debug!(score = self.state.score, length = self.state.snake.len(), "food eaten");

            if self.state.snake.len() >= self.config.cell_count() {
                self.end_game(EndReason::BoardFilled);
                ended = Some(EndReason::BoardFilled);
            } else {
                self.state.food =
                    Self::spawn_food(&mut self.rng, &self.state.snake, self.config.grid_size);
                debug!(food = ?self.state.food, "food placed");
            }
        }

        if ended.is_none() {
            self.publish();
        }

        TickResult { ate_food, ended }
    }

    fn initial_state(config: &GameConfig, rng: &mut StdRng) -> GameState {
        let length = config.initial_snake_length;
        // Head at the right end of row 0, e.g. [(2,0), (1,0), (0,0)] for length 3
        let snake = Snake::new(
            Position::new(length as i32 - 1, 0),
            Direction::Right,
            length,
        );
        let food = Self::spawn_food(rng, &snake, config.grid_size);

        GameState::new(snake, food, Direction::Right, config.grid_size)
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, pos: Position) -> Option<EndReason> {
        if !self.state.is_in_bounds(pos) {
            return Some(EndReason::Wall);
        }

        // The tail still occupies its cell until the move completes
        if self.state.snake.contains(pos) {
            return Some(EndReason::SelfCollision);
        }

        None
    }

    /// Sample uniformly random cells until one is off the snake.
    ///
    /// Callers guarantee at least one free cell exists.
    fn spawn_food(rng: &mut StdRng, snake: &Snake, grid_size: usize) -> Position {
        debug_assert!(snake.len() < grid_size * grid_size);

        loop {
            let x = rng.gen_range(0..grid_size) as i32;
            let y = rng.gen_range(0..grid_size) as i32;
            let pos = Position::new(x, y);

            if !snake.contains(pos) {
                return pos;
            }
        }
    }

    fn end_game(&mut self, reason: EndReason) {
        self.state.status = GameStatus::GameOver(reason);
        info!(
            ?reason,
            score = self.state.score,
            length = self.state.snake.len(),
            steps = self.state.steps,
            "game over"
        );
        self.publish();
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.snapshot());
    }
}
