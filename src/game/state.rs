use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A cell on the game grid; `0 <= x, y < grid_size` for cells inside the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake's body, head at index 0 and tail at the last index.
///
/// Segments are pairwise distinct and there is always at least one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Position>,
}

impl Snake {
    /// Create a straight snake whose head is at `head`, facing `facing`, with the rest of the
    /// body trailing behind it.
    pub fn new(head: Position, facing: Direction, length: usize) -> Self {
        let (dx, dy) = facing.delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();

        Self { body }
    }

    /// Build a snake from explicit segments, head first. Returns `None` for an empty body or
    /// one that overlaps itself.
    pub fn from_segments(body: Vec<Position>) -> Option<Self> {
        if body.is_empty() {
            return None;
        }
        let distinct = body
            .iter()
            .enumerate()
            .all(|(i, seg)| !body[i + 1..].contains(seg));

        distinct.then_some(Self { body })
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn segments(&self) -> &[Position] {
        &self.body
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Push a new head; the tail is dropped unless the snake grows this step.
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false for a well-formed snake
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Head left the grid
    Wall,
    /// Head ran into the snake's own body
    SelfCollision,
    /// The snake covers every cell, so there is nowhere left to put food
    BoardFilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Running,
    Paused,
    GameOver(EndReason),
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    /// Heading the next tick will use
    pub direction: Direction,
    /// Heading of the last completed move; reversals are judged against this
    pub last_moved: Direction,
    pub status: GameStatus,
    pub grid_size: usize,
    pub score: u32,
    pub steps: u32,
}

impl GameState {
    pub fn new(snake: Snake, food: Position, direction: Direction, grid_size: usize) -> Self {
        Self {
            snake,
            food,
            direction,
            last_moved: direction,
            status: GameStatus::Running,
            grid_size,
            score: 0,
            steps: 0,
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.status, GameStatus::GameOver(_))
    }

    pub fn is_paused(&self) -> bool {
        self.status == GameStatus::Paused
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        let size = self.grid_size as i32;
        pos.x >= 0 && pos.x < size && pos.y >= 0 && pos.y < size
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            snake: self.snake.segments().to_vec(),
            food: self.food,
            direction: self.direction,
            status: self.status,
            grid_size: self.grid_size,
            score: self.score,
            steps: self.steps,
        }
    }
}

/// Read-only copy of the state handed to renderers and other observers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub snake: Vec<Position>,
    pub food: Position,
    pub direction: Direction,
    pub status: GameStatus,
    pub grid_size: usize,
    pub score: u32,
    pub steps: u32,
}

impl Snapshot {
    pub fn game_over(&self) -> bool {
        matches!(self.status, GameStatus::GameOver(_))
    }

    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_in_direction(Direction::Left), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(2, 0), Direction::Right, 3);
        assert_eq!(
            snake.segments(),
            &[Position::new(2, 0), Position::new(1, 0), Position::new(0, 0)]
        );
        assert_eq!(snake.head(), Position::new(2, 0));
        assert_eq!(snake.tail(), Position::new(0, 0));
    }

    #[test]
    fn test_snake_from_segments_rejects_bad_bodies() {
        assert!(Snake::from_segments(vec![]).is_none());
        assert!(Snake::from_segments(vec![Position::new(1, 1), Position::new(1, 1)]).is_none());

        let snake = Snake::from_segments(vec![Position::new(1, 1), Position::new(1, 2)]).unwrap();
        assert_eq!(snake.len(), 2);
    }

    #[test]
    fn test_snake_advance() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        snake.advance(Position::new(6, 5), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.tail(), Position::new(4, 5));

        snake.advance(Position::new(7, 5), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(7, 5));
        assert_eq!(snake.tail(), Position::new(4, 5));
    }

    #[test]
    fn test_bounds_checking() {
        let state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Position::new(10, 10),
            Direction::Right,
            20,
        );

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(19, 19)));
        assert!(!state.is_in_bounds(Position::new(-1, 0)));
        assert!(!state.is_in_bounds(Position::new(20, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 20)));
        assert!(!state.is_in_bounds(Position::new(0, -1)));
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = GameState::new(
            Snake::new(Position::new(2, 0), Direction::Right, 3),
            Position::new(7, 7),
            Direction::Right,
            10,
        );
        state.status = GameStatus::GameOver(EndReason::Wall);

        let snapshot = state.snapshot();
        assert_eq!(snapshot.snake, state.snake.segments());
        assert_eq!(snapshot.food, Position::new(7, 7));
        assert_eq!(snapshot.head(), Some(Position::new(2, 0)));
        assert!(snapshot.game_over());
    }
}
