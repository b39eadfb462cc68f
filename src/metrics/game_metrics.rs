use std::time::{Duration, Instant};

/// Per-session statistics shown next to the board.
///
/// The play clock only runs while a game is running; pauses and the game-over screen do not
/// count towards `elapsed_time`.
pub struct GameMetrics {
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    banked: Duration,
    running_since: Option<Instant>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            banked: Duration::ZERO,
            running_since: Some(Instant::now()),
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.banked
            + self
                .running_since
                .map(|start| start.elapsed())
                .unwrap_or_default();
    }

    pub fn is_clock_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn on_game_start(&mut self) {
        self.banked = Duration::ZERO;
        self.elapsed_time = Duration::ZERO;
        self.running_since = Some(Instant::now());
    }

    pub fn on_pause(&mut self) {
        self.stop_clock();
    }

    pub fn on_resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.stop_clock();
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }

    fn stop_clock(&mut self) {
        if let Some(start) = self.running_since.take() {
            self.banked += start.elapsed();
        }
        self.update();
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
