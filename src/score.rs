use crate::config::GameConfig;

/// Frame counter, displayed score, speed ramp and the process-lifetime best.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBoard {
    frames: u64,
    best: u64,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self { frames: 0, best: 0 }
    }

    pub fn tick(&mut self, cfg: &GameConfig) {
        self.frames += 1;
        self.best = self.best.max(self.score(cfg));
    }

    /// Clears the run; the best score survives.
    pub fn reset(&mut self) {
        self.frames = 0;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn score(&self, cfg: &GameConfig) -> u64 {
        self.frames / cfg.score_divisor.max(1)
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Step function of the score: one increment per `speed_step_points`.
    pub fn speed(&self, cfg: &GameConfig) -> f64 {
        let steps = self.score(cfg) / cfg.speed_step_points.max(1);
        cfg.initial_speed + steps as f64 * cfg.speed_increment
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_scaled_frames() {
        let cfg = GameConfig::default();
        let mut sb = ScoreBoard::new();
        for _ in 0..25 {
            sb.tick(&cfg);
        }
        assert_eq!(sb.frames(), 25);
        assert_eq!(sb.score(&cfg), 2);
    }

    #[test]
    fn speed_steps_every_forty_points() {
        let cfg = GameConfig::default();
        let mut sb = ScoreBoard::new();
        assert_eq!(sb.speed(&cfg), 5.0);

        for _ in 0..399 {
            sb.tick(&cfg);
        }
        assert_eq!(sb.speed(&cfg), 5.0);
        sb.tick(&cfg);
        assert_eq!(sb.speed(&cfg), 6.0);

        for _ in 0..400 {
            sb.tick(&cfg);
        }
        assert_eq!(sb.speed(&cfg), 7.0);
    }

    #[test]
    fn speed_never_decreases() {
        let cfg = GameConfig::default();
        let mut sb = ScoreBoard::new();
        let mut prev = sb.speed(&cfg);
        for _ in 0..5000 {
            sb.tick(&cfg);
            let now = sb.speed(&cfg);
            assert!(now >= prev);
            prev = now;
        }
    }

    #[test]
    fn best_survives_reset() {
        let cfg = GameConfig::default();
        let mut sb = ScoreBoard::new();
        for _ in 0..123 {
            sb.tick(&cfg);
        }
        sb.reset();
        assert_eq!(sb.score(&cfg), 0);
        assert_eq!(sb.speed(&cfg), cfg.initial_speed);
        assert_eq!(sb.best(), 12);

        for _ in 0..50 {
            sb.tick(&cfg);
        }
        assert_eq!(sb.best(), 12);
    }
}
