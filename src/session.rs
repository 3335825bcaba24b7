//! One play-through: owned state plus the per-frame stepping function.

use tracing::{debug, info};

use crate::collision;
use crate::config::GameConfig;
use crate::input::InputSnapshot;
use crate::obstacle::{Bird, Obstacle, advance_birds, advance_obstacles};
use crate::player::Player;
use crate::score::ScoreBoard;
use crate::spawner::{Spawn, Spawner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    GameOver,
}

/// Sound cue requested by a step. Playing it is the caller's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Jump,
    Duck,
    GameOver,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct StepOutcome {
    pub cues: Vec<Cue>,
    pub game_over: bool,
}

pub struct Session {
    cfg: GameConfig,
    player: Player,
    obstacles: Vec<Obstacle>,
    birds: Vec<Bird>,
    score: ScoreBoard,
    spawner: Spawner,
    state: SessionState,
}

impl Session {
    pub fn new(cfg: GameConfig) -> Self {
        let spawner = Spawner::from_seed(cfg.seed);
        info!(seed = ?cfg.seed, bird_rule = ?cfg.bird_rule, "session started");
        Self {
            player: Player::new(&cfg),
            obstacles: Vec::new(),
            birds: Vec::new(),
            score: ScoreBoard::new(),
            spawner,
            state: SessionState::Running,
            cfg,
        }
    }

    /// Advance one frame. Does nothing once the game is over.
    pub fn step(&mut self, input: &InputSnapshot) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        if self.state == SessionState::GameOver {
            return outcome;
        }
        let cfg = &self.cfg;

        if input.jump && self.player.start_jump(cfg) {
            outcome.cues.push(Cue::Jump);
        }
        if self.player.set_ducking(input.duck) {
            outcome.cues.push(Cue::Duck);
        }

        self.player.integrate(cfg);
        self.player.advance_animation(cfg.leg_period);

        let speed = self.score.speed(cfg);
        advance_obstacles(&mut self.obstacles, speed);
        advance_birds(&mut self.birds, speed + cfg.bird_speed_bonus);
        self.score.tick(cfg);

        if collision::detect(&self.player, &self.obstacles, &self.birds, cfg) {
            self.state = SessionState::GameOver;
            outcome.game_over = true;
            outcome.cues.push(Cue::GameOver);
            info!(
                score = self.score.score(cfg),
                best = self.score.best(),
                "game over"
            );
        }
        outcome
    }

    /// Fixed-period spawn hook, driven by a wall-clock timer.
    pub fn spawn_tick(&mut self) {
        if self.state == SessionState::GameOver {
            return;
        }
        match self.spawner.next(&self.cfg) {
            Spawn::Obstacle(o) => {
                debug!(parts = o.parts.len(), "spawned obstacle");
                self.push_obstacle(o);
            }
            Spawn::Bird(b) => {
                debug!(tier = ?b.tier, "spawned bird");
                self.push_bird(b);
            }
        }
    }

    pub fn push_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn push_bird(&mut self, bird: Bird) {
        self.birds.push(bird);
    }

    /// Back to a fresh run. Keeps the best score and the random stream.
    ///
    /// Only a finished run can be restarted; returns whether it was.
    pub fn restart(&mut self) -> bool {
        if self.state != SessionState::GameOver {
            return false;
        }
        self.player = Player::new(&self.cfg);
        self.obstacles.clear();
        self.birds.clear();
        self.score.reset();
        self.state = SessionState::Running;
        info!(best = self.score.best(), "session restarted");
        true
    }

    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn birds(&self) -> &[Bird] {
        &self.birds
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn score(&self) -> u64 {
        self.score.score(&self.cfg)
    }

    pub fn best(&self) -> u64 {
        self.score.best()
    }

    pub fn frames(&self) -> u64 {
        self.score.frames()
    }

    pub fn speed(&self) -> f64 {
        self.score.speed(&self.cfg)
    }
}
