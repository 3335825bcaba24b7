//! Random obstacle and bird generation for each spawn tick.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;
use crate::geometry::Rect;
use crate::obstacle::{Bird, BirdTier, Obstacle};

#[derive(Debug, Clone, PartialEq)]
pub enum Spawn {
    Obstacle(Obstacle),
    Bird(Bird),
}

/// Part arrangement of a ground obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Single,
    Double,
    /// Three parts with a taller one in the middle.
    Triple,
}

impl Layout {
    /// Weighted pick: single 50%, double 30%, triple 20%.
    fn pick(roll: f64) -> Layout {
        if roll < 0.5 {
            Layout::Single
        } else if roll < 0.8 {
            Layout::Double
        } else {
            Layout::Triple
        }
    }
}

pub struct Spawner<R: Rng = StdRng> {
    rng: R,
}

impl Spawner<StdRng> {
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl<R: Rng> Spawner<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn next(&mut self, cfg: &GameConfig) -> Spawn {
        if self.rng.r#gen::<f64>() < cfg.obstacle_chance {
            let layout = Layout::pick(self.rng.r#gen::<f64>());
            Spawn::Obstacle(self.obstacle(cfg, layout))
        } else {
            Spawn::Bird(self.bird(cfg))
        }
    }

    pub fn obstacle(&mut self, cfg: &GameConfig, layout: Layout) -> Obstacle {
        let height = cfg.block_min_height + self.height_jitter(cfg);
        let base_x = cfg.field_width;
        let part = |x: f64, h: f64| Rect::new(x, cfg.ground_line - h, cfg.block_width, h);

        let parts = match layout {
            Layout::Single => vec![part(base_x, height)],
            Layout::Double => vec![
                part(base_x, height),
                part(base_x + cfg.block_spacing, height),
            ],
            Layout::Triple => vec![
                part(base_x - cfg.block_spacing, height),
                part(base_x, height + cfg.triple_center_bonus),
                part(base_x + cfg.block_spacing, height),
            ],
        };
        Obstacle::new(parts)
    }

    pub fn bird(&mut self, cfg: &GameConfig) -> Bird {
        let tier = if self.rng.gen_bool(0.5) {
            BirdTier::High
        } else {
            BirdTier::Low
        };
        let y = match tier {
            BirdTier::High => cfg.bird_high_y,
            BirdTier::Low => cfg.bird_low_y,
        };
        Bird {
            rect: Rect::new(cfg.field_width, y, cfg.bird_width, cfg.bird_height),
            tier,
            wing_up: self.rng.gen_bool(0.5),
        }
    }

    fn height_jitter(&mut self, cfg: &GameConfig) -> f64 {
        if cfg.block_height_spread > 0.0 {
            self.rng.gen_range(0.0..cfg.block_height_spread)
        } else {
            0.0
        }
    }
}
