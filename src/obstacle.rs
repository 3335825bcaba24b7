//! Ground obstacles and birds, and the per-step scroll that moves and
//! prunes them.

use crate::geometry::Rect;

/// A ground barrier made of 1-3 parts that scroll together.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub parts: Vec<Rect>,
}

impl Obstacle {
    pub fn new(parts: Vec<Rect>) -> Self {
        Self { parts }
    }

    /// Right edge of the rightmost part.
    pub fn right(&self) -> f64 {
        self.parts
            .iter()
            .map(Rect::right)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirdTier {
    /// Head height: duck under it.
    High,
    /// Shin height: jump over it.
    Low,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub rect: Rect,
    pub tier: BirdTier,
    pub wing_up: bool,
}

/// Scroll every obstacle left by `speed`, then drop those fully past x = 0.
pub fn advance_obstacles(obstacles: &mut Vec<Obstacle>, speed: f64) {
    for obstacle in obstacles.iter_mut() {
        for part in &mut obstacle.parts {
            part.x -= speed;
        }
    }
    obstacles.retain(|o| o.right() > 0.0);
}

/// Same as [`advance_obstacles`] for birds, which also flap each step.
pub fn advance_birds(birds: &mut Vec<Bird>, speed: f64) {
    for bird in birds.iter_mut() {
        bird.rect.x -= speed;
        bird.wing_up = !bird.wing_up;
    }
    birds.retain(|b| b.rect.right() > 0.0);
}
