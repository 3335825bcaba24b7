//! Player versus hazard hit tests.

use crate::config::{BirdRule, GameConfig};
use crate::obstacle::{Bird, BirdTier, Obstacle};
use crate::player::Player;

/// Any part of any obstacle overlapping the player's hitbox.
pub fn hits_obstacle(player: &Player, obstacles: &[Obstacle], cfg: &GameConfig) -> bool {
    let hitbox = player.hitbox(cfg);
    obstacles
        .iter()
        .flat_map(|o| o.parts.iter())
        .any(|part| hitbox.overlaps(&part.inset_uniform(cfg.hazard_inset)))
}

pub fn hits_bird(player: &Player, bird: &Bird, cfg: &GameConfig) -> bool {
    let hitbox = player.hitbox(cfg);
    if !hitbox.overlaps(&bird.rect.inset_uniform(cfg.hazard_inset)) {
        return false;
    }
    match cfg.bird_rule {
        BirdRule::Overlap => true,
        BirdRule::Posture => match bird.tier {
            BirdTier::High => !player.ducking,
            BirdTier::Low => !player.jumping,
        },
    }
}

/// True when the player touches anything dangerous this step.
pub fn detect(player: &Player, obstacles: &[Obstacle], birds: &[Bird], cfg: &GameConfig) -> bool {
    hits_obstacle(player, obstacles, cfg) || birds.iter().any(|b| hits_bird(player, b, cfg))
}
