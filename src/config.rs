//! World constants, tuning knobs and command-line flags.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

/// How a bird overlap turns into a collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BirdRule {
    /// A high bird only hits a player who is not ducking, a low bird only
    /// hits a player who is not airborne.
    #[default]
    Posture,
    /// Any overlap is a hit.
    Overlap,
}

/// Every number the simulation uses. All coordinates are world pixels with
/// the origin at the top-left of the field and y growing downward.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub field_width: f64,
    pub field_height: f64,
    /// Where feet rest; obstacles stand on it.
    pub ground_line: f64,

    pub player_x: f64,
    pub player_width: f64,
    pub player_height: f64,
    pub gravity: f64,
    pub jump_velocity: f64,
    pub leg_period: u32,

    /// Hitbox insets for the standing posture: (horizontal, top, bottom).
    pub player_inset: (f64, f64, f64),
    /// Extra top inset while ducking.
    pub duck_drop: f64,
    pub hazard_inset: f64,

    pub initial_speed: f64,
    pub bird_speed_bonus: f64,
    pub score_divisor: u64,
    pub speed_step_points: u64,
    pub speed_increment: f64,

    pub obstacle_chance: f64,
    pub block_width: f64,
    pub block_spacing: f64,
    pub block_min_height: f64,
    pub block_height_spread: f64,
    pub triple_center_bonus: f64,

    pub bird_width: f64,
    pub bird_height: f64,
    pub bird_high_y: f64,
    pub bird_low_y: f64,

    pub bird_rule: BirdRule,
    pub spawn_interval: Duration,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 200.0,
            ground_line: 200.0,

            player_x: 50.0,
            player_width: 20.0,
            player_height: 40.0,
            gravity: 0.7,
            jump_velocity: -12.0,
            leg_period: 40,

            player_inset: (3.0, 2.0, 1.0),
            duck_drop: 20.0,
            hazard_inset: 1.0,

            initial_speed: 5.0,
            bird_speed_bonus: 1.0,
            score_divisor: 10,
            speed_step_points: 40,
            speed_increment: 1.0,

            obstacle_chance: 0.7,
            block_width: 16.0,
            block_spacing: 20.0,
            block_min_height: 20.0,
            block_height_spread: 15.0,
            triple_center_bonus: 10.0,

            bird_width: 24.0,
            bird_height: 12.0,
            bird_high_y: 155.0,
            bird_low_y: 186.0,

            bird_rule: BirdRule::Posture,
            spawn_interval: Duration::from_millis(1500),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Top edge of a standing player.
    pub fn player_ground_y(&self) -> f64 {
        self.ground_line - self.player_height
    }
}

#[derive(Debug, Parser)]
#[command(name = "runner-tui", version, about = "Jump the hurdles, duck the birds")]
pub struct Cli {
    /// Seed for obstacle generation (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Whether bird hits depend on posture or on overlap alone
    #[arg(long, value_enum, default_value_t = BirdRule::Posture)]
    pub bird_rule: BirdRule,

    /// Milliseconds between spawn ticks
    #[arg(long, default_value_t = 1500)]
    pub spawn_interval_ms: u64,

    /// Simulation and render rate
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(10..=240))]
    pub fps: u32,

    /// Disable sound
    #[arg(long)]
    pub mute: bool,

    /// Write logs to this file (the terminal is used for drawing)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            bird_rule: self.bird_rule,
            spawn_interval: Duration::from_millis(self.spawn_interval_ms.max(1)),
            seed: self.seed,
            ..GameConfig::default()
        }
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standing_player_rests_on_ground_line() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.player_ground_y(), 160.0);
        assert_eq!(cfg.player_ground_y() + cfg.player_height, cfg.ground_line);
    }

    #[test]
    fn cli_defaults_match_game_defaults() {
        let cli = Cli::parse_from(["runner-tui"]);
        assert_eq!(cli.game_config(), GameConfig::default());
        assert!(!cli.mute);
    }

    #[test]
    fn cli_flags_reach_config() {
        let cli = Cli::parse_from([
            "runner-tui",
            "--seed",
            "7",
            "--bird-rule",
            "overlap",
            "--spawn-interval-ms",
            "900",
        ]);
        let cfg = cli.game_config();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.bird_rule, BirdRule::Overlap);
        assert_eq!(cfg.spawn_interval, Duration::from_millis(900));
    }

    #[test]
    fn fps_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["runner-tui", "--fps", "5"]).is_err());
        let cli = Cli::parse_from(["runner-tui", "--fps", "30"]);
        assert_eq!(cli.frame_duration(), Duration::from_secs_f64(1.0 / 30.0));
    }
}
