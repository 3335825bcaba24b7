use std::f64::consts::TAU;

use crate::config::GameConfig;
use crate::geometry::Rect;

/// The runner. Horizontal position never changes; the world scrolls past.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub vy: f64,
    pub jumping: bool,
    pub ducking: bool,
    pub leg_frame: u32,
}

impl Player {
    pub fn new(cfg: &GameConfig) -> Self {
        Self {
            x: cfg.player_x,
            y: cfg.player_ground_y(),
            width: cfg.player_width,
            height: cfg.player_height,
            vy: 0.0,
            jumping: false,
            ducking: false,
            leg_frame: 0,
        }
    }

    /// Launch a jump. Returns false (and changes nothing) when already airborne.
    pub fn start_jump(&mut self, cfg: &GameConfig) -> bool {
        if self.jumping {
            return false;
        }
        self.jumping = true;
        self.vy = cfg.jump_velocity;
        true
    }

    /// Returns true only on the transition into ducking.
    pub fn set_ducking(&mut self, duck: bool) -> bool {
        let started = duck && !self.ducking;
        self.ducking = duck;
        started
    }

    /// One Euler step under gravity, clamped to the ground on touchdown.
    pub fn integrate(&mut self, cfg: &GameConfig) {
        if !self.jumping {
            return;
        }
        self.vy += cfg.gravity;
        self.y += self.vy;

        let ground = cfg.player_ground_y();
        if self.y >= ground {
            self.y = ground;
            self.vy = 0.0;
            self.jumping = false;
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Collision box. Ducking lowers the top edge.
    pub fn hitbox(&self, cfg: &GameConfig) -> Rect {
        let (side, top, bottom) = cfg.player_inset;
        let top = if self.ducking { top + cfg.duck_drop } else { top };
        self.bounds().inset(side, top, side, bottom)
    }

    pub fn advance_animation(&mut self, period: u32) {
        self.leg_frame = (self.leg_frame + 1) % period.max(1);
    }

    /// Leg swing in radians for the current animation phase.
    pub fn stride(&self, period: u32) -> f64 {
        (self.leg_frame as f64 / period.max(1) as f64 * TAU).sin() * 0.9
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cfg() -> GameConfig {
        GameConfig::default()
    }

    #[test]
    fn new_player_stands_on_ground() {
        let cfg = cfg();
        let p = Player::new(&cfg);
        assert_eq!(p.y, 160.0);
        assert!(!p.jumping);
        assert!(!p.ducking);
        assert_eq!(p.vy, 0.0);
    }

    #[test]
    fn jump_is_ignored_mid_air() {
        let cfg = cfg();
        let mut p = Player::new(&cfg);
        assert!(p.start_jump(&cfg));
        p.integrate(&cfg);
        p.integrate(&cfg);
        let before = p.clone();

        assert!(!p.start_jump(&cfg));
        assert_eq!(p, before);
    }

    #[test]
    fn velocity_grows_by_gravity_while_airborne() {
        let cfg = cfg();
        let mut p = Player::new(&cfg);
        p.start_jump(&cfg);
        let mut prev = p.vy;
        loop {
            p.integrate(&cfg);
            if !p.jumping {
                break;
            }
            assert!((p.vy - prev - cfg.gravity).abs() < 1e-9);
            assert!(p.vy > prev);
            prev = p.vy;
        }
    }

    #[test]
    fn grounded_player_does_not_move() {
        let cfg = cfg();
        let mut p = Player::new(&cfg);
        p.integrate(&cfg);
        assert_eq!(p, Player::new(&cfg));
    }

    #[test]
    fn duck_reports_only_the_start() {
        let cfg = cfg();
        let mut p = Player::new(&cfg);
        assert!(p.set_ducking(true));
        assert!(!p.set_ducking(true));
        assert!(!p.set_ducking(false));
        assert!(p.set_ducking(true));
    }

    #[test]
    fn ducking_lowers_hitbox_top() {
        let cfg = cfg();
        let mut p = Player::new(&cfg);
        let standing = p.hitbox(&cfg);
        p.set_ducking(true);
        let ducking = p.hitbox(&cfg);

        assert_eq!(standing.y + cfg.duck_drop, ducking.y);
        assert_eq!(standing.bottom(), ducking.bottom());
        assert!(ducking.h < standing.h);
        assert_eq!(standing.x, ducking.x);
    }

    #[test]
    fn animation_wraps() {
        let mut p = Player::new(&cfg());
        for _ in 0..40 {
            p.advance_animation(40);
        }
        assert_eq!(p.leg_frame, 0);
        assert_eq!(p.stride(40), 0.0);
    }

    proptest! {
        #[test]
        fn touchdown_clamps_for_any_jump_velocity(v in -40.0..-0.1f64, g in 0.1..2.0f64) {
            let cfg = GameConfig { jump_velocity: v, gravity: g, ..GameConfig::default() };
            let mut p = Player::new(&cfg);
            p.start_jump(&cfg);

            let mut steps = 0;
            while p.jumping {
                p.integrate(&cfg);
                steps += 1;
                prop_assert!(steps < 10_000);
                prop_assert!(p.y <= cfg.player_ground_y());
            }
            prop_assert_eq!(p.y, cfg.player_ground_y());
            prop_assert_eq!(p.vy, 0.0);
        }
    }
}
