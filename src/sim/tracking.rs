//! Moving-target behavior: horizontal strafing, jumps and crouches

use rand::Rng;

use super::cursor::Arena;

/// Downward acceleration while airborne (px/s^2, screen coords)
pub const GRAVITY: f32 = 1000.0;
/// Initial vertical velocity of a jump (negative = up on screen)
pub const JUMP_VELOCITY: f32 = -430.0;
/// Chance to crouch on each eligibility check
pub const CROUCH_CHANCE: f32 = 0.38;
/// Chance to jump on each eligibility check
pub const JUMP_CHANCE: f32 = 0.24;
/// Default strafe speed before per-run scaling
pub const BASE_STRAFE_SPEED: f32 = 210.0;

pub const BASE_WIDTH: f32 = 42.0;
pub const BASE_HEIGHT: f32 = 126.0;

/// The tracking map's rectangular target.
///
/// `y` is the rect center; `ground_y` is where that center sits while
/// standing. Crouching halves the height and lifts the center so the feet
/// stay planted.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingTarget {
    pub x: f32,
    pub y: f32,
    pub ground_y: f32,
    pub width: f32,
    pub height: f32,
    pub base_width: f32,
    pub base_height: f32,
    pub vel_x: f32,
    pub jump_vel: f32,
    pub jumping: bool,
    pub strafe_timer: f32,
    pub crouch_timer: f32,
    pub crouch_cooldown: f32,
    pub jump_cooldown: f32,
    pub base_speed: f32,
}

impl MovingTarget {
    /// Spawn at the arena center with randomized initial timers
    pub fn spawn<R: Rng>(rng: &mut R, arena: &Arena, base_speed: f32) -> Self {
        let (cx, cy) = arena.center();
        let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };

        Self {
            x: cx,
            y: cy,
            ground_y: cy,
            width: BASE_WIDTH,
            height: BASE_HEIGHT,
            base_width: BASE_WIDTH,
            base_height: BASE_HEIGHT,
            vel_x: sign * base_speed * 0.7,
            jump_vel: 0.0,
            jumping: false,
            strafe_timer: rng.gen_range(0.22..0.55),
            crouch_timer: 0.0,
            crouch_cooldown: rng.gen_range(1.6..3.2),
            jump_cooldown: rng.gen_range(2.0..4.0),
            base_speed,
        }
    }

    /// Point-in-rectangle hit test against the current pose
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let left = self.x - self.width / 2.0;
        let top = self.y - self.height / 2.0;
        x >= left && x <= left + self.width && y >= top && y <= top + self.height
    }

    /// Advance the behavior state machine by one tick
    pub fn update<R: Rng>(&mut self, rng: &mut R, arena: &Arena, dt: f32) {
        self.strafe_timer -= dt;
        self.crouch_cooldown -= dt;
        self.jump_cooldown -= dt;

        // Unpredictable strafing: frequent velocity redraws, continuous motion
        if self.strafe_timer <= 0.0 {
            let mag = rng.gen_range(0.45..1.0) * self.base_speed;
            let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            self.vel_x = sign * mag;
            self.strafe_timer = rng.gen_range(0.16..0.48);
        }
        self.x += self.vel_x * dt;

        // Crouch eligibility only while grounded; the cooldown resets on every
        // check whether or not the crouch fires (fixed expected trigger rate)
        if !self.jumping && self.crouch_timer <= 0.0 && self.crouch_cooldown <= 0.0 {
            if rng.gen::<f32>() < CROUCH_CHANCE {
                self.crouch_timer = rng.gen_range(0.30..0.85);
            }
            self.crouch_cooldown = rng.gen_range(1.5..3.8);
        }

        if self.crouch_timer > 0.0 {
            self.crouch_timer -= dt;
            self.height = self.base_height * 0.5;
        } else {
            self.height = self.base_height;
        }

        // Jumping is independent of crouch; cooldown resets regardless of trigger
        if !self.jumping && self.jump_cooldown <= 0.0 {
            if rng.gen::<f32>() < JUMP_CHANCE {
                self.jumping = true;
                self.jump_vel = JUMP_VELOCITY;
            }
            self.jump_cooldown = rng.gen_range(2.2..4.6);
        }

        if self.jumping {
            self.jump_vel += GRAVITY * dt;
            self.y += self.jump_vel * dt;
            if self.y >= self.ground_y {
                self.y = self.ground_y;
                self.jump_vel = 0.0;
                self.jumping = false;
            }
        } else if self.height < self.base_height {
            // Keep the feet anchored while crouching
            self.y = self.ground_y + self.base_height * 0.25;
        } else {
            self.y = self.ground_y;
        }

        // Elastic reflection at both arena edges
        let half_w = self.width / 2.0;
        if self.x - half_w < 0.0 {
            self.x = half_w;
            self.vel_x = self.vel_x.abs();
        } else if self.x + half_w > arena.width {
            self.x = arena.width - half_w;
            self.vel_x = -self.vel_x.abs();
        }
    }
}
