use bevy::prelude::*;

use super::follow::CameraFollowConfig;
use crate::player::LookIntent;

/// Look-ahead offset added to the follow target, with its hold and centering timers
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct LookOffset {
    pub offset: Vec2,
    up_timer: f32,
    down_timer: f32,
    left_timer: f32,
    right_timer: f32,
    center_timer: Vec2,
}

/// Per-axis inputs to the look offset update
struct AxisLook {
    negative: bool,
    positive: bool,
    magnitude: f32,
    delay: f32,
    shift: bool,
    shift_time: f32,
    center: bool,
    center_time: f32,
    origin: f32,
}

impl AxisLook {
    /// How far the offset moves this frame, or `None` to snap
    fn step(&self, dt: f32) -> Option<f32> {
        (self.shift && self.shift_time > 0.0).then(|| self.magnitude * dt / self.shift_time)
    }
}

fn update_axis(
    offset: &mut f32,
    negative_timer: &mut f32,
    positive_timer: &mut f32,
    center_timer: &mut f32,
    look: AxisLook,
    dt: f32,
) {
    let step = look.step(dt);

    if look.negative {
        if *negative_timer < look.delay {
            *negative_timer += dt;
        } else {
            *offset = match step {
                Some(step) => (*offset - step).max(-look.magnitude),
                None => -look.magnitude,
            };
        }
    } else {
        *negative_timer = 0.0;
    }

    if look.positive {
        if *positive_timer < look.delay {
            *positive_timer += dt;
        } else {
            *offset = match step {
                Some(step) => (*offset + step).min(look.magnitude),
                None => look.magnitude,
            };
        }
    } else {
        *positive_timer = 0.0;
    }

    if !look.center {
        return;
    }

    if look.negative || look.positive {
        *center_timer = 0.0;
    } else if *center_timer < look.center_time {
        *center_timer += dt;
    } else {
        *offset = match step {
            Some(step) => move_toward(*offset, look.origin, step),
            None => look.origin,
        };
    }
}

fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

impl LookOffset {
    pub fn new(origin: Vec2) -> Self {
        Self {
            offset: origin,
            ..default()
        }
    }

    /// Advances the offset for the axes flagged in `axes`
    pub fn update(&mut self, look: &LookIntent, config: &CameraFollowConfig, axes: BVec2, dt: f32) {
        if !config.use_look_offset {
            self.offset = config.origin_offset;
            return;
        }

        if axes.x {
            update_axis(
                &mut self.offset.x,
                &mut self.left_timer,
                &mut self.right_timer,
                &mut self.center_timer.x,
                AxisLook {
                    negative: look.left,
                    positive: look.right,
                    magnitude: config.look_offset.x,
                    delay: config.look_delay.x,
                    shift: config.shift_look_x,
                    shift_time: config.shift_look_time.x,
                    center: config.center_look_x,
                    center_time: config.center_look_time.x,
                    origin: config.origin_offset.x,
                },
                dt,
            );
        }

        if axes.y {
            update_axis(
                &mut self.offset.y,
                &mut self.down_timer,
                &mut self.up_timer,
                &mut self.center_timer.y,
                AxisLook {
                    negative: look.down,
                    positive: look.up,
                    magnitude: config.look_offset.y,
                    delay: config.look_delay.y,
                    shift: config.shift_look_y,
                    shift_time: config.shift_look_time.y,
                    center: config.center_look_y,
                    center_time: config.center_look_time.y,
                    origin: config.origin_offset.y,
                },
                dt,
            );
        }
    }

    /// Puts the offset back to its origin and clears every timer
    pub fn reset(&mut self, origin: Vec2) {
        *self = Self::new(origin);
    }
}
