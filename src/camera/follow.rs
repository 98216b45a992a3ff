use bevy::prelude::*;
use serde::Deserialize;

use super::bounds::{clamp_to_bound, CameraBounds};
use super::look::LookOffset;
use super::smoothing::{level_destination, smooth_damp};
use crate::physics::BoundSide;
use crate::player::LookIntent;

/// How one camera axis tracks its target
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum FollowStrategy {
    /// Critically damped spring toward target + look offset; honors bounds
    #[default]
    SmoothDamp,
    /// Jumps a screen at a time, smoothed between screens
    LevelSystem,
    /// Sits exactly on target + look offset
    DirectFollow,
    /// Axis stays put
    None,
}

impl FollowStrategy {
    /// Picks one strategy from independent switches, SmoothDamp first, then
    /// LevelSystem, then DirectFollow.
    pub fn from_flags(smooth_damp: bool, level_system: bool, direct_follow: bool) -> Self {
        if smooth_damp {
            FollowStrategy::SmoothDamp
        } else if level_system {
            FollowStrategy::LevelSystem
        } else if direct_follow {
            FollowStrategy::DirectFollow
        } else {
            FollowStrategy::None
        }
    }

    /// Whether this strategy adds the look offset to its destination
    pub fn uses_look_offset(self) -> bool {
        matches!(self, FollowStrategy::SmoothDamp | FollowStrategy::DirectFollow)
    }
}

/// Follow camera tuning. Fixed for the camera's lifetime.
#[derive(Component, Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct CameraFollowConfig {
    /// SmoothDamp time per axis, in frames. Scaled by the frame time, so the
    /// defaults catch up with the target almost at once.
    pub damp_time: Vec2,
    /// SmoothDamp time between levels per axis, seconds
    pub level_damp_time: Vec2,
    /// Fraction of the view one level spans (0..=1)
    pub percent_per_level: Vec2,
    /// Where level zero is centered
    pub level_offset: Vec2,
    /// Clamp SmoothDamp axes against bound surfaces
    pub use_bounds: bool,

    pub use_look_offset: bool,
    /// Offset the camera returns to when centering
    pub origin_offset: Vec2,
    /// Full look-ahead distance per axis
    pub look_offset: Vec2,
    pub shift_look_x: bool,
    pub shift_look_y: bool,
    /// Seconds to shift from origin to full look offset
    pub shift_look_time: Vec2,
    /// Seconds a direction must be held before the offset moves
    pub look_delay: Vec2,
    pub center_look_x: bool,
    pub center_look_y: bool,
    /// Seconds without look input before the offset recenters
    pub center_look_time: Vec2,
}

impl Default for CameraFollowConfig {
    fn default() -> Self {
        Self {
            damp_time: Vec2::new(0.05, 0.035),
            level_damp_time: Vec2::new(0.035, 0.035),
            percent_per_level: Vec2::ONE,
            level_offset: Vec2::ZERO,
            use_bounds: true,
            use_look_offset: true,
            origin_offset: Vec2::ZERO,
            look_offset: Vec2::new(5.0, 5.5),
            shift_look_x: true,
            shift_look_y: true,
            shift_look_time: Vec2::new(0.35, 0.35),
            look_delay: Vec2::new(0.0, 1.0),
            center_look_x: true,
            center_look_y: true,
            center_look_time: Vec2::new(3.0, 0.0),
        }
    }
}

/// Follow switches a menu or trigger may change while playing
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FollowSettings {
    pub follow: bool,
    pub follow_x: bool,
    pub follow_y: bool,
    pub strategy_x: FollowStrategy,
    pub strategy_y: FollowStrategy,
}

impl Default for FollowSettings {
    fn default() -> Self {
        Self {
            follow: true,
            follow_x: true,
            follow_y: true,
            strategy_x: FollowStrategy::SmoothDamp,
            strategy_y: FollowStrategy::SmoothDamp,
        }
    }
}

impl FollowSettings {
    pub fn toggle_follow(&mut self) {
        self.follow = !self.follow;
    }

    pub fn toggle_follow_x(&mut self) {
        self.follow_x = !self.follow_x;
    }

    pub fn toggle_follow_y(&mut self) {
        self.follow_y = !self.follow_y;
    }

    pub fn set_strategy_x(&mut self, strategy: FollowStrategy) {
        self.strategy_x = strategy;
    }

    pub fn set_strategy_y(&mut self, strategy: FollowStrategy) {
        self.strategy_y = strategy;
    }

    pub fn damp_x(&mut self) {
        self.strategy_x = FollowStrategy::SmoothDamp;
    }

    pub fn damp_y(&mut self) {
        self.strategy_y = FollowStrategy::SmoothDamp;
    }

    pub fn level_x(&mut self) {
        self.strategy_x = FollowStrategy::LevelSystem;
    }

    pub fn level_y(&mut self) {
        self.strategy_y = FollowStrategy::LevelSystem;
    }

    pub fn damp_xy(&mut self) {
        self.damp_x();
        self.damp_y();
    }

    pub fn level_xy(&mut self) {
        self.level_x();
        self.level_y();
    }
}

/// A camera that follows `target`
#[derive(Component, Debug, Clone, Copy)]
pub struct FollowCamera {
    pub target: Entity,
}

/// The last position this camera wrote
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct FollowState {
    pub last_written: Option<Vec2>,
}

/// Everything one axis needs to pick its next position
#[derive(Debug, Clone, Copy)]
pub struct AxisFollow {
    pub strategy: FollowStrategy,
    pub current: f32,
    pub target: f32,
    pub offset: f32,
    pub camera_size: f32,
    pub percent: f32,
    pub level_offset: f32,
    pub damp_time: f32,
    pub level_damp_time: f32,
    /// Bound to clamp against (SmoothDamp only)
    pub bound: Option<(BoundSide, f32)>,
}

/// Next camera coordinate on one axis.
///
/// Every frame starts the spring from rest, so a step only depends on where the
/// camera and its target are now.
pub fn follow_axis(axis: AxisFollow, dt: f32) -> f32 {
    let mut velocity = 0.0;
    match axis.strategy {
        FollowStrategy::SmoothDamp => {
            let destination = axis.target + axis.offset;
            let smooth_time = axis.damp_time * dt;
            let predicted = smooth_damp(axis.current, destination, &mut velocity, smooth_time, dt);
            clamp_to_bound(predicted, axis.bound, axis.camera_size)
        }
        FollowStrategy::LevelSystem => {
            let destination =
                level_destination(axis.target, axis.camera_size, axis.percent, axis.level_offset);
            smooth_damp(axis.current, destination, &mut velocity, axis.level_damp_time, dt)
        }
        FollowStrategy::DirectFollow => axis.target + axis.offset,
        FollowStrategy::None => axis.current,
    }
}

impl FollowState {
    /// Records `position` and returns whether it differs from the last write
    pub fn should_write(&mut self, position: Vec2) -> bool {
        let changed = self.last_written != Some(position);
        self.last_written = Some(position);
        changed
    }
}

/// Moves every follow camera toward its target
pub fn follow_target(
    targets: Query<(&Transform, Option<&LookIntent>), Without<FollowCamera>>,
    mut cameras: Query<(
        &FollowCamera,
        &FollowSettings,
        &CameraFollowConfig,
        &CameraBounds,
        &Projection,
        &mut LookOffset,
        &mut FollowState,
        &mut Transform,
    )>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (camera, settings, config, bounds, projection, mut look, mut state, mut transform) in
        &mut cameras
    {
        if !settings.follow {
            continue;
        }
        let Ok((target, intent)) = targets.get(camera.target) else {
            continue;
        };
        let Projection::Orthographic(ortho) = projection else {
            continue;
        };

        let camera_size = ortho.area.size() * config.percent_per_level;

        let axes = BVec2::new(
            settings.strategy_x.uses_look_offset(),
            settings.strategy_y.uses_look_offset(),
        );
        look.update(&intent.copied().unwrap_or_default(), config, axes, dt);

        let current = transform.translation.truncate();
        let mut next = current;

        if settings.follow_x {
            next.x = follow_axis(
                AxisFollow {
                    strategy: settings.strategy_x,
                    current: current.x,
                    target: target.translation.x,
                    offset: look.offset.x,
                    camera_size: camera_size.x,
                    percent: config.percent_per_level.x,
                    level_offset: config.level_offset.x,
                    damp_time: config.damp_time.x,
                    level_damp_time: config.level_damp_time.x,
                    bound: config.use_bounds.then(|| bounds.horizontal()).flatten(),
                },
                dt,
            );
        }

        if settings.follow_y {
            next.y = follow_axis(
                AxisFollow {
                    strategy: settings.strategy_y,
                    current: current.y,
                    target: target.translation.y,
                    offset: look.offset.y,
                    camera_size: camera_size.y,
                    percent: config.percent_per_level.y,
                    level_offset: config.level_offset.y,
                    damp_time: config.damp_time.y,
                    level_damp_time: config.level_damp_time.y,
                    bound: config.use_bounds.then(|| bounds.vertical()).flatten(),
                },
                dt,
            );
        }

        if state.should_write(next) {
            transform.translation.x = next.x;
            transform.translation.y = next.y;
        }
    }
}
