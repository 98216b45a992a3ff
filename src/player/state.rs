use bevy::prelude::*;
use serde::Deserialize;

use super::ledge::LedgeSide;

/// Marker component for the player entity (also used as input context)
#[derive(Component, Default)]
pub struct Player;

/// Player movement configuration.
///
/// Read-only during play. The toggles a menu may flip at runtime live in
/// [`Abilities`].
#[derive(Component, Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Width and height of the player's box
    pub size: Vec2,
    /// Gap kept between the player's feet and the ground
    pub ground_range: f32,
    /// Gap kept between the player's side and a wall it slides on
    pub wall_slide_range: f32,

    /// Size of the grab zone placed on ground corners
    pub ledge_size: Vec2,
    /// Size of each side ledge sensor
    pub ledge_sensor_size: Vec2,
    /// Sensor center relative to the player center (x is mirrored for the left sensor)
    pub ledge_sensor_offset: Vec2,

    /// Gravity applied when airborne
    pub gravity: f32,
    /// Fastest fall speed (negative)
    pub terminal_velocity: f32,
    /// Horizontal deceleration in the air without input
    pub air_drag: f32,
    /// Horizontal deceleration on the ground without input
    pub ground_drag: f32,

    /// Base horizontal speed cap
    pub move_velocity: f32,
    /// Horizontal acceleration when a direction is held
    pub acceleration: f32,
    /// Speed cap while running
    pub run_velocity: f32,
    /// Speed cap while crouching
    pub crouch_velocity: f32,
    /// Deceleration while crouch sliding
    pub crouch_slide_drag: f32,
    /// Zero opposing velocity before accelerating on the ground
    pub sharp_ground_turns: bool,
    /// Zero opposing velocity before accelerating in the air
    pub sharp_air_turns: bool,

    /// Vertical velocity at the instant of a jump
    pub jump_velocity: f32,
    /// Upward velocity a released jump is cut down to
    pub short_jump_velocity: f32,
    /// Vertical velocity at the instant of a double jump
    pub double_jump_velocity: f32,
    /// Upward velocity a released double jump is cut down to
    pub short_double_jump_velocity: f32,

    /// Gravity applied while wall sliding
    pub wall_slide_gravity: f32,
    /// Fastest fall speed while wall sliding (negative)
    pub wall_slide_terminal_velocity: f32,

    /// The crouch button does anything at all
    pub uses_crouch: bool,
    /// Crouching turns into a slide instead of a slow walk
    pub crouch_slide: bool,
    /// The player can slide down walls
    pub uses_wall_slide: bool,
    /// Holding down lets go of the wall
    pub down_cancels_wall_slide: bool,
    /// Jumping is allowed while wall sliding
    pub jump_from_walls: bool,
    /// Seconds the wall-side direction stays locked after a wall jump
    pub wall_jump_lock_time: f32,
    /// Wall contact counts without holding toward the wall
    pub sticks_to_walls: bool,
    /// Seconds a press away from the wall is ignored while sliding
    pub stick_to_wall_time: f32,
    /// Grabbing a ledge restores the double jump
    pub ledge_resets_double_jump: bool,
    /// Wall sliding restores the double jump instead of revoking it
    pub wall_resets_double_jump: bool,

    /// Publish look intent to follow cameras
    pub camera_follower: bool,
    /// Seconds between death and respawn
    pub respawn_delay: f32,
    /// Where the body is parked while dead
    pub dead_position: Vec3,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(1.0, 2.0),
            ground_range: 0.05,
            wall_slide_range: 0.05,
            ledge_size: Vec2::new(0.1, 0.2),
            ledge_sensor_size: Vec2::new(0.2, 0.4),
            ledge_sensor_offset: Vec2::new(0.6, 0.9),
            gravity: -100.0,
            terminal_velocity: -1000.0,
            air_drag: 6.0,
            ground_drag: 60.0,
            move_velocity: 10.0,
            acceleration: 40.0,
            run_velocity: 16.0,
            crouch_velocity: 4.0,
            crouch_slide_drag: 30.0,
            sharp_ground_turns: true,
            sharp_air_turns: true,
            jump_velocity: 35.0,
            short_jump_velocity: 10.0,
            double_jump_velocity: 30.0,
            short_double_jump_velocity: 10.0,
            wall_slide_gravity: -100.0,
            wall_slide_terminal_velocity: -5.0,
            uses_crouch: false,
            crouch_slide: false,
            uses_wall_slide: false,
            down_cancels_wall_slide: false,
            jump_from_walls: true,
            wall_jump_lock_time: 0.3,
            sticks_to_walls: true,
            stick_to_wall_time: 0.25,
            ledge_resets_double_jump: false,
            wall_resets_double_jump: false,
            camera_follower: true,
            respawn_delay: 1.0,
            dead_position: Vec3::new(-100_000.0, 0.0, 0.0),
        }
    }
}

impl PlayerConfig {
    pub fn half_size(&self) -> Vec2 {
        self.size / 2.0
    }
}

/// Abilities that can be switched on and off while playing
#[derive(Component, Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Abilities {
    run: bool,
    double_jump: bool,
}

impl Abilities {
    pub fn new(run: bool, double_jump: bool) -> Self {
        Self { run, double_jump }
    }

    pub fn run(&self) -> bool {
        self.run
    }

    pub fn double_jump(&self) -> bool {
        self.double_jump
    }

    pub fn toggle_run(&mut self) {
        self.run = !self.run;
    }

    pub fn toggle_double_jump(&mut self) {
        self.double_jump = !self.double_jump;
    }
}

/// Current player velocity
#[derive(Component, Default, Deref, DerefMut)]
pub struct PlayerVelocity(pub Vec3);

/// Contact classification, rebuilt every fixed step
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContactState {
    pub grounded: bool,
    pub wall_slide: bool,
    /// Side of the wall last touched this step
    pub wall_on_right: bool,
}

/// A grab the ledge registry asks the locomotion step to perform
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LedgeGrabRequest {
    /// Top corner of the ground being grabbed
    pub corner: Vec2,
    pub side: LedgeSide,
}

/// Ledge hanging state
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct LedgeGrab {
    pub pending: Option<LedgeGrabRequest>,
    pub grabbing: bool,
    pub side: Option<LedgeSide>,
}

impl LedgeGrab {
    pub fn ledge_on_right(&self) -> bool {
        self.side == Some(LedgeSide::Right)
    }

    /// Lets go of the ledge. Returns whether the player was hanging.
    pub fn release(&mut self) -> bool {
        let was_grabbing = self.grabbing;
        self.grabbing = false;
        was_grabbing
    }
}

/// Directions the player is looking in, consumed by follow cameras
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LookIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Per-step locomotion classification
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LocomotionState {
    Grounded,
    #[default]
    Airborne,
    WallSliding,
    LedgeGrabbing,
}

impl LocomotionState {
    pub fn classify(contact: &ContactState, grab: &LedgeGrab) -> Self {
        if grab.grabbing {
            LocomotionState::LedgeGrabbing
        } else if contact.wall_slide {
            LocomotionState::WallSliding
        } else if contact.grounded {
            LocomotionState::Grounded
        } else {
            LocomotionState::Airborne
        }
    }
}

/// Where the player comes back after dying
#[derive(Component, Clone, Copy, Debug, Deref)]
pub struct SpawnPoint(pub Vec3);

/// Marker: all input is ignored while present
#[derive(Component)]
#[component(storage = "SparseSet")]
pub struct InputBlocked;
