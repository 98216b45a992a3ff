use avian3d::prelude::*;
use bevy::prelude::*;

use super::input::InputIntent;
use super::life::Respawning;
use super::state::*;

/// Moves `value` toward zero by `amount` without crossing it
pub fn decay_toward_zero(value: f32, amount: f32) -> f32 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else {
        (value + amount).min(0.0)
    }
}

/// Integrates vertical velocity for one step
pub fn integrate_gravity(
    velocity: &mut Vec3,
    contact: &ContactState,
    config: &PlayerConfig,
    dt: f32,
) {
    if contact.wall_slide {
        velocity.y = (velocity.y + config.wall_slide_gravity * dt)
            .max(config.wall_slide_terminal_velocity);
    } else if !contact.grounded {
        velocity.y = (velocity.y + config.gravity * dt).max(config.terminal_velocity);
    } else {
        velocity.y = 0.0;
    }
}

/// Slows horizontal velocity when nothing is held, or while crouch sliding
pub fn integrate_drag(
    velocity: &mut Vec3,
    contact: &ContactState,
    intent: &InputIntent,
    config: &PlayerConfig,
    dt: f32,
) {
    if !intent.left && !intent.right {
        let drag = if contact.grounded {
            config.ground_drag
        } else {
            config.air_drag
        };
        velocity.x = decay_toward_zero(velocity.x, drag * dt);
    } else if config.crouch_slide && intent.crouch {
        velocity.x = decay_toward_zero(velocity.x, config.crouch_slide_drag * dt);
    }
}

/// Accelerates toward the held direction's speed cap
pub fn integrate_movement(
    velocity: &mut Vec3,
    contact: &ContactState,
    intent: &InputIntent,
    config: &PlayerConfig,
    dt: f32,
) {
    let sharp_turn = if contact.grounded {
        config.sharp_ground_turns
    } else {
        config.sharp_air_turns
    };

    let cap = if intent.crouch && !config.crouch_slide {
        config.crouch_velocity
    } else if intent.run {
        config.run_velocity
    } else {
        config.move_velocity
    };

    // Crouch sliding on the ground keeps whatever speed it had
    let sliding = intent.crouch && config.crouch_slide && contact.grounded;

    if intent.right {
        if sharp_turn && velocity.x < 0.0 {
            velocity.x = 0.0;
        }
        let x = if contact.wall_slide && contact.wall_on_right {
            0.0
        } else {
            (velocity.x + config.acceleration * dt).min(cap)
        };
        if !sliding {
            velocity.x = x;
        }
    }

    if intent.left {
        if sharp_turn && velocity.x > 0.0 {
            velocity.x = 0.0;
        }
        let x = if contact.wall_slide && !contact.wall_on_right {
            0.0
        } else {
            (velocity.x - config.acceleration * dt).max(-cap)
        };
        if !sliding {
            velocity.x = x;
        }
    }
}

/// Copies the body's velocity in before the controller works on it
pub fn read_body_velocity(mut query: Query<(&mut PlayerVelocity, &LinearVelocity), With<Player>>) {
    for (mut velocity, lin_vel) in &mut query {
        velocity.0 = Vec3::new(lin_vel.x, lin_vel.y, 0.0);
    }
}

/// Applies gravity, or wall-slide gravity, or zeroes fall speed on the ground
pub fn apply_gravity(
    mut query: Query<(&mut PlayerVelocity, &ContactState, &PlayerConfig), With<Player>>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();
    for (mut velocity, contact, config) in &mut query {
        integrate_gravity(&mut velocity, contact, config, dt);
    }
}

/// Applies ground, air and crouch-slide drag
pub fn apply_drag(
    mut query: Query<
        (&mut PlayerVelocity, &ContactState, &InputIntent, &PlayerConfig),
        With<Player>,
    >,
    time: Res<Time>,
) {
    let dt = time.delta_secs();
    for (mut velocity, contact, intent, config) in &mut query {
        integrate_drag(&mut velocity, contact, intent, config, dt);
    }
}

/// Applies horizontal movement, publishes look intent and lets go of ledges on down
pub fn apply_movement(
    mut query: Query<
        (
            &mut PlayerVelocity,
            &mut LookIntent,
            &mut LedgeGrab,
            &mut RigidBody,
            &ContactState,
            &InputIntent,
            &PlayerConfig,
        ),
        With<Player>,
    >,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (mut velocity, mut look, mut grab, mut body, contact, intent, config) in &mut query {
        if intent.down && grab.release() {
            *body = RigidBody::Dynamic;
            debug!("Dropped from ledge");
        }

        let next_look = if config.camera_follower {
            LookIntent {
                up: intent.up,
                down: intent.down,
                left: intent.left,
                right: intent.right,
            }
        } else {
            LookIntent::default()
        };
        look.set_if_neq(next_look);

        integrate_movement(&mut velocity, contact, intent, config, dt);
    }
}

/// Reclassifies the locomotion state after the step
pub fn update_locomotion_state(
    mut query: Query<(&mut LocomotionState, &ContactState, &LedgeGrab), With<Player>>,
) {
    for (mut state, contact, grab) in &mut query {
        let next = LocomotionState::classify(contact, grab);
        if *state != next {
            debug!("Locomotion {:?} -> {:?}", *state, next);
            *state = next;
        }
    }
}

/// Writes the controller velocity back to the body. Hanging and dead bodies stay still.
pub fn apply_velocity(
    mut query: Query<
        (&PlayerVelocity, &LedgeGrab, &mut LinearVelocity, Has<Respawning>),
        With<Player>,
    >,
) {
    for (velocity, grab, mut lin_vel, dead) in &mut query {
        if grab.grabbing || dead {
            lin_vel.0 = Vec3::ZERO;
        } else {
            lin_vel.0 = Vec3::new(velocity.x, velocity.y, 0.0);
        }
    }
}
