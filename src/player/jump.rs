use avian3d::prelude::*;
use bevy::prelude::*;

use super::input::InputIntent;
use super::state::*;

/// Applies latched jump, double jump and cancel intents to `velocity`.
///
/// Consumes the flags it acts on. Returns `true` if a jump released a ledge.
pub fn integrate_jump(
    velocity: &mut Vec3,
    intent: &mut InputIntent,
    contact: &ContactState,
    grab: &mut LedgeGrab,
    config: &PlayerConfig,
) -> bool {
    let mut released = false;

    if intent.jump {
        let x = if config.jump_from_walls && contact.wall_slide && !grab.grabbing {
            if contact.wall_on_right {
                -config.move_velocity
            } else {
                config.move_velocity
            }
        } else if grab.grabbing {
            // Only jumping away from the ledge pushes off it
            if grab.ledge_on_right() && intent.left {
                -config.move_velocity
            } else if !grab.ledge_on_right() && intent.right {
                config.move_velocity
            } else {
                velocity.x
            }
        } else {
            velocity.x
        };

        released = grab.release();
        velocity.x = x;
        velocity.y = config.jump_velocity;
        intent.jump = false;
    } else if intent.double_jump {
        velocity.y = config.double_jump_velocity;
        intent.double_jump = false;
    }

    if intent.jump_cancel {
        velocity.y = velocity.y.min(config.short_jump_velocity);
        intent.jump_cancel = false;
    }

    if intent.double_jump_cancel {
        velocity.y = velocity.y.min(config.short_double_jump_velocity);
        intent.double_jump_cancel = false;
    }

    released
}

/// Runs jumps for every player. A jump off a ledge makes the body dynamic again.
pub fn apply_jump(
    mut query: Query<
        (
            &mut PlayerVelocity,
            &mut InputIntent,
            &mut LedgeGrab,
            &mut RigidBody,
            &ContactState,
            &PlayerConfig,
        ),
        With<Player>,
    >,
) {
    for (mut velocity, mut intent, mut grab, mut body, contact, config) in &mut query {
        if integrate_jump(&mut velocity, &mut intent, contact, &mut grab, config) {
            *body = RigidBody::Dynamic;
            debug!("Jumped off ledge");
        }
    }
}
