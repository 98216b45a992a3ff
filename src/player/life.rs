use avian3d::prelude::*;
use bevy::prelude::*;

use super::input::InputIntent;
use super::ledge::LedgeRegistry;
use super::state::*;
use crate::hazard::Kill;

/// Written when a player dies
#[derive(Message, Debug, Clone, Copy)]
pub struct PlayerKilled {
    pub entity: Entity,
}

/// Written when a dead player is back at its spawn point
#[derive(Message, Debug, Clone, Copy)]
pub struct PlayerRespawned {
    pub entity: Entity,
}

/// Countdown to respawn. Present only while the player is dead.
#[derive(Component, Debug, Clone, Copy)]
#[component(storage = "SparseSet")]
pub struct Respawning {
    pub elapsed: f32,
    pub delay: f32,
}

/// Parks a killed player out of the level and starts its respawn timer
pub fn on_player_killed(
    trigger: On<Kill>,
    mut commands: Commands,
    mut query: Query<
        (
            &PlayerConfig,
            &mut Transform,
            &mut Visibility,
            &mut RigidBody,
            &mut LinearVelocity,
            &mut PlayerVelocity,
            &mut ContactState,
            &mut LedgeGrab,
            &mut LedgeRegistry,
            &mut InputIntent,
            Has<Respawning>,
        ),
        With<Player>,
    >,
    mut killed: MessageWriter<PlayerKilled>,
) {
    let entity = trigger.event_target();
    let Ok((
        config,
        mut transform,
        mut visibility,
        mut body,
        mut lin_vel,
        mut velocity,
        mut contact,
        mut grab,
        mut registry,
        mut intent,
        dead,
    )) = query.get_mut(entity)
    else {
        return;
    };

    // Already dead
    if dead {
        return;
    }

    *visibility = Visibility::Hidden;
    transform.translation = config.dead_position;
    *body = RigidBody::Kinematic;
    lin_vel.0 = Vec3::ZERO;
    velocity.0 = Vec3::ZERO;
    *contact = ContactState::default();
    *grab = LedgeGrab::default();
    *registry = LedgeRegistry::default();
    intent.clear();

    commands.entity(entity).insert(Respawning {
        elapsed: 0.0,
        delay: config.respawn_delay,
    });
    killed.write(PlayerKilled { entity });
    info!("Player {} killed, respawning in {}s", entity, config.respawn_delay);
}

/// Brings dead players back once their delay has passed
pub fn tick_respawn(
    mut commands: Commands,
    mut query: Query<
        (
            Entity,
            &mut Respawning,
            &SpawnPoint,
            &mut Transform,
            &mut Visibility,
            &mut RigidBody,
        ),
        With<Player>,
    >,
    mut respawned: MessageWriter<PlayerRespawned>,
    time: Res<Time>,
) {
    for (entity, mut respawning, spawn, mut transform, mut visibility, mut body) in &mut query {
        respawning.elapsed += time.delta_secs();
        if respawning.elapsed < respawning.delay {
            continue;
        }

        transform.translation = spawn.0;
        *visibility = Visibility::Inherited;
        *body = RigidBody::Dynamic;

        commands.entity(entity).remove::<Respawning>();
        respawned.write(PlayerRespawned { entity });
        info!("Player {} respawned at {}", entity, spawn.0);
    }
}
