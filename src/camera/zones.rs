use avian3d::prelude::*;
use bevy::prelude::*;
use serde::Deserialize;

use super::follow::{CameraFollowConfig, FollowCamera, FollowSettings};
use super::look::LookOffset;
use crate::physics::GameLayer;
use crate::player::{Player, PlayerKilled, PlayerRespawned};

/// Strategy pair a [`CameraModeZone`] switches follow cameras to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum CameraMode {
    Damp,
    Level,
}

/// Volume that switches every follow camera's strategy when a player walks in.
///
/// Needs a `Collider` on the same entity, usually a `Sensor` on [`GameLayer::Trigger`].
#[derive(Component, Debug)]
pub struct CameraModeZone {
    pub mode: CameraMode,
    players_inside: Vec<Entity>,
}

impl CameraModeZone {
    pub fn new(mode: CameraMode) -> Self {
        Self {
            mode,
            players_inside: Vec::new(),
        }
    }
}

/// Switches camera strategies when a player enters a mode zone
pub fn apply_camera_mode_zones(
    spatial_query: SpatialQuery,
    mut zones: Query<(Entity, &Collider, &Transform, &mut CameraModeZone)>,
    players: Query<(), With<Player>>,
    mut cameras: Query<&mut FollowSettings, With<FollowCamera>>,
) {
    for (zone_entity, collider, transform, mut zone) in &mut zones {
        let filter = SpatialQueryFilter::default()
            .with_mask(GameLayer::Player)
            .with_excluded_entities([zone_entity]);

        let inside: Vec<Entity> = spatial_query
            .shape_intersections(collider, transform.translation, transform.rotation, &filter)
            .into_iter()
            .filter(|e| players.contains(*e))
            .collect();

        let entered = inside.iter().any(|e| !zone.players_inside.contains(e));
        zone.players_inside = inside;

        if !entered {
            continue;
        }

        info!("Camera mode zone {} switched cameras to {:?}", zone_entity, zone.mode);
        for mut settings in &mut cameras {
            match zone.mode {
                CameraMode::Damp => settings.damp_xy(),
                CameraMode::Level => settings.level_xy(),
            }
        }
    }
}

/// Stops the cameras following a player that just died and recenters their look
pub fn pause_follow_on_kill(
    mut killed: MessageReader<PlayerKilled>,
    mut cameras: Query<(&FollowCamera, &CameraFollowConfig, &mut FollowSettings, &mut LookOffset)>,
) {
    for event in killed.read() {
        for (camera, config, mut settings, mut look) in &mut cameras {
            if camera.target != event.entity {
                continue;
            }
            settings.follow = false;
            look.reset(config.origin_offset);
        }
    }
}

/// Resumes following a player that came back
pub fn resume_follow_on_respawn(
    mut respawned: MessageReader<PlayerRespawned>,
    mut cameras: Query<(&FollowCamera, &mut FollowSettings)>,
) {
    for event in respawned.read() {
        for (camera, mut settings) in &mut cameras {
            if camera.target == event.entity {
                settings.follow = true;
            }
        }
    }
}
