use bevy::prelude::*;

use super::{bounds::*, follow::*, zones::*};
use crate::player::{PlayerKilled, PlayerRespawned};

/// Plugin for 2D follow camera systems
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PlayerKilled>();
        app.add_message::<PlayerRespawned>();

        app.add_systems(FixedUpdate, apply_camera_mode_zones);

        app.add_systems(
            Update,
            (
                pause_follow_on_kill,
                resume_follow_on_respawn,
                track_camera_bounds,
                follow_target,
            )
                .chain(),
        );
    }
}
