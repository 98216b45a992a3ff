pub mod camera;
pub mod hazard;
pub mod physics;
pub mod player;
pub mod settings;

pub use camera::CameraPlugin;
pub use hazard::HazardPlugin;
pub use physics::PhysicsPlugin;
pub use player::PlayerPlugin;
pub use settings::SettingsPlugin;

use bevy::prelude::*;

/// Unified plugin that adds settings, physics, player controller, hazards and camera systems.
pub struct PlatformerPlugin;

impl Plugin for PlatformerPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<SettingsPlugin>() {
            app.add_plugins(SettingsPlugin::default());
        }
        if !app.is_plugin_added::<PhysicsPlugin>() {
            app.add_plugins(PhysicsPlugin);
        }
        if !app.is_plugin_added::<PlayerPlugin>() {
            app.add_plugins(PlayerPlugin);
        }
        if !app.is_plugin_added::<HazardPlugin>() {
            app.add_plugins(HazardPlugin);
        }
        if !app.is_plugin_added::<CameraPlugin>() {
            app.add_plugins(CameraPlugin);
        }
    }
}

pub mod prelude {
    pub use crate::camera::{
        CameraBounds, CameraFollowConfig, CameraMode, CameraModeZone, CameraPlugin, FollowCamera,
        FollowSettings, FollowStrategy, LookOffset,
    };
    pub use crate::hazard::{HazardPlugin, Kill, KillArea, Killable};
    pub use crate::physics::{BoundSide, GameLayer, PhysicsPlugin, Surface};
    pub use crate::player::{
        spawn_player, Abilities, ContactState, InputBlocked, InputIntent, LedgeGrab,
        LocomotionState, LookIntent, Player, PlayerConfig, PlayerKilled, PlayerPlugin,
        PlayerRespawned, PlayerVelocity, Respawning, SpawnPoint,
    };
    pub use crate::settings::{PlatformerSettings, SettingsError, SettingsPlugin};
    pub use crate::PlatformerPlugin;
}
