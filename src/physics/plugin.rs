use avian3d::prelude::*;
use bevy::prelude::*;

/// Fixed step rate. Movement constants are tuned for 8 ms steps.
pub const FIXED_HZ: f64 = 125.0;

/// Plugin that sets up the Avian3D physics engine
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(
            PhysicsPlugins::default()
                .with_length_unit(1.0), // 1 unit = 1 meter
        );

        // The player integrates its own gravity; nothing else in the level is dynamic
        app.insert_resource(Gravity(Vec3::ZERO));
        app.insert_resource(Time::<Fixed>::from_hz(FIXED_HZ));
    }
}
