use avian3d::prelude::*;

/// Collision layers for the physics simulation
#[derive(PhysicsLayer, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Player character
    Player,
    /// Static level geometry: ground, walls and bounds
    World,
    /// Kill areas, camera zones and other sensors
    Trigger,
}

impl GameLayer {
    /// Layers for solid level geometry
    pub fn world() -> CollisionLayers {
        CollisionLayers::new(GameLayer::World, [GameLayer::Player, GameLayer::Default])
    }

    /// Layers for sensor volumes that only need to see the player
    pub fn trigger() -> CollisionLayers {
        CollisionLayers::new(GameLayer::Trigger, [GameLayer::Player])
    }
}
