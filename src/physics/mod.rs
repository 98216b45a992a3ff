mod layers;
mod plugin;
mod probe;
mod surface;

pub use layers::GameLayer;
pub use plugin::{PhysicsPlugin, FIXED_HZ};
pub use probe::*;
pub use surface::*;
