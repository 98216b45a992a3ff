mod bounds;
mod follow;
mod look;
mod plugin;
mod smoothing;
mod zones;

pub use bounds::*;
pub use follow::*;
pub use look::LookOffset;
pub use plugin::CameraPlugin;
pub use smoothing::*;
pub use zones::*;
