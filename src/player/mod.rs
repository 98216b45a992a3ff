pub mod contact;
pub mod input;
mod jump;
pub mod ledge;
mod life;
pub mod movement;
mod plugin;
pub mod resolver;
mod state;

pub use input::{InputIntent, RawInput};
pub use jump::{apply_jump, integrate_jump};
pub use ledge::{LedgeRegistry, LedgeSide, LedgeZone};
pub use life::{on_player_killed, tick_respawn, PlayerKilled, PlayerRespawned, Respawning};
pub use plugin::{spawn_player, validate_player_setup, PlayerPlugin, PlayerStateBundle, SetupError};
pub use resolver::InputResolver;
pub use state::*;
