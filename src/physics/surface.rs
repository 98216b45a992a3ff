use bevy::prelude::*;
use serde::Deserialize;

/// Which side of the play area a camera bound closes off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum BoundSide {
    Right,
    Left,
    Upper,
    Bottom,
}

impl BoundSide {
    /// Whether the bound limits horizontal camera travel
    pub fn is_horizontal(self) -> bool {
        matches!(self, BoundSide::Right | BoundSide::Left)
    }
}

/// Category of a piece of level geometry.
///
/// Contact probes, ledge sensors and camera bounds all classify what they touch
/// through this component instead of comparing names.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum Surface {
    Ground,
    Wall,
    Bound(BoundSide),
}

impl Surface {
    /// Surfaces the player can stand on
    pub fn is_ground(self) -> bool {
        matches!(self, Surface::Ground | Surface::Bound(BoundSide::Bottom))
    }

    /// Surfaces the player can slide down
    pub fn is_wall(self) -> bool {
        matches!(
            self,
            Surface::Ground
                | Surface::Wall
                | Surface::Bound(BoundSide::Right)
                | Surface::Bound(BoundSide::Left)
        )
    }

    pub fn bound_side(self) -> Option<BoundSide> {
        match self {
            Surface::Bound(side) => Some(side),
            _ => None,
        }
    }
}
