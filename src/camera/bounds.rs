use avian3d::prelude::*;
use bevy::prelude::*;

use super::follow::{CameraFollowConfig, FollowCamera, FollowSettings, FollowStrategy};
use crate::physics::{BoundSide, GameLayer, Surface};

/// Depth of the box used to find bounds around the camera's view
const VIEW_DEPTH: f32 = 1000.0;

/// An active bound: its world coordinate and when it was entered
#[derive(Clone, Copy, Debug, PartialEq)]
struct BoundSlot {
    value: f32,
    order: u64,
}

/// Level bounds the camera's view currently overlaps
#[derive(Component, Debug, Default)]
pub struct CameraBounds {
    right: Option<BoundSlot>,
    left: Option<BoundSlot>,
    upper: Option<BoundSlot>,
    bottom: Option<BoundSlot>,
    entered: u64,
    overlapping: Vec<Entity>,
}

impl CameraBounds {
    fn slot_mut(&mut self, side: BoundSide) -> &mut Option<BoundSlot> {
        match side {
            BoundSide::Right => &mut self.right,
            BoundSide::Left => &mut self.left,
            BoundSide::Upper => &mut self.upper,
            BoundSide::Bottom => &mut self.bottom,
        }
    }

    pub fn enter(&mut self, side: BoundSide, value: f32) {
        self.entered += 1;
        let order = self.entered;
        *self.slot_mut(side) = Some(BoundSlot { value, order });
    }

    pub fn exit(&mut self, side: BoundSide) {
        *self.slot_mut(side) = None;
    }

    fn latest(
        a: (BoundSide, Option<BoundSlot>),
        b: (BoundSide, Option<BoundSlot>),
    ) -> Option<(BoundSide, f32)> {
        match (a.1, b.1) {
            (Some(x), Some(y)) if y.order > x.order => Some((b.0, y.value)),
            (Some(x), _) => Some((a.0, x.value)),
            (None, Some(y)) => Some((b.0, y.value)),
            (None, None) => None,
        }
    }

    /// The right or left bound, whichever was entered last
    pub fn horizontal(&self) -> Option<(BoundSide, f32)> {
        Self::latest((BoundSide::Right, self.right), (BoundSide::Left, self.left))
    }

    /// The upper or bottom bound, whichever was entered last
    pub fn vertical(&self) -> Option<(BoundSide, f32)> {
        Self::latest((BoundSide::Upper, self.upper), (BoundSide::Bottom, self.bottom))
    }
}

/// Keeps `predicted` far enough from `bound` that the camera's edge never
/// passes it. `camera_size` is the view extent along the bound's axis.
pub fn clamp_to_bound(predicted: f32, bound: Option<(BoundSide, f32)>, camera_size: f32) -> f32 {
    match bound {
        Some((BoundSide::Right | BoundSide::Upper, value)) => {
            predicted.min(value - camera_size / 2.0)
        }
        Some((BoundSide::Left | BoundSide::Bottom, value)) => {
            predicted.max(value + camera_size / 2.0)
        }
        None => predicted,
    }
}

/// Overlap-tests each follow camera's view against bound surfaces and updates
/// its [`CameraBounds`]. A bound is only picked up while its axis uses SmoothDamp.
pub fn track_camera_bounds(
    spatial_query: SpatialQuery,
    bounds: Query<(&Surface, &Transform), Without<FollowCamera>>,
    mut cameras: Query<
        (&Transform, &Projection, &CameraFollowConfig, &FollowSettings, &mut CameraBounds),
        With<FollowCamera>,
    >,
) {
    let filter = SpatialQueryFilter::default().with_mask(GameLayer::World);

    for (transform, projection, config, settings, mut camera_bounds) in &mut cameras {
        if !config.use_bounds {
            continue;
        }
        let Projection::Orthographic(ortho) = projection else {
            continue;
        };

        let view = ortho.area.size();
        let shape = Collider::cuboid(view.x, view.y, VIEW_DEPTH);

        let current: Vec<Entity> = spatial_query
            .shape_intersections(&shape, transform.translation, Quat::IDENTITY, &filter)
            .into_iter()
            .filter(|e| bounds.get(*e).is_ok_and(|(surface, _)| surface.bound_side().is_some()))
            .collect();

        let previous = std::mem::replace(&mut camera_bounds.overlapping, current.clone());

        for entity in previous.iter().filter(|e| !current.contains(*e)) {
            if let Some(side) = bounds.get(*entity).ok().and_then(|(s, _)| s.bound_side()) {
                camera_bounds.exit(side);
            }
        }

        for entity in current.iter().filter(|e| !previous.contains(*e)) {
            let Ok((surface, bound_transform)) = bounds.get(*entity) else {
                continue;
            };
            let Some(side) = surface.bound_side() else {
                continue;
            };

            let (strategy, value) = if side.is_horizontal() {
                (settings.strategy_x, bound_transform.translation.x)
            } else {
                (settings.strategy_y, bound_transform.translation.y)
            };
            if strategy == FollowStrategy::SmoothDamp {
                debug!("Camera entered {:?} bound at {}", side, value);
                camera_bounds.enter(side, value);
            }
        }
    }
}
