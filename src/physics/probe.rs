use avian3d::prelude::*;
use bevy::prelude::*;

use super::{GameLayer, Surface};

/// Distance probes start inside the player's box, so they never begin inside
/// the collider they are meant to find.
pub const PROBE_SKIN: f32 = 0.005;

/// How far a probe starting `PROBE_SKIN` inside the box must reach to find a
/// surface `range` away from it.
///
/// A body snapped to exactly `range` has to find that surface again next step,
/// so the reach keeps one skin of slack over the snapped distance.
pub fn probe_reach(range: f32) -> f32 {
    range + 2.0 * PROBE_SKIN
}

/// Result of a contact probe
#[derive(Debug, Clone, Copy)]
pub struct ProbeHit {
    pub entity: Entity,
    pub distance: f32,
    pub surface: Surface,
}

/// Casts a ray against level geometry and returns the nearest hit that carries
/// a `Surface` matching `accept`.
pub fn cast_probe(
    spatial_query: &SpatialQuery,
    surfaces: &Query<&Surface>,
    origin: Vec3,
    direction: Dir3,
    max_distance: f32,
    accept: impl Fn(Surface) -> bool,
) -> Option<ProbeHit> {
    let filter = SpatialQueryFilter::default().with_mask(GameLayer::World);

    let hit = spatial_query.cast_ray(origin, direction, max_distance, true, &filter)?;
    let surface = *surfaces.get(hit.entity).ok()?;

    accept(surface).then_some(ProbeHit {
        entity: hit.entity,
        distance: hit.distance,
        surface,
    })
}
