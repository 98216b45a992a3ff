use avian3d::prelude::*;
use bevy::prelude::*;

use super::input::InputIntent;
use super::state::*;
use crate::physics::{cast_probe, probe_reach, Surface, PROBE_SKIN};

/// Surface coordinates found by one round of contact probes
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ProbeReadings {
    /// Highest ground surface (y) under either foot probe
    pub ground: Option<f32>,
    /// Face (x) of a wall found by the right-hand probes
    pub right_wall: Option<f32>,
    /// Face (x) of a wall found by the left-hand probes
    pub left_wall: Option<f32>,
}

/// Contact state plus the position correction that keeps the player at the
/// configured ranges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensedContacts {
    pub state: ContactState,
    pub position: Vec2,
}

/// Turns probe readings into a fresh [`ContactState`].
///
/// Ground wins: walls are only considered while airborne.
pub fn resolve_contacts(
    position: Vec2,
    readings: &ProbeReadings,
    config: &PlayerConfig,
    intent: &InputIntent,
) -> SensedContacts {
    let half = config.half_size();
    let mut position = position;

    let grounded = readings.ground.is_some();
    if let Some(surface_y) = readings.ground {
        position.y = surface_y + half.y + config.ground_range;
    }

    let mut touching = false;
    let mut wall_on_right = false;

    if !grounded {
        if let Some(face_x) = readings.right_wall {
            position.x = face_x - half.x - config.wall_slide_range;
            if config.sticks_to_walls || intent.right {
                touching = true;
                wall_on_right = true;
            }
        }

        if let Some(face_x) = readings.left_wall {
            position.x = face_x + half.x + config.wall_slide_range;
            if config.sticks_to_walls || intent.left {
                touching = true;
                wall_on_right = false;
            }
        }
    }

    let cancelled = config.down_cancels_wall_slide && intent.down;
    let wall_slide = config.uses_wall_slide && touching && !cancelled;

    SensedContacts {
        state: ContactState {
            grounded,
            wall_slide,
            wall_on_right,
        },
        position,
    }
}

/// Casts the six contact probes around the player's box
pub fn read_probes(
    spatial_query: &SpatialQuery,
    surfaces: &Query<&Surface>,
    center: Vec3,
    config: &PlayerConfig,
) -> ProbeReadings {
    let half = config.half_size();
    let mut readings = ProbeReadings::default();

    // Feet: downward from both bottom corners, raised by the skin
    let foot_y = center.y - half.y + PROBE_SKIN;
    let ground_reach = probe_reach(config.ground_range);
    for x in [center.x - half.x, center.x + half.x] {
        let origin = Vec3::new(x, foot_y, center.z);
        let hit = cast_probe(
            spatial_query,
            surfaces,
            origin,
            Dir3::NEG_Y,
            ground_reach,
            Surface::is_ground,
        );
        if let Some(hit) = hit {
            let surface_y = origin.y - hit.distance;
            readings.ground = Some(readings.ground.map_or(surface_y, |y| y.max(surface_y)));
        }
    }

    // Sides: from the top and bottom corners, pulled inward by the skin
    let wall_reach = probe_reach(config.wall_slide_range);
    for y in [center.y - half.y, center.y + half.y] {
        let right_origin = Vec3::new(center.x + half.x - PROBE_SKIN, y, center.z);
        if readings.right_wall.is_none() {
            let hit = cast_probe(
                spatial_query,
                surfaces,
                right_origin,
                Dir3::X,
                wall_reach,
                Surface::is_wall,
            );
            readings.right_wall = hit.map(|hit| right_origin.x + hit.distance);
        }

        let left_origin = Vec3::new(center.x - half.x + PROBE_SKIN, y, center.z);
        if readings.left_wall.is_none() {
            let hit = cast_probe(
                spatial_query,
                surfaces,
                left_origin,
                Dir3::NEG_X,
                wall_reach,
                Surface::is_wall,
            );
            readings.left_wall = hit.map(|hit| left_origin.x - hit.distance);
        }
    }

    readings
}

/// Rebuilds ground and wall contact every fixed step
pub fn sense_contacts(
    spatial_query: SpatialQuery,
    surfaces: Query<&Surface>,
    mut query: Query<
        (&mut Transform, &PlayerConfig, &InputIntent, &LedgeGrab, &mut ContactState),
        (With<Player>, Without<super::life::Respawning>),
    >,
) {
    for (mut transform, config, intent, grab, mut contact) in &mut query {
        let readings = read_probes(&spatial_query, &surfaces, transform.translation, config);
        let sensed = resolve_contacts(transform.translation.truncate(), &readings, config, intent);

        // Hanging keeps the exact grab alignment
        if !grab.grabbing && sensed.position != transform.translation.truncate() {
            transform.translation.x = sensed.position.x;
            transform.translation.y = sensed.position.y;
        }

        contact.set_if_neq(sensed.state);
    }
}
