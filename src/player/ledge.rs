use avian3d::prelude::*;
use bevy::prelude::*;

use super::input::InputIntent;
use super::life::Respawning;
use super::state::*;
use crate::physics::{GameLayer, Surface};

/// Depth of the ledge sensor boxes along z
const SENSOR_DEPTH: f32 = 1.0;

/// Which side of the player a ledge sensor (and the ledge it finds) is on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LedgeSide {
    Left,
    Right,
}

impl LedgeSide {
    pub const BOTH: [LedgeSide; 2] = [LedgeSide::Right, LedgeSide::Left];

    pub fn sign(self) -> f32 {
        match self {
            LedgeSide::Right => 1.0,
            LedgeSide::Left => -1.0,
        }
    }
}

/// A grabbable box at the top corner of a ground, facing the sensor that found it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LedgeZone {
    pub ground: Entity,
    pub side: LedgeSide,
    pub center: Vec2,
    pub half_size: Vec2,
}

impl LedgeZone {
    /// Places a zone inside the ground's top corner facing the sensor on `side`.
    ///
    /// The right sensor meets a ground's left (min-x) edge, the left sensor its
    /// right (max-x) edge.
    pub fn at_ground_edge(
        ground: Entity,
        side: LedgeSide,
        ground_min: Vec2,
        ground_max: Vec2,
        size: Vec2,
    ) -> Self {
        let half_size = size / 2.0;
        let x = match side {
            LedgeSide::Right => ground_min.x + half_size.x,
            LedgeSide::Left => ground_max.x - half_size.x,
        };
        Self {
            ground,
            side,
            center: Vec2::new(x, ground_max.y - half_size.y),
            half_size,
        }
    }

    /// Top corner of the ground this zone sits on
    pub fn grab_corner(&self) -> Vec2 {
        let x = match self.side {
            LedgeSide::Right => self.center.x - self.half_size.x,
            LedgeSide::Left => self.center.x + self.half_size.x,
        };
        Vec2::new(x, self.center.y + self.half_size.y)
    }

    pub fn overlaps(&self, center: Vec2, half_size: Vec2) -> bool {
        let delta = (self.center - center).abs();
        let reach = self.half_size + half_size;
        delta.x <= reach.x && delta.y <= reach.y
    }
}

/// Ledge zones found by the player's side sensors, and the grounds each sensor
/// overlapped last step
#[derive(Component, Debug, Default)]
pub struct LedgeRegistry {
    zones: Vec<LedgeZone>,
    right_contacts: Vec<Entity>,
    left_contacts: Vec<Entity>,
}

/// Grounds that started and stopped overlapping a sensor this step
#[derive(Debug, Default, PartialEq)]
pub struct ContactChanges {
    pub entered: Vec<Entity>,
    pub exited: Vec<Entity>,
}

impl LedgeRegistry {
    pub fn zones(&self) -> &[LedgeZone] {
        &self.zones
    }

    fn contacts_mut(&mut self, side: LedgeSide) -> &mut Vec<Entity> {
        match side {
            LedgeSide::Right => &mut self.right_contacts,
            LedgeSide::Left => &mut self.left_contacts,
        }
    }

    /// Replaces the sensor's overlap set with `current` and reports the difference
    pub fn sync_contacts(&mut self, side: LedgeSide, current: Vec<Entity>) -> ContactChanges {
        let previous = std::mem::replace(self.contacts_mut(side), current);
        let current = match side {
            LedgeSide::Right => &self.right_contacts,
            LedgeSide::Left => &self.left_contacts,
        };

        ContactChanges {
            entered: current.iter().filter(|e| !previous.contains(*e)).copied().collect(),
            exited: previous.into_iter().filter(|e| !current.contains(e)).collect(),
        }
    }

    /// Creates the zone for a ground the `side` sensor just touched
    pub fn ground_entered(
        &mut self,
        ground: Entity,
        side: LedgeSide,
        ground_min: Vec2,
        ground_max: Vec2,
        size: Vec2,
    ) {
        self.ground_exited(ground, side);
        self.zones
            .push(LedgeZone::at_ground_edge(ground, side, ground_min, ground_max, size));
    }

    /// Drops the zone of a ground the `side` sensor left
    pub fn ground_exited(&mut self, ground: Entity, side: LedgeSide) {
        self.zones.retain(|zone| zone.ground != ground || zone.side != side);
    }

    /// Consumes the first zone of `side` the sensor overlaps and turns it into a
    /// grab request, as long as the player is falling and pressing toward it.
    pub fn try_grab(
        &mut self,
        side: LedgeSide,
        sensor_center: Vec2,
        sensor_half_size: Vec2,
        falling: bool,
        pressing: bool,
    ) -> Option<LedgeGrabRequest> {
        if !falling || !pressing {
            return None;
        }

        let index = self
            .zones
            .iter()
            .position(|zone| zone.side == side && zone.overlaps(sensor_center, sensor_half_size))?;
        let zone = self.zones.remove(index);

        Some(LedgeGrabRequest {
            corner: zone.grab_corner(),
            side,
        })
    }
}

/// Center of the `side` ledge sensor for a player at `position`
pub fn sensor_center(position: Vec2, side: LedgeSide, config: &PlayerConfig) -> Vec2 {
    position + Vec2::new(side.sign() * config.ledge_sensor_offset.x, config.ledge_sensor_offset.y)
}

/// Moves the side sensors with the player, keeps ledge zones in sync with the
/// grounds they touch and raises grab requests.
pub fn track_ledges(
    spatial_query: SpatialQuery,
    grounds: Query<(&Surface, &ColliderAabb)>,
    mut query: Query<
        (
            &Transform,
            &PlayerConfig,
            &PlayerVelocity,
            &InputIntent,
            &mut LedgeRegistry,
            &mut LedgeGrab,
        ),
        (With<Player>, Without<Respawning>),
    >,
) {
    let filter = SpatialQueryFilter::default().with_mask(GameLayer::World);

    for (transform, config, velocity, intent, mut registry, mut grab) in &mut query {
        let position = transform.translation.truncate();
        let sensor_half = config.ledge_sensor_size / 2.0;
        let sensor_size = config.ledge_sensor_size;
        let shape = Collider::cuboid(sensor_size.x, sensor_size.y, SENSOR_DEPTH);

        for side in LedgeSide::BOTH {
            let center = sensor_center(position, side, config);

            let touching: Vec<Entity> = spatial_query
                .shape_intersections(
                    &shape,
                    center.extend(transform.translation.z),
                    Quat::IDENTITY,
                    &filter,
                )
                .into_iter()
                .filter(|e| grounds.get(*e).is_ok_and(|(surface, _)| surface.is_ground()))
                .collect();

            let changes = registry.sync_contacts(side, touching);

            // Exits first so a ground that left this step can't be grabbed
            for ground in changes.exited {
                registry.ground_exited(ground, side);
            }
            for ground in changes.entered {
                let Ok((_, aabb)) = grounds.get(ground) else {
                    continue;
                };
                let (min, max) = (aabb.min.truncate(), aabb.max.truncate());
                registry.ground_entered(ground, side, min, max, config.ledge_size);
            }

            if grab.pending.is_some() || grab.grabbing {
                continue;
            }

            let pressing = match side {
                LedgeSide::Right => intent.right,
                LedgeSide::Left => intent.left,
            };
            let falling = velocity.y < 0.0;
            if let Some(request) = registry.try_grab(side, center, sensor_half, falling, pressing) {
                info!("Ledge grab requested on the {:?} at {}", side, request.corner);
                grab.pending = Some(request);
            }
        }
    }
}

/// Honors a pending grab request: freezes the body and hangs it from the corner
pub fn resolve_ledge_grab(
    mut query: Query<
        (
            &mut Transform,
            &mut LedgeGrab,
            &mut RigidBody,
            &mut PlayerVelocity,
            &PlayerConfig,
        ),
        With<Player>,
    >,
) {
    for (mut transform, mut grab, mut body, mut velocity, config) in &mut query {
        let Some(request) = grab.pending.take() else {
            continue;
        };

        let half = config.half_size();
        let x = match request.side {
            LedgeSide::Right => request.corner.x - half.x,
            LedgeSide::Left => request.corner.x + half.x,
        };
        transform.translation.x = x;
        transform.translation.y = request.corner.y - half.y;

        *body = RigidBody::Kinematic;
        velocity.0 = Vec3::ZERO;
        grab.grabbing = true;
        grab.side = Some(request.side);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEDGE: Vec2 = Vec2::new(0.1, 0.2);
    const MIN: Vec2 = Vec2::new(2.0, -1.0);
    const MAX: Vec2 = Vec2::new(6.0, 1.0);

    fn grounds<const N: usize>() -> [Entity; N] {
        let mut world = World::new();
        std::array::from_fn(|_| world.spawn_empty().id())
    }

    #[test]
    fn right_sensor_zone_sits_on_left_top_corner() {
        let [ground] = grounds();
        let zone = LedgeZone::at_ground_edge(ground, LedgeSide::Right, MIN, MAX, LEDGE);

        assert!((zone.center - Vec2::new(2.05, 0.9)).length() < 1e-5);
        assert!((zone.grab_corner() - Vec2::new(2.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn left_sensor_zone_sits_on_right_top_corner() {
        let [ground] = grounds();
        let zone = LedgeZone::at_ground_edge(ground, LedgeSide::Left, MIN, MAX, LEDGE);

        assert!((zone.center - Vec2::new(5.95, 0.9)).length() < 1e-5);
        assert!((zone.grab_corner() - Vec2::new(6.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn grab_is_one_shot() {
        let [ground] = grounds();
        let mut registry = LedgeRegistry::default();
        registry.ground_entered(ground, LedgeSide::Right, MIN, MAX, LEDGE);

        let sensor = Vec2::new(2.0, 1.0);
        let half = Vec2::new(0.1, 0.2);

        let request = registry.try_grab(LedgeSide::Right, sensor, half, true, true);
        assert_eq!(request.map(|r| r.side), Some(LedgeSide::Right));
        assert!(registry.zones().is_empty());
        assert!(registry.try_grab(LedgeSide::Right, sensor, half, true, true).is_none());
    }

    #[test]
    fn grab_needs_fall_and_press() {
        let [ground] = grounds();
        let mut registry = LedgeRegistry::default();
        registry.ground_entered(ground, LedgeSide::Left, MIN, MAX, LEDGE);
        let sensor = Vec2::new(6.0, 1.0);
        let half = Vec2::new(0.1, 0.2);

        assert!(registry.try_grab(LedgeSide::Left, sensor, half, false, true).is_none());
        assert!(registry.try_grab(LedgeSide::Left, sensor, half, true, false).is_none());
        assert!(registry.try_grab(LedgeSide::Right, sensor, half, true, true).is_none());
        assert_eq!(registry.zones().len(), 1);
    }

    #[test]
    fn ground_exit_removes_its_zone() {
        let [a, b] = grounds();
        let mut registry = LedgeRegistry::default();
        registry.ground_entered(a, LedgeSide::Right, Vec2::ZERO, Vec2::ONE, LEDGE);
        registry.ground_entered(a, LedgeSide::Left, Vec2::ZERO, Vec2::ONE, LEDGE);
        registry.ground_entered(b, LedgeSide::Right, Vec2::ZERO, Vec2::ONE, LEDGE);

        // Another ground leaving leaves this one alone
        registry.ground_exited(b, LedgeSide::Left);
        assert_eq!(registry.zones().len(), 3);

        registry.ground_exited(a, LedgeSide::Right);
        assert_eq!(registry.zones().len(), 2);
        assert!(!registry
            .zones()
            .iter()
            .any(|zone| zone.ground == a && zone.side == LedgeSide::Right));
    }

    #[test]
    fn reentering_a_ground_keeps_one_zone() {
        let [a, b] = grounds();
        let mut registry = LedgeRegistry::default();
        registry.ground_entered(a, LedgeSide::Right, Vec2::ZERO, Vec2::ONE, LEDGE);
        registry.ground_entered(a, LedgeSide::Right, Vec2::ZERO, Vec2::ONE, LEDGE);
        assert_eq!(registry.zones().len(), 1);

        registry.ground_entered(b, LedgeSide::Right, Vec2::ZERO, Vec2::ONE, LEDGE);
        assert_eq!(registry.zones().len(), 2);
    }

    #[test]
    fn sync_contacts_reports_enter_and_exit() {
        let mut registry = LedgeRegistry::default();
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();

        let changes = registry.sync_contacts(LedgeSide::Right, vec![a]);
        assert_eq!(changes.entered, vec![a]);
        assert!(changes.exited.is_empty());

        let changes = registry.sync_contacts(LedgeSide::Right, vec![b]);
        assert_eq!(changes.entered, vec![b]);
        assert_eq!(changes.exited, vec![a]);

        let changes = registry.sync_contacts(LedgeSide::Left, vec![b]);
        assert_eq!(changes.entered, vec![b]);
        assert!(changes.exited.is_empty());
    }
}
