use avian3d::prelude::*;
use bevy::prelude::*;

use crate::physics::GameLayer;

/// Marks an entity that kill areas are allowed to kill
#[derive(Component, Default)]
pub struct Killable;

/// Asks a killable entity to die. Whatever owns the entity decides what dying means.
#[derive(EntityEvent, Debug, Clone, Copy)]
pub struct Kill {
    pub entity: Entity,
}

/// Volume that kills [`Killable`] entities on entry, or on exit with `kill_on_exit`.
///
/// Needs a `Collider` on the same entity, usually a `Sensor` on [`GameLayer::Trigger`].
#[derive(Component, Debug, Default)]
pub struct KillArea {
    pub kill_on_exit: bool,
    overlapping: Vec<Entity>,
}

impl KillArea {
    pub fn new(kill_on_exit: bool) -> Self {
        Self {
            kill_on_exit,
            overlapping: Vec::new(),
        }
    }

    /// Stores the new overlap set and returns the entities that should die
    pub fn update_overlaps(&mut self, current: Vec<Entity>) -> Vec<Entity> {
        let previous = std::mem::replace(&mut self.overlapping, current);
        if self.kill_on_exit {
            previous
                .into_iter()
                .filter(|e| !self.overlapping.contains(e))
                .collect()
        } else {
            self.overlapping
                .iter()
                .filter(|e| !previous.contains(*e))
                .copied()
                .collect()
        }
    }
}

/// Overlap-tests every kill area and triggers [`Kill`] on entering or exiting victims
pub fn detect_kill_area_contacts(
    mut commands: Commands,
    spatial_query: SpatialQuery,
    mut areas: Query<(Entity, &Collider, &Transform, &mut KillArea)>,
    killables: Query<(), With<Killable>>,
) {
    for (area_entity, collider, transform, mut area) in &mut areas {
        let filter = SpatialQueryFilter::default()
            .with_mask([GameLayer::Player, GameLayer::Default])
            .with_excluded_entities([area_entity]);

        let current: Vec<Entity> = spatial_query
            .shape_intersections(collider, transform.translation, transform.rotation, &filter)
            .into_iter()
            .filter(|e| killables.contains(*e))
            .collect();

        for entity in area.update_overlaps(current) {
            info!("Kill area {} killed {}", area_entity, entity);
            commands.trigger(Kill { entity });
        }
    }
}

pub struct HazardPlugin;

impl Plugin for HazardPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, detect_kill_area_contacts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kills_on_entry_only_once() {
        let mut world = World::new();
        let victim = world.spawn_empty().id();
        let mut area = KillArea::new(false);

        assert_eq!(area.update_overlaps(vec![victim]), vec![victim]);
        assert!(area.update_overlaps(vec![victim]).is_empty());
        assert!(area.update_overlaps(vec![]).is_empty());
    }

    #[test]
    fn kill_on_exit_waits_for_leaving() {
        let mut world = World::new();
        let victim = world.spawn_empty().id();
        let mut area = KillArea::new(true);

        assert!(area.update_overlaps(vec![victim]).is_empty());
        assert!(area.update_overlaps(vec![victim]).is_empty());
        assert_eq!(area.update_overlaps(vec![]), vec![victim]);
    }
}
