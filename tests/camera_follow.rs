use std::time::Duration;

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy_platformer2d::camera::{follow_target, FollowState};
use bevy_platformer2d::prelude::*;

const FRAME: Duration = Duration::from_millis(16);

fn test_world() -> World {
    let mut world = World::new();
    world.insert_resource(Time::<()>::default());
    world
}

/// Orthographic projection with a 20 x 10 view
fn projection() -> Projection {
    Projection::Orthographic(OrthographicProjection {
        area: Rect::new(-10.0, -5.0, 10.0, 5.0),
        ..OrthographicProjection::default_3d()
    })
}

fn spawn_camera(world: &mut World, target: Entity, at: Vec2, settings: FollowSettings) -> Entity {
    world
        .spawn((
            FollowCamera { target },
            CameraFollowConfig::default(),
            settings,
            FollowState::default(),
            LookOffset::default(),
            CameraBounds::default(),
            projection(),
            Transform::from_translation(at.extend(30.0)),
        ))
        .id()
}

fn step(world: &mut World) {
    world.resource_mut::<Time>().advance_by(FRAME);
    world.run_system_once(follow_target).unwrap();
}

fn camera_position(world: &World, camera: Entity) -> Vec2 {
    world.entity(camera).get::<Transform>().unwrap().translation.truncate()
}

fn direct() -> FollowSettings {
    FollowSettings {
        strategy_x: FollowStrategy::DirectFollow,
        strategy_y: FollowStrategy::DirectFollow,
        ..default()
    }
}

#[test]
fn direct_follow_tracks_target_exactly() {
    let mut world = test_world();
    let target = world
        .spawn((Transform::from_xyz(7.0, -3.0, 0.0), LookIntent::default()))
        .id();
    let camera = spawn_camera(&mut world, target, Vec2::ZERO, direct());

    step(&mut world);
    assert_eq!(camera_position(&world, camera), Vec2::new(7.0, -3.0));
    assert_eq!(world.entity(camera).get::<Transform>().unwrap().translation.z, 30.0);
}

#[test]
fn unchanged_position_is_not_rewritten() {
    let mut world = test_world();
    let target = world.spawn(Transform::from_xyz(2.0, 1.0, 0.0)).id();
    let camera = spawn_camera(&mut world, target, Vec2::ZERO, direct());

    step(&mut world);
    world.entity_mut(camera).get_mut::<Transform>().unwrap().translation.x = 100.0;

    // Same destination as last frame, so the transform is left alone
    step(&mut world);
    assert_eq!(camera_position(&world, camera).x, 100.0);
}

#[test]
fn smooth_damp_closes_in_on_target() {
    let mut world = test_world();
    let target = world.spawn(Transform::from_xyz(10.0, 0.0, 0.0)).id();
    let camera = spawn_camera(&mut world, target, Vec2::ZERO, FollowSettings::default());

    // Default damp times are a fraction of a frame: one step nearly arrives
    step(&mut world);
    let first = camera_position(&world, camera).x;
    assert!(first > 9.9 && first < 10.0);

    for _ in 0..10 {
        step(&mut world);
    }
    assert!((camera_position(&world, camera).x - 10.0).abs() < 1e-3);
}

#[test]
fn level_system_frames_whole_screens() {
    let mut world = test_world();
    // View is 20 wide: x = 30 sits in level 2, centered on 40
    let target = world.spawn(Transform::from_xyz(30.0, 0.0, 0.0)).id();
    let settings = FollowSettings {
        strategy_x: FollowStrategy::LevelSystem,
        follow_y: false,
        ..default()
    };
    let camera = spawn_camera(&mut world, target, Vec2::ZERO, settings);

    for _ in 0..120 {
        step(&mut world);
    }
    let position = camera_position(&world, camera);
    assert!((position.x - 40.0).abs() < 1e-2);
    assert_eq!(position.y, 0.0);
}

#[test]
fn right_bound_stops_the_view_edge() {
    let mut world = test_world();
    let target = world.spawn(Transform::from_xyz(60.0, 0.0, 0.0)).id();
    let camera = spawn_camera(&mut world, target, Vec2::new(25.0, 0.0), FollowSettings::default());
    world
        .entity_mut(camera)
        .get_mut::<CameraBounds>()
        .unwrap()
        .enter(BoundSide::Right, 40.0);

    for _ in 0..60 {
        step(&mut world);
    }
    // 40 minus half the 20-wide view
    assert_eq!(camera_position(&world, camera).x, 30.0);
}

#[test]
fn follow_off_freezes_camera() {
    let mut world = test_world();
    let target = world.spawn(Transform::from_xyz(10.0, 10.0, 0.0)).id();
    let settings = FollowSettings {
        follow: false,
        ..default()
    };
    let camera = spawn_camera(&mut world, target, Vec2::ZERO, settings);

    step(&mut world);
    assert_eq!(camera_position(&world, camera), Vec2::ZERO);
}

#[test]
fn look_intent_shifts_direct_follow() {
    let mut world = test_world();
    let target = world
        .spawn((
            Transform::from_xyz(0.0, 0.0, 0.0),
            LookIntent {
                right: true,
                ..default()
            },
        ))
        .id();
    let camera = spawn_camera(&mut world, target, Vec2::ZERO, direct());

    for _ in 0..60 {
        step(&mut world);
    }
    assert_eq!(camera_position(&world, camera).x, CameraFollowConfig::default().look_offset.x);
}
