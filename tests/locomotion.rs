use std::time::Duration;

use avian3d::prelude::*;
use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy_platformer2d::player::ledge::resolve_ledge_grab;
use bevy_platformer2d::player::movement::{
    apply_movement, apply_velocity, integrate_drag, integrate_gravity, update_locomotion_state,
};
use bevy_platformer2d::player::resolver::resolve_input;
use bevy_platformer2d::player::{
    integrate_jump, LedgeGrabRequest, LedgeSide, PlayerStateBundle, RawInput,
};
use bevy_platformer2d::prelude::*;

const DT: f32 = 0.008;

fn test_world() -> World {
    let mut world = World::new();
    let mut time = Time::<()>::default();
    time.advance_by(Duration::from_millis(8));
    world.insert_resource(time);
    world
}

fn spawn_test_player(world: &mut World, config: PlayerConfig) -> Entity {
    world
        .spawn((
            Player,
            config,
            Abilities::new(true, true),
            PlayerStateBundle::default(),
            RigidBody::Dynamic,
            LinearVelocity::default(),
            Transform::from_xyz(0.0, 5.0, 0.0),
        ))
        .id()
}

#[test]
fn released_jump_is_a_short_hop() {
    let config = PlayerConfig::default();
    let grounded = ContactState {
        grounded: true,
        ..default()
    };
    let airborne = ContactState::default();

    let mut velocity = Vec3::ZERO;
    let mut grab = LedgeGrab::default();
    let mut intent = InputIntent {
        jump: true,
        ..default()
    };
    integrate_jump(&mut velocity, &mut intent, &grounded, &mut grab, &config);
    assert_eq!(velocity.y, 35.0);

    // A few steps of rising before the button comes up
    for _ in 0..5 {
        integrate_gravity(&mut velocity, &airborne, &config, DT);
    }
    assert!(velocity.y > config.short_jump_velocity);

    intent.jump_cancel = true;
    integrate_jump(&mut velocity, &mut intent, &airborne, &mut grab, &config);
    assert_eq!(velocity.y, config.short_jump_velocity);
}

#[test]
fn wall_slide_fall_settles_at_slide_terminal() {
    let config = PlayerConfig {
        uses_wall_slide: true,
        ..default()
    };
    let sliding = ContactState {
        wall_slide: true,
        wall_on_right: true,
        ..default()
    };
    let mut velocity = Vec3::ZERO;

    for _ in 0..100 {
        integrate_gravity(&mut velocity, &sliding, &config, DT);
        assert!(velocity.y >= config.wall_slide_terminal_velocity);
    }
    assert_eq!(velocity.y, config.wall_slide_terminal_velocity);
}

#[test]
fn landing_without_input_stops_horizontal_motion() {
    let config = PlayerConfig::default();
    let grounded = ContactState {
        grounded: true,
        ..default()
    };
    let mut velocity = Vec3::new(10.0, -30.0, 0.0);

    // 10 / (60 * 0.008) is just under 21 steps
    for _ in 0..21 {
        integrate_gravity(&mut velocity, &grounded, &config, DT);
        integrate_drag(&mut velocity, &grounded, &InputIntent::default(), &config, DT);
    }
    assert_eq!(velocity, Vec3::ZERO);
}

#[test]
fn pending_grab_hangs_player_from_corner() {
    let mut world = test_world();
    let config = PlayerConfig::default();
    let player = spawn_test_player(&mut world, config);
    world.entity_mut(player).insert(LedgeGrab {
        pending: Some(LedgeGrabRequest {
            corner: Vec2::new(4.0, 3.0),
            side: LedgeSide::Right,
        }),
        grabbing: false,
        side: None,
    });

    world.run_system_once(resolve_ledge_grab).unwrap();
    world.run_system_once(update_locomotion_state).unwrap();
    world.run_system_once(apply_velocity).unwrap();

    let entity = world.entity(player);
    let grab = entity.get::<LedgeGrab>().unwrap();
    assert!(grab.grabbing);
    assert!(grab.pending.is_none());
    assert!(grab.ledge_on_right());
    assert_eq!(entity.get::<RigidBody>(), Some(&RigidBody::Kinematic));
    assert_eq!(entity.get::<LocomotionState>(), Some(&LocomotionState::LedgeGrabbing));
    assert_eq!(entity.get::<LinearVelocity>().unwrap().0, Vec3::ZERO);

    // Right edge against the corner, top level with it
    let position = entity.get::<Transform>().unwrap().translation;
    let half = config.half_size();
    assert_eq!(position.x + half.x, 4.0);
    assert_eq!(position.y + half.y, 3.0);
}

#[test]
fn holding_down_drops_from_ledge() {
    let mut world = test_world();
    let player = spawn_test_player(&mut world, PlayerConfig::default());
    world.entity_mut(player).insert((
        LedgeGrab {
            pending: None,
            grabbing: true,
            side: Some(LedgeSide::Left),
        },
        RigidBody::Kinematic,
        InputIntent {
            down: true,
            ..default()
        },
    ));

    world.run_system_once(apply_movement).unwrap();
    world.run_system_once(update_locomotion_state).unwrap();

    let entity = world.entity(player);
    assert!(!entity.get::<LedgeGrab>().unwrap().grabbing);
    assert_eq!(entity.get::<RigidBody>(), Some(&RigidBody::Dynamic));
    assert_eq!(entity.get::<LocomotionState>(), Some(&LocomotionState::Airborne));
    assert!(entity.get::<LookIntent>().unwrap().down);
}

#[test]
fn blocked_input_yields_empty_intent() {
    let mut world = test_world();
    let player = spawn_test_player(&mut world, PlayerConfig::default());
    world.entity_mut(player).insert((
        InputBlocked,
        ContactState {
            grounded: true,
            ..default()
        },
        RawInput {
            axis: Vec2::X,
            jump_pressed: true,
            jump_held: true,
            ..default()
        },
    ));

    world.run_system_once(resolve_input).unwrap();

    let entity = world.entity(player);
    assert_eq!(entity.get::<InputIntent>(), Some(&InputIntent::default()));
    assert!(!entity.get::<RawInput>().unwrap().jump_pressed);
}

#[test]
fn resolved_jump_latches_until_the_fixed_step() {
    let mut world = test_world();
    let player = spawn_test_player(&mut world, PlayerConfig::default());
    world.entity_mut(player).insert((
        ContactState {
            grounded: true,
            ..default()
        },
        RawInput {
            jump_pressed: true,
            jump_held: true,
            ..default()
        },
    ));

    world.run_system_once(resolve_input).unwrap();
    // A second frame with no new press keeps the latch
    world.run_system_once(resolve_input).unwrap();

    assert!(world.entity(player).get::<InputIntent>().unwrap().jump);
}
