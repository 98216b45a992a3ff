use std::fmt;

use avian3d::prelude::*;
use bevy::camera::ScalingMode;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::contact::sense_contacts;
use super::input::{
    handle_crouch_end, handle_crouch_start, handle_jump_end, handle_jump_start, handle_move_end,
    handle_move_input, handle_run_end, handle_run_start, CrouchAction, InputIntent, JumpAction,
    MoveAction, RawInput, RunAction,
};
use super::jump::apply_jump;
use super::ledge::{resolve_ledge_grab, track_ledges, LedgeRegistry};
use super::life::{on_player_killed, tick_respawn, PlayerKilled, PlayerRespawned};
use super::movement::*;
use super::resolver::{resolve_input, InputResolver};
use super::state::*;
use crate::camera::{CameraBounds, FollowCamera, FollowState, LookOffset};
use crate::hazard::Killable;
use crate::physics::GameLayer;
use crate::settings::PlatformerSettings;

/// Plugin for the 2D platformer player controller
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EnhancedInputPlugin);

        // Register input context for player
        app.add_input_context::<Player>();

        app.add_message::<PlayerKilled>();
        app.add_message::<PlayerRespawned>();

        // Input observers
        app.add_observer(handle_move_input);
        app.add_observer(handle_move_end);
        app.add_observer(handle_run_start);
        app.add_observer(handle_run_end);
        app.add_observer(handle_crouch_start);
        app.add_observer(handle_crouch_end);
        app.add_observer(handle_jump_start);
        app.add_observer(handle_jump_end);

        app.add_observer(on_player_killed);

        app.add_systems(Startup, spawn_player);
        app.add_systems(PostStartup, validate_player_setup);

        app.add_systems(Update, (resolve_input, tick_respawn));

        // Fixed update systems for physics
        app.add_systems(
            FixedUpdate,
            (
                read_body_velocity,
                sense_contacts,
                track_ledges,
                apply_gravity,
                apply_drag,
                apply_movement,
                apply_jump,
                resolve_ledge_grab,
                update_locomotion_state,
                apply_velocity,
            )
                .chain(),
        );
    }
}

/// Components every player needs besides the ones it is spawned with
#[derive(Bundle, Default)]
pub struct PlayerStateBundle {
    pub velocity: PlayerVelocity,
    pub raw_input: RawInput,
    pub resolver: InputResolver,
    pub intent: InputIntent,
    pub contact: ContactState,
    pub ledge_grab: LedgeGrab,
    pub ledge_registry: LedgeRegistry,
    pub look: LookIntent,
    pub state: LocomotionState,
}

/// Spawns the player and a camera following it
pub fn spawn_player(mut commands: Commands, settings: Res<PlatformerSettings>) {
    let config = settings.player;
    let spawn = settings.spawn_position;

    let player = commands
        .spawn((
            Player,
            config,
            settings.abilities,
            SpawnPoint(spawn),
            Killable,
            PlayerStateBundle::default(),
        ))
        .insert((
            // Kinematic-style control on a dynamic body; the controller owns velocity
            RigidBody::Dynamic,
            Collider::cuboid(config.size.x, config.size.y, config.size.x),
            CollisionLayers::new(GameLayer::Player, [GameLayer::World, GameLayer::Trigger]),
            LockedAxes::ROTATION_LOCKED.lock_translation_z(),
            LinearVelocity::default(),
            TranslationInterpolation,
            Friction::new(0.0),
            Restitution::new(0.0),
            GravityScale(0.0),
        ))
        .insert((Transform::from_translation(spawn), Visibility::default()))
        .insert(
            // Input bindings
            actions!(Player[
                (
                    Action::<MoveAction>::new(),
                    bindings![
                        (KeyCode::KeyW, SwizzleAxis::YXZ),
                        (KeyCode::KeyS, SwizzleAxis::YXZ, Negate::all()),
                        KeyCode::KeyD,
                        (KeyCode::KeyA, Negate::all()),
                        (KeyCode::ArrowUp, SwizzleAxis::YXZ),
                        (KeyCode::ArrowDown, SwizzleAxis::YXZ, Negate::all()),
                        KeyCode::ArrowRight,
                        (KeyCode::ArrowLeft, Negate::all()),
                    ],
                ),
                (
                    Action::<JumpAction>::new(),
                    bindings![KeyCode::Space, GamepadButton::South],
                ),
                (
                    Action::<RunAction>::new(),
                    bindings![KeyCode::ShiftLeft, GamepadButton::LeftTrigger],
                ),
                (
                    Action::<CrouchAction>::new(),
                    bindings![KeyCode::ControlLeft, GamepadButton::RightThumb],
                ),
            ]),
        )
        .id();

    commands.spawn((
        Camera3d::default(),
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: settings.view_height,
            },
            ..OrthographicProjection::default_3d()
        }),
        Transform::from_xyz(spawn.x, spawn.y, spawn.z + settings.camera_distance)
            .looking_to(Vec3::NEG_Z, Vec3::Y),
        FollowCamera { target: player },
        settings.camera,
        settings.follow,
        FollowState::default(),
        LookOffset::new(settings.camera.origin_offset),
        CameraBounds::default(),
    ));

    info!("Spawned player {} at {}", player, spawn);
}

/// A player entity that is missing something the controller relies on
#[derive(Debug)]
pub enum SetupError {
    MissingCollider(Entity),
    MissingRigidBody(Entity),
    MissingConfig(Entity),
    MissingState(Entity),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::MissingCollider(e) => write!(f, "player {e} has no Collider"),
            SetupError::MissingRigidBody(e) => write!(f, "player {e} has no RigidBody"),
            SetupError::MissingConfig(e) => write!(f, "player {e} has no PlayerConfig"),
            SetupError::MissingState(e) => {
                write!(f, "player {e} is missing controller state components")
            }
        }
    }
}

impl std::error::Error for SetupError {}

/// Fails startup if a player was spawned without its companion components
pub fn validate_player_setup(
    players: Query<
        (
            Entity,
            Has<Collider>,
            Has<RigidBody>,
            Has<PlayerConfig>,
            Has<ContactState>,
            Has<InputIntent>,
            Has<LedgeGrab>,
        ),
        With<Player>,
    >,
) -> Result {
    for (entity, collider, body, config, contact, intent, grab) in &players {
        if !collider {
            return Err(SetupError::MissingCollider(entity).into());
        }
        if !body {
            return Err(SetupError::MissingRigidBody(entity).into());
        }
        if !config {
            return Err(SetupError::MissingConfig(entity).into());
        }
        if !(contact && intent && grab) {
            return Err(SetupError::MissingState(entity).into());
        }
    }
    Ok(())
}
