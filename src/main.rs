use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_platformer2d::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "2D Platformer".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(SettingsPlugin::from_file("assets/platformer.toml"))
        .add_plugins(PlatformerPlugin)
        .add_systems(Startup, spawn_level)
        .add_systems(Update, menu_keys)
        .run();
}

fn spawn_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let ground = materials.add(Color::srgb(0.35, 0.45, 0.3));
    let wall = materials.add(Color::srgb(0.45, 0.4, 0.35));
    let bound = materials.add(Color::srgba(0.2, 0.2, 0.6, 0.3));

    // Floor and platforms
    let solids = [
        (Vec2::new(60.0, 2.0), Vec2::new(0.0, -1.0), Surface::Ground),
        (Vec2::new(6.0, 1.0), Vec2::new(8.0, 4.0), Surface::Ground),
        (Vec2::new(6.0, 1.0), Vec2::new(-9.0, 7.0), Surface::Ground),
        (Vec2::new(4.0, 8.0), Vec2::new(18.0, 4.0), Surface::Ground),
        (Vec2::new(1.0, 14.0), Vec2::new(-16.0, 9.0), Surface::Wall),
    ];
    for (size, position, surface) in solids {
        let material = if surface == Surface::Wall { wall.clone() } else { ground.clone() };
        spawn_block(&mut commands, &mut meshes, material, size, position, surface);
    }

    // Level bounds
    let bounds = [
        (Vec2::new(2.0, 60.0), Vec2::new(31.0, 20.0), BoundSide::Right),
        (Vec2::new(2.0, 60.0), Vec2::new(-31.0, 20.0), BoundSide::Left),
        (Vec2::new(64.0, 2.0), Vec2::new(0.0, 49.0), BoundSide::Upper),
        (Vec2::new(64.0, 2.0), Vec2::new(0.0, -3.0), BoundSide::Bottom),
    ];
    for (size, position, side) in bounds {
        let surface = Surface::Bound(side);
        spawn_block(&mut commands, &mut meshes, bound.clone(), size, position, surface);
    }

    // Pit that kills on entry
    commands.spawn((
        Transform::from_xyz(24.0, 1.0, 0.0),
        RigidBody::Static,
        Collider::cuboid(6.0, 2.0, 2.0),
        Sensor,
        GameLayer::trigger(),
        KillArea::new(false),
    ));

    // Walking onto the tall platform switches the camera to screen-by-screen
    commands.spawn((
        Transform::from_xyz(18.0, 10.0, 0.0),
        RigidBody::Static,
        Collider::cuboid(4.0, 4.0, 2.0),
        Sensor,
        GameLayer::trigger(),
        CameraModeZone::new(CameraMode::Level),
    ));
    commands.spawn((
        Transform::from_xyz(0.0, 2.0, 0.0),
        RigidBody::Static,
        Collider::cuboid(4.0, 4.0, 2.0),
        Sensor,
        GameLayer::trigger(),
        CameraModeZone::new(CameraMode::Damp),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            ..default()
        },
        Transform::from_xyz(10.0, 20.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn spawn_block(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    size: Vec2,
    position: Vec2,
    surface: Surface,
) {
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(size.x, size.y, 1.0))),
        MeshMaterial3d(material),
        Transform::from_translation(position.extend(0.0)),
        RigidBody::Static,
        Collider::cuboid(size.x, size.y, 1.0),
        GameLayer::world(),
        surface,
    ));
}

/// Number keys stand in for the menu buttons
fn menu_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut players: Query<&mut Abilities, With<Player>>,
    mut cameras: Query<&mut FollowSettings, With<FollowCamera>>,
) {
    for mut abilities in &mut players {
        if keyboard.just_pressed(KeyCode::Digit1) {
            abilities.toggle_run();
        }
        if keyboard.just_pressed(KeyCode::Digit2) {
            abilities.toggle_double_jump();
        }
    }

    for mut settings in &mut cameras {
        if keyboard.just_pressed(KeyCode::Digit3) {
            settings.toggle_follow();
        }
        if keyboard.just_pressed(KeyCode::Digit4) {
            settings.toggle_follow_x();
        }
        if keyboard.just_pressed(KeyCode::Digit5) {
            settings.toggle_follow_y();
        }
        if keyboard.just_pressed(KeyCode::Digit6) {
            settings.damp_xy();
        }
        if keyboard.just_pressed(KeyCode::Digit7) {
            settings.level_xy();
        }
    }
}
