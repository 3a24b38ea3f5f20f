//! Touch or mouse driven MOBA camera over a small arena.
//!
//! Drag to pan, pinch to zoom, twist two fingers to orbit. Holding still on a pillar flies to it and
//! `L` toggles following the orbiting hero. Pass a TOML settings file as the first argument to
//! override the defaults.

use std::path::Path;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use moba_camera::prelude::*;

#[derive(Component)]
struct Hero;

fn main() {
    let settings = std::env::args()
        .nth(1)
        .map(|path| {
            MobaCameraSettings::load(Path::new(&path)).unwrap_or_else(|err| {
                eprintln!("{err}, using defaults");
                arena_settings()
            })
        })
        .unwrap_or_else(arena_settings);

    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins(MobaCameraPlugin)
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 300.0,
        })
        .insert_resource(DemoSettings(settings))
        .add_systems(Startup, setup)
        .add_systems(Update, (move_hero, toggle_lock, log_selections))
        .run();
}

#[derive(Resource)]
struct DemoSettings(MobaCameraSettings);

/// high enough above the altitude floor that hold-to-focus has room to fly
fn arena_settings() -> MobaCameraSettings {
    let mut settings = MobaCameraSettings::default();
    settings.zoom.default_zoom = 35.0;
    settings.zoom.max_zoom = 45.0;
    settings.selection.rotation_center = Vec3::ZERO;
    settings
}

fn setup(
    mut commands: Commands,
    demo: Res<DemoSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // floor
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Plane3d::default().mesh().size(60.0, 60.0)),
            material: materials.add(Color::srgb(0.3, 0.5, 0.3)),
            ..default()
        },
        Collider::cuboid(30.0, 0.05, 30.0),
        InterestLayer::Floor.collision_groups(),
    ));

    // pillars to fly to
    let pillar = meshes.add(Cuboid::new(1.0, 4.0, 1.0));
    let pillar_material = materials.add(Color::srgb(0.8, 0.7, 0.3));
    for position in [Vec3::new(-12.0, 2.0, -8.0), Vec3::new(10.0, 2.0, -14.0), Vec3::new(6.0, 2.0, 9.0)] {
        commands.spawn((
            PbrBundle {
                mesh: pillar.clone(),
                material: pillar_material.clone(),
                transform: Transform::from_translation(position),
                ..default()
            },
            Collider::cuboid(0.5, 2.0, 0.5),
            InterestLayer::PointOfInterest.collision_groups(),
        ));
    }

    let hero = commands
        .spawn((
            Hero,
            PbrBundle {
                mesh: meshes.add(Sphere::new(0.5)),
                material: materials.add(Color::srgb(0.2, 0.3, 0.9)),
                transform: Transform::from_xyz(8.0, 0.5, 0.0),
                ..default()
            },
        ))
        .id();

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        transform: Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    // camera rig: pivot and offset at the root, camera under the offset
    let pivot = commands.spawn((Name::new("pivot"), SpatialBundle::default())).id();
    let camera = commands.spawn(Camera3dBundle::default()).id();
    let offset = commands
        .spawn((Name::new("offset"), SpatialBundle::default()))
        .add_child(camera)
        .id();

    let mut settings = demo.0.clone();
    settings.set_lock_target(Some(hero));
    commands.spawn((
        Name::new("moba camera"),
        MobaCameraBundle::new(MobaCameraRig::new(pivot, offset, camera), settings),
    ));
}

fn move_hero(time: Res<Time>, mut heroes: Query<&mut Transform, With<Hero>>) {
    let t = time.elapsed_seconds() * 0.3;
    for mut transform in &mut heroes {
        transform.translation = Vec3::new(t.cos() * 8.0, 0.5, t.sin() * 8.0);
    }
}

fn toggle_lock(keys: Res<ButtonInput<KeyCode>>, mut cameras: Query<&mut MobaCameraSettings>) {
    if !keys.just_pressed(KeyCode::KeyL) {
        return;
    }
    for mut settings in &mut cameras {
        settings.camera_locked = !settings.camera_locked;
        info!("camera locked: {}", settings.camera_locked);
    }
}

fn log_selections(mut events: EventReader<PointOfInterestSelected>) {
    for event in events.read() {
        info!("flying to {}", event.position);
    }
}
