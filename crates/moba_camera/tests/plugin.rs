use std::{f32::consts::FRAC_1_SQRT_2, time::Duration};

use bevy::{input::mouse::MouseMotion, prelude::*};
use moba_camera::prelude::*;

const FRAME: Duration = Duration::from_millis(20);

fn app() -> App {
    let mut app = App::new();
    app.init_resource::<Time>()
        .init_resource::<Touches>()
        .init_resource::<ButtonInput<MouseButton>>()
        .add_event::<MouseMotion>()
        .insert_resource(TouchInputConfig {
            mode: InputMode::Mouse,
            ..default()
        })
        .add_plugins(MobaCameraPlugin);
    app
}

fn step(app: &mut App) {
    app.world_mut().resource_mut::<Time>().advance_by(FRAME);
    app.update();
}

struct Rig {
    controller: Entity,
    pivot: Entity,
    offset: Entity,
    camera: Entity,
}

fn spawn_rig(app: &mut App, pivot_at: Vec3, settings: MobaCameraSettings) -> Rig {
    let world = app.world_mut();
    let pivot = world.spawn(Transform::from_translation(pivot_at)).id();
    let offset = world.spawn(Transform::IDENTITY).id();
    let camera = world.spawn(Transform::IDENTITY).id();
    let controller = world
        .spawn(MobaCameraBundle::new(MobaCameraRig::new(pivot, offset, camera), settings))
        .id();
    Rig {
        controller,
        pivot,
        offset,
        camera,
    }
}

fn translation(app: &App, entity: Entity) -> Vec3 {
    app.world().get::<Transform>(entity).map(|t| t.translation).unwrap_or(Vec3::NAN)
}

fn controller(app: &App, entity: Entity) -> &MobaCamera {
    app.world().get::<MobaCamera>(entity).unwrap()
}

#[test]
fn missing_nodes_disable_the_controller() {
    let mut app = app();
    let pivot = app.world_mut().spawn(Transform::IDENTITY).id();
    let rig = MobaCameraRig {
        pivot: Some(pivot),
        ..default()
    };
    let entity = app
        .world_mut()
        .spawn(MobaCameraBundle::new(rig, MobaCameraSettings::default()))
        .id();

    step(&mut app);
    assert!(!controller(&app, entity).is_enabled());
    assert_eq!(translation(&app, pivot), Vec3::ZERO);
}

#[test]
fn node_without_transform_disables_the_controller() {
    let mut app = app();
    let pivot = app.world_mut().spawn(Transform::IDENTITY).id();
    let offset = app.world_mut().spawn(Transform::IDENTITY).id();
    let bare = app.world_mut().spawn_empty().id();
    let entity = app
        .world_mut()
        .spawn(MobaCameraBundle::new(
            MobaCameraRig::new(pivot, offset, bare),
            MobaCameraSettings::default(),
        ))
        .id();

    step(&mut app);
    assert!(!controller(&app, entity).is_enabled());
}

#[test]
fn first_frame_lays_out_the_rig() {
    let mut app = app();
    let rig = spawn_rig(&mut app, Vec3::new(3.0, 5.0, 0.0), MobaCameraSettings::default());

    step(&mut app);

    assert!(controller(&app, rig.controller).is_enabled());
    assert_eq!(translation(&app, rig.pivot), Vec3::new(3.0, 0.0, 0.0));
    let offset = translation(&app, rig.offset);
    let expected = Vec3::new(3.0, 15.0 * FRAC_1_SQRT_2, 15.0 * FRAC_1_SQRT_2);
    assert!(offset.distance(expected) < 1e-4, "{offset}");
    assert_eq!(translation(&app, rig.camera), Vec3::ZERO);
}

#[test]
fn left_drag_pans_against_the_mouse() {
    let mut app = app();
    let rig = spawn_rig(&mut app, Vec3::ZERO, MobaCameraSettings::default());
    step(&mut app);

    app.world_mut().resource_mut::<ButtonInput<MouseButton>>().press(MouseButton::Left);
    step(&mut app);
    assert_eq!(translation(&app, rig.camera), Vec3::ZERO);

    app.world_mut().resource_mut::<ButtonInput<MouseButton>>().clear();
    app.world_mut().send_event(MouseMotion {
        delta: Vec2::new(10.0, 0.0),
    });
    step(&mut app);

    // unit direction * zoom level 1 * movement rate 0.5 * 20ms
    let moved = translation(&app, rig.camera);
    assert!(moved.distance(Vec3::new(-0.01, 0.0, 0.0)) < 1e-5, "{moved}");

    // holding still does not keep sliding
    step(&mut app);
    assert_eq!(translation(&app, rig.camera), moved);
}

#[test]
fn boundaries_pull_the_pivot_back() {
    let mut app = app();
    app.world_mut().spawn((
        CameraBoundary::Box {
            half_extents: Vec3::splat(2.0),
        },
        GlobalTransform::IDENTITY,
    ));
    let settings = MobaCameraSettings {
        use_boundaries: true,
        ..default()
    };
    let rig = spawn_rig(&mut app, Vec3::new(10.0, 0.0, 0.0), settings);

    step(&mut app);

    assert_eq!(translation(&app, rig.pivot), Vec3::new(2.0, 0.0, 0.0));
    assert!((translation(&app, rig.offset).x - 2.0).abs() < 1e-4);
}

#[test]
fn boundaries_are_ignored_when_disabled() {
    let mut app = app();
    app.world_mut().spawn((
        CameraBoundary::Sphere { radius: 1.0 },
        GlobalTransform::IDENTITY,
    ));
    let rig = spawn_rig(&mut app, Vec3::new(10.0, 0.0, 0.0), MobaCameraSettings::default());

    step(&mut app);
    assert_eq!(translation(&app, rig.pivot), Vec3::new(10.0, 0.0, 0.0));
}

#[test]
fn locked_camera_eases_toward_its_target() {
    let mut app = app();
    let target = app
        .world_mut()
        .spawn(GlobalTransform::from_translation(Vec3::new(10.0, 0.0, 0.0)))
        .id();
    let mut settings = MobaCameraSettings {
        camera_locked: true,
        ..default()
    };
    settings.set_lock_target(Some(target));
    let rig = spawn_rig(&mut app, Vec3::ZERO, settings);

    step(&mut app);
    assert!((translation(&app, rig.pivot).x - 1.0).abs() < 1e-4);

    step(&mut app);
    assert!((translation(&app, rig.pivot).x - 1.9).abs() < 1e-4);
}

#[test]
fn inverted_zoom_range_is_written_back() {
    let mut app = app();
    let mut settings = MobaCameraSettings::default();
    settings.zoom.min_zoom = 30.0;
    settings.zoom.max_zoom = 5.0;
    let rig = spawn_rig(&mut app, Vec3::ZERO, settings);

    step(&mut app);

    let settings = app.world().get::<MobaCameraSettings>(rig.controller).unwrap();
    assert_eq!(settings.zoom.max_zoom, 31.0);
    assert_eq!(controller(&app, rig.controller).current_zoom(), 15.0);
}
