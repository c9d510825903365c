use cgmath::{InnerSpace, Point3, Vector3};
use glint::{
    config::AppConfig,
    gfx::camera::{Camera, CameraManager, CameraOptions, FlyController, Projection},
    gfx::scene::Scene,
    ui::Controls,
};

const EPSILON: f32 = 1e-5;

fn assert_vec_near(actual: Vector3<f32>, expected: Vector3<f32>) {
    assert!(
        (actual - expected).magnitude() < EPSILON,
        "{:?} is not close to {:?}",
        actual,
        expected
    );
}

#[test]
fn camera_walkthrough() {
    let mut camera = Camera::new(CameraOptions {
        position: Point3::new(0.0, 0.0, -5.0),
        ..CameraOptions::default()
    });
    assert_vec_near(camera.front(), Vector3::new(0.0, 0.0, 1.0));

    camera.move_to(Point3::new(1.0, 2.0, 3.0));
    assert_eq!(camera.position(), Point3::new(1.0, 2.0, 3.0));

    camera.zoom(10.0);
    assert_eq!(camera.fov(), 35.0);

    camera.zoom(1000.0);
    assert_eq!(camera.fov(), 1.0);
    camera.zoom(-1000.0);
    assert_eq!(camera.fov(), 90.0);

    camera.rotate(0.0, 1000.0);
    assert_eq!(camera.pitch(), 89.9);
    camera.rotate(0.0, -1000.0);
    assert_eq!(camera.pitch(), -89.9);
}

#[test]
fn moving_there_and_back_restores_position() {
    let mut camera = Camera::default();
    let start = camera.position();
    let offset = Vector3::new(0.3, -1.7, 2.25);

    camera.move_by(offset);
    camera.move_by(-offset);

    assert_vec_near(camera.position() - start, Vector3::new(0.0, 0.0, 0.0));
}

#[test]
fn looking_straight_ahead_keeps_front() {
    let mut camera = Camera::new(CameraOptions {
        position: Point3::new(2.0, 1.0, -3.0),
        ..CameraOptions::default()
    });
    let target = camera.position() + Vector3::new(0.0, 0.0, 1.0);

    camera.look_at(target);

    assert_vec_near(camera.front(), Vector3::new(0.0, 0.0, 1.0));
}

#[test]
fn configured_scene_animates_without_a_gpu() {
    let config: AppConfig = toml::from_str(
        r#"
        [camera]
        position = [0.0, 0.0, -5.0]

        [controls]
        movement_speed = 8.0
        "#,
    )
    .unwrap();

    let camera = Camera::new(config.camera.to_options());
    let controller = config.controls.to_controller(Point3::new(0.0, 0.0, 0.0));
    let projection = config.projection.to_projection(800, 600);
    let mut scene = Scene::new(CameraManager::new(camera, controller, projection));

    let controls = Controls::default();
    scene.update(0.0, &controls);
    scene.camera_manager.update(1.0 / 60.0);

    assert_eq!(scene.camera_manager.controller.movement_speed, 8.0);
    assert_eq!(scene.cubes().len(), 10);
    let light = scene.lights.points[0].position;
    assert!((light - Point3::new(10.0, 0.0, 0.0)).magnitude() < EPSILON);
    assert_eq!(
        scene.camera_manager.uniform.eye(),
        Point3::new(0.0, 0.0, -5.0)
    );
}

#[test]
fn config_survives_a_toml_round_trip() {
    let mut config = AppConfig::default();
    config.window.title = "Round trip".to_string();
    config.camera.fov = 70.0;
    config.controls.mouse_sensitivity = 0.25;
    config.scene.models = vec!["assets/cube.obj".into()];
    config.scene.look_at_target = [1.0, 0.0, -1.0];

    let text = toml::to_string(&config).unwrap();
    let parsed: AppConfig = toml::from_str(&text).unwrap();

    assert_eq!(parsed, config);

    let path = std::env::temp_dir().join("glint_round_trip.toml");
    std::fs::write(&path, &text).unwrap();
    assert_eq!(AppConfig::load(&path).unwrap(), config);
    assert_eq!(
        AppConfig::load_or_default(Some(&path)).unwrap().window.title,
        "Round trip"
    );
}

#[test]
fn fly_controller_defaults() {
    let controller = FlyController::default();
    assert_eq!(controller.movement_speed, 4.0);
    assert!((controller.mouse_sensitivity - 0.1).abs() < EPSILON);
    assert!(!controller.is_cursor_captured());
    let projection = Projection::new(800, 600, 0.1, 100.0);
    assert!((projection.aspect - 800.0 / 600.0).abs() < EPSILON);
}
