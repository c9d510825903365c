//! First-person camera driven by yaw and pitch angles.
//!
//! The camera keeps a world-space position plus two Euler angles (degrees) and
//! derives an orthonormal `front`/`right`/`up` basis from them after every
//! change of orientation. Pitch can be constrained to keep the view from
//! flipping over at the poles, and the field of view is clamped on zoom.

use std::f32::consts::FRAC_PI_2;

use cgmath::{InnerSpace, Matrix4, Point3, Vector3};

/// Construction parameters for a [`Camera`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOptions {
    /// Direction of up in the world.
    pub world_up: Vector3<f32>,
    pub position: Point3<f32>,
    pub yaw: f32,
    pub pitch: f32,
    /// Clamp pitch into `pitch_constraints` on every rotation.
    pub constrain_pitch: bool,
    /// Min and max pitch in degrees. Only used when `constrain_pitch` is set.
    pub pitch_constraints: [f32; 2],
    pub fov: f32,
    /// Min and max field of view in degrees.
    pub fov_constraints: [f32; 2],
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            world_up: Vector3::unit_y(),
            position: Point3::new(0.0, 0.0, 0.0),
            yaw: 0.0,
            pitch: 0.0,
            constrain_pitch: true,
            pitch_constraints: [-89.9, 89.9],
            fov: 45.0,
            fov_constraints: [1.0, 90.0],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    position: Point3<f32>,
    front: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
    world_up: Vector3<f32>,

    yaw: f32,
    pitch: f32,
    constrain_pitch: bool,
    pitch_constraints: [f32; 2],
    fov: f32,
    fov_constraints: [f32; 2],
}

impl Camera {
    /// Creates a camera and computes its basis right away.
    ///
    /// Angles and fov are taken as given; clamping only happens on later
    /// [`rotate`](Self::rotate) and [`zoom`](Self::zoom) calls.
    pub fn new(options: CameraOptions) -> Self {
        let mut camera = Self {
            position: options.position,
            front: Vector3::unit_z(),
            right: Vector3::unit_x(),
            up: options.world_up,
            world_up: options.world_up,
            yaw: options.yaw,
            pitch: options.pitch,
            constrain_pitch: options.constrain_pitch,
            pitch_constraints: options.pitch_constraints,
            fov: options.fov,
            fov_constraints: options.fov_constraints,
        };
        camera.update_vectors();
        log::debug!(
            "camera created, front {:.3} {:.3} {:.3}",
            camera.front.x,
            camera.front.y,
            camera.front.z
        );
        camera
    }

    /// Turns the camera. Positive `yaw` decreases the stored yaw angle.
    pub fn rotate(&mut self, yaw: f32, pitch: f32) {
        self.yaw -= yaw;
        self.pitch += pitch;
        if self.constrain_pitch {
            let [min, max] = self.pitch_constraints;
            if self.pitch > max {
                self.pitch = max;
            }
            if self.pitch < min {
                self.pitch = min;
            }
        }
        self.update_vectors();
    }

    /// Re-orients the camera towards `target`.
    ///
    /// Yaw values below 90 degrees are mirrored to `360 - yaw`; existing scenes
    /// rely on that mapping. Looking at the camera's own position has no
    /// direction and leaves the camera untouched.
    pub fn look_at(&mut self, target: Point3<f32>) {
        let offset = target - self.position;
        if offset.magnitude2() <= f32::MIN_POSITIVE {
            log::warn!("look_at target coincides with the camera position, ignoring");
            return;
        }

        let forward = offset.normalize();
        let yaw = (forward.z.atan2(forward.x) - FRAC_PI_2).to_degrees();
        self.yaw = if yaw < 90.0 { 360.0 - yaw } else { yaw };
        self.pitch = forward.y.asin().to_degrees();
        self.update_vectors();
    }

    pub fn move_by(&mut self, offset: Vector3<f32>) {
        self.position += offset;
    }

    pub fn move_to(&mut self, destination: Point3<f32>) {
        self.position = destination;
    }

    /// Narrows the field of view by `angle` degrees (negative widens it).
    pub fn zoom(&mut self, angle: f32) {
        self.fov -= angle;
        let [min, max] = self.fov_constraints;
        if self.fov < min {
            self.fov = min;
        }
        if self.fov > max {
            self.fov = max;
        }
    }

    /// Right-handed view matrix looking from `position` along `front`.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Recomputes `front`, `right` and `up` from the current angles.
    ///
    /// `up` is derived from `right x front` so it stays perpendicular to both
    /// even when `world_up` is not perpendicular to `front`.
    fn update_vectors(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();

        let front = Vector3::new(yaw_sin * pitch_cos, pitch_sin, yaw_cos * pitch_cos);
        self.front = front.normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::EuclideanSpace;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const EPSILON: f32 = 1e-5;

    fn assert_near(actual: Vector3<f32>, expected: Vector3<f32>, epsilon: f32) {
        assert!(
            (actual - expected).magnitude() < epsilon,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn assert_orthonormal(camera: &Camera) {
        let (front, right, up) = (camera.front(), camera.right(), camera.up());
        assert!((front.magnitude() - 1.0).abs() < EPSILON, "front {front:?}");
        assert!((right.magnitude() - 1.0).abs() < EPSILON, "right {right:?}");
        assert!((up.magnitude() - 1.0).abs() < EPSILON, "up {up:?}");
        assert!(front.dot(right).abs() < EPSILON);
        assert!(front.dot(up).abs() < EPSILON);
        assert!(right.dot(up).abs() < EPSILON);
    }

    #[test]
    fn basis_stays_orthonormal_under_random_rotations() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut camera = Camera::default();
        for _ in 0..2_000 {
            let yaw = rng.random_range(-720.0..720.0);
            let pitch = rng.random_range(-200.0..200.0);
            camera.rotate(yaw, pitch);
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn basis_is_orthonormal_at_construction() {
        for yaw in [0.0, 33.0, 90.0, 181.5, -270.0] {
            for pitch in [-89.9, -45.0, 0.0, 12.5, 89.9] {
                let camera = Camera::new(CameraOptions {
                    yaw,
                    pitch,
                    ..Default::default()
                });
                assert_orthonormal(&camera);
            }
        }
    }

    #[test]
    fn zero_rotation_is_a_no_op() {
        let mut camera = Camera::new(CameraOptions {
            position: Point3::new(1.0, -2.0, 3.0),
            yaw: 27.0,
            pitch: -11.0,
            ..Default::default()
        });
        let (front, up, yaw, pitch) = (camera.front(), camera.up(), camera.yaw(), camera.pitch());

        camera.rotate(0.0, 0.0);

        assert_eq!(camera.yaw(), yaw);
        assert_eq!(camera.pitch(), pitch);
        assert_eq!(camera.front(), front);
        assert_eq!(camera.up(), up);
        assert_eq!(camera.position(), Point3::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn pitch_saturates_at_constraints() {
        let mut camera = Camera::default();
        camera.rotate(0.0, 1000.0);
        assert_eq!(camera.pitch(), 89.9);
        camera.rotate(0.0, -1000.0);
        assert_eq!(camera.pitch(), -89.9);
    }

    #[test]
    fn pitch_is_free_when_unconstrained() {
        let mut camera = Camera::new(CameraOptions {
            constrain_pitch: false,
            ..Default::default()
        });
        camera.rotate(0.0, 120.0);
        assert_eq!(camera.pitch(), 120.0);
    }

    #[test]
    fn construction_does_not_clamp() {
        let camera = Camera::new(CameraOptions {
            pitch: 95.0,
            fov: 120.0,
            ..Default::default()
        });
        assert_eq!(camera.pitch(), 95.0);
        assert_eq!(camera.fov(), 120.0);
    }

    #[test]
    fn yaw_is_inverted_and_unbounded() {
        let mut camera = Camera::default();
        camera.rotate(400.0, 0.0);
        assert_eq!(camera.yaw(), -400.0);
        camera.rotate(-800.0, 0.0);
        assert_eq!(camera.yaw(), 400.0);
    }

    #[test]
    fn zoom_saturates_at_constraints() {
        let mut camera = Camera::default();
        camera.zoom(1000.0);
        assert_eq!(camera.fov(), 1.0);
        camera.zoom(-1000.0);
        assert_eq!(camera.fov(), 90.0);
    }

    #[test]
    fn look_at_straight_ahead() {
        let mut camera = Camera::new(CameraOptions {
            position: Point3::new(3.0, -1.0, 2.0),
            yaw: 70.0,
            pitch: 20.0,
            ..Default::default()
        });
        let target = camera.position() + Vector3::new(0.0, 0.0, 1.0);
        camera.look_at(target);

        assert_near(camera.front(), Vector3::new(0.0, 0.0, 1.0), EPSILON);
        assert_orthonormal(&camera);
    }

    #[test]
    fn look_at_keeps_legacy_yaw_mapping() {
        let mut camera = Camera::default();

        camera.look_at(Point3::new(0.0, 0.0, 5.0));
        assert!((camera.yaw() - 360.0).abs() < 1e-3, "yaw {}", camera.yaw());

        camera.look_at(Point3::new(5.0, 0.0, 0.0));
        assert!((camera.yaw() - 450.0).abs() < 1e-3, "yaw {}", camera.yaw());
        assert_near(camera.front(), Vector3::new(1.0, 0.0, 0.0), EPSILON);
    }

    #[test]
    fn look_at_derives_pitch_from_elevation() {
        let mut camera = Camera::default();
        camera.look_at(Point3::new(0.0, 1.0, 1.0));
        assert!((camera.pitch() - 45.0).abs() < 1e-3);
        assert_near(
            camera.front(),
            Vector3::new(0.0, 1.0, 1.0).normalize(),
            EPSILON,
        );
    }

    #[test]
    fn look_at_own_position_leaves_state_unchanged() {
        let mut camera = Camera::new(CameraOptions {
            position: Point3::new(1.0, 1.0, 1.0),
            yaw: 15.0,
            ..Default::default()
        });
        let before = camera.clone();
        camera.look_at(Point3::new(1.0, 1.0, 1.0));

        assert_eq!(camera.yaw(), before.yaw());
        assert_eq!(camera.pitch(), before.pitch());
        assert_eq!(camera.front(), before.front());
        assert!(!camera.front().x.is_nan());
    }

    #[test]
    fn move_and_move_back_restores_position() {
        let mut camera = Camera::new(CameraOptions {
            position: Point3::new(0.25, -3.5, 7.0),
            ..Default::default()
        });
        let start = camera.position();
        let offset = Vector3::new(0.1, 12.7, -3.3);

        camera.move_by(offset);
        camera.move_by(-offset);

        assert_near(camera.position().to_vec(), start.to_vec(), EPSILON);
    }

    #[test]
    fn movement_does_not_touch_orientation() {
        let mut camera = Camera::default();
        let front = camera.front();
        camera.move_by(Vector3::new(4.0, 5.0, 6.0));
        camera.move_to(Point3::origin());
        assert_eq!(camera.front(), front);
    }

    #[test]
    fn view_matrix_maps_position_to_origin() {
        let camera = Camera::new(CameraOptions {
            position: Point3::new(2.0, 3.0, -4.0),
            yaw: 30.0,
            pitch: 10.0,
            ..Default::default()
        });
        let eye = camera.view_matrix() * camera.position().to_homogeneous();
        assert_near(eye.truncate(), Vector3::new(0.0, 0.0, 0.0), 1e-4);

        // A point straight ahead ends up on the negative z axis in view space.
        let ahead = camera.position() + camera.front() * 2.0;
        let ahead = camera.view_matrix() * ahead.to_homogeneous();
        assert_near(ahead.truncate(), Vector3::new(0.0, 0.0, -2.0), 1e-4);
    }
}
