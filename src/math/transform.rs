//! Rotation and transform helpers shared by growth and flattening

use glam::{Mat4, Quat, Vec3};

use super::random::RandomSource;

/// Three independent rotation angles (radians) applied about the world
/// X, then Y, then Z axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EulerJitter {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl EulerJitter {
    /// Draw each angle uniformly from `[-max_degrees, max_degrees]`.
    /// Draw order is X, Y, Z.
    pub fn sample<R: RandomSource + ?Sized>(max_degrees: f32, rng: &mut R) -> Self {
        let limit = max_degrees.to_radians();
        let x = rng.range(-limit, limit);
        let y = rng.range(-limit, limit);
        let z = rng.range(-limit, limit);
        Self { x, y, z }
    }

    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Combined rotation, X first
    pub fn quat(&self) -> Quat {
        Quat::from_rotation_z(self.z) * Quat::from_rotation_y(self.y) * Quat::from_rotation_x(self.x)
    }

    /// Rotate `v` by the three axis rotations in order
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        self.quat() * v
    }
}

/// Randomly tilt `v` by up to `max_degrees` about each world axis.
///
/// The result keeps the length of `v`; callers normalize when needed.
pub fn rotate_within_cone_angle<R: RandomSource + ?Sized>(v: Vec3, max_degrees: f32, rng: &mut R) -> Vec3 {
    EulerJitter::sample(max_degrees, rng).rotate(v)
}

/// Build a transform that scales and rotates about `pivot`, then translates.
///
/// Equivalent to: translate by `-pivot`, scale, rotate X, rotate Y,
/// rotate Z, translate by `+pivot`, translate by `translation`.
pub fn compose_transform(pivot: Vec3, translation: Vec3, rotation_euler: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_translation(translation)
        * Mat4::from_translation(pivot)
        * Mat4::from_rotation_z(rotation_euler.z)
        * Mat4::from_rotation_y(rotation_euler.y)
        * Mat4::from_rotation_x(rotation_euler.x)
        * Mat4::from_scale(scale)
        * Mat4::from_translation(-pivot)
}

/// Two unit vectors `(u, v)` spanning the plane perpendicular to `direction`.
///
/// `u` is picked from the first non-zero component of `direction` so the
/// basis is well defined for axis-aligned directions.
pub fn perpendicular_basis(direction: Vec3) -> (Vec3, Vec3) {
    let Vec3 { x: qx, y: qy, z: qz } = direction;
    let u = if qx.abs() > f32::EPSILON {
        Vec3::new(-qy / qx, 1.0, 0.0)
    } else if qy.abs() > f32::EPSILON {
        Vec3::new(0.0, -qz / qy, 1.0)
    } else {
        Vec3::new(1.0, 0.0, -qx / qz)
    };
    let v = direction.cross(u);
    (u.normalize(), v.normalize())
}

/// `count` points evenly spaced on a circle of `radius` around `center`,
/// in the plane perpendicular to `direction`.
pub fn ring_points(center: Vec3, direction: Vec3, radius: f32, count: usize) -> Vec<Vec3> {
    let (u, v) = perpendicular_basis(direction);
    (0..count)
        .map(|i| {
            let theta = std::f32::consts::TAU * i as f32 / count as f32;
            center + radius * (theta.cos() * u + theta.sin() * v)
        })
        .collect()
}

/// Angle between two vectors in degrees, robust to rounding past +-1.
pub fn angle_between_degrees(a: Vec3, b: Vec3) -> f32 {
    let denom = a.length() * b.length();
    if denom <= f32::EPSILON {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}
