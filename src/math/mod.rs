//! Mathematical utilities

pub mod random;
pub mod transform;

pub use random::RandomSource;
pub use transform::{
    EulerJitter, angle_between_degrees, compose_transform, perpendicular_basis, ring_points,
    rotate_within_cone_angle,
};
