//! Source surface meshes

pub mod surface;

pub use surface::SurfaceMesh;
