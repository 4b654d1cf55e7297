//! Neurite - procedural axon trees grown on surface meshes

pub mod core;
pub mod math;
pub mod mesh;
pub mod growth;
pub mod flatten;
pub mod light;
