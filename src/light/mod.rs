//! Traveling lights
//!
//! Each light walks the edges of one axon tree at a time, fading in at the
//! root and out at a leaf. Trees are handed out by a [`RootPool`] so lights
//! spread across the forest instead of clustering.

pub mod config;
pub mod pool;
pub mod walker;
pub mod field;

pub use config::{LightConfig, Lookahead};
pub use pool::RootPool;
pub use walker::{LightWalker, WalkerCursor, WalkerPhase};
pub use field::{LightField, LightSample};
