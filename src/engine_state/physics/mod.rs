//! # Physics
//!
//! Everything that moves through the voxel grid:
//!
//! * [`collision`]: box overlap, world collision and the unit-step sweep
//! * [`player`]: walking, gravity, ground detection and zoom
//! * [`raycast`]: picking the targeted block and its placement cell

pub mod collision;
pub mod player;
pub mod raycast;
