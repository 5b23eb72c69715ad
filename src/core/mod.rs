//! # Core Module
//!
//! Shared-ownership containers for the single-threaded engine.
//!
//! ## Key Components
//! - `StSystem`: reference-counted, interior-mutable handle to a system

pub mod st_system;

pub use st_system::StSystem;
