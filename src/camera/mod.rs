//! Camera system for 3D scene viewing.
//!
//! Provides a perspective camera driven by a damped orbit, and the GPU
//! uniform every scene pipeline binds at group 0.

/// Orbit camera controller owning the GPU uniform.
pub mod controller;
/// Core camera struct and GPU uniform types.
pub mod core;
/// Damped spherical orbit math.
pub mod orbit;
