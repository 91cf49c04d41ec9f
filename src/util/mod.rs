//! Small timing helpers shared by the engine and hosts.

/// Monotonic render-loop clock.
pub mod clock;
/// Smoothed FPS counter.
pub mod frame_timing;
/// Surface size shared by the surface, depth target and camera.
pub mod viewport;
