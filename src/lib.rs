// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Procedural spiral-galaxy renderer built on wgpu.
//!
//! A galaxy is a cloud of additively blended point sprites scattered
//! along spiral arms, colored from a hot core to a cool rim, with a
//! textured rocky planet at the rim. Every generation parameter is live:
//! editing one in the options panel rebuilds the scene on the next frame.
//!
//! # Key entry points
//!
//! - [`GalaxyEngine`] - owns the GPU context, camera, scene and renderers
//! - [`generator`] - the deterministic particle generator
//! - [`Options`] - runtime configuration (galaxy, planet, lighting,
//!   animation, camera) with TOML presets and a JSON schema for the panel
//! - [`Viewer`] - a standalone winit window (feature `viewer`)
//!
//! # Architecture
//!
//! Generation runs synchronously on the render thread. Each regeneration
//! releases the previous particle and planet buffers before creating new
//! ones, tracked by a [`scene::resources::ResourceLedger`]. Planet
//! textures decode in the background and are swapped into the material
//! as they arrive. A frame is a single pass: planet first, then the
//! depth-tested, non-depth-writing particle sprites.

pub mod camera;
pub mod color;
pub mod engine;
pub mod error;
pub mod generator;
pub mod gpu;
pub mod input;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod textures;
pub mod util;

#[cfg(feature = "gui")]
pub mod gui;
#[cfg(feature = "viewer")]
mod viewer;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use engine::command::GalaxyCommand;
pub use engine::{EngineStats, GalaxyEngine};
pub use error::GalaxyError;
pub use input::{InputEvent, MouseButton};
pub use options::Options;
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
