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

//! Per-frame driver for a slab ("voxelizer") shader effect.
//!
//! An [`effector::Effector`] turns its transform into an effect plane, picks
//! up an optional target point and a local time, and writes all three into
//! the override blocks of the surfaces linked to it. Up to four effectors can
//! share the same surfaces by writing to different [`channel::Channel`]s.
//!
//! # Key entry points
//!
//! - [`effector::Effector`] - the component itself
//! - [`properties::OverrideTarget`] - what a host surface implements
//! - [`time::TimeControl`] / [`time::PlaybackClock`] - timeline and clock hooks
//! - [`gizmo`] - editor wireframe visualization of the slab
//! - [`options::Options`] - TOML-backed configuration
//!
//! The crate is single-threaded by construction: hosts share surfaces and
//! targets through `Rc<RefCell<_>>` and call [`effector::Effector::tick`] once
//! per frame.

pub mod channel;
pub mod effect;
pub mod effector;
pub mod error;
pub mod gizmo;
pub mod options;
pub mod properties;
pub mod time;
pub mod transform;
