// Library exports for the binary and the integration tests.
//
// Profile storage lives in `gidtree-config`, the includeIf engine in
// `gidtree-mapping`, and ssh-agent handling in `gidtree-ssh`. This crate only
// wires them to the command line.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod debug;
