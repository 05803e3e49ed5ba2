//! Config sources, in the order they are layered.

pub mod env_vars;
pub mod global_file;
pub mod workspace_file;
