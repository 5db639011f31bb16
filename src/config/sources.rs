//! Configuration sources outside the workspace.

pub mod global_file;
