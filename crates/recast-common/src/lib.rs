//! Host-side plumbing around the recast engine: configuration, input loading,
//! a virtual file system, the generation pipeline and the source renderer.

pub mod config;
pub mod loader;
pub mod pipeline;
pub mod render;
pub mod sink;
pub mod vfs;

pub type Result<T> = anyhow::Result<T>;
