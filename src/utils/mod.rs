//! Small helpers shared across the generator.

pub mod hash;
pub mod minify;
pub mod slug;
