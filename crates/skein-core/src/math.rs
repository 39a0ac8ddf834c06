//! Reexports [`glam`].

pub use glam::*;
