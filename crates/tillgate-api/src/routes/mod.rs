//! Route modules for the licensing API surface.

pub mod license;
