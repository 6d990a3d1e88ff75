//! Gateway modules for external services.

pub mod convex;
