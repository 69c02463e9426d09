//! Core business logic for linnet.

pub mod services;

pub use services::*;
