//! Helpers shared across modules

pub mod fs;
pub mod string_utils;
