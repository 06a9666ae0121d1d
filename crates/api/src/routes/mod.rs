//! HTTP Routes

pub mod categories;
pub mod predictions;
