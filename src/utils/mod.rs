//! contains utils used in parsing genome dirs and parameters

pub mod files;
pub mod parameters;

pub use files::*;
pub use parameters::*;
