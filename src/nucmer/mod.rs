//! nucmer invocation and processing of its coordinates

pub mod aligner;
pub mod coords;
pub mod workspace;

pub use aligner::*;
pub use coords::*;
pub use workspace::*;
