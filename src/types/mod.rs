//! Core data model for run traces and model streams.

pub mod run;
pub mod step;
pub mod stream;

pub use run::*;
pub use step::*;
pub use stream::*;
