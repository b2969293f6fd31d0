#![deny(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cast_possible_truncation
)]

mod error;
mod interpreter;
mod provider;
mod rekognition;
mod structs;

pub use error::*;
pub use interpreter::*;
pub use provider::*;
pub use rekognition::*;
pub use structs::*;
