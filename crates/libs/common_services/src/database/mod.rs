mod error;
mod repositories;
mod tables;
mod utils;

pub use error::*;
pub use repositories::*;
pub use tables::*;
pub use utils::*;
