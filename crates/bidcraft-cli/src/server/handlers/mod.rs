//! API request handlers.

mod learning;
mod profiles;

pub use learning::*;
pub use profiles::*;
