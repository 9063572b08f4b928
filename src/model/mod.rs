pub mod common;
pub mod filter;
pub mod funding;
pub mod grant;
pub mod patent;
pub mod user_context;

pub use common::*;
pub use filter::*;
pub use funding::*;
pub use grant::*;
pub use patent::*;
pub use user_context::*;

#[cfg(test)]
pub(crate) use patent::fixtures;
