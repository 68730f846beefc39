pub mod client;
pub mod error;
pub mod normalize;

pub use client::{ExceptionScope, Fleet, MetrolinxClient, RealtimeFeed};
pub use error::MetrolinxError;
