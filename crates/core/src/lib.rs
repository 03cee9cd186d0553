#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod navigation;
pub mod panel;
pub mod parser;
pub mod progress;
pub mod time;

pub use error::ContentError;
pub use time::Clock;
