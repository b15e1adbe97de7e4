pub mod banner;
pub mod config;
pub mod consts;
pub mod error;
pub mod events;
pub mod hosting;
pub mod pipeline;
pub mod quote;
pub mod render;
pub mod social;
pub mod spinner;

pub use error::{Error, Result};
