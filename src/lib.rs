pub mod args;
pub mod commands;
mod config;
mod error;
pub mod filter;
mod fs;
pub mod model;
pub mod session;
pub mod storage;
pub mod store;
pub mod summary;
mod utils;


pub use config::Config;
pub use error::{Error, Result, ValidationError};
