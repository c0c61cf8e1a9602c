pub mod message;
pub mod persona;
pub mod code;
pub mod archive;
pub mod event;
pub mod config;
pub mod error;


pub use error::RocketError;
pub type Result<T> = std::result::Result<T, RocketError>;
