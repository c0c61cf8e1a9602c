pub mod chat;
pub mod code;
pub mod history;
pub mod image;
pub mod settings;
