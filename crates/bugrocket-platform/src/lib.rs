//! Browser adapters for the `bugrocket-core` ports.

pub mod image;
pub mod llm;
pub mod storage;

#[cfg(test)]
mod tests;
