pub mod http_completion;

pub use http_completion::HttpCompletionClient;
