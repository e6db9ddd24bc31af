mod core;
pub use self::core::{CompletionAdapter, CompletionConfig, OpenAiCompletion};
