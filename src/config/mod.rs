mod settings;

pub use settings::{LogConfig, LogFormat, MergeConfig, ServerConfig, Settings};
