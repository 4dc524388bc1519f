mod settings;

pub use settings::{
    LogFormat, LoggingConfig, NtfyAuthConfig, NtfyConfig, ServerConfig, Settings, TemplatesConfig,
};
