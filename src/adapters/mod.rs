// Adapters layer: concrete implementations of the domain ports (http, notification sinks, prompts)

pub mod http;
pub mod notify;
pub mod prompt;
