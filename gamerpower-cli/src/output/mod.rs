//! Output formatting for CLI.

mod json;
mod text;

pub use json::{JsonFormatter, KeysOutput, ProbeOutput, RefreshOutput, SettingsOutput};
pub use text::TextFormatter;
