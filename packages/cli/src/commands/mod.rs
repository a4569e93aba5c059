pub mod config;
pub mod export;
pub mod preview;
pub mod validate;

pub use config::{show_config, ConfigArgs};
pub use export::{export, ExportArgs};
pub use preview::{preview, PreviewArgs};
pub use validate::{validate, ValidateArgs};
