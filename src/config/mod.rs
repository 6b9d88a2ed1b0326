//! Persistent user settings in `~/.acw`.

pub mod settings;
pub mod setup;
pub mod store;

pub use settings::{Settings, default_config, default_prompt_message};
pub use setup::{edit_config, ensure_config, first_run_setup, run_config};
pub use store::{ConfigMap, ConfigStore};
