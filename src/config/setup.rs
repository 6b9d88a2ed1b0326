//! First-run setup and the interactive edit pass.

use tracing::debug;

use crate::backend::BackendKind;
use crate::config::settings::default_config;
use crate::config::store::{ConfigMap, ConfigStore};
use crate::error::AcwError;
use crate::ui::Prompter;

/// Ask which backend to use.
pub fn choose_backend<P: Prompter>(prompter: &mut P) -> Result<BackendKind, AcwError> {
    let choices: Vec<String> = BackendKind::ALL
        .iter()
        .map(|kind| format!("{} ({})", kind.config_value(), kind.description()))
        .collect();

    let idx = prompter.select("Select the model you want to use", &choices)?;
    Ok(BackendKind::ALL[idx.min(BackendKind::ALL.len() - 1)])
}

/// Interactive first-run setup: pick a backend, ask for the API key when the
/// hosted backend is chosen, and write the full default mapping.
pub fn first_run_setup<P: Prompter>(
    store: &ConfigStore,
    prompter: &mut P,
) -> Result<ConfigMap, AcwError> {
    let kind = choose_backend(prompter)?;

    let api_key = if kind.needs_api_key() {
        Some(prompter.input("Enter your OpenAI API key")?)
    } else {
        None
    };

    let map = default_config(kind, api_key.as_deref());
    store.save(&map)?;
    println!("Saved settings to {}", store.path().display());

    Ok(map)
}

/// Walk every key in order; a non-empty answer replaces the value, an empty
/// answer keeps it.
pub fn edit_config<P: Prompter>(map: &ConfigMap, prompter: &mut P) -> Result<ConfigMap, AcwError> {
    let mut edited = map.clone();

    for (key, value) in map.iter() {
        println!("Current value of \"{key}\": \"{value}\"");
        let answer = prompter.input("Enter a new value or press Enter to keep the current value")?;
        if !answer.is_empty() {
            debug!("Updating config key {}", key);
            edited.set(key, answer);
        }
        println!();
    }

    Ok(edited)
}

/// The `config` command: edit the existing settings, or run first-run setup.
pub fn run_config<P: Prompter>(store: &ConfigStore, prompter: &mut P) -> Result<ConfigMap, AcwError> {
    match store.load()? {
        Some(current) => {
            let edited = edit_config(&current, prompter)?;
            store.save(&edited)?;
            println!("Saved settings to {}", store.path().display());
            Ok(edited)
        }
        None => first_run_setup(store, prompter),
    }
}

/// Load the settings, running first-run setup when there are none yet.
pub fn ensure_config<P: Prompter>(store: &ConfigStore, prompter: &mut P) -> Result<ConfigMap, AcwError> {
    match store.load()? {
        Some(map) => Ok(map),
        None => first_run_setup(store, prompter),
    }
}
