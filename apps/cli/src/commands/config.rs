//! # Config Commands

use tracing::debug;

use crate::state::ConfigState;

/// Gets the effective configuration (defaults, file, environment and flags
/// merged).
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}
