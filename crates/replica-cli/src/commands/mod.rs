//! Command implementations

mod check;
mod retry;
mod run;

pub use check::run_check;
pub use retry::run_retry;
pub use run::run_reconcile;

use std::path::Path;

use replica_core::ConfigFile;

use crate::error::Result;

/// Load the configuration file layer.
///
/// An explicit `--config` path must exist; the implicit `./replica.toml` is
/// optional.
pub(crate) fn load_config_file(explicit: Option<&Path>) -> Result<ConfigFile> {
    match explicit {
        Some(path) => Ok(ConfigFile::load(path)?),
        None => Ok(ConfigFile::load_optional(Path::new("replica.toml"))?),
    }
}
