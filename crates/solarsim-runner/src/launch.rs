//! Engine selection.

use crate::config::EngineConfig;
use crate::error::Result;
use solarsim_engine::{write_bridge_script, BridgeConfig, BridgeEngine, DryRunEngine, GisEngine};
use tracing::info;

/// Open the engine the pipelines run against.
///
/// With `dry_run` set, operations are only recorded and logged. Otherwise the
/// vendor interpreter is started with the configured bridge script, or with
/// the bundled one written to `script_dir`.
pub fn open_engine(config: &EngineConfig, dry_run: bool) -> Result<Box<dyn GisEngine>> {
    if dry_run {
        info!("Dry run: engine operations will be logged, not executed");
        return Ok(Box::new(DryRunEngine::new()));
    }

    let script = match &config.bridge_script {
        Some(script) => script.clone(),
        None => write_bridge_script(&config.script_dir)?,
    };
    let bridge = BridgeConfig {
        interpreter: config.interpreter.clone(),
        script,
        working_dir: None,
    };
    Ok(Box::new(BridgeEngine::spawn(&bridge)?))
}
