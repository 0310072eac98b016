//! The engine abstraction.

use crate::error::{EngineError, EngineResult};
use crate::operation::{Operation, Reply};
use crate::types::{EnvSetting, Extension, ExtensionStatus};
use solarsim_metrics::metric_defs;
use std::time::Instant;
use tracing::{debug, info};

/// A GIS engine that executes [`Operation`]s.
///
/// Implementors only provide [`execute`](GisEngine::execute). Callers go
/// through [`dispatch`](GisEngine::dispatch) or the typed helpers, which
/// validate parameters and record timing first.
pub trait GisEngine {
    /// Send one operation to the engine and wait for it to finish.
    fn execute(&mut self, op: &Operation) -> EngineResult<Reply>;

    /// Validate, execute and time an operation.
    fn dispatch(&mut self, op: &Operation) -> EngineResult<Reply> {
        op.validate()?;
        debug!("engine: {:?}", op);

        let started = Instant::now();
        let reply = self.execute(op)?;
        let elapsed = started.elapsed().as_secs_f64();

        metrics::counter!(metric_defs::ENGINE_OPERATIONS.name, "op" => op.name()).increment(1);
        metrics::histogram!(metric_defs::ENGINE_OPERATION_TIME.name, "op" => op.name())
            .record(elapsed);
        debug!("engine: {} finished in {:.1}s", op.name(), elapsed);

        Ok(reply)
    }

    /// Execute an operation that has no result.
    fn run(&mut self, op: &Operation) -> EngineResult<()> {
        self.dispatch(op).map(|_| ())
    }

    /// Query an extension's license status.
    fn extension_status(&mut self, extension: Extension) -> EngineResult<ExtensionStatus> {
        match self.dispatch(&Operation::CheckExtension { extension })? {
            Reply::Extension(status) => Ok(status),
            other => Err(EngineError::Protocol(format!(
                "expected an extension status, got {:?}",
                other
            ))),
        }
    }

    /// Check out an extension.
    fn check_out(&mut self, extension: Extension) -> EngineResult<()> {
        self.run(&Operation::CheckOutExtension { extension })?;
        info!("Checked out {}", extension);
        Ok(())
    }

    /// Check in an extension.
    fn check_in(&mut self, extension: Extension) -> EngineResult<()> {
        self.run(&Operation::CheckInExtension { extension })?;
        info!("Checked in {}", extension);
        Ok(())
    }

    /// Check out an extension, failing unless it is available.
    fn require_extension(&mut self, extension: Extension) -> EngineResult<()> {
        let status = self.extension_status(extension)?;
        if status != ExtensionStatus::Available {
            return Err(EngineError::ExtensionUnavailable { extension, status });
        }
        self.check_out(extension)
    }

    /// Change an environment setting.
    fn set_env(&mut self, setting: EnvSetting) -> EngineResult<()> {
        self.run(&Operation::SetEnv { setting })
    }
}

impl<E: GisEngine + ?Sized> GisEngine for Box<E> {
    fn execute(&mut self, op: &Operation) -> EngineResult<Reply> {
        (**self).execute(op)
    }
}
