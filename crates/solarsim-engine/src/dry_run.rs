//! Engine that records operations instead of running them.
//!
//! Used by `--dry-run` to show what a pipeline would send to the vendor
//! runtime, and by tests to inspect call sequences and license state.

use crate::error::{EngineError, EngineResult};
use crate::operation::{Operation, Reply};
use crate::types::{Extension, ExtensionStatus};
use crate::GisEngine;
use std::collections::{BTreeSet, HashMap};
use tracing::info;

/// Recording [`GisEngine`].
#[derive(Debug, Default)]
pub struct DryRunEngine {
    /// Every operation received, in order.
    operations: Vec<Operation>,
    /// Status reported per extension; absent means available.
    statuses: HashMap<Extension, ExtensionStatus>,
    /// Extensions currently checked out.
    checked_out: BTreeSet<Extension>,
    /// Operation name that fails, with its message.
    failure: Option<(&'static str, String)>,
}

impl DryRunEngine {
    /// Create an engine where every extension is available.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `status` for `extension`.
    pub fn with_extension_status(mut self, extension: Extension, status: ExtensionStatus) -> Self {
        self.statuses.insert(extension, status);
        self
    }

    /// Fail the first operation named `op` with `message`.
    pub fn with_failure(mut self, op: &'static str, message: impl Into<String>) -> Self {
        self.failure = Some((op, message.into()));
        self
    }

    /// Operations received so far.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Names of the operations received so far.
    pub fn operation_names(&self) -> Vec<&'static str> {
        self.operations.iter().map(Operation::name).collect()
    }

    /// Extensions that are checked out and not yet checked in.
    pub fn checked_out(&self) -> &BTreeSet<Extension> {
        &self.checked_out
    }

    fn status(&self, extension: Extension) -> ExtensionStatus {
        self.statuses
            .get(&extension)
            .copied()
            .unwrap_or(ExtensionStatus::Available)
    }
}

impl GisEngine for DryRunEngine {
    fn execute(&mut self, op: &Operation) -> EngineResult<Reply> {
        info!("[dry run] {}", op.name());
        self.operations.push(op.clone());

        if self
            .failure
            .as_ref()
            .is_some_and(|(name, _)| *name == op.name())
        {
            if let Some((name, message)) = self.failure.take() {
                return Err(EngineError::OperationFailed { op: name, message });
            }
        }

        match op {
            Operation::CheckExtension { extension } => Ok(Reply::Extension(self.status(*extension))),
            Operation::CheckOutExtension { extension } => {
                let status = self.status(*extension);
                if status != ExtensionStatus::Available {
                    return Err(EngineError::OperationFailed {
                        op: op.name(),
                        message: format!("CheckOutExtension returned {}", status),
                    });
                }
                self.checked_out.insert(*extension);
                Ok(Reply::Done)
            }
            Operation::CheckInExtension { extension } => {
                self.checked_out.remove(extension);
                Ok(Reply::Done)
            }
            _ => Ok(Reply::Done),
        }
    }
}
