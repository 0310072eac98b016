//! Engine backed by the vendor's scripting runtime in a child process.
//!
//! The child runs the bundled bridge script under the vendor's Python
//! interpreter (ArcGIS Pro ships it as `propy.bat`). The script imports the
//! geoprocessing module once and then serves requests from stdin, so
//! extension checkouts and environment settings persist between calls.

use crate::error::{EngineError, EngineResult};
use crate::operation::{Operation, Reply};
use crate::protocol::{decode_line, encode_request, Line};
use crate::GisEngine;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use tracing::{debug, info, warn};

/// Source of the bridge script.
pub const BRIDGE_SCRIPT: &str = include_str!("../bridge/arcpy_bridge.py");

/// File name the bridge script is written to.
pub const BRIDGE_SCRIPT_NAME: &str = "solarsim_bridge.py";

/// Default interpreter: the conda-aware launcher installed with ArcGIS Pro.
pub const DEFAULT_INTERPRETER: &str = "propy.bat";

/// How to launch the bridge process.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Vendor Python interpreter.
    pub interpreter: PathBuf,
    /// Bridge script passed to the interpreter.
    pub script: PathBuf,
    /// Working directory of the child; inherited when `None`.
    pub working_dir: Option<PathBuf>,
}

impl BridgeConfig {
    /// Launch `script` with the default interpreter.
    pub fn new<P: Into<PathBuf>>(script: P) -> Self {
        Self {
            interpreter: PathBuf::from(DEFAULT_INTERPRETER),
            script: script.into(),
            working_dir: None,
        }
    }
}

/// Write the bundled bridge script into `dir` and return its path.
pub fn write_bridge_script<P: AsRef<Path>>(dir: P) -> EngineResult<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(BRIDGE_SCRIPT_NAME);
    fs::write(&path, BRIDGE_SCRIPT)?;
    Ok(path)
}

/// [`GisEngine`] speaking the JSON line protocol over a pair of streams.
///
/// Normally created with [`BridgeEngine::spawn`]; [`BridgeEngine::from_streams`]
/// drives any reader/writer pair.
pub struct BridgeEngine<R, W: Write> {
    reader: R,
    /// `None` once stdin has been closed.
    writer: Option<W>,
    next_id: u64,
    child: Option<Child>,
}

impl<R, W: Write> std::fmt::Debug for BridgeEngine<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeEngine")
            .field("next_id", &self.next_id)
            .field("pid", &self.child.as_ref().map(Child::id))
            .finish()
    }
}

impl BridgeEngine<BufReader<ChildStdout>, ChildStdin> {
    /// Start the bridge process.
    pub fn spawn(config: &BridgeConfig) -> EngineResult<Self> {
        let mut command = Command::new(&config.interpreter);
        command
            .arg("-u")
            .arg(&config.script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        if let Some(dir) = &config.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| EngineError::Spawn {
            interpreter: config.interpreter.display().to_string(),
            source,
        })?;
        info!(
            "Started engine bridge {} (pid {})",
            config.interpreter.display(),
            child.id()
        );

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Protocol("bridge stdin not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Protocol("bridge stdout not captured".to_string()))?;

        let mut engine = Self::from_streams(BufReader::new(stdout), stdin);
        engine.child = Some(child);
        Ok(engine)
    }
}

impl<R: BufRead, W: Write> BridgeEngine<R, W> {
    /// Drive the protocol over existing streams.
    pub fn from_streams(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer: Some(writer),
            next_id: 1,
            child: None,
        }
    }

    fn send(&mut self, id: u64, op: &Operation) -> EngineResult<()> {
        let line = encode_request(id, op)?;
        debug!("bridge <- {}", line.trim_end());
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| EngineError::Protocol("bridge stdin is closed".to_string()))?;
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Read lines until the reply for `id` arrives, logging runtime output.
    fn receive(&mut self, id: u64, op: &Operation) -> EngineResult<Reply> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(EngineError::Protocol(format!(
                    "bridge exited while running {}",
                    op.name()
                )));
            }

            match decode_line(&line)? {
                Line::Output(text) => {
                    if !text.trim().is_empty() {
                        info!("engine: {}", text);
                    }
                }
                Line::Reply(raw) => {
                    debug!("bridge -> {:?}", raw);
                    if raw.id != id {
                        return Err(EngineError::Protocol(format!(
                            "reply id {} does not match request id {}",
                            raw.id, id
                        )));
                    }
                    return raw.into_reply(op);
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> GisEngine for BridgeEngine<R, W> {
    fn execute(&mut self, op: &Operation) -> EngineResult<Reply> {
        let id = self.next_id;
        self.next_id += 1;
        self.send(id, op)?;
        self.receive(id, op)
    }
}

impl<R, W: Write> Drop for BridgeEngine<R, W> {
    fn drop(&mut self) {
        // Closing stdin ends the bridge's read loop.
        drop(self.writer.take());
        if let Some(mut child) = self.child.take() {
            match child.wait() {
                Ok(status) if status.success() => debug!("Engine bridge exited"),
                Ok(status) => warn!("Engine bridge exited with {}", status),
                Err(e) => warn!("Failed to wait for engine bridge: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Extension, ExtensionStatus};
    use std::io::Cursor;

    fn engine(replies: &str) -> BridgeEngine<Cursor<Vec<u8>>, Vec<u8>> {
        BridgeEngine::from_streams(Cursor::new(replies.as_bytes().to_vec()), Vec::new())
    }

    fn written(engine: &BridgeEngine<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(engine.writer.clone().unwrap()).unwrap()
    }

    #[test]
    fn test_request_ids_increment() {
        let mut engine = engine(
            "{\"id\":1,\"ok\":true,\"status\":\"Available\"}\n{\"id\":2,\"ok\":true,\"status\":\"CheckedOut\"}\n",
        );

        assert_eq!(
            engine.extension_status(Extension::Spatial).unwrap(),
            ExtensionStatus::Available
        );
        engine.check_out(Extension::Spatial).unwrap();

        let sent = written(&engine);
        let lines: Vec<_> = sent.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("{\"id\":1,"));
        assert!(lines[1].contains("\"op\":\"check_out_extension\""));
    }

    #[test]
    fn test_runtime_output_is_skipped() {
        let mut engine = engine(
            "Start Time: Tuesday, January 1\nSucceeded at Tuesday\n\n{\"id\":1,\"ok\":true}\n",
        );
        engine.check_in(Extension::ThreeD).unwrap();
    }

    #[test]
    fn test_mismatched_reply_id() {
        let mut engine = engine("{\"id\":9,\"ok\":true}\n");
        let err = engine.check_in(Extension::ThreeD).unwrap_err();
        assert!(matches!(err, EngineError::Protocol(_)));
    }

    #[test]
    fn test_bridge_exit_is_protocol_error() {
        let mut engine = engine("");
        let err = engine.check_in(Extension::ThreeD).unwrap_err();
        assert!(err.to_string().contains("bridge exited"));
    }

    #[test]
    fn test_failed_operation() {
        let mut engine =
            engine("{\"id\":1,\"ok\":false,\"error\":\"ERROR 010067: Error in executing grid expression\"}\n");
        let err = engine.check_out(Extension::Spatial).unwrap_err();
        assert!(matches!(
            err,
            EngineError::OperationFailed {
                op: "check_out_extension",
                ..
            }
        ));
    }

    #[test]
    fn test_write_bridge_script() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_bridge_script(tmp.path().join("scratch")).unwrap();
        assert_eq!(path.file_name().unwrap(), BRIDGE_SCRIPT_NAME);
        assert_eq!(fs::read_to_string(path).unwrap(), BRIDGE_SCRIPT);
    }
}
