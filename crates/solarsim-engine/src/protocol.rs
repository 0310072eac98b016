//! Line protocol spoken with the bridge process.
//!
//! Requests (host → bridge) and replies (bridge → host) are single JSON
//! objects terminated by `\n`:
//!
//! ```text
//! {"id":1,"op":{"op":"check_extension","extension":"3D"}}
//! {"id":1,"ok":true,"status":"Available"}
//! {"id":2,"ok":false,"error":"ERROR 000732: Input Raster does not exist"}
//! ```
//!
//! Anything the vendor runtime prints that is not a JSON object is passed
//! through as engine output.

use crate::error::{EngineError, EngineResult};
use crate::operation::{Operation, Reply};
use crate::types::ExtensionStatus;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct Request<'a> {
    id: u64,
    op: &'a Operation,
}

/// A reply line as sent by the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReply {
    /// Id of the request being answered.
    pub id: u64,
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Status string for extension queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Error message when `ok` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RawReply {
    /// Interpret the reply to `op`.
    pub fn into_reply(self, op: &Operation) -> EngineResult<Reply> {
        if !self.ok {
            return Err(EngineError::OperationFailed {
                op: op.name(),
                message: self.error.unwrap_or_else(|| "unknown engine error".to_string()),
            });
        }

        match op {
            Operation::CheckExtension { .. } => {
                let status = self.status.ok_or_else(|| {
                    EngineError::Protocol("extension reply without status".to_string())
                })?;
                let status = status
                    .parse::<ExtensionStatus>()
                    .map_err(EngineError::Protocol)?;
                Ok(Reply::Extension(status))
            }
            _ => Ok(Reply::Done),
        }
    }
}

/// One decoded line from the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A protocol reply.
    Reply(RawReply),
    /// Free-form output from the vendor runtime.
    Output(String),
}

/// Encode a request, including the trailing newline.
pub fn encode_request(id: u64, op: &Operation) -> EngineResult<String> {
    let mut line = serde_json::to_string(&Request { id, op })?;
    line.push('\n');
    Ok(line)
}

/// Decode one line received from the bridge.
///
/// Lines starting with `{` must be valid replies; everything else is output.
pub fn decode_line(line: &str) -> EngineResult<Line> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim_start().starts_with('{') {
        Ok(Line::Reply(serde_json::from_str(line)?))
    } else {
        Ok(Line::Output(line.to_string()))
    }
}
