//! Line-delimited JSON server: one request per line in, one reply per line out.

use crate::ipc::router::route_request;
use crate::tools::ExperimentToolkit;
use crate::types::{Error, RequestId, TeamId};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    body: Value,
}

/// Serves toolkit requests over any line-oriented byte stream (stdin/stdout in
/// the binary, in-memory buffers in tests).
#[derive(Debug)]
pub struct LineServer<'a> {
    toolkit: &'a ExperimentToolkit,
    default_team: Option<TeamId>,
}

impl<'a> LineServer<'a> {
    pub fn new(toolkit: &'a ExperimentToolkit, default_team: Option<TeamId>) -> Self {
        Self {
            toolkit,
            default_team,
        }
    }

    /// Handle one request line and build its reply. Never fails.
    pub async fn handle_line(&self, line: &str) -> Value {
        let raw: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                return error_reply(&Value::Null, &Error::validation(format!("invalid request: {}", e)))
            }
        };
        // Echo the caller's id even when the rest of the request is malformed.
        let id = raw.get("id").cloned().unwrap_or(Value::Null);
        let request: Request = match serde_json::from_value(raw) {
            Ok(r) => r,
            Err(e) => return error_reply(&id, &Error::validation(format!("invalid request: {}", e))),
        };

        let request_id = RequestId::new();
        let result = route_request(
            self.toolkit,
            self.default_team,
            request_id.clone(),
            &request.method,
            request.body,
        )
        .await;

        match result {
            Ok(body) => json!({
                "id": request.id,
                "ok": true,
                "body": body,
            }),
            Err(e) => {
                tracing::warn!(request_id = %request_id, method = %request.method, error = %e, "request rejected");
                error_reply(&request.id, &e)
            }
        }
    }

    /// Read requests until EOF, writing one reply line per non-blank request line.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        tracing::info!(tools = ?self.toolkit.catalog().list_ids(), "line server ready");

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let reply = self.handle_line(&line).await;
            let mut encoded = serde_json::to_vec(&reply)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
        }

        tracing::info!("input closed, line server stopping");
        Ok(())
    }
}

fn error_reply(id: &Value, err: &Error) -> Value {
    json!({
        "id": id,
        "ok": false,
        "error": {
            "code": err.code(),
            "message": err.to_string(),
        }
    })
}
