use serde_json::Value;
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader as AsyncBufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::error::WorkspaceError;
use crate::mcp_server::JsonRpcHandler;

/// Newline-delimited JSON-RPC over stdin/stdout.
pub struct StdioTransport {
    handler: JsonRpcHandler,
}

impl StdioTransport {
    pub fn new(handler: JsonRpcHandler) -> Self {
        Self { handler }
    }

    /// Read stdin until EOF, answering each line on stdout in order.
    pub async fn run(&self) -> io::Result<()> {
        info!("Starting stdio transport");

        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            let stdin = tokio::io::stdin();
            let mut reader = AsyncBufReader::new(stdin);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        debug!("EOF reached on stdin");
                        break;
                    }
                    Ok(_) => {
                        if !line.trim().is_empty() {
                            if let Err(e) = tx.send(line.clone()) {
                                error!("Failed to send line: {}", e);
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        error!("Error reading from stdin: {}", e);
                        break;
                    }
                }
            }
        });

        let mut stdout = tokio::io::stdout();
        while let Some(line) = rx.recv().await {
            if let Some(response) = self.process_line(&line).await {
                if let Err(e) = write_response(&mut stdout, &response).await {
                    error!("Failed to write response: {}", e);
                    return Err(e);
                }
            }
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Decode one line and produce the reply, if any.
    pub async fn process_line(&self, line: &str) -> Option<Value> {
        debug!("Processing line: {}", line.trim_end());

        match serde_json::from_str::<Value>(line) {
            Ok(request) => self.handler.handle_request(request).await,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                Some(serde_json::json!({
                    "jsonrpc": "2.0",
                    "error": WorkspaceError::ParseError(e.to_string()).to_jsonrpc_error(),
                    "id": null
                }))
            }
        }
    }
}

async fn write_response<W>(out: &mut W, response: &Value) -> io::Result<()>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    let response_str = serde_json::to_string(response)?;
    out.write_all(response_str.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await?;
    debug!("Sent response: {}", response_str);
    Ok(())
}
