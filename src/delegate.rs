//! External AI search delegate.
//!
//! The delegate is an out-of-process program (typically a Python script
//! wrapping an embedding index and an LLM). The exchange is one JSON
//! document each way:
//!
//! ```text
//! stdin : {"query": "rag architecture"}
//! stdout: {"results": [SearchResult, ...], "response": "..."}
//! ```
//!
//! The child runs with `CONTENT_DIR` set to the content root. Any of the
//! following is a failure: spawn error, timeout, non-zero exit, a non-null
//! `error` field in the output, or output that does not match the schema.
//! The child is killed if the timeout expires.

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::DelegateConfig;
use crate::models::SearchOutcome;
use crate::provider::SearchProvider;

/// Longest stderr excerpt carried in [`DelegateError::ExitStatus`].
const MAX_STDERR_CHARS: usize = 500;

/// Stderr kept in memory; the rest is drained and discarded.
const MAX_STDERR_BYTES: usize = 64 * 1024;

/// Ways a delegated search can fail.
#[derive(Debug, thiserror::Error)]
pub enum DelegateError {
    /// The delegate process could not be started.
    #[error("failed to spawn delegate process: {0}")]
    Spawn(#[source] std::io::Error),

    /// Writing the request or collecting the output failed.
    #[error("delegate I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// The delegate did not exit in time and was killed.
    #[error("delegate timed out after {timeout_secs}s")]
    Timeout {
        /// The configured timeout in seconds.
        timeout_secs: u64,
    },

    /// The delegate exited with a failure status.
    #[error("delegate exited with status {code:?}: {stderr}")]
    ExitStatus {
        /// Exit code, `None` when killed by a signal.
        code: Option<i32>,
        /// Leading excerpt of the delegate's stderr.
        stderr: String,
    },

    /// The delegate reported an error in its output.
    #[error("delegate reported error: {0}")]
    Reported(String),

    /// Stdout exceeded `[delegate].max_output_bytes`.
    #[error("delegate output exceeded {max_bytes} bytes")]
    OutputTooLarge {
        /// The configured limit.
        max_bytes: usize,
    },

    /// Output was not valid JSON or did not match the response schema.
    #[error("malformed delegate output: {0}")]
    MalformedOutput(#[source] serde_json::Error),
}

/// Runs searches through the configured delegate process.
pub struct DelegatedProvider {
    config: DelegateConfig,
    content_root: PathBuf,
}

impl DelegatedProvider {
    pub fn new(config: DelegateConfig, content_root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            content_root: content_root.into(),
        }
    }

    /// Sends `query` to a fresh delegate process and parses its answer.
    pub async fn run(&self, query: &str) -> Result<SearchOutcome, DelegateError> {
        let mut cmd = Command::new(&self.config.command);
        cmd.args(&self.config.args)
            .env("CONTENT_DIR", &self.content_root)
            .envs(&self.config.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.config.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(DelegateError::Spawn)?;
        let request = serde_json::json!({ "query": query }).to_string();
        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let max_output_bytes = self.config.max_output_bytes;

        let exchange = async move {
            let write = async move {
                if let Some(mut stdin) = stdin {
                    // A delegate may exit without reading its input; the exit
                    // status then decides the outcome.
                    if let Err(e) = stdin.write_all(request.as_bytes()).await {
                        if e.kind() != std::io::ErrorKind::BrokenPipe {
                            return Err(e);
                        }
                    }
                }
                Ok(())
            };
            let (written, out, err) = tokio::join!(
                write,
                read_capped(stdout, max_output_bytes),
                read_capped(stderr, MAX_STDERR_BYTES),
            );
            written.map_err(DelegateError::Io)?;
            let out = out.map_err(DelegateError::Io)?;
            let err = err.map_err(DelegateError::Io)?;
            let status = child.wait().await.map_err(DelegateError::Io)?;
            Ok::<_, DelegateError>((status, out, err))
        };

        let timeout_secs = self.config.timeout_secs;
        let (status, stdout, stderr) = timeout(Duration::from_secs(timeout_secs), exchange)
            .await
            .map_err(|_| DelegateError::Timeout { timeout_secs })??;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr.bytes);
            return Err(DelegateError::ExitStatus {
                code: status.code(),
                stderr: stderr.trim().chars().take(MAX_STDERR_CHARS).collect(),
            });
        }

        if stdout.overflowed {
            return Err(DelegateError::OutputTooLarge {
                max_bytes: max_output_bytes,
            });
        }

        parse_output(&stdout.bytes)
    }
}

/// Bytes read from one child pipe.
struct Captured {
    bytes: Vec<u8>,
    overflowed: bool,
}

/// Reads up to `limit` bytes from `pipe`, then drains the remainder so the
/// child never blocks on a full pipe.
async fn read_capped<R: AsyncRead + Unpin>(
    pipe: Option<R>,
    limit: usize,
) -> std::io::Result<Captured> {
    let mut bytes = Vec::new();
    let Some(mut pipe) = pipe else {
        return Ok(Captured {
            bytes,
            overflowed: false,
        });
    };
    (&mut pipe).take(limit as u64).read_to_end(&mut bytes).await?;
    let rest = tokio::io::copy(&mut pipe, &mut tokio::io::sink()).await?;
    Ok(Captured {
        bytes,
        overflowed: rest > 0,
    })
}

/// Parses the delegate's stdout into a [`SearchOutcome`].
pub fn parse_output(stdout: &[u8]) -> Result<SearchOutcome, DelegateError> {
    let value: Value = serde_json::from_slice(stdout).map_err(DelegateError::MalformedOutput)?;

    if let Some(err) = value.get("error").filter(|e| !e.is_null()) {
        let message = err
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        return Err(DelegateError::Reported(message));
    }

    serde_json::from_value(value).map_err(DelegateError::MalformedOutput)
}

#[async_trait]
impl SearchProvider for DelegatedProvider {
    fn name(&self) -> &str {
        "delegate"
    }

    fn is_available(&self) -> bool {
        self.config.is_enabled()
    }

    async fn search(&self, query: &str) -> anyhow::Result<SearchOutcome> {
        Ok(self.run(query).await?)
    }
}
