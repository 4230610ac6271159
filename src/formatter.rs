use async_trait::async_trait;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Formatter '{program}' not found in PATH")]
    NotFound { program: String },

    #[error("Formatter failed: {message}")]
    Failed { message: String },

    #[error("Formatter produced invalid UTF-8")]
    InvalidOutput,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatStyle {
    pub single_quote: bool,
    pub trailing_comma: bool,
    pub bracket_spacing: bool,
}

impl Default for FormatStyle {
    fn default() -> Self {
        Self {
            single_quote: true,
            trailing_comma: true,
            bracket_spacing: false,
        }
    }
}

impl FormatStyle {
    pub fn prettier_args(&self) -> Vec<&'static str> {
        let mut args = Vec::new();
        if self.single_quote {
            args.push("--single-quote");
        }
        args.push("--trailing-comma");
        args.push(if self.trailing_comma { "all" } else { "none" });
        if !self.bracket_spacing {
            args.push("--no-bracket-spacing");
        }
        args
    }
}

#[async_trait]
pub trait CodeFormatter: Send + Sync {
    async fn format(&self, code: &str, style: &FormatStyle) -> Result<String, FormatError>;
}

/// Runs the `prettier` CLI over stdin.
pub struct PrettierFormatter {
    program: String,
}

impl PrettierFormatter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn build_command(&self, style: &FormatStyle) -> Result<Command, FormatError> {
        let program = which::which(&self.program).map_err(|_| FormatError::NotFound {
            program: self.program.clone(),
        })?;

        let mut cmd = Command::new(program);
        cmd.args(style.prettier_args());
        cmd.arg("--stdin-filepath").arg("code.js");
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        Ok(cmd)
    }
}

#[async_trait]
impl CodeFormatter for PrettierFormatter {
    async fn format(&self, code: &str, style: &FormatStyle) -> Result<String, FormatError> {
        let mut child = self.build_command(style)?.spawn()?;

        // Written from a separate task so a large output can't fill the
        // stdout pipe while we're still blocked on stdin.
        let stdin = child.stdin.take();
        let input = code.to_string();
        let writer = tokio::spawn(async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(input.as_bytes()).await?;
            }
            Ok::<(), std::io::Error>(())
        });

        let output = child.wait_with_output().await?;
        let written = writer.await.map_err(|e| FormatError::Failed {
            message: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(FormatError::Failed {
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;

        String::from_utf8(output.stdout).map_err(|_| FormatError::InvalidOutput)
    }
}
