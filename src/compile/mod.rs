//! Compile dispatch
//!
//! Launches the configured compiler for one source file and reports the
//! outcome to a [`ReportSink`]. The compiler is started with an argument
//! vector, never through a shell, so the file path always reaches it as a
//! single argument whatever characters it contains.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use z_editor::compile::{self, CompileRequest};
//! use z_editor::sink::ConsoleSink;
//! use z_editor::ExtensionConfig;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExtensionConfig::default().with_compiler("zc");
//! let request = CompileRequest::new("/work/hello.z", &config)?;
//! let result = compile::dispatch(request, Arc::new(ConsoleSink)).join().await?;
//! assert!(result.exit_succeeded);
//! # Ok(())
//! # }
//! ```

mod report;

pub use report::report;

use crate::config::ExtensionConfig;
use crate::sink::{Notification, ReportSink};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use thiserror::Error;
use tokio::process::Command;
use tokio::task::JoinHandle;

/// Invalid compile request, rejected before any process is launched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("No file to compile")]
    EmptyPath,

    #[error("No compiler configured")]
    EmptyCompiler,

    #[error("Cannot resolve {path}: {message}")]
    UnresolvedPath { path: PathBuf, message: String },
}

/// The dispatch task did not run to completion
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Compile task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// One compile invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    /// Source file handed to the compiler, always absolute
    pub file_path: PathBuf,
    /// Directory the compiler runs in (the file's parent)
    pub working_directory: PathBuf,
    /// Compiler executable name or path
    pub compiler_command: String,
    /// Arguments placed before the file path
    pub compiler_args: Vec<String>,
}

impl CompileRequest {
    /// Build a request for `file_path` using the compiler from `config`.
    ///
    /// Relative paths are resolved against the current directory, since
    /// the compiler itself runs in the file's parent.
    pub fn new<P: AsRef<Path>>(file_path: P, config: &ExtensionConfig) -> Result<Self, RequestError> {
        let file_path = file_path.as_ref();
        if file_path.as_os_str().is_empty() {
            return Err(RequestError::EmptyPath);
        }

        let compiler_command = config.compiler_path.trim();
        if compiler_command.is_empty() {
            return Err(RequestError::EmptyCompiler);
        }

        let file_path =
            std::path::absolute(file_path).map_err(|e| RequestError::UnresolvedPath {
                path: file_path.to_path_buf(),
                message: e.to_string(),
            })?;

        let working_directory = match file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => file_path.clone(),
        };

        Ok(Self {
            file_path,
            working_directory,
            compiler_command: compiler_command.to_string(),
            compiler_args: config.compiler_args.clone(),
        })
    }

    /// Arguments passed to the compiler, file path last
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.compiler_args.iter().map(OsString::from).collect();
        args.push(self.file_path.clone().into_os_string());
        args
    }

    /// Human-readable command line, for logs only
    pub fn command_line(&self) -> String {
        let mut parts = vec![display_arg(&self.compiler_command)];
        parts.extend(self.compiler_args.iter().map(|a| display_arg(a)));
        parts.push(display_arg(&self.file_path.to_string_lossy()));
        parts.join(" ")
    }
}

fn display_arg(arg: &str) -> String {
    if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        format!("{:?}", arg)
    } else {
        arg.to_string()
    }
}

/// Outcome of one compile invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileResult {
    /// The compiler ran and exited with status zero
    pub exit_succeeded: bool,
    pub stdout: String,
    pub stderr: String,
    /// Present only when the compiler could not be run or exited non-zero
    pub error_message: Option<String>,
}

impl CompileResult {
    fn launch_failure(message: String) -> Self {
        Self {
            exit_succeeded: false,
            stdout: String::new(),
            stderr: String::new(),
            error_message: Some(message),
        }
    }

    /// Error message if the compile failed
    pub fn failure(&self) -> Option<&str> {
        if self.exit_succeeded {
            None
        } else {
            Some(
                self.error_message
                    .as_deref()
                    .unwrap_or("Compiler exited unsuccessfully"),
            )
        }
    }
}

/// Run the compiler and capture its output without reporting anything
pub async fn run(request: &CompileRequest) -> CompileResult {
    let mut cmd = Command::new(&request.compiler_command);
    cmd.args(request.args());
    cmd.current_dir(&request.working_directory);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = match cmd.output().await {
        Ok(output) => output,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return CompileResult::launch_failure(format!(
                "Compiler not found: {} ({})",
                request.compiler_command, e
            ));
        }
        Err(e) => {
            return CompileResult::launch_failure(format!(
                "Failed to run {}: {}",
                request.compiler_command, e
            ));
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if output.status.success() {
        CompileResult {
            exit_succeeded: true,
            stdout,
            stderr,
            error_message: None,
        }
    } else {
        CompileResult {
            exit_succeeded: false,
            error_message: Some(format!(
                "Command failed: {} ({})",
                request.command_line(),
                output.status
            )),
            stdout,
            stderr,
        }
    }
}

/// A running compile. Resolves once the result has been reported.
#[derive(Debug)]
pub struct CompileTask {
    handle: JoinHandle<CompileResult>,
}

impl CompileTask {
    /// Wait for the compile to finish
    pub async fn join(self) -> Result<CompileResult, DispatchError> {
        Ok(self.handle.await?)
    }

    /// Whether the compiler has exited and the outcome was reported
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Let the compile run unattended.
    ///
    /// A normal outcome is already reported by the task itself. If the task
    /// dies before reporting (it panicked or was cancelled), the sink gets an
    /// error notification instead, so the trigger never ends in silence.
    pub fn detach(self, sink: Arc<dyn ReportSink>) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.join().await {
                tracing::error!("{}", e);
                sink.notify(Notification::error(format!("Compilation failed: {}", e)))
                    .await;
            }
        })
    }
}

/// Start compiling `request` in the background.
///
/// Returns immediately. The sink receives the log and exactly one
/// notification once the compiler exits. Must be called within a tokio
/// runtime.
pub fn dispatch(request: CompileRequest, sink: Arc<dyn ReportSink>) -> CompileTask {
    let handle = tokio::spawn(async move {
        tracing::info!(
            file = %request.file_path.display(),
            compiler = %request.compiler_command,
            "Dispatching compile"
        );
        sink.append_line(&format!("Compiling: {}", request.file_path.display()))
            .await;

        let result = run(&request).await;

        match result.failure() {
            Some(message) => tracing::warn!(file = %request.file_path.display(), "{}", message),
            None => tracing::info!(file = %request.file_path.display(), "Compile succeeded"),
        }

        report(&result, sink.as_ref()).await;
        result
    });

    CompileTask { handle }
}
