//! # z-editor
//!
//! Editor integration for the Z language.
//!
//! - Compile dispatch: runs the configured compiler on a file and reports
//!   the outcome to a log and a notification surface
//! - Keyword hover: one-line descriptions for a fixed set of keywords
//! - Triggers: the explicit compile command and compile-on-save
//!
//! There is no analysis here. The compiler is an external program, and
//! hover text comes from a static table.
//!
//! ## Usage
//!
//! Run as an editor bridge over stdio:
//!
//! ```bash
//! z-editor serve
//! ```
//!
//! Or from the command line:
//!
//! ```bash
//! z-editor compile src/main.z --compiler zc
//! z-editor hover src/main.z 3 5
//! ```
//!
//! ## Configuration
//!
//! Create a `.z-editor.yaml` in the workspace root:
//!
//! ```yaml
//! compilerPath: zc
//! compilerArgs: ["--opt", "2"]
//! autoCompileOnSave: true
//! ```
//!
//! Editors can push the same keys, optionally nested under a `z` section.

pub mod compile;
pub mod config;
pub mod engine;
pub mod hover;
pub mod sink;
pub mod triggers;

pub use compile::{CompileRequest, CompileResult, CompileTask};
pub use config::{ConfigError, ConfigLayers, ConfigOverrides, ExtensionConfig};
pub use engine::ZServer;
pub use hover::HoverInfo;
pub use sink::{Notification, NotificationLevel, ReportSink};
pub use triggers::{SourceDocument, TriggerError};
