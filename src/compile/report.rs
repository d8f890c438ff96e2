//! Turns a [`CompileResult`] into log lines and one notification.

use super::CompileResult;
use crate::sink::{Notification, ReportSink};

/// Message shown when the compiler exits cleanly
pub const SUCCESS_MESSAGE: &str = "Compilation completed successfully!";

/// Report a finished compile.
///
/// Stderr is logged on both branches. A zero exit is a success even when
/// stderr is non-empty.
pub async fn report(result: &CompileResult, sink: &dyn ReportSink) {
    if let Some(message) = result.failure() {
        sink.append_line(&format!("Error: {}", message)).await;
        log_stderr(result, sink).await;
        sink.notify(Notification::error(format!("Compilation failed: {}", message)))
            .await;
        return;
    }

    log_stderr(result, sink).await;
    sink.append_line(&format!("stdout: {}", result.stdout)).await;
    sink.append_line(SUCCESS_MESSAGE).await;
    sink.notify(Notification::info(SUCCESS_MESSAGE)).await;
}

async fn log_stderr(result: &CompileResult, sink: &dyn ReportSink) {
    if !result.stderr.is_empty() {
        sink.append_line(&format!("stderr: {}", result.stderr)).await;
    }
}
