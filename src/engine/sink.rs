//! Report sink backed by the editor client

use crate::sink::{Notification, NotificationLevel, ReportSink};
use tower_lsp::async_trait;
use tower_lsp::lsp_types::MessageType;
use tower_lsp::Client;

/// Compile log goes to the client's log channel, notifications become
/// pop-up messages.
#[derive(Clone)]
pub struct ClientSink {
    client: Client,
}

impl ClientSink {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReportSink for ClientSink {
    async fn append_line(&self, line: &str) {
        self.client.log_message(MessageType::LOG, line).await;
    }

    async fn notify(&self, notification: Notification) {
        let typ = match notification.level {
            NotificationLevel::Info => MessageType::INFO,
            NotificationLevel::Error => MessageType::ERROR,
        };
        self.client.show_message(typ, notification.message).await;
    }
}
