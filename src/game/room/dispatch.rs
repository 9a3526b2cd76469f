use crate::protocol::{encode_server_message, ServerMessage};
use dashmap::DashMap;
use tokio::sync::mpsc::UnboundedSender;

/// Fans server events out to connected sessions.
///
/// Each message is encoded once and pushed onto per-session unbounded channels,
/// so dispatch never waits on a socket. Ordering holds per receiver only.
#[derive(Debug, Default)]
pub struct Dispatcher {
    sessions: DashMap<String, UnboundedSender<String>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, session_id: &str, sender: UnboundedSender<String>) {
        self.sessions.insert(session_id.to_string(), sender);
    }

    pub fn unregister(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn to_all(&self, message: &ServerMessage) {
        self.fan_out(None, message);
    }

    pub fn to_all_except(&self, session_id: &str, message: &ServerMessage) {
        self.fan_out(Some(session_id), message);
    }

    pub fn to_one(&self, session_id: &str, message: &ServerMessage) {
        let Some(payload) = encode(message) else { return };
        let Some(sender) = self.sessions.get(session_id) else {
            tracing::debug!(session_id, "dropping message for unknown session");
            return;
        };
        if sender.send(payload).is_err() {
            tracing::debug!(session_id, "session outbound channel closed");
        }
    }

    fn fan_out(&self, skip: Option<&str>, message: &ServerMessage) {
        let Some(payload) = encode(message) else { return };
        for entry in self.sessions.iter() {
            if Some(entry.key().as_str()) == skip {
                continue;
            }
            if entry.value().send(payload.clone()).is_err() {
                tracing::debug!(session_id = %entry.key(), "session outbound channel closed");
            }
        }
    }
}

fn encode(message: &ServerMessage) -> Option<String> {
    match encode_server_message(message) {
        Ok(payload) => Some(payload),
        Err(error) => {
            tracing::warn!(?error, "failed to encode server message");
            None
        }
    }
}
