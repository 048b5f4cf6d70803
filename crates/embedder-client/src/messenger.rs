//! [`BinaryMessenger`]: channel-addressed messaging for plugins.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use embedder_core::{IncomingMessage, MessageCallback, MessageTransport};

/// Sends the response to an incoming message. It can be called once;
/// `None` sends an empty response.
pub type BinaryReply = Box<dyn FnOnce(Option<&[u8]>) + Send>;

/// Handles messages arriving on one channel.
pub type BinaryMessageHandler = Arc<dyn Fn(&[u8], BinaryReply) + Send + Sync>;

pub struct BinaryMessenger {
    // `None` once the owning registrar has been destroyed.
    transport: Mutex<Option<Arc<dyn MessageTransport>>>,
    handlers: Mutex<HashMap<String, BinaryMessageHandler>>,
}

impl fmt::Debug for BinaryMessenger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channels: Vec<String> = self.handlers().keys().cloned().collect();
        f.debug_struct("BinaryMessenger")
            .field("attached", &self.transport().is_some())
            .field("channels", &channels)
            .finish_non_exhaustive()
    }
}

impl BinaryMessenger {
    pub fn new(transport: Arc<dyn MessageTransport>) -> Self {
        Self {
            transport: Mutex::new(Some(transport)),
            handlers: Mutex::new(HashMap::new()),
        }
    }

    fn transport(&self) -> Option<Arc<dyn MessageTransport>> {
        self.transport
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Release the native transport. Every later call fails.
    pub(crate) fn detach(&self) {
        let transport = self.transport.lock().unwrap_or_else(PoisonError::into_inner).take();
        self.handlers().clear();
        drop(transport);
    }

    fn handlers(&self) -> MutexGuard<'_, HashMap<String, BinaryMessageHandler>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Send `message` on `channel` without expecting a reply.
    pub fn send(&self, channel: &str, message: &[u8]) -> bool {
        match self.transport() {
            Some(transport) => transport.send(channel, message),
            None => {
                tracing::warn!(channel, "send on a destroyed registrar");
                false
            }
        }
    }

    /// Send `message` on `channel`; `reply` receives the response.
    pub fn send_with_reply(
        &self,
        channel: &str,
        message: &[u8],
        reply: impl FnOnce(&[u8]) + Send + 'static,
    ) -> bool {
        match self.transport() {
            Some(transport) => transport.send_with_reply(channel, message, Box::new(reply)),
            None => {
                tracing::warn!(channel, "send on a destroyed registrar");
                false
            }
        }
    }

    /// Install `handler` for `channel`, replacing any previous one, or remove
    /// it with `None`.
    pub fn set_message_handler(&self, channel: &str, handler: Option<BinaryMessageHandler>) {
        let Some(transport) = self.transport() else {
            tracing::warn!(channel, "message handler change on a destroyed registrar");
            return;
        };
        let Some(handler) = handler else {
            self.handlers().remove(channel);
            transport.set_callback(channel, None);
            tracing::debug!(channel, "removed message handler");
            return;
        };

        self.handlers().insert(channel.to_owned(), Arc::clone(&handler));
        let weak_transport = Arc::downgrade(&transport);
        let callback: MessageCallback = Arc::new(move |incoming: IncomingMessage<'_>| {
            forward_to_handler(&weak_transport, &handler, incoming);
        });
        transport.set_callback(channel, Some(callback));
        tracing::debug!(channel, "installed message handler");
    }

    pub fn has_handler(&self, channel: &str) -> bool {
        self.handlers().contains_key(channel)
    }
}

fn forward_to_handler(
    transport: &Weak<dyn MessageTransport>,
    handler: &BinaryMessageHandler,
    incoming: IncomingMessage<'_>,
) {
    let transport = Weak::clone(transport);
    let channel = incoming.channel.to_owned();
    let response_handle = incoming.response_handle;

    let reply: BinaryReply = Box::new(move |response: Option<&[u8]>| {
        let Some(handle) = response_handle else {
            tracing::error!(%channel, "message on channel expects no response, dropping reply");
            return;
        };
        let Some(transport) = transport.upgrade() else {
            tracing::warn!(%channel, "messenger gone before reply was sent");
            return;
        };
        transport.send_response(handle, response.unwrap_or_default());
    });

    handler(incoming.message, reply);
}
