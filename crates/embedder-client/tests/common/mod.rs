//! In-memory stand-in for the native embedder API.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use embedder_core::{
    BinaryReplyCallback, DestructionHandler, EmbedderApi, IncomingMessage, MessageCallback,
    MessageTransport, RegistrarRef, ResponseHandle, TextureTransport, TextureVariant,
};

#[derive(Default)]
pub struct FakeMessenger {
    pub send_result: Mutex<bool>,
    pub sent: Mutex<Vec<(String, Vec<u8>)>>,
    pub pending_replies: Mutex<Vec<(String, BinaryReplyCallback)>>,
    pub responses: Mutex<Vec<(ResponseHandle, Vec<u8>)>>,
    pub callbacks: Mutex<HashMap<String, MessageCallback>>,
    pub set_callback_calls: Mutex<Vec<(String, bool)>>,
}

impl FakeMessenger {
    pub fn set_send_result(&self, result: bool) {
        *self.send_result.lock().unwrap() = result;
    }

    pub fn has_callback(&self, channel: &str) -> bool {
        self.callbacks.lock().unwrap().contains_key(channel)
    }

    /// Deliver a message the way the engine would.
    pub fn deliver(
        &self,
        channel: &str,
        message: &[u8],
        response_handle: Option<ResponseHandle>,
    ) -> bool {
        let callback = self.callbacks.lock().unwrap().get(channel).cloned();
        match callback {
            Some(callback) => {
                callback(IncomingMessage {
                    channel,
                    message,
                    response_handle,
                });
                true
            }
            None => false,
        }
    }

    /// Answer the oldest pending `send_with_reply`.
    pub fn answer_next(&self, data: &[u8]) {
        let (_, reply) = self.pending_replies.lock().unwrap().remove(0);
        reply(data);
    }
}

impl MessageTransport for FakeMessenger {
    fn send(&self, channel: &str, message: &[u8]) -> bool {
        self.sent.lock().unwrap().push((channel.to_owned(), message.to_vec()));
        *self.send_result.lock().unwrap()
    }

    fn send_with_reply(&self, channel: &str, message: &[u8], reply: BinaryReplyCallback) -> bool {
        self.sent.lock().unwrap().push((channel.to_owned(), message.to_vec()));
        let ok = *self.send_result.lock().unwrap();
        if ok {
            self.pending_replies.lock().unwrap().push((channel.to_owned(), reply));
        }
        ok
    }

    fn send_response(&self, handle: ResponseHandle, data: &[u8]) {
        self.responses.lock().unwrap().push((handle, data.to_vec()));
    }

    fn set_callback(&self, channel: &str, callback: Option<MessageCallback>) {
        self.set_callback_calls
            .lock()
            .unwrap()
            .push((channel.to_owned(), callback.is_some()));
        let mut callbacks = self.callbacks.lock().unwrap();
        match callback {
            Some(callback) => {
                callbacks.insert(channel.to_owned(), callback);
            }
            None => {
                callbacks.remove(channel);
            }
        }
    }
}

pub struct FakeTexture {
    pub texture: TextureVariant,
    pub mark_count: usize,
}

/// Assigns ids from a counter starting at -1, like the native stub.
pub struct FakeTextures {
    pub last_texture_id: Mutex<i64>,
    pub textures: Mutex<BTreeMap<i64, FakeTexture>>,
}

impl Default for FakeTextures {
    fn default() -> Self {
        Self {
            last_texture_id: Mutex::new(-1),
            textures: Mutex::default(),
        }
    }
}

impl FakeTextures {
    pub fn len(&self) -> usize {
        self.textures.lock().unwrap().len()
    }

    pub fn mark_count(&self, texture_id: i64) -> Option<usize> {
        self.textures.lock().unwrap().get(&texture_id).map(|t| t.mark_count)
    }
}

impl TextureTransport for FakeTextures {
    fn register_external_texture(&self, texture: TextureVariant) -> i64 {
        let mut last = self.last_texture_id.lock().unwrap();
        *last += 1;
        self.textures.lock().unwrap().insert(
            *last,
            FakeTexture {
                texture,
                mark_count: 0,
            },
        );
        *last
    }

    fn unregister_external_texture(&self, texture_id: i64) -> bool {
        self.textures.lock().unwrap().remove(&texture_id).is_some()
    }

    fn mark_external_texture_frame_available(&self, texture_id: i64) -> bool {
        match self.textures.lock().unwrap().get_mut(&texture_id) {
            Some(texture) => {
                texture.mark_count += 1;
                true
            }
            None => false,
        }
    }
}

#[derive(Default)]
pub struct FakeApi {
    pub messenger: Arc<FakeMessenger>,
    pub textures: Arc<FakeTextures>,
    pub destruction_handlers: Mutex<HashMap<RegistrarRef, DestructionHandler>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        embedder_core::logging::init_for_tests();
        Arc::new(Self::default())
    }

    pub fn as_api(self: &Arc<Self>) -> Arc<dyn EmbedderApi> {
        self.clone()
    }

    pub fn has_destruction_handler(&self, registrar: RegistrarRef) -> bool {
        self.destruction_handlers.lock().unwrap().contains_key(&registrar)
    }

    /// Simulate the native side freeing `registrar`.
    pub fn destroy(&self, registrar: RegistrarRef) {
        let handler = self.destruction_handlers.lock().unwrap().remove(&registrar);
        if let Some(handler) = handler {
            handler(registrar);
        }
    }
}

impl EmbedderApi for FakeApi {
    fn set_destruction_handler(
        &self,
        registrar: RegistrarRef,
        handler: Option<DestructionHandler>,
    ) {
        let mut handlers = self.destruction_handlers.lock().unwrap();
        match handler {
            Some(handler) => {
                handlers.insert(registrar, handler);
            }
            None => {
                handlers.remove(&registrar);
            }
        }
    }

    fn messenger(&self, _registrar: RegistrarRef) -> Arc<dyn MessageTransport> {
        self.messenger.clone()
    }

    fn texture_registrar(&self, _registrar: RegistrarRef) -> Arc<dyn TextureTransport> {
        self.textures.clone()
    }
}

pub fn handle(addr: usize) -> RegistrarRef {
    RegistrarRef::from_addr(addr)
}
