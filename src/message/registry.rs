//! Decoding rebuild codes back into typed messages

use super::rebuild::{RebuildCode, parse_codes};
use super::{MessageFields, MessageType, QcMessage};
use crate::error::MessageError;
use crate::routine::constant_value::ConstantValueMessage;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

type Decoder = fn(MessageFields) -> Arc<dyn QcMessage>;

fn decode_as<M: MessageType>(fields: MessageFields) -> Arc<dyn QcMessage> {
    Arc::new(M::from_fields(fields))
}

/// Maps message tags to the message types they rebuild into
#[derive(Debug, Clone, Default)]
pub struct MessageRegistry {
    decoders: HashMap<&'static str, Decoder>,
}

impl MessageRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Registry holding every message type defined in this crate
    pub fn with_builtin_messages() -> Self {
        let mut registry = Self::new();
        registry.insert::<ConstantValueMessage>();
        registry
    }

    /// Register a message type under its tag
    pub fn register<M: MessageType>(&mut self) -> Result<(), MessageError> {
        if self.decoders.contains_key(M::TAG) {
            return Err(MessageError::DuplicateTag {
                tag: M::TAG.to_string(),
            });
        }
        self.insert::<M>();
        Ok(())
    }

    fn insert<M: MessageType>(&mut self) {
        debug!("Registering message type '{}'", M::TAG);
        self.decoders.insert(M::TAG, decode_as::<M>);
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = self.decoders.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    /// Reconstruct the message described by a rebuild code
    pub fn rebuild(&self, code: RebuildCode) -> Result<Arc<dyn QcMessage>, MessageError> {
        let decoder = self
            .decoders
            .get(code.tag())
            .ok_or_else(|| MessageError::UnknownTag {
                tag: code.tag().to_string(),
            })?;

        Ok(decoder(code.into_fields()))
    }

    /// Decode a persisted string of rebuild codes into messages, in order
    pub fn decode(&self, codes: &str) -> Result<Vec<Arc<dyn QcMessage>>, MessageError> {
        parse_codes(codes)?
            .into_iter()
            .map(|code| self.rebuild(code))
            .collect()
    }
}
