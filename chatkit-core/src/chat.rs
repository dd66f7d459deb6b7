//! Chat message container.
//!
//! Holds the conversation shown on screen together with loading and error
//! flags. Lives for the lifetime of the process only; nothing is persisted.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

use strum::{Display, EnumString};
use uuid::Uuid;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, uniffi::Enum)]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    /// Typed by the user.
    User,
    /// Produced by the assistant.
    Assistant,
}

/// File attached to a chat message.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct Attachment {
    /// Attachment identifier assigned by the host.
    pub id: String,
    /// Display name.
    pub name: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
    /// Location of the content on device.
    pub uri: String,
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct ChatMessage {
    /// Unique identifier generated when the message is added.
    pub id: String,
    /// Author of the message.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
    /// When the message was added.
    pub timestamp: SystemTime,
    /// Attached files, if any.
    pub attachments: Option<Vec<Attachment>>,
}

/// Caller-supplied part of a [`ChatMessage`].
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct NewChatMessage {
    /// Author of the message.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
    /// Attached files, if any.
    pub attachments: Option<Vec<Attachment>>,
}

impl NewChatMessage {
    /// A message typed by the user.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            attachments: None,
        }
    }

    /// A message produced by the assistant.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            attachments: None,
        }
    }
}

/// Snapshot of the chat container.
#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct ChatState {
    /// Messages in insertion order.
    pub messages: Vec<ChatMessage>,
    /// Whether a response is in flight.
    pub is_loading: bool,
    /// Last error reported by the caller.
    pub error: Option<String>,
}

/// Ordered chat messages plus loading and error flags.
#[derive(Debug, Default, uniffi::Object)]
pub struct ChatContainer {
    state: RwLock<ChatState>,
}

#[uniffi::export]
impl ChatContainer {
    /// Creates an empty conversation.
    #[uniffi::constructor]
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Appends a message, assigning it a fresh id and the current time.
    ///
    /// Ids are time-ordered UUIDs (v7), so they also sort by creation time.
    pub fn add_message(&self, message: NewChatMessage) -> ChatMessage {
        let message = ChatMessage {
            id: Uuid::now_v7().to_string(),
            role: message.role,
            content: message.content,
            timestamp: SystemTime::now(),
            attachments: message.attachments,
        };
        log::debug!("adding {} message {}", message.role, message.id);
        self.write().messages.push(message.clone());
        message
    }

    /// Removes all messages and clears the error. Loading is left as is.
    pub fn clear_messages(&self) {
        let mut state = self.write();
        state.messages.clear();
        state.error = None;
    }

    /// Sets the loading flag.
    pub fn set_loading(&self, is_loading: bool) {
        self.write().is_loading = is_loading;
    }

    /// Sets or clears the error. Any error ends loading.
    pub fn set_error(&self, error: Option<String>) {
        let mut state = self.write();
        state.error = error;
        state.is_loading = false;
    }

    /// Replaces the content of the last message if it is an assistant message.
    ///
    /// Used to render a streamed response as it grows. Does nothing when the
    /// conversation is empty or ends with a user message.
    pub fn update_last_message(&self, content: String) {
        if let Some(last) = self
            .write()
            .messages
            .last_mut()
            .filter(|message| message.role == ChatRole::Assistant)
        {
            last.content = content;
        }
    }

    /// Returns a copy of the whole state.
    #[must_use]
    pub fn state(&self) -> ChatState {
        self.read().clone()
    }

    /// Returns a copy of the messages.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.read().messages.clone()
    }

    /// Returns the most recent message.
    #[must_use]
    pub fn last_message(&self) -> Option<ChatMessage> {
        self.read().messages.last().cloned()
    }

    /// Number of messages in the conversation.
    #[must_use]
    pub fn message_count(&self) -> u64 {
        self.read().messages.len() as u64
    }

    /// Whether a response is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    /// The current error, if any.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }
}

impl ChatContainer {
    fn read(&self) -> RwLockReadGuard<'_, ChatState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ChatState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
