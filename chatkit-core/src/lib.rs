#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

//! Client-side state for the chat app.
//!
//! Three independent containers, each constructed explicitly by the host:
//!
//! - [`AuthContainer`] keeps the login session and persists it to secure
//!   storage.
//! - [`ChatContainer`] keeps the on-screen conversation in memory.
//! - [`ProfileContainer`] keeps the user profile and persists it to general
//!   app storage.
//!
//! Storage backends are supplied by the host through [`KeyValueStore`].
//! Persistence is best effort: writes run in the background and their
//! failures never change what the containers return.

pub mod auth;
pub use auth::{
    AuthContainer, AuthState, CredentialVerifier, Credentials, StaticCredentialVerifier,
};

pub mod chat;
pub use chat::{Attachment, ChatContainer, ChatMessage, ChatRole, ChatState, NewChatMessage};

pub mod logger;

pub mod profile;
pub use profile::{AvatarUpdate, ProfileContainer, ProfileUpdate, UserProfile};

pub mod storage;
pub use storage::{KeyValueStore, StorageError, StorageResult};

uniffi::setup_scaffolding!("chatkit_core");
