//! User profile container, persisted to general app storage under
//! [`PROFILE_STORE_KEY`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, PersistedContainer};

/// Storage key holding the user profile.
pub const PROFILE_STORE_KEY: &str = "user-profile";

/// The user's profile. Defaults to empty strings and no avatar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct UserProfile {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Avatar image URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Change to the avatar carried by a [`ProfileUpdate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Enum)]
pub enum AvatarUpdate {
    /// Leave the avatar as it is.
    #[default]
    Keep,
    /// Replace the avatar with `uri`.
    Set {
        /// Avatar image URI.
        uri: String,
    },
    /// Remove the avatar.
    Clear,
}

/// Partial profile; `None` fields and [`AvatarUpdate::Keep`] keep their
/// current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct ProfileUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New contact email.
    pub email: Option<String>,
    /// Avatar change.
    pub avatar: AvatarUpdate,
}

impl ProfileUpdate {
    fn merge_into(self, profile: &mut UserProfile) {
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(email) = self.email {
            profile.email = email;
        }
        match self.avatar {
            AvatarUpdate::Keep => {}
            AvatarUpdate::Set { uri } => profile.avatar = Some(uri),
            AvatarUpdate::Clear => profile.avatar = None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct ProfileState {
    profile: UserProfile,
}

/// Profile of the signed-in user.
#[derive(uniffi::Object)]
pub struct ProfileContainer {
    inner: PersistedContainer<ProfileState>,
}

#[uniffi::export]
impl ProfileContainer {
    /// Creates a container with the default profile persisting to `storage`.
    ///
    /// Call [`Self::rehydrate`] afterwards to restore the saved profile.
    #[uniffi::constructor]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Arc<Self> {
        Arc::new(Self {
            inner: PersistedContainer::new(PROFILE_STORE_KEY, storage),
        })
    }

    /// Merges `update` into the profile field by field.
    pub fn set_profile(&self, update: ProfileUpdate) {
        self.inner.update(|state| update.merge_into(&mut state.profile));
    }

    /// Resets the profile to the empty default.
    pub fn clear_profile(&self) {
        self.inner.update(|state| state.profile = UserProfile::default());
    }

    /// Returns a copy of the profile.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        self.inner.read(|state| state.profile.clone())
    }

    /// Restores the profile saved by a previous run.
    ///
    /// Blocks on the storage read; call it off the UI thread. Returns `true`
    /// if a stored profile was applied.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async runtime context.
    pub fn rehydrate(&self) -> bool {
        self.inner.rehydrate()
    }

    /// Whether [`Self::rehydrate`] has completed.
    #[must_use]
    pub fn has_hydrated(&self) -> bool {
        self.inner.has_hydrated()
    }

    /// Deletes the persisted profile without changing the in-memory one.
    pub fn clear_storage(&self) {
        self.inner.clear_storage();
    }

    /// Waits for pending storage writes to finish.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async runtime context.
    pub fn flush(&self) {
        self.inner.flush();
    }
}

impl ProfileContainer {
    /// Async variant of [`Self::rehydrate`].
    pub async fn rehydrate_async(&self) -> bool {
        self.inner.rehydrate_async().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_set_profile_merges() {
        let profile = ProfileContainer::new(Arc::new(MemoryStore::new()));
        profile.set_profile(ProfileUpdate {
            email: Some("a@b.com".to_string()),
            ..ProfileUpdate::default()
        });
        assert_eq!(
            profile.profile(),
            UserProfile {
                name: String::new(),
                email: "a@b.com".to_string(),
                avatar: None,
            }
        );

        profile.set_profile(ProfileUpdate {
            name: Some("X".to_string()),
            ..ProfileUpdate::default()
        });
        assert_eq!(
            profile.profile(),
            UserProfile {
                name: "X".to_string(),
                email: "a@b.com".to_string(),
                avatar: None,
            }
        );
    }

    #[test]
    fn test_set_avatar_then_clear() {
        let profile = ProfileContainer::new(Arc::new(MemoryStore::new()));
        profile.set_profile(ProfileUpdate {
            name: Some("Ada".to_string()),
            avatar: AvatarUpdate::Set {
                uri: "file:///avatar.png".to_string(),
            },
            ..ProfileUpdate::default()
        });
        profile.set_profile(ProfileUpdate::default());
        assert_eq!(profile.profile().avatar.as_deref(), Some("file:///avatar.png"));

        profile.clear_profile();
        assert_eq!(profile.profile(), UserProfile::default());
    }

    #[test]
    fn test_set_profile_clears_avatar() {
        let store = Arc::new(MemoryStore::new());
        let profile = ProfileContainer::new(store.clone());
        profile.set_profile(ProfileUpdate {
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            avatar: AvatarUpdate::Set {
                uri: "file:///a.png".to_string(),
            },
        });
        profile.set_profile(ProfileUpdate {
            avatar: AvatarUpdate::Clear,
            ..ProfileUpdate::default()
        });

        let expected = UserProfile {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            avatar: None,
        };
        assert_eq!(profile.profile(), expected);

        profile.flush();
        let next_run = ProfileContainer::new(store);
        assert!(next_run.rehydrate());
        assert_eq!(next_run.profile(), expected);
    }

    #[test]
    fn test_persisted_layout() {
        let store = Arc::new(MemoryStore::new());
        let profile = ProfileContainer::new(store.clone());
        profile.set_profile(ProfileUpdate {
            name: Some("Ada".to_string()),
            ..ProfileUpdate::default()
        });
        profile.flush();
        assert_eq!(
            store.get(PROFILE_STORE_KEY.to_string()).unwrap(),
            Some(r#"{"state":{"profile":{"name":"Ada","email":""}},"version":0}"#.to_string())
        );
    }

    #[test]
    fn test_persistence_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let first = ProfileContainer::new(store.clone());
        first.set_profile(ProfileUpdate {
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            avatar: AvatarUpdate::Set {
                uri: "file:///ada.png".to_string(),
            },
        });
        first.flush();

        let second = ProfileContainer::new(store.clone());
        assert!(second.rehydrate());
        assert_eq!(second.profile(), first.profile());

        second.clear_profile();
        second.flush();
        let third = ProfileContainer::new(store);
        assert!(third.rehydrate());
        assert_eq!(third.profile(), UserProfile::default());
    }
}
