//! Build environment model
//!
//! The build system keeps its per-upload settings in a key/value store of
//! list-valued entries. [`UploadEnvironment`] models that store explicitly:
//! it is owned by the caller, populated before each upload, and handed to
//! pre-upload hooks by mutable reference under a single-writer contract.
//! Nothing in it persists between upload invocations.
//!
//! This crate only ever touches one entry, [`UPLOADER_FLAGS_KEY`], but the
//! store stays generic so hooks compose with settings they do not know about.

// =============================================================================
// Keys
// =============================================================================

/// Key holding the ordered flag list passed to the flashing tool
pub const UPLOADER_FLAGS_KEY: &str = "UPLOADERFLAGS";

// =============================================================================
// Upload Environment
// =============================================================================

/// Caller-owned build settings for one upload invocation
///
/// Entries keep their insertion order, and each entry is an ordered
/// sequence of string tokens. A key that was never set reads as an
/// empty sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadEnvironment {
    settings: Vec<(String, Vec<String>)>,
}

impl UploadEnvironment {
    /// Create an empty environment
    #[must_use]
    pub const fn new() -> Self {
        Self {
            settings: Vec::new(),
        }
    }

    /// Create an environment seeded with uploader flags
    #[must_use]
    pub fn with_uploader_flags<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut env = Self::new();
        env.replace(
            UPLOADER_FLAGS_KEY,
            flags.into_iter().map(Into::into).collect(),
        );
        env
    }

    /// Look up a setting by key
    ///
    /// Returns `None` for a key that was never set; callers that want
    /// "absent reads as empty" semantics use [`Self::uploader_flags`].
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.settings
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// The uploader flag list, empty if the key was never set
    #[must_use]
    pub fn uploader_flags(&self) -> &[String] {
        self.get(UPLOADER_FLAGS_KEY).unwrap_or(&[])
    }

    /// Replace a setting wholesale
    ///
    /// The prior value under `key` is discarded entirely (no merge). A key
    /// that was never set is inserted at the end of the store.
    pub fn replace(&mut self, key: &str, values: Vec<String>) {
        match self.settings.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = values,
            None => self.settings.push((key.to_string(), values)),
        }
    }

    /// Number of settings in the store
    #[must_use]
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    /// Whether the store holds no settings at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
