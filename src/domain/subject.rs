use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a subject that can be put on cooldown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectKey(Uuid);

impl SubjectKey {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Name-based key: the same name always maps to the same key.
    pub fn from_name(name: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
    }

    pub fn parse(s: &str) -> Result<Self, SubjectKeyError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| SubjectKeyError::InvalidFormat(s.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for SubjectKey {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, thiserror::Error)]
pub enum SubjectKeyError {
    #[error("invalid subject key: {0} (expected a UUID)")]
    InvalidFormat(String),
}

/// A live subject as the host knows it (e.g. an online user).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub key: SubjectKey,
    pub name: String,
}

impl Subject {
    pub fn new(key: SubjectKey, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
        }
    }

    /// Subject whose key is derived from its name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: SubjectKey::from_name(&name),
            name,
        }
    }
}
