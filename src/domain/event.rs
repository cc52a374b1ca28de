use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Subject, SubjectKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CooldownEventKind {
    Rejected,
    Expired,
}

/// Something that happened to a subject on a named cooldown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownEvent {
    pub cooldown: String,
    pub subject: SubjectKey,
    pub kind: CooldownEventKind,
    /// Remaining time when the event was raised; `None` once expired.
    pub time_left: Option<Duration>,
}

/// Text to deliver to a live subject.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub subject: Subject,
    pub cooldown: String,
    pub text: String,
}
