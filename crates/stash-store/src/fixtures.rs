//! Record types shared by the unit tests.

use serde::{Deserialize, Serialize};

use crate::record::{Record, Variant};

pub const NOTE: Variant = Variant::from_static("note");
pub const TASK: Variant = Variant::from_static("task");

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Item {
    Note { id: u32, payload: String },
    Task { id: u32, done: bool },
}

impl Record for Item {
    type Id = u32;

    fn primary_id(&self) -> u32 {
        match self {
            Self::Note { id, .. } | Self::Task { id, .. } => *id,
        }
    }

    fn variant(&self) -> Variant {
        match self {
            Self::Note { .. } => NOTE,
            Self::Task { .. } => TASK,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.primary_id() == 0 {
            return Err("id 0 is reserved".into());
        }
        Ok(())
    }
}

pub fn note(id: u32, payload: &str) -> Item {
    Item::Note {
        id,
        payload: payload.into(),
    }
}

pub fn task(id: u32) -> Item {
    Item::Task { id, done: false }
}

/// Copies itself into the other variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shapeshifter {
    pub id: u32,
    pub flipped: bool,
}

impl Record for Shapeshifter {
    type Id = u32;

    fn primary_id(&self) -> u32 {
        self.id
    }

    fn variant(&self) -> Variant {
        if self.flipped {
            Variant::from_static("flipped")
        } else {
            Variant::from_static("plain")
        }
    }

    fn deep_copy(&self) -> Self {
        Self {
            id: self.id,
            flipped: !self.flipped,
        }
    }
}
