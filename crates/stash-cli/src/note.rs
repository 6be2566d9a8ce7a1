use serde::{Deserialize, Serialize};
use stash_store::{Record, Variant};
use stash_util::{find_exact, CaseSensitivity};

pub const NOTE: Variant = Variant::from_static("note");

/// A titled note with free-form tags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

impl Note {
    pub fn has_tag(&self, tag: &str, case: CaseSensitivity) -> bool {
        find_exact(&self.tags, tag, case).is_some()
    }
}

impl Record for Note {
    type Id = u64;

    fn primary_id(&self) -> u64 {
        self.id
    }

    fn variant(&self) -> Variant {
        NOTE
    }

    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err(format!("note {} has an empty title", self.id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(title: &str, tags: &[&str]) -> Note {
        Note {
            id: 1,
            title: title.into(),
            body: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn empty_title_is_invalid() {
        assert!(note("  ", &[]).validate().is_err());
        assert!(note("groceries", &[]).validate().is_ok());
    }

    #[test]
    fn tag_lookup_honours_case_mode() {
        let n = note("t", &["Work", "home"]);
        assert!(n.has_tag("Work", CaseSensitivity::Sensitive));
        assert!(!n.has_tag("work", CaseSensitivity::Sensitive));
        assert!(n.has_tag("work", CaseSensitivity::Insensitive));
        assert!(!n.has_tag("wor", CaseSensitivity::Insensitive));
    }
}
