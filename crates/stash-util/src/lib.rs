//! Small helpers shared across the stash crates.
//!
//! Currently this is whole-element string search over slices, used for
//! keyword lookups such as log level names and note tags.

/// Whether string comparisons honor letter case.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CaseSensitivity {
    /// `"Info"` and `"info"` are different strings.
    #[default]
    Sensitive,
    /// Both sides are lowercased before comparing.
    Insensitive,
}

/// Find the index of the first element of `haystack` equal to `needle`.
///
/// Only complete elements match: `"as"` does not match `"asd"`. The empty
/// string matches an empty element. Returns `None` if nothing matches.
pub fn find_exact<S: AsRef<str>>(
    haystack: &[S],
    needle: &str,
    case: CaseSensitivity,
) -> Option<usize> {
    match case {
        CaseSensitivity::Sensitive => haystack.iter().position(|hay| hay.as_ref() == needle),
        CaseSensitivity::Insensitive => {
            let needle = needle.to_lowercase();
            haystack
                .iter()
                .position(|hay| hay.as_ref().to_lowercase() == needle)
        }
    }
}
