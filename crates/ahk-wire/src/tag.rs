//! Response type tags and the tag-to-kind registry.
//!
//! Every response payload kind is identified on the wire by a 3-character
//! tag (a "type order mark"). Tags are not chosen by hand: they are dealt
//! out sequentially by a deterministic generator over the alphabet
//! `0-9A-Za-z`, in the order the kinds appear in [`crate::payload::KINDS`].
//! Both sides of the protocol build the same table from the same ordered
//! list, so the mapping is stable for the lifetime of the process.

use std::sync::OnceLock;

use crate::error::{Result, WireError};
use crate::payload::{KINDS, Kind};

/// Digits, then uppercase, then lowercase. 62 symbols.
const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Number of distinct 3-character tags (62^3).
pub const TAG_SPACE: u32 = 62 * 62 * 62;

/// A 3-character response type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag([u8; 3]);

impl Tag {
    /// Parse a tag from a raw envelope line.
    ///
    /// Trailing `\r`/`\n` bytes are tolerated; the remaining content must
    /// be exactly 3 bytes from the tag alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Framing`] if the line is not a well-formed tag.
    pub fn parse(line: &[u8]) -> Result<Self> {
        let trimmed = trim_line_ending(line);
        let bytes: [u8; 3] = trimmed
            .try_into()
            .map_err(|_| WireError::framing(format!("tag line is not 3 bytes: {line:?}")))?;
        if !bytes.iter().all(|b| ALPHABET.contains(b)) {
            return Err(WireError::framing(format!(
                "tag contains bytes outside the tag alphabet: {bytes:?}"
            )));
        }
        Ok(Self(bytes))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        // Invariant: constructed only from ALPHABET bytes, which are ASCII.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deals out tags in deterministic order: `000`, `001`, ... `00z`, `010`, ...
///
/// Exhausting the 62^3 tag space is a fatal configuration error on the
/// writer side; the generator reports it rather than wrapping around.
#[derive(Debug, Default)]
pub struct TagGenerator {
    next_index: u32,
}

impl TagGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next tag in sequence.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Framing`] once all `62^3` tags have been dealt.
    pub fn next_tag(&mut self) -> Result<Tag> {
        if self.next_index >= TAG_SPACE {
            return Err(WireError::framing("tag space exhausted"));
        }
        let index = self.next_index;
        self.next_index += 1;
        Ok(tag_for_index(index))
    }
}

fn tag_for_index(index: u32) -> Tag {
    let base = u32::try_from(ALPHABET.len()).unwrap_or(62);
    let a = ALPHABET[(index / (base * base)) as usize % ALPHABET.len()];
    let b = ALPHABET[(index / base) as usize % ALPHABET.len()];
    let c = ALPHABET[index as usize % ALPHABET.len()];
    Tag([a, b, c])
}

/// The tag-to-kind lookup table, built once from [`KINDS`].
#[derive(Debug)]
pub struct TagRegistry {
    entries: Vec<(Tag, Kind)>,
}

impl TagRegistry {
    /// Build the registry by registering every kind in declaration order.
    ///
    /// # Panics
    ///
    /// Panics if two kinds would share a tag or a kind appears twice in
    /// [`KINDS`]; both are programming errors in the kind list itself.
    #[must_use]
    pub fn build() -> Self {
        Self::build_from(KINDS)
    }

    /// Build a registry from an explicit ordered kind list.
    ///
    /// # Panics
    ///
    /// Panics if a kind appears twice in `kinds` or two kinds would share
    /// a tag.
    #[must_use]
    pub fn build_from(kinds: &[Kind]) -> Self {
        let mut generator = TagGenerator::new();
        let mut entries: Vec<(Tag, Kind)> = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            // kinds.len() << TAG_SPACE, so the generator cannot run dry here.
            let tag = generator
                .next_tag()
                .unwrap_or_else(|e| panic!("tag registration failed for {kind:?}: {e}"));
            assert!(
                !entries.iter().any(|(t, _)| *t == tag),
                "duplicate tag {tag} while registering {kind:?}"
            );
            assert!(
                !entries.iter().any(|(_, k)| *k == kind),
                "kind {kind:?} registered twice"
            );
            entries.push((tag, kind));
        }
        Self { entries }
    }

    /// The process-wide registry instance.
    #[must_use]
    pub fn global() -> &'static Self {
        static REGISTRY: OnceLock<TagRegistry> = OnceLock::new();
        REGISTRY.get_or_init(Self::build)
    }

    /// Resolve a tag to its payload kind, if registered.
    #[must_use]
    pub fn lookup(&self, tag: Tag) -> Option<Kind> {
        self.entries
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|&(_, kind)| kind)
    }

    /// The tag assigned to a kind. Every kind in [`KINDS`] has exactly one.
    #[must_use]
    pub fn tag_of(&self, kind: Kind) -> Option<Tag> {
        self.entries
            .iter()
            .find(|(_, k)| *k == kind)
            .map(|&(tag, _)| tag)
    }
}

pub(crate) fn trim_line_ending(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && (line[end - 1] == b'\n' || line[end - 1] == b'\r') {
        end -= 1;
    }
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_yields_tags_in_fixed_order() {
        let mut generator = TagGenerator::new();
        let expected = ["000", "001", "002", "003", "004", "005", "006", "007", "008", "009"];
        for want in expected {
            assert_eq!(generator.next_tag().unwrap().as_str(), want);
        }
        // Index 10 rolls into the uppercase range.
        assert_eq!(generator.next_tag().unwrap().as_str(), "00A");
    }

    #[test]
    fn test_generator_exhaustion_is_an_error() {
        let mut generator = TagGenerator::new();
        let mut last = None;
        for _ in 0..TAG_SPACE {
            last = Some(generator.next_tag().unwrap());
        }
        assert_eq!(last.unwrap().as_str(), "zzz");
        assert!(generator.next_tag().is_err());
    }

    #[test]
    fn test_registry_tags_follow_registration_order() {
        let registry = TagRegistry::build();
        for (i, &kind) in KINDS.iter().enumerate() {
            let tag = registry.tag_of(kind).unwrap();
            let index = u32::try_from(i).unwrap();
            assert_eq!(tag, tag_for_index(index), "kind {kind:?} out of order");
            assert_eq!(registry.lookup(tag), Some(kind));
        }
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_registry_rejects_duplicate_kind() {
        let _ = TagRegistry::build_from(&[Kind::Integer, Kind::String, Kind::Integer]);
    }

    #[test]
    fn test_registry_rejects_unknown_tag() {
        let registry = TagRegistry::global();
        let tag = Tag::parse(b"zzz\n").unwrap();
        assert_eq!(registry.lookup(tag), None);
    }

    #[test]
    fn test_tag_parse_tolerates_crlf() {
        assert_eq!(Tag::parse(b"00A\r\n").unwrap().as_str(), "00A");
        assert_eq!(Tag::parse(b"00A").unwrap().as_str(), "00A");
    }

    #[test]
    fn test_tag_parse_rejects_bad_lines() {
        assert!(Tag::parse(b"0\n").is_err());
        assert!(Tag::parse(b"0000\n").is_err());
        assert!(Tag::parse(b"0,1\n").is_err());
        assert!(Tag::parse(b"").is_err());
    }
}
