//! Output Key Value Object
//!
//! A content-addressed name for one entry: `<basename>-<hash8>`.
//! Only the entry's own bytes are hashed. When a shared helper changes, its
//! shared chunk is renamed and the entries importing it keep their names.

use std::fmt;
use std::path::Path;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Number of digest characters kept in a key
pub const HASH_LEN: usize = 8;

/// First [`HASH_LEN`] characters of the base64url SHA-256 digest of `content`.
pub fn hash8(content: &[u8]) -> String {
    let digest = Sha256::digest(content);
    let mut encoded = URL_SAFE_NO_PAD.encode(digest);
    encoded.truncate(HASH_LEN);
    encoded
}

/// Output key value object
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OutputKey(String);

impl OutputKey {
    /// Compute the key for an entry path and its raw contents.
    ///
    /// The basename is the file name without its last extension, so
    /// `src/content/listing.ts` becomes `listing`.
    pub fn compute(path: &Path, content: &[u8]) -> Self {
        let base = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self(format!("{}-{}", base, hash8(content)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The hash part after the last `-`
    pub fn hash(&self) -> &str {
        &self.0[self.0.len() - HASH_LEN..]
    }

    /// File name for this key with the given final extension (including the dot)
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}{}", self.0, extension)
    }
}

impl fmt::Display for OutputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OutputKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn hash8_is_eight_url_safe_chars() {
        let hash = hash8(b"console.log('hello');");
        assert_eq!(hash.len(), 8);
        assert!(hash
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn hash8_matches_known_digest() {
        // sha256("") base64url = 47DEQpj8HBSa-_TImW-5JCeuQeRkm5NMpJWZG3hSuFU
        assert_eq!(hash8(b""), "47DEQpj8");
    }

    #[test]
    fn key_uses_stem_and_hash() {
        let key = OutputKey::compute(&PathBuf::from("src/content/listing.ts"), b"");
        assert_eq!(key.as_str(), "listing-47DEQpj8");
        assert_eq!(key.hash(), "47DEQpj8");
    }

    #[test]
    fn key_keeps_inner_dots_of_basename() {
        let key = OutputKey::compute(&PathBuf::from("a/tags.editor.scss"), b"");
        assert_eq!(key.as_str(), "tags.editor-47DEQpj8");
    }

    #[test]
    fn same_content_same_key() {
        let path = PathBuf::from("header.ts");
        let k1 = OutputKey::compute(&path, b"export {}");
        let k2 = OutputKey::compute(&path, b"export {}");
        assert_eq!(k1, k2);
    }

    #[test]
    fn different_content_different_key() {
        let path = PathBuf::from("header.ts");
        let k1 = OutputKey::compute(&path, b"export {}");
        let k2 = OutputKey::compute(&path, b"export { }");
        assert_ne!(k1, k2);
    }

    #[test]
    fn directory_does_not_affect_key() {
        let k1 = OutputKey::compute(&PathBuf::from("a/tags.ts"), b"x");
        let k2 = OutputKey::compute(&PathBuf::from("b/tags.ts"), b"x");
        assert_eq!(k1, k2);
    }

    #[test]
    fn file_name_appends_extension() {
        let key = OutputKey::compute(&PathBuf::from("tags.scss"), b"");
        assert_eq!(key.file_name(".css"), "tags-47DEQpj8.css");
    }
}
