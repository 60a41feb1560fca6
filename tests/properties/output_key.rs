//! Property tests for content-hash output keys.

use std::path::Path;

use proptest::prelude::*;

use scriptpack::OutputKey;

fn file_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_-]{0,12}\\.(ts|js|css)").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The same path and bytes always give the same key.
    #[test]
    fn property_key_is_deterministic(
        name in file_name(),
        content in proptest::collection::vec(any::<u8>(), 0..512)
    ) {
        let path = Path::new("src").join(&name);
        prop_assert_eq!(
            OutputKey::compute(&path, &content),
            OutputKey::compute(&path, &content)
        );
    }

    /// PROPERTY: A key is `<stem>-<8 url-safe chars>`.
    #[test]
    fn property_key_shape(
        name in file_name(),
        content in proptest::collection::vec(any::<u8>(), 0..512)
    ) {
        let path = Path::new(&name);
        let key = OutputKey::compute(path, &content);
        let stem = path.file_stem().unwrap().to_string_lossy().into_owned();

        prop_assert_eq!(key.as_str().len(), stem.len() + 9);
        let prefix = format!("{}-", stem);
        prop_assert!(key.as_str().starts_with(&prefix));
        prop_assert!(key
            .hash()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    /// PROPERTY: Changing any single byte changes the hash.
    #[test]
    fn property_one_byte_change_changes_key(
        content in proptest::collection::vec(any::<u8>(), 1..256),
        index in any::<prop::sample::Index>(),
        delta in 1u8..=255
    ) {
        let i = index.index(content.len());
        let mut changed = content.clone();
        changed[i] = changed[i].wrapping_add(delta);

        let path = Path::new("entry.ts");
        prop_assert_ne!(
            OutputKey::compute(path, &content).hash().to_string(),
            OutputKey::compute(path, &changed).hash().to_string()
        );
    }

    /// PROPERTY: The directory never affects the key.
    #[test]
    fn property_directory_does_not_matter(
        dir in proptest::string::string_regex("[a-z]{1,8}(/[a-z]{1,8}){0,3}").unwrap(),
        content in proptest::collection::vec(any::<u8>(), 0..128)
    ) {
        let nested = Path::new(&dir).join("listing.ts");
        prop_assert_eq!(
            OutputKey::compute(&nested, &content),
            OutputKey::compute(Path::new("listing.ts"), &content)
        );
    }
}
