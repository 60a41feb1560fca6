//! Test fixtures - reusable project content for tests.

/// Content script that uses the shared helper
pub const ENTRY_A: &str = r#"import { formatTag } from './shared';

document.querySelectorAll('.tag').forEach((el) => {
  el.textContent = formatTag(el.textContent);
});
"#;

/// Second content script using the same helper
pub const ENTRY_B: &str = r#"import { formatTag } from './shared';

console.log(formatTag('b'));
"#;

/// Helper imported by both entries
pub const SHARED: &str = r#"export function formatTag(tag) {
  return tag.trim().toLowerCase();
}
"#;

/// Pre-built loader living under the deps marker
pub const AMD_DEP: &str = r#"window.amdReady = true;
"#;

pub const STYLESHEET: &str = r#".tag { color: rebeccapurple; }
"#;

/// a.ts and b.ts both importing shared.ts, plus a library and a stylesheet
pub const SHARED_HELPER_PROJECT: &[(&str, &str)] = &[
    ("src/content/a.ts", ENTRY_A),
    ("src/content/b.ts", ENTRY_B),
    ("src/content/shared.ts", SHARED),
    ("src/content/deps/amd.js", AMD_DEP),
    ("src/styles/tags.css", STYLESHEET),
];

/// Manifest injecting the fixture project
pub const MANIFEST: &str = r#"{
  "manifest_version": 3,
  "name": "Fixture",
  "content_scripts": [
    {
      "matches": ["*://*/*"],
      "js": ["src/content/deps/amd.js", "src/content/a.ts"],
      "css": ["src/styles/tags.css"]
    },
    {
      "matches": ["*://*/images/*"],
      "js": ["src/content/deps/amd.js", "src/content/b.ts"]
    }
  ]
}
"#;
