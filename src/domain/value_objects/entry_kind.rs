//! Entry kinds and final output extensions

use std::fmt;
use std::path::Path;

/// How an entry is packaged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Built as a named module in the module-wrapped pass
    Script,
    /// Built in the plain pass, bypassing module wrapping
    Asset(AssetKind),
}

/// Why an entry bypasses module wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Stylesheet or stylesheet-preprocessor source
    Style,
    /// Pre-built third-party code living under the deps marker
    Library,
}

impl EntryKind {
    pub fn is_script(self) -> bool {
        matches!(self, EntryKind::Script)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Script => write!(f, "script"),
            EntryKind::Asset(AssetKind::Style) => write!(f, "style"),
            EntryKind::Asset(AssetKind::Library) => write!(f, "library"),
        }
    }
}

/// Extension an entry has after its kind-specific transformation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputExtension {
    Js,
    Css,
}

impl OutputExtension {
    /// Map a source extension (without the dot, any case) to its final form.
    ///
    /// Returns `None` for extensions the packager does not know how to build.
    pub fn for_source_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "js" | "mjs" | "cjs" | "ts" | "mts" | "tsx" | "jsx" => Some(OutputExtension::Js),
            "css" | "scss" | "sass" | "less" => Some(OutputExtension::Css),
            _ => None,
        }
    }

    /// Final extension of a source path, if it has a known one
    pub fn for_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::for_source_extension)
    }

    /// Extension with its leading dot
    pub fn as_str(self) -> &'static str {
        match self {
            OutputExtension::Js => ".js",
            OutputExtension::Css => ".css",
        }
    }

    pub fn is_stylesheet(self) -> bool {
        self == OutputExtension::Css
    }
}

impl fmt::Display for OutputExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
