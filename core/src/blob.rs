use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Languages the pipeline knows how to tag inputs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Go,
    Haskell,
    Java,
    JavaScript,
    #[serde(rename = "JSON")]
    Json,
    Markdown,
    #[serde(rename = "PHP")]
    Php,
    Python,
    Ruby,
    Rust,
    TypeScript,
    #[serde(rename = "TSX")]
    Tsx,
}

impl Language {
    pub fn name(self) -> &'static str {
        match self {
            Self::Go => "Go",
            Self::Haskell => "Haskell",
            Self::Java => "Java",
            Self::JavaScript => "JavaScript",
            Self::Json => "JSON",
            Self::Markdown => "Markdown",
            Self::Php => "PHP",
            Self::Python => "Python",
            Self::Ruby => "Ruby",
            Self::Rust => "Rust",
            Self::TypeScript => "TypeScript",
            Self::Tsx => "TSX",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let lang = match ext.to_ascii_lowercase().as_str() {
            "go" => Self::Go,
            "hs" => Self::Haskell,
            "java" => Self::Java,
            "js" | "mjs" | "cjs" | "jsx" => Self::JavaScript,
            "json" => Self::Json,
            "md" | "markdown" => Self::Markdown,
            "php" => Self::Php,
            "py" => Self::Python,
            "rb" => Self::Ruby,
            "rs" => Self::Rust,
            "ts" => Self::TypeScript,
            "tsx" => Self::Tsx,
            _ => return None,
        };
        Some(lang)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lang = match s.trim().to_ascii_lowercase().as_str() {
            "go" => Self::Go,
            "haskell" => Self::Haskell,
            "java" => Self::Java,
            "javascript" => Self::JavaScript,
            "json" => Self::Json,
            "markdown" => Self::Markdown,
            "php" => Self::Php,
            "python" => Self::Python,
            "ruby" => Self::Ruby,
            "rust" => Self::Rust,
            "typescript" => Self::TypeScript,
            "tsx" => Self::Tsx,
            other => return Err(format!("unknown language: {other}")),
        };
        Ok(lang)
    }
}

/// An input record: a path, an optional language tag and the raw content.
///
/// The content is reference counted so handing a blob to a concurrent branch
/// never copies or mutates the underlying bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub path: PathBuf,
    pub language: Option<Language>,
    pub source: Bytes,
}

impl Blob {
    pub fn new(path: impl Into<PathBuf>, language: Option<Language>, source: impl Into<Bytes>) -> Self {
        Self {
            path: path.into(),
            language,
            source: source.into(),
        }
    }

    pub fn path_display(&self) -> String {
        self.path.display().to_string()
    }

    /// Language name used in log tags and failure messages.
    pub fn language_name(&self) -> &'static str {
        self.language.map(Language::name).unwrap_or("Unknown")
    }

    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.source)
    }
}

/// Two sides of a comparison, either of which may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pair<T> {
    Before(T),
    After(T),
    Both(T, T),
}

impl<T> Pair<T> {
    pub fn before(&self) -> Option<&T> {
        match self {
            Self::Before(b) | Self::Both(b, _) => Some(b),
            Self::After(_) => None,
        }
    }

    pub fn after(&self) -> Option<&T> {
        match self {
            Self::After(a) | Self::Both(_, a) => Some(a),
            Self::Before(_) => None,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Pair<U> {
        match self {
            Self::Before(b) => Pair::Before(f(b)),
            Self::After(a) => Pair::After(f(a)),
            Self::Both(b, a) => Pair::Both(f(b), f(a)),
        }
    }
}

pub type BlobPair = Pair<Blob>;

/// A file the source reader should load, with an optional explicit language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSpec {
    pub path: PathBuf,
    #[serde(default)]
    pub language: Option<Language>,
}

impl FileSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: Option<Language>) -> Self {
        self.language = language;
        self
    }

    /// The explicit language, falling back to detection from the extension.
    pub fn resolved_language(&self) -> Option<Language> {
        self.language.or_else(|| Language::from_path(&self.path))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    Files(Vec<FileSpec>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairSource {
    Stdin,
    Files(Vec<Pair<FileSpec>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}
