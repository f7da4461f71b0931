//! Group vocabularies.
//!
//! Each group of flags has a fixed table mapping flag names to dense indices.
//! Table order is declaration order, which is also the display order, and the
//! indices are part of the wire format: never reorder or renumber an entry,
//! only append.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::RunsError;

/// Position of a flag inside its group's vocabulary.
pub type FlagIndex = u32;

/// Name used for the "no value" sentinel in groups that have one.
pub const NULL_FLAG: &str = "null";

/// One named flag of a vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabEntry {
    pub name: &'static str,
    pub index: FlagIndex,
    pub label: &'static str,
}

const fn entry(name: &'static str, index: FlagIndex, label: &'static str) -> VocabEntry {
    VocabEntry { name, index, label }
}

pub const CATEGORY_ENTRIES: &[VocabEntry] = &[
    entry(NULL_FLAG, 0, "Uncategorized"),
    entry("best-practice", 1, "Best Practice"),
    entry("correctness", 2, "Correctness"),
    entry("maintainability", 3, "Maintainability"),
    entry("performance", 4, "Performance"),
    entry("portability", 5, "Portability"),
    entry("security", 6, "Security"),
];

pub const LANGUAGE_ENTRIES: &[VocabEntry] = &[
    entry("apex", 0, "Apex"),
    entry("bash", 1, "Bash"),
    entry("c", 2, "C"),
    entry("cairo", 3, "Cairo"),
    entry("clojure", 4, "Clojure"),
    entry("cpp", 5, "C++"),
    entry("csharp", 6, "C#"),
    entry("dart", 7, "Dart"),
    entry("dockerfile", 8, "Dockerfile"),
    entry("ex", 9, "Elixir"),
    entry("generic", 10, "Generic"),
    entry("go", 11, "Go"),
    entry("html", 12, "HTML"),
    entry("java", 13, "Java"),
    entry("js", 14, "JavaScript"),
    entry("json", 15, "JSON"),
    entry("jsonnet", 16, "Jsonnet"),
    entry("julia", 17, "Julia"),
    entry("kt", 18, "Kotlin"),
    entry("lisp", 19, "Lisp"),
    entry("lua", 20, "Lua"),
    entry("ocaml", 21, "OCaml"),
    entry("php", 22, "PHP"),
    entry("python", 23, "Python"),
    entry("r", 24, "R"),
    entry("ruby", 25, "Ruby"),
    entry("rust", 26, "Rust"),
    entry("scala", 27, "Scala"),
    entry("scheme", 28, "Scheme"),
    entry("solidity", 29, "Solidity"),
    entry("swift", 30, "Swift"),
    entry("tf", 31, "Terraform"),
    entry("ts", 32, "TypeScript"),
    entry("yaml", 33, "YAML"),
    entry("xml", 34, "XML"),
];

pub const SEVERITY_ENTRIES: &[VocabEntry] = &[
    entry(NULL_FLAG, 0, "Unset"),
    entry("INVENTORY", 1, "Inventory"),
    entry("INFO", 2, "Info"),
    entry("WARNING", 3, "Warning"),
    entry("ERROR", 4, "Error"),
];

pub const FEATURE_ENTRIES: &[VocabEntry] = &[
    entry("export_text", 0, "Text export"),
    entry("export_sarif", 1, "SARIF export"),
    entry("export_json", 2, "JSON export"),
];

lazy_static! {
    pub static ref CATEGORIES: Vocabulary =
        Vocabulary::new(Group::Categories, CATEGORY_ENTRIES, Some(0));
    pub static ref LANGUAGES: Vocabulary = Vocabulary::new(Group::Languages, LANGUAGE_ENTRIES, None);
    pub static ref SEVERITIES: Vocabulary =
        Vocabulary::new(Group::Severities, SEVERITY_ENTRIES, Some(0));
    pub static ref FEATURES: Vocabulary = Vocabulary::new(Group::Features, FEATURE_ENTRIES, None);
}

/// The flag groups of a run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Categories,
    Languages,
    Severities,
    Features,
}

impl Group {
    /// Wire order. A code's n-th byte group belongs to `ORDER[n]`.
    pub const ORDER: [Group; 4] = [
        Group::Categories,
        Group::Languages,
        Group::Severities,
        Group::Features,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Languages => "languages",
            Self::Severities => "severities",
            Self::Features => "features",
        }
    }

    /// Position of this group in [`Group::ORDER`].
    pub fn position(&self) -> usize {
        match self {
            Self::Categories => 0,
            Self::Languages => 1,
            Self::Severities => 2,
            Self::Features => 3,
        }
    }

    pub fn vocabulary(&self) -> &'static Vocabulary {
        match self {
            Self::Categories => &*CATEGORIES,
            Self::Languages => &*LANGUAGES,
            Self::Severities => &*SEVERITIES,
            Self::Features => &*FEATURES,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Group {
    type Err = RunsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "categories" | "category" => Ok(Self::Categories),
            "languages" | "language" => Ok(Self::Languages),
            "severities" | "severity" => Ok(Self::Severities),
            "features" | "feature" => Ok(Self::Features),
            _ => Err(RunsError::UnknownGroup(s.to_string())),
        }
    }
}

/// Ordered name/index table for one group, with a name lookup.
#[derive(Debug)]
pub struct Vocabulary {
    group: Group,
    entries: &'static [VocabEntry],
    null_index: Option<FlagIndex>,
    by_name: HashMap<&'static str, FlagIndex>,
}

impl Vocabulary {
    fn new(group: Group, entries: &'static [VocabEntry], null_index: Option<FlagIndex>) -> Self {
        debug_assert!(entries
            .iter()
            .enumerate()
            .all(|(i, e)| e.index as usize == i));
        let by_name = entries.iter().map(|e| (e.name, e.index)).collect();
        Self {
            group,
            entries,
            null_index,
            by_name,
        }
    }

    pub fn group(&self) -> Group {
        self.group
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &'static [VocabEntry] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest declared index, `None` for an empty table.
    pub fn max_index(&self) -> Option<FlagIndex> {
        self.entries.iter().map(|e| e.index).max()
    }

    pub fn index_of(&self, name: &str) -> Option<FlagIndex> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, index: FlagIndex) -> Option<&'static str> {
        self.entry(index).map(|e| e.name)
    }

    pub fn entry(&self, index: FlagIndex) -> Option<&'static VocabEntry> {
        self.entries.get(index as usize).filter(|e| e.index == index)
    }

    pub fn contains(&self, index: FlagIndex) -> bool {
        self.entry(index).is_some()
    }

    /// Sentinel index standing for "no value", if this group has one.
    pub fn null_index(&self) -> Option<FlagIndex> {
        self.null_index
    }

    /// Index of an optional record field: an absent value maps to the sentinel.
    pub fn index_of_optional(&self, name: Option<&str>) -> Option<FlagIndex> {
        match name {
            Some(name) => self.index_of(name),
            None => self.null_index,
        }
    }

    /// Index for `name`, or an [`RunsError::UnknownFlag`].
    pub fn require(&self, name: &str) -> crate::Result<FlagIndex> {
        self.index_of(name).ok_or_else(|| RunsError::UnknownFlag {
            group: self.group.name().to_string(),
            name: name.to_string(),
        })
    }
}

/// Display label for a language, e.g. `cpp` -> `C++`.
///
/// Unknown languages are returned unchanged.
pub fn language_label(language: &str) -> String {
    LANGUAGES
        .index_of(&language.to_lowercase())
        .and_then(|i| LANGUAGES.entry(i))
        .map(|e| e.label.to_string())
        .unwrap_or_else(|| language.to_string())
}

/// Badge color for a severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeverityColor {
    Red,
    Purple,
    Blue,
    Teal,
    Green,
    CoolGray,
}

impl SeverityColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Purple => "purple",
            Self::Blue => "blue",
            Self::Teal => "teal",
            Self::Green => "green",
            Self::CoolGray => "cool-gray",
        }
    }
}

/// Color for a rule severity; `None` is a rule without severity.
pub fn severity_color(severity: Option<&str>) -> SeverityColor {
    match severity {
        None => SeverityColor::Teal,
        Some("INVENTORY") => SeverityColor::Green,
        Some("INFO") => SeverityColor::Blue,
        Some("WARNING") => SeverityColor::Purple,
        Some("ERROR") => SeverityColor::Red,
        Some(_) => SeverityColor::CoolGray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_dense() {
        for group in Group::ORDER {
            let vocab = group.vocabulary();
            for (i, e) in vocab.entries().iter().enumerate() {
                assert_eq!(e.index as usize, i, "{group}: {}", e.name);
                assert_eq!(vocab.index_of(e.name), Some(e.index));
            }
            assert_eq!(vocab.max_index(), Some(vocab.len() as FlagIndex - 1));
        }
    }

    #[test]
    fn sentinels() {
        assert_eq!(CATEGORIES.null_index(), Some(0));
        assert_eq!(SEVERITIES.null_index(), Some(0));
        assert_eq!(LANGUAGES.null_index(), None);
        assert_eq!(FEATURES.null_index(), None);
        assert_eq!(CATEGORIES.index_of_optional(None), Some(0));
        assert_eq!(LANGUAGES.index_of_optional(None), None);
        assert_eq!(SEVERITIES.index_of_optional(Some("ERROR")), Some(4));
    }

    #[test]
    fn lookup() {
        assert_eq!(LANGUAGES.index_of("go"), Some(11));
        assert_eq!(LANGUAGES.index_of("python"), Some(23));
        assert_eq!(LANGUAGES.name_of(34), Some("xml"));
        assert_eq!(LANGUAGES.name_of(35), None);
        assert!(LANGUAGES.require("cobol").is_err());
    }

    #[test]
    fn group_from_str() {
        assert_eq!("Languages".parse::<Group>().unwrap(), Group::Languages);
        assert_eq!("severity".parse::<Group>().unwrap(), Group::Severities);
        assert!("colors".parse::<Group>().is_err());
        for (i, group) in Group::ORDER.iter().enumerate() {
            assert_eq!(group.position(), i);
        }
    }

    #[test]
    fn labels() {
        assert_eq!(language_label("cpp"), "C++");
        assert_eq!(language_label("TF"), "Terraform");
        assert_eq!(language_label("cobol"), "cobol");
    }

    #[test]
    fn severity_colors() {
        assert_eq!(severity_color(None), SeverityColor::Teal);
        assert_eq!(severity_color(Some("ERROR")), SeverityColor::Red);
        assert_eq!(severity_color(Some("WARNING")).as_str(), "purple");
        assert_eq!(severity_color(Some("bogus")), SeverityColor::CoolGray);
    }
}
