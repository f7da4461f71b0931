//! Rules and their selection by a run configuration.

use serde::{Deserialize, Serialize};

use crate::flags::FlagSet;
use crate::run::RunConfiguration;
use crate::vocab::Group;

/// A catalog rule as supplied by the rule store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Repository the rule was collected from
    pub source: String,
    pub id: String,
    pub severity: Option<String>,
    pub languages: Vec<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Rule YAML
    #[serde(default)]
    pub content: String,
}

impl Rule {
    /// `source/id`, unique across the catalog.
    pub fn key(&self) -> String {
        format!("{}/{}", self.source, self.id)
    }
}

/// Whether an optional field's value is selected. An empty group accepts all.
fn optional_matches(flags: &FlagSet, value: Option<&str>) -> bool {
    if flags.is_empty() {
        return true;
    }
    flags
        .vocabulary()
        .index_of_optional(value)
        .is_some_and(|i| flags.contains(i))
}

impl RunConfiguration {
    /// Test whether a rule belongs to the configured run.
    ///
    /// Groups with nothing selected do not constrain. A rule matches the
    /// languages group when any of its languages is selected.
    pub fn selects(&self, rule: &Rule) -> bool {
        let languages = self.group(Group::Languages);
        let language_match = languages.is_empty()
            || rule
                .languages
                .iter()
                .any(|l| languages.is_set(&l.to_lowercase()));

        language_match
            && optional_matches(self.group(Group::Categories), rule.category.as_deref())
            && optional_matches(self.group(Group::Severities), rule.severity.as_deref())
    }

    /// Rules of `rules` that belong to the configured run.
    pub fn select_rules<'r>(&self, rules: impl IntoIterator<Item = &'r Rule>) -> Vec<&'r Rule> {
        rules.into_iter().filter(|r| self.selects(r)).collect()
    }
}
