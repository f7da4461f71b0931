//! Run configurations and their shareable codes.
//!
//! A run configuration holds one [`FlagSet`] per [`Group`]. Its code is the
//! concatenation of every group's packed bytes, in [`Group::ORDER`], rendered
//! as base58. Trimming drops trailing zero bytes from the whole sequence;
//! decoding a code with fewer groups than declared leaves the remaining groups
//! as they were.

use std::ops::Deref;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::config::CodecConfig;
use crate::flags::FlagSet;
use crate::transcoder::{self, get_set_bits};
use crate::vocab::{FlagIndex, Group};
use crate::Result;

const ALPHABET: &bs58::Alphabet = bs58::Alphabet::BITCOIN;

/// Render bytes as base58 text.
pub fn encode_bytes(bytes: &[u8]) -> String {
    bs58::encode(bytes).with_alphabet(ALPHABET).into_string()
}

/// Parse base58 text back to bytes. Surrounding whitespace is ignored.
pub fn decode_bytes(code: &str) -> Result<Vec<u8>> {
    Ok(bs58::decode(code.trim()).with_alphabet(ALPHABET).into_vec()?)
}

/// Selected flag names of every group, the portable form of a configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "native", derive(uniffi::Record))]
pub struct Selection {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub severities: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Selection {
    pub fn names(&self, group: Group) -> &[String] {
        match group {
            Group::Categories => &self.categories,
            Group::Languages => &self.languages,
            Group::Severities => &self.severities,
            Group::Features => &self.features,
        }
    }

    pub fn names_mut(&mut self, group: Group) -> &mut Vec<String> {
        match group {
            Group::Categories => &mut self.categories,
            Group::Languages => &mut self.languages,
            Group::Severities => &mut self.severities,
            Group::Features => &mut self.features,
        }
    }

    pub fn is_empty(&self) -> bool {
        Group::ORDER.iter().all(|g| self.names(*g).is_empty())
    }
}

/// Flag sets of all groups plus the code derived from them.
///
/// Every mutation republishes the code to receivers from
/// [`subscribe`](Self::subscribe) before it returns.
#[derive(Debug)]
pub struct RunConfiguration {
    groups: [FlagSet; 4],
    trim: bool,
    code: watch::Sender<String>,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self::new(false)
    }
}

impl RunConfiguration {
    /// An empty configuration.
    pub fn new(trim: bool) -> Self {
        let groups = Group::ORDER.map(FlagSet::empty);
        let initial = Self::encode_groups(&groups, trim);
        let (code, _) = watch::channel(initial);
        Self { groups, trim, code }
    }

    /// An empty configuration using the settings' trim mode.
    pub fn with_config(config: &CodecConfig) -> Self {
        Self::new(config.trim)
    }

    pub fn from_bytes(bytes: &[u8], trim: bool) -> Self {
        let mut config = Self::new(trim);
        config.set_config(bytes);
        config
    }

    /// Decode a code into a fresh, untrimmed configuration.
    pub fn from_code(code: &str) -> Result<Self> {
        let bytes = decode_bytes(code)?;
        Ok(Self::from_bytes(&bytes, false))
    }

    pub fn from_selection(selection: &Selection, trim: bool) -> Result<Self> {
        let mut config = Self::new(trim);
        for group in Group::ORDER {
            let flags = &mut config.groups[group.position()];
            for name in selection.names(group) {
                flags.set(name)?;
            }
        }
        config.publish();
        Ok(config)
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.set_trim(trim);
        self
    }

    pub fn trim(&self) -> bool {
        self.trim
    }

    pub fn set_trim(&mut self, trim: bool) {
        self.trim = trim;
        self.publish();
    }

    pub fn group(&self, group: Group) -> &FlagSet {
        &self.groups[group.position()]
    }

    pub fn categories(&self) -> &FlagSet {
        self.group(Group::Categories)
    }

    pub fn languages(&self) -> &FlagSet {
        self.group(Group::Languages)
    }

    pub fn severities(&self) -> &FlagSet {
        self.group(Group::Severities)
    }

    pub fn features(&self) -> &FlagSet {
        self.group(Group::Features)
    }

    /// Mutable access to one group; each change republishes the code.
    pub fn group_mut(&mut self, group: Group) -> GroupEdit<'_> {
        GroupEdit {
            config: self,
            group,
        }
    }

    pub fn set_flag(&mut self, group: Group, name: &str) -> Result<bool> {
        self.group_mut(group).set(name)
    }

    pub fn unset_flag(&mut self, group: Group, name: &str) -> Result<bool> {
        self.group_mut(group).unset(name)
    }

    /// Reload the groups from a packed byte stream.
    ///
    /// Parsed groups are assigned in [`Group::ORDER`]. Declared groups the
    /// stream does not reach keep their selection; surplus groups are ignored.
    pub fn set_config(&mut self, bytes: &[u8]) {
        let chunks = transcoder::group(bytes);
        if chunks.len() > self.groups.len() {
            tracing::debug!(
                "Ignoring {} surplus groups in run code",
                chunks.len() - self.groups.len()
            );
        }

        for (flags, chunk) in self.groups.iter_mut().zip(&chunks) {
            flags.reload(get_set_bits(chunk));
            let unknown = flags.unknown_indices();
            if !unknown.is_empty() {
                tracing::warn!(
                    "Run code selects {} flags {:?} missing from the vocabulary",
                    flags.group(),
                    unknown
                );
            }
        }

        self.publish();
    }

    /// Replace the selection with the one encoded in `code`.
    ///
    /// Nothing changes when the code is not valid base58.
    pub fn parse(&mut self, code: &str) -> Result<()> {
        let bytes = decode_bytes(code)?;
        tracing::debug!("Parsed run code {:?} into {} bytes", code, bytes.len());
        self.set_config(&bytes);
        Ok(())
    }

    /// Packed form of all groups.
    pub fn to_bytes(&self, trim: bool) -> Vec<u8> {
        Self::pack_groups(&self.groups, trim)
    }

    /// Compute the code for the current selection.
    pub fn calculate(&self, trim: bool) -> String {
        Self::encode_groups(&self.groups, trim)
    }

    /// The most recently published code.
    pub fn code(&self) -> String {
        self.code.borrow().clone()
    }

    /// Receiver that observes every republished code.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.code.subscribe()
    }

    pub fn selection(&self) -> Selection {
        let mut selection = Selection::default();
        for group in Group::ORDER {
            *selection.names_mut(group) = self
                .group(group)
                .get_set_flags()
                .into_iter()
                .map(String::from)
                .collect();
        }
        selection
    }

    fn publish(&self) {
        let code = self.calculate(self.trim);
        tracing::debug!("Publishing run code {}", code);
        self.code.send_replace(code);
    }

    fn pack_groups(groups: &[FlagSet], trim: bool) -> Vec<u8> {
        let mut bytes: Vec<u8> = groups.iter().flat_map(|g| g.to_bytes(trim)).collect();

        if trim {
            // At least one byte stays so an empty configuration is still a token.
            let keep = bytes.iter().rposition(|&b| b != 0).map_or(1, |i| i + 1);
            bytes.truncate(keep);
        }

        bytes
    }

    fn encode_groups(groups: &[FlagSet], trim: bool) -> String {
        encode_bytes(&Self::pack_groups(groups, trim))
    }
}

/// Write handle for one group of a [`RunConfiguration`].
///
/// Reads go through to the underlying [`FlagSet`]; writes republish the code.
pub struct GroupEdit<'a> {
    config: &'a mut RunConfiguration,
    group: Group,
}

impl GroupEdit<'_> {
    fn flags_mut(&mut self) -> &mut FlagSet {
        &mut self.config.groups[self.group.position()]
    }

    pub fn set(&mut self, name: &str) -> Result<bool> {
        let changed = self.flags_mut().set(name)?;
        self.config.publish();
        Ok(changed)
    }

    pub fn unset(&mut self, name: &str) -> Result<bool> {
        let changed = self.flags_mut().unset(name)?;
        self.config.publish();
        Ok(changed)
    }

    /// Select `name` when `on`, deselect it otherwise.
    pub fn toggle(&mut self, name: &str, on: bool) -> Result<bool> {
        if on {
            self.set(name)
        } else {
            self.unset(name)
        }
    }

    pub fn reload(&mut self, indices: impl IntoIterator<Item = FlagIndex>) {
        self.flags_mut().reload(indices);
        self.config.publish();
    }

    pub fn clear(&mut self) {
        self.flags_mut().clear();
        self.config.publish();
    }
}

impl Deref for GroupEdit<'_> {
    type Target = FlagSet;

    fn deref(&self) -> &FlagSet {
        self.config.group(self.group)
    }
}

/// Encode a selection to a run code.
#[cfg_attr(feature = "native", uniffi::export)]
pub fn encode_selection(selection: Selection, trim: bool) -> Result<String> {
    Ok(RunConfiguration::from_selection(&selection, trim)?.code())
}

/// Decode a run code to the selection it names.
#[cfg_attr(feature = "native", uniffi::export)]
pub fn decode_code(code: String) -> Result<Selection> {
    Ok(RunConfiguration::from_code(&code)?.selection())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_trimmed_code_is_a_single_zero_byte() {
        let config = RunConfiguration::new(true);
        assert_eq!(config.to_bytes(true), vec![0]);
        assert_eq!(config.code(), "1");

        let decoded = RunConfiguration::from_code("1").unwrap();
        assert!(decoded.selection().is_empty());
    }

    #[test]
    fn untrimmed_empty_layout() {
        let config = RunConfiguration::default();
        assert_eq!(config.to_bytes(false), vec![0, 128, 128, 128, 128, 0, 0, 0]);
    }

    #[test]
    fn trimming_drops_only_trailing_zeros() {
        let mut config = RunConfiguration::new(true);
        config.set_flag(Group::Languages, "bash").unwrap();
        // categories [0], languages [2], severities and features dropped
        assert_eq!(config.to_bytes(true), vec![0, 2]);

        config.set_flag(Group::Categories, "security").unwrap();
        assert_eq!(config.to_bytes(true), vec![0x40, 2]);
        config.unset_flag(Group::Languages, "bash").unwrap();
        assert_eq!(config.to_bytes(true), vec![0x40]);
        assert_eq!(config.code(), "27");
    }

    #[test]
    fn code_round_trips() {
        let mut config = RunConfiguration::default();
        config.set_flag(Group::Categories, "null").unwrap();
        config.set_flag(Group::Categories, "security").unwrap();
        config.set_flag(Group::Languages, "rust").unwrap();
        config.set_flag(Group::Languages, "xml").unwrap();
        config.set_flag(Group::Severities, "ERROR").unwrap();
        config.set_flag(Group::Features, "export_sarif").unwrap();

        let decoded = RunConfiguration::from_code(&config.code()).unwrap();
        assert_eq!(decoded.selection(), config.selection());
        assert_eq!(decoded.code(), config.code());
    }

    #[test]
    fn short_stream_leaves_trailing_groups_empty() {
        let mut bytes = vec![0x40];
        bytes.extend(FlagSet::from_indices(Group::Languages, [11]).to_bytes(false));

        let config = RunConfiguration::from_bytes(&bytes, false);
        assert_eq!(config.categories().get_set_flags(), vec!["security"]);
        assert_eq!(config.languages().get_set_flags(), vec!["go"]);
        assert!(config.severities().is_empty());
        assert!(config.features().is_empty());
    }

    #[test]
    fn short_stream_keeps_prior_selection_of_unreached_groups() {
        let mut config = RunConfiguration::default();
        config.set_flag(Group::Features, "export_json").unwrap();
        config.set_config(&[0x02]);
        assert_eq!(config.categories().get_set_flags(), vec!["best-practice"]);
        assert_eq!(config.features().get_set_flags(), vec!["export_json"]);
    }

    #[test]
    fn surplus_groups_are_ignored() {
        let config = RunConfiguration::from_bytes(&[0x02, 0x01, 0x04, 0x01, 0x7f, 0x7f], false);
        assert_eq!(config.categories().get_set_flags(), vec!["best-practice"]);
        assert_eq!(config.languages().get_set_flags(), vec!["apex"]);
        assert_eq!(config.severities().get_set_flags(), vec!["INFO"]);
        assert_eq!(config.features().get_set_flags(), vec!["export_text"]);
    }

    #[test]
    fn invalid_code_leaves_configuration_untouched() {
        let mut config = RunConfiguration::default();
        config.set_flag(Group::Languages, "go").unwrap();
        let before = config.code();

        assert!(matches!(config.parse("0OIl"), Err(crate::RunsError::Decode(_))));
        assert_eq!(config.code(), before);
        assert!(config.languages().is_set("go"));
    }

    #[test]
    fn mutations_publish_to_subscribers() {
        let mut config = RunConfiguration::new(true);
        let mut rx = config.subscribe();
        assert_eq!(*rx.borrow_and_update(), "1");

        config.set_flag(Group::Categories, "security").unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "27");

        config.group_mut(Group::Categories).reload([]);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "1");

        config.parse("27").unwrap();
        assert_eq!(*rx.borrow_and_update(), "27");
    }

    #[test]
    fn group_edit_reads_through() {
        let mut config = RunConfiguration::default();
        let mut edit = config.group_mut(Group::Severities);
        edit.toggle("WARNING", true).unwrap();
        assert!(edit.is_set("WARNING"));
        edit.toggle("WARNING", false).unwrap();
        assert!(edit.is_empty());
    }

    #[test]
    fn selection_round_trip() {
        let selection = Selection {
            languages: vec!["python".into(), "go".into()],
            severities: vec!["null".into()],
            ..Default::default()
        };
        let code = encode_selection(selection, true).unwrap();
        let decoded = decode_code(code).unwrap();
        assert_eq!(decoded.languages, vec!["go", "python"]);
        assert_eq!(decoded.severities, vec!["null"]);
        assert!(decoded.categories.is_empty());
    }

    #[test]
    fn selection_with_unknown_name_fails() {
        let selection = Selection {
            features: vec!["export_pdf".into()],
            ..Default::default()
        };
        assert!(matches!(
            encode_selection(selection, false),
            Err(crate::RunsError::UnknownFlag { .. })
        ));
    }
}
