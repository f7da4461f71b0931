//! sgs-runs: run-configuration codes for the semgrep rule catalog.
//!
//! A run configuration selects flags in four groups (categories, languages,
//! severities, output features) and packs the selection into a short base58
//! code that can be shared and decoded back into the same selection.
//!
//! # Wire format
//!
//! - Groups in fixed order: categories, languages, severities, features.
//! - Each group is one or more bytes; byte `j` carries flag indices
//!   `j*7 ..= j*7+6` in its low 7 bits.
//! - Bit 7 is set on every byte of a group except the last.
//! - Groups are concatenated without separators and rendered with the
//!   Bitcoin base58 alphabet.
//!
//! A code with fewer groups than declared decodes with the missing groups
//! empty, so codes stay valid when groups are appended.

#[cfg(feature = "native")]
uniffi::setup_scaffolding!();

pub mod config;
pub mod error;
pub mod flags;
pub mod rule;
pub mod run;
pub mod transcoder;
pub mod vocab;

pub use config::*;
pub use error::*;
pub use flags::*;
pub use rule::*;
pub use run::*;
pub use vocab::*;
