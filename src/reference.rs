//! # Reference Energies
//!
//! The best energy known for each problem, used as the top of the score range.
//! A table is embedded in the binary and can be replaced by a file at startup.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

/// Best energies known from the public scoreboard, keyed by problem name.
const BUILTIN_JSON: &str = include_str!("../data/reference_best.json");

/// Known-best energy per problem, looked up case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTable {
    by_name: HashMap<String, i64>,
}

// Parse the embedded table once.
static BUILTIN: Lazy<ReferenceTable> = Lazy::new(|| {
    ReferenceTable::from_json(BUILTIN_JSON).expect("embedded reference table must be valid")
});

impl ReferenceTable {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        ReferenceTable {
            by_name: pairs
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_lowercase(), v))
                .collect(),
        }
    }

    /// Parses a JSON object mapping problem names to energies.
    pub fn from_json(s: &str) -> Result<Self> {
        let map: HashMap<String, i64> =
            serde_json::from_str(s).context("reference table must map names to integers")?;
        Ok(Self::from_pairs(map))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&s).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// The table compiled into the binary.
    pub fn builtin() -> &'static ReferenceTable {
        &BUILTIN
    }

    /// Loads `path` if given, otherwise clones the builtin table.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Ok(Self::builtin().clone()),
        }
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.by_name.get(&name.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
