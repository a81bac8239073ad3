//! Pass 1: bidirectional index between compound ids and recognized aliases.

use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};

use super::alias::{classify, AliasKind};
use super::corpus::CorpusReader;

/// Multi-valued mapping table from one identifier to a set of linked ids.
pub type LinkTable = FxHashMap<String, FxHashSet<String>>;

/// Insert a `(key, value)` link into a table with set semantics.
///
/// Repeated identical pairs are idempotent; no string is cloned when the
/// entry already exists (hot path over 10^8 corpus lines).
pub(crate) fn insert_link(table: &mut LinkTable, key: &str, value: &str) {
    if let Some(values) = table.get_mut(key) {
        if !values.contains(value) {
            values.insert(value.to_string());
        }
    } else {
        let mut values = FxHashSet::default();
        values.insert(value.to_string());
        table.insert(key.to_string(), values);
    }
}

/// The four mapping tables built from one full pass over the corpus.
///
/// The corpus has no direct CAS-ChEBI link; the compound id is the only
/// bridge, so both directions of each recognized relation are indexed.
/// All tables are built once and read-only afterwards.
#[derive(Debug, Default)]
pub struct SynonymIndex {
    /// Mapping from ChEBI id to the compound ids it aliases.
    pub chebi_to_compounds: LinkTable,
    /// Mapping from CAS number to the compound ids it aliases.
    pub cas_to_compounds: LinkTable,
    /// Mapping from compound id to its ChEBI ids.
    pub compound_to_chebis: LinkTable,
    /// Mapping from compound id to its CAS numbers.
    pub compound_to_cas: LinkTable,
}

impl SynonymIndex {
    /// Build the index from one full pass over the corpus at `path`.
    ///
    /// Aliases classifying as `Other` are discarded and never stored.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the (possibly gzip-compressed) corpus file.
    ///
    /// # Returns
    ///
    /// The populated `SynonymIndex`.
    ///
    /// # Errors
    ///
    /// If anything goes wrong, it returns a generic `anyhow::Error`.
    pub fn load<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        let mut reader = CorpusReader::open(path)?;
        let mut index = Self::default();

        while let Some((compound_id, alias)) = reader.read_pair()? {
            match classify(alias) {
                AliasKind::Chebi => {
                    insert_link(&mut index.chebi_to_compounds, alias, compound_id);
                    insert_link(&mut index.compound_to_chebis, compound_id, alias);
                }
                AliasKind::Cas => {
                    insert_link(&mut index.cas_to_compounds, alias, compound_id);
                    insert_link(&mut index.compound_to_cas, compound_id, alias);
                }
                AliasKind::Other => (),
            }
        }

        tracing::debug!(
            "indexed {} ChEBI ids, {} CAS numbers, {} compounds with ChEBI ids, \
             {} compounds with CAS numbers",
            index.chebi_to_compounds.len(),
            index.cas_to_compounds.len(),
            index.compound_to_chebis.len(),
            index.compound_to_cas.len()
        );

        Ok(index)
    }
}
