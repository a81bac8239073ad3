//! Pass 2: selective collection of synonyms for uniquely resolved CAS numbers.

use std::path::Path;

use rustc_hash::FxHashSet;

use super::corpus::CorpusReader;
use super::index::{insert_link, LinkTable, SynonymIndex};

/// Collect alias strings for compound ids reachable from uniquely resolved
/// CAS numbers.
///
/// Re-reads the full corpus but only accumulates state for compound ids in
/// the qualifying set that are also linked to at least one ChEBI id.  Each
/// admitted alias is recorded verbatim (no alias-kind filter) for every CAS
/// number of its compound id.  A compound id shared between several CAS
/// numbers thus contributes its aliases to all of them.
///
/// # Arguments
///
/// * `path` - Path to the (possibly gzip-compressed) corpus file.
/// * `index` - The pass-1 mapping tables.
/// * `qualifying` - Compound ids admitted to collection, cf.
///   `resolve::qualifying_compound_ids`.
///
/// # Returns
///
/// Mapping from CAS number to its set of collected synonym strings.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn collect_synonyms<P>(
    path: P,
    index: &SynonymIndex,
    qualifying: &FxHashSet<String>,
) -> Result<LinkTable, anyhow::Error>
where
    P: AsRef<Path>,
{
    let mut reader = CorpusReader::open(path)?;
    let mut cas_to_synonyms = LinkTable::default();

    while let Some((compound_id, alias)) = reader.read_pair()? {
        if !qualifying.contains(compound_id) || !index.compound_to_chebis.contains_key(compound_id)
        {
            continue;
        }
        if let Some(cas_numbers) = index.compound_to_cas.get(compound_id) {
            for cas_number in cas_numbers {
                insert_link(&mut cas_to_synonyms, cas_number, alias);
            }
        }
    }

    let n_synonyms: usize = cas_to_synonyms.values().map(FxHashSet::len).sum();
    tracing::info!(
        "- {} CAS numbers mapped to {} synonyms",
        cas_to_synonyms.len(),
        n_synonyms
    );

    Ok(cas_to_synonyms)
}
