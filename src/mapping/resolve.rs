//! Cardinality resolution of CAS numbers against reachable ChEBI ids.

use itertools::Itertools as _;
use rustc_hash::{FxHashMap, FxHashSet};

use super::index::SynonymIndex;

/// Resolution outcome for one CAS number.
///
/// Derived from the two-hop join CAS -> compound -> ChEBI; mutually exclusive
/// and exhaustive over all CAS numbers seen in pass 1.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum CasResolution {
    /// Exactly one ChEBI id is reachable; the mapping is reliable.
    Unique {
        /// The single reachable ChEBI id.
        chebi_id: String,
    },
    /// No ChEBI id is reachable.
    Unresolved,
    /// More than one ChEBI id is reachable; the mapping is unreliable and is
    /// reported as-is rather than collapsed to a single choice.
    Ambiguous {
        /// All reachable ChEBI ids, sorted.
        chebi_ids: Vec<String>,
    },
}

/// Resolve every CAS number in the index to its cardinality class.
///
/// For each CAS number, the set of reachable ChEBI ids is the union over its
/// linked compound ids of the ChEBI ids linked to each compound id.  Each CAS
/// number is classified independently, so iteration order does not matter.
///
/// # Arguments
///
/// * `index` - The pass-1 mapping tables.
///
/// # Returns
///
/// Mapping from CAS number to its `CasResolution`.
pub fn resolve_cas_numbers(index: &SynonymIndex) -> FxHashMap<String, CasResolution> {
    let mut resolutions = FxHashMap::default();
    for (cas_number, compound_ids) in &index.cas_to_compounds {
        let mut chebi_ids = FxHashSet::default();
        for compound_id in compound_ids {
            if let Some(chebis) = index.compound_to_chebis.get(compound_id) {
                chebi_ids.extend(chebis.iter().cloned());
            }
        }

        let resolution = if chebi_ids.len() == 1 {
            CasResolution::Unique {
                chebi_id: chebi_ids
                    .into_iter()
                    .next()
                    .unwrap_or_default(),
            }
        } else if chebi_ids.is_empty() {
            CasResolution::Unresolved
        } else {
            CasResolution::Ambiguous {
                chebi_ids: chebi_ids.into_iter().sorted().collect(),
            }
        };
        resolutions.insert(cas_number.clone(), resolution);
    }

    let mut n_unique = 0usize;
    let mut n_unresolved = 0usize;
    let mut n_ambiguous = 0usize;
    let mut unique_chebis = FxHashSet::default();
    for resolution in resolutions.values() {
        match resolution {
            CasResolution::Unique { chebi_id } => {
                n_unique += 1;
                unique_chebis.insert(chebi_id.as_str());
            }
            CasResolution::Unresolved => n_unresolved += 1,
            CasResolution::Ambiguous { .. } => n_ambiguous += 1,
        }
    }
    tracing::info!("- {} ChEBI ids found with >= 1 CAS number", unique_chebis.len());
    tracing::info!("- {} CAS numbers mapped to unique ChEBI id", n_unique);
    tracing::info!("- {} CAS numbers mapped to zero ChEBI ids", n_unresolved);
    tracing::info!("- {} CAS numbers mapped to multiple ChEBI ids", n_ambiguous);

    resolutions
}

/// Compute the compound ids admitted to pass-2 synonym collection.
///
/// This is the union of the compound ids linked to every `Unique`-classified
/// CAS number; restricting pass 2 to this subset bounds its memory footprint.
///
/// # Arguments
///
/// * `index` - The pass-1 mapping tables.
/// * `resolutions` - Per-CAS resolutions from `resolve_cas_numbers`.
///
/// # Returns
///
/// The set of qualifying compound ids.
pub fn qualifying_compound_ids(
    index: &SynonymIndex,
    resolutions: &FxHashMap<String, CasResolution>,
) -> FxHashSet<String> {
    let mut result = FxHashSet::default();
    for (cas_number, resolution) in resolutions {
        if matches!(resolution, CasResolution::Unique { .. }) {
            if let Some(compound_ids) = index.cas_to_compounds.get(cas_number) {
                result.extend(compound_ids.iter().cloned());
            }
        }
    }
    result
}
