//! Assembly and serialization of the final mapping records.

use std::{
    io::{BufWriter, Write as _},
    path::Path,
};

use itertools::Itertools as _;
use rustc_hash::FxHashMap;

use super::index::{LinkTable, SynonymIndex};
use super::resolve::CasResolution;

/// One output record per observed CAS number.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct MappingRecord {
    /// The CAS registry number.
    pub cas_number: String,
    /// The reachable ChEBI ids; empty, one, or many entries.
    pub chebi_ids: Vec<String>,
    /// The collected synonym strings; empty unless the CAS number resolved
    /// uniquely.
    pub synonyms: Vec<String>,
    /// The PubChem compound ids linked to the CAS number.
    pub pubchem_cids: Vec<String>,
}

/// Build one record per CAS number across all three cardinality classes.
///
/// Records are emitted as uniquely resolved first, then ambiguous, then
/// unresolved; each class is sorted by CAS number and all list fields are
/// sorted, making repeated runs byte-identical.
///
/// # Arguments
///
/// * `index` - The pass-1 mapping tables.
/// * `resolutions` - Per-CAS resolutions from `resolve::resolve_cas_numbers`.
/// * `synonyms` - Collected synonyms from `collect::collect_synonyms`.
///
/// # Returns
///
/// The full list of mapping records.
pub fn assemble_records(
    index: &SynonymIndex,
    resolutions: &FxHashMap<String, CasResolution>,
    synonyms: &LinkTable,
) -> Vec<MappingRecord> {
    let build = |cas_number: &str, chebi_ids: Vec<String>| MappingRecord {
        cas_number: cas_number.to_string(),
        chebi_ids,
        synonyms: synonyms
            .get(cas_number)
            .map(|aliases| aliases.iter().cloned().sorted().collect())
            .unwrap_or_default(),
        pubchem_cids: index
            .cas_to_compounds
            .get(cas_number)
            .map(|compound_ids| compound_ids.iter().cloned().sorted().collect())
            .unwrap_or_default(),
    };

    let mut records = Vec::with_capacity(resolutions.len());
    let sorted_resolutions = resolutions
        .iter()
        .sorted_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs))
        .collect::<Vec<_>>();

    let n_before = records.len();
    for &(cas_number, resolution) in &sorted_resolutions {
        if let CasResolution::Unique { chebi_id } = resolution {
            records.push(build(cas_number, vec![chebi_id.clone()]));
        }
    }
    tracing::info!(
        "- {} records created for 1:1 CAS-ChEBI mappings",
        records.len() - n_before
    );

    let n_before = records.len();
    for &(cas_number, resolution) in &sorted_resolutions {
        if let CasResolution::Ambiguous { chebi_ids } = resolution {
            records.push(build(cas_number, chebi_ids.clone()));
        }
    }
    tracing::info!(
        "- {} records created for 1:many CAS-ChEBI mappings",
        records.len() - n_before
    );

    let n_before = records.len();
    for &(cas_number, resolution) in &sorted_resolutions {
        if matches!(resolution, CasResolution::Unresolved) {
            records.push(build(cas_number, Vec::new()));
        }
    }
    tracing::info!(
        "- {} records created for 1:0 CAS-ChEBI mappings",
        records.len() - n_before
    );

    records
}

/// Serialize the records as one pretty-printed JSON array to `path`.
///
/// # Arguments
///
/// * `path` - Path to the output JSON file.
/// * `records` - The records to write.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn write_records<P>(path: P, records: &[MappingRecord]) -> Result<(), anyhow::Error>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    tracing::info!("- writing {} records to {:?}...", records.len(), path);
    let file = std::fs::File::create(path)
        .map_err(|e| anyhow::anyhow!("problem creating output file {:?}: {}", path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)
        .map_err(|e| anyhow::anyhow!("problem writing records: {}", e))?;
    writer
        .flush()
        .map_err(|e| anyhow::anyhow!("problem flushing output file: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::{assemble_records, write_records, MappingRecord};
    use crate::mapping::collect::collect_synonyms;
    use crate::mapping::index::SynonymIndex;
    use crate::mapping::resolve::{qualifying_compound_ids, resolve_cas_numbers};

    fn assemble_fixture() -> Result<Vec<MappingRecord>, anyhow::Error> {
        let path = "tests/data/mapping/corpus.tsv";
        let index = SynonymIndex::load(path)?;
        let resolutions = resolve_cas_numbers(&index);
        let qualifying = qualifying_compound_ids(&index, &resolutions);
        let synonyms = collect_synonyms(path, &index, &qualifying)?;
        Ok(assemble_records(&index, &resolutions, &synonyms))
    }

    #[test]
    fn records_cover_all_cas_numbers_in_class_order() -> Result<(), anyhow::Error> {
        let records = assemble_fixture()?;

        let cas_numbers = records
            .iter()
            .map(|record| record.cas_number.as_str())
            .collect::<Vec<_>>();
        // Unique first, then ambiguous, then unresolved.
        assert_eq!(cas_numbers, vec!["50-00-0", "60-00-0", "70-00-0", "80-00-0"]);

        Ok(())
    }

    #[test]
    fn record_fields_reflect_resolution() -> Result<(), anyhow::Error> {
        let records = assemble_fixture()?;

        assert_eq!(
            records[0],
            MappingRecord {
                cas_number: "50-00-0".to_string(),
                chebi_ids: vec!["CHEBI:1".to_string()],
                synonyms: vec![
                    "50-00-0".to_string(),
                    "CHEBI:1".to_string(),
                    "formaldehyde".to_string()
                ],
                pubchem_cids: vec!["C1".to_string()],
            }
        );
        assert_eq!(
            records[2],
            MappingRecord {
                cas_number: "70-00-0".to_string(),
                chebi_ids: vec!["CHEBI:2".to_string(), "CHEBI:3".to_string()],
                synonyms: vec![],
                pubchem_cids: vec!["C3".to_string(), "C4".to_string()],
            }
        );
        assert_eq!(
            records[3],
            MappingRecord {
                cas_number: "80-00-0".to_string(),
                chebi_ids: vec![],
                synonyms: vec![],
                pubchem_cids: vec!["C5".to_string()],
            }
        );

        Ok(())
    }

    #[test]
    fn written_output_is_byte_identical_across_runs() -> Result<(), anyhow::Error> {
        let tmp_dir = tempfile::tempdir()?;
        let path_first = tmp_dir.path().join("first.json");
        let path_second = tmp_dir.path().join("second.json");

        write_records(&path_first, &assemble_fixture()?)?;
        write_records(&path_second, &assemble_fixture()?)?;

        assert_eq!(
            std::fs::read_to_string(&path_first)?,
            std::fs::read_to_string(&path_second)?
        );

        Ok(())
    }

    #[test]
    fn written_output_parses_back() -> Result<(), anyhow::Error> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("out.json");
        let records = assemble_fixture()?;
        write_records(&path, &records)?;

        let parsed: Vec<MappingRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(parsed, records);

        Ok(())
    }
}
