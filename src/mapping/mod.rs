//! Derivation of CAS to ChEBI mappings from the PubChem synonym corpus.

pub mod alias;
pub mod collect;
pub mod corpus;
pub mod index;
pub mod output;
pub mod resolve;

use std::path::{Path, PathBuf};

use clap::Parser;

/// Command line arguments for `mapping` command.
#[derive(Parser, Debug)]
#[command(about = "Derive CAS to ChEBI mappings from the synonym corpus", long_about = None)]
pub struct Args {
    /// Path to the CID-Synonym corpus file (plain or gzip-compressed).
    #[clap(long)]
    pub path_corpus: PathBuf,
    /// Path to the output JSON file.
    #[clap(long)]
    pub path_output: PathBuf,
}

/// Check that the output path's parent directory exists.
///
/// A bare filename has an empty parent component and resolves to the current
/// directory, which exists.
fn check_output_dir(path_output: &Path) -> Result<(), anyhow::Error> {
    if let Some(parent) = path_output.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            anyhow::bail!("output directory {:?} does not exist", parent);
        }
    }
    Ok(())
}

/// Main entry point for the `mapping` command.
///
/// # Arguments
///
/// * `common_args` - Commonly used command line arguments.
/// * `args` - Command line arguments specific to `mapping` command.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn run(common_args: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("  running command `mapping`");
    tracing::info!("  common_args = {:?}", &common_args);
    tracing::info!("  args = {:?}", &args);

    // Fail fast on bad paths before streaming a hundred million lines.
    if !args.path_corpus.is_file() {
        anyhow::bail!("input corpus file {:?} does not exist", args.path_corpus);
    }
    check_output_dir(&args.path_output)?;

    tracing::info!("Reading corpus, building mapping tables (pass 1)...");
    let index = index::SynonymIndex::load(&args.path_corpus)?;

    tracing::info!("Resolving CAS numbers against reachable ChEBI ids...");
    let resolutions = resolve::resolve_cas_numbers(&index);
    let qualifying = resolve::qualifying_compound_ids(&index, &resolutions);

    tracing::info!("Re-reading corpus, collecting synonyms (pass 2)...");
    let synonyms = collect::collect_synonyms(&args.path_corpus, &index, &qualifying)?;

    tracing::info!("Assembling and writing records...");
    let records = output::assemble_records(&index, &resolutions, &synonyms);
    output::write_records(&args.path_output, &records)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use crate::mapping::output::MappingRecord;

    fn common_args() -> crate::common::Args {
        crate::common::Args {
            verbose: clap_verbosity_flag::Verbosity::new(1, 0),
        }
    }

    #[test]
    fn run_smoke() -> Result<(), anyhow::Error> {
        let tmp_dir = tempfile::tempdir()?;
        let path_output = tmp_dir.path().join("mappings.json");

        let args = super::Args {
            path_corpus: "tests/data/mapping/corpus.tsv".into(),
            path_output: path_output.clone(),
        };
        super::run(&common_args(), &args)?;

        let records: Vec<MappingRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path_output)?)?;
        assert_eq!(records.len(), 4);

        Ok(())
    }

    #[test]
    fn run_rejects_missing_corpus() -> Result<(), anyhow::Error> {
        let tmp_dir = tempfile::tempdir()?;
        let args = super::Args {
            path_corpus: "tests/data/mapping/does-not-exist.tsv".into(),
            path_output: tmp_dir.path().join("mappings.json"),
        };

        assert!(super::run(&common_args(), &args).is_err());

        Ok(())
    }

    #[test]
    fn run_rejects_missing_output_dir() {
        let args = super::Args {
            path_corpus: "tests/data/mapping/corpus.tsv".into(),
            path_output: "tests/data/does-not-exist/mappings.json".into(),
        };

        assert!(super::run(&common_args(), &args).is_err());
    }

    #[test]
    fn bare_output_filename_is_accepted() -> Result<(), anyhow::Error> {
        super::check_output_dir(std::path::Path::new("mappings.json"))
    }
}
