//! One-shot download of the PubChem synonym corpus.

use std::path::PathBuf;

use clap::Parser;

/// Default URL of the PubChem CID-Synonym corpus file.
pub const DEFAULT_CORPUS_URL: &str =
    "https://ftp.ncbi.nlm.nih.gov/pubchem/Compound/Extras/CID-Synonym-filtered.gz";

/// Command line arguments for `download` command.
#[derive(Parser, Debug)]
#[command(about = "Download the synonym corpus file", long_about = None)]
pub struct Args {
    /// Path to the directory to download the file to.
    #[clap(long)]
    pub path_out_dir: PathBuf,
    /// URL to download the corpus from.
    #[clap(long, default_value = DEFAULT_CORPUS_URL)]
    pub url: String,
    /// Overwrite the local file if it already exists.
    #[clap(long, default_value_t = false)]
    pub overwrite: bool,
}

/// Derive the local filename from the last path segment of the URL.
fn local_filename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Main entry point for the `download` command.
///
/// Performs a single GET of the corpus URL and writes the whole body to the
/// output directory.  No retry, resume, or checksum logic.
///
/// # Arguments
///
/// * `common_args` - Commonly used command line arguments.
/// * `args` - Command line arguments specific to `download` command.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub async fn run(common_args: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("  running command `download`");
    tracing::info!("  common_args = {:?}", &common_args);
    tracing::info!("  args = {:?}", &args);

    if !args.path_out_dir.is_dir() {
        anyhow::bail!("download directory {:?} does not exist", args.path_out_dir);
    }
    let path_out = args.path_out_dir.join(local_filename(&args.url));

    if path_out.exists() && !args.overwrite {
        tracing::warn!(
            "file {:?} already exists; pass --overwrite to download and replace it",
            path_out
        );
        return Ok(());
    }

    tracing::info!("Downloading {} to {:?}...", args.url, path_out);
    let response = reqwest::get(&args.url)
        .await
        .map_err(|e| anyhow::anyhow!("problem downloading corpus: {}", e))?;
    if !response.status().is_success() {
        anyhow::bail!("download failed with HTTP status {}", response.status());
    }
    let body = response
        .bytes()
        .await
        .map_err(|e| anyhow::anyhow!("problem reading response body: {}", e))?;
    std::fs::write(&path_out, &body)
        .map_err(|e| anyhow::anyhow!("problem writing file {:?}: {}", path_out, e))?;
    tracing::info!("Downloaded {} bytes.", body.len());

    Ok(())
}
