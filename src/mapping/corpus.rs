//! Streaming reader for the PubChem CID-Synonym corpus.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use flate2::read::GzDecoder;

/// Report progress every this many corpus lines.
const PROGRESS_INTERVAL: u64 = 10_000_000;

/// Buffer size for corpus reading.
const BUF_SIZE: usize = 256 * 1024;

/// Line-by-line reader for the two-column synonym corpus.
///
/// Yields one `(compound_id, alias)` pair per line.  The reader holds no
/// cross-pass state; each pass over the corpus constructs a fresh reader.
pub struct CorpusReader {
    /// The underlying (possibly decompressing) buffered reader.
    reader: Box<dyn BufRead>,
    /// Reused line buffer.
    buf: String,
    /// Number of lines consumed so far (1-based after the first read).
    line_no: u64,
}

impl CorpusReader {
    /// Open the corpus file at the given path.
    ///
    /// Files with a `.gz` extension are transparently decompressed.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the corpus file.
    ///
    /// # Returns
    ///
    /// A new `CorpusReader`.
    ///
    /// # Errors
    ///
    /// If anything goes wrong, it returns a generic `anyhow::Error`.
    pub fn open<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        tracing::debug!("opening corpus file: {:?}", path);
        let file = File::open(path)
            .map_err(|e| anyhow::anyhow!("problem opening corpus file {:?}: {}", path, e))?;
        let reader: Box<dyn BufRead> = if path.extension().map_or(false, |ext| ext == "gz") {
            Box::new(BufReader::with_capacity(BUF_SIZE, GzDecoder::new(file)))
        } else {
            Box::new(BufReader::with_capacity(BUF_SIZE, file))
        };

        Ok(Self {
            reader,
            buf: String::new(),
            line_no: 0,
        })
    }

    /// Read the next `(compound_id, alias)` pair from the corpus.
    ///
    /// The returned string slices borrow from the reader's internal line
    /// buffer and are valid until the next call.
    ///
    /// # Returns
    ///
    /// The next pair, or `None` at end of file.
    ///
    /// # Errors
    ///
    /// Returns a generic `anyhow::Error` on I/O problems and on lines that do
    /// not split into exactly two tab-separated fields.  Malformed lines are
    /// fatal; skipping them would corrupt the derived mapping tables.
    pub fn read_pair(&mut self) -> Result<Option<(&str, &str)>, anyhow::Error> {
        self.buf.clear();
        let n_read = self
            .reader
            .read_line(&mut self.buf)
            .map_err(|e| anyhow::anyhow!("problem reading corpus line: {}", e))?;
        if n_read == 0 {
            return Ok(None);
        }

        self.line_no += 1;
        if self.line_no % PROGRESS_INTERVAL == 0 {
            tracing::info!("- processed {} corpus lines...", self.line_no);
        }

        let line = self.buf.trim_end_matches('\n').trim_end_matches('\r');
        match line.split_once('\t') {
            Some((compound_id, alias)) if !alias.contains('\t') => Ok(Some((compound_id, alias))),
            _ => Err(anyhow::anyhow!(
                "corpus line {} does not have exactly two tab-separated fields: {:?}",
                self.line_no,
                line
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::Write as _;

    use super::CorpusReader;

    /// Drain a reader into owned pairs.
    fn read_all(mut reader: CorpusReader) -> Result<Vec<(String, String)>, anyhow::Error> {
        let mut result = Vec::new();
        while let Some((compound_id, alias)) = reader.read_pair()? {
            result.push((compound_id.to_string(), alias.to_string()));
        }
        Ok(result)
    }

    #[test]
    fn read_plain_corpus() -> Result<(), anyhow::Error> {
        let pairs = read_all(CorpusReader::open("tests/data/mapping/corpus.tsv")?)?;

        assert_eq!(pairs.len(), 13);
        assert_eq!(pairs[0], ("C1".to_string(), "CHEBI:1".to_string()));
        assert_eq!(pairs[2], ("C1".to_string(), "formaldehyde".to_string()));

        Ok(())
    }

    #[test]
    fn gzip_corpus_yields_same_pairs() -> Result<(), anyhow::Error> {
        let plain = read_all(CorpusReader::open("tests/data/mapping/corpus.tsv")?)?;
        let gzipped = read_all(CorpusReader::open("tests/data/mapping/corpus.tsv.gz")?)?;

        assert_eq!(plain, gzipped);

        Ok(())
    }

    #[test]
    fn crlf_terminators_are_stripped() -> Result<(), anyhow::Error> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("corpus.tsv");
        let mut file = std::fs::File::create(&path)?;
        write!(file, "C1\tCHEBI:1\r\nC1\t50-00-0\n")?;
        drop(file);

        let pairs = read_all(CorpusReader::open(&path)?)?;
        assert_eq!(
            pairs,
            vec![
                ("C1".to_string(), "CHEBI:1".to_string()),
                ("C1".to_string(), "50-00-0".to_string()),
            ]
        );

        Ok(())
    }

    #[rstest::rstest]
    #[case("C1 no tab here", "zero tabs")]
    #[case("C1\ttwo\ttabs", "two tabs")]
    #[case("", "empty line")]
    fn malformed_line_is_fatal(
        #[case] line: &str,
        #[case] label: &str,
    ) -> Result<(), anyhow::Error> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("corpus.tsv");
        std::fs::write(&path, format!("C1\tCHEBI:1\n{}\n", line))?;

        let mut reader = CorpusReader::open(&path)?;
        assert!(reader.read_pair()?.is_some(), "{}", label);
        let err = reader
            .read_pair()
            .expect_err(label)
            .to_string();
        assert!(err.contains("line 2"), "{}: {}", label, err);

        Ok(())
    }

    #[test]
    fn missing_file_fails() {
        assert!(CorpusReader::open("tests/data/mapping/does-not-exist.tsv").is_err());
    }
}
