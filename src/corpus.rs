//! Processing of comma-separated word data files
//!
//! Data files hold one `word,year,count` record per line, in the style of the
//! Google Books 1-gram datasets, with optional whitespace after the commas.
//! Files whose name ends in `.gz` are decompressed on the fly. Malformed
//! records abort the load with context; duplicate years within a word are a
//! data quality warning and do not.

use crate::{
    progress::{ProgressReport, Work},
    store::{CorpusBuilder, WordStore},
    Args, Result, Word, Year, YearCount,
};
use anyhow::Context;
use async_compression::tokio::bufread::GzipDecoder;
use csv_async::{AsyncReaderBuilder, Trim};
use dialoguer::{FuzzySelect, Input};
use futures::{StreamExt, TryStreamExt};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::{fs::File, io::AsyncRead};
use tokio_util::io::{ReaderStream, StreamReader};

/// Entry from a word data file
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq)]
pub struct Entry {
    /// Word whose frequency was recorded
    pub word: Word,

    /// Year on which the data was recorded
    pub year: Year,

    /// Number of recorded occurrences
    pub count: YearCount,
}

/// Select the word data file to load
///
/// Use the file specified on the command line when there is one. Otherwise,
/// propose the data files found in the working directory, falling back to a
/// free-form path prompt when there are none.
pub fn pick(args: &Args) -> Result<Box<Path>> {
    if let Some(file) = &args.file {
        return Ok(file.clone().into_boxed_path());
    }
    let mut candidates = candidate_files().context("looking for word data files")?;
    if candidates.is_empty() {
        let path: String = Input::new()
            .with_prompt("Word data file")
            .interact_text()
            .context("asking for a word data file")?;
        return Ok(PathBuf::from(path).into_boxed_path());
    }
    candidates.sort();
    let selected = FuzzySelect::new()
        .with_prompt("Which word data file should I load?")
        .items(&candidates)
        .default(0)
        .max_length(usize::MAX)
        .interact()
        .context("asking which word data file to load")?;
    Ok(PathBuf::from(candidates.swap_remove(selected)).into_boxed_path())
}

/// Word data files found in the working directory
fn candidate_files() -> std::io::Result<Vec<String>> {
    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(".")? {
        let name = entry?.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.ends_with(".csv") || name.ends_with(".csv.gz") {
            candidates.push(name.to_owned());
        }
    }
    Ok(candidates)
}

/// Read a word data file into a queryable in-memory store
pub async fn load(path: &Path, report: &ProgressReport) -> Result<WordStore> {
    // Open the data file and see how much data is coming
    let context = || format!("opening {}", path.display());
    let file = File::open(path).await.with_context(context)?;
    let file_len = file.metadata().await.with_context(context)?.len();

    // Track reading and ingestion progress
    let bytes = report.add("Reading word data", Work::Bytes(file_len as usize));
    let records = report.add("Ingested", Work::Records);

    // Slice the file into chunks of bytes, tracking progress as they come
    let file_bytes = StreamReader::new(ReaderStream::new(file).inspect_ok({
        let bytes = bytes.clone();
        move |chunk| {
            bytes.make_progress(chunk.len() as u64);
        }
    }));

    // Apply a gzip decoder to compressed files
    let data_bytes: Box<dyn AsyncRead + Send + Unpin> =
        if path.extension().is_some_and(|ext| ext == "gz") {
            Box::new(GzipDecoder::new(file_bytes))
        } else {
            Box::new(file_bytes)
        };

    // Apply a CSV decoder to the uncompressed bytes
    let mut entries = AsyncReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .trim(Trim::All)
        .create_deserializer(data_bytes)
        .into_deserialize::<Entry>();

    // Accumulate records into the store
    let mut builder = CorpusBuilder::new();
    let mut duplicates = 0u64;
    let context = || format!("loading word data from {}", path.display());
    while let Some(entry) = entries.next().await {
        let entry = entry.with_context(context)?;
        if let Err(warning) = builder.ingest(&entry.word, entry.year, entry.count) {
            log::warn!("{}: word {:?}: {warning}", path.display(), entry.word);
            duplicates += 1;
        }
        records.make_progress(1);
    }
    records.finish();
    // An empty data file makes no byte progress, hide its bar too
    bytes.finish();

    // Freeze the corpus and summarize the load
    let store = builder.finish();
    if store.is_empty() {
        log::warn!("{} contained no word data", path.display());
    }
    if duplicates > 0 {
        log::warn!("ignored {duplicates} duplicate year records, keeping the first value of each");
    }
    log::info!(
        "loaded {} records covering {} distinct words",
        store.total_words(),
        store.len()
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Scope;
    use std::io::Write as _;

    async fn load_file(file: &tempfile::NamedTempFile) -> Result<WordStore> {
        load(file.path(), &ProgressReport::new()).await
    }

    #[tokio::test]
    async fn loads_plain_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // Whitespace after the separator is part of the original data format
        write!(file, "the,1900,100\ncat, 1900, 10\nthe,1901,50\ndog,1901,40\n").unwrap();
        file.flush().unwrap();
        let store = load_file(&file).await.unwrap();
        assert_eq!(store.total_words(), 4);
        assert_eq!(store.len(), 3);
        assert_eq!(store.count_for("the", Scope::AllTime), 150);
        assert_eq!(store.count_for("cat", Scope::single_year(1900)), 10);
    }

    #[tokio::test]
    async fn loads_gzipped_csv() {
        use async_compression::tokio::write::GzipEncoder;
        use tokio::io::AsyncWriteExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.csv.gz");
        let mut encoder = GzipEncoder::new(File::create(&path).await.unwrap());
        encoder.write_all(b"the,1900,100\ncat,1900,10\n").await.unwrap();
        encoder.shutdown().await.unwrap();

        let store = load(&path, &ProgressReport::new()).await.unwrap();
        assert_eq!(store.count_for("the", Scope::AllTime), 100);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_years_do_not_abort_the_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "cat,1900,5\ncat,1900,9\n").unwrap();
        file.flush().unwrap();
        let store = load_file(&file).await.unwrap();
        // First value wins, both records count towards the corpus size
        assert_eq!(store.count_for("cat", Scope::single_year(1900)), 5);
        assert_eq!(store.total_words(), 2);
    }

    #[tokio::test]
    async fn ingested_words_are_normalized() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "The,1900,100\nthe,1901,50\n").unwrap();
        file.flush().unwrap();
        let store = load_file(&file).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.count_for("THE", Scope::AllTime), 150);
    }

    #[tokio::test]
    async fn malformed_records_abort_the_load() {
        for bad_data in ["the,1900\n", "the,many,5\n", "the,1900,lots\n"] {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            write!(file, "{bad_data}").unwrap();
            file.flush().unwrap();
            assert!(load_file(&file).await.is_err(), "accepted {bad_data:?}");
        }
    }

    #[tokio::test]
    async fn missing_files_are_reported() {
        assert!(load(Path::new("./no-such-corpus.csv"), &ProgressReport::new())
            .await
            .is_err());
    }
}
