//! Batch tallying of a folder of documents.

use crate::codes::CodeTable;
use crate::counter::{count, CutoffStatus};
use crate::error::{Error, Result};
use crate::filename::KeyParser;
use crate::model::{DocumentRecord, Table};
use crate::options::{OutputFormat, TallyOptions};
use crate::pivot::aggregate;
use crate::render::{to_csv, to_json, JsonFormat};
use crate::source::{DocxSource, TextSource};
use rayon::prelude::*;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Files written by [`Tallier::process`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Raw counts
    pub frequencies: PathBuf,
    /// Counts normalized by word count
    pub normalized: PathBuf,
}

/// Tallies error codes across every document in a folder.
///
/// # Example
///
/// ```no_run
/// use codetally::{TallyOptions, Tallier};
///
/// // Writes MyCSV_frequencies.csv and MyCSV_normalized.csv
/// let tallier = Tallier::new(TallyOptions::new("example_texts", "MyCSV"))?;
/// tallier.process()?;
/// # Ok::<(), codetally::Error>(())
/// ```
pub struct Tallier {
    options: TallyOptions,
    codes: CodeTable,
    keys: KeyParser,
    files: Vec<PathBuf>,
    source: Box<dyn TextSource>,
}

impl Tallier {
    /// Load the code table and list the input folder.
    pub fn new(options: TallyOptions) -> Result<Self> {
        if !options.rate.is_finite() || options.rate < 0.0 {
            return Err(Error::InvalidOption(format!(
                "rate must be a non-negative number, got {}",
                options.rate
            )));
        }
        let codes = CodeTable::load(&options.code_source)?;
        let keys = KeyParser::new(
            options.delimiter.clone(),
            options.treatment_index,
            options.case_index,
        )?;
        let files = list_documents(&options.folder, &options.skip_prefix)?;

        Ok(Self {
            options,
            codes,
            keys,
            files,
            source: Box::new(DocxSource),
        })
    }

    /// Replace the document text provider.
    pub fn with_source(mut self, source: impl TextSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    pub fn options(&self) -> &TallyOptions {
        &self.options
    }

    /// Documents that will be read, sorted by name.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    /// Read and count a single document.
    pub fn count_file(&self, path: &Path) -> Result<DocumentRecord> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // Bad names fail before the document is opened
        let key = self.keys.parse(path)?;

        tracing::info!(file = %name, "processing document");
        let text = self.source.read_text(path)?;
        let counts = count(&text, &self.codes, self.options.key_text.as_deref());

        if counts.cutoff == CutoffStatus::Missing {
            tracing::info!(
                file = %name,
                marker = self.options.key_text.as_deref().unwrap_or_default(),
                "no answer key present, counting the whole document"
            );
        }

        Ok(DocumentRecord::from_counts(key, counts, name))
    }

    /// Count every document.
    pub fn records(&self) -> Result<Vec<DocumentRecord>> {
        self.records_with(|_| {})
    }

    /// Count every document in parallel, calling `on_record` as each finishes.
    ///
    /// Records come back in file order. The first failing document aborts
    /// the run.
    pub fn records_with<F>(&self, on_record: F) -> Result<Vec<DocumentRecord>>
    where
        F: Fn(&DocumentRecord) + Sync,
    {
        if self.files.is_empty() {
            return Err(Error::EmptyInput);
        }

        self.files
            .par_iter()
            .map(|path| -> Result<DocumentRecord> {
                let record = self
                    .count_file(path)
                    .map_err(|e| e.in_document(path.clone()))?;
                on_record(&record);
                Ok(record)
            })
            .collect()
    }

    /// Count every document and build the pivot table.
    pub fn table(&self) -> Result<Table> {
        let records = self.records()?;
        aggregate(&records, &self.codes)
    }

    /// Render the tally as text; `None` gives raw counts.
    pub fn tally(&self, rate: Option<f64>) -> Result<String> {
        Ok(to_csv(&self.table()?.grid(rate)?))
    }

    /// Count, aggregate and write both output files.
    pub fn process(&self) -> Result<OutputPaths> {
        let table = self.table()?;
        self.write(&table)
    }

    /// Write the raw and normalized variants of `table`.
    ///
    /// Both are rendered and staged before either output is replaced. On
    /// failure the outputs are left as they were before the call.
    pub fn write(&self, table: &Table) -> Result<OutputPaths> {
        let raw = table.grid(None)?;
        let normalized = table.grid(Some(self.options.rate))?;

        let format = self.options.format;
        let (raw, normalized) = match format {
            OutputFormat::Csv => (to_csv(&raw), to_csv(&normalized)),
            OutputFormat::Json => (
                to_json(&raw, JsonFormat::Pretty)?,
                to_json(&normalized, JsonFormat::Pretty)?,
            ),
        };

        let paths = OutputPaths {
            frequencies: output_path(&self.options.output_filename, "frequencies", format),
            normalized: output_path(&self.options.output_filename, "normalized", format),
        };
        write_all_or_nothing(&[
            (paths.frequencies.as_path(), raw.as_str()),
            (paths.normalized.as_path(), normalized.as_str()),
        ])?;

        tracing::debug!(
            frequencies = %paths.frequencies.display(),
            normalized = %paths.normalized.display(),
            "wrote tally tables"
        );
        Ok(paths)
    }
}

/// `<base>_<variant>.<ext>`, keeping any directory part of `base`.
pub fn output_path(base: &Path, variant: &str, format: OutputFormat) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(format!("_{}.{}", variant, format.extension()));
    PathBuf::from(name)
}

/// `<path>.partial`, next to `path` so the final rename stays on one filesystem.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".partial");
    PathBuf::from(name)
}

/// Write every `(path, contents)` pair, or none of them.
///
/// Contents go to staging files first. Once all are staged they are renamed
/// over their targets; if a rename fails, targets already replaced get their
/// previous contents back.
fn write_all_or_nothing(outputs: &[(&Path, &str)]) -> Result<()> {
    let staged: Vec<PathBuf> = outputs.iter().map(|(path, _)| staging_path(path)).collect();

    for ((_, contents), stage) in outputs.iter().zip(&staged) {
        if let Err(err) = fs::write(stage, contents) {
            discard(&staged);
            return Err(err.into());
        }
    }

    let mut replaced: Vec<(&Path, Option<Vec<u8>>)> = Vec::new();
    for ((path, _), stage) in outputs.iter().zip(&staged) {
        let previous = if path.is_file() {
            match fs::read(path) {
                Ok(bytes) => Some(bytes),
                Err(err) => {
                    discard(&staged);
                    restore(&replaced);
                    return Err(err.into());
                }
            }
        } else {
            None
        };

        if let Err(err) = fs::rename(stage, path) {
            discard(&staged);
            restore(&replaced);
            return Err(err.into());
        }
        replaced.push((*path, previous));
    }

    Ok(())
}

fn discard(staged: &[PathBuf]) {
    for stage in staged {
        if stage.exists() {
            if let Err(err) = fs::remove_file(stage) {
                tracing::warn!(file = %stage.display(), error = %err, "cannot remove staging file");
            }
        }
    }
}

fn restore(replaced: &[(&Path, Option<Vec<u8>>)]) {
    for (path, previous) in replaced {
        let result = match previous {
            Some(bytes) => fs::write(path, bytes),
            None => fs::remove_file(path),
        };
        if let Err(err) = result {
            tracing::warn!(file = %path.display(), error = %err, "cannot roll back output");
        }
    }
}

/// List regular files in `folder` whose names do not start with `skip_prefix`.
pub fn list_documents(folder: &Path, skip_prefix: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !path.is_file() {
            tracing::debug!(entry = %name, "skipping non-file entry");
            continue;
        }
        if !skip_prefix.is_empty() && name.starts_with(skip_prefix) {
            tracing::debug!(file = %name, "skipping reserved file");
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}
