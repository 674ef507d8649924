use crate::error::{FileError, MergeError};
use crate::report::{MergeEvent, Reporter};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Marker line that opens every merged document, preceded by two blank lines
pub fn separator(name: &str) -> String {
    format!("\n\n=== {} ===\n", name)
}

/// A document found in the input directory. Size is read on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputFile {
    name: String,
    path: PathBuf,
}

impl InputFile {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> io::Result<u64> {
        fs::metadata(&self.path).map(|m| m.len())
    }
}

/// Input documents in merge order (file name, byte-wise)
#[derive(Clone, Debug)]
pub struct InputFileSet {
    dir: PathBuf,
    files: Vec<InputFile>,
}

impl InputFileSet {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InputFile> {
        self.files.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name()).collect()
    }
}

impl<'a> IntoIterator for &'a InputFileSet {
    type Item = &'a InputFile;
    type IntoIter = std::slice::Iter<'a, InputFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Totals accumulated while writing the merged output
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MergeStats {
    pub documents: u64,
    /// Sum of the merged documents' byte lengths
    pub content_bytes: u64,
    pub marker_bytes: u64,
    pub elapsed: Duration,
}

impl MergeStats {
    /// Bytes the output file should hold
    pub fn total_bytes(&self) -> u64 {
        self.content_bytes + self.marker_bytes
    }
}

/// List the documents in `input_dir` whose names end in `.{suffix}`, sorted by name.
///
/// An existing directory with no matches yields an empty set; a missing one is
/// `MergeError::NotFound`.
pub fn discover(input_dir: &Path, suffix: &str) -> Result<InputFileSet, MergeError> {
    discover_excluding(input_dir, suffix, None)
}

/// Same as [`discover`], but never returns `exclude` itself (the output file
/// may live inside the input directory).
pub fn discover_excluding(
    input_dir: &Path,
    suffix: &str,
    exclude: Option<&Path>,
) -> Result<InputFileSet, MergeError> {
    if !input_dir.is_dir() {
        return Err(MergeError::NotFound(input_dir.to_path_buf()));
    }

    let excluded = exclude.and_then(|p| fs::canonicalize(p).ok());
    let mut files = Vec::new();

    for entry in fs::read_dir(input_dir).map_err(MergeError::Io)? {
        let entry = entry.map_err(MergeError::Io)?;
        let path = entry.path();

        if !path.is_file() || !matches_suffix(&path, suffix) {
            continue;
        }
        if let Some(excluded) = &excluded {
            if fs::canonicalize(&path).ok().as_ref() == Some(excluded) {
                debug!(path = %path.display(), "skipping output file found among inputs");
                continue;
            }
        }
        files.push(InputFile::new(path));
    }

    files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    debug!(dir = %input_dir.display(), count = files.len(), "discovered input files");

    Ok(InputFileSet {
        dir: input_dir.to_path_buf(),
        files,
    })
}

fn matches_suffix(path: &Path, suffix: &str) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    if suffix.is_empty() {
        return true;
    }
    let wanted = format!(".{}", suffix);
    name.as_encoded_bytes().ends_with(wanted.as_bytes())
}

/// Write every document in `files` into `output_path`, each behind its separator.
///
/// Any previous output is deleted first. A document that cannot be read or
/// written is reported and skipped; only an empty set or an output file that
/// cannot be removed, created or flushed fails the merge.
pub fn merge(
    files: &InputFileSet,
    output_path: &Path,
    reporter: &mut dyn Reporter,
) -> Result<MergeStats, MergeError> {
    if files.is_empty() {
        return Err(MergeError::EmptyInput(files.dir().to_path_buf()));
    }

    let start = Instant::now();
    remove_stale_output(output_path, reporter)?;

    let file = File::create(output_path).map_err(|source| MergeError::OutputUnavailable {
        path: output_path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let mut stats = MergeStats::default();
    let total = files.len();
    info!(total, output = %output_path.display(), "merge started");

    for (index, input) in files.iter().enumerate() {
        match append_document(&mut writer, input) {
            Ok((marker_bytes, content_bytes)) => {
                stats.documents += 1;
                stats.marker_bytes += marker_bytes;
                stats.content_bytes += content_bytes;
                debug!(file = input.name(), bytes = content_bytes, "merged document");
                reporter.on_event(&MergeEvent::FileMerged {
                    position: index + 1,
                    total,
                    name: input.name().to_string(),
                    bytes: content_bytes,
                });
            }
            Err(err) => {
                warn!(file = %err.name, error = %err.source, "skipping document");
                reporter.on_event(&MergeEvent::FileSkipped {
                    name: err.name,
                    error: err.source.to_string(),
                });
            }
        }
    }

    writer.flush().map_err(|source| MergeError::OutputUnavailable {
        path: output_path.to_path_buf(),
        source,
    })?;
    drop(writer);

    stats.elapsed = start.elapsed();
    info!(
        documents = stats.documents,
        bytes = stats.total_bytes(),
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "merge finished"
    );
    reporter.on_event(&MergeEvent::MergeFinished {
        stats: stats.clone(),
        output: output_path.to_path_buf(),
    });

    Ok(stats)
}

fn remove_stale_output(output_path: &Path, reporter: &mut dyn Reporter) -> Result<(), MergeError> {
    if !output_path.exists() {
        return Ok(());
    }
    fs::remove_file(output_path).map_err(|source| MergeError::OutputUnavailable {
        path: output_path.to_path_buf(),
        source,
    })?;
    info!(path = %output_path.display(), "removed stale output");
    reporter.on_event(&MergeEvent::StaleOutputRemoved {
        path: output_path.to_path_buf(),
    });
    Ok(())
}

// The whole document is read before anything is written, so a failed read
// leaves no marker behind.
fn append_document<W: Write>(writer: &mut W, input: &InputFile) -> Result<(u64, u64), FileError> {
    let to_file_error = |source| FileError {
        name: input.name().to_string(),
        path: input.path().to_path_buf(),
        source,
    };

    let content = fs::read(input.path()).map_err(to_file_error)?;
    let marker = separator(input.name());

    writer.write_all(marker.as_bytes()).map_err(to_file_error)?;
    writer.write_all(&content).map_err(to_file_error)?;

    Ok((marker.len() as u64, content.len() as u64))
}
