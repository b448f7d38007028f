use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use csv::{Terminator, WriterBuilder};
use tracing::info;

use crate::engine::edit_distance::PrefixDistance;
use crate::error::ExportError;
use crate::session::log::LogEntry;
use crate::session::trial::TrialResult;

const LOG_HEADER: [&str; 6] = ["index", "type", "value", "timestamp_s", "text_after", "msd"];

/// A finished delimited report and the file name it should be saved under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub file_name: String,
    pub contents: String,
}

/// Everything needed to render one session's block.
#[derive(Clone, Copy, Debug)]
pub struct SessionBlock<'a> {
    pub target: &'a str,
    pub wpm: Option<f64>,
    pub edit_distance: Option<usize>,
    pub entries: &'a [LogEntry],
    /// Zero point for `timestamp_s`; the first entry when unset.
    pub origin_ms: Option<f64>,
}

/// CSV rows over an in-memory buffer. The writer is flexible since the
/// report mixes header rows of different widths.
struct RowWriter {
    buf: Vec<u8>,
}

impl RowWriter {
    fn new() -> Self {
        Self { buf: Vec::new() }
    }

    fn row<I, T>(&mut self, fields: I) -> Result<(), ExportError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut wtr = WriterBuilder::new()
            .flexible(true)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut self.buf);
        wtr.write_record(fields)?;
        wtr.flush()?;
        Ok(())
    }

    // csv writes a zero-field record as `""`, so blank rows bypass it.
    fn blank(&mut self) {
        self.buf.push(b'\n');
    }

    fn finish(self) -> Result<String, ExportError> {
        Ok(String::from_utf8(self.buf)?)
    }
}

fn fmt_wpm(wpm: Option<f64>) -> String {
    wpm.map(|w| format!("{w:.2}")).unwrap_or_default()
}

fn fmt_count(value: Option<usize>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_block(out: &mut RowWriter, block: &SessionBlock<'_>) -> Result<(), ExportError> {
    out.row(["target_phrase", block.target])?;
    out.row(["wpm".to_string(), fmt_wpm(block.wpm)])?;
    out.row(["msd".to_string(), fmt_count(block.edit_distance)])?;
    out.blank();
    out.row(LOG_HEADER)?;

    let mut msd = (!block.target.is_empty()).then(|| PrefixDistance::new(block.target));
    let initial = msd.as_mut().map(|cache| cache.distance_to(""));
    out.row([
        "0".to_string(),
        "start".to_string(),
        String::new(),
        "0.000".to_string(),
        String::new(),
        fmt_count(initial),
    ])?;

    let origin = block
        .origin_ms
        .or_else(|| block.entries.first().map(|e| e.timestamp_ms))
        .unwrap_or(0.0);

    for (idx, entry) in block.entries.iter().enumerate() {
        let seconds = (entry.timestamp_ms - origin) / 1000.0;
        let row_msd = msd.as_mut().map(|cache| cache.distance_to(&entry.text_after));
        out.row([
            (idx + 1).to_string(),
            entry.kind.as_str().to_string(),
            entry.ch.map(String::from).unwrap_or_default(),
            format!("{seconds:.3}"),
            entry.text_after.clone(),
            fmt_count(row_msd),
        ])?;
    }
    Ok(())
}

/// Single-session report: summary rows, blank row, then the keystroke log.
pub fn session_csv(block: &SessionBlock<'_>) -> Result<String, ExportError> {
    let mut out = RowWriter::new();
    write_block(&mut out, block)?;
    out.finish()
}

/// All recorded trials, each as a labelled session block.
pub fn trials_csv(total_trials: usize, results: &[TrialResult]) -> Result<String, ExportError> {
    let mut out = RowWriter::new();
    out.row(["Trial System Results"])?;
    out.row(["Total Trials".to_string(), total_trials.to_string()])?;
    out.blank();

    for trial in results {
        out.row([format!("Trial {}", trial.trial_number)])?;
        let block = SessionBlock {
            target: &trial.target_text,
            wpm: trial.wpm,
            edit_distance: trial.edit_distance,
            entries: &trial.log,
            origin_ms: None,
        };
        write_block(&mut out, &block)?;
        out.blank();
    }
    out.finish()
}

/// Lowercase, non-alphanumeric runs collapsed to `-`, trimmed.
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "target".to_string()
    } else {
        slug
    }
}

fn file_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H-%M-%S-%3fZ").to_string()
}

impl Report {
    pub fn session(block: &SessionBlock<'_>) -> Result<Self, ExportError> {
        Ok(Self {
            file_name: format!("entry-log-{}-{}.csv", slugify(block.target), file_timestamp()),
            contents: session_csv(block)?,
        })
    }

    pub fn trials(total_trials: usize, results: &[TrialResult]) -> Result<Self, ExportError> {
        Ok(Self {
            file_name: format!("trial-results-{}.csv", file_timestamp()),
            contents: trials_csv(total_trials, results)?,
        })
    }
}

pub fn write_report(dir: &Path, report: &Report) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&report.file_name);
    fs::write(&path, report.contents.as_bytes())?;
    info!(path = %path.display(), bytes = report.contents.len(), "report written");
    Ok(path)
}
