use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    DEFAULT_BATCH_SIZE, DEFAULT_SHOW_SAMPLES, DEFAULT_YEARS, PatternFamily, Recognition,
    recognize, shift_and_encode,
};

/// Settings for a bulk expiry update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobOptions {
    /// Years added to every recognized expiry
    pub years: i32,
    /// Changes handed to the store per write
    pub batch_size: usize,
    /// Compute everything, write nothing
    pub dry_run: bool,
    /// Dry-run changes kept in the report
    pub show_samples: usize,
    /// Unrecognized values kept in the report
    pub show_unmatched: usize,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            years: DEFAULT_YEARS,
            batch_size: DEFAULT_BATCH_SIZE,
            dry_run: false,
            show_samples: DEFAULT_SHOW_SAMPLES,
            show_unmatched: 0,
        }
    }
}

impl JobOptions {
    /// # Errors
    /// Returns `JobError::InvalidOptions` if `years` is not positive or `batch_size` is 0.
    pub fn validate(&self) -> Result<(), JobError> {
        if self.years <= 0 {
            return Err(JobError::InvalidOptions(format!(
                "years must be a positive integer, got {}",
                self.years
            )));
        }
        if self.batch_size == 0 {
            return Err(JobError::InvalidOptions(
                "batch_size must be a positive integer".to_owned(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Invalid job options: {0}")]
    InvalidOptions(String),

    /// The store rejected a batch; nothing after it was attempted.
    #[error("Failed to write batch of {size} expiry changes")]
    Store {
        size: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// One record's expiry moving from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryChange<K> {
    pub key: K,
    pub from: String,
    pub to: String,
}

/// Where changed expiry values are persisted.
///
/// Transactions, commit and rollback belong to the implementation.
pub trait ExpiryStore<K> {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persists one batch of changes.
    ///
    /// # Errors
    /// Any failure aborts the job.
    fn write_batch(&mut self, changes: &[ExpiryChange<K>]) -> Result<(), Self::Error>;
}

/// What the job decides for a single stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Null, empty or whitespace; not counted
    Absent,
    /// Unrecognized format
    Skipped,
    /// Shifted value is identical to the stored one
    Unchanged,
    /// New value to store
    Updated(String),
}

/// Tallies and samples from a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport<K> {
    pub processed: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub batches_written: usize,
    pub dry_run: bool,
    /// First changes computed during a dry run
    pub samples: Vec<ExpiryChange<K>>,
    /// First unrecognized values, trimmed
    pub unmatched: Vec<(K, String)>,
}

impl<K> JobReport<K> {
    const fn new(dry_run: bool) -> Self {
        Self {
            processed: 0,
            updated: 0,
            unchanged: 0,
            skipped: 0,
            batches_written: 0,
            dry_run,
            samples: Vec::new(),
            unmatched: Vec::new(),
        }
    }
}

impl<K: fmt::Display> fmt::Display for JobReport<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Summary ---")?;
        writeln!(f, "Total processed: {}", self.processed)?;
        writeln!(f, "Updated: {}", self.updated)?;
        writeln!(f, "Unchanged (already up to date): {}", self.unchanged)?;
        write!(f, "Skipped (unrecognized format): {}", self.skipped)?;

        if !self.unmatched.is_empty() {
            write!(f, "\n\nSample unmatched expiry formats:")?;
            for (key, value) in &self.unmatched {
                write!(f, "\n  Record {key}: {value:?} (length: {})", value.len())?;
            }
        }

        if self.dry_run && !self.samples.is_empty() {
            write!(f, "\n\nSample updates:")?;
            for change in &self.samples {
                write!(f, "\n - Record {}: {} -> {}", change.key, change.from, change.to)?;
            }
        }
        Ok(())
    }
}

/// How one distinct value would be handled, for eyeballing unfamiliar data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub value: String,
    pub family: Option<PatternFamily>,
    pub shifted: Option<String>,
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.family, &self.shifted) {
            (Some(family), Some(shifted)) => {
                write!(f, "{:?}: matched ({family}) -> {shifted:?}", self.value)
            }
            _ => write!(f, "{:?}: no match", self.value),
        }
    }
}

/// Shifts every stored expiry by a fixed number of years, writing in batches.
#[derive(Debug, Clone)]
pub struct ExpiryJob {
    options: JobOptions,
}

impl ExpiryJob {
    /// # Errors
    /// Returns `JobError::InvalidOptions` if the options fail validation.
    pub fn new(options: JobOptions) -> Result<Self, JobError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub const fn options(&self) -> &JobOptions {
        &self.options
    }

    /// Decides what to do with one stored value.
    pub fn evaluate(&self, raw: Option<&str>) -> Outcome {
        let Some(raw) = raw else {
            return Outcome::Absent;
        };
        match recognize(raw) {
            Recognition::Absent => Outcome::Absent,
            Recognition::Unparsable => Outcome::Skipped,
            Recognition::Parsed(parsed) => {
                let shifted = shift_and_encode(parsed, self.options.years);
                if shifted == raw.trim() {
                    Outcome::Unchanged
                } else {
                    Outcome::Updated(shifted)
                }
            }
        }
    }

    /// Runs the update over `records` in order.
    ///
    /// Updated values are written to `store` every `batch_size` changes and once
    /// more at the end. Nothing is written in dry-run mode.
    ///
    /// # Errors
    /// Returns `JobError::Store` on the first failed write.
    pub fn run<K, I, S>(&self, records: I, store: &mut S) -> Result<JobReport<K>, JobError>
    where
        K: fmt::Debug,
        I: IntoIterator<Item = (K, Option<String>)>,
        S: ExpiryStore<K>,
    {
        let options = &self.options;
        if options.dry_run {
            warn!("Dry run: no changes will be written");
        }
        info!(
            "Shifting expiry values by {} years in batches of {}",
            options.years, options.batch_size
        );

        let mut report = JobReport::new(options.dry_run);
        let mut pending: Vec<ExpiryChange<K>> = Vec::new();

        for (key, value) in records {
            let outcome = self.evaluate(value.as_deref());
            let stored = value.as_deref().map(str::trim).unwrap_or_default();
            match outcome {
                Outcome::Absent => continue,
                Outcome::Skipped => {
                    report.processed += 1;
                    report.skipped += 1;
                    debug!("Record {:?}: unrecognized expiry {:?}", key, stored);
                    if report.unmatched.len() < options.show_unmatched {
                        report.unmatched.push((key, stored.to_owned()));
                    }
                }
                Outcome::Unchanged => {
                    report.processed += 1;
                    report.unchanged += 1;
                }
                Outcome::Updated(to) => {
                    report.processed += 1;
                    report.updated += 1;
                    let change = ExpiryChange {
                        key,
                        from: stored.to_owned(),
                        to,
                    };
                    if options.dry_run {
                        if report.samples.len() < options.show_samples {
                            report.samples.push(change);
                        }
                    } else {
                        pending.push(change);
                        if pending.len() >= options.batch_size {
                            flush(store, &mut pending, &mut report)?;
                        }
                    }
                }
            }
        }

        if !pending.is_empty() {
            flush(store, &mut pending, &mut report)?;
        }

        info!(
            "Expiry update finished: {} processed, {} updated, {} unchanged, {} skipped",
            report.processed, report.updated, report.unchanged, report.skipped
        );
        Ok(report)
    }

    /// Reports how up to `limit` distinct non-empty values would be handled.
    pub fn probe<I, V>(&self, values: I, limit: usize) -> Vec<Probe>
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut probes = Vec::new();
        for value in values {
            if probes.len() >= limit {
                break;
            }
            let trimmed = value.as_ref().trim();
            if trimmed.is_empty() || !seen.insert(trimmed.to_owned()) {
                continue;
            }
            let (family, shifted) = match recognize(trimmed) {
                Recognition::Parsed(parsed) => (
                    Some(parsed.family()),
                    Some(shift_and_encode(parsed, self.options.years)),
                ),
                Recognition::Unparsable | Recognition::Absent => (None, None),
            };
            probes.push(Probe {
                value: trimmed.to_owned(),
                family,
                shifted,
            });
        }
        probes
    }
}

fn flush<K, S>(
    store: &mut S,
    pending: &mut Vec<ExpiryChange<K>>,
    report: &mut JobReport<K>,
) -> Result<(), JobError>
where
    S: ExpiryStore<K>,
{
    let size = pending.len();
    store
        .write_batch(pending.as_slice())
        .map_err(|source| JobError::Store {
            size,
            source: Box::new(source),
        })?;
    pending.clear();
    report.batches_written += 1;
    info!("Wrote batch {} ({} changes)", report.batches_written, size);
    Ok(())
}
