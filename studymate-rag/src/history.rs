//! Question/answer history for a session, with text and CSV export.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

const SEPARATOR_WIDTH: usize = 40;

/// One answered question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QaRecord {
    /// The question as asked.
    pub question: String,
    /// The answer returned by the answerer.
    pub answer: String,
    /// When the answer was produced.
    pub asked_at: DateTime<Utc>,
}

impl QaRecord {
    /// Create a record stamped with the current time.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { question: question.into(), answer: answer.into(), asked_at: Utc::now() }
    }
}

/// The ordered questions and answers of one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QaHistory {
    records: Vec<QaRecord>,
}

impl QaHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, record: QaRecord) {
        self.records.push(record);
    }

    /// Records in the order they were asked.
    pub fn records(&self) -> &[QaRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing has been asked yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Write the numbered plain-text transcript (`Q1:`/`A1:` blocks).
    pub fn write_text<W: Write>(&self, mut writer: W) -> Result<()> {
        let separator = "-".repeat(SEPARATOR_WIDTH);
        for (i, record) in self.records.iter().enumerate() {
            let n = i + 1;
            writeln!(writer, "Q{n}: {}", record.question)?;
            writeln!(writer, "A{n}: {}", record.answer)?;
            writeln!(writer, "{separator}")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write a `Question,Answer` CSV with one row per record.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Question", "Answer"])?;
        for record in &self.records {
            csv.write_record([record.question.as_str(), record.answer.as_str()])?;
        }
        csv.flush()?;
        Ok(())
    }
}

/// Append one record to a running log file, creating parent directories.
pub fn append_log(path: &Path, record: &QaRecord) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "Q: {}", record.question)?;
    writeln!(file, "A: {}", record.answer)?;
    writeln!(file, "{}", "-".repeat(SEPARATOR_WIDTH))?;
    debug!(path = %path.display(), "appended history log entry");
    Ok(())
}
