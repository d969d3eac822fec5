//! Exporters: reporter series as CSV, anything serializable as JSON.
//!
//! The CSV has one row per collected step: `tick` followed by every
//! reporter in canonical order.

use crate::config::ModelConfig;
use crate::metrics::{DataCollector, Reporter, StepRecord};
use crate::model::{Model, ModelStats};
use niche_core::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// What a finished run looked like, for JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub config: ModelConfig,
    pub stats: ModelStats,
    pub final_record: Option<StepRecord>,
}

impl RunReport {
    pub fn from_model(model: &Model) -> Self {
        Self {
            config: model.config().clone(),
            stats: model.stats(),
            final_record: model.collector().latest().cloned(),
        }
    }
}

/// Render the collected series as CSV.
pub fn to_csv(collector: &DataCollector) -> String {
    let mut out = String::from("tick");
    for reporter in Reporter::ALL {
        out.push(',');
        out.push_str(reporter.name());
    }
    out.push('\n');
    for record in collector.records() {
        out.push_str(&record.tick.to_string());
        for reporter in Reporter::ALL {
            out.push(',');
            out.push_str(&record.get(reporter).to_string());
        }
        out.push('\n');
    }
    out
}

pub fn write_csv(collector: &DataCollector, path: impl AsRef<Path>) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(to_csv(collector).as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Write any serializable value as pretty-printed JSON.
pub fn write_json<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}
