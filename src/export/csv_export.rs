//! CSV time-series export for voltage traces.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use crate::state::SimulationSample;

/// Record for CSV time-series export
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeriesRecord {
    /// Simulation time (ms)
    pub time_ms: f64,
    /// Membrane voltage (mV)
    pub voltage_mV: f64,
    /// Stimulus pulse on
    pub stimulated: bool,
    /// Phase number (0-4)
    pub phase: u8,
}

impl From<&SimulationSample> for TimeSeriesRecord {
    fn from(s: &SimulationSample) -> Self {
        Self {
            time_ms: s.time_ms,
            voltage_mV: s.voltage_mV,
            stimulated: s.stimulated,
            phase: s.phase.number(),
        }
    }
}

/// CSV exporter for time-series data
pub struct CsvExporter {
    writer: csv::Writer<File>,
    /// Minimum simulation time between recorded samples (ms)
    sample_interval_ms: f64,
    /// Last sample time
    last_sample_time: f64,
    /// Path to output file
    path: PathBuf,
}

impl CsvExporter {
    /// Create a new CSV exporter in `exports/` with a timestamped filename
    pub fn new(sample_interval_ms: f64) -> Result<Self> {
        let dir = PathBuf::from("exports");
        std::fs::create_dir_all(&dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("trace_{}.csv", timestamp));

        Self::to_path(path, sample_interval_ms)
    }

    /// Create a CSV exporter writing to a specific file
    pub fn to_path<P: AsRef<Path>>(path: P, sample_interval_ms: f64) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        let writer = csv::Writer::from_writer(file);

        log::info!("CSV export started: {}", path.display());

        Ok(Self {
            writer,
            sample_interval_ms,
            last_sample_time: f64::NEG_INFINITY, // first sample is always recorded
            path,
        })
    }

    /// Record a sample if the interval has elapsed
    pub fn maybe_record(&mut self, sample: &SimulationSample) -> Result<bool> {
        if sample.time_ms - self.last_sample_time >= self.sample_interval_ms {
            self.record(sample)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Force record a sample regardless of interval
    pub fn record(&mut self, sample: &SimulationSample) -> Result<()> {
        self.writer.serialize(TimeSeriesRecord::from(sample))?;
        self.last_sample_time = sample.time_ms;
        Ok(())
    }

    /// Record every sample of a trace that passes the interval
    pub fn record_all<'a, I>(&mut self, samples: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a SimulationSample>,
    {
        let mut written = 0;
        for sample in samples {
            if self.maybe_record(sample)? {
                written += 1;
            }
        }
        Ok(written)
    }

    /// Finish writing and return the output path
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        log::info!("CSV export completed: {}", self.path.display());
        Ok(self.path)
    }

    /// Get the output path
    pub fn path(&self) -> &Path {
        &self.path
    }
}
