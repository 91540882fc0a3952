//! Training metrics reporting
//!
//! One [`IterationStats`] record per training iteration, fanned out to any
//! number of sinks through the [`MetricsLogger`] trait. The console sink
//! prints a fixed-width table; the CSV sink writes one row per iteration for
//! offline plotting.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Batch statistics for one training iteration. Returns and episode lengths
/// are computed over the complete paths of the batch, on raw rewards.
#[derive(Clone, Debug, PartialEq)]
pub struct IterationStats {
    pub iteration: usize,
    /// Wall-clock seconds since training started.
    pub elapsed_secs: f64,
    pub mean_return: f32,
    pub std_return: f32,
    pub max_return: f32,
    pub min_return: f32,
    pub mean_ep_len: f32,
    pub std_ep_len: f32,
    pub timesteps_this_batch: usize,
    pub timesteps_so_far: usize,
}

/// Sink for per-iteration statistics.
pub trait MetricsLogger {
    fn log(&mut self, stats: &IterationStats);

    /// Push buffered output to its destination.
    fn flush(&mut self) {}
}

/// Prints a fixed-width table to stdout, header first.
pub struct ConsoleLogger {
    header_printed: bool,
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self {
            header_printed: false,
        }
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsLogger for ConsoleLogger {
    fn log(&mut self, stats: &IterationStats) {
        if !self.header_printed {
            println!(
                "{:>5} {:>9} {:>11} {:>10} {:>10} {:>10} {:>9} {:>9} {:>10}",
                "iter",
                "time_s",
                "mean_ret",
                "std_ret",
                "max_ret",
                "min_ret",
                "ep_len",
                "batch_ts",
                "total_ts"
            );
            self.header_printed = true;
        }
        println!(
            "{:>5} {:>9.1} {:>11.2} {:>10.2} {:>10.2} {:>10.2} {:>9.1} {:>9} {:>10}",
            stats.iteration,
            stats.elapsed_secs,
            stats.mean_return,
            stats.std_return,
            stats.max_return,
            stats.min_return,
            stats.mean_ep_len,
            stats.timesteps_this_batch,
            stats.timesteps_so_far
        );
    }
}

/// Appends one CSV row per iteration. The header is written on creation, so
/// a truncated run still leaves a parseable file.
pub struct CsvLogger {
    writer: BufWriter<File>,
}

impl CsvLogger {
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(
            writer,
            "iteration,elapsed_secs,mean_return,std_return,max_return,min_return,\
             mean_ep_len,std_ep_len,timesteps_this_batch,timesteps_so_far"
        )?;
        Ok(Self { writer })
    }
}

impl MetricsLogger for CsvLogger {
    fn log(&mut self, stats: &IterationStats) {
        let row = writeln!(
            self.writer,
            "{},{},{},{},{},{},{},{},{},{}",
            stats.iteration,
            stats.elapsed_secs,
            stats.mean_return,
            stats.std_return,
            stats.max_return,
            stats.min_return,
            stats.mean_ep_len,
            stats.std_ep_len,
            stats.timesteps_this_batch,
            stats.timesteps_so_far
        );
        if let Err(e) = row {
            tracing::warn!(error = %e, "failed to write metrics row");
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!(error = %e, "failed to flush metrics file");
        }
    }
}

impl Drop for CsvLogger {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

/// Fans each record out to every wrapped sink in order.
pub struct MultiLogger {
    sinks: Vec<Box<dyn MetricsLogger>>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<Box<dyn MetricsLogger>>) -> Self {
        Self { sinks }
    }
}

impl MetricsLogger for MultiLogger {
    fn log(&mut self, stats: &IterationStats) {
        for sink in &mut self.sinks {
            sink.log(stats);
        }
    }

    fn flush(&mut self) {
        for sink in &mut self.sinks {
            sink.flush();
        }
    }
}
