//! Kinetic-energy history.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use viscid_core::{DiagnosticSink, SinkError, StepId};

/// File name written inside the output directory.
pub const ENERGY_FILE: &str = "energy_history.dat";

/// Appends `step energy` lines to `energy_history.dat`.
///
/// The file is created, with a `Step Energy` header, on the first report
/// and flushed after every line so a crashed run still leaves a usable
/// history. If the file cannot be created, each report retries.
#[derive(Debug)]
pub struct EnergyHistorySink {
    path: PathBuf,
    out: Option<BufWriter<File>>,
}

impl EnergyHistorySink {
    /// History file inside `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(ENERGY_FILE),
            out: None,
        }
    }

    /// Full path of the history file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>, SinkError> {
        if self.out.is_none() {
            let file = File::create(&self.path).map_err(|e| SinkError::io(self.path.display(), e))?;
            let mut out = BufWriter::new(file);
            writeln!(out, "Step Energy").map_err(|e| SinkError::io(self.path.display(), e))?;
            self.out = Some(out);
        }
        self.out.as_mut().ok_or(SinkError::Closed)
    }
}

impl DiagnosticSink for EnergyHistorySink {
    fn report(&mut self, step: StepId, metric: f64) -> Result<(), SinkError> {
        let path = self.path.clone();
        let out = self.writer()?;
        writeln!(out, "{step} {metric:.6}")
            .and_then(|()| out.flush())
            .map_err(|e| SinkError::io(path.display(), e))
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        match &mut self.out {
            Some(out) => out.flush().map_err(|e| SinkError::io(self.path.display(), e)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_then_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = EnergyHistorySink::new(dir.path());
        sink.report(StepId(0), 1.5).unwrap();
        sink.report(StepId(100), 1.25).unwrap();
        let text = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(text, "Step Energy\n0 1.500000\n100 1.250000\n");
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = EnergyHistorySink::new(dir.path().join("absent"));
        match sink.report(StepId(0), 1.0) {
            Err(SinkError::Io { reason }) => assert!(reason.contains(ENERGY_FILE)),
            other => panic!("expected Io, got {other:?}"),
        }
        assert!(sink.flush().is_ok());
    }
}
