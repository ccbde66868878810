//! File-backed sinks for viscid.
//!
//! Every sink writes whitespace-separated text that plotting scripts load
//! directly. Files are named after the sampled step and placed in the
//! directory given at construction; the directory must exist.
//!
//! | Sink | Files per sample | Layout |
//! |------|------------------|--------|
//! | [`PointListSink`] | `u_field_step{N}.dat`, `v_field_step{N}.dat` | `X Y Value`, one cell per line |
//! | [`MatrixSink`] | `u_step{N}.dat`, `v_step{N}.dat` | one grid row per line |
//! | [`VectorFieldSink`] | `vector_field_step{N}.dat` | `X Y U V Magnitude` |
//! | [`CentralProfileSink`] | `central_profile_step{N}.dat` | `Position U V Magnitude`, middle row |
//! | [`EnergyHistorySink`] | `energy_history.dat` | `Step Energy`, appended per report |
//!
//! [`BackgroundSnapshotSink`] moves any snapshot sink onto a writer thread
//! so file I/O never stalls the step loop.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod background;
pub mod energy;
pub mod fields;
pub mod plots;

pub use background::BackgroundSnapshotSink;
pub use energy::EnergyHistorySink;
pub use fields::{MatrixSink, PointListSink};
pub use plots::{CentralProfileSink, VectorFieldSink};

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use viscid_core::SinkError;

/// Create `path`, fill it through `body`, and flush.
///
/// Any failure is reported as [`SinkError::Io`] naming the file.
pub(crate) fn write_file(
    path: &Path,
    body: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> Result<(), SinkError> {
    let file = File::create(path).map_err(|e| SinkError::io(path.display(), e))?;
    let mut out = BufWriter::new(file);
    body(&mut out)
        .and_then(|()| out.flush())
        .map_err(|e| SinkError::io(path.display(), e))
}
