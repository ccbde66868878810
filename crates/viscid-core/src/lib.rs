//! Core types and traits for the viscid diffusion solver.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the viscid workspace:
//! the field and step identifiers, read-only plane views, error types,
//! and the collaborator traits (initializers and sinks).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod id;
pub mod traits;
pub mod view;

pub use error::{GridError, SinkError, StepError};
pub use field::Field;
pub use id::StepId;
pub use traits::{DiagnosticSink, Initializer, SnapshotSink};
pub use view::PlaneView;
