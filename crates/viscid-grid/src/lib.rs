//! Double-buffered grid storage for viscid simulations.
//!
//! # Architecture
//!
//! ```text
//! GridBuffer
//! ├── PlanePair (u)  current ⇄ next
//! └── PlanePair (v)  current ⇄ next
//!         └── Plane → Vec<f64>, row-major, height x width
//! ```
//!
//! The "current" plane of each field is the authoritative state; the
//! "next" plane is scratch owned by the in-flight update. [`GridBuffer::swap`]
//! exchanges the two roles for both fields by moving the `Vec` handles, so a
//! swap never copies cell data.
//!
//! [`BoundaryPolicy`] fills the border ring of a plane once its interior has
//! been written.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod pingpong;
pub mod plane;

pub use boundary::BoundaryPolicy;
pub use pingpong::GridBuffer;
pub use plane::Plane;
