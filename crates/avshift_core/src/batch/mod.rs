//! Batch audio shifting.
//!
//! ```text
//! discover_inputs(dir, "*.mp4")
//!     └── for each input
//!             ├── plan:    A.mp4 -> A_p0d5_4821.mp4
//!             ├── run:     ffmpeg -i A.mp4 -itsoffset +0.5 -i A.mp4 ...
//!             └── record:  JobResult
//! ```
//!
//! Each job produces a `JobResult`; the `BatchReport` collects them and the
//! caller decides what a failure means for the exit status.

mod errors;
mod options;
mod processor;
mod types;

pub use errors::{BatchError, JobError};
pub use options::ShiftOptions;
pub use processor::{BatchProcessor, JobLogging};
pub use types::{BatchReport, JobResult, JobStatus};

pub(crate) use processor::execute;
