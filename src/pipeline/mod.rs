//! Pipeline components: per-package install, scheduler, orchestration, error reporting.

pub mod context;
pub mod error_handler;
pub mod files;
pub mod orchestrator;
pub mod package;
pub mod scheduler;

pub use context::PipelineContext;
pub use error_handler::report_skipped;
pub use files::{PayloadListing, install_file, list_payload_files};
pub use orchestrator::run_install;
pub use package::{process_package, skip_duplicate};
pub use scheduler::{ScheduleMode, ScheduleStats, schedule};
