pub mod archive_manager;
pub mod artifact_capture;
pub mod failure_writer;
pub mod form_filler;
pub mod receipt_composer;
pub mod submission;

pub use archive_manager::{ArchiveManager, ArchiveSummary};
pub use artifact_capture::ArtifactCapture;
pub use failure_writer::FailureWriter;
pub use form_filler::FormFiller;
pub use receipt_composer::{page_count, ReceiptComposer};
pub use submission::SubmissionController;
