// Domain types and value objects
mod outcome;
mod record;
mod sizing;
mod stage;
mod submission;

pub use outcome::{
    AnalysisOutcome, GroupCounts, GroupStatistics, KpiMetrics, OutliersRemoved, TestResult,
};
pub use record::{AnalysisRecord, KpiEntry};
pub use sizing::{SizingMethod, SizingPayload, SizingRequest, SizingResponse, SizingResult};
pub use stage::AnalysisStage;
pub use submission::{
    AnalysisSubmission, ColumnSpec, ComparedUsers, EncodedFile, KpiType, SubmissionDraft,
    SubmissionPayload, UploadedFile,
};
