use {
    serde::{Deserialize, Serialize},
    strum_macros::Display,
};

/// Named steps of the visual progress sequence, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum AnalysisStage {
    #[strum(to_string = "Reading file")]
    ReadingFile,

    #[strum(to_string = "Validating structure")]
    ValidatingStructure,

    #[strum(to_string = "Identifying groups")]
    IdentifyingGroups,

    #[strum(to_string = "Computing statistics")]
    ComputingStatistics,

    #[strum(to_string = "Running statistical tests")]
    RunningTests,

    #[strum(to_string = "Finalizing results")]
    Finalizing,
}
