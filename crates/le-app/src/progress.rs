//! Stage events reported while a run is ensured.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingConfig,
    CheckingCache,
    LoadingCachedResult,
    PreparingEnvironment,
    ExportingConcentrations,
    RunningSimulator,
    CollectingResults,
    SavingResults,
    Completed,
}

impl RunStage {
    pub fn label(self) -> &'static str {
        match self {
            RunStage::LoadingConfig => "loading config",
            RunStage::CheckingCache => "checking cache",
            RunStage::LoadingCachedResult => "loading cached run",
            RunStage::PreparingEnvironment => "preparing environment",
            RunStage::ExportingConcentrations => "exporting concentrations",
            RunStage::RunningSimulator => "running simulator",
            RunStage::CollectingResults => "collecting results",
            RunStage::SavingResults => "saving results",
            RunStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    /// Simulated year of a per-year simulator invocation.
    pub year: Option<i32>,
}

