mod report;
mod scenario;

pub use report::{Report, YearChange, YearInputs, YearOutcome, YearRequest, YearResult};
pub use scenario::ScenarioPipeline;
