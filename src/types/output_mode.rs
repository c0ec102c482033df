use std::fmt;

/// Selects which final stage of the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputMode {
    /// The corrected hourly series over the whole input horizon.
    #[default]
    FullPeriod,
    /// A synthesized 8760-hour design year (EA).
    DesignYear,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::FullPeriod => write!(f, "full period"),
            OutputMode::DesignYear => write!(f, "design year"),
        }
    }
}
