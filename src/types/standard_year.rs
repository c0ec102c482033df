use crate::types::record::ClimateRecord;

/// Where a design-year record was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Provenance {
    pub source_year: i32,
    pub month: u32,
}

/// One hour of the design year. The record's hour-ending label covers an hour
/// of the reference year, so the last one reads 1 January 00:00 of the next year.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardYearRecord {
    pub record: ClimateRecord,
    pub provenance: Provenance,
}

/// Score of one candidate year for a calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateScore {
    pub year: i32,
    /// Weighted Finkelstein-Schafer statistic; lower is more typical.
    pub score: f64,
    /// Weighted mean normalised daily deviation, used to break score ties.
    pub deviation: f64,
}

/// The outcome of scoring every candidate year for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSelection {
    pub month: u32,
    pub source_year: i32,
    /// All complete candidates in ascending year order.
    pub candidates: Vec<CandidateScore>,
}

/// A synthesized 8760-hour representative year.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardYear {
    reference_year: i32,
    records: Vec<StandardYearRecord>,
    selections: Vec<MonthSelection>,
}

impl StandardYear {
    pub(crate) fn new(
        reference_year: i32,
        records: Vec<StandardYearRecord>,
        selections: Vec<MonthSelection>,
    ) -> Self {
        Self {
            reference_year,
            records,
            selections,
        }
    }

    /// The placeholder calendar year every timestamp is rendered in.
    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn records(&self) -> &[StandardYearRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The twelve month selections, January first.
    pub fn selections(&self) -> &[MonthSelection] {
        &self.selections
    }

    /// Source year chosen for `month` (1-12).
    pub fn source_year(&self, month: u32) -> Option<i32> {
        self.selections
            .iter()
            .find(|s| s.month == month)
            .map(|s| s.source_year)
    }
}
