//! Stateful front end over the load set operations
//!
//! A session holds the working load set, an optional second load set to
//! compare against, and the most recent comparison. Transforms replace the
//! working load set with their result.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::compare::{ComparisonSummary, LoadSetCompare, PointRanges};
use crate::error::{LoadsError, LoadsResult};
use crate::loads::{LoadCaseInfo, LoadSet, LoadSetSummary};

#[derive(Debug, Default)]
pub struct Session {
    current: Option<LoadSet>,
    comparison: Option<LoadSet>,
    last_comparison: Option<LoadSetCompare>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&LoadSet> {
        self.current.as_ref()
    }

    pub fn comparison_loadset(&self) -> Option<&LoadSet> {
        self.comparison.as_ref()
    }

    pub fn last_comparison(&self) -> Option<&LoadSetCompare> {
        self.last_comparison.as_ref()
    }

    fn require_current(&self) -> LoadsResult<&LoadSet> {
        self.current.as_ref().ok_or(LoadsError::NoLoadSet)
    }

    fn require_comparison(&self) -> LoadsResult<&LoadSetCompare> {
        self.last_comparison.as_ref().ok_or(LoadsError::NoComparison)
    }

    fn replace_current(&mut self, loadset: LoadSet) -> &LoadSet {
        self.current.insert(loadset)
    }

    /// Load the working load set from a JSON file
    pub fn load_from_json(&mut self, path: impl AsRef<Path>) -> LoadsResult<LoadSetSummary> {
        let loadset = LoadSet::read_json(path)?;
        Ok(self.replace_current(loadset).summary())
    }

    /// Load the working load set from a JSON document
    pub fn load_from_str(&mut self, json: &str) -> LoadsResult<LoadSetSummary> {
        let loadset = LoadSet::from_json_str(json)?;
        Ok(self.replace_current(loadset).summary())
    }

    /// Load the load set to compare against. Any previous comparison is
    /// discarded.
    pub fn load_comparison_from_json(&mut self, path: impl AsRef<Path>) -> LoadsResult<LoadSetSummary> {
        let loadset = LoadSet::read_json(path)?;
        self.last_comparison = None;
        Ok(self.comparison.insert(loadset).summary())
    }

    pub fn load_comparison_from_str(&mut self, json: &str) -> LoadsResult<LoadSetSummary> {
        let loadset = LoadSet::from_json_str(json)?;
        self.last_comparison = None;
        Ok(self.comparison.insert(loadset).summary())
    }

    pub fn convert_units(&mut self, target: &str) -> LoadsResult<&LoadSet> {
        let converted = self.require_current()?.convert_to_unit(target)?;
        Ok(self.replace_current(converted))
    }

    pub fn scale(&mut self, factor: f64) -> LoadsResult<&LoadSet> {
        let scaled = self.require_current()?.factor(factor);
        Ok(self.replace_current(scaled))
    }

    pub fn envelope(&mut self) -> LoadsResult<&LoadSet> {
        let enveloped = self.require_current()?.envelope()?;
        Ok(self.replace_current(enveloped))
    }

    pub fn export_ansys(&self, folder: impl AsRef<Path>, name_stem: &str) -> LoadsResult<Vec<PathBuf>> {
        self.require_current()?.to_ansys(folder, name_stem)
    }

    pub fn summary(&self) -> LoadsResult<LoadSetSummary> {
        Ok(self.require_current()?.summary())
    }

    pub fn load_cases(&self) -> LoadsResult<Vec<LoadCaseInfo>> {
        Ok(self.require_current()?.load_case_infos())
    }

    /// Compare the working load set against the comparison load set
    pub fn compare(&mut self) -> LoadsResult<&LoadSetCompare> {
        let current = self.require_current()?;
        let other = self.comparison.as_ref().ok_or(LoadsError::NoComparisonLoadSet)?;
        let result = current.compare_to(other);
        Ok(self.last_comparison.insert(result))
    }

    pub fn comparison_summary(&self) -> LoadsResult<ComparisonSummary> {
        Ok(self.require_comparison()?.summary())
    }

    pub fn comparison_ranges(&self) -> LoadsResult<BTreeMap<String, PointRanges>> {
        Ok(self.require_comparison()?.component_ranges())
    }

    pub fn export_comparison_json(&self, path: impl AsRef<Path>) -> LoadsResult<()> {
        self.require_comparison()?.write_json(path)
    }

    /// Forget every load set and comparison
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOADSET: &str = r#"{
        "name": "Session set",
        "version": 1,
        "units": {"forces": "N", "moments": "Nm"},
        "load_cases": [
            {"name": "LC1", "point_loads": [{"name": "P1", "force_moment": {"fx": 1000.0, "my": -20.0}}]},
            {"name": "LC2", "point_loads": [{"name": "P1", "force_moment": {"fx": -400.0, "my": 10.0}}]}
        ]
    }"#;

    const OTHER: &str = r#"{
        "name": "Other set",
        "version": 2,
        "units": {"forces": "kN", "moments": "kNm"},
        "load_cases": [
            {"name": "A", "point_loads": [{"name": "P1", "force_moment": {"fx": 1.5}}]}
        ]
    }"#;

    #[test]
    fn test_preconditions() {
        let mut session = Session::new();
        assert!(matches!(session.summary(), Err(LoadsError::NoLoadSet)));
        assert!(matches!(session.scale(2.0), Err(LoadsError::NoLoadSet)));
        assert!(matches!(session.envelope(), Err(LoadsError::NoLoadSet)));
        assert!(matches!(session.compare(), Err(LoadsError::NoLoadSet)));
        assert!(matches!(session.comparison_summary(), Err(LoadsError::NoComparison)));

        session.load_from_str(LOADSET).unwrap();
        assert!(matches!(session.compare(), Err(LoadsError::NoComparisonLoadSet)));
        assert!(matches!(session.comparison_ranges(), Err(LoadsError::NoComparison)));
    }

    #[test]
    fn test_transforms_replace_current() {
        let mut session = Session::new();
        let summary = session.load_from_str(LOADSET).unwrap();
        assert_eq!(summary.num_load_cases, 2);

        let converted = session.convert_units("kN").unwrap();
        assert_eq!(converted.load_cases()[0].point_loads()[0].force_moment().fx, 1.0);

        session.scale(2.0).unwrap();
        let fx = session.current().unwrap().load_cases()[0].point_loads()[0].force_moment().fx;
        assert_eq!(fx, 2.0);

        assert!(matches!(session.convert_units("tonnes"), Err(LoadsError::UnsupportedUnit(_))));
    }

    #[test]
    fn test_compare_flow() {
        let mut session = Session::new();
        session.load_from_str(LOADSET).unwrap();
        session.load_comparison_from_str(OTHER).unwrap();

        let rows = session.compare().unwrap().comparison_rows.len();
        assert!(rows > 0);
        assert_eq!(session.comparison_summary().unwrap().total_comparison_rows, rows);
        assert!(session.comparison_ranges().unwrap().contains_key("P1"));

        // A new comparison set invalidates the previous result
        session.load_comparison_from_str(OTHER).unwrap();
        assert!(session.last_comparison().is_none());
    }

    #[test]
    fn test_reset() {
        let mut session = Session::new();
        session.load_from_str(LOADSET).unwrap();
        session.load_comparison_from_str(OTHER).unwrap();
        session.compare().unwrap();
        session.reset();
        assert!(session.current().is_none());
        assert!(session.comparison_loadset().is_none());
        assert!(session.last_comparison().is_none());
    }
}
