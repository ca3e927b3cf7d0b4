//! Cross load set comparison
//!
//! Two load sets are compared on their per-point extremes. Each compared
//! (point, component) pair yields a `max` row and a `min` row, with the
//! difference measured from the first load set to the second.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LoadsError, LoadsResult};
use crate::extremes::{point_extremes, raw_point_extremes, ComponentExtremes, ExtremeValue, PointExtremes};
use crate::loads::{Component, LoadSet};
use crate::units::Units;

/// Load case reported for a side that has no data for a point
pub const NOT_AVAILABLE: &str = "N/A";

/// Which extreme a comparison row refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtremeType {
    Max,
    Min,
}

impl ExtremeType {
    fn select(self, extremes: &ComponentExtremes) -> &ExtremeValue {
        match self {
            ExtremeType::Max => &extremes.max,
            ExtremeType::Min => &extremes.min,
        }
    }
}

/// One row of a comparison table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub point_name: String,
    pub component: Component,
    #[serde(rename = "type")]
    pub kind: ExtremeType,
    pub loadset1_value: f64,
    pub loadset2_value: f64,
    pub loadset1_loadcase: String,
    pub loadset2_loadcase: String,
    /// `loadset2_value - loadset1_value`
    pub abs_diff: f64,
    /// Percentage change relative to loadset 1; `+inf` when loadset 1 is zero
    #[serde(with = "non_finite")]
    pub pct_diff: f64,
}

impl ComparisonRow {
    pub fn new(
        point_name: &str,
        component: Component,
        kind: ExtremeType,
        (loadset1_value, loadset1_loadcase): (f64, String),
        (loadset2_value, loadset2_loadcase): (f64, String),
    ) -> Self {
        let abs_diff = loadset2_value - loadset1_value;
        let pct_diff = if loadset1_value != 0.0 {
            abs_diff / loadset1_value * 100.0
        } else {
            f64::INFINITY
        };
        Self {
            point_name: point_name.to_string(),
            component,
            kind,
            loadset1_value,
            loadset2_value,
            loadset1_loadcase,
            loadset2_loadcase,
            abs_diff,
            pct_diff,
        }
    }
}

/// Name/unit snapshot of a compared load set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSetMetadata {
    pub name: Option<String>,
    pub version: i64,
    pub description: Option<String>,
    pub units: Units,
}

impl From<&LoadSet> for LoadSetMetadata {
    fn from(loadset: &LoadSet) -> Self {
        Self {
            name: loadset.name().map(str::to_string),
            version: loadset.version(),
            description: loadset.description().map(str::to_string),
            units: loadset.units(),
        }
    }
}

/// Result of comparing two load sets.
///
/// Serializes as `{"metadata": {"loadset1": .., "loadset2": ..}, "comparison_rows": [..]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "CompareDocument", from = "CompareDocument")]
pub struct LoadSetCompare {
    pub loadset1_metadata: LoadSetMetadata,
    pub loadset2_metadata: LoadSetMetadata,
    pub comparison_rows: Vec<ComparisonRow>,
}

#[derive(Clone, Serialize, Deserialize)]
struct CompareDocument {
    metadata: MetadataPair,
    comparison_rows: Vec<ComparisonRow>,
}

#[derive(Clone, Serialize, Deserialize)]
struct MetadataPair {
    loadset1: LoadSetMetadata,
    loadset2: LoadSetMetadata,
}

impl From<LoadSetCompare> for CompareDocument {
    fn from(compare: LoadSetCompare) -> Self {
        Self {
            metadata: MetadataPair {
                loadset1: compare.loadset1_metadata,
                loadset2: compare.loadset2_metadata,
            },
            comparison_rows: compare.comparison_rows,
        }
    }
}

impl From<CompareDocument> for LoadSetCompare {
    fn from(doc: CompareDocument) -> Self {
        Self {
            loadset1_metadata: doc.metadata.loadset1,
            loadset2_metadata: doc.metadata.loadset2,
            comparison_rows: doc.comparison_rows,
        }
    }
}

/// Headline statistics of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub loadset1_name: Option<String>,
    pub loadset2_name: Option<String>,
    pub total_comparison_rows: usize,
    pub point_names: Vec<String>,
    pub components: Vec<Component>,
    pub max_absolute_difference: f64,
    /// Largest finite percentage difference
    pub max_percentage_difference: f64,
    pub largest_difference: Option<ComparisonRow>,
}

/// Min/max of one component on both sides, as drawn by a range chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRange {
    pub loadset1_min: f64,
    pub loadset1_max: f64,
    pub loadset2_min: f64,
    pub loadset2_max: f64,
    pub loadset1_min_case: String,
    pub loadset1_max_case: String,
    pub loadset2_min_case: String,
    pub loadset2_max_case: String,
    /// Loadset 2 reaches outside the loadset 1 range
    pub exceeds: bool,
}

/// Force and moment ranges at one point
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointRanges {
    pub forces: BTreeMap<Component, ComponentRange>,
    pub moments: BTreeMap<Component, ComponentRange>,
}

impl LoadSetCompare {
    pub fn to_json(&self) -> LoadsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> LoadsResult<Self> {
        serde_json::from_str(json).map_err(|e| LoadsError::from_parse("<string>", e))
    }

    /// Write the comparison document to a JSON file
    pub fn write_json(&self, path: impl AsRef<Path>) -> LoadsResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Wrote comparison with {} rows to {}", self.comparison_rows.len(), path.display());
        Ok(())
    }

    /// Read a comparison document from a JSON file
    pub fn read_json(path: impl AsRef<Path>) -> LoadsResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadsError::FileNotFound(path.to_path_buf()),
            _ => LoadsError::Io(e),
        })?;
        serde_json::from_str(&text).map_err(|e| LoadsError::from_parse(path.display().to_string(), e))
    }

    pub fn summary(&self) -> ComparisonSummary {
        let rows = &self.comparison_rows;
        let point_names: BTreeSet<_> = rows.iter().map(|r| r.point_name.clone()).collect();
        let components: BTreeSet<_> = rows.iter().map(|r| r.component).collect();

        let max_absolute_difference = rows.iter().map(|r| r.abs_diff.abs()).fold(0.0, f64::max);
        let max_percentage_difference = rows
            .iter()
            .map(|r| r.pct_diff.abs())
            .filter(|p| p.is_finite())
            .fold(0.0, f64::max);
        let largest_difference = rows
            .iter()
            .fold(None::<&ComparisonRow>, |best, row| match best {
                Some(b) if b.abs_diff.abs() >= row.abs_diff.abs() => Some(b),
                _ => Some(row),
            })
            .cloned();

        ComparisonSummary {
            loadset1_name: self.loadset1_metadata.name.clone(),
            loadset2_name: self.loadset2_metadata.name.clone(),
            total_comparison_rows: rows.len(),
            point_names: point_names.into_iter().collect(),
            components: components.into_iter().collect(),
            max_absolute_difference,
            max_percentage_difference,
            largest_difference,
        }
    }

    /// Per-point min/max ranges of both load sets.
    ///
    /// A component appears only when both its `max` and `min` rows exist.
    pub fn component_ranges(&self) -> BTreeMap<String, PointRanges> {
        let mut by_point: BTreeMap<&str, Vec<&ComparisonRow>> = BTreeMap::new();
        for row in &self.comparison_rows {
            by_point.entry(row.point_name.as_str()).or_default().push(row);
        }

        by_point
            .into_iter()
            .map(|(point, rows)| {
                let find = |component: Component, kind: ExtremeType| {
                    rows.iter().find(|r| r.component == component && r.kind == kind)
                };
                let mut ranges = PointRanges::default();
                for component in Component::ALL {
                    let (Some(max), Some(min)) =
                        (find(component, ExtremeType::Max), find(component, ExtremeType::Min))
                    else {
                        continue;
                    };
                    let range = ComponentRange {
                        loadset1_min: min.loadset1_value,
                        loadset1_max: max.loadset1_value,
                        loadset2_min: min.loadset2_value,
                        loadset2_max: max.loadset2_value,
                        loadset1_min_case: min.loadset1_loadcase.clone(),
                        loadset1_max_case: max.loadset1_loadcase.clone(),
                        loadset2_min_case: min.loadset2_loadcase.clone(),
                        loadset2_max_case: max.loadset2_loadcase.clone(),
                        exceeds: min.loadset2_value < min.loadset1_value
                            || max.loadset2_value > max.loadset1_value,
                    };
                    if component.is_force() {
                        ranges.forces.insert(component, range);
                    } else {
                        ranges.moments.insert(component, range);
                    }
                }
                (point.to_string(), ranges)
            })
            .collect()
    }
}

fn side_value(raw: &PointExtremes, point: &str, component: Component, kind: ExtremeType) -> (f64, String) {
    // Filtered extremes are a subset of the raw ones with identical values,
    // so the raw map answers both the present and the suppressed case.
    raw.get(point)
        .and_then(|components| components.get(&component))
        .map(|ext| {
            let e = kind.select(ext);
            (e.value, e.loadcase.clone())
        })
        .unwrap_or_else(|| (0.0, NOT_AVAILABLE.to_string()))
}

fn has_component(extremes: &PointExtremes, point: &str, component: Component) -> bool {
    extremes
        .get(point)
        .is_some_and(|components| components.contains_key(&component))
}

/// Compare `loadset2` against `loadset1`.
///
/// `loadset2` is converted into the force units of `loadset1` first; the
/// metadata snapshots keep each side's original units.
pub fn compare(loadset1: &LoadSet, loadset2: &LoadSet) -> LoadSetCompare {
    let converted;
    let other = if loadset2.units().forces() != loadset1.units().forces() {
        converted = loadset2.convert_to(loadset1.units().forces());
        &converted
    } else {
        loadset2
    };

    let extremes1 = point_extremes(loadset1);
    let extremes2 = point_extremes(other);
    let raw1 = raw_point_extremes(loadset1);
    let raw2 = raw_point_extremes(other);

    let points: BTreeSet<&String> = extremes1.keys().chain(extremes2.keys()).collect();

    let mut comparison_rows = Vec::new();
    for point in points {
        for component in Component::ALL {
            if !has_component(&extremes1, point, component) && !has_component(&extremes2, point, component) {
                continue;
            }
            for kind in [ExtremeType::Max, ExtremeType::Min] {
                comparison_rows.push(ComparisonRow::new(
                    point,
                    component,
                    kind,
                    side_value(&raw1, point, component, kind),
                    side_value(&raw2, point, component, kind),
                ));
            }
        }
    }

    log::debug!(
        "Compared {:?} with {:?}: {} rows",
        loadset1.name(),
        loadset2.name(),
        comparison_rows.len()
    );

    LoadSetCompare {
        loadset1_metadata: LoadSetMetadata::from(loadset1),
        loadset2_metadata: LoadSetMetadata::from(loadset2),
        comparison_rows,
    }
}

impl LoadSet {
    /// See [`compare`]
    pub fn compare_to(&self, other: &LoadSet) -> LoadSetCompare {
        compare(self, other)
    }
}

/// JSON has no literal for infinities or NaN; write them as strings
mod non_finite {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_str("-Infinity")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(n) => Ok(n),
            NumberOrText::Text(t) => match t.as_str() {
                "Infinity" | "inf" => Ok(f64::INFINITY),
                "-Infinity" | "-inf" => Ok(f64::NEG_INFINITY),
                "NaN" | "nan" => Ok(f64::NAN),
                other => Err(serde::de::Error::custom(format!("invalid number: {other}"))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::{ForceMoment, LoadCase, PointLoad};
    use crate::units::ForceUnit;
    use approx::assert_relative_eq;

    fn single(name: &str, units: ForceUnit, cases: &[(&str, &str, ForceMoment)]) -> LoadSet {
        LoadSet::new(
            name,
            1,
            Units::new(units),
            cases
                .iter()
                .map(|(case, point, fm)| LoadCase::new(case, vec![PointLoad::new(point, *fm)]))
                .collect(),
        )
    }

    #[test]
    fn test_basic_rows_and_diffs() {
        let a = single(
            "Old",
            ForceUnit::N,
            &[("A1", "P", ForceMoment::force(100.0, 0.0, 0.0)), ("A2", "P", ForceMoment::force(-50.0, 0.0, 0.0))],
        );
        let b = single("New", ForceUnit::N, &[("B1", "P", ForceMoment::force(150.0, 0.0, 0.0))]);

        let cmp = a.compare_to(&b);
        assert_eq!(cmp.comparison_rows.len(), 2);

        let max = &cmp.comparison_rows[0];
        assert_eq!(max.kind, ExtremeType::Max);
        assert_eq!(max.loadset1_loadcase, "A1");
        assert_eq!(max.loadset2_loadcase, "B1");
        assert_relative_eq!(max.abs_diff, 50.0);
        assert_relative_eq!(max.pct_diff, 50.0);

        let min = &cmp.comparison_rows[1];
        assert_eq!(min.kind, ExtremeType::Min);
        assert_relative_eq!(min.abs_diff, 200.0);
        assert_relative_eq!(min.pct_diff, -400.0);
    }

    #[test]
    fn test_other_is_converted_to_self_units() {
        let a = single("N set", ForceUnit::N, &[("C", "P", ForceMoment::force(1000.0, 0.0, 0.0))]);
        let b = single("kN set", ForceUnit::KN, &[("C", "P", ForceMoment::force(1.0, 0.0, 0.0))]);
        let cmp = a.compare_to(&b);
        for row in &cmp.comparison_rows {
            assert_relative_eq!(row.loadset2_value, 1000.0, epsilon = 1e-9);
            assert_relative_eq!(row.abs_diff, 0.0, epsilon = 1e-9);
        }
        assert_eq!(cmp.loadset2_metadata.units.forces(), ForceUnit::KN);
    }

    #[test]
    fn test_zero_side_reports_zero_and_infinite_pct() {
        let zero = single("Zero", ForceUnit::N, &[("Z", "P", ForceMoment::default())]);
        let loaded = single("Loaded", ForceUnit::N, &[("L", "P", ForceMoment::force(0.0, 0.0, 10.0))]);

        let cmp = zero.compare_to(&loaded);
        assert_eq!(cmp.comparison_rows.len(), 2);
        for row in &cmp.comparison_rows {
            assert_eq!(row.component, Component::Fz);
            assert_eq!(row.loadset1_value, 0.0);
            assert_eq!(row.loadset1_loadcase, "Z");
            assert!(row.pct_diff.is_infinite() && row.pct_diff > 0.0);
        }

        assert!(zero.compare_to(&zero).comparison_rows.is_empty());
    }

    #[test]
    fn test_missing_point_reports_not_available() {
        let a = single("A", ForceUnit::N, &[("C", "P", ForceMoment::force(1.0, 0.0, 0.0))]);
        let b = single("B", ForceUnit::N, &[("C", "Q", ForceMoment::force(2.0, 0.0, 0.0))]);
        let cmp = a.compare_to(&b);
        let points: Vec<_> = cmp.comparison_rows.iter().map(|r| r.point_name.as_str()).collect();
        assert_eq!(points, vec!["P", "P", "Q", "Q"]);
        assert_eq!(cmp.comparison_rows[0].loadset2_loadcase, NOT_AVAILABLE);
        assert_eq!(cmp.comparison_rows[2].loadset1_loadcase, NOT_AVAILABLE);
    }

    #[test]
    fn test_json_document_shape_and_round_trip() {
        let a = single("A", ForceUnit::N, &[("C", "P", ForceMoment::default())]);
        let b = single("B", ForceUnit::N, &[("C", "P", ForceMoment::force(5.0, 0.0, 0.0))]);
        let cmp = a.compare_to(&b);

        let json = cmp.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metadata"]["loadset1"]["name"], "A");
        assert_eq!(value["comparison_rows"][0]["type"], "max");
        assert_eq!(value["comparison_rows"][0]["pct_diff"], "Infinity");
        assert!(value["metadata"]["loadset2"]["description"].is_null());

        let back = LoadSetCompare::from_json(&json).unwrap();
        assert_eq!(back, cmp);
    }

    #[test]
    fn test_summary_and_ranges() {
        let a = single(
            "A",
            ForceUnit::N,
            &[("A1", "P", ForceMoment::new(10.0, 0.0, 0.0, 5.0, 0.0, 0.0)), ("A2", "P", ForceMoment::new(-10.0, 0.0, 0.0, 1.0, 0.0, 0.0))],
        );
        let b = single(
            "B",
            ForceUnit::N,
            &[("B1", "P", ForceMoment::new(30.0, 0.0, 0.0, 4.0, 0.0, 0.0)), ("B2", "P", ForceMoment::new(-5.0, 0.0, 0.0, 2.0, 0.0, 0.0))],
        );
        let cmp = a.compare_to(&b);

        let summary = cmp.summary();
        assert_eq!(summary.total_comparison_rows, 4);
        assert_eq!(summary.point_names, vec!["P".to_string()]);
        assert_eq!(summary.components, vec![Component::Fx, Component::Mx]);
        assert_relative_eq!(summary.max_absolute_difference, 20.0);
        let largest = summary.largest_difference.unwrap();
        assert_eq!((largest.component, largest.kind), (Component::Fx, ExtremeType::Max));

        let ranges = cmp.component_ranges();
        let fx = &ranges["P"].forces[&Component::Fx];
        assert_eq!((fx.loadset1_min, fx.loadset1_max), (-10.0, 10.0));
        assert_eq!((fx.loadset2_min, fx.loadset2_max), (-5.0, 30.0));
        assert!(fx.exceeds);
        let mx = &ranges["P"].moments[&Component::Mx];
        assert!(!mx.exceeds);
        assert_eq!(mx.loadset2_max_case, "B1");
    }
}
