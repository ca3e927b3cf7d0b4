//! Extreme values per point and component, and the load-case envelope
//!
//! The envelope keeps the smallest set of load cases that still contains every
//! worst-case value: for each point and component the case with the maximum,
//! and the case with the minimum when that minimum is negative.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{LoadsError, LoadsResult};
use crate::loads::{Component, LoadSet};

/// An extreme value and the load case it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremeValue {
    pub value: f64,
    pub loadcase: String,
}

/// Maximum and minimum of one component at one point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentExtremes {
    pub max: ExtremeValue,
    pub min: ExtremeValue,
}

impl ComponentExtremes {
    fn seed(value: f64, loadcase: &str) -> Self {
        let extreme = ExtremeValue {
            value,
            loadcase: loadcase.to_string(),
        };
        Self {
            max: extreme.clone(),
            min: extreme,
        }
    }

    /// Strict comparisons keep the first occurrence on ties
    fn update(&mut self, value: f64, loadcase: &str) {
        if value > self.max.value {
            self.max = ExtremeValue {
                value,
                loadcase: loadcase.to_string(),
            };
        }
        if value < self.min.value {
            self.min = ExtremeValue {
                value,
                loadcase: loadcase.to_string(),
            };
        }
    }

    fn is_all_zero(&self) -> bool {
        self.max.value == 0.0 && self.min.value == 0.0
    }
}

/// Point name -> component -> extremes
pub type PointExtremes = BTreeMap<String, BTreeMap<Component, ComponentExtremes>>;

/// Extremes of every component at every point, including all-zero components
pub fn raw_point_extremes(loadset: &LoadSet) -> PointExtremes {
    let mut extremes = PointExtremes::new();

    for load_case in loadset.load_cases() {
        let case_name = load_case.name_or_placeholder();
        for point_load in load_case.point_loads() {
            let components = extremes
                .entry(point_load.name_or_placeholder().to_string())
                .or_default();
            let fm = point_load.force_moment();
            for component in Component::ALL {
                let value = fm.get(component);
                components
                    .entry(component)
                    .and_modify(|ext| ext.update(value, case_name))
                    .or_insert_with(|| ComponentExtremes::seed(value, case_name));
            }
        }
    }

    extremes
}

/// Extremes of every component at every point.
///
/// Components that are exactly zero in every load case carry no information
/// and are left out, as are points left with no components.
pub fn point_extremes(loadset: &LoadSet) -> PointExtremes {
    raw_point_extremes(loadset)
        .into_iter()
        .filter_map(|(point, components)| {
            let kept: BTreeMap<_, _> = components
                .into_iter()
                .filter(|(_, ext)| !ext.is_all_zero())
                .collect();
            (!kept.is_empty()).then_some((point, kept))
        })
        .collect()
}

/// Down-select the load cases of `loadset` to those holding an extreme value.
///
/// Every maximum is kept. A minimum is kept only when it is negative, since a
/// non-negative minimum never governs.
pub fn envelope(loadset: &LoadSet) -> LoadsResult<LoadSet> {
    if loadset.load_cases().is_empty() {
        return Err(LoadsError::EmptyLoadSet);
    }
    // A lone case is every component's extreme, even when it is all zero
    if loadset.load_cases().len() == 1 {
        return Ok(loadset.clone());
    }

    let mut retained: HashSet<String> = HashSet::new();
    for components in point_extremes(loadset).into_values() {
        for ext in components.into_values() {
            if ext.min.value < 0.0 {
                retained.insert(ext.min.loadcase);
            }
            retained.insert(ext.max.loadcase);
        }
    }

    let load_cases: Vec<_> = loadset
        .load_cases()
        .iter()
        .filter(|lc| retained.contains(lc.name_or_placeholder()))
        .cloned()
        .collect();

    log::debug!(
        "Envelope kept {} of {} load cases",
        load_cases.len(),
        loadset.load_cases().len()
    );

    Ok(loadset.with_load_cases(loadset.units(), load_cases))
}

impl LoadSet {
    /// See [`point_extremes`]
    pub fn point_extremes(&self) -> PointExtremes {
        point_extremes(self)
    }

    /// See [`envelope`]
    pub fn envelope(&self) -> LoadsResult<LoadSet> {
        envelope(self)
    }
}
