//! Load sets - named collections of load cases sharing one unit system

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use super::LoadCase;
use crate::error::{LoadsError, LoadsResult};
use crate::units::{ForceUnit, Units};

/// A named collection of load cases.
///
/// Load sets are values: every transform returns a new `LoadSet` and leaves
/// the receiver untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSet {
    #[serde(deserialize_with = "required_nullable")]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    version: i64,
    units: Units,
    load_cases: Vec<LoadCase>,
}

/// The key must be present; `null` is allowed
fn required_nullable<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<String>::deserialize(deserializer)
}

/// Headline figures for a load set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSetSummary {
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: i64,
    pub units: Units,
    pub num_load_cases: usize,
    pub total_point_loads: usize,
}

/// Listing entry for one load case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCaseInfo {
    pub name: Option<String>,
    pub description: Option<String>,
    pub num_point_loads: usize,
    pub point_load_names: Vec<Option<String>>,
}

impl LoadSet {
    /// Create a new load set
    pub fn new(name: &str, version: i64, units: Units, load_cases: Vec<LoadCase>) -> Self {
        Self {
            name: Some(name.to_string()),
            description: None,
            version,
            units,
            load_cases,
        }
    }

    /// Attach a description
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn load_cases(&self) -> &[LoadCase] {
        &self.load_cases
    }

    /// Same metadata and units, different load cases
    pub(crate) fn with_load_cases(&self, units: Units, load_cases: Vec<LoadCase>) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            version: self.version,
            units,
            load_cases,
        }
    }

    // ========================
    // JSON I/O
    // ========================

    /// Read a load set from a JSON file
    pub fn read_json(path: impl AsRef<Path>) -> LoadsResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadsError::FileNotFound(path.to_path_buf()),
            _ => LoadsError::Io(e),
        })?;
        let loadset: LoadSet = serde_json::from_str(&text)
            .map_err(|e| LoadsError::from_parse(path.display().to_string(), e))?;
        log::debug!(
            "Read LoadSet {:?} with {} load cases from {}",
            loadset.name,
            loadset.load_cases.len(),
            path.display()
        );
        Ok(loadset)
    }

    /// Parse a load set from a JSON string
    pub fn from_json_str(json: &str) -> LoadsResult<Self> {
        serde_json::from_str(json).map_err(|e| LoadsError::from_parse("<string>", e))
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> LoadsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the load set to a JSON file
    pub fn write_json(&self, path: impl AsRef<Path>) -> LoadsResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Wrote LoadSet to {}", path.display());
        Ok(())
    }

    // ========================
    // Transforms
    // ========================

    /// Convert every load to `target` force units and the paired moment units
    pub fn convert_to(&self, target: ForceUnit) -> Self {
        let target_units = Units::new(target);
        let force_factor = self.units.forces().to_newtons() / target.to_newtons();
        let moment_factor =
            self.units.moments().to_newton_metres() / target_units.moments().to_newton_metres();

        log::debug!(
            "Converting {}/{} -> {}/{} (force x{}, moment x{})",
            self.units.forces(),
            self.units.moments(),
            target_units.forces(),
            target_units.moments(),
            force_factor,
            moment_factor
        );

        let load_cases = self
            .load_cases
            .iter()
            .map(|lc| lc.map_force_moments(|fm| fm.converted(force_factor, moment_factor)))
            .collect();
        self.with_load_cases(target_units, load_cases)
    }

    /// Convert to a force unit given by its symbol (`"N"`, `"kN"`, `"lbf"`, `"klbf"`)
    pub fn convert_to_unit(&self, target: &str) -> LoadsResult<Self> {
        Ok(self.convert_to(target.parse()?))
    }

    /// Scale all forces and moments by `by`; units are unchanged
    pub fn factor(&self, by: f64) -> Self {
        let load_cases = self
            .load_cases
            .iter()
            .map(|lc| lc.map_force_moments(|fm| fm.scaled(by)))
            .collect();
        self.with_load_cases(self.units, load_cases)
    }

    // ========================
    // Views
    // ========================

    pub fn summary(&self) -> LoadSetSummary {
        LoadSetSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            version: self.version,
            units: self.units,
            num_load_cases: self.load_cases.len(),
            total_point_loads: self.load_cases.iter().map(|lc| lc.point_loads().len()).sum(),
        }
    }

    pub fn load_case_infos(&self) -> Vec<LoadCaseInfo> {
        self.load_cases
            .iter()
            .map(|lc| LoadCaseInfo {
                name: lc.name().map(str::to_string),
                description: lc.description().map(str::to_string),
                num_point_loads: lc.point_loads().len(),
                point_load_names: lc
                    .point_loads()
                    .iter()
                    .map(|pl| pl.name().map(str::to_string))
                    .collect(),
            })
            .collect()
    }
}
