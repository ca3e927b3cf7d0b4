//! Load cases

use serde::{Deserialize, Serialize};

use super::{ForceMoment, PointLoad};

/// Placeholder used when a load case has no name
pub const UNNAMED_CASE: &str = "Unnamed";

/// One named loading scenario made of point loads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCase {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    point_loads: Vec<PointLoad>,
}

impl LoadCase {
    /// Create a new load case
    pub fn new(name: &str, point_loads: Vec<PointLoad>) -> Self {
        Self {
            name: Some(name.to_string()),
            description: None,
            point_loads,
        }
    }

    /// Create a load case without a name
    pub fn unnamed(point_loads: Vec<PointLoad>) -> Self {
        Self {
            name: None,
            description: None,
            point_loads,
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

    /// Name used when reporting extremes, `"Unnamed"` when absent
    pub fn name_or_placeholder(&self) -> &str {
        self.name().unwrap_or(UNNAMED_CASE)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn point_loads(&self) -> &[PointLoad] {
        &self.point_loads
    }

    /// Copy of this case with every force/moment vector mapped through `f`
    pub(crate) fn map_force_moments(&self, f: impl Fn(&ForceMoment) -> ForceMoment) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            point_loads: self
                .point_loads
                .iter()
                .map(|pl| pl.with_force_moment(f(&pl.force_moment())))
                .collect(),
        }
    }
}
