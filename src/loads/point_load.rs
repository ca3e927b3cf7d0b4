//! Point loads - forces and moments at a named attachment point

use serde::{Deserialize, Serialize};

use super::ForceMoment;

/// Placeholder used when a point has no name
pub const UNNAMED_POINT: &str = "Unnamed";

/// A force/moment vector applied at a named structural attachment point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointLoad {
    #[serde(default)]
    name: Option<String>,
    force_moment: ForceMoment,
}

impl PointLoad {
    /// Create a new point load
    pub fn new(name: &str, force_moment: ForceMoment) -> Self {
        Self {
            name: Some(name.to_string()),
            force_moment,
        }
    }

    /// Create a point load without a name
    pub fn unnamed(force_moment: ForceMoment) -> Self {
        Self {
            name: None,
            force_moment,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name used when grouping points, `"Unnamed"` when absent
    pub fn name_or_placeholder(&self) -> &str {
        self.name().unwrap_or(UNNAMED_POINT)
    }

    pub fn force_moment(&self) -> ForceMoment {
        self.force_moment
    }

    /// Same point with a new force/moment vector
    pub(crate) fn with_force_moment(&self, force_moment: ForceMoment) -> Self {
        Self {
            name: self.name.clone(),
            force_moment,
        }
    }
}
