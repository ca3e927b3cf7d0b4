//! Force/moment vectors and their components

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the six force/moment components.
///
/// Serialized lowercase (`fx`); the capitalised form (`Fx`) used by load range
/// inputs is accepted as an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Component {
    #[serde(rename = "fx", alias = "Fx")]
    Fx,
    #[serde(rename = "fy", alias = "Fy")]
    Fy,
    #[serde(rename = "fz", alias = "Fz")]
    Fz,
    #[serde(rename = "mx", alias = "Mx")]
    Mx,
    #[serde(rename = "my", alias = "My")]
    My,
    #[serde(rename = "mz", alias = "Mz")]
    Mz,
}

impl Component {
    /// All components in array order [FX, FY, FZ, MX, MY, MZ]
    pub const ALL: [Component; 6] = [
        Component::Fx,
        Component::Fy,
        Component::Fz,
        Component::Mx,
        Component::My,
        Component::Mz,
    ];

    /// Position of this component in [`ForceMoment::as_array`]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_force(self) -> bool {
        matches!(self, Component::Fx | Component::Fy | Component::Fz)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Component::Fx => "fx",
            Component::Fy => "fy",
            Component::Fz => "fz",
            Component::Mx => "mx",
            Component::My => "my",
            Component::Mz => "mz",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Forces and moments acting at a point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ForceMoment {
    /// Force in X direction
    #[serde(default)]
    pub fx: f64,
    /// Force in Y direction
    #[serde(default)]
    pub fy: f64,
    /// Force in Z direction
    #[serde(default)]
    pub fz: f64,
    /// Moment about X axis
    #[serde(default)]
    pub mx: f64,
    /// Moment about Y axis
    #[serde(default)]
    pub my: f64,
    /// Moment about Z axis
    #[serde(default)]
    pub mz: f64,
}

impl ForceMoment {
    pub fn new(fx: f64, fy: f64, fz: f64, mx: f64, my: f64, mz: f64) -> Self {
        Self { fx, fy, fz, mx, my, mz }
    }

    /// Create a force-only vector
    pub fn force(fx: f64, fy: f64, fz: f64) -> Self {
        Self::new(fx, fy, fz, 0.0, 0.0, 0.0)
    }

    /// Create a moment-only vector
    pub fn moment(mx: f64, my: f64, mz: f64) -> Self {
        Self::new(0.0, 0.0, 0.0, mx, my, mz)
    }

    /// Get the vector as an array [FX, FY, FZ, MX, MY, MZ]
    pub fn as_array(&self) -> [f64; 6] {
        [self.fx, self.fy, self.fz, self.mx, self.my, self.mz]
    }

    pub fn get(&self, component: Component) -> f64 {
        self.as_array()[component.index()]
    }

    /// Scale all six components by a factor
    pub fn scaled(&self, factor: f64) -> Self {
        self.converted(factor, factor)
    }

    /// Scale the force components and the moment components separately
    pub fn converted(&self, force_factor: f64, moment_factor: f64) -> Self {
        Self {
            fx: self.fx * force_factor,
            fy: self.fy * force_factor,
            fz: self.fz * force_factor,
            mx: self.mx * moment_factor,
            my: self.my * moment_factor,
            mz: self.mz * moment_factor,
        }
    }
}
