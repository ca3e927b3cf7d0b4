//! Loadset - structural load data processing
//!
//! This library works with forces and moments applied at named structural
//! attachment points, grouped into load cases and load sets:
//! - Unit conversion (N, kN, lbf, klbf) and scaling
//! - Extreme values per point and component, and load-case envelopes
//! - Comparison of two load sets
//! - ANSYS load file export
//! - Generation of statically balanced load cases
//!
//! ## Example
//! ```rust,no_run
//! use loadset::prelude::*;
//!
//! let loadset = LoadSet::read_json("loads.json")?;
//!
//! // Convert to kN and apply a 1.5 safety factor
//! let design = loadset.convert_to(ForceUnit::KN).factor(1.5);
//!
//! // Keep only the load cases holding an extreme value
//! let envelope = design.envelope()?;
//! envelope.to_ansys("ansys_out", "design")?;
//! # Ok::<(), loadset::error::LoadsError>(())
//! ```

pub mod ansys;
pub mod balance;
pub mod compare;
pub mod error;
pub mod extremes;
pub mod loads;
pub mod math;
pub mod session;
pub mod units;

// Re-export common types
pub mod prelude {
    pub use crate::ansys::AnsysExporter;
    pub use crate::balance::{
        generate_balanced_loadset, generate_balanced_loadset_with_rng, EquilibriumCheck,
        EquilibriumSystem, GeneratorOptions, Interface, LoadRanges,
    };
    pub use crate::compare::{ComparisonRow, ComparisonSummary, ExtremeType, LoadSetCompare};
    pub use crate::error::{LoadsError, LoadsResult};
    pub use crate::extremes::{ComponentExtremes, ExtremeValue, PointExtremes};
    pub use crate::loads::{Component, ForceMoment, LoadCase, LoadSet, PointLoad};
    pub use crate::session::Session;
    pub use crate::units::{ForceUnit, MomentUnit, Units};
}
