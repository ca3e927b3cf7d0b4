//! Load data model: force/moment vectors, point loads, load cases and load sets

mod force_moment;
mod load_case;
mod load_set;
mod point_load;

pub use force_moment::{Component, ForceMoment};
pub use load_case::{LoadCase, UNNAMED_CASE};
pub use load_set::{LoadCaseInfo, LoadSet, LoadSetSummary};
pub use point_load::{PointLoad, UNNAMED_POINT};
