//! Balanced load generation
//!
//! Produces load cases whose point loads are in static equilibrium about the
//! origin. Components with a user range are sampled uniformly within it; the
//! remaining components are solved for with the minimum-norm least squares
//! solution of the equilibrium equations.
//!
//! ## Units
//!
//! Interface positions are conventionally given in millimetres and moment
//! ranges in N·mm. The equilibrium matrix uses positions as given with no
//! length scaling, while the generated load set declares N / Nm. Keep
//! positions and moment ranges in a consistent length unit; the declared
//! moment unit is not rescaled.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{LoadsError, LoadsResult};
use crate::loads::{Component, ForceMoment, LoadCase, LoadSet, PointLoad};
use crate::math::{self, Mat, Vec as Vector};
use crate::units::{ForceUnit, Units};

/// Residual below which a case counts as balanced
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Unknowns per interface: Fx, Fy, Fz, Mx, My, Mz
const DOF: usize = 6;

/// A structural attachment point taking part in the equilibrium
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    pub position: [f64; 3],
}

impl Interface {
    pub fn new(name: &str, x: f64, y: f64, z: f64) -> Self {
        Self {
            name: name.to_string(),
            position: [x, y, z],
        }
    }
}

/// Interface name -> component -> (min, max)
pub type LoadRanges = HashMap<String, HashMap<Component, (f64, f64)>>;

/// Generator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Number of load cases to generate
    pub num_cases: usize,
    /// Seed for reproducible output (None = seeded from the OS)
    pub seed: Option<u64>,
    /// Load set name (None = "Balanced LoadSet")
    pub name: Option<String>,
    /// Load set description (None = "Generated {n} balanced load cases")
    pub description: Option<String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            num_cases: 50,
            seed: None,
            name: None,
            description: None,
        }
    }
}

impl GeneratorOptions {
    /// Set the number of cases
    pub fn with_num_cases(mut self, num_cases: usize) -> Self {
        self.num_cases = num_cases;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Residual force and moment sums of a candidate solution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumCheck {
    pub sum_fx: f64,
    pub sum_fy: f64,
    pub sum_fz: f64,
    pub sum_mx: f64,
    pub sum_my: f64,
    pub sum_mz: f64,
    pub is_balanced: bool,
}

/// Static equilibrium equations of a set of interfaces.
///
/// The matrix is 6 x 6N. Columns `6i..6i+6` hold interface `i`'s
/// `[Fx, Fy, Fz, Mx, My, Mz]`; rows are the force sums followed by the moment
/// sums about the origin.
#[derive(Debug, Clone)]
pub struct EquilibriumSystem {
    names: Vec<String>,
    matrix: Mat,
}

impl EquilibriumSystem {
    pub fn new(interfaces: &[Interface]) -> Self {
        let mut matrix = Mat::zeros(DOF, DOF * interfaces.len());

        for (i, interface) in interfaces.iter().enumerate() {
            let [x, y, z] = interface.position;
            let col = DOF * i;

            // Force sums
            matrix[(0, col)] = 1.0;
            matrix[(1, col + 1)] = 1.0;
            matrix[(2, col + 2)] = 1.0;

            // Mx + y*Fz - z*Fy
            matrix[(3, col + 1)] = -z;
            matrix[(3, col + 2)] = y;
            matrix[(3, col + 3)] = 1.0;

            // My + z*Fx - x*Fz
            matrix[(4, col)] = z;
            matrix[(4, col + 2)] = -x;
            matrix[(4, col + 4)] = 1.0;

            // Mz + x*Fy - y*Fx
            matrix[(5, col)] = -y;
            matrix[(5, col + 1)] = x;
            matrix[(5, col + 5)] = 1.0;
        }

        Self {
            names: interfaces.iter().map(|i| i.name.clone()).collect(),
            matrix,
        }
    }

    pub fn matrix(&self) -> &Mat {
        &self.matrix
    }

    /// Number of unknowns (6 per interface)
    pub fn num_variables(&self) -> usize {
        self.matrix.ncols()
    }

    /// Check `A * x` against `tolerance`
    pub fn verify(&self, x: &Vector, tolerance: f64) -> EquilibriumCheck {
        let r = &self.matrix * x;
        EquilibriumCheck {
            sum_fx: r[0],
            sum_fy: r[1],
            sum_fz: r[2],
            sum_mx: r[3],
            sum_my: r[4],
            sum_mz: r[5],
            is_balanced: r.iter().all(|v| v.abs() < tolerance),
        }
    }

    /// Unknown vector of a load case, matching point loads to interfaces by
    /// name. Interfaces without a point load contribute zeros.
    pub fn case_vector(&self, load_case: &LoadCase) -> Vector {
        let mut x = Vector::zeros(self.num_variables());
        for (i, name) in self.names.iter().enumerate() {
            let found = load_case
                .point_loads()
                .iter()
                .find(|pl| pl.name() == Some(name.as_str()));
            if let Some(point_load) = found {
                for (j, value) in point_load.force_moment().as_array().into_iter().enumerate() {
                    x[DOF * i + j] = value;
                }
            }
        }
        x
    }

    /// Verify a load case, see [`EquilibriumSystem::case_vector`]
    pub fn verify_load_case(&self, load_case: &LoadCase, tolerance: f64) -> EquilibriumCheck {
        self.verify(&self.case_vector(load_case), tolerance)
    }
}

/// Split of the unknowns into sampled and solved ones, by global index
#[derive(Debug)]
struct Partition {
    constrained: Vec<usize>,
    free: Vec<usize>,
    bounds: Vec<(f64, f64)>,
}

fn validate(interfaces: &[Interface], ranges: &LoadRanges) -> LoadsResult<()> {
    if interfaces.is_empty() {
        return Err(LoadsError::InvalidInput("at least one interface is required".to_string()));
    }

    let mut names = HashSet::new();
    for interface in interfaces {
        if !names.insert(interface.name.as_str()) {
            return Err(LoadsError::InvalidInput(format!(
                "duplicate interface name '{}'",
                interface.name
            )));
        }
        if interface.position.iter().any(|c| !c.is_finite()) {
            return Err(LoadsError::InvalidInput(format!(
                "interface '{}' has a non-finite position",
                interface.name
            )));
        }
    }

    for (name, components) in ranges {
        if !names.contains(name.as_str()) {
            return Err(LoadsError::InvalidInput(format!(
                "load range given for unknown interface '{name}'"
            )));
        }
        for (component, &(min, max)) in components {
            if !min.is_finite() || !max.is_finite() {
                return Err(LoadsError::InvalidInput(format!(
                    "range {name}.{component} has a non-finite bound"
                )));
            }
            if min > max {
                return Err(LoadsError::InvalidInput(format!(
                    "range {name}.{component} has min {min} greater than max {max}"
                )));
            }
            if !(max - min).is_finite() {
                return Err(LoadsError::InvalidInput(format!(
                    "range {name}.{component} is too wide to sample"
                )));
            }
        }
    }

    Ok(())
}

fn partition(interfaces: &[Interface], ranges: &LoadRanges) -> Partition {
    let mut constrained = Vec::new();
    let mut free = Vec::new();
    let mut bounds = Vec::new();

    for (i, interface) in interfaces.iter().enumerate() {
        let components = ranges.get(&interface.name);
        for component in Component::ALL {
            let global = DOF * i + component.index();
            match components.and_then(|c| c.get(&component)) {
                Some(&range) => {
                    constrained.push(global);
                    bounds.push(range);
                }
                None => free.push(global),
            }
        }
    }

    Partition {
        constrained,
        free,
        bounds,
    }
}

/// Draw one value per constrained unknown, in global index order
fn sample<R: Rng>(partition: &Partition, rng: &mut R) -> Vector {
    Vector::from_iterator(
        partition.bounds.len(),
        partition
            .bounds
            .iter()
            .map(|&(min, max)| rng.random_range(min..=max)),
    )
}

/// Full unknown vector for one case given the sampled values
fn solve_for_balance(system: &EquilibriumSystem, partition: &Partition, sampled: &Vector) -> LoadsResult<Vector> {
    let n = system.num_variables();

    if partition.constrained.is_empty() {
        return Ok(Vector::zeros(n));
    }

    let mut x = Vector::zeros(n);
    for (k, &global) in partition.constrained.iter().enumerate() {
        x[global] = sampled[k];
    }

    if partition.free.is_empty() {
        let check = system.verify(&x, DEFAULT_TOLERANCE);
        if !check.is_balanced {
            log::warn!(
                "Every component is constrained and the sampled case is not balanced: {:?}",
                check
            );
        }
        return Ok(x);
    }

    let a_constrained = system.matrix().select_columns(&partition.constrained);
    let a_free = system.matrix().select_columns(&partition.free);
    let rhs = -(a_constrained * sampled);
    let solved = math::min_norm_solve(&a_free, &rhs)?;

    for (k, &global) in partition.free.iter().enumerate() {
        x[global] = solved[k];
    }
    Ok(x)
}

fn build_load_case(index: usize, interfaces: &[Interface], x: &Vector) -> LoadCase {
    let point_loads = interfaces
        .iter()
        .enumerate()
        .map(|(i, interface)| {
            let base = DOF * i;
            let fm = ForceMoment::new(
                x[base],
                x[base + 1],
                x[base + 2],
                x[base + 3],
                x[base + 4],
                x[base + 5],
            );
            PointLoad::new(&interface.name, fm)
        })
        .collect();

    LoadCase::new(&format!("Case_{index:03}"), point_loads)
        .with_description(&format!("Balanced load case {index}"))
}

/// Generate balanced load cases drawing samples from `rng`
pub fn generate_balanced_loadset_with_rng<R: Rng>(
    interfaces: &[Interface],
    ranges: &LoadRanges,
    options: &GeneratorOptions,
    rng: &mut R,
) -> LoadsResult<LoadSet> {
    validate(interfaces, ranges)?;

    let system = EquilibriumSystem::new(interfaces);
    let partition = partition(interfaces, ranges);
    log::debug!(
        "Generating {} cases over {} interfaces ({} constrained, {} free unknowns)",
        options.num_cases,
        interfaces.len(),
        partition.constrained.len(),
        partition.free.len()
    );

    let mut load_cases = Vec::with_capacity(options.num_cases);
    for index in 1..=options.num_cases {
        let sampled = sample(&partition, rng);
        let x = solve_for_balance(&system, &partition, &sampled)?;
        load_cases.push(build_load_case(index, interfaces, &x));
    }

    let name = options.name.as_deref().unwrap_or("Balanced LoadSet");
    let description = options
        .description
        .clone()
        .unwrap_or_else(|| format!("Generated {} balanced load cases", options.num_cases));

    Ok(LoadSet::new(name, 1, Units::new(ForceUnit::N), load_cases).with_description(&description))
}

/// Generate balanced load cases, seeding from `options.seed` when given
pub fn generate_balanced_loadset(
    interfaces: &[Interface],
    ranges: &LoadRanges,
    options: &GeneratorOptions,
) -> LoadsResult<LoadSet> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    generate_balanced_loadset_with_rng(interfaces, ranges, options, &mut rng)
}
