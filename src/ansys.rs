//! ANSYS load file export
//!
//! Each load case becomes one APDL command file that applies the case's
//! forces and moments to pilot-node components named `pilot_{point}`.
//! Downstream tooling parses these files, so the text layout is fixed.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{LoadsError, LoadsResult};
use crate::loads::{Component, LoadCase, LoadSet};

static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\-]").expect("valid regex"));
static UNDERSCORE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").expect("valid regex"));

/// Component order used in the command files
const ANSYS_ORDER: [Component; 6] = [
    Component::Fx,
    Component::Fy,
    Component::Mx,
    Component::My,
    Component::Mz,
    Component::Fz,
];

pub struct AnsysExporter;

impl AnsysExporter {
    pub fn new() -> Self {
        Self
    }

    /// Make a name safe for use in a file name.
    ///
    /// Anything but word characters and `-` becomes `_`, runs of `_` collapse
    /// and leading/trailing `_` are dropped.
    pub fn sanitize_filename(name: &str) -> String {
        let replaced = UNSAFE_CHARS.replace_all(name, "_");
        let collapsed = UNDERSCORE_RUNS.replace_all(&replaced, "_");
        collapsed.trim_matches('_').to_string()
    }

    /// C-style `%.3e`: `1.000e+03`, `-2.500e-01`
    pub fn format_value(value: f64) -> String {
        if value.is_nan() {
            return "nan".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "inf" } else { "-inf" }.to_string();
        }

        let rust_style = format!("{:.3e}", value);
        match rust_style.split_once('e') {
            Some((mantissa, exponent)) => {
                let exponent: i32 = exponent.parse().unwrap_or(0);
                let sign = if exponent < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exponent.abs())
            }
            None => rust_style,
        }
    }

    /// File name for a load case: `{stem}_{sanitized case name}.inp`
    pub fn file_name(name_stem: &str, load_case: &LoadCase) -> String {
        let case_token = Self::sanitize_filename(load_case.name().unwrap_or("unnamed"));
        format!("{name_stem}_{case_token}.inp")
    }

    /// Generate the command file text for one load case
    pub fn load_case_deck(&self, load_case: &LoadCase) -> String {
        let mut lines: Vec<String> = vec![
            format!("/TITLE,{}", load_case.name().unwrap_or("Unnamed")),
            "nsel,u,,,all".to_string(),
            String::new(),
        ];

        for point_load in load_case.point_loads() {
            let pilot = format!("pilot_{}", point_load.name().unwrap_or("UnnamedNode"));
            let fm = point_load.force_moment();

            for component in ANSYS_ORDER {
                let value = fm.get(component);
                if value != 0.0 {
                    lines.push(format!("cmsel,s,{pilot}"));
                    lines.push(format!("f,all,{component},{}", Self::format_value(value)));
                    lines.push("nsel,u,,,all".to_string());
                    lines.push(String::new());
                }
            }
        }

        lines.push(String::new());
        lines.push("alls".to_string());
        lines.join("\n")
    }

    /// Write one file per load case into `folder`.
    ///
    /// The folder is created when missing; regular files already in it are
    /// removed first. Returns the written paths in load-case order.
    pub fn export(&self, loadset: &LoadSet, folder: &Path, name_stem: &str) -> LoadsResult<Vec<PathBuf>> {
        if folder.exists() && !folder.is_dir() {
            return Err(LoadsError::NotADirectory(folder.to_path_buf()));
        }
        fs::create_dir_all(folder)?;

        for entry in fs::read_dir(folder)? {
            let path = entry?.path();
            if path.is_file() {
                fs::remove_file(&path)?;
            }
        }

        let mut written = Vec::with_capacity(loadset.load_cases().len());
        let mut seen = HashSet::new();
        for load_case in loadset.load_cases() {
            let file_name = Self::file_name(name_stem, load_case);
            if !seen.insert(file_name.clone()) {
                log::warn!("Load case {:?} overwrites {}", load_case.name(), file_name);
            }
            let path = folder.join(&file_name);
            fs::write(&path, self.load_case_deck(load_case))?;
            written.push(path);
        }

        log::info!("Wrote {} ANSYS load files to {}", written.len(), folder.display());
        Ok(written)
    }
}

impl Default for AnsysExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadSet {
    /// Export to ANSYS load files, see [`AnsysExporter::export`]
    pub fn to_ansys(&self, folder: impl AsRef<Path>, name_stem: &str) -> LoadsResult<Vec<PathBuf>> {
        AnsysExporter::new().export(self, folder.as_ref(), name_stem)
    }
}
