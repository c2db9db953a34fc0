/// Parsers for the two ToothMaker parameter file formats
///
/// Every run folder carries a `parameters_base.txt` with the run's default
/// values and a `job_parameters.txt` with per-image overrides. Both are
/// line-oriented text formats produced by the simulator's scan exporter.
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{SeekerError, SeekerResult};
use crate::state::data::ParamSet;

/// Header of one override block: `i:<n> --- <idx tokens>`.
fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^i:\s*(\d+)\s*---\s*(.*)$").unwrap())
}

/// One override inside a block: `par: <name>, val: <value>`.
fn override_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^par:\s*(.+?)\s*,\s*val:\s*(.*)$").unwrap())
}

/// Screenshot name pattern. The index sits between `ToothMaker_` and the
/// last underscore (the trailing run of digits is the frame counter).
fn screenshot_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"ToothMaker_(.*)_").unwrap())
}

/// Read a run's `parameters_base.txt` into a complete [`ParamSet`].
pub fn read_base_params(file: &Path) -> SeekerResult<ParamSet> {
    let text = fs::read_to_string(file)?;
    let pairs = parse_base_pairs(file, &text)?;
    ParamSet::from_pairs(file, &pairs)
}

/// Parse `name==value` lines, keeping file order. Comment (`#`) and blank
/// lines are skipped; anything else without a `==` is malformed.
pub fn parse_base_pairs(file: &Path, text: &str) -> SeekerResult<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((name, value)) = trimmed.split_once("==") else {
            return Err(SeekerError::MalformedLine {
                file: file.to_path_buf(),
                line: index + 1,
                detail: format!("expected `name==value`, got `{trimmed}`"),
            });
        };
        pairs.push((name.trim().to_string(), value.trim().to_string()));
    }
    Ok(pairs)
}

/// Read a run's `job_parameters.txt`: a map from index key (e.g. `00`) to
/// that image's ordered override list.
pub fn read_job_params(file: &Path) -> SeekerResult<HashMap<String, Vec<(String, String)>>> {
    let text = fs::read_to_string(file)?;
    parse_job_params(file, &text)
}

/// Parse the override blocks. Each block starts with an `i:<n> --- <idx>`
/// header; the index key is the token sequence after `---` with whitespace
/// removed (`0 0` -> `00`, `X` placeholders kept). A repeated index key
/// replaces the earlier block, matching the simulator's own exports.
pub fn parse_job_params(
    file: &Path,
    text: &str,
) -> SeekerResult<HashMap<String, Vec<(String, String)>>> {
    let mut jobs: HashMap<String, Vec<(String, String)>> = HashMap::new();
    let mut current: Option<(String, Vec<(String, String)>)> = None;

    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(caps) = header_regex().captures(trimmed) {
            if let Some((key, overrides)) = current.take() {
                jobs.insert(key, overrides);
            }
            let key: String = caps[2].chars().filter(|c| !c.is_whitespace()).collect();
            current = Some((key, Vec::new()));
        } else if let Some(caps) = override_regex().captures(trimmed) {
            let Some((_, overrides)) = current.as_mut() else {
                return Err(SeekerError::MalformedLine {
                    file: file.to_path_buf(),
                    line: index + 1,
                    detail: "override line before any `i:` header".to_string(),
                });
            };
            overrides.push((caps[1].to_string(), caps[2].trim().to_string()));
        } else {
            return Err(SeekerError::MalformedLine {
                file: file.to_path_buf(),
                line: index + 1,
                detail: format!(
                    "expected `i:` header or `par: <name>, val: <value>`, got `{trimmed}`"
                ),
            });
        }
    }
    if let Some((key, overrides)) = current {
        jobs.insert(key, overrides);
    }

    Ok(jobs)
}

/// Extract the index key from a screenshot file name
/// (`ToothMaker_01_0000009000.png` -> `01`).
pub fn screenshot_index(file_name: &str) -> Option<String> {
    screenshot_regex()
        .captures(file_name)
        .map(|caps| caps[1].to_string())
}
