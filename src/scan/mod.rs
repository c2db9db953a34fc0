/// Export-folder scanning module
///
/// This module handles:
/// - Parsing the two ToothMaker parameter file formats (params.rs)
/// - Walking export folders and assembling database rows (import.rs)

pub mod import;
pub mod params;
