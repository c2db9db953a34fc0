/// Folder scanning and database construction
///
/// A source directory holds one subdirectory per ToothMaker scan run, each
/// with a `screenshots/` folder and the two parameter files. Building a
/// database walks every run folder, assembles one row per screenshot, then
/// removes duplicates and dumps the table to CSV.
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::params::{read_base_params, read_job_params, screenshot_index};
use crate::error::{SeekerError, SeekerResult};
use crate::state::data::NewImage;
use crate::state::library::{DuplicateReport, Library};

/// Summary of a completed database build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub db_path: PathBuf,
    /// Run folders processed
    pub folders: usize,
    /// Rows inserted before duplicate removal
    pub inserted: usize,
    pub duplicates: DuplicateReport,
    /// The space-separated dump of the final table
    pub table_csv: PathBuf,
}

/// Build a brand new database from a directory of ToothMaker export folders.
pub fn build_database(
    source_dir: &Path,
    db_path: &Path,
    table: &str,
) -> SeekerResult<BuildReport> {
    let library = Library::create(db_path, table)?;

    let mut folders = 0;
    let mut inserted = 0;
    for entry in WalkDir::new(source_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let images = scan_run_folder(entry.path())?;
        for image in &images {
            library.insert_image(image)?;
        }
        inserted += images.len();
        folders += 1;
        println!(
            "Processed folder '{}' ({} screenshots)",
            entry.file_name().to_string_lossy(),
            images.len()
        );
    }
    println!("Processed all folders in '{}'", source_dir.display());

    let duplicates = library.remove_duplicates()?;
    if duplicates.removed > 0 {
        println!(
            "🧹 Removed {} duplicate rows in {} groups (audit: '{}')",
            duplicates.removed,
            duplicates.groups,
            duplicates.audit_csv.display()
        );
    }
    let table_csv = library.export_table_csv()?;

    Ok(BuildReport {
        db_path: db_path.to_path_buf(),
        folders,
        inserted,
        duplicates,
        table_csv,
    })
}

/// Scan one run folder into rows, without touching any database.
///
/// Screenshot order is sorted by file name so repeated builds of the same
/// export tree produce identical databases.
pub fn scan_run_folder(folder: &Path) -> SeekerResult<Vec<NewImage>> {
    let screenshots = folder.join("screenshots");
    if !screenshots.is_dir() {
        return Err(SeekerError::NoScreenshots(folder.to_path_buf()));
    }

    let base = read_base_params(&folder.join("parameters_base.txt"))?;
    let job_file = folder.join("job_parameters.txt");
    let jobs = read_job_params(&job_file)?;

    let mut images = Vec::new();
    for entry in WalkDir::new(&screenshots)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.to_ascii_lowercase().ends_with(".png") {
            continue;
        }

        let index = screenshot_index(&name)
            .ok_or_else(|| SeekerError::BadScreenshotName(entry.path().to_path_buf()))?;
        let overrides = jobs
            .get(&index)
            .ok_or_else(|| SeekerError::UnknownImageIndex {
                file: entry.path().to_path_buf(),
                index: index.clone(),
            })?;

        let mut params = base.clone();
        for (name, value) in overrides {
            params.apply(&job_file, name, value)?;
        }
        images.push(NewImage {
            path: entry.path().to_string_lossy().into_owned(),
            params,
        });
    }
    Ok(images)
}
