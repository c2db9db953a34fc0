/// Parameter export back to the simulator
///
/// Writes one row's parameters as a text file ToothMaker can re-import, so
/// a researcher can pick an interesting tooth in the viewer and re-run or
/// refine the simulation around it.
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use chrono::Local;

use crate::error::SeekerResult;
use crate::state::library::Library;

/// The sweep parameters ToothMaker's import format accepts, in file order.
/// `uMgr` (and the `faulty` flag) are not part of the format and stay out.
const EXPORT_PARAMS: [&str; 26] = [
    "Egr", "Mgr", "Rep", "Swi", "Adh", "Act", "Inh", "Sec", "Da", "Di", "Ds", "Int", "Set",
    "Boy", "Dff", "Bgr", "Abi", "Pbi", "Lbi", "Bbi", "Rad", "Deg", "Dgr", "Ntr", "Bwi", "Ina",
];

/// Export the parameters of `row_id` to
/// `parameters_exported_to_txt/id-<row>___<db file>___<timestamp>.txt`
/// next to the database. Returns the path written.
pub fn export_row_to_file(library: &Library, row_id: i64) -> SeekerResult<PathBuf> {
    let row = library.row(row_id)?;

    let export_dir = match library.path().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.join("parameters_exported_to_txt")
        }
        _ => PathBuf::from("parameters_exported_to_txt"),
    };
    fs::create_dir_all(&export_dir)?;

    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let db_name = library
        .path()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "database".to_string());
    let output_path = export_dir.join(format!("id-{row_id}___{db_name}___{timestamp}.txt"));

    let mut text = String::new();
    let _ = writeln!(
        text,
        "# Model parameters file generated by ToothSeeker! (in style of ones created by MorphoMaker 0.6.4.)"
    );
    let _ = writeln!(
        text,
        "# NOTE: Parameter names are case-sensitive, while non-parameter keywords"
    );
    let _ = writeln!(text, "# (e.g. model, viewtresh) are case-insensitive!");
    let _ = writeln!(text);
    let _ = writeln!(text, "# Model name, view threshold, view mode, iterations.");
    let _ = writeln!(text, "model=={}", row.params.model);
    let _ = writeln!(text, "viewthresh=={}", row.params.viewthresh);
    let _ = writeln!(text, "viewmode=={}", row.params.viewmode);
    let _ = writeln!(text, "iter=={}", row.params.iter);
    let _ = writeln!(text);
    let _ = writeln!(text, "# Parameters.");
    for name in EXPORT_PARAMS {
        // Every EXPORT_PARAMS entry is a real sweep column, so the lookup
        // cannot miss; fall back to 0 rather than panic if it ever does.
        let value = row.params.sweep_value(name).unwrap_or(0.0);
        let _ = writeln!(text, "{name}=={value}");
    }

    fs::write(&output_path, text)?;

    println!(
        "Parameters of row {row_id} exported to '{}'",
        output_path.display()
    );
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::test_support::sample_params;
    use crate::state::data::NewImage;

    #[test]
    fn test_export_writes_importable_file() {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::create(&dir.path().join("teeth.db"), "images").unwrap();
        let id = library
            .insert_image(&NewImage {
                path: "a.png".to_string(),
                params: sample_params(),
            })
            .unwrap();

        let path = export_row_to_file(&library, id).unwrap();
        assert!(path.starts_with(dir.path().join("parameters_exported_to_txt")));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(&format!("id-{id}___teeth.db___")));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Model parameters file generated by ToothSeeker!"));
        assert!(text.contains("model==tribosphenic_p\n"));
        assert!(text.contains("viewthresh==0.1\n"));
        assert!(text.contains("iter==9000\n"));
        assert!(text.contains("# Parameters.\nEgr==0.02\n"));
        assert!(text.contains("Ina==0\n"));
        // Not part of the ToothMaker import format:
        assert!(!text.contains("uMgr"));
        assert!(!text.contains("faulty"));
    }

    #[test]
    fn test_export_of_missing_row_fails() {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::create(&dir.path().join("teeth.db"), "images").unwrap();
        assert!(export_row_to_file(&library, 42).is_err());
    }
}
