/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the scanner, the database layer and the UI layer.
use std::path::Path;

use rusqlite::types::Value;

use crate::error::{SeekerError, SeekerResult};

/// The sweep parameters, in table-column order. Any of these can serve as
/// the stack axis. `iter` is an integer column, the rest are reals.
pub const SWEEP_PARAMS: [&str; 28] = [
    "iter", "Egr", "Mgr", "Rep", "Swi", "Adh", "Act", "Inh", "Sec", "Da", "Di", "Ds", "Int",
    "Set", "Boy", "Dff", "Bgr", "Abi", "Pbi", "Lbi", "Bbi", "Rad", "Deg", "Dgr", "Ntr", "Bwi",
    "Ina", "uMgr",
];

/// Every column that participates in row identity (and thus in duplicate
/// grouping and neighbor matching): all columns except `id` and `path`.
/// `Set` collides with an SQL keyword, so queries must double-quote names.
pub const MATCH_COLUMNS: [&str; 32] = [
    "model", "viewthresh", "viewmode", "iter", "Egr", "Mgr", "Rep", "Swi", "Adh", "Act", "Inh",
    "Sec", "Da", "Di", "Ds", "Int", "Set", "Boy", "Dff", "Bgr", "Abi", "Pbi", "Lbi", "Bbi",
    "Rad", "Deg", "Dgr", "Ntr", "Bwi", "Ina", "uMgr", "faulty",
];

/// Full display name of a sweep parameter (e.g. `Bbi` -> `Buccal bias`).
pub fn param_full_name(name: &str) -> &'static str {
    match name {
        "iter" => "Iterations",
        "Egr" => "Epithelial proliferation rate",
        "Mgr" => "Mesenchymal proliferation rate",
        "Rep" => "Young's modulus (stiffness)",
        "Swi" => "Distance from 0 where the borders are defined",
        "Adh" => "Traction between neighbours",
        "Act" => "Activator auto-activation",
        "Inh" => "Inhibition of activator",
        "Sec" => "Growth factor secretion rate",
        "Da" => "Activator diffusion rate",
        "Di" => "Inhibitor diffusion rate",
        "Ds" => "Growth factor diffusion rate",
        "Int" => "Initial inhibitor threshold",
        "Set" => "Growth factor threshold",
        "Boy" => "Mesenchyme mechanic resistance",
        "Dff" => "Differentiation rate",
        "Bgr" => "Border growth, amount of mes. in ant.-post.",
        "Abi" => "Anterior bias",
        "Pbi" => "Posterior bias",
        "Lbi" => "Lingual bias",
        "Bbi" => "Buccal bias",
        "Rad" => "Radius of initial conditions",
        "Deg" => "Protein degradation rate",
        "Dgr" => "Downward vector of growth",
        "Ntr" => "Mechanical traction from the borders to the nucleus",
        "Bwi" => "Width of border",
        "Ina" => "Initial activator concentration",
        "uMgr" => "Basal mesenchymal proliferation rate",
        _ => "Unknown parameter",
    }
}

/// One complete set of simulation parameters, as ToothMaker understands them.
///
/// A run's `parameters_base.txt` produces one of these; per-image overrides
/// from `job_parameters.txt` are applied on top with [`ParamSet::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSet {
    // ========== Model & view settings ==========
    pub model: String,
    pub viewthresh: f64,
    pub viewmode: i64,

    // ========== Sweep parameters ==========
    pub iter: i64,
    pub egr: f64,
    pub mgr: f64,
    pub rep: f64,
    pub swi: f64,
    pub adh: f64,
    pub act: f64,
    pub inh: f64,
    pub sec: f64,
    pub da: f64,
    pub di: f64,
    pub ds: f64,
    pub int: f64,
    pub set: f64,
    pub boy: f64,
    pub dff: f64,
    pub bgr: f64,
    pub abi: f64,
    pub pbi: f64,
    pub lbi: f64,
    pub bbi: f64,
    pub rad: f64,
    pub deg: f64,
    pub dgr: f64,
    pub ntr: f64,
    pub bwi: f64,
    pub ina: f64,
    pub umgr: f64,
}

impl ParamSet {
    /// Build a full parameter set from `name==value` pairs read out of a
    /// `parameters_base.txt`. Every key must be present; `file` is only used
    /// for error reporting.
    pub fn from_pairs(file: &Path, pairs: &[(String, String)]) -> SeekerResult<Self> {
        // Last occurrence wins if a key repeats, as in the simulator's own
        // loader.
        let lookup = |name: &str| -> SeekerResult<&str> {
            pairs
                .iter()
                .rev()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
                .ok_or_else(|| SeekerError::MissingParameter {
                    file: file.to_path_buf(),
                    name: name.to_string(),
                })
        };
        let real = |name: &str| -> SeekerResult<f64> {
            let raw = lookup(name)?;
            raw.trim().parse().map_err(|_| SeekerError::BadValue {
                file: file.to_path_buf(),
                name: name.to_string(),
                value: raw.to_string(),
            })
        };
        let integer = |name: &str| -> SeekerResult<i64> {
            let raw = lookup(name)?;
            raw.trim().parse().map_err(|_| SeekerError::BadValue {
                file: file.to_path_buf(),
                name: name.to_string(),
                value: raw.to_string(),
            })
        };

        Ok(ParamSet {
            model: lookup("model")?.trim().to_string(),
            viewthresh: real("viewthresh")?,
            viewmode: integer("viewmode")?,
            iter: integer("iter")?,
            egr: real("Egr")?,
            mgr: real("Mgr")?,
            rep: real("Rep")?,
            swi: real("Swi")?,
            adh: real("Adh")?,
            act: real("Act")?,
            inh: real("Inh")?,
            sec: real("Sec")?,
            da: real("Da")?,
            di: real("Di")?,
            ds: real("Ds")?,
            int: real("Int")?,
            set: real("Set")?,
            boy: real("Boy")?,
            dff: real("Dff")?,
            bgr: real("Bgr")?,
            abi: real("Abi")?,
            pbi: real("Pbi")?,
            lbi: real("Lbi")?,
            bbi: real("Bbi")?,
            rad: real("Rad")?,
            deg: real("Deg")?,
            dgr: real("Dgr")?,
            ntr: real("Ntr")?,
            bwi: real("Bwi")?,
            ina: real("Ina")?,
            umgr: real("uMgr")?,
        })
    }

    /// Apply one per-image override from `job_parameters.txt`.
    ///
    /// Names that are not known parameters are ignored, matching what the
    /// simulator's own exports tolerate. Numeric values must still parse.
    pub fn apply(&mut self, file: &Path, name: &str, raw: &str) -> SeekerResult<()> {
        let bad = || SeekerError::BadValue {
            file: file.to_path_buf(),
            name: name.to_string(),
            value: raw.to_string(),
        };

        if name == "model" {
            self.model = raw.trim().to_string();
            return Ok(());
        }
        if matches!(name, "viewmode" | "iter") {
            let value: i64 = raw.trim().parse().map_err(|_| bad())?;
            match name {
                "viewmode" => self.viewmode = value,
                _ => self.iter = value,
            }
            return Ok(());
        }

        let slot = match name {
            "viewthresh" => &mut self.viewthresh,
            "Egr" => &mut self.egr,
            "Mgr" => &mut self.mgr,
            "Rep" => &mut self.rep,
            "Swi" => &mut self.swi,
            "Adh" => &mut self.adh,
            "Act" => &mut self.act,
            "Inh" => &mut self.inh,
            "Sec" => &mut self.sec,
            "Da" => &mut self.da,
            "Di" => &mut self.di,
            "Ds" => &mut self.ds,
            "Int" => &mut self.int,
            "Set" => &mut self.set,
            "Boy" => &mut self.boy,
            "Dff" => &mut self.dff,
            "Bgr" => &mut self.bgr,
            "Abi" => &mut self.abi,
            "Pbi" => &mut self.pbi,
            "Lbi" => &mut self.lbi,
            "Bbi" => &mut self.bbi,
            "Rad" => &mut self.rad,
            "Deg" => &mut self.deg,
            "Dgr" => &mut self.dgr,
            "Ntr" => &mut self.ntr,
            "Bwi" => &mut self.bwi,
            "Ina" => &mut self.ina,
            "uMgr" => &mut self.umgr,
            _ => return Ok(()),
        };
        *slot = raw.trim().parse().map_err(|_| bad())?;
        Ok(())
    }

    /// The set's identity columns as SQL values, in [`MATCH_COLUMNS`] order.
    /// Used both to bind inserts and the equality side of neighbor queries.
    pub fn sql_values(&self, faulty: bool) -> Vec<Value> {
        vec![
            Value::Text(self.model.clone()),
            Value::Real(self.viewthresh),
            Value::Integer(self.viewmode),
            Value::Integer(self.iter),
            Value::Real(self.egr),
            Value::Real(self.mgr),
            Value::Real(self.rep),
            Value::Real(self.swi),
            Value::Real(self.adh),
            Value::Real(self.act),
            Value::Real(self.inh),
            Value::Real(self.sec),
            Value::Real(self.da),
            Value::Real(self.di),
            Value::Real(self.ds),
            Value::Real(self.int),
            Value::Real(self.set),
            Value::Real(self.boy),
            Value::Real(self.dff),
            Value::Real(self.bgr),
            Value::Real(self.abi),
            Value::Real(self.pbi),
            Value::Real(self.lbi),
            Value::Real(self.bbi),
            Value::Real(self.rad),
            Value::Real(self.deg),
            Value::Real(self.dgr),
            Value::Real(self.ntr),
            Value::Real(self.bwi),
            Value::Real(self.ina),
            Value::Real(self.umgr),
            Value::Integer(faulty as i64),
        ]
    }

    /// Numeric value of a sweep parameter, for sorting stack slices.
    pub fn sweep_value(&self, name: &str) -> Option<f64> {
        let value = match name {
            "iter" => self.iter as f64,
            "Egr" => self.egr,
            "Mgr" => self.mgr,
            "Rep" => self.rep,
            "Swi" => self.swi,
            "Adh" => self.adh,
            "Act" => self.act,
            "Inh" => self.inh,
            "Sec" => self.sec,
            "Da" => self.da,
            "Di" => self.di,
            "Ds" => self.ds,
            "Int" => self.int,
            "Set" => self.set,
            "Boy" => self.boy,
            "Dff" => self.dff,
            "Bgr" => self.bgr,
            "Abi" => self.abi,
            "Pbi" => self.pbi,
            "Lbi" => self.lbi,
            "Bbi" => self.bbi,
            "Rad" => self.rad,
            "Deg" => self.deg,
            "Dgr" => self.dgr,
            "Ntr" => self.ntr,
            "Bwi" => self.bwi,
            "Ina" => self.ina,
            "uMgr" => self.umgr,
            _ => return None,
        };
        Some(value)
    }
}

/// One catalogued screenshot: a database row.
#[derive(Debug, Clone, PartialEq)]
pub struct ToothRow {
    /// Unique database ID
    pub id: i64,
    /// Path to the screenshot PNG, unique across the database
    pub path: String,
    /// The full parameter set this image was rendered with
    pub params: ParamSet,
    /// Manually flagged as a broken render (never set by the scanner)
    pub faulty: bool,
}

impl ToothRow {
    /// Read a row from a `SELECT id, path, <MATCH_COLUMNS...>` result.
    pub fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(ToothRow {
            id: row.get(0)?,
            path: row.get(1)?,
            params: ParamSet {
                model: row.get(2)?,
                viewthresh: row.get(3)?,
                viewmode: row.get(4)?,
                iter: row.get(5)?,
                egr: row.get(6)?,
                mgr: row.get(7)?,
                rep: row.get(8)?,
                swi: row.get(9)?,
                adh: row.get(10)?,
                act: row.get(11)?,
                inh: row.get(12)?,
                sec: row.get(13)?,
                da: row.get(14)?,
                di: row.get(15)?,
                ds: row.get(16)?,
                int: row.get(17)?,
                set: row.get(18)?,
                boy: row.get(19)?,
                dff: row.get(20)?,
                bgr: row.get(21)?,
                abi: row.get(22)?,
                pbi: row.get(23)?,
                lbi: row.get(24)?,
                bbi: row.get(25)?,
                rad: row.get(26)?,
                deg: row.get(27)?,
                dgr: row.get(28)?,
                ntr: row.get(29)?,
                bwi: row.get(30)?,
                ina: row.get(31)?,
                umgr: row.get(32)?,
            },
            faulty: row.get(33)?,
        })
    }

    /// The row's identity columns as SQL values, in [`MATCH_COLUMNS`] order.
    /// Used to bind the equality conditions of the neighbor query.
    pub fn match_values(&self) -> Vec<Value> {
        self.params.sql_values(self.faulty)
    }

    /// Numeric value of a sweep parameter on this row.
    pub fn sweep_value(&self, name: &str) -> SeekerResult<f64> {
        self.params
            .sweep_value(name)
            .ok_or_else(|| SeekerError::UnknownParameter(name.to_string()))
    }
}

/// A freshly scanned screenshot, not yet inserted into the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewImage {
    pub path: String,
    pub params: ParamSet,
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::ParamSet;

    /// A fully populated parameter set for tests. Individual fields are
    /// tweaked per test to create neighbors and duplicates.
    pub fn sample_params() -> ParamSet {
        ParamSet {
            model: "tribosphenic_p".to_string(),
            viewthresh: 0.1,
            viewmode: 0,
            iter: 9000,
            egr: 0.02,
            mgr: 100.0,
            rep: 1.0,
            swi: 0.5,
            adh: 0.001,
            act: 0.1,
            inh: 25.0,
            sec: 0.03,
            da: 0.2,
            di: 0.2,
            ds: 0.1,
            int: 0.1,
            set: 0.95,
            boy: 0.1,
            dff: 0.0002,
            bgr: 1.0,
            abi: 15.0,
            pbi: 2.0,
            lbi: 1.0,
            bbi: 1.0,
            rad: 2.0,
            deg: 0.1,
            dgr: 7500.0,
            ntr: 0.0001,
            bwi: 0.8,
            ina: 0.0,
            umgr: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_apply_overrides_known_parameter() {
        let mut params = test_support::sample_params();
        let file = PathBuf::from("job_parameters.txt");

        params.apply(&file, "Inh", "300").unwrap();
        params.apply(&file, "iter", "12000").unwrap();

        assert_eq!(params.inh, 300.0);
        assert_eq!(params.iter, 12000);
    }

    #[test]
    fn test_apply_ignores_unknown_parameter() {
        let mut params = test_support::sample_params();
        let before = params.clone();

        params
            .apply(&PathBuf::from("job_parameters.txt"), "Xyz", "1.0")
            .unwrap();

        assert_eq!(params, before);
    }

    #[test]
    fn test_apply_rejects_non_numeric_value() {
        let mut params = test_support::sample_params();
        let result = params.apply(&PathBuf::from("job_parameters.txt"), "Egr", "fast");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_pairs_requires_every_key() {
        let pairs = vec![("model".to_string(), "tribosphenic_p".to_string())];
        let result = ParamSet::from_pairs(&PathBuf::from("parameters_base.txt"), &pairs);
        assert!(matches!(
            result,
            Err(crate::error::SeekerError::MissingParameter { .. })
        ));
    }

    #[test]
    fn test_sweep_value_covers_every_sweep_param() {
        let params = test_support::sample_params();
        for name in SWEEP_PARAMS {
            assert!(params.sweep_value(name).is_some(), "missing {name}");
        }
        assert!(params.sweep_value("model").is_none());
    }

    #[test]
    fn test_match_columns_align_with_match_values() {
        let row = ToothRow {
            id: 1,
            path: "exports/run_1/screenshots/ToothMaker_00_0000009000.png".to_string(),
            params: test_support::sample_params(),
            faulty: false,
        };
        assert_eq!(row.match_values().len(), MATCH_COLUMNS.len());
    }
}
