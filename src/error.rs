use std::path::PathBuf;

use thiserror::Error;

pub type SeekerResult<T> = Result<T, SeekerError>;

/// Everything that can go wrong below the GUI layer.
///
/// Library code returns these and propagates with `?`; only the shell
/// turns them into status strings for display.
#[derive(Debug, Error)]
pub enum SeekerError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("database failure: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("csv failure: {0}")]
    Csv(#[from] csv::Error),

    #[error("json failure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database already exists at `{0}` - pick another name")]
    DatabaseExists(PathBuf),

    #[error("database not found at `{0}`")]
    DatabaseMissing(PathBuf),

    #[error("`{0}` is not a valid table name")]
    BadTableName(String),

    #[error("`{0}` is not a sweep parameter")]
    UnknownParameter(String),

    #[error("no row with id {0} in the database")]
    RowNotFound(i64),

    #[error("{file}:{line}: malformed parameter line: {detail}")]
    MalformedLine {
        file: PathBuf,
        line: usize,
        detail: String,
    },

    #[error("{file}: missing required parameter `{name}`")]
    MissingParameter { file: PathBuf, name: String },

    #[error("{file}: parameter `{name}` has non-numeric value `{value}`")]
    BadValue {
        file: PathBuf,
        name: String,
        value: String,
    },

    #[error("screenshot `{0}` does not follow the ToothMaker_<index>_<frame>.png naming")]
    BadScreenshotName(PathBuf),

    #[error("screenshot `{file}` has index `{index}` with no entry in job_parameters.txt")]
    UnknownImageIndex { file: PathBuf, index: String },

    #[error("run folder `{0}` has no screenshots directory")]
    NoScreenshots(PathBuf),
}
