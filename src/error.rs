use crate::profile::Profile;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to read the acceptance table")]
    Io(#[from] std::io::Error),
    #[error("Array `{0}` is missing from the acceptance table")]
    MissingArray(String),
    #[error("Array `{name}` has unsupported dtype {dtype}, expected f8 or f4")]
    UnsupportedDtype { name: String, dtype: String },
    #[error("{profile} table has rank {rank}, expected 2 or 3")]
    UnsupportedRank { profile: Profile, rank: usize },
    #[error("Invalid axis `{name}`: {reason}")]
    InvalidAxis { name: String, reason: String },
    #[error("Table `{name}` has shape {found:?}, expected {expected:?}")]
    TableShape {
        name: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    #[error("`{argument}` has shape {found:?}, expected {expected:?} to match `sigmas`")]
    ShapeMismatch {
        argument: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    #[error("Unknown source profile `{0}`, expected POINT, DISK or BULGE")]
    UnknownProfile(String),
    #[error("Query point has {found} coordinates, the table has {expected} axes")]
    Dimension { expected: usize, found: usize },
    #[error("Failed to shape the acceptance array")]
    Shape(#[from] ndarray::ShapeError),
}
pub type Result<T> = std::result::Result<T, Error>;
