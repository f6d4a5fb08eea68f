//! # Fiber acceptance
//!
//! Fraction of the light of a source falling into a spectrograph fiber,
//! interpolated from tables precomputed for point sources, exponential disks
//! and de Vaucouleurs bulges, as a function of the blur (seeing and
//! telescope optics), of the fiber to source offset and of the half light
//! radius of extended sources.
//!
//! ```no_run
//! use fiber_acceptance::{FiberAcceptance, Profile};
//! use ndarray::array;
//!
//! let fa = FiberAcceptance::from_path("galsim-fiber-acceptance.npz")?;
//! let sigmas = array![30., 45., 60.];
//! let offsets = array![0., 5., 10.];
//! let acceptance = fa.value(Profile::Disk, &sigmas, &offsets, None)?;
//! # Ok::<(), fiber_acceptance::Error>(())
//! ```

pub mod acceptance;
pub mod error;
pub mod grid;
pub mod profile;
pub mod source;

pub use acceptance::FiberAcceptance;
pub use error::{Error, Result};
pub use grid::{Axis, RegularGrid};
pub use profile::{Profile, Statistic};
pub use source::TableSource;
