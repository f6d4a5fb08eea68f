use std::{path::Path, time::Instant};

use ndarray::{Array, ArrayBase, ArrayView, Data, Dimension};
use rayon::prelude::*;

use crate::{
    error::{Error, Result},
    grid::{Axis, RegularGrid},
    profile::{Profile, Statistic},
    source::{self, TableSource},
};

/// Mean and RMS interpolants of a source profile
#[derive(Debug, Clone)]
struct Interpolants {
    mean: RegularGrid,
    rms: RegularGrid,
}
impl Interpolants {
    fn load<T: TableSource + ?Sized>(
        source: &mut T,
        profile: Profile,
        axes: &GridAxes,
    ) -> Result<Self> {
        let mean = source.require(profile.mean_tag())?;
        let rms = source.require(profile.rms_tag())?;
        let grid_axes = match mean.ndim() {
            2 => vec![axes.sigma.clone(), axes.offset.clone()],
            3 => vec![
                axes.hlradius.clone(),
                axes.sigma.clone(),
                axes.offset.clone(),
            ],
            rank => return Err(Error::UnsupportedRank { profile, rank }),
        };
        log::debug!(
            "{profile} acceptance table: rank {}, shape {:?}",
            mean.ndim(),
            mean.shape()
        );
        Ok(Self {
            mean: RegularGrid::new(profile.mean_tag(), grid_axes.clone(), mean)?,
            rms: RegularGrid::new(profile.rms_tag(), grid_axes, rms)?,
        })
    }
    fn get(&self, statistic: Statistic) -> &RegularGrid {
        match statistic {
            Statistic::Mean => &self.mean,
            Statistic::Rms => &self.rms,
        }
    }
}

struct GridAxes {
    sigma: Axis,
    offset: Axis,
    hlradius: Axis,
}
impl GridAxes {
    fn load<T: TableSource + ?Sized>(source: &mut T) -> Result<Self> {
        Ok(Self {
            sigma: load_axis(source, "SIGMA")?,
            offset: load_axis(source, "OFFSET")?,
            hlradius: load_axis(source, "HLRAD")?,
        })
    }
}

fn load_axis<T: TableSource + ?Sized>(source: &mut T, name: &str) -> Result<Axis> {
    let nodes = source.require(name)?;
    if nodes.ndim() != 1 {
        return Err(Error::InvalidAxis {
            name: name.to_string(),
            reason: format!("rank {}, expected 1", nodes.ndim()),
        });
    }
    Axis::new(name, nodes.iter().copied().collect())
}

/// Smallest number of query points evaluated on the rayon thread pool
pub const PARALLEL_BATCH_SIZE: usize = 4096;

fn check_shape(argument: &'static str, expected: &[usize], found: &[usize]) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            argument,
            expected: expected.to_vec(),
            found: found.to_vec(),
        })
    }
}

/// Fiber acceptance of point, disk and bulge sources
///
/// The acceptance is interpolated from tables precomputed for a grid of
/// blur `sigma` [um], fiber to source `offset` [um] and, for extended
/// sources, half light radius [arcsec].
/// Point source tables are indexed with (sigma,offset),
/// disk and bulge tables with (hlradius,sigma,offset).
///
/// Queries outside the grid are linearly extrapolated and
/// every acceptance is clamped to [0,1].
#[derive(Debug, Clone)]
pub struct FiberAcceptance {
    point: Interpolants,
    disk: Interpolants,
    bulge: Interpolants,
}
impl FiberAcceptance {
    /// Loads the acceptance tables from a `.npz` archive
    ///
    /// The archive must contain the axes `SIGMA`, `OFFSET` and `HLRAD`,
    /// the mean tables `POINT`, `DISK` and `BULGE` and the RMS tables
    /// `PRMS`, `DRMS` and `BRMS`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading {:?}...", path);
        let now = Instant::now();
        let this = {
            let mut npz = source::open(path)?;
            Self::from_source(&mut npz)?
        };
        log::info!("... loaded in {:}ms", now.elapsed().as_millis());
        Ok(this)
    }
    /// Builds the acceptance tables from named arrays
    pub fn from_source<T: TableSource + ?Sized>(source: &mut T) -> Result<Self> {
        let axes = GridAxes::load(source)?;
        Ok(Self {
            point: Interpolants::load(source, Profile::Point, &axes)?,
            disk: Interpolants::load(source, Profile::Disk, &axes)?,
            bulge: Interpolants::load(source, Profile::Bulge, &axes)?,
        })
    }
    /// Returns the interpolant of the given profile and statistic
    pub fn interpolant(&self, profile: Profile, statistic: Statistic) -> &RegularGrid {
        match profile {
            Profile::Point => self.point.get(statistic),
            Profile::Disk => self.disk.get(statistic),
            Profile::Bulge => self.bulge.get(statistic),
        }
    }
    /// Returns the mean fiber acceptance
    ///
    /// `offsets` and, if given, `hlradii` must have the same shape as `sigmas`
    /// and the acceptance has that shape too.
    /// `hlradii` is ignored for point sources; if it is not given for disk
    /// and bulge sources, 0.45 and 1 arcsec are used, respectively.
    pub fn value<S1, S2, D>(
        &self,
        profile: Profile,
        sigmas: &ArrayBase<S1, D>,
        offsets: &ArrayBase<S2, D>,
        hlradii: Option<ArrayView<'_, f64, D>>,
    ) -> Result<Array<f64, D>>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
        D: Dimension,
    {
        self.evaluate(Statistic::Mean, profile, sigmas, offsets, hlradii)
    }
    /// Returns the RMS of the fiber acceptance
    ///
    /// See [FiberAcceptance::value] for the arguments
    pub fn rms<S1, S2, D>(
        &self,
        profile: Profile,
        sigmas: &ArrayBase<S1, D>,
        offsets: &ArrayBase<S2, D>,
        hlradii: Option<ArrayView<'_, f64, D>>,
    ) -> Result<Array<f64, D>>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
        D: Dimension,
    {
        self.evaluate(Statistic::Rms, profile, sigmas, offsets, hlradii)
    }
    /// Interpolates the `statistic` table of `profile` at every query point
    pub fn evaluate<S1, S2, D>(
        &self,
        statistic: Statistic,
        profile: Profile,
        sigmas: &ArrayBase<S1, D>,
        offsets: &ArrayBase<S2, D>,
        hlradii: Option<ArrayView<'_, f64, D>>,
    ) -> Result<Array<f64, D>>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
        D: Dimension,
    {
        check_shape("offsets", sigmas.shape(), offsets.shape())?;
        if let Some(hlradii) = &hlradii {
            check_shape("hlradii", sigmas.shape(), hlradii.shape())?;
        }
        let arity = profile.arity();
        let mut coordinates = Vec::with_capacity(arity * sigmas.len());
        match (profile.default_hlradius(), hlradii) {
            (None, _) => sigmas
                .iter()
                .zip(offsets)
                .for_each(|(&s, &o)| coordinates.extend([s, o])),
            (Some(_), Some(hlradii)) => hlradii
                .iter()
                .zip(sigmas)
                .zip(offsets)
                .for_each(|((&r, &s), &o)| coordinates.extend([r, s, o])),
            (Some(r), None) => sigmas
                .iter()
                .zip(offsets)
                .for_each(|(&s, &o)| coordinates.extend([r, s, o])),
        }
        let interpolant = self.interpolant(profile, statistic);
        let eval = |point: &[f64]| interpolant.eval(point).map(|v| v.clamp(0., 1.));
        let values = if sigmas.len() < PARALLEL_BATCH_SIZE {
            coordinates
                .chunks(arity)
                .map(eval)
                .collect::<Result<Vec<f64>>>()?
        } else {
            coordinates
                .par_chunks(arity)
                .map(eval)
                .collect::<Result<Vec<f64>>>()?
        };
        Ok(Array::from_shape_vec(sigmas.raw_dim(), values)?)
    }
}
