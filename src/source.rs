//! Acceptance table data sources
//!
//! A data source is anything able to hand out numeric arrays by name.
//! Tables generated offline are stored in NumPy `.npz` archives.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, Read, Seek},
    path::Path,
};

use ndarray::{ArrayD, IxDyn, ShapeBuilder};
use npyz::{npz::NpzArchive, DType, NpyFile, Order};

use crate::error::{Error, Result};

/// Named arrays container
pub trait TableSource {
    /// Returns the array `name` or `None` if the source does not have it
    fn array(&mut self, name: &str) -> Result<Option<ArrayD<f64>>>;
    /// Returns the array `name`, failing if the source does not have it
    fn require(&mut self, name: &str) -> Result<ArrayD<f64>> {
        self.array(name)?
            .ok_or_else(|| Error::MissingArray(name.to_string()))
    }
}

impl<R: Read + Seek> TableSource for NpzArchive<R> {
    fn array(&mut self, name: &str) -> Result<Option<ArrayD<f64>>> {
        match self.by_name(name)? {
            Some(npy) => read_npy(name, npy).map(Some),
            None => Ok(None),
        }
    }
}

impl TableSource for BTreeMap<String, ArrayD<f64>> {
    fn array(&mut self, name: &str) -> Result<Option<ArrayD<f64>>> {
        Ok(self.get(name).cloned())
    }
}

/// Opens a `.npz` archive
pub fn open<P: AsRef<Path>>(path: P) -> Result<NpzArchive<BufReader<File>>> {
    Ok(NpzArchive::open(path)?)
}

fn read_npy<R: Read>(name: &str, npy: NpyFile<R>) -> Result<ArrayD<f64>> {
    let shape: Vec<usize> = npy.shape().iter().map(|&n| n as usize).collect();
    let order = npy.order();
    let dtype = match npy.dtype() {
        DType::Plain(type_str) => type_str.to_string(),
        dtype => format!("{dtype:?}"),
    };
    let data: Vec<f64> = if dtype.ends_with("f8") {
        npy.into_vec::<f64>()?
    } else if dtype.ends_with("f4") {
        npy.into_vec::<f32>()?.into_iter().map(f64::from).collect()
    } else {
        return Err(Error::UnsupportedDtype {
            name: name.to_string(),
            dtype,
        });
    };
    let array = match order {
        Order::C => ArrayD::from_shape_vec(IxDyn(&shape), data)?,
        Order::Fortran => ArrayD::from_shape_vec(IxDyn(&shape).f(), data)?,
    };
    Ok(array)
}

/// Writes `data` as the array `name` of a `.npz` archive
#[cfg(test)]
pub(crate) fn write_array<W, T>(
    npz: &mut npyz::npz::NpzWriter<W>,
    name: &str,
    shape: &[usize],
    order: Order,
    data: impl IntoIterator<Item = T>,
) -> std::io::Result<()>
where
    W: std::io::Write + Seek,
    T: npyz::AutoSerialize,
{
    use npyz::WriterBuilder;
    let shape: Vec<u64> = shape.iter().map(|&n| n as u64).collect();
    let mut writer = npz
        .array::<T>(name, Default::default())?
        .default_dtype()
        .shape(&shape)
        .order(order)
        .begin_nd()?;
    writer.extend(data)?;
    writer.finish()
}

/// Writes `arrays` into a `.npz` archive
#[cfg(test)]
pub(crate) fn write_npz<P: AsRef<Path>>(
    path: P,
    arrays: &BTreeMap<String, ArrayD<f64>>,
) -> std::io::Result<()> {
    let mut npz = npyz::npz::NpzWriter::create(path)?;
    for (name, array) in arrays {
        write_array(&mut npz, name, array.shape(), Order::C, array.iter().copied())?;
    }
    Ok(())
}
