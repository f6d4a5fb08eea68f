//! Multilinear interpolation on a rectilinear grid
//!
//! Outside the grid, the interpolant is extended linearly with the gradient
//! of the boundary cell on every axis, the same convention as
//! `RegularGridInterpolator(method="linear", fill_value=None)`.

use ndarray::ArrayD;

use crate::error::{Error, Result};

/// A strictly increasing sequence of grid nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    name: String,
    nodes: Vec<f64>,
}
impl Axis {
    /// Creates a named axis, checking that it holds at least 2 finite and strictly increasing nodes
    pub fn new<S: Into<String>>(name: S, nodes: Vec<f64>) -> Result<Self> {
        let name = name.into();
        if nodes.len() < 2 {
            return Err(Error::InvalidAxis {
                name,
                reason: format!("{} node(s), at least 2 are required", nodes.len()),
            });
        }
        if let Some(x) = nodes.iter().find(|x| !x.is_finite()) {
            return Err(Error::InvalidAxis {
                name,
                reason: format!("non finite node {x}"),
            });
        }
        if let Some(i) = nodes.windows(2).position(|w| w[1] <= w[0]) {
            return Err(Error::InvalidAxis {
                name,
                reason: format!(
                    "nodes are not strictly increasing at index {}: {} <= {}",
                    i + 1,
                    nodes[i + 1],
                    nodes[i]
                ),
            });
        }
        Ok(Self { name, nodes })
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }
    fn len(&self) -> usize {
        self.nodes.len()
    }
    /// Returns the index of the lower node of the cell used for `x`
    /// and the normalized coordinate of `x` in that cell
    ///
    /// The normalized coordinate is within [0,1] inside the grid, below 0
    /// before the first node and above 1 past the last one.
    fn locate(&self, x: f64) -> (usize, f64) {
        let n = self.nodes.len();
        let i = self
            .nodes
            .partition_point(|&node| node < x)
            .saturating_sub(1)
            .min(n - 2);
        let (x0, x1) = (self.nodes[i], self.nodes[i + 1]);
        (i, (x - x0) / (x1 - x0))
    }
}

/// Multilinear interpolant of a table sampled on a rectilinear grid
#[derive(Debug, Clone)]
pub struct RegularGrid {
    axes: Vec<Axis>,
    values: ArrayD<f64>,
}
impl RegularGrid {
    /// Creates the interpolant of `values` sampled at the nodes of `axes`
    ///
    /// The shape of `values` must be the lengths of `axes`, in order.
    pub fn new<S: Into<String>>(name: S, axes: Vec<Axis>, values: ArrayD<f64>) -> Result<Self> {
        let expected: Vec<usize> = axes.iter().map(Axis::len).collect();
        if values.shape() != expected.as_slice() {
            return Err(Error::TableShape {
                name: name.into(),
                expected,
                found: values.shape().to_vec(),
            });
        }
        Ok(Self { axes, values })
    }
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }
    /// Number of grid dimensions
    pub fn ndim(&self) -> usize {
        self.axes.len()
    }
    /// Interpolates the table at `point`, one coordinate per axis
    pub fn eval(&self, point: &[f64]) -> Result<f64> {
        let ndim = self.ndim();
        if point.len() != ndim {
            return Err(Error::Dimension {
                expected: ndim,
                found: point.len(),
            });
        }
        let cell: Vec<(usize, f64)> = self
            .axes
            .iter()
            .zip(point)
            .map(|(axis, &x)| axis.locate(x))
            .collect();
        // sum over the 2^ndim corners of the cell
        let mut index = vec![0usize; ndim];
        let mut value = 0f64;
        for corner in 0..1usize << ndim {
            let mut weight = 1f64;
            for (k, &(i, t)) in cell.iter().enumerate() {
                if corner >> k & 1 == 1 {
                    index[k] = i + 1;
                    weight *= t;
                } else {
                    index[k] = i;
                    weight *= 1. - t;
                }
            }
            value += weight * self.values[index.as_slice()];
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, IxDyn};
    use std::error::Error;

    fn grid(axes: &[&[f64]], f: impl Fn(&[f64]) -> f64) -> RegularGrid {
        let axes: Vec<Axis> = axes
            .iter()
            .enumerate()
            .map(|(i, nodes)| Axis::new(format!("x{i}"), nodes.to_vec()).unwrap())
            .collect();
        let shape: Vec<usize> = axes.iter().map(Axis::len).collect();
        let values = Array::from_shape_fn(IxDyn(&shape), |idx| {
            let x: Vec<f64> = (0..shape.len())
                .map(|k| axes[k].nodes()[idx[k]])
                .collect();
            f(&x)
        });
        RegularGrid::new("f", axes, values).unwrap()
    }

    #[test]
    fn axis_validation() {
        assert!(Axis::new("a", vec![0., 1., 2.]).is_ok());
        assert!(matches!(
            Axis::new("a", vec![0.]),
            Err(crate::Error::InvalidAxis { .. })
        ));
        assert!(matches!(
            Axis::new("a", vec![0., 1., 1.]),
            Err(crate::Error::InvalidAxis { .. })
        ));
        assert!(matches!(
            Axis::new("a", vec![0., 2., 1.]),
            Err(crate::Error::InvalidAxis { .. })
        ));
        assert!(matches!(
            Axis::new("a", vec![0., f64::NAN]),
            Err(crate::Error::InvalidAxis { .. })
        ));
    }

    #[test]
    fn table_shape() -> std::result::Result<(), Box<dyn Error>> {
        let axes = vec![
            Axis::new("x", vec![0., 1., 2.])?,
            Axis::new("y", vec![0., 1.])?,
        ];
        let values = ArrayD::zeros(IxDyn(&[2, 3]));
        assert!(matches!(
            RegularGrid::new("f", axes, values),
            Err(crate::Error::TableShape { .. })
        ));
        Ok(())
    }

    #[test]
    fn nodes() -> std::result::Result<(), Box<dyn Error>> {
        let g = grid(&[&[0., 0.5, 2.], &[-1., 3., 4., 10.]], |x| {
            (x[0] * 3.).sin() + x[1].powi(2)
        });
        for &x in &[0., 0.5, 2.] {
            for &y in &[-1., 3., 4., 10.] {
                let v = g.eval(&[x, y])?;
                assert!((v - ((x * 3.).sin() + y * y)).abs() < 1e-12);
            }
        }
        Ok(())
    }

    #[test]
    fn bilinear_cell() -> std::result::Result<(), Box<dyn Error>> {
        let g = grid(&[&[0., 1.], &[0., 1.]], |x| {
            [[1., 2.], [3., 5.]][x[0] as usize][x[1] as usize]
        });
        // center of the cell is the average of the corners
        assert!((g.eval(&[0.5, 0.5])? - 2.75).abs() < 1e-12);
        assert!((g.eval(&[0.25, 0.])? - 1.5).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn multilinear_is_exact() -> std::result::Result<(), Box<dyn Error>> {
        let f = |x: &[f64]| 1. + 2. * x[0] - x[1] + 0.5 * x[0] * x[1] * x[2];
        let g = grid(&[&[0., 1., 3.], &[-2., 0., 5.], &[1., 2.]], f);
        for p in [[0.3, 1.7, 1.2], [2.9, -1.9, 1.99], [1., 0., 1.5]] {
            assert!((g.eval(&p)? - f(&p)).abs() < 1e-12);
        }
        Ok(())
    }

    #[test]
    fn linear_extrapolation() -> std::result::Result<(), Box<dyn Error>> {
        let f = |x: &[f64]| 2. * x[0] + 3. * x[1];
        let g = grid(&[&[0., 1., 2.], &[0., 1.]], f);
        for p in [[-5., 0.5], [10., 0.5], [1.5, -3.], [-2., 7.]] {
            assert!((g.eval(&p)? - f(&p)).abs() < 1e-12);
        }
        // the edge cell gradient is used, not the global one
        let g = grid(&[&[0., 1., 2.]], |x| x[0] * x[0]);
        assert!((g.eval(&[3.])? - 7.).abs() < 1e-12);
        assert!((g.eval(&[-1.])? + 1.).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn dimension() {
        let g = grid(&[&[0., 1.], &[0., 1.]], |x| x[0]);
        assert!(matches!(
            g.eval(&[0.5]),
            Err(crate::Error::Dimension {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn nan_propagates() -> std::result::Result<(), Box<dyn Error>> {
        let g = grid(&[&[0., 1.], &[0., 1.]], |x| x[0] + x[1]);
        assert!(g.eval(&[f64::NAN, 0.5])?.is_nan());
        Ok(())
    }
}
