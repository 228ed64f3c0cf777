use ndarray::{Array2, ArrayD, Axis, IxDyn, Zip};

use crate::error::{MortalityError, Result};

/// Conventional latitude coordinate name.
pub const LAT: &str = "lat";

/// Conventional longitude coordinate name.
pub const LON: &str = "lon";

/// A named, one-dimensional coordinate labelling one raster axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    name: String,
    values: Vec<f64>,
}

impl Coordinate {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self { name: name.into(), values }
    }

    #[inline] pub fn name(&self) -> &str { &self.name }

    #[inline] pub fn values(&self) -> &[f64] { &self.values }

    #[inline] pub fn len(&self) -> usize { self.values.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// True if the values strictly increase or strictly decrease.
    pub fn is_strictly_monotonic(&self) -> bool {
        let increasing = self.values.windows(2).all(|w| w[0] < w[1]);
        let decreasing = self.values.windows(2).all(|w| w[0] > w[1]);
        increasing || decreasing
    }
}

/// A dense grid of `f64` values with one named coordinate per axis.
///
/// Rasters are immutable once built: every operation returns a new raster.
/// Operations that combine rasters compare coordinates by value and fail
/// with [`MortalityError::ShapeMismatch`] instead of broadcasting.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    coords: Vec<Coordinate>,
    values: ArrayD<f64>,
}

impl Raster {
    /// Construct a raster, checking that every axis has a uniquely named,
    /// finite and strictly monotonic coordinate of matching length.
    pub fn new(coords: Vec<Coordinate>, values: ArrayD<f64>) -> Result<Self> {
        if coords.len() != values.ndim() {
            return Err(MortalityError::shape_mismatch(format!(
                "{} coordinates supplied for a {}-dimensional array",
                coords.len(),
                values.ndim()
            )));
        }
        for (axis, coord) in coords.iter().enumerate() {
            if coord.len() != values.len_of(Axis(axis)) {
                return Err(MortalityError::shape_mismatch(format!(
                    "coordinate `{}` has {} values but axis {axis} has length {}",
                    coord.name(),
                    coord.len(),
                    values.len_of(Axis(axis))
                )));
            }
            if let Some(bad) = coord.values().iter().find(|v| !v.is_finite()) {
                return Err(MortalityError::configuration(format!(
                    "coordinate `{}` contains non-finite value {bad}",
                    coord.name()
                )));
            }
            if !coord.is_strictly_monotonic() {
                return Err(MortalityError::configuration(format!(
                    "coordinate `{}` is not strictly monotonic",
                    coord.name()
                )));
            }
            if coords[..axis].iter().any(|other| other.name() == coord.name()) {
                return Err(MortalityError::configuration(format!(
                    "coordinate `{}` appears more than once",
                    coord.name()
                )));
            }
        }
        Ok(Self { coords, values })
    }

    /// Construct a 2-D raster indexed by (`lat`, `lon`).
    pub fn from_lat_lon(lat: Vec<f64>, lon: Vec<f64>, values: Array2<f64>) -> Result<Self> {
        Self::new(
            vec![Coordinate::new(LAT, lat), Coordinate::new(LON, lon)],
            values.into_dyn(),
        )
    }

    /// Construct a (`lat`, `lon`) raster with every cell set to `value`.
    pub fn filled(lat: Vec<f64>, lon: Vec<f64>, value: f64) -> Result<Self> {
        let values = Array2::from_elem((lat.len(), lon.len()), value);
        Self::from_lat_lon(lat, lon, values)
    }

    #[inline] pub fn coords(&self) -> &[Coordinate] { &self.coords }

    #[inline] pub fn values(&self) -> &ArrayD<f64> { &self.values }

    #[inline] pub fn shape(&self) -> &[usize] { self.values.shape() }

    #[inline] pub fn ndim(&self) -> usize { self.values.ndim() }

    /// Number of cells.
    #[inline] pub fn len(&self) -> usize { self.values.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// Get the axis index of the coordinate called `name`.
    pub fn axis_of(&self, name: &str) -> Option<usize> {
        self.coords.iter().position(|coord| coord.name() == name)
    }

    /// Get the coordinate called `name`.
    pub fn coord(&self, name: &str) -> Option<&Coordinate> {
        self.coords.iter().find(|coord| coord.name() == name)
    }

    /// Value at a multi-dimensional index, if in bounds.
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        self.values.get(IxDyn(index)).copied()
    }

    /// True if both rasters have identical coordinate names and values.
    pub fn same_grid(&self, other: &Raster) -> bool {
        self.coords == other.coords
    }

    /// Fail with a description of the first axis on which the grids differ.
    pub fn ensure_same_grid(&self, other: &Raster, context: &str) -> Result<()> {
        if self.coords.len() != other.coords.len() {
            return Err(MortalityError::shape_mismatch(format!(
                "{context}: {} axes vs {} axes",
                self.coords.len(),
                other.coords.len()
            )));
        }
        for (a, b) in self.coords.iter().zip(&other.coords) {
            if a.name() != b.name() {
                return Err(MortalityError::shape_mismatch(format!(
                    "{context}: axis `{}` vs axis `{}`",
                    a.name(),
                    b.name()
                )));
            }
            if a.len() != b.len() {
                return Err(MortalityError::shape_mismatch(format!(
                    "{context}: `{}` has {} values vs {}",
                    a.name(),
                    a.len(),
                    b.len()
                )));
            }
            if let Some(i) = a.values().iter().zip(b.values()).position(|(x, y)| x != y) {
                return Err(MortalityError::shape_mismatch(format!(
                    "{context}: `{}`[{i}] is {} vs {}",
                    a.name(),
                    a.values()[i],
                    b.values()[i]
                )));
            }
        }
        Ok(())
    }

    /// Build a raster on this grid from a new value array of the same shape.
    pub(crate) fn with_values(&self, values: ArrayD<f64>) -> Result<Self> {
        Self::new(self.coords.clone(), values)
    }

    /// Replace one coordinate and permute the data along its axis.
    pub(crate) fn reindexed(&self, axis: usize, coord: Coordinate, order: &[usize]) -> Self {
        let mut coords = self.coords.clone();
        coords[axis] = coord;
        Self { coords, values: self.values.select(Axis(axis), order) }
    }

    /// Cell-wise `self - other`. NaN propagates.
    pub fn difference(&self, other: &Raster) -> Result<Raster> {
        self.ensure_same_grid(other, "difference")?;
        let values = Zip::from(&self.values)
            .and(&other.values)
            .par_map_collect(|&a, &b| a - b);
        self.with_values(values)
    }

    /// Apply `f` to every cell, keeping the grid.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Raster {
        Self { coords: self.coords.clone(), values: self.values.mapv(f) }
    }

    /// Multiply every cell by `factor`.
    pub fn scale(&self, factor: f64) -> Raster {
        self.map(|v| v * factor)
    }

    /// Sum of all non-NaN cells.
    pub fn sum(&self) -> f64 {
        self.values.iter().filter(|v| !v.is_nan()).sum()
    }
}
