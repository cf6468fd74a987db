//! Typed row buffers exchanged with the codec.

use crate::error::{GridIoError, Result};
use crate::format::Representation;

/// Reserve an empty vector of `len` elements, failing instead of aborting.
pub(crate) fn try_alloc<T>(len: usize, what: &'static str) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| GridIoError::AllocationFailure { what, len })?;
    Ok(buffer)
}

/// One stored row in its on-disk numeric representation.
///
/// The variant is chosen from the grid's [`Representation`], so the set of
/// supported element types is closed.
#[derive(Debug, Clone, PartialEq)]
pub enum RowBuffer {
    Byte(Vec<i8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

macro_rules! impl_from_vec {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$ty>> for RowBuffer {
                fn from(values: Vec<$ty>) -> Self {
                    Self::$variant(values)
                }
            }
        )*
    };
}

impl_from_vec!(i8 => Byte, i16 => Short, i32 => Int, f32 => Float, f64 => Double);

fn zeroed<T: Clone + Default>(len: usize) -> Result<Vec<T>> {
    let mut values = try_alloc(len, "row buffer")?;
    values.resize(len, T::default());
    Ok(values)
}

fn unrepresentable(value: f64, representation: Representation) -> GridIoError {
    GridIoError::codec(format!(
        "value {} is not representable as {}",
        value, representation
    ))
}

fn cast<T: num_traits::NumCast>(value: f64, representation: Representation) -> Result<T> {
    <T as num_traits::NumCast>::from(value).ok_or_else(|| unrepresentable(value, representation))
}

/// Narrow to `f32`; finite values beyond its range would otherwise become infinite.
fn narrow(value: f64) -> Result<f32> {
    if value.is_finite() && value.abs() > f32::MAX as f64 {
        return Err(unrepresentable(value, Representation::Float));
    }
    Ok(value as f32)
}

impl RowBuffer {
    /// Allocate a zero-filled row of `len` values.
    pub fn try_new(representation: Representation, len: usize) -> Result<Self> {
        Ok(match representation {
            Representation::Byte => Self::Byte(zeroed(len)?),
            Representation::Short => Self::Short(zeroed(len)?),
            Representation::Int => Self::Int(zeroed(len)?),
            Representation::Float => Self::Float(zeroed(len)?),
            Representation::Double => Self::Double(zeroed(len)?),
        })
    }

    /// Allocate a row of `len` copies of `value`.
    pub fn try_filled(representation: Representation, len: usize, value: f64) -> Result<Self> {
        let mut row = Self::try_new(representation, len)?;
        row.fill(value)?;
        Ok(row)
    }

    pub fn representation(&self) -> Representation {
        match self {
            Self::Byte(_) => Representation::Byte,
            Self::Short(_) => Representation::Short,
            Self::Int(_) => Representation::Int,
            Self::Float(_) => Representation::Float,
            Self::Double(_) => Representation::Double,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Byte(v) => v.len(),
            Self::Short(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Double(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `index` widened to `f64`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn get(&self, index: usize) -> f64 {
        match self {
            Self::Byte(v) => <f64 as From<_>>::from(v[index]),
            Self::Short(v) => <f64 as From<_>>::from(v[index]),
            Self::Int(v) => <f64 as From<_>>::from(v[index]),
            Self::Float(v) => <f64 as From<_>>::from(v[index]),
            Self::Double(v) => v[index],
        }
    }

    /// Store `value` at `index`.
    ///
    /// Integer rows require an integral value inside the type's range; float
    /// rows accept NaN and anything within `f32` range.
    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        let representation = self.representation();
        match self {
            Self::Byte(v) => v[index] = cast(value, representation)?,
            Self::Short(v) => v[index] = cast(value, representation)?,
            Self::Int(v) => v[index] = cast(value, representation)?,
            Self::Float(v) => v[index] = narrow(value)?,
            Self::Double(v) => v[index] = value,
        }
        Ok(())
    }

    /// Overwrite every value with `value`.
    pub fn fill(&mut self, value: f64) -> Result<()> {
        let representation = self.representation();
        match self {
            Self::Byte(v) => v.fill(cast(value, representation)?),
            Self::Short(v) => v.fill(cast(value, representation)?),
            Self::Int(v) => v.fill(cast(value, representation)?),
            Self::Float(v) => v.fill(narrow(value)?),
            Self::Double(v) => v.fill(value),
        }
        Ok(())
    }

    /// All values widened to `f64`.
    pub fn to_f64(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.get(i)).collect()
    }
}
