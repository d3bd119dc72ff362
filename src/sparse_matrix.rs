//! [`SparseMatrix`] is a sparse two-dimensional matrix backed by an [`OpenTable`].

use super::OpenTable;
use thiserror::Error;

/// Sparse two-dimensional `f32` matrix.
///
/// [`SparseMatrix`] stores only its non-zero cells, keyed by the coordinate pair
/// packed into a single `u64`. A zero write removes the underlying cell, so the
/// backing [`OpenTable`] never holds a zero-valued entry and its length is exactly
/// the number of non-zero cells.
///
/// Coordinate validation happens at this boundary: out-of-range positions and
/// incompatible operand dimensions are reported as [`Error`] values and never reach
/// the table underneath.
///
/// ## Examples
///
/// ```
/// use primetable::SparseMatrix;
///
/// let mut matrix = SparseMatrix::new(1000, 1000).unwrap();
///
/// matrix.put(1, 2, 1.5).unwrap();
/// assert_eq!(matrix.get(1, 2), Ok(1.5));
/// assert_eq!(matrix.get(2, 1), Ok(0.0));
/// assert_eq!(matrix.non_zero_len(), 1);
///
/// matrix.put(1, 2, 0.0).unwrap();
/// assert_eq!(matrix.non_zero_len(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct SparseMatrix {
    rows: u32,
    cols: u32,
    cells: OpenTable<u64, f32>,
}

/// Matrix-boundary failures.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The matrix was constructed with a zero dimension.
    #[error("matrix dimensions must be non-zero")]
    InvalidDimensions,

    /// A cell position lies outside the matrix.
    #[error("position ({row}, {col}) is out of bounds for a {rows}x{cols} matrix")]
    OutOfBounds {
        /// The rejected row.
        row: u32,
        /// The rejected column.
        col: u32,
        /// The number of rows in the matrix.
        rows: u32,
        /// The number of columns in the matrix.
        cols: u32,
    },

    /// The dimensions of two operands do not fit the requested operation.
    #[error("dimensions {left_rows}x{left_cols} and {right_rows}x{right_cols} are incompatible")]
    DimensionMismatch {
        /// Rows of the left operand.
        left_rows: u32,
        /// Columns of the left operand.
        left_cols: u32,
        /// Rows of the right operand.
        right_rows: u32,
        /// Columns of the right operand.
        right_cols: u32,
    },
}

/// Packs a coordinate pair into a single table key.
///
/// [`decode`] is its exact inverse for every `u32` pair.
#[inline]
pub(crate) fn encode(row: u32, col: u32) -> u64 {
    u64::from(row) << 32 | u64::from(col)
}

/// Unpacks a table key into its coordinate pair.
#[inline]
pub(crate) fn decode(key: u64) -> (u32, u32) {
    ((key >> 32) as u32, key as u32)
}

impl SparseMatrix {
    /// Creates an all-zero matrix of the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if either dimension is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::SparseMatrix;
    ///
    /// assert!(SparseMatrix::new(3, 3).is_ok());
    /// assert!(SparseMatrix::new(0, 3).is_err());
    /// ```
    #[inline]
    pub fn new(rows: u32, cols: u32) -> Result<Self, Error> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions);
        }
        Ok(Self {
            rows,
            cols,
            cells: OpenTable::new(),
        })
    }

    /// Returns the number of rows.
    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Returns the number of columns.
    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Returns the number of non-zero cells.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::SparseMatrix;
    ///
    /// let mut matrix = SparseMatrix::new(3, 3).unwrap();
    ///
    /// matrix.put(0, 0, 1.0).unwrap();
    /// matrix.put(1, 1, 2.0).unwrap();
    /// assert_eq!(matrix.non_zero_len(), 2);
    /// ```
    #[inline]
    pub fn non_zero_len(&self) -> usize {
        self.cells.len()
    }

    /// Returns the value of the cell, `0.0` if it is not stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the position lies outside the matrix.
    #[inline]
    pub fn get(&self, row: u32, col: u32) -> Result<f32, Error> {
        self.check_bounds(row, col)?;
        Ok(self.cells.get(&encode(row, col)).copied().unwrap_or(0.0))
    }

    /// Writes the value of the cell.
    ///
    /// Writing `0.0` removes the stored cell, if any, instead of inserting a
    /// zero-valued entry; writing `0.0` to an already-zero cell is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the position lies outside the matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::SparseMatrix;
    ///
    /// let mut matrix = SparseMatrix::new(3, 3).unwrap();
    ///
    /// matrix.put(0, 0, 1.0).unwrap();
    /// matrix.put(0, 0, 0.0).unwrap();
    /// assert_eq!(matrix.non_zero_len(), 0);
    /// assert!(matrix.put(3, 0, 1.0).is_err());
    /// ```
    #[inline]
    pub fn put(&mut self, row: u32, col: u32, value: f32) -> Result<(), Error> {
        self.check_bounds(row, col)?;
        self.cells
            .put(encode(row, col), (value != 0.0).then_some(value));
        Ok(())
    }

    /// Returns the matrix scaled by a factor.
    ///
    /// Cells whose scaled value is zero are not stored, so scaling by `0.0` yields an
    /// empty matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::SparseMatrix;
    ///
    /// let mut matrix = SparseMatrix::new(3, 3).unwrap();
    ///
    /// matrix.put(0, 0, 1.5).unwrap();
    /// let scaled = matrix.scalar(2.0);
    /// assert_eq!(scaled.get(0, 0), Ok(3.0));
    /// assert_eq!(matrix.scalar(0.0).non_zero_len(), 0);
    /// ```
    pub fn scalar(&self, factor: f32) -> SparseMatrix {
        let mut cells = OpenTable::with_capacity(self.cells.len());
        for (&key, &value) in self.cells.iter() {
            let scaled = value * factor;
            if scaled != 0.0 {
                cells.insert(key, scaled);
            }
        }
        SparseMatrix {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }

    /// Returns the element-wise sum of two matrices.
    ///
    /// Cells whose sum cancels to zero are not stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] unless both dimensions match.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::SparseMatrix;
    ///
    /// let mut left = SparseMatrix::new(2, 2).unwrap();
    /// let mut right = SparseMatrix::new(2, 2).unwrap();
    ///
    /// left.put(0, 0, 1.0).unwrap();
    /// right.put(0, 0, 2.0).unwrap();
    /// let sum = left.add(&right).unwrap();
    /// assert_eq!(sum.get(0, 0), Ok(3.0));
    /// ```
    pub fn add(&self, other: &SparseMatrix) -> Result<SparseMatrix, Error> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(self.mismatch(other));
        }

        let mut result = self.clone();
        for (&key, &value) in other.cells.iter() {
            let sum = result.cells.get(&key).copied().unwrap_or(0.0) + value;
            result.cells.put(key, (sum != 0.0).then_some(sum));
        }
        Ok(result)
    }

    /// Returns the matrix product `self * other`.
    ///
    /// The right operand is first indexed by row so that only pairs of non-zero cells
    /// sharing an inner coordinate are ever visited; the cost is proportional to the
    /// number of such pairs, not to the dense dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] unless `self.cols() == other.rows()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::SparseMatrix;
    ///
    /// let mut left = SparseMatrix::new(2, 3).unwrap();
    /// let mut right = SparseMatrix::new(3, 2).unwrap();
    ///
    /// left.put(0, 1, 2.0).unwrap();
    /// right.put(1, 0, 3.0).unwrap();
    /// let product = left.multiply(&right).unwrap();
    /// assert_eq!(product.get(0, 0), Ok(6.0));
    /// ```
    pub fn multiply(&self, other: &SparseMatrix) -> Result<SparseMatrix, Error> {
        if self.cols != other.rows {
            return Err(self.mismatch(other));
        }

        let mut other_rows: OpenTable<u32, Vec<(u32, f32)>> = OpenTable::new();
        for (&key, &value) in other.cells.iter() {
            let (row, col) = decode(key);
            match other_rows.get_mut(&row) {
                Some(cells) => cells.push((col, value)),
                None => {
                    other_rows.insert(row, vec![(col, value)]);
                }
            }
        }

        let mut result = SparseMatrix {
            rows: self.rows,
            cols: other.cols,
            cells: OpenTable::new(),
        };
        for (&key, &value) in self.cells.iter() {
            let (row, inner) = decode(key);
            let Some(cells) = other_rows.get(&inner) else {
                continue;
            };
            for &(col, other_value) in cells {
                let key = encode(row, col);
                let sum = result.cells.get(&key).copied().unwrap_or(0.0) + value * other_value;
                result.cells.put(key, (sum != 0.0).then_some(sum));
            }
        }
        Ok(result)
    }

    /// Returns the values of all non-zero cells, in unspecified order.
    #[inline]
    pub fn non_zero_values(&self) -> Vec<f32> {
        self.cells.iter().map(|(_, &value)| value).collect()
    }

    /// Returns the matrix in dense row-major form.
    ///
    /// Allocates `rows * cols` values; intended for small matrices and tests.
    ///
    /// # Examples
    ///
    /// ```
    /// use primetable::SparseMatrix;
    ///
    /// let mut matrix = SparseMatrix::new(2, 2).unwrap();
    ///
    /// matrix.put(0, 1, 1.0).unwrap();
    /// assert_eq!(matrix.to_dense(), vec![vec![0.0, 1.0], vec![0.0, 0.0]]);
    /// ```
    pub fn to_dense(&self) -> Vec<Vec<f32>> {
        let mut dense = vec![vec![0.0; self.cols as usize]; self.rows as usize];
        for (&key, &value) in self.cells.iter() {
            let (row, col) = decode(key);
            dense[row as usize][col as usize] = value;
        }
        dense
    }

    #[inline]
    fn check_bounds(&self, row: u32, col: u32) -> Result<(), Error> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    #[inline]
    fn mismatch(&self, other: &SparseMatrix) -> Error {
        Error::DimensionMismatch {
            left_rows: self.rows,
            left_cols: self.cols,
            right_rows: other.rows,
            right_cols: other.cols,
        }
    }
}
