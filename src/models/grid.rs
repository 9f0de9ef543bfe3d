use crate::error::{Error, Result};

/// Row-major 2D storage addressed by pixel coordinates `(u, v)`
///
/// `u` is the column and `v` the row; element `(u, v)` lives at `v * width + u`.
/// All accessors are bounds-checked and return `None` outside the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    /// Create a grid filled with `T::default()`
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `value`
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Wrap an existing row-major buffer
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        let expected = width * height;
        if data.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Single-row grid holding `data`
    pub fn single_row(data: Vec<T>) -> Self {
        Self {
            width: data.len(),
            height: 1,
            data,
        }
    }

    /// Grid width (columns)
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height (rows)
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Linear offset of `(u, v)`
    pub fn index(&self, u: usize, v: usize) -> Option<usize> {
        if u >= self.width || v >= self.height {
            return None;
        }
        Some(v * self.width + u)
    }

    /// Cell at `(u, v)`
    pub fn at(&self, u: usize, v: usize) -> Option<&T> {
        self.index(u, v).map(|i| &self.data[i])
    }

    /// Mutable cell at `(u, v)`
    pub fn at_mut(&mut self, u: usize, v: usize) -> Option<&mut T> {
        self.index(u, v).map(move |i| &mut self.data[i])
    }

    /// Cell at linear offset `index`
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Cell at linear offset `index`, or `IndexOutOfRange`
    pub fn try_get(&self, index: usize) -> Result<&T> {
        self.data.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.data.len(),
        })
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks_exact(0) panics; an empty grid simply has no rows
        self.data.chunks(self.width.max(1)).take(self.height)
    }

    /// Underlying row-major buffer
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Underlying row-major buffer, mutable
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the grid and return its buffer
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Map every cell with its `(u, v)` coordinates, preserving shape
    pub fn map_indexed<U, F: FnMut(usize, usize, &T) -> U>(&self, mut f: F) -> Grid<U> {
        let width = self.width.max(1);
        Grid {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .enumerate()
                .map(|(i, cell)| f(i % width, i / width, cell))
                .collect(),
        }
    }

    /// Map every cell, preserving shape
    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T: Clone + Default> Default for Grid<T> {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
