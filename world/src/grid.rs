//! Sparse fixed-size storage used for the board.

use std::{iter::Enumerate, mem, slice};

use thiserror::Error;
use tile_trail_core::CellCoord;

/// Fixed `width × height` store where every cell may hold one item.
///
/// Items are kept column by column so iteration visits occupied cells with
/// the column as the outer loop and the row as the inner loop. Searches that
/// break ties by iteration order rely on that ordering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<Option<T>>,
}

impl<T> Grid<T> {
    /// Creates an empty grid with the provided dimensions.
    ///
    /// Dimensions whose cells cannot be allocated collapse to a `0 × 0` grid
    /// that rejects every insertion. Use [`Grid::try_new`] to detect that case.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::try_new(width, height).unwrap_or_else(|_| Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
        })
    }

    /// Creates an empty grid, failing when `width × height` cells do not fit in memory.
    pub fn try_new(width: u32, height: u32) -> Result<Self, GridError> {
        let too_large = GridError::TooLarge { width, height };
        let capacity = usize::try_from(u64::from(width) * u64::from(height))
            .map_err(|_| too_large)?;
        let max_bytes = usize::try_from(isize::MAX).map_err(|_| too_large)?;
        match capacity.checked_mul(mem::size_of::<Option<T>>()) {
            Some(bytes) if bytes <= max_bytes => {}
            _ => return Err(too_large),
        }

        let mut cells = Vec::with_capacity(capacity);
        cells.resize_with(capacity, || None);
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies inside the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Stores `item` at `cell`, returning any item it replaced.
    pub fn set(&mut self, cell: CellCoord, item: T) -> Result<Option<T>, GridError> {
        let index = self.index(cell).ok_or(GridError::OutOfBounds {
            cell,
            width: self.width,
            height: self.height,
        })?;
        let slot = self.cells.get_mut(index).ok_or(GridError::OutOfBounds {
            cell,
            width: self.width,
            height: self.height,
        })?;
        Ok(slot.replace(item))
    }

    /// Item stored at `cell`, if any.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<&T> {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .and_then(Option::as_ref)
    }

    /// Mutable access to the item stored at `cell`, if any.
    pub fn get_mut(&mut self, cell: CellCoord) -> Option<&mut T> {
        let index = self.index(cell)?;
        self.cells.get_mut(index).and_then(Option::as_mut)
    }

    /// Removes and returns the item stored at `cell`, if any.
    pub fn remove(&mut self, cell: CellCoord) -> Option<T> {
        let index = self.index(cell)?;
        self.cells.get_mut(index).and_then(Option::take)
    }

    /// Iterates occupied cells in column-major order.
    #[must_use]
    pub fn iter(&self) -> GridIter<'_, T> {
        GridIter {
            cells: self.cells.iter().enumerate(),
            height: self.height,
        }
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Reports whether no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let height = usize::try_from(self.height).ok()?;
        Some(column * height + row)
    }
}

/// Iterator over the occupied cells of a [`Grid`].
#[derive(Debug)]
pub struct GridIter<'a, T> {
    cells: Enumerate<slice::Iter<'a, Option<T>>>,
    height: u32,
}

impl<'a, T> Iterator for GridIter<'a, T> {
    type Item = (CellCoord, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let height = usize::try_from(self.height).ok()?;
        for (index, slot) in self.cells.by_ref() {
            let Some(item) = slot else {
                continue;
            };
            let column = u32::try_from(index / height).ok()?;
            let row = u32::try_from(index % height).ok()?;
            return Some((CellCoord::new(column, row), item));
        }
        None
    }
}

impl<'a, T> IntoIterator for &'a Grid<T> {
    type Item = (CellCoord, &'a T);
    type IntoIter = GridIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Errors raised when building or filling a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The cell lies outside the grid.
    #[error(
        "failed to insert into grid: ({}, {}) is outside grid boundaries of ({width}, {height})",
        .cell.column(),
        .cell.row()
    )]
    OutOfBounds {
        /// Cell supplied by the caller.
        cell: CellCoord,
        /// Number of columns in the grid.
        width: u32,
        /// Number of rows in the grid.
        height: u32,
    },
    /// The requested dimensions need more cells than can be allocated.
    #[error("grid of {width} x {height} cells is too large to allocate")]
    TooLarge {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
}
