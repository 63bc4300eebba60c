use crate::error::CoreError;

/// Valeur d'une cellule, toujours dans `[0, base)`.
pub type Symbol = u8;

/// Historique de lignes d'un automate 1D. Largeur et hauteur fixées à la création.
///
/// Row-major, la dernière ligne est la génération la plus récente.
///
/// # Example
/// ```
/// use ca_core::grid::Grid;
/// let mut grid = Grid::new(2, 5);
/// grid.set(1, 2, 1).unwrap();
/// grid.shift_back();
/// assert_eq!(grid.get(0, 2).unwrap(), 1);
/// assert_eq!(grid.get(1, 2).unwrap(), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Symbol>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Crée une grille `height × width` remplie de 0.
    #[must_use]
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            cells: vec![0; height * width],
            width,
            height,
        }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read one cell.
    ///
    /// # Errors
    /// Returns `CoreError::OutOfRange` when `row >= height` or `col >= width`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Result<Symbol, CoreError> {
        let idx = self.index(row, col)?;
        Ok(self.cells[idx])
    }

    /// Write one cell.
    ///
    /// # Errors
    /// Returns `CoreError::OutOfRange` when `row >= height` or `col >= width`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, symbol: Symbol) -> Result<(), CoreError> {
        let idx = self.index(row, col)?;
        self.cells[idx] = symbol;
        Ok(())
    }

    /// Borrow a full row.
    ///
    /// # Errors
    /// Returns `CoreError::OutOfRange` when `row >= height`.
    pub fn row(&self, row: usize) -> Result<&[Symbol], CoreError> {
        if row >= self.height {
            return Err(self.out_of_range(row, 0));
        }
        Ok(&self.cells[row * self.width..(row + 1) * self.width])
    }

    /// Iterate rows from oldest to newest.
    pub fn rows(&self) -> impl Iterator<Item = &[Symbol]> {
        // chunks_exact panique sur 0 : une grille sans colonnes n'a pas de ligne utile.
        self.cells.chunks_exact(self.width.max(1))
    }

    /// Décale l'historique d'une ligne : la ligne 0 est perdue, chaque ligne
    /// remonte, la dernière est remise à zéro.
    ///
    /// # Example
    /// ```
    /// use ca_core::grid::Grid;
    /// let mut grid = Grid::new(3, 4);
    /// grid.set(2, 0, 1).unwrap();
    /// grid.shift_back();
    /// assert_eq!(grid.row(1).unwrap(), &[1, 0, 0, 0]);
    /// assert_eq!(grid.row(2).unwrap(), &[0, 0, 0, 0]);
    /// ```
    pub fn shift_back(&mut self) {
        if self.height == 0 {
            return;
        }
        self.cells.copy_within(self.width.., 0);
        let last = (self.height - 1) * self.width;
        self.cells[last..].fill(0);
    }

    /// Split into the history rows (flattened, oldest first) and the newest row.
    ///
    /// Used by the step functions to read history while writing the new row.
    pub(crate) fn split_history_mut(&mut self) -> (&[Symbol], &mut [Symbol]) {
        let last = self.height.saturating_sub(1) * self.width;
        let (history, newest) = self.cells.split_at_mut(last);
        (history, newest)
    }

    /// Échange deux lignes complètes.
    ///
    /// # Errors
    /// Returns `CoreError::OutOfRange` if either row is outside the grid.
    pub fn swap_rows(&mut self, a: usize, b: usize) -> Result<(), CoreError> {
        for row in [a, b] {
            if row >= self.height {
                return Err(self.out_of_range(row, 0));
            }
        }
        for col in 0..self.width {
            self.cells.swap(a * self.width + col, b * self.width + col);
        }
        Ok(())
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, CoreError> {
        if row >= self.height || col >= self.width {
            return Err(self.out_of_range(row, col));
        }
        Ok(row * self.width + col)
    }

    fn out_of_range(&self, row: usize, col: usize) -> CoreError {
        CoreError::OutOfRange {
            row,
            col,
            height: self.height,
            width: self.width,
        }
    }
}
