pub const ROWS: usize = 6;
pub const COLS: usize = 7;
/// Number of aligned marks needed to win.
pub const WIN_LENGTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    One,
    Two,
}

/// One of the four line orientations checked for four-in-a-row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
    /// Top-left to bottom-right on screen.
    DiagonalFalling,
    /// Bottom-left to top-right on screen.
    DiagonalRising,
}

impl Axis {
    /// Axes in the order they are evaluated.
    pub const ALL: [Axis; 4] = [
        Axis::Horizontal,
        Axis::Vertical,
        Axis::DiagonalFalling,
        Axis::DiagonalRising,
    ];

    /// The two opposite (row, col) steps walked outward from a placed cell.
    pub fn directions(self) -> [(isize, isize); 2] {
        match self {
            Axis::Horizontal => [(0, 1), (0, -1)],
            Axis::Vertical => [(1, 0), (-1, 0)],
            Axis::DiagonalFalling => [(1, 1), (-1, -1)],
            Axis::DiagonalRising => [(1, -1), (-1, 1)],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::Horizontal => "horizontal",
            Axis::Vertical => "vertical",
            Axis::DiagonalFalling => "diagonal-\\",
            Axis::DiagonalRising => "diagonal-/",
        }
    }
}

/// Contiguous same-mark cells along a winning axis.
///
/// Cells are ordered along the axis, starting from the far end in the axis'
/// first direction: a vertical line reads bottom to top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinningLine {
    axis: Axis,
    cells: Vec<(usize, usize)>,
}

impl WinningLine {
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// `(row, col)` pairs of the line.
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.cells.contains(&(row, col))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropError {
    ColumnFull,
    InvalidColumn,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row 5 is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.cells[0][col] != Cell::Empty
    }

    /// Lowest empty row in a column, scanning from the bottom up.
    pub fn lowest_empty_row(&self, col: usize) -> Option<usize> {
        if col >= COLS {
            return None;
        }
        (0..ROWS).rev().find(|&row| self.cells[row][col] == Cell::Empty)
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Result<usize, DropError> {
        if col >= COLS {
            return Err(DropError::InvalidColumn);
        }

        let row = self.lowest_empty_row(col).ok_or(DropError::ColumnFull)?;
        self.cells[row][col] = cell;
        Ok(row)
    }

    /// Check if every cell of the board is occupied
    pub fn is_full(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|&cell| cell != Cell::Empty))
    }

    /// Draw check: the top row is the last to fill, so a full top row means
    /// a full board as long as every piece went in through `drop_piece`.
    pub fn check_draw(&self) -> bool {
        self.cells[0].iter().all(|&cell| cell != Cell::Empty)
    }

    /// Check if the piece at (row, col) completes four in a row.
    ///
    /// Axes are tried in [`Axis::ALL`] order and the first one reaching
    /// [`WIN_LENGTH`] is reported. Marks are compared against the piece at
    /// (row, col), so an empty cell never wins.
    pub fn check_win(&self, row: usize, col: usize) -> Option<WinningLine> {
        if row >= ROWS || col >= COLS {
            return None;
        }
        let cell = self.get(row, col);
        if cell == Cell::Empty {
            return None;
        }

        Axis::ALL.into_iter().find_map(|axis| {
            let [forward, backward] = axis.directions();
            let ahead = self.walk(row, col, forward, cell);
            let behind = self.walk(row, col, backward, cell);

            if 1 + ahead.len() + behind.len() < WIN_LENGTH {
                return None;
            }

            let mut cells = Vec::with_capacity(1 + ahead.len() + behind.len());
            cells.extend(ahead.into_iter().rev());
            cells.push((row, col));
            cells.extend(behind);
            Some(WinningLine { axis, cells })
        })
    }

    /// Collect matching cells stepping away from (row, col), excluding it.
    fn walk(
        &self,
        row: usize,
        col: usize,
        (dr, dc): (isize, isize),
        cell: Cell,
    ) -> Vec<(usize, usize)> {
        let mut found = Vec::new();
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;

        while r >= 0
            && r < ROWS as isize
            && c >= 0
            && c < COLS as isize
            && self.cells[r as usize][c as usize] == cell
        {
            found.push((r as usize, c as usize));
            r += dr;
            c += dc;
        }

        found
    }

    /// Place a mark without gravity, for building positions in tests.
    #[cfg(test)]
    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row][col] = cell;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
