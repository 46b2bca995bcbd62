// Code lints

#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_import_braces)]
#![warn(unused_lifetimes)]
#![warn(unused_qualifications)]

// Doc lints

#![warn(missing_docs)]

//! This crate implements an easy-to-understand KenKen puzzle engine. It
//! supports the following key features:
//!
//! * Parsing and printing KenKen grids
//! * Generating puzzles: a random Latin square solution partitioned into
//! connected cages with arithmetic operations and targets
//! * Validating arbitrary, possibly partially filled boards against the
//! KenKen rules
//!
//! Note in this introduction we will mostly be using 4x4 puzzles due to
//! their simpler nature.
//!
//! # Parsing and printing grids
//!
//! See [KenkenGrid::parse] for the exact format of a grid code.
//!
//! Codes can be used to exchange grids, while pretty prints can be used to
//! display a grid in a clearer manner. An example of how to parse and
//! display a grid is provided below.
//!
//! ```
//! use kenken_engine::KenkenGrid;
//!
//! let grid =
//!     KenkenGrid::parse("4;2, ,3, , ,1, , ,1, , ,4, ,2, ,3").unwrap();
//! println!("{}", grid);
//! ```
//!
//! # Generating puzzles
//!
//! A [Generator](generator::Generator) first builds a random Latin square by
//! randomized backtracking and then partitions it into cages, whose density
//! is controlled by a [Difficulty](generator::Difficulty). The generator
//! needs a random number generator, for which we use the `Rng` trait from the
//! [rand](https://rust-random.github.io/rand/rand/index.html) crate.
//!
//! ```
//! use kenken_engine::generator::{Difficulty, Generator};
//!
//! // new_default yields a generator with rand::thread_rng()
//! let mut generator = Generator::new_default();
//! let puzzle = generator.generate(4, Difficulty::Medium).unwrap();
//!
//! // The solution is a valid Latin square, the player board starts empty.
//! assert!(puzzle.board().is_empty());
//! assert_eq!(4, puzzle.size());
//! ```
//!
//! # Validating boards
//!
//! [check_rules](validator::check_rules) checks a candidate board against
//! the Latin square rule and every cage's arithmetic constraint. Empty cells
//! are tolerated, so the function can be called after every move. A board
//! that passes validation and has no empty cells is solved, which
//! [Puzzle::is_solved] checks directly.
//!
//! ```
//! use kenken_engine::generator::{Difficulty, Generator};
//! use kenken_engine::validator::check_rules;
//!
//! let mut generator = Generator::new_default();
//! let puzzle = generator.generate(4, Difficulty::Easy).unwrap();
//!
//! // No rule is violated yet on the empty board, but nothing is solved.
//! assert!(check_rules(puzzle.board(), puzzle.cages()));
//! assert!(!puzzle.is_solved());
//! ```

pub mod cage;
pub mod error;
pub mod generator;
pub mod util;
pub mod validator;

use cage::Cage;
use error::{KenkenError, KenkenParseError, KenkenParseResult, KenkenResult};

use serde::{Deserialize, Serialize};

use std::convert::TryFrom;
use std::fmt::{self, Display, Error, Formatter};

/// A KenKen grid is a square arrangement of cells, each of which may or may
/// not be occupied by a number in the range `[1, size]`. It serves both as
/// the solution grid, where every row and column is a permutation of
/// `1..=size`, and as the player board, which starts empty and is filled
/// cell-by-cell.
///
/// `KenkenGrid` implements `Display`, but only grids with a size of less
/// than or equal to 9 can be displayed with digits 1 to 9. Grids of all
/// other sizes will raise an error.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(into = "String")]
#[serde(try_from = "String")]
pub struct KenkenGrid {
    size: usize,
    cells: Vec<Option<usize>>
}

fn to_char(cell: Option<usize>) -> char {
    if let Some(n) = cell {
        (b'0' + n as u8) as char
    }
    else {
        ' '
    }
}

fn line(grid: &KenkenGrid, start: char, sep: char,
        segment: impl Fn(usize) -> char, pad: char, end: char, newline: bool)
        -> String {
    let size = grid.size();
    let mut result = String::new();

    for x in 0..size {
        if x == 0 {
            result.push(start);
        }
        else {
            result.push(sep);
        }

        result.push(pad);
        result.push(segment(x));
        result.push(pad);
    }

    result.push(end);

    if newline {
        result.push('\n');
    }

    result
}

fn top_row(grid: &KenkenGrid) -> String {
    line(grid, '╔', '╤', |_| '═', '═', '╗', true)
}

fn separator_line(grid: &KenkenGrid) -> String {
    line(grid, '╟', '┼', |_| '─', '─', '╢', true)
}

fn bottom_row(grid: &KenkenGrid) -> String {
    line(grid, '╚', '╧', |_| '═', '═', '╝', false)
}

fn content_row(grid: &KenkenGrid, y: usize) -> String {
    line(grid, '║', '│', |x| to_char(grid.get_cell(x, y).unwrap()), ' ', '║',
        true)
}

impl Display for KenkenGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let size = self.size();

        if size > 9 {
            return Err(Error::default());
        }

        let separator_line = separator_line(self);

        for y in 0..size {
            if y == 0 {
                f.write_str(top_row(self).as_str())?;
            }
            else {
                f.write_str(separator_line.as_str())?;
            }

            f.write_str(content_row(self, y).as_str())?;
        }

        f.write_str(bottom_row(self).as_str())?;
        Ok(())
    }
}

fn to_string(cell: &Option<usize>) -> String {
    if let Some(number) = cell {
        number.to_string()
    }
    else {
        String::from("")
    }
}

pub(crate) fn index(column: usize, row: usize, size: usize) -> usize {
    row * size + column
}

impl KenkenGrid {

    /// Creates a new, empty KenKen grid of the given size. The grid will
    /// contain `size * size` cells, all of which start empty.
    ///
    /// # Arguments
    ///
    /// * `size`: The number of rows and columns of the grid. Must be greater
    /// than 1, since a 1x1 puzzle is degenerate.
    ///
    /// # Errors
    ///
    /// If `size` is invalid (less than 2). In that case,
    /// `KenkenError::InvalidSize` is returned.
    pub fn new(size: usize) -> KenkenResult<KenkenGrid> {
        if size < 2 {
            return Err(KenkenError::InvalidSize);
        }

        let cells = vec![None; size * size];

        Ok(KenkenGrid {
            size,
            cells
        })
    }

    /// Parses a code encoding a KenKen grid. The code has to be of the
    /// format `<size>;<cells>` where `<cells>` is a comma-separated list of
    /// entries, which are either empty or a number. The entries are assigned
    /// left-to-right, top-to-bottom, where each row is completed before the
    /// next one is started. Whitespace in the entries is ignored to allow for
    /// more intuitive formatting. The number of entries must be `size²`.
    ///
    /// As an example, the code `4;1, ,2, , ,3, ,4, , , ,3, ,1, ,2` will
    /// parse to the following grid:
    ///
    /// ```text
    /// ╔═══╤═══╤═══╤═══╗
    /// ║ 1 │   │ 2 │   ║
    /// ╟───┼───┼───┼───╢
    /// ║   │ 3 │   │ 4 ║
    /// ╟───┼───┼───┼───╢
    /// ║   │   │   │ 3 ║
    /// ╟───┼───┼───┼───╢
    /// ║   │ 1 │   │ 2 ║
    /// ╚═══╧═══╧═══╧═══╝
    /// ```
    ///
    /// # Errors
    ///
    /// Any specialization of `KenkenParseError` (see that documentation).
    pub fn parse(code: &str) -> KenkenParseResult<KenkenGrid> {
        let parts: Vec<&str> = code.split(';').collect();

        if parts.len() != 2 {
            return Err(KenkenParseError::WrongNumberOfParts);
        }

        let size: usize = parts[0].trim().parse()?;

        if let Ok(mut grid) = KenkenGrid::new(size) {
            let numbers: Vec<&str> = parts[1].split(',').collect();

            if numbers.len() != size * size {
                return Err(KenkenParseError::WrongNumberOfCells);
            }

            for (i, number_str) in numbers.iter().enumerate() {
                let number_str = number_str.trim();

                if number_str.is_empty() {
                    continue;
                }

                let number = number_str.parse::<usize>()?;

                if number == 0 || number > size {
                    return Err(KenkenParseError::InvalidNumber);
                }

                grid.cells[i] = Some(number);
            }

            Ok(grid)
        }
        else {
            Err(KenkenParseError::InvalidSize)
        }
    }

    /// Converts the grid into a `String` in a way that is consistent with
    /// [KenkenGrid::parse](#method.parse). That is, a grid that is converted
    /// to a string and parsed again will not change, as is illustrated below.
    ///
    /// ```
    /// use kenken_engine::KenkenGrid;
    ///
    /// let mut grid = KenkenGrid::new(4).unwrap();
    ///
    /// // Just some arbitrary changes to create some content.
    /// grid.set_cell(1, 1, 4).unwrap();
    /// grid.set_cell(1, 2, 3).unwrap();
    ///
    /// let grid_str = grid.to_parseable_string();
    /// let grid_parsed = KenkenGrid::parse(grid_str.as_str()).unwrap();
    /// assert_eq!(grid, grid_parsed);
    /// ```
    pub fn to_parseable_string(&self) -> String {
        let mut s = format!("{};", self.size);
        let cells = self.cells.iter()
            .map(to_string)
            .collect::<Vec<String>>()
            .join(",");
        s.push_str(cells.as_str());
        s
    }

    /// Gets the total size of the grid on one axis (horizontally or
    /// vertically). Since a square grid is enforced at construction time,
    /// this is guaranteed to be valid for both axes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Gets the content of the cell at the specified position.
    ///
    /// # Arguments
    ///
    /// * `column`: The column (x-coordinate) of the desired cell. Must be in
    /// the range `[0, size[`.
    /// * `row`: The row (y-coordinate) of the desired cell. Must be in the
    /// range `[0, size[`.
    ///
    /// # Errors
    ///
    /// If either `column` or `row` are not in the specified range. In that
    /// case, `KenkenError::OutOfBounds` is returned.
    pub fn get_cell(&self, column: usize, row: usize)
            -> KenkenResult<Option<usize>> {
        let size = self.size();

        if column >= size || row >= size {
            Err(KenkenError::OutOfBounds)
        }
        else {
            let index = index(column, row, size);
            Ok(self.cells[index])
        }
    }

    /// Indicates whether the cell at the specified position has the given
    /// number. This will return `false` if there is a different number in
    /// that cell or it is empty.
    ///
    /// # Arguments
    ///
    /// * `column`: The column (x-coordinate) of the checked cell. Must be in
    /// the range `[0, size[`.
    /// * `row`: The row (y-coordinate) of the checked cell. Must be in the
    /// range `[0, size[`.
    /// * `number`: The number to check whether it is in the specified cell.
    /// If it is *not* in the range `[1, size]`, `false` will always be
    /// returned.
    ///
    /// # Errors
    ///
    /// If either `column` or `row` are not in the specified range. In that
    /// case, `KenkenError::OutOfBounds` is returned.
    pub fn has_number(&self, column: usize, row: usize, number: usize)
            -> KenkenResult<bool> {
        if let Some(content) = self.get_cell(column, row)? {
            Ok(number == content)
        }
        else {
            Ok(false)
        }
    }

    /// Sets the content of the cell at the specified position to the given
    /// number. If the cell was not empty, the old number will be
    /// overwritten.
    ///
    /// # Arguments
    ///
    /// * `column`: The column (x-coordinate) of the assigned cell. Must be in
    /// the range `[0, size[`.
    /// * `row`: The row (y-coordinate) of the assigned cell. Must be in the
    /// range `[0, size[`.
    /// * `number`: The number to assign to the specified cell. Must be in the
    /// range `[1, size]`.
    ///
    /// # Errors
    ///
    /// * `KenkenError::OutOfBounds` If either `column` or `row` are not in
    /// the specified range.
    /// * `KenkenError::InvalidNumber` If `number` is not in the specified
    /// range.
    pub fn set_cell(&mut self, column: usize, row: usize, number: usize)
            -> KenkenResult<()> {
        let size = self.size();

        if column >= size || row >= size {
            return Err(KenkenError::OutOfBounds);
        }

        if number == 0 || number > size {
            return Err(KenkenError::InvalidNumber);
        }

        let index = index(column, row, size);
        self.cells[index] = Some(number);
        Ok(())
    }

    /// Clears the content of the cell at the specified position, that is, if
    /// contains a number, that number is removed. If the cell is already
    /// empty, it will be left that way.
    ///
    /// # Arguments
    ///
    /// * `column`: The column (x-coordinate) of the cleared cell. Must be in
    /// the range `[0, size[`.
    /// * `row`: The row (y-coordinate) of the cleared cell. Must be in the
    /// range `[0, size[`.
    ///
    /// # Errors
    ///
    /// If either `column` or `row` are not in the specified range. In that
    /// case, `KenkenError::OutOfBounds` is returned.
    pub fn clear_cell(&mut self, column: usize, row: usize)
            -> KenkenResult<()> {
        let size = self.size();

        if column >= size || row >= size {
            return Err(KenkenError::OutOfBounds);
        }

        let index = index(column, row, size);
        self.cells[index] = None;
        Ok(())
    }

    /// Counts the number of filled cells of this grid. For a full solution
    /// grid, this is the square of [KenkenGrid::size].
    pub fn count_filled(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Indicates whether this grid is full, i.e. every cell is filled with a
    /// number.
    pub fn is_full(&self) -> bool {
        !self.cells.iter().any(|c| c == &None)
    }

    /// Indicates whether this grid is empty, i.e. no cell is filled with a
    /// number.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c == &None)
    }

    /// Gets a reference to the vector which holds the cells. They are in
    /// left-to-right, top-to-bottom order, where rows are together.
    pub fn cells(&self) -> &Vec<Option<usize>> {
        &self.cells
    }

    /// Gets a mutable reference to the vector which holds the cells. They
    /// are in left-to-right, top-to-bottom order, where rows are together.
    pub fn cells_mut(&mut self) -> &mut Vec<Option<usize>> {
        &mut self.cells
    }
}

impl From<KenkenGrid> for String {
    fn from(grid: KenkenGrid) -> String {
        grid.to_parseable_string()
    }
}

impl TryFrom<String> for KenkenGrid {
    type Error = KenkenParseError;

    fn try_from(code: String) -> KenkenParseResult<KenkenGrid> {
        KenkenGrid::parse(code.as_str())
    }
}

/// A complete KenKen puzzle as handed to the surrounding application: the
/// hidden solution grid, the cages that partition it, and the player board,
/// which starts empty and is mutated cell-by-cell during play.
///
/// The solution and cages are immutable after generation; only the board can
/// be accessed mutably.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Puzzle {
    size: usize,
    solution: KenkenGrid,
    cages: Vec<Cage>,
    board: KenkenGrid
}

impl Puzzle {

    /// Creates a new puzzle from a solution grid and a list of cages,
    /// together with a fresh, empty player board of the same size. Note that
    /// it is *not* checked whether the cages tile the grid or are consistent
    /// with the solution - that is the generator's job. This constructor
    /// exists for reassembling externally stored puzzles.
    ///
    /// # Errors
    ///
    /// If the solution grid's size is invalid (less than 2). In that case,
    /// `KenkenError::InvalidSize` is returned.
    pub fn new(solution: KenkenGrid, cages: Vec<Cage>)
            -> KenkenResult<Puzzle> {
        let size = solution.size();
        let board = KenkenGrid::new(size)?;

        Ok(Puzzle {
            size,
            solution,
            cages,
            board
        })
    }

    /// Gets the size of this puzzle, that is, the number of rows and columns
    /// of its grids.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Gets a reference to the hidden solution grid, which is fully filled.
    pub fn solution(&self) -> &KenkenGrid {
        &self.solution
    }

    /// Gets the cages of this puzzle. They partition the grid: every cell
    /// belongs to exactly one cage.
    pub fn cages(&self) -> &Vec<Cage> {
        &self.cages
    }

    /// Gets a reference to the player board.
    pub fn board(&self) -> &KenkenGrid {
        &self.board
    }

    /// Gets a mutable reference to the player board, through which the game
    /// session enters and clears digits.
    pub fn board_mut(&mut self) -> &mut KenkenGrid {
        &mut self.board
    }

    /// Indicates whether the player board is a solution to this puzzle, that
    /// is, it is full and violates neither the Latin square rule nor any
    /// cage constraint.
    pub fn is_solved(&self) -> bool {
        validator::is_solved(&self.board, &self.cages)
    }
}
