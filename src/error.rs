//! This module contains some error and result definitions used in this crate.

use std::fmt::{self, Display, Formatter};
use std::num::ParseIntError;

/// Miscellaneous errors that can occur on some methods in the
/// [root module](../index.html). This does not exclude errors that occur when
/// parsing grids, see [KenkenParseError](enum.KenkenParseError.html) for that.
#[derive(Debug, Eq, PartialEq)]
pub enum KenkenError {

    /// Indicates that the size specified for a created grid or puzzle is
    /// invalid. This is the case if it is less than 2, since a 1x1 puzzle is
    /// degenerate.
    InvalidSize,

    /// Indicates that some number is invalid for the size of the grid in
    /// question. This is the case if it is less than 1 or greater than the
    /// size.
    InvalidNumber,

    /// Indicates that the specified coordinates (column and row) lie outside
    /// the grid in question. This is the case if they are greater than or
    /// equal to the size.
    OutOfBounds
}

/// Syntactic sugar for `Result<V, KenkenError>`.
pub type KenkenResult<V> = Result<V, KenkenError>;

/// An enumeration of the errors that may occur when constructing a
/// [Cage](crate::cage::Cage).
#[derive(Debug, Eq, PartialEq)]
pub enum CageError {

    /// Indicates that a cage was created without any cells.
    EmptyCage,

    /// Indicates that a cage was created where a cell was contained twice.
    DuplicateCells,

    /// Indicates that a cage was created from a solution grid where one of
    /// its cells lies outside the grid or references an empty cell.
    CellOutOfGrid
}

impl Display for CageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CageError::EmptyCage => write!(f, "empty cage"),
            CageError::DuplicateCells => write!(f, "duplicate cells in cage"),
            CageError::CellOutOfGrid => write!(f, "cage cell outside grid")
        }
    }
}

/// An enumeration of the errors that may occur when parsing a
/// [KenkenGrid](crate::KenkenGrid).
#[derive(Debug, Eq, PartialEq)]
pub enum KenkenParseError {

    /// Indicates that the code has the wrong number of parts, which are
    /// separated by semicolons. The code should have two parts: size and
    /// cells (separated by ';'), so if the code does not contain exactly one
    /// semicolon, this error will be returned.
    WrongNumberOfParts,

    /// Indicates that the number of cells (which are separated by commas)
    /// does not equal the square of the size.
    WrongNumberOfCells,

    /// Indicates that the provided size is invalid (i.e. less than 2).
    InvalidSize,

    /// Indicates that one of the numbers (size or cell content) could not be
    /// parsed.
    NumberFormatError,

    /// Indicates that a cell is filled with an invalid number (0 or more than
    /// the grid size).
    InvalidNumber
}

impl Display for KenkenParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            KenkenParseError::WrongNumberOfParts =>
                write!(f, "wrong number of parts"),
            KenkenParseError::WrongNumberOfCells =>
                write!(f, "wrong number of cells"),
            KenkenParseError::InvalidSize => write!(f, "invalid size"),
            KenkenParseError::NumberFormatError =>
                write!(f, "number format error"),
            KenkenParseError::InvalidNumber => write!(f, "invalid number")
        }
    }
}

impl From<ParseIntError> for KenkenParseError {
    fn from(_: ParseIntError) -> Self {
        KenkenParseError::NumberFormatError
    }
}

/// Syntactic sugar for `Result<V, KenkenParseError>`.
pub type KenkenParseResult<V> = Result<V, KenkenParseError>;
