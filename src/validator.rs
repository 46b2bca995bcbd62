//! This module contains the rule validation engine. It is the pure
//! counterpart to the [Generator](crate::generator::Generator): given an
//! arbitrary, possibly partially filled board and a cage list, it decides
//! whether any KenKen rule is violated.
//!
//! Validation never mutates its inputs and never panics on malformed cage
//! data - a cage that cannot be satisfied or refers to cells outside the
//! board simply fails validation.

use crate::KenkenGrid;
use crate::cage::{Cage, calculate_cage_result};
use crate::util::DigitSet;

fn rows_and_columns_valid(board: &KenkenGrid) -> bool {
    let size = board.size();
    let mut digits = match DigitSet::new(size) {
        Ok(digits) => digits,
        Err(_) => return false
    };

    for row in 0..size {
        digits.clear();

        for column in 0..size {
            if let Some(number) = board.get_cell(column, row).unwrap() {
                match digits.insert(number) {
                    Ok(true) => { },
                    _ => return false
                }
            }
        }
    }

    for column in 0..size {
        digits.clear();

        for row in 0..size {
            if let Some(number) = board.get_cell(column, row).unwrap() {
                match digits.insert(number) {
                    Ok(true) => { },
                    _ => return false
                }
            }
        }
    }

    true
}

fn cage_valid(board: &KenkenGrid, cage: &Cage) -> bool {
    let mut values = Vec::with_capacity(cage.cells().len());

    for &(column, row) in cage.cells() {
        match board.get_cell(column, row) {
            Ok(Some(number)) => values.push(number),
            // An incomplete cage cannot be judged wrong yet.
            Ok(None) => return true,
            Err(_) => return false
        }
    }

    if calculate_cage_result(cage.operation(), &values)
            != Some(cage.target()) {
        return false;
    }

    cage.is_connected()
}

/// Checks the given board against the KenKen rules: no digit may repeat
/// within a row or column, and every fully filled cage must produce its
/// target under its operation and be internally connected. Returns `true`
/// iff no rule is violated.
///
/// Empty cells are tolerated: they are excluded from the uniqueness checks,
/// and a cage containing an empty cell is skipped entirely. A call on a
/// partially filled board can therefore return `true` even though the puzzle
/// is unfinished; use [is_solved] to additionally require a full board.
///
/// Malformed cages - cells outside the board, a pair-only operation on a
/// cage without exactly 2 cells, or disconnected cells - fail validation
/// rather than causing a panic, so a corrupted cage list is handled
/// gracefully.
pub fn check_rules(board: &KenkenGrid, cages: &[Cage]) -> bool {
    if !rows_and_columns_valid(board) {
        return false;
    }

    for cage in cages {
        if !cage_valid(board, cage) {
            return false;
        }
    }

    true
}

/// Indicates whether the given board is a solution with respect to the given
/// cages, that is, it is full and [check_rules] holds. This is the check the
/// surrounding game performs after every move to detect a win.
pub fn is_solved(board: &KenkenGrid, cages: &[Cage]) -> bool {
    board.is_full() && check_rules(board, cages)
}
