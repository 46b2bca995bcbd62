//! This module contains the definition of [Cage]s and their arithmetic
//! [Operation]s. Cages are usually produced by the
//! [Generator](crate::generator::Generator), but can also be constructed
//! manually, for example when loading externally stored puzzles.

use crate::KenkenGrid;
use crate::error::CageError;
use crate::util;

use rand::Rng;

use serde::{Deserialize, Serialize};

use std::collections::{HashSet, VecDeque};
use std::convert::TryFrom;
use std::fmt::{self, Display, Formatter};

/// An enumeration of the arithmetic operations a [Cage] can be annotated
/// with. The operation combined with the cage's target value constrains the
/// digits that may be placed in the cage's cells.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {

    /// The digits in the cage must sum to the target. Valid for any number of
    /// cells.
    Add,

    /// The product of the digits in the cage must equal the target. Valid for
    /// any number of cells.
    Multiply,

    /// The absolute difference of the two digits in the cage must equal the
    /// target. Only valid for cages with exactly 2 cells.
    Subtract,

    /// The quotient of the larger by the smaller of the two digits in the
    /// cage must equal the target. Only valid for cages with exactly 2 cells
    /// whose digits divide evenly.
    Divide
}

impl Operation {

    /// Chooses an operation uniformly at random among all four variants.
    pub fn random(rng: &mut impl Rng) -> Operation {
        match rng.gen_range(0..4) {
            0 => Operation::Add,
            1 => Operation::Multiply,
            2 => Operation::Subtract,
            _ => Operation::Divide
        }
    }

    /// Chooses uniformly at random between [Operation::Add] and
    /// [Operation::Multiply]. These are the only operations that are
    /// meaningful for any cell count.
    pub fn random_any_arity(rng: &mut impl Rng) -> Operation {
        if rng.gen_bool(0.5) {
            Operation::Add
        }
        else {
            Operation::Multiply
        }
    }

    /// Indicates whether this operation is only defined on exactly two
    /// operands, which is the case for [Operation::Subtract] and
    /// [Operation::Divide].
    pub fn requires_pair(self) -> bool {
        matches!(self, Operation::Subtract | Operation::Divide)
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Add => write!(f, "+"),
            Operation::Multiply => write!(f, "×"),
            Operation::Subtract => write!(f, "-"),
            Operation::Divide => write!(f, "÷")
        }
    }
}

/// Computes the result of applying the given [Operation] to the given values,
/// using the same semantics with which cage targets are computed during
/// generation. Returns `None` in all situations in which no result can be
/// determined, namely if `values` contains a 0 placeholder for an empty cell,
/// if a pair-only operation ([Operation::requires_pair]) is given a value
/// count other than 2, or if a division does not yield an integer. `None`
/// never matches a stored target, so the validator fails closed on such
/// cages.
pub fn calculate_cage_result(operation: Operation, values: &[usize])
        -> Option<usize> {
    if values.contains(&0) {
        return None;
    }

    match operation {
        Operation::Add => Some(values.iter().sum()),
        Operation::Multiply => Some(values.iter().product()),
        Operation::Subtract => {
            if values.len() != 2 {
                return None;
            }

            Some(util::abs_diff(values[0], values[1]))
        },
        Operation::Divide => {
            if values.len() != 2 {
                return None;
            }

            let max = values[0].max(values[1]);
            let min = values[0].min(values[1]);

            if min == 0 || max % min != 0 {
                None
            }
            else {
                Some(max / min)
            }
        }
    }
}

/// A single cage of a KenKen puzzle, which contains some cells and annotates
/// an [Operation] together with a target value that the digits in these cells
/// must produce. Cells are stored in the format `(column, row)`.
///
/// A cage is only meaningful if its cells are orthogonally connected. The
/// [Generator](crate::generator::Generator) guarantees this by construction;
/// for externally supplied cages [Cage::is_connected] can be queried and is
/// verified by [check_rules](crate::validator::check_rules).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(into = "(Vec<(usize, usize)>, Operation, usize)")]
#[serde(try_from = "(Vec<(usize, usize)>, Operation, usize)")]
pub struct Cage {
    cells: Vec<(usize, usize)>,
    operation: Operation,
    target: usize
}

impl Cage {

    /// Creates a new cage with the given cells, operation, and target.
    ///
    /// Note that neither connectivity nor consistency of the target with the
    /// operation are required here - it is perfectly legal to construct a
    /// cage that cannot be satisfied. Such cages are rejected by the
    /// validator, not at construction.
    ///
    /// # Arguments
    ///
    /// * `cells`: The cells contained in this cage in the format
    /// `(column, row)`. May not be empty or contain duplicates.
    /// * `operation`: The [Operation] annotated on this cage.
    /// * `target`: The target value the operation must produce.
    ///
    /// # Errors
    ///
    /// `CageError::EmptyCage` if `cells` is empty and
    /// `CageError::DuplicateCells` if it contains the same cell more than
    /// once.
    pub fn new(cells: Vec<(usize, usize)>, operation: Operation,
            target: usize) -> Result<Cage, CageError> {
        if cells.is_empty() {
            return Err(CageError::EmptyCage);
        }

        if util::contains_duplicate(cells.iter()) {
            return Err(CageError::DuplicateCells);
        }

        Ok(Cage {
            cells,
            operation,
            target
        })
    }

    /// Creates a new cage over the given cells whose target is computed from
    /// the digits the solution grid holds at those cells. The desired
    /// operation is coerced where it is not applicable:
    ///
    /// * If `operation` requires a pair ([Operation::requires_pair]) but the
    /// cage does not have exactly 2 cells, it is replaced by a uniformly
    /// random choice of [Operation::Add] or [Operation::Multiply].
    /// * If a division of the two digits does not yield an integer, the
    /// operation falls back to [Operation::Add].
    ///
    /// All coercions happen before the target is computed, so the resulting
    /// cage is always consistent: applying [calculate_cage_result] to its
    /// operation and solution digits yields its target.
    ///
    /// # Arguments
    ///
    /// * `solution`: The solved grid from which the cage digits are read.
    /// All cells referenced by `cells` must be filled.
    /// * `cells`: The cells contained in this cage in the format
    /// `(column, row)`. May not be empty, contain duplicates, or lie outside
    /// the solution grid.
    /// * `operation`: The desired [Operation], subject to coercion as
    /// described above.
    /// * `rng`: The random number generator that decides coerced operations.
    ///
    /// # Errors
    ///
    /// * `CageError::EmptyCage` if `cells` is empty.
    /// * `CageError::DuplicateCells` if `cells` contains the same cell more
    /// than once.
    /// * `CageError::CellOutOfGrid` if a cell lies outside the solution grid
    /// or references an empty solution cell.
    pub fn from_solution(solution: &KenkenGrid, cells: Vec<(usize, usize)>,
            operation: Operation, rng: &mut impl Rng)
            -> Result<Cage, CageError> {
        let mut values = Vec::with_capacity(cells.len());

        for &(column, row) in &cells {
            match solution.get_cell(column, row) {
                Ok(Some(number)) => values.push(number),
                _ => return Err(CageError::CellOutOfGrid)
            }
        }

        let mut operation = operation;

        if operation.requires_pair() && cells.len() != 2 {
            operation = Operation::random_any_arity(rng);
        }

        let target = match calculate_cage_result(operation, &values) {
            Some(target) => target,
            None => {
                // Only reachable for a non-integral quotient; the original
                // game abandons division here and falls back to addition
                // without reshaping the cage.
                operation = Operation::Add;
                values.iter().sum()
            }
        };

        Cage::new(cells, operation, target)
    }

    /// Gets the cells contained in this cage in the format `(column, row)`.
    pub fn cells(&self) -> &Vec<(usize, usize)> {
        &self.cells
    }

    /// Gets the [Operation] annotated on this cage.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Gets the target value the operation must produce from the digits in
    /// this cage's cells.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Indicates whether all cells of this cage are reachable from one
    /// another via 4-directional adjacency through other cells of the cage.
    /// This is checked with a breadth-first search from an arbitrary cage
    /// cell. Single-cell cages are always connected.
    pub fn is_connected(&self) -> bool {
        if self.cells.len() <= 1 {
            return true;
        }

        let cell_set: HashSet<(usize, usize)> =
            self.cells.iter().cloned().collect();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(self.cells[0]);
        queue.push_back(self.cells[0]);

        while let Some((column, row)) = queue.pop_front() {
            let neighbors = [
                (column + 1, row),
                (column, row + 1),
                (column.wrapping_sub(1), row),
                (column, row.wrapping_sub(1))
            ];

            for &neighbor in &neighbors {
                if cell_set.contains(&neighbor) &&
                        visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        visited.len() == self.cells.len()
    }
}

impl From<Cage> for (Vec<(usize, usize)>, Operation, usize) {
    fn from(cage: Cage) -> (Vec<(usize, usize)>, Operation, usize) {
        (cage.cells, cage.operation, cage.target)
    }
}

impl TryFrom<(Vec<(usize, usize)>, Operation, usize)> for Cage {
    type Error = CageError;

    fn try_from((cells, operation, target):
            (Vec<(usize, usize)>, Operation, usize))
            -> Result<Cage, CageError> {
        Cage::new(cells, operation, target)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(90)
    }

    #[test]
    fn addition_result() {
        assert_eq!(Some(5), calculate_cage_result(Operation::Add, &[2, 3]));
        assert_eq!(Some(10),
            calculate_cage_result(Operation::Add, &[1, 2, 3, 4]));
        assert_eq!(Some(4), calculate_cage_result(Operation::Add, &[4]));
    }

    #[test]
    fn multiplication_result() {
        assert_eq!(Some(24),
            calculate_cage_result(Operation::Multiply, &[2, 3, 4]));
        assert_eq!(Some(4),
            calculate_cage_result(Operation::Multiply, &[4]));
    }

    #[test]
    fn subtraction_result() {
        assert_eq!(Some(1),
            calculate_cage_result(Operation::Subtract, &[2, 3]));
        assert_eq!(Some(1),
            calculate_cage_result(Operation::Subtract, &[3, 2]));
        assert_eq!(None, calculate_cage_result(Operation::Subtract, &[3]));
        assert_eq!(None,
            calculate_cage_result(Operation::Subtract, &[3, 2, 1]));
    }

    #[test]
    fn division_result() {
        assert_eq!(Some(3), calculate_cage_result(Operation::Divide, &[6, 2]));
        assert_eq!(Some(3), calculate_cage_result(Operation::Divide, &[2, 6]));
        assert_eq!(None, calculate_cage_result(Operation::Divide, &[6, 4]));
        assert_eq!(None, calculate_cage_result(Operation::Divide, &[6]));
        assert_eq!(None,
            calculate_cage_result(Operation::Divide, &[6, 2, 1]));
    }

    #[test]
    fn placeholder_yields_no_result() {
        assert_eq!(None, calculate_cage_result(Operation::Add, &[2, 0]));
        assert_eq!(None, calculate_cage_result(Operation::Multiply, &[0]));
        assert_eq!(None, calculate_cage_result(Operation::Divide, &[0, 2]));
    }

    #[test]
    fn valid_cage() {
        let cage =
            Cage::new(vec![(0, 0), (0, 1)], Operation::Add, 5).unwrap();

        assert_eq!(&vec![(0, 0), (0, 1)], cage.cells());
        assert_eq!(Operation::Add, cage.operation());
        assert_eq!(5, cage.target());
    }

    #[test]
    fn invalid_cage() {
        assert_eq!(Err(CageError::EmptyCage),
            Cage::new(Vec::new(), Operation::Add, 0));
        assert_eq!(Err(CageError::DuplicateCells),
            Cage::new(vec![(0, 0), (0, 1), (0, 0)], Operation::Add, 5));
    }

    #[test]
    fn connectivity() {
        let connected = Cage::new(vec![(0, 0), (1, 0), (1, 1)],
            Operation::Add, 6).unwrap();
        let disconnected = Cage::new(vec![(0, 0), (1, 1)],
            Operation::Add, 3).unwrap();
        let singleton =
            Cage::new(vec![(2, 2)], Operation::Multiply, 4).unwrap();

        assert!(connected.is_connected());
        assert!(!disconnected.is_connected());
        assert!(singleton.is_connected());
    }

    fn solution_4x4() -> KenkenGrid {
        KenkenGrid::parse("4;\
            2,3,4,1,\
            4,2,1,3,\
            3,1,4,2,\
            1,4,2,3").unwrap()
    }

    // Same grid with row 1 swapped to 4,3: those digits do not divide
    // evenly, while 4 and 2 above do.
    fn solution_with_coarse_row() -> KenkenGrid {
        KenkenGrid::parse("4;\
            2,3,4,1,\
            4,3,1,2,\
            3,1,4,2,\
            1,4,2,3").unwrap()
    }

    #[test]
    fn target_from_solution_addition() {
        let solution = solution_4x4();
        let cage = Cage::from_solution(&solution, vec![(0, 0), (1, 0)],
            Operation::Add, &mut rng()).unwrap();

        assert_eq!(Operation::Add, cage.operation());
        assert_eq!(5, cage.target());
    }

    #[test]
    fn target_from_solution_division() {
        let solution = solution_4x4();
        let cage = Cage::from_solution(&solution, vec![(0, 1), (1, 1)],
            Operation::Divide, &mut rng()).unwrap();

        assert_eq!(Operation::Divide, cage.operation());
        assert_eq!(2, cage.target());
    }

    #[test]
    fn non_integral_division_coerced_to_addition() {
        let solution = solution_with_coarse_row();
        let cage = Cage::from_solution(&solution, vec![(0, 1), (1, 1)],
            Operation::Divide, &mut rng()).unwrap();

        assert_eq!(Operation::Add, cage.operation());
        assert_eq!(7, cage.target());
    }

    #[test]
    fn singleton_cage_coerced_to_any_arity_operation() {
        let solution = solution_4x4();

        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let cage = Cage::from_solution(&solution, vec![(2, 2)],
                Operation::Subtract, &mut rng).unwrap();

            assert!(!cage.operation().requires_pair());
            assert_eq!(4, cage.target());
        }
    }

    #[test]
    fn oversized_pair_cage_coerced() {
        let solution = solution_4x4();

        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let cells = vec![(0, 0), (1, 0), (2, 0)];
            let cage = Cage::from_solution(&solution, cells,
                Operation::Divide, &mut rng).unwrap();

            match cage.operation() {
                Operation::Add => assert_eq!(9, cage.target()),
                Operation::Multiply => assert_eq!(24, cage.target()),
                _ => panic!("pair operation on 3-cell cage")
            }
        }
    }

    #[test]
    fn cage_from_invalid_cells() {
        let solution = solution_4x4();

        assert_eq!(Err(CageError::EmptyCage),
            Cage::from_solution(&solution, Vec::new(), Operation::Add,
                &mut rng()));
        assert_eq!(Err(CageError::CellOutOfGrid),
            Cage::from_solution(&solution, vec![(4, 0)], Operation::Add,
                &mut rng()));
    }

    #[test]
    fn operation_symbols() {
        assert_eq!("+", Operation::Add.to_string());
        assert_eq!("×", Operation::Multiply.to_string());
        assert_eq!("-", Operation::Subtract.to_string());
        assert_eq!("÷", Operation::Divide.to_string());
    }

    #[test]
    fn cage_serde_round_trip() {
        let cage = Cage::new(vec![(1, 0), (1, 1)], Operation::Divide, 3)
            .unwrap();
        let json = serde_json::to_string(&cage).unwrap();
        let parsed: Cage = serde_json::from_str(&json).unwrap();

        assert_eq!(cage, parsed);
    }

    #[test]
    fn cage_deserialization_rejects_invalid() {
        let json = "[[[0,0],[0,0]],\"add\",5]";
        assert!(serde_json::from_str::<Cage>(json).is_err());
    }
}
