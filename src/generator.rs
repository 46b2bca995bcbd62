//! This module contains logic for generating random KenKen puzzles.
//!
//! Generation is done in two phases: first a full Latin square solution is
//! built by randomized backtracking, then the grid is partitioned into
//! connected [Cage]s whose density is controlled by a [Difficulty].

use crate::{KenkenGrid, Puzzle, index};
use crate::cage::{Cage, Operation};
use crate::error::KenkenResult;

use rand::Rng;
use rand::rngs::ThreadRng;

use serde::{Deserialize, Serialize};

use std::collections::VecDeque;

/// The difficulty of a generated puzzle. It is a coarse heuristic that only
/// controls the density of the cage partition: harder puzzles are cut into
/// more, and therefore smaller, cages.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {

    /// Aims for `floor(size * 1.5)` seeded cages.
    Easy,

    /// Aims for `floor(size * 2)` seeded cages.
    Medium,

    /// Aims for `floor(size * 2.5)` seeded cages.
    Hard
}

impl Difficulty {

    /// Parses a difficulty from its lowercase name (`"easy"`, `"medium"`, or
    /// `"hard"`). Unknown names fall back to [Difficulty::Easy].
    pub fn from_name(name: &str) -> Difficulty {
        match name {
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Easy
        }
    }

    /// The number of cages the seeding phase of the partitioner aims for.
    /// This is only a target: the actual number of cages in a puzzle may be
    /// lower, since colliding seeds are skipped, or higher, since gap
    /// filling creates additional cages.
    fn cage_count(self, size: usize) -> usize {
        match self {
            Difficulty::Easy => size * 3 / 2,
            Difficulty::Medium => size * 2,
            Difficulty::Hard => size * 5 / 2
        }
    }
}

impl Default for Difficulty {
    fn default() -> Difficulty {
        Difficulty::Easy
    }
}

/// A generator randomly generates complete KenKen [Puzzle]s: a full Latin
/// square solution, a cage partition consistent with it, and an empty player
/// board. It uses a random number generator to decide the content. For most
/// cases, sensible defaults are provided by [Generator::new_default].
pub struct Generator<R: Rng> {
    rng: R
}

impl Generator<ThreadRng> {

    /// Creates a new generator that uses a [ThreadRng] to generate the
    /// random digits and cages.
    pub fn new_default() -> Generator<ThreadRng> {
        Generator::new(rand::thread_rng())
    }
}

pub(crate) fn shuffle<T>(rng: &mut impl Rng, values: impl Iterator<Item = T>)
        -> Vec<T> {
    let mut vec: Vec<T> = values.collect();
    let len = vec.len();

    for i in 0..(len - 1) {
        let j = rng.gen_range(i..len);
        vec.swap(i, j);
    }

    vec
}

fn is_legal(grid: &KenkenGrid, column: usize, row: usize, number: usize)
        -> bool {
    let size = grid.size();

    for other_column in 0..size {
        if grid.has_number(other_column, row, number).unwrap() {
            return false;
        }
    }

    for other_row in 0..size {
        if grid.has_number(column, other_row, number).unwrap() {
            return false;
        }
    }

    true
}

fn neighbors(column: usize, row: usize, size: usize) -> Vec<(usize, usize)> {
    let mut neighbors = Vec::with_capacity(4);

    if column + 1 < size {
        neighbors.push((column + 1, row));
    }

    if row + 1 < size {
        neighbors.push((column, row + 1));
    }

    if column > 0 {
        neighbors.push((column - 1, row));
    }

    if row > 0 {
        neighbors.push((column, row - 1));
    }

    neighbors
}

impl<R: Rng> Generator<R> {

    /// Creates a new generator that uses the given random number generator
    /// to generate random digits and cages.
    pub fn new(rng: R) -> Generator<R> {
        Generator {
            rng
        }
    }

    fn fill_rec(&mut self, grid: &mut KenkenGrid, column: usize, row: usize)
            -> bool {
        let size = grid.size();

        if row == size {
            return true;
        }

        let next_column = (column + 1) % size;
        let next_row =
            if next_column == 0 { row + 1 } else { row };

        for number in shuffle(&mut self.rng, 1..=size) {
            if is_legal(grid, column, row, number) {
                grid.set_cell(column, row, number).unwrap();

                if self.fill_rec(grid, next_column, next_row) {
                    return true;
                }

                grid.clear_cell(column, row).unwrap();
            }
        }

        false
    }

    /// Builds a random Latin square of the given size, that is, a full
    /// [KenkenGrid] in which every row and every column is a permutation of
    /// `1..=size`. Cells are filled in row-major order by backtracking, with
    /// the candidate digits shuffled at every cell, so repeated calls
    /// produce different squares.
    ///
    /// # Arguments
    ///
    /// * `size`: The number of rows and columns of the grid. Must be greater
    /// than 1.
    ///
    /// # Errors
    ///
    /// If `size` is invalid (less than 2). In that case,
    /// `KenkenError::InvalidSize` is returned.
    pub fn build_latin_square(&mut self, size: usize)
            -> KenkenResult<KenkenGrid> {
        let mut grid = KenkenGrid::new(size)?;
        let filled = self.fill_rec(&mut grid, 0, 0);

        // An empty grid with only row and column constraints always has a
        // completion, so backtracking cannot fail here.
        debug_assert!(filled, "backtracking failed on an empty grid");

        Ok(grid)
    }

    fn grow_cage(&mut self, solution: &KenkenGrid, visited: &mut [bool],
            start_column: usize, start_row: usize) -> Cage {
        let size = solution.size();
        let max_cells = size.min(4);
        let mut cells = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back((start_column, start_row));

        while cells.len() < max_cells {
            let (column, row) = match queue.pop_front() {
                Some(cell) => cell,
                None => break
            };

            // The queue may contain cells that a previous iteration already
            // claimed for this cage.
            if visited[index(column, row, size)] {
                continue;
            }

            visited[index(column, row, size)] = true;
            cells.push((column, row));

            for &(n_column, n_row) in &neighbors(column, row, size) {
                if !visited[index(n_column, n_row, size)] {
                    queue.push_back((n_column, n_row));
                }
            }
        }

        let operation = Operation::random(&mut self.rng);

        // The cells are non-empty, unique, and inside the full solution grid
        // by construction, so the factory cannot fail.
        let cage =
            Cage::from_solution(solution, cells, operation, &mut self.rng)
                .unwrap();

        debug_assert!(cage.is_connected(), "grown cage is disconnected");

        cage
    }

    /// Partitions the given solution grid into [Cage]s, assigning each an
    /// operation and computing its target from the solution digits. The
    /// produced cages exactly tile the grid: every cell belongs to exactly
    /// one cage, and each cage is internally connected under 4-neighbor
    /// adjacency.
    ///
    /// The partition happens in two phases. First, random unvisited seed
    /// cells are grown into cages by bounded breadth-first search, capping
    /// cage sizes at `min(4, size)`; the number of seeding attempts is
    /// determined by the `difficulty`, with attempts hitting an already
    /// visited cell skipped. Second, the grid is scanned in row-major order
    /// and any still unvisited cell is grown into another cage the same way,
    /// which guarantees a full tiling.
    ///
    /// # Arguments
    ///
    /// * `solution`: The solved grid to partition. Must be full.
    /// * `difficulty`: The [Difficulty] controlling the cage density.
    pub fn partition(&mut self, solution: &KenkenGrid,
            difficulty: Difficulty) -> Vec<Cage> {
        let size = solution.size();
        let mut visited = vec![false; size * size];
        let mut cages = Vec::new();

        for _ in 0..difficulty.cage_count(size) {
            let start_column = self.rng.gen_range(0..size);
            let start_row = self.rng.gen_range(0..size);

            if !visited[index(start_column, start_row, size)] {
                cages.push(self.grow_cage(solution, &mut visited,
                    start_column, start_row));
            }
        }

        for row in 0..size {
            for column in 0..size {
                if !visited[index(column, row, size)] {
                    cages.push(
                        self.grow_cage(solution, &mut visited, column, row));
                }
            }
        }

        cages
    }

    /// Generates a new random KenKen [Puzzle] of the given size: a hidden
    /// Latin square solution, a cage partition consistent with it, and an
    /// empty player board.
    ///
    /// It is guaranteed that
    /// [check_rules](crate::validator::check_rules) on the solution and
    /// cages of the result returns `true`.
    ///
    /// # Arguments
    ///
    /// * `size`: The number of rows and columns of the puzzle. Must be
    /// greater than 1.
    /// * `difficulty`: The [Difficulty] controlling the cage density.
    ///
    /// # Errors
    ///
    /// If `size` is invalid (less than 2). In that case,
    /// `KenkenError::InvalidSize` is returned.
    pub fn generate(&mut self, size: usize, difficulty: Difficulty)
            -> KenkenResult<Puzzle> {
        let solution = self.build_latin_square(size)?;
        let cages = self.partition(&solution, difficulty);
        Puzzle::new(solution, cages)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    use crate::cage::calculate_cage_result;
    use crate::error::KenkenError;
    use crate::validator::check_rules;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use std::collections::HashSet;

    fn generator(seed: u64) -> Generator<ChaCha8Rng> {
        Generator::new(ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn shuffling_uniformly_distributed() {
        // 18000 experiments, 6 options (3!), so if uniformly distributed:
        // p = 1/6, my = 3000, sigma = sqrt(18000 * 1/6 * 5/6) = 50
        // with a probability of the amount being in the range [2600, 3400]
        // is more than 99,9999999999999 %.

        let mut counts = [0; 6];
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..18000 {
            let result = shuffle(&mut rng, 1..=3);

            if result == vec![1, 2, 3] {
                counts[0] += 1;
            }
            else if result == vec![1, 3, 2] {
                counts[1] += 1;
            }
            else if result == vec![2, 1, 3] {
                counts[2] += 1;
            }
            else if result == vec![2, 3, 1] {
                counts[3] += 1;
            }
            else if result == vec![3, 1, 2] {
                counts[4] += 1;
            }
            else if result == vec![3, 2, 1] {
                counts[5] += 1;
            }
        }

        for count in counts.iter() {
            assert!(*count >= 2600 && *count <= 3400,
                "Count is not in range [2600, 3400].");
        }
    }

    #[test]
    fn invalid_size_rejected() {
        let mut generator = generator(0);

        assert_eq!(Err(KenkenError::InvalidSize),
            generator.build_latin_square(0));
        assert_eq!(Err(KenkenError::InvalidSize),
            generator.build_latin_square(1));
        assert_eq!(Err(KenkenError::InvalidSize),
            generator.generate(1, Difficulty::Easy));
    }

    fn assert_latin_square(grid: &KenkenGrid) {
        let size = grid.size();

        for i in 0..size {
            let mut row_digits = HashSet::new();
            let mut column_digits = HashSet::new();

            for j in 0..size {
                if let Some(number) = grid.get_cell(j, i).unwrap() {
                    assert!(number >= 1 && number <= size);
                    row_digits.insert(number);
                }

                if let Some(number) = grid.get_cell(i, j).unwrap() {
                    column_digits.insert(number);
                }
            }

            assert_eq!(size, row_digits.len(),
                "Row {} is not a permutation.", i);
            assert_eq!(size, column_digits.len(),
                "Column {} is not a permutation.", i);
        }
    }

    #[test]
    fn latin_square_rows_and_columns_are_permutations() {
        for size in 2..=9 {
            let mut generator = generator(size as u64);
            let grid = generator.build_latin_square(size).unwrap();

            assert!(grid.is_full());
            assert_latin_square(&grid);
        }
    }

    #[test]
    fn generation_is_deterministic_for_equal_seeds() {
        let puzzle_1 =
            generator(123).generate(6, Difficulty::Medium).unwrap();
        let puzzle_2 =
            generator(123).generate(6, Difficulty::Medium).unwrap();

        assert_eq!(puzzle_1, puzzle_2);
    }

    #[test]
    fn cages_tile_the_grid() {
        for seed in 0..10 {
            let mut generator = generator(seed);
            let solution = generator.build_latin_square(6).unwrap();
            let cages = generator.partition(&solution, Difficulty::Hard);

            let mut covered = HashSet::new();
            let mut total = 0;

            for cage in &cages {
                for &cell in cage.cells() {
                    assert!(cell.0 < 6 && cell.1 < 6);
                    assert!(covered.insert(cell),
                        "Cell covered by two cages.");
                    total += 1;
                }
            }

            assert_eq!(36, total, "Cages do not cover the full grid.");
        }
    }

    #[test]
    fn cages_are_bounded_and_connected() {
        for seed in 0..10 {
            let mut generator = generator(seed);
            let solution = generator.build_latin_square(5).unwrap();
            let cages = generator.partition(&solution, Difficulty::Easy);

            for cage in &cages {
                assert!(!cage.cells().is_empty());
                assert!(cage.cells().len() <= 4);
                assert!(cage.is_connected());
            }
        }
    }

    #[test]
    fn pair_operations_only_on_pair_cages() {
        for seed in 0..10 {
            let mut generator = generator(seed);
            let puzzle = generator.generate(7, Difficulty::Medium).unwrap();

            for cage in puzzle.cages() {
                if cage.operation().requires_pair() {
                    assert_eq!(2, cage.cells().len());
                }
            }
        }
    }

    #[test]
    fn cage_targets_match_solution() {
        for seed in 0..10 {
            let mut generator = generator(seed);
            let puzzle = generator.generate(6, Difficulty::Hard).unwrap();

            for cage in puzzle.cages() {
                let values: Vec<usize> = cage.cells().iter()
                    .map(|&(column, row)|
                        puzzle.solution().get_cell(column, row).unwrap()
                            .unwrap())
                    .collect();

                assert_eq!(Some(cage.target()),
                    calculate_cage_result(cage.operation(), &values));
            }
        }
    }

    #[test]
    fn generated_puzzle_solution_passes_validation() {
        for seed in 0..10 {
            let mut generator = generator(seed);
            let puzzle = generator.generate(4, Difficulty::Easy).unwrap();

            assert!(puzzle.board().is_empty());
            assert!(puzzle.solution().is_full());
            assert!(check_rules(puzzle.solution(), puzzle.cages()));
        }
    }

    #[test]
    fn smallest_supported_size_generates() {
        let mut generator = generator(7);
        let puzzle = generator.generate(2, Difficulty::Hard).unwrap();

        assert_eq!(2, puzzle.size());
        assert_latin_square(puzzle.solution());
        assert!(check_rules(puzzle.solution(), puzzle.cages()));
    }

    #[test]
    fn difficulty_from_name() {
        assert_eq!(Difficulty::Easy, Difficulty::from_name("easy"));
        assert_eq!(Difficulty::Medium, Difficulty::from_name("medium"));
        assert_eq!(Difficulty::Hard, Difficulty::from_name("hard"));

        // Unknown names fall back to the easy cage density.
        assert_eq!(Difficulty::Easy, Difficulty::from_name("nightmare"));
        assert_eq!(Difficulty::Easy, Difficulty::default());
    }

    #[test]
    fn difficulty_controls_cage_target_count() {
        assert_eq!(6, Difficulty::Easy.cage_count(4));
        assert_eq!(8, Difficulty::Medium.cage_count(4));
        assert_eq!(10, Difficulty::Hard.cage_count(4));
        assert_eq!(13, Difficulty::Easy.cage_count(9));
        assert_eq!(22, Difficulty::Hard.cage_count(9));
    }
}
