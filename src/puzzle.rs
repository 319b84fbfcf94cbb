use std::fmt;
use std::fs;
use std::ops::Range;
use std::path::Path;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::errors::PuzzleError;

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;

/// An identifier for a variable, based on its index in the puzzle's `variables` field. This is
/// also the declaration order used to break ties during search.
pub type VariableId = usize;

/// An identifier for a word, based on its index in the puzzle's `WordList`.
pub type WordId = usize;

/// Zero-indexed (row, col) coords for a cell in the grid, where row 0 is the top row.
pub type GridCoord = (usize, usize);

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Across => write!(f, "across"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A slot in the grid that needs a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    pub row: usize,
    pub col: usize,
    pub length: usize,
    pub direction: Direction,
}

impl Variable {
    pub fn new(row: usize, col: usize, direction: Direction, length: usize) -> Variable {
        Variable { row, col, length, direction }
    }

    /// Generate the coords for each cell of this variable, in word order.
    pub fn cell_coords(&self) -> SmallVec<[GridCoord; MAX_SLOT_LENGTH]> {
        (0..self.length).map(|cell_idx| {
            match self.direction {
                Direction::Across => (self.row, self.col + cell_idx),
                Direction::Down => (self.row + cell_idx, self.col),
            }
        }).collect()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {} : {}", self.row, self.col, self.direction, self.length)
    }
}

/// A candidate word. `chars` is what the constraints compare; `string` is kept for output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub string: String,
    pub chars: SmallVec<[char; MAX_SLOT_LENGTH]>,
}

impl Word {
    fn new(string: String) -> Word {
        let chars = string.chars().collect();
        Word { string, chars }
    }

    /// Length in characters, which is what a variable's length is measured in.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string)
    }
}

/// The full set of candidate words, deduplicated and sorted by (length, text) so that word ids and
/// every iteration over them are deterministic.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: Vec<Word>,
    ids_by_string: FxHashMap<String, WordId>,
}

impl WordList {
    /// Build a word list from the given strings, keeping them exactly as given.
    pub fn new<I, S>(words: I) -> WordList
        where
            I: IntoIterator<Item=S>,
            S: Into<String>,
    {
        let mut strings: Vec<String> = words.into_iter().map(Into::into).collect();

        // `dedup` only removes adjacent duplicates, so sort alphabetically first.
        strings.sort();
        strings.dedup();
        strings.sort_by_cached_key(|word| word.chars().count());

        let words: Vec<Word> = strings.into_iter().map(Word::new).collect();
        let ids_by_string = words.iter()
            .enumerate()
            .map(|(word_id, word)| (word.string.clone(), word_id))
            .collect();

        WordList { words, ids_by_string }
    }

    /// Parse a word file: one word per line, surrounding whitespace and blank lines ignored, every
    /// entry upper-cased.
    pub fn parse_from_str(contents: &str) -> WordList {
        WordList::new(
            contents.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_uppercase)
        )
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<WordList, PuzzleError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| PuzzleError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let word_list = WordList::parse_from_str(&contents);
        log::debug!("Loaded {} words from {}", word_list.len(), path.display());

        Ok(word_list)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }

    pub fn id_of(&self, word: &str) -> Option<WordId> {
        self.ids_by_string.get(word).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item=&Word> + '_ {
        self.words.iter()
    }
}

/// A crossing between one variable and another: this variable's `cell` is the same grid cell as
/// the other variable's `other_cell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub other_variable_id: VariableId,
    pub cell: usize,
    pub other_cell: usize,
}

/// Everything about a crossword that stays fixed while solving: the grid, its variables, how they
/// overlap, and the word list.
#[derive(Debug, Clone)]
pub struct Puzzle {
    height: usize,
    width: usize,
    fillable: Vec<Vec<bool>>,
    variables: Vec<Variable>,

    /// Crossings for each variable, sorted by the other variable's id.
    crossings: Vec<SmallVec<[Crossing; MAX_SLOT_LENGTH]>>,

    words: WordList,
}

impl Puzzle {
    /// Build a puzzle from a structure string with `_` for fillable cells and anything else for
    /// blocks. Rows may be ragged; the grid is as wide as its longest row.
    pub fn from_structure_str(structure: &str, words: WordList) -> Result<Puzzle, PuzzleError> {
        let mut rows: Vec<&str> = structure.lines()
            .map(|line| line.trim_end_matches('\r'))
            .collect();

        // Empty lines before and after the grid are formatting, not rows. A line of spaces is a
        // row of blocks.
        while rows.last().map_or(false, |row| row.is_empty()) {
            rows.pop();
        }
        let leading_blank_rows = rows.iter().take_while(|row| row.is_empty()).count();
        rows.drain(..leading_blank_rows);

        let height = rows.len();
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(PuzzleError::EmptyStructure);
        }

        let fillable: Vec<Vec<bool>> = rows.iter().map(|row| {
            let mut cells: Vec<bool> = row.chars().map(|c| c == '_').collect();
            cells.resize(width, false);
            cells
        }).collect();

        let mut variables: Vec<Variable> = vec![];
        for row in 0..height {
            for col in 0..width {
                if !fillable[row][col] {
                    continue;
                }

                if col == 0 || !fillable[row][col - 1] {
                    let length = (col..width).take_while(|&c| fillable[row][c]).count();
                    if length > 1 {
                        variables.push(Variable::new(row, col, Direction::Across, length));
                    }
                }

                if row == 0 || !fillable[row - 1][col] {
                    let length = (row..height).take_while(|&r| fillable[r][col]).count();
                    if length > 1 {
                        variables.push(Variable::new(row, col, Direction::Down, length));
                    }
                }
            }
        }

        Puzzle::build(height, width, fillable, variables, words)
    }

    /// Build a puzzle from an explicit list of variables. The fillable cells are exactly the cells
    /// covered by some variable.
    pub fn from_variables(
        height: usize,
        width: usize,
        variables: Vec<Variable>,
        words: WordList,
    ) -> Result<Puzzle, PuzzleError> {
        let mut fillable = vec![vec![false; width]; height];

        for variable in &variables {
            if variable.length == 0 {
                return Err(PuzzleError::ZeroLengthVariable { variable: *variable });
            }

            // Checked before `cell_coords`, which would overflow for a start near `usize::MAX`.
            let (start, limit, cross, cross_limit) = match variable.direction {
                Direction::Across => (variable.col, width, variable.row, height),
                Direction::Down => (variable.row, height, variable.col, width),
            };
            let out_of_bounds = cross >= cross_limit
                || start.checked_add(variable.length).map_or(true, |end| end > limit);
            if out_of_bounds {
                return Err(PuzzleError::VariableOutOfBounds { variable: *variable, height, width });
            }

            for (row, col) in variable.cell_coords() {
                fillable[row][col] = true;
            }
        }

        Puzzle::build(height, width, fillable, variables, words)
    }

    /// Read a structure file and a word file from disk.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        structure_path: P,
        words_path: Q,
    ) -> Result<Puzzle, PuzzleError> {
        let structure_path = structure_path.as_ref();
        let structure = fs::read_to_string(structure_path).map_err(|source| PuzzleError::Io {
            path: structure_path.to_path_buf(),
            source,
        })?;

        let words = WordList::load_from_path(words_path)?;
        Puzzle::from_structure_str(&structure, words)
    }

    fn build(
        height: usize,
        width: usize,
        fillable: Vec<Vec<bool>>,
        variables: Vec<Variable>,
        words: WordList,
    ) -> Result<Puzzle, PuzzleError> {
        if words.is_empty() {
            return Err(PuzzleError::EmptyWordList);
        }

        // Map each cell to the (variable id, cell index within variable) pairs covering it, which
        // we can then use to calculate crossings.
        let mut entries_by_loc: FxHashMap<GridCoord, SmallVec<[(VariableId, usize); 2]>> =
            FxHashMap::default();
        for (variable_id, variable) in variables.iter().enumerate() {
            for (cell_idx, loc) in variable.cell_coords().into_iter().enumerate() {
                entries_by_loc.entry(loc).or_default().push((variable_id, cell_idx));
            }
        }

        let mut crossings: Vec<SmallVec<[Crossing; MAX_SLOT_LENGTH]>> =
            variables.iter().map(|_| SmallVec::new()).collect();

        for entries in entries_by_loc.values() {
            for &(variable_id, cell) in entries {
                for &(other_variable_id, other_cell) in entries {
                    if other_variable_id == variable_id {
                        continue;
                    }

                    let variable_crossings = &mut crossings[variable_id];
                    if variable_crossings.iter().any(|c| c.other_variable_id == other_variable_id) {
                        return Err(PuzzleError::MultipleOverlaps {
                            first: variables[variable_id.min(other_variable_id)],
                            second: variables[variable_id.max(other_variable_id)],
                        });
                    }
                    variable_crossings.push(Crossing { other_variable_id, cell, other_cell });
                }
            }
        }

        // Hash map iteration order is arbitrary; neighbor order must not be.
        for variable_crossings in &mut crossings {
            variable_crossings.sort_by_key(|crossing| crossing.other_variable_id);
        }

        log::debug!(
            "Built {}x{} puzzle with {} variables and {} words",
            height, width, variables.len(), words.len(),
        );

        Ok(Puzzle { height, width, fillable, variables, crossings, words })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_fillable(&self, row: usize, col: usize) -> bool {
        self.fillable.get(row).and_then(|cells| cells.get(col)).copied().unwrap_or(false)
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, variable_id: VariableId) -> &Variable {
        &self.variables[variable_id]
    }

    pub fn variable_ids(&self) -> Range<VariableId> {
        0..self.variables.len()
    }

    pub fn variable_id(&self, variable: &Variable) -> Option<VariableId> {
        self.variables.iter().position(|v| v == variable)
    }

    pub fn crossings(&self, variable_id: VariableId) -> &[Crossing] {
        &self.crossings[variable_id]
    }

    /// Variables sharing a cell with the given one, in declaration order.
    pub fn neighbors(&self, variable_id: VariableId) -> impl Iterator<Item=VariableId> + '_ {
        self.crossings[variable_id].iter().map(|crossing| crossing.other_variable_id)
    }

    /// If `x` and `y` cross, return `(i, j)` such that character `i` of `x`'s word must equal
    /// character `j` of `y`'s word.
    pub fn overlap(&self, x: VariableId, y: VariableId) -> Option<(usize, usize)> {
        self.crossings[x].iter()
            .find(|crossing| crossing.other_variable_id == y)
            .map(|crossing| (crossing.cell, crossing.other_cell))
    }

    pub fn word_list(&self) -> &WordList {
        &self.words
    }

    pub fn word(&self, word_id: WordId) -> &Word {
        self.words.get(word_id)
    }
}
