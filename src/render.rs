use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::errors::RenderError;
use crate::puzzle::Puzzle;
use crate::search::Assignment;

/// Character drawn for blocked cells.
pub const BLOCK: char = '█';

/// Lay the assigned words out on the grid. Cells no assigned word covers are `None`.
pub fn letter_grid(puzzle: &Puzzle, assignment: &Assignment) -> Vec<Vec<Option<char>>> {
    let mut letters = vec![vec![None; puzzle.width()]; puzzle.height()];

    for (variable_id, word_id) in assignment.iter() {
        let cells = puzzle.variable(variable_id).cell_coords();
        for ((row, col), &c) in cells.into_iter().zip(&puzzle.word(word_id).chars) {
            letters[row][col] = Some(c);
        }
    }

    letters
}

/// Turn the given puzzle and assignment into a rendered string, one line per row, with blocks
/// drawn as `BLOCK` and unfilled cells left blank.
pub fn render_grid(puzzle: &Puzzle, assignment: &Assignment) -> String {
    let letters = letter_grid(puzzle, assignment);

    letters.iter().enumerate().map(|(row, cells)| {
        cells.iter().enumerate().map(|(col, letter)| {
            if puzzle.is_fillable(row, col) {
                letter.unwrap_or(' ')
            } else {
                BLOCK
            }
        }).collect::<String>()
    }).collect::<Vec<_>>().join("\n")
}

/// Side of one grid cell in an image, in pixels.
pub const CELL_SIZE: usize = 100;

/// Width of the dark border drawn around every cell.
pub const CELL_BORDER: usize = 2;

const INTERIOR_SIZE: usize = CELL_SIZE - 2 * CELL_BORDER;

/// Each glyph pixel becomes a `GLYPH_SCALE` x `GLYPH_SCALE` square.
const GLYPH_SCALE: usize = 10;
const GLYPH_WIDTH: usize = 5;
const GLYPH_HEIGHT: usize = 7;

const BLACK: [u8; 3] = [0, 0, 0];
const WHITE: [u8; 3] = [255, 255, 255];

/// 5x7 bitmaps for `A` to `Z`. One byte per row, top row first; bit 4 is the leftmost column.
static GLYPHS: [[u8; GLYPH_HEIGHT]; 26] = [
    [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
    [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
    [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
    [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
    [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
    [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
    [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
    [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
    [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
    [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
    [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
    [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
    [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
    [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
    [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
    [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
    [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
    [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
    [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
    [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
    [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
];

fn glyph(letter: char) -> Option<&'static [u8; GLYPH_HEIGHT]> {
    let letter = letter.to_ascii_uppercase();
    if letter.is_ascii_uppercase() {
        GLYPHS.get((letter as u8 - b'A') as usize)
    } else {
        None
    }
}

/// An 8-bit RGB image of a grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Raster {
    fn filled(width: usize, height: usize, color: [u8; 3]) -> Raster {
        Raster {
            width: width as u32,
            height: height as u32,
            pixels: color.repeat(width * height),
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let offset = 3 * (y as usize * self.width as usize + x as usize);
        [self.pixels[offset], self.pixels[offset + 1], self.pixels[offset + 2]]
    }

    fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize, color: [u8; 3]) {
        let row_len = self.width as usize;
        for row in y..y + height {
            for col in x..x + width {
                let offset = 3 * (row * row_len + col);
                self.pixels[offset..offset + 3].copy_from_slice(&color);
            }
        }
    }
}

/// Draw the grid the way it would be printed: a white square per fillable cell, black blocks and
/// borders, and each assigned letter centered in its cell. Letters outside `A`-`Z` (in either
/// case) are left blank.
pub fn draw_image(puzzle: &Puzzle, assignment: &Assignment) -> Result<Raster, RenderError> {
    let too_large = || RenderError::TooLarge { height: puzzle.height(), width: puzzle.width() };
    let width = puzzle.width().checked_mul(CELL_SIZE).ok_or_else(too_large)?;
    let height = puzzle.height().checked_mul(CELL_SIZE).ok_or_else(too_large)?;
    let byte_len = width.checked_mul(height).and_then(|area| area.checked_mul(3));
    if u32::try_from(width).is_err() || u32::try_from(height).is_err() || byte_len.is_none() {
        return Err(too_large());
    }

    let mut raster = Raster::filled(width, height, BLACK);
    let letters = letter_grid(puzzle, assignment);

    for (row, cells) in letters.iter().enumerate() {
        for (col, letter) in cells.iter().enumerate() {
            if !puzzle.is_fillable(row, col) {
                continue;
            }

            let left = col * CELL_SIZE + CELL_BORDER;
            let top = row * CELL_SIZE + CELL_BORDER;
            raster.fill_rect(left, top, INTERIOR_SIZE, INTERIOR_SIZE, WHITE);

            let bitmap = match letter.and_then(glyph) {
                Some(bitmap) => bitmap,
                None => continue,
            };

            let glyph_left = left + (INTERIOR_SIZE - GLYPH_WIDTH * GLYPH_SCALE) / 2;
            let glyph_top = top + (INTERIOR_SIZE - GLYPH_HEIGHT * GLYPH_SCALE) / 2;
            for (glyph_row, bits) in bitmap.iter().enumerate() {
                for glyph_col in 0..GLYPH_WIDTH {
                    if bits & (0x10 >> glyph_col) != 0 {
                        raster.fill_rect(
                            glyph_left + glyph_col * GLYPH_SCALE,
                            glyph_top + glyph_row * GLYPH_SCALE,
                            GLYPH_SCALE,
                            GLYPH_SCALE,
                            BLACK,
                        );
                    }
                }
            }
        }
    }

    Ok(raster)
}

/// Draw the grid with `draw_image` and write it to `path` as a PNG.
pub fn save_image<P: AsRef<Path>>(
    puzzle: &Puzzle,
    assignment: &Assignment,
    path: P,
) -> Result<(), RenderError> {
    let path = path.as_ref();
    let raster = draw_image(puzzle, assignment)?;

    let encoding_error = |source| RenderError::Encoding { path: path.to_path_buf(), source };

    let file = File::create(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), raster.width, raster.height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header().map_err(encoding_error)?;
    writer.write_image_data(&raster.pixels).map_err(encoding_error)?;
    writer.finish().map_err(encoding_error)?;

    log::debug!("Wrote {}x{} image to {}", raster.width, raster.height, path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use super::{draw_image, letter_grid, render_grid, save_image, BLACK, WHITE};
    use crate::puzzle::{Puzzle, WordList};
    use crate::search::Assignment;

    /// __#
    /// _##
    fn hi_ho_puzzle() -> (Puzzle, Assignment) {
        let puzzle = Puzzle::from_structure_str("__#\n_##\n", WordList::new(["HI", "HO"])).unwrap();
        let mut assignment = Assignment::new(2);
        assignment.assign(0, puzzle.word_list().id_of("HI").unwrap());
        (puzzle, assignment)
    }

    #[test]
    fn test_render_partial_assignment() {
        let (puzzle, mut assignment) = hi_ho_puzzle();

        assert_eq!(letter_grid(&puzzle, &assignment), vec![
            vec![Some('H'), Some('I'), None],
            vec![None, None, None],
        ]);
        assert_eq!(render_grid(&puzzle, &assignment), "HI█\n ██");

        assignment.assign(1, puzzle.word_list().id_of("HO").unwrap());
        assert_eq!(render_grid(&puzzle, &assignment), "HI█\nO██");
    }

    #[test]
    fn test_draw_image_cells_blocks_and_letters() {
        let (puzzle, assignment) = hi_ho_puzzle();

        let raster = draw_image(&puzzle, &assignment).unwrap();

        assert_eq!((raster.width, raster.height), (300, 200));
        assert_eq!(raster.pixels.len(), 300 * 200 * 3);

        // Border, interior corner, and the top of the H's left stroke in the first cell.
        assert_eq!(raster.pixel(0, 0), BLACK);
        assert_eq!(raster.pixel(3, 3), WHITE);
        assert_eq!(raster.pixel(30, 20), BLACK);
        // Middle of the H's top row is open.
        assert_eq!(raster.pixel(50, 20), WHITE);

        // Unfilled fillable cell stays white; blocks are black throughout.
        assert_eq!(raster.pixel(50, 150), WHITE);
        assert_eq!(raster.pixel(250, 50), BLACK);
        assert_eq!(raster.pixel(150, 150), BLACK);
    }

    #[test]
    fn test_save_image_writes_png_of_grid_size() {
        let (puzzle, assignment) = hi_ho_puzzle();
        let path = std::env::temp_dir()
            .join(format!("crossfill-render-{}.png", std::process::id()));

        save_image(&puzzle, &assignment, &path).unwrap();

        let decoder = png::Decoder::new(File::open(&path).unwrap());
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (300, 200));
        assert_eq!(info.color_type, png::ColorType::Rgb);

        std::fs::remove_file(&path).unwrap();
    }
}
