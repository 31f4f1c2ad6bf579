//! Bit-position table generator
//!
//! Placement `n` (1-indexed) walks a cursor over successively halved
//! levels: level 0 is the whole row of `cols` columns, level 1 splits it
//! into two halves, and so on. Each placement lands on the right edge of
//! the next unvisited interval of the current level, scanning right to
//! left, which yields the order `32, 16, 24, 8, 28, 20, 12, 4, ...` for
//! 32 columns.

use crate::TableError;

/// Default number of table rows
pub const DEFAULT_ROWS: u32 = 16;

/// Default number of columns (bits per row)
pub const DEFAULT_COLS: u32 = 32;

/// Widest supported row; masks are stored as `u64`
const MAX_COLS: u32 = u64::BITS;

/// Validated table size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDimensions {
    rows: u32,
    cols: u32,
}

impl TableDimensions {
    /// Validate `rows` x `cols`.
    ///
    /// `cols` must be a power of two no wider than 64 and `rows` must lie in
    /// `1..=cols / 2`. The halving rule is only verified up to half the
    /// columns, so larger tables are refused.
    pub fn new(rows: u32, cols: u32) -> Result<Self, TableError> {
        let invalid = |reason| TableError::InvalidDimensions { rows, cols, reason };

        validate_columns(cols).map_err(|_| invalid("columns must be a power of two up to 64"))?;
        if rows == 0 {
            return Err(invalid("table needs at least one row"));
        }
        if rows > cols / 2 {
            return Err(invalid("rows may not exceed half the columns"));
        }

        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }
}

impl Default for TableDimensions {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

fn validate_columns(cols: u32) -> Result<(), TableError> {
    if cols == 0 || cols > MAX_COLS || !cols.is_power_of_two() {
        return Err(TableError::InvalidDimensions {
            rows: 0,
            cols,
            reason: "columns must be a power of two up to 64",
        });
    }
    Ok(())
}

/// Cursor state for one subdivision level.
///
/// `width` is half the interval size at this level and `offset` counts the
/// intervals still to visit to the left of the current one.
#[derive(Debug, Clone, Copy)]
struct Level {
    width: u32,
    offset: u32,
}

impl Level {
    fn start(max_columns: u32) -> Self {
        Self {
            width: max_columns,
            offset: 0,
        }
    }

    /// Step to the next placement, dropping a level once this one is exhausted.
    /// Requires `width > 1` whenever `offset == 0`.
    fn advance(self, max_columns: u32) -> Self {
        let (width, offset) = if self.offset == 0 {
            let width = self.width / 2;
            (width, max_columns / width / 2)
        } else {
            (self.width, self.offset)
        };

        Self {
            width,
            offset: offset - 1,
        }
    }

    /// 1-indexed column of the current placement
    fn position(self) -> u32 {
        self.offset * self.width * 2 + self.width
    }
}

/// Placement for `call_index` with pre-validated inputs
/// (`1 <= call_index <= max_columns`, `max_columns` a power of two).
fn position_of(call_index: u32, max_columns: u32) -> u32 {
    let mut level = Level::start(max_columns);
    for _ in 1..call_index {
        level = level.advance(max_columns);
    }
    level.position()
}

fn mask_of(row_index: u32, cols: u32) -> u64 {
    (1..=row_index).fold(0u64, |mask, call_index| {
        mask | (1u64 << (position_of(call_index, cols) - 1))
    })
}

/// 1-indexed column for the `call_index`-th placement in a row of
/// `max_columns` columns.
pub fn resolve_bit_position(call_index: u32, max_columns: u32) -> Result<u32, TableError> {
    validate_columns(max_columns)?;
    if call_index == 0 || call_index > max_columns {
        return Err(TableError::OutOfRange {
            index: call_index,
            cols: max_columns,
        });
    }
    Ok(position_of(call_index, max_columns))
}

/// Mask for row `row_index`: the first `row_index` placements OR'ed together.
pub fn compute_row_bitmask(row_index: u32, cols: u32) -> Result<u64, TableError> {
    validate_columns(cols)?;
    if row_index > cols {
        return Err(TableError::OutOfRange {
            index: row_index,
            cols,
        });
    }
    Ok(mask_of(row_index, cols))
}

/// Every placement for `cols` columns, in order
pub fn placement_order(cols: u32) -> Result<Vec<u32>, TableError> {
    validate_columns(cols)?;
    Ok((1..=cols).map(|i| position_of(i, cols)).collect())
}

/// Computed table, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchTable {
    dims: TableDimensions,
    masks: Vec<u64>,
}

impl PitchTable {
    pub(crate) fn from_parts(dims: TableDimensions, masks: Vec<u64>) -> Self {
        Self { dims, masks }
    }

    pub fn dims(&self) -> TableDimensions {
        self.dims
    }

    pub fn masks(&self) -> &[u64] {
        &self.masks
    }

    /// Per-row column flags, column 0 being the least significant bit
    pub fn grid(&self) -> Vec<Vec<u8>> {
        self.masks
            .iter()
            .map(|&mask| {
                (0..self.dims.cols)
                    .map(|col| ((mask >> col) & 1) as u8)
                    .collect()
            })
            .collect()
    }
}

/// Build the table for `dims`
pub fn generate(dims: TableDimensions) -> PitchTable {
    let masks = (0..dims.rows)
        .map(|row| {
            let mask = mask_of(row, dims.cols);
            tracing::debug!("row {:2}: {:#x}", row, mask);
            mask
        })
        .collect();

    PitchTable::from_parts(dims, masks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE_16X32: [u64; 16] = [
        0x0, 0x80000000, 0x80008000, 0x80808000, 0x80808080, 0x88808080, 0x88888080, 0x88888880,
        0x88888888, 0xa8888888, 0xaa888888, 0xaaa88888, 0xaaaa8888, 0xaaaaa888, 0xaaaaaa88,
        0xaaaaaaa8,
    ];

    fn all_valid_dims() -> impl Iterator<Item = TableDimensions> {
        (1..=6)
            .map(|shift| 1u32 << shift)
            .flat_map(|cols| (1..=cols / 2).map(move |rows| (rows, cols)))
            .map(|(rows, cols)| TableDimensions::new(rows, cols).unwrap())
    }

    #[test]
    fn test_reference_table() {
        let table = generate(TableDimensions::default());
        assert_eq!(table.masks(), &REFERENCE_16X32);
    }

    #[test]
    fn test_first_placement_is_last_column() {
        assert_eq!(resolve_bit_position(1, 32).unwrap(), 32);
        assert_eq!(resolve_bit_position(2, 32).unwrap(), 16);
        assert_eq!(resolve_bit_position(3, 32).unwrap(), 24);
        assert_eq!(compute_row_bitmask(0, 32).unwrap(), 0);
        assert_eq!(compute_row_bitmask(1, 32).unwrap(), 0x8000_0000);
    }

    #[test]
    fn test_placement_order_small() {
        assert_eq!(placement_order(8).unwrap(), vec![8, 4, 6, 2, 7, 5, 3, 1]);
        assert_eq!(placement_order(1).unwrap(), vec![1]);
        assert_eq!(
            &placement_order(32).unwrap()[..9],
            &[32, 16, 24, 8, 28, 20, 12, 4, 30]
        );
    }

    #[test]
    fn test_placement_order_is_permutation() {
        for shift in 0..=6 {
            let cols = 1u32 << shift;
            let mut order = placement_order(cols).unwrap();
            order.sort_unstable();
            assert_eq!(order, (1..=cols).collect::<Vec<_>>(), "cols={}", cols);
        }
    }

    #[test]
    fn test_row_popcount_matches_row_index() {
        for dims in all_valid_dims() {
            let table = generate(dims);
            for (row, mask) in table.masks().iter().enumerate() {
                assert_eq!(mask.count_ones() as usize, row, "{:?} row {}", dims, row);
            }
        }
    }

    #[test]
    fn test_rows_are_nested() {
        let table = generate(TableDimensions::new(32, 64).unwrap());
        for pair in table.masks().windows(2) {
            assert_eq!(pair[0] & pair[1], pair[0]);
        }
    }

    #[test]
    fn test_generation_is_idempotent() {
        let dims = TableDimensions::new(4, 8).unwrap();
        let first = generate(dims);
        let second = generate(dims);
        assert_eq!(first, second);
        assert_eq!(first.masks(), &[0x0, 0x80, 0x88, 0xa8]);
    }

    #[test]
    fn test_grid_matches_masks() {
        let table = generate(TableDimensions::new(3, 8).unwrap());
        assert_eq!(
            table.grid(),
            vec![
                vec![0, 0, 0, 0, 0, 0, 0, 0],
                vec![0, 0, 0, 0, 0, 0, 0, 1],
                vec![0, 0, 0, 1, 0, 0, 0, 1],
            ]
        );
    }

    #[test]
    fn test_rejects_invalid_dimensions() {
        for (rows, cols) in [(16, 30), (17, 32), (0, 32), (1, 128), (1, 1), (4, 0)] {
            assert!(
                matches!(
                    TableDimensions::new(rows, cols),
                    Err(TableError::InvalidDimensions { .. })
                ),
                "{}x{} should be rejected",
                rows,
                cols
            );
        }
    }

    #[test]
    fn test_rejects_out_of_range_placements() {
        assert!(matches!(
            resolve_bit_position(0, 32),
            Err(TableError::OutOfRange { index: 0, cols: 32 })
        ));
        assert!(matches!(
            resolve_bit_position(33, 32),
            Err(TableError::OutOfRange { index: 33, .. })
        ));
        assert!(matches!(
            compute_row_bitmask(2, 12),
            Err(TableError::InvalidDimensions { .. })
        ));
        assert_eq!(compute_row_bitmask(32, 32).unwrap(), u32::MAX as u64);
    }
}
