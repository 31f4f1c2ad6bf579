//! Pitch table header serialization

use anyhow::{Context, Result};
use std::path::Path;
use tablegen_shared::{
    parse_array, parse_define, parse_int_literal, CArray, CHeader, CValue, ParseError,
};

use crate::generator::{PitchTable, TableDimensions};
use crate::TableError;

/// Naming and layout of the generated header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStyle {
    /// C element type of the array
    pub c_type: String,
    /// Array identifier
    pub identifier: String,
    /// Prefix for the `_ROWS` / `_COLS` defines
    pub prefix: String,
    /// Emit the "do not edit" banner
    pub banner: bool,
    /// Wrap the header in `#ifndef` / `#endif`
    pub guard: Option<String>,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            c_type: "unsigned long".to_string(),
            identifier: "pitchTable".to_string(),
            prefix: "PITCH_TABLE".to_string(),
            banner: false,
            guard: None,
        }
    }
}

impl TableStyle {
    fn rows_define(&self) -> String {
        format!("{}_ROWS", self.prefix)
    }

    fn cols_define(&self) -> String {
        format!("{}_COLS", self.prefix)
    }
}

/// Render `table` as header text
pub fn render_table(table: &PitchTable, style: &TableStyle) -> Result<String, TableError> {
    let mut header = if style.banner {
        CHeader::with_banner("tools/pitch-table")?
    } else {
        CHeader::new()
    };
    if let Some(guard) = &style.guard {
        header.guard(guard)?;
    }

    let dims = table.dims();
    header.blank_line()?;
    header.define(&style.rows_define(), dims.rows())?;
    header.define(&style.cols_define(), dims.cols())?;
    header.blank_line()?;

    let rows = table.masks().iter().map(|&m| vec![CValue::Hex(m)]).collect();
    let array = CArray::new(style.c_type.as_str(), style.identifier.as_str()).with_rows(rows);
    header.array(&array)?;

    Ok(header.finish()?)
}

/// Render and write `table` to `path`
pub fn write_table(path: &Path, table: &PitchTable, style: &TableStyle) -> Result<()> {
    let text = render_table(table, style).context("Failed to render pitch table")?;
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write pitch table to {}", path.display()))?;

    tracing::info!(
        "Wrote {}x{} pitch table to {}",
        table.dims().rows(),
        table.dims().cols(),
        path.display()
    );
    Ok(())
}

/// Read a generated header back into a table
pub fn parse_table(text: &str, style: &TableStyle) -> Result<PitchTable, TableError> {
    let read_define = |name: String| -> Result<u32, TableError> {
        let value = parse_define(text, &name)
            .ok_or_else(|| TableError::Malformed(format!("missing #define {}", name)))?;
        value
            .parse()
            .map_err(|_| TableError::Malformed(format!("{} is not a number: '{}'", name, value)))
    };

    let rows = read_define(style.rows_define())?;
    let cols = read_define(style.cols_define())?;
    let dims = TableDimensions::new(rows, cols)?;

    let masks = parse_array(text, &style.identifier)?
        .iter()
        .map(|token| {
            parse_int_literal(token)
                .ok_or_else(|| TableError::from(ParseError::InvalidValue(token.clone())))
        })
        .collect::<Result<Vec<u64>, TableError>>()?;

    if masks.len() != rows as usize {
        return Err(TableError::Malformed(format!(
            "{} declares {} rows but holds {}",
            style.identifier,
            rows,
            masks.len()
        )));
    }

    // Bits past the last column cannot come from any placement
    if let Some(row) = masks.iter().position(|&m| cols < u64::BITS && m >> cols != 0) {
        return Err(TableError::Malformed(format!(
            "{} row {} sets a bit at or above column {}: {:#x}",
            style.identifier, row, cols, masks[row]
        )));
    }

    Ok(PitchTable::from_parts(dims, masks))
}
