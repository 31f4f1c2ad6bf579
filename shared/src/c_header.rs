//! C header writer

use std::fmt::{self, Display, Write as FmtWrite};

/// Single literal inside a C array initializer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CValue {
    /// Written with three decimal places (`0.500`)
    Float(f32),
    /// Written as a bare decimal integer
    Int(i64),
    /// Written as a lowercase hexadecimal literal (`0x80008000`)
    Hex(u64),
}

impl Display for CValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CValue::Float(v) => write!(f, "{:.3}", v),
            CValue::Int(v) => write!(f, "{}", v),
            CValue::Hex(v) => write!(f, "{:#x}", v),
        }
    }
}

/// Statically initialized array, one logical row of values per output line
#[derive(Debug, Clone, PartialEq)]
pub struct CArray {
    pub c_type: String,
    pub identifier: String,
    pub rows: Vec<Vec<CValue>>,
}

impl CArray {
    pub fn new(c_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            c_type: c_type.into(),
            identifier: identifier.into(),
            rows: Vec::new(),
        }
    }

    pub fn with_rows(mut self, rows: Vec<Vec<CValue>>) -> Self {
        self.rows = rows;
        self
    }

    /// Total number of scalar values across all rows
    pub fn element_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Write the declaration and initializer followed by a blank line.
    ///
    /// Values are prefixed by a single space and separated by commas; rows
    /// are separated by `,` and a newline indented by four spaces.
    pub fn write_to(&self, out: &mut impl FmtWrite) -> fmt::Result {
        write!(out, "{} {}[] = {{\n    ", self.c_type, self.identifier)?;

        let last_row = self.rows.len().saturating_sub(1);
        for (i, row) in self.rows.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    out.write_char(',')?;
                }
                write!(out, " {}", value)?;
            }

            if i == last_row {
                out.write_char('\n')?;
            } else {
                out.write_str(",\n    ")?;
            }
        }

        out.write_str("};\n\n")
    }
}

/// Incremental builder for a generated header file
#[derive(Debug, Default)]
pub struct CHeader {
    output: String,
    guard: Option<String>,
}

impl CHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a header with the "do not edit" banner naming the generator
    pub fn with_banner(generator: &str) -> Result<Self, fmt::Error> {
        let mut header = Self::new();
        writeln!(header.output, "// GENERATED FILE - DO NOT EDIT")?;
        writeln!(header.output, "// Generator: {}", generator)?;
        Ok(header)
    }

    /// Open an include guard; closed by [`CHeader::finish`]
    pub fn guard(&mut self, name: &str) -> fmt::Result {
        writeln!(self.output, "#ifndef {}", name)?;
        writeln!(self.output, "#define {}", name)?;
        self.guard = Some(name.to_string());
        Ok(())
    }

    pub fn include(&mut self, path: &str) -> fmt::Result {
        writeln!(self.output, "#include <{}>", path)
    }

    pub fn define(&mut self, name: &str, value: impl Display) -> fmt::Result {
        writeln!(self.output, "#define {} {}", name, value)
    }

    pub fn const_int(&mut self, name: &str, value: usize) -> fmt::Result {
        writeln!(self.output, "const int {} = {};", name, value)
    }

    pub fn blank_line(&mut self) -> fmt::Result {
        writeln!(self.output)
    }

    pub fn array(&mut self, array: &CArray) -> fmt::Result {
        array.write_to(&mut self.output)
    }

    pub fn finish(mut self) -> Result<String, fmt::Error> {
        if let Some(guard) = self.guard.take() {
            writeln!(self.output, "#endif /* {} */", guard)?;
        }
        Ok(self.output)
    }
}
