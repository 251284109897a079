pub mod instruction;

pub use instruction::{parse_batch, parse_line, BatchParseError, ParseError, ParserConfig};
