//! CSV codec: text in, rows out, and back again.
//!
//! The dialect is RFC 4180: comma delimiter, double-quote escaping,
//! mandatory header row, UTF-8 text. Imports are atomic; a single bad
//! record fails the whole parse.

mod codec;
mod error;

pub use codec::{MAX_IMPORT_BYTES, ParsedCsv, parse, parse_with_limit, serialize};
pub use error::{ExportError, ImportError};
