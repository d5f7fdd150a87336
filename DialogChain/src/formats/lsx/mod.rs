//! LSX (XML) format module

mod document;
mod reader;
mod writer;

pub use document::{LsxAttribute, LsxDocument, LsxNode, LsxRegion, LsxVersion};
pub use reader::{parse_lsx, parse_lsx_bytes, read_lsx};
pub use writer::{serialize_lsx, write_lsx};
