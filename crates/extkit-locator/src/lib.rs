//! Structural locator for extension-manifest YAML documents.
//!
//! Extension manifests are deeply nested YAML documents whose exact
//! formatting and comments must survive editing. A full parse/serialize
//! round trip would lose both, so this crate deliberately works on raw
//! text: an indentation-driven line scanner answers structural
//! questions ("which blocks enclose this line?", "where does the
//! `screens` block end?", "which list item is the cursor on?") without
//! ever building a YAML AST.
//!
//! Every query is a pure function of the document text. Nothing is
//! cached between calls; the document is expected to mutate between
//! invocations and re-scanning tens to low-thousands of lines is cheap.

pub mod blocks;
pub mod document;
pub mod error;
pub mod scanner;

pub use blocks::{is_datasource_block, KNOWN_TOP_LEVEL_BLOCKS};
pub use document::Document;
pub use error::{Error, Result};
pub use scanner::{
    block_range, document_keys, list_item_index_at_line, parent_blocks_of, BlockRange,
};
