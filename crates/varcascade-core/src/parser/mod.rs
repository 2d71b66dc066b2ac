//! CSS tree building.

mod css_parser;

pub use css_parser::{parse_stylesheet, split_top_level, split_top_level_commas};
