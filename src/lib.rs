//! # countersheet
//!
//! Turns a tabular counter definition into positioned game counters tiled
//! across sheets.
//!
//! Pipeline
//!
//! 1. [`tabular`] reads delimited text (delimiter sniffed) into rows of cells.
//! 2. [`definition`] walks the rows: header rows compile into a chain of header
//!    nodes, data rows go through that chain and become [`counter::Counter`]s.
//! 3. [`layout`] greedily packs the counters into rows, boxes and sheets,
//!    asking a [`layout::Renderer`] for the real size of every placement and
//!    mirroring backs for double sided output.
//!
//! The [`template`] module holds the part catalog (geometry, styles and
//! definitions) that both header parsing and the bundled geometry renderer
//! read from. Runtime knobs live in [`config`]; [`datafile`] finds and reads
//! definition files.

pub mod config;
pub mod counter;
pub mod datafile;
pub mod definition;
pub mod error;
pub mod layout;
pub mod tabular;
pub mod template;

pub use counter::Counter;
pub use definition::{parse_rows, DefinitionParser};
pub use error::Error;
pub use layout::{lay_out, LayoutPlan, LayoutSettings};
pub use template::Template;
