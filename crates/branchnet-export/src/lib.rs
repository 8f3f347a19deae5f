//! Export serializers for branchnet.
//!
//! A mined [`CommitMap`](branchnet_commit::CommitMap) is written as:
//! - a CSV table ([`CsvExporter`]), one row per commit
//! - a yEd-styled GraphML document ([`GraphmlExporter`]), one node per commit
//!   and one edge per parent link

mod csv;
mod error;
mod exporter;
mod graphml;
mod palette;

pub use csv::CsvExporter;
pub use error::{ExportError, ExportResult};
pub use exporter::{CommitExporter, export_all, output_path};
pub use graphml::GraphmlExporter;
pub use palette::{Color, Palette};
