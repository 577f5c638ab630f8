//! SQL building blocks: quoting, clause composition, identifiers and row decoding.

mod builder;
pub mod data_type;
pub mod identifier;
pub mod row;
pub mod tag;
pub use builder::*;
pub use data_type::DataType;
pub use identifier::{AccountObjectIdentifier, DatabaseObjectIdentifier, SchemaObjectIdentifier};
pub use row::{scan, scan_all, Row};
pub use tag::TagAssociation;
