pub mod aggregate;
pub mod catalog_filter;
pub mod ledger_editor;
pub mod validate;

pub use aggregate::*;
pub use catalog_filter::*;
pub use ledger_editor::*;
pub use validate::*;
