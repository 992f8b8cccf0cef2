pub mod cascade;
pub mod export;
pub mod form;
pub mod session;
pub mod store;
pub mod table;
pub mod xlsx;

pub use crate::domain::model::{ExportMode, PersonRecord, RegionOption, SubRegionOption};
pub use crate::domain::ports::{GeoCatalog, RecordStorage};
pub use crate::utils::error::Result;
