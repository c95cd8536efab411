pub mod enrich;
pub mod etl;
pub mod normalize;
pub mod summary;
pub mod transform;

pub use crate::domain::model::{CsvRecord, RawRow};
pub use crate::domain::ports::{ConfigProvider, RowTransformer, Storage};
pub use crate::utils::error::Result;
