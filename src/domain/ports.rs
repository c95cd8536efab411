use crate::config::EtlPaths;
use crate::domain::model::{CsvRecord, RawRow};
use crate::utils::error::Result;

pub trait Storage {
    fn exists(&self, path: &str) -> bool;
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Human-readable location of `path`, used in messages.
    fn locate(&self, path: &str) -> String {
        path.to_string()
    }
}

pub trait ConfigProvider {
    fn data_dir(&self) -> &str;
    fn paths(&self) -> &EtlPaths;
}

/// Turns one raw source row into a normalized record.
pub trait RowTransformer {
    type Output: CsvRecord;

    fn required_fields(&self) -> &'static [&'static str];
    fn transform_row(&self, row: &RawRow) -> Result<Self::Output>;
}
