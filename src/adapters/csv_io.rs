//! CSV (de)serialization between raw bytes and rows/records.

use crate::domain::model::{CsvRecord, RawRow};
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Reads a CSV with a header row into raw rows keyed by header name.
pub fn parse_raw_rows(data: &[u8]) -> Result<Vec<RawRow>> {
    let mut reader = csv::Reader::from_reader(data);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record
            .position()
            .map(|p| source_line(data, p.byte()))
            .unwrap_or_default();
        let fields: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        rows.push(RawRow::new(line, fields));
    }

    Ok(rows)
}

// csv 的 position().line() 不計入被略過的空行，改由位元組位置推算實際行號。
// 記錄位置可能落在前一筆的換行或空行上，先跳過這些位元組。
fn source_line(data: &[u8], byte: u64) -> u64 {
    let mut start = usize::try_from(byte).map_or(data.len(), |b| b.min(data.len()));
    start += data[start..]
        .iter()
        .take_while(|&&b| b == b'\r' || b == b'\n')
        .count();
    1 + data[..start].iter().filter(|&&b| b == b'\n').count() as u64
}

pub fn parse_records<T: DeserializeOwned>(data: &[u8]) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_reader(data);
    let records = reader.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;
    Ok(records)
}

/// Renders records with the header always present, even for zero records.
pub fn render_records<T: CsvRecord>(records: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(T::COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer.into_inner().map_err(|e| e.into_error().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::EmployeeRecord;
    use crate::utils::error::EtlError;

    #[test]
    fn test_parse_raw_rows_keeps_line_numbers() {
        let data = b"employee_id,first_name\nE1,ana\n\nE2,\"cy, jr\"\n";
        let rows = parse_raw_rows(data).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line(), 2);
        assert_eq!(rows[0].get("first_name").unwrap(), "ana");
        assert_eq!(rows[1].line(), 4);
        assert_eq!(rows[1].get("first_name").unwrap(), "cy, jr");
    }

    #[test]
    fn test_parse_raw_rows_line_numbers_after_blank_lines_and_multiline_fields() {
        let data = b"employee_id,first_name\r\n\r\n\r\nE1,\"ana\nmaria\"\r\n\r\nE2,bo\r\n";
        let rows = parse_raw_rows(data).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line(), 4);
        assert_eq!(rows[1].line(), 7);
    }

    #[test]
    fn test_parse_raw_rows_rejects_ragged_rows() {
        let data = b"employee_id,first_name\nE1\n";
        assert!(matches!(parse_raw_rows(data), Err(EtlError::CsvError(_))));
    }

    #[test]
    fn test_render_empty_writes_header_only() {
        let data = render_records::<EmployeeRecord>(&[]).unwrap();
        assert_eq!(
            String::from_utf8(data).unwrap(),
            "employee_id,full_name,email,phone,role,hire_date,status,hourly_rate,commission_rate,specialty\r\n"
        );
    }

    #[test]
    fn test_render_then_parse_records() {
        let record = EmployeeRecord {
            employee_id: "E1".into(),
            full_name: "Ana Diaz".into(),
            email: "ana@example.com".into(),
            phone: "(212) 555-0147".into(),
            role: "Stylist".into(),
            hire_date: "2020-02-01".into(),
            status: "Active".into(),
            hourly_rate: "20.00".into(),
            commission_rate: "0.10".into(),
            specialty: "Color, Cuts".into(),
        };

        let data = render_records(std::slice::from_ref(&record)).unwrap();
        let text = String::from_utf8(data.clone()).unwrap();
        assert!(text.contains("\"Color, Cuts\""));

        let parsed: Vec<EmployeeRecord> = parse_records(&data).unwrap();
        assert_eq!(parsed, vec![record]);
    }
}
