//! Workbook decoding.

use std::collections::HashMap;
use std::io::Read;

use csv::ReaderBuilder;

use super::{SheetError, SheetResult};

/// One decoded data row: header → trimmed, non-empty cell value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
    cells: HashMap<String, String>,
}

impl SheetRow {
    /// Look up a cell under a single header name.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells.get(header).map(String::as_str)
    }

    /// Look up a cell under the display label first, then the snake_case key.
    pub fn field(&self, label: &str, key: &str) -> Option<&str> {
        self.get(label).or_else(|| self.get(key))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            cells: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Decode a workbook into its data rows (everything after the header row).
///
/// Fails on a missing header row or any malformed record; a bad file never
/// yields a partial batch.
pub fn decode<R: Read>(reader: R) -> SheetResult<Vec<SheetRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(SheetError::Empty);
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut cells = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            if let Some(value) = record.get(idx) {
                let value = value.trim();
                if !value.is_empty() {
                    cells.insert(header.to_string(), value.to_string());
                }
            }
        }
        rows.push(SheetRow { cells });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_basic() {
        let data = "Nama Obat,Jumlah Digunakan\nAmoxicillin,10\nVitamin B,5\n";
        let rows = decode(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Nama Obat"), Some("Amoxicillin"));
        assert_eq!(rows[1].get("Jumlah Digunakan"), Some("5"));
    }

    #[test]
    fn test_decode_accepts_either_header_convention() {
        let labeled = "Nama Obat\nAmoxicillin\n";
        let rows = decode(labeled.as_bytes()).unwrap();
        assert_eq!(rows[0].field("Nama Obat", "medicine_name"), Some("Amoxicillin"));

        let keyed = "medicine_name\nAmoxicillin\n";
        let rows = decode(keyed.as_bytes()).unwrap();
        assert_eq!(rows[0].field("Nama Obat", "medicine_name"), Some("Amoxicillin"));
    }

    #[test]
    fn test_decode_trims_and_drops_blank_cells() {
        let data = "a,b\n  x  ,\n";
        let rows = decode(data.as_bytes()).unwrap();
        assert_eq!(rows[0].get("a"), Some("x"));
        assert_eq!(rows[0].get("b"), None);
    }

    #[test]
    fn test_decode_all_blank_row_is_empty() {
        let data = "a,b\n , \n";
        let rows = decode(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_empty());
    }

    #[test]
    fn test_decode_empty_input() {
        let result = decode("".as_bytes());
        assert!(matches!(result, Err(SheetError::Empty)));
    }

    #[test]
    fn test_decode_short_rows_tolerated() {
        let data = "a,b,c\n1,2\n";
        let rows = decode(data.as_bytes()).unwrap();
        assert_eq!(rows[0].get("b"), Some("2"));
        assert_eq!(rows[0].get("c"), None);
    }

    #[test]
    fn test_decode_malformed_fails_whole_batch() {
        // Non-UTF-8 bytes make the record unreadable
        let data: &[u8] = b"a,b\n\xff\xfe,2\n1,2\n";
        assert!(decode(data).is_err());
    }
}
