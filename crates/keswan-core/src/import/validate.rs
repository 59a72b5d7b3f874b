//! Row validation for batch imports.

use crate::sheet::SheetRow;

/// Expected shape of one column's value.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Free text
    Text,
    /// Whole number > 0
    PositiveInt,
    /// ISO calendar date (YYYY-MM-DD)
    Date,
    /// One of a fixed set of values
    OneOf(&'static [&'static str]),
}

/// Validation rule for one column; lookups use the dual header convention.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub label: &'static str,
    pub key: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldRule {
    pub const fn required(label: &'static str, key: &'static str, kind: FieldKind) -> Self {
        Self { label, key, required: true, kind }
    }

    pub const fn optional(label: &'static str, key: &'static str, kind: FieldKind) -> Self {
        Self { label, key, required: false, kind }
    }
}

/// Validate one decoded row. `row_num` is the 1-based workbook row (the
/// header is row 1, so the first data row reports as row 2).
pub fn validate_row(row: &SheetRow, rules: &[FieldRule], row_num: usize) -> Vec<String> {
    let mut errors = Vec::new();

    for rule in rules {
        let value = row.field(rule.label, rule.key);

        let value = match value {
            Some(v) => v,
            None => {
                if rule.required {
                    errors.push(format!(
                        "row {}: missing required field '{}'",
                        row_num, rule.label
                    ));
                }
                continue;
            }
        };

        match rule.kind {
            FieldKind::Text => {}
            FieldKind::PositiveInt => match value.parse::<i64>() {
                Ok(n) if n > 0 => {}
                _ => errors.push(format!(
                    "row {}: '{}' must be a positive whole number (got '{}')",
                    row_num, rule.label, value
                )),
            },
            FieldKind::Date => {
                if value.parse::<chrono::NaiveDate>().is_err() {
                    errors.push(format!(
                        "row {}: '{}' must be an ISO date YYYY-MM-DD (got '{}')",
                        row_num, rule.label, value
                    ));
                }
            }
            FieldKind::OneOf(allowed) => {
                if !allowed.contains(&value) {
                    errors.push(format!(
                        "row {}: '{}' must be one of [{}] (got '{}')",
                        row_num,
                        rule.label,
                        allowed.join(", "),
                        value
                    ));
                }
            }
        }
    }

    errors
}

/// Validate an entire decoded batch before any write is attempted.
///
/// Runs over every row and collects every error; the import step only
/// proceeds when the returned list is empty.
pub fn validate_batch(rows: &[SheetRow], rules: &[FieldRule]) -> Vec<String> {
    rows.iter()
        .enumerate()
        .flat_map(|(idx, row)| validate_row(row, rules, idx + 2))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &[FieldRule] = &[
        FieldRule::required("Nama Obat", "medicine_name", FieldKind::Text),
        FieldRule::required("Jumlah Digunakan", "quantity_used", FieldKind::PositiveInt),
        FieldRule::required("Tanggal Penggunaan", "usage_date", FieldKind::Date),
        FieldRule::optional("Status", "status", FieldKind::OneOf(&["AKTIF", "PASIF"])),
    ];

    #[test]
    fn test_valid_row_has_no_errors() {
        let row = SheetRow::from_pairs(&[
            ("Nama Obat", "Amoxicillin"),
            ("Jumlah Digunakan", "10"),
            ("Tanggal Penggunaan", "2024-01-15"),
        ]);
        assert!(validate_row(&row, RULES, 2).is_empty());
    }

    #[test]
    fn test_missing_required_field() {
        let row = SheetRow::from_pairs(&[
            ("Jumlah Digunakan", "10"),
            ("Tanggal Penggunaan", "2024-01-15"),
        ]);
        let errors = validate_row(&row, RULES, 2);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("row 2"));
        assert!(errors[0].contains("Nama Obat"));
    }

    #[test]
    fn test_positive_int_rejects_zero_and_garbage() {
        for bad in ["0", "-3", "ten", "1.5"] {
            let row = SheetRow::from_pairs(&[
                ("Nama Obat", "X"),
                ("Jumlah Digunakan", bad),
                ("Tanggal Penggunaan", "2024-01-15"),
            ]);
            let errors = validate_row(&row, RULES, 3);
            assert_eq!(errors.len(), 1, "expected error for {:?}", bad);
            assert!(errors[0].contains("row 3"));
        }
    }

    #[test]
    fn test_date_format() {
        let row = SheetRow::from_pairs(&[
            ("Nama Obat", "X"),
            ("Jumlah Digunakan", "1"),
            ("Tanggal Penggunaan", "15/01/2024"),
        ]);
        let errors = validate_row(&row, RULES, 2);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("ISO date"));
    }

    #[test]
    fn test_enum_membership() {
        let row = SheetRow::from_pairs(&[
            ("Nama Obat", "X"),
            ("Jumlah Digunakan", "1"),
            ("Tanggal Penggunaan", "2024-01-15"),
            ("Status", "MAYBE"),
        ]);
        let errors = validate_row(&row, RULES, 2);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("must be one of"));
    }

    #[test]
    fn test_optional_field_may_be_absent() {
        let row = SheetRow::from_pairs(&[
            ("Nama Obat", "X"),
            ("Jumlah Digunakan", "1"),
            ("Tanggal Penggunaan", "2024-01-15"),
        ]);
        assert!(validate_row(&row, RULES, 2).is_empty());
    }

    #[test]
    fn test_batch_numbers_rows_after_header() {
        let ok = SheetRow::from_pairs(&[
            ("Nama Obat", "X"),
            ("Jumlah Digunakan", "1"),
            ("Tanggal Penggunaan", "2024-01-15"),
        ]);
        let bad = SheetRow::from_pairs(&[
            ("Jumlah Digunakan", "1"),
            ("Tanggal Penggunaan", "2024-01-15"),
        ]);

        // Failing row is the second data row → reported as workbook row 3
        let errors = validate_batch(&[ok, bad], RULES);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("row 3:"));
    }
}
