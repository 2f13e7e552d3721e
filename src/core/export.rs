//! CSV export of the matched view
//!
//! Exports cover every record that passes search and filters, in query order,
//! not just the visible page. Every cell is quoted, rows end with `\n`, and the
//! output starts with a UTF-8 byte-order mark so spreadsheet tools pick the
//! right encoding.

use crate::core::error::ExportError;
use crate::core::record::Record;
use crate::core::schema::{FieldDef, ListSchema};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::Write;

/// UTF-8 byte-order mark written before the header row
pub const BOM: &str = "\u{FEFF}";

/// Header row: labels of the exportable fields in declaration order
pub fn headers(schema: &ListSchema) -> Vec<&str> {
    schema.exportable_fields().map(FieldDef::label).collect()
}

/// Write `records` as CSV to `out`
pub fn write_csv<W, I>(schema: &ListSchema, records: I, mut out: W) -> Result<(), ExportError>
where
    W: Write,
    I: IntoIterator,
    I::Item: Record,
{
    out.write_all(BOM.as_bytes())?;

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    let columns: Vec<&FieldDef> = schema.exportable_fields().collect();
    writer.write_record(columns.iter().map(|f| f.label()))?;

    let mut rows = 0usize;
    for record in records {
        let row = columns.iter().map(|field| {
            field
                .read(&record)
                .and_then(|value| value.display_text())
                .unwrap_or_default()
        });
        writer.write_record(row)?;
        rows += 1;
    }
    writer.flush()?;

    tracing::debug!(list = %schema.name, rows, "Exported list as CSV");
    Ok(())
}

/// Render `records` as a CSV document
pub fn export_csv<I>(schema: &ListSchema, records: I) -> Result<String, ExportError>
where
    I: IntoIterator,
    I::Item: Record,
{
    let mut buffer = Vec::new();
    write_csv(schema, records, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> ListSchema {
        ListSchema::new("coupons")
            .with_field(FieldDef::text("code").labeled("Code"))
            .with_field(FieldDef::number("value").labeled("Value"))
            .with_field(FieldDef::boolean("active").labeled("Active"))
            .with_field(FieldDef::text("secret").internal())
    }

    #[test]
    fn test_export_quotes_everything() {
        let records = vec![
            json!({"code": "SPRING", "value": 10, "active": true, "secret": "x"}),
            json!({"code": "say \"hi\", ok", "value": 2.5, "active": null}),
        ];
        let csv = export_csv(&schema(), &records).unwrap();

        assert!(csv.starts_with(BOM));
        assert_eq!(
            csv.trim_start_matches(BOM),
            "\"Code\",\"Value\",\"Active\"\n\
             \"SPRING\",\"10\",\"true\"\n\
             \"say \"\"hi\"\", ok\",\"2.5\",\"\"\n"
        );
    }

    #[test]
    fn test_export_empty_has_header_only() {
        let csv = export_csv(&schema(), Vec::<serde_json::Value>::new()).unwrap();
        assert_eq!(csv, format!("{BOM}\"Code\",\"Value\",\"Active\"\n"));
        assert_eq!(headers(&schema()), ["Code", "Value", "Active"]);
    }
}
