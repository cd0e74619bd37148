use std::io::Write;

use super::ExportError;

/// Write any serializable value as pretty-printed JSON
pub fn write_json<T, W>(data: &T, writer: W) -> Result<(), ExportError>
where
    T: serde::Serialize + ?Sized,
    W: Write,
{
    let mut writer = writer;
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::bands;
    use crate::export::{export_bands, ExportFormat, ExportOptions, ExportRow};

    #[test]
    fn test_json_rows() {
        let options = ExportOptions {
            format: ExportFormat::Json,
            ..ExportOptions::default()
        };
        let mut out = Vec::new();
        export_bands(&bands(), &options, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"upper_weight\": 70.1"));

        let rows: Vec<ExportRow> = serde_json::from_str(&text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].lower_weight, 69.7);
        assert_eq!(rows[1].intake, 2746.0);
    }

    #[test]
    fn test_json_generic() {
        #[derive(serde::Serialize)]
        struct TestData {
            name: String,
            value: u32,
        }

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        let mut out = Vec::new();
        write_json(&data, &mut out).unwrap();

        let content = String::from_utf8(out).unwrap();
        assert!(content.contains("\"name\": \"test\""));
        assert!(content.contains("\"value\": 42"));
    }
}
