use std::io::Write;

use super::{ExportError, ExportOptions, ExportRow};

/// Column headers with unit labels
pub fn headers(options: &ExportOptions) -> Vec<String> {
    let mass = options.units.mass_label();
    let energy = options.energy_unit.label();

    vec![
        "Day".to_string(),
        format!("Weight ({})", mass),
        format!("Upper Weight ({})", mass),
        format!("Lower Weight ({})", mass),
        "Body Fat %".to_string(),
        "BMI".to_string(),
        format!("Fat Mass ({})", mass),
        format!("Lean Mass ({})", mass),
        format!("Intake ({})", energy),
        format!("Expenditure ({})", energy),
    ]
}

/// Write export rows as CSV, one line per day after the header
pub fn write_rows<W: Write>(
    rows: &[ExportRow],
    options: &ExportOptions,
    writer: W,
) -> Result<(), ExportError> {
    let mut wtr = ::csv::WriterBuilder::new().has_headers(false).from_writer(writer);

    wtr.write_record(headers(options))?;

    for row in rows {
        wtr.write_record(&[
            row.day.to_string(),
            format!("{:.2}", row.weight),
            format!("{:.2}", row.upper_weight),
            format!("{:.2}", row.lower_weight),
            format!("{:.2}", row.body_fat_percent),
            format!("{:.2}", row.bmi),
            format!("{:.2}", row.fat_mass),
            format!("{:.2}", row.lean_mass),
            format!("{:.0}", row.intake),
            format!("{:.0}", row.expenditure),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::bands;
    use crate::export::{export_bands, EnergyUnit, ExportFormat, Units};

    #[test]
    fn test_csv_layout() {
        let mut out = Vec::new();
        export_bands(&bands(), &ExportOptions::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Day,Weight (kg),Upper Weight (kg),Lower Weight (kg),Body Fat %,BMI,Fat Mass (kg),Lean Mass (kg),Intake (kcal/day),Expenditure (kcal/day)"
        );
        assert!(lines[1].starts_with("0,70.00,70.00,70.00,18.12,21.60,"));
        assert!(lines[2].starts_with("1,69.90,70.10,69.70,"));
        assert!(lines[2].ends_with(",2746,2700"));
    }

    #[test]
    fn test_csv_imperial_headers() {
        let options = ExportOptions {
            format: ExportFormat::Csv,
            units: Units::Imperial,
            energy_unit: EnergyUnit::Kj,
        };
        let h = headers(&options);
        assert_eq!(h.len(), 10);
        assert_eq!(h[1], "Weight (lb)");
        assert_eq!(h[9], "Expenditure (kJ/day)");
    }

    #[test]
    fn test_csv_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.csv");
        crate::export::export_to_file(&bands(), &ExportOptions::default(), &path).unwrap();

        let mut reader = ::csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.records().count(), 2);
    }
}
