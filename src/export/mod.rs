//! Export of simulation rows for use outside bwsim
//!
//! Rows are converted to the requested display units and rounded, then
//! written as CSV or JSON to any [`std::io::Write`] sink.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::simulation::{SimulationBands, SimulationRow};

pub mod csv;
pub mod json;

/// Pounds per kilogram
pub const LB_PER_KG: f64 = 2.20462;
/// Kilojoules per kilocalorie
pub const KJ_PER_KCAL: f64 = 4.184;

/// Export format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Mass display units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn mass_label(&self) -> &'static str {
        match self {
            Units::Metric => "kg",
            Units::Imperial => "lb",
        }
    }

    /// Convert kilograms to this unit
    pub fn mass(&self, kg: f64) -> f64 {
        match self {
            Units::Metric => kg,
            Units::Imperial => kg * LB_PER_KG,
        }
    }
}

impl std::str::FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "kg" => Ok(Units::Metric),
            "imperial" | "lb" | "lbs" => Ok(Units::Imperial),
            _ => Err(format!("Invalid units: {}", s)),
        }
    }
}

/// Energy display units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyUnit {
    #[default]
    Kcal,
    Kj,
}

impl EnergyUnit {
    pub fn label(&self) -> &'static str {
        match self {
            EnergyUnit::Kcal => "kcal/day",
            EnergyUnit::Kj => "kJ/day",
        }
    }

    /// Convert kilocalories to this unit
    pub fn energy(&self, kcal: f64) -> f64 {
        match self {
            EnergyUnit::Kcal => kcal,
            EnergyUnit::Kj => kcal * KJ_PER_KCAL,
        }
    }
}

impl std::str::FromStr for EnergyUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kcal" | "cal" | "calories" => Ok(EnergyUnit::Kcal),
            "kj" | "kilojoules" => Ok(EnergyUnit::Kj),
            _ => Err(format!("Invalid energy unit: {}", s)),
        }
    }
}

/// Export configuration options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub units: Units,
    pub energy_unit: EnergyUnit,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            format: ExportFormat::Csv,
            units: Units::Metric,
            energy_unit: EnergyUnit::Kcal,
        }
    }
}

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Band lengths differ: expected {expected}, upper {upper}, lower {lower}")]
    MismatchedBands {
        expected: usize,
        upper: usize,
        lower: usize,
    },
}

/// One exported day, already converted and rounded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub day: usize,
    pub weight: f64,
    pub upper_weight: f64,
    pub lower_weight: f64,
    pub body_fat_percent: f64,
    pub bmi: f64,
    pub fat_mass: f64,
    pub lean_mass: f64,
    pub intake: f64,
    pub expenditure: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl ExportRow {
    fn convert(
        row: &SimulationRow,
        upper: &SimulationRow,
        lower: &SimulationRow,
        options: &ExportOptions,
    ) -> Self {
        let mass = |kg: f64| round2(options.units.mass(kg));
        let energy = |kcal: f64| options.energy_unit.energy(kcal).round();

        ExportRow {
            day: row.day,
            weight: mass(row.weight),
            upper_weight: mass(upper.weight),
            lower_weight: mass(lower.weight),
            body_fat_percent: round2(row.fat_percent),
            bmi: round2(row.bmi),
            fat_mass: mass(row.fat),
            lean_mass: mass(row.lean),
            intake: energy(row.calories),
            expenditure: energy(row.tee),
        }
    }
}

/// Convert simulation bands to display rows
pub fn export_rows(
    bands: &SimulationBands,
    options: &ExportOptions,
) -> Result<Vec<ExportRow>, ExportError> {
    let expected = bands.expected.len();
    if bands.upper.len() != expected || bands.lower.len() != expected {
        return Err(ExportError::MismatchedBands {
            expected,
            upper: bands.upper.len(),
            lower: bands.lower.len(),
        });
    }

    Ok(bands
        .expected
        .iter()
        .zip(&bands.upper)
        .zip(&bands.lower)
        .map(|((row, upper), lower)| ExportRow::convert(row, upper, lower, options))
        .collect())
}

/// Write bands in the requested format
pub fn export_bands<W: Write>(
    bands: &SimulationBands,
    options: &ExportOptions,
    writer: W,
) -> Result<(), ExportError> {
    let rows = export_rows(bands, options)?;
    tracing::debug!(rows = rows.len(), format = ?options.format, "Exporting simulation");

    match options.format {
        ExportFormat::Csv => csv::write_rows(&rows, options, writer),
        ExportFormat::Json => json::write_json(&rows, writer),
    }
}

/// Write bands to a file, creating or truncating it
pub fn export_to_file<P: AsRef<Path>>(
    bands: &SimulationBands,
    options: &ExportOptions,
    output_path: P,
) -> Result<(), ExportError> {
    let file = std::fs::File::create(output_path)?;
    export_bands(bands, options, std::io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn row(day: usize, weight: f64) -> SimulationRow {
        SimulationRow {
            day,
            weight,
            fat_percent: 18.123,
            bmi: 21.6049,
            fat: weight * 0.18,
            lean: weight * 0.82,
            calories: 2745.824,
            tee: 2700.4,
        }
    }

    pub(crate) fn bands() -> SimulationBands {
        SimulationBands {
            expected: vec![row(0, 70.0), row(1, 69.9)],
            upper: vec![row(0, 70.0), row(1, 70.1)],
            lower: vec![row(0, 70.0), row(1, 69.7)],
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(
            ExportFormat::from_path(Path::new("out/run.json")),
            Some(ExportFormat::Json)
        );
        assert_eq!(ExportFormat::from_path(Path::new("run.pdf")), None);
        assert!(matches!(
            "pdf".parse::<ExportFormat>(),
            Err(ExportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_unit_conversion() {
        assert_eq!(Units::Metric.mass(70.0), 70.0);
        assert!((Units::Imperial.mass(70.0) - 154.3234).abs() < 1e-9);
        assert!((EnergyUnit::Kj.energy(2000.0) - 8368.0).abs() < 1e-9);
        assert_eq!("lbs".parse::<Units>().unwrap(), Units::Imperial);
        assert_eq!("kJ".parse::<EnergyUnit>().unwrap(), EnergyUnit::Kj);
    }

    #[test]
    fn test_rows_rounded_and_converted() {
        let options = ExportOptions {
            format: ExportFormat::Csv,
            units: Units::Imperial,
            energy_unit: EnergyUnit::Kj,
        };
        let rows = export_rows(&bands(), &options).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].weight, 154.32);
        assert_eq!(rows[1].upper_weight, round2(70.1 * LB_PER_KG));
        assert_eq!(rows[0].body_fat_percent, 18.12);
        assert_eq!(rows[0].bmi, 21.6);
        assert_eq!(rows[0].intake, (2745.824 * KJ_PER_KCAL).round());
    }

    #[test]
    fn test_mismatched_bands() {
        let mut b = bands();
        b.lower.pop();
        assert!(matches!(
            export_rows(&b, &ExportOptions::default()),
            Err(ExportError::MismatchedBands { lower: 1, .. })
        ));
    }
}
