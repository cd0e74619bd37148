//! Lookup tables and small arithmetic helpers around the profile
//!
//! BMI categories, the simple physical activity level table, and a PAL
//! estimate from a list of activities expressed in METs.

use serde::{Deserialize, Serialize};

use crate::constants::profile::DEFAULT_PAL;

/// Lowest and highest PAL an activity list can produce
const MIN_ACTIVITY_PAL: f64 = 1.1;
const MAX_ACTIVITY_PAL: f64 = 3.0;

/// WHO adult BMI categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// BMI from kilograms and centimeters; 0 when either input is missing or non-positive
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    if weight_kg.is_nan() || height_cm.is_nan() || weight_kg <= 0.0 || height_cm <= 0.0 {
        return 0.0;
    }
    weight_kg / (height_cm / 100.0).powi(2)
}

/// Activity category of the simple PAL table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityCategory {
    VeryLight,
    Light,
    Moderate,
    Active,
    VeryActive,
    Heavy,
}

impl std::str::FromStr for ActivityCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '_'], "-").as_str() {
            "very-light" => Ok(ActivityCategory::VeryLight),
            "light" => Ok(ActivityCategory::Light),
            "moderate" => Ok(ActivityCategory::Moderate),
            "active" => Ok(ActivityCategory::Active),
            "very-active" => Ok(ActivityCategory::VeryActive),
            "heavy" => Ok(ActivityCategory::Heavy),
            _ => Err(format!("Invalid activity category: {}", s)),
        }
    }
}

/// PAL from leisure and work activity categories; unknown pairs give the default PAL
pub fn simple_pal(leisure: ActivityCategory, work: ActivityCategory) -> f64 {
    use ActivityCategory::*;

    match (leisure, work) {
        (VeryLight, VeryLight) => 1.4,
        (VeryLight, Light) => 1.5,
        (VeryLight, Moderate) => 1.6,
        (VeryLight, Heavy) => 1.7,
        (Light, VeryLight) => 1.5,
        (Light, Light) => 1.6,
        (Light, Moderate) => 1.7,
        (Light, Heavy) => 1.8,
        (Moderate, VeryLight) => 1.6,
        (Moderate, Light) => 1.7,
        (Moderate, Moderate) => 1.8,
        (Moderate, Heavy) => 1.9,
        (Active, VeryLight) => 1.7,
        (Active, Light) => 1.8,
        (Active, Moderate) => 1.9,
        (Active, Heavy) => 2.1,
        (VeryActive, VeryLight) => 1.9,
        (VeryActive, Light) => 2.0,
        (VeryActive, Moderate) => 2.2,
        (VeryActive, Heavy) => 2.3,
        _ => DEFAULT_PAL,
    }
}

/// A recurring activity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Metabolic equivalent of task
    pub met: f64,
    /// Minutes per session
    pub duration: f64,
    /// Sessions per period
    pub frequency: f64,
    /// Period length in days
    pub period: f64,
}

impl std::str::FromStr for Activity {
    type Err = String;

    /// Parse `MET:MINUTES:TIMES[:DAYS]`; the period defaults to a week
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s
            .split(':')
            .map(|f| {
                f.trim()
                    .parse::<f64>()
                    .map_err(|_| format!("Invalid activity field '{}' in '{}'", f, s))
            })
            .collect::<Result<Vec<f64>, String>>()?;

        match fields.as_slice() {
            [met, duration, frequency] => Ok(Activity {
                met: *met,
                duration: *duration,
                frequency: *frequency,
                period: 7.0,
            }),
            [met, duration, frequency, period] => Ok(Activity {
                met: *met,
                duration: *duration,
                frequency: *frequency,
                period: *period,
            }),
            _ => Err(format!(
                "Invalid activity '{}': expected MET:MINUTES:TIMES[:DAYS]",
                s
            )),
        }
    }
}

fn positive_or(value: f64, default: f64) -> f64 {
    if value.is_finite() && value != 0.0 {
        value
    } else {
        default
    }
}

/// PAL as the 24-hour average MET, with unaccounted hours at 1 MET
pub fn pal_from_activities(activities: &[Activity]) -> f64 {
    if activities.is_empty() {
        return DEFAULT_PAL;
    }

    let mut met_hours = 0.0;
    let mut active_minutes = 0.0;

    for activity in activities {
        let met = positive_or(activity.met, 1.0);
        let duration = positive_or(activity.duration, 0.0);
        let frequency = positive_or(activity.frequency, 0.0);
        let period = positive_or(activity.period, 7.0);

        let minutes_per_day = duration * frequency / period;
        met_hours += met * minutes_per_day / 60.0;
        active_minutes += minutes_per_day;
    }

    let rest_hours = (24.0 - active_minutes / 60.0).max(0.0);
    met_hours += rest_hours;

    (met_hours / 24.0).clamp(MIN_ACTIVITY_PAL, MAX_ACTIVITY_PAL)
}
