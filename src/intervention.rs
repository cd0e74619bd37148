//! Intervention schedule entries
//!
//! An [`Intervention`] changes the daily driving inputs from its start day on,
//! optionally ramping linearly toward its targets beforehand. Numeric fields are
//! clamped once at construction and never change afterwards; only the label and
//! the active/ramp flags have setters.

use serde::{Deserialize, Serialize};

use crate::baseline::Baseline;
use crate::constants::intervention::*;

/// Schedule entry as written in a scenario file, before clamping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawIntervention {
    day: u32,
    calories: f64,
    carb_percent: f64,
    act_change_percent: f64,
    sodium: f64,
    active: bool,
    ramp: bool,
    title: String,
}

impl Default for RawIntervention {
    fn default() -> Self {
        RawIntervention {
            day: DEFAULT_DAY,
            calories: DEFAULT_CALORIES,
            carb_percent: DEFAULT_CARB_PCT,
            act_change_percent: 0.0,
            sodium: DEFAULT_SODIUM,
            active: true,
            ramp: false,
            title: String::new(),
        }
    }
}

impl From<RawIntervention> for Intervention {
    fn from(raw: RawIntervention) -> Self {
        Intervention::new(
            raw.day,
            raw.calories,
            raw.carb_percent,
            raw.act_change_percent,
            raw.sodium,
        )
        .with_active(raw.active)
        .with_ramp(raw.ramp)
        .with_title(raw.title)
    }
}

impl From<Intervention> for RawIntervention {
    fn from(i: Intervention) -> Self {
        RawIntervention {
            day: i.day,
            calories: i.calories,
            carb_percent: i.carb_percent,
            act_change_percent: i.act_change_percent,
            sodium: i.sodium,
            active: i.active,
            ramp: i.ramp,
            title: i.title,
        }
    }
}

/// A change to the driving inputs starting on a given day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawIntervention", into = "RawIntervention")]
pub struct Intervention {
    day: u32,
    calories: f64,
    carb_percent: f64,
    act_change_percent: f64,
    sodium: f64,
    active: bool,
    ramp: bool,
    title: String,
}

impl Default for Intervention {
    fn default() -> Self {
        RawIntervention::default().into()
    }
}

fn finite_or(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        default
    }
}

impl Intervention {
    /// Create an active, non-ramped entry with clamped targets
    pub fn new(
        day: u32,
        calories: f64,
        carb_percent: f64,
        act_change_percent: f64,
        sodium: f64,
    ) -> Self {
        Intervention {
            day,
            calories: finite_or(calories, DEFAULT_CALORIES).max(0.0),
            carb_percent: finite_or(carb_percent, DEFAULT_CARB_PCT).clamp(0.0, 100.0),
            act_change_percent: finite_or(act_change_percent, 0.0).max(MIN_ACT_CHANGE_PCT),
            sodium: finite_or(sodium, DEFAULT_SODIUM).clamp(0.0, MAX_SODIUM),
            active: true,
            ramp: false,
            title: String::new(),
        }
    }

    /// Entry whose sodium follows intake in proportion to the profile's maintenance
    pub fn with_proportional_sodium(
        day: u32,
        calories: f64,
        carb_percent: f64,
        act_change_percent: f64,
        baseline: &Baseline,
    ) -> Self {
        let calories = finite_or(calories, DEFAULT_CALORIES).max(0.0);
        Intervention::new(
            day,
            calories,
            carb_percent,
            act_change_percent,
            baseline.proportional_sodium(calories),
        )
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Target intake (kcal/day)
    pub fn calories(&self) -> f64 {
        self.calories
    }

    /// Target carbohydrate share (%)
    pub fn carb_percent(&self) -> f64 {
        self.carb_percent
    }

    /// Activity change relative to the profile (%)
    pub fn act_change_percent(&self) -> f64 {
        self.act_change_percent
    }

    /// Target sodium (mg/day)
    pub fn sodium(&self) -> f64 {
        self.sodium
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_ramped(&self) -> bool {
        self.ramp
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn set_ramp(&mut self, ramp: bool) {
        self.ramp = ramp;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.set_active(active);
        self
    }

    pub fn with_ramp(mut self, ramp: bool) -> Self {
        self.set_ramp(ramp);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.set_title(title);
        self
    }

    /// Activity parameter after applying the percentage change
    pub fn act_param(&self, baseline: &Baseline) -> f64 {
        baseline.activity_param() * (1.0 + self.act_change_percent / 100.0)
    }

    /// True when the target intake is below the nutritional warning threshold
    pub fn is_low_intake(&self) -> bool {
        self.calories < LOW_INTAKE_WARNING
    }
}
