use serde::{Deserialize, Serialize};

use crate::baseline::Baseline;
use crate::intervention::Intervention;

/// Exogenous inputs for a single simulated day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyParams {
    /// Energy intake (kcal/day)
    pub calories: f64,

    /// Carbohydrate share of intake (%)
    pub carb_percent: f64,

    /// Sodium intake (mg/day)
    pub sodium: f64,

    /// Activity energy parameter (kcal/kg/day)
    pub act_param: f64,

    /// True if these values came from an active schedule entry
    pub scheduled: bool,

    /// True if these values are interpolated toward an upcoming entry
    pub ramped: bool,
}

impl DailyParams {
    /// Create parameters, clamping every field to its physical range
    pub fn new(calories: f64, carb_percent: f64, sodium: f64, act_param: f64) -> Self {
        DailyParams {
            calories: calories.max(0.0),
            carb_percent: carb_percent.clamp(0.0, 100.0),
            sodium: sodium.max(0.0),
            act_param: act_param.max(0.0),
            scheduled: false,
            ramped: false,
        }
    }

    /// Maintenance inputs implied by the subject profile
    pub fn from_baseline(baseline: &Baseline) -> Self {
        DailyParams::new(
            baseline.maintenance_calories(),
            baseline.carb_intake_pct(),
            baseline.sodium(),
            baseline.activity_param(),
        )
    }

    /// Target inputs of a schedule entry
    pub fn from_intervention(intervention: &Intervention, baseline: &Baseline) -> Self {
        DailyParams {
            scheduled: true,
            ..DailyParams::new(
                intervention.calories(),
                intervention.carb_percent(),
                intervention.sodium(),
                intervention.act_param(baseline),
            )
        }
    }

    /// Carbohydrate intake (kcal/day)
    pub fn carb_intake(&self) -> f64 {
        self.carb_percent / 100.0 * self.calories
    }

    /// Linear interpolation of every driving field toward `target`
    pub fn lerp(&self, target: &DailyParams, progress: f64) -> DailyParams {
        let mix = |from: f64, to: f64| from + progress * (to - from);
        DailyParams {
            scheduled: self.scheduled || target.scheduled,
            ramped: progress > 0.0,
            ..DailyParams::new(
                mix(self.calories, target.calories),
                mix(self.carb_percent, target.carb_percent),
                mix(self.sodium, target.sodium),
                mix(self.act_param, target.act_param),
            )
        }
    }
}
