//! Body state dynamics
//!
//! The state vector (fat, lean, glycogen, extracellular water delta and the
//! adaptive thermogenesis accumulator) evolves under a coupled nonlinear ODE
//! system driven by the day's [`DailyParams`]. States are immutable: every
//! integration step produces a new [`BodyState`].
//!
//! # Integration
//!
//! One step covers one day and combines four derivative evaluations with the
//! classical fixed weights `[1, 2, 2, 1]`:
//!
//! ```text
//! k1 = f(s)
//! k2 = f(s + k1/2)
//! k3 = f(s + k2/2)
//! k4 = f(s + k3)
//! s' = s + (k1 + 2 k2 + 2 k3 + k4) / 6
//! ```

use serde::{Deserialize, Serialize};

use crate::baseline::Baseline;
use crate::constants::model::*;
use crate::daily_params::DailyParams;
use crate::intervention::Intervention;

/// Instantaneous rates of change of the five state components (per day)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyChange {
    pub df: f64,
    pub dl: f64,
    pub dg: f64,
    pub ddecw: f64,
    pub dtherm: f64,
}

impl BodyChange {
    pub fn new(df: f64, dl: f64, dg: f64, ddecw: f64, dtherm: f64) -> Self {
        BodyChange {
            df,
            dl,
            dg,
            ddecw,
            dtherm,
        }
    }

    /// Weighted mean of derivative vectors
    ///
    /// A missing or non-positive weight counts as 1. With no samples every
    /// component is zero.
    pub fn weighted_average(weights: &[f64], changes: &[BodyChange]) -> BodyChange {
        let mut sum = BodyChange::default();
        let mut total = 0.0;

        for (i, change) in changes.iter().enumerate() {
            let w = match weights.get(i) {
                Some(&w) if w > 0.0 => w,
                _ => 1.0,
            };
            total += w;
            sum.df += w * change.df;
            sum.dl += w * change.dl;
            sum.dg += w * change.dg;
            sum.ddecw += w * change.ddecw;
            sum.dtherm += w * change.dtherm;
        }

        if total == 0.0 {
            return BodyChange::default();
        }

        BodyChange::new(
            sum.df / total,
            sum.dl / total,
            sum.dg / total,
            sum.ddecw / total,
            sum.dtherm / total,
        )
    }
}

/// Body composition at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    /// Fat mass (kg)
    pub fat: f64,
    /// Lean mass (kg)
    pub lean: f64,
    /// Glycogen (kg)
    pub glycogen: f64,
    /// Extracellular water change from reference (kg)
    pub decw: f64,
    /// Adaptive thermogenesis (kcal/day)
    pub therm: f64,
}

impl BodyState {
    pub fn new(fat: f64, lean: f64, glycogen: f64, decw: f64, therm: f64) -> Self {
        BodyState {
            fat,
            lean,
            glycogen,
            decw,
            therm,
        }
    }

    /// Initial state implied by a subject profile
    pub fn from_baseline(baseline: &Baseline) -> Self {
        BodyState::new(
            baseline.fat_weight(),
            baseline.lean_weight(),
            baseline.glycogen(),
            baseline.decw(),
            baseline.therm(),
        )
    }

    pub fn is_finite(&self) -> bool {
        self.fat.is_finite()
            && self.lean.is_finite()
            && self.glycogen.is_finite()
            && self.decw.is_finite()
            && self.therm.is_finite()
    }

    /// Total weight including glycogen-bound water (kg)
    pub fn weight(&self, baseline: &Baseline) -> f64 {
        baseline.weight_of(self.fat, self.lean, self.glycogen, self.decw)
    }

    /// Weight ignoring glycogen-bound water (kg)
    pub fn approx_weight(&self) -> f64 {
        self.fat + self.lean + self.decw
    }

    pub fn fat_free(&self, baseline: &Baseline) -> f64 {
        self.weight(baseline) - self.fat
    }

    pub fn fat_percent(&self, baseline: &Baseline) -> f64 {
        self.fat / self.weight(baseline) * 100.0
    }

    pub fn bmi(&self, baseline: &Baseline) -> f64 {
        baseline.bmi_at(self.weight(baseline))
    }

    /// Share of an energy imbalance routed to lean tissue (Forbes)
    fn p(&self) -> f64 {
        FORBES_C / (FORBES_C + self.fat)
    }

    /// Synthesis cost weights of fat and lean for the current partition
    fn synthesis_fractions(&self) -> (f64, f64) {
        let p = self.p();
        let fat = (1.0 - p) * FAT_SYNTHESIS_COST / FAT_ENERGY_DENSITY;
        let lean = p * LEAN_SYNTHESIS_COST / LEAN_ENERGY_DENSITY;
        (fat, lean)
    }

    /// Intake ratio against the profile's baseline carbohydrate intake.
    /// A profile without carbohydrate intake has no carbohydrate-driven change.
    fn carb_ratio(baseline: &Baseline, params: &DailyParams) -> f64 {
        let carbs_in = baseline.carbs_in();
        if carbs_in > 0.0 {
            params.carb_intake() / carbs_in
        } else {
            1.0
        }
    }

    /// Net carbohydrate flux into glycogen (kcal/day)
    pub fn carb_flux(&self, baseline: &Baseline, params: &DailyParams) -> f64 {
        let k_carb = baseline.carbs_in() / baseline.glycogen().powi(2);
        params.carb_intake() - k_carb * self.glycogen.powi(2)
    }

    /// Sodium imbalance (mg/day)
    pub fn sodium_imbalance(&self, baseline: &Baseline, params: &DailyParams) -> f64 {
        params.sodium
            - baseline.sodium()
            - ECW_SODIUM_FEEDBACK * self.decw
            - CARB_SODIUM_RETENTION * (1.0 - Self::carb_ratio(baseline, params))
    }

    /// Expenditure before the cost of tissue synthesis (kcal/day)
    fn expenditure(&self, baseline: &Baseline, params: &DailyParams) -> f64 {
        let tef = TEF_FRACTION * params.calories;
        baseline.k()
            + LEAN_RMR_COEFF * self.lean
            + FAT_RMR_COEFF * self.fat
            + params.act_param * self.weight(baseline)
            + self.therm
            + tef
    }

    /// Total energy expenditure (kcal/day), solved in closed form
    pub fn tee(&self, baseline: &Baseline, params: &DailyParams) -> f64 {
        let (q_fat, q_lean) = self.synthesis_fractions();
        let flux = self.carb_flux(baseline, params);
        (self.expenditure(baseline, params) + (params.calories - flux) * (q_fat + q_lean))
            / (1.0 + q_lean + q_fat)
    }

    /// Derivative vector at this state
    pub fn derivatives(&self, baseline: &Baseline, params: &DailyParams) -> BodyChange {
        let p = self.p();
        let flux = self.carb_flux(baseline, params);
        let imbalance = params.calories - self.tee(baseline, params) - flux;

        BodyChange {
            df: (1.0 - p) * imbalance / FAT_ENERGY_DENSITY,
            dl: p * imbalance / LEAN_ENERGY_DENSITY,
            dg: flux / GLYCOGEN_ENERGY_DENSITY,
            ddecw: self.sodium_imbalance(baseline, params) / ECW_SODIUM_CONCENTRATION,
            dtherm: (ADAPTIVE_THERMOGENESIS_FRACTION * params.calories - self.therm)
                / THERMIC_TIME_CONSTANT,
        }
    }

    /// State after moving along `change` for `dt` days
    pub fn advance(&self, change: &BodyChange, dt: f64) -> BodyState {
        BodyState {
            fat: self.fat + dt * change.df,
            lean: self.lean + dt * change.dl,
            glycogen: self.glycogen + dt * change.dg,
            decw: self.decw + dt * change.ddecw,
            therm: self.therm + dt * change.dtherm,
        }
    }

    /// One fixed 1-day step of the 4-stage integrator
    pub fn step(&self, baseline: &Baseline, params: &DailyParams) -> BodyState {
        let k1 = self.derivatives(baseline, params);
        let k2 = self.advance(&k1, 0.5 * DAY).derivatives(baseline, params);
        let k3 = self.advance(&k2, 0.5 * DAY).derivatives(baseline, params);
        let k4 = self.advance(&k3, DAY).derivatives(baseline, params);

        let averaged = BodyChange::weighted_average(&RK4_WEIGHTS, &[k1, k2, k3, k4]);
        self.advance(&averaged, DAY)
    }

    /// Intake that holds the current composition stationary at activity `act`
    pub fn cals_for_balance(&self, baseline: &Baseline, act: f64) -> f64 {
        let expend_no_food = baseline.k()
            + LEAN_RMR_COEFF * self.lean
            + FAT_RMR_COEFF * self.fat
            + act * self.weight(baseline);
        let (q_fat, q_lean) = self.synthesis_fractions();
        let p_d = 1.0 + q_lean + q_fat;
        let p_n = q_fat + q_lean;
        expend_no_food / (p_d - p_n - BALANCE_THERMIC_FRACTION)
    }
}

/// Final state after holding constant inputs for `days` days
pub fn project(baseline: &Baseline, params: &DailyParams, days: usize) -> BodyState {
    (0..days).fold(BodyState::from_baseline(baseline), |state, _| {
        state.step(baseline, params)
    })
}

/// Final state after holding an intervention's targets for `days` days
pub fn project_intervention(
    baseline: &Baseline,
    intervention: &Intervention,
    days: usize,
) -> BodyState {
    let params = DailyParams::from_intervention(intervention, baseline);
    project(baseline, &params, days)
}

/// Final state after following a day-indexed trajectory
pub fn project_trajectory(baseline: &Baseline, trajectory: &[DailyParams]) -> BodyState {
    trajectory
        .iter()
        .fold(BodyState::from_baseline(baseline), |state, params| {
            state.step(baseline, params)
        })
}
