//! Subject profile and its derived physiological quantities
//!
//! A [`Baseline`] is an immutable value record. Every derived quantity is a pure
//! function of the current fields, and every "edit" returns a new record, so a
//! profile can be copied freely between independent simulation runs.
//!
//! Construction is fail-soft: inputs that are missing or not finite fall back
//! to documented defaults and out-of-range values are clamped. Nothing here
//! returns an error.

use serde::{Deserialize, Serialize};

use crate::constants::model::{
    ACTIVITY_EXPENDITURE_FRACTION, ADAPTIVE_THERMOGENESIS_FRACTION, BASELINE_EXPENDITURE_FRACTION,
    CARB_SODIUM_RETENTION, ECW_SODIUM_FEEDBACK, FAT_RMR_COEFF, GLYCOGEN_WATER_RATIO,
    LEAN_RMR_COEFF,
};
use crate::constants::profile::*;

/// Biological sex used to select regression coefficients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Default for Sex {
    fn default() -> Self {
        Sex::Male
    }
}

impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => Err(format!("Invalid sex: {}", s)),
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
        }
    }
}

/// Raw profile inputs as they arrive from a form, a config file or the CLI
///
/// Every field is optional; anything missing or non-finite is replaced by the
/// documented default when the [`Baseline`] is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineInputs {
    pub sex: Option<Sex>,
    /// Years
    pub age: Option<f64>,
    /// Centimeters
    pub height: Option<f64>,
    /// Kilograms
    pub weight: Option<f64>,
    /// Body fat percentage, used when `bfp_calc` is false
    pub bfp: Option<f64>,
    /// Resting metabolic rate (kcal/day), used when `rmr_calc` is false
    pub rmr: Option<f64>,
    /// Physical activity level multiplier
    pub pal: Option<f64>,
    /// Derive body fat from age and BMI
    pub bfp_calc: Option<bool>,
    /// Derive RMR from weight, height and age
    pub rmr_calc: Option<bool>,
}

impl BaselineInputs {
    /// Parse a raw text field, yielding `None` for anything that is not a finite number
    pub fn parse_field(raw: Option<&str>) -> Option<f64> {
        raw.and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }
}

/// Healthy weight band (kg) for a given height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthyWeightRange {
    pub low: f64,
    pub high: f64,
}

/// Initial split of body weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyComposition {
    pub fat: f64,
    pub lean: f64,
    pub decw: f64,
}

/// Subject profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    sex: Sex,
    age: f64,
    height: f64,
    weight: f64,
    bfp: f64,
    rmr: f64,
    pal: f64,
    bfp_calc: bool,
    rmr_calc: bool,
    carb_intake_pct: f64,
    sodium: f64,
    delta_e: f64,
    decw: f64,
    glycogen: f64,
}

fn sanitize(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(default)
}

impl Default for Baseline {
    fn default() -> Self {
        Baseline::from_inputs(&BaselineInputs::default())
    }
}

impl Baseline {
    /// Build a profile from sex, age (years), height (cm) and weight (kg),
    /// deriving body fat and RMR
    pub fn new(sex: Sex, age: f64, height: f64, weight: f64) -> Self {
        Baseline::from_inputs(&BaselineInputs {
            sex: Some(sex),
            age: Some(age),
            height: Some(height),
            weight: Some(weight),
            ..BaselineInputs::default()
        })
    }

    /// Build a profile from optional inputs, substituting defaults and clamping
    pub fn from_inputs(inputs: &BaselineInputs) -> Self {
        Baseline {
            sex: inputs.sex.unwrap_or_default(),
            age: sanitize(inputs.age, DEFAULT_AGE).clamp(MIN_AGE, MAX_AGE),
            height: sanitize(inputs.height, DEFAULT_HEIGHT).clamp(MIN_HEIGHT, MAX_HEIGHT),
            weight: sanitize(inputs.weight, DEFAULT_WEIGHT).max(MIN_WEIGHT),
            bfp: sanitize(inputs.bfp, DEFAULT_BFP).clamp(MIN_BFP, MAX_BFP),
            rmr: sanitize(inputs.rmr, DEFAULT_RMR),
            pal: sanitize(inputs.pal, DEFAULT_PAL).max(MIN_PAL),
            bfp_calc: inputs.bfp_calc.unwrap_or(true),
            rmr_calc: inputs.rmr_calc.unwrap_or(true),
            carb_intake_pct: DEFAULT_CARB_INTAKE_PCT,
            sodium: DEFAULT_SODIUM,
            delta_e: DEFAULT_DELTA_E,
            decw: DEFAULT_DECW,
            glycogen: DEFAULT_GLYCOGEN,
        }
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn is_male(&self) -> bool {
        self.sex == Sex::Male
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn pal(&self) -> f64 {
        self.pal
    }

    pub fn bfp_calc(&self) -> bool {
        self.bfp_calc
    }

    pub fn rmr_calc(&self) -> bool {
        self.rmr_calc
    }

    /// Carbohydrate share of baseline intake (%)
    pub fn carb_intake_pct(&self) -> f64 {
        self.carb_intake_pct
    }

    /// Baseline sodium intake (mg/day)
    pub fn sodium(&self) -> f64 {
        self.sodium
    }

    /// Energy imbalance offset (kcal/day) used for uncertainty bands
    pub fn energy_offset(&self) -> f64 {
        self.delta_e
    }

    /// Initial extracellular water delta (kg)
    pub fn decw(&self) -> f64 {
        self.decw
    }

    /// Reference glycogen reserve (kg)
    pub fn glycogen(&self) -> f64 {
        self.glycogen
    }

    // ------------------------------------------------------------------
    // Edits. Each returns a new record.
    // ------------------------------------------------------------------

    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = sex;
        self
    }

    pub fn with_age(mut self, age: f64) -> Self {
        self.age = sanitize(Some(age), DEFAULT_AGE).clamp(MIN_AGE, MAX_AGE);
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = sanitize(Some(height), DEFAULT_HEIGHT).clamp(MIN_HEIGHT, MAX_HEIGHT);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = sanitize(Some(weight), DEFAULT_WEIGHT).max(MIN_WEIGHT);
        self
    }

    pub fn with_pal(mut self, pal: f64) -> Self {
        self.pal = sanitize(Some(pal), DEFAULT_PAL).max(MIN_PAL);
        self
    }

    /// Set a user-supplied body fat percentage (only used when not derived)
    pub fn with_bfp(mut self, bfp: f64) -> Self {
        self.bfp = sanitize(Some(bfp), DEFAULT_BFP).clamp(MIN_BFP, MAX_BFP);
        self
    }

    /// Set a user-supplied RMR (only used when not derived)
    pub fn with_rmr(mut self, rmr: f64) -> Self {
        self.rmr = sanitize(Some(rmr), DEFAULT_RMR);
        self
    }

    /// Toggle derived body fat. Leaving or entering derived mode stores the
    /// computed value, so a manual profile starts from the value last shown.
    pub fn with_computed_bfp(mut self, calc: bool) -> Self {
        if calc || self.bfp_calc {
            self.bfp = self.computed_bfp();
        }
        self.bfp_calc = calc;
        self
    }

    /// Toggle derived RMR, storing the computed value like [`Self::with_computed_bfp`]
    pub fn with_computed_rmr(mut self, calc: bool) -> Self {
        if calc || self.rmr_calc {
            self.rmr = self.computed_rmr().max(MIN_RMR);
        }
        self.rmr_calc = calc;
        self
    }

    pub fn with_carb_intake_pct(mut self, pct: f64) -> Self {
        self.carb_intake_pct = sanitize(Some(pct), DEFAULT_CARB_INTAKE_PCT).clamp(0.0, 100.0);
        self
    }

    pub fn with_sodium(mut self, sodium: f64) -> Self {
        self.sodium = sanitize(Some(sodium), DEFAULT_SODIUM).max(0.0);
        self
    }

    pub fn with_energy_offset(mut self, delta_e: f64) -> Self {
        self.delta_e = sanitize(Some(delta_e), DEFAULT_DELTA_E);
        self
    }

    pub fn with_glycogen(mut self, glycogen: f64) -> Self {
        self.glycogen = sanitize(Some(glycogen), DEFAULT_GLYCOGEN).max(MIN_GLYCOGEN);
        self
    }

    pub fn with_decw(mut self, decw: f64) -> Self {
        self.decw = sanitize(Some(decw), DEFAULT_DECW);
        self
    }

    // ------------------------------------------------------------------
    // Derived quantities
    // ------------------------------------------------------------------

    fn height_m(&self) -> f64 {
        self.height / 100.0
    }

    /// Body mass index at the profile weight
    pub fn bmi(&self) -> f64 {
        self.bmi_at(self.weight)
    }

    /// Body mass index for another weight at the profile height
    pub fn bmi_at(&self, weight: f64) -> f64 {
        weight / self.height_m().powi(2)
    }

    fn computed_bfp(&self) -> f64 {
        let ln_bmi = self.bmi().ln();
        let bfp = match self.sex {
            Sex::Male => 0.14 * self.age + 37.31 * ln_bmi - 103.94,
            Sex::Female => 0.14 * self.age + 39.96 * ln_bmi - 102.01,
        };
        bfp.clamp(MIN_BFP, MAX_COMPUTED_BFP)
    }

    /// Body fat percentage, derived or user-supplied
    pub fn bfp(&self) -> f64 {
        if self.bfp_calc {
            self.computed_bfp()
        } else {
            self.bfp
        }
    }

    /// Mifflin-St Jeor estimate at an arbitrary weight and age
    fn mifflin(&self, weight: f64, age: f64) -> f64 {
        let linear = 9.99 * weight + 625.0 * self.height / 100.0 - 4.92 * age;
        match self.sex {
            Sex::Male => linear + 5.0,
            Sex::Female => linear - 161.0,
        }
    }

    fn computed_rmr(&self) -> f64 {
        self.mifflin(self.weight, self.age)
    }

    /// Resting metabolic rate (kcal/day), floored at a physical minimum
    pub fn rmr(&self) -> f64 {
        let rmr = if self.rmr_calc {
            self.computed_rmr()
        } else {
            self.rmr
        };
        rmr.max(MIN_RMR)
    }

    /// RMR at a new weight, `day` days after the profile date
    pub fn rmr_at(&self, weight: f64, day: f64) -> f64 {
        self.mifflin(weight, self.age + day / 365.0).max(MIN_RMR)
    }

    /// Maintenance energy (kcal/day) = PAL x RMR
    pub fn maintenance_calories(&self) -> f64 {
        self.pal * self.rmr()
    }

    /// Activity energy parameter (kcal/kg/day)
    pub fn activity_param(&self) -> f64 {
        let rmr = self.rmr();
        (ACTIVITY_EXPENDITURE_FRACTION * rmr * self.pal - rmr) / self.weight
    }

    /// Energy spent above resting (kcal/day)
    pub fn activity_expenditure(&self) -> f64 {
        self.maintenance_calories() - self.rmr()
    }

    pub fn fat_weight(&self) -> f64 {
        self.weight * self.bfp() / 100.0
    }

    pub fn lean_weight(&self) -> f64 {
        self.weight - self.fat_weight()
    }

    /// Composite energy balance constant of the body model
    pub fn k(&self) -> f64 {
        BASELINE_EXPENDITURE_FRACTION * self.maintenance_calories()
            - self.delta_e
            - LEAN_RMR_COEFF * self.lean_weight()
            - FAT_RMR_COEFF * self.fat_weight()
            - self.activity_param() * self.weight
    }

    /// Extracellular water (kg)
    pub fn ecw(&self) -> f64 {
        self.ecw_at(0.0, self.weight)
    }

    /// Extracellular water after `days` days at `weight`
    pub fn ecw_at(&self, days: f64, weight: f64) -> f64 {
        match self.sex {
            Sex::Male => {
                0.025 * (self.age + days / 365.0) + 9.57 * self.height_m() + 0.191 * weight - 12.4
            }
            Sex::Female => -4.0 + 5.98 * self.height_m() + 0.167 * weight,
        }
    }

    pub fn healthy_weight_range(&self) -> HealthyWeightRange {
        let h2 = self.height_m().powi(2);
        HealthyWeightRange {
            low: (HEALTHY_BMI_LOW * h2).round(),
            high: (HEALTHY_BMI_HIGH * h2).round(),
        }
    }

    /// Sodium scaled to a new intake in proportion to maintenance
    pub fn proportional_sodium(&self, calories: f64) -> f64 {
        self.sodium * calories / self.maintenance_calories()
    }

    /// Baseline carbohydrate intake (kcal/day)
    pub fn carbs_in(&self) -> f64 {
        self.carb_intake_pct / 100.0 * self.maintenance_calories()
    }

    /// Water bound to glycogen above or below the reference level
    pub fn glycogen_h2o(&self, glycogen: f64) -> f64 {
        GLYCOGEN_WATER_RATIO * (glycogen - self.glycogen)
    }

    /// Initial adaptive thermogenesis
    pub fn therm(&self) -> f64 {
        ADAPTIVE_THERMOGENESIS_FRACTION * self.maintenance_calories()
    }

    pub fn body_composition(&self) -> BodyComposition {
        let bfp = self.bfp();
        BodyComposition {
            fat: self.weight * bfp / 100.0,
            lean: self.weight * (100.0 - bfp) / 100.0,
            decw: self.decw,
        }
    }

    /// Total weight of a body state
    pub fn weight_of(&self, fat: f64, lean: f64, glycogen: f64, decw: f64) -> f64 {
        fat + lean + self.glycogen_h2o(glycogen) + decw
    }

    /// Steady-state glycogen at a constant intake
    pub fn glycogen_equation(&self, calories: f64) -> f64 {
        self.glycogen * ((self.carb_intake_pct / 100.0 * calories) / self.carbs_in()).sqrt()
    }

    /// Steady-state extracellular water delta at a constant intake
    pub fn delta_ecw_equation(&self, calories: f64) -> f64 {
        ((self.sodium / self.maintenance_calories()
            + CARB_SODIUM_RETENTION * self.carb_intake_pct / (100.0 * self.carbs_in()))
            * calories
            - (self.sodium + CARB_SODIUM_RETENTION))
            / ECW_SODIUM_FEEDBACK
    }

    /// Weight once glycogen and water have settled at a constant intake
    pub fn stable_weight(&self, fat: f64, lean: f64, calories: f64) -> f64 {
        let glycogen = self.glycogen_equation(calories);
        fat + lean + self.glycogen_h2o(glycogen) + self.delta_ecw_equation(calories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() < tol,
            "expected {} within {} of {}",
            actual,
            tol,
            expected
        );
    }

    fn male() -> Baseline {
        Baseline::new(Sex::Male, 23.0, 180.0, 70.0)
    }

    fn female() -> Baseline {
        Baseline::new(Sex::Female, 23.0, 180.0, 70.0)
    }

    #[test]
    fn test_rmr_regression() {
        assert_close(male().rmr(), 1716.14, 1e-9);
        assert_close(female().rmr(), 1550.14, 1e-9);
    }

    #[test]
    fn test_rmr_at_later_day() {
        assert_eq!(male().rmr_at(75.0, 365.0).round(), 1761.0);
        assert_eq!(female().rmr_at(75.0, 365.0).round(), 1595.0);
    }

    #[test]
    fn test_rmr_floor() {
        let tiny = Baseline::new(Sex::Female, 250.0, 0.1, 0.1);
        assert_eq!(tiny.rmr(), MIN_RMR);

        let manual = male().with_computed_rmr(false).with_rmr(100.0);
        assert_eq!(manual.rmr(), MIN_RMR);
    }

    #[test]
    fn test_bfp_regression() {
        assert_eq!(male().bfp().round(), 14.0);
        assert_eq!(female().bfp().round(), 24.0);
    }

    #[test]
    fn test_computed_bfp_is_clamped() {
        let heavy = Baseline::new(Sex::Female, 90.0, 150.0, 300.0);
        assert_eq!(heavy.bfp(), MAX_COMPUTED_BFP);

        let light = Baseline::new(Sex::Male, 0.0, 200.0, 20.0);
        assert_eq!(light.bfp(), 0.0);
    }

    #[test]
    fn test_maintenance_and_activity() {
        let b = male();
        assert_eq!(b.maintenance_calories().round(), 2746.0);
        assert_eq!(b.activity_expenditure().round(), 1030.0);
        assert_close(b.activity_param(), 10.7872, 1e-4);
    }

    #[test]
    fn test_healthy_weight_range() {
        let range = male().healthy_weight_range();
        assert_eq!(range.low, 60.0);
        assert_eq!(range.high, 81.0);
    }

    #[test]
    fn test_manual_modes_and_toggle_back() {
        let b = male().with_computed_rmr(false).with_rmr(2000.0);
        assert_eq!(b.rmr(), 2000.0);

        let b = b.with_computed_bfp(false).with_bfp(25.0);
        assert_eq!(b.bfp(), 25.0);

        let b = b.with_computed_rmr(true);
        assert_eq!(b.rmr().round(), 1716.0);
        let b = b.with_computed_bfp(true);
        assert_eq!(b.bfp().round(), 14.0);
    }

    #[test]
    fn test_switching_to_manual_keeps_shown_value() {
        let b = Baseline::new(Sex::Female, 45.0, 165.0, 80.0);
        let shown_bfp = b.bfp();
        let shown_rmr = b.rmr();
        assert!((shown_bfp - DEFAULT_BFP).abs() > 1.0);

        let manual = b.with_computed_bfp(false).with_computed_rmr(false);
        assert!(!manual.bfp_calc());
        assert!(!manual.rmr_calc());
        assert_eq!(manual.bfp(), shown_bfp);
        assert_eq!(manual.rmr(), shown_rmr);

        // Already manual: the user value survives a repeated toggle
        let kept = manual.with_bfp(31.0).with_computed_bfp(false);
        assert_eq!(kept.bfp(), 31.0);
    }

    #[test]
    fn test_glycogen_reference_is_floored() {
        assert_eq!(male().with_glycogen(0.0).glycogen(), MIN_GLYCOGEN);
        assert_eq!(male().with_glycogen(-2.0).glycogen(), MIN_GLYCOGEN);
        assert_eq!(male().with_glycogen(f64::NAN).glycogen(), DEFAULT_GLYCOGEN);
        assert_eq!(male().with_glycogen(0.4).glycogen(), 0.4);
    }

    #[test]
    fn test_ecw_regressions() {
        assert_close(male().ecw(), 18.771, 1e-9);
        assert_close(female().ecw(), 18.454, 1e-9);
        assert_close(male().ecw_at(365.0, 75.0), 19.751, 1e-9);
        assert_close(female().ecw_at(365.0, 75.0), 19.289, 1e-9);
    }

    #[test]
    fn test_bmi() {
        assert_close(male().bmi(), 21.6049, 1e-4);
        assert_close(male().bmi_at(80.0), 24.6914, 1e-4);
    }

    #[test]
    fn test_fat_and_lean_weight() {
        let b = Baseline::new(Sex::Male, 23.0, 180.0, 100.0)
            .with_computed_bfp(false)
            .with_bfp(20.0);
        assert_close(b.fat_weight(), 20.0, 1e-12);
        assert_close(b.lean_weight(), 80.0, 1e-12);

        let b = b.with_bfp(30.0);
        assert_close(b.fat_weight(), 30.0, 1e-12);
        assert_close(b.lean_weight(), 70.0, 1e-12);
    }

    #[test]
    fn test_sodium_and_glycogen() {
        let b = male().with_sodium(3000.0);
        assert_eq!(b.proportional_sodium(2000.0).round(), 2185.0);
        assert_close(b.glycogen_h2o(0.6), 0.37, 1e-9);
        assert_eq!(b.carbs_in().round(), 1373.0);
    }

    #[test]
    fn test_composition_and_new_weight() {
        let b = male();
        assert!(b.k().is_finite());
        assert_eq!(b.therm().round(), 384.0);

        let comp = b.body_composition();
        assert_eq!(comp.decw, 0.0);
        assert_close(comp.fat + comp.lean, 70.0, 1e-9);

        assert_close(b.weight_of(10.0, 50.0, 0.5, 2.0), 62.0, 1e-12);
        assert_close(b.weight_of(15.0, 55.0, 0.6, 1.0), 71.37, 1e-9);
    }

    #[test]
    fn test_stable_weight_at_maintenance_is_lean_plus_fat() {
        let b = male();
        let maint = b.maintenance_calories();
        assert_close(b.glycogen_equation(maint), b.glycogen(), 1e-12);
        assert_close(b.delta_ecw_equation(maint), 0.0, 1e-9);
        assert!(b.stable_weight(10.0, 50.0, 2000.0) > 0.0);
    }

    #[test]
    fn test_non_finite_inputs_fall_back_to_defaults() {
        let b = Baseline::from_inputs(&BaselineInputs {
            sex: None,
            age: Some(f64::NAN),
            height: Some(f64::INFINITY),
            weight: None,
            bfp: Some(f64::NEG_INFINITY),
            rmr: Some(f64::NAN),
            pal: Some(f64::NAN),
            bfp_calc: None,
            rmr_calc: None,
        });
        assert!(b.is_male());
        assert_eq!(b.age(), DEFAULT_AGE);
        assert_eq!(b.height(), DEFAULT_HEIGHT);
        assert_eq!(b.weight(), DEFAULT_WEIGHT);
        assert_eq!(b.pal(), DEFAULT_PAL);
        assert!(b.rmr().is_finite());
        assert!(b.bmi().is_finite());
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let b = Baseline::from_inputs(&BaselineInputs {
            age: Some(900.0),
            height: Some(1000.0),
            weight: Some(-5.0),
            bfp: Some(150.0),
            pal: Some(0.2),
            bfp_calc: Some(false),
            ..BaselineInputs::default()
        });
        assert_eq!(b.age(), MAX_AGE);
        assert_eq!(b.height(), MAX_HEIGHT);
        assert_eq!(b.weight(), MIN_WEIGHT);
        assert_eq!(b.bfp(), MAX_BFP);
        assert_eq!(b.pal(), MIN_PAL);
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(BaselineInputs::parse_field(Some(" 72.5 ")), Some(72.5));
        assert_eq!(BaselineInputs::parse_field(Some("abc")), None);
        assert_eq!(BaselineInputs::parse_field(Some("NaN")), None);
        assert_eq!(BaselineInputs::parse_field(None), None);
    }

    #[test]
    fn test_sex_parsing() {
        assert_eq!("Female".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!("m".parse::<Sex>().unwrap(), Sex::Male);
        assert!("x".parse::<Sex>().is_err());
    }

    proptest! {
        #[test]
        fn test_bmi_non_decreasing_in_weight(
            height in 50.0f64..250.0,
            w1 in 0.1f64..400.0,
            w2 in 0.1f64..400.0
        ) {
            let b = male().with_height(height);
            let (light, heavy) = if w1 <= w2 { (w1, w2) } else { (w2, w1) };
            prop_assert!(b.bmi_at(light) <= b.bmi_at(heavy));
            prop_assert!(b.clone().with_weight(light).bmi() <= b.with_weight(heavy).bmi());
        }

        #[test]
        fn test_supplied_bfp_stays_in_range(bfp in -1.0e4f64..1.0e4) {
            let from_inputs = Baseline::from_inputs(&BaselineInputs {
                bfp: Some(bfp),
                bfp_calc: Some(false),
                ..BaselineInputs::default()
            });
            prop_assert!(from_inputs.bfp() >= MIN_BFP && from_inputs.bfp() <= MAX_BFP);

            let edited = male().with_computed_bfp(false).with_bfp(bfp);
            prop_assert!(edited.bfp() >= MIN_BFP && edited.bfp() <= MAX_BFP);
            prop_assert!(edited.fat_weight() >= 0.0 && edited.lean_weight() >= 0.0);
        }
    }
}
