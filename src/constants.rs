//! Calibration constants of the dynamic energy-balance model
//!
//! These values belong to the published model (Hall et al., Lancet 2011 and
//! the NIDDK body weight planner). They are fixed for every call site and are
//! not configuration.

/// Subject profile defaults and clamping bounds
pub mod profile {
    pub const DEFAULT_AGE: f64 = 23.0;
    pub const MIN_AGE: f64 = 0.0;
    pub const MAX_AGE: f64 = 250.0;

    /// Height in centimeters
    pub const DEFAULT_HEIGHT: f64 = 180.0;
    pub const MIN_HEIGHT: f64 = 0.1;
    pub const MAX_HEIGHT: f64 = 400.0;

    /// Weight in kilograms
    pub const DEFAULT_WEIGHT: f64 = 70.0;
    pub const MIN_WEIGHT: f64 = 0.1;

    /// Body fat percentage
    pub const DEFAULT_BFP: f64 = 18.0;
    pub const MIN_BFP: f64 = 0.0;
    pub const MAX_BFP: f64 = 100.0;
    /// Upper bound for the regression estimate of body fat
    pub const MAX_COMPUTED_BFP: f64 = 60.0;

    /// Resting metabolic rate in kcal/day
    pub const DEFAULT_RMR: f64 = 1708.0;
    /// Floor rejecting non-physical regression results for extreme inputs
    pub const MIN_RMR: f64 = 500.0;

    pub const DEFAULT_PAL: f64 = 1.6;
    pub const MIN_PAL: f64 = 1.0;

    pub const DEFAULT_CARB_INTAKE_PCT: f64 = 50.0;
    /// Sodium in mg/day
    pub const DEFAULT_SODIUM: f64 = 4000.0;
    /// Glycogen reserve in kg
    pub const DEFAULT_GLYCOGEN: f64 = 0.5;
    /// Smallest reference glycogen reserve (kg); the regulation term divides by its square
    pub const MIN_GLYCOGEN: f64 = 0.3;
    pub const DEFAULT_DELTA_E: f64 = 0.0;
    pub const DEFAULT_DECW: f64 = 0.0;

    /// Healthy BMI band
    pub const HEALTHY_BMI_LOW: f64 = 18.5;
    pub const HEALTHY_BMI_HIGH: f64 = 25.0;
}

/// Schedule entry bounds and defaults
pub mod intervention {
    pub const DEFAULT_DAY: u32 = 100;
    pub const DEFAULT_CALORIES: f64 = 2200.0;
    pub const DEFAULT_CARB_PCT: f64 = 50.0;
    pub const DEFAULT_SODIUM: f64 = 4000.0;
    pub const MAX_SODIUM: f64 = 50000.0;
    pub const MIN_ACT_CHANGE_PCT: f64 = -100.0;
    /// Intakes below this may not meet nutritional needs
    pub const LOW_INTAKE_WARNING: f64 = 1000.0;
}

/// Body composition dynamics
pub mod model {
    /// Energy density of fat tissue change (kcal/kg)
    pub const FAT_ENERGY_DENSITY: f64 = 9440.0;
    /// Energy density of lean tissue change (kcal/kg)
    pub const LEAN_ENERGY_DENSITY: f64 = 1807.0;
    /// Energy density of glycogen (kcal/kg)
    pub const GLYCOGEN_ENERGY_DENSITY: f64 = 4180.0;
    /// Extracellular sodium concentration (mg/kg water)
    pub const ECW_SODIUM_CONCENTRATION: f64 = 3220.0;
    /// Sodium excretion per kg of extracellular water gained (mg/day)
    pub const ECW_SODIUM_FEEDBACK: f64 = 3000.0;
    /// Carbohydrate-induced sodium retention (mg/day)
    pub const CARB_SODIUM_RETENTION: f64 = 4000.0;

    /// Forbes partition constant (kg fat)
    pub const FORBES_C: f64 = 1.990762711864407;

    /// Synthesis cost of fat tissue (kcal/kg)
    pub const FAT_SYNTHESIS_COST: f64 = 180.0;
    /// Synthesis cost of lean tissue (kcal/kg)
    pub const LEAN_SYNTHESIS_COST: f64 = 230.0;

    /// Resting expenditure per kg of lean mass (kcal/kg/day)
    pub const LEAN_RMR_COEFF: f64 = 22.0;
    /// Resting expenditure per kg of fat mass (kcal/kg/day)
    pub const FAT_RMR_COEFF: f64 = 3.2;
    /// Share of maintenance energy attributed to the baseline constant K
    pub const BASELINE_EXPENDITURE_FRACTION: f64 = 0.76;
    /// Share of maintenance energy spent on physical activity
    pub const ACTIVITY_EXPENDITURE_FRACTION: f64 = 0.9;

    /// Thermic effect of feeding, fraction of intake
    pub const TEF_FRACTION: f64 = 0.1;
    /// Adaptive thermogenesis, fraction of intake
    pub const ADAPTIVE_THERMOGENESIS_FRACTION: f64 = 0.14;
    /// Time constant of adaptive thermogenesis (days)
    pub const THERMIC_TIME_CONSTANT: f64 = 14.0;
    /// Combined TEF and adaptive thermogenesis removed from balance intake
    pub const BALANCE_THERMIC_FRACTION: f64 = 0.24;

    /// kg of water stored per kg of glycogen
    pub const GLYCOGEN_WATER_RATIO: f64 = 3.7;

    /// Stage weights of the fixed-step integrator
    pub const RK4_WEIGHTS: [f64; 4] = [1.0, 2.0, 2.0, 1.0];
    /// Integration step (days)
    pub const DAY: f64 = 1.0;
}

/// Goal search tuning
pub mod goal {
    /// Initial calorie step of the directed search (kcal/day)
    pub const INITIAL_STEP: f64 = 200.0;
    /// Trials with negative weight tolerated before giving up
    pub const MAX_UNSTABLE_TRIALS: u32 = 10;
    /// Hard cap on search trials
    pub const MAX_TRIALS: u32 = 10_000;
}
