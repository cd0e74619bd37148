//! Scenario runners producing day-indexed output rows
//!
//! Row `i` describes the body on the morning of day `i`, together with that
//! day's intake and expenditure, before the day is integrated. A run of
//! `sim_length` days therefore yields `sim_length + 1` rows.

use rayon::join;
use serde::{Deserialize, Serialize};
use tracing::{info_span, warn};

use crate::baseline::Baseline;
use crate::body_model::BodyState;
use crate::constants::intervention::LOW_INTAKE_WARNING;
use crate::daily_params::DailyParams;
use crate::goal::GoalPlan;
use crate::intervention::Intervention;
use crate::trajectory::build_trajectory;

/// One simulated day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRow {
    pub day: usize,
    /// kg
    pub weight: f64,
    pub fat_percent: f64,
    pub bmi: f64,
    /// Fat mass (kg)
    pub fat: f64,
    /// Lean mass (kg)
    pub lean: f64,
    /// Intake (kcal/day)
    pub calories: f64,
    /// Total energy expenditure (kcal/day)
    pub tee: f64,
}

impl SimulationRow {
    fn capture(day: usize, state: &BodyState, baseline: &Baseline, params: &DailyParams) -> Self {
        SimulationRow {
            day,
            weight: state.weight(baseline),
            fat_percent: state.fat_percent(baseline),
            bmi: state.bmi(baseline),
            fat: state.fat,
            lean: state.lean,
            calories: params.calories,
            tee: state.tee(baseline, params),
        }
    }
}

/// What drives a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scenario {
    /// Free-form schedule of interventions
    Schedule(Vec<Intervention>),
    /// Goal intake until the goal day, maintenance at the goal afterwards
    Goal {
        intervention: Intervention,
        maintenance: Intervention,
        goal_days: u32,
    },
}

impl Scenario {
    /// Goal scenario from a solved plan. Maintenance keeps the goal's
    /// carbohydrate share and activity change, with proportional sodium.
    pub fn from_goal_plan(plan: &GoalPlan, baseline: &Baseline, goal_days: u32) -> Self {
        let goal = &plan.intervention;
        let maintenance = Intervention::with_proportional_sodium(
            goal_days,
            plan.maintenance_calories,
            goal.carb_percent(),
            goal.act_change_percent(),
            baseline,
        )
        .with_title("Maintenance at Goal");

        Scenario::Goal {
            intervention: goal.clone(),
            maintenance,
            goal_days,
        }
    }

    fn params(&self, baseline: &Baseline, days: usize) -> Vec<DailyParams> {
        match self {
            Scenario::Schedule(interventions) => build_trajectory(baseline, interventions, days),
            Scenario::Goal {
                intervention,
                maintenance,
                goal_days,
            } => {
                let goal = DailyParams::from_intervention(intervention, baseline);
                let maint = DailyParams::from_intervention(maintenance, baseline);
                (0..days)
                    .map(|day| if day < *goal_days as usize { goal } else { maint })
                    .collect()
            }
        }
    }

    /// Run the scenario for `sim_length` days
    pub fn run(&self, baseline: &Baseline, sim_length: usize) -> Vec<SimulationRow> {
        let _span = info_span!("simulate", sim_length).entered();

        let params = self.params(baseline, sim_length + 1);
        let mut rows = Vec::with_capacity(params.len());
        let mut state = BodyState::from_baseline(baseline);

        for (day, p) in params.iter().enumerate() {
            rows.push(SimulationRow::capture(day, &state, baseline, p));
            state = state.step(baseline, p);
        }

        rows
    }

    /// Advisory messages for entries whose intake may be nutritionally inadequate
    pub fn low_intake_warnings(&self) -> Vec<String> {
        let entries: Vec<&Intervention> = match self {
            Scenario::Schedule(interventions) => {
                interventions.iter().filter(|i| i.is_active()).collect()
            }
            Scenario::Goal { intervention, .. } => vec![intervention],
        };

        entries
            .into_iter()
            .filter(|i| i.is_low_intake())
            .map(|i| {
                warn!(day = i.day(), calories = i.calories(), "Low intake phase");
                format!(
                    "Phase starting day {} has an intake of {:.0} calories/day, below {} which may not meet nutritional needs.",
                    i.day(),
                    i.calories(),
                    LOW_INTAKE_WARNING
                )
            })
            .collect()
    }
}

/// Expected trajectory with upper and lower uncertainty bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationBands {
    pub expected: Vec<SimulationRow>,
    pub upper: Vec<SimulationRow>,
    pub lower: Vec<SimulationRow>,
}

impl SimulationBands {
    /// Run the scenario on the profile and on two copies whose energy offset is
    /// shifted by plus and minus `uncertainty_percent` of maintenance. The three
    /// runs share nothing and execute in parallel.
    pub fn run(
        baseline: &Baseline,
        scenario: &Scenario,
        sim_length: usize,
        uncertainty_percent: f64,
    ) -> Self {
        let spread = baseline.maintenance_calories() * uncertainty_percent / 100.0;
        let upper_profile = baseline.clone().with_energy_offset(spread);
        let lower_profile = baseline.clone().with_energy_offset(-spread);

        let (expected, (upper, lower)) = join(
            || scenario.run(baseline, sim_length),
            || {
                join(
                    || scenario.run(&upper_profile, sim_length),
                    || scenario.run(&lower_profile, sim_length),
                )
            },
        );

        SimulationBands {
            expected,
            upper,
            lower,
        }
    }

    pub fn final_row(&self) -> Option<&SimulationRow> {
        self.expected.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::Sex;
    use crate::goal::{GoalRequest, GoalSearch};

    fn reference() -> Baseline {
        Baseline::new(Sex::Male, 23.0, 180.0, 70.0)
    }

    #[test]
    fn test_empty_schedule_holds_weight() {
        let b = reference();
        let rows = Scenario::Schedule(Vec::new()).run(&b, 60);
        assert_eq!(rows.len(), 61);
        assert_eq!(rows[0].day, 0);
        assert!((rows[0].weight - 70.0).abs() < 1e-9);
        assert!((rows[60].weight - 70.0).abs() < 0.1);
        assert!((rows[0].tee - b.maintenance_calories()).abs() < 1e-6);
    }

    #[test]
    fn test_zero_glycogen_profile_rows_are_finite() {
        let b = reference().with_glycogen(0.0);
        let rows = Scenario::Schedule(Vec::new()).run(&b, 30);
        assert!((rows[0].weight - 70.0).abs() < 1e-9);
        assert!(rows.iter().all(|r| r.weight.is_finite() && r.tee.is_finite()));
        assert!((rows[30].weight - 70.0).abs() < 0.1);
    }

    #[test]
    fn test_schedule_deficit_rows() {
        let b = reference();
        let cut = Intervention::new(10, 1800.0, 50.0, 0.0, 4000.0);
        let rows = Scenario::Schedule(vec![cut]).run(&b, 100);

        assert_eq!(rows[9].calories, b.maintenance_calories());
        assert_eq!(rows[10].calories, 1800.0);
        assert!(rows[100].weight < rows[10].weight);
        assert!(rows[100].fat < rows[10].fat);
        assert!(rows.iter().all(|r| (r.fat + r.lean - r.weight).abs() < 5.0));
    }

    #[test]
    fn test_goal_scenario_switches_to_maintenance() {
        let b = reference();
        let plan = GoalSearch::plan(&b, &GoalRequest::new(65.0, 90)).unwrap();
        let scenario = Scenario::from_goal_plan(&plan, &b, 90);
        let rows = scenario.run(&b, 180);

        assert_eq!(rows[89].calories, plan.intervention.calories());
        assert!((rows[90].calories - plan.maintenance_calories).abs() < 1e-9);
        assert!((rows[90].weight - 65.0).abs() <= 0.01);
    }

    #[test]
    fn test_bands_bracket_expected() {
        let b = reference();
        let scenario = Scenario::Schedule(vec![Intervention::new(0, 2000.0, 50.0, 0.0, 4000.0)]);
        let bands = SimulationBands::run(&b, &scenario, 120, 10.0);

        assert_eq!(bands.expected.len(), 121);
        let last = 120;
        assert!(bands.upper[last].weight > bands.expected[last].weight);
        assert!(bands.lower[last].weight < bands.expected[last].weight);
        assert_eq!(bands.final_row().map(|r| r.day), Some(120));
    }

    #[test]
    fn test_low_intake_warnings() {
        let low = Intervention::new(5, 800.0, 50.0, 0.0, 4000.0);
        let inactive_low = Intervention::new(9, 500.0, 50.0, 0.0, 4000.0).with_active(false);
        let fine = Intervention::new(20, 2000.0, 50.0, 0.0, 4000.0);
        let warnings = Scenario::Schedule(vec![low, inactive_low, fine]).low_intake_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("day 5"));
    }
}
