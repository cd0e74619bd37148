//! Goal search: the constant daily intake that reaches a target weight by a target day
//!
//! The search relies on final simulated weight being monotonically
//! non-decreasing in daily calories for a fixed horizon and activity level. It
//! steps upward from the minimum-calorie floor and halves the step whenever a
//! trial overshoots the target, rolling back to the last accepted intake.
//!
//! Failure is an ordinary outcome here, reported as [`GoalError::Unachievable`]
//! with a reason code, never a panic.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::baseline::Baseline;
use crate::body_model::{project_intervention, BodyState};
use crate::constants::goal::{INITIAL_STEP, MAX_TRIALS, MAX_UNSTABLE_TRIALS};
use crate::constants::intervention::LOW_INTAKE_WARNING;
use crate::intervention::Intervention;

/// Why a goal cannot be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnachievableReason {
    /// Even the minimum-calorie floor cannot bring weight down to the goal
    StarvationInfeasible,
    /// Too many trials produced a physically impossible (negative) weight
    InstabilityExceeded,
    /// The search did not settle within the trial budget
    NonConvergence,
}

impl std::fmt::Display for UnachievableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnachievableReason::StarvationInfeasible => {
                write!(f, "not reachable even at the minimum intake")
            }
            UnachievableReason::InstabilityExceeded => {
                write!(f, "simulation became physically unstable")
            }
            UnachievableReason::NonConvergence => write!(f, "search did not converge"),
        }
    }
}

/// Goal search errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GoalError {
    #[error("Unachievable goal of {goal_weight} kg in {goal_days} days: {reason}")]
    Unachievable {
        reason: UnachievableReason,
        goal_weight: f64,
        goal_days: u32,
    },
    #[error("Invalid goal request: {0}")]
    InvalidRequest(String),
}

impl GoalError {
    pub fn reason(&self) -> Option<UnachievableReason> {
        match self {
            GoalError::Unachievable { reason, .. } => Some(*reason),
            GoalError::InvalidRequest(_) => None,
        }
    }
}

/// What to solve for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRequest {
    /// Target weight (kg)
    pub goal_weight: f64,
    /// Horizon (days)
    pub goal_days: u32,
    /// Activity change relative to the profile (%)
    pub act_change_percent: f64,
    /// Lowest intake the search may propose (kcal/day)
    pub min_calories: f64,
    /// Accepted distance from the goal weight (kg)
    pub tolerance: f64,
}

impl GoalRequest {
    pub fn new(goal_weight: f64, goal_days: u32) -> Self {
        GoalRequest {
            goal_weight,
            goal_days,
            act_change_percent: 0.0,
            min_calories: LOW_INTAKE_WARNING,
            tolerance: 0.01,
        }
    }

    pub fn with_activity_change(mut self, percent: f64) -> Self {
        self.act_change_percent = percent;
        self
    }

    pub fn with_min_calories(mut self, calories: f64) -> Self {
        self.min_calories = calories;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn validate(&self) -> Result<(), GoalError> {
        if !self.goal_weight.is_finite() || self.goal_weight <= 0.0 {
            return Err(GoalError::InvalidRequest(format!(
                "goal weight must be positive, got {}",
                self.goal_weight
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(GoalError::InvalidRequest(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if !self.min_calories.is_finite() || !self.act_change_percent.is_finite() {
            return Err(GoalError::InvalidRequest(
                "minimum calories and activity change must be finite".to_string(),
            ));
        }
        Ok(())
    }

    fn unachievable(&self, reason: UnachievableReason) -> GoalError {
        GoalError::Unachievable {
            reason,
            goal_weight: self.goal_weight,
            goal_days: self.goal_days,
        }
    }
}

/// A solved goal with what follows from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalPlan {
    /// Constant intake reaching the goal
    pub intervention: Intervention,
    /// Simulated state on the goal day
    pub final_state: BodyState,
    /// Simulated weight on the goal day (kg)
    pub final_weight: f64,
    /// Intake that holds the goal composition afterwards (kcal/day)
    pub maintenance_calories: f64,
    /// BMI at the goal weight
    pub target_bmi: f64,
    /// Advisory messages for the end user
    pub warnings: Vec<String>,
}

/// Directed search over constant daily calories
pub struct GoalSearch;

impl GoalSearch {
    /// Find the constant intake that brings `baseline` to the goal weight
    #[instrument(skip(baseline), fields(weight = baseline.weight()))]
    pub fn for_goal(baseline: &Baseline, request: &GoalRequest) -> Result<Intervention, GoalError> {
        request.validate()?;

        let trial = |calories: f64| {
            Intervention::with_proportional_sodium(
                0,
                calories,
                baseline.carb_intake_pct(),
                request.act_change_percent,
                baseline,
            )
            .with_title("Goal Intervention")
        };

        if baseline.weight() == request.goal_weight && request.act_change_percent == 0.0 {
            debug!("Goal equals current weight, returning maintenance");
            return Ok(trial(baseline.maintenance_calories()));
        }

        let days = request.goal_days as usize;
        let floor = trial(request.min_calories);
        let starvation_weight = project_intervention(baseline, &floor, days)
            .weight(baseline)
            .max(0.0);

        if (starvation_weight - request.goal_weight).abs() < request.tolerance
            || request.goal_weight <= starvation_weight
        {
            warn!(
                starvation_weight,
                goal_weight = request.goal_weight,
                "Goal below what the minimum intake reaches"
            );
            return Err(request.unachievable(UnachievableReason::StarvationInfeasible));
        }

        let calories = directed_search(
            floor.calories(),
            request.goal_weight,
            request.tolerance,
            |calories| project_intervention(baseline, &trial(calories), days).weight(baseline),
        )
        .map_err(|reason| request.unachievable(reason))?;

        info!(calories, goal_weight = request.goal_weight, "Goal intake resolved");
        Ok(trial(calories))
    }

    /// Solve the goal and derive the maintenance intake at the goal weight
    pub fn plan(baseline: &Baseline, request: &GoalRequest) -> Result<GoalPlan, GoalError> {
        let intervention = Self::for_goal(baseline, request)?;
        let final_state = project_intervention(baseline, &intervention, request.goal_days as usize);
        let maintenance_calories =
            final_state.cals_for_balance(baseline, intervention.act_param(baseline));

        let mut warnings = Vec::new();
        if intervention.is_low_intake() {
            warn!(calories = intervention.calories(), "Goal intake below nutritional threshold");
            warnings.push(format!(
                "Intake below {} calories/day may not meet nutritional needs.",
                LOW_INTAKE_WARNING
            ));
        }

        Ok(GoalPlan {
            final_weight: final_state.weight(baseline),
            target_bmi: baseline.bmi_at(request.goal_weight),
            intervention,
            final_state,
            maintenance_calories,
            warnings,
        })
    }
}

/// Step upward from `start`, halving the step on overshoot, until `evaluate`
/// lands within `tolerance` of `goal`
fn directed_search<F>(
    start: f64,
    goal: f64,
    tolerance: f64,
    mut evaluate: F,
) -> Result<f64, UnachievableReason>
where
    F: FnMut(f64) -> f64,
{
    let mut calories = start;
    let mut step = INITIAL_STEP;
    let mut unstable = 0u32;

    for trial in 1..=MAX_TRIALS {
        let accepted = calories;
        calories += step;

        let weight = evaluate(calories);
        debug!(trial, calories, step, weight, "Goal search trial");

        if weight < 0.0 || !weight.is_finite() {
            unstable += 1;
            warn!(calories, unstable, "Trial produced a non-physical weight");
            if unstable > MAX_UNSTABLE_TRIALS {
                return Err(UnachievableReason::InstabilityExceeded);
            }
        }

        let error = (goal - weight).abs();
        if error <= tolerance {
            return Ok(calories);
        }
        if weight > goal {
            step /= 2.0;
            calories = accepted;
        }
    }

    Err(UnachievableReason::NonConvergence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::{BaselineInputs, Sex};

    fn reference() -> Baseline {
        Baseline::from_inputs(&BaselineInputs {
            sex: Some(Sex::Male),
            age: Some(23.0),
            height: Some(180.0),
            weight: Some(70.0),
            bfp: Some(18.0),
            rmr: Some(1708.0),
            pal: Some(1.6),
            ..Default::default()
        })
    }

    #[test]
    fn test_same_weight_returns_maintenance() {
        let b = reference();
        let req = GoalRequest::new(70.0, 100).with_min_calories(0.0).with_tolerance(0.001);
        let goal = GoalSearch::for_goal(&b, &req).unwrap();
        assert!((goal.calories() - b.maintenance_calories()).abs() < 1.0);
        assert_eq!(goal.title(), "Goal Intervention");
    }

    #[test]
    fn test_weight_loss_goal() {
        let b = reference();
        let req = GoalRequest::new(65.0, 180).with_min_calories(0.0).with_tolerance(0.001);
        let goal = GoalSearch::for_goal(&b, &req).unwrap();

        assert!(goal.calories() < b.maintenance_calories());
        assert!(goal.calories() > 1500.0);

        let reached = project_intervention(&b, &goal, 180).weight(&b);
        assert!((reached - 65.0).abs() <= 0.001);
    }

    #[test]
    fn test_weight_gain_goal() {
        let b = reference();
        let req = GoalRequest::new(75.0, 180).with_tolerance(0.01);
        let goal = GoalSearch::for_goal(&b, &req).unwrap();

        assert!(goal.calories() > b.maintenance_calories());
        let reached = project_intervention(&b, &goal, 180).weight(&b);
        assert!((reached - 75.0).abs() <= 0.01);
    }

    #[test]
    fn test_goal_carries_profile_and_activity() {
        let b = reference();
        let req = GoalRequest::new(60.0, 120).with_activity_change(20.0);
        let goal = GoalSearch::for_goal(&b, &req).unwrap();

        assert_eq!(goal.act_change_percent(), 20.0);
        assert_eq!(goal.carb_percent(), b.carb_intake_pct());
        let expected_sodium = b.sodium() * goal.calories() / b.maintenance_calories();
        assert!((goal.sodium() - expected_sodium).abs() < 1e-9);
    }

    #[test]
    fn test_too_fast_loss_is_unachievable() {
        let b = reference();
        let req = GoalRequest::new(20.0, 10).with_min_calories(0.0).with_tolerance(0.001);
        let err = GoalSearch::for_goal(&b, &req).unwrap_err();
        assert_eq!(err.reason(), Some(UnachievableReason::StarvationInfeasible));
        assert!(err.to_string().contains("Unachievable"));
    }

    #[test]
    fn test_floor_above_needed_intake_is_unachievable() {
        let b = reference();
        let req = GoalRequest::new(65.0, 180).with_min_calories(3000.0).with_tolerance(0.001);
        let err = GoalSearch::for_goal(&b, &req).unwrap_err();
        assert_eq!(err.reason(), Some(UnachievableReason::StarvationInfeasible));
    }

    #[test]
    fn test_invalid_request() {
        let b = reference();
        let err = GoalSearch::for_goal(&b, &GoalRequest::new(f64::NAN, 100)).unwrap_err();
        assert!(matches!(err, GoalError::InvalidRequest(_)));

        let err =
            GoalSearch::for_goal(&b, &GoalRequest::new(60.0, 100).with_tolerance(0.0)).unwrap_err();
        assert!(matches!(err, GoalError::InvalidRequest(_)));
    }

    #[test]
    fn test_plan_maintenance_at_goal() {
        let b = reference();
        let plan = GoalSearch::plan(&b, &GoalRequest::new(65.0, 180)).unwrap();

        assert!((plan.final_weight - 65.0).abs() <= 0.01);
        assert!(plan.maintenance_calories < b.maintenance_calories());
        assert!(plan.maintenance_calories > plan.intervention.calories());
        assert!((plan.target_bmi - b.bmi_at(65.0)).abs() < 1e-12);
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_search_instability_counter() {
        let mut calls = 0;
        let result = directed_search(0.0, 50.0, 0.01, |_| {
            calls += 1;
            -1.0
        });
        assert_eq!(result, Err(UnachievableReason::InstabilityExceeded));
        assert_eq!(calls, MAX_UNSTABLE_TRIALS + 1);
    }

    #[test]
    fn test_search_non_convergence() {
        // A discontinuous response never lands inside the tolerance
        let result = directed_search(0.0, 65.0, 0.01, |c| if c < 1000.0 { 50.0 } else { 80.0 });
        assert_eq!(result, Err(UnachievableReason::NonConvergence));
    }

    #[test]
    fn test_search_on_linear_response() {
        let calories = directed_search(0.0, 30.0, 1e-6, |c| c / 100.0).unwrap();
        assert!((calories - 3000.0).abs() < 1e-3);
    }
}
