//! Day-indexed schedule of driving inputs
//!
//! [`build_trajectory`] turns a set of schedule entries into one
//! [`DailyParams`] per day. Inactive entries are ignored. An entry takes effect
//! on its start day as a step change; a ramped entry is additionally approached
//! linearly from the last change day, so the values leading up to it form a
//! continuous ramp that reaches the target exactly on the start day.

use tracing::debug;

use crate::baseline::Baseline;
use crate::daily_params::DailyParams;
use crate::intervention::Intervention;

/// Build the driving inputs for days `0..days`
pub fn build_trajectory(
    baseline: &Baseline,
    interventions: &[Intervention],
    days: usize,
) -> Vec<DailyParams> {
    let mut active: Vec<&Intervention> = interventions.iter().filter(|i| i.is_active()).collect();
    active.sort_by_key(|i| i.day());

    debug!(
        entries = interventions.len(),
        active = active.len(),
        days,
        "Building parameter trajectory"
    );

    let mut trajectory = Vec::with_capacity(days);
    let mut current = DailyParams::from_baseline(baseline);
    let mut last_change = 0usize;

    for day in 0..days {
        // With duplicate start days the first entry wins
        if let Some(entry) = active.iter().find(|i| i.day() as usize == day) {
            current = DailyParams::from_intervention(entry, baseline);
            last_change = day;
        }

        let upcoming = active
            .iter()
            .find(|i| i.day() as usize > day && i.is_ramped());

        match upcoming {
            Some(target) if day >= last_change => {
                let span = target.day() as usize - last_change;
                let progress = if span == 0 {
                    1.0
                } else {
                    (day - last_change) as f64 / span as f64
                };
                let target = DailyParams::from_intervention(target, baseline);
                trajectory.push(current.lerp(&target, progress));
            }
            _ => trajectory.push(current),
        }
    }

    trajectory
}
