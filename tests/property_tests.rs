use bwsim::{Baseline, BaselineInputs, BodyState, Intervention, Scenario, Sex};
use proptest::prelude::*;

fn sex_strategy() -> impl Strategy<Value = Sex> {
    prop_oneof![Just(Sex::Male), Just(Sex::Female)]
}

prop_compose! {
    fn adult_profile()(
        sex in sex_strategy(),
        age in 18.0f64..80.0,
        height in 150.0f64..200.0,
        weight in 50.0f64..150.0,
        pal in 1.2f64..2.2
    ) -> Baseline {
        Baseline::from_inputs(&BaselineInputs {
            sex: Some(sex),
            age: Some(age),
            height: Some(height),
            weight: Some(weight),
            pal: Some(pal),
            ..Default::default()
        })
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn profile_quantities_are_physical(baseline in adult_profile()) {
        prop_assert!(baseline.rmr().is_finite() && baseline.rmr() >= 500.0);
        prop_assert!(baseline.bfp() >= 0.0 && baseline.bfp() <= 60.0);
        prop_assert!(baseline.maintenance_calories() > baseline.rmr());
        prop_assert!(baseline.ecw() > 0.0);

        let composition = baseline.body_composition();
        prop_assert!((composition.fat + composition.lean - baseline.weight()).abs() < 1e-9);
    }

    #[test]
    fn initial_state_reproduces_weight(baseline in adult_profile()) {
        let state = BodyState::from_baseline(&baseline);
        prop_assert!((state.weight(&baseline) - baseline.weight()).abs() < 1e-9);
    }

    #[test]
    fn simulation_stays_finite(
        baseline in adult_profile(),
        calories in 1200.0f64..4000.0,
        carbs in 0.0f64..100.0,
        activity in -50.0f64..100.0
    ) {
        let phase = Intervention::with_proportional_sodium(5, calories, carbs, activity, &baseline);
        let rows = Scenario::Schedule(vec![phase]).run(&baseline, 60);

        prop_assert_eq!(rows.len(), 61);
        for row in &rows {
            prop_assert!(row.weight.is_finite() && row.weight > 0.0);
            prop_assert!(row.tee.is_finite());
            prop_assert!(row.fat >= 0.0);
        }
    }

    #[test]
    fn more_food_means_more_weight(
        baseline in adult_profile(),
        low in 1200.0f64..2500.0,
        extra in 100.0f64..1500.0
    ) {
        let run = |cal: f64| {
            let phase = Intervention::new(0, cal, 50.0, 0.0, 4000.0);
            Scenario::Schedule(vec![phase]).run(&baseline, 60)[60].weight
        };
        prop_assert!(run(low) < run(low + extra));
    }
}
