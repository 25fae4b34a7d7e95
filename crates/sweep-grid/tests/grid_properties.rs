use proptest::prelude::*;
use sweep_core::ParameterRange;
use sweep_grid::{generate_grid, linspace};

proptest! {
    #[test]
    fn linspace_hits_endpoints_and_is_monotone(
        low in -1.0e3f64..1.0e3,
        span in 0.0f64..1.0e3,
        count in 2usize..64,
    ) {
        let high = low + span;
        let values = linspace(low, high, count);
        prop_assert_eq!(values.len(), count);
        prop_assert_eq!(values[0], low);
        prop_assert_eq!(values[count - 1], high);
        for pair in values.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn grid_size_is_product_and_ids_are_dense(
        counts in proptest::collection::vec(0usize..6, 1..4),
    ) {
        let ranges: Vec<ParameterRange> = counts
            .iter()
            .enumerate()
            .map(|(idx, &samples)| ParameterRange::new(format!("p{idx}"), 0.0, 1.0, samples))
            .collect();
        let table = generate_grid(&ranges).expect("grid");
        let expected: usize = counts.iter().product();
        prop_assert_eq!(table.len(), expected);
        let ids = table.ids();
        let dense: Vec<u64> = (0..expected as u64).collect();
        prop_assert_eq!(ids, dense);
    }
}

#[test]
fn first_range_varies_slowest() {
    let table = generate_grid(&[
        ParameterRange::new("outer", 0.0, 1.0, 2),
        ParameterRange::new("inner", 10.0, 30.0, 3),
    ])
    .expect("grid");
    let pairs: Vec<(f64, f64)> = table
        .rows
        .iter()
        .map(|row| (row.value("outer").unwrap(), row.value("inner").unwrap()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (0.0, 10.0),
            (0.0, 20.0),
            (0.0, 30.0),
            (1.0, 10.0),
            (1.0, 20.0),
            (1.0, 30.0),
        ]
    );
}

#[test]
fn immunity_validation_grid_matches_reference_corners() {
    let table = generate_grid(&[
        ParameterRange::new("max_clinical_probability", 0.9, 0.99, 10),
        ParameterRange::new("immune_effect_on_progression_to_clinical", 3.0, 6.0, 10),
        ParameterRange::new("mid_point", 0.1, 0.4, 10),
    ])
    .expect("grid");
    assert_eq!(table.len(), 1000);
    assert_eq!(table.rows.first().unwrap().id, 0);
    assert_eq!(table.rows.last().unwrap().id, 999);

    let first = &table.rows[0];
    assert_eq!(first.value("max_clinical_probability"), Some(0.9));
    assert_eq!(first.value("immune_effect_on_progression_to_clinical"), Some(3.0));
    assert_eq!(first.value("mid_point"), Some(0.1));

    let last = &table.rows[999];
    assert_eq!(last.value("max_clinical_probability"), Some(0.99));
    assert_eq!(last.value("immune_effect_on_progression_to_clinical"), Some(6.0));
    assert_eq!(last.value("mid_point"), Some(0.4));

    // id 110 = outer index 1, middle index 1, inner index 0
    let row = table.row(110).unwrap();
    assert!((row.value("max_clinical_probability").unwrap() - 0.91).abs() < 1e-12);
    let effect = row.value("immune_effect_on_progression_to_clinical").unwrap();
    assert!((effect - 3.333_333_333_333_333).abs() < 1e-12);
    assert_eq!(row.value("mid_point"), Some(0.1));
}
