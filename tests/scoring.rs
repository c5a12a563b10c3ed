//! Scoring a small network family by family, the way a structure search would

use mmlscore::{
    BdeCptLearner, BdeLearner, Column, DiscreteColumn, Frame, Learner, LearnerConfig, MlLearner,
    MmlError, Params, RowSelector, RowStatus, Table,
};

use itertools::iproduct;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-8
}

#[test]
/// With no data every learner with a prior predicts uniformly and charges nothing
fn no_data() {
    for (&ess, arity) in iproduct!([0.5, 1.0, 2.5, 5.0, 9.6].iter(), 1usize..6) {
        let learner = BdeLearner::new(ess).unwrap();
        let x = DiscreteColumn::new(arity, vec![]).unwrap();
        let z = Frame::empty(0);

        match learner.parameterize(None, &x, &z).unwrap().params {
            Params::Probabilities(p) => assert!(p.iter().all(|&v| close(1.0 / arity as f64, v))),
            _ => panic!("Wrong parameter type")
        }
        assert_eq!(0.0, learner.parameterize_and_cost(None, &x, &z).unwrap());
    }

    let x = DiscreteColumn::binary(vec![]).unwrap();
    assert_eq!(Some(MmlError::EmptyInput), MlLearner::new().parameterize(None, &x, &Frame::empty(0)).err());
}

#[test]
/// x depends on a, b is noise: the table over a should be cheaper than the table over b
fn parent_choice() {
    let mut rng = StdRng::seed_from_u64(42);
    let n = 400;

    let a: Vec<usize> = (0..n).map(|_| rng.gen_range(0..2)).collect();
    let b: Vec<usize> = (0..n).map(|_| rng.gen_range(0..2)).collect();
    let x: Vec<usize> = a.iter().map(|&v| if rng.gen_bool(0.9) { v } else { 1 - v }).collect();

    let x = DiscreteColumn::binary(x).unwrap();
    let parents = Frame::new(vec![
        DiscreteColumn::binary(a).unwrap(),
        DiscreteColumn::binary(b).unwrap()
    ]).unwrap();

    let learner = BdeCptLearner::new(1.0).unwrap();
    let cost = |columns: Vec<usize>| {
        let z = RowSelector::over_table(&parents, None, Some(columns)).unwrap();
        learner.parameterize_and_cost(None, &x, &z).unwrap()
    };

    let given_a = cost(vec![0]);
    let given_b = cost(vec![1]);
    let marginal = cost(vec![]);
    assert!(given_a < marginal, "{} >= {}", given_a, marginal);
    assert!(given_a < given_b, "{} >= {}", given_a, given_b);
}

#[test]
/// The same bootstrap rows applied to a target and its parents keep them aligned
fn bootstrap_alignment() {
    let mut rng = StdRng::seed_from_u64(7);
    let x = DiscreteColumn::new(3, vec![0, 1, 2, 1, 0, 2]).unwrap();
    let z = Frame::new(vec![DiscreteColumn::new(3, vec![0, 1, 2, 1, 0, 2]).unwrap()]).unwrap();

    let rows = mmlscore::selector::bootstrap_rows(x.len(), 50, &mut rng);
    let xs = RowSelector::over_column(&x, Some(rows.clone())).unwrap();
    let zs = RowSelector::over_table(&z, Some(rows), None).unwrap();

    assert_eq!(50, xs.len());
    assert!((0..xs.len()).all(|r| xs.code(r) == zs.code(r, 0)));
}

#[test]
/// A learner stack read from configuration scores intervened data
fn configured_stack() {
    let config: LearnerConfig = serde_json::from_str(r#"{
        "learner": "intervention",
        "sub": { "learner": "bde", "ess": 2.0 }
    }"#).unwrap();
    let learner = config.build().unwrap();

    let x = DiscreteColumn::binary(vec![1, 0, 0])
        .unwrap()
        .with_status(0, RowStatus::Intervention)
        .unwrap();
    let z = Frame::empty(3);

    // rows [0, 0]: 1/2 * 2/3
    let expected = -(0.5 * 2.0 / 3.0_f64).ln();
    assert!(close(expected, learner.parameterize_and_cost(None, &x, &z).unwrap()));
    assert_eq!("intervention(bde(2))", learner.name());
}
