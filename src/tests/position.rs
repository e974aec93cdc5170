use crate::{
    prelude::{
        Config, Coordinate, ErrorMetric, Measurement, Method, Observation, Solver, TowerSelection,
    },
    tests::{berlin_observations, init_logger},
    Error,
};
use rstest::*;

#[test]
fn single_measurement() {
    let solver = Solver::new();
    let tower = Coordinate::new(52.0, 13.0);
    for method in Method::all() {
        let estimate = solver
            .laterate(&[Measurement::new(tower, 2.0)], ErrorMetric::MAE, method)
            .unwrap();
        assert_eq!(estimate.latitude(), 52.0);
        assert_eq!(estimate.longitude(), 13.0);
        assert_eq!(estimate.radius_km, 2.0);
        assert_eq!(estimate.towers, 1);
        assert!(estimate.converged);
    }
    // nothing to optimize, nothing memoized
    assert_eq!(solver.position_cache_statistics().entries, 0);
}

#[test]
fn single_observation() {
    init_logger();
    let solver = Solver::new();
    let cfg = Config::default();
    let obs = Observation::new(Coordinate::new(52.0, 13.0), 40);
    let distance = solver.estimate_distance(&obs, &cfg.propagation).unwrap();

    // unresolved towers never contribute
    let observations = [Observation::unresolved(60), obs, Observation::unresolved(10)];
    let estimate = solver.estimate_position(&observations, &cfg).unwrap();
    assert_eq!(estimate.coordinate, Coordinate::new(52.0, 13.0));
    assert_eq!(estimate.radius_km, distance);
}

#[rstest]
#[case(Method::LBfgsB)]
#[case(Method::Bfgs)]
#[case(Method::ConjugateGradient)]
#[case(Method::Slsqp)]
#[case(Method::NelderMead)]
fn perpendicular_bisector(#[case] method: Method) {
    init_logger();
    let solver = Solver::new();
    let a = Coordinate::new(52.0, 13.0);
    let b = Coordinate::new(52.09, 13.0);
    assert!((a.geodesic_distance_km(&b) - 10.0).abs() < 0.1);

    let measurements = [Measurement::new(a, 5.0), Measurement::new(b, 5.0)];
    let estimate = solver
        .laterate(&measurements, ErrorMetric::MAE, method)
        .unwrap();

    let da = estimate.coordinate.geodesic_distance_km(&a);
    let db = estimate.coordinate.geodesic_distance_km(&b);
    assert!((da - db).abs() < 1.0, "{}: {:?}", method, estimate);
    assert!(estimate.radius_km >= 0.1);
    assert!(estimate.radius_km < 0.2, "{}: {:?}", method, estimate);
}

/// Three towers and the exact distances to (52.01, 13.01)
fn exact_measurements() -> (Coordinate, Vec<Measurement>) {
    let target = Coordinate::new(52.01, 13.01);
    let measurements = [
        Coordinate::new(52.0, 13.0),
        Coordinate::new(52.1, 13.0),
        Coordinate::new(52.0, 13.15),
    ]
    .iter()
    .map(|tower| Measurement::new(*tower, tower.geodesic_distance_km(&target)))
    .collect();
    (target, measurements)
}

#[test]
fn radius_floor() {
    let solver = Solver::new();
    let (target, measurements) = exact_measurements();
    for metric in ErrorMetric::all() {
        let estimate = solver
            .laterate(&measurements, metric, Method::NelderMead)
            .unwrap();
        assert!(estimate.radius_km >= 0.1, "{}: {:?}", metric, estimate);
    }

    let estimate = solver
        .laterate(&measurements, ErrorMetric::MSE, Method::NelderMead)
        .unwrap();
    assert!(estimate.coordinate.geodesic_distance_km(&target) < 0.05);
    assert!(estimate.radius_km < 0.11);
}

#[test]
fn mean_error_bias() {
    // ME is signed: its minimum is not where distances match, but where the
    // candidate is as close as possible to all towers at once.
    // This is a known property of the metric, kept as is.
    let solver = Solver::new();
    let (target, measurements) = exact_measurements();
    assert!(ErrorMetric::ME.evaluate_at(&target, &measurements).abs() < 1.0E-9);

    let estimate = solver
        .laterate(&measurements, ErrorMetric::ME, Method::NelderMead)
        .unwrap();
    assert!(estimate.coordinate.geodesic_distance_km(&target) > 1.0);
    assert!(ErrorMetric::ME.evaluate_at(&estimate.coordinate, &measurements) < -0.05);
    assert!(estimate.radius_km > 0.15);
}

#[test]
fn longitude_fold() {
    // longitudes are folded like latitudes, into [-90, 90[:
    // a device near Tokyo cannot be located. This is a known limitation.
    let solver = Solver::new();
    let observations = vec![
        Observation::new(Coordinate::new(35.68, 139.69), 40),
        Observation::new(Coordinate::new(35.70, 139.75), 32),
        Observation::new(Coordinate::new(35.66, 139.72), 28),
    ];
    let estimate = solver
        .estimate_position(&observations, &Config::default())
        .unwrap();
    assert!(estimate.longitude() >= -90.0 && estimate.longitude() < 90.0);
    assert!(estimate.radius_km > 1000.0, "r={}km", estimate.radius_km);
}

#[test]
fn low_confidence_estimate() {
    // SLSQP exits before meeting its tolerance on this set:
    // the best iterate is still returned, flagged as such
    init_logger();
    let solver = Solver::new();
    let cfg = Config::default().with_method(Method::Slsqp);
    let estimate = solver
        .estimate_position(&berlin_observations(), &cfg)
        .unwrap();
    assert!(!estimate.converged);
    assert_eq!(estimate.towers, 3);
    assert!(estimate.latitude().is_finite() && estimate.longitude().is_finite());
    assert!(estimate.radius_km.is_finite() && estimate.radius_km >= 0.1);

    let again = solver
        .estimate_position(&berlin_observations(), &cfg)
        .unwrap();
    assert_eq!(again, estimate);
    assert_eq!(solver.position_cache_statistics().hits, 1);
}

#[test]
fn idempotence() {
    init_logger();
    let solver = Solver::new();
    let observations = berlin_observations();
    let cfg = Config::default();

    let first = solver.estimate_position(&observations, &cfg).unwrap();
    let second = solver.estimate_position(&observations, &cfg).unwrap();
    assert_eq!(first.latitude().to_bits(), second.latitude().to_bits());
    assert_eq!(first.longitude().to_bits(), second.longitude().to_bits());
    assert_eq!(first.radius_km.to_bits(), second.radius_km.to_bits());
    assert_eq!(solver.position_cache_statistics().hits, 1);

    // observation order does not matter
    let mut reversed = observations.clone();
    reversed.reverse();
    let third = solver.estimate_position(&reversed, &cfg).unwrap();
    assert_eq!(first, third);

    solver.clear_cache();
    let recomputed = solver.estimate_position(&observations, &cfg).unwrap();
    assert!((first.latitude() - recomputed.latitude()).abs() < 1.0E-4);
    assert!((first.longitude() - recomputed.longitude()).abs() < 1.0E-4);
}

#[test]
fn duplicated_towers() {
    let solver = Solver::new();
    let mut observations = berlin_observations();
    // 0.1 m away from the first tower, stronger
    observations.push(Observation::new(Coordinate::new(52.520001, 13.405), 50).with_arfcn(20));

    let estimate = solver
        .estimate_position(&observations, &Config::default())
        .unwrap();
    assert_eq!(estimate.towers, 3);

    // single tower mode retains the strongest (deduplicated) tower
    let estimate = solver
        .estimate_position(&observations, &Config::default().with_max_towers(1))
        .unwrap();
    assert_eq!(estimate.coordinate, Coordinate::new(52.520001, 13.405));
    let expected = solver
        .estimate_distance(&observations[3], &Config::default().propagation)
        .unwrap();
    assert_eq!(estimate.radius_km, expected);
}

#[test]
fn tower_selection() {
    let solver = Solver::new();
    let observations = berlin_observations();

    let cfg = Config::default().with_max_towers(2);
    let estimate = solver.estimate_position(&observations, &cfg).unwrap();
    assert_eq!(estimate.towers, 2);

    let cfg = cfg.with_selection(TowerSelection::Random { seed: 3 });
    let a = solver.estimate_position(&observations, &cfg).unwrap();
    let b = solver.estimate_position(&observations, &cfg).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.towers, 2);
}

#[test]
fn every_combination_succeeds() {
    let solver = Solver::new();
    let observations = berlin_observations();
    for metric in ErrorMetric::all() {
        for method in Method::all() {
            let cfg = Config::default().with_metric(metric).with_method(method);
            let estimate = solver.estimate_position(&observations, &cfg).unwrap();
            assert!(estimate.radius_km >= 0.1);
            assert!((-90.0..=90.0).contains(&estimate.latitude()));
            assert!((-90.0..=90.0).contains(&estimate.longitude()));
        }
    }
}

#[test]
fn insufficient_data() {
    let solver = Solver::new();
    let cfg = Config::default();
    assert_eq!(
        solver.estimate_position(&[], &cfg),
        Err(Error::InsufficientData)
    );
    let unresolved = [Observation::unresolved(40), Observation::unresolved(20)];
    let err = solver.estimate_position(&unresolved, &cfg).unwrap_err();
    assert_eq!(err, Error::InsufficientData);
    assert!(!err.is_invalid_parameter());

    assert_eq!(
        solver.laterate(&[], ErrorMetric::MAE, Method::NelderMead),
        Err(Error::InsufficientData)
    );
}

#[test]
fn invalid_configuration() {
    let solver = Solver::new();
    let cfg = Config::default().with_max_towers(0);
    assert_eq!(
        solver.estimate_position(&berlin_observations(), &cfg),
        Err(Error::InvalidMaxTowers)
    );
}
