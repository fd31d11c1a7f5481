//! End-to-end report and capital-allocation-line tests.

use nalgebra::DMatrix;

use efficient_frontier::prelude::*;

const TOL: f64 = 1e-4;

fn four_asset_inputs() -> MarketInputs {
    let universe = AssetUniverse::new(["A", "B", "C", "D"]).unwrap();
    #[rustfmt::skip]
    let sigma = DMatrix::from_row_slice(4, 4, &[
         0.04, 0.01, 0.00, -0.01,
         0.01, 0.03, 0.00,  0.00,
         0.00, 0.00, 0.02,  0.00,
        -0.01, 0.00, 0.00,  0.01,
    ]);
    MarketInputs::new(universe, vec![0.12, 0.10, 0.07, 0.05], sigma).unwrap()
}

fn tangency_fixture() -> CapitalAllocationLine {
    // Sharpe 0.65 = (0.15 - 0.02) / 0.20.
    let tangency = PortfolioPoint::with_sharpe(0.15, 0.20, 0.02);
    CapitalAllocationLine::new(0.02, tangency).unwrap()
}

#[test]
fn cal_optimum_clips_to_full_tangency() {
    // Merton ratio 0.65 / (2 * 0.20) = 1.625 clips to the box: the
    // combined portfolio is exactly the tangency portfolio.
    let allocation = tangency_fixture()
        .optimal_allocation(2.0, WeightBounds::long_only())
        .expect("solve failed");

    assert!((allocation.risky_weight - 1.0).abs() < TOL);
    assert!((allocation.point.expected_return - 0.15).abs() < TOL);
    assert!((allocation.point.volatility - 0.20).abs() < TOL);
}

#[test]
fn cal_interior_optimum_matches_merton_ratio() {
    // 0.65 / (4 * 0.20) = 0.8125 sits inside the box.
    let cal = tangency_fixture();
    let allocation = cal
        .optimal_allocation(4.0, WeightBounds::long_only())
        .expect("solve failed");

    assert!((allocation.risky_weight - 0.8125).abs() < TOL);

    // Both return formulations agree on the realized point.
    let x = allocation.risky_weight;
    let via_sharpe = x * 0.65 * 0.20 + 0.02;
    let via_excess = 0.02 + x * (0.15 - 0.02);
    assert!((via_sharpe - via_excess).abs() < 1e-12);
    assert!((allocation.point.expected_return - via_excess).abs() < TOL);
    assert!((allocation.point.volatility - x * 0.20).abs() < TOL);
}

#[test]
fn cal_leverage_borrows_at_the_risk_free_rate() {
    // Merton ratio 0.65 / (1 * 0.20) = 3.25 clips to the leverage cap;
    // the risk-free weight goes to -1.
    let allocation = tangency_fixture()
        .optimal_allocation(1.0, WeightBounds::new(-1.0, 2.0).unwrap())
        .expect("solve failed");

    assert!((allocation.risky_weight - 2.0).abs() < TOL);
    assert!((allocation.point.expected_return - 0.28).abs() < TOL);
    assert!((allocation.point.volatility - 0.40).abs() < TOL);
}

#[test]
fn tangency_point_carries_sharpe() {
    let frontier =
        EfficientFrontier::new(four_asset_inputs(), WeightBounds::long_only()).unwrap();
    let (weights, point) = tangency_portfolio(&frontier, 0.02).expect("solve failed");

    assert!((weights.sum() - 1.0).abs() < 1e-6);
    let sharpe = point.sharpe.expect("tangency point must carry a Sharpe ratio");
    assert!(sharpe > 0.0);
}

#[test]
fn min_volatility_point_has_no_sharpe() {
    let frontier =
        EfficientFrontier::new(four_asset_inputs(), WeightBounds::long_only()).unwrap();
    let (_, point) = min_volatility_portfolio(&frontier).expect("solve failed");
    assert!(point.sharpe.is_none());
}

#[test]
fn analyze_produces_a_consistent_report() {
    let report = analyze(
        four_asset_inputs(),
        WeightBounds::long_only(),
        0.02,
        8.0,
        WeightBounds::long_only(),
        DEFAULT_FRONTIER_POINTS,
    )
    .expect("analysis failed");

    assert_eq!(report.assets.len(), 4);
    assert!(!report.frontier.is_empty());
    assert!(report.frontier.len() <= DEFAULT_FRONTIER_POINTS);

    // The frontier starts at the minimum-volatility portfolio.
    for point in &report.frontier {
        assert!(point.volatility >= report.min_volatility.volatility - 1e-6);
    }

    // The tangency portfolio has the best Sharpe ratio on the curve.
    let tangency_sharpe = report.tangency.sharpe.unwrap();
    for point in &report.frontier {
        let sharpe = (point.expected_return - report.risk_free_rate) / point.volatility;
        assert!(sharpe <= tangency_sharpe + 1e-6);
    }

    // The optimum respects the leverage box and reports its utility.
    assert!(report.optimum.risky_weight >= -TOL);
    assert!(report.optimum.risky_weight <= 1.0 + TOL);
    let expected_utility = quadratic_utility(
        report.optimum.point.expected_return,
        report.optimum.point.volatility,
        8.0,
    );
    assert!((report.utility - expected_utility).abs() < 1e-12);
}

#[test]
fn narrowing_the_universe_costs_utility() {
    let baseline = analyze(
        four_asset_inputs(),
        WeightBounds::long_only(),
        0.02,
        8.0,
        WeightBounds::long_only(),
        DEFAULT_FRONTIER_POINTS,
    )
    .expect("baseline analysis failed");

    // Thematic subset: the two lowest-return assets.
    let universe = AssetUniverse::new(["C", "D"]).unwrap();
    let sigma = DMatrix::from_row_slice(2, 2, &[0.02, 0.0, 0.0, 0.01]);
    let thematic_inputs = MarketInputs::new(universe, vec![0.07, 0.05], sigma).unwrap();
    let thematic = analyze(
        thematic_inputs,
        WeightBounds::long_only(),
        0.02,
        8.0,
        WeightBounds::long_only(),
        DEFAULT_FRONTIER_POINTS,
    )
    .expect("thematic analysis failed");

    // Every thematic portfolio is feasible in the baseline universe, so
    // narrowing cannot gain utility.
    assert!(utility_loss(&baseline, &thematic) >= -1e-9);
}

#[test]
fn asset_points_match_the_diagonal() {
    let inputs = four_asset_inputs();
    let points = asset_points(&inputs);

    assert_eq!(points.len(), 4);
    assert!((points[0].expected_return - 0.12).abs() < 1e-12);
    assert!((points[0].volatility - 0.20).abs() < 1e-12);
    assert!((points[2].volatility - 0.02_f64.sqrt()).abs() < 1e-12);
}
