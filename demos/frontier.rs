//! Efficient Frontier Example
//!
//! Runs the full pipeline for a small universe: minimum-volatility and
//! tangency portfolios, a log-spaced frontier sweep, and the
//! utility-optimal mix of the risk-free asset and the tangency
//! portfolio.

use nalgebra::DMatrix;

use efficient_frontier::prelude::*;

fn main() -> Result<()> {
    println!("=== Efficient Frontier ===\n");

    let universe = AssetUniverse::new(["A", "B", "C", "D"])?;
    let symbols: Vec<String> = universe.symbols().to_vec();

    #[rustfmt::skip]
    let sigma = DMatrix::from_row_slice(4, 4, &[
         0.04, 0.01, 0.00, -0.01,
         0.01, 0.03, 0.00,  0.00,
         0.00, 0.00, 0.02,  0.00,
        -0.01, 0.00, 0.00,  0.01,
    ]);
    let inputs = MarketInputs::new(universe, vec![0.12, 0.10, 0.07, 0.05], sigma)?;

    let risk_free_rate = 0.02;
    let profile = RiskProfile::Moderate;
    println!("Risk-free rate: {:.1}%", risk_free_rate * 100.0);
    println!(
        "Risk profile: {} (risk aversion {})\n",
        profile.label(),
        profile.risk_aversion()
    );

    let report = analyze(
        inputs,
        WeightBounds::long_only(),
        risk_free_rate,
        profile.risk_aversion(),
        WeightBounds::long_only(),
        DEFAULT_FRONTIER_POINTS,
    )?;

    println!("Tangency portfolio:");
    for (symbol, weight) in symbols.iter().zip(report.tangency_weights.values()) {
        println!("  {}: {:.2}%", symbol, weight * 100.0);
    }
    println!(
        "  return {:.2}%, volatility {:.2}%, Sharpe {:.4}\n",
        report.tangency.expected_return * 100.0,
        report.tangency.volatility * 100.0,
        report.tangency.sharpe.unwrap_or(f64::NAN)
    );

    println!(
        "Minimum volatility: return {:.2}%, volatility {:.2}%\n",
        report.min_volatility.expected_return * 100.0,
        report.min_volatility.volatility * 100.0
    );

    println!("--- Frontier ({} points) ---", report.frontier.len());
    for point in &report.frontier {
        println!(
            "  volatility {:.2}%  ->  return {:.2}%",
            point.volatility * 100.0,
            point.expected_return * 100.0
        );
    }

    println!("\nOptimal risk-free/tangency mix:");
    println!("  tangency weight: {:.2}%", report.optimum.risky_weight * 100.0);
    println!(
        "  return {:.2}%, volatility {:.2}%, utility {:.4}",
        report.optimum.point.expected_return * 100.0,
        report.optimum.point.volatility * 100.0,
        report.utility
    );

    Ok(())
}
