//! Enumerated dashboard configuration: risk profiles and investment
//! themes.
//!
//! These are pure lookups with no mutable state; the UI layer maps its
//! selectors onto them and the core never reads them implicitly.

use crate::error::Result;
use crate::market::AssetUniverse;

/// Ticker letters defining the letter-themed universe.
const THEME_LETTERS: [char; 5] = ['L', 'E', 'H', 'I', 'G'];

/// Beta at or above which an asset counts as high-beta.
const HIGH_BETA_CUTOFF: f64 = 1.0;

/// Risk-appetite labels offered by the dashboard, mapped to
/// risk-aversion coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RiskProfile {
    Mild,
    Moderate,
    Elevated,
    Severe,
    Extreme,
}

impl RiskProfile {
    /// All profiles, mildest first.
    pub const ALL: [RiskProfile; 5] = [
        RiskProfile::Mild,
        RiskProfile::Moderate,
        RiskProfile::Elevated,
        RiskProfile::Severe,
        RiskProfile::Extreme,
    ];

    /// Risk-aversion coefficient for the quadratic utility objective.
    ///
    /// Monotonically decreasing in risk appetite.
    pub fn risk_aversion(&self) -> f64 {
        match self {
            RiskProfile::Mild => 10.0,
            RiskProfile::Moderate => 6.0,
            RiskProfile::Elevated => 4.0,
            RiskProfile::Severe => 2.0,
            RiskProfile::Extreme => 1.0,
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            RiskProfile::Mild => "Mild Risk",
            RiskProfile::Moderate => "Moderate",
            RiskProfile::Elevated => "Elevated Risk",
            RiskProfile::Severe => "Severe Risk",
            RiskProfile::Extreme => "Extreme Risk",
        }
    }
}

/// Metadata the theme filters select on, supplied by the data layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetProfile {
    /// Ticker symbol.
    pub symbol: String,
    /// Sector name.
    pub sector: String,
    /// Market beta.
    pub beta: f64,
    /// Price per share.
    pub price: f64,
    /// Whether the asset passes the ESG screen.
    pub esg: bool,
}

/// Thematic universe filters offered by the dashboard.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Theme {
    /// Assets passing the ESG screen.
    Esg,
    /// Tickers containing any of L, E, H, I, G.
    TickerLetters,
    /// Betas below the market-beta cutoff.
    LowBeta,
    /// Betas at or above the market-beta cutoff.
    HighBeta,
    /// Assets in any of the named sectors.
    Sectors(Vec<String>),
    /// The `n` highest prices per share.
    HighestPrice(usize),
}

impl Theme {
    /// Select the thematic universe from asset metadata.
    ///
    /// Fails when the filter matches nothing, since an empty universe
    /// cannot be optimized.
    pub fn select(&self, assets: &[AssetProfile]) -> Result<AssetUniverse> {
        let symbols: Vec<&str> = match self {
            Theme::Esg => assets
                .iter()
                .filter(|a| a.esg)
                .map(|a| a.symbol.as_str())
                .collect(),
            Theme::TickerLetters => assets
                .iter()
                .filter(|a| {
                    a.symbol
                        .chars()
                        .any(|c| THEME_LETTERS.contains(&c.to_ascii_uppercase()))
                })
                .map(|a| a.symbol.as_str())
                .collect(),
            Theme::LowBeta => assets
                .iter()
                .filter(|a| a.beta < HIGH_BETA_CUTOFF)
                .map(|a| a.symbol.as_str())
                .collect(),
            Theme::HighBeta => assets
                .iter()
                .filter(|a| a.beta >= HIGH_BETA_CUTOFF)
                .map(|a| a.symbol.as_str())
                .collect(),
            Theme::Sectors(sectors) => assets
                .iter()
                .filter(|a| sectors.iter().any(|s| s == &a.sector))
                .map(|a| a.symbol.as_str())
                .collect(),
            Theme::HighestPrice(n) => {
                let mut by_price: Vec<&AssetProfile> = assets.iter().collect();
                by_price.sort_by(|a, b| {
                    b.price
                        .partial_cmp(&a.price)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                by_price
                    .into_iter()
                    .take(*n)
                    .map(|a| a.symbol.as_str())
                    .collect()
            }
        };

        AssetUniverse::new(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiles() -> Vec<AssetProfile> {
        vec![
            AssetProfile {
                symbol: "LMT".into(),
                sector: "Industrials".into(),
                beta: 0.8,
                price: 450.0,
                esg: false,
            },
            AssetProfile {
                symbol: "XOM".into(),
                sector: "Energy".into(),
                beta: 1.1,
                price: 100.0,
                esg: false,
            },
            AssetProfile {
                symbol: "MSFT".into(),
                sector: "Technology".into(),
                beta: 0.9,
                price: 400.0,
                esg: true,
            },
        ]
    }

    #[test]
    fn test_risk_aversion_decreases_with_appetite() {
        let aversions: Vec<f64> = RiskProfile::ALL.iter().map(|p| p.risk_aversion()).collect();
        for pair in aversions.windows(2) {
            assert!(pair[1] < pair[0]);
        }
    }

    #[test]
    fn test_esg_theme() {
        let universe = Theme::Esg.select(&profiles()).unwrap();
        assert_eq!(universe.symbols(), ["MSFT"]);
    }

    #[test]
    fn test_ticker_letters_theme() {
        let universe = Theme::TickerLetters.select(&profiles()).unwrap();
        // LMT has an L, XOM has none of the letters, MSFT nothing either.
        assert_eq!(universe.symbols(), ["LMT"]);
    }

    #[test]
    fn test_beta_themes_partition() {
        let assets = profiles();
        let low = Theme::LowBeta.select(&assets).unwrap();
        let high = Theme::HighBeta.select(&assets).unwrap();
        assert_eq!(low.len() + high.len(), assets.len());
        assert_eq!(high.symbols(), ["XOM"]);
    }

    #[test]
    fn test_highest_price_theme() {
        let universe = Theme::HighestPrice(2).select(&profiles()).unwrap();
        assert_eq!(universe.symbols(), ["LMT", "MSFT"]);
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let universe = Theme::Sectors(vec!["Utilities".into()]).select(&profiles());
        assert!(universe.is_err());
    }
}
