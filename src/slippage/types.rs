use serde::Serialize;

/// Price impact band, ordered from harmless to severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlippageTier {
    None,
    Low,
    Elevated,
    Severe,
}

/// Comparison of a trade rate against the reference market rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlippageResult {
    pub reference_rate: f64,
    pub effective_rate: f64,
    /// Absolute distance between the two rates.
    pub deviation: f64,
    pub deviation_percent: f64,
    pub tier: SlippageTier,
    /// High slippage; the trade should be confirmed explicitly.
    pub warning: bool,
}

impl SlippageResult {
    /// Result for an empty trade: no deviation at all.
    pub fn none(reference_rate: f64) -> Self {
        Self {
            reference_rate,
            effective_rate: 0.0,
            deviation: 0.0,
            deviation_percent: 0.0,
            tier: SlippageTier::None,
            warning: false,
        }
    }
}
