use super::types::{SlippageResult, SlippageTier};
use crate::errors::{AppError, Result};

/// Percent deviation above which the warning flag is raised.
pub const WARNING_PERCENT: f64 = 5.0;

/// Non-finite values (a collapsed division upstream) become zero.
pub fn normalize(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Classify how far `effective_rate` sits from `reference_rate`.
///
/// Both rates are normalized first; a negative rate is `InvalidInput`.
/// A zero reference cannot be compared against and yields 0%.
pub fn classify(effective_rate: f64, reference_rate: f64) -> Result<SlippageResult> {
    let effective_rate = normalize(effective_rate);
    let reference_rate = normalize(reference_rate);
    if effective_rate < 0.0 {
        return Err(AppError::invalid(format!(
            "effective rate {effective_rate} is negative"
        )));
    }
    if reference_rate < 0.0 {
        return Err(AppError::invalid(format!(
            "reference rate {reference_rate} is negative"
        )));
    }

    let deviation = normalize((effective_rate - reference_rate).abs());
    let deviation_percent = deviation_percent(deviation, reference_rate);
    let tier = tier_for(deviation_percent);

    Ok(SlippageResult {
        reference_rate,
        effective_rate,
        deviation,
        deviation_percent,
        tier,
        warning: deviation_percent > WARNING_PERCENT,
    })
}

fn deviation_percent(deviation: f64, reference_rate: f64) -> f64 {
    if reference_rate == 0.0 {
        return 0.0;
    }
    normalize(deviation / reference_rate * 100.0)
}

/// Ordered cascade, first match wins. The (1, 3) band shares the low tier
/// and [3, 5] is only reached after the > 5 check.
fn tier_for(percent: f64) -> SlippageTier {
    match percent {
        p if p == 0.0 => SlippageTier::None,
        p if p <= 1.0 => SlippageTier::Low,
        p if p < 3.0 => SlippageTier::Low,
        p if p > WARNING_PERCENT => SlippageTier::Severe,
        p if p >= 3.0 => SlippageTier::Elevated,
        _ => SlippageTier::None,
    }
}
