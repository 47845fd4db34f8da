use crate::errors::{AppError, Result};
use crate::models::{PoolReserves, ReservePair, TradeRequest};
use crate::units;
use bigdecimal::{BigDecimal, ToPrimitive};
use ethers::types::{U256, U512};
use serde::Serialize;

/// Basis points in 100%.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Expected result of selling `amount_in` into a constant-product pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quote {
    #[serde(serialize_with = "ser_wei")]
    pub amount_in: U256,
    #[serde(serialize_with = "ser_wei")]
    pub amount_out: U256,
    /// Input paid per unit of output; zero when nothing comes out.
    pub effective_price: f64,
    pub fee_bps: u32,
    #[serde(skip)]
    pub reserves: ReservePair,
}

fn ser_wei<S: serde::Serializer>(wei: &U256, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&units::format_wei(*wei))
}

/// Constant-product output with no fee:
/// `amount_out = amount_in * reserve_out / (reserve_in + amount_in)`.
///
/// Zero amount or an empty reserve on either side gives zero. Intermediates
/// are 512-bit so 18-decimal inputs cannot overflow; the result is
/// truncated, which keeps the pool product from decreasing.
pub fn calc_swap_output(amount_in: U256, reserve_in: U256, reserve_out: U256) -> U256 {
    if amount_in.is_zero() || reserve_in.is_zero() || reserve_out.is_zero() {
        return U256::zero();
    }
    let numerator = amount_in.full_mul(reserve_out);
    let denominator = U512::from(reserve_in) + U512::from(amount_in);
    narrow(numerator / denominator)
}

/// Same curve with a fee taken from the input, Uniswap V2 style.
/// `fee_bps == 0` is exactly [`calc_swap_output`].
pub fn calc_swap_output_with_fee(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee_bps: u32,
) -> Result<U256> {
    if fee_bps > BPS_DENOMINATOR {
        return Err(AppError::invalid(format!(
            "fee of {fee_bps} bps exceeds 100%"
        )));
    }
    if fee_bps == 0 {
        return Ok(calc_swap_output(amount_in, reserve_in, reserve_out));
    }
    if amount_in.is_zero() || reserve_in.is_zero() || reserve_out.is_zero() {
        return Ok(U256::zero());
    }

    let in_with_fee = amount_in.full_mul(U256::from(BPS_DENOMINATOR - fee_bps));
    if in_with_fee.is_zero() {
        return Ok(U256::zero());
    }
    let numerator = mul_512(in_with_fee, reserve_out)?;
    let denominator = reserve_in.full_mul(U256::from(BPS_DENOMINATOR)) + in_with_fee;
    Ok(narrow(numerator / denominator))
}

/// Quote a trade against the pool, orienting reserves by the sold asset.
pub fn quote(request: &TradeRequest, pool: &PoolReserves, fee_bps: u32) -> Result<Quote> {
    let reserves = pool.oriented(request.sell);
    let amount_out = calc_swap_output_with_fee(
        request.amount_in,
        reserves.reserve_in,
        reserves.reserve_out,
        fee_bps,
    )?;

    Ok(Quote {
        amount_in: request.amount_in,
        amount_out,
        effective_price: ratio(request.amount_in, amount_out),
        fee_bps,
        reserves,
    })
}

/// Fee-less quote on human decimal strings, e.g. `quote_units("100", "1000", "10")`.
///
/// Negative or non-numeric arguments are rejected with `InvalidInput`.
pub fn quote_units(amount_in: &str, reserve_in: &str, reserve_out: &str) -> Result<BigDecimal> {
    let amount_in = units::to_wei(amount_in)?;
    let reserve_in = units::to_wei(reserve_in)?;
    let reserve_out = units::to_wei(reserve_out)?;
    Ok(units::from_wei(calc_swap_output(
        amount_in,
        reserve_in,
        reserve_out,
    )))
}

/// `numerator / denominator` as a float; zero instead of a non-finite value.
pub fn ratio(numerator: U256, denominator: U256) -> f64 {
    if denominator.is_zero() {
        return 0.0;
    }
    let value = (units::from_wei(numerator) / units::from_wei(denominator))
        .to_f64()
        .unwrap_or(0.0);
    if value.is_finite() { value } else { 0.0 }
}

// ---------- helper functions ----------

fn mul_512(a: U512, b: U256) -> Result<U512> {
    a.checked_mul(U512::from(b))
        .ok_or_else(|| AppError::invalid("swap amount overflows 512-bit intermediate"))
}

fn narrow(value: U512) -> U256 {
    // Output never exceeds reserve_out, so it always fits.
    U256::try_from(value).unwrap_or(U256::MAX)
}
