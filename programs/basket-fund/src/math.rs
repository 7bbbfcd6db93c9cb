//! Fixed-point NAV, pricing and stake settlement arithmetic.
//!
//! Prices are denominator units per asset unit scaled by `PRICE_SCALE`.
//! All intermediates are u128 with checked operations.

use anchor_lang::prelude::*;

use crate::errors::ErrorCode;

pub const PRICE_SCALE: u128 = 1_000_000_000;

/// AMM pool spot price: denominator reserve over asset reserve.
pub fn spot_price(asset_reserve: u64, denom_reserve: u64) -> Result<u64> {
    require!(asset_reserve > 0, ErrorCode::EmptyPool);
    let price = (denom_reserve as u128)
        .checked_mul(PRICE_SCALE)
        .ok_or(ErrorCode::MathOverflow)?
        .checked_div(asset_reserve as u128)
        .ok_or(ErrorCode::MathOverflow)?;
    u64::try_from(price).map_err(|_| ErrorCode::MathOverflow.into())
}

/// `amount * price`, rounded down. Used for sell-side proceeds and valuation.
pub fn mul_price_floor(amount: u64, price: u64) -> Result<u64> {
    let value = (amount as u128)
        .checked_mul(price as u128)
        .ok_or(ErrorCode::MathOverflow)?
        / PRICE_SCALE;
    u64::try_from(value).map_err(|_| ErrorCode::MathOverflow.into())
}

/// `amount * price`, rounded up. Used for buy-side escrow and spend so the
/// escrow vaults can never come up short against floored payouts.
pub fn mul_price_ceil(amount: u64, price: u64) -> Result<u64> {
    let product = (amount as u128)
        .checked_mul(price as u128)
        .ok_or(ErrorCode::MathOverflow)?;
    let value = product
        .checked_add(PRICE_SCALE - 1)
        .ok_or(ErrorCode::MathOverflow)?
        / PRICE_SCALE;
    u64::try_from(value).map_err(|_| ErrorCode::MathOverflow.into())
}

/// `value / price` in asset units, rounded down.
pub fn div_price_floor(value: u64, price: u64) -> Result<u64> {
    require!(price > 0, ErrorCode::InvalidBidPrice);
    let amount = (value as u128)
        .checked_mul(PRICE_SCALE)
        .ok_or(ErrorCode::MathOverflow)?
        / (price as u128);
    u64::try_from(amount).map_err(|_| ErrorCode::MathOverflow.into())
}

/// Claim tokens issued for a deposit: 1:1 bootstrap at zero supply,
/// otherwise pro-rata against NAV computed before the deposit.
pub fn claims_for_deposit(amount: u64, supply: u64, nav: u64) -> Result<u64> {
    if supply == 0 {
        return Ok(amount);
    }
    require!(nav > 0, ErrorCode::InvalidNav);
    let claims = (amount as u128)
        .checked_mul(supply as u128)
        .ok_or(ErrorCode::MathOverflow)?
        .checked_div(nav as u128)
        .ok_or(ErrorCode::MathOverflow)?;
    u64::try_from(claims).map_err(|_| ErrorCode::MathOverflow.into())
}

/// Pro-rata slice of a balance owed to `claims` out of `supply`.
pub fn pro_rata(balance: u64, claims: u64, supply: u64) -> Result<u64> {
    require!(supply > 0, ErrorCode::InvalidNav);
    let share = (balance as u128)
        .checked_mul(claims as u128)
        .ok_or(ErrorCode::MathOverflow)?
        .checked_div(supply as u128)
        .ok_or(ErrorCode::MathOverflow)?;
    u64::try_from(share).map_err(|_| ErrorCode::MathOverflow.into())
}

/// Constant-product swap output: denominator units received for selling
/// `amount_in` asset units into a pool at the given reserves. Rounds down,
/// so the output never exceeds the denominator reserve.
pub fn swap_output(amount_in: u64, asset_reserve: u64, denom_reserve: u64) -> Result<u64> {
    let new_asset_reserve = (asset_reserve as u128)
        .checked_add(amount_in as u128)
        .ok_or(ErrorCode::MathOverflow)?;
    require!(new_asset_reserve > 0, ErrorCode::EmptyPool);
    let out = (denom_reserve as u128)
        .checked_mul(amount_in as u128)
        .ok_or(ErrorCode::MathOverflow)?
        / new_asset_reserve;
    u64::try_from(out).map_err(|_| ErrorCode::MathOverflow.into())
}

/// Settlement value of an unstaked position: the stake adjusted by the
/// investment's price performance between entry and exit, minus the fund
/// fee. Missing price data on either end settles at par before the fee.
pub fn stake_payable(
    amount: u64,
    entry_price: u64,
    exit_price: u64,
    fee_percent: u8,
) -> Result<u64> {
    let amount = amount as u128;
    let gross = if entry_price == 0 || exit_price == 0 {
        amount
    } else if exit_price >= entry_price {
        let gain = amount
            .checked_mul((exit_price - entry_price) as u128)
            .ok_or(ErrorCode::MathOverflow)?
            / entry_price as u128;
        amount.checked_add(gain).ok_or(ErrorCode::MathOverflow)?
    } else {
        let loss = amount
            .checked_mul((entry_price - exit_price) as u128)
            .ok_or(ErrorCode::MathOverflow)?
            / entry_price as u128;
        amount - loss
    };
    // Floor the net, not the fee: the fee is never under-collected.
    let net = gross
        .checked_mul(100u128.saturating_sub(fee_percent as u128))
        .ok_or(ErrorCode::MathOverflow)?
        / 100;
    u64::try_from(net).map_err(|_| ErrorCode::MathOverflow.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALE: u64 = PRICE_SCALE as u64;

    #[test]
    fn spot_price_is_reserve_ratio() {
        // 2 denominator per asset unit
        assert_eq!(spot_price(500, 1000).unwrap(), 2 * SCALE);
        assert!(spot_price(0, 1000).is_err());
    }

    #[test]
    fn bootstrap_mint_is_one_to_one() {
        assert_eq!(claims_for_deposit(1000, 0, 0).unwrap(), 1000);
    }

    #[test]
    fn mint_redeem_round_trip_preserves_value() {
        // Mint d against an existing fund held entirely in reserve, then
        // redeem the resulting claims: the caller gets d back.
        let supply = 5_000u64;
        let reserve = 10_000u64;
        let d = 2_000u64;
        let claims = claims_for_deposit(d, supply, reserve).unwrap();
        let value = pro_rata(reserve + d, claims, supply + claims).unwrap();
        assert_eq!(value, d);
    }

    #[test]
    fn redeeming_full_supply_drains_reserves() {
        let supply = 777u64;
        assert_eq!(pro_rata(123_456, supply, supply).unwrap(), 123_456);
    }

    #[test]
    fn zero_supply_iff_zero_value() {
        // Supply zero forces the bootstrap path; redemption against zero
        // supply is rejected outright.
        assert!(pro_rata(100, 1, 0).is_err());
    }

    #[test]
    fn swap_output_follows_constant_product() {
        // Selling 100 into a 900/10_000 pool: 10_000 * 100 / 1_000.
        assert_eq!(swap_output(100, 900, 10_000).unwrap(), 1_000);
        // Output approaches but never reaches the denominator reserve.
        assert_eq!(swap_output(u64::MAX, 1, 500).unwrap(), 499);
    }

    #[test]
    fn swap_output_empty_pool_yields_nothing() {
        assert_eq!(swap_output(100, 1_000, 0).unwrap(), 0);
        assert_eq!(swap_output(0, 1_000, 500).unwrap(), 0);
    }

    #[test]
    fn ceil_never_below_floor() {
        for (amount, price) in [(3, SCALE / 3), (7, 123_456_789), (1, 1)] {
            let floor = mul_price_floor(amount, price).unwrap();
            let ceil = mul_price_ceil(amount, price).unwrap();
            assert!(ceil >= floor);
            assert!(ceil - floor <= 1);
        }
        assert_eq!(mul_price_ceil(4, SCALE).unwrap(), 4);
        assert_eq!(mul_price_floor(4, SCALE).unwrap(), 4);
    }

    #[test]
    fn stake_payable_flat_market_applies_fee_only() {
        // 30 staked, no price movement, 5% fee: 28.5 floored in base units.
        assert_eq!(stake_payable(30, SCALE, SCALE, 5).unwrap(), 28);
        assert_eq!(stake_payable(1000, SCALE, SCALE, 5).unwrap(), 950);
    }

    #[test]
    fn stake_payable_tracks_performance() {
        // +50% performance on 1000, then 5% fee on the gross.
        assert_eq!(
            stake_payable(1000, 2 * SCALE, 3 * SCALE, 5).unwrap(),
            1500 - 75
        );
        // -50% performance, fee on what is left.
        assert_eq!(
            stake_payable(1000, 2 * SCALE, SCALE, 5).unwrap(),
            500 - 25
        );
    }

    #[test]
    fn stake_fee_rounds_against_the_staker() {
        // 0.99 of fee owed collects as 1; the net is what gets floored.
        assert_eq!(stake_payable(99, SCALE, SCALE, 1).unwrap(), 98);
        // 1.9 of fee owed collects as 2.
        assert_eq!(stake_payable(19, SCALE, SCALE, 10).unwrap(), 17);
    }

    #[test]
    fn stake_payable_missing_price_settles_at_par() {
        assert_eq!(stake_payable(1000, 0, SCALE, 0).unwrap(), 1000);
        assert_eq!(stake_payable(1000, SCALE, 0, 10).unwrap(), 900);
    }

    #[test]
    fn stake_payable_loss_never_exceeds_stake() {
        assert_eq!(stake_payable(1000, 1_000_000 * SCALE, 1, 0).unwrap(), 1);
    }
}
