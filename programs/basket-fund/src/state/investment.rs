use anchor_lang::prelude::*;

#[account]
pub struct Investment {
    pub fund: Pubkey,
    pub index: u16,
    pub asset_mint: Pubkey,
    pub weight_bps: u16,
    /// AMM pool reserve holding the asset side of the pair.
    pub pool_asset_reserve: Pubkey,
    /// AMM pool reserve holding the denominator side of the pair.
    pub pool_denom_reserve: Pubkey,
    pub buy_auction: Pubkey,
    pub sell_auction: Pubkey,
    /// Claim tokens currently staked to this investment.
    pub stake_total: u64,
    pub bump: u8,
}

impl Investment {
    pub const LEN: usize = 32 + 2 + 32 + 2 + 32 + 32 + 32 + 32 + 8 + 1;
}
