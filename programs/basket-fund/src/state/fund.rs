use anchor_lang::prelude::*;

#[account]
pub struct FundState {
    pub admin: Pubkey,
    pub fund_id: u64,
    pub name: [u8; 32],
    pub claim_symbol: [u8; 8],
    pub denom_mint: Pubkey,
    pub claim_mint: Pubkey,
    /// Mirror of the claim mint supply, kept in sync on every mint/burn.
    pub total_claim_supply: u64,
    pub fee_percent: u8,
    pub auction_delay: u64,
    pub mutable: bool,
    pub investment_count: u16,
    pub next_stake_id: u64,
    pub bump: u8,
    pub claim_mint_bump: u8,
}

impl FundState {
    pub const LEN: usize = 32 + 8 + 32 + 8 + 32 + 32 + 8 + 1 + 8 + 1 + 2 + 8 + 1 + 1;
}
