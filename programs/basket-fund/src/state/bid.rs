use anchor_lang::prelude::*;

#[account]
pub struct BidReceipt {
    pub auction: Pubkey,
    pub owner: Pubkey,
    /// Book position, assigned at creation. Lower seq wins ties (time priority).
    pub seq: u64,
    pub side: u8,
    /// Limit price in denominator units per asset unit, 1e9 fixed point.
    pub price: u64,
    /// Asset units bid for (buy) or offered (sell).
    pub amount: u64,
    /// Asset units still unfilled.
    pub remaining: u64,
    /// Unspent escrow: denominator units for a buy bid, asset units for a sell bid.
    pub escrow_remaining: u64,
    /// Claimable fill: asset units for a buy bid, denominator units for a sell bid.
    pub proceeds: u64,
    /// Set once the bid has been through a clearing round; the residual is
    /// then a pure claim and no longer part of any book.
    pub cleared: bool,
    pub bump: u8,
}

impl BidReceipt {
    pub const LEN: usize = 32 + 32 + 8 + 1 + 8 + 8 + 8 + 8 + 8 + 1 + 1;
}
