use anchor_lang::prelude::*;

use crate::errors::ErrorCode;

pub const SIDE_BUY: u8 = 0;
pub const SIDE_SELL: u8 = 1;

// Round state machine: Open -> Clearing -> Closed -> (next cycle) Open.
// Clearing is transient: the transition runs to completion inside the one
// atomic `process_investments` call, so it is never observed on-ledger.
pub const AUCTION_OPEN: u8 = 0;
pub const AUCTION_CLEARING: u8 = 1;
pub const AUCTION_CLOSED: u8 = 2;

#[account]
pub struct AuctionState {
    pub investment: Pubkey,
    pub side: u8,
    pub status: u8,
    pub cycle: u64,
    pub opened_epoch: u64,
    pub closed_epoch: u64,
    /// Uniform price of the last cleared round, zero when nothing crossed.
    pub clearing_price: u64,
    pub open_bid_count: u16,
    pub next_bid_seq: u64,
    pub bump: u8,
}

impl AuctionState {
    pub const LEN: usize = 32 + 1 + 1 + 8 + 8 + 8 + 8 + 2 + 8 + 1;

    /// Removes a canceled bid from the live book count. A receipt that is
    /// not counted in the book cannot be released from it.
    pub fn release_bid(&mut self) -> Result<()> {
        self.open_bid_count = self
            .open_bid_count
            .checked_sub(1)
            .ok_or(ErrorCode::InvalidBidReceipt)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releasing_from_an_empty_book_is_rejected() {
        let mut auction = AuctionState {
            investment: Pubkey::default(),
            side: SIDE_BUY,
            status: AUCTION_OPEN,
            cycle: 0,
            opened_epoch: 0,
            closed_epoch: 0,
            clearing_price: 0,
            open_bid_count: 2,
            next_bid_seq: 2,
            bump: 0,
        };
        assert!(auction.release_bid().is_ok());
        assert!(auction.release_bid().is_ok());
        assert!(auction.release_bid().is_err());
        assert_eq!(auction.open_bid_count, 0);
    }
}
