use anchor_lang::prelude::*;

// Staked -> Unstaking -> Unstaked; the receipt account is closed on collect.
pub const STAKE_STATUS_STAKED: u8 = 0;
pub const STAKE_STATUS_UNSTAKING: u8 = 1;
pub const STAKE_STATUS_UNSTAKED: u8 = 2;

#[account]
pub struct StakeReceipt {
    pub fund: Pubkey,
    pub owner: Pubkey,
    pub id: u64,
    pub investment_index: u16,
    /// Claim tokens staked.
    pub amount: u64,
    /// Investment spot price at stake time, 1e9 fixed point.
    pub entry_price: u64,
    /// Epoch the unstake was requested, zero while actively staked.
    pub unstake_epoch: u64,
    /// Settled payout, valid once status is Unstaked.
    pub payable: u64,
    pub status: u8,
    pub bump: u8,
}

impl StakeReceipt {
    pub const LEN: usize = 32 + 32 + 8 + 2 + 8 + 8 + 8 + 8 + 1 + 1;

    /// An unstaking receipt settles only once `auction_delay` epochs have
    /// elapsed since the unstake request.
    pub fn unstake_eligible(&self, current_epoch: u64, auction_delay: u64) -> bool {
        self.status == STAKE_STATUS_UNSTAKING
            && current_epoch >= self.unstake_epoch.saturating_add(auction_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt(status: u8, unstake_epoch: u64) -> StakeReceipt {
        StakeReceipt {
            fund: Pubkey::default(),
            owner: Pubkey::default(),
            id: 0,
            investment_index: 0,
            amount: 30,
            entry_price: 0,
            unstake_epoch,
            payable: 0,
            status,
            bump: 0,
        }
    }

    #[test]
    fn staked_receipt_never_eligible() {
        let r = receipt(STAKE_STATUS_STAKED, 0);
        assert!(!r.unstake_eligible(u64::MAX, 1));
    }

    #[test]
    fn eligibility_requires_full_delay() {
        let r = receipt(STAKE_STATUS_UNSTAKING, 30);
        assert!(!r.unstake_eligible(30, 20));
        assert!(!r.unstake_eligible(49, 20));
        assert!(r.unstake_eligible(50, 20));
        assert!(r.unstake_eligible(51, 20));
    }

    #[test]
    fn settled_receipt_not_reprocessed() {
        let r = receipt(STAKE_STATUS_UNSTAKED, 10);
        assert!(!r.unstake_eligible(100, 20));
    }
}
