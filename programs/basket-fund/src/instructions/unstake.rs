use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::state::fund::FundState;
use crate::state::stake::{StakeReceipt, STAKE_STATUS_STAKED, STAKE_STATUS_UNSTAKING};

pub fn unstake(ctx: Context<Unstake>) -> Result<()> {
    let receipt = &mut ctx.accounts.stake_receipt;
    require!(
        receipt.status == STAKE_STATUS_STAKED,
        ErrorCode::ReceiptNotStaked
    );

    receipt.status = STAKE_STATUS_UNSTAKING;
    receipt.unstake_epoch = Clock::get()?.epoch;

    Ok(())
}

#[derive(Accounts)]
pub struct Unstake<'info> {
    pub staker: Signer<'info>,
    #[account(
        seeds = [b"fund", fund_state.admin.as_ref(), fund_state.fund_id.to_le_bytes().as_ref()],
        bump = fund_state.bump
    )]
    pub fund_state: Account<'info, FundState>,
    #[account(
        mut,
        seeds = [b"stake", fund_state.key().as_ref(), stake_receipt.id.to_le_bytes().as_ref()],
        bump = stake_receipt.bump,
        constraint = stake_receipt.fund == fund_state.key() @ ErrorCode::InvalidStakeReceipt,
        constraint = stake_receipt.owner == staker.key() @ ErrorCode::Unauthorized
    )]
    pub stake_receipt: Account<'info, StakeReceipt>,
}
