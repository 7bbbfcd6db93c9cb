use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount};

use crate::errors::ErrorCode;
use crate::state::fund::FundState;
use crate::state::stake::{StakeReceipt, STAKE_STATUS_UNSTAKED};

pub fn collect_unstaked(ctx: Context<CollectUnstaked>) -> Result<()> {
    let receipt = &ctx.accounts.stake_receipt;
    require!(
        receipt.status == STAKE_STATUS_UNSTAKED,
        ErrorCode::NotYetUnstaked
    );

    let admin_key = ctx.accounts.fund_state.admin;
    let fund_id_bytes = ctx.accounts.fund_state.fund_id.to_le_bytes();
    let signer_seeds: &[&[u8]] = &[
        b"fund",
        admin_key.as_ref(),
        fund_id_bytes.as_ref(),
        &[ctx.accounts.fund_state.bump],
    ];
    let signer_seeds_set = [signer_seeds];

    if receipt.payable > 0 {
        let payout_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            token::Transfer {
                from: ctx.accounts.stake_vault.to_account_info(),
                to: ctx.accounts.staker_claim_account.to_account_info(),
                authority: ctx.accounts.fund_state.to_account_info(),
            },
            &signer_seeds_set,
        );
        token::transfer(payout_ctx, receipt.payable)?;
    }

    // The receipt account closes to the staker, burning the receipt.
    Ok(())
}

#[derive(Accounts)]
pub struct CollectUnstaked<'info> {
    #[account(mut)]
    pub staker: Signer<'info>,
    #[account(
        seeds = [b"fund", fund_state.admin.as_ref(), fund_state.fund_id.to_le_bytes().as_ref()],
        bump = fund_state.bump
    )]
    pub fund_state: Account<'info, FundState>,
    #[account(
        mut,
        associated_token::mint = fund_state.claim_mint,
        associated_token::authority = fund_state
    )]
    pub stake_vault: Account<'info, TokenAccount>,
    #[account(
        mut,
        associated_token::mint = fund_state.claim_mint,
        associated_token::authority = staker
    )]
    pub staker_claim_account: Account<'info, TokenAccount>,
    #[account(
        mut,
        close = staker,
        seeds = [b"stake", fund_state.key().as_ref(), stake_receipt.id.to_le_bytes().as_ref()],
        bump = stake_receipt.bump,
        constraint = stake_receipt.fund == fund_state.key() @ ErrorCode::InvalidStakeReceipt,
        constraint = stake_receipt.owner == staker.key() @ ErrorCode::Unauthorized
    )]
    pub stake_receipt: Account<'info, StakeReceipt>,
    pub token_program: Program<'info, Token>,
}
