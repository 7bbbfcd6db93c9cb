use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount};

use crate::errors::ErrorCode;
use crate::math::spot_price;
use crate::state::fund::FundState;
use crate::state::investment::Investment;
use crate::state::stake::{StakeReceipt, STAKE_STATUS_STAKED};

pub fn stake(ctx: Context<Stake>, amount: u64, investment_index: u16) -> Result<()> {
    require!(amount > 0, ErrorCode::InsufficientInput);
    require!(
        ctx.accounts.staker_claim_account.amount >= amount,
        ErrorCode::InsufficientBalance
    );
    require!(
        ctx.accounts.pool_asset_reserve.key() == ctx.accounts.investment.pool_asset_reserve
            && ctx.accounts.pool_denom_reserve.key() == ctx.accounts.investment.pool_denom_reserve,
        ErrorCode::InvalidPool
    );

    let entry_price = spot_price(
        ctx.accounts.pool_asset_reserve.amount,
        ctx.accounts.pool_denom_reserve.amount,
    )?;

    let escrow_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        token::Transfer {
            from: ctx.accounts.staker_claim_account.to_account_info(),
            to: ctx.accounts.stake_vault.to_account_info(),
            authority: ctx.accounts.staker.to_account_info(),
        },
    );
    token::transfer(escrow_ctx, amount)?;

    let receipt = &mut ctx.accounts.stake_receipt;
    receipt.fund = ctx.accounts.fund_state.key();
    receipt.owner = ctx.accounts.staker.key();
    receipt.id = ctx.accounts.fund_state.next_stake_id;
    receipt.investment_index = investment_index;
    receipt.amount = amount;
    receipt.entry_price = entry_price;
    receipt.unstake_epoch = 0;
    receipt.payable = 0;
    receipt.status = STAKE_STATUS_STAKED;
    receipt.bump = ctx.bumps.stake_receipt;

    ctx.accounts.investment.stake_total = ctx
        .accounts
        .investment
        .stake_total
        .checked_add(amount)
        .ok_or(ErrorCode::MathOverflow)?;
    ctx.accounts.fund_state.next_stake_id = ctx
        .accounts
        .fund_state
        .next_stake_id
        .checked_add(1)
        .ok_or(ErrorCode::MathOverflow)?;

    Ok(())
}

#[derive(Accounts)]
#[instruction(amount: u64, investment_index: u16)]
pub struct Stake<'info> {
    #[account(mut)]
    pub staker: Signer<'info>,
    #[account(
        mut,
        seeds = [b"fund", fund_state.admin.as_ref(), fund_state.fund_id.to_le_bytes().as_ref()],
        bump = fund_state.bump
    )]
    pub fund_state: Account<'info, FundState>,
    #[account(
        mut,
        seeds = [b"investment", fund_state.key().as_ref(), investment_index.to_le_bytes().as_ref()],
        bump = investment.bump,
        constraint = investment.fund == fund_state.key() @ ErrorCode::InvalidInvestment
    )]
    pub investment: Account<'info, Investment>,
    pub pool_asset_reserve: Account<'info, TokenAccount>,
    pub pool_denom_reserve: Account<'info, TokenAccount>,
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
        init,
        payer = staker,
        space = 8 + StakeReceipt::LEN,
        seeds = [b"stake", fund_state.key().as_ref(), fund_state.next_stake_id.to_le_bytes().as_ref()],
        bump
    )]
    pub stake_receipt: Account<'info, StakeReceipt>,
    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}
