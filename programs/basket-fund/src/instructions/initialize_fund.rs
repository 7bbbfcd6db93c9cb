use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::errors::ErrorCode;
use crate::state::fund::FundState;

pub fn initialize_fund(
    ctx: Context<InitializeFund>,
    fund_id: u64,
    name: [u8; 32],
    claim_symbol: [u8; 8],
    auction_delay: u64,
    fee_percent: u8,
) -> Result<()> {
    require!(auction_delay > 0, ErrorCode::InvalidAuctionDelay);
    require!(fee_percent <= 100, ErrorCode::InvalidFeePercent);

    let fund = &mut ctx.accounts.fund_state;
    fund.admin = ctx.accounts.admin.key();
    fund.fund_id = fund_id;
    fund.name = name;
    fund.claim_symbol = claim_symbol;
    fund.denom_mint = ctx.accounts.denom_mint.key();
    fund.claim_mint = ctx.accounts.claim_mint.key();
    fund.total_claim_supply = 0;
    fund.fee_percent = fee_percent;
    fund.auction_delay = auction_delay;
    fund.mutable = true;
    fund.investment_count = 0;
    fund.next_stake_id = 0;
    fund.bump = ctx.bumps.fund_state;
    fund.claim_mint_bump = ctx.bumps.claim_mint;

    Ok(())
}

#[derive(Accounts)]
#[instruction(fund_id: u64)]
pub struct InitializeFund<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,
    #[account(
        init,
        payer = admin,
        space = 8 + FundState::LEN,
        seeds = [b"fund", admin.key().as_ref(), fund_id.to_le_bytes().as_ref()],
        bump
    )]
    pub fund_state: Account<'info, FundState>,
    pub denom_mint: Account<'info, Mint>,
    #[account(
        init,
        payer = admin,
        mint::decimals = 9,
        mint::authority = fund_state,
        seeds = [b"claims", fund_state.key().as_ref()],
        bump
    )]
    pub claim_mint: Account<'info, Mint>,
    /// Denominator reserve the fund mints against and redeems from.
    #[account(
        init,
        payer = admin,
        associated_token::mint = denom_mint,
        associated_token::authority = fund_state
    )]
    pub denom_vault: Account<'info, TokenAccount>,
    /// Holds claim tokens for the lifetime of a stake.
    #[account(
        init,
        payer = admin,
        associated_token::mint = claim_mint,
        associated_token::authority = fund_state
    )]
    pub stake_vault: Account<'info, TokenAccount>,
    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub rent: Sysvar<'info, Rent>,
}
