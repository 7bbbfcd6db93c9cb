use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::state::fund::FundState;
use crate::state::investment::Investment;

pub fn update_investment(ctx: Context<UpdateInvestment>, weight_bps: u16) -> Result<()> {
    require!(
        ctx.accounts.admin.key() == ctx.accounts.fund_state.admin,
        ErrorCode::Unauthorized
    );
    require!(ctx.accounts.fund_state.mutable, ErrorCode::FundImmutable);
    require!(weight_bps <= 10_000, ErrorCode::InvalidWeight);

    ctx.accounts.investment.weight_bps = weight_bps;
    Ok(())
}

#[derive(Accounts)]
pub struct UpdateInvestment<'info> {
    pub admin: Signer<'info>,
    #[account(
        seeds = [b"fund", fund_state.admin.as_ref(), fund_state.fund_id.to_le_bytes().as_ref()],
        bump = fund_state.bump
    )]
    pub fund_state: Account<'info, FundState>,
    #[account(
        mut,
        seeds = [b"investment", fund_state.key().as_ref(), investment.index.to_le_bytes().as_ref()],
        bump = investment.bump,
        constraint = investment.fund == fund_state.key() @ ErrorCode::InvalidInvestment
    )]
    pub investment: Account<'info, Investment>,
}
