use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::state::fund::FundState;

pub fn set_immutable(ctx: Context<SetImmutable>) -> Result<()> {
    require!(
        ctx.accounts.admin.key() == ctx.accounts.fund_state.admin,
        ErrorCode::Unauthorized
    );
    require!(ctx.accounts.fund_state.mutable, ErrorCode::FundImmutable);

    ctx.accounts.fund_state.mutable = false;
    Ok(())
}

#[derive(Accounts)]
pub struct SetImmutable<'info> {
    pub admin: Signer<'info>,
    #[account(
        mut,
        seeds = [b"fund", fund_state.admin.as_ref(), fund_state.fund_id.to_le_bytes().as_ref()],
        bump = fund_state.bump
    )]
    pub fund_state: Account<'info, FundState>,
}
