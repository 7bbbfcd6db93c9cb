use anchor_lang::prelude::*;
use anchor_spl::associated_token::{get_associated_token_address, AssociatedToken};
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::errors::ErrorCode;
use crate::state::auction::{AuctionState, AUCTION_OPEN, SIDE_BUY, SIDE_SELL};
use crate::state::fund::FundState;
use crate::state::investment::Investment;

pub fn add_investment(ctx: Context<AddInvestment>, weight_bps: u16) -> Result<()> {
    require!(
        ctx.accounts.admin.key() == ctx.accounts.fund_state.admin,
        ErrorCode::Unauthorized
    );
    require!(ctx.accounts.fund_state.mutable, ErrorCode::FundImmutable);
    require!(weight_bps <= 10_000, ErrorCode::InvalidWeight);

    // The pool pairing the asset with the denominator is the pair of
    // reserve accounts held by the derived pool authority; redemption
    // swaps sign against it.
    let asset_mint_key = ctx.accounts.asset_mint.key();
    let (pool_authority, _) = Pubkey::find_program_address(
        &[
            b"pool",
            asset_mint_key.as_ref(),
            ctx.accounts.fund_state.denom_mint.as_ref(),
        ],
        ctx.program_id,
    );
    require!(
        ctx.accounts.pool_asset_reserve.key()
            == get_associated_token_address(&pool_authority, &asset_mint_key),
        ErrorCode::InvalidPool
    );
    require!(
        ctx.accounts.pool_denom_reserve.key()
            == get_associated_token_address(&pool_authority, &ctx.accounts.fund_state.denom_mint),
        ErrorCode::InvalidPool
    );

    let epoch = Clock::get()?.epoch;

    let investment = &mut ctx.accounts.investment;
    investment.fund = ctx.accounts.fund_state.key();
    investment.index = ctx.accounts.fund_state.investment_count;
    investment.asset_mint = ctx.accounts.asset_mint.key();
    investment.weight_bps = weight_bps;
    investment.pool_asset_reserve = ctx.accounts.pool_asset_reserve.key();
    investment.pool_denom_reserve = ctx.accounts.pool_denom_reserve.key();
    investment.buy_auction = ctx.accounts.buy_auction.key();
    investment.sell_auction = ctx.accounts.sell_auction.key();
    investment.stake_total = 0;
    investment.bump = ctx.bumps.investment;

    for (auction, side, bump) in [
        (&mut ctx.accounts.buy_auction, SIDE_BUY, ctx.bumps.buy_auction),
        (&mut ctx.accounts.sell_auction, SIDE_SELL, ctx.bumps.sell_auction),
    ] {
        auction.investment = ctx.accounts.investment.key();
        auction.side = side;
        auction.status = AUCTION_OPEN;
        auction.cycle = 0;
        auction.opened_epoch = epoch;
        auction.closed_epoch = 0;
        auction.clearing_price = 0;
        auction.open_bid_count = 0;
        auction.next_bid_seq = 0;
        auction.bump = bump;
    }

    ctx.accounts.fund_state.investment_count = ctx
        .accounts
        .fund_state
        .investment_count
        .checked_add(1)
        .ok_or(ErrorCode::MathOverflow)?;

    Ok(())
}

#[derive(Accounts)]
pub struct AddInvestment<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,
    #[account(
        mut,
        seeds = [b"fund", fund_state.admin.as_ref(), fund_state.fund_id.to_le_bytes().as_ref()],
        bump = fund_state.bump
    )]
    pub fund_state: Account<'info, FundState>,
    pub asset_mint: Account<'info, Mint>,
    pub pool_asset_reserve: Account<'info, TokenAccount>,
    pub pool_denom_reserve: Account<'info, TokenAccount>,
    #[account(
        init,
        payer = admin,
        space = 8 + Investment::LEN,
        seeds = [b"investment", fund_state.key().as_ref(), fund_state.investment_count.to_le_bytes().as_ref()],
        bump
    )]
    pub investment: Account<'info, Investment>,
    #[account(
        init,
        payer = admin,
        space = 8 + AuctionState::LEN,
        seeds = [b"auction", investment.key().as_ref(), &[SIDE_BUY]],
        bump
    )]
    pub buy_auction: Account<'info, AuctionState>,
    #[account(
        init,
        payer = admin,
        space = 8 + AuctionState::LEN,
        seeds = [b"auction", investment.key().as_ref(), &[SIDE_SELL]],
        bump
    )]
    pub sell_auction: Account<'info, AuctionState>,
    /// Fund-side holdings of the asset.
    #[account(
        init,
        payer = admin,
        associated_token::mint = asset_mint,
        associated_token::authority = fund_state
    )]
    pub fund_asset_vault: Account<'info, TokenAccount>,
    /// Escrow for sell-side bids (asset) of the pair.
    #[account(
        init,
        payer = admin,
        associated_token::mint = asset_mint,
        associated_token::authority = investment
    )]
    pub escrow_asset_vault: Account<'info, TokenAccount>,
    /// Escrow for buy-side bids (denominator) of the pair.
    #[account(
        init,
        payer = admin,
        associated_token::mint = denom_mint,
        associated_token::authority = investment
    )]
    pub escrow_denom_vault: Account<'info, TokenAccount>,
    #[account(address = fund_state.denom_mint)]
    pub denom_mint: Account<'info, Mint>,
    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub rent: Sysvar<'info, Rent>,
}
