use anchor_lang::prelude::*;
use anchor_spl::associated_token::get_associated_token_address;
use anchor_spl::token::{self, Token, TokenAccount};

use crate::errors::ErrorCode;
use crate::math::mul_price_ceil;
use crate::state::auction::{AuctionState, AUCTION_OPEN, SIDE_BUY};
use crate::state::bid::BidReceipt;
use crate::state::fund::FundState;
use crate::state::investment::Investment;

pub fn create_bid(ctx: Context<CreateBid>, amount: u64, price: u64) -> Result<()> {
    require!(amount > 0, ErrorCode::InvalidBidAmount);
    require!(price > 0, ErrorCode::InvalidBidPrice);
    require!(
        ctx.accounts.auction.status == AUCTION_OPEN,
        ErrorCode::AuctionNotOpen
    );

    // Buy bids escrow denominator for their maximum spend, sell bids escrow
    // the asset itself.
    let (escrow_mint, escrow_amount) = if ctx.accounts.auction.side == SIDE_BUY {
        (
            ctx.accounts.fund_state.denom_mint,
            mul_price_ceil(amount, price)?,
        )
    } else {
        (ctx.accounts.investment.asset_mint, amount)
    };
    let expected_escrow =
        get_associated_token_address(&ctx.accounts.investment.key(), &escrow_mint);
    require!(
        expected_escrow == ctx.accounts.escrow_vault.key(),
        ErrorCode::InvalidTokenVault
    );
    require!(
        ctx.accounts.bidder_source.mint == escrow_mint,
        ErrorCode::InvalidTokenVault
    );

    let escrow_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        token::Transfer {
            from: ctx.accounts.bidder_source.to_account_info(),
            to: ctx.accounts.escrow_vault.to_account_info(),
            authority: ctx.accounts.bidder.to_account_info(),
        },
    );
    token::transfer(escrow_ctx, escrow_amount)?;

    let bid = &mut ctx.accounts.bid;
    bid.auction = ctx.accounts.auction.key();
    bid.owner = ctx.accounts.bidder.key();
    bid.seq = ctx.accounts.auction.next_bid_seq;
    bid.side = ctx.accounts.auction.side;
    bid.price = price;
    bid.amount = amount;
    bid.remaining = amount;
    bid.escrow_remaining = escrow_amount;
    bid.proceeds = 0;
    bid.cleared = false;
    bid.bump = ctx.bumps.bid;

    let auction = &mut ctx.accounts.auction;
    auction.next_bid_seq = auction
        .next_bid_seq
        .checked_add(1)
        .ok_or(ErrorCode::MathOverflow)?;
    auction.open_bid_count = auction
        .open_bid_count
        .checked_add(1)
        .ok_or(ErrorCode::MathOverflow)?;

    Ok(())
}

#[derive(Accounts)]
pub struct CreateBid<'info> {
    #[account(mut)]
    pub bidder: Signer<'info>,
    #[account(
        seeds = [b"fund", fund_state.admin.as_ref(), fund_state.fund_id.to_le_bytes().as_ref()],
        bump = fund_state.bump
    )]
    pub fund_state: Account<'info, FundState>,
    #[account(
        seeds = [b"investment", fund_state.key().as_ref(), investment.index.to_le_bytes().as_ref()],
        bump = investment.bump,
        constraint = investment.fund == fund_state.key() @ ErrorCode::InvalidInvestment
    )]
    pub investment: Account<'info, Investment>,
    #[account(
        mut,
        seeds = [b"auction", investment.key().as_ref(), &[auction.side]],
        bump = auction.bump,
        constraint = auction.investment == investment.key() @ ErrorCode::InvalidBidReceipt
    )]
    pub auction: Account<'info, AuctionState>,
    #[account(
        init,
        payer = bidder,
        space = 8 + BidReceipt::LEN,
        seeds = [b"bid", auction.key().as_ref(), auction.next_bid_seq.to_le_bytes().as_ref()],
        bump
    )]
    pub bid: Account<'info, BidReceipt>,
    #[account(mut)]
    pub bidder_source: Account<'info, TokenAccount>,
    #[account(mut)]
    pub escrow_vault: Account<'info, TokenAccount>,
    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}
