use anchor_lang::prelude::*;
use anchor_spl::associated_token::get_associated_token_address;
use anchor_spl::token::{self, Token, TokenAccount};

use crate::errors::ErrorCode;
use crate::state::auction::{AuctionState, SIDE_BUY};
use crate::state::bid::BidReceipt;
use crate::state::fund::FundState;
use crate::state::investment::Investment;

/// Cancels an open bid, or collects the residual claim of a cleared one:
/// the unspent escrow plus whatever the clearing rounds filled. Closes the
/// bid receipt either way.
pub fn close_bid(ctx: Context<CloseBid>) -> Result<()> {
    let investment_key = ctx.accounts.investment.key();
    let expected_asset_escrow =
        get_associated_token_address(&investment_key, &ctx.accounts.investment.asset_mint);
    let expected_denom_escrow =
        get_associated_token_address(&investment_key, &ctx.accounts.fund_state.denom_mint);
    require!(
        expected_asset_escrow == ctx.accounts.escrow_asset_vault.key()
            && expected_denom_escrow == ctx.accounts.escrow_denom_vault.key(),
        ErrorCode::InvalidTokenVault
    );
    require!(
        ctx.accounts.bidder_asset_account.mint == ctx.accounts.investment.asset_mint
            && ctx.accounts.bidder_denom_account.mint == ctx.accounts.fund_state.denom_mint,
        ErrorCode::InvalidTokenVault
    );

    // A bid that has never been through a clearing round is still counted
    // in the live book.
    if !ctx.accounts.bid.cleared {
        ctx.accounts.auction.release_bid()?;
    }

    let fund_key = ctx.accounts.fund_state.key();
    let index_bytes = ctx.accounts.investment.index.to_le_bytes();
    let signer_seeds: &[&[u8]] = &[
        b"investment",
        fund_key.as_ref(),
        index_bytes.as_ref(),
        &[ctx.accounts.investment.bump],
    ];
    let signer_seeds_set = [signer_seeds];

    let bid = &ctx.accounts.bid;
    let (refund_from, refund_to, fill_from, fill_to) = if bid.side == SIDE_BUY {
        (
            &ctx.accounts.escrow_denom_vault,
            &ctx.accounts.bidder_denom_account,
            &ctx.accounts.escrow_asset_vault,
            &ctx.accounts.bidder_asset_account,
        )
    } else {
        (
            &ctx.accounts.escrow_asset_vault,
            &ctx.accounts.bidder_asset_account,
            &ctx.accounts.escrow_denom_vault,
            &ctx.accounts.bidder_denom_account,
        )
    };

    if bid.escrow_remaining > 0 {
        let refund_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            token::Transfer {
                from: refund_from.to_account_info(),
                to: refund_to.to_account_info(),
                authority: ctx.accounts.investment.to_account_info(),
            },
            &signer_seeds_set,
        );
        token::transfer(refund_ctx, bid.escrow_remaining)?;
    }
    if bid.proceeds > 0 {
        let fill_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            token::Transfer {
                from: fill_from.to_account_info(),
                to: fill_to.to_account_info(),
                authority: ctx.accounts.investment.to_account_info(),
            },
            &signer_seeds_set,
        );
        token::transfer(fill_ctx, bid.proceeds)?;
    }

    Ok(())
}

#[derive(Accounts)]
pub struct CloseBid<'info> {
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
        mut,
        close = bidder,
        seeds = [b"bid", auction.key().as_ref(), bid.seq.to_le_bytes().as_ref()],
        bump = bid.bump,
        constraint = bid.auction == auction.key() @ ErrorCode::InvalidBidReceipt,
        constraint = bid.owner == bidder.key() @ ErrorCode::Unauthorized
    )]
    pub bid: Account<'info, BidReceipt>,
    #[account(mut)]
    pub escrow_asset_vault: Account<'info, TokenAccount>,
    #[account(mut)]
    pub escrow_denom_vault: Account<'info, TokenAccount>,
    #[account(mut)]
    pub bidder_asset_account: Account<'info, TokenAccount>,
    #[account(mut)]
    pub bidder_denom_account: Account<'info, TokenAccount>,
    pub token_program: Program<'info, Token>,
}
