use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount};

use crate::clearing::{cross_books, BookOrder};
use crate::errors::ErrorCode;
use crate::math::{div_price_floor, mul_price_ceil, mul_price_floor, spot_price};
use crate::state::auction::{
    AuctionState, AUCTION_CLEARING, AUCTION_CLOSED, AUCTION_OPEN, SIDE_BUY, SIDE_SELL,
};
use crate::state::bid::BidReceipt;
use crate::state::fund::FundState;
use crate::state::investment::Investment;

/// Fund-side book participation marker: externals always fill first.
const FUND_SEQ: u64 = u64::MAX;

/// Drives one investment's auction pair through its schedule. When the pair
/// has been open for `auction_delay` epochs this runs the clearing round
/// (Open -> Clearing -> Closed inside the one atomic call); when it has
/// been closed that long it re-opens the next cycle. Anything else is a
/// no-op, so schedulers may re-trigger freely.
///
/// Remaining accounts carry every open bid of the round: the buy book
/// first, then the sell book, each in ascending seq order.
pub fn process_investments<'info>(
    ctx: Context<'_, '_, 'info, 'info, ProcessInvestments<'info>>,
) -> Result<()> {
    let epoch = Clock::get()?.epoch;
    let delay = ctx.accounts.fund_state.auction_delay;

    require!(
        ctx.accounts.buy_auction.status == ctx.accounts.sell_auction.status,
        ErrorCode::AuctionPairMismatch
    );

    match ctx.accounts.buy_auction.status {
        AUCTION_OPEN => {
            if epoch < ctx.accounts.buy_auction.opened_epoch.saturating_add(delay) {
                msg!("process_investments: round not yet due");
                return Ok(());
            }
            clear_round(ctx, epoch)
        }
        AUCTION_CLOSED => {
            if epoch < ctx.accounts.buy_auction.closed_epoch.saturating_add(delay) {
                msg!("process_investments: re-open not yet due");
                return Ok(());
            }
            for auction in [&mut ctx.accounts.buy_auction, &mut ctx.accounts.sell_auction] {
                auction.status = AUCTION_OPEN;
                auction.opened_epoch = epoch;
                auction.cycle = auction.cycle.checked_add(1).ok_or(ErrorCode::MathOverflow)?;
            }
            msg!(
                "process_investments: cycle {} opened at epoch {}",
                ctx.accounts.buy_auction.cycle,
                epoch
            );
            Ok(())
        }
        _ => err!(ErrorCode::AuctionPairMismatch),
    }
}

fn clear_round<'info>(
    ctx: Context<'_, '_, 'info, 'info, ProcessInvestments<'info>>,
    epoch: u64,
) -> Result<()> {
    ctx.accounts.buy_auction.status = AUCTION_CLEARING;
    ctx.accounts.sell_auction.status = AUCTION_CLEARING;

    let buy_count = ctx.accounts.buy_auction.open_bid_count as usize;
    let sell_count = ctx.accounts.sell_auction.open_bid_count as usize;
    require!(
        ctx.remaining_accounts.len() == buy_count + sell_count,
        ErrorCode::InvalidRemainingAccounts
    );

    let mut buy_bids = load_book(
        &ctx.remaining_accounts[..buy_count],
        ctx.accounts.buy_auction.key(),
    )?;
    let mut sell_bids = load_book(
        &ctx.remaining_accounts[buy_count..],
        ctx.accounts.sell_auction.key(),
    )?;

    let spot = spot_price(
        ctx.accounts.pool_asset_reserve.amount,
        ctx.accounts.pool_denom_reserve.amount,
    )?;

    // The fund joins the round with a residual order toward its target
    // weight, priced at spot and behind every external bid.
    let asset_value = mul_price_floor(ctx.accounts.fund_asset_vault.amount, spot)?;
    let local_value = (ctx.accounts.fund_denom_vault.amount as u128)
        .checked_add(asset_value as u128)
        .ok_or(ErrorCode::MathOverflow)?;
    let target_value = u64::try_from(
        local_value
            .checked_mul(ctx.accounts.investment.weight_bps as u128)
            .ok_or(ErrorCode::MathOverflow)?
            / 10_000,
    )
    .map_err(|_| ErrorCode::MathOverflow)?;

    let mut buy_orders: Vec<BookOrder> = buy_bids
        .iter()
        .map(|b| BookOrder::new(b.seq, b.price, b.remaining))
        .collect();
    let mut sell_orders: Vec<BookOrder> = sell_bids
        .iter()
        .map(|b| BookOrder::new(b.seq, b.price, b.remaining))
        .collect();

    if asset_value < target_value {
        let shortfall = target_value - asset_value;
        let cap = div_price_floor(ctx.accounts.fund_denom_vault.amount, spot)?;
        let volume = div_price_floor(shortfall, spot)?.min(cap);
        if volume > 0 {
            buy_orders.push(BookOrder::new(FUND_SEQ, spot, volume));
        }
    } else if asset_value > target_value {
        let surplus = asset_value - target_value;
        let volume = div_price_floor(surplus, spot)?.min(ctx.accounts.fund_asset_vault.amount);
        if volume > 0 {
            sell_orders.push(BookOrder::new(FUND_SEQ, spot, volume));
        }
    }

    let cross = cross_books(&mut buy_orders, &mut sell_orders);

    let clearing_price = match cross {
        Some(cross) => {
            settle_fills(&mut buy_bids, &buy_orders, cross.price, true)?;
            settle_fills(&mut sell_bids, &sell_orders, cross.price, false)?;
            settle_fund_side(&ctx, &buy_orders, &sell_orders, cross.price)?;
            msg!(
                "process_investments: cleared {} asset units at price {}",
                cross.volume,
                cross.price
            );
            cross.price
        }
        None => {
            msg!("process_investments: no cross this round");
            0
        }
    };

    for bid in buy_bids.iter_mut().chain(sell_bids.iter_mut()) {
        bid.cleared = true;
        bid.exit(ctx.program_id)?;
    }

    for auction in [&mut ctx.accounts.buy_auction, &mut ctx.accounts.sell_auction] {
        auction.status = AUCTION_CLOSED;
        auction.closed_epoch = epoch;
        auction.clearing_price = clearing_price;
        auction.open_bid_count = 0;
    }

    Ok(())
}

/// Deserializes one side's bids, enforcing membership and strictly
/// ascending seq order (which also rules out duplicates).
fn load_book<'info>(
    infos: &'info [AccountInfo<'info>],
    auction_key: Pubkey,
) -> Result<Vec<Account<'info, BidReceipt>>> {
    let mut bids = Vec::with_capacity(infos.len());
    let mut prev_seq: Option<u64> = None;
    for info in infos {
        let bid: Account<BidReceipt> = Account::try_from(info)?;
        require!(bid.auction == auction_key, ErrorCode::InvalidBidReceipt);
        require!(!bid.cleared, ErrorCode::InvalidBidReceipt);
        if let Some(prev) = prev_seq {
            require!(bid.seq > prev, ErrorCode::InvalidRemainingAccounts);
        }
        prev_seq = Some(bid.seq);
        bids.push(bid);
    }
    Ok(bids)
}

/// Books the round's fills onto the bid receipts. Buy-side spend rounds up
/// and sell-side proceeds round down so the escrow vaults stay solvent.
fn settle_fills(
    bids: &mut [Account<BidReceipt>],
    orders: &[BookOrder],
    price: u64,
    buy_side: bool,
) -> Result<()> {
    for order in orders.iter().filter(|o| o.seq != FUND_SEQ && o.fill > 0) {
        let bid = bids
            .iter_mut()
            .find(|b| b.seq == order.seq)
            .ok_or(ErrorCode::InvalidRemainingAccounts)?;
        bid.remaining = bid
            .remaining
            .checked_sub(order.fill)
            .ok_or(ErrorCode::MathOverflow)?;
        if buy_side {
            let spent = mul_price_ceil(order.fill, price)?;
            bid.escrow_remaining = bid
                .escrow_remaining
                .checked_sub(spent)
                .ok_or(ErrorCode::MathOverflow)?;
            bid.proceeds = bid
                .proceeds
                .checked_add(order.fill)
                .ok_or(ErrorCode::MathOverflow)?;
        } else {
            bid.escrow_remaining = bid
                .escrow_remaining
                .checked_sub(order.fill)
                .ok_or(ErrorCode::MathOverflow)?;
            let proceeds = mul_price_floor(order.fill, price)?;
            bid.proceeds = bid
                .proceeds
                .checked_add(proceeds)
                .ok_or(ErrorCode::MathOverflow)?;
        }
    }
    Ok(())
}

/// Moves tokens for the fund's own fill. External fills stay escrowed
/// until their owners collect through `close_bid`.
fn settle_fund_side<'info>(
    ctx: &Context<'_, '_, 'info, 'info, ProcessInvestments<'info>>,
    buy_orders: &[BookOrder],
    sell_orders: &[BookOrder],
    price: u64,
) -> Result<()> {
    let admin_key = ctx.accounts.fund_state.admin;
    let fund_id_bytes = ctx.accounts.fund_state.fund_id.to_le_bytes();
    let fund_seeds: &[&[u8]] = &[
        b"fund",
        admin_key.as_ref(),
        fund_id_bytes.as_ref(),
        &[ctx.accounts.fund_state.bump],
    ];
    let fund_seeds_set = [fund_seeds];

    let fund_key = ctx.accounts.fund_state.key();
    let index_bytes = ctx.accounts.investment.index.to_le_bytes();
    let investment_seeds: &[&[u8]] = &[
        b"investment",
        fund_key.as_ref(),
        index_bytes.as_ref(),
        &[ctx.accounts.investment.bump],
    ];
    let investment_seeds_set = [investment_seeds];

    if let Some(order) = buy_orders.iter().find(|o| o.seq == FUND_SEQ && o.fill > 0) {
        let spend = mul_price_ceil(order.fill, price)?;
        let pay_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            token::Transfer {
                from: ctx.accounts.fund_denom_vault.to_account_info(),
                to: ctx.accounts.escrow_denom_vault.to_account_info(),
                authority: ctx.accounts.fund_state.to_account_info(),
            },
            &fund_seeds_set,
        );
        token::transfer(pay_ctx, spend)?;
        let receive_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            token::Transfer {
                from: ctx.accounts.escrow_asset_vault.to_account_info(),
                to: ctx.accounts.fund_asset_vault.to_account_info(),
                authority: ctx.accounts.investment.to_account_info(),
            },
            &investment_seeds_set,
        );
        token::transfer(receive_ctx, order.fill)?;
    }

    if let Some(order) = sell_orders.iter().find(|o| o.seq == FUND_SEQ && o.fill > 0) {
        let pay_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            token::Transfer {
                from: ctx.accounts.fund_asset_vault.to_account_info(),
                to: ctx.accounts.escrow_asset_vault.to_account_info(),
                authority: ctx.accounts.fund_state.to_account_info(),
            },
            &fund_seeds_set,
        );
        token::transfer(pay_ctx, order.fill)?;
        let proceeds = mul_price_floor(order.fill, price)?;
        let receive_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            token::Transfer {
                from: ctx.accounts.escrow_denom_vault.to_account_info(),
                to: ctx.accounts.fund_denom_vault.to_account_info(),
                authority: ctx.accounts.investment.to_account_info(),
            },
            &investment_seeds_set,
        );
        token::transfer(receive_ctx, proceeds)?;
    }

    Ok(())
}

#[derive(Accounts)]
pub struct ProcessInvestments<'info> {
    pub caller: Signer<'info>,
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
        seeds = [b"auction", investment.key().as_ref(), &[SIDE_BUY]],
        bump = buy_auction.bump
    )]
    pub buy_auction: Account<'info, AuctionState>,
    #[account(
        mut,
        seeds = [b"auction", investment.key().as_ref(), &[SIDE_SELL]],
        bump = sell_auction.bump
    )]
    pub sell_auction: Account<'info, AuctionState>,
    #[account(
        mut,
        associated_token::mint = investment.asset_mint,
        associated_token::authority = investment
    )]
    pub escrow_asset_vault: Account<'info, TokenAccount>,
    #[account(
        mut,
        associated_token::mint = fund_state.denom_mint,
        associated_token::authority = investment
    )]
    pub escrow_denom_vault: Account<'info, TokenAccount>,
    #[account(
        mut,
        associated_token::mint = investment.asset_mint,
        associated_token::authority = fund_state
    )]
    pub fund_asset_vault: Account<'info, TokenAccount>,
    #[account(
        mut,
        associated_token::mint = fund_state.denom_mint,
        associated_token::authority = fund_state
    )]
    pub fund_denom_vault: Account<'info, TokenAccount>,
    #[account(address = investment.pool_asset_reserve @ ErrorCode::InvalidPool)]
    pub pool_asset_reserve: Account<'info, TokenAccount>,
    #[account(address = investment.pool_denom_reserve @ ErrorCode::InvalidPool)]
    pub pool_denom_reserve: Account<'info, TokenAccount>,
    pub token_program: Program<'info, Token>,
}
