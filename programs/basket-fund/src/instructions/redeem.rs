use anchor_lang::prelude::*;
use anchor_spl::associated_token::get_associated_token_address;
use anchor_spl::token::{self, burn, Burn, Mint, Token, TokenAccount};

use crate::errors::ErrorCode;
use crate::math::{pro_rata, swap_output};
use crate::state::fund::FundState;
use crate::state::investment::Investment;

/// Redeems claim tokens for denominator value: the pro-rata slice of the
/// reserve plus every investment's pro-rata holding sold through its pool
/// at the constant-product price. Remaining accounts carry `[investment,
/// fund asset vault, pool asset reserve, pool denominator reserve, pool
/// authority]` strides, one per investment in index order.
pub fn redeem<'info>(
    ctx: Context<'_, '_, 'info, 'info, RedeemClaims<'info>>,
    amount: u64,
) -> Result<()> {
    require!(amount > 0, ErrorCode::InsufficientInput);
    require!(
        ctx.accounts.redeemer_claim_account.amount >= amount,
        ErrorCode::InsufficientBalance
    );

    let supply = ctx.accounts.fund_state.total_claim_supply;
    require!(supply >= amount, ErrorCode::InsufficientBalance);

    let fund_key = ctx.accounts.fund_state.key();
    let denom_mint = ctx.accounts.fund_state.denom_mint;
    let investment_count = ctx.accounts.fund_state.investment_count as usize;
    require!(
        ctx.remaining_accounts.len() == 5 * investment_count,
        ErrorCode::InvalidRemainingAccounts
    );

    let burn_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Burn {
            mint: ctx.accounts.claim_mint.to_account_info(),
            from: ctx.accounts.redeemer_claim_account.to_account_info(),
            authority: ctx.accounts.redeemer.to_account_info(),
        },
    );
    burn(burn_ctx, amount)?;

    let admin_key = ctx.accounts.fund_state.admin;
    let fund_id_bytes = ctx.accounts.fund_state.fund_id.to_le_bytes();
    let signer_seeds: &[&[u8]] = &[
        b"fund",
        admin_key.as_ref(),
        fund_id_bytes.as_ref(),
        &[ctx.accounts.fund_state.bump],
    ];
    let signer_seeds_set = [signer_seeds];

    let reserve_share = pro_rata(ctx.accounts.denom_vault.amount, amount, supply)?;
    if reserve_share > 0 {
        let payout_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            token::Transfer {
                from: ctx.accounts.denom_vault.to_account_info(),
                to: ctx.accounts.redeemer_denom_account.to_account_info(),
                authority: ctx.accounts.fund_state.to_account_info(),
            },
            &signer_seeds_set,
        );
        token::transfer(payout_ctx, reserve_share)?;
    }

    // Liquidate the entitled slice of every holding through its pool.
    for i in 0..investment_count {
        let investment_info = &ctx.remaining_accounts[5 * i];
        let vault_info = &ctx.remaining_accounts[5 * i + 1];
        let pool_asset_info = &ctx.remaining_accounts[5 * i + 2];
        let pool_denom_info = &ctx.remaining_accounts[5 * i + 3];
        let pool_auth_info = &ctx.remaining_accounts[5 * i + 4];

        let investment: Account<Investment> = Account::try_from(investment_info)?;
        let (expected_investment, _) = Pubkey::find_program_address(
            &[
                b"investment",
                fund_key.as_ref(),
                (i as u16).to_le_bytes().as_ref(),
            ],
            ctx.program_id,
        );
        require!(
            expected_investment == *investment_info.key,
            ErrorCode::InvalidRemainingAccounts
        );
        require!(investment.fund == fund_key, ErrorCode::InvalidInvestment);

        let vault: Account<TokenAccount> = Account::try_from(vault_info)?;
        let expected_vault = get_associated_token_address(&fund_key, &investment.asset_mint);
        require!(
            expected_vault == *vault_info.key,
            ErrorCode::InvalidTokenVault
        );
        require!(
            *pool_asset_info.key == investment.pool_asset_reserve
                && *pool_denom_info.key == investment.pool_denom_reserve,
            ErrorCode::InvalidPool
        );
        let (pool_authority, pool_bump) = Pubkey::find_program_address(
            &[b"pool", investment.asset_mint.as_ref(), denom_mint.as_ref()],
            ctx.program_id,
        );
        require!(
            pool_authority == *pool_auth_info.key,
            ErrorCode::InvalidPool
        );

        let sell_amount = pro_rata(vault.amount, amount, supply)?;
        if sell_amount == 0 {
            continue;
        }

        let pool_asset: Account<TokenAccount> = Account::try_from(pool_asset_info)?;
        let pool_denom: Account<TokenAccount> = Account::try_from(pool_denom_info)?;
        require!(pool_denom.amount > 0, ErrorCode::InsufficientLiquidity);
        let proceeds = swap_output(sell_amount, pool_asset.amount, pool_denom.amount)?;

        let sell_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            token::Transfer {
                from: vault_info.clone(),
                to: pool_asset_info.clone(),
                authority: ctx.accounts.fund_state.to_account_info(),
            },
            &signer_seeds_set,
        );
        token::transfer(sell_ctx, sell_amount)?;

        if proceeds > 0 {
            let pool_bump_bytes = [pool_bump];
            let pool_seeds: &[&[u8]] = &[
                b"pool",
                investment.asset_mint.as_ref(),
                denom_mint.as_ref(),
                &pool_bump_bytes,
            ];
            let pool_seeds_set = [pool_seeds];
            let proceeds_ctx = CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                token::Transfer {
                    from: pool_denom_info.clone(),
                    to: ctx.accounts.redeemer_denom_account.to_account_info(),
                    authority: pool_auth_info.clone(),
                },
                &pool_seeds_set,
            );
            token::transfer(proceeds_ctx, proceeds)?;
        }
    }

    let fund_state = &mut ctx.accounts.fund_state;
    fund_state.total_claim_supply = fund_state
        .total_claim_supply
        .checked_sub(amount)
        .ok_or(ErrorCode::MathOverflow)?;

    Ok(())
}

#[derive(Accounts)]
pub struct RedeemClaims<'info> {
    pub redeemer: Signer<'info>,
    #[account(
        mut,
        seeds = [b"fund", fund_state.admin.as_ref(), fund_state.fund_id.to_le_bytes().as_ref()],
        bump = fund_state.bump
    )]
    pub fund_state: Account<'info, FundState>,
    #[account(
        mut,
        associated_token::mint = fund_state.denom_mint,
        associated_token::authority = fund_state
    )]
    pub denom_vault: Account<'info, TokenAccount>,
    #[account(
        mut,
        seeds = [b"claims", fund_state.key().as_ref()],
        bump = fund_state.claim_mint_bump
    )]
    pub claim_mint: Account<'info, Mint>,
    #[account(
        mut,
        associated_token::mint = claim_mint,
        associated_token::authority = redeemer
    )]
    pub redeemer_claim_account: Account<'info, TokenAccount>,
    #[account(
        mut,
        constraint = redeemer_denom_account.mint == fund_state.denom_mint @ ErrorCode::InvalidTokenVault
    )]
    pub redeemer_denom_account: Account<'info, TokenAccount>,
    pub token_program: Program<'info, Token>,
}
