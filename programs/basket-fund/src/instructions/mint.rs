use anchor_lang::prelude::*;
use anchor_spl::associated_token::{get_associated_token_address, AssociatedToken};
use anchor_spl::token::{self, mint_to, Mint, MintTo, Token, TokenAccount};

use crate::errors::ErrorCode;
use crate::math::{claims_for_deposit, mul_price_floor, spot_price};
use crate::state::fund::FundState;
use crate::state::investment::Investment;

pub fn mint<'info>(
    ctx: Context<'_, '_, 'info, 'info, MintClaims<'info>>,
    amount: u64,
) -> Result<()> {
    require!(amount > 0, ErrorCode::InsufficientInput);

    // NAV before the deposit lands.
    let nav = compute_basket_nav(
        ctx.program_id,
        ctx.accounts.fund_state.key(),
        ctx.accounts.denom_vault.amount,
        ctx.accounts.fund_state.investment_count,
        ctx.remaining_accounts,
    )?;

    let supply = ctx.accounts.fund_state.total_claim_supply;
    let claims = claims_for_deposit(amount, supply, nav)?;
    require!(claims > 0, ErrorCode::ZeroClaims);

    let deposit_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        token::Transfer {
            from: ctx.accounts.depositor_denom_account.to_account_info(),
            to: ctx.accounts.denom_vault.to_account_info(),
            authority: ctx.accounts.depositor.to_account_info(),
        },
    );
    token::transfer(deposit_ctx, amount)?;

    let admin_key = ctx.accounts.fund_state.admin;
    let fund_id_bytes = ctx.accounts.fund_state.fund_id.to_le_bytes();
    let signer_seeds: &[&[u8]] = &[
        b"fund",
        admin_key.as_ref(),
        fund_id_bytes.as_ref(),
        &[ctx.accounts.fund_state.bump],
    ];
    let signer_seeds_set = [signer_seeds];

    let mint_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        MintTo {
            mint: ctx.accounts.claim_mint.to_account_info(),
            to: ctx.accounts.depositor_claim_account.to_account_info(),
            authority: ctx.accounts.fund_state.to_account_info(),
        },
        &signer_seeds_set,
    );
    mint_to(mint_ctx, claims)?;

    let fund_state = &mut ctx.accounts.fund_state;
    fund_state.total_claim_supply = fund_state
        .total_claim_supply
        .checked_add(claims)
        .ok_or(ErrorCode::MathOverflow)?;

    Ok(())
}

#[derive(Accounts)]
pub struct MintClaims<'info> {
    #[account(mut)]
    pub depositor: Signer<'info>,
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
        constraint = depositor_denom_account.mint == fund_state.denom_mint @ ErrorCode::InvalidTokenVault
    )]
    pub depositor_denom_account: Account<'info, TokenAccount>,
    #[account(
        init_if_needed,
        payer = depositor,
        associated_token::mint = claim_mint,
        associated_token::authority = depositor
    )]
    pub depositor_claim_account: Account<'info, TokenAccount>,
    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub rent: Sysvar<'info, Rent>,
}

/// Walks the remaining accounts in `[investment, fund asset vault,
/// pool asset reserve, pool denominator reserve]` strides, one per
/// investment in index order, and returns the basket value in denominator
/// units: the reserve balance plus every holding priced at its pool spot.
pub(crate) fn compute_basket_nav<'info>(
    program_id: &Pubkey,
    fund_key: Pubkey,
    reserve_balance: u64,
    investment_count: u16,
    remaining: &'info [AccountInfo<'info>],
) -> Result<u64> {
    require!(
        remaining.len() == 4 * investment_count as usize,
        ErrorCode::InvalidRemainingAccounts
    );

    let mut nav = reserve_balance as u128;

    for i in 0..investment_count as usize {
        let investment_info = &remaining[4 * i];
        let vault_info = &remaining[4 * i + 1];
        let pool_asset_info = &remaining[4 * i + 2];
        let pool_denom_info = &remaining[4 * i + 3];

        let investment: Account<Investment> = Account::try_from(investment_info)?;
        let (expected_investment, _) = Pubkey::find_program_address(
            &[
                b"investment",
                fund_key.as_ref(),
                (i as u16).to_le_bytes().as_ref(),
            ],
            program_id,
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
        let pool_asset: Account<TokenAccount> = Account::try_from(pool_asset_info)?;
        let pool_denom: Account<TokenAccount> = Account::try_from(pool_denom_info)?;

        let spot = spot_price(pool_asset.amount, pool_denom.amount)?;
        let value = mul_price_floor(vault.amount, spot)?;
        nav = nav
            .checked_add(value as u128)
            .ok_or(ErrorCode::MathOverflow)?;
    }

    u64::try_from(nav).map_err(|_| ErrorCode::MathOverflow.into())
}
