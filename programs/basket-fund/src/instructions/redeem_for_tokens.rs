use anchor_lang::prelude::*;
use anchor_spl::associated_token::get_associated_token_address;
use anchor_spl::token::{self, burn, Burn, Mint, Token, TokenAccount};

use crate::errors::ErrorCode;
use crate::math::pro_rata;
use crate::state::fund::FundState;
use crate::state::investment::Investment;

/// Redeems claim tokens for the underlying basket in kind: the pro-rata
/// slice of the denominator reserve plus every investment's holdings.
/// Remaining accounts carry `[investment, fund asset vault, redeemer asset
/// account]` strides, one per investment in index order.
pub fn redeem_for_tokens<'info>(
    ctx: Context<'_, '_, 'info, 'info, RedeemForTokens<'info>>,
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
    let redeemer_key = ctx.accounts.redeemer.key();
    let investment_count = ctx.accounts.fund_state.investment_count as usize;
    require!(
        ctx.remaining_accounts.len() == 3 * investment_count,
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

    let denom_share = pro_rata(ctx.accounts.denom_vault.amount, amount, supply)?;
    if denom_share > 0 {
        let payout_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            token::Transfer {
                from: ctx.accounts.denom_vault.to_account_info(),
                to: ctx.accounts.redeemer_denom_account.to_account_info(),
                authority: ctx.accounts.fund_state.to_account_info(),
            },
            &signer_seeds_set,
        );
        token::transfer(payout_ctx, denom_share)?;
    }

    for i in 0..investment_count {
        let investment_info = &ctx.remaining_accounts[3 * i];
        let vault_info = &ctx.remaining_accounts[3 * i + 1];
        let recipient_info = &ctx.remaining_accounts[3 * i + 2];

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
        let expected_recipient =
            get_associated_token_address(&redeemer_key, &investment.asset_mint);
        require!(
            expected_recipient == *recipient_info.key,
            ErrorCode::InvalidTokenVault
        );

        let asset_share = pro_rata(vault.amount, amount, supply)?;
        if asset_share > 0 {
            let payout_ctx = CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                token::Transfer {
                    from: vault_info.clone(),
                    to: recipient_info.clone(),
                    authority: ctx.accounts.fund_state.to_account_info(),
                },
                &signer_seeds_set,
            );
            token::transfer(payout_ctx, asset_share)?;
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
pub struct RedeemForTokens<'info> {
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
