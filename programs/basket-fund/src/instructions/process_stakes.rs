use anchor_lang::prelude::*;
use anchor_spl::token::{burn, mint_to, Burn, Mint, MintTo, Token, TokenAccount};

use crate::errors::ErrorCode;
use crate::math::{spot_price, stake_payable};
use crate::state::fund::FundState;
use crate::state::investment::Investment;
use crate::state::stake::{StakeReceipt, STAKE_STATUS_UNSTAKED};

/// Settles every eligible unstaking receipt passed in the remaining
/// accounts: `[receipt, investment, pool asset reserve, pool denominator
/// reserve]` strides. Permissionless and idempotent — receipts that are not
/// unstaking, or whose delay has not elapsed, are skipped, so external
/// schedulers may re-trigger this freely.
pub fn process_stakes<'info>(
    ctx: Context<'_, '_, 'info, 'info, ProcessStakes<'info>>,
) -> Result<()> {
    require!(
        ctx.remaining_accounts.len() % 4 == 0,
        ErrorCode::InvalidRemainingAccounts
    );

    let epoch = Clock::get()?.epoch;
    let fund_key = ctx.accounts.fund_state.key();
    let delay = ctx.accounts.fund_state.auction_delay;
    let fee_percent = ctx.accounts.fund_state.fee_percent;

    let admin_key = ctx.accounts.fund_state.admin;
    let fund_id_bytes = ctx.accounts.fund_state.fund_id.to_le_bytes();
    let signer_seeds: &[&[u8]] = &[
        b"fund",
        admin_key.as_ref(),
        fund_id_bytes.as_ref(),
        &[ctx.accounts.fund_state.bump],
    ];
    let signer_seeds_set = [signer_seeds];

    let mut settled: u32 = 0;
    for chunk in ctx.remaining_accounts.chunks(4) {
        let receipt_info = &chunk[0];
        let investment_info = &chunk[1];
        let pool_asset_info = &chunk[2];
        let pool_denom_info = &chunk[3];

        let mut receipt: Account<StakeReceipt> = Account::try_from(receipt_info)?;
        require!(receipt.fund == fund_key, ErrorCode::InvalidStakeReceipt);
        if !receipt.unstake_eligible(epoch, delay) {
            continue;
        }

        let mut investment: Account<Investment> = Account::try_from(investment_info)?;
        let (expected_investment, _) = Pubkey::find_program_address(
            &[
                b"investment",
                fund_key.as_ref(),
                receipt.investment_index.to_le_bytes().as_ref(),
            ],
            ctx.program_id,
        );
        require!(
            expected_investment == *investment_info.key,
            ErrorCode::InvalidRemainingAccounts
        );
        require!(investment.fund == fund_key, ErrorCode::InvalidInvestment);
        require!(
            *pool_asset_info.key == investment.pool_asset_reserve
                && *pool_denom_info.key == investment.pool_denom_reserve,
            ErrorCode::InvalidPool
        );

        let pool_asset: Account<TokenAccount> = Account::try_from(pool_asset_info)?;
        let pool_denom: Account<TokenAccount> = Account::try_from(pool_denom_info)?;
        let exit_price = spot_price(pool_asset.amount, pool_denom.amount)?;

        let payable = stake_payable(receipt.amount, receipt.entry_price, exit_price, fee_percent)?;

        // Reconcile the stake vault to hold exactly the payable for this
        // receipt: gains are minted in, losses and the fee burned out.
        if payable > receipt.amount {
            let minted = payable - receipt.amount;
            let mint_ctx = CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                MintTo {
                    mint: ctx.accounts.claim_mint.to_account_info(),
                    to: ctx.accounts.stake_vault.to_account_info(),
                    authority: ctx.accounts.fund_state.to_account_info(),
                },
                &signer_seeds_set,
            );
            mint_to(mint_ctx, minted)?;
            ctx.accounts.fund_state.total_claim_supply = ctx
                .accounts
                .fund_state
                .total_claim_supply
                .checked_add(minted)
                .ok_or(ErrorCode::MathOverflow)?;
        } else if payable < receipt.amount {
            let burned = receipt.amount - payable;
            let burn_ctx = CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Burn {
                    mint: ctx.accounts.claim_mint.to_account_info(),
                    from: ctx.accounts.stake_vault.to_account_info(),
                    authority: ctx.accounts.fund_state.to_account_info(),
                },
                &signer_seeds_set,
            );
            burn(burn_ctx, burned)?;
            ctx.accounts.fund_state.total_claim_supply = ctx
                .accounts
                .fund_state
                .total_claim_supply
                .checked_sub(burned)
                .ok_or(ErrorCode::MathOverflow)?;
        }

        investment.stake_total = investment
            .stake_total
            .checked_sub(receipt.amount)
            .ok_or(ErrorCode::MathOverflow)?;

        receipt.status = STAKE_STATUS_UNSTAKED;
        receipt.payable = payable;

        receipt.exit(ctx.program_id)?;
        investment.exit(ctx.program_id)?;
        settled += 1;
    }

    msg!("process_stakes: settled {} receipt(s) at epoch {}", settled, epoch);
    Ok(())
}

#[derive(Accounts)]
pub struct ProcessStakes<'info> {
    pub caller: Signer<'info>,
    #[account(
        mut,
        seeds = [b"fund", fund_state.admin.as_ref(), fund_state.fund_id.to_le_bytes().as_ref()],
        bump = fund_state.bump
    )]
    pub fund_state: Account<'info, FundState>,
    #[account(
        mut,
        seeds = [b"claims", fund_state.key().as_ref()],
        bump = fund_state.claim_mint_bump
    )]
    pub claim_mint: Account<'info, Mint>,
    #[account(
        mut,
        associated_token::mint = fund_state.claim_mint,
        associated_token::authority = fund_state
    )]
    pub stake_vault: Account<'info, TokenAccount>,
    pub token_program: Program<'info, Token>,
}
