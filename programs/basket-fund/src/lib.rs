use anchor_lang::prelude::*;

pub mod clearing;
pub mod errors;
pub mod instructions;
pub mod math;
pub mod state;

use instructions::*;

declare_id!("DJei27xsWtXh4ahJnYqtpjJ99mHVj9rVpQFNMLVnMHvZ");

#[program]
pub mod basket_fund {
    use super::*;

    pub fn initialize_fund(
        ctx: Context<InitializeFund>,
        fund_id: u64,
        name: [u8; 32],
        claim_symbol: [u8; 8],
        auction_delay: u64,
        fee_percent: u8,
    ) -> Result<()> {
        instructions::initialize_fund::initialize_fund(
            ctx,
            fund_id,
            name,
            claim_symbol,
            auction_delay,
            fee_percent,
        )
    }

    pub fn add_investment(ctx: Context<AddInvestment>, weight_bps: u16) -> Result<()> {
        instructions::add_investment::add_investment(ctx, weight_bps)
    }

    pub fn update_investment(ctx: Context<UpdateInvestment>, weight_bps: u16) -> Result<()> {
        instructions::update_investment::update_investment(ctx, weight_bps)
    }

    pub fn set_immutable(ctx: Context<SetImmutable>) -> Result<()> {
        instructions::set_immutable::set_immutable(ctx)
    }

    pub fn mint<'info>(
        ctx: Context<'_, '_, 'info, 'info, MintClaims<'info>>,
        amount: u64,
    ) -> Result<()> {
        instructions::mint::mint(ctx, amount)
    }

    pub fn redeem<'info>(
        ctx: Context<'_, '_, 'info, 'info, RedeemClaims<'info>>,
        amount: u64,
    ) -> Result<()> {
        instructions::redeem::redeem(ctx, amount)
    }

    pub fn redeem_for_tokens<'info>(
        ctx: Context<'_, '_, 'info, 'info, RedeemForTokens<'info>>,
        amount: u64,
    ) -> Result<()> {
        instructions::redeem_for_tokens::redeem_for_tokens(ctx, amount)
    }

    pub fn create_bid(ctx: Context<CreateBid>, amount: u64, price: u64) -> Result<()> {
        instructions::create_bid::create_bid(ctx, amount, price)
    }

    pub fn close_bid(ctx: Context<CloseBid>) -> Result<()> {
        instructions::close_bid::close_bid(ctx)
    }

    pub fn process_investments<'info>(
        ctx: Context<'_, '_, 'info, 'info, ProcessInvestments<'info>>,
    ) -> Result<()> {
        instructions::process_investments::process_investments(ctx)
    }

    pub fn stake(ctx: Context<Stake>, amount: u64, investment_index: u16) -> Result<()> {
        instructions::stake::stake(ctx, amount, investment_index)
    }

    pub fn unstake(ctx: Context<Unstake>) -> Result<()> {
        instructions::unstake::unstake(ctx)
    }

    pub fn process_stakes<'info>(
        ctx: Context<'_, '_, 'info, 'info, ProcessStakes<'info>>,
    ) -> Result<()> {
        instructions::process_stakes::process_stakes(ctx)
    }

    pub fn collect_unstaked(ctx: Context<CollectUnstaked>) -> Result<()> {
        instructions::collect_unstaked::collect_unstaked(ctx)
    }
}
