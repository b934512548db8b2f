//! Net-worth aggregation across every asset and liability list.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::Backend;
use crate::error::AppResult;
use crate::model::{
    BankAccount, Liability, LifeInsurance, OtherAsset, Pillar2, Pillar3Account, RealEstate,
    SecurityHolding,
};
use crate::services::Services;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct NetWorthBreakdown {
    pub bank_accounts: f64,
    pub securities: f64,
    pub real_estate: f64,
    pub other_assets: f64,
    pub pillar2: f64,
    pub pillar3: f64,
    pub life_insurance: f64,
}

impl NetWorthBreakdown {
    pub fn total(&self) -> f64 {
        self.bank_accounts
            + self.securities
            + self.real_estate
            + self.other_assets
            + self.pillar2
            + self.pillar3
            + self.life_insurance
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct NetWorth {
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub net_worth: f64,
    pub breakdown: NetWorthBreakdown,
}

/// Borrowed inputs for [`NetWorth::from_parts`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NetWorthParts<'a> {
    pub bank_accounts: &'a [BankAccount],
    pub securities: &'a [SecurityHolding],
    pub real_estate: &'a [RealEstate],
    pub other_assets: &'a [OtherAsset],
    pub liabilities: &'a [Liability],
    pub pillar2: Option<&'a Pillar2>,
    pub pillar3_accounts: &'a [Pillar3Account],
    pub life_insurance: &'a [LifeInsurance],
}

impl NetWorth {
    /// Plain floating-point sums; rounding is left to display formatting.
    pub fn from_parts(parts: NetWorthParts<'_>) -> Self {
        let breakdown = NetWorthBreakdown {
            bank_accounts: parts.bank_accounts.iter().map(|a| a.balance).sum(),
            securities: parts.securities.iter().map(|s| s.current_value).sum(),
            real_estate: parts.real_estate.iter().map(|r| r.current_value).sum(),
            other_assets: parts.other_assets.iter().map(|o| o.current_value).sum(),
            pillar2: parts.pillar2.map(Pillar2::total_balance).unwrap_or(0.0),
            pillar3: parts.pillar3_accounts.iter().map(|p| p.current_value).sum(),
            life_insurance: parts
                .life_insurance
                .iter()
                .filter_map(|l| l.current_surrender_value)
                .sum(),
        };
        let total_assets = breakdown.total();
        let total_liabilities: f64 = parts.liabilities.iter().map(|l| l.current_balance).sum();
        NetWorth {
            total_assets,
            total_liabilities,
            net_worth: total_assets - total_liabilities,
            breakdown,
        }
    }
}

/// Fetch every input for `client_id` concurrently and aggregate.
///
/// The second-pillar record is read through its single-record repository, so
/// a default row is created for a client that has none yet.
pub async fn calculate<B: Backend>(services: &Services<B>, client_id: &str) -> AppResult<NetWorth> {
    let (
        bank_accounts,
        securities,
        real_estate,
        other_assets,
        liabilities,
        pillar2,
        pillar3_accounts,
        life_insurance,
    ) = tokio::try_join!(
        services.bank_accounts.get_by_client_id(client_id),
        services.securities.get_by_client_id(client_id),
        services.real_estate.get_by_client_id(client_id),
        services.other_assets.get_by_client_id(client_id),
        services.liabilities.get_by_client_id(client_id),
        services.pillar2.get_by_client_id(client_id),
        services.pillar3_accounts.get_by_client_id(client_id),
        services.life_insurance.get_by_client_id(client_id),
    )?;

    let worth = NetWorth::from_parts(NetWorthParts {
        bank_accounts: &bank_accounts,
        securities: &securities,
        real_estate: &real_estate,
        other_assets: &other_assets,
        liabilities: &liabilities,
        pillar2: Some(&pillar2),
        pillar3_accounts: &pillar3_accounts,
        life_insurance: &life_insurance,
    });
    debug!(
        target: "finplan",
        event = "net_worth_calculated",
        client_id = %client_id,
        total_assets = worth.total_assets,
        total_liabilities = worth.total_liabilities
    );
    Ok(worth)
}
