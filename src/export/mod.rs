//! Single-document JSON snapshot of one client.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backend::Backend;
use crate::db::write_atomic;
use crate::error::{AppError, AppResult, NOT_FOUND_CLIENT};
use crate::model::{
    Budget, Client, ClientPreferences, Goal, HealthInsurance, Housing, Investment, LegalSecurity,
    Pension, PlannedAction, PropertyInsurance, TaxOptimization,
};
use crate::services::Services;
use crate::time::iso_now;

pub const EXPORT_VERSION: u32 = 1;

/// Sheets with no stored row export as `null`; exporting never creates rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ClientExport {
    pub version: u32,
    pub export_date: String,
    pub client: Client,
    pub goals: Vec<Goal>,
    pub actions: Vec<PlannedAction>,
    pub housing: Option<Housing>,
    pub property_insurance: Option<PropertyInsurance>,
    pub health_insurance: Option<HealthInsurance>,
    pub legal_security: Option<LegalSecurity>,
    pub tax_optimization: Option<TaxOptimization>,
    pub investment: Option<Investment>,
    pub pension: Option<Pension>,
    pub budget: Option<Budget>,
    pub preferences: Option<ClientPreferences>,
}

pub async fn export_client<B: Backend>(
    services: &Services<B>,
    client_id: &str,
) -> AppResult<ClientExport> {
    let (
        client,
        goals,
        actions,
        housing,
        property_insurance,
        health_insurance,
        legal_security,
        tax_optimization,
        investment,
        pension,
        budget,
        preferences,
    ) = tokio::try_join!(
        services.clients.get(client_id),
        services.goals.get_by_client_id(client_id),
        services.planned_actions.get_by_client_id(client_id),
        services.housing.find(client_id),
        services.property_insurance.find(client_id),
        services.health_insurance.find(client_id),
        services.legal_security.find(client_id),
        services.tax_optimization.find(client_id),
        services.investment.find(client_id),
        services.pension.find(client_id),
        services.budget.find(client_id),
        services.preferences.find(client_id),
    )?;

    let client = client.ok_or_else(|| {
        AppError::new(NOT_FOUND_CLIENT, "Client not found").with_context("id", client_id)
    })?;

    Ok(ClientExport {
        version: EXPORT_VERSION,
        export_date: iso_now(),
        client,
        goals,
        actions,
        housing,
        property_insurance,
        health_insurance,
        legal_security,
        tax_optimization,
        investment,
        pension,
        budget,
        preferences,
    })
}

/// Pretty-printed export document.
pub async fn export_client_json<B: Backend>(
    services: &Services<B>,
    client_id: &str,
) -> AppResult<String> {
    let doc = export_client(services, client_id).await?;
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Write the export document to `out`, replacing any previous file.
pub async fn export_client_to_file<B: Backend>(
    services: &Services<B>,
    client_id: &str,
    out: &Path,
) -> AppResult<()> {
    let json = export_client_json(services, client_id).await?;
    write_atomic(out, json.as_bytes())
        .map_err(|err| AppError::from(err).with_context("path", out.display().to_string()))?;
    info!(
        target: "finplan",
        event = "client_exported",
        client_id = %client_id,
        path = %out.display(),
        bytes = json.len()
    );
    Ok(())
}
