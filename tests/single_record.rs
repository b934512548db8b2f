use anyhow::Result;
use finplan_lib::model::{BudgetPatch, HealthInsurancePatch, Pillar2Patch};

#[path = "util.rs"]
mod util;

#[tokio::test]
async fn first_read_creates_a_default_row() -> Result<()> {
    let services = util::memory_services().await;
    let client_id = util::seed_client(&services, "Anna", "Muster").await;

    assert!(services.health_insurance.find(&client_id).await?.is_none());

    let row = services.health_insurance.get_by_client_id(&client_id).await?;
    assert_eq!(row.client_id, client_id);
    assert!(row.is_healthy_man);
    assert!(row.is_healthy_woman);
    assert!(!row.is_smoker_man);
    assert_eq!(row.kvg_provider_man, None);

    let again = services.health_insurance.get_by_client_id(&client_id).await?;
    assert_eq!(again.id, row.id);
    assert_eq!(util::count_rows(&services, "health_insurance").await, 1);
    Ok(())
}

#[tokio::test]
async fn concurrent_first_reads_share_one_row() -> Result<()> {
    let services = util::memory_services().await;
    let client_id = util::seed_client(&services, "Anna", "Muster").await;

    let (a, b) = tokio::join!(
        services.budget.get_by_client_id(&client_id),
        services.budget.get_by_client_id(&client_id),
    );
    assert_eq!(a?.id, b?.id);
    assert_eq!(util::count_rows(&services, "budget").await, 1);
    Ok(())
}

#[tokio::test]
async fn upsert_inserts_then_updates() -> Result<()> {
    let services = util::memory_services().await;
    let client_id = util::seed_client(&services, "Anna", "Muster").await;

    services
        .pillar2
        .upsert(
            &client_id,
            &Pillar2Patch {
                pension_fund_man: Some(Some("Publica".into())),
                current_balance_man: Some(Some(180_000.0)),
                ..Default::default()
            },
        )
        .await?;
    let first = services.pillar2.find(&client_id).await?.expect("inserted");
    assert_eq!(first.pension_fund_man.as_deref(), Some("Publica"));

    services
        .pillar2
        .upsert(
            &client_id,
            &Pillar2Patch {
                current_balance_woman: Some(Some(95_000.0)),
                ..Default::default()
            },
        )
        .await?;
    let second = services.pillar2.find(&client_id).await?.expect("still there");
    assert_eq!(second.id, first.id);
    assert_eq!(second.pension_fund_man.as_deref(), Some("Publica"));
    assert_eq!(second.total_balance(), 275_000.0);
    assert_eq!(util::count_rows(&services, "pillar2").await, 1);
    Ok(())
}

#[tokio::test]
async fn null_clears_and_absent_keeps() -> Result<()> {
    let services = util::memory_services().await;
    let client_id = util::seed_client(&services, "Anna", "Muster").await;

    services
        .budget
        .upsert(
            &client_id,
            &BudgetPatch {
                food_man: Some(Some(600.0)),
                food_woman: Some(Some(550.0)),
                ..Default::default()
            },
        )
        .await?;
    services
        .budget
        .upsert(
            &client_id,
            &BudgetPatch {
                food_man: Some(None),
                ..Default::default()
            },
        )
        .await?;

    let budget = services.budget.get_by_client_id(&client_id).await?;
    assert_eq!(budget.food_man, None);
    assert_eq!(budget.food_woman, Some(550.0));
    Ok(())
}

#[tokio::test]
async fn flags_round_trip_as_booleans() -> Result<()> {
    let services = util::memory_services().await;
    let client_id = util::seed_client(&services, "Anna", "Muster").await;

    services
        .health_insurance
        .upsert(
            &client_id,
            &HealthInsurancePatch {
                is_smoker_woman: Some(true),
                is_healthy_man: Some(false),
                ..Default::default()
            },
        )
        .await?;

    let row = services.health_insurance.get_by_client_id(&client_id).await?;
    assert!(row.is_smoker_woman);
    assert!(!row.is_healthy_man);
    assert!(row.is_healthy_woman);
    Ok(())
}
