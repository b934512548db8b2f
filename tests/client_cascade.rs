use anyhow::Result;
use finplan_lib::error::NOT_FOUND_ROW;
use finplan_lib::model::{
    ClientPatch, GoalPriority, GoalStatus, LiabilityType, MaritalStatus, NewClient, NewGoal,
    NewLiability, Owner, OWNED_TABLES,
};

#[path = "util.rs"]
mod util;

#[tokio::test]
async fn clients_are_listed_by_name() -> Result<()> {
    let services = util::memory_services().await;
    util::seed_client(&services, "Zora", "Muster").await;
    util::seed_client(&services, "Beat", "Amsler").await;
    util::seed_client(&services, "Anna", "Muster").await;

    let names: Vec<String> = services
        .clients
        .list_all()
        .await?
        .iter()
        .map(|c| format!("{} {}", c.first_name, c.last_name))
        .collect();
    assert_eq!(names, vec!["Beat Amsler", "Anna Muster", "Zora Muster"]);
    Ok(())
}

#[tokio::test]
async fn create_records_the_advisor() -> Result<()> {
    let services = util::memory_services().await;
    let id = services
        .clients
        .create(
            &NewClient {
                partner_first_name: Some("Marco".into()),
                marital_status: Some(MaritalStatus::Married),
                ..NewClient::named("Anna", "Muster")
            },
            Some("advisor-1"),
        )
        .await?;

    let client = services.clients.get(&id).await?.expect("client");
    assert_eq!(client.advisor_id.as_deref(), Some("advisor-1"));
    assert_eq!(client.marital_status, Some(MaritalStatus::Married));
    assert_eq!(client.display_name(), "Anna & Marco Muster");
    Ok(())
}

#[tokio::test]
async fn client_update_changes_only_patched_fields() -> Result<()> {
    let services = util::memory_services().await;
    let id = util::seed_client(&services, "Anna", "Muster").await;

    services
        .clients
        .update(
            &id,
            &ClientPatch {
                city: Some(Some("Bern".into())),
                save_taxes: Some(true),
                ..Default::default()
            },
        )
        .await?;

    let client = services.clients.get(&id).await?.expect("client");
    assert_eq!(client.city.as_deref(), Some("Bern"));
    assert!(client.save_taxes);
    assert_eq!(client.first_name, "Anna");

    let err = services
        .clients
        .update("missing", &ClientPatch::default())
        .await
        .expect_err("missing client");
    assert_eq!(err.code(), NOT_FOUND_ROW);
    Ok(())
}

#[tokio::test]
async fn deleting_a_client_removes_everything_it_owns() -> Result<()> {
    let services = util::memory_services().await;
    let doomed = util::seed_client(&services, "Anna", "Muster").await;
    let kept = util::seed_client(&services, "Beat", "Amsler").await;

    for client_id in [&doomed, &kept] {
        services
            .goals
            .create(&NewGoal {
                client_id: client_id.clone(),
                description: "Car".into(),
                target_year: 2030,
                estimated_cost: None,
                priority: GoalPriority::High,
                status: GoalStatus::Planned,
            })
            .await?;
        services
            .liabilities
            .create(&NewLiability {
                client_id: client_id.clone(),
                owner: Owner::Man,
                liability_type: LiabilityType::CarLoan,
                creditor: "Bank".into(),
                original_amount: 30_000.0,
                current_balance: 12_000.0,
                interest_rate: 3.9,
                monthly_payment: Some(450.0),
                start_date: None,
                end_date: None,
                linked_asset_id: None,
                notes: None,
            })
            .await?;
        services.housing.get_by_client_id(client_id).await?;
        services.pillar1.get_by_client_id(client_id).await?;
    }

    services.clients.delete(&doomed).await?;

    assert!(services.clients.get(&doomed).await?.is_none());
    for table in OWNED_TABLES {
        let orphaned: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {table} WHERE client_id = ?"
        ))
        .bind(&doomed)
        .fetch_one(services.backend().pool())
        .await?;
        assert_eq!(orphaned, 0, "{table} still holds rows");
    }

    assert_eq!(services.goals.get_by_client_id(&kept).await?.len(), 1);
    assert_eq!(services.liabilities.get_by_client_id(&kept).await?.len(), 1);
    assert!(services.housing.find(&kept).await?.is_some());

    // second delete is a no-op
    services.clients.delete(&doomed).await?;
    Ok(())
}
