use anyhow::Result;
use finplan_lib::model::*;
use serde_json::Value;

#[path = "util.rs"]
mod util;

/// Every key the create payload carries comes back unchanged on the stored row.
fn assert_carries<N: serde::Serialize, E: serde::Serialize>(new: &N, row: &E) {
    let Value::Object(sent) = serde_json::to_value(new).unwrap() else {
        panic!("create payload is not an object");
    };
    let stored = serde_json::to_value(row).unwrap();
    for (key, value) in sent {
        assert_eq!(stored[&key], value, "field {key}");
    }
}

macro_rules! list_kinds {
    ($( $test:ident : $repo:ident => $make:expr ; )+) => {
        $(
            #[tokio::test]
            async fn $test() -> Result<()> {
                let services = util::memory_services().await;
                let client_id = util::seed_client(&services, "Anna", "Muster").await;
                let other = util::seed_client(&services, "Beat", "Amsler").await;
                let make = $make;

                let new = make(client_id.clone());
                let id = services.$repo.create(&new).await?;
                services.$repo.create(&make(other)).await?;

                let rows = services.$repo.get_by_client_id(&client_id).await?;
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].id, id);
                assert_eq!(rows[0].client_id(), client_id);
                assert_carries(&new, &rows[0]);

                let by_id = services.$repo.get(&id).await?;
                assert_eq!(by_id.as_ref(), rows.first());
                Ok(())
            }
        )+
    };
}

list_kinds! {
    goal_round_trips: goals => |client_id| NewGoal {
        client_id,
        description: "House deposit".into(),
        target_year: 2030,
        estimated_cost: Some(120_000.0),
        priority: GoalPriority::High,
        status: GoalStatus::InProgress,
    };
    planned_action_round_trips: planned_actions => |client_id| NewPlannedAction {
        client_id,
        for_man: true,
        for_woman: false,
        priority: 2,
        goal: "Retirement".into(),
        action: "Open 3a account".into(),
        responsible: "Advisor".into(),
        deadline: Some("2026-12-31".into()),
        status: ActionStatus::Pending,
    };
    bank_account_round_trips: bank_accounts => |client_id| NewBankAccount {
        client_id,
        owner: Owner::Joint,
        bank_name: "ZKB".into(),
        account_type: AccountType::Savings,
        iban: Some("CH93 0076 2011 6238 5295 7".into()),
        balance: 12_500.5,
        interest_rate: Some(0.75),
        notes: None,
    };
    security_holding_round_trips: securities => |client_id| NewSecurityHolding {
        client_id,
        owner: Owner::Man,
        custodian_bank: "Swissquote".into(),
        investment_type: InvestmentType::Etf,
        description: "World equity ETF".into(),
        quantity: Some(120.0),
        purchase_price: Some(95.2),
        current_value: 14_400.0,
        purchase_date: Some("2021-03-15".into()),
        currency: "CHF".into(),
        notes: Some("savings plan".into()),
    };
    real_estate_round_trips: real_estate => |client_id| NewRealEstate {
        client_id,
        owner: Owner::Joint,
        property_type: PropertyType::Apartment,
        address: "Seestrasse 1, 8002 Zürich".into(),
        purchase_date: Some("2015-06-01".into()),
        purchase_price: Some(850_000.0),
        current_value: 1_050_000.0,
        tax_value: Some(700_000.0),
        imputed_rental_value: Some(24_000.0),
        rental_income: None,
        is_own_residence: true,
        notes: None,
    };
    other_asset_round_trips: other_assets => |client_id| NewOtherAsset {
        client_id,
        owner: Owner::Woman,
        asset_type: AssetType::Vehicle,
        description: "Car".into(),
        purchase_date: None,
        purchase_price: Some(38_000.0),
        current_value: 21_000.0,
        notes: None,
    };
    liability_round_trips: liabilities => |client_id| NewLiability {
        client_id,
        owner: Owner::Joint,
        liability_type: LiabilityType::Mortgage,
        creditor: "UBS".into(),
        original_amount: 600_000.0,
        current_balance: 540_000.0,
        interest_rate: 1.6,
        monthly_payment: Some(720.0),
        start_date: Some("2015-06-01".into()),
        end_date: Some("2030-06-01".into()),
        linked_asset_id: None,
        notes: None,
    };
    pillar3_account_round_trips: pillar3_accounts => |client_id| NewPillar3Account {
        client_id,
        owner: Person::Woman,
        pillar_type: PillarType::ThreeA,
        provider: "VIAC".into(),
        product_type: PillarProduct::Fund,
        account_number: Some("3A-001".into()),
        start_date: Some("2019-01-01".into()),
        current_value: 35_000.0,
        yearly_contribution: Some(7_056.0),
        interest_rate: None,
        investment_strategy: Some("global 80".into()),
        beneficiaries: None,
        notes: None,
    };
    life_insurance_round_trips: life_insurance => |client_id| NewLifeInsurance {
        client_id,
        owner: Person::Man,
        insurance_type: LifeInsuranceType::Endowment,
        provider: "Swiss Life".into(),
        policy_number: Some("P-1234".into()),
        start_date: Some("2012-01-01".into()),
        end_date: Some("2042-01-01".into()),
        premium: 250.0,
        premium_frequency: PremiumFrequency::Monthly,
        sum_insured_death: Some(200_000.0),
        sum_insured_disability: None,
        current_surrender_value: Some(18_500.0),
        beneficiaries: Some("spouse".into()),
        is_pledged: Some(false),
        pledged_to: None,
        notes: None,
    };
    income_detail_round_trips: income_details => |client_id| NewIncomeDetail {
        client_id,
        owner: Owner::Man,
        income_type: IncomeType::SelfEmployment,
        description: "Consulting".into(),
        amount: 4_500.0,
        frequency: IncomeFrequency::Quarterly,
        is_taxable: true,
        start_date: None,
        end_date: None,
        notes: None,
    };
}

macro_rules! single_record_kinds {
    ($( $test:ident : $repo:ident => $ty:ty ; )+) => {
        $(
            #[tokio::test]
            async fn $test() -> Result<()> {
                let services = util::memory_services().await;
                let client_id = util::seed_client(&services, "Anna", "Muster").await;

                let first = services.$repo.get_by_client_id(&client_id).await?;
                let second = services.$repo.get_by_client_id(&client_id).await?;
                assert_eq!(first.id, second.id);
                assert_eq!(first, second);
                assert_eq!(first.client_id(), client_id);
                assert_eq!(
                    util::count_rows(&services, <$ty as Entity>::TABLE).await,
                    1
                );
                Ok(())
            }
        )+
    };
}

single_record_kinds! {
    housing_is_created_once: housing => Housing;
    property_insurance_is_created_once: property_insurance => PropertyInsurance;
    health_insurance_is_created_once: health_insurance => HealthInsurance;
    legal_security_is_created_once: legal_security => LegalSecurity;
    tax_optimization_is_created_once: tax_optimization => TaxOptimization;
    investment_is_created_once: investment => Investment;
    pension_is_created_once: pension => Pension;
    budget_is_created_once: budget => Budget;
    preferences_are_created_once: preferences => ClientPreferences;
    pillar1_is_created_once: pillar1 => Pillar1;
    pillar2_is_created_once: pillar2 => Pillar2;
    risk_profile_is_created_once: risk_profile => RiskProfile;
}

#[tokio::test]
async fn acronym_columns_survive_storage() -> Result<()> {
    let services = util::memory_services().await;
    let client_id = util::seed_client(&services, "Anna", "Muster").await;

    services
        .budget
        .upsert(
            &client_id,
            &BudgetPatch {
                taxes_da: Some(true),
                ..Default::default()
            },
        )
        .await?;
    services
        .pension
        .upsert(
            &client_id,
            &PensionPatch {
                order_ik_statement: Some(true),
                ..Default::default()
            },
        )
        .await?;
    services
        .pillar1
        .upsert(
            &client_id,
            &Pillar1Patch {
                ordered_ik_statement_woman: Some(Some(true)),
                ..Default::default()
            },
        )
        .await?;

    assert!(services.budget.get_by_client_id(&client_id).await?.taxes_da);
    assert!(services.pension.get_by_client_id(&client_id).await?.order_ik_statement);
    let pillar1 = services.pillar1.get_by_client_id(&client_id).await?;
    assert_eq!(pillar1.ordered_ik_statement_woman, Some(true));
    assert_eq!(pillar1.ordered_ik_statement_man, None);

    let json = serde_json::to_value(&pillar1)?;
    assert_eq!(json["orderedIKStatementWoman"], true);
    Ok(())
}
