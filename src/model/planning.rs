//! Goals, planned actions and the per-topic advisory sheets.

use super::{owned_entity, text_enum};

text_enum! {
    GoalPriority { Low => "low", Medium => "medium", High => "high" }
}

text_enum! {
    GoalStatus { Planned => "planned", InProgress => "in_progress", Completed => "completed" }
}

text_enum! {
    ActionStatus { Pending => "pending", InProgress => "in_progress", Completed => "completed" }
}

text_enum! {
    ContactPreference { Du => "du", Sie => "sie" }
}

text_enum! {
    PreferredDay { A => "A", B => "B", D => "D" }
}

owned_entity! {
    /// A goal with a target year (1, 2, 3, 5, 10 or 20 years out).
    ListEntity Goal => "goals", order_by ["target_year", "created_at"] {
        description: String,
        target_year: i32,
        estimated_cost: Option<f64>,
        priority: GoalPriority,
        status: GoalStatus,
    }
}

owned_entity! {
    /// An intended measure agreed with the client.
    ListEntity PlannedAction => "planned_actions", order_by ["priority", "created_at"] {
        for_man: bool,
        for_woman: bool,
        priority: i32,
        goal: String,
        action: String,
        responsible: String,
        deadline: Option<String>,
        status: ActionStatus,
    }
}

owned_entity! {
    SingleRecordEntity Housing => "housing", order_by ["created_at"] {
        is_renter: bool,
        monthly_rent: Option<f64>,
        additional_costs: Option<f64>,
        seeking_rent_reduction: bool,
        is_owner: bool,
        property_type: Option<String>,
        has_mortgage: bool,
        purchase_price: Option<f64>,
        tax_value: Option<f64>,
        debt: Option<f64>,
        mortgage_bank: Option<String>,
        /// Fixed, variable, SARON, ...
        mortgage_type: Option<String>,
        mortgage_amount: Option<f64>,
        mortgage_expiry: Option<String>,
        interest_rate: Option<f64>,
        amortization_direct: bool,
        amortization_indirect: bool,
        amortization_amount: Option<f64>,
        acquired_date: Option<String>,
        imputed_rental_value: Option<f64>,
        renovation_plans: Option<String>,
        utility_costs: Option<f64>,
        home_ownership_goal: Option<String>,
        target_date: Option<String>,
        target_price: Option<f64>,
    }
}

owned_entity! {
    SingleRecordEntity PropertyInsurance => "property_insurance", order_by ["created_at"] {
        has_private_liability: bool,
        private_liability_man: Option<String>,
        private_liability_woman: Option<String>,
        has_household_contents: bool,
        household_contents_man: Option<String>,
        household_contents_woman: Option<String>,
        has_vehicle: bool,
        vehicle_man: Option<String>,
        vehicle_woman: Option<String>,
        has_legal_protection: bool,
        legal_protection_man: Option<String>,
        legal_protection_woman: Option<String>,
        remarks: Option<String>,
    }
}

owned_entity! {
    SingleRecordEntity HealthInsurance => "health_insurance", order_by ["created_at"] {
        kvg_provider_man: Option<String>,
        kvg_provider_woman: Option<String>,
        vvg_provider_man: Option<String>,
        vvg_provider_woman: Option<String>,
        franchise_man: Option<f64>,
        franchise_woman: Option<f64>,
        yearly_premium_man: Option<f64>,
        yearly_premium_woman: Option<f64>,
        /// Premium reduction.
        ipv_man: Option<f64>,
        ipv_woman: Option<f64>,
        height_man: Option<f64>,
        height_woman: Option<f64>,
        weight_man: Option<f64>,
        weight_woman: Option<f64>,
        family_doctor_man: Option<String>,
        family_doctor_woman: Option<String>,
        is_smoker_man: bool,
        is_smoker_woman: bool,
        is_healthy_man: bool,
        is_healthy_woman: bool,
        had_alternative_physio: bool,
        had_accident: bool,
        had_illness: bool,
        had_psychologist: bool,
        protection_goals: Option<String>,
    }
}

owned_entity! {
    SingleRecordEntity LegalSecurity => "legal_security", order_by ["created_at"] {
        has_advance_directive: bool,
        has_patient_decree: bool,
        has_cohabitation_agreement: bool,
        has_will: bool,
        has_beneficiary_order: bool,
        has_pension_beneficiary: bool,
        has3a_beneficiary: bool,
        wants_service_package: bool,
        legal_goals: Option<String>,
    }
}

owned_entity! {
    SingleRecordEntity TaxOptimization => "tax_optimization", order_by ["created_at"] {
        received_tax_statement: bool,
        wants_service_package: bool,
        tax_goals: Option<String>,
        taxable_income_man: Option<f64>,
        taxable_income_woman: Option<f64>,
        current_tax_burden: Option<f64>,
        pillar3a_contribution_man: Option<f64>,
        pillar3a_contribution_woman: Option<f64>,
        pension_fund_purchase: Option<f64>,
        other_deductions: Option<f64>,
    }
}

owned_entity! {
    SingleRecordEntity Investment => "investment", order_by ["created_at"] {
        income_man: Option<f64>,
        income_woman: Option<f64>,
        liquid_assets_man: Option<f64>,
        liquid_assets_woman: Option<f64>,
        investment_assets_man: Option<f64>,
        investment_assets_woman: Option<f64>,
        received_tax_statement: bool,
        create_investment_profile: bool,
        wants_asset_withdrawal: bool,
        investment_goals: Option<String>,
    }
}

owned_entity! {
    /// Disability, death and retirement needs.
    SingleRecordEntity Pension => "pension", order_by ["created_at"] {
        pillar1_average_income_man: Option<f64>,
        pillar1_average_income_woman: Option<f64>,
        pillar2_amount_man: Option<f64>,
        pillar2_amount_woman: Option<f64>,
        disability_need_man: Option<f64>,
        disability_need_woman: Option<f64>,
        death_need_man: Option<f64>,
        death_need_woman: Option<f64>,
        target_retirement_age_man: Option<i32>,
        target_retirement_age_woman: Option<i32>,
        retirement_need_man: Option<f64>,
        retirement_need_woman: Option<f64>,
        #[serde(rename = "orderIKStatement")]
        order_ik_statement: bool,
        review_pension_fund: bool,
        review3a: bool,
        review3b: bool,
    }
}

owned_entity! {
    /// Monthly expenses per partner.
    SingleRecordEntity Budget => "budget", order_by ["created_at"] {
        taxes_man: Option<f64>,
        taxes_woman: Option<f64>,
        /// Taxes settled by direct debit.
        #[serde(rename = "taxesDA")]
        taxes_da: bool,
        food_man: Option<f64>,
        food_woman: Option<f64>,
        mobility_man: Option<f64>,
        mobility_woman: Option<f64>,
        communication_man: Option<f64>,
        communication_woman: Option<f64>,
        clothing_man: Option<f64>,
        clothing_woman: Option<f64>,
        travel_man: Option<f64>,
        travel_woman: Option<f64>,
        leisure_man: Option<f64>,
        leisure_woman: Option<f64>,
        credit_man: Option<f64>,
        credit_woman: Option<f64>,
        savings_rate_man: Option<f64>,
        savings_rate_woman: Option<f64>,
    }
}

impl Budget {
    /// Sum of every monthly expense line for both partners, excluding savings.
    pub fn monthly_expenses(&self) -> f64 {
        [
            self.taxes_man,
            self.taxes_woman,
            self.food_man,
            self.food_woman,
            self.mobility_man,
            self.mobility_woman,
            self.communication_man,
            self.communication_woman,
            self.clothing_man,
            self.clothing_woman,
            self.travel_man,
            self.travel_woman,
            self.leisure_man,
            self.leisure_woman,
            self.credit_man,
            self.credit_woman,
        ]
        .iter()
        .flatten()
        .sum()
    }

    pub fn monthly_savings(&self) -> f64 {
        self.savings_rate_man.unwrap_or(0.0) + self.savings_rate_woman.unwrap_or(0.0)
    }
}

owned_entity! {
    /// Follow-up appointment and areas of interest.
    SingleRecordEntity ClientPreferences => "client_preferences", order_by ["created_at"] {
        follow_up_date: Option<String>,
        contact_preference: Option<ContactPreference>,
        preferred_day: Option<PreferredDay>,
        /// 1, 2 or 4.
        preferred_week: Option<i32>,
        is_birthday: Option<bool>,
        interested_in_housing: bool,
        interested_in_protection: bool,
        interested_in_silver: bool,
        interested_in_gold: bool,
        interested_in_platinum: bool,
        interested_in_pension: bool,
        interested_in_investment: bool,
        personal_notes: Option<String>,
        sales_opportunities: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entity;

    #[test]
    fn digit_columns_keep_their_wire_names() {
        let patch = LegalSecurityPatch {
            has3a_beneficiary: Some(true),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({"has3aBeneficiary": true}));
        assert!(LegalSecurity::has_column("has3a_beneficiary"));
    }

    #[test]
    fn acronym_fields_use_their_wire_names() {
        let patch = BudgetPatch {
            taxes_da: Some(true),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({"taxesDA": true}));

        let record = crate::repo::to_record(&patch).unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["taxes_da"]);
        assert!(Budget::has_column("taxes_da"));

        let back: PensionPatch =
            serde_json::from_value(serde_json::json!({"orderIKStatement": true})).unwrap();
        assert_eq!(back.order_ik_statement, Some(true));
    }

    #[test]
    fn goals_sort_by_target_year() {
        assert_eq!(Goal::ORDER_BY[0], "target_year");
        assert_eq!(PlannedAction::ORDER_BY[0], "priority");
    }
}
