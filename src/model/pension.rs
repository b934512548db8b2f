//! Three-pillar pension records, life insurance and the risk profile.

use super::{owned_entity, text_enum, Person};

text_enum! {
    PillarType { ThreeA => "3a", ThreeB => "3b" }
}

text_enum! {
    PillarProduct {
        BankAccount => "bank_account",
        Insurance => "insurance",
        Fund => "fund",
        Etf => "etf",
    }
}

text_enum! {
    LifeInsuranceType {
        TermLife => "term_life",
        WholeLife => "whole_life",
        Endowment => "endowment",
        Disability => "disability",
        Combined => "combined",
    }
}

text_enum! {
    PremiumFrequency { Monthly => "monthly", Quarterly => "quarterly", Yearly => "yearly" }
}

text_enum! {
    ReactionToLoss { SellAll => "sell_all", SellSome => "sell_some", Hold => "hold", BuyMore => "buy_more" }
}

text_enum! {
    InvestmentHorizon { Short => "short", Medium => "medium", Long => "long", VeryLong => "very_long" }
}

text_enum! {
    IncomeStability {
        VeryStable => "very_stable",
        Stable => "stable",
        Variable => "variable",
        Uncertain => "uncertain",
    }
}

text_enum! {
    LiquidityNeeds { High => "high", Medium => "medium", Low => "low" }
}

text_enum! {
    RiskCategory {
        Conservative => "conservative",
        ModerateConservative => "moderate_conservative",
        Balanced => "balanced",
        ModerateAggressive => "moderate_aggressive",
        Aggressive => "aggressive",
    }
}

owned_entity! {
    /// First pillar (AHV/IV) contribution record.
    SingleRecordEntity Pillar1 => "pillar1", order_by ["created_at"] {
        contribution_years_man: Option<i32>,
        average_income_man: Option<f64>,
        expected_ahv_pension_man: Option<f64>,
        has_contribution_gaps_man: Option<bool>,
        gap_years_man: Option<String>,
        contribution_years_woman: Option<i32>,
        average_income_woman: Option<f64>,
        expected_ahv_pension_woman: Option<f64>,
        has_contribution_gaps_woman: Option<bool>,
        gap_years_woman: Option<String>,
        #[serde(rename = "orderedIKStatementMan")]
        ordered_ik_statement_man: Option<bool>,
        #[serde(rename = "orderedIKStatementWoman")]
        ordered_ik_statement_woman: Option<bool>,
        ik_statement_date_man: Option<String>,
        ik_statement_date_woman: Option<String>,
        notes: Option<String>,
    }
}

owned_entity! {
    /// Second pillar (occupational pension fund).
    SingleRecordEntity Pillar2 => "pillar2", order_by ["created_at"] {
        pension_fund_man: Option<String>,
        insured_salary_man: Option<f64>,
        current_balance_man: Option<f64>,
        projected_pension_man: Option<f64>,
        projected_capital_man: Option<f64>,
        conversion_rate_man: Option<f64>,
        max_voluntary_purchase_man: Option<f64>,
        disability_pension_man: Option<f64>,
        spouse_pension_man: Option<f64>,
        child_pension_man: Option<f64>,
        death_capital_man: Option<f64>,
        early_retirement_possible_man: Option<bool>,
        earliest_retirement_age_man: Option<i32>,
        pension_fund_woman: Option<String>,
        insured_salary_woman: Option<f64>,
        current_balance_woman: Option<f64>,
        projected_pension_woman: Option<f64>,
        projected_capital_woman: Option<f64>,
        conversion_rate_woman: Option<f64>,
        max_voluntary_purchase_woman: Option<f64>,
        disability_pension_woman: Option<f64>,
        spouse_pension_woman: Option<f64>,
        child_pension_woman: Option<f64>,
        death_capital_woman: Option<f64>,
        early_retirement_possible_woman: Option<bool>,
        earliest_retirement_age_woman: Option<i32>,
        received_pension_statement_man: Option<bool>,
        received_pension_statement_woman: Option<bool>,
        statement_date_man: Option<String>,
        statement_date_woman: Option<String>,
        notes: Option<String>,
    }
}

impl Pillar2 {
    /// Combined vested balance of both partners.
    pub fn total_balance(&self) -> f64 {
        self.current_balance_man.unwrap_or(0.0) + self.current_balance_woman.unwrap_or(0.0)
    }
}

owned_entity! {
    /// Third pillar account (tied 3a or free 3b).
    ListEntity Pillar3Account => "pillar3_accounts", order_by ["created_at"] {
        owner: Person,
        pillar_type: PillarType,
        provider: String,
        product_type: PillarProduct,
        account_number: Option<String>,
        start_date: Option<String>,
        current_value: f64,
        yearly_contribution: Option<f64>,
        interest_rate: Option<f64>,
        investment_strategy: Option<String>,
        beneficiaries: Option<String>,
        notes: Option<String>,
    }
}

owned_entity! {
    SingleRecordEntity RiskProfile => "risk_profiles", order_by ["created_at"] {
        investment_experience_years: Option<i32>,
        has_stock_experience: Option<bool>,
        has_bond_experience: Option<bool>,
        has_fund_experience: Option<bool>,
        has_derivative_experience: Option<bool>,
        reaction_to_loss: Option<ReactionToLoss>,
        investment_horizon: Option<InvestmentHorizon>,
        income_stability: Option<IncomeStability>,
        liquidity_needs: Option<LiquidityNeeds>,
        /// Percent.
        max_acceptable_loss: Option<f64>,
        /// 1 to 10.
        risk_score: Option<i32>,
        risk_category: Option<RiskCategory>,
        recommended_stock_allocation: Option<f64>,
        recommended_bond_allocation: Option<f64>,
        recommended_cash_allocation: Option<f64>,
        assessment_date: Option<String>,
        notes: Option<String>,
    }
}

owned_entity! {
    ListEntity LifeInsurance => "life_insurance", order_by ["created_at"] {
        owner: Person,
        insurance_type: LifeInsuranceType,
        provider: String,
        policy_number: Option<String>,
        start_date: Option<String>,
        end_date: Option<String>,
        premium: f64,
        premium_frequency: PremiumFrequency,
        sum_insured_death: Option<f64>,
        sum_insured_disability: Option<f64>,
        current_surrender_value: Option<f64>,
        beneficiaries: Option<String>,
        is_pledged: Option<bool>,
        pledged_to: Option<String>,
        notes: Option<String>,
    }
}
