//! Planning formulas behind the calculator dashboards. Pure functions; all
//! amounts are unrounded until passed through [`format_chf`].

use serde::{Deserialize, Serialize};

use crate::model::{Budget, IncomeDetail, IncomeFrequency, Investment};

/// Longest horizon the year-by-year tables are built for.
pub const MAX_YEARS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundRow {
    pub year: u32,
    pub balance: f64,
    pub principal: f64,
    pub interest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundInterest {
    pub rows: Vec<CompoundRow>,
    pub final_balance: f64,
    pub total_interest: f64,
    /// Percent.
    pub total_return: f64,
    /// Percent per year.
    pub annualized_return: f64,
}

/// Balance after each whole year for `principal` at `rate_percent` a year,
/// compounded `periods_per_year` times. Year 0 is the starting principal.
/// `years` is capped at [`MAX_YEARS`].
pub fn compound_interest(
    principal: f64,
    rate_percent: f64,
    years: u32,
    periods_per_year: u32,
) -> CompoundInterest {
    let years = years.min(MAX_YEARS);
    let periods_per_year = periods_per_year.max(1);
    let periodic_rate = rate_percent / 100.0 / f64::from(periods_per_year);

    let rows: Vec<CompoundRow> = (0..=years)
        .map(|year| {
            let periods = f64::from(year) * f64::from(periods_per_year);
            let balance = principal * (1.0 + periodic_rate).powf(periods);
            CompoundRow {
                year,
                balance,
                principal,
                interest: balance - principal,
            }
        })
        .collect();

    let final_balance = rows.last().map(|r| r.balance).unwrap_or(principal);
    let total_interest = final_balance - principal;
    let (total_return, annualized_return) = if principal > 0.0 {
        let total = total_interest / principal * 100.0;
        let annual = if years > 0 {
            ((final_balance / principal).powf(1.0 / f64::from(years)) - 1.0) * 100.0
        } else {
            0.0
        };
        (total, annual)
    } else {
        (0.0, 0.0)
    };

    CompoundInterest {
        rows,
        final_balance,
        total_interest,
        total_return,
        annualized_return,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsRow {
    pub year: u32,
    pub balance: f64,
    pub contributions: f64,
    pub interest: f64,
}

/// Monthly compounding with the contribution credited at each month end.
/// `years` is capped at [`MAX_YEARS`].
pub fn savings_plan(initial: f64, monthly: f64, rate_percent: f64, years: u32) -> Vec<SavingsRow> {
    let years = years.min(MAX_YEARS);
    let monthly_rate = rate_percent / 100.0 / 12.0;
    let mut balance = initial;
    let mut contributions = initial;
    let mut rows = Vec::with_capacity(years as usize + 1);

    for year in 0..=years {
        if year > 0 {
            for _ in 0..12 {
                balance = balance * (1.0 + monthly_rate) + monthly;
                contributions += monthly;
            }
        }
        rows.push(SavingsRow {
            year,
            balance,
            contributions,
            interest: balance - contributions,
        });
    }
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredSavings {
    pub monthly_needed: f64,
    /// What current savings grow to by the deadline on their own.
    pub fv_current_savings: f64,
    pub already_achieved: bool,
}

/// Monthly saving needed to reach `goal` in `years`, given `current` savings.
pub fn required_monthly_savings(
    goal: f64,
    current: f64,
    years: u32,
    rate_percent: f64,
) -> RequiredSavings {
    let monthly_rate = rate_percent / 100.0 / 12.0;
    let months = f64::from(years) * 12.0;
    let growth = (1.0 + monthly_rate).powf(months);
    let fv_current_savings = current * growth;
    let remaining = goal - fv_current_savings;

    if remaining <= 0.0 {
        return RequiredSavings {
            monthly_needed: 0.0,
            fv_current_savings,
            already_achieved: true,
        };
    }

    let monthly_needed = if months == 0.0 {
        remaining
    } else if monthly_rate == 0.0 {
        remaining / months
    } else {
        remaining * (monthly_rate / (growth - 1.0))
    };

    RequiredSavings {
        monthly_needed: monthly_needed.max(0.0),
        fv_current_savings,
        already_achieved: false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub current_savings: f64,
    pub monthly_contribution: f64,
    pub return_rate_percent: f64,
    pub withdrawal_rate_percent: f64,
    /// Expected first pillar pension per month.
    pub expected_ahv: f64,
    /// Expected second pillar pension per month.
    pub expected_pk: f64,
}

impl Default for RetirementInput {
    fn default() -> Self {
        Self {
            current_age: 35,
            retirement_age: 65,
            current_savings: 100_000.0,
            monthly_contribution: 1_000.0,
            return_rate_percent: 5.0,
            withdrawal_rate_percent: 4.0,
            expected_ahv: 2_400.0,
            expected_pk: 2_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalPoint {
    pub age: u32,
    pub capital: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementProjection {
    pub capital_at_retirement: f64,
    pub monthly_withdrawal: f64,
    pub total_monthly_income: f64,
    /// Yearly-compounded capital by age, for charting.
    pub projection: Vec<CapitalPoint>,
}

/// Capital at retirement and the income it supports. The saving phase is
/// capped at [`MAX_YEARS`].
pub fn retirement_projection(input: &RetirementInput) -> RetirementProjection {
    let years = input
        .retirement_age
        .saturating_sub(input.current_age)
        .min(MAX_YEARS);
    let monthly_rate = input.return_rate_percent / 100.0 / 12.0;
    let months = f64::from(years) * 12.0;
    let growth = (1.0 + monthly_rate).powf(months);

    let fv_current = input.current_savings * growth;
    let fv_contributions = if monthly_rate == 0.0 {
        input.monthly_contribution * months
    } else {
        input.monthly_contribution * ((growth - 1.0) / monthly_rate)
    };
    let capital_at_retirement = fv_current + fv_contributions;
    let monthly_withdrawal = capital_at_retirement * (input.withdrawal_rate_percent / 100.0) / 12.0;

    let mut projection = Vec::with_capacity(years as usize + 1);
    let mut balance = input.current_savings;
    for age in input.current_age..=input.current_age + years {
        projection.push(CapitalPoint { age, capital: balance });
        balance = balance * (1.0 + input.return_rate_percent / 100.0) + input.monthly_contribution * 12.0;
    }

    RetirementProjection {
        capital_at_retirement,
        monthly_withdrawal,
        total_monthly_income: monthly_withdrawal + input.expected_ahv + input.expected_pk,
        projection,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub monthly_income: f64,
    pub total_expenses: f64,
    pub savings_rate: f64,
    /// Expenses plus savings.
    pub total_outflow: f64,
    pub balance: f64,
    /// Savings as a percent of monthly income; 0 without income.
    pub savings_rate_percent: f64,
}

/// Monthly budget of a household. Income is the yearly income from the
/// investment sheet spread over twelve months.
pub fn budget_summary(budget: &Budget, investment: Option<&Investment>) -> BudgetSummary {
    let yearly_income = investment.map_or(0.0, |inv| {
        inv.income_man.unwrap_or(0.0) + inv.income_woman.unwrap_or(0.0)
    });
    let monthly_income = yearly_income / 12.0;
    let total_expenses = budget.monthly_expenses();
    let savings_rate = budget.monthly_savings();
    let total_outflow = total_expenses + savings_rate;
    let savings_rate_percent = if monthly_income > 0.0 {
        savings_rate / monthly_income * 100.0
    } else {
        0.0
    };

    BudgetSummary {
        monthly_income,
        total_expenses,
        savings_rate,
        total_outflow,
        balance: monthly_income - total_outflow,
        savings_rate_percent,
    }
}

/// Recurring income per year across income lines; one-time amounts are
/// left out.
pub fn yearly_recurring_income(incomes: &[IncomeDetail]) -> f64 {
    incomes
        .iter()
        .filter(|income| income.frequency != IncomeFrequency::OneTime)
        .map(IncomeDetail::yearly_amount)
        .sum()
}

/// Whole francs with the Swiss thousands separator, e.g. `265’330 CHF`.
pub fn format_chf(value: f64) -> String {
    if !value.is_finite() {
        return "0 CHF".to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('’');
        }
        grouped.push(ch);
    }
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{grouped} CHF")
}

/// `0.25` → `25%`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.0}%", (fraction * 100.0).round())
}
