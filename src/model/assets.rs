//! Assets, liabilities and income.

use super::{owned_entity, text_enum, Owner};

text_enum! {
    AccountType { Checking => "checking", Savings => "savings", Salary => "salary", Other => "other" }
}

text_enum! {
    InvestmentType {
        Stocks => "stocks",
        Bonds => "bonds",
        Funds => "funds",
        Etf => "etf",
        Structured => "structured",
        Crypto => "crypto",
        Other => "other",
    }
}

text_enum! {
    PropertyType {
        House => "house",
        Apartment => "apartment",
        Land => "land",
        Commercial => "commercial",
        Vacation => "vacation",
        Other => "other",
    }
}

text_enum! {
    AssetType {
        Vehicle => "vehicle",
        Art => "art",
        Jewelry => "jewelry",
        Collectibles => "collectibles",
        Business => "business",
        LoanReceivable => "loan_receivable",
        Other => "other",
    }
}

text_enum! {
    LiabilityType {
        Mortgage => "mortgage",
        PersonalLoan => "personal_loan",
        CarLoan => "car_loan",
        CreditCard => "credit_card",
        StudentLoan => "student_loan",
        BusinessLoan => "business_loan",
        Other => "other",
    }
}

text_enum! {
    IncomeType {
        Salary => "salary",
        Bonus => "bonus",
        SelfEmployment => "self_employment",
        Rental => "rental",
        Dividends => "dividends",
        Interest => "interest",
        Pension => "pension",
        Alimony => "alimony",
        ChildSupport => "child_support",
        Other => "other",
    }
}

text_enum! {
    IncomeFrequency {
        Monthly => "monthly",
        Quarterly => "quarterly",
        Yearly => "yearly",
        OneTime => "one_time",
    }
}

owned_entity! {
    ListEntity BankAccount => "bank_accounts", order_by ["created_at"] {
        owner: Owner,
        bank_name: String,
        account_type: AccountType,
        iban: Option<String>,
        balance: f64,
        interest_rate: Option<f64>,
        notes: Option<String>,
    }
}

owned_entity! {
    ListEntity SecurityHolding => "securities", order_by ["created_at"] {
        owner: Owner,
        custodian_bank: String,
        investment_type: InvestmentType,
        description: String,
        quantity: Option<f64>,
        purchase_price: Option<f64>,
        current_value: f64,
        purchase_date: Option<String>,
        currency: String,
        notes: Option<String>,
    }
}

owned_entity! {
    ListEntity RealEstate => "real_estate", order_by ["created_at"] {
        owner: Owner,
        property_type: PropertyType,
        address: String,
        purchase_date: Option<String>,
        purchase_price: Option<f64>,
        current_value: f64,
        tax_value: Option<f64>,
        imputed_rental_value: Option<f64>,
        rental_income: Option<f64>,
        is_own_residence: bool,
        notes: Option<String>,
    }
}

owned_entity! {
    /// Vehicles, valuables, business stakes, loans receivable.
    ListEntity OtherAsset => "other_assets", order_by ["created_at"] {
        owner: Owner,
        asset_type: AssetType,
        description: String,
        purchase_date: Option<String>,
        purchase_price: Option<f64>,
        current_value: f64,
        notes: Option<String>,
    }
}

owned_entity! {
    ListEntity Liability => "liabilities", order_by ["created_at"] {
        owner: Owner,
        liability_type: LiabilityType,
        creditor: String,
        original_amount: f64,
        current_balance: f64,
        interest_rate: f64,
        monthly_payment: Option<f64>,
        start_date: Option<String>,
        end_date: Option<String>,
        /// Real estate row a mortgage is secured on.
        linked_asset_id: Option<String>,
        notes: Option<String>,
    }
}

owned_entity! {
    ListEntity IncomeDetail => "income_details", order_by ["created_at"] {
        owner: Owner,
        income_type: IncomeType,
        description: String,
        amount: f64,
        frequency: IncomeFrequency,
        is_taxable: bool,
        start_date: Option<String>,
        end_date: Option<String>,
        notes: Option<String>,
    }
}

impl IncomeDetail {
    /// Amount normalised to a yearly figure; one-time income counts once.
    pub fn yearly_amount(&self) -> f64 {
        match self.frequency {
            IncomeFrequency::Monthly => self.amount * 12.0,
            IncomeFrequency::Quarterly => self.amount * 4.0,
            IncomeFrequency::Yearly | IncomeFrequency::OneTime => self.amount,
        }
    }
}
