use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{text_enum, Entity};

text_enum! {
    MaritalStatus {
        Single => "single",
        Married => "married",
        RegisteredPartnership => "registered_partnership",
        Divorced => "divorced",
        Widowed => "widowed",
    }
}

/// The planning subject (a person or a couple). Owns every other record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub advisor_id: Option<String>,

    pub first_name: String,
    pub last_name: String,
    pub partner_first_name: Option<String>,
    pub partner_last_name: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub birth_date: Option<String>,
    pub partner_birth_date: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,

    pub occupation_man: Option<String>,
    pub occupation_woman: Option<String>,
    pub employer_man: Option<String>,
    pub employer_woman: Option<String>,
    /// Percent of full time.
    pub employment_rate_man: Option<f64>,
    pub employment_rate_woman: Option<f64>,

    pub marital_status: Option<MaritalStatus>,
    pub has_children: Option<bool>,
    pub number_of_children: Option<i32>,
    pub children_ages: Option<String>,

    // optimisation goals
    pub avoid_double_insurance: bool,
    pub close_coverage_gaps: bool,
    pub save_taxes: bool,
    pub increase_returns: bool,
    pub secure_partner: bool,

    // planning goals
    pub financial_security: bool,
    pub wealth_building: bool,
    pub retirement_planning: bool,
    pub saving_for_children: bool,
    pub home_ownership: bool,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn display_name(&self) -> String {
        match (&self.partner_first_name, &self.partner_last_name) {
            (Some(first), Some(last)) if last != &self.last_name => format!(
                "{} {} & {} {}",
                self.first_name, self.last_name, first, last
            ),
            (Some(first), _) => format!("{} & {} {}", self.first_name, first, self.last_name),
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub partner_first_name: Option<String>,
    pub partner_last_name: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub birth_date: Option<String>,
    pub partner_birth_date: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub occupation_man: Option<String>,
    pub occupation_woman: Option<String>,
    pub employer_man: Option<String>,
    pub employer_woman: Option<String>,
    pub employment_rate_man: Option<f64>,
    pub employment_rate_woman: Option<f64>,
    pub marital_status: Option<MaritalStatus>,
    pub has_children: Option<bool>,
    pub number_of_children: Option<i32>,
    pub children_ages: Option<String>,
    pub avoid_double_insurance: bool,
    pub close_coverage_gaps: bool,
    pub save_taxes: bool,
    pub increase_returns: bool,
    pub secure_partner: bool,
    pub financial_security: bool,
    pub wealth_building: bool,
    pub retirement_planning: bool,
    pub saving_for_children: bool,
    pub home_ownership: bool,
    pub notes: Option<String>,
}

impl NewClient {
    pub fn named(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_first_name: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_last_name: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_birth_date: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation_man: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation_woman: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_man: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_woman: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_rate_man: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_rate_woman: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<Option<MaritalStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_children: Option<Option<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_children: Option<Option<i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_ages: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avoid_double_insurance: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_coverage_gaps: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_taxes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub increase_returns: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_partner: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_security: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wealth_building: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retirement_planning: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saving_for_children: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_ownership: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl Entity for Client {
    const TABLE: &'static str = "clients";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "advisor_id",
        "first_name",
        "last_name",
        "partner_first_name",
        "partner_last_name",
        "postal_code",
        "city",
        "birth_date",
        "partner_birth_date",
        "phone",
        "email",
        "occupation_man",
        "occupation_woman",
        "employer_man",
        "employer_woman",
        "employment_rate_man",
        "employment_rate_woman",
        "marital_status",
        "has_children",
        "number_of_children",
        "children_ages",
        "avoid_double_insurance",
        "close_coverage_gaps",
        "save_taxes",
        "increase_returns",
        "secure_partner",
        "financial_security",
        "wealth_building",
        "retirement_planning",
        "saving_for_children",
        "home_ownership",
        "notes",
        "created_at",
        "updated_at",
    ];
    const ORDER_BY: &'static [&'static str] = &["last_name", "first_name"];

    type New = NewClient;
    type Patch = ClientPatch;

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper;
    use serde_json::Value;

    #[test]
    fn new_client_maps_onto_known_columns() {
        let Value::Object(map) = serde_json::to_value(NewClient::named("Anna", "Muster")).unwrap()
        else {
            unreachable!()
        };
        for key in mapper::to_db(map).keys() {
            assert!(Client::has_column(key), "unexpected column {key}");
        }
    }

    #[test]
    fn patch_only_serializes_set_fields() {
        let patch = ClientPatch {
            city: Some(None),
            save_taxes: Some(true),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({"city": null, "saveTaxes": true}));
    }
}
