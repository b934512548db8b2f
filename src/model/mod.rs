//! Record shapes for every planning entity.
//!
//! Field names are the storage columns; serde renames them to camelCase for
//! the view layer and the export document. Each entity carries its table,
//! column list and ordering as compile-time constants so storage access is
//! checked against the struct instead of against free-form strings.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;

pub trait Entity:
    Serialize + DeserializeOwned + for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Sync + Unpin + 'static
{
    const TABLE: &'static str;
    /// Every storage column, in declaration order.
    const COLUMNS: &'static [&'static str];
    /// Columns listed rows are sorted by (ascending).
    const ORDER_BY: &'static [&'static str];

    /// Payload for creating a row; storage assigns id and timestamps.
    type New: Serialize + Send + Sync;
    /// Partial update; `None` fields are left untouched.
    type Patch: Serialize + Default + Send + Sync;

    fn id(&self) -> &str;

    fn has_column(name: &str) -> bool {
        Self::COLUMNS.contains(&name)
    }
}

/// An entity exclusively owned by one client.
pub trait Owned: Entity {
    fn client_id(&self) -> &str;
}

/// Zero or more rows per client.
pub trait ListEntity: Owned {}

/// At most one row per client, created with defaults on first read.
pub trait SingleRecordEntity: Owned {}

macro_rules! owned_entity {
    (
        $(#[$meta:meta])*
        $kind:ident $name:ident => $table:literal, order_by [$($order:literal),+] {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        paste::paste! {
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
            #[cfg_attr(feature = "typescript", derive(ts_rs::TS), ts(export))]
            #[serde(rename_all = "camelCase")]
            pub struct $name {
                pub id: String,
                pub client_id: String,
                $( $(#[$fmeta])* pub $field: $ty, )*
                pub created_at: chrono::DateTime<chrono::Utc>,
                pub updated_at: chrono::DateTime<chrono::Utc>,
            }

            #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
            #[serde(rename_all = "camelCase")]
            pub struct [<New $name>] {
                pub client_id: String,
                $( $(#[$fmeta])* pub $field: $ty, )*
            }

            #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
            #[serde(rename_all = "camelCase")]
            pub struct [<$name Patch>] {
                $(
                    $(#[$fmeta])*
                    #[serde(default, skip_serializing_if = "Option::is_none")]
                    pub $field: Option<$ty>,
                )*
            }

            impl $crate::model::Entity for $name {
                const TABLE: &'static str = $table;
                const COLUMNS: &'static [&'static str] = &[
                    "id",
                    "client_id",
                    $( stringify!($field), )*
                    "created_at",
                    "updated_at",
                ];
                const ORDER_BY: &'static [&'static str] = &[$($order),+];

                type New = [<New $name>];
                type Patch = [<$name Patch>];

                fn id(&self) -> &str {
                    &self.id
                }
            }

            impl $crate::model::Owned for $name {
                fn client_id(&self) -> &str {
                    &self.client_id
                }
            }

            impl $crate::model::$kind for $name {}
        }
    };
}

/// Closed value set stored as TEXT and serialized as its literal.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $variant:ident => $lit:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[cfg_attr(feature = "typescript", derive(ts_rs::TS), ts(export))]
        pub enum $name {
            $( #[serde(rename = $lit)] $variant, )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $lit, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::AppError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                match raw {
                    $( $lit => Ok($name::$variant), )+
                    other => Err($crate::error::AppError::new(
                        $crate::error::VALIDATION_PAYLOAD,
                        format!("invalid {}: {other}", stringify!($name)),
                    )),
                }
            }
        }

        impl sqlx::Type<sqlx::Sqlite> for $name {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <&str as sqlx::Type<sqlx::Sqlite>>::type_info()
            }

            fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
                <&str as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&self.as_str(), buf)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for $name {
            fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let raw = <&str as sqlx::Decode<'r, sqlx::Sqlite>>::decode(value)?;
                raw.parse::<$name>().map_err(|err| err.to_string().into())
            }
        }
    };
}

pub(crate) use owned_entity;
pub(crate) use text_enum;

pub mod assets;
pub mod client;
pub mod pension;
pub mod planning;

pub use assets::*;
pub use client::*;
pub use pension::*;
pub use planning::*;

text_enum! {
    /// Which partner a record belongs to.
    Owner { Man => "man", Woman => "woman", Joint => "joint" }
}

text_enum! {
    /// Owner for records that cannot be held jointly.
    Person { Man => "man", Woman => "woman" }
}

/// Every table holding rows owned by a client.
pub const OWNED_TABLES: &[&str] = &[
    <Goal as Entity>::TABLE,
    <PlannedAction as Entity>::TABLE,
    <Housing as Entity>::TABLE,
    <PropertyInsurance as Entity>::TABLE,
    <HealthInsurance as Entity>::TABLE,
    <LegalSecurity as Entity>::TABLE,
    <TaxOptimization as Entity>::TABLE,
    <Investment as Entity>::TABLE,
    <Pension as Entity>::TABLE,
    <Budget as Entity>::TABLE,
    <ClientPreferences as Entity>::TABLE,
    <BankAccount as Entity>::TABLE,
    <SecurityHolding as Entity>::TABLE,
    <RealEstate as Entity>::TABLE,
    <OtherAsset as Entity>::TABLE,
    <Liability as Entity>::TABLE,
    <IncomeDetail as Entity>::TABLE,
    <Pillar1 as Entity>::TABLE,
    <Pillar2 as Entity>::TABLE,
    <Pillar3Account as Entity>::TABLE,
    <RiskProfile as Entity>::TABLE,
    <LifeInsurance as Entity>::TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_enum_parses_its_literals() {
        assert_eq!("joint".parse::<Owner>().unwrap(), Owner::Joint);
        assert_eq!(Owner::Man.to_string(), "man");
        let err = "both".parse::<Owner>().unwrap_err();
        assert_eq!(err.code(), crate::error::VALIDATION_PAYLOAD);
    }

    #[test]
    fn text_enum_serializes_as_literal() {
        let json = serde_json::to_string(&Person::Woman).unwrap();
        assert_eq!(json, "\"woman\"");
    }
}
