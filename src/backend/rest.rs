use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{check_columns, Backend, Filter, Record};
use crate::config::RemoteConfig;
use crate::error::{
    AppError, AppResult, NOT_FOUND_ROW, STORAGE_DECODE, STORAGE_HTTP_STATUS, STORAGE_TRANSPORT,
    VALIDATION_CONSTRAINT, VALIDATION_REQUIRED, VALIDATION_UNIQUE, VALIDATION_UNKNOWN_COLUMN,
};
use crate::mapper;
use crate::model::{Client as ClientRow, Entity};
use crate::time::iso_now;

const OBJECT_MEDIA_TYPE: &str = "application/vnd.pgrst.object+json";
const NO_ROWS_CODE: &str = "PGRST116";

/// Hosted relational backend speaking the PostgREST dialect. Row-level
/// access rules are enforced server-side.
#[derive(Clone)]
pub struct RestBackend {
    base_url: String,
    client: Client,
}

/// Error body returned by PostgREST.
#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

impl RestBackend {
    pub fn new(config: &RemoteConfig) -> AppResult<Self> {
        let header_value = |raw: &str| {
            header::HeaderValue::from_str(raw).map_err(|err| {
                AppError::new(STORAGE_TRANSPORT, "Invalid credential header value")
                    .with_context("error", err.to_string())
            })
        };
        let bearer = config.access_token.as_deref().unwrap_or(&config.api_key);

        let mut headers = header::HeaderMap::new();
        headers.insert("apikey", header_value(&config.api_key)?);
        headers.insert(header::AUTHORIZATION, header_value(&format!("Bearer {bearer}"))?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/rest/v1/{}", self.base_url, table))
    }

    fn filtered(&self, method: Method, table: &str, filter: Filter<'_>) -> RequestBuilder {
        let req = self.request(method, table);
        match filter.column() {
            Some((col, value)) => req.query(&[(col, format!("eq.{value}"))]),
            None => req,
        }
    }

    fn order_param<E: Entity>() -> String {
        E::ORDER_BY
            .iter()
            .map(|col| format!("{col}.asc"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Translate a non-success response into the error taxonomy.
async fn error_from_response(response: Response, table: &str, operation: &str) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let api: ApiError = serde_json::from_str(&body).unwrap_or_default();
    let message = api
        .message
        .clone()
        .unwrap_or_else(|| format!("Storage request failed with status {}", status.as_u16()));

    let code = match api.code.as_deref() {
        Some("23505") => VALIDATION_UNIQUE,
        Some("23502") => VALIDATION_REQUIRED,
        Some("23503") | Some("23514") | Some("22P02") => VALIDATION_CONSTRAINT,
        Some("PGRST204") => VALIDATION_UNKNOWN_COLUMN,
        _ if status == StatusCode::NOT_FOUND => NOT_FOUND_ROW,
        _ => STORAGE_HTTP_STATUS,
    };

    let mut err = AppError::new(code, message)
        .with_context("operation", operation)
        .with_context("table", table)
        .with_context("status", status.as_u16().to_string());
    if let Some(api_code) = api.code {
        err = err.with_context("api_code", api_code);
    }
    if let Some(details) = api.details {
        err = err.with_context("details", details);
    }
    err
}

/// True when a single-object read failed only because nothing matched.
fn is_no_rows(status: StatusCode, body: &str) -> bool {
    if status != StatusCode::NOT_ACCEPTABLE {
        return false;
    }
    let api: ApiError = serde_json::from_str(body).unwrap_or_default();
    api.code.as_deref() == Some(NO_ROWS_CODE)
        && api
            .details
            .as_deref()
            .map(|d| d.contains("0 rows"))
            .unwrap_or(false)
}

fn decode_row<E: Entity>(row: Value) -> AppResult<E> {
    let Value::Object(map) = row else {
        return Err(AppError::new(STORAGE_DECODE, "Expected a JSON object row")
            .with_context("table", E::TABLE));
    };
    serde_json::from_value(Value::Object(mapper::from_db(map))).map_err(|err| {
        AppError::new(STORAGE_DECODE, format!("Undecodable {} row", E::TABLE))
            .with_context("table", E::TABLE)
            .with_context("error", err.to_string())
    })
}

fn decode_rows<E: Entity>(rows: Value) -> AppResult<Vec<E>> {
    match rows {
        Value::Array(items) => items.into_iter().map(decode_row::<E>).collect(),
        other => Ok(vec![decode_row::<E>(other)?]),
    }
}

#[async_trait]
impl Backend for RestBackend {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn select<E: Entity>(&self, filter: Filter<'_>) -> AppResult<Vec<E>> {
        let response = self
            .filtered(Method::GET, E::TABLE, filter)
            .query(&[("select", "*".to_string()), ("order", Self::order_param::<E>())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response, E::TABLE, "select").await);
        }
        decode_rows::<E>(response.json::<Value>().await?)
    }

    async fn select_one<E: Entity>(&self, filter: Filter<'_>) -> AppResult<Option<E>> {
        let response = self
            .filtered(Method::GET, E::TABLE, filter)
            .query(&[
                ("select", "*".to_string()),
                ("order", Self::order_param::<E>()),
                ("limit", "1".to_string()),
            ])
            .header(header::ACCEPT, OBJECT_MEDIA_TYPE)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return decode_row::<E>(response.json::<Value>().await?).map(Some);
        }
        let body = response.text().await.unwrap_or_default();
        if is_no_rows(status, &body) {
            return Ok(None);
        }
        let api: ApiError = serde_json::from_str(&body).unwrap_or_default();
        Err(AppError::new(
            STORAGE_HTTP_STATUS,
            api.message
                .unwrap_or_else(|| format!("Storage request failed with status {}", status.as_u16())),
        )
        .with_context("operation", "select_one")
        .with_context("table", E::TABLE)
        .with_context("status", status.as_u16().to_string()))
    }

    async fn insert<E: Entity>(&self, record: Record) -> AppResult<E> {
        check_columns::<E>(&record)?;
        let response = self
            .request(Method::POST, E::TABLE)
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, OBJECT_MEDIA_TYPE)
            .json(&record)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response, E::TABLE, "insert").await);
        }
        decode_row::<E>(response.json::<Value>().await?)
    }

    async fn update<E: Entity>(&self, id: &str, record: Record) -> AppResult<()> {
        check_columns::<E>(&record)?;
        let mut body = record;
        body.insert("updated_at".into(), Value::String(iso_now()));
        let response = self
            .filtered(Method::PATCH, E::TABLE, Filter::Id(id))
            .header("Prefer", "return=representation")
            .query(&[("select", "id")])
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response, E::TABLE, "update")
                .await
                .with_context("id", id));
        }
        match response.json::<Value>().await? {
            Value::Array(rows) if rows.is_empty() => {
                Err(AppError::not_found(E::TABLE, id).with_context("table", E::TABLE))
            }
            _ => Ok(()),
        }
    }

    async fn delete<E: Entity>(&self, id: &str) -> AppResult<()> {
        let response = self
            .filtered(Method::DELETE, E::TABLE, Filter::Id(id))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response, E::TABLE, "delete")
                .await
                .with_context("id", id));
        }
        debug!(target: "finplan", event = "remote_delete", table = E::TABLE, id = %id);
        Ok(())
    }

    async fn delete_client(&self, client_id: &str) -> AppResult<()> {
        // owned rows go with the client through ON DELETE CASCADE on the server
        self.delete::<ClientRow>(client_id).await
    }
}
