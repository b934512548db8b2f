//! Generic repositories over any [`Backend`]: one implementation per kind of
//! entity, instantiated per entity type.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::backend::{Backend, Filter, Record};
use crate::error::{AppError, AppResult, VALIDATION_PAYLOAD};
use crate::mapper;
use crate::model::{
    Client, ClientPatch, Entity, ListEntity, NewClient, Owned, SingleRecordEntity,
};

/// Serialize a camelCase payload into a storage record. Storage manages
/// `id` and both timestamps, so those keys never reach a write.
pub(crate) fn to_record<T: Serialize>(value: &T) -> AppResult<Record> {
    match serde_json::to_value(value)? {
        Value::Object(map) => {
            let mut record = mapper::to_db(map);
            record.remove("created_at");
            record.remove("updated_at");
            Ok(record)
        }
        other => Err(AppError::new(
            VALIDATION_PAYLOAD,
            "Write payload must be a JSON object",
        )
        .with_context("kind", json_kind(&other))),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn logged(err: AppError, operation: &str, table: &str, key: &str) -> AppError {
    warn!(
        target: "finplan",
        event = "repository_error",
        operation,
        table,
        key,
        code = %err.code(),
        error = %err
    );
    err.with_context("operation", operation.to_string())
}

pub struct ListRepository<E, B> {
    backend: Arc<B>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, B> Clone for ListRepository<E, B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            _entity: PhantomData,
        }
    }
}

impl<E: ListEntity, B: Backend> ListRepository<E, B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            _entity: PhantomData,
        }
    }

    /// Every row for the client, in the entity's list order.
    pub async fn get_by_client_id(&self, client_id: &str) -> AppResult<Vec<E>> {
        self.backend
            .select::<E>(Filter::ClientId(client_id))
            .await
            .map_err(|err| logged(err, "list", E::TABLE, client_id))
    }

    pub async fn get(&self, id: &str) -> AppResult<Option<E>> {
        self.backend
            .select_one::<E>(Filter::Id(id))
            .await
            .map_err(|err| logged(err, "get", E::TABLE, id))
    }

    /// Returns the id storage assigned.
    pub async fn create(&self, item: &E::New) -> AppResult<String> {
        let record = to_record(item)?;
        let row = self
            .backend
            .insert::<E>(record)
            .await
            .map_err(|err| logged(err, "create", E::TABLE, ""))?;
        debug!(
            target: "finplan",
            event = "list_row_created",
            table = E::TABLE,
            client_id = %row.client_id(),
            id = %row.id()
        );
        Ok(row.id().to_string())
    }

    pub async fn update(&self, id: &str, patch: &E::Patch) -> AppResult<()> {
        let record = to_record(patch)?;
        self.backend
            .update::<E>(id, record)
            .await
            .map_err(|err| logged(err, "update", E::TABLE, id))
    }

    /// Deleting an id that no longer exists succeeds.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.backend
            .delete::<E>(id)
            .await
            .map_err(|err| logged(err, "delete", E::TABLE, id))
    }
}

pub struct SingleRecordRepository<E, B> {
    backend: Arc<B>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, B> Clone for SingleRecordRepository<E, B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            _entity: PhantomData,
        }
    }
}

impl<E: SingleRecordEntity, B: Backend> SingleRecordRepository<E, B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            _entity: PhantomData,
        }
    }

    /// The client's row, never created.
    pub async fn find(&self, client_id: &str) -> AppResult<Option<E>> {
        self.backend
            .select_one::<E>(Filter::ClientId(client_id))
            .await
            .map_err(|err| logged(err, "find", E::TABLE, client_id))
    }

    /// The client's row, inserting one with storage defaults when absent.
    ///
    /// `UNIQUE(client_id)` makes a concurrent first read lose its insert; the
    /// loser re-reads the winner's row.
    pub async fn get_by_client_id(&self, client_id: &str) -> AppResult<E> {
        if let Some(row) = self.find(client_id).await? {
            return Ok(row);
        }

        let mut record = Record::new();
        record.insert("client_id".into(), Value::String(client_id.to_string()));
        match self.backend.insert::<E>(record).await {
            Ok(row) => {
                info!(
                    target: "finplan",
                    event = "single_record_autocreate",
                    table = E::TABLE,
                    client_id = %row.client_id(),
                    id = %row.id()
                );
                Ok(row)
            }
            Err(err) if err.is_unique_violation() => {
                info!(
                    target: "finplan",
                    event = "single_record_autocreate_conflict",
                    table = E::TABLE,
                    client_id = %client_id
                );
                self.find(client_id)
                    .await?
                    .ok_or_else(|| logged(err, "get_or_create", E::TABLE, client_id))
            }
            Err(err) => Err(logged(err, "get_or_create", E::TABLE, client_id)),
        }
    }

    /// Update the client's row, or insert one carrying `patch` if none exists.
    pub async fn upsert(&self, client_id: &str, patch: &E::Patch) -> AppResult<()> {
        let mut record = to_record(patch)?;
        record.remove("client_id");

        if let Some(existing) = self.find(client_id).await? {
            return self.update_row(existing.id(), record, client_id).await;
        }

        let mut insert = record.clone();
        insert.insert("client_id".into(), Value::String(client_id.to_string()));
        match self.backend.insert::<E>(insert).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_unique_violation() => {
                info!(
                    target: "finplan",
                    event = "single_record_upsert_conflict",
                    table = E::TABLE,
                    client_id = %client_id
                );
                match self.find(client_id).await? {
                    Some(existing) => self.update_row(existing.id(), record, client_id).await,
                    None => Err(logged(err, "upsert", E::TABLE, client_id)),
                }
            }
            Err(err) => Err(logged(err, "upsert", E::TABLE, client_id)),
        }
    }

    async fn update_row(&self, id: &str, record: Record, client_id: &str) -> AppResult<()> {
        self.backend
            .update::<E>(id, record)
            .await
            .map_err(|err| logged(err, "upsert", E::TABLE, client_id))
    }
}

pub struct ClientRepository<B> {
    backend: Arc<B>,
}

impl<B> Clone for ClientRepository<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: Backend> ClientRepository<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// All clients visible to the caller, by last then first name.
    pub async fn list_all(&self) -> AppResult<Vec<Client>> {
        self.backend
            .select::<Client>(Filter::All)
            .await
            .map_err(|err| logged(err, "list", Client::TABLE, ""))
    }

    pub async fn get(&self, id: &str) -> AppResult<Option<Client>> {
        self.backend
            .select_one::<Client>(Filter::Id(id))
            .await
            .map_err(|err| logged(err, "get", Client::TABLE, id))
    }

    pub async fn create(&self, client: &NewClient, advisor_id: Option<&str>) -> AppResult<String> {
        let mut record = to_record(client)?;
        if let Some(advisor_id) = advisor_id {
            record.insert("advisor_id".into(), Value::String(advisor_id.to_string()));
        }
        let row = self
            .backend
            .insert::<Client>(record)
            .await
            .map_err(|err| logged(err, "create", Client::TABLE, ""))?;
        info!(target: "finplan", event = "client_created", id = %row.id);
        Ok(row.id)
    }

    /// Applies `patch`; `updated_at` is refreshed even for an empty patch.
    pub async fn update(&self, id: &str, patch: &ClientPatch) -> AppResult<()> {
        let record = to_record(patch)?;
        self.backend
            .update::<Client>(id, record)
            .await
            .map_err(|err| logged(err, "update", Client::TABLE, id))
    }

    /// Removes the client and everything it owns.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.backend
            .delete_client(id)
            .await
            .map_err(|err| logged(err, "delete", Client::TABLE, id))?;
        info!(target: "finplan", event = "client_deleted", id = %id, backend = self.backend.name());
        Ok(())
    }
}
