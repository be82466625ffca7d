use super::{PokemonStore, StorageError};
use crate::metrics::Metrics;
use crate::model::{Pokemon, PokemonUpdate};
use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;
use tracing::{debug, error};

/// Attribute holding the primary key. Kept as the table's partition key
/// name, so condition expressions can reference it directly.
const KEY_ATTR: &str = "id";

/// DynamoDB storage backend.
///
/// Assumes the table already exists with a numeric partition key named
/// `id`. Every operation is a single request to DynamoDB except
/// `list_all`, which scans the whole table. Timeouts and retries are
/// whatever the SDK client defaults to; nothing is added here.
pub struct DynamoStorage {
    client: Client,
    table: String,
}

impl DynamoStorage {
    /// Connect using the ambient AWS credential/region chain, optionally
    /// pinning a region.
    pub async fn new(table: String, region: Option<String>) -> Self {
        let config = match region {
            Some(region) => {
                aws_config::from_env()
                    .region(Region::new(region))
                    .load()
                    .await
            }
            None => aws_config::load_from_env().await,
        };

        Self {
            client: Client::new(&config),
            table,
        }
    }

    fn key(id: u32) -> AttributeValue {
        AttributeValue::N(id.to_string())
    }
}

/// Convert a record into a DynamoDB attribute map.
fn to_item(pokemon: &Pokemon) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (KEY_ATTR.to_string(), AttributeValue::N(pokemon.id.to_string())),
        ("name".to_string(), AttributeValue::S(pokemon.name.clone())),
        (
            "category".to_string(),
            AttributeValue::S(pokemon.category.clone()),
        ),
    ])
}

/// Parse a stored attribute map back into a record.
fn from_item(item: &HashMap<String, AttributeValue>) -> Result<Pokemon, StorageError> {
    let id = item
        .get(KEY_ATTR)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse::<u32>().ok())
        .ok_or_else(|| StorageError::Serialization("missing or non-numeric id".to_string()))?;

    let name = string_attr(item, "name")?;
    let category = string_attr(item, "category")?;

    Ok(Pokemon { id, name, category })
}

fn string_attr(
    item: &HashMap<String, AttributeValue>,
    attr: &str,
) -> Result<String, StorageError> {
    item.get(attr)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| StorageError::Serialization(format!("missing string attribute: {attr}")))
}

/// Build a `SET` update expression covering only the fields present in
/// `update`, with placeholder names and values (`name` is a DynamoDB
/// reserved word, so placeholders are mandatory anyway).
fn update_expression(
    update: &PokemonUpdate,
) -> (
    String,
    HashMap<String, String>,
    HashMap<String, AttributeValue>,
) {
    let mut clauses = Vec::new();
    let mut names = HashMap::new();
    let mut values = HashMap::new();

    let fields = [
        ("name", update.name.as_ref()),
        ("category", update.category.as_ref()),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            clauses.push(format!("#{field} = :{field}"));
            names.insert(format!("#{field}"), field.to_string());
            values.insert(format!(":{field}"), AttributeValue::S(value.clone()));
        }
    }

    (format!("SET {}", clauses.join(", ")), names, values)
}

#[async_trait]
impl PokemonStore for DynamoStorage {
    async fn create(&self, pokemon: Pokemon) -> Result<Pokemon, StorageError> {
        Metrics::get().record_storage_operation("create");

        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(to_item(&pokemon)))
            .send()
            .await
            .map_err(|e| {
                error!(id = pokemon.id, "dynamodb put error: {e}");
                Metrics::get().record_storage_error("create");
                StorageError::OperationFailed(format!("dynamodb put error: {e}"))
            })?;

        Ok(pokemon)
    }

    async fn get(&self, id: u32) -> Result<Option<Pokemon>, StorageError> {
        Metrics::get().record_storage_operation("get");

        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key(KEY_ATTR, Self::key(id))
            .send()
            .await
            .map_err(|e| {
                error!(id, "dynamodb get error: {e}");
                Metrics::get().record_storage_error("get");
                StorageError::OperationFailed(format!("dynamodb get error: {e}"))
            })?;

        output.item.as_ref().map(from_item).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Pokemon>, StorageError> {
        Metrics::get().record_storage_operation("list_all");

        let mut records = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| {
                    error!("dynamodb scan error: {e}");
                    Metrics::get().record_storage_error("list_all");
                    StorageError::OperationFailed(format!("dynamodb scan error: {e}"))
                })?;

            if let Some(items) = &output.items {
                for item in items {
                    records.push(from_item(item)?);
                }
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(records)
    }

    async fn update(
        &self,
        id: u32,
        update: PokemonUpdate,
    ) -> Result<Option<Pokemon>, StorageError> {
        Metrics::get().record_storage_operation("update");

        // Nothing to write; report the current state instead of issuing a
        // no-op mutation.
        if update.is_empty() {
            return self.get(id).await;
        }

        let (expression, names, values) = update_expression(&update);

        let result = self
            .client
            .update_item()
            .table_name(&self.table)
            .key(KEY_ATTR, Self::key(id))
            .update_expression(expression)
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .condition_expression(format!("attribute_exists({KEY_ATTR})"))
            .return_values(ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(output) => output.attributes.as_ref().map(from_item).transpose(),
            Err(e) => {
                // A failed existence precondition is "not found", every
                // other SDK error is a genuine fault and must stay
                // distinguishable from it.
                if e.as_service_error()
                    .map(UpdateItemError::is_conditional_check_failed_exception)
                    .unwrap_or(false)
                {
                    debug!(id, "update target does not exist");
                    Ok(None)
                } else {
                    error!(id, "dynamodb update error: {e}");
                    Metrics::get().record_storage_error("update");
                    Err(StorageError::OperationFailed(format!(
                        "dynamodb update error: {e}"
                    )))
                }
            }
        }
    }

    async fn delete(&self, id: u32) -> Result<bool, StorageError> {
        Metrics::get().record_storage_operation("delete");

        let result = self
            .client
            .delete_item()
            .table_name(&self.table)
            .key(KEY_ATTR, Self::key(id))
            .condition_expression(format!("attribute_exists({KEY_ATTR})"))
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                if e.as_service_error()
                    .map(DeleteItemError::is_conditional_check_failed_exception)
                    .unwrap_or(false)
                {
                    debug!(id, "delete target does not exist");
                    Ok(false)
                } else {
                    error!(id, "dynamodb delete error: {e}");
                    Metrics::get().record_storage_error("delete");
                    Err(StorageError::OperationFailed(format!(
                        "dynamodb delete error: {e}"
                    )))
                }
            }
        }
    }
}
