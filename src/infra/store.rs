//! Ownership-record store adapter: DynamoDB through the `aws` CLI.
//!
//! The table uses a composite key: `UserId` (partition) plus `InstanceId`
//! (sort), so one owner maps to many instances and deletes are idempotent
//! per (owner, instance) pair.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use super::aws::{run_aws, run_aws_void};
use crate::application::ports::{CommandRunner, OwnershipStore};
use crate::domain::OwnershipRecord;

pub struct DynamoCliStore<R: CommandRunner> {
    runner: R,
    region: String,
    table: String,
}

impl<R: CommandRunner> DynamoCliStore<R> {
    pub fn new(runner: R, region: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            runner,
            region: region.into(),
            table: table.into(),
        }
    }
}

// ── Attribute-value encoding ──────────────────────────────────────────────────

fn encode_item(record: &OwnershipRecord) -> Value {
    let mut item = json!({
        "UserId": { "S": record.owner_id },
        "InstanceId": { "S": record.instance_id },
        "CreatedAt": { "S": record.created_at.to_rfc3339() },
        "Region": { "S": record.region },
        "InstanceType": { "S": record.instance_type },
        "State": { "S": record.state },
    });
    if let Some(contact) = &record.contact {
        item["Contact"] = json!({ "S": contact });
    }
    item
}

fn encode_key(owner_id: &str, instance_id: &str) -> Value {
    json!({
        "UserId": { "S": owner_id },
        "InstanceId": { "S": instance_id },
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct QueryResponse {
    #[serde(default)]
    items: Vec<Item>,
}

type Item = BTreeMap<String, Attribute>;

#[derive(Debug, Deserialize)]
struct Attribute {
    #[serde(rename = "S", default)]
    s: Option<String>,
}

fn decode_item(item: &Item) -> Option<OwnershipRecord> {
    let get = |key: &str| item.get(key).and_then(|attr| attr.s.clone());
    Some(OwnershipRecord {
        owner_id: get("UserId")?,
        instance_id: get("InstanceId")?,
        // Absent or unparsable on legacy rows; the orchestrators only need
        // the key fields.
        created_at: get("CreatedAt")
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map_or(DateTime::<Utc>::UNIX_EPOCH, |d| d.with_timezone(&Utc)),
        region: get("Region").unwrap_or_default(),
        instance_type: get("InstanceType").unwrap_or_default(),
        state: get("State").unwrap_or_else(|| "pending".to_owned()),
        contact: get("Contact"),
    })
}

// ── Port implementation ───────────────────────────────────────────────────────

#[async_trait]
impl<R: CommandRunner> OwnershipStore for DynamoCliStore<R> {
    async fn put(&self, record: &OwnershipRecord) -> Result<()> {
        let item = encode_item(record).to_string();
        run_aws_void(
            &self.runner,
            &[
                "dynamodb",
                "put-item",
                "--table-name",
                &self.table,
                "--item",
                &item,
                "--region",
                &self.region,
                "--output",
                "json",
            ],
        )
        .await
        .context("dynamodb put-item")
    }

    async fn delete(&self, owner_id: &str, instance_id: &str) -> Result<()> {
        let key = encode_key(owner_id, instance_id).to_string();
        run_aws_void(
            &self.runner,
            &[
                "dynamodb",
                "delete-item",
                "--table-name",
                &self.table,
                "--key",
                &key,
                "--region",
                &self.region,
                "--output",
                "json",
            ],
        )
        .await
        .context("dynamodb delete-item")
    }

    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<OwnershipRecord>> {
        let values = json!({ ":owner": { "S": owner_id } }).to_string();
        let response: QueryResponse = run_aws(
            &self.runner,
            &[
                "dynamodb",
                "query",
                "--table-name",
                &self.table,
                "--key-condition-expression",
                "UserId = :owner",
                "--expression-attribute-values",
                &values,
                "--region",
                &self.region,
                "--output",
                "json",
            ],
        )
        .await
        .context("dynamodb query")?;
        Ok(response.items.iter().filter_map(decode_item).collect())
    }
}
