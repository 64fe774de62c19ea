use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Utc};
use registrar_core::{StoreError, UserRecord, UserStore, WriteMode};
use std::collections::HashMap;

use crate::config::ServerConfig;

const USER_ID: &str = "UserId";
const NAME: &str = "Name";
const EMAIL: &str = "Email";
const CREATED_AT: &str = "CreatedAt";

/// Loads the shared AWS configuration for the configured region.
pub async fn load_aws_config(config: &ServerConfig) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await
}

/// Logs which principal the process runs as. Failure is not fatal.
pub async fn log_caller_identity(shared_config: &SdkConfig) {
    let sts = aws_sdk_sts::Client::new(shared_config);
    match sts.get_caller_identity().send().await {
        Ok(identity) => {
            tracing::info!("Lambda is running as: {}", identity.arn().unwrap_or("<unknown>"));
        }
        Err(e) => {
            tracing::warn!(
                "Failed to get caller identity: {}",
                aws_sdk_sts::error::DisplayErrorContext(&e)
            );
        }
    }
}

/// Users stored one item per user in a DynamoDB table keyed by `UserId`.
#[derive(Clone)]
pub struct DynamoUserStore {
    client: Client,
    table_name: String,
}

impl DynamoUserStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn from_config(shared_config: &SdkConfig, config: &ServerConfig) -> Self {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(shared_config);
        if let Some(endpoint) = &config.dynamodb_endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        Self::new(Client::from_conf(builder.build()), &config.table_name)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl UserStore for DynamoUserStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(USER_ID, AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(DisplayErrorContext(&e).to_string()))?;

        output.item().map(user_from_item).transpose()
    }

    async fn put_user(&self, user: &UserRecord, mode: WriteMode) -> Result<(), StoreError> {
        let mut request = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(user_to_item(user)));
        if mode == WriteMode::IfAbsent {
            request = request.condition_expression(format!("attribute_not_exists({USER_ID})"));
        }

        request.send().await.map_err(|e| match e.as_service_error() {
            Some(PutItemError::ConditionalCheckFailedException(_)) => {
                StoreError::AlreadyExists(user.user_id.clone())
            }
            _ => StoreError::Unavailable(DisplayErrorContext(&e).to_string()),
        })?;

        Ok(())
    }
}

// Absent optional fields are stored as empty strings so every item carries
// the same four attributes.
fn user_to_item(user: &UserRecord) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (USER_ID.to_string(), AttributeValue::S(user.user_id.clone())),
        (
            NAME.to_string(),
            AttributeValue::S(user.name.clone().unwrap_or_default()),
        ),
        (
            EMAIL.to_string(),
            AttributeValue::S(user.email.clone().unwrap_or_default()),
        ),
        (CREATED_AT.to_string(), AttributeValue::S(user.created_at_rfc3339())),
    ])
}

fn user_from_item(item: &HashMap<String, AttributeValue>) -> Result<UserRecord, StoreError> {
    let user_id = string_attr(item, USER_ID)?
        .ok_or_else(|| StoreError::Malformed(format!("missing {USER_ID}")))?;
    let created_at = string_attr(item, CREATED_AT)?
        .ok_or_else(|| StoreError::Malformed(format!("missing {CREATED_AT}")))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| StoreError::Malformed(format!("{CREATED_AT} {created_at:?}: {e}")))?
        .with_timezone(&Utc);

    Ok(UserRecord {
        user_id,
        name: string_attr(item, NAME)?.filter(|s| !s.is_empty()),
        email: string_attr(item, EMAIL)?.filter(|s| !s.is_empty()),
        created_at,
    })
}

fn string_attr(
    item: &HashMap<String, AttributeValue>,
    name: &str,
) -> Result<Option<String>, StoreError> {
    match item.get(name) {
        None => Ok(None),
        Some(AttributeValue::S(value)) => Ok(Some(value.clone())),
        Some(_) => Err(StoreError::Malformed(format!("{name} is not a string"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use registrar_core::NewUser;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_item_layout() {
        let user = NewUser::new("u1")
            .with_name("Ann")
            .with_email("a@x.com")
            .into_record(created_at());
        let item = user_to_item(&user);

        assert_eq!(item.len(), 4);
        assert_eq!(item[USER_ID], AttributeValue::S("u1".into()));
        assert_eq!(item[NAME], AttributeValue::S("Ann".into()));
        assert_eq!(item[EMAIL], AttributeValue::S("a@x.com".into()));
        assert_eq!(item[CREATED_AT], AttributeValue::S("2024-05-01T12:30:00Z".into()));

        assert_eq!(user_from_item(&item).unwrap(), user);
    }

    #[test]
    fn test_absent_optionals_are_written_empty_and_read_back_absent() {
        let user = NewUser::new("u1").into_record(created_at());
        let item = user_to_item(&user);

        assert_eq!(item[NAME], AttributeValue::S(String::new()));
        assert_eq!(item[EMAIL], AttributeValue::S(String::new()));

        let decoded = user_from_item(&item).unwrap();
        assert_eq!(decoded.name, None);
        assert_eq!(decoded.email, None);
    }

    #[test]
    fn test_items_written_elsewhere_decode_leniently() {
        // Older items may lack the optional attributes entirely.
        let item = HashMap::from([
            (USER_ID.to_string(), AttributeValue::S("u1".into())),
            (CREATED_AT.to_string(), AttributeValue::S("2024-05-01T14:30:00+02:00".into())),
        ]);

        let decoded = user_from_item(&item).unwrap();
        assert_eq!(decoded.user_id, "u1");
        assert_eq!(decoded.created_at, created_at());
    }

    #[test]
    fn test_malformed_items() {
        let missing_created_at = HashMap::from([(USER_ID.to_string(), AttributeValue::S("u1".into()))]);
        assert!(matches!(
            user_from_item(&missing_created_at),
            Err(StoreError::Malformed(_))
        ));

        let bad_timestamp = HashMap::from([
            (USER_ID.to_string(), AttributeValue::S("u1".into())),
            (CREATED_AT.to_string(), AttributeValue::S("yesterday".into())),
        ]);
        assert!(matches!(user_from_item(&bad_timestamp), Err(StoreError::Malformed(_))));

        let numeric_id = HashMap::from([
            (USER_ID.to_string(), AttributeValue::N("7".into())),
            (CREATED_AT.to_string(), AttributeValue::S("2024-05-01T12:30:00Z".into())),
        ]);
        assert!(matches!(user_from_item(&numeric_id), Err(StoreError::Malformed(_))));
    }
}
