// src/models/activity.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

pub const DEFAULT_ACTIVITY_LIMIT: i64 = 10;
pub const MAX_ACTIVITY_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "activity_entity", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityEntity {
    Client,
    Project,
    Invoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "activity_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Created,
    Updated,
    Deleted,
    StatusChanged,
    AddedResource,
    RemovedResource,
}

// Linha do log (só cresce, nunca é editada)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: Uuid,
    pub entity_type: ActivityEntity,
    pub entity_id: Uuid,
    pub action: ActivityAction,

    #[schema(example = json!({"title": "Site institucional"}))]
    pub data: Value,

    // E-mail do operador, quando conhecido
    pub user_id: Option<String>,

    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ActivityQuery {
    /// Quantidade de entradas (padrão 10, máximo 100)
    pub limit: Option<i64>,
}

impl ActivityQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
            .clamp(1, MAX_ACTIVITY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(ActivityQuery::default().effective_limit(), 10);
        assert_eq!(ActivityQuery { limit: Some(500) }.effective_limit(), 100);
        assert_eq!(ActivityQuery { limit: Some(0) }.effective_limit(), 1);
    }

    #[test]
    fn actions_serialize_snake_case() {
        let json = serde_json::to_value(ActivityAction::AddedResource).unwrap();
        assert_eq!(json, "added_resource");
    }
}
