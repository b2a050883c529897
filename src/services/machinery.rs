use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, Unchanged,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use utoipa::ToSchema;

use super::{deleted_or_not_found, soft_delete, Deleted};
use crate::db::{not_found_on_unchanged, DatabaseAccess};
use crate::entities::{machinery_master, machinery_subcategory, material, process_pricing};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MachineryCategoryInput {
    pub name: String,
    pub main_category_id: Option<i32>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubcategoryInput {
    pub category_id: Option<i32>,
    pub subcategory_name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessPricingInput {
    pub material_id: Option<i32>,
    /// Machinery subcategory the rate applies to
    pub process_id: Option<i32>,
    #[schema(value_type = Option<String>, example = "15.00")]
    pub minutes: Option<Decimal>,
    pub unit: Option<String>,
    #[schema(value_type = Option<String>, example = "250.00")]
    pub rate: Option<Decimal>,
    #[serde(default)]
    pub is_manual_rate: bool,
    pub note: Option<String>,
    pub remark: Option<String>,
}

/// Subcategory row with its category name
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, ToSchema)]
pub struct SubcategoryView {
    pub id: i32,
    pub category_id: Option<i32>,
    pub subcategory_name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: i32,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<i32>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<i32>,
    pub category_name: String,
}

/// Pricing row with material and process names
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, ToSchema)]
pub struct ProcessPricingView {
    pub id: i32,
    pub material_id: Option<i32>,
    pub process_id: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub minutes: Option<Decimal>,
    pub unit: Option<String>,
    #[schema(value_type = Option<String>)]
    pub rate: Option<Decimal>,
    pub is_manual_rate: bool,
    pub note: Option<String>,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: i32,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<i32>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<i32>,
    pub material_name: String,
    pub process_name: String,
}

/// Service for machinery categories, subcategories and process pricing
#[derive(Clone)]
pub struct MachineryService {
    db: DatabaseAccess,
}

impl MachineryService {
    pub fn new(db: DatabaseAccess) -> Self {
        Self { db }
    }

    // Categories

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_category(
        &self,
        input: MachineryCategoryInput,
        actor_id: i32,
    ) -> Result<machinery_master::Model, ServiceError> {
        let model = machinery_master::ActiveModel {
            name: Set(input.name),
            main_category_id: Set(input.main_category_id),
            description: Set(input.description),
            created_by: Set(actor_id),
            ..Default::default()
        };

        let created = model.insert(self.db.conn()).await.map_err(|e| {
            error!(error = %e, "Failed to create machinery category");
            ServiceError::DatabaseError(e)
        })?;

        info!(category_id = created.id, "Machinery category created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<machinery_master::Model>, ServiceError> {
        machinery_master::Entity::find()
            .filter(machinery_master::Column::DeletedAt.is_null())
            .order_by_desc(machinery_master::Column::CreatedAt)
            .order_by_desc(machinery_master::Column::Id)
            .all(self.db.conn())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: i32) -> Result<machinery_master::Model, ServiceError> {
        machinery_master::Entity::find_by_id(id)
            .filter(machinery_master::Column::DeletedAt.is_null())
            .one(self.db.conn())
            .await?
            .ok_or_else(|| ServiceError::NotFound("Machinery category not found".to_string()))
    }

    #[instrument(skip(self, input))]
    pub async fn update_category(
        &self,
        id: i32,
        input: MachineryCategoryInput,
        actor_id: i32,
    ) -> Result<machinery_master::Model, ServiceError> {
        let model = machinery_master::ActiveModel {
            id: Unchanged(id),
            name: Set(input.name),
            main_category_id: Set(input.main_category_id),
            description: Set(input.description),
            updated_by: Set(Some(actor_id)),
            ..Default::default()
        };

        model
            .update(self.db.conn())
            .await
            .map_err(|e| not_found_on_unchanged(e, "Machinery category"))
    }

    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i32, actor_id: i32) -> Result<Deleted, ServiceError> {
        let affected = soft_delete::<machinery_master::Entity, _>(
            self.db.conn(),
            machinery_master::Column::Id,
            machinery_master::Column::DeletedAt,
            machinery_master::Column::DeletedBy,
            id,
            actor_id,
        )
        .await?;

        deleted_or_not_found(
            affected,
            "Machinery category deleted successfully",
            "Machinery category",
        )
    }

    // Subcategories

    #[instrument(skip(self, input), fields(subcategory_name = %input.subcategory_name))]
    pub async fn create_subcategory(
        &self,
        input: SubcategoryInput,
        actor_id: i32,
    ) -> Result<machinery_subcategory::Model, ServiceError> {
        let model = machinery_subcategory::ActiveModel {
            category_id: Set(input.category_id),
            subcategory_name: Set(input.subcategory_name),
            description: Set(input.description),
            created_by: Set(actor_id),
            ..Default::default()
        };

        let created = model.insert(self.db.conn()).await.map_err(|e| {
            error!(error = %e, "Failed to create machinery subcategory");
            ServiceError::DatabaseError(e)
        })?;

        info!(subcategory_id = created.id, "Machinery subcategory created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list_subcategories(&self) -> Result<Vec<SubcategoryView>, ServiceError> {
        machinery_subcategory::Entity::find()
            .column_as(machinery_master::Column::Name, "category_name")
            .join(
                JoinType::InnerJoin,
                machinery_subcategory::Relation::Category.def(),
            )
            .filter(machinery_subcategory::Column::DeletedAt.is_null())
            .order_by_desc(machinery_subcategory::Column::CreatedAt)
            .order_by_desc(machinery_subcategory::Column::Id)
            .into_model::<SubcategoryView>()
            .all(self.db.conn())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, input))]
    pub async fn update_subcategory(
        &self,
        id: i32,
        input: SubcategoryInput,
        actor_id: i32,
    ) -> Result<machinery_subcategory::Model, ServiceError> {
        let model = machinery_subcategory::ActiveModel {
            id: Unchanged(id),
            category_id: Set(input.category_id),
            subcategory_name: Set(input.subcategory_name),
            description: Set(input.description),
            updated_by: Set(Some(actor_id)),
            ..Default::default()
        };

        model
            .update(self.db.conn())
            .await
            .map_err(|e| not_found_on_unchanged(e, "Subcategory"))
    }

    #[instrument(skip(self))]
    pub async fn delete_subcategory(
        &self,
        id: i32,
        actor_id: i32,
    ) -> Result<Deleted, ServiceError> {
        let affected = soft_delete::<machinery_subcategory::Entity, _>(
            self.db.conn(),
            machinery_subcategory::Column::Id,
            machinery_subcategory::Column::DeletedAt,
            machinery_subcategory::Column::DeletedBy,
            id,
            actor_id,
        )
        .await?;

        deleted_or_not_found(affected, "Subcategory deleted successfully", "Subcategory")
    }

    // Process pricing

    #[instrument(skip(self, input))]
    pub async fn create_pricing(
        &self,
        input: ProcessPricingInput,
        actor_id: i32,
    ) -> Result<process_pricing::Model, ServiceError> {
        let model = process_pricing::ActiveModel {
            material_id: Set(input.material_id),
            process_id: Set(input.process_id),
            minutes: Set(input.minutes),
            unit: Set(input.unit),
            rate: Set(input.rate),
            is_manual_rate: Set(input.is_manual_rate),
            note: Set(input.note),
            remark: Set(input.remark),
            created_by: Set(actor_id),
            ..Default::default()
        };

        let created = model.insert(self.db.conn()).await.map_err(|e| {
            error!(error = %e, "Failed to create process pricing");
            ServiceError::DatabaseError(e)
        })?;

        info!(pricing_id = created.id, "Process pricing created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list_pricing(&self) -> Result<Vec<ProcessPricingView>, ServiceError> {
        process_pricing::Entity::find()
            .column_as(material::Column::MaterialName, "material_name")
            .column_as(machinery_subcategory::Column::SubcategoryName, "process_name")
            .join(JoinType::InnerJoin, process_pricing::Relation::Material.def())
            .join(JoinType::InnerJoin, process_pricing::Relation::Process.def())
            .filter(process_pricing::Column::DeletedAt.is_null())
            .order_by_desc(process_pricing::Column::CreatedAt)
            .order_by_desc(process_pricing::Column::Id)
            .into_model::<ProcessPricingView>()
            .all(self.db.conn())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, input))]
    pub async fn update_pricing(
        &self,
        id: i32,
        input: ProcessPricingInput,
        actor_id: i32,
    ) -> Result<process_pricing::Model, ServiceError> {
        let model = process_pricing::ActiveModel {
            id: Unchanged(id),
            material_id: Set(input.material_id),
            process_id: Set(input.process_id),
            minutes: Set(input.minutes),
            unit: Set(input.unit),
            rate: Set(input.rate),
            is_manual_rate: Set(input.is_manual_rate),
            note: Set(input.note),
            remark: Set(input.remark),
            updated_by: Set(Some(actor_id)),
            ..Default::default()
        };

        model
            .update(self.db.conn())
            .await
            .map_err(|e| not_found_on_unchanged(e, "Pricing"))
    }

    #[instrument(skip(self))]
    pub async fn delete_pricing(&self, id: i32, actor_id: i32) -> Result<Deleted, ServiceError> {
        let affected = soft_delete::<process_pricing::Entity, _>(
            self.db.conn(),
            process_pricing::Column::Id,
            process_pricing::Column::DeletedAt,
            process_pricing::Column::DeletedBy,
            id,
            actor_id,
        )
        .await?;

        deleted_or_not_found(affected, "Pricing deleted successfully", "Pricing")
    }
}
