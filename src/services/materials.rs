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
use crate::entities::{material, material_type, material_type_link};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MaterialInput {
    pub material_name: String,
    pub material_grade: Option<String>,
    pub density: Option<String>,
    pub unit: Option<String>,
    #[schema(value_type = Option<String>, example = "12.50")]
    pub current_price: Option<Decimal>,
    pub description: Option<String>,
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MaterialTypeInput {
    pub type_name: String,
    pub description: Option<String>,
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MaterialLinkInput {
    pub material_id: Option<i32>,
    pub material_type_id: Option<i32>,
    #[schema(value_type = Option<String>, example = "14.00")]
    pub current_price: Option<Decimal>,
    pub remark: Option<String>,
}

/// Link joined with its material and type names
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, ToSchema)]
pub struct MaterialLinkView {
    pub id: i32,
    pub material_id: Option<i32>,
    pub material_type_id: Option<i32>,
    pub material_name: String,
    pub type_name: String,
    pub unit: Option<String>,
    #[schema(value_type = Option<String>)]
    pub current_price: Option<Decimal>,
    pub remark: Option<String>,
}

/// Service for materials, material types and their links
#[derive(Clone)]
pub struct MaterialService {
    db: DatabaseAccess,
}

impl MaterialService {
    pub fn new(db: DatabaseAccess) -> Self {
        Self { db }
    }

    // Materials

    #[instrument(skip(self, input), fields(material_name = %input.material_name))]
    pub async fn create_material(
        &self,
        input: MaterialInput,
        actor_id: i32,
    ) -> Result<material::Model, ServiceError> {
        let model = material::ActiveModel {
            material_name: Set(input.material_name),
            material_grade: Set(input.material_grade),
            density: Set(input.density),
            unit: Set(input.unit),
            current_price: Set(input.current_price),
            description: Set(input.description),
            remark: Set(input.remark),
            created_by: Set(actor_id),
            ..Default::default()
        };

        let created = model.insert(self.db.conn()).await.map_err(|e| {
            error!(error = %e, "Failed to create material");
            ServiceError::DatabaseError(e)
        })?;

        info!(material_id = created.id, "Material created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list_materials(&self) -> Result<Vec<material::Model>, ServiceError> {
        material::Entity::find()
            .filter(material::Column::DeletedAt.is_null())
            .order_by_desc(material::Column::CreatedAt)
            .order_by_desc(material::Column::Id)
            .all(self.db.conn())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn get_material(&self, id: i32) -> Result<material::Model, ServiceError> {
        material::Entity::find_by_id(id)
            .filter(material::Column::DeletedAt.is_null())
            .one(self.db.conn())
            .await?
            .ok_or_else(|| ServiceError::NotFound("Material not found".to_string()))
    }

    /// Replaces every mutable column; omitted optional fields become null.
    #[instrument(skip(self, input))]
    pub async fn update_material(
        &self,
        id: i32,
        input: MaterialInput,
        actor_id: i32,
    ) -> Result<material::Model, ServiceError> {
        let model = material::ActiveModel {
            id: Unchanged(id),
            material_name: Set(input.material_name),
            material_grade: Set(input.material_grade),
            density: Set(input.density),
            unit: Set(input.unit),
            current_price: Set(input.current_price),
            description: Set(input.description),
            remark: Set(input.remark),
            updated_by: Set(Some(actor_id)),
            ..Default::default()
        };

        let updated = model
            .update(self.db.conn())
            .await
            .map_err(|e| not_found_on_unchanged(e, "Material"))?;

        info!(material_id = id, "Material updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_material(&self, id: i32, actor_id: i32) -> Result<Deleted, ServiceError> {
        let affected = soft_delete::<material::Entity, _>(
            self.db.conn(),
            material::Column::Id,
            material::Column::DeletedAt,
            material::Column::DeletedBy,
            id,
            actor_id,
        )
        .await?;

        deleted_or_not_found(affected, "Material deleted successfully", "Material")
    }

    // Material types

    #[instrument(skip(self, input), fields(type_name = %input.type_name))]
    pub async fn create_material_type(
        &self,
        input: MaterialTypeInput,
        actor_id: i32,
    ) -> Result<material_type::Model, ServiceError> {
        let model = material_type::ActiveModel {
            type_name: Set(input.type_name),
            description: Set(input.description),
            remark: Set(input.remark),
            created_by: Set(actor_id),
            ..Default::default()
        };

        let created = model.insert(self.db.conn()).await.map_err(|e| {
            error!(error = %e, "Failed to create material type");
            ServiceError::DatabaseError(e)
        })?;

        info!(material_type_id = created.id, "Material type created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list_material_types(&self) -> Result<Vec<material_type::Model>, ServiceError> {
        material_type::Entity::find()
            .filter(material_type::Column::DeletedAt.is_null())
            .order_by_desc(material_type::Column::CreatedAt)
            .order_by_desc(material_type::Column::Id)
            .all(self.db.conn())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, input))]
    pub async fn update_material_type(
        &self,
        id: i32,
        input: MaterialTypeInput,
        actor_id: i32,
    ) -> Result<material_type::Model, ServiceError> {
        let model = material_type::ActiveModel {
            id: Unchanged(id),
            type_name: Set(input.type_name),
            description: Set(input.description),
            remark: Set(input.remark),
            updated_by: Set(Some(actor_id)),
            ..Default::default()
        };

        model
            .update(self.db.conn())
            .await
            .map_err(|e| not_found_on_unchanged(e, "Material type"))
    }

    #[instrument(skip(self))]
    pub async fn delete_material_type(
        &self,
        id: i32,
        actor_id: i32,
    ) -> Result<Deleted, ServiceError> {
        let affected = soft_delete::<material_type::Entity, _>(
            self.db.conn(),
            material_type::Column::Id,
            material_type::Column::DeletedAt,
            material_type::Column::DeletedBy,
            id,
            actor_id,
        )
        .await?;

        deleted_or_not_found(affected, "Material Type deleted successfully", "Material type")
    }

    // Links

    #[instrument(skip(self, input))]
    pub async fn create_link(
        &self,
        input: MaterialLinkInput,
        actor_id: i32,
    ) -> Result<material_type_link::Model, ServiceError> {
        let model = material_type_link::ActiveModel {
            material_id: Set(input.material_id),
            material_type_id: Set(input.material_type_id),
            current_price: Set(input.current_price),
            remark: Set(input.remark),
            created_by: Set(actor_id),
            ..Default::default()
        };

        let created = model.insert(self.db.conn()).await.map_err(|e| {
            error!(error = %e, "Failed to link material type");
            ServiceError::DatabaseError(e)
        })?;

        info!(link_id = created.id, "Material type linked");
        Ok(created)
    }

    /// Visible links joined with material and type names, newest first
    #[instrument(skip(self))]
    pub async fn list_links(&self) -> Result<Vec<MaterialLinkView>, ServiceError> {
        material_type_link::Entity::find()
            .select_only()
            .column(material_type_link::Column::Id)
            .column(material_type_link::Column::MaterialId)
            .column(material_type_link::Column::MaterialTypeId)
            .column_as(material::Column::MaterialName, "material_name")
            .column_as(material_type::Column::TypeName, "type_name")
            .column_as(material::Column::Unit, "unit")
            .column(material_type_link::Column::CurrentPrice)
            .column(material_type_link::Column::Remark)
            .join(
                JoinType::InnerJoin,
                material_type_link::Relation::Material.def(),
            )
            .join(
                JoinType::InnerJoin,
                material_type_link::Relation::MaterialType.def(),
            )
            .filter(material_type_link::Column::DeletedAt.is_null())
            .order_by_desc(material_type_link::Column::CreatedAt)
            .order_by_desc(material_type_link::Column::Id)
            .into_model::<MaterialLinkView>()
            .all(self.db.conn())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, input))]
    pub async fn update_link(
        &self,
        id: i32,
        input: MaterialLinkInput,
        actor_id: i32,
    ) -> Result<material_type_link::Model, ServiceError> {
        let model = material_type_link::ActiveModel {
            id: Unchanged(id),
            material_id: Set(input.material_id),
            material_type_id: Set(input.material_type_id),
            current_price: Set(input.current_price),
            remark: Set(input.remark),
            updated_by: Set(Some(actor_id)),
            ..Default::default()
        };

        model
            .update(self.db.conn())
            .await
            .map_err(|e| not_found_on_unchanged(e, "Link"))
    }

    #[instrument(skip(self))]
    pub async fn delete_link(&self, id: i32, actor_id: i32) -> Result<Deleted, ServiceError> {
        let affected = soft_delete::<material_type_link::Entity, _>(
            self.db.conn(),
            material_type_link::Column::Id,
            material_type_link::Column::DeletedAt,
            material_type_link::Column::DeletedBy,
            id,
            actor_id,
        )
        .await?;

        deleted_or_not_found(affected, "Link deleted successfully", "Link")
    }
}
