use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, Unchanged,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use super::{default_true, deleted_or_not_found, soft_delete, Deleted};
use crate::db::{not_found_on_unchanged, DatabaseAccess};
use crate::entities::customer;
use crate::errors::ServiceError;

/// Customer fields accepted on create and full update
///
/// Only the column widths are checked here, since SQLite does not enforce
/// `VARCHAR(n)`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CustomerInput {
    #[validate(length(max = 255, message = "customer_name exceeds 255 characters"))]
    pub customer_name: String,
    #[validate(length(max = 6, message = "customer_abbr exceeds 6 characters"))]
    pub customer_abbr: String,
    pub contact_person: Option<String>,
    pub contact_person_designation: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TermsInput {
    pub terms: Option<String>,
}

/// Customer row plus the `customer_id` alias the front end searches on
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CustomerView {
    pub customer_id: i32,
    #[serde(flatten)]
    pub customer: customer::Model,
}

impl From<customer::Model> for CustomerView {
    fn from(customer: customer::Model) -> Self {
        Self {
            customer_id: customer.id,
            customer,
        }
    }
}

/// Element that could not be inserted during a bulk create
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BulkCreateFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_abbr: Option<String>,
    pub error: String,
}

impl BulkCreateFailure {
    /// Echoes the identifying fields of the submitted element, if present
    fn for_element(element: &Value, error: String) -> Self {
        let field = |name: &str| element.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            customer_name: field("customer_name"),
            customer_abbr: field("customer_abbr"),
            error,
        }
    }
}

/// Per-element result of a bulk create, in request order
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum BulkCreateOutcome {
    Created(CustomerView),
    Failed(BulkCreateFailure),
}

impl BulkCreateOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, BulkCreateOutcome::Created(_))
    }
}

/// Service for managing customers
#[derive(Clone)]
pub struct CustomerService {
    db: DatabaseAccess,
}

impl CustomerService {
    pub fn new(db: DatabaseAccess) -> Self {
        Self { db }
    }

    /// Inserts one customer
    #[instrument(skip(self, input), fields(customer_abbr = %input.customer_abbr))]
    pub async fn create_customer(
        &self,
        input: CustomerInput,
        actor_id: i32,
    ) -> Result<customer::Model, ServiceError> {
        input.validate()?;

        let model = customer::ActiveModel {
            customer_name: Set(input.customer_name),
            customer_abbr: Set(input.customer_abbr),
            contact_person: Set(input.contact_person),
            contact_person_designation: Set(input.contact_person_designation),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            is_active: Set(input.is_active),
            created_by: Set(actor_id),
            ..Default::default()
        };

        let created = model.insert(self.db.conn()).await.map_err(|e| {
            error!(error = %e, "Failed to create customer");
            ServiceError::DatabaseError(e)
        })?;

        info!(customer_id = created.id, "Customer created");
        Ok(created)
    }

    /// Inserts each element independently; failures do not undo earlier inserts.
    ///
    /// Elements arrive as raw JSON so that a malformed one fails on its own
    /// instead of rejecting the whole batch.
    #[instrument(skip(self, elements), fields(count = elements.len()))]
    pub async fn bulk_create(
        &self,
        elements: Vec<Value>,
        actor_id: i32,
    ) -> Vec<BulkCreateOutcome> {
        let mut outcomes = Vec::with_capacity(elements.len());

        for (index, element) in elements.into_iter().enumerate() {
            let result = match serde_json::from_value::<CustomerInput>(element.clone()) {
                Ok(input) => self.create_customer(input, actor_id).await,
                Err(e) => Err(ServiceError::BadRequest(e.to_string())),
            };

            let outcome = match result {
                Ok(created) => BulkCreateOutcome::Created(created.into()),
                Err(e) => {
                    warn!(index, error = %e, "Bulk customer element rejected");
                    BulkCreateOutcome::Failed(BulkCreateFailure::for_element(
                        &element,
                        e.response_message(),
                    ))
                }
            };
            outcomes.push(outcome);
        }

        let created = outcomes.iter().filter(|o| o.is_created()).count();
        info!(created, failed = outcomes.len() - created, "Bulk customer create finished");
        outcomes
    }

    /// Lists visible customers, newest first
    #[instrument(skip(self))]
    pub async fn list_customers(&self) -> Result<Vec<customer::Model>, ServiceError> {
        customer::Entity::find()
            .filter(customer::Column::DeletedAt.is_null())
            .order_by_desc(customer::Column::CreatedAt)
            .order_by_desc(customer::Column::Id)
            .all(self.db.conn())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn get_customer(&self, id: i32) -> Result<customer::Model, ServiceError> {
        customer::Entity::find_by_id(id)
            .filter(customer::Column::DeletedAt.is_null())
            .one(self.db.conn())
            .await?
            .ok_or_else(|| {
                info!(customer_id = id, "Customer not found");
                ServiceError::NotFound("Customer not found".to_string())
            })
    }

    /// Replaces every mutable column; omitted optional fields become null.
    #[instrument(skip(self, input))]
    pub async fn update_customer(
        &self,
        id: i32,
        input: CustomerInput,
        actor_id: i32,
    ) -> Result<customer::Model, ServiceError> {
        input.validate()?;

        let model = customer::ActiveModel {
            id: Unchanged(id),
            customer_name: Set(input.customer_name),
            customer_abbr: Set(input.customer_abbr),
            contact_person: Set(input.contact_person),
            contact_person_designation: Set(input.contact_person_designation),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            is_active: Set(input.is_active),
            updated_by: Set(Some(actor_id)),
            ..Default::default()
        };

        let updated = model
            .update(self.db.conn())
            .await
            .map_err(|e| not_found_on_unchanged(e, "Customer"))?;

        info!(customer_id = id, "Customer updated");
        Ok(updated)
    }

    /// Enables or disables a customer
    #[instrument(skip(self))]
    pub async fn set_active(
        &self,
        id: i32,
        is_active: bool,
        actor_id: i32,
    ) -> Result<customer::Model, ServiceError> {
        let model = customer::ActiveModel {
            id: Unchanged(id),
            is_active: Set(is_active),
            updated_by: Set(Some(actor_id)),
            ..Default::default()
        };

        model
            .update(self.db.conn())
            .await
            .map_err(|e| not_found_on_unchanged(e, "Customer"))
    }

    #[instrument(skip(self, terms))]
    pub async fn save_terms(
        &self,
        id: i32,
        terms: Option<String>,
        actor_id: i32,
    ) -> Result<customer::Model, ServiceError> {
        let model = customer::ActiveModel {
            id: Unchanged(id),
            terms: Set(terms),
            updated_by: Set(Some(actor_id)),
            ..Default::default()
        };

        model
            .update(self.db.conn())
            .await
            .map_err(|e| not_found_on_unchanged(e, "Customer"))
    }

    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: i32, actor_id: i32) -> Result<Deleted, ServiceError> {
        let affected = soft_delete::<customer::Entity, _>(
            self.db.conn(),
            customer::Column::Id,
            customer::Column::DeletedAt,
            customer::Column::DeletedBy,
            id,
            actor_id,
        )
        .await?;

        deleted_or_not_found(affected, "Customer deleted successfully", "Customer")
    }
}
