use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    Set, Unchanged,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use utoipa::ToSchema;

use super::{blank_as_none, deleted_or_not_found, soft_delete, Deleted};
use crate::db::{not_found_on_unchanged, DatabaseAccess};
use crate::entities::quotation::{self, QuotationStatus};
use crate::entities::quotation_line;
use crate::errors::ServiceError;

/// Quotation header and its lines, created together
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuotationInput {
    pub quotation_number: String,
    pub customer_id: Option<i32>,
    pub customer_name: Option<String>,
    pub our_drawing_ref: Option<String>,
    pub customer_drawing_ref: Option<String>,
    pub drawing_desc: Option<String>,
    pub contact_person: Option<String>,
    pub enquiry_number: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[schema(value_type = Option<String>, format = Date)]
    pub enquiry_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[schema(value_type = Option<String>, format = Date)]
    pub quotation_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[schema(value_type = Option<String>, format = Date)]
    pub valid_till: Option<NaiveDate>,
    pub currency: Option<String>,
    pub remark: Option<String>,
    #[serde(default)]
    pub lines: Vec<QuotationLineInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct QuotationLineInput {
    pub line_number: Option<i32>,
    pub drawing_description: Option<String>,
    pub drawing_number: Option<String>,
    pub material_grade: Option<String>,
    #[schema(value_type = Option<String>, example = "120.00")]
    pub unit_price: Option<Decimal>,
    pub no_of_units: Option<i32>,
    #[schema(value_type = Option<String>, example = "240.00")]
    pub total_price: Option<Decimal>,
}

impl QuotationLineInput {
    /// Explicit total, otherwise `unit_price * no_of_units` when both are known.
    ///
    /// A product outside the decimal range is rejected as a bad request.
    pub fn resolved_total(&self) -> Result<Option<Decimal>, ServiceError> {
        if self.total_price.is_some() {
            return Ok(self.total_price);
        }

        match self.unit_price.zip(self.no_of_units) {
            Some((price, units)) => price
                .checked_mul(Decimal::from(units))
                .map(Some)
                .ok_or_else(|| ServiceError::BadRequest("line total overflows".to_string())),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StatusInput {
    #[schema(example = "Approved")]
    pub status: String,
}

/// Header with its visible lines ordered by line number
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct QuotationDetail {
    #[serde(flatten)]
    pub quotation: quotation::Model,
    pub lines: Vec<quotation_line::Model>,
}

/// Service for quotations and their lines
#[derive(Clone)]
pub struct QuotationService {
    db: DatabaseAccess,
}

impl QuotationService {
    pub fn new(db: DatabaseAccess) -> Self {
        Self { db }
    }

    /// Inserts the header and every line in one transaction.
    ///
    /// Status always starts as `Draft` and revision as `0`. If any insert
    /// fails nothing is persisted.
    #[instrument(skip(self, input), fields(quotation_number = %input.quotation_number, lines = input.lines.len()))]
    pub async fn create_quotation(
        &self,
        input: QuotationInput,
        actor_id: i32,
    ) -> Result<QuotationDetail, ServiceError> {
        let detail = self
            .db
            .transaction(move |txn| Box::pin(insert_quotation(txn, input, actor_id)))
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to create quotation");
                e
            })?;

        info!(quotation_id = detail.quotation.id, "Quotation created");
        Ok(detail)
    }

    /// Lists visible quotation headers, newest first
    #[instrument(skip(self))]
    pub async fn list_quotations(&self) -> Result<Vec<quotation::Model>, ServiceError> {
        quotation::Entity::find()
            .filter(quotation::Column::DeletedAt.is_null())
            .order_by_desc(quotation::Column::CreatedAt)
            .order_by_desc(quotation::Column::Id)
            .all(self.db.conn())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Reads the header, then its lines. The two reads are not isolated.
    #[instrument(skip(self))]
    pub async fn get_quotation(&self, id: i32) -> Result<QuotationDetail, ServiceError> {
        let quotation = quotation::Entity::find_by_id(id)
            .filter(quotation::Column::DeletedAt.is_null())
            .one(self.db.conn())
            .await?
            .ok_or_else(|| ServiceError::NotFound("Quotation not found".to_string()))?;

        let lines = quotation_line::Entity::find()
            .filter(quotation_line::Column::QuotationId.eq(id))
            .filter(quotation_line::Column::DeletedAt.is_null())
            .order_by_asc(quotation_line::Column::LineNumber)
            .order_by_asc(quotation_line::Column::Id)
            .all(self.db.conn())
            .await?;

        Ok(QuotationDetail { quotation, lines })
    }

    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: i32,
        status: &str,
        actor_id: i32,
    ) -> Result<quotation::Model, ServiceError> {
        let status: QuotationStatus = status.parse().map_err(ServiceError::BadRequest)?;

        let model = quotation::ActiveModel {
            id: Unchanged(id),
            status: Set(status),
            updated_by: Set(Some(actor_id)),
            ..Default::default()
        };

        let updated = model
            .update(self.db.conn())
            .await
            .map_err(|e| not_found_on_unchanged(e, "Quotation"))?;

        info!(quotation_id = id, status = %status, "Quotation status updated");
        Ok(updated)
    }

    /// Soft deletes the header; lines stay attached to the hidden header.
    #[instrument(skip(self))]
    pub async fn delete_quotation(&self, id: i32, actor_id: i32) -> Result<Deleted, ServiceError> {
        let affected = soft_delete::<quotation::Entity, _>(
            self.db.conn(),
            quotation::Column::Id,
            quotation::Column::DeletedAt,
            quotation::Column::DeletedBy,
            id,
            actor_id,
        )
        .await?;

        deleted_or_not_found(affected, "Quotation deleted successfully", "Quotation")
    }
}

async fn insert_quotation(
    txn: &DatabaseTransaction,
    input: QuotationInput,
    actor_id: i32,
) -> Result<QuotationDetail, ServiceError> {
    let header = quotation::ActiveModel {
        quotation_number: Set(input.quotation_number),
        revision_number: Set(0),
        customer_id: Set(input.customer_id),
        customer_name: Set(input.customer_name),
        our_drawing_ref: Set(input.our_drawing_ref),
        customer_drawing_ref: Set(input.customer_drawing_ref),
        drawing_desc: Set(input.drawing_desc),
        contact_person: Set(input.contact_person),
        enquiry_number: Set(input.enquiry_number),
        enquiry_date: Set(input.enquiry_date),
        quotation_date: Set(input.quotation_date),
        valid_till: Set(input.valid_till),
        currency: Set(input.currency),
        status: Set(QuotationStatus::Draft),
        remark: Set(input.remark),
        created_by: Set(actor_id),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    let mut lines = Vec::with_capacity(input.lines.len());
    for (index, line) in input.lines.into_iter().enumerate() {
        let total_price = line.resolved_total()?;
        let line_number = match line.line_number {
            Some(number) => number,
            None => i32::try_from(index + 1)
                .map_err(|_| ServiceError::BadRequest("Too many quotation lines".to_string()))?,
        };

        let inserted = quotation_line::ActiveModel {
            quotation_id: Set(header.id),
            line_number: Set(Some(line_number)),
            drawing_description: Set(line.drawing_description),
            drawing_number: Set(line.drawing_number),
            material_grade: Set(line.material_grade),
            unit_price: Set(line.unit_price),
            no_of_units: Set(line.no_of_units),
            total_price: Set(total_price),
            created_by: Set(actor_id),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        lines.push(inserted);
    }

    Ok(QuotationDetail {
        quotation: header,
        lines,
    })
}
