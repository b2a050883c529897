//! Entity services. Each service owns the statements for one entity group
//! and reports failures as [`ServiceError`].

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use serde::{Deserialize, Deserializer};

use crate::auth::AuthService;
use crate::db::DatabaseAccess;
use crate::errors::ServiceError;

pub mod customers;
pub mod machinery;
pub mod materials;
pub mod quotations;
pub mod users;

use customers::CustomerService;
use machinery::MachineryService;
use materials::MaterialService;
use quotations::QuotationService;
use users::UserService;

/// Service container holding all service instances
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<UserService>,
    pub customers: Arc<CustomerService>,
    pub materials: Arc<MaterialService>,
    pub machinery: Arc<MachineryService>,
    pub quotations: Arc<QuotationService>,
}

impl AppServices {
    /// Creates every service over the same database capability
    pub fn new(
        db: DatabaseAccess,
        auth: Arc<AuthService>,
        default_company_code: impl Into<String>,
    ) -> Self {
        Self {
            users: Arc::new(UserService::new(
                db.clone(),
                auth,
                default_company_code.into(),
            )),
            customers: Arc::new(CustomerService::new(db.clone())),
            materials: Arc::new(MaterialService::new(db.clone())),
            machinery: Arc::new(MachineryService::new(db.clone())),
            quotations: Arc::new(QuotationService::new(db)),
        }
    }
}

/// Message returned by delete endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deleted(pub &'static str);

/// Marks the row with `id` deleted unless it already is.
///
/// Returns `false` when no visible row matched.
pub(crate) async fn soft_delete<E, C>(
    conn: &C,
    id_column: E::Column,
    deleted_at: E::Column,
    deleted_by: E::Column,
    id: i32,
    actor_id: i32,
) -> Result<bool, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let result = E::update_many()
        .col_expr(deleted_at, Expr::value(Utc::now()))
        .col_expr(deleted_by, Expr::value(actor_id))
        .filter(id_column.eq(id))
        .filter(deleted_at.is_null())
        .exec(conn)
        .await?;

    Ok(result.rows_affected > 0)
}

/// Deleting an already deleted or missing row is a not-found
pub(crate) fn deleted_or_not_found(
    affected: bool,
    message: &'static str,
    what: &str,
) -> Result<Deleted, ServiceError> {
    if affected {
        Ok(Deleted(message))
    } else {
        Err(ServiceError::NotFound(format!("{} not found", what)))
    }
}

/// Treats a missing, null or blank string as `None`, otherwise parses it.
pub(crate) fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[derive(Debug, Deserialize)]
    struct Dates {
        #[serde(default, deserialize_with = "blank_as_none")]
        day: Option<NaiveDate>,
    }

    #[test]
    fn blank_dates_become_none() {
        let parsed: Dates = serde_json::from_str(r#"{"day": ""}"#).unwrap();
        assert_eq!(parsed.day, None);

        let parsed: Dates = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(parsed.day, None);

        let parsed: Dates = serde_json::from_str(r#"{"day": null}"#).unwrap();
        assert_eq!(parsed.day, None);

        let parsed: Dates = serde_json::from_str(r#"{"day": "2024-03-01"}"#).unwrap();
        assert_eq!(parsed.day, NaiveDate::from_ymd_opt(2024, 3, 1));

        assert!(serde_json::from_str::<Dates>(r#"{"day": "March"}"#).is_err());
    }

    #[test]
    fn missing_rows_are_not_found_on_delete() {
        assert_eq!(
            deleted_or_not_found(true, "Material deleted successfully", "Material").unwrap(),
            Deleted("Material deleted successfully")
        );
        let err = deleted_or_not_found(false, "Material deleted successfully", "Material")
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(m) if m == "Material not found"));
    }
}
