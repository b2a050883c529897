//! Seeds the well-known test user used by manual and scripted login checks.
//!
//! Any existing row with the same email is removed first, so the script can
//! be re-run to reset the password.

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::info;

use quotation_api::auth::{hash_password, SYSTEM_ACTOR_ID};
use quotation_api::config::{self, DEFAULT_COMPANY_CODE};
use quotation_api::db;
use quotation_api::entities::user;

const TEST_EMAIL: &str = "test@example.com";
const TEST_PASSWORD: &str = "Password@123";
const TEST_USER_NAME: &str = "Test User";
const TEST_MOBILE: &str = "1234567890";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::init_tracing("info", false);

    let database_url = config::database_url_from_env()?;
    let pool = db::establish_connection(&database_url).await?;
    db::run_migrations(&pool).await?;

    let removed = user::Entity::delete_many()
        .filter(user::Column::Email.eq(TEST_EMAIL))
        .exec(&pool)
        .await?;
    if removed.rows_affected > 0 {
        info!(rows = removed.rows_affected, "Removed existing test user");
    }

    let password = hash_password(TEST_PASSWORD)?;
    let created = user::ActiveModel {
        user_name: Set(TEST_USER_NAME.to_string()),
        email: Set(TEST_EMAIL.to_string()),
        mobile_number: Set(Some(TEST_MOBILE.to_string())),
        password: Set(password),
        is_active: Set(true),
        company_code: Set(DEFAULT_COMPANY_CODE.to_string()),
        created_by: Set(SYSTEM_ACTOR_ID),
        ..Default::default()
    }
    .insert(&pool)
    .await?;

    info!(user_id = created.id, email = TEST_EMAIL, "Test user seeded");
    println!("Seeded {} / {}", TEST_EMAIL, TEST_PASSWORD);
    Ok(())
}
