use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Quotation API",
        version = "0.1.0",
        description = r#"
# Quotation API

Back end for manufacturing quotations.

## Features

- **Customers**: registration, bulk creation, enable/disable, commercial terms
- **Materials**: materials, material types and their priced links
- **Machinery**: machinery categories, subcategories and process pricing
- **Quotations**: multi-line quotations created atomically, status workflow

## Authentication

Obtain a token from `POST /api/auth/login` and send it as:

```
Authorization: Bearer <your-jwt-token>
```

The token is optional; when present it identifies the acting user recorded
in the audit columns. An invalid or expired token is rejected with 401.

## Error Handling

Every failure uses the same envelope:

```json
{
  "success": false,
  "error": "Not Found",
  "message": "Customer not found",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

Deletes are soft: deleted rows disappear from every read but stay in the
database.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8081", description = "Local development")
    ),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Customers", description = "Customer registration endpoints"),
        (name = "Materials", description = "Material master endpoints"),
        (name = "Machinery", description = "Machinery master and process pricing endpoints"),
        (name = "Quotations", description = "Quotation endpoints")
    ),
    paths(
        // Auth
        crate::handlers::auth::register,
        crate::handlers::auth::login,

        // Customers
        crate::handlers::customers::create_customers,
        crate::handlers::customers::list_customers,
        crate::handlers::customers::get_customer,
        crate::handlers::customers::update_customer,
        crate::handlers::customers::disable_customer,
        crate::handlers::customers::enable_customer,
        crate::handlers::customers::save_terms,
        crate::handlers::customers::delete_customer,

        // Materials
        crate::handlers::materials::create_material_type,
        crate::handlers::materials::list_material_types,
        crate::handlers::materials::update_material_type,
        crate::handlers::materials::delete_material_type,
        crate::handlers::materials::create_link,
        crate::handlers::materials::list_links,
        crate::handlers::materials::update_link,
        crate::handlers::materials::delete_link,
        crate::handlers::materials::create_material,
        crate::handlers::materials::list_materials,
        crate::handlers::materials::get_material,
        crate::handlers::materials::update_material,
        crate::handlers::materials::delete_material,

        // Machinery
        crate::handlers::machinery::create_category,
        crate::handlers::machinery::list_categories,
        crate::handlers::machinery::get_category,
        crate::handlers::machinery::update_category,
        crate::handlers::machinery::delete_category,
        crate::handlers::machinery::create_subcategory,
        crate::handlers::machinery::list_subcategories,
        crate::handlers::machinery::update_subcategory,
        crate::handlers::machinery::delete_subcategory,
        crate::handlers::machinery::create_pricing,
        crate::handlers::machinery::list_pricing,
        crate::handlers::machinery::update_pricing,
        crate::handlers::machinery::delete_pricing,

        // Quotations
        crate::handlers::quotations::create_quotation,
        crate::handlers::quotations::list_quotations,
        crate::handlers::quotations::get_quotation,
        crate::handlers::quotations::update_status,
        crate::handlers::quotations::delete_quotation,
    ),
    components(
        schemas(
            // Auth types
            crate::services::users::RegisterRequest,
            crate::services::users::LoginRequest,
            crate::handlers::auth::RegisterResponse,
            crate::handlers::auth::LoginResponse,

            // Customer types
            crate::services::customers::CustomerInput,
            crate::services::customers::TermsInput,
            crate::services::customers::CustomerView,
            crate::services::customers::BulkCreateOutcome,

            // Material types
            crate::services::materials::MaterialInput,
            crate::services::materials::MaterialTypeInput,
            crate::services::materials::MaterialLinkInput,
            crate::services::materials::MaterialLinkView,

            // Machinery types
            crate::services::machinery::MachineryCategoryInput,
            crate::services::machinery::SubcategoryInput,
            crate::services::machinery::ProcessPricingInput,
            crate::services::machinery::SubcategoryView,
            crate::services::machinery::ProcessPricingView,

            // Quotation types
            crate::services::quotations::QuotationInput,
            crate::services::quotations::QuotationLineInput,
            crate::services::quotations::StatusInput,
            crate::services::quotations::QuotationDetail,
            crate::entities::quotation::QuotationStatus,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_mounted_resource() {
        let json = serde_json::to_string_pretty(&ApiDocV1::openapi()).unwrap();
        assert!(json.contains("Quotation API"));
        assert!(json.contains("/api/auth/login"));
        assert!(json.contains("/customer_registration/getcustomerbyId/{id}"));
        assert!(json.contains("/materials/link/getAll"));
        assert!(json.contains("/machinery-master/pricing/{id}"));
        assert!(json.contains("/quotations/{id}/status"));
    }
}
