//! Database entities, one module per table.

pub mod customer;
pub mod machinery_master;
pub mod machinery_subcategory;
pub mod material;
pub mod material_type;
pub mod material_type_link;
pub mod process_pricing;
pub mod quotation;
pub mod quotation_line;
pub mod user;
