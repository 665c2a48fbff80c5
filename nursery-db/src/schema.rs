//! SurrealDB schema definitions for the catalog

/// Catalog schema for SurrealDB.
///
/// Tables stay schemaless: shape is enforced by the validator at the API
/// boundary. Definitions are idempotent so `init_schema` can run on every start.
pub const NURSERY_SCHEMA: &str = r#"
-- ============================================
-- Plants
-- ============================================
DEFINE TABLE IF NOT EXISTS plants SCHEMALESS;
DEFINE INDEX IF NOT EXISTS idx_plants_created_at ON TABLE plants FIELDS createdAt;
DEFINE INDEX IF NOT EXISTS idx_plants_featured ON TABLE plants FIELDS featured;
DEFINE INDEX IF NOT EXISTS idx_plants_categories ON TABLE plants FIELDS categories;

-- ============================================
-- Categories
-- ============================================
DEFINE TABLE IF NOT EXISTS categories SCHEMALESS;
DEFINE INDEX IF NOT EXISTS idx_categories_name_key ON TABLE categories FIELDS nameKey UNIQUE;
DEFINE INDEX IF NOT EXISTS idx_categories_name ON TABLE categories FIELDS name;
"#;
