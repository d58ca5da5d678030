//! The application's migrations, in apply order
//!
//! Add new migrations to the end of [`migrations`]. Ids sort in apply order by
//! convention, but the position in the list is what counts.

use harbormaster::migration::{transactional, Migration, MigrationError, MigrationRegistry, SqlBatch};

/// Every migration, in apply order
pub fn migrations() -> Vec<Migration> {
    vec![initial_schema()]
}

/// The registry the CLI runs against
///
/// # Errors
///
/// Returns `MigrationError::DuplicateMigrationId` if two catalog entries share an id.
pub fn registry() -> Result<MigrationRegistry, MigrationError> {
    MigrationRegistry::new(migrations())
}

/// Users, customers, invoices and revenue tables
fn initial_schema() -> Migration {
    Migration::new(
        "001_initial_schema",
        "Create initial schema",
        transactional(SqlBatch::new([
            r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp""#,
            "CREATE TABLE IF NOT EXISTS users (
                id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS customers (
                id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL,
                image_url VARCHAR(255) NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS invoices (
                id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
                customer_id UUID NOT NULL REFERENCES customers(id),
                amount INT NOT NULL,
                status VARCHAR(255) NOT NULL,
                date DATE NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS revenue (
                month VARCHAR(4) NOT NULL UNIQUE,
                revenue INT NOT NULL
            )",
        ])),
        // invoices references customers, so it goes first
        transactional(SqlBatch::new([
            "DROP TABLE IF EXISTS invoices",
            "DROP TABLE IF EXISTS revenue",
            "DROP TABLE IF EXISTS customers",
            "DROP TABLE IF EXISTS users",
        ])),
    )
}
