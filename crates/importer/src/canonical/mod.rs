pub mod loader;
pub mod models;
pub mod validator;

/// Fixture format understood by this importer
pub const FORMAT_VERSION: &str = "1.0.0";
