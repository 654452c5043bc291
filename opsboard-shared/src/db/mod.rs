/// Database connectivity
///
/// - `pool`: PostgreSQL connection pool construction and health check

pub mod pool;
