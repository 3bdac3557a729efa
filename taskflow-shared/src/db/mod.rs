/// Database layer for TaskFlow
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: Embedded schema migrations
///
/// Queries live next to the models in the `models` module; services reach
/// them through [`PgStore`](crate::store::PgStore).

pub mod migrations;
pub mod pool;
