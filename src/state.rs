use crate::db::{DbPool, OrmConn};

/// Shared handles passed to every request handler. Both connections are
/// created once in `main` and closed after graceful shutdown; no global
/// pool exists anywhere in the process.
#[derive(Clone)]
pub struct AppState {
    /// sqlx pool: raw-SQL reads (order history join), audit writes.
    pub pool: DbPool,
    /// SeaORM connection: entity CRUD and the checkout transaction.
    pub orm: OrmConn,
}

impl AppState {
    pub fn new(pool: DbPool, orm: OrmConn) -> Self {
        Self { pool, orm }
    }
}
