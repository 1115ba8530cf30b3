//! PostgreSQL-backed `AdminRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AdminRepository, AdminRepositoryError};
use crate::domain::{Admin, PasswordHash};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AdminRow, NewAdminRow};
use super::pool::{DbPool, PoolError};
use super::schema::admins;

/// Diesel-backed implementation of the admin repository port.
#[derive(Clone)]
pub struct DieselAdminRepository {
    pool: DbPool,
}

impl DieselAdminRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AdminRepositoryError {
    map_basic_pool_error(error, |message| AdminRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> AdminRepositoryError {
    map_basic_diesel_error(
        error,
        AdminRepositoryError::query,
        AdminRepositoryError::connection,
    )
}

fn row_to_admin(row: AdminRow) -> Admin {
    Admin::new(
        row.id,
        row.username,
        row.full_name,
        PasswordHash::new(row.password_hash),
    )
}

#[async_trait]
impl AdminRepository for DieselAdminRepository {
    async fn upsert(&self, admin: &Admin) -> Result<Admin, AdminRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAdminRow {
            id: admin.id(),
            username: admin.username(),
            full_name: admin.full_name(),
            password_hash: admin.password_hash().as_str(),
        };

        diesel::insert_into(admins::table)
            .values(&row)
            .on_conflict(admins::username)
            .do_update()
            .set((
                admins::full_name.eq(excluded(admins::full_name)),
                admins::password_hash.eq(excluded(admins::password_hash)),
            ))
            .returning(AdminRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(row_to_admin)
            .map_err(map_diesel_error)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Admin>, AdminRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        admins::table
            .filter(admins::username.eq(username.trim()))
            .select(AdminRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(row_to_admin))
            .map_err(map_diesel_error)
    }
}
