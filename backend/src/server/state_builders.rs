//! Builders wiring repositories and credential adapters into HTTP state.

use std::io;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use idtrack::domain::ports::{AdminRepository, ApplicationRepository, OfficerRepository};
use idtrack::domain::{AdminLoginService, ApplicationService, OfficerDirectoryService, seed_admin};
use idtrack::inbound::http::state::HttpState;
use idtrack::outbound::memory::InMemoryStore;
use idtrack::outbound::persistence::{
    DieselAdminRepository, DieselApplicationRepository, DieselOfficerRepository,
};
use idtrack::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Driven repositories backing the domain services.
struct Repositories<O, A, P> {
    officers: Arc<O>,
    admins: Arc<A>,
    applications: Arc<P>,
}

/// Assemble services over the configured store and seed the admin account.
///
/// Uses Diesel repositories when a pool is configured, otherwise a single
/// [`InMemoryStore`] backs every repository.
///
/// # Errors
/// Returns [`io::Error`] when admin seeding fails.
pub(super) async fn build_http_state(config: &ServerConfig) -> io::Result<HttpState> {
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            assemble(
                config,
                Repositories {
                    officers: Arc::new(DieselOfficerRepository::new(pool.clone())),
                    admins: Arc::new(DieselAdminRepository::new(pool.clone())),
                    applications: Arc::new(DieselApplicationRepository::new(pool.clone())),
                },
            )
            .await
        }
        None => {
            warn!("no database configured; records are kept in memory only");
            let store = Arc::new(InMemoryStore::new());
            assemble(
                config,
                Repositories {
                    officers: Arc::clone(&store),
                    admins: Arc::clone(&store),
                    applications: store,
                },
            )
            .await
        }
    }
}

async fn assemble<O, A, P>(
    config: &ServerConfig,
    repositories: Repositories<O, A, P>,
) -> io::Result<HttpState>
where
    O: OfficerRepository + 'static,
    A: AdminRepository + 'static,
    P: ApplicationRepository + 'static,
{
    let Repositories {
        officers,
        admins,
        applications,
    } = repositories;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let hasher = Arc::new(Argon2PasswordHasher::new());

    match &config.admin_seed {
        Some(seed) => {
            seed_admin(admins.as_ref(), hasher.as_ref(), seed)
                .await
                .map_err(|err| io::Error::other(format!("admin seeding failed: {err}")))?;
        }
        None => warn!("no admin credentials configured; admin login is unavailable"),
    }

    let officer_directory = OfficerDirectoryService::new(
        officers,
        Arc::clone(&hasher),
        Arc::clone(&config.tokens),
        Arc::clone(&clock),
    );
    let admin_login =
        AdminLoginService::new(admins, hasher, Arc::clone(&config.tokens), Arc::clone(&clock));
    let application_service = Arc::new(ApplicationService::new(
        applications,
        Arc::clone(&config.documents),
        clock,
    ));

    Ok(HttpState::new(
        Arc::new(officer_directory),
        Arc::new(admin_login),
        application_service.clone(),
        application_service,
        config.tokens.clone(),
    ))
}
