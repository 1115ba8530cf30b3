//! Administrator login and startup seeding.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::officer_directory_service::{map_hash_error, map_token_error};
use crate::domain::ports::{
    AccessTokens, AdminLogin, AdminRepository, AdminRepositoryError, AdminSession, PasswordHasher,
};
use crate::domain::{Admin, Error, LoginCredentials, Principal, Role};

fn map_repository_error(error: AdminRepositoryError) -> Error {
    match error {
        AdminRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("admin repository unavailable: {message}"))
        }
        AdminRepositoryError::Query { message } => {
            Error::internal(format!("admin repository error: {message}"))
        }
    }
}

/// Admin account supplied by configuration at startup.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub full_name: String,
    pub password: Zeroizing<String>,
}

/// Hash the seed password and upsert the admin account.
///
/// Running this on every start is safe: an existing account keeps its id and
/// takes the configured name and password.
///
/// # Errors
/// Fails when hashing or the repository fails.
pub async fn seed_admin<R, H>(admins: &R, hasher: &H, seed: &AdminSeed) -> Result<Admin, Error>
where
    R: AdminRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    if seed.username.trim().is_empty() || seed.password.is_empty() {
        return Err(Error::invalid_request(
            "admin seed requires a username and password",
        ));
    }
    let hash = hasher
        .hash(seed.password.as_str())
        .await
        .map_err(map_hash_error)?;
    let admin = Admin::new(Uuid::new_v4(), &seed.username, seed.full_name.clone(), hash);
    let stored = admins.upsert(&admin).await.map_err(map_repository_error)?;
    info!(username = stored.username(), "admin account seeded");
    Ok(stored)
}

/// Admin login implementing [`AdminLogin`].
#[derive(Clone)]
pub struct AdminLoginService<R, H, T> {
    admins: Arc<R>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<R, H, T> AdminLoginService<R, H, T> {
    /// Create a new service from its collaborators.
    pub fn new(admins: Arc<R>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            admins,
            hasher,
            tokens,
            clock,
        }
    }
}

#[async_trait]
impl<R, H, T> AdminLogin for AdminLoginService<R, H, T>
where
    R: AdminRepository,
    H: PasswordHasher,
    T: AccessTokens,
{
    async fn login(&self, credentials: LoginCredentials) -> Result<AdminSession, Error> {
        let Some(admin) = self
            .admins
            .find_by_username(credentials.identifier())
            .await
            .map_err(map_repository_error)?
        else {
            return Err(Error::unauthorized("invalid credentials"));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), admin.password_hash())
            .await
            .map_err(map_hash_error)?;
        if !matches {
            return Err(Error::unauthorized("invalid credentials"));
        }

        let token = self
            .tokens
            .issue(Principal::new(admin.id(), Role::Admin), self.clock.utc())
            .map_err(map_token_error)?;
        Ok(AdminSession { token, admin })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for admin login and seeding.
    use chrono::Duration;

    use super::*;
    use crate::domain::ports::{MockAccessTokens, MockAdminRepository, MockPasswordHasher};
    use crate::domain::test_fixtures::{fixture_clock, stored_hash};
    use crate::domain::{AccessToken, ErrorCode};

    fn admin() -> Admin {
        Admin::new(Uuid::nil(), "registrar", "Chief Registrar", stored_hash())
    }

    fn seed() -> AdminSeed {
        AdminSeed {
            username: "registrar".into(),
            full_name: "Chief Registrar".into(),
            password: Zeroizing::new("s3cret".into()),
        }
    }

    #[tokio::test]
    async fn seed_admin_hashes_and_upserts() {
        let mut repo = MockAdminRepository::new();
        repo.expect_upsert()
            .withf(|candidate| {
                candidate.username() == "registrar" && candidate.password_hash() == &stored_hash()
            })
            .times(1)
            .return_once(|_| Ok(admin()));
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .withf(|password| password == "s3cret")
            .return_once(|_| Ok(stored_hash()));

        let stored = seed_admin(&repo, &hasher, &seed()).await.expect("seeded");
        assert_eq!(stored.id(), Uuid::nil());
    }

    #[tokio::test]
    async fn seed_admin_rejects_blank_password() {
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().never();
        let blank = AdminSeed {
            password: Zeroizing::new(String::new()),
            ..seed()
        };

        let error = seed_admin(&MockAdminRepository::new(), &hasher, &blank)
            .await
            .expect_err("blank password");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn login_issues_admin_token() {
        let mut repo = MockAdminRepository::new();
        repo.expect_find_by_username()
            .withf(|username| username == "registrar")
            .return_once(|_| Ok(Some(admin())));
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().return_once(|_, _| Ok(true));
        let mut tokens = MockAccessTokens::new();
        tokens
            .expect_issue()
            .withf(|principal, _| principal.role() == Role::Admin)
            .return_once(|_, at| Ok(AccessToken::new("admin-token".into(), at + Duration::hours(24))));

        let service =
            AdminLoginService::new(Arc::new(repo), Arc::new(hasher), Arc::new(tokens), fixture_clock());
        let credentials =
            LoginCredentials::try_from_parts("username", " registrar ", "s3cret").expect("valid");
        let session = service.login(credentials).await.expect("login succeeds");

        assert_eq!(session.token.as_str(), "admin-token");
        assert_eq!(session.admin.full_name(), "Chief Registrar");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let mut repo = MockAdminRepository::new();
        repo.expect_find_by_username()
            .return_once(|_| Ok(Some(admin())));
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().return_once(|_, _| Ok(false));

        let service = AdminLoginService::new(
            Arc::new(repo),
            Arc::new(hasher),
            Arc::new(MockAccessTokens::new()),
            fixture_clock(),
        );
        let credentials =
            LoginCredentials::try_from_parts("username", "registrar", "nope").expect("valid");
        let error = service.login(credentials).await.expect_err("rejected");

        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
}
