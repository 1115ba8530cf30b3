//! Embedded PostgreSQL for the Diesel adapter suites.
//!
//! Each suite starts its own cluster and works in a freshly created database
//! carrying the crate's embedded migrations. Installation and data
//! directories live under the cargo target directory unless
//! `PG_RUNTIME_DIR` and `PG_DATA_DIR` are both set, since sandboxed runners
//! cannot write to the library's `/var/tmp` default.
//!
//! Hosts that cannot fetch PostgreSQL binaries set `SKIP_TEST_CLUSTER=1` to
//! skip these suites instead of failing them.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use idtrack::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use tokio::runtime::Runtime;
use uuid::Uuid;

static BOOTSTRAP: OnceLock<Mutex<()>> = OnceLock::new();

const DOWNLOAD_ATTEMPTS: u32 = 4;
const FIRST_BACKOFF: Duration = Duration::from_millis(500);

const POOL_SIZE: u32 = 8;

fn scratch_dirs() -> std::io::Result<(String, String)> {
    let target = std::env::var_os("CARGO_TARGET_DIR").map_or_else(
        || PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("target"),
        PathBuf::from,
    );
    let base = target
        .join("pg-embed")
        .join(format!("idtrack-{}-{}", std::process::id(), Uuid::new_v4()));
    let install = base.join("install");
    let data = base.join("data");
    std::fs::create_dir_all(&install)?;
    std::fs::create_dir_all(&data)?;
    Ok((
        install.to_string_lossy().into_owned(),
        data.to_string_lossy().into_owned(),
    ))
}

fn looks_transient(message: &str) -> bool {
    let message = message.to_lowercase();
    [
        "connection reset",
        "connection refused",
        "timed out",
        "timeout",
        "temporarily unavailable",
        "error decoding response body",
        "dns error",
    ]
    .iter()
    .any(|needle| message.contains(needle))
}

/// Start a cluster, retrying downloads that fail for network reasons.
pub fn start_cluster() -> Result<TestCluster, String> {
    let _serialised = BOOTSTRAP
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let configured =
        std::env::var_os("PG_RUNTIME_DIR").is_some() && std::env::var_os("PG_DATA_DIR").is_some();
    let _env = if configured {
        None
    } else {
        let (install, data) = scratch_dirs().map_err(|err| err.to_string())?;
        Some(env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(install)),
            ("PG_DATA_DIR", Some(data)),
        ]))
    };

    let mut backoff = FIRST_BACKOFF;
    let mut attempt = 1;
    loop {
        match TestCluster::new() {
            Ok(cluster) => return Ok(cluster),
            Err(err) => {
                let message = format!("{err:?}");
                if attempt >= DOWNLOAD_ATTEMPTS || !looks_transient(&message) {
                    return Err(message);
                }
                eprintln!("pg-embed: attempt {attempt} failed, retrying in {backoff:?}: {message}");
                std::thread::sleep(backoff);
                backoff *= 2;
                attempt += 1;
            }
        }
    }
}

/// Render a driver error with the server's SQLSTATE when there is one.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    error.as_db_error().map_or_else(
        || error.to_string(),
        |db| format!("{} ({}): {}", db.severity(), db.code().code(), db.message()),
    )
}

/// A migrated database on a running cluster.
///
/// Fields drop in declaration order: the pool closes before the runtime its
/// connections were spawned on, and the cluster stops last.
pub struct MigratedDatabase {
    pub pool: DbPool,
    pub runtime: Runtime,
    _cluster: TestCluster,
}

/// Create `name` on a fresh cluster, apply migrations and open a pool.
pub fn migrated_database(name: &str) -> Result<MigratedDatabase, String> {
    let runtime = Runtime::new().map_err(|err| format!("tokio runtime: {err}"))?;
    let cluster = start_cluster()?;

    let mut admin = Client::connect(&cluster.connection().database_url("postgres"), NoTls)
        .map_err(|err| format_postgres_error(&err))?;
    admin
        .batch_execute(&format!("CREATE DATABASE \"{name}\""))
        .map_err(|err| format_postgres_error(&err))?;
    drop(admin);

    let url = cluster.connection().database_url(name);
    runtime
        .block_on(run_migrations(&url))
        .map_err(|err| format!("migrations: {err}"))?;
    let pool = runtime
        .block_on(DbPool::new(PoolConfig::new(&url).with_max_size(POOL_SIZE)))
        .map_err(|err| err.to_string())?;

    Ok(MigratedDatabase {
        pool,
        runtime,
        _cluster: cluster,
    })
}

/// Skip when `SKIP_TEST_CLUSTER` is truthy, otherwise fail loudly.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    let skip = std::env::var("SKIP_TEST_CLUSTER")
        .is_ok_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"));
    if skip {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("embedded PostgreSQL unavailable: {reason}; set SKIP_TEST_CLUSTER=1 to skip");
    }
}
