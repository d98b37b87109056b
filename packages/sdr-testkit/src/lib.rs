//! Scratch Postgres databases for the ignored storage tests.
//!
//! Each `ScratchDatabase` is a fresh database on the server named by `SDR_PG_DSN`, holding
//! whatever the test bootstraps into it: usually the service schema plus the CRM `leads` fixture.

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor, PgPool,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

pub const DSN_ENV: &str = "SDR_PG_DSN";

// Tried in order when looking for a database to issue CREATE/DROP DATABASE from.
const ADMIN_DATABASES: [&str; 2] = ["postgres", "template1"];

/// The slice of the CRM `leads` table the service writes to: quality score, grade, prediction
/// date, status and intent, keyed by `rowid`. The service never creates this table.
pub const CRM_LEADS_FIXTURE: &str = "\
CREATE TABLE IF NOT EXISTS leads (
	rowid text PRIMARY KEY,
	company text NOT NULL DEFAULT '',
	ai_quality_score smallint NULL,
	lead_grade text NULL,
	ai_prediction_date timestamptz NULL,
	lead_status text NULL,
	ai_intent text NULL
)";

pub struct ScratchDatabase {
	name: String,
	dsn: String,
	admin_options: PgConnectOptions,
	dropped: bool,
}
impl ScratchDatabase {
	pub async fn create(base_dsn: &str) -> Result<Self> {
		let base_options = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::InvalidDsn(err.to_string()))?;
		let (admin_options, mut admin_conn) = connect_admin(&base_options).await?;
		let name = format!("sdr_scratch_{}", Uuid::new_v4().simple());

		admin_conn
			.execute(format!(r#"CREATE DATABASE "{name}""#).as_str())
			.await
			.map_err(|source| Error::CreateDatabase { name: name.clone(), source })?;

		let dsn = base_options.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, admin_options, dropped: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	pub async fn drop_now(mut self) -> Result<()> {
		drop_database(&self.name, &self.admin_options).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for ScratchDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let admin_options = self.admin_options.clone();
		// The test's runtime may already be shutting down, so drop on a private one.
		let handle = thread::spawn(move || {
			let result = Builder::new_current_thread()
				.enable_all()
				.build()
				.map_err(|err| err.to_string())
				.and_then(|runtime| {
					runtime
						.block_on(drop_database(&name, &admin_options))
						.map_err(|err| err.to_string())
				});

			if let Err(err) = result {
				eprintln!("Scratch database {name} was left behind: {err}.");
			}
		});
		let _ = handle.join();
	}
}

pub fn env_dsn() -> Option<String> {
	env::var(DSN_ENV).ok().filter(|dsn| !dsn.trim().is_empty())
}

/// Creates the CRM `leads` fixture and inserts one empty row per id.
pub async fn seed_crm_leads(pool: &PgPool, rowids: &[&str]) -> Result<()> {
	sqlx::query(CRM_LEADS_FIXTURE).execute(pool).await?;

	for rowid in rowids {
		sqlx::query("INSERT INTO leads (rowid) VALUES ($1) ON CONFLICT DO NOTHING")
			.bind(*rowid)
			.execute(pool)
			.await?;
	}

	Ok(())
}

async fn connect_admin(
	base_options: &PgConnectOptions,
) -> Result<(PgConnectOptions, PgConnection)> {
	let mut failures = Vec::new();

	for database in ADMIN_DATABASES {
		let options = base_options.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => failures.push(format!("{database}: {err}")),
		}
	}

	Err(Error::AdminUnavailable(failures.join("; ")))
}

async fn drop_database(name: &str, admin_options: &PgConnectOptions) -> Result<()> {
	let mut conn = PgConnection::connect_with(admin_options).await?;

	sqlx::query(
		"\
SELECT pg_terminate_backend(pid)
FROM pg_stat_activity
WHERE datname = $1 AND pid <> pg_backend_pid()",
	)
	.bind(name)
	.fetch_all(&mut conn)
	.await?;
	conn.execute(format!(r#"DROP DATABASE IF EXISTS "{name}""#).as_str()).await?;

	Ok(())
}
