pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("SDR_PG_DSN is not a valid Postgres DSN: {0}")]
	InvalidDsn(String),
	#[error("No admin database accepted a connection: {0}")]
	AdminUnavailable(String),
	#[error("Scratch database {name} could not be created: {source}")]
	CreateDatabase {
		name: String,
		#[source]
		source: sqlx::Error,
	},
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
}
