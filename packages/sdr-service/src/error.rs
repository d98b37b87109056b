pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid action: {action:?}")]
	InvalidAction { action: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sdr_providers::Error> for Error {
	fn from(err: sdr_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<sdr_storage::Error> for Error {
	fn from(err: sdr_storage::Error) -> Self {
		match err {
			sdr_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			sdr_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
		}
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::InvalidRequest { message: err.to_string() }
	}
}
