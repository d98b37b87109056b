mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, LanguageProviderConfig, Postgres, Providers, Security, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	let language = &cfg.providers.language;

	if language.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.language.api_base must be non-empty.".to_string(),
		});
	}
	if language.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.language.api_key must be non-empty.".to_string(),
		});
	}

	for (label, path) in [
		("providers.language.sentiment_path", &language.sentiment_path),
		("providers.language.keyword_path", &language.keyword_path),
	] {
		if !path.starts_with('/') {
			return Err(Error::Validation { message: format!("{label} must start with '/'.") });
		}
	}

	if language.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.language.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (key, value) in &language.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("providers.language.default_headers.{key} must be a string."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let api_base = cfg.providers.language.api_base.trim().trim_end_matches('/').to_string();

	cfg.providers.language.api_base = api_base;
	cfg.service.log_level = cfg.service.log_level.trim().to_string();

	if cfg.service.log_level.is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
