pub mod keywords;
pub mod sentiment;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::{Map, Value};

use sdr_config::LanguageProviderConfig;

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

/// Posts `texts` to one of the language service endpoints and returns the raw JSON reply.
async fn post_texts(cfg: &LanguageProviderConfig, path: &str, texts: &[String]) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, path);
	let body = serde_json::json!({ "model": cfg.model, "texts": texts });
	let res = client
		.post(url)
		.headers(auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	Ok(json)
}

/// Pulls the per-text result items out of a reply, ordered by their `index` when present.
fn result_items(json: &Value, kind: &str) -> Result<Vec<Value>> {
	let items = json
		.get("data")
		.or_else(|| json.get("results"))
		.or(Some(json))
		.and_then(|v| v.as_array())
		.ok_or_else(|| Error::InvalidResponse {
			message: format!("{kind} response is missing a results array."),
		})?;
	let mut indexed: Vec<(usize, Value)> = items
		.iter()
		.enumerate()
		.map(|(fallback_index, item)| {
			let index = item
				.get("index")
				.and_then(|v| v.as_u64())
				.map(|v| v as usize)
				.unwrap_or(fallback_index);

			(index, item.clone())
		})
		.collect();

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, item)| item).collect())
}
