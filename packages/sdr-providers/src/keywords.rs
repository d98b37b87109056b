use serde_json::Value;

use sdr_config::LanguageProviderConfig;
use sdr_domain::KeywordSet;

use crate::{Error, Result};

pub async fn keywords(cfg: &LanguageProviderConfig, texts: &[String]) -> Result<Vec<KeywordSet>> {
	let json = crate::post_texts(cfg, &cfg.keyword_path, texts).await?;

	parse_keyword_response(&json)
}

fn parse_keyword_response(json: &Value) -> Result<Vec<KeywordSet>> {
	let items = crate::result_items(json, "Keyword")?;
	let mut sets = Vec::with_capacity(items.len());

	for item in items {
		let Some(values) = item.get("keywords") else {
			sets.push(KeywordSet::default());

			continue;
		};
		let values = values.as_array().ok_or_else(|| Error::InvalidResponse {
			message: "Keyword result keywords must be an array.".to_string(),
		})?;
		let mut keywords = Vec::with_capacity(values.len());

		for value in values {
			let keyword = value.as_str().ok_or_else(|| Error::InvalidResponse {
				message: "Keyword values must be strings.".to_string(),
			})?;

			keywords.push(keyword.to_string());
		}

		sets.push(KeywordSet::new(keywords));
	}

	Ok(sets)
}
