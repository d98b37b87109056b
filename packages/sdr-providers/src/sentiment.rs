use serde_json::Value;

use sdr_config::LanguageProviderConfig;
use sdr_domain::{Sentiment, SentimentSignal};

use crate::{Error, Result};

pub async fn sentiment(
	cfg: &LanguageProviderConfig,
	texts: &[String],
) -> Result<Vec<SentimentSignal>> {
	let json = crate::post_texts(cfg, &cfg.sentiment_path, texts).await?;

	parse_sentiment_response(&json)
}

fn parse_sentiment_response(json: &Value) -> Result<Vec<SentimentSignal>> {
	let items = crate::result_items(json, "Sentiment")?;
	let mut signals = Vec::with_capacity(items.len());

	for item in items {
		if !item.is_object() {
			return Err(Error::InvalidResponse {
				message: "Sentiment result must be an object.".to_string(),
			});
		}

		let sentiment = item
			.get("sentiment")
			.and_then(|v| v.as_str())
			.map(Sentiment::from_label)
			.unwrap_or_default();
		let confidence = item.get("confidence").and_then(|v| v.as_f64()).unwrap_or(0.0);

		signals.push(SentimentSignal::new(sentiment, confidence));
	}

	Ok(signals)
}
