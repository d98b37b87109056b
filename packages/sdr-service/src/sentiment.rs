use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, SdrService};
use sdr_domain::{Sentiment, scoring};
use sdr_storage::models::EmailAnalysisRecord;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentAnalysisRequest {
	pub text: String,
	#[serde(deserialize_with = "sdr_domain::lead::deserialize_lead_id")]
	pub lead_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SentimentAnalysisResponse {
	pub success: bool,
	pub sentiment: Option<Sentiment>,
	pub confidence: Option<f64>,
	pub urgency_score: u8,
	pub buying_intent: u8,
	pub keywords: Vec<String>,
}

impl SdrService {
	pub async fn advanced_sentiment_analysis(
		&self,
		req: SentimentAnalysisRequest,
	) -> Result<SentimentAnalysisResponse> {
		let now = OffsetDateTime::now_utc();
		let signal = self.sentiment_for(&req.text).await?;
		let keywords = self.keywords_for(&req.text).await?;
		let urgency_score = scoring::urgency_score(&req.text);
		let buying_intent = scoring::buying_intent_score(&req.text);
		let record = EmailAnalysisRecord {
			analysis_id: Uuid::new_v4(),
			lead_id: req.lead_id.clone(),
			source_text: req.text,
			sentiment: signal.map(|s| s.sentiment).unwrap_or_default().as_str().to_string(),
			confidence: signal.map(|s| s.confidence).unwrap_or(0.0),
			keywords: keywords.joined(),
			urgency_score: Some(i16::from(urgency_score)),
			buying_intent: Some(i16::from(buying_intent)),
			classified_intent: None,
			intent_confidence: None,
			created_at: now,
		};

		self.stores.records.insert_email_analysis(&record).await?;

		tracing::info!(
			lead_id = req.lead_id.as_deref().unwrap_or(""),
			urgency_score,
			buying_intent,
			keyword_count = keywords.len(),
			"Stored sentiment analysis."
		);

		Ok(SentimentAnalysisResponse {
			success: true,
			sentiment: signal.map(|s| s.sentiment),
			confidence: signal.map(|s| s.confidence),
			urgency_score,
			buying_intent,
			keywords: keywords.into_inner(),
		})
	}
}
