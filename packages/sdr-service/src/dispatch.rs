//! Routes an `{action, data}` request to the matching analysis flow.

use std::str::FromStr;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
	BulkLeadResponse, Error, IntentClassificationResponse, LeadQualityResponse, Result,
	SdrService, SentimentAnalysisResponse,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
	AdvancedSentimentAnalysis,
	LeadQualityPrediction,
	EmailIntentClassification,
	BulkLeadAnalysis,
}
impl Action {
	pub const ALL: [Self; 4] = [
		Self::AdvancedSentimentAnalysis,
		Self::LeadQualityPrediction,
		Self::EmailIntentClassification,
		Self::BulkLeadAnalysis,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::AdvancedSentimentAnalysis => "advanced_sentiment_analysis",
			Self::LeadQualityPrediction => "lead_quality_prediction",
			Self::EmailIntentClassification => "email_intent_classification",
			Self::BulkLeadAnalysis => "bulk_lead_analysis",
		}
	}
}
impl FromStr for Action {
	type Err = Error;

	/// Exact, case-sensitive match on the action name.
	fn from_str(s: &str) -> Result<Self> {
		Self::ALL
			.into_iter()
			.find(|action| action.as_str() == s)
			.ok_or_else(|| Error::InvalidAction { action: s.to_string() })
	}
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
	#[serde(default)]
	pub action: String,
	#[serde(default)]
	pub data: Value,
}

impl AnalysisRequest {
	/// Reads an `{action, data}` body. A body that is not an object, or whose `action` is not a
	/// string, is an invalid action. A missing `action` reads as the empty name.
	pub fn from_envelope(body: Value) -> Result<Self> {
		let mut body = match body {
			Value::Object(body) => body,
			other => return Err(Error::InvalidAction { action: other.to_string() }),
		};
		let action = match body.remove("action") {
			Some(Value::String(action)) => action,
			None | Some(Value::Null) => String::new(),
			Some(other) => return Err(Error::InvalidAction { action: other.to_string() }),
		};
		let data = body.remove("data").unwrap_or(Value::Null);

		Ok(Self { action, data })
	}
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum ActionResponse {
	Sentiment(SentimentAnalysisResponse),
	LeadQuality(LeadQualityResponse),
	Intent(IntentClassificationResponse),
	Bulk(BulkLeadResponse),
}

impl SdrService {
	/// Unknown actions fail before any provider or store is touched.
	pub async fn dispatch(&self, req: AnalysisRequest) -> Result<ActionResponse> {
		let action: Action = req.action.parse()?;

		tracing::debug!(action = action.as_str(), "Dispatching analysis action.");

		match action {
			Action::AdvancedSentimentAnalysis => self
				.advanced_sentiment_analysis(payload(req.data)?)
				.await
				.map(ActionResponse::Sentiment),
			Action::LeadQualityPrediction =>
				self.lead_quality_prediction(payload(req.data)?).await.map(ActionResponse::LeadQuality),
			Action::EmailIntentClassification => self
				.email_intent_classification(payload(req.data)?)
				.await
				.map(ActionResponse::Intent),
			Action::BulkLeadAnalysis =>
				self.bulk_lead_analysis(payload(req.data)?).await.map(ActionResponse::Bulk),
		}
	}
}

// A missing or null `data` reads as an empty payload.
fn payload<T>(data: Value) -> Result<T>
where
	T: DeserializeOwned + Default,
{
	if data.is_null() {
		return Ok(T::default());
	}

	Ok(serde_json::from_value(data)?)
}
