use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, SdrService};
use sdr_domain::{
	IntentLabel, LeadStatus,
	intent::{self, classify_intent, intent_confidence, lead_status_rule},
};
use sdr_storage::models::{EmailAnalysisRecord, LeadStatusUpdate};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentClassificationRequest {
	pub email_body: String,
	#[serde(deserialize_with = "sdr_domain::lead::deserialize_lead_id")]
	pub lead_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntentClassificationResponse {
	pub success: bool,
	pub intent: IntentLabel,
	pub confidence: f64,
	pub recommended_action: String,
	pub lead_status: LeadStatus,
	/// Follow-ups triggered by the intent.
	pub actions: Vec<String>,
}

impl SdrService {
	pub async fn email_intent_classification(
		&self,
		req: IntentClassificationRequest,
	) -> Result<IntentClassificationResponse> {
		let now = OffsetDateTime::now_utc();
		let signal = self.sentiment_for(&req.email_body).await?;
		let keywords = self.keywords_for(&req.email_body).await?;
		let label = classify_intent(&req.email_body, signal.as_ref());
		let confidence = intent_confidence(label);
		let record = EmailAnalysisRecord {
			analysis_id: Uuid::new_v4(),
			lead_id: req.lead_id.clone(),
			source_text: req.email_body,
			sentiment: signal.map(|s| s.sentiment).unwrap_or_default().as_str().to_string(),
			confidence: signal.map(|s| s.confidence).unwrap_or(0.0),
			keywords: keywords.joined(),
			urgency_score: None,
			buying_intent: None,
			classified_intent: Some(label.as_str().to_string()),
			intent_confidence: Some(confidence),
			created_at: now,
		};

		let rule = lead_status_rule(label);

		self.stores.records.insert_email_analysis(&record).await?;

		if let Some(lead_id) = req.lead_id.as_deref() {
			let update = LeadStatusUpdate {
				lead_id: lead_id.to_string(),
				status: rule.status.as_str().to_string(),
				intent: label.as_str().to_string(),
			};

			if self.stores.leads.update_lead_status(&update).await? == 0 {
				tracing::warn!(lead_id, "No CRM lead matched the status update.");
			}
		}

		tracing::info!(
			lead_id = req.lead_id.as_deref().unwrap_or(""),
			intent = label.as_str(),
			lead_status = rule.status.as_str(),
			"Stored email intent classification."
		);

		Ok(IntentClassificationResponse {
			success: true,
			intent: label,
			confidence,
			recommended_action: intent::recommended_action(label).to_string(),
			lead_status: rule.status,
			actions: rule.follow_ups.iter().map(|action| action.to_string()).collect(),
		})
	}
}
