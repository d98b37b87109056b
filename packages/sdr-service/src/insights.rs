//! Read side: a lead's stored analysis history.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result, SdrService};
use sdr_domain::{IntentLabel, LeadStatus, intent::lead_status_rule};
use sdr_storage::models::EmailAnalysisRecord;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadInsightsRequest {
	#[serde(deserialize_with = "sdr_domain::lead::deserialize_lead_id")]
	pub lead_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeadInsightsResponse {
	pub success: bool,
	pub lead_id: String,
	pub analysis_count: usize,
	/// Intent of the most recent classified reply, if any.
	pub latest_intent: Option<IntentLabel>,
	/// Status that intent moved the lead to.
	pub lead_status: Option<LeadStatus>,
	pub analyses: Vec<AnalysisEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisEntry {
	pub analysis_id: Uuid,
	pub sentiment: String,
	pub confidence: f64,
	pub keywords: Vec<String>,
	pub urgency_score: Option<i16>,
	pub buying_intent: Option<i16>,
	pub intent: Option<String>,
	pub intent_confidence: Option<f64>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}
impl From<EmailAnalysisRecord> for AnalysisEntry {
	fn from(record: EmailAnalysisRecord) -> Self {
		let keywords = record
			.keywords
			.split(',')
			.filter(|keyword| !keyword.is_empty())
			.map(str::to_string)
			.collect();

		Self {
			analysis_id: record.analysis_id,
			sentiment: record.sentiment,
			confidence: record.confidence,
			keywords,
			urgency_score: record.urgency_score,
			buying_intent: record.buying_intent,
			intent: record.classified_intent,
			intent_confidence: record.intent_confidence,
			created_at: record.created_at,
		}
	}
}

impl SdrService {
	pub async fn lead_insights(&self, req: LeadInsightsRequest) -> Result<LeadInsightsResponse> {
		let Some(lead_id) = req.lead_id.filter(|id| !id.trim().is_empty()) else {
			return Err(Error::InvalidRequest { message: "lead_id is required.".to_string() });
		};
		let records = self.stores.records.email_analyses_for(&lead_id).await?;
		// Unparseable labels are skipped.
		let latest_intent = records
			.iter()
			.rev()
			.filter_map(|record| record.classified_intent.as_deref())
			.find_map(|label| label.parse::<IntentLabel>().ok());
		let analyses: Vec<AnalysisEntry> = records.into_iter().map(AnalysisEntry::from).collect();

		tracing::info!(
			lead_id = lead_id.as_str(),
			analysis_count = analyses.len(),
			"Loaded lead insights."
		);

		Ok(LeadInsightsResponse {
			success: true,
			lead_id,
			analysis_count: analyses.len(),
			latest_intent,
			lead_status: latest_intent.map(|label| lead_status_rule(label).status),
			analyses,
		})
	}
}
