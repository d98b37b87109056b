use time::OffsetDateTime;
use uuid::Uuid;

/// One row of `email_analysis`. Sentiment-analysis rows carry the urgency and buying-intent
/// scores; intent-classification rows carry the classified intent and its confidence.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct EmailAnalysisRecord {
	pub analysis_id: Uuid,
	pub lead_id: Option<String>,
	pub source_text: String,
	pub sentiment: String,
	pub confidence: f64,
	pub keywords: String,
	pub urgency_score: Option<i16>,
	pub buying_intent: Option<i16>,
	pub classified_intent: Option<String>,
	pub intent_confidence: Option<f64>,
	pub created_at: OffsetDateTime,
}

/// Derived fields written back to a CRM lead row.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadQualityUpdate {
	pub lead_id: String,
	pub quality_score: i16,
	pub grade: String,
	pub predicted_at: OffsetDateTime,
}

/// Status and intent written onto a CRM lead row after a reply is classified.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadStatusUpdate {
	pub lead_id: String,
	pub status: String,
	pub intent: String,
}
