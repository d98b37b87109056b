use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Result, SdrService};
use sdr_domain::{
	Grade, LeadRecord,
	scoring::{lead_grade, lead_quality_score},
};
use sdr_storage::models::LeadQualityUpdate;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadQualityRequest {
	pub lead_data: LeadRecord,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeadQualityResponse {
	pub success: bool,
	pub lead_id: Option<String>,
	pub quality_score: u8,
	pub grade: Grade,
}

/// Score and grade computed for one lead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LeadAssessment {
	pub(crate) quality_score: u8,
	pub(crate) grade: Grade,
}

impl SdrService {
	pub async fn lead_quality_prediction(
		&self,
		req: LeadQualityRequest,
	) -> Result<LeadQualityResponse> {
		let lead = req.lead_data;
		let assessment =
			self.assess_lead(&lead, &lead.company_text(), &lead.designation).await?;

		tracing::info!(
			lead_id = lead.lead_id.as_deref().unwrap_or(""),
			quality_score = assessment.quality_score,
			grade = assessment.grade.as_str(),
			"Predicted lead quality."
		);

		Ok(LeadQualityResponse {
			success: true,
			lead_id: lead.lead_id,
			quality_score: assessment.quality_score,
			grade: assessment.grade,
		})
	}

	/// Fetches sentiment for `sentiment_text` and keywords for `keyword_text`, scores the lead,
	/// and writes the result to the CRM when the lead has an id.
	pub(crate) async fn assess_lead(
		&self,
		lead: &LeadRecord,
		sentiment_text: &str,
		keyword_text: &str,
	) -> Result<LeadAssessment> {
		let signal = self.sentiment_for(sentiment_text).await?;
		let keywords = self.keywords_for(keyword_text).await?;

		tracing::debug!(keywords = ?keywords.as_slice(), "Extracted lead keywords.");

		let quality_score = lead_quality_score(lead, signal.as_ref());
		let grade = lead_grade(quality_score);

		if let Some(lead_id) = lead.lead_id.as_deref() {
			let update = LeadQualityUpdate {
				lead_id: lead_id.to_string(),
				quality_score: i16::from(quality_score),
				grade: grade.as_str().to_string(),
				predicted_at: OffsetDateTime::now_utc(),
			};
			let touched = self.stores.leads.update_lead_quality(&update).await?;

			if touched == 0 {
				tracing::warn!(lead_id, "No CRM lead matched the quality update.");
			}
		}

		Ok(LeadAssessment { quality_score, grade })
	}
}
