use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result, SdrService};
use sdr_domain::LeadRecord;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkLeadRequest {
	/// Raw lead objects. Each one is parsed on its own so a malformed entry fails alone.
	pub leads: Vec<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BulkLeadResponse {
	pub success: bool,
	/// Leads attempted, successful or not.
	pub processed: usize,
	pub failed: usize,
	pub results: Vec<BulkLeadResult>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkStatus {
	Processed,
	Error,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BulkLeadResult {
	pub lead_id: Option<String>,
	pub status: BulkStatus,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub quality_score: Option<u8>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl SdrService {
	pub async fn bulk_lead_analysis(&self, req: BulkLeadRequest) -> Result<BulkLeadResponse> {
		let mut results = Vec::with_capacity(req.leads.len());

		for raw in req.leads {
			let fallback_id = raw_lead_id(&raw);
			let result = match self.analyze_raw_lead(raw).await {
				Ok((lead_id, quality_score)) => BulkLeadResult {
					lead_id,
					status: BulkStatus::Processed,
					quality_score: Some(quality_score),
					error: None,
				},
				Err(err) => {
					tracing::warn!(
						lead_id = fallback_id.as_deref().unwrap_or(""),
						error = %err,
						"Bulk lead analysis failed for one lead."
					);

					BulkLeadResult {
						lead_id: fallback_id,
						status: BulkStatus::Error,
						quality_score: None,
						error: Some(err.to_string()),
					}
				},
			};

			results.push(result);
		}

		let failed = results.iter().filter(|result| result.status == BulkStatus::Error).count();

		tracing::info!(processed = results.len(), failed, "Bulk lead analysis finished.");

		Ok(BulkLeadResponse { success: true, processed: results.len(), failed, results })
	}

	async fn analyze_raw_lead(&self, raw: Value) -> Result<(Option<String>, u8)> {
		let lead: LeadRecord = serde_json::from_value(raw)
			.map_err(|err| Error::InvalidRequest { message: format!("Malformed lead: {err}") })?;
		let profile = lead.profile_text();
		let assessment = self.assess_lead(&lead, &profile, &profile).await?;

		Ok((lead.lead_id, assessment.quality_score))
	}
}

// Best-effort id for reporting, readable even when the rest of the lead is malformed.
fn raw_lead_id(raw: &Value) -> Option<String> {
	match raw.get("lead_id")? {
		Value::String(id) if !id.trim().is_empty() => Some(id.clone()),
		Value::Number(id) => Some(id.to_string()),
		_ => None,
	}
}
