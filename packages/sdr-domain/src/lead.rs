use serde::{Deserialize, Deserializer, Serialize};

/// CRM lead fields used for scoring. Field names follow the CRM's column labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
	#[serde(default, deserialize_with = "deserialize_lead_id")]
	pub lead_id: Option<String>,
	#[serde(rename = "Company", default)]
	pub company: String,
	#[serde(rename = "Industry", default)]
	pub industry: String,
	#[serde(rename = "Designation", default)]
	pub designation: String,
}
impl LeadRecord {
	/// Text sent for sentiment when predicting a single lead's quality.
	pub fn company_text(&self) -> String {
		format!("{} {}", self.company, self.industry)
	}

	/// Text sent for sentiment and keywords during bulk analysis.
	pub fn profile_text(&self) -> String {
		format!("{} {} {}", self.company, self.industry, self.designation)
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLeadId {
	Text(String),
	Number(i64),
}

/// Reads a CRM row id given as a string or a bare integer. Blank ids mean "no row".
pub fn deserialize_lead_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<RawLeadId>::deserialize(deserializer)?;
	let id = match raw {
		Some(RawLeadId::Text(text)) => Some(text),
		Some(RawLeadId::Number(number)) => Some(number.to_string()),
		None => None,
	};

	Ok(id.filter(|value| !value.trim().is_empty()))
}
