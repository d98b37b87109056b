//! Email reply intent classification.

use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::SentimentSignal;

/// Confidence reported for a label the lookup table does not know.
pub const DEFAULT_INTENT_CONFIDENCE: f64 = 0.60;
pub const DEFAULT_RECOMMENDED_ACTION: &str = "Review manually";
/// Negative sentiment above this confidence counts as a complaint on its own.
pub const COMPLAINT_SENTIMENT_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentLabel {
	PositiveInterest,
	NeedMoreInfo,
	NotInterested,
	Complaint,
	Unsubscribe,
}
impl IntentLabel {
	pub const ALL: [Self; 5] = [
		Self::PositiveInterest,
		Self::NeedMoreInfo,
		Self::NotInterested,
		Self::Complaint,
		Self::Unsubscribe,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::PositiveInterest => "POSITIVE_INTEREST",
			Self::NeedMoreInfo => "NEED_MORE_INFO",
			Self::NotInterested => "NOT_INTERESTED",
			Self::Complaint => "COMPLAINT",
			Self::Unsubscribe => "UNSUBSCRIBE",
		}
	}
}
impl fmt::Display for IntentLabel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for IntentLabel {
	type Err = UnknownIntentLabel;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|label| label.as_str() == s)
			.ok_or_else(|| UnknownIntentLabel(s.to_string()))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIntentLabel(pub String);
impl fmt::Display for UnknownIntentLabel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Unknown intent label {:?}.", self.0)
	}
}
impl Error for UnknownIntentLabel {}

struct IntentRule {
	label: IntentLabel,
	phrases: &'static [&'static str],
	/// Also fires on strongly negative sentiment, regardless of the text.
	on_negative_sentiment: bool,
}

// Evaluated top to bottom; the first rule that fires wins.
const INTENT_RULES: [IntentRule; 5] = [
	IntentRule {
		label: IntentLabel::Unsubscribe,
		phrases: &["unsubscribe", "remove me", "stop sending"],
		on_negative_sentiment: false,
	},
	IntentRule {
		label: IntentLabel::Complaint,
		phrases: &["complaint", "spam", "annoying"],
		on_negative_sentiment: true,
	},
	IntentRule {
		label: IntentLabel::PositiveInterest,
		phrases: &["interested", "demo", "schedule", "meeting", "call"],
		on_negative_sentiment: false,
	},
	IntentRule {
		label: IntentLabel::NeedMoreInfo,
		phrases: &["information", "details", "pricing", "features"],
		on_negative_sentiment: false,
	},
	IntentRule {
		label: IntentLabel::NotInterested,
		phrases: &["not interested", "no thanks", "not now"],
		on_negative_sentiment: false,
	},
];

const FALLBACK_INTENT: IntentLabel = IntentLabel::NeedMoreInfo;

const INTENT_CONFIDENCE: [(IntentLabel, f64); 5] = [
	(IntentLabel::PositiveInterest, 0.85),
	(IntentLabel::NotInterested, 0.90),
	(IntentLabel::Unsubscribe, 0.95),
	(IntentLabel::Complaint, 0.80),
	(IntentLabel::NeedMoreInfo, 0.70),
];

/// CRM `Lead_Status` value a reply moves the lead to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadStatus {
	Qualified,
	Nurturing,
	Disqualified,
	Blocked,
	Suppressed,
}
impl LeadStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Qualified => "Qualified",
			Self::Nurturing => "Nurturing",
			Self::Disqualified => "Disqualified",
			Self::Blocked => "Blocked",
			Self::Suppressed => "Suppressed",
		}
	}
}
impl fmt::Display for LeadStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// What a classified reply does to the lead: its new status and the follow-ups to run.
#[derive(Debug, Clone, Copy)]
pub struct LeadStatusRule {
	pub label: IntentLabel,
	pub status: LeadStatus,
	pub follow_ups: &'static [&'static str],
}

// One rule per label. A label missing here falls back to the nurturing rule.
pub const LEAD_STATUS_RULES: [LeadStatusRule; 5] = [
	LeadStatusRule {
		label: IntentLabel::PositiveInterest,
		status: LeadStatus::Qualified,
		follow_ups: &["Qualified Lead", "Create Deal"],
	},
	LeadStatusRule {
		label: IntentLabel::NeedMoreInfo,
		status: LeadStatus::Nurturing,
		follow_ups: &["Schedule Follow-up"],
	},
	LeadStatusRule {
		label: IntentLabel::NotInterested,
		status: LeadStatus::Disqualified,
		follow_ups: &["Stop Outreach"],
	},
	LeadStatusRule {
		label: IntentLabel::Complaint,
		status: LeadStatus::Blocked,
		follow_ups: &["Block Lead", "Notify Admin"],
	},
	LeadStatusRule {
		label: IntentLabel::Unsubscribe,
		status: LeadStatus::Suppressed,
		follow_ups: &["Suppress Permanently"],
	},
];

const RECOMMENDED_ACTIONS: [(IntentLabel, &str); 5] = [
	(IntentLabel::PositiveInterest, "Schedule demo call"),
	(IntentLabel::NeedMoreInfo, "Send product information"),
	(IntentLabel::NotInterested, "Add to nurture campaign"),
	(IntentLabel::Complaint, "Escalate to support team"),
	(IntentLabel::Unsubscribe, "Remove from all campaigns"),
];

pub fn classify_intent(text: &str, sentiment: Option<&SentimentSignal>) -> IntentLabel {
	let text = text.to_lowercase();
	let strongly_negative = sentiment
		.map(|signal| signal.is_negative() && signal.confidence > COMPLAINT_SENTIMENT_CONFIDENCE)
		.unwrap_or(false);

	INTENT_RULES
		.iter()
		.find(|rule| {
			rule.phrases.iter().any(|phrase| text.contains(phrase))
				|| (rule.on_negative_sentiment && strongly_negative)
		})
		.map(|rule| rule.label)
		.unwrap_or(FALLBACK_INTENT)
}

pub fn intent_confidence(label: IntentLabel) -> f64 {
	INTENT_CONFIDENCE
		.iter()
		.find(|(known, _)| *known == label)
		.map(|(_, confidence)| *confidence)
		.unwrap_or(DEFAULT_INTENT_CONFIDENCE)
}

/// Confidence lookup for a label given as text, e.g. one read back from storage.
pub fn intent_confidence_for(label: &str) -> f64 {
	label.parse().map(intent_confidence).unwrap_or(DEFAULT_INTENT_CONFIDENCE)
}

pub fn recommended_action(label: IntentLabel) -> &'static str {
	RECOMMENDED_ACTIONS
		.iter()
		.find(|(known, _)| *known == label)
		.map(|(_, action)| *action)
		.unwrap_or(DEFAULT_RECOMMENDED_ACTION)
}

pub fn recommended_action_for(label: &str) -> &'static str {
	label.parse().map(recommended_action).unwrap_or(DEFAULT_RECOMMENDED_ACTION)
}

pub fn lead_status_rule(label: IntentLabel) -> LeadStatusRule {
	match LEAD_STATUS_RULES.iter().find(|rule| rule.label == label) {
		Some(rule) => *rule,
		None => LEAD_STATUS_RULES[1],
	}
}
