use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
	Positive,
	Negative,
	#[default]
	Neutral,
}
impl Sentiment {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Positive => "positive",
			Self::Negative => "negative",
			Self::Neutral => "neutral",
		}
	}

	/// Reads a provider label. Anything other than positive or negative counts as neutral.
	pub fn from_label(label: &str) -> Self {
		match label.trim().to_ascii_lowercase().as_str() {
			"positive" => Self::Positive,
			"negative" => Self::Negative,
			_ => Self::Neutral,
		}
	}
}

/// Sentiment reading for one text, as reported by the language provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentSignal {
	pub sentiment: Sentiment,
	/// Always within 0.0..=1.0.
	pub confidence: f64,
}
impl SentimentSignal {
	pub fn new(sentiment: Sentiment, confidence: f64) -> Self {
		let confidence = if confidence.is_finite() { confidence.clamp(0.0, 1.0) } else { 0.0 };

		Self { sentiment, confidence }
	}

	pub fn is_negative(&self) -> bool {
		self.sentiment == Sentiment::Negative
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet(pub Vec<String>);
impl KeywordSet {
	pub fn new(keywords: Vec<String>) -> Self {
		Self(keywords)
	}

	pub fn as_slice(&self) -> &[String] {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Comma-joined form stored alongside analysis records.
	pub fn joined(&self) -> String {
		self.0.join(",")
	}

	pub fn into_inner(self) -> Vec<String> {
		self.0
	}
}
