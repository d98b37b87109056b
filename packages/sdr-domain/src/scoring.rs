//! Additive heuristics for email urgency, buying intent and lead quality.
//!
//! Every score is an integer in `0..=100`. The word lists and point values live in the rule
//! tables below; the scoring functions only walk them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{LeadRecord, Sentiment, SentimentSignal};

pub const MAX_SCORE: u8 = 100;

/// Awards `points` once for every word of `words` present in the text.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
	pub words: &'static [&'static str],
	pub points: u32,
}
impl KeywordRule {
	pub fn score(&self, text: &str) -> u8 {
		let text = text.to_lowercase();
		let hits = self.words.iter().filter(|word| text.contains(*word)).count() as u32;

		clamp_score(i64::from(hits * self.points))
	}
}

/// Flat bonus granted when any marker appears in a lead field.
#[derive(Debug, Clone, Copy)]
pub struct MarkerBonus {
	pub markers: &'static [&'static str],
	pub bonus: i64,
}
impl MarkerBonus {
	fn matches(&self, lowered: &str) -> bool {
		self.markers.iter().any(|marker| lowered.contains(marker))
	}
}

pub const URGENCY_RULE: KeywordRule = KeywordRule {
	words: &["urgent", "asap", "immediately", "quickly", "soon", "deadline"],
	points: 20,
};

pub const BUYING_INTENT_RULE: KeywordRule = KeywordRule {
	words: &["buy", "purchase", "price", "cost", "budget", "demo", "trial", "quote"],
	points: 15,
};

pub const BASE_QUALITY_SCORE: i64 = 50;

/// Seniority tiers in priority order. Only the first matching tier applies.
pub const DESIGNATION_TIERS: [MarkerBonus; 4] = [
	MarkerBonus { markers: &["ceo", "founder"], bonus: 30 },
	MarkerBonus { markers: &["director", "vp"], bonus: 25 },
	MarkerBonus { markers: &["manager"], bonus: 15 },
	MarkerBonus { markers: &["lead", "senior"], bonus: 10 },
];

pub const HIGH_VALUE_INDUSTRIES: MarkerBonus = MarkerBonus {
	markers: &["technology", "manufacturing", "automotive", "engineering"],
	bonus: 20,
};

pub const COMPANY_NAME_MARKERS: MarkerBonus =
	MarkerBonus { markers: &["tech", "systems", "solutions", "innovations"], bonus: 10 };

pub const POSITIVE_SENTIMENT_BONUS: i64 = 15;
pub const NEGATIVE_SENTIMENT_PENALTY: i64 = -10;

/// Lower bounds (inclusive) of each grade band, highest first. Scores below every band grade D.
pub const GRADE_BANDS: [(u8, Grade); 3] = [(80, Grade::A), (60, Grade::B), (40, Grade::C)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
	A,
	B,
	C,
	D,
}
impl Grade {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::A => "A",
			Self::B => "B",
			Self::C => "C",
			Self::D => "D",
		}
	}
}
impl fmt::Display for Grade {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

pub fn urgency_score(text: &str) -> u8 {
	URGENCY_RULE.score(text)
}

pub fn buying_intent_score(text: &str) -> u8 {
	BUYING_INTENT_RULE.score(text)
}

pub fn lead_quality_score(lead: &LeadRecord, sentiment: Option<&SentimentSignal>) -> u8 {
	let mut score = BASE_QUALITY_SCORE;
	let designation = lead.designation.to_lowercase();

	if let Some(tier) = DESIGNATION_TIERS.iter().find(|tier| tier.matches(&designation)) {
		score += tier.bonus;
	}
	if HIGH_VALUE_INDUSTRIES.matches(&lead.industry.to_lowercase()) {
		score += HIGH_VALUE_INDUSTRIES.bonus;
	}
	if COMPANY_NAME_MARKERS.matches(&lead.company.to_lowercase()) {
		score += COMPANY_NAME_MARKERS.bonus;
	}

	score += match sentiment.map(|signal| signal.sentiment) {
		Some(Sentiment::Positive) => POSITIVE_SENTIMENT_BONUS,
		Some(Sentiment::Negative) => NEGATIVE_SENTIMENT_PENALTY,
		Some(Sentiment::Neutral) | None => 0,
	};

	clamp_score(score)
}

pub fn lead_grade(score: u8) -> Grade {
	GRADE_BANDS
		.iter()
		.find(|(floor, _)| score >= *floor)
		.map(|(_, grade)| *grade)
		.unwrap_or(Grade::D)
}

fn clamp_score(raw: i64) -> u8 {
	raw.clamp(0, i64::from(MAX_SCORE)) as u8
}
