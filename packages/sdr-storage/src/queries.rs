use crate::{
	Error, Result,
	db::Db,
	models::{EmailAnalysisRecord, LeadQualityUpdate, LeadStatusUpdate},
};

pub async fn insert_email_analysis(db: &Db, record: &EmailAnalysisRecord) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO email_analysis (
	analysis_id,
	lead_id,
	source_text,
	sentiment,
	confidence,
	keywords,
	urgency_score,
	buying_intent,
	classified_intent,
	intent_confidence,
	created_at
)
VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)",
	)
	.bind(record.analysis_id)
	.bind(record.lead_id.as_deref())
	.bind(record.source_text.as_str())
	.bind(record.sentiment.as_str())
	.bind(record.confidence)
	.bind(record.keywords.as_str())
	.bind(record.urgency_score)
	.bind(record.buying_intent)
	.bind(record.classified_intent.as_deref())
	.bind(record.intent_confidence)
	.bind(record.created_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

/// Writes score, grade and prediction time onto the CRM lead row. Returns the number of rows
/// touched, which is zero when the CRM has no such lead.
pub async fn update_lead_quality(db: &Db, update: &LeadQualityUpdate) -> Result<u64> {
	if update.lead_id.trim().is_empty() {
		return Err(Error::InvalidArgument("lead_id must be non-empty.".to_string()));
	}
	if !(0..=100).contains(&update.quality_score) {
		return Err(Error::InvalidArgument("quality_score must be within 0-100.".to_string()));
	}

	let result = sqlx::query(
		"\
UPDATE leads
SET
	ai_quality_score = $1,
	lead_grade = $2,
	ai_prediction_date = $3
WHERE rowid = $4",
	)
	.bind(update.quality_score)
	.bind(update.grade.as_str())
	.bind(update.predicted_at)
	.bind(update.lead_id.as_str())
	.execute(&db.pool)
	.await?;

	Ok(result.rows_affected())
}

pub async fn update_lead_status(db: &Db, update: &LeadStatusUpdate) -> Result<u64> {
	if update.lead_id.trim().is_empty() {
		return Err(Error::InvalidArgument("lead_id must be non-empty.".to_string()));
	}

	let result = sqlx::query(
		"\
UPDATE leads
SET
	lead_status = $1,
	ai_intent = $2
WHERE rowid = $3",
	)
	.bind(update.status.as_str())
	.bind(update.intent.as_str())
	.bind(update.lead_id.as_str())
	.execute(&db.pool)
	.await?;

	Ok(result.rows_affected())
}

/// Analysis history for one lead, oldest first.
pub async fn fetch_email_analysis(db: &Db, lead_id: &str) -> Result<Vec<EmailAnalysisRecord>> {
	let rows = sqlx::query_as::<_, EmailAnalysisRecord>(
		"\
SELECT *
FROM email_analysis
WHERE lead_id = $1
ORDER BY created_at ASC",
	)
	.bind(lead_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}
