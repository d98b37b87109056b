use std::sync::{
	Arc, Mutex,
	atomic::{AtomicUsize, Ordering},
};

use serde_json::{Map, json};

use sdr_config::{
	Config, LanguageProviderConfig, Postgres, Providers as ProviderConfigs, Security, Service,
	Storage,
};
use time::macros::datetime;
use uuid::Uuid;

use sdr_domain::{Grade, IntentLabel, KeywordSet, LeadStatus, Sentiment, SentimentSignal};
use sdr_service::{
	Action, ActionResponse, AnalysisRequest, BoxFuture, BulkLeadRequest, BulkStatus, Error,
	IntentClassificationRequest, LanguageProvider, LeadInsightsRequest, LeadQualityRequest,
	LeadStore, Providers, RecordStore, Result, SdrService, SentimentAnalysisRequest, Stores,
};
use sdr_storage::models::{EmailAnalysisRecord, LeadQualityUpdate, LeadStatusUpdate};

struct StubLanguage {
	signal: Option<SentimentSignal>,
	keywords: Vec<String>,
	fail_on: Option<&'static str>,
	calls: AtomicUsize,
}
impl StubLanguage {
	fn new(signal: Option<SentimentSignal>, keywords: &[&str]) -> Self {
		Self {
			signal,
			keywords: keywords.iter().map(|k| k.to_string()).collect(),
			fail_on: None,
			calls: AtomicUsize::new(0),
		}
	}

	fn failing_on(mut self, marker: &'static str) -> Self {
		self.fail_on = Some(marker);

		self
	}

	fn count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	fn check(&self, texts: &[String]) -> Result<()> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		assert_eq!(texts.len(), 1, "Provider must be called with one text at a time.");

		match self.fail_on {
			Some(marker) if texts[0].contains(marker) =>
				Err(Error::Provider { message: "language service unavailable".to_string() }),
			_ => Ok(()),
		}
	}
}
impl LanguageProvider for StubLanguage {
	fn sentiment<'a>(
		&'a self,
		_cfg: &'a LanguageProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<SentimentSignal>>> {
		let result = self.check(texts).map(|_| self.signal.into_iter().collect());

		Box::pin(async move { result })
	}

	fn keywords<'a>(
		&'a self,
		_cfg: &'a LanguageProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<KeywordSet>>> {
		let result = self.check(texts).map(|_| vec![KeywordSet::new(self.keywords.clone())]);

		Box::pin(async move { result })
	}
}

#[derive(Default)]
struct SpyRecords {
	rows: Mutex<Vec<EmailAnalysisRecord>>,
}
impl SpyRecords {
	fn rows(&self) -> Vec<EmailAnalysisRecord> {
		self.rows.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl RecordStore for SpyRecords {
	fn insert_email_analysis<'a>(
		&'a self,
		record: &'a EmailAnalysisRecord,
	) -> BoxFuture<'a, Result<()>> {
		self.rows.lock().unwrap_or_else(|err| err.into_inner()).push(record.clone());

		Box::pin(async move { Ok(()) })
	}

	fn email_analyses_for<'a>(
		&'a self,
		lead_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<EmailAnalysisRecord>>> {
		let rows = self
			.rows()
			.into_iter()
			.filter(|row| row.lead_id.as_deref() == Some(lead_id))
			.collect();

		Box::pin(async move { Ok(rows) })
	}
}

#[derive(Default)]
struct SpyLeads {
	updates: Mutex<Vec<LeadQualityUpdate>>,
	statuses: Mutex<Vec<LeadStatusUpdate>>,
	fail: bool,
}
impl SpyLeads {
	fn failing() -> Self {
		Self { fail: true, ..Default::default() }
	}

	fn updates(&self) -> Vec<LeadQualityUpdate> {
		self.updates.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	fn statuses(&self) -> Vec<LeadStatusUpdate> {
		self.statuses.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl LeadStore for SpyLeads {
	fn update_lead_quality<'a>(
		&'a self,
		update: &'a LeadQualityUpdate,
	) -> BoxFuture<'a, Result<u64>> {
		let result = if self.fail {
			Err(Error::Storage { message: "connection reset".to_string() })
		} else {
			self.updates.lock().unwrap_or_else(|err| err.into_inner()).push(update.clone());

			Ok(1)
		};

		Box::pin(async move { result })
	}

	fn update_lead_status<'a>(
		&'a self,
		update: &'a LeadStatusUpdate,
	) -> BoxFuture<'a, Result<u64>> {
		let result = if self.fail {
			Err(Error::Storage { message: "connection reset".to_string() })
		} else {
			self.statuses.lock().unwrap_or_else(|err| err.into_inner()).push(update.clone());

			Ok(1)
		};

		Box::pin(async move { result })
	}
}

struct Harness {
	service: SdrService,
	language: Arc<StubLanguage>,
	records: Arc<SpyRecords>,
	leads: Arc<SpyLeads>,
}

fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage {
			postgres: Postgres {
				dsn: "postgres://postgres@127.0.0.1:1/unused".to_string(),
				pool_max_conns: 1,
			},
		},
		providers: ProviderConfigs {
			language: LanguageProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				sentiment_path: "/sentiment".to_string(),
				keyword_path: "/keywords".to_string(),
				model: "test".to_string(),
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		security: Security { bind_localhost_only: true },
	}
}

fn harness_with(language: StubLanguage, leads: SpyLeads) -> Harness {
	let language = Arc::new(language);
	let records = Arc::new(SpyRecords::default());
	let leads = Arc::new(leads);
	let service = SdrService::with_collaborators(
		test_config(),
		Providers::new(language.clone()),
		Stores::new(records.clone(), leads.clone()),
	);

	Harness { service, language, records, leads }
}

fn harness(language: StubLanguage) -> Harness {
	harness_with(language, SpyLeads::default())
}

fn positive() -> Option<SentimentSignal> {
	Some(SentimentSignal::new(Sentiment::Positive, 0.85))
}

#[tokio::test]
async fn sentiment_analysis_scores_and_stores_text() {
	let h = harness(StubLanguage::new(positive(), &["quote", "deadline"]));
	let response = h
		.service
		.advanced_sentiment_analysis(SentimentAnalysisRequest {
			text: "Need a quote ASAP before our deadline".to_string(),
			lead_id: Some("lead-9".to_string()),
		})
		.await
		.expect("Sentiment analysis failed.");

	assert!(response.success);
	assert_eq!(response.sentiment, Some(Sentiment::Positive));
	assert_eq!(response.confidence, Some(0.85));
	assert_eq!(response.urgency_score, 40);
	assert_eq!(response.buying_intent, 15);
	assert_eq!(response.keywords, vec!["quote".to_string(), "deadline".to_string()]);

	let rows = h.records.rows();

	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].lead_id.as_deref(), Some("lead-9"));
	assert_eq!(rows[0].sentiment, "positive");
	assert_eq!(rows[0].keywords, "quote,deadline");
	assert_eq!(rows[0].urgency_score, Some(40));
	assert_eq!(rows[0].buying_intent, Some(15));
	assert_eq!(rows[0].classified_intent, None);
	assert_eq!(h.language.count(), 2);
}

#[tokio::test]
async fn sentiment_analysis_tolerates_empty_provider_results() {
	let h = harness(StubLanguage::new(None, &[]));
	let response = h
		.service
		.advanced_sentiment_analysis(SentimentAnalysisRequest::default())
		.await
		.expect("Sentiment analysis failed.");

	assert_eq!(response.sentiment, None);
	assert_eq!(response.confidence, None);
	assert_eq!(response.urgency_score, 0);
	assert!(response.keywords.is_empty());

	let rows = h.records.rows();

	assert_eq!(rows[0].sentiment, "neutral");
	assert_eq!(rows[0].confidence, 0.0);
	assert_eq!(rows[0].keywords, "");
}

#[tokio::test]
async fn lead_quality_prediction_updates_crm() {
	let h = harness(StubLanguage::new(positive(), &["ceo"]));
	let lead = serde_json::from_value(json!({
		"lead_id": "row-17",
		"Company": "Acme Tech",
		"Industry": "Technology",
		"Designation": "CEO"
	}))
	.expect("Failed to parse lead.");
	let response = h
		.service
		.lead_quality_prediction(LeadQualityRequest { lead_data: lead })
		.await
		.expect("Lead quality prediction failed.");

	assert_eq!(response.lead_id.as_deref(), Some("row-17"));
	assert_eq!(response.quality_score, 100);
	assert_eq!(response.grade, Grade::A);

	let updates = h.leads.updates();

	assert_eq!(updates.len(), 1);
	assert_eq!(updates[0].lead_id, "row-17");
	assert_eq!(updates[0].quality_score, 100);
	assert_eq!(updates[0].grade, "A");
	assert!(h.records.rows().is_empty());
}

#[tokio::test]
async fn lead_quality_without_id_skips_crm() {
	let h = harness(StubLanguage::new(Some(SentimentSignal::new(Sentiment::Negative, 0.6)), &[]));
	let response = h
		.service
		.lead_quality_prediction(LeadQualityRequest::default())
		.await
		.expect("Lead quality prediction failed.");

	assert_eq!(response.lead_id, None);
	assert_eq!(response.quality_score, 40);
	assert_eq!(response.grade, Grade::C);
	assert!(h.leads.updates().is_empty());
}

#[tokio::test]
async fn crm_failure_surfaces_as_error() {
	let h = harness_with(StubLanguage::new(positive(), &[]), SpyLeads::failing());
	let lead = serde_json::from_value(json!({ "lead_id": "row-1" })).expect("Failed to parse lead.");
	let err = h
		.service
		.lead_quality_prediction(LeadQualityRequest { lead_data: lead })
		.await
		.expect_err("Expected storage error.");

	assert!(matches!(err, Error::Storage { .. }), "Unexpected error: {err}");
}

#[tokio::test]
async fn intent_classification_stores_label_and_action() {
	let h = harness(StubLanguage::new(positive(), &["demo"]));
	let response = h
		.service
		.email_intent_classification(IntentClassificationRequest {
			email_body: "I'd like to schedule a demo next week.".to_string(),
			lead_id: Some("lead-3".to_string()),
		})
		.await
		.expect("Intent classification failed.");

	assert_eq!(response.intent, IntentLabel::PositiveInterest);
	assert_eq!(response.confidence, 0.85);
	assert_eq!(response.recommended_action, "Schedule demo call");

	let rows = h.records.rows();

	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].classified_intent.as_deref(), Some("POSITIVE_INTEREST"));
	assert_eq!(rows[0].intent_confidence, Some(0.85));
	assert_eq!(rows[0].urgency_score, None);
	assert_eq!(response.lead_status, LeadStatus::Qualified);
	assert_eq!(response.actions, vec!["Qualified Lead".to_string(), "Create Deal".to_string()]);

	let statuses = h.leads.statuses();

	assert_eq!(statuses.len(), 1);
	assert_eq!(statuses[0].lead_id, "lead-3");
	assert_eq!(statuses[0].status, "Qualified");
	assert_eq!(statuses[0].intent, "POSITIVE_INTEREST");
}

#[tokio::test]
async fn confident_negative_reply_is_escalated() {
	let h = harness(StubLanguage::new(Some(SentimentSignal::new(Sentiment::Negative, 0.95)), &[]));
	let response = h
		.service
		.email_intent_classification(IntentClassificationRequest {
			email_body: "Why do you keep emailing me?".to_string(),
			lead_id: None,
		})
		.await
		.expect("Intent classification failed.");

	assert_eq!(response.intent, IntentLabel::Complaint);
	assert_eq!(response.recommended_action, "Escalate to support team");
	assert_eq!(response.lead_status, LeadStatus::Blocked);
	assert_eq!(response.actions, vec!["Block Lead".to_string(), "Notify Admin".to_string()]);
	assert!(h.leads.statuses().is_empty());
}

#[tokio::test]
async fn bulk_isolates_malformed_leads() {
	let h = harness(StubLanguage::new(positive(), &[]));
	let req: BulkLeadRequest = serde_json::from_value(json!({
		"leads": [
			{ "lead_id": "a", "Company": "Acme Systems", "Designation": "Engineering Manager" },
			{ "lead_id": "b", "Company": 42 },
			{ "Company": "Nameless Co" }
		]
	}))
	.expect("Failed to parse bulk request.");
	let response = h.service.bulk_lead_analysis(req).await.expect("Bulk analysis failed.");

	assert!(response.success);
	assert_eq!(response.processed, 3);
	assert_eq!(response.failed, 1);
	assert_eq!(response.results[0].status, BulkStatus::Processed);
	assert_eq!(response.results[0].quality_score, Some(90));
	assert_eq!(response.results[1].status, BulkStatus::Error);
	assert_eq!(response.results[1].lead_id.as_deref(), Some("b"));
	assert!(
		response.results[1].error.as_deref().unwrap_or_default().contains("Malformed lead"),
		"Unexpected error: {:?}",
		response.results[1].error
	);
	assert_eq!(response.results[2].status, BulkStatus::Processed);
	assert_eq!(response.results[2].lead_id, None);

	let updates = h.leads.updates();

	assert_eq!(updates.len(), 1);
	assert_eq!(updates[0].lead_id, "a");
}

#[tokio::test]
async fn bulk_isolates_provider_failures() {
	let h = harness(StubLanguage::new(positive(), &[]).failing_on("Broken"));
	let req: BulkLeadRequest = serde_json::from_value(json!({
		"leads": [
			{ "lead_id": 1, "Company": "Broken Inc" },
			{ "lead_id": 2, "Company": "Working Inc" }
		]
	}))
	.expect("Failed to parse bulk request.");
	let response = h.service.bulk_lead_analysis(req).await.expect("Bulk analysis failed.");

	assert_eq!(response.processed, 2);
	assert_eq!(response.failed, 1);
	assert_eq!(response.results[0].lead_id.as_deref(), Some("1"));
	assert_eq!(response.results[0].status, BulkStatus::Error);
	assert_eq!(response.results[1].status, BulkStatus::Processed);

	let serialized = serde_json::to_value(&response).expect("Failed to serialize response.");

	assert_eq!(serialized["results"][0]["status"], "error");
	assert!(serialized["results"][0].get("quality_score").is_none());
	assert_eq!(serialized["results"][1]["status"], "processed");
	assert!(serialized["results"][1].get("error").is_none());
}

#[tokio::test]
async fn dispatch_rejects_unknown_action_without_side_effects() {
	let h = harness(StubLanguage::new(positive(), &[]));
	let err = h
		.service
		.dispatch(AnalysisRequest {
			action: "delete_everything".to_string(),
			data: json!({ "text": "hi" }),
		})
		.await
		.expect_err("Expected invalid action.");

	assert!(matches!(err, Error::InvalidAction { ref action } if action == "delete_everything"));
	assert_eq!(h.language.count(), 0);
	assert!(h.records.rows().is_empty());
	assert!(h.leads.updates().is_empty());
}

#[tokio::test]
async fn dispatch_routes_each_action() {
	let h = harness(StubLanguage::new(positive(), &[]));

	for action in Action::ALL {
		let response = h
			.service
			.dispatch(AnalysisRequest { action: action.as_str().to_string(), data: json!({}) })
			.await
			.expect("Dispatch failed.");
		let matched = matches!(
			(action, &response),
			(Action::AdvancedSentimentAnalysis, ActionResponse::Sentiment(_))
				| (Action::LeadQualityPrediction, ActionResponse::LeadQuality(_))
				| (Action::EmailIntentClassification, ActionResponse::Intent(_))
				| (Action::BulkLeadAnalysis, ActionResponse::Bulk(_))
		);

		assert!(matched, "{action:?} routed to {response:?}");
	}
}

#[tokio::test]
async fn dispatch_reports_mistyped_payload() {
	let h = harness(StubLanguage::new(positive(), &[]));
	let err = h
		.service
		.dispatch(AnalysisRequest {
			action: "bulk_lead_analysis".to_string(),
			data: json!({ "leads": "not a list" }),
		})
		.await
		.expect_err("Expected payload error.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err}");
	assert_eq!(h.language.count(), 0);
}

#[tokio::test]
async fn numeric_lead_ids_are_accepted_by_every_flow() {
	let h = harness(StubLanguage::new(positive(), &[]));
	let sentiment = h
		.service
		.dispatch(AnalysisRequest {
			action: "advanced_sentiment_analysis".to_string(),
			data: json!({ "text": "Send the price list", "lead_id": 42 }),
		})
		.await
		.expect("Sentiment dispatch failed.");
	let intent = h
		.service
		.dispatch(AnalysisRequest {
			action: "email_intent_classification".to_string(),
			data: json!({ "email_body": "Unsubscribe me", "lead_id": 42 }),
		})
		.await
		.expect("Intent dispatch failed.");

	assert!(matches!(sentiment, ActionResponse::Sentiment(_)));
	assert!(matches!(intent, ActionResponse::Intent(_)));

	let rows = h.records.rows();

	assert_eq!(rows.len(), 2);
	assert!(rows.iter().all(|row| row.lead_id.as_deref() == Some("42")));

	let statuses = h.leads.statuses();

	assert_eq!(statuses.len(), 1);
	assert_eq!(statuses[0].lead_id, "42");
	assert_eq!(statuses[0].status, "Suppressed");
}

#[test]
fn blank_lead_ids_read_as_missing() {
	let req: IntentClassificationRequest =
		serde_json::from_value(json!({ "email_body": "hi", "lead_id": "  " }))
			.expect("Failed to parse request.");

	assert_eq!(req.lead_id, None);

	let req: SentimentAnalysisRequest =
		serde_json::from_value(json!({ "text": "hi", "lead_id": null }))
			.expect("Failed to parse request.");

	assert_eq!(req.lead_id, None);
}

#[tokio::test]
async fn crm_status_failure_surfaces_as_error() {
	let h = harness_with(StubLanguage::new(positive(), &[]), SpyLeads::failing());
	let err = h
		.service
		.email_intent_classification(IntentClassificationRequest {
			email_body: "Not interested".to_string(),
			lead_id: Some("row-5".to_string()),
		})
		.await
		.expect_err("Expected storage error.");

	assert!(matches!(err, Error::Storage { .. }), "Unexpected error: {err}");
}

fn stored_row(
	lead_id: &str,
	intent: Option<&str>,
	created_at: time::OffsetDateTime,
) -> EmailAnalysisRecord {
	EmailAnalysisRecord {
		analysis_id: Uuid::new_v4(),
		lead_id: Some(lead_id.to_string()),
		source_text: "text".to_string(),
		sentiment: "neutral".to_string(),
		confidence: 0.5,
		keywords: "pricing,features".to_string(),
		urgency_score: None,
		buying_intent: None,
		classified_intent: intent.map(str::to_string),
		intent_confidence: intent.map(|_| 0.7),
		created_at,
	}
}

#[tokio::test]
async fn lead_insights_report_history_and_latest_intent() {
	let h = harness(StubLanguage::new(positive(), &[]));

	for row in [
		stored_row("lead-8", Some("NEED_MORE_INFO"), datetime!(2026-01-01 10:00 UTC)),
		stored_row("lead-8", Some("POSITIVE_INTEREST"), datetime!(2026-01-02 10:00 UTC)),
		stored_row("lead-8", None, datetime!(2026-01-03 10:00 UTC)),
		stored_row("other", Some("UNSUBSCRIBE"), datetime!(2026-01-04 10:00 UTC)),
	] {
		h.records.insert_email_analysis(&row).await.expect("Failed to seed records.");
	}

	let response = h
		.service
		.lead_insights(LeadInsightsRequest { lead_id: Some("lead-8".to_string()) })
		.await
		.expect("Lead insights failed.");

	assert_eq!(response.lead_id, "lead-8");
	assert_eq!(response.analysis_count, 3);
	assert_eq!(response.latest_intent, Some(IntentLabel::PositiveInterest));
	assert_eq!(response.lead_status, Some(LeadStatus::Qualified));
	assert_eq!(response.analyses[0].keywords, vec!["pricing".to_string(), "features".to_string()]);

	let serialized = serde_json::to_value(&response).expect("Failed to serialize response.");

	assert_eq!(serialized["analyses"][0]["created_at"], "2026-01-01T10:00:00Z");
	assert_eq!(h.language.count(), 0);
}

#[tokio::test]
async fn lead_insights_without_history_are_empty() {
	let h = harness(StubLanguage::new(positive(), &[]));
	let response = h
		.service
		.lead_insights(LeadInsightsRequest { lead_id: Some("fresh".to_string()) })
		.await
		.expect("Lead insights failed.");

	assert_eq!(response.analysis_count, 0);
	assert_eq!(response.latest_intent, None);
	assert_eq!(response.lead_status, None);
}

#[tokio::test]
async fn lead_insights_require_an_id() {
	let h = harness(StubLanguage::new(positive(), &[]));
	let err = h
		.service
		.lead_insights(LeadInsightsRequest { lead_id: Some(" ".to_string()) })
		.await
		.expect_err("Expected missing id.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err}");
}
