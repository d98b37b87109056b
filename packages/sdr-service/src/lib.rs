pub mod bulk;
pub mod dispatch;
pub mod insights;
pub mod intent;
pub mod lead_quality;
pub mod sentiment;

mod error;

pub use bulk::{BulkLeadRequest, BulkLeadResponse, BulkLeadResult, BulkStatus};
pub use dispatch::{Action, ActionResponse, AnalysisRequest};
pub use error::{Error, Result};
pub use insights::{AnalysisEntry, LeadInsightsRequest, LeadInsightsResponse};
pub use intent::{IntentClassificationRequest, IntentClassificationResponse};
pub use lead_quality::{LeadQualityRequest, LeadQualityResponse};
pub use sentiment::{SentimentAnalysisRequest, SentimentAnalysisResponse};

use std::{future::Future, pin::Pin, sync::Arc};

use sdr_config::{Config, LanguageProviderConfig};
use sdr_domain::{KeywordSet, SentimentSignal};
use sdr_storage::{
	db::Db,
	models::{EmailAnalysisRecord, LeadQualityUpdate, LeadStatusUpdate},
	queries,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Hosted sentiment and keyword extraction. Results are positional: item `i` belongs to
/// `texts[i]`, and either list may come back shorter than the input.
pub trait LanguageProvider
where
	Self: Send + Sync,
{
	fn sentiment<'a>(
		&'a self,
		cfg: &'a LanguageProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<SentimentSignal>>>;

	fn keywords<'a>(
		&'a self,
		cfg: &'a LanguageProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<KeywordSet>>>;
}

/// Append-only store for analysis records.
pub trait RecordStore
where
	Self: Send + Sync,
{
	fn insert_email_analysis<'a>(
		&'a self,
		record: &'a EmailAnalysisRecord,
	) -> BoxFuture<'a, Result<()>>;

	/// Every record stored for `lead_id`, oldest first.
	fn email_analyses_for<'a>(
		&'a self,
		lead_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<EmailAnalysisRecord>>>;
}

/// CRM lead writer. Returns how many lead rows the update touched.
pub trait LeadStore
where
	Self: Send + Sync,
{
	fn update_lead_quality<'a>(
		&'a self,
		update: &'a LeadQualityUpdate,
	) -> BoxFuture<'a, Result<u64>>;

	fn update_lead_status<'a>(
		&'a self,
		update: &'a LeadStatusUpdate,
	) -> BoxFuture<'a, Result<u64>>;
}

#[derive(Clone)]
pub struct Providers {
	pub language: Arc<dyn LanguageProvider>,
}

#[derive(Clone)]
pub struct Stores {
	pub records: Arc<dyn RecordStore>,
	pub leads: Arc<dyn LeadStore>,
}

pub struct SdrService {
	pub cfg: Config,
	pub providers: Providers,
	pub stores: Stores,
}

struct DefaultProviders;

impl LanguageProvider for DefaultProviders {
	fn sentiment<'a>(
		&'a self,
		cfg: &'a LanguageProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<SentimentSignal>>> {
		Box::pin(async move { Ok(sdr_providers::sentiment::sentiment(cfg, texts).await?) })
	}

	fn keywords<'a>(
		&'a self,
		cfg: &'a LanguageProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<KeywordSet>>> {
		Box::pin(async move { Ok(sdr_providers::keywords::keywords(cfg, texts).await?) })
	}
}

impl RecordStore for Db {
	fn insert_email_analysis<'a>(
		&'a self,
		record: &'a EmailAnalysisRecord,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(queries::insert_email_analysis(self, record).await?) })
	}

	fn email_analyses_for<'a>(
		&'a self,
		lead_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<EmailAnalysisRecord>>> {
		Box::pin(async move { Ok(queries::fetch_email_analysis(self, lead_id).await?) })
	}
}

impl LeadStore for Db {
	fn update_lead_quality<'a>(
		&'a self,
		update: &'a LeadQualityUpdate,
	) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move { Ok(queries::update_lead_quality(self, update).await?) })
	}

	fn update_lead_status<'a>(
		&'a self,
		update: &'a LeadStatusUpdate,
	) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move { Ok(queries::update_lead_status(self, update).await?) })
	}
}

impl Providers {
	pub fn new(language: Arc<dyn LanguageProvider>) -> Self {
		Self { language }
	}
}

impl Default for Providers {
	fn default() -> Self {
		Self { language: Arc::new(DefaultProviders) }
	}
}

impl Stores {
	pub fn new(records: Arc<dyn RecordStore>, leads: Arc<dyn LeadStore>) -> Self {
		Self { records, leads }
	}

	/// Both stores backed by the same Postgres pool.
	pub fn postgres(db: Db) -> Self {
		let db = Arc::new(db);

		Self { records: db.clone(), leads: db }
	}
}

impl SdrService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, providers: Providers::default(), stores: Stores::postgres(db) }
	}

	pub fn with_collaborators(cfg: Config, providers: Providers, stores: Stores) -> Self {
		Self { cfg, providers, stores }
	}

	/// Sentiment for a single text; `None` when the provider returned nothing for it.
	pub(crate) async fn sentiment_for(&self, text: &str) -> Result<Option<SentimentSignal>> {
		let texts = [text.to_string()];
		let signals =
			self.providers.language.sentiment(&self.cfg.providers.language, &texts).await?;

		Ok(signals.into_iter().next())
	}

	/// Keywords for a single text; empty when the provider returned nothing for it.
	pub(crate) async fn keywords_for(&self, text: &str) -> Result<KeywordSet> {
		let texts = [text.to_string()];
		let sets = self.providers.language.keywords(&self.cfg.providers.language, &texts).await?;

		Ok(sets.into_iter().next().unwrap_or_default())
	}
}
