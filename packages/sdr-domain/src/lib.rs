pub mod intent;
pub mod lead;
pub mod scoring;
pub mod signal;

pub use intent::{IntentLabel, LeadStatus, UnknownIntentLabel};
pub use lead::LeadRecord;
pub use scoring::Grade;
pub use signal::{KeywordSet, Sentiment, SentimentSignal};
