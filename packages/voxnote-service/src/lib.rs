pub mod analyze;
pub mod billing;
pub mod create_note;
pub mod delete;
pub mod list;
pub mod transcribe;
pub mod update;
pub mod upload;

mod error;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin, sync::Arc};

use tokio_util::sync::CancellationToken;

pub use analyze::{AnalyzeRequest, AnalyzeResponse, DEFAULT_TAG};
pub use billing::{SubscriptionUpdate, SubscriptionUpdateResponse};
pub use create_note::{CreateNoteRequest, NoteView};
pub use delete::{DeleteNoteRequest, DeleteNoteResponse};
pub use list::ListNotesResponse;
pub use transcribe::{TranscribeRequest, TranscribeResponse};
pub use update::UpdateNoteRequest;
pub use upload::UploadAudioResponse;

use voxnote_config::{
	Config, IdentityProviderConfig, LlmProviderConfig, Retry, TranscriptionProviderConfig,
};
use voxnote_providers::{
	identity::{self, Identity},
	summarizer::{self, CompletionOptions},
	transcription,
};
use voxnote_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait IdentityProvider
where
	Self: Send + Sync,
{
	fn verify<'a>(
		&'a self,
		cfg: &'a IdentityProviderConfig,
		token: &'a str,
	) -> BoxFuture<'a, voxnote_providers::Result<Identity>>;
}

pub trait TranscriptionProvider
where
	Self: Send + Sync,
{
	fn upload<'a>(
		&'a self,
		cfg: &'a TranscriptionProviderConfig,
		retry: &'a Retry,
		content_type: &'a str,
		bytes: Vec<u8>,
	) -> BoxFuture<'a, voxnote_providers::Result<String>>;

	fn transcribe<'a>(
		&'a self,
		cfg: &'a TranscriptionProviderConfig,
		audio_url: &'a str,
		cancel: &'a CancellationToken,
	) -> BoxFuture<'a, voxnote_providers::Result<String>>;
}

pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		retry: &'a Retry,
		prompt: &'a str,
		opts: CompletionOptions,
	) -> BoxFuture<'a, voxnote_providers::Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub identity: Arc<dyn IdentityProvider>,
	pub transcription: Arc<dyn TranscriptionProvider>,
	pub completion: Arc<dyn CompletionProvider>,
}
impl Providers {
	pub fn http() -> Self {
		Self {
			identity: Arc::new(HttpIdentityProvider),
			transcription: Arc::new(HttpTranscriptionProvider),
			completion: Arc::new(HttpCompletionProvider),
		}
	}
}

struct HttpIdentityProvider;
impl IdentityProvider for HttpIdentityProvider {
	fn verify<'a>(
		&'a self,
		cfg: &'a IdentityProviderConfig,
		token: &'a str,
	) -> BoxFuture<'a, voxnote_providers::Result<Identity>> {
		Box::pin(identity::verify(cfg, token))
	}
}

struct HttpTranscriptionProvider;
impl TranscriptionProvider for HttpTranscriptionProvider {
	fn upload<'a>(
		&'a self,
		cfg: &'a TranscriptionProviderConfig,
		retry: &'a Retry,
		content_type: &'a str,
		bytes: Vec<u8>,
	) -> BoxFuture<'a, voxnote_providers::Result<String>> {
		Box::pin(transcription::upload(cfg, retry, content_type, bytes))
	}

	fn transcribe<'a>(
		&'a self,
		cfg: &'a TranscriptionProviderConfig,
		audio_url: &'a str,
		cancel: &'a CancellationToken,
	) -> BoxFuture<'a, voxnote_providers::Result<String>> {
		Box::pin(transcription::transcribe(cfg, audio_url, cancel))
	}
}

struct HttpCompletionProvider;
impl CompletionProvider for HttpCompletionProvider {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		retry: &'a Retry,
		prompt: &'a str,
		opts: CompletionOptions,
	) -> BoxFuture<'a, voxnote_providers::Result<String>> {
		Box::pin(summarizer::complete(cfg, retry, prompt, opts))
	}
}

pub struct NoteService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
}
impl NoteService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self::with_providers(cfg, db, Providers::http())
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		Self { cfg, db, providers }
	}

	/// Resolves a bearer credential to a verified identity. Every protected operation starts
	/// here, before any other work is done.
	pub(crate) async fn authenticate(&self, bearer: &str) -> Result<Identity> {
		let token = bearer.trim();

		if token.is_empty() {
			return Err(Error::Unauthorized { message: "Missing bearer credential.".to_string() });
		}

		let identity = self
			.providers
			.identity
			.verify(&self.cfg.providers.identity, token)
			.await
			.map_err(Error::from)?;

		Ok(identity)
	}
}
