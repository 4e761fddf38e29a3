//! Quota-gate acceptance tests. These need a real Postgres because the gate is a single
//! conditional UPDATE; set VOXNOTE_PG_DSN to run them.

use std::sync::Arc;

use serde_json::Map;
use uuid::Uuid;

use voxnote_config::{
	Billing, Config, IdentityProviderConfig, LlmProviderConfig, Postgres, Quota, Retry, Security,
	Service, Storage, TranscriptionProviderConfig, Upload,
};
use voxnote_providers::identity::Identity;
use voxnote_service::{
	BoxFuture, CreateNoteRequest, DeleteNoteRequest, Error, IdentityProvider, NoteService,
	Providers, SubscriptionUpdate,
};
use voxnote_storage::{db::Db, queries};
use voxnote_testkit::TestDatabase;

const FREE_NOTE_LIMIT: i64 = 3;

fn test_config(dsn: String) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			admin_bind: "127.0.0.1:0".to_string(),
			public_url: "https://files.voxnote.test/audio".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage { postgres: Postgres { dsn, pool_max_conns: 2 } },
		providers: voxnote_config::Providers {
			transcription: TranscriptionProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				upload_path: "/v2/upload".to_string(),
				transcript_path: "/v2/transcript".to_string(),
				timeout_ms: 1_000,
				poll_interval_ms: 10,
				max_poll_attempts: 3,
				default_headers: Map::new(),
			},
			llm: LlmProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/chat/completions".to_string(),
				model: "test-model".to_string(),
				temperature: 0.7,
				tag_temperature: 0.2,
				tag_max_tokens: 8,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			identity: IdentityProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/user".to_string(),
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			retry: Retry { max_attempts: 1, base_delay_ms: 1 },
		},
		quota: Quota { free_note_limit: FREE_NOTE_LIMIT },
		upload: Upload { max_upload_bytes: 1_024 },
		billing: Billing { webhook_secret: "whsec_test".to_string() },
		security: Security { bind_localhost_only: true },
	}
}

struct StaticIdentity {
	identity: Identity,
}
impl IdentityProvider for StaticIdentity {
	fn verify<'a>(
		&'a self,
		_cfg: &'a IdentityProviderConfig,
		_token: &'a str,
	) -> BoxFuture<'a, voxnote_providers::Result<Identity>> {
		let identity = self.identity.clone();

		Box::pin(async move { Ok(identity) })
	}
}

struct UnusedTranscription;
impl voxnote_service::TranscriptionProvider for UnusedTranscription {
	fn upload<'a>(
		&'a self,
		_cfg: &'a TranscriptionProviderConfig,
		_retry: &'a Retry,
		_content_type: &'a str,
		_bytes: Vec<u8>,
	) -> BoxFuture<'a, voxnote_providers::Result<String>> {
		Box::pin(async move {
			Err(voxnote_providers::Error::InvalidResponse {
				message: "Not under test.".to_string(),
			})
		})
	}

	fn transcribe<'a>(
		&'a self,
		_cfg: &'a TranscriptionProviderConfig,
		_audio_url: &'a str,
		_cancel: &'a tokio_util::sync::CancellationToken,
	) -> BoxFuture<'a, voxnote_providers::Result<String>> {
		Box::pin(async move {
			Err(voxnote_providers::Error::InvalidResponse {
				message: "Not under test.".to_string(),
			})
		})
	}
}

struct UnusedCompletion;
impl voxnote_service::CompletionProvider for UnusedCompletion {
	fn complete<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_retry: &'a Retry,
		_prompt: &'a str,
		_opts: voxnote_providers::summarizer::CompletionOptions,
	) -> BoxFuture<'a, voxnote_providers::Result<String>> {
		Box::pin(async move {
			Err(voxnote_providers::Error::InvalidResponse {
				message: "Not under test.".to_string(),
			})
		})
	}
}

fn service_as(dsn: &str, identity: Identity) -> NoteService {
	let cfg = test_config(dsn.to_string());
	let db = Db::connect_lazy(&cfg.storage.postgres).expect("Failed to build pool.");
	let providers = Providers {
		identity: Arc::new(StaticIdentity { identity }),
		transcription: Arc::new(UnusedTranscription),
		completion: Arc::new(UnusedCompletion),
	};

	NoteService::with_providers(cfg, db, providers)
}

fn note_request(title: &str) -> CreateNoteRequest {
	CreateNoteRequest {
		title: title.to_string(),
		content: "Some transcript content.".to_string(),
		summary: Some("- a point".to_string()),
		tag: Some("General".to_string()),
	}
}

async fn bootstrap(test_db: &TestDatabase) -> Db {
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	db
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set VOXNOTE_PG_DSN to run."]
async fn free_user_hits_the_limit_exactly() {
	let Some(base_dsn) = voxnote_testkit::env_dsn() else {
		eprintln!("Skipping free_user_hits_the_limit_exactly; set VOXNOTE_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let user_id = Uuid::new_v4();
	let service = service_as(test_db.dsn(), Identity { user_id, role: "user".to_string() });

	for ordinal in 1..=FREE_NOTE_LIMIT {
		service
			.create_note("bearer-token", note_request(&format!("Note {ordinal}")))
			.await
			.unwrap_or_else(|err| panic!("Note {ordinal} should be within quota: {err:?}"));
	}

	let err = service
		.create_note("bearer-token", note_request("One too many"))
		.await
		.expect_err("Expected the quota gate to refuse.");

	assert!(matches!(err, Error::QuotaExceeded { limit } if limit == FREE_NOTE_LIMIT));

	let profile = queries::fetch_profile(&db, user_id)
		.await
		.expect("Failed to fetch profile.")
		.expect("Profile must exist after gated creations.");

	assert_eq!(profile.free_notes_count, FREE_NOTE_LIMIT);

	let notes = queries::list_notes(&db, user_id).await.expect("Failed to list notes.");

	assert_eq!(notes.len(), FREE_NOTE_LIMIT as usize);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set VOXNOTE_PG_DSN to run."]
async fn admin_and_subscriber_bypass_the_counter() {
	let Some(base_dsn) = voxnote_testkit::env_dsn() else {
		eprintln!("Skipping admin_and_subscriber_bypass_the_counter; set VOXNOTE_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	let admin_id = Uuid::new_v4();
	let admin = service_as(test_db.dsn(), Identity { user_id: admin_id, role: "admin".to_string() });

	for ordinal in 1..=(FREE_NOTE_LIMIT + 2) {
		admin
			.create_note("bearer-token", note_request(&format!("Admin note {ordinal}")))
			.await
			.expect("Admin notes must never be gated.");
	}

	assert!(
		queries::fetch_profile(&db, admin_id)
			.await
			.expect("Failed to fetch profile.")
			.is_none(),
		"Admin creations must not touch the quota table."
	);

	let subscriber_id = Uuid::new_v4();
	let subscriber =
		service_as(test_db.dsn(), Identity { user_id: subscriber_id, role: "user".to_string() });

	subscriber
		.apply_subscription_update(SubscriptionUpdate {
			user_id: subscriber_id,
			subscription_status: "active".to_string(),
		})
		.await
		.expect("Failed to record subscription.");

	for ordinal in 1..=(FREE_NOTE_LIMIT + 2) {
		subscriber
			.create_note("bearer-token", note_request(&format!("Subscriber note {ordinal}")))
			.await
			.expect("Subscriber notes must never be gated.");
	}

	let profile = queries::fetch_profile(&db, subscriber_id)
		.await
		.expect("Failed to fetch profile.")
		.expect("Profile row was created by the webhook path.");

	assert_eq!(profile.free_notes_count, 0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set VOXNOTE_PG_DSN to run."]
async fn delete_honors_ownership_and_admin_override() {
	let Some(base_dsn) = voxnote_testkit::env_dsn() else {
		eprintln!("Skipping delete_honors_ownership_and_admin_override; set VOXNOTE_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let _db = bootstrap(&test_db).await;

	let owner_id = Uuid::new_v4();
	let owner = service_as(test_db.dsn(), Identity { user_id: owner_id, role: "user".to_string() });
	let first = owner
		.create_note("bearer-token", note_request("Owned note"))
		.await
		.expect("Failed to create note.");
	let second = owner
		.create_note("bearer-token", note_request("Second owned note"))
		.await
		.expect("Failed to create note.");

	let stranger =
		service_as(test_db.dsn(), Identity { user_id: Uuid::new_v4(), role: "user".to_string() });
	let err = stranger
		.delete_note("bearer-token", DeleteNoteRequest { id: first.id, user_id: owner_id })
		.await
		.expect_err("A stranger must not delete another user's note.");

	assert!(matches!(err, Error::Forbidden { .. }), "Unexpected error: {err:?}");

	let removed = owner
		.delete_note("bearer-token", DeleteNoteRequest { id: first.id, user_id: owner_id })
		.await
		.expect("Owner delete must succeed.");

	assert!(removed.success);

	let admin =
		service_as(test_db.dsn(), Identity { user_id: Uuid::new_v4(), role: "admin".to_string() });
	let removed = admin
		.delete_note("bearer-token", DeleteNoteRequest { id: second.id, user_id: owner_id })
		.await
		.expect("Admin delete must succeed.");

	assert!(removed.success);

	let missing = owner
		.delete_note("bearer-token", DeleteNoteRequest { id: second.id, user_id: owner_id })
		.await
		.expect_err("Deleting a removed note must report not found.");

	assert!(matches!(missing, Error::NotFound { .. }), "Unexpected error: {missing:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
