mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Billing, Config, IdentityProviderConfig, LlmProviderConfig, Postgres, Providers, Quota, Retry,
	Security, Service, Storage, TranscriptionProviderConfig, Upload,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.admin_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.admin_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.public_url.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.public_url must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	for (label, key) in [
		("transcription", &cfg.providers.transcription.api_key),
		("llm", &cfg.providers.llm.api_key),
		("identity", &cfg.providers.identity.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	if cfg.providers.transcription.poll_interval_ms == 0 {
		return Err(Error::Validation {
			message: "providers.transcription.poll_interval_ms must be greater than zero."
				.to_string(),
		});
	}
	if cfg.providers.transcription.max_poll_attempts == 0 {
		return Err(Error::Validation {
			message: "providers.transcription.max_poll_attempts must be greater than zero."
				.to_string(),
		});
	}

	for (label, temperature) in [
		("providers.llm.temperature", cfg.providers.llm.temperature),
		("providers.llm.tag_temperature", cfg.providers.llm.tag_temperature),
	] {
		if !temperature.is_finite() {
			return Err(Error::Validation {
				message: format!("{label} must be a finite number."),
			});
		}
		if !(0.0..=2.0).contains(&temperature) {
			return Err(Error::Validation {
				message: format!("{label} must be in the range 0.0-2.0."),
			});
		}
	}

	if cfg.providers.llm.tag_max_tokens == 0 {
		return Err(Error::Validation {
			message: "providers.llm.tag_max_tokens must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.retry.max_attempts == 0 {
		return Err(Error::Validation {
			message: "providers.retry.max_attempts must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.retry.base_delay_ms == 0 {
		return Err(Error::Validation {
			message: "providers.retry.base_delay_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.quota.free_note_limit <= 0 {
		return Err(Error::Validation {
			message: "quota.free_note_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.upload.max_upload_bytes == 0 {
		return Err(Error::Validation {
			message: "upload.max_upload_bytes must be greater than zero.".to_string(),
		});
	}
	if cfg.billing.webhook_secret.trim().is_empty() {
		return Err(Error::Validation {
			message: "billing.webhook_secret must be non-empty.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for base in [
		&mut cfg.service.public_url,
		&mut cfg.providers.transcription.api_base,
		&mut cfg.providers.llm.api_base,
		&mut cfg.providers.identity.api_base,
	] {
		while base.ends_with('/') {
			base.pop();
		}
	}
}
