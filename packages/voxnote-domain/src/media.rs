//! Acceptance rules for uploaded media payloads.

/// Audio and video payloads are accepted; everything else is rejected before any upstream
/// call is made.
pub fn is_supported_media_type(content_type: &str) -> bool {
	let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();

	essence.starts_with("audio/") || essence.starts_with("video/")
}

/// File extension used when generating an opaque filename for an upload.
pub fn extension_for(content_type: &str) -> &'static str {
	let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();

	match essence.as_str() {
		"audio/mpeg" | "audio/mp3" => "mp3",
		"audio/mp4" | "audio/m4a" | "audio/x-m4a" => "m4a",
		"audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
		"audio/ogg" => "ogg",
		"audio/webm" => "webm",
		"audio/flac" | "audio/x-flac" => "flac",
		"video/mp4" => "mp4",
		"video/webm" => "webm",
		"video/quicktime" => "mov",
		_ => "bin",
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_audio_and_video() {
		assert!(is_supported_media_type("audio/mpeg"));
		assert!(is_supported_media_type("audio/wav; codecs=1"));
		assert!(is_supported_media_type("video/mp4"));
	}

	#[test]
	fn rejects_everything_else() {
		assert!(!is_supported_media_type("application/json"));
		assert!(!is_supported_media_type("text/plain"));
		assert!(!is_supported_media_type(""));
	}

	#[test]
	fn maps_known_extensions() {
		assert_eq!(extension_for("audio/mpeg"), "mp3");
		assert_eq!(extension_for("audio/wav; codecs=1"), "wav");
		assert_eq!(extension_for("audio/x-unknown"), "bin");
	}
}
