use voxnote_domain::{media, quota, summary};

#[test]
fn summary_parsing_is_idempotent_on_clean_bullets() {
	let points = summary::split_points("- a\n- b\n- c");
	let rejoined = points.iter().map(|point| format!("- {point}")).collect::<Vec<_>>().join("\n");

	assert_eq!(summary::split_points(&rejoined), points);
}

#[test]
fn mixed_markers_and_prose_prefer_markers() {
	let raw = "Here is your summary:\n- first point\n- second point\nThanks!";

	assert_eq!(summary::split_points(raw), vec!["first point", "second point"]);
}

#[test]
fn upload_acceptance_matches_extension_mapping() {
	for content_type in ["audio/mpeg", "audio/wav", "video/mp4"] {
		assert!(media::is_supported_media_type(content_type));
		assert_ne!(media::extension_for(content_type), "");
	}
}

#[test]
fn quota_exemption_is_role_or_status() {
	assert!(quota::bypasses_quota(quota::ADMIN_ROLE, Some("free")));
	assert!(quota::bypasses_quota("user", Some(quota::SUBSCRIPTION_ACTIVE)));
	assert!(!quota::bypasses_quota("user", Some("trialing")));
}
