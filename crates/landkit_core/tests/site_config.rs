use landkit_core::{BoundaryPolicy, ConfigError, FieldValue, SiteConfig, SubmitMode};
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Write;

#[test]
fn empty_document_uses_defaults() {
    let config = SiteConfig::from_json("{}").expect("empty config is valid");
    assert_eq!(config, SiteConfig::default());
    assert_eq!(config.theme.toggle, "#themeToggle");
    assert_eq!(config.menu.breakpoint_px, 768.0);
    assert_eq!(config.reveal.options().root_margin(), "0px 0px -50px 0px");
    assert!(config.carousels.is_empty());
}

#[test]
fn full_document_parses_every_section() {
    let raw = json!({
        "storage_prefix": "acme",
        "menu": { "breakpoint_px": 1024, "lock_scroll": false },
        "scroll": { "extra_offset_px": 16 },
        "reveal": { "stagger_ms": 0 },
        "carousels": [
            { "root": "#testimonials", "autoplay_ms": 8000 },
            {
                "root": "#logos",
                "policy": "clamp",
                "per_view": 1,
                "per_view_breakpoints": [[640, 2], [1024, 4]]
            }
        ],
        "forms": [{
            "selector": "#contact",
            "submit_mode": "in_page",
            "success": ".form-success",
            "fields": [
                { "name": "email", "rules": ["required", "email"] },
                { "name": "phone", "rules": ["phone:10"], "message": "Check the number." }
            ]
        }]
    })
    .to_string();

    let config = SiteConfig::from_json(&raw).expect("valid config");
    assert_eq!(config.storage_prefix.as_deref(), Some("acme"));
    assert!(!config.menu.options().lock_scroll);
    assert_eq!(config.carousels[0].policy, BoundaryPolicy::Wrap);
    assert_eq!(config.carousels[1].policy, BoundaryPolicy::Clamp);
    assert_eq!(config.carousels[0].per_view_for_width(1400.0), 1);
    assert_eq!(config.carousels[1].per_view_for_width(1400.0), 4);
    assert_eq!(config.carousels[1].per_view_for_width(700.0), 2);
    assert_eq!(config.carousels[1].per_view_for_width(320.0), 1);
    assert_eq!(config.forms[0].submit_mode, SubmitMode::InPage);

    let validator = config.forms[0].validator().expect("validator");
    let mut values = BTreeMap::new();
    values.insert("email".to_string(), FieldValue::text("a@b.co"));
    values.insert("phone".to_string(), FieldValue::text("12345"));
    let report = validator.validate_all(&values);
    assert_eq!(report.first_invalid(), Some("phone"));
    let phone = validator.field("phone").expect("phone spec");
    let error = report.fields[1].1.error.clone().expect("phone error");
    assert_eq!(phone.message_for(&error), "Check the number.");
}

#[test]
fn unknown_keys_are_rejected() {
    let err = SiteConfig::from_json(r#"{"thme": {}}"#).expect_err("typo must fail");
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn invalid_values_are_reported_by_section() {
    let cases = [
        (json!({ "storage_prefix": "Acme Site" }), "storage_prefix"),
        (json!({ "theme": { "toggle": " " } }), "theme.toggle"),
        (json!({ "menu": { "breakpoint_px": 0 } }), "breakpoint_px"),
        (json!({ "reveal": { "threshold": 1.5 } }), "reveal: threshold"),
        (json!({ "carousels": [{ "per_view": 0 }] }), "carousels[0]"),
        (json!({ "carousels": [{}, { "autoplay_ms": 0 }] }), "carousels[1]"),
        (
            json!({ "carousels": [{ "per_view_breakpoints": [[768, 0]] }] }),
            "per_view_breakpoints",
        ),
        (
            json!({ "carousels": [{ "policy": "clamp", "autoplay_ms": 5000 }] }),
            "autoplay_ms requires policy",
        ),
    ];
    for (value, needle) in cases {
        let err = SiteConfig::from_json(&value.to_string()).expect_err("invalid config");
        assert!(
            err.to_string().contains(needle),
            "`{err}` should mention `{needle}`"
        );
    }
}

#[test]
fn form_field_errors_name_form_and_field() {
    let unknown_rule = json!({
        "forms": [{ "selector": "#signup", "fields": [{ "name": "zip", "rules": ["postcode"] }] }]
    });
    match SiteConfig::from_json(&unknown_rule.to_string()) {
        Err(ConfigError::InvalidFieldRule { form, field, .. }) => {
            assert_eq!(form, "#signup");
            assert_eq!(field, "zip");
        }
        other => panic!("expected InvalidFieldRule, got {other:?}"),
    }

    let duplicate = json!({
        "forms": [{ "fields": [{ "name": "email" }, { "name": "email" }] }]
    });
    assert!(matches!(
        SiteConfig::from_json(&duplicate.to_string()),
        Err(ConfigError::DuplicateField { .. })
    ));
}

#[test]
fn from_file_reads_and_validates() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "{}", json!({ "header": { "threshold_px": 40 } })).expect("write config");

    let config = SiteConfig::from_file(file.path()).expect("config from file");
    assert_eq!(config.header.threshold_px, 40.0);

    let dir = tempfile::tempdir().expect("temp dir");
    let missing = SiteConfig::from_file(dir.path().join("missing.json"));
    assert!(matches!(missing, Err(ConfigError::Io(_))));
}
