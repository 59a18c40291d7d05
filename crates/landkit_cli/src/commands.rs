//! Command implementations.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::{anyhow, Context, Result};
use landkit_core::{FieldValue, FormReport, SiteConfig};
use log::info;

use crate::cli::{CheckArgs, ValidateArgs};

/// Loads and validates the config, returning the printable plan.
pub fn run_check(args: &CheckArgs) -> Result<String> {
    let config = SiteConfig::from_file(&args.config)
        .with_context(|| format!("config `{}` is invalid", args.config.display()))?;
    info!(
        "event=config_check module=cli status=ok carousels={} forms={}",
        config.carousels.len(),
        config.forms.len()
    );
    Ok(render_plan(&config))
}

/// Runs one form's rules; the report says whether every field passed.
pub fn run_validate(args: &ValidateArgs) -> Result<(FormReport, String)> {
    let config = SiteConfig::from_file(&args.config)
        .with_context(|| format!("config `{}` is invalid", args.config.display()))?;
    let form = config
        .forms
        .iter()
        .find(|form| form.selector == args.form)
        .ok_or_else(|| anyhow!("no form with selector `{}` in config", args.form))?;
    let validator = form.validator().context("build form validator")?;

    let mut values: BTreeMap<String, FieldValue> = args
        .fields
        .iter()
        .map(|(name, value)| (name.clone(), FieldValue::text(value.as_str())))
        .collect();
    for name in &args.checked {
        values.insert(name.clone(), FieldValue::Checked(true));
    }

    let report = validator.validate_all(&values);
    let mut out = String::new();
    for (name, state) in &report.fields {
        match &state.error {
            None => {
                let _ = writeln!(out, "ok       {name}");
            }
            Some(error) => {
                let message = validator
                    .field(name)
                    .map_or_else(|| error.to_string(), |spec| spec.message_for(error));
                let _ = writeln!(out, "invalid  {name}: {message}");
            }
        }
    }
    if let Some(first) = report.first_invalid() {
        let _ = writeln!(
            out,
            "{} invalid field(s); focus would move to `{first}`",
            report.invalid_count()
        );
    }
    info!(
        "event=form_dry_run module=cli status={} invalid_fields={}",
        if report.is_valid() { "ok" } else { "rejected" },
        report.invalid_count()
    );
    Ok((report, out))
}

pub fn render_plan(config: &SiteConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "storage  prefix={}",
        config.storage_prefix.as_deref().unwrap_or("(none)")
    );
    let _ = writeln!(out, "theme    toggle={}", config.theme.toggle);
    let _ = writeln!(
        out,
        "menu     trigger={} panel={} breakpoint={}px lock_scroll={}",
        config.menu.trigger, config.menu.panel, config.menu.breakpoint_px, config.menu.lock_scroll
    );
    let _ = writeln!(
        out,
        "scroll   links={} header={} offset={}px",
        config.scroll.links, config.scroll.header, config.scroll.extra_offset_px
    );
    let _ = writeln!(
        out,
        "header   selector={} threshold={}px",
        config.header.selector, config.header.threshold_px
    );
    let reveal = config.reveal.options();
    let _ = writeln!(
        out,
        "reveal   selector={} threshold={} root_margin=\"{}\" stagger={}ms",
        config.reveal.selector,
        reveal.threshold,
        reveal.root_margin(),
        reveal.stagger_ms
    );
    let _ = writeln!(
        out,
        "counters selector={} duration={}ms",
        config.counters.selector, config.counters.duration_ms
    );
    for (index, carousel) in config.carousels.iter().enumerate() {
        let autoplay = carousel
            .autoplay_ms
            .map_or_else(|| "off".to_string(), |ms| format!("{ms}ms"));
        let breakpoints = carousel
            .per_view_breakpoints
            .iter()
            .map(|(min_width, per_view)| format!("{min_width}:{per_view}"))
            .collect::<Vec<_>>()
            .join(",");
        let _ = writeln!(
            out,
            "carousel[{index}] root={} policy={} per_view={} breakpoints=[{breakpoints}] autoplay={autoplay}",
            carousel.root,
            carousel.policy.as_str(),
            carousel.per_view
        );
    }
    for form in &config.forms {
        let fields = form
            .fields
            .iter()
            .map(|field| format!("{}[{}]", field.name, field.rules.join(",")))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            out,
            "form     selector={} mode={:?} fields={fields}",
            form.selector, form.submit_mode
        );
    }
    let _ = writeln!(out, "consent  banner={}", config.consent.banner);
    out
}

#[cfg(test)]
mod tests {
    use super::{render_plan, run_check, run_validate};
    use crate::cli::{CheckArgs, ValidateArgs};
    use landkit_core::SiteConfig;
    use std::io::Write;
    use std::path::PathBuf;

    const CONFIG: &str = r##"{
        "storage_prefix": "acme",
        "carousels": [{ "root": "#reviews", "policy": "clamp", "per_view_breakpoints": [[768, 2]] }],
        "forms": [{
            "selector": "#contact",
            "fields": [
                { "name": "email", "rules": ["required", "email"] },
                { "name": "terms", "rules": ["required"], "message": "Accept the terms." }
            ]
        }]
    }"##;

    fn write_config(raw: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(raw.as_bytes()).expect("write config");
        file
    }

    fn validate_args(path: PathBuf, fields: &[(&str, &str)], checked: &[&str]) -> ValidateArgs {
        ValidateArgs {
            config: path,
            form: "#contact".to_string(),
            fields: fields
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            checked: checked.iter().map(|name| name.to_string()).collect(),
        }
    }

    #[test]
    fn default_plan_lists_default_selectors() {
        let plan = render_plan(&SiteConfig::default());
        assert!(plan.contains("theme    toggle=#themeToggle"));
        assert!(plan.contains("root_margin=\"0px 0px -50px 0px\""));
        assert!(!plan.contains("carousel["));
    }

    #[test]
    fn check_reports_configured_instances() {
        let file = write_config(CONFIG);
        let plan = run_check(&CheckArgs {
            config: file.path().to_path_buf(),
        })
        .expect("valid config");
        assert!(plan.contains("prefix=acme"));
        assert!(plan.contains("carousel[0] root=#reviews policy=clamp"));
        assert!(plan.contains("breakpoints=[768:2]"));
        assert!(plan.contains("email[required,email]"));
    }

    #[test]
    fn check_fails_on_invalid_config() {
        let file = write_config(r#"{"menu": {"breakpoint_px": -1}}"#);
        let err = run_check(&CheckArgs {
            config: file.path().to_path_buf(),
        })
        .expect_err("invalid breakpoint");
        assert!(format!("{err:#}").contains("breakpoint_px"));
    }

    #[test]
    fn validate_reports_first_invalid_field() {
        let file = write_config(CONFIG);
        let (report, out) = run_validate(&validate_args(
            file.path().to_path_buf(),
            &[("email", "a b@c.com")],
            &[],
        ))
        .expect("dry run");
        assert!(!report.is_valid());
        assert_eq!(report.first_invalid(), Some("email"));
        assert!(out.contains("invalid  terms: Accept the terms."));
    }

    #[test]
    fn validate_accepts_complete_input() {
        let file = write_config(CONFIG);
        let (report, out) = run_validate(&validate_args(
            file.path().to_path_buf(),
            &[("email", "a@b.co")],
            &["terms"],
        ))
        .expect("dry run");
        assert!(report.is_valid());
        assert!(out.contains("ok       email"));
    }

    #[test]
    fn validate_rejects_unknown_form() {
        let file = write_config(CONFIG);
        let mut args = validate_args(file.path().to_path_buf(), &[], &[]);
        args.form = "#newsletter".to_string();
        assert!(run_validate(&args).is_err());
    }
}
