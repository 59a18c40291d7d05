//! Per-site configuration.
//!
//! # Responsibility
//! - Describe every per-site difference (selectors, breakpoints, timings,
//!   storage prefix, form rules) as data instead of forked scripts.
//! - Validate declarations before any controller is built.
//!
//! # Invariants
//! - `{}` is a complete, valid configuration; every section has defaults.
//! - Unknown keys are rejected so typos surface at check time.

use crate::carousel::{items_per_view_for_width, BoundaryPolicy, DEFAULT_SWIPE_THRESHOLD_PX};
use crate::form::{FieldRule, FieldSpec, FormValidator, SubmitMode};
use crate::menu::{MenuOptions, DEFAULT_BREAKPOINT_PX};
use crate::reveal::{
    RevealOptions, DEFAULT_COUNTER_DURATION_MS, DEFAULT_MARGIN_PX, DEFAULT_STAGGER_MS,
    DEFAULT_THRESHOLD,
};
use crate::scroll::DEFAULT_HEADER_THRESHOLD_PX;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Io(std::io::Error),
    InvalidStoragePrefix(String),
    EmptySelector {
        section: &'static str,
    },
    InvalidThreshold {
        section: &'static str,
        value: f64,
    },
    InvalidBreakpoint(f64),
    InvalidCarousel {
        index: usize,
        reason: String,
    },
    InvalidFieldRule {
        form: String,
        field: String,
        reason: String,
    },
    DuplicateField {
        form: String,
        field: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config JSON: {err}"),
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::InvalidStoragePrefix(value) => write!(
                f,
                "storage_prefix must use lowercase letters, digits and dashes: `{value}`"
            ),
            Self::EmptySelector { section } => write!(f, "{section}: selector must not be empty"),
            Self::InvalidThreshold { section, value } => {
                write!(f, "{section}: threshold must be within [0, 1], got {value}")
            }
            Self::InvalidBreakpoint(value) => {
                write!(f, "menu: breakpoint_px must be > 0, got {value}")
            }
            Self::InvalidCarousel { index, reason } => write!(f, "carousels[{index}]: {reason}"),
            Self::InvalidFieldRule {
                form,
                field,
                reason,
            } => write!(f, "form `{form}` field `{field}`: {reason}"),
            Self::DuplicateField { form, field } => {
                write!(f, "form `{form}` declares field `{field}` twice")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Namespaces storage keys as `<prefix>-theme` etc.
    pub storage_prefix: Option<String>,
    pub theme: ThemeConfig,
    pub menu: MenuConfig,
    pub scroll: ScrollConfig,
    pub header: HeaderConfig,
    pub parallax: ParallaxConfig,
    pub reveal: RevealConfig,
    pub counters: CounterConfig,
    pub carousels: Vec<CarouselConfig>,
    pub forms: Vec<FormConfig>,
    pub consent: ConsentConfig,
}

impl SiteConfig {
    /// Parses and validates a JSON document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(prefix) = &self.storage_prefix {
            let valid = !prefix.is_empty()
                && prefix
                    .chars()
                    .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-');
            if !valid {
                return Err(ConfigError::InvalidStoragePrefix(prefix.clone()));
            }
        }

        require_selector("theme.toggle", &self.theme.toggle)?;
        require_selector("menu.trigger", &self.menu.trigger)?;
        require_selector("menu.panel", &self.menu.panel)?;
        require_selector("scroll.links", &self.scroll.links)?;
        require_selector("reveal.selector", &self.reveal.selector)?;
        require_selector("consent.banner", &self.consent.banner)?;

        if !(self.menu.breakpoint_px > 0.0) {
            return Err(ConfigError::InvalidBreakpoint(self.menu.breakpoint_px));
        }
        require_threshold("reveal", self.reveal.threshold)?;
        require_threshold("counters", self.counters.threshold)?;

        for (index, carousel) in self.carousels.iter().enumerate() {
            carousel.validate(index)?;
        }
        for form in &self.forms {
            form.validator()?;
        }
        Ok(())
    }
}

fn require_selector(section: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::EmptySelector { section });
    }
    Ok(())
}

fn require_threshold(section: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidThreshold { section, value });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub toggle: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            toggle: "#themeToggle".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuConfig {
    pub trigger: String,
    pub panel: String,
    /// Clicks inside this element do not count as "outside".
    pub root: String,
    pub links: String,
    pub breakpoint_px: f64,
    pub lock_scroll: bool,
    pub open_class: String,
}

impl MenuConfig {
    pub fn options(&self) -> MenuOptions {
        MenuOptions {
            breakpoint_px: self.breakpoint_px,
            lock_scroll: self.lock_scroll,
            open_class: self.open_class.clone(),
        }
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        let options = MenuOptions::default();
        Self {
            trigger: ".mobile-menu-toggle".to_string(),
            panel: ".mobile-nav-drawer".to_string(),
            root: "header".to_string(),
            links: ".mobile-nav-link".to_string(),
            breakpoint_px: DEFAULT_BREAKPOINT_PX,
            lock_scroll: options.lock_scroll,
            open_class: options.open_class,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    pub links: String,
    /// Element whose height is subtracted from scroll targets.
    pub header: String,
    pub extra_offset_px: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            links: "a[href^=\"#\"]".to_string(),
            header: "header".to_string(),
            extra_offset_px: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderConfig {
    pub selector: String,
    pub threshold_px: f64,
    pub scrolled_class: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            selector: "header".to_string(),
            threshold_px: DEFAULT_HEADER_THRESHOLD_PX,
            scrolled_class: "scrolled".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallaxConfig {
    pub selector: String,
    pub speed: f64,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            selector: "[data-parallax]".to_string(),
            speed: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    pub selector: String,
    pub threshold: f64,
    pub margin_px: f64,
    pub stagger_ms: u32,
    pub visible_class: String,
}

impl RevealConfig {
    pub fn options(&self) -> RevealOptions {
        RevealOptions {
            threshold: self.threshold,
            margin_px: self.margin_px,
            stagger_ms: self.stagger_ms,
            visible_class: self.visible_class.clone(),
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: "[data-reveal]".to_string(),
            threshold: DEFAULT_THRESHOLD,
            margin_px: DEFAULT_MARGIN_PX,
            stagger_ms: DEFAULT_STAGGER_MS,
            visible_class: "visible".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CounterConfig {
    /// Elements carrying a `data-target` number.
    pub selector: String,
    pub duration_ms: f64,
    pub threshold: f64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            selector: "[data-counter]".to_string(),
            duration_ms: DEFAULT_COUNTER_DURATION_MS,
            threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    pub root: String,
    /// Defaults to the root when absent.
    pub track: Option<String>,
    pub slide: String,
    /// Existing dot buttons, in slide order.
    pub dots: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub policy: BoundaryPolicy,
    /// Used below the narrowest breakpoint and when none are declared.
    pub per_view: usize,
    /// `[min_width_px, per_view]` pairs resolved against the window width.
    pub per_view_breakpoints: Vec<(f64, usize)>,
    pub swipe_threshold_px: f64,
    pub autoplay_ms: Option<u32>,
}

impl CarouselConfig {
    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidCarousel {
            index,
            reason: reason.to_string(),
        };
        if self.root.trim().is_empty() {
            return Err(invalid("root selector must not be empty"));
        }
        if self.slide.trim().is_empty() {
            return Err(invalid("slide selector must not be empty"));
        }
        if self.per_view == 0 {
            return Err(invalid("per_view must be >= 1"));
        }
        for (min_width, per_view) in &self.per_view_breakpoints {
            if !min_width.is_finite() || *min_width < 0.0 {
                return Err(invalid("per_view_breakpoints widths must be >= 0"));
            }
            if *per_view == 0 {
                return Err(invalid("per_view_breakpoints values must be >= 1"));
            }
        }
        if self.swipe_threshold_px < 0.0 {
            return Err(invalid("swipe_threshold_px must be >= 0"));
        }
        if self.autoplay_ms == Some(0) {
            return Err(invalid("autoplay_ms must be > 0 when set"));
        }
        // A clamped carousel stops at its last page, so autoplay would stall.
        if self.autoplay_ms.is_some() && self.policy == BoundaryPolicy::Clamp {
            return Err(invalid("autoplay_ms requires policy = \"wrap\""));
        }
        Ok(())
    }

    /// Items per page for a window of `width` pixels.
    pub fn per_view_for_width(&self, width: f64) -> usize {
        items_per_view_for_width(width, &self.per_view_breakpoints, self.per_view)
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            root: ".carousel".to_string(),
            track: None,
            slide: ".carousel-slide".to_string(),
            dots: None,
            prev: None,
            next: None,
            policy: BoundaryPolicy::default(),
            per_view: 1,
            per_view_breakpoints: Vec::new(),
            swipe_threshold_px: DEFAULT_SWIPE_THRESHOLD_PX,
            autoplay_ms: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldConfig {
    /// Matches the control's `name` attribute.
    pub name: String,
    pub rules: Vec<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    pub selector: String,
    pub fields: Vec<FieldConfig>,
    /// Error container looked up inside each control's parent.
    pub error_selector: String,
    pub success: Option<String>,
    pub submit_mode: SubmitMode,
    /// Hides the in-page success indicator again after this delay.
    pub success_timeout_ms: Option<u32>,
}

impl FormConfig {
    /// Builds the validator, rejecting unknown rules and duplicate names.
    pub fn validator(&self) -> Result<FormValidator, ConfigError> {
        let mut seen = BTreeSet::new();
        let mut specs = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let name = field.name.trim();
            if name.is_empty() {
                return Err(ConfigError::InvalidFieldRule {
                    form: self.selector.clone(),
                    field: field.name.clone(),
                    reason: "field name must not be empty".to_string(),
                });
            }
            if !seen.insert(name.to_string()) {
                return Err(ConfigError::DuplicateField {
                    form: self.selector.clone(),
                    field: name.to_string(),
                });
            }

            let rules = field
                .rules
                .iter()
                .map(|rule| FieldRule::parse(rule))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|reason| ConfigError::InvalidFieldRule {
                    form: self.selector.clone(),
                    field: name.to_string(),
                    reason,
                })?;

            let mut spec = FieldSpec::new(name, rules);
            if let Some(message) = &field.message {
                spec = spec.with_message(message.clone());
            }
            specs.push(spec);
        }
        Ok(FormValidator::new(specs))
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            selector: "form".to_string(),
            fields: Vec::new(),
            error_selector: ".form-error".to_string(),
            success: None,
            submit_mode: SubmitMode::default(),
            success_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsentConfig {
    pub banner: String,
    pub accept: String,
    pub decline: String,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            banner: ".cookie-banner".to_string(),
            accept: "[data-cookie-accept]".to_string(),
            decline: "[data-cookie-decline]".to_string(),
        }
    }
}
