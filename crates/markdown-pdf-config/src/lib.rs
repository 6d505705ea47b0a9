//! Configuration primitives and loader for markdown-pdf.
//!
//! Settings are resolved from a precedence stack:
//! override flag → working directory → git root → built-in defaults.
//! Every layer is parsed into partial settings, merged, and validated once so
//! that all problems are reported together with the layer that supplied them.

mod style;

pub use style::{
    HeadingStyle, ListStyle, Margins, PageSettings, PageSize, ParagraphStyle, Rgb, StyleConfig,
};

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".markdown-pdf.toml";

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub style: StyleConfig,
    pub page: PageSettings,
    pub sources: ConfigSources,
}

/// Ordered list of layers that contributed to the final configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
}

impl ConfigSource {
    fn builtin() -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        ConfigSource {
            kind,
            path: Some(path),
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::builtin();
        let mut merged = defaults_layer(&default_source);
        let mut source_layers = vec![default_source];

        let git_config_path = find_git_root(&working_dir).map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, source.clone())?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        let (style, page) = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            style,
            page,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }

    /// Built-in defaults only, without touching the filesystem.
    pub fn builtin() -> Self {
        Config {
            style: StyleConfig::default(),
            page: PageSettings::default(),
            sources: ConfigSources {
                working_directory: PathBuf::from("."),
                layers: vec![ConfigSource::builtin()],
            },
        }
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    Ok(raw.into_partial(&source))
}

fn defaults_layer(source: &ConfigSource) -> PartialConfig {
    let style = StyleConfig::default();
    let page = PageSettings::default();
    let at = |value: f32| Some(Located::new(value, source.clone()));
    let heading = |heading: &HeadingStyle| HeadingPartial {
        font_size: at(heading.font_size),
        color: Some(Located::new(heading.color.to_string(), source.clone())),
        space_before: at(heading.space_before),
        space_after: at(heading.space_after),
    };

    PartialConfig {
        style: StylePartial {
            heading1: heading(&style.heading1),
            heading2: heading(&style.heading2),
            heading3: heading(&style.heading3),
            paragraph: ParagraphPartial {
                font_size: at(style.paragraph.font_size),
                line_height: at(style.paragraph.line_height),
                space_after: at(style.paragraph.space_after),
            },
            list_indent: at(style.list.indent),
            spacer_height: at(style.spacer_height),
        },
        page: PagePartial {
            size: Some(Located::new(page.size.to_string(), source.clone())),
            margin_top: at(page.margins.top),
            margin_bottom: at(page.margins.bottom),
            margin_left: at(page.margins.left),
            margin_right: at(page.margins.right),
        },
    }
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

fn overlay<T>(slot: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *slot = other;
    }
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    style: StylePartial,
    page: PagePartial,
}

impl PartialConfig {
    fn merge(&mut self, other: PartialConfig) {
        self.style.merge(other.style);
        self.page.merge(other.page);
    }

    fn finalize(self) -> Result<(StyleConfig, PageSettings), ConfigValidationErrors> {
        let mut errors = Vec::new();
        let defaults = StyleConfig::default();

        let style = StyleConfig {
            heading1: self
                .style
                .heading1
                .finalize("style.heading1", &defaults.heading1, &mut errors),
            heading2: self
                .style
                .heading2
                .finalize("style.heading2", &defaults.heading2, &mut errors),
            heading3: self
                .style
                .heading3
                .finalize("style.heading3", &defaults.heading3, &mut errors),
            paragraph: self
                .style
                .paragraph
                .finalize(&defaults.paragraph, &mut errors),
            list: ListStyle {
                indent: non_negative(
                    self.style.list_indent,
                    "style.list.indent",
                    defaults.list.indent,
                    &mut errors,
                ),
            },
            spacer_height: non_negative(
                self.style.spacer_height,
                "style.spacer_height",
                defaults.spacer_height,
                &mut errors,
            ),
        };

        let page = self.page.finalize(&mut errors);

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }
        Ok((style, page))
    }
}

#[derive(Clone, Debug, Default)]
struct StylePartial {
    heading1: HeadingPartial,
    heading2: HeadingPartial,
    heading3: HeadingPartial,
    paragraph: ParagraphPartial,
    list_indent: Option<Located<f32>>,
    spacer_height: Option<Located<f32>>,
}

impl StylePartial {
    fn merge(&mut self, other: StylePartial) {
        self.heading1.merge(other.heading1);
        self.heading2.merge(other.heading2);
        self.heading3.merge(other.heading3);
        self.paragraph.merge(other.paragraph);
        overlay(&mut self.list_indent, other.list_indent);
        overlay(&mut self.spacer_height, other.spacer_height);
    }
}

#[derive(Clone, Debug, Default)]
struct HeadingPartial {
    font_size: Option<Located<f32>>,
    color: Option<Located<String>>,
    space_before: Option<Located<f32>>,
    space_after: Option<Located<f32>>,
}

impl HeadingPartial {
    fn merge(&mut self, other: HeadingPartial) {
        overlay(&mut self.font_size, other.font_size);
        overlay(&mut self.color, other.color);
        overlay(&mut self.space_before, other.space_before);
        overlay(&mut self.space_after, other.space_after);
    }

    fn finalize(
        self,
        context: &str,
        fallback: &HeadingStyle,
        errors: &mut Vec<ConfigValidationError>,
    ) -> HeadingStyle {
        let color = match self.color {
            Some(located) => match located.value.parse::<Rgb>() {
                Ok(color) => color,
                Err(()) => {
                    errors.push(
                        ConfigValidationError::new(
                            Some(located.source),
                            format!("invalid colour '{}', expected #RRGGBB", located.value),
                        )
                        .with_context(format!("{context}.color")),
                    );
                    fallback.color
                }
            },
            None => fallback.color,
        };

        HeadingStyle {
            font_size: positive(
                self.font_size,
                &format!("{context}.font_size"),
                fallback.font_size,
                errors,
            ),
            color,
            space_before: non_negative(
                self.space_before,
                &format!("{context}.space_before"),
                fallback.space_before,
                errors,
            ),
            space_after: non_negative(
                self.space_after,
                &format!("{context}.space_after"),
                fallback.space_after,
                errors,
            ),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct ParagraphPartial {
    font_size: Option<Located<f32>>,
    line_height: Option<Located<f32>>,
    space_after: Option<Located<f32>>,
}

impl ParagraphPartial {
    fn merge(&mut self, other: ParagraphPartial) {
        overlay(&mut self.font_size, other.font_size);
        overlay(&mut self.line_height, other.line_height);
        overlay(&mut self.space_after, other.space_after);
    }

    fn finalize(
        self,
        fallback: &ParagraphStyle,
        errors: &mut Vec<ConfigValidationError>,
    ) -> ParagraphStyle {
        ParagraphStyle {
            font_size: positive(
                self.font_size,
                "style.paragraph.font_size",
                fallback.font_size,
                errors,
            ),
            line_height: positive(
                self.line_height,
                "style.paragraph.line_height",
                fallback.line_height,
                errors,
            ),
            space_after: non_negative(
                self.space_after,
                "style.paragraph.space_after",
                fallback.space_after,
                errors,
            ),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct PagePartial {
    size: Option<Located<String>>,
    margin_top: Option<Located<f32>>,
    margin_bottom: Option<Located<f32>>,
    margin_left: Option<Located<f32>>,
    margin_right: Option<Located<f32>>,
}

impl PagePartial {
    fn merge(&mut self, other: PagePartial) {
        overlay(&mut self.size, other.size);
        overlay(&mut self.margin_top, other.margin_top);
        overlay(&mut self.margin_bottom, other.margin_bottom);
        overlay(&mut self.margin_left, other.margin_left);
        overlay(&mut self.margin_right, other.margin_right);
    }

    /// Layer that set the highest-precedence page geometry value.
    fn geometry_source(&self) -> Option<ConfigSource> {
        let margins = [
            &self.margin_top,
            &self.margin_bottom,
            &self.margin_left,
            &self.margin_right,
        ];
        margins
            .into_iter()
            .flatten()
            .map(|located| &located.source)
            .chain(self.size.iter().map(|located| &located.source))
            .max_by_key(|source| source.kind)
            .cloned()
    }

    fn finalize(self, errors: &mut Vec<ConfigValidationError>) -> PageSettings {
        let fallback = PageSettings::default();
        let source = self.geometry_source();
        let size = match self.size {
            Some(located) => match located.value.parse::<PageSize>() {
                Ok(size) => size,
                Err(()) => {
                    errors.push(
                        ConfigValidationError::new(
                            Some(located.source),
                            format!(
                                "unknown page size '{}', expected 'a4' or 'letter'",
                                located.value
                            ),
                        )
                        .with_context("page.size"),
                    );
                    fallback.size
                }
            },
            None => fallback.size,
        };

        let margins = Margins {
            top: non_negative(self.margin_top, "page.margin_top", fallback.margins.top, errors),
            bottom: non_negative(
                self.margin_bottom,
                "page.margin_bottom",
                fallback.margins.bottom,
                errors,
            ),
            left: non_negative(
                self.margin_left,
                "page.margin_left",
                fallback.margins.left,
                errors,
            ),
            right: non_negative(
                self.margin_right,
                "page.margin_right",
                fallback.margins.right,
                errors,
            ),
        };

        let page = PageSettings { size, margins };
        if page.content_width() <= 0.0 || page.content_height() <= 0.0 {
            errors.push(
                ConfigValidationError::new(
                    source,
                    format!("margins leave no printable area on the {} page", page.size),
                )
                .with_context("page"),
            );
        }
        page
    }
}

fn positive(
    located: Option<Located<f32>>,
    context: &str,
    fallback: f32,
    errors: &mut Vec<ConfigValidationError>,
) -> f32 {
    check_number(located, context, fallback, errors, |value| value > 0.0, "greater than 0")
}

fn non_negative(
    located: Option<Located<f32>>,
    context: &str,
    fallback: f32,
    errors: &mut Vec<ConfigValidationError>,
) -> f32 {
    check_number(located, context, fallback, errors, |value| value >= 0.0, "0 or more")
}

fn check_number(
    located: Option<Located<f32>>,
    context: &str,
    fallback: f32,
    errors: &mut Vec<ConfigValidationError>,
    accept: impl Fn(f32) -> bool,
    expectation: &str,
) -> f32 {
    match located {
        Some(located) if located.value.is_finite() && accept(located.value) => located.value,
        Some(located) => {
            errors.push(
                ConfigValidationError::new(
                    Some(located.source),
                    format!("must be {expectation} (received {})", located.value),
                )
                .with_context(context),
            );
            fallback
        }
        None => fallback,
    }
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    style: Option<RawStyle>,
    #[serde(default)]
    page: Option<RawPage>,
}

impl RawConfig {
    fn into_partial(self, source: &ConfigSource) -> PartialConfig {
        PartialConfig {
            style: self
                .style
                .map(|style| style.into_partial(source))
                .unwrap_or_default(),
            page: self
                .page
                .map(|page| page.into_partial(source))
                .unwrap_or_default(),
        }
    }
}

fn locate<T>(value: Option<T>, source: &ConfigSource) -> Option<Located<T>> {
    value.map(|value| Located::new(value, source.clone()))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStyle {
    #[serde(default)]
    heading1: Option<RawHeading>,
    #[serde(default)]
    heading2: Option<RawHeading>,
    #[serde(default)]
    heading3: Option<RawHeading>,
    #[serde(default)]
    paragraph: Option<RawParagraph>,
    #[serde(default)]
    list: Option<RawList>,
    #[serde(default)]
    spacer_height: Option<f32>,
}

impl RawStyle {
    fn into_partial(self, source: &ConfigSource) -> StylePartial {
        let heading = |raw: Option<RawHeading>| {
            raw.map(|heading| heading.into_partial(source))
                .unwrap_or_default()
        };
        StylePartial {
            heading1: heading(self.heading1),
            heading2: heading(self.heading2),
            heading3: heading(self.heading3),
            paragraph: self
                .paragraph
                .map(|paragraph| ParagraphPartial {
                    font_size: locate(paragraph.font_size, source),
                    line_height: locate(paragraph.line_height, source),
                    space_after: locate(paragraph.space_after, source),
                })
                .unwrap_or_default(),
            list_indent: locate(self.list.and_then(|list| list.indent), source),
            spacer_height: locate(self.spacer_height, source),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawHeading {
    #[serde(default)]
    font_size: Option<f32>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    space_before: Option<f32>,
    #[serde(default)]
    space_after: Option<f32>,
}

impl RawHeading {
    fn into_partial(self, source: &ConfigSource) -> HeadingPartial {
        HeadingPartial {
            font_size: locate(self.font_size, source),
            color: locate(self.color, source),
            space_before: locate(self.space_before, source),
            space_after: locate(self.space_after, source),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawParagraph {
    #[serde(default)]
    font_size: Option<f32>,
    #[serde(default)]
    line_height: Option<f32>,
    #[serde(default)]
    space_after: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawList {
    #[serde(default)]
    indent: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPage {
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    margin_top: Option<f32>,
    #[serde(default)]
    margin_bottom: Option<f32>,
    #[serde(default)]
    margin_left: Option<f32>,
    #[serde(default)]
    margin_right: Option<f32>,
}

impl RawPage {
    fn into_partial(self, source: &ConfigSource) -> PagePartial {
        PagePartial {
            size: locate(self.size, source),
            margin_top: locate(self.margin_top, source),
            margin_bottom: locate(self.margin_bottom, source),
            margin_left: locate(self.margin_left, source),
            margin_right: locate(self.margin_right, source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(contents: &str) -> PartialConfig {
        layer_from(ConfigSourceKind::Local, contents)
    }

    fn layer_from(kind: ConfigSourceKind, contents: &str) -> PartialConfig {
        let path = match kind {
            ConfigSourceKind::Override => "/tmp/override.toml",
            _ => "/tmp/.markdown-pdf.toml",
        };
        let raw: RawConfig = toml::from_str(contents).expect("parse layer");
        raw.into_partial(&ConfigSource::for_file(kind, PathBuf::from(path)))
    }

    #[test]
    fn defaults_finalize_to_builtin_style() {
        let (style, page) = defaults_layer(&ConfigSource::builtin())
            .finalize()
            .expect("defaults are valid");
        assert_eq!(style, StyleConfig::default());
        assert_eq!(page, PageSettings::default());
    }

    #[test]
    fn later_layer_only_overrides_fields_it_sets() {
        let mut merged = defaults_layer(&ConfigSource::builtin());
        merged.merge(layer(
            r##"
            [style.heading2]
            color = "#FF0000"
            "##,
        ));

        let (style, _) = merged.finalize().expect("valid");
        assert_eq!(style.heading2.color, Rgb::new(255, 0, 0));
        assert_eq!(style.heading2.font_size, 14.0);
        assert_eq!(style.heading2.space_before, 12.0);
    }

    #[test]
    fn floats_accept_integer_literals() {
        let mut merged = defaults_layer(&ConfigSource::builtin());
        merged.merge(layer("[style]\nspacer_height = 12\n[page]\nmargin_left = 72\n"));

        let (style, page) = merged.finalize().expect("valid");
        assert_eq!(style.spacer_height, 12.0);
        assert_eq!(page.margins.left, 72.0);
    }

    #[test]
    fn printable_area_error_names_the_layer_that_broke_it() {
        let mut merged = defaults_layer(&ConfigSource::builtin());
        merged.merge(layer("[page]\nmargin_top = 50\n"));
        merged.merge(layer_from(
            ConfigSourceKind::Override,
            "[page]\nmargin_right = 600\n",
        ));

        let errors = merged.finalize().expect_err("no printable width");
        let area = errors
            .iter()
            .find(|error| error.context.as_deref() == Some("page"))
            .expect("printable area error");
        let source = area.source.as_ref().expect("provenance");
        assert_eq!(source.kind, ConfigSourceKind::Override);
        assert_eq!(source.path, Some(PathBuf::from("/tmp/override.toml")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<RawConfig, _> = toml::from_str("[style.heading4]\nfont_size = 9.0\n");
        assert!(result.is_err());
    }
}
