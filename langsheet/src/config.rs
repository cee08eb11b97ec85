//! Run configuration.
//!
//! One [`Config`] is loaded from `langsheet.toml` by the entry point and
//! passed down to every component by reference; no module reads global
//! state. Required settings are `app_name`, `out_dir`, and `sheet_path`;
//! everything else has the documented default. Column indices, platform
//! directories, and language aliases are data here, not code paths.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use unic_langid::LanguageIdentifier;

use crate::{
    error::Error,
    formats::{FormatKind, WebDialect},
    sheet::SheetLayout,
};

/// The platform family of one summary source directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Web,
    Ios,
    Android,
}

impl PlatformKind {
    /// The format of one file under this platform, decided by its
    /// extension for web platforms.
    pub fn format_for(&self, extension: &str) -> Result<FormatKind, Error> {
        match self {
            PlatformKind::Android => Ok(FormatKind::AndroidXml),
            PlatformKind::Ios => Ok(FormatKind::AppleStrings),
            PlatformKind::Web => FormatKind::from_extension(extension),
        }
    }

    /// Whether a file name belongs to this platform.
    pub fn matches_file(&self, name: &str) -> bool {
        match self {
            PlatformKind::Android => name == "strings.xml",
            PlatformKind::Ios => name.ends_with(".strings"),
            PlatformKind::Web => name.ends_with(".js") || name.ends_with(".ts"),
        }
    }
}

/// One summary source platform: a directory of per-language subdirectories.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    pub name: String,
    pub dir: String,
    pub kind: PlatformKind,
}

impl PlatformConfig {
    fn new(name: &str, dir: &str, kind: PlatformKind) -> Self {
        PlatformConfig {
            name: name.to_string(),
            dir: dir.to_string(),
            kind,
        }
    }
}

/// Configuration of the `summary` run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub platforms: Vec<PlatformConfig>,
    /// Languages whose normalized text forms the equivalence signature.
    pub strict_match_languages: Vec<String>,
    pub master_language: String,
    /// Vendor language-code spellings mapped to their canonical code.
    pub language_aliases: BTreeMap<String, String>,
    pub base_dir: String,
    pub output_file: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        let aliases = [("ko", "kr"), ("cn", "zh"), ("tc", "hk")]
            .into_iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();

        SummaryConfig {
            platforms: vec![
                PlatformConfig::new("ANDROID", "android", PlatformKind::Android),
                PlatformConfig::new("IOS", "ios", PlatformKind::Ios),
                PlatformConfig::new("CO", "co", PlatformKind::Web),
                PlatformConfig::new("UC", "uc", PlatformKind::Web),
                PlatformConfig::new("APP_M", "app-m", PlatformKind::Web),
                PlatformConfig::new("WEB_M", "web-m", PlatformKind::Web),
                PlatformConfig::new("APP_DOWNLOAD", "app-download", PlatformKind::Web),
            ],
            strict_match_languages: vec!["zh".to_string(), "en".to_string(), "fr".to_string()],
            master_language: "zh".to_string(),
            language_aliases: aliases,
            base_dir: "./summary/base".to_string(),
            output_file: "./merged_translations.csv".to_string(),
        }
    }
}

/// The full run configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application whose sheet column claims entry names. Required.
    pub app_name: String,
    /// Root of the per-locale output directories. Required.
    pub out_dir: String,
    /// The translation sheet (CSV export). Required.
    pub sheet_path: String,
    /// Languages written by `generate`.
    pub langs: Vec<String>,
    /// Languages fanned out by `complete`.
    pub complete_langs: Vec<String>,
    /// The locale whose catalog drives `complete`.
    pub complete_base_lang: String,
    /// Extension of web locale files (`.js` or `.ts`).
    pub file_type: String,
    pub find_missing_keys: bool,
    pub find_missing_terms: bool,
    /// Language probed by missing-term detection; first of
    /// `complete_langs` when unset.
    pub untranslated_lang: Option<String>,
    /// Restrict `complete` to one file of the base locale directory.
    pub single_file: String,
    /// Restrict `complete` to a subset of source keys.
    pub single_keys: Vec<String>,
    pub layout: SheetLayout,
    pub summary: SummaryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app_name: String::new(),
            out_dir: String::new(),
            sheet_path: String::new(),
            langs: vec!["zh".to_string(), "en".to_string()],
            complete_langs: Vec::new(),
            complete_base_lang: "zh".to_string(),
            file_type: ".ts".to_string(),
            find_missing_keys: false,
            find_missing_terms: false,
            untranslated_lang: None,
            single_file: String::new(),
            single_keys: Vec::new(),
            layout: SheetLayout::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl Config {
    /// Loads and validates the configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::missing_input(format!(
                "configuration file {} does not exist",
                path.display()
            )));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks required settings and warns about unparseable language codes
    /// (vendor spellings such as `hk` stay usable, so this never fails the
    /// run).
    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.app_name.trim().is_empty() {
            missing.push("app_name");
        }
        if self.out_dir.trim().is_empty() {
            missing.push("out_dir");
        }
        if self.sheet_path.trim().is_empty() {
            missing.push("sheet_path");
        }
        if !missing.is_empty() {
            return Err(Error::invalid_config(format!(
                "required settings are not set: {}",
                missing.join(", ")
            )));
        }

        for lang in self
            .langs
            .iter()
            .chain(self.complete_langs.iter())
            .chain(std::iter::once(&self.complete_base_lang))
        {
            if lang.parse::<LanguageIdentifier>().is_err() {
                log::warn!(
                    "language code `{}` is not a valid identifier; using it verbatim",
                    lang
                );
            }
        }
        Ok(())
    }

    /// The dialect of generated and consumed web locale files.
    pub fn web_dialect(&self) -> Result<WebDialect, Error> {
        WebDialect::from_extension(&self.file_type)
            .ok_or_else(|| Error::UnknownFormat(self.file_type.clone()))
    }

    /// The canonical spelling of a language code after alias resolution.
    pub fn normalize_lang(&self, code: &str) -> String {
        self.summary
            .language_aliases
            .get(code)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }

    /// The directory holding one locale's files.
    pub fn locale_dir(&self, lang: &str) -> PathBuf {
        Path::new(&self.out_dir).join(lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.langs, ["zh", "en"]);
        assert_eq!(config.complete_base_lang, "zh");
        assert_eq!(config.file_type, ".ts");
        assert!(!config.find_missing_keys);
        assert_eq!(config.summary.master_language, "zh");
        assert_eq!(config.summary.strict_match_languages, ["zh", "en", "fr"]);
        assert_eq!(config.normalize_lang("cn"), "zh");
        assert_eq!(config.normalize_lang("tr"), "tr");
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_text = r#"
            app_name = "H5APP"
            out_dir = "./lang"
            sheet_path = "./data.csv"
            complete_langs = ["tr"]
            complete_base_lang = "cn"
            file_type = ".js"
            find_missing_keys = true
            find_missing_terms = true
        "#;
        let config: Config = toml::from_str(toml_text).unwrap();
        config.validate().unwrap();
        assert_eq!(config.app_name, "H5APP");
        assert_eq!(config.complete_langs, ["tr"]);
        assert_eq!(config.web_dialect().unwrap(), WebDialect::Js);
        assert!(config.find_missing_keys);
        // Defaults fill everything not provided.
        assert_eq!(config.layout.language_column("tr"), Some(20));
        assert_eq!(config.layout.app_column("H5APP"), Some(9));
    }

    #[test]
    fn test_missing_required_settings() {
        let config: Config = toml::from_str("app_name = \"H5APP\"").unwrap();
        let result = config.validate();
        let message = result.unwrap_err().to_string();
        assert!(message.contains("out_dir"));
        assert!(message.contains("sheet_path"));
        assert!(!message.contains("app_name"));
    }

    #[test]
    fn test_layout_override() {
        let toml_text = r#"
            app_name = "APP"
            out_dir = "./lang"
            sheet_path = "./data.csv"

            [layout]
            id = 1

            [layout.languages]
            zh = 3
            en = 4

            [layout.apps]
            APP = 2
        "#;
        let config: Config = toml::from_str(toml_text).unwrap();
        assert_eq!(config.layout.id, 1);
        assert_eq!(config.layout.language_column("zh"), Some(3));
        assert_eq!(config.layout.language_column("kr"), None);
        assert_eq!(config.layout.app_column("APP"), Some(2));
    }

    #[test]
    fn test_platform_kind_format_for() {
        assert_eq!(
            PlatformKind::Android.format_for("xml").unwrap(),
            FormatKind::AndroidXml
        );
        assert_eq!(
            PlatformKind::Web.format_for(".ts").unwrap(),
            FormatKind::Web(WebDialect::Ts)
        );
        assert!(PlatformKind::Web.format_for("json").is_err());
    }

    #[test]
    fn test_platform_kind_matches_file() {
        assert!(PlatformKind::Android.matches_file("strings.xml"));
        assert!(!PlatformKind::Android.matches_file("colors.xml"));
        assert!(PlatformKind::Ios.matches_file("Localizable.strings"));
        assert!(PlatformKind::Web.matches_file("home.ts"));
        assert!(!PlatformKind::Web.matches_file("home.json"));
    }

    #[test]
    fn test_unknown_file_type_is_rejected() {
        let mut config = Config::default();
        config.file_type = ".json".to_string();
        assert!(matches!(
            config.web_dialect(),
            Err(Error::UnknownFormat(_))
        ));
    }
}
