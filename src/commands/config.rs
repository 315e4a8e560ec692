//! Config command - assistant credentials and display preferences.

use anyhow::{Result, ensure};
use clap::{Args, Subcommand, ValueEnum};

use expenseflow::config::Config;
use expenseflow::types::CurrencyCode;

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub command: ConfigSubCmd,
}

#[derive(Subcommand)]
pub enum ConfigSubCmd {
    /// Point the spending assistant at an OpenAI-compatible provider
    Assistant(AssistantArgs),

    /// Change the theme, display currency and listing defaults
    Preferences(PreferenceArgs),

    /// Show the stored configuration
    Show,
}

#[derive(Args, Default)]
pub struct AssistantArgs {
    /// API key for the provider
    #[arg(long)]
    pub key: Option<String>,

    /// API base URL (e.g., https://openrouter.ai/api)
    #[arg(long)]
    pub url: Option<String>,

    /// Chat model name (e.g., gpt-4o-mini)
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    fn of(config: &Config) -> Self {
        if config.preferences.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

#[derive(Args, Default)]
pub struct PreferenceArgs {
    #[arg(long, value_enum)]
    pub theme: Option<Theme>,

    /// Currency used until an organization is selected
    #[arg(long, value_enum)]
    pub currency: Option<CurrencyCode>,

    /// Expenses per page in `ef expenses`
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Delay added to every demo data call, in milliseconds
    #[arg(long)]
    pub latency_ms: Option<u64>,
}

impl AssistantArgs {
    /// Apply the given settings and describe what changed.
    fn apply(&self, config: &mut Config) -> Vec<String> {
        let mut changes = Vec::new();

        if let Some(key) = &self.key {
            config.set_assistant_key(key.clone());
            changes.push("assistant API key saved".to_string());
        }
        if let Some(url) = &self.url {
            config.assistant_base_url = url.clone();
            changes.push(format!("assistant URL set to {}", url));
        }
        if let Some(model) = &self.model {
            config.assistant_model = model.clone();
            changes.push(format!("assistant model set to {}", model));
        }

        changes
    }
}

impl PreferenceArgs {
    fn apply(&self, config: &mut Config) -> Result<Vec<String>> {
        let mut changes = Vec::new();

        if let Some(page_size) = self.page_size {
            ensure!(page_size > 0, "Page size must be at least 1");
            config.page_size = page_size;
            changes.push(format!("page size set to {}", page_size));
        }
        if let Some(theme) = self.theme {
            config.preferences.dark_mode = theme == Theme::Dark;
            changes.push(format!("theme set to {}", theme.as_str()));
        }
        if let Some(currency) = self.currency {
            config.preferences.currency = currency;
            changes.push(format!("currency set to {}", currency.as_str()));
        }
        if let Some(latency) = self.latency_ms {
            config.backend_latency_ms = latency;
            changes.push(format!("latency set to {}ms", latency));
        }

        Ok(changes)
    }
}

/// `ef config show` body, one section per concern.
fn describe(config: &Config) -> Vec<String> {
    let key = if config.has_assistant_key() {
        "(set)"
    } else {
        "(not set)"
    };

    vec![
        "[assistant]".to_string(),
        format!("  api_key     {}", key),
        format!("  base_url    {}", config.assistant_base_url),
        format!("  model       {}", config.assistant_model),
        String::new(),
        "[preferences]".to_string(),
        format!("  theme       {}", Theme::of(config).as_str()),
        format!("  currency    {}", config.preferences.currency.as_str()),
        format!("  page_size   {}", config.page_size),
        format!("  latency_ms  {}", config.backend_latency_ms),
    ]
}

fn save_changes(config: &Config, changes: &[String]) -> Result<()> {
    if changes.is_empty() {
        println!("Nothing to change.");
        return Ok(());
    }

    config.save()?;
    for change in changes {
        println!("{}", change);
    }
    Ok(())
}

impl ConfigCmd {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            ConfigSubCmd::Assistant(args) => {
                let mut config = Config::load()?;
                let changes = args.apply(&mut config);
                save_changes(&config, &changes)?;
            }
            ConfigSubCmd::Preferences(args) => {
                let mut config = Config::load()?;
                let changes = args.apply(&mut config)?;
                save_changes(&config, &changes)?;
            }
            ConfigSubCmd::Show => {
                let config = Config::load()?;
                println!("Config: {}", Config::config_path()?.display());
                println!();
                for line in describe(&config) {
                    println!("{}", line);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_settings_applied() {
        let mut config = Config::default();
        let args = AssistantArgs {
            key: Some("sk-test".to_string()),
            model: Some("openai/gpt-4o".to_string()),
            ..Default::default()
        };

        let changes = args.apply(&mut config);
        assert_eq!(changes.len(), 2);
        assert!(config.has_assistant_key());
        assert_eq!(config.assistant_model, "openai/gpt-4o");
        assert_eq!(config.assistant_base_url, "https://api.openai.com");
    }

    #[test]
    fn test_preferences_applied() {
        let mut config = Config::default();
        let args = PreferenceArgs {
            theme: Some(Theme::Light),
            currency: Some(CurrencyCode::Eur),
            page_size: Some(25),
            ..Default::default()
        };

        let changes = args.apply(&mut config).unwrap();
        assert_eq!(changes.len(), 3);
        assert!(!config.preferences.dark_mode);
        assert_eq!(config.preferences.currency, CurrencyCode::Eur);
        assert_eq!(config.page_size, 25);
        assert_eq!(config.backend_latency_ms, 0);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut config = Config::default();
        let args = PreferenceArgs {
            page_size: Some(0),
            theme: Some(Theme::Light),
            ..Default::default()
        };

        assert!(args.apply(&mut config).is_err());
        assert!(config.preferences.dark_mode);
    }

    #[test]
    fn test_no_flags_changes_nothing() {
        let mut config = Config::default();
        assert!(AssistantArgs::default().apply(&mut config).is_empty());
        assert!(PreferenceArgs::default().apply(&mut config).unwrap().is_empty());
    }

    #[test]
    fn test_show_groups_preferences() {
        let lines = describe(&Config::default());
        let prefs = lines.iter().position(|l| l == "[preferences]").unwrap();

        assert_eq!(lines[0], "[assistant]");
        assert!(lines[1].ends_with("(not set)"));
        assert_eq!(lines[prefs + 1], "  theme       dark");
        assert_eq!(lines[prefs + 2], "  currency    USD");
    }
}
