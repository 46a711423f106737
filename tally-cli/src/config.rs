use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use tally_core::DEFAULT_CURRENCY_GLYPH;

use crate::state::ensure_tally_home;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub display: DisplaySection,
    pub form: FormSection,
    pub budget: BudgetSection,
    pub profile: ProfileSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub currency_glyph: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSection {
    /// Accepted payment methods; `add` rejects anything else.
    pub payment_methods: Vec<String>,
    /// Suggested expense categories. Free text is still accepted.
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BudgetSection {
    pub monthly: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSection {
    /// IANA zone used to decide what "today" and "this month" mean
    pub timezone: String,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            currency_glyph: DEFAULT_CURRENCY_GLYPH.to_string(),
        }
    }
}

impl Default for FormSection {
    fn default() -> Self {
        Self {
            payment_methods: ["Cash", "bKash", "Nagad", "Bank"].map(String::from).to_vec(),
            categories: [
                "Food",
                "Transport",
                "Shopping",
                "Bills",
                "Entertainment",
                "Health",
                "Education",
                "Others",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

impl Default for ProfileSection {
    fn default() -> Self {
        Self {
            timezone: "Asia/Dhaka".to_string(),
        }
    }
}

impl Config {
    /// Match `input` against the configured payment methods, ignoring case,
    /// and return the configured spelling.
    pub fn payment_method(&self, input: &str) -> Result<String> {
        let input = input.trim();
        match self
            .form
            .payment_methods
            .iter()
            .find(|m| m.eq_ignore_ascii_case(input))
        {
            Some(m) => Ok(m.clone()),
            None => bail!(
                "unknown payment method '{}' (expected one of: {})",
                input,
                self.form.payment_methods.join(", ")
            ),
        }
    }

    pub fn is_known_category(&self, category: &str) -> bool {
        self.form
            .categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category.trim()))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_tally_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s)?;
    tally_core::time::parse_timezone(&cfg.profile.timezone)?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
