//! Connectivity diagnostics (`odoo-mcp doctor`).
//!
//! Shows the effective settings with the API key masked, warns about URL
//! shapes that commonly break the connection, then makes read-only calls:
//! server version, authentication, and a count of active projects.

use std::fmt;

use reqwest::Url;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::config::{
    ConfigError, ConfigOverrides, ConnectionConfig, ENV_API_KEY, ENV_DB, ENV_URL, ENV_USERNAME,
};
use crate::odoo::{OdooClient, OdooResult, Transport};

/// Overall result, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorOutcome {
    Healthy,
    MissingConfig,
    ConnectionFailed,
}

impl DoctorOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            DoctorOutcome::Healthy => 0,
            DoctorOutcome::MissingConfig => 1,
            DoctorOutcome::ConnectionFailed => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct SettingRow {
    #[tabled(rename = "Setting")]
    pub name: &'static str,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Result of the live connection check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeReport {
    pub status: &'static str,
    pub uid: i64,
    pub server_version: String,
    pub active_projects: usize,
}

#[derive(Debug, Default)]
pub struct DoctorReport {
    pub settings: Vec<SettingRow>,
    pub config_error: Option<ConfigError>,
    pub url_warnings: Vec<String>,
    pub connection: Option<Result<ProbeReport, String>>,
}

/// Mask a secret for display: short values are fully starred, longer ones
/// keep their first and last four characters.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Warnings about an `ODOO_URL` that is not a plain base URL.
pub fn validate_url(url: &str) -> Vec<String> {
    let mut warnings = Vec::new();
    match Url::parse(url) {
        Ok(parsed) => {
            if parsed.host_str().is_none_or(str::is_empty) {
                warnings.push(full_url_warning());
            }
            if parsed.path().contains("/odoo") {
                warnings.push(format!(
                    "{ENV_URL} should be the base host; remove '/odoo' from the URL"
                ));
            }
        }
        Err(_) => warnings.push(full_url_warning()),
    }
    warnings
}

fn full_url_warning() -> String {
    format!("{ENV_URL} should be a full URL like https://company.odoo.com")
}

/// Version, uid and active project count, in that order.
pub async fn probe<T: Transport>(client: &OdooClient<T>) -> OdooResult<ProbeReport> {
    let version = client.version().await?;
    let uid = client.uid().await?;
    let projects = client.list_projects(true).await?;

    Ok(ProbeReport {
        status: "connected",
        uid: uid.0,
        server_version: version.server_version,
        active_projects: projects.len(),
    })
}

impl DoctorReport {
    /// Collect settings and validate them. Returns the configuration when
    /// it is complete enough to attempt a connection.
    pub fn from_lookup<F>(
        overrides: ConfigOverrides,
        lookup: F,
    ) -> (Self, Option<ConnectionConfig>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = |value: Option<String>, key: &str| {
            value
                .or_else(|| lookup(key))
                .unwrap_or_default()
                .trim()
                .to_string()
        };
        let url = raw(overrides.url.clone(), ENV_URL);
        let api_key = raw(None, ENV_API_KEY);

        let mut report = DoctorReport {
            settings: vec![
                SettingRow {
                    name: ENV_URL,
                    value: url.clone(),
                },
                SettingRow {
                    name: ENV_DB,
                    value: raw(overrides.db.clone(), ENV_DB),
                },
                SettingRow {
                    name: ENV_USERNAME,
                    value: raw(overrides.username.clone(), ENV_USERNAME),
                },
                SettingRow {
                    name: ENV_API_KEY,
                    value: mask_secret(&api_key),
                },
            ],
            ..Default::default()
        };

        match ConnectionConfig::from_lookup(overrides, &lookup) {
            Ok(config) => {
                report.url_warnings = validate_url(config.url());
                (report, Some(config))
            }
            Err(e) => {
                report.config_error = Some(e);
                (report, None)
            }
        }
    }

    pub async fn check_connection<T: Transport>(&mut self, client: &OdooClient<T>) {
        self.connection = Some(probe(client).await.map_err(|e| e.to_string()));
    }

    pub fn outcome(&self) -> DoctorOutcome {
        if self.config_error.is_some() {
            return DoctorOutcome::MissingConfig;
        }
        match &self.connection {
            Some(Ok(_)) => DoctorOutcome::Healthy,
            _ => DoctorOutcome::ConnectionFailed,
        }
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Odoo MCP Doctor")?;
        writeln!(f, "{}", "=".repeat(60))?;

        let mut table = Table::new(&self.settings);
        table.with(Style::rounded());
        writeln!(f, "{table}")?;

        if let Some(e) = &self.config_error {
            writeln!(f)?;
            return writeln!(f, "ERROR: {e}");
        }

        if !self.url_warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "URL Warnings:")?;
            for warning in &self.url_warnings {
                writeln!(f, "- {warning}")?;
            }
        }

        writeln!(f)?;
        match &self.connection {
            Some(Ok(probe)) => {
                writeln!(f, "Connection Check:")?;
                let json = serde_json::to_string_pretty(probe).map_err(|_| fmt::Error)?;
                writeln!(f, "{json}")
            }
            Some(Err(message)) => {
                writeln!(f, "ERROR: Connection check failed")?;
                writeln!(f, "{message}")
            }
            None => writeln!(f, "Connection check not run"),
        }
    }
}

/// Run every check against the process environment.
pub async fn run(overrides: ConfigOverrides) -> DoctorReport {
    let (mut report, config) = DoctorReport::from_lookup(overrides, |key| std::env::var(key).ok());
    let Some(config) = config else {
        return report;
    };

    match OdooClient::connect(config) {
        Ok(client) => report.check_connection(&client).await,
        Err(e) => report.connection = Some(Err(e.to_string())),
    }
    report
}
