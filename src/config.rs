// src/config.rs
use crate::constants::{BUGSNAG_API_BASE_URL, TIMEZONE_ENV_VAR, TOKEN_ENV_VAR};
use crate::error::AppError;
use crate::export::SchemaPolicy;
use crate::types::{ApiToken, Credentials, TimeWindow, Timezone, ValidationError};
use chrono::{DateTime, Utc};
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use url::Url;

/// Parsed command-line input.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Export Bugsnag events to CSV", long_about = None)]
pub struct CommandLineInput {
    /// Bugsnag account name
    #[arg(long)]
    pub account: String,

    /// Bugsnag project name
    #[arg(long)]
    pub project: String,

    /// Authorization token (falls back to the BUGSNAG_TOKEN environment variable)
    #[arg(long)]
    pub token: Option<String>,

    /// Authorization user
    #[arg(long)]
    pub username: Option<String>,

    /// Authorization password
    #[arg(long)]
    pub password: Option<String>,

    /// Start time for the query (e.g. "2024-01-01", "3 days ago", RFC 3339)
    #[arg(long)]
    pub from: Option<String>,

    /// End time for the query, same formats as --from
    #[arg(long)]
    pub until: Option<String>,

    /// Save output to the specified file instead of stdout
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Interpret --from and --until in this timezone (UTC or an offset like +02:00)
    #[arg(long)]
    pub timezone: Option<String>,

    /// Stop after this many events
    #[arg(long)]
    pub limit: Option<NonZeroUsize>,

    /// How CSV columns are chosen across events with different fields
    #[arg(long, value_enum, default_value_t = SchemaPolicy::Frequency)]
    pub schema: SchemaPolicy,

    /// API base URL, for on-premise installations
    #[arg(long, default_value = BUGSNAG_API_BASE_URL)]
    pub base_url: String,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Resolved export configuration, validated and ready to drive all three stages.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub credentials: Credentials,
    pub base_url: Url,
    pub account: String,
    pub project: String,
    pub window: TimeWindow,
    pub save: Option<PathBuf>,
    pub limit: Option<NonZeroUsize>,
    pub schema_policy: SchemaPolicy,
}

/// Environment values the configuration may fall back on.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub token: Option<String>,
    pub timezone: Option<String>,
}

impl Environment {
    /// Reads the fallbacks from the process environment.
    pub fn from_process() -> Self {
        Self {
            token: std::env::var(TOKEN_ENV_VAR).ok().filter(|v| !v.is_empty()),
            timezone: std::env::var(TIMEZONE_ENV_VAR).ok().filter(|v| !v.is_empty()),
        }
    }
}

impl ExportConfig {
    /// Resolves a complete configuration from CLI input and the process environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, &Environment::from_process(), Utc::now())
    }

    /// Resolves against explicit environment values and clock.
    pub fn resolve_with(
        cli: CommandLineInput,
        env: &Environment,
        now: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let credentials = resolve_credentials(&cli, env)?;
        let timezone = resolve_timezone(cli.timezone.as_deref(), env.timezone.as_deref())?;
        let window = TimeWindow::resolve(cli.from.as_deref(), cli.until.as_deref(), &timezone, now)?;

        let base_url = Url::parse(&cli.base_url).map_err(|e| ValidationError::InvalidUrl {
            url: cli.base_url.clone(),
            reason: e.to_string(),
        })?;

        if cli.account.trim().is_empty() {
            return Err(ValidationError::EmptyField("account").into());
        }
        if cli.project.trim().is_empty() {
            return Err(ValidationError::EmptyField("project").into());
        }

        Ok(ExportConfig {
            credentials,
            base_url,
            account: cli.account,
            project: cli.project,
            window,
            save: cli.save,
            limit: cli.limit,
            schema_policy: cli.schema,
        })
    }
}

/// A token wins over username/password; one of the two is required.
fn resolve_credentials(cli: &CommandLineInput, env: &Environment) -> Result<Credentials, AppError> {
    if let Some(token) = cli.token.as_ref().or(env.token.as_ref()) {
        return Ok(Credentials::Token(ApiToken::new(token.as_str())?));
    }

    match (&cli.username, &cli.password) {
        (Some(username), Some(password)) => {
            Ok(Credentials::basic(username.as_str(), password.as_str())?)
        }
        _ => Err(AppError::MissingConfiguration(
            "Please specify either --token or --username and --password".to_string(),
        )),
    }
}

/// An explicit `--timezone` must parse; an unusable `TZ` falls back to UTC.
fn resolve_timezone(flag: Option<&str>, env: Option<&str>) -> Result<Timezone, AppError> {
    if let Some(flag) = flag {
        return Ok(flag.parse::<Timezone>()?);
    }

    match env.map(str::parse::<Timezone>) {
        Some(Ok(timezone)) => Ok(timezone),
        Some(Err(e)) => {
            log::warn!("{}; using UTC", e);
            Ok(Timezone::utc())
        }
        None => Ok(Timezone::utc()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parse(args: &[&str]) -> CommandLineInput {
        let mut argv = vec!["bugsnag2csv", "--account", "Acme", "--project", "web"];
        argv.extend_from_slice(args);
        CommandLineInput::try_parse_from(argv).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn token_flag_resolves_with_defaults() {
        let config =
            ExportConfig::resolve_with(parse(&["--token", "abc123"]), &Environment::default(), now())
                .unwrap();

        assert!(matches!(config.credentials, Credentials::Token(ref t) if t.as_str() == "abc123"));
        assert_eq!(config.schema_policy, SchemaPolicy::Frequency);
        assert_eq!(config.limit, None);
        assert_eq!(config.base_url.as_str(), "https://api.bugsnag.com/");
        assert_eq!(config.window, TimeWindow::default());
    }

    #[test]
    fn token_falls_back_to_environment() {
        let env = Environment {
            token: Some("from-env".to_string()),
            timezone: None,
        };
        let config = ExportConfig::resolve_with(parse(&[]), &env, now()).unwrap();
        assert!(matches!(config.credentials, Credentials::Token(ref t) if t.as_str() == "from-env"));
    }

    #[test]
    fn basic_auth_when_no_token() {
        let config = ExportConfig::resolve_with(
            parse(&["--username", "me", "--password", "pw"]),
            &Environment::default(),
            now(),
        )
        .unwrap();
        assert_eq!(config.credentials, Credentials::basic("me", "pw").unwrap());
    }

    #[test]
    fn missing_credentials_are_reported() {
        let err = ExportConfig::resolve_with(parse(&["--username", "me"]), &Environment::default(), now())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing configuration: Please specify either --token or --username and --password"
        );
    }

    #[test]
    fn schema_limit_and_window_flags() {
        let config = ExportConfig::resolve_with(
            parse(&[
                "--token",
                "t",
                "--schema",
                "intersection",
                "--limit",
                "25",
                "--from",
                "2024-05-01",
                "--timezone",
                "+02:00",
            ]),
            &Environment::default(),
            now(),
        )
        .unwrap();

        assert_eq!(config.schema_policy, SchemaPolicy::Intersection);
        assert_eq!(config.limit, NonZeroUsize::new(25));
        assert_eq!(
            config.window.start_time.as_deref(),
            Some("2024-04-30T22:00:00+0000")
        );
    }

    #[test]
    fn zero_limit_is_rejected_by_the_parser() {
        let argv = ["bugsnag2csv", "--account", "A", "--project", "P", "--limit", "0"];
        assert!(CommandLineInput::try_parse_from(argv).is_err());
    }

    #[test]
    fn unusable_tz_environment_falls_back_to_utc() {
        assert_eq!(resolve_timezone(None, Some("Europe/Paris")).unwrap(), Timezone::utc());
        assert!(resolve_timezone(Some("Europe/Paris"), None).is_err());
        assert_eq!(
            resolve_timezone(None, Some("-05:00")).unwrap(),
            "-05:00".parse::<Timezone>().unwrap()
        );
    }

    #[test]
    fn invalid_time_expression_is_a_validation_error() {
        let err = ExportConfig::resolve_with(
            parse(&["--token", "t", "--until", "whenever"]),
            &Environment::default(),
            now(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Could not understand 'whenever'");
    }
}
