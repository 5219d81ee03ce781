use std::env;

/// Signing secret and token lifetime for session tokens.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub secret: String,
    pub token_ttl_secs: u64,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let secret = env::var("JWT_SECRET").map_err(|_| ConfigError::MissingJwtSecret)?;

        let token_ttl_secs = env::var("JWT_DURATION_SECS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidNumber("JWT_DURATION_SECS"))?;

        Ok(AuthConfig {
            secret,
            token_ttl_secs,
        })
    }
}

/// Password complexity thresholds.
#[derive(Clone, Debug)]
pub struct PasswordPolicy {
    pub min_len: usize,
    pub max_len: usize,
    pub min_digits: usize,
}

impl PasswordPolicy {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(PasswordPolicy {
            min_len: parse_or("PASS_MIN", 8)?,
            max_len: parse_or("PASS_MAX", 64)?,
            min_digits: parse_or("PASS_INT", 1)?,
        })
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        PasswordPolicy {
            min_len: 8,
            max_len: 64,
            min_digits: 1,
        }
    }
}

/// Fallback bounds for the range validator.
#[derive(Clone, Debug)]
pub struct RangeDefaults {
    pub min: f64,
    pub max: f64,
}

impl RangeDefaults {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(RangeDefaults {
            min: parse_or("RANGE_MIN", 2.0)?,
            max: parse_or("RANGE_MAX", 50.0)?,
        })
    }
}

/// Length and character classes for generated passwords.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub length: usize,
    pub numbers: bool,
    pub symbols: bool,
    pub strict: bool,
}

impl GeneratorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(GeneratorConfig {
            length: parse_or("GENERATE_LENGTH", 12)?,
            numbers: flag_or("GENERATE_NUMBERS", true)?,
            symbols: flag_or("GENERATE_SYMBOLS", true)?,
            strict: flag_or("GENERATE_STRICT", true)?,
        })
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            length: 12,
            numbers: true,
            symbols: true,
            strict: true,
        }
    }
}

/// Source directory, output format and resize geometry for image tasks.
///
/// The `fit`/`position` strings are parsed by the image module; unknown
/// values surface as task errors there rather than being defaulted here.
#[derive(Clone, Debug)]
pub struct ImageConfig {
    pub source_dir: String,
    pub output_format: String,
    pub width: u32,
    pub height: u32,
    pub fit: String,
    pub position: String,
    pub thumb_width: u32,
    pub thumb_height: u32,
    pub thumb_format: String,
    pub thumb_fit: String,
    pub thumb_position: String,
}

impl ImageConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let source_dir = env::var("IMG_URL").unwrap_or_else(|_| "img/".to_string());
        let output_format = env::var("IMG_EXT").unwrap_or_else(|_| "webp".to_string());
        let fit = env::var("IMG_FIT").unwrap_or_else(|_| "cover".to_string());
        let position = env::var("IMG_POSITION").unwrap_or_else(|_| "center".to_string());
        let thumb_format = env::var("THUMB_EXT").unwrap_or_else(|_| output_format.clone());
        let thumb_fit = env::var("THUMB_FIT").unwrap_or_else(|_| "cover".to_string());
        let thumb_position = env::var("THUMB_POSITION").unwrap_or_else(|_| "center".to_string());

        Ok(ImageConfig {
            source_dir,
            output_format,
            width: parse_or("IMG_WIDTH", 1920)?,
            height: parse_or("IMG_HEIGHT", 1080)?,
            fit,
            position,
            thumb_width: parse_or("THUMB_WIDTH", 200)?,
            thumb_height: parse_or("THUMB_HEIGHT", 200)?,
            thumb_format,
            thumb_fit,
            thumb_position,
        })
    }
}

/// SMTP connection parameters and default sender.
#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub username: String,
    pub password: String,
}

impl SmtpConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let host = env::var("MAIL_HOST").map_err(|_| ConfigError::MissingMailHost)?;
        let username = env::var("MAIL_USER").map_err(|_| ConfigError::MissingMailUser)?;
        let password = env::var("MAIL_PASS").map_err(|_| ConfigError::MissingMailPass)?;

        Ok(SmtpConfig {
            host,
            port: parse_or("MAIL_PORT", 587)?,
            secure: flag_or("MAIL_SECURE", false)?,
            username,
            password,
        })
    }
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidNumber(name)),
        Err(_) => Ok(default),
    }
}

fn flag_or(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(raw) => match raw.as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidFlag(name)),
        },
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET environment variable not set")]
    MissingJwtSecret,

    #[error("MAIL_HOST environment variable not set")]
    MissingMailHost,

    #[error("MAIL_USER environment variable not set")]
    MissingMailUser,

    #[error("MAIL_PASS environment variable not set")]
    MissingMailPass,

    #[error("{0} is not a valid number")]
    InvalidNumber(&'static str),

    #[error("{0} is not a valid boolean")]
    InvalidFlag(&'static str),
}
