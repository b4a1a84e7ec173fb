use crate::domain::SubmitterEmail;
use secrecy::Secret;
use serde_aux::field_attributes::{deserialize_bool_from_anything, deserialize_number_from_string};

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email: EmailSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub business_name: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_resume_bytes: usize,
}

/// Outbound SMTP options, mirroring the `EMAIL_*` environment variables.
#[derive(serde::Deserialize, Clone)]
pub struct EmailSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    /// `true` for implicit TLS (usually port 465), `false` for opportunistic STARTTLS.
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub secure: bool,
    #[serde(default)]
    pub user: String,
    #[serde(default = "empty_secret")]
    pub pass: Secret<String>,
    /// Address used in `From:`. Falls back to `user` when unset.
    #[serde(default)]
    pub sender: Option<String>,
    /// The business support mailbox that receives every submission.
    pub recipient: String,
}

fn empty_secret() -> Secret<String> {
    Secret::new(String::new())
}

impl EmailSettings {
    pub fn sender(&self) -> Result<SubmitterEmail, String> {
        let sender = self
            .sender
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.user.clone());
        SubmitterEmail::parse(sender)
    }

    pub fn recipient(&self) -> Result<SubmitterEmail, String> {
        SubmitterEmail::parse(self.recipient.clone())
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either 'local' or 'production'.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("Failed to determine the current directory: {}", e)))?;
    let configuration_directory = base_path.join("configuration");
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(configuration_directory.join(environment_filename)))
        // APP_APPLICATION__PORT=5001 => Settings.application.port
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        // EMAIL_HOST=smtp.example.com => Settings.email.host
        .add_source(
            config::Environment::with_prefix("EMAIL")
                .separator("_")
                .keep_prefix(true),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
