use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration field: {0}")]
    MissingField(String),
    #[error("cannot parse configuration: {0}")]
    Parse(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        match err.kind {
            figment::error::Kind::MissingField(ref field) => {
                ConfigError::MissingField(field.replace('_', "-"))
            }
            _ => ConfigError::Parse(Box::new(err)),
        }
    }
}
