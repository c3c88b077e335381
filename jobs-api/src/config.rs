use std::str::FromStr;
use std::time;

use envconfig::Envconfig;

#[derive(Envconfig)]
pub struct Config {
    #[envconfig(from = "BIND_HOST", default = "::")]
    pub host: String,

    #[envconfig(from = "BIND_PORT", default = "3300")]
    pub port: u16,

    #[envconfig(default = "5000000")]
    pub max_body_size: usize,

    #[envconfig(default = "100")]
    pub concurrency_limit: usize,

    #[envconfig(default = "false")]
    pub print_store: bool,

    #[envconfig(nested = true)]
    pub mongodb: MongoConfig,
}

impl Config {
    /// Produce a host:port address for binding a TcpListener.
    pub fn bind(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settings for the document store. The first three have no defaults: the process refuses
/// to start without them.
#[derive(Envconfig, Clone)]
pub struct MongoConfig {
    #[envconfig(from = "MONGODB_CONNECTION_STRING")]
    pub connection_string: NonEmptyString,

    #[envconfig(from = "MONGODB_DATABASE_NAME")]
    pub database_name: NonEmptyString,

    #[envconfig(from = "MONGODB_COLLECTION_NAME")]
    pub collection_name: NonEmptyString,

    #[envconfig(from = "MONGODB_MAX_POOL_SIZE", default = "100")]
    pub max_pool_size: u32,

    #[envconfig(from = "MONGODB_INSERT_TIMEOUT_MS", default = "5000")]
    pub insert_timeout: EnvMsDuration,
}

#[derive(Debug, Clone, Copy)]
pub struct EnvMsDuration(pub time::Duration);

#[derive(Debug, PartialEq, Eq)]
pub struct ParseEnvMsDurationError;

impl FromStr for EnvMsDuration {
    type Err = ParseEnvMsDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ms = s.parse::<u64>().map_err(|_| ParseEnvMsDurationError)?;

        Ok(EnvMsDuration(time::Duration::from_millis(ms)))
    }
}

#[derive(Debug, Clone)]
pub struct NonEmptyString(pub String);

impl NonEmptyString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct StringIsEmptyError;

impl FromStr for NonEmptyString {
    type Err = StringIsEmptyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            Err(StringIsEmptyError)
        } else {
            Ok(NonEmptyString(s.to_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn required_env() -> HashMap<String, String> {
        HashMap::from([
            (
                "MONGODB_CONNECTION_STRING".to_owned(),
                "mongodb://localhost:27017".to_owned(),
            ),
            ("MONGODB_DATABASE_NAME".to_owned(), "jobs".to_owned()),
            ("MONGODB_COLLECTION_NAME".to_owned(), "postings".to_owned()),
        ])
    }

    #[test]
    fn test_loads_defaults_around_required_settings() {
        let config = Config::init_from_hashmap(&required_env()).unwrap();

        assert_eq!(config.bind(), ":::3300");
        assert_eq!(config.max_body_size, 5_000_000);
        assert_eq!(config.concurrency_limit, 100);
        assert!(!config.print_store);
        assert_eq!(config.mongodb.database_name.as_str(), "jobs");
        assert_eq!(config.mongodb.collection_name.as_str(), "postings");
        assert_eq!(config.mongodb.max_pool_size, 100);
        assert_eq!(
            config.mongodb.insert_timeout.0,
            time::Duration::from_millis(5000)
        );
    }

    #[test]
    fn test_every_store_setting_is_required() {
        for name in [
            "MONGODB_CONNECTION_STRING",
            "MONGODB_DATABASE_NAME",
            "MONGODB_COLLECTION_NAME",
        ] {
            let mut env = required_env();
            env.remove(name);

            assert!(
                Config::init_from_hashmap(&env).is_err(),
                "{} should be required",
                name
            );
        }
    }

    #[test]
    fn test_blank_store_settings_are_rejected() {
        let mut env = required_env();
        env.insert("MONGODB_COLLECTION_NAME".to_owned(), "  ".to_owned());

        assert!(Config::init_from_hashmap(&env).is_err());
    }

    #[test]
    fn test_parses_insert_timeout_in_milliseconds() {
        let mut env = required_env();
        env.insert("MONGODB_INSERT_TIMEOUT_MS".to_owned(), "250".to_owned());

        let config = Config::init_from_hashmap(&env).unwrap();

        assert_eq!(
            config.mongodb.insert_timeout.0,
            time::Duration::from_millis(250)
        );
    }
}
