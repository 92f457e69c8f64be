use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub quiz: QuizSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub path: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Controls how `/quizzes` picks among the eligible questions.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct QuizSettings {
    /// Draw at random when set, otherwise return the lowest id.
    pub randomize: bool,
}

impl Settings {
    /// Defaults, then `trivia.toml` if present, then `TRIVIA_*` variables
    /// (`TRIVIA_SERVER__PORT=9000` sets `server.port`).
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        defaults()?
            .add_source(File::with_name("trivia").required(false))
            .add_source(
                Environment::with_prefix("TRIVIA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("database.path", "trivia.db")?
        .set_default("database.max_connections", 5_i64)?
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080_i64)?
        .set_default("quiz.randomize", true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn defaults_are_complete() {
        let settings: Settings = defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.database.path, "trivia.db");
        assert_eq!(settings.database.max_connections, 5);
        assert_eq!(settings.server.address(), "0.0.0.0:8080");
        assert!(settings.quiz.randomize);
    }

    #[test]
    fn file_overrides_defaults() {
        let toml = r#"
[server]
port = 9000

[quiz]
randomize = false
"#;
        let settings: Settings = defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert!(!settings.quiz.randomize);
    }
}
