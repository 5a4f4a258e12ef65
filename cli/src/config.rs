use anyhow::{anyhow, bail, Context, Result};
use figment::{
    providers::{Env, Format, Toml, Yaml},
    Figment,
};
use rhub_client::Credentials;
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

const ENV_PREFIX: &str = "RHUB_API_";

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Config {
    pub addr: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
    pub log: Option<String>,
}

impl Config {
    /// Reads the optional config file, then `RHUB_API_*` variables on top.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let figment = Figment::new();
        let figment = match path {
            None => figment,
            Some(path) => match path.extension().and_then(OsStr::to_str) {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
                Some(ext) => bail!("unexpected file extension '{}'", ext),
                None => bail!("failed to parse path {}", path.display()),
            },
        };

        // RHUB_API_USER and RHUB_API_PASS
        let env = Env::prefixed(ENV_PREFIX).map(|key| {
            if key == "user" {
                "username".into()
            } else if key == "pass" {
                "password".into()
            } else {
                key.into()
            }
        });

        let config: Config = figment
            .merge(env)
            .extract()
            .context("Fail load config")?;
        Ok(config)
    }

    pub fn addr(&self) -> Result<&str> {
        self.addr
            .as_deref()
            .ok_or_else(|| anyhow!("missing address, set --addr or {}ADDR", ENV_PREFIX))
    }

    /// A token wins over a username and password pair.
    pub fn credentials(&self) -> Result<Credentials> {
        match (&self.token, &self.username, &self.password) {
            (Some(token), _, _) => Ok(Credentials::token(token)),
            (None, Some(username), Some(password)) => Ok(Credentials::basic(username, password)),
            (None, Some(_), None) => bail!("missing password for user"),
            _ => bail!("missing credentials, set a token or a username and password"),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self
            .log
            .to_owned()
            .unwrap_or_else(|| "INFO".to_string())
            .to_uppercase()
            .as_str()
        {
            "TRACE" => LevelFilter::TRACE,
            "DEBUG" => LevelFilter::DEBUG,
            "WARN" => LevelFilter::WARN,
            "ERROR" => LevelFilter::ERROR,
            "INFO" => LevelFilter::INFO,
            _ => LevelFilter::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_env_fills_config() {
        Jail::expect_with(|jail| {
            jail.set_env("RHUB_API_ADDR", "https://rhub.example.com");
            jail.set_env("RHUB_API_USER", "admin");
            jail.set_env("RHUB_API_PASS", "p4ssw0rd");

            let config = Config::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.addr().unwrap(), "https://rhub.example.com");
            assert_eq!(
                config.credentials().unwrap(),
                Credentials::basic("admin", "p4ssw0rd")
            );
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "rhub.toml",
                r#"
                addr = "https://file.example.com"
                token = "from-file"
                log = "debug"
                "#,
            )?;
            jail.set_env("RHUB_API_TOKEN", "from-env");

            let config = Config::load(Some("rhub.toml".into())).map_err(|e| e.to_string())?;
            assert_eq!(config.addr().unwrap(), "https://file.example.com");
            assert_eq!(config.credentials().unwrap(), Credentials::token("from-env"));
            assert_eq!(config.log_level(), LevelFilter::DEBUG);
            Ok(())
        });
    }

    #[test]
    fn test_yaml_file() {
        Jail::expect_with(|jail| {
            jail.create_file("rhub.yaml", "addr: https://yaml.example.com\ntoken: abc\n")?;

            let config = Config::load(Some("rhub.yaml".into())).map_err(|e| e.to_string())?;
            assert_eq!(config.addr().unwrap(), "https://yaml.example.com");
            Ok(())
        });
    }

    #[test]
    fn test_unknown_extension_rejected() {
        assert!(Config::load(Some("rhub.ini".into())).is_err());
    }

    #[test]
    fn test_missing_credentials() {
        let config = Config {
            addr: Some("https://rhub.example.com".to_string()),
            username: Some("admin".to_string()),
            ..Default::default()
        };
        assert!(config.credentials().is_err());
        assert!(Config::default().credentials().is_err());
        assert!(Config::default().addr().is_err());
    }
}
