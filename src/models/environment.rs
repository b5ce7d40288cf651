//! Deployment environment record handed to the front end.
//!
//! Each deployment target has one fixed literal. The variant baked into the
//! binary is chosen at build time through the `production` Cargo feature, and
//! the record never changes for the lifetime of the process.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use validator::{Validate, ValidationError};

lazy_static! {
    static ref CURRENT: Environment = if cfg!(feature = "production") {
        Environment::production()
    } else {
        Environment::development()
    };
}

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("unknown environment `{0}`")]
    UnknownName(String),
    #[error("failed to build authorize url")]
    AuthorizeUrl(#[source] url::ParseError),
}

/// Named deployment target.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EnvironmentName {
    Development,
    Production,
}

impl EnvironmentName {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentName::Development => "development",
            EnvironmentName::Production => "production",
        }
    }
}

impl FromStr for EnvironmentName {
    type Err = EnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(EnvironmentName::Development),
            "production" | "prod" => Ok(EnvironmentName::Production),
            _ => Err(EnvironmentError::UnknownName(s.to_string())),
        }
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings of the front end's Auth0 application.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Validate)]
pub struct Auth0Settings {
    #[validate(length(min = 1), custom(function = "validate_tenant_prefix"))]
    url: String,
    #[validate(url)]
    audience: String,
    #[serde(rename = "clientId")]
    #[validate(length(min = 1))]
    client_id: String,
    #[serde(rename = "callbackURL")]
    #[validate(url)]
    callback_url: String,
}

impl Auth0Settings {
    /// Tenant prefix, e.g. `dev-0yekb24q.us`.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    /// Host name of the tenant.
    pub fn domain(&self) -> String {
        format!("{}.auth0.com", self.url)
    }

    /// Issuer expected in tokens minted by the tenant.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain())
    }

    /// Login link for the implicit flow, redirecting back to the callback URL.
    pub fn authorize_url(&self) -> Result<Url, EnvironmentError> {
        Url::parse_with_params(
            &format!("https://{}/authorize", self.domain()),
            &[
                ("audience", self.audience.as_str()),
                ("response_type", "token"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.callback_url.as_str()),
            ],
        )
        .map_err(EnvironmentError::AuthorizeUrl)
    }
}

/// Immutable configuration record for one deployment target.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Validate)]
pub struct Environment {
    production: bool,
    #[serde(rename = "apiServerUrl")]
    #[validate(url)]
    api_server_url: String,
    #[validate(nested)]
    auth0: Auth0Settings,
}

impl Environment {
    /// Local development: the API on the loopback interface and the Ionic
    /// dev server on port 8100.
    pub fn development() -> Self {
        Self {
            production: false,
            api_server_url: "http://127.0.0.1:5000".into(),
            auth0: Auth0Settings {
                url: "dev-0yekb24q.us".into(),
                audience: "https://127.0.0.1:8100/tabs/user-page".into(),
                client_id: "RLgaWcG7Ja5BWKTvR6b8KbPXDQvpAOo7".into(),
                callback_url: "http://localhost:8100".into(),
            },
        }
    }

    pub fn production() -> Self {
        Self {
            production: true,
            api_server_url: "https://api.coffee-shop.example.com".into(),
            auth0: Auth0Settings {
                url: "coffee-shop.us".into(),
                audience: "https://api.coffee-shop.example.com".into(),
                client_id: "Xq4vNn8cS1dB7tHk2LmP9wRzE5aYuJ3o".into(),
                callback_url: "https://coffee-shop.example.com".into(),
            },
        }
    }

    pub fn named(name: EnvironmentName) -> Self {
        match name {
            EnvironmentName::Development => Self::development(),
            EnvironmentName::Production => Self::production(),
        }
    }

    /// Record baked into this build.
    pub fn current() -> &'static Environment {
        &CURRENT
    }

    pub fn name(&self) -> EnvironmentName {
        if self.production {
            EnvironmentName::Production
        } else {
            EnvironmentName::Development
        }
    }

    pub fn is_production(&self) -> bool {
        self.production
    }

    pub fn api_server_url(&self) -> &str {
        &self.api_server_url
    }

    pub fn auth0(&self) -> &Auth0Settings {
        &self.auth0
    }
}

fn validate_tenant_prefix(value: &str) -> Result<(), ValidationError> {
    let is_host_label = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
    if is_host_label && !value.starts_with('.') && !value.ends_with('.') {
        Ok(())
    } else {
        Err(ValidationError::new("tenant_prefix"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use serde_json::Value;

    use super::*;

    fn shape(value: &Value) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();
        if let Value::Object(map) = value {
            for (key, inner) in map {
                keys.insert(key.clone());
                for nested in shape(inner) {
                    keys.insert(format!("{key}.{nested}"));
                }
            }
        }
        keys
    }

    #[test]
    fn development_literal_values() {
        let env = Environment::development();

        assert!(!env.is_production());
        assert_eq!(env.name(), EnvironmentName::Development);
        assert_eq!(env.api_server_url(), "http://127.0.0.1:5000");
        assert_eq!(env.auth0().url(), "dev-0yekb24q.us");
        assert_eq!(
            env.auth0().audience(),
            "https://127.0.0.1:8100/tabs/user-page"
        );
        assert_eq!(env.auth0().client_id(), "RLgaWcG7Ja5BWKTvR6b8KbPXDQvpAOo7");
        assert!(!env.auth0().client_id().is_empty());
        assert_eq!(env.auth0().callback_url(), "http://localhost:8100");
    }

    #[test]
    fn url_fields_parse() {
        for env in [Environment::development(), Environment::production()] {
            assert!(Url::parse(env.api_server_url()).is_ok());
            assert!(Url::parse(env.auth0().callback_url()).is_ok());
            assert!(Url::parse(env.auth0().audience()).is_ok());
            assert!(env.validate().is_ok());
        }
    }

    #[test]
    fn current_is_stable() {
        let first = Environment::current();
        let second = Environment::current();

        assert!(std::ptr::eq(first, second));
        assert_eq!(first, second);
        assert_eq!(first.is_production(), cfg!(feature = "production"));
    }

    #[test]
    fn variants_share_shape() {
        let dev = serde_json::to_value(Environment::development()).unwrap();
        let prod = serde_json::to_value(Environment::production()).unwrap();

        assert_eq!(shape(&dev), shape(&prod));
        assert_ne!(dev, prod);
        assert_eq!(prod["production"], Value::Bool(true));
    }

    #[test]
    fn serializes_with_front_end_field_names() {
        let value = serde_json::to_value(Environment::development()).unwrap();

        assert_eq!(value["apiServerUrl"], "http://127.0.0.1:5000");
        assert_eq!(value["auth0"]["clientId"], "RLgaWcG7Ja5BWKTvR6b8KbPXDQvpAOo7");
        assert_eq!(value["auth0"]["callbackURL"], "http://localhost:8100");
        assert_eq!(value["production"], false);
    }

    #[test]
    fn named_resolves_both_variants() {
        let dev: EnvironmentName = "development".parse().unwrap();
        let prod: EnvironmentName = "PROD".parse().unwrap();

        assert_eq!(Environment::named(dev), Environment::development());
        assert_eq!(Environment::named(prod), Environment::production());
        assert!(matches!(
            "staging".parse::<EnvironmentName>(),
            Err(EnvironmentError::UnknownName(_))
        ));
    }

    #[test]
    fn derives_tenant_endpoints() {
        let auth0 = Environment::development().auth0().clone();

        assert_eq!(auth0.domain(), "dev-0yekb24q.us.auth0.com");
        assert_eq!(auth0.issuer(), "https://dev-0yekb24q.us.auth0.com/");

        let link = auth0.authorize_url().unwrap();
        assert_eq!(link.host_str(), Some("dev-0yekb24q.us.auth0.com"));
        assert_eq!(link.path(), "/authorize");
        let params: Vec<(String, String)> = link.query_pairs().into_owned().collect();
        assert!(params.contains(&("response_type".into(), "token".into())));
        assert!(params.contains(&(
            "client_id".into(),
            "RLgaWcG7Ja5BWKTvR6b8KbPXDQvpAOo7".into()
        )));
        assert!(params.contains(&("redirect_uri".into(), "http://localhost:8100".into())));
    }

    #[test]
    fn validation_rejects_broken_records() {
        let mut value = serde_json::to_value(Environment::development()).unwrap();
        value["auth0"]["clientId"] = Value::String(String::new());
        value["apiServerUrl"] = Value::String("not a url".into());
        let broken: Environment = serde_json::from_value(value).unwrap();

        let errors = broken.validate().unwrap_err();
        let fields = errors.errors();
        assert_eq!(fields.len(), 2);
        assert!(fields.contains_key("auth0"));
    }

    #[test]
    fn tenant_prefix_rejects_urls() {
        assert!(validate_tenant_prefix("dev-0yekb24q.us").is_ok());
        assert!(validate_tenant_prefix("https://dev-0yekb24q.us").is_err());
        assert!(validate_tenant_prefix(".us").is_err());
    }
}
