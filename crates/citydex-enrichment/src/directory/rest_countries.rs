use crate::directory::CountrySource;
use crate::error::FetchError;
use async_trait::async_trait;
use citydex_core::CountryDirectoryEntry;
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;

/// The REST Countries endpoint, restricted to the fields the directory uses.
pub const DEFAULT_COUNTRIES_URL: &str =
    "https://restcountries.com/v3.1/all?fields=name,flags,cca2,cca3,currencies";

/// Country directory source backed by the REST Countries API.
#[derive(Debug, Clone)]
pub struct RestCountriesClient {
    client: Client,
    url: String,
}

impl RestCountriesClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CountrySource for RestCountriesClient {
    #[instrument(skip(self), fields(url = %self.url), level = "debug")]
    async fn fetch_countries(&self) -> Result<Vec<CountryDirectoryEntry>, FetchError> {
        let countries = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<CountryDirectoryEntry>>()
            .await?;

        Ok(countries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, timeout: Duration) -> RestCountriesClient {
        RestCountriesClient::new(format!("{}/v3.1/all", server.uri()), timeout).unwrap()
    }

    #[tokio::test]
    async fn fetches_and_decodes_directory() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3.1/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "name": {"common": "France", "official": "French Republic"},
                    "flags": {"png": "https://flagcdn.com/w320/fr.png", "svg": "https://flagcdn.com/fr.svg"},
                    "cca2": "FR",
                    "cca3": "FRA",
                    "currencies": {"EUR": {"name": "Euro", "symbol": "€"}}
                },
                {
                    "name": {"common": "Antarctica", "official": "Antarctica"},
                    "flags": {"png": "https://flagcdn.com/w320/aq.png"},
                    "cca2": "AQ",
                    "cca3": "ATA",
                    "currencies": {}
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let countries = client_for(&server, Duration::from_secs(10))
            .fetch_countries()
            .await
            .unwrap();

        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].cca2, "FR");
        assert_eq!(countries[0].primary_currency(), Some("EUR"));
        assert_eq!(countries[1].primary_currency(), None);
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = client_for(&server, Duration::from_secs(10))
            .fetch_countries()
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status(502)));
    }

    #[tokio::test]
    async fn malformed_payload_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server, Duration::from_secs(10))
            .fetch_countries()
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, Duration::from_millis(100))
            .fetch_countries()
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Timeout(_)));
    }
}
