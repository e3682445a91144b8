//! End-to-end tests for the enrichment pipeline against mocked upstreams.

use citydex_core::{EnrichedCity, NewCity};
use citydex_enrichment::{Enricher, EnrichmentConfig};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn countries() -> serde_json::Value {
    serde_json::json!([
        {
            "name": {"common": "French Polynesia", "official": "French Polynesia"},
            "flags": {"png": "https://flagcdn.com/w320/pf.png"},
            "cca2": "PF",
            "cca3": "PYF",
            "currencies": {"XPF": {"name": "CFP franc", "symbol": "₣"}}
        },
        {
            "name": {"common": "France", "official": "French Republic"},
            "flags": {"png": "https://flagcdn.com/w320/fr.png", "svg": "https://flagcdn.com/fr.svg"},
            "cca2": "FR",
            "cca3": "FRA",
            "currencies": {"EUR": {"name": "Euro", "symbol": "€"}}
        }
    ])
}

fn weather(description: &str) -> serde_json::Value {
    serde_json::json!({
        "weather": [{"main": "Clouds", "description": description}],
        "main": {"temp": 16.2, "humidity": 72},
        "wind": {"speed": 3.6}
    })
}

struct Upstreams {
    countries: MockServer,
    weather: MockServer,
}

impl Upstreams {
    async fn start() -> Self {
        Self {
            countries: MockServer::start().await,
            weather: MockServer::start().await,
        }
    }

    fn enricher(&self, api_key: Option<&str>) -> Enricher<
        citydex_enrichment::RestCountriesClient,
        citydex_enrichment::OpenWeatherClient,
    > {
        let config = EnrichmentConfig::builder()
            .countries_url(format!("{}/v3.1/all", self.countries.uri()))
            .weather_url(format!("{}/data/2.5/weather", self.weather.uri()))
            .weather_api_key(api_key.map(str::to_owned))
            .upstream_timeout(Duration::from_secs(2))
            .build();
        Enricher::from_config(&config).expect("build enricher")
    }
}

#[tokio::test]
async fn paris_is_enriched_with_country_and_weather() {
    let upstreams = Upstreams::start().await;

    Mock::given(method("GET"))
        .and(path("/v3.1/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(countries()))
        .expect(1)
        .mount(&upstreams.countries)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Paris,FR"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather("broken clouds")))
        .expect(1)
        .mount(&upstreams.weather)
        .await;

    let paris = NewCity::new("Paris", "France").into_city(1);
    let result = upstreams
        .enricher(Some("secret"))
        .enrich(vec![paris.clone()])
        .await;

    assert_eq!(result.len(), 1);
    let enriched = &result[0];
    assert_eq!(enriched.city, paris);
    assert_eq!(enriched.country_code_2.as_deref(), Some("FR"));
    assert_eq!(enriched.country_code_3.as_deref(), Some("FRA"));
    assert_eq!(enriched.currency_code.as_deref(), Some("EUR"));
    assert_eq!(enriched.flag.as_deref(), Some("https://flagcdn.com/w320/fr.png"));

    let snapshot = enriched.weather.as_ref().expect("weather should be present");
    assert_eq!(snapshot.description, "broken clouds");
    assert_eq!(snapshot.temperature, 16.2);
    assert_eq!(snapshot.humidity, 72);
    assert_eq!(snapshot.wind_speed, 3.6);
}

#[tokio::test]
async fn weather_outage_keeps_country_codes() {
    let upstreams = Upstreams::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(countries()))
        .mount(&upstreams.countries)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&upstreams.weather)
        .await;

    let result = upstreams
        .enricher(Some("secret"))
        .enrich(vec![NewCity::new("Paris", "France").into_city(1)])
        .await;

    assert_eq!(result[0].country_code_2.as_deref(), Some("FR"));
    assert_eq!(result[0].weather, None);
}

#[tokio::test]
async fn no_credential_means_no_weather_requests() {
    let upstreams = Upstreams::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(countries()))
        .mount(&upstreams.countries)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather("clear sky")))
        .expect(0)
        .mount(&upstreams.weather)
        .await;

    let result = upstreams
        .enricher(None)
        .enrich(vec![
            NewCity::new("Paris", "France").into_city(1),
            NewCity::new("Papeete", "French Polynesia").into_city(2),
        ])
        .await;

    assert_eq!(result[0].country_code_2.as_deref(), Some("FR"));
    assert_eq!(result[1].country_code_2.as_deref(), Some("PF"));
    assert!(result.iter().all(|city| city.weather.is_none()));
}

#[tokio::test]
async fn directory_outage_returns_input_unchanged() {
    let upstreams = Upstreams::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&upstreams.countries)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather("clear sky")))
        .expect(0)
        .mount(&upstreams.weather)
        .await;

    let cities = vec![
        NewCity::new("Paris", "France").into_city(1),
        NewCity::new("Lyon", "France").into_city(2),
    ];
    let result = upstreams.enricher(Some("secret")).enrich(cities.clone()).await;

    let expected: Vec<_> = cities.into_iter().map(EnrichedCity::unenriched).collect();
    assert_eq!(result, expected);
}

#[tokio::test]
async fn directory_is_cached_between_batches() {
    let upstreams = Upstreams::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(countries()))
        .expect(1)
        .mount(&upstreams.countries)
        .await;

    let enricher = upstreams.enricher(None);
    let paris = NewCity::new("Paris", "France").into_city(1);

    enricher.enrich(vec![paris.clone()]).await;
    let second = enricher.enrich(vec![paris]).await;

    assert_eq!(second[0].country_code_2.as_deref(), Some("FR"));
    assert!(enricher.directory().snapshot().is_some());
}
