use crate::error::ValidationError;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Identity assigned to a city by the store.
pub type CityId = i64;

const MIN_RATING: u8 = 1;
const MAX_RATING: u8 = 5;

/// A stored city record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub country: String,
    /// Tourist rating from 1 to 5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tourist_rating: Option<u8>,
    /// Establishment date as an ISO `YYYY-MM-DD` string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_established: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_population: Option<i64>,
}

/// A city that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCity {
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    pub country: String,
    #[serde(default)]
    pub tourist_rating: Option<u8>,
    #[serde(default)]
    pub date_established: Option<String>,
    #[serde(default)]
    pub estimated_population: Option<i64>,
}

impl NewCity {
    /// Creates a city with only the required fields set.
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: None,
            country: country.into(),
            tourist_rating: None,
            date_established: None,
            estimated_population: None,
        }
    }

    /// Checks the input before it is handed to a repository.
    ///
    /// Name and country must be non-blank; the optional details follow the
    /// same rules as [`CityUpdate::validate`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.country.trim().is_empty() {
            return Err(ValidationError::MissingField("country"));
        }
        validate_details(
            self.tourist_rating,
            self.date_established.as_deref(),
            self.estimated_population,
        )
    }

    /// Attaches the id assigned by the store.
    pub fn into_city(self, id: CityId) -> City {
        City {
            id,
            name: self.name,
            state: self.state,
            country: self.country,
            tourist_rating: self.tourist_rating,
            date_established: self.date_established,
            estimated_population: self.estimated_population,
        }
    }
}

/// The editable details of a stored city.
///
/// Applying an update replaces all three columns; `None` clears a column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CityUpdate {
    #[serde(default)]
    pub tourist_rating: Option<u8>,
    #[serde(default)]
    pub date_established: Option<String>,
    #[serde(default)]
    pub estimated_population: Option<i64>,
}

impl CityUpdate {
    /// Rating must be within 1..=5, the date must be a valid civil date and
    /// the population must not be negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_details(
            self.tourist_rating,
            self.date_established.as_deref(),
            self.estimated_population,
        )
    }

    pub fn apply_to(self, city: &mut City) {
        city.tourist_rating = self.tourist_rating;
        city.date_established = self.date_established;
        city.estimated_population = self.estimated_population;
    }
}

fn validate_details(
    tourist_rating: Option<u8>,
    date_established: Option<&str>,
    estimated_population: Option<i64>,
) -> Result<(), ValidationError> {
    if let Some(rating) = tourist_rating {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ValidationError::RatingOutOfRange(rating));
        }
    }

    if let Some(value) = date_established {
        value
            .parse::<Date>()
            .map_err(|e| ValidationError::InvalidDate {
                value: value.to_string(),
                reason: e.to_string(),
            })?;
    }

    if let Some(population) = estimated_population {
        if population < 0 {
            return Err(ValidationError::NegativePopulation(population));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokyo() -> NewCity {
        NewCity {
            tourist_rating: Some(4),
            date_established: Some("1457-01-01".to_string()),
            estimated_population: Some(14_000_000),
            ..NewCity::new("Tokyo", "Japan")
        }
    }

    #[test]
    fn valid_city() {
        assert_eq!(tokyo().validate(), Ok(()));
        assert_eq!(NewCity::new("Lyon", "France").validate(), Ok(()));
    }

    #[test]
    fn blank_name_or_country() {
        let err = NewCity::new("   ", "Japan").validate().unwrap_err();
        assert_eq!(err, ValidationError::MissingField("name"));

        let err = NewCity::new("Tokyo", "").validate().unwrap_err();
        assert_eq!(err, ValidationError::MissingField("country"));
    }

    #[test]
    fn rating_out_of_range() {
        for rating in [0, 6, 200] {
            let city = NewCity {
                tourist_rating: Some(rating),
                ..tokyo()
            };
            assert_eq!(
                city.validate(),
                Err(ValidationError::RatingOutOfRange(rating))
            );
        }
    }

    #[test]
    fn invalid_date() {
        let update = CityUpdate {
            date_established: Some("1850-13-45".to_string()),
            ..CityUpdate::default()
        };
        assert!(matches!(
            update.validate(),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn negative_population() {
        let update = CityUpdate {
            estimated_population: Some(-1),
            ..CityUpdate::default()
        };
        assert_eq!(
            update.validate(),
            Err(ValidationError::NegativePopulation(-1))
        );
    }

    #[test]
    fn update_replaces_all_details() {
        let mut city = tokyo().into_city(7);
        CityUpdate {
            tourist_rating: Some(5),
            date_established: None,
            estimated_population: Some(1),
        }
        .apply_to(&mut city);

        assert_eq!(city.id, 7);
        assert_eq!(city.tourist_rating, Some(5));
        assert_eq!(city.date_established, None);
        assert_eq!(city.estimated_population, Some(1));
    }

    #[test]
    fn optional_fields_default_when_missing() {
        let city: NewCity =
            serde_json::from_str(r#"{"name":"Oslo","country":"Norway"}"#).unwrap();
        assert_eq!(city, NewCity::new("Oslo", "Norway"));
    }
}
