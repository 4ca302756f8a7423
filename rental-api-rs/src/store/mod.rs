//! Backing store for the car-rental dataset
//!
//! The service only depends on the [`CarStore`] trait; persistence
//! lives behind it. [`MemoryStore`] is the in-process implementation
//! used by the binary and the tests: a small static fleet keyed by
//! country and city.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filters::FilterCriteria;
use crate::telemetry::RequestTrace;
use rental_sdk::FailureClass;

/// Failure of a backing-store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested filter dimension is not one of the known tags.
    #[error("unknown filter tag: {0}")]
    TagNotFound(String),

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other store failure.
    #[error("store failure: {0}")]
    Internal(String),
}

impl FailureClass for StoreError {
    fn trips_breaker(&self) -> bool {
        // An unknown tag is a correct answer from a healthy store
        !matches!(self, StoreError::TagNotFound(_))
    }
}

/// One rentable car in the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarRecord {
    pub company: String,
    pub model: String,
    #[serde(rename = "type")]
    pub car_type: String,
    pub style: String,
    pub cost_per_day: u64,
}

/// Read-only operations over the car-rental dataset.
///
/// The trace handle is threaded through so implementations can attach
/// nested spans under the request. Implementations own all validation
/// of country and city; the handlers pass them through verbatim.
#[async_trait]
pub trait CarStore: Send + Sync {
    /// The set of valid values for one filter dimension.
    ///
    /// Fails with [`StoreError::TagNotFound`] when `tag` is not a
    /// known dimension.
    async fn filter_values(
        &self,
        tag: &str,
        trace: &RequestTrace,
    ) -> Result<Vec<String>, StoreError>;

    /// The cars in `country`/`city` matching the criteria.
    async fn cars(
        &self,
        country: &str,
        city: &str,
        criteria: &FilterCriteria,
        trace: &RequestTrace,
    ) -> Result<Vec<CarRecord>, StoreError>;
}

/// In-memory store over a seeded static fleet.
pub struct MemoryStore {
    fleet: HashMap<(String, String), Vec<CarRecord>>,
}

impl MemoryStore {
    /// Known filter dimensions.
    pub const TAGS: [&'static str; 4] = ["company", "car", "type", "style"];

    pub fn new(fleet: HashMap<(String, String), Vec<CarRecord>>) -> Self {
        Self { fleet }
    }

    /// A store seeded with a small demo fleet.
    pub fn seeded() -> Self {
        let mut fleet = HashMap::new();
        fleet.insert(
            ("usa".to_string(), "new-york".to_string()),
            vec![
                car("Hertz", "Toyota Camry", "Sedan", "Economy", 45),
                car("Hertz", "Ford Explorer", "SUV", "Standard", 80),
                car("Avis", "Honda Civic", "Sedan", "Economy", 40),
                car("Avis", "BMW 5 Series", "Sedan", "Luxury", 150),
                car("Enterprise", "Chrysler Pacifica", "Van", "Family", 95),
                car("Enterprise", "Jeep Wrangler", "SUV", "Standard", 85),
            ],
        );
        fleet.insert(
            ("spain".to_string(), "barcelona".to_string()),
            vec![
                car("Hertz", "Seat Ibiza", "Hatchback", "Economy", 30),
                car("Europcar", "Renault Clio", "Hatchback", "Economy", 28),
                car("Europcar", "Mercedes E-Class", "Sedan", "Luxury", 120),
            ],
        );
        Self::new(fleet)
    }

    fn matches(record: &CarRecord, criteria: &FilterCriteria) -> bool {
        let in_list = |values: &Option<Vec<String>>, field: &str| match values {
            Some(list) => list.iter().any(|v| v == field),
            None => true,
        };

        in_list(&criteria.company, &record.company)
            && in_list(&criteria.car, &record.model)
            && in_list(&criteria.car_type, &record.car_type)
            && in_list(&criteria.style, &record.style)
            && criteria.min_cost.map_or(true, |min| record.cost_per_day >= min)
            && criteria.max_cost.map_or(true, |max| record.cost_per_day <= max)
    }
}

fn car(company: &str, model: &str, car_type: &str, style: &str, cost_per_day: u64) -> CarRecord {
    CarRecord {
        company: company.to_string(),
        model: model.to_string(),
        car_type: car_type.to_string(),
        style: style.to_string(),
        cost_per_day,
    }
}

#[async_trait]
impl CarStore for MemoryStore {
    async fn filter_values(
        &self,
        tag: &str,
        trace: &RequestTrace,
    ) -> Result<Vec<String>, StoreError> {
        let _span = tracing::info_span!(parent: trace.span(), "store.filter_values", tag).entered();

        if !Self::TAGS.iter().any(|known| *known == tag) {
            return Err(StoreError::TagNotFound(tag.to_string()));
        }

        let values: BTreeSet<String> = self
            .fleet
            .values()
            .flatten()
            .map(|record| match tag {
                "company" => record.company.clone(),
                "car" => record.model.clone(),
                "type" => record.car_type.clone(),
                _ => record.style.clone(),
            })
            .collect();

        Ok(values.into_iter().collect())
    }

    async fn cars(
        &self,
        country: &str,
        city: &str,
        criteria: &FilterCriteria,
        trace: &RequestTrace,
    ) -> Result<Vec<CarRecord>, StoreError> {
        let _span =
            tracing::info_span!(parent: trace.span(), "store.cars", country, city).entered();

        let key = (
            country.to_ascii_lowercase(),
            city.to_ascii_lowercase(),
        );
        let cars = self
            .fleet
            .get(&key)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| Self::matches(record, criteria))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(cars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace() -> RequestTrace {
        RequestTrace::new("info", "GET", "/test")
    }

    #[tokio::test]
    async fn known_tag_returns_distinct_sorted_values() {
        let store = MemoryStore::seeded();
        let values = store.filter_values("company", &trace()).await.unwrap();

        assert!(values.contains(&"Hertz".to_string()));
        assert!(values.contains(&"Avis".to_string()));
        let mut sorted = values.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(values, sorted);
    }

    #[tokio::test]
    async fn unknown_tag_is_a_domain_error_that_spares_the_breaker() {
        let store = MemoryStore::seeded();
        let err = store
            .filter_values("doesnotexist", &trace())
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::TagNotFound(_)));
        assert_eq!(err.to_string(), "unknown filter tag: doesnotexist");
        assert!(!err.trips_breaker());
    }

    #[tokio::test]
    async fn criteria_constrain_the_result() {
        let store = MemoryStore::seeded();
        let criteria = FilterCriteria {
            car_type: Some(vec!["Sedan".into()]),
            max_cost: Some(50),
            ..FilterCriteria::default()
        };

        let cars = store
            .cars("usa", "new-york", &criteria, &trace())
            .await
            .unwrap();

        assert_eq!(cars.len(), 2);
        assert!(cars
            .iter()
            .all(|c| c.car_type == "Sedan" && c.cost_per_day <= 50));
    }

    #[tokio::test]
    async fn absent_criteria_match_everything() {
        let store = MemoryStore::seeded();
        let cars = store
            .cars("usa", "new-york", &FilterCriteria::default(), &trace())
            .await
            .unwrap();
        assert_eq!(cars.len(), 6);
    }

    #[tokio::test]
    async fn unknown_city_yields_an_empty_list() {
        let store = MemoryStore::seeded();
        let cars = store
            .cars("france", "paris", &FilterCriteria::default(), &trace())
            .await
            .unwrap();
        assert!(cars.is_empty());
    }

    #[tokio::test]
    async fn out_of_order_bounds_simply_match_nothing() {
        let store = MemoryStore::seeded();
        let criteria = FilterCriteria {
            min_cost: Some(100),
            max_cost: Some(10),
            ..FilterCriteria::default()
        };
        let cars = store
            .cars("usa", "new-york", &criteria, &trace())
            .await
            .unwrap();
        assert!(cars.is_empty());
    }
}
