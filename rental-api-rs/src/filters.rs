//! Normalization of raw query parameters into typed filter criteria
//!
//! Everything here is pure: raw strings in, criteria out. Two
//! deliberate policies apply:
//!
//! - list parameters split on `,` with order and empty tokens
//!   preserved, no trimming, no deduplication; an absent or empty
//!   parameter yields an absent field, not an empty list;
//! - cost bounds use **permissive numeric parsing**: the longest
//!   leading run of base-10 digits is taken (`"50abc"` parses to 50),
//!   and input with no leading digits yields an absent field rather
//!   than an error.
//!
//! Out-of-order bounds (`mincost` above `maxcost`) are passed through
//! untouched; whether that matches anything is the store's business.

use serde::{Deserialize, Serialize};

/// Raw query parameters exactly as they arrive on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFilterQuery {
    pub company: Option<String>,
    pub car: Option<String>,
    #[serde(rename = "type")]
    pub car_type: Option<String>,
    pub style: Option<String>,
    pub mincost: Option<String>,
    pub maxcost: Option<String>,
}

/// Typed filter criteria handed to the backing store.
///
/// A field is present only if its source parameter was non-empty and,
/// for the cost bounds, started with a parseable integer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub company: Option<Vec<String>>,
    pub car: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub car_type: Option<Vec<String>>,
    pub style: Option<Vec<String>>,
    pub min_cost: Option<u64>,
    pub max_cost: Option<u64>,
}

/// Convert raw query parameters into filter criteria.
pub fn normalize(raw: &RawFilterQuery) -> FilterCriteria {
    FilterCriteria {
        company: split_list(raw.company.as_deref()),
        car: split_list(raw.car.as_deref()),
        car_type: split_list(raw.car_type.as_deref()),
        style: split_list(raw.style.as_deref()),
        min_cost: parse_cost(raw.mincost.as_deref()),
        max_cost: parse_cost(raw.maxcost.as_deref()),
    }
}

/// Split a comma-delimited parameter into an ordered list.
fn split_list(value: Option<&str>) -> Option<Vec<String>> {
    match value {
        None | Some("") => None,
        Some(s) => Some(s.split(',').map(str::to_string).collect()),
    }
}

/// Parse the leading base-10 digits of a cost bound, if any.
fn parse_cost(value: Option<&str>) -> Option<u64> {
    let s = value?;
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(field: &str, value: &str) -> RawFilterQuery {
        let mut query = RawFilterQuery::default();
        match field {
            "company" => query.company = Some(value.to_string()),
            "car" => query.car = Some(value.to_string()),
            "type" => query.car_type = Some(value.to_string()),
            "style" => query.style = Some(value.to_string()),
            "mincost" => query.mincost = Some(value.to_string()),
            "maxcost" => query.maxcost = Some(value.to_string()),
            other => panic!("unknown field {other}"),
        }
        query
    }

    #[test]
    fn splits_on_commas_preserving_order() {
        let criteria = normalize(&raw("car", "Sedan,SUV,Van"));
        assert_eq!(
            criteria.car,
            Some(vec!["Sedan".into(), "SUV".into(), "Van".into()])
        );
    }

    #[test]
    fn preserves_empty_tokens_and_whitespace() {
        let criteria = normalize(&raw("company", "Hertz,, Avis"));
        assert_eq!(
            criteria.company,
            Some(vec!["Hertz".into(), "".into(), " Avis".into()])
        );
    }

    #[test]
    fn empty_and_absent_inputs_yield_absent_fields() {
        assert_eq!(normalize(&raw("style", "")).style, None);
        assert_eq!(normalize(&RawFilterQuery::default()), FilterCriteria::default());
    }

    #[test]
    fn single_value_is_a_one_element_list() {
        let criteria = normalize(&raw("type", "Economy"));
        assert_eq!(criteria.car_type, Some(vec!["Economy".into()]));
    }

    #[test]
    fn cost_parses_leading_digits() {
        assert_eq!(normalize(&raw("mincost", "50")).min_cost, Some(50));
        assert_eq!(normalize(&raw("mincost", "50abc")).min_cost, Some(50));
        assert_eq!(normalize(&raw("maxcost", "0")).max_cost, Some(0));
    }

    #[test]
    fn unparseable_cost_is_absent_not_an_error() {
        assert_eq!(normalize(&raw("maxcost", "abc")).max_cost, None);
        assert_eq!(normalize(&raw("maxcost", "")).max_cost, None);
        assert_eq!(normalize(&raw("mincost", "-5")).min_cost, None);
    }

    #[test]
    fn out_of_order_bounds_pass_through() {
        let mut query = RawFilterQuery::default();
        query.mincost = Some("100".into());
        query.maxcost = Some("10".into());
        let criteria = normalize(&query);
        assert_eq!(criteria.min_cost, Some(100));
        assert_eq!(criteria.max_cost, Some(10));
    }
}
