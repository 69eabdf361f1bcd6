//! Event filtering: keyword, category, date window, and proximity.
//!
//! The filter evaluates in memory against records the store has already
//! restricted to verified events. Raw query-string values are parsed into a
//! typed [`EventFilter`] up front; user input never reaches a query string.

use chrono::{DateTime, Datelike, Days, Utc};
use std::collections::HashSet;

use crate::error::{AcaraError, Result};
use crate::geo::distance_km;
use crate::models::{CategoryId, EventRecord, GeoPoint};

/// Proximity cutoff in kilometers when the caller does not configure one.
pub const DEFAULT_RADIUS_KM: f64 = 2.0;

/// Date window modes for the start-date filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateWindow {
    /// Monday through Sunday of the week containing the clock value.
    #[default]
    Week,
    /// Same calendar month (month-of-year) as the clock value.
    Month,
    /// Same calendar year as the clock value.
    Year,
}

impl DateWindow {
    /// Unrecognized values fall back to the weekly window, matching the
    /// behavior the public endpoint has always had.
    fn parse(s: &str) -> Self {
        match s {
            "month" => DateWindow::Month,
            "year" => DateWindow::Year,
            _ => DateWindow::Week,
        }
    }

    fn matches(&self, start_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            DateWindow::Week => {
                let monday = now
                    .date_naive()
                    .checked_sub_days(Days::new(now.weekday().num_days_from_monday() as u64))
                    .expect("date within chrono range");
                let start = monday.and_hms_opt(0, 0, 0).expect("midnight is valid").and_utc();
                let end = start + chrono::Duration::days(7);
                start_date >= start && start_date < end
            }
            DateWindow::Month => start_date.month() == now.month(),
            DateWindow::Year => start_date.year() == now.year(),
        }
    }
}

/// Raw, optional query-string inputs as received at the boundary.
#[derive(Debug, Clone, Default)]
pub struct FilterParams {
    pub keyword: Option<String>,
    pub cat: Option<String>,
    pub date: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
}

/// A typed filter specification over verified events.
#[derive(Debug, Clone)]
pub struct EventFilter {
    keyword: Option<String>,
    category_id: Option<CategoryId>,
    date_window: DateWindow,
    near: Option<GeoPoint>,
    radius_km: f64,
}

/// One filter result: the record plus the computed distance when a
/// proximity point was supplied.
#[derive(Debug, Clone)]
pub struct EventHit {
    pub record: EventRecord,
    pub distance_km: Option<f64>,
}

impl EventFilter {
    /// Parse raw request parameters into a filter, rejecting malformed input.
    pub fn from_params(params: &FilterParams) -> Result<Self> {
        let category_id = match &params.cat {
            Some(raw) => Some(CategoryId(raw.trim().parse::<i64>().map_err(|_| {
                AcaraError::InvalidArgument {
                    param: "cat".to_string(),
                    reason: format!("'{}' is not a numeric category id", raw),
                }
            })?)),
            None => None,
        };

        let near = match (&params.lat, &params.lng) {
            (Some(lat), Some(lng)) => {
                let lat = parse_coord("lat", lat)?;
                let lng = parse_coord("lng", lng)?;
                Some(GeoPoint::new(lat, lng)?)
            }
            (None, None) => None,
            (Some(_), None) => {
                return Err(AcaraError::InvalidArgument {
                    param: "lng".to_string(),
                    reason: "lng is required when lat is supplied".to_string(),
                })
            }
            (None, Some(_)) => {
                return Err(AcaraError::InvalidArgument {
                    param: "lat".to_string(),
                    reason: "lat is required when lng is supplied".to_string(),
                })
            }
        };

        Ok(Self {
            keyword: params.keyword.as_ref().map(|k| k.to_lowercase()),
            category_id,
            date_window: params.date.as_deref().map(DateWindow::parse).unwrap_or_default(),
            near,
            radius_km: DEFAULT_RADIUS_KM,
        })
    }

    /// Override the proximity cutoff (kilometers).
    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    /// Evaluate the filter against candidate records.
    ///
    /// `now` is the clock the date window compares against; injecting it
    /// keeps the filter deterministic under test. Results are deduplicated
    /// by event id and ordered ascending by distance when a proximity point
    /// is present, otherwise by event id. An empty result is not an error.
    pub fn evaluate(&self, candidates: Vec<EventRecord>, now: DateTime<Utc>) -> Vec<EventHit> {
        let mut seen = HashSet::new();
        let mut hits: Vec<EventHit> = candidates
            .into_iter()
            .filter(|record| self.matches(record, now))
            .filter(|record| seen.insert(record.event.id))
            .filter_map(|record| match self.near {
                Some(origin) => {
                    let d = distance_km(origin, record.event.position);
                    (d < self.radius_km).then_some(EventHit { record, distance_km: Some(d) })
                }
                None => Some(EventHit { record, distance_km: None }),
            })
            .collect();

        match self.near {
            Some(_) => hits.sort_by(|a, b| {
                a.distance_km
                    .unwrap_or(f64::INFINITY)
                    .total_cmp(&b.distance_km.unwrap_or(f64::INFINITY))
            }),
            None => hits.sort_by_key(|hit| hit.record.event.id),
        }

        hits
    }

    fn matches(&self, record: &EventRecord, now: DateTime<Utc>) -> bool {
        if let Some(keyword) = &self.keyword {
            if !record.event.name.to_lowercase().contains(keyword.as_str()) {
                return false;
            }
        }

        if let Some(category_id) = self.category_id {
            if record.event.category_id != category_id {
                return false;
            }
        }

        self.date_window.matches(record.event.start_date, now)
    }
}

fn parse_coord(param: &str, raw: &str) -> Result<f64> {
    raw.trim().parse::<f64>().map_err(|_| AcaraError::InvalidArgument {
        param: param.to_string(),
        reason: format!("'{}' is not a number", raw),
    })
}

/// Human-readable start date for the feature properties bag,
/// e.g. `"14:30, 5 August 2026"`.
pub fn format_start_date(start_date: DateTime<Utc>) -> String {
    start_date.format("%H:%M, %-d %B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, EventId, OrganizerId, Status};
    use chrono::TimeZone;

    fn record(id: i64, name: &str, cat: i64, start: DateTime<Utc>, pos: GeoPoint) -> EventRecord {
        EventRecord {
            event: Event {
                id: EventId(id),
                name: name.to_string(),
                description: String::new(),
                content: String::new(),
                start_date: start,
                end_date: start + chrono::Duration::hours(3),
                location: String::new(),
                position: pos,
                photo: None,
                link: None,
                popular_place_id: None,
                organizer_id: OrganizerId(1),
                category_id: CategoryId(cat),
                created_at: start,
            },
            category_name: "music".to_string(),
            status: Status::Verified,
        }
    }

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    // A Wednesday, so the surrounding week runs Monday the 17th through
    // Sunday the 23rd.
    fn midweek() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 19, 12, 0, 0).unwrap()
    }

    fn filter(params: FilterParams) -> EventFilter {
        EventFilter::from_params(&params).unwrap()
    }

    #[test]
    fn keyword_is_case_insensitive_substring() {
        let now = midweek();
        let candidates = vec![
            record(1, "Jazz Night at Galeria", 1, now, point(0.0, 0.0)),
            record(2, "Craft Market", 1, now, point(0.0, 0.0)),
        ];

        let f = filter(FilterParams { keyword: Some("jazz".into()), ..Default::default() });
        let hits = f.evaluate(candidates, now);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.event.id, EventId(1));
    }

    #[test]
    fn category_must_match_exactly() {
        let now = midweek();
        let candidates = vec![
            record(1, "a", 1, now, point(0.0, 0.0)),
            record(2, "b", 2, now, point(0.0, 0.0)),
        ];

        let f = filter(FilterParams { cat: Some("2".into()), ..Default::default() });
        let hits = f.evaluate(candidates, now);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.event.id, EventId(2));
    }

    #[test]
    fn non_numeric_category_is_rejected() {
        let err = EventFilter::from_params(&FilterParams {
            cat: Some("music".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, AcaraError::InvalidArgument { .. }));
    }

    #[test]
    fn lat_without_lng_is_rejected() {
        let err = EventFilter::from_params(&FilterParams {
            lat: Some("-7.75".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, AcaraError::InvalidArgument { .. }));
    }

    #[test]
    fn week_window_spans_monday_to_sunday() {
        let now = midweek();
        let candidates = vec![
            record(1, "two days out", 1, now + chrono::Duration::days(2), point(0.0, 0.0)),
            record(2, "eight days out", 1, now + chrono::Duration::days(8), point(0.0, 0.0)),
            record(3, "last monday", 1, Utc.with_ymd_and_hms(2025, 3, 17, 0, 0, 0).unwrap(), point(0.0, 0.0)),
        ];

        let hits = filter(FilterParams::default()).evaluate(candidates, now);
        let ids: Vec<_> = hits.iter().map(|h| h.record.event.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn month_and_year_windows() {
        let now = midweek();
        let in_month = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let out_month = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let candidates = vec![
            record(1, "march", 1, in_month, point(0.0, 0.0)),
            record(2, "june", 1, out_month, point(0.0, 0.0)),
        ];

        let monthly = filter(FilterParams { date: Some("month".into()), ..Default::default() });
        let ids: Vec<_> =
            monthly.evaluate(candidates.clone(), now).iter().map(|h| h.record.event.id.0).collect();
        assert_eq!(ids, vec![1]);

        let yearly = filter(FilterParams { date: Some("year".into()), ..Default::default() });
        assert_eq!(yearly.evaluate(candidates, now).len(), 2);
    }

    #[test]
    fn unknown_date_mode_falls_back_to_week() {
        let f = filter(FilterParams { date: Some("decade".into()), ..Default::default() });
        let now = midweek();
        let far = vec![record(1, "a", 1, now + chrono::Duration::days(8), point(0.0, 0.0))];
        assert!(f.evaluate(far, now).is_empty());
    }

    #[test]
    fn proximity_keeps_only_events_under_the_radius() {
        let now = midweek();
        // Due-north offsets from the origin: 1.9 km and 2.1 km.
        let near = point((1.9_f64 / 6371.0).to_degrees(), 0.0);
        let far = point((2.1_f64 / 6371.0).to_degrees(), 0.0);
        let candidates = vec![
            record(1, "near", 1, now, near),
            record(2, "far", 1, now, far),
        ];

        let f = filter(FilterParams {
            lat: Some("0.0".into()),
            lng: Some("0.0".into()),
            ..Default::default()
        });
        let hits = f.evaluate(candidates, now);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.event.id, EventId(1));
        let d = hits[0].distance_km.unwrap();
        assert!((d - 1.9).abs() < 1e-6);
    }

    #[test]
    fn proximity_orders_ascending_by_distance() {
        let now = midweek();
        let candidates = vec![
            record(1, "far", 1, now, point((1.5_f64 / 6371.0).to_degrees(), 0.0)),
            record(2, "nearest", 1, now, point((0.2_f64 / 6371.0).to_degrees(), 0.0)),
            record(3, "middle", 1, now, point((0.9_f64 / 6371.0).to_degrees(), 0.0)),
        ];

        let f = filter(FilterParams {
            lat: Some("0.0".into()),
            lng: Some("0.0".into()),
            ..Default::default()
        });
        let hits = f.evaluate(candidates, now);
        let ids: Vec<_> = hits.iter().map(|h| h.record.event.id.0).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        let distances: Vec<_> = hits.iter().map(|h| h.distance_km.unwrap()).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn results_are_deduplicated_by_event_id() {
        let now = midweek();
        let candidates = vec![
            record(1, "a", 1, now, point(0.0, 0.0)),
            record(1, "a", 1, now, point(0.0, 0.0)),
        ];

        assert_eq!(filter(FilterParams::default()).evaluate(candidates, now).len(), 1);
    }

    #[test]
    fn no_matches_is_an_empty_result() {
        let now = midweek();
        let candidates = vec![record(1, "a", 1, now, point(0.0, 0.0))];
        let f = filter(FilterParams { keyword: Some("nothing".into()), ..Default::default() });
        assert!(f.evaluate(candidates, now).is_empty());
    }

    #[test]
    fn start_date_formatting() {
        let dt = Utc.with_ymd_and_hms(2025, 8, 5, 14, 30, 0).unwrap();
        assert_eq!(format_start_date(dt), "14:30, 5 August 2025");
    }
}
