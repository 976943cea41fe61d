// src/record.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synthetic record generation
//!
//! One [`Record`] is built from a caller-owned RNG and a reference instant.
//! Nothing here touches global state, so callers decide how RNGs are seeded and
//! shared (the producer pool gives every batch its own Xoshiro256++ instance).

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use rand::Rng;
use serde::Serialize;

pub const EVENT_NAMES: [&str; 5] = [
    "confirmation_page_view",
    "event_insider",
    "cart_cleared",
    "s3_event",
    "test_event",
];

pub const COUNTRIES: [&str; 10] = [
    "United States",
    "United Kingdom",
    "Germany",
    "France",
    "Japan",
    "Canada",
    "Australia",
    "Brazil",
    "India",
    "Mexico",
];

pub const CURRENCIES: [&str; 9] = ["USD", "EUR", "GBP", "JPY", "CAD", "AUD", "BRL", "INR", "MXN"];

pub const WORDS: [&str; 8] = [
    "test", "data", "sample", "example", "demo", "trial", "mock", "fake",
];

pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 70;
pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 1000;
pub const MAX_PRICE: f64 = 1000.0;

/// First birthday year; years span `BIRTH_YEAR_SPAN` years from here
pub const BIRTH_YEAR_START: i32 = 1950;
pub const BIRTH_YEAR_SPAN: i32 = 55;

/// Day-of-month upper bound for birthdays (valid in every month)
pub const MAX_BIRTH_DAY: u32 = 28;

/// `timestamp` lies up to this many hours before the reference instant
pub const TIMESTAMP_WINDOW_HOURS: i64 = 365 * 24;

/// `updated_at` lies up to this many hours before the reference instant
pub const UPDATED_AT_WINDOW_HOURS: i64 = 30 * 24;

/// One fabricated row. Field order is the column order of the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub email: String,
    pub uuid: String,
    pub phone_number: String,
    pub test_identifier: String,
    pub event_name: String,
    pub timestamp: String,
    pub test_parameter1: String,
    pub test_parameter2: String,
    pub email_optin: String,
    pub test_attr: String,
    pub age: String,
    pub country: String,
    pub whatsapp_optin: String,
    pub birthday: String,
    pub currency: String,
    pub quantity: String,
    pub event_group_id: String,
    pub unit_sale_price: String,
    pub unit_price: String,
    pub updated_at: String,
}

impl Record {
    /// Generate a record from `rng`, with temporal fields placed relative to `now`
    ///
    /// Always succeeds. The same RNG state and `now` produce the same record.
    pub fn generate<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> Self {
        Self {
            email: format!("user{}@example.com", rng.random_range(0..=i64::MAX)),
            uuid: random_uuid(rng),
            phone_number: format!(
                "+1-555-{:03}-{:04}",
                rng.random_range(0..1000u32),
                rng.random_range(0..10_000u32)
            ),
            test_identifier: random_uuid(rng),
            event_name: pick(rng, &EVENT_NAMES),
            timestamp: hours_before(rng, now, TIMESTAMP_WINDOW_HOURS),
            test_parameter1: format!(
                "VIN{:017}",
                rng.random_range(0..100_000_000_000_000_000u64)
            ),
            test_parameter2: format!(
                "LIC-{:03}-{:03}",
                rng.random_range(0..1000u32),
                rng.random_range(0..1000u32)
            ),
            email_optin: rng.random_bool(0.5).to_string(),
            test_attr: pick(rng, &WORDS),
            age: rng.random_range(MIN_AGE..=MAX_AGE).to_string(),
            country: pick(rng, &COUNTRIES),
            whatsapp_optin: rng.random_bool(0.5).to_string(),
            birthday: random_birthday(rng),
            currency: pick(rng, &CURRENCIES),
            quantity: rng.random_range(MIN_QUANTITY..=MAX_QUANTITY).to_string(),
            event_group_id: random_uuid(rng),
            unit_sale_price: random_price(rng),
            unit_price: random_price(rng),
            updated_at: hours_before(rng, now, UPDATED_AT_WINDOW_HOURS),
        }
    }
}

fn pick<R: Rng>(rng: &mut R, choices: &[&str]) -> String {
    choices[rng.random_range(0..choices.len())].to_string()
}

/// Random v4 UUID drawn from the caller's RNG rather than the OS
fn random_uuid<R: Rng>(rng: &mut R) -> String {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string()
}

fn hours_before<R: Rng>(rng: &mut R, now: DateTime<Utc>, window_hours: i64) -> String {
    let offset = TimeDelta::hours(rng.random_range(0..window_hours));
    (now - offset).to_rfc3339_opts(SecondsFormat::Secs, true)
}

// Day is clamped to 1..=28 so every (year, month, day) is a real date.
fn random_birthday<R: Rng>(rng: &mut R) -> String {
    let year = BIRTH_YEAR_START + rng.random_range(0..BIRTH_YEAR_SPAN);
    let month = rng.random_range(1..=12u32);
    let day = rng.random_range(1..=MAX_BIRTH_DAY);
    format!("{year:04}-{month:02}-{day:02}")
}

fn random_price<R: Rng>(rng: &mut R) -> String {
    format!("{:.2}", rng.random::<f64>() * MAX_PRICE)
}
