// Table rows and display strings handed to the renderer
use crate::domain::alert::Alert;
use crate::domain::lifecycle::{LifecycleRecord, RecordPayload, RecordState};
use crate::domain::telemetry::PumpType;
use crate::domain::timestamp::parse_timestamp;
use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RecordRow {
    Session {
        id: u64,
        date_span: String,
        pump_type: String,
        avg_speed: String,
        sprayed_amount: String,
        comments: String,
        history_link: String,
    },
    Product {
        id: u64,
        date_span: String,
        gelcoat_material: String,
        barrier_material: String,
        comments: String,
        history_link: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordTable {
    pub list: RecordState,
    pub rows: Vec<RecordRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRow {
    pub message: String,
    pub more_info: String,
    pub time: String,
}

/// `/History` deep link reproducing the chart for a record's window.
pub fn history_link(start: &str, end: &str, pump_type: &str) -> String {
    format!(
        "/History?startDate={}&endDate={}&pumpType={}",
        urlencoding::encode(start),
        urlencoding::encode(end),
        urlencoding::encode(&pump_type.to_lowercase())
    )
}

/// `barrier` -> `Barrier`.
fn capitalised(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `2024-03-01 From 01:00:00 PM To 01:05:00 PM`; raw strings when unparseable.
pub fn date_span(start: &str, end: &str) -> String {
    match (parse_timestamp(start), parse_timestamp(end)) {
        (Some(from), Some(to)) => format!(
            "{} From {} To {}",
            from.format("%Y-%m-%d"),
            from.format("%I:%M:%S %p"),
            to.format("%I:%M:%S %p")
        ),
        _ => format!("From {} To {}", start, end),
    }
}

/// Backend amounts are in tens of grams.
fn grams(amount: f64) -> String {
    format!("{:.2} g", amount * 10.0)
}

impl From<&LifecycleRecord> for RecordRow {
    fn from(record: &LifecycleRecord) -> Self {
        let date_span = date_span(&record.start_time, &record.end_time);
        match &record.payload {
            RecordPayload::Session {
                pump_type,
                avg_speed,
                total_sprayed_amount,
                ..
            } => RecordRow::Session {
                id: record.id,
                date_span,
                pump_type: capitalised(pump_type),
                avg_speed: format!("{:.2}", avg_speed),
                sprayed_amount: grams(*total_sprayed_amount),
                comments: record.comments.clone(),
                history_link: history_link(&record.start_time, &record.end_time, pump_type),
            },
            RecordPayload::Product {
                gelcoat_material,
                barrier_material,
            } => RecordRow::Product {
                id: record.id,
                date_span,
                gelcoat_material: grams(*gelcoat_material),
                barrier_material: grams(*barrier_material),
                comments: record.comments.clone(),
                // products are charted against the gelcoat pump
                history_link: history_link(&record.start_time, &record.end_time, PumpType::Gelcoat.as_str()),
            },
        }
    }
}

fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}

/// `March 1st 2024, 1:05:00 pm`
pub fn alert_time(time: &NaiveDateTime) -> String {
    format!(
        "{} {} {}, {}",
        time.format("%B"),
        ordinal(time.day()),
        time.year(),
        time.format("%-I:%M:%S %P")
    )
}

impl From<&Alert> for AlertRow {
    fn from(alert: &Alert) -> Self {
        AlertRow {
            message: alert.message.clone(),
            more_info: alert.more_info.clone(),
            time: parse_timestamp(&alert.time)
                .map(|t| alert_time(&t))
                .unwrap_or_else(|| alert.time.clone()),
        }
    }
}
