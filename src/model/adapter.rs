// File: ./src/model/adapter.rs
// Handles ICS deserialization into lesson fragments
use crate::model::item::RawFragment;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use icalendar::{Calendar, CalendarComponent, Component, Event};

/// Reads a DTSTART/DTEND value. Date-only values carry no time; UTC stamps
/// are shifted into local time before the date is taken.
fn parse_stamp(val: &str) -> Option<(NaiveDate, Option<NaiveTime>)> {
    let val = val.trim();
    if val.len() == 8 {
        return NaiveDate::parse_from_str(val, "%Y%m%d")
            .ok()
            .map(|d| (d, None));
    }
    let local = if let Some(utc) = val.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S").ok()?;
        Utc.from_utc_datetime(&naive)
            .with_timezone(&Local)
            .naive_local()
    } else {
        // Floating or TZID-qualified: taken as written.
        NaiveDateTime::parse_from_str(val, "%Y%m%dT%H%M%S").ok()?
    };
    Some((local.date(), Some(local.time())))
}

fn stamp(event: &Event, name: &str) -> Option<(NaiveDate, Option<NaiveTime>)> {
    event
        .properties()
        .get(name)
        .and_then(|p| parse_stamp(p.value()))
}

fn event_fragment(event: &Event, date: NaiveDate) -> Option<RawFragment> {
    let (start_date, start) = stamp(event, "DTSTART")?;
    if start_date != date {
        return None;
    }
    let end = stamp(event, "DTEND").and_then(|(_, t)| t);

    Some(RawFragment::Event {
        summary: event.get_summary().unwrap_or("").to_string(),
        description: event.get_description().unwrap_or("").to_string(),
        start,
        end,
    })
}

/// All VEVENTs of `raw_ics` that start on `date`, in file order.
pub fn fragments_on(raw_ics: &str, date: NaiveDate) -> Result<Vec<RawFragment>, String> {
    let calendar: Calendar = raw_ics.parse().map_err(|e| format!("Parse: {}", e))?;
    Ok(calendar
        .components
        .iter()
        .filter_map(|c| match c {
            CalendarComponent::Event(e) => Some(e),
            _ => None,
        })
        .filter_map(|event| event_fragment(event, date))
        .collect())
}
