// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Attribute rendering: timestamps, omission and nested values.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use jsonapi_core::{marshal, zero_time, Resource};
use serde_json::{json, Value};
use std::collections::BTreeMap;

#[derive(Resource)]
struct Event {
    #[jsonapi("primary,events")]
    id: u8,
    #[jsonapi("attr,unix")]
    unix: DateTime<Utc>,
    #[jsonapi("attr,iso,iso8601")]
    iso: DateTime<Utc>,
    #[jsonapi("attr,rfc,rfc3339")]
    rfc: DateTime<Utc>,
    #[jsonapi("attr,maybe")]
    maybe: Option<DateTime<Utc>>,
    #[jsonapi("attr,maybe-omitted,omitempty")]
    maybe_omitted: Option<DateTime<Utc>>,
}

#[derive(Resource)]
struct Meeting {
    #[jsonapi("primary,meetings")]
    id: i16,
    #[jsonapi("attr,at,rfc3339")]
    at: DateTime<FixedOffset>,
}

#[derive(Resource, Default)]
struct Profile {
    #[jsonapi("primary,profiles")]
    id: String,
    #[jsonapi("client-id")]
    client_id: String,
    #[jsonapi("attr,nickname,omitempty")]
    nickname: String,
    #[jsonapi("attr,age")]
    age: u16,
    #[jsonapi("attr,score,omitempty")]
    score: f64,
    #[jsonapi("attr,active,omitempty")]
    active: bool,
    #[jsonapi("attr,bio")]
    bio: Option<String>,
    #[jsonapi("attr,level,omitempty")]
    level: Option<i32>,
    #[jsonapi("attr,aliases,omitempty")]
    aliases: Vec<String>,
    #[jsonapi("attr,settings")]
    settings: BTreeMap<String, i64>,
    #[jsonapi("attr,extra")]
    extra: Value,
    secret: String,
}

fn attributes<R: Resource>(model: &R) -> Value {
    let payload = marshal(model).unwrap();
    serde_json::to_value(&payload).unwrap()["data"]["attributes"].clone()
}

fn moment() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 8, 17, 8, 27, 12).unwrap()
}

#[test]
fn timestamps_follow_their_modifiers() {
    let event = Event {
        id: 1,
        unix: moment(),
        iso: moment(),
        rfc: moment(),
        maybe: None,
        maybe_omitted: None,
    };
    assert_eq!(
        attributes(&event),
        json!({
            "unix": 1_471_422_432,
            "iso": "2016-08-17T08:27:12Z",
            "rfc": "2016-08-17T08:27:12Z",
            "maybe": null
        })
    );
}

#[test]
fn zero_timestamps_are_left_out() {
    let event = Event {
        id: 1,
        unix: zero_time(),
        iso: zero_time(),
        rfc: zero_time(),
        maybe: Some(moment()),
        maybe_omitted: Some(zero_time()),
    };
    assert_eq!(attributes(&event), json!({"maybe": 1_471_422_432}));
}

#[test]
fn unix_epoch_is_rendered() {
    let epoch = DateTime::<Utc>::UNIX_EPOCH;
    let event = Event {
        id: 1,
        unix: epoch,
        iso: epoch,
        rfc: epoch,
        maybe: Some(epoch),
        maybe_omitted: Some(epoch),
    };
    assert_eq!(
        attributes(&event),
        json!({
            "unix": 0,
            "iso": "1970-01-01T00:00:00Z",
            "rfc": "1970-01-01T00:00:00Z",
            "maybe": 0,
            "maybe-omitted": 0
        })
    );
}

#[test]
fn offset_timestamps_are_rendered_in_utc() {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let meeting = Meeting {
        id: 5,
        at: moment().with_timezone(&offset),
    };
    assert_eq!(attributes(&meeting), json!({"at": "2016-08-17T08:27:12Z"}));
}

#[test]
fn omitempty_drops_defaults_but_not_present_optionals() {
    let profile = Profile {
        id: "p1".into(),
        level: Some(0),
        ..Profile::default()
    };
    assert_eq!(
        attributes(&profile),
        json!({
            "age": 0,
            "bio": null,
            "level": 0,
            "settings": {},
            "extra": null
        })
    );
}

#[test]
fn populated_values_are_rendered() {
    let profile = Profile {
        id: "p1".into(),
        client_id: "tmp-1".into(),
        nickname: "ada".into(),
        age: 36,
        score: 9.5,
        active: true,
        bio: Some("mathematician".into()),
        level: None,
        aliases: vec!["Countess".into()],
        settings: BTreeMap::from([("theme".to_owned(), 2)]),
        extra: json!({"k": [1, 2]}),
        secret: "hidden".into(),
    };
    let payload = marshal(&profile).unwrap();
    let doc = serde_json::to_value(&payload).unwrap();
    assert_eq!(doc["data"]["client-id"], json!("tmp-1"));
    assert_eq!(
        doc["data"]["attributes"],
        json!({
            "nickname": "ada",
            "age": 36,
            "score": 9.5,
            "active": true,
            "bio": "mathematician",
            "aliases": ["Countess"],
            "settings": {"theme": 2},
            "extra": {"k": [1, 2]}
        })
    );
    assert!(!doc.to_string().contains("hidden"));
}

#[test]
fn non_finite_floats_become_null() {
    let profile = Profile {
        id: "p1".into(),
        score: f64::NAN,
        ..Profile::default()
    };
    assert_eq!(attributes(&profile)["score"], Value::Null);
}
