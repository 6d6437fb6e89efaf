use chrono::Utc;
use serde_json::Value;
use std::env;

use crate::entities::registration::{normalize_docket, normalize_dot};
use crate::entities::{AuthorityStatus, OperationCode, RegistrySnapshot};
use crate::error::{
    registry_access_denied_error, registry_not_found_error, registry_unavailable_error,
    unrecognized_shape_error, Error,
};

#[tracing::instrument]
pub async fn find_by_dot(dot_number: &str) -> Result<RegistrySnapshot, Error> {
    let api_base = env::var("FMCSA_API_BASE")?;
    let url = format!("https://{}/carriers/{}", api_base, dot_number);

    fetch(url).await
}

#[tracing::instrument]
pub async fn find_by_docket(docket: &str) -> Result<RegistrySnapshot, Error> {
    let api_base = env::var("FMCSA_API_BASE")?;
    let url = format!("https://{}/carriers/docket-number/{}", api_base, docket);

    fetch(url).await
}

async fn fetch(url: String) -> Result<RegistrySnapshot, Error> {
    let web_key = env::var("FMCSA_WEBKEY")?;

    let res = reqwest::Client::new()
        .get(url)
        .query(&[("webKey", web_key)])
        .send()
        .await?;

    let status_code = res.status().as_u16();

    if status_code == 403 {
        return Err(registry_access_denied_error());
    } else if status_code == 404 {
        return Err(registry_not_found_error());
    } else if status_code != 200 {
        return Err(registry_unavailable_error());
    }

    let payload: Value = res
        .json()
        .await
        .map_err(|_| registry_unavailable_error())?;

    decode_payload(payload)
}

// The registry answers in one of three shapes: the carrier record itself, a
// record nested under a `content` envelope, or a list whose first element is
// the record.
enum PayloadShape {
    Record,
    Enveloped,
    Listed,
}

fn detect_shape(payload: &Value) -> Option<PayloadShape> {
    match payload {
        Value::Array(_) => Some(PayloadShape::Listed),
        Value::Object(fields) if fields.contains_key("content") => Some(PayloadShape::Enveloped),
        Value::Object(fields) if fields.contains_key("carrier") || fields.contains_key("dotNumber") => {
            Some(PayloadShape::Record)
        }
        _ => None,
    }
}

pub fn decode_payload(payload: Value) -> Result<RegistrySnapshot, Error> {
    let record = match detect_shape(&payload) {
        Some(PayloadShape::Record) => decode_record(&payload)?,
        Some(PayloadShape::Enveloped) => decode_enveloped(&payload)?,
        Some(PayloadShape::Listed) => decode_listed(&payload)?,
        None => return Err(unrecognized_shape_error()),
    };

    Ok(snapshot_from_record(record, &payload))
}

fn decode_record(payload: &Value) -> Result<&Value, Error> {
    record_of(payload)
}

fn decode_enveloped(payload: &Value) -> Result<&Value, Error> {
    match &payload["content"] {
        Value::Array(items) => match items.first() {
            Some(item) => record_of(item),
            None => Err(registry_not_found_error()),
        },
        content @ Value::Object(_) => record_of(content),
        _ => Err(unrecognized_shape_error()),
    }
}

fn decode_listed(payload: &Value) -> Result<&Value, Error> {
    match payload {
        Value::Array(items) => match items.first() {
            Some(item) => record_of(item),
            None => Err(registry_not_found_error()),
        },
        _ => Err(unrecognized_shape_error()),
    }
}

// Some shapes wrap the record once more under a `carrier` key.
fn record_of(value: &Value) -> Result<&Value, Error> {
    match &value["carrier"] {
        carrier @ Value::Object(_) => Ok(carrier),
        _ => match value {
            Value::Object(_) => Ok(value),
            _ => Err(unrecognized_shape_error()),
        },
    }
}

fn snapshot_from_record(record: &Value, raw: &Value) -> RegistrySnapshot {
    RegistrySnapshot {
        legal_name: text(record, "legalName"),
        physical_address: physical_address(record),
        phone: text(record, "telephone"),
        dot_number: text(record, "dotNumber").and_then(|v| normalize_dot(&v)),
        mc_number: text(record, "mcNumber").and_then(|v| normalize_docket(&v)),
        common_authority: authority(record, "commonAuthorityStatus"),
        contract_authority: authority(record, "contractAuthorityStatus"),
        broker_authority: authority(record, "brokerAuthorityStatus"),
        allowed_to_operate: yes_no(record, "allowedToOperate"),
        operation_code: operation(record),
        active_status: record["statusCode"].as_str().map(str::trim) == Some("A"),
        vehicle_oos_rate: rate(record, "vehicleOosRate"),
        vehicle_oos_national_average: rate(record, "vehicleOosRateNationalAverage"),
        driver_oos_rate: rate(record, "driverOosRate"),
        driver_oos_national_average: rate(record, "driverOosRateNationalAverage"),
        raw: raw.clone(),
        fetched_at: Utc::now(),
    }
}

fn text(record: &Value, key: &str) -> Option<String> {
    match &record[key] {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn physical_address(record: &Value) -> Option<String> {
    let parts: Vec<String> = ["phyStreet", "phyCity", "phyState", "phyZipcode"]
        .iter()
        .filter_map(|key| text(record, key))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn authority(record: &Value, key: &str) -> AuthorityStatus {
    match record[key].as_str().map(str::trim) {
        Some("A") => AuthorityStatus::Active,
        Some("I") => AuthorityStatus::Inactive,
        _ => AuthorityStatus::Unknown,
    }
}

fn yes_no(record: &Value, key: &str) -> Option<bool> {
    match record[key].as_str().map(str::trim) {
        Some("Y") => Some(true),
        Some("N") => Some(false),
        _ => None,
    }
}

fn operation(record: &Value) -> OperationCode {
    let code = record["carrierOperation"]["carrierOperationCode"]
        .as_str()
        .or_else(|| record["carrierOperation"].as_str());

    match code.map(str::trim) {
        Some("A") => OperationCode::Interstate,
        Some("B") | Some("C") => OperationCode::Intrastate,
        _ => OperationCode::Unspecified,
    }
}

// Rates arrive as numbers or strings depending on the endpoint; anything
// unparseable is treated as zero, which the classifier skips.
fn rate(record: &Value, key: &str) -> f64 {
    match &record[key] {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
fn sample_record() -> Value {
    serde_json::json!({
        "dotNumber": 12345,
        "mcNumber": "MC-123456",
        "legalName": "ACME FREIGHT LLC",
        "phyStreet": "100 Main St",
        "phyCity": "Springfield",
        "phyState": "IL",
        "phyZipcode": "62701",
        "telephone": "(555) 010-2000",
        "commonAuthorityStatus": "A",
        "contractAuthorityStatus": "I",
        "brokerAuthorityStatus": "N",
        "allowedToOperate": "Y",
        "statusCode": "A",
        "carrierOperation": {"carrierOperationCode": "A"},
        "vehicleOosRate": "2.0",
        "vehicleOosRateNationalAverage": "20.72",
        "driverOosRate": 1.25,
        "driverOosRateNationalAverage": "5.51"
    })
}

#[test]
fn all_three_shapes_decode_to_the_same_snapshot() {
    let record = sample_record();
    let enveloped = serde_json::json!({ "content": { "carrier": record.clone() } });
    let listed = serde_json::json!([record.clone()]);

    for payload in [record, enveloped, listed] {
        let snapshot = decode_payload(payload).unwrap();

        assert_eq!(snapshot.legal_name.as_deref(), Some("ACME FREIGHT LLC"));
        assert_eq!(snapshot.dot_number.as_deref(), Some("12345"));
        assert_eq!(snapshot.mc_number.as_deref(), Some("123456"));
        assert_eq!(snapshot.common_authority, AuthorityStatus::Active);
        assert_eq!(snapshot.contract_authority, AuthorityStatus::Inactive);
        assert_eq!(snapshot.broker_authority, AuthorityStatus::Unknown);
        assert_eq!(snapshot.allowed_to_operate, Some(true));
        assert_eq!(snapshot.operation_code, OperationCode::Interstate);
        assert!(snapshot.active_status);
        assert_eq!(snapshot.vehicle_oos_rate, 2.0);
        assert_eq!(snapshot.vehicle_oos_national_average, 20.72);
        assert_eq!(snapshot.driver_oos_rate, 1.25);
        assert_eq!(snapshot.driver_oos_national_average, 5.51);
    }
}

#[test]
fn raw_payload_is_retained_for_audit() {
    let listed = serde_json::json!([sample_record()]);

    let snapshot = decode_payload(listed.clone()).unwrap();

    assert_eq!(snapshot.raw, listed);
}

#[test]
fn unrecognized_shapes_are_an_explicit_error() {
    for payload in [
        serde_json::json!("just a string"),
        serde_json::json!(42),
        serde_json::json!({ "predictions": [] }),
    ] {
        let err = decode_payload(payload).unwrap_err();
        assert_eq!(err.code, 123);
    }
}

#[test]
fn an_empty_list_is_not_found() {
    let err = decode_payload(serde_json::json!([])).unwrap_err();
    assert!(err.is_registry_not_found_error());

    let err = decode_payload(serde_json::json!({ "content": [] })).unwrap_err();
    assert!(err.is_registry_not_found_error());
}

#[test]
fn unparseable_rates_coerce_to_zero() {
    let mut record = sample_record();
    record["vehicleOosRate"] = serde_json::json!("n/a");
    record["vehicleOosRateNationalAverage"] = serde_json::json!(null);
    record["driverOosRateNationalAverage"] = serde_json::json!("");

    let snapshot = decode_payload(record).unwrap();

    assert_eq!(snapshot.vehicle_oos_rate, 0.0);
    assert_eq!(snapshot.vehicle_oos_national_average, 0.0);
    assert_eq!(snapshot.driver_oos_national_average, 0.0);
}

#[test]
fn missing_flags_stay_unknown() {
    let record = serde_json::json!({ "dotNumber": "99" });

    let snapshot = decode_payload(record).unwrap();

    assert_eq!(snapshot.common_authority, AuthorityStatus::Unknown);
    assert_eq!(snapshot.allowed_to_operate, None);
    assert_eq!(snapshot.operation_code, OperationCode::Unspecified);
    assert!(!snapshot.active_status);
}
