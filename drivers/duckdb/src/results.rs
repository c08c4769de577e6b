use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use duckdb::arrow::datatypes::DataType;
use duckdb::types::{TimeUnit, ValueRef};
use jiff::civil::{Date, Time};
use jiff::tz::Offset;
use jiff::{SignedDuration, Timestamp, ToSpan};
use sqlbatch_driver::Error::{ExecutionError, UnsupportedColumnType};
use sqlbatch_driver::{Result, Value};

/// Convert a duckdb row value at the given column index to a [`Value`]
pub(crate) fn convert_to_value(
    row: &duckdb::Row,
    column_name: &str,
    column_index: usize,
) -> Result<Value> {
    let value_ref = row
        .get_ref(column_index)
        .map_err(|error| ExecutionError(error.to_string()))?;
    let value = match value_ref {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(value) => Value::Bool(value),
        ValueRef::TinyInt(value) => Value::from(value),
        ValueRef::SmallInt(value) => Value::from(value),
        ValueRef::Int(value) => Value::from(value),
        ValueRef::BigInt(value) => Value::I64(value),
        ValueRef::HugeInt(value) => {
            i64::try_from(value).map_or_else(|_| Value::String(value.to_string()), Value::I64)
        }
        ValueRef::UTinyInt(value) => Value::from(value),
        ValueRef::USmallInt(value) => Value::from(value),
        ValueRef::UInt(value) => Value::from(value),
        ValueRef::UBigInt(value) => {
            i64::try_from(value).map_or_else(|_| Value::String(value.to_string()), Value::I64)
        }
        ValueRef::Float(value) => Value::from(value),
        ValueRef::Double(value) => Value::F64(value),
        ValueRef::Decimal(value) => Value::String(value.to_string()),
        ValueRef::Text(value) => Value::String(String::from_utf8(value.to_vec())?),
        ValueRef::Blob(value) => Value::String(STANDARD.encode(value)),
        ValueRef::Date32(value) => {
            let date = Date::new(1970, 1, 1)?.checked_add(i64::from(value).days())?;
            Value::Date(date)
        }
        ValueRef::Time64(unit, value) => {
            let time = Time::midnight().checked_add(duration(unit, value))?;
            Value::Time(time)
        }
        ValueRef::Timestamp(unit, value) => {
            let timestamp = Timestamp::UNIX_EPOCH.checked_add(duration(unit, value))?;
            let data_type = row.as_ref().column_type(column_index);
            if matches!(data_type, DataType::Timestamp(_, Some(_))) {
                Value::Timestamp(timestamp)
            } else {
                Value::DateTime(Offset::UTC.to_datetime(timestamp))
            }
        }
        ValueRef::Interval {
            months,
            days,
            nanos,
        } => Value::String(interval_to_string(months, days, nanos)),
        ValueRef::Enum(..) => {
            let value = value_ref
                .as_str()
                .map_err(|error| ExecutionError(error.to_string()))?;
            Value::String(value.to_string())
        }
        _ => {
            let data_type = value_ref.data_type();
            return Err(UnsupportedColumnType {
                column_name: column_name.to_string(),
                column_type: data_type.to_string(),
            });
        }
    };

    Ok(value)
}

fn duration(unit: TimeUnit, value: i64) -> SignedDuration {
    match unit {
        TimeUnit::Second => SignedDuration::from_secs(value),
        TimeUnit::Millisecond => SignedDuration::from_millis(value),
        TimeUnit::Microsecond => SignedDuration::from_micros(value),
        TimeUnit::Nanosecond => SignedDuration::from_nanos(value),
    }
}

/// Render an interval the way duckdb prints it, e.g. `1 year 2 months 3 days 04:05:06.5`
fn interval_to_string(months: i32, days: i32, nanos: i64) -> String {
    let mut parts = Vec::new();
    push_unit(&mut parts, months / 12, "year");
    push_unit(&mut parts, months % 12, "month");
    push_unit(&mut parts, days, "day");

    if nanos != 0 || parts.is_empty() {
        let sign = if nanos < 0 { "-" } else { "" };
        let micros = nanos.unsigned_abs() / 1_000;
        let (seconds, micros) = (micros / 1_000_000, micros % 1_000_000);
        let mut time = format!(
            "{sign}{:02}:{:02}:{:02}",
            seconds / 3_600,
            seconds / 60 % 60,
            seconds % 60
        );
        if micros != 0 {
            let fraction = format!("{micros:06}");
            time.push('.');
            time.push_str(fraction.trim_end_matches('0'));
        }
        parts.push(time);
    }

    parts.join(" ")
}

fn push_unit(parts: &mut Vec<String>, value: i32, unit: &str) {
    match value {
        0 => {}
        1 | -1 => parts.push(format!("{value} {unit}")),
        _ => parts.push(format!("{value} {unit}s")),
    }
}
