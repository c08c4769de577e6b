use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use sqlbatch_driver::{Result, Row, Value};
use std::borrow::Cow;
use tiberius::{ColumnData, FromSql};

/// Convert a tiberius row into a row of [`Value`]s, consuming the row.
pub(crate) fn convert_row(row: tiberius::Row) -> Result<Row> {
    row.into_iter().map(convert_to_value).collect()
}

fn convert_to_value(data: ColumnData<'static>) -> Result<Value> {
    let value = match data {
        ColumnData::U8(value) => Value::from(value),
        ColumnData::I16(value) => Value::from(value),
        ColumnData::I32(value) => Value::from(value),
        ColumnData::I64(value) => Value::from(value),
        ColumnData::F32(value) => Value::from(value),
        ColumnData::F64(value) => Value::from(value),
        ColumnData::Bit(value) => Value::from(value),
        ColumnData::String(value) => Value::from(value.map(Cow::into_owned)),
        ColumnData::Guid(value) => Value::from(value.map(|value| value.to_string())),
        ColumnData::Binary(value) => Value::from(value.map(|value| STANDARD.encode(value))),
        ColumnData::Xml(value) => {
            Value::from(value.map(|value| value.into_owned().into_string()))
        }
        ColumnData::Numeric(_) => {
            let value = rust_decimal::Decimal::from_sql(&data).map_err(conversion_error)?;
            Value::from(value.map(|value| value.to_string()))
        }
        ColumnData::DateTime(_) | ColumnData::SmallDateTime(_) | ColumnData::DateTime2(_) => {
            match NaiveDateTime::from_sql(&data).map_err(conversion_error)? {
                Some(value) => Value::DateTime(to_datetime(value)?),
                None => Value::Null,
            }
        }
        ColumnData::Date(_) => match NaiveDate::from_sql(&data).map_err(conversion_error)? {
            Some(value) => Value::Date(to_date(value)?),
            None => Value::Null,
        },
        ColumnData::Time(_) => match NaiveTime::from_sql(&data).map_err(conversion_error)? {
            Some(value) => Value::Time(to_time(value)?),
            None => Value::Null,
        },
        ColumnData::DateTimeOffset(_) => {
            match chrono::DateTime::<Utc>::from_sql(&data).map_err(conversion_error)? {
                Some(value) => {
                    let nanosecond = i32::try_from(value.timestamp_subsec_nanos())?;
                    Value::Timestamp(jiff::Timestamp::new(value.timestamp(), nanosecond)?)
                }
                None => Value::Null,
            }
        }
    };
    Ok(value)
}

fn conversion_error(error: tiberius::error::Error) -> sqlbatch_driver::Error {
    sqlbatch_driver::Error::ConversionError(error.to_string())
}

fn to_date(value: NaiveDate) -> Result<jiff::civil::Date> {
    let year = i16::try_from(value.year())?;
    let month = i8::try_from(value.month())?;
    let day = i8::try_from(value.day())?;
    Ok(jiff::civil::Date::new(year, month, day)?)
}

fn to_time(value: NaiveTime) -> Result<jiff::civil::Time> {
    let hour = i8::try_from(value.hour())?;
    let minute = i8::try_from(value.minute())?;
    let second = i8::try_from(value.second())?;
    let nanosecond = i32::try_from(value.nanosecond())?;
    Ok(jiff::civil::Time::new(hour, minute, second, nanosecond)?)
}

fn to_datetime(value: NaiveDateTime) -> Result<jiff::civil::DateTime> {
    Ok(to_date(value.date())?.to_datetime(to_time(value.time())?))
}
