//! Cell decoding
//!
//! Turns binary-format column values into [`CellValue`]s. Every column is
//! read through [`Decoded`], which accepts any type: mapped types get a typed
//! value, text-like ones (text, enums, domains over text, xml) are read as
//! text, and a few types without a driver mapping (interval, timetz, money,
//! point) are decoded here. Only types nothing here understands (ranges,
//! geometric shapes other than point, custom binary types) fall back to a
//! short placeholder naming the type.

use crate::db::classify::driver_message;
use crate::db::materialize::FetchError;
use crate::db::types::CellValue;
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, Kind, Type};

type DecodeError = Box<dyn std::error::Error + Sync + Send>;

/// A decoded value of any column type.
pub struct Decoded(pub CellValue);

impl<'a> FromSql<'a> for Decoded {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, DecodeError> {
        let value = match *ty {
            Type::INT2 => CellValue::Integer(i16::from_sql(ty, raw)? as i64),
            Type::INT4 => CellValue::Integer(i32::from_sql(ty, raw)? as i64),
            Type::INT8 => CellValue::Integer(i64::from_sql(ty, raw)?),
            Type::OID => CellValue::Integer(u32::from_sql(ty, raw)? as i64),
            Type::FLOAT4 => CellValue::Float(f32::from_sql(ty, raw)? as f64),
            Type::FLOAT8 => CellValue::Float(f64::from_sql(ty, raw)?),
            Type::NUMERIC => CellValue::Text(Decimal::from_sql(ty, raw)?.to_string()),
            Type::BOOL => CellValue::Boolean(bool::from_sql(ty, raw)?),
            Type::CHAR => CellValue::Text(char::from(i8::from_sql(ty, raw)? as u8).to_string()),
            Type::JSON | Type::JSONB => CellValue::Json(serde_json::Value::from_sql(ty, raw)?),
            Type::BYTEA => CellValue::Binary(Vec::<u8>::from_sql(ty, raw)?),
            Type::UUID => CellValue::Uuid(uuid::Uuid::from_sql(ty, raw)?.to_string()),
            Type::TIMESTAMP => {
                CellValue::DateTime(chrono::NaiveDateTime::from_sql(ty, raw)?.to_string())
            }
            Type::TIMESTAMPTZ => CellValue::DateTime(
                chrono::DateTime::<chrono::Utc>::from_sql(ty, raw)?.to_string(),
            ),
            Type::DATE => CellValue::DateTime(chrono::NaiveDate::from_sql(ty, raw)?.to_string()),
            Type::TIME => CellValue::DateTime(chrono::NaiveTime::from_sql(ty, raw)?.to_string()),
            Type::TIMETZ => CellValue::DateTime(timetz_text(raw)?),
            Type::INTERVAL => CellValue::Text(interval_text(raw)?),
            Type::MONEY => CellValue::Text(money_text(read_i64(raw, 0)?)),
            Type::INET => CellValue::Text(cidr::IpInet::from_sql(ty, raw)?.to_string()),
            Type::CIDR => CellValue::Text(cidr::IpCidr::from_sql(ty, raw)?.to_string()),
            Type::MACADDR => {
                CellValue::Text(eui48::MacAddress::from_sql(ty, raw)?.to_hex_string())
            }
            Type::BIT | Type::VARBIT => {
                let bits = bit_vec::BitVec::from_sql(ty, raw)?;
                CellValue::Text(bits.iter().map(|b| if b { '1' } else { '0' }).collect())
            }
            Type::POINT => CellValue::Text(format!(
                "({},{})",
                f64::from_be_bytes(read_array(raw, 0)?),
                f64::from_be_bytes(read_array(raw, 8)?)
            )),
            Type::XML => CellValue::Text(std::str::from_utf8(raw)?.to_string()),
            _ => match ty.kind() {
                Kind::Array(_) => {
                    let items = Vec::<Option<Decoded>>::from_sql(ty, raw)?;
                    CellValue::Array(
                        items
                            .into_iter()
                            .map(|item| item.map_or(CellValue::Null, |d| d.0))
                            .collect(),
                    )
                }
                Kind::Domain(base) => Decoded::from_sql(base, raw)?.0,
                Kind::Enum(_) => CellValue::Text(std::str::from_utf8(raw)?.to_string()),
                _ if <&str as FromSql>::accepts(ty) => {
                    CellValue::Text(<&str as FromSql>::from_sql(ty, raw)?.to_string())
                }
                _ => CellValue::Text(format!("<{}>", ty.name())),
            },
        };
        Ok(Decoded(value))
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

/// Decode every column of a row.
pub fn extract_row(row: &Row) -> Result<Vec<CellValue>, FetchError> {
    (0..row.len()).map(|idx| extract_cell_value(row, idx)).collect()
}

/// Decode column `idx`. A value that fails to decode is a scan error.
fn extract_cell_value(row: &Row, idx: usize) -> Result<CellValue, FetchError> {
    match row.try_get::<_, Option<Decoded>>(idx) {
        Ok(Some(decoded)) => Ok(decoded.0),
        Ok(None) => Ok(CellValue::Null),
        Err(e) => {
            let name = row.columns().get(idx).map_or("?", |c| c.name());
            Err(FetchError::Scan(format!(
                "column \"{}\": {}",
                name,
                driver_message(&e)
            )))
        }
    }
}

fn read_array<const N: usize>(raw: &[u8], at: usize) -> Result<[u8; N], DecodeError> {
    raw.get(at..at + N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| "value too short".into())
}

fn read_i64(raw: &[u8], at: usize) -> Result<i64, DecodeError> {
    read_array(raw, at).map(i64::from_be_bytes)
}

fn read_i32(raw: &[u8], at: usize) -> Result<i32, DecodeError> {
    read_array(raw, at).map(i32::from_be_bytes)
}

/// `HH:MM:SS` with trailing fractional digits trimmed; hours may exceed 24.
fn clock(micros: u64) -> String {
    let secs = micros / 1_000_000;
    let frac = micros % 1_000_000;
    let mut text = format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60);
    if frac != 0 {
        let digits = format!("{:06}", frac);
        text.push('.');
        text.push_str(digits.trim_end_matches('0'));
    }
    text
}

/// Wire form: microseconds (i64), days (i32), months (i32).
fn interval_text(raw: &[u8]) -> Result<String, DecodeError> {
    Ok(format_interval(
        read_i32(raw, 12)?,
        read_i32(raw, 8)?,
        read_i64(raw, 0)?,
    ))
}

/// PostgreSQL's default (`postgres`) interval style, e.g.
/// `1 year 2 mons 3 days 04:05:06` or `-1 days +02:00:00`.
fn format_interval(months: i32, days: i32, micros: i64) -> String {
    let mut text = String::new();
    // a preceding field was negative, so a positive one gets an explicit +
    let mut after_negative = false;

    let fields = [
        (months as i64 / 12, "year"),
        (months as i64 % 12, "mon"),
        (days as i64, "day"),
    ];
    for (value, unit) in fields {
        if value == 0 {
            continue;
        }
        if !text.is_empty() {
            text.push(' ');
        }
        if after_negative && value > 0 {
            text.push('+');
        }
        text.push_str(&format!("{} {}{}", value, unit, if value != 1 { "s" } else { "" }));
        after_negative = value < 0;
    }

    if text.is_empty() || micros != 0 {
        if !text.is_empty() {
            text.push(' ');
        }
        if micros < 0 {
            text.push('-');
        } else if after_negative {
            text.push('+');
        }
        text.push_str(&clock(micros.unsigned_abs()));
    }
    text
}

/// Wire form: microseconds since midnight (i64), zone offset in seconds
/// west of UTC (i32).
fn timetz_text(raw: &[u8]) -> Result<String, DecodeError> {
    let micros = read_i64(raw, 0)?;
    let east = -(read_i32(raw, 8)? as i64);

    let mut text = clock(micros.unsigned_abs());
    text.push(if east < 0 { '-' } else { '+' });
    let offset = east.unsigned_abs();
    text.push_str(&format!("{:02}", offset / 3600));
    if offset % 3600 != 0 {
        text.push_str(&format!(":{:02}", offset / 60 % 60));
        if offset % 60 != 0 {
            text.push_str(&format!(":{:02}", offset % 60));
        }
    }
    Ok(text)
}

/// Money in the `C` locale: `$1,234.56`, `-$0.05`.
fn money_text(cents: i64) -> String {
    let abs = cents.unsigned_abs();
    let digits = (abs / 100).to_string();

    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!(
        "{}${}.{:02}",
        if cents < 0 { "-" } else { "" },
        grouped,
        abs % 100
    )
}
