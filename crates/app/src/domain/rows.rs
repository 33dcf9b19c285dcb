//! Row decoding helpers shared by the repositories.

use std::str::FromStr;

use jiff::{Timestamp, civil::Date};
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{Row, postgres::PgRow};

use crate::domain::UnknownVariant;

pub(crate) fn try_get_timestamp(row: &PgRow, column: &str) -> sqlx::Result<Timestamp> {
    Ok(row.try_get::<SqlxTimestamp, _>(column)?.to_jiff())
}

pub(crate) fn try_get_optional_timestamp(
    row: &PgRow,
    column: &str,
) -> sqlx::Result<Option<Timestamp>> {
    Ok(row
        .try_get::<Option<SqlxTimestamp>, _>(column)?
        .map(SqlxTimestamp::to_jiff))
}

pub(crate) fn try_get_date(row: &PgRow, column: &str) -> sqlx::Result<Date> {
    Ok(row.try_get::<SqlxDate, _>(column)?.to_jiff())
}

/// Read a non-negative `BIGINT` column as `u64`.
pub(crate) fn try_get_u64(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    let value: i64 = row.try_get(column)?;

    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_get_u32(row: &PgRow, column: &str) -> sqlx::Result<u32> {
    let value: i32 = row.try_get(column)?;

    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_get_optional_u32(row: &PgRow, column: &str) -> sqlx::Result<Option<u32>> {
    let value: Option<i32> = row.try_get(column)?;

    value
        .map(u32::try_from)
        .transpose()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
}

/// Read a `TEXT` column holding one of a domain enum's string forms.
pub(crate) fn try_get_enum<T>(row: &PgRow, column: &str) -> sqlx::Result<T>
where
    T: FromStr<Err = UnknownVariant>,
{
    let value: String = row.try_get(column)?;

    value.parse::<T>().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Convert an unsigned amount into the signed column type, reporting the column on overflow.
pub(crate) fn to_i64(value: u64, column: &str) -> sqlx::Result<i64> {
    i64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn to_i32(value: u32, column: &str) -> sqlx::Result<i32> {
    i32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
