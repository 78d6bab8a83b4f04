//! Shared helpers for Diesel repository implementations.

use std::time::Duration;

use diesel::result::Error as DieselError;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

/// Bound every statement in the current transaction to `timeout`.
///
/// Must run inside a transaction; `SET LOCAL` is discarded at commit or
/// rollback, so pooled connections never inherit the setting.
pub async fn set_statement_timeout(
    conn: &mut AsyncPgConnection,
    timeout: Duration,
) -> Result<(), DieselError> {
    let millis = timeout.as_millis().max(1);
    diesel::sql_query(format!("SET LOCAL statement_timeout = {millis}"))
        .execute(conn)
        .await
        .map(|_| ())
}

/// Convert a `COUNT(*)` result into the unsigned total used by ports.
pub fn count_to_total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

/// Convert a page offset into the signed value Diesel expects.
pub fn offset_for_db(offset: u64) -> i64 {
    i64::try_from(offset).unwrap_or(i64::MAX)
}

/// Collect row conversion results, mapping the first error through `map_err`.
pub fn collect_rows<T, E>(
    results: impl Iterator<Item = Result<T, String>>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E> {
    results.collect::<Result<Vec<_>, _>>().map_err(map_err)
}
