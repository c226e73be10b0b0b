//! SQLite-backed customer table with live queries.
//!
//! # Invariants
//! - `insert` never overwrites: an explicit id that already exists is ignored.
//! - `update` and `delete` are keyed by id and are silent no-ops for unknown ids.
//! - List and search results are ordered by `name ASC` (binary collation),
//!   ties broken by `id ASC`.
//! - Non-finite numbers are stored as `0.0`.

use super::{InvalidationTracker, LiveQuery, StoreError, StoreResult};
use crate::config::StoreConfig;
use crate::db::{open_db_in_memory, open_with_config};
use crate::model::customer::{Customer, CustomerId, Measurement, Measurements, UNASSIGNED_ID};
use futures::StreamExt;
use log::{debug, error, info};
use once_cell::sync::Lazy;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio_stream::wrappers::WatchStream;

/// Non-measurement data columns, in bind order after `id`.
const CORE_COLUMNS: [&str; 6] = ["name", "phone", "price", "deposit", "balance", "address"];

static SELECT_SQL: Lazy<String> = Lazy::new(|| {
    format!(
        "SELECT id, {} FROM customers",
        data_columns().collect::<Vec<_>>().join(", ")
    )
});

static SELECT_ALL_SQL: Lazy<String> =
    Lazy::new(|| format!("{} ORDER BY name ASC, id ASC;", SELECT_SQL.as_str()));

static SELECT_BY_ID_SQL: Lazy<String> =
    Lazy::new(|| format!("{} WHERE id = ?1;", SELECT_SQL.as_str()));

// `instr` keeps the match case-sensitive and treats `%`/`_` literally.
static SEARCH_SQL: Lazy<String> = Lazy::new(|| {
    format!(
        "{} WHERE instr(name, ?1) > 0 ORDER BY name ASC, id ASC;",
        SELECT_SQL.as_str()
    )
});

static INSERT_SQL: Lazy<String> = Lazy::new(|| {
    let columns = data_columns().collect::<Vec<_>>();
    let placeholders = (2..=columns.len() + 1)
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT OR IGNORE INTO customers (id, {}) VALUES (NULLIF(?1, {UNASSIGNED_ID}), {placeholders});",
        columns.join(", ")
    )
});

static UPDATE_SQL: Lazy<String> = Lazy::new(|| {
    let assignments = data_columns()
        .enumerate()
        .map(|(index, column)| format!("{column} = ?{}", index + 2))
        .collect::<Vec<_>>()
        .join(", ");
    format!("UPDATE customers SET {assignments} WHERE id = ?1;")
});

/// Handle to the customer table.
///
/// Clones share one connection and one invalidation tracker. Blocking
/// SQLite calls run on Tokio's blocking pool, so every async method must be
/// awaited inside a Tokio runtime.
#[derive(Debug, Clone)]
pub struct CustomerStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    conn: Mutex<Connection>,
    invalidation: InvalidationTracker,
}

impl CustomerStore {
    /// Opens the database described by `config` and applies migrations.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        Ok(Self::from_connection(open_with_config(config)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                conn: Mutex::new(conn),
                invalidation: InvalidationTracker::new(),
            }),
        }
    }

    /// Closes the underlying connection.
    ///
    /// Fails with [`StoreError::StillShared`] while clones of this handle
    /// (including live query streams) are alive.
    pub fn close(self) -> StoreResult<()> {
        let inner = Arc::try_unwrap(self.inner).map_err(|_| StoreError::StillShared)?;
        let conn = inner.conn.into_inner().map_err(|_| StoreError::Poisoned)?;
        if let Err((_, err)) = conn.close() {
            error!("event=db_close module=store status=error error={err}");
            return Err(err.into());
        }
        info!("event=db_close module=store status=ok");
        Ok(())
    }

    /// Inserts `customer`, returning the assigned id.
    ///
    /// An id of `0` asks the store to assign one. Returns `None` when the
    /// explicit id is already taken and the row was ignored.
    pub async fn insert(&self, customer: &Customer) -> StoreResult<Option<CustomerId>> {
        let values = customer_values(customer);
        let inserted = self
            .run("insert", move |conn| {
                let changed = conn.execute(INSERT_SQL.as_str(), params_from_iter(values))?;
                Ok((changed > 0).then(|| conn.last_insert_rowid()))
            })
            .await?;

        match inserted {
            Some(id) => {
                debug!("event=customer_insert module=store status=ok customer_id={id}");
                self.inner.invalidation.notify();
            }
            None => debug!(
                "event=customer_insert module=store status=ignored customer_id={}",
                customer.id
            ),
        }
        Ok(inserted)
    }

    /// Replaces every column of the row with `customer.id`.
    ///
    /// Returns `false` when no such row exists.
    pub async fn update(&self, customer: &Customer) -> StoreResult<bool> {
        let id = customer.id;
        let values = customer_values(customer);
        let changed = self
            .run("update", move |conn| {
                Ok(conn.execute(UPDATE_SQL.as_str(), params_from_iter(values))? > 0)
            })
            .await?;
        self.after_write("customer_update", id, changed);
        Ok(changed)
    }

    /// Deletes the row with `customer.id`; other fields are not compared.
    ///
    /// Returns `false` when no such row exists.
    pub async fn delete(&self, customer: &Customer) -> StoreResult<bool> {
        let id = customer.id;
        let changed = self
            .run("delete", move |conn| {
                Ok(conn.execute("DELETE FROM customers WHERE id = ?1;", [id])? > 0)
            })
            .await?;
        self.after_write("customer_delete", id, changed);
        Ok(changed)
    }

    /// One-shot point lookup.
    pub async fn find_by_id(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        self.run("find_by_id", move |conn| {
            let customer = conn
                .prepare_cached(SELECT_BY_ID_SQL.as_str())?
                .query_row([id], parse_customer_row)
                .optional()?;
            Ok(customer)
        })
        .await
    }

    /// One-shot snapshot of every row, ordered by name.
    pub async fn list_all(&self) -> StoreResult<Vec<Customer>> {
        self.run("list_all", |conn| {
            let mut stmt = conn.prepare_cached(SELECT_ALL_SQL.as_str())?;
            let customers = stmt
                .query_map([], parse_customer_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(customers)
        })
        .await
    }

    /// One-shot case-sensitive substring search on `name`.
    ///
    /// Equivalent to `name LIKE '%text%'` with `text` taken literally.
    pub async fn search_by_name_pattern(&self, text: &str) -> StoreResult<Vec<Customer>> {
        let text = text.to_string();
        self.run("search", move |conn| {
            let mut stmt = conn.prepare_cached(SEARCH_SQL.as_str())?;
            let customers = stmt
                .query_map([text], parse_customer_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(customers)
        })
        .await
    }

    /// Live list of every row, ordered by name.
    ///
    /// Emits immediately, then after every committed change to the table.
    pub fn get_all(&self) -> LiveQuery<Vec<Customer>> {
        let store = self.clone();
        WatchStream::new(self.inner.invalidation.subscribe())
            .then(move |_| {
                let store = store.clone();
                async move { store.list_all().await }
            })
            .boxed()
    }

    /// Live view of one row.
    ///
    /// Emits nothing while the id is absent; starts emitting once a row with
    /// that id exists.
    pub fn get_by_id(&self, id: CustomerId) -> LiveQuery<Customer> {
        let store = self.clone();
        WatchStream::new(self.inner.invalidation.subscribe())
            .then(move |_| {
                let store = store.clone();
                async move { store.find_by_id(id).await }
            })
            .filter_map(|result| async move { result.transpose() })
            .boxed()
    }

    async fn run<T, F>(&self, op: &'static str, work: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let started_at = Instant::now();
        let inner = Arc::clone(&self.inner);
        let outcome = tokio::task::spawn_blocking(move || {
            let conn = inner.conn.lock().map_err(|_| StoreError::Poisoned)?;
            work(&*conn)
        })
        .await
        .map_err(|err| StoreError::Worker(err.to_string()))
        .and_then(|result| result);

        if let Err(err) = &outcome {
            error!(
                "event=store_{op} module=store status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
        }
        outcome
    }

    fn after_write(&self, event: &str, id: CustomerId, changed: bool) {
        if changed {
            debug!("event={event} module=store status=ok customer_id={id}");
            self.inner.invalidation.notify();
        } else {
            debug!("event={event} module=store status=noop customer_id={id}");
        }
    }
}

fn data_columns() -> impl Iterator<Item = &'static str> {
    CORE_COLUMNS
        .into_iter()
        .chain(Measurement::ALL.into_iter().map(Measurement::column))
}

/// Bind values in `id, data_columns()` order.
fn customer_values(customer: &Customer) -> Vec<Value> {
    let mut values = Vec::with_capacity(1 + CORE_COLUMNS.len() + Measurement::ALL.len());
    values.push(Value::Integer(customer.id));
    values.push(Value::Text(customer.name.clone()));
    values.push(Value::Integer(customer.phone));
    values.push(real(customer.price));
    values.push(real(customer.deposit));
    values.push(real(customer.balance));
    values.push(Value::Text(customer.address.clone()));
    values.extend(
        Measurement::ALL
            .into_iter()
            .map(|measurement| real(customer.measurements.get(measurement))),
    );
    values
}

// SQLite turns NaN into NULL, which the NOT NULL columns would reject.
fn real(value: f64) -> Value {
    Value::Real(if value.is_finite() { value } else { 0.0 })
}

fn parse_customer_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
    let mut measurements = Measurements::default();
    for measurement in Measurement::ALL {
        measurements.set(measurement, row.get(measurement.column())?);
    }

    Ok(Customer {
        id: row.get("id")?,
        name: row.get("name")?,
        phone: row.get("phone")?,
        price: row.get("price")?,
        deposit: row.get("deposit")?,
        balance: row.get("balance")?,
        address: row.get("address")?,
        measurements,
    })
}
