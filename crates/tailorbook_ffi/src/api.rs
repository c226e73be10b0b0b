//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Own the process-wide async runtime and the single opened customer store.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - `store_open` must succeed before any customer call; it binds the process
//!   to one database path for its lifetime.
//! - Return values are UTF-8 strings or envelopes with stable meaning.

use log::{error, info};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tailorbook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Customer, CustomerId, CustomerStore, CustomerUiState, CustomersRepository,
    LocalCustomersRepository, LogConfig, StoreConfig, StoreResult,
};
use tokio::runtime::Runtime;

static STORE_CONTEXT: OnceLock<StoreContext> = OnceLock::new();

struct StoreContext {
    db_path: PathBuf,
    runtime: Runtime,
    repo: Arc<LocalCustomersRepository>,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(&LogConfig::new(level, log_dir)) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Opens (creating if needed) the customer database at `db_path`.
///
/// # FFI contract
/// - Sync call; performs file-system setup and schema migration.
/// - Repeating the call with the same path is a no-op.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn store_open(db_path: String) -> String {
    let db_path = PathBuf::from(db_path.trim());
    if db_path.as_os_str().is_empty() {
        return "store_open failed: db_path cannot be empty".to_string();
    }
    if let Some(context) = STORE_CONTEXT.get() {
        return ensure_same_path(context, &db_path);
    }

    let runtime = match Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => return format!("store_open failed: runtime start failed: {err}"),
    };
    let store = match CustomerStore::open(&StoreConfig::file(&db_path)) {
        Ok(store) => store,
        Err(err) => {
            error!("event=ffi_store_open module=ffi status=error error={err}");
            return format!("store_open failed: {err}");
        }
    };

    let context = StoreContext {
        db_path: db_path.clone(),
        runtime,
        repo: Arc::new(LocalCustomersRepository::new(store)),
    };
    match STORE_CONTEXT.set(context) {
        Ok(()) => {
            info!("event=ffi_store_open module=ffi status=ok");
            String::new()
        }
        // Another caller won the race; it decides the bound path.
        Err(_) => STORE_CONTEXT
            .get()
            .map(|context| ensure_same_path(context, &db_path))
            .unwrap_or_default(),
    }
}

/// One customer row as rendered by list and search screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerListItem {
    pub id: i64,
    pub name: String,
    /// Zero-padded to 11 digits.
    pub phone_display: String,
    /// Two-decimal rendering.
    pub price: String,
}

/// List/search response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerListResponse {
    /// Customers ordered by name (empty on failure).
    pub items: Vec<CustomerListItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Generic action response envelope for create/delete flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerActionResponse {
    /// Whether a row was written.
    pub ok: bool,
    /// Affected customer id, when known.
    pub customer_id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl CustomerActionResponse {
    fn success(message: impl Into<String>, customer_id: CustomerId) -> Self {
        Self {
            ok: true,
            customer_id: Some(customer_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            customer_id: None,
            message: message.into(),
        }
    }
}

/// Lists every customer ordered by name.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn customers_list() -> CustomerListResponse {
    to_list_response(
        "customers_list",
        with_repo(|repo| async move { repo.all_customers().await }),
    )
}

/// Case-sensitive substring search on customer names.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - `%` and `_` match literally.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn customers_search(text: String) -> CustomerListResponse {
    to_list_response(
        "customers_search",
        with_repo(|repo| async move { repo.search_customers(&text).await }),
    )
}

/// Creates a customer from the entry form's name and phone fields.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - A blank name writes nothing and returns `ok = false`.
/// - Non-numeric phone text is stored as zero.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn customer_create(name: String, phone: String) -> CustomerActionResponse {
    let form = CustomerUiState {
        name,
        phone,
        ..CustomerUiState::default()
    };
    if !form.is_valid() {
        return CustomerActionResponse::failure("customer_create skipped: name is required.");
    }

    let customer = form.to_customer();
    match with_repo(|repo| async move { repo.insert_customer(&customer).await }) {
        Ok(Ok(Some(id))) => CustomerActionResponse::success("Customer created.", id),
        Ok(Ok(None)) => {
            CustomerActionResponse::failure("customer_create ignored: id already exists.")
        }
        Ok(Err(err)) => CustomerActionResponse::failure(format!("customer_create failed: {err}")),
        Err(message) => CustomerActionResponse::failure(message),
    }
}

/// Deletes the customer with `customer_id`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Unknown ids return `ok = false` without error.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn customer_delete(customer_id: i64) -> CustomerActionResponse {
    let target = Customer {
        id: customer_id,
        ..Customer::default()
    };
    match with_repo(|repo| async move { repo.delete_customer(&target).await }) {
        Ok(Ok(true)) => CustomerActionResponse::success("Customer deleted.", customer_id),
        Ok(Ok(false)) => CustomerActionResponse::failure("customer_delete: no such customer."),
        Ok(Err(err)) => CustomerActionResponse::failure(format!("customer_delete failed: {err}")),
        Err(message) => CustomerActionResponse::failure(message),
    }
}

fn ensure_same_path(context: &StoreContext, db_path: &Path) -> String {
    if context.db_path.as_path() == db_path {
        String::new()
    } else {
        format!(
            "store_open failed: store already opened at `{}`",
            context.db_path.display()
        )
    }
}

fn with_repo<T, F, Fut>(f: F) -> Result<T, String>
where
    F: FnOnce(Arc<LocalCustomersRepository>) -> Fut,
    Fut: std::future::Future<Output = T>,
{
    let context = STORE_CONTEXT
        .get()
        .ok_or_else(|| "customer store is not open; call store_open first".to_string())?;
    Ok(context.runtime.block_on(f(Arc::clone(&context.repo))))
}

fn to_list_response(
    op: &str,
    outcome: Result<StoreResult<Vec<Customer>>, String>,
) -> CustomerListResponse {
    match outcome {
        Ok(Ok(customers)) => {
            let items = customers.iter().map(to_list_item).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No customers.".to_string()
            } else {
                format!("Found {} customer(s).", items.len())
            };
            CustomerListResponse { items, message }
        }
        Ok(Err(err)) => CustomerListResponse {
            items: Vec::new(),
            message: format!("{op} failed: {err}"),
        },
        Err(message) => CustomerListResponse {
            items: Vec::new(),
            message,
        },
    }
}

fn to_list_item(customer: &Customer) -> CustomerListItem {
    let projected = CustomerUiState::from(customer);
    CustomerListItem {
        id: customer.id,
        name: projected.name,
        phone_display: projected.phone,
        price: projected.price,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, customer_create, customer_delete, customers_list, customers_search,
        init_logging, ping, store_open,
    };
    use std::path::PathBuf;
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEST_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn store_open_is_idempotent_and_refuses_a_second_path() {
        let path = open_test_store();
        assert_eq!(store_open(path.display().to_string()), "");

        let other = path.with_extension("other.sqlite3");
        let error = store_open(other.display().to_string());
        assert!(error.contains("already opened"), "{error}");
    }

    #[test]
    fn created_customer_is_listed_searchable_and_deletable() {
        open_test_store();
        let name = unique_token("Create");

        let created = customer_create(name.clone(), "8032458214".to_string());
        assert!(created.ok, "{}", created.message);
        let customer_id = created.customer_id.expect("create should return customer_id");

        let listed = customers_list();
        let item = listed
            .items
            .iter()
            .find(|item| item.id == customer_id)
            .expect("created customer should be listed");
        assert_eq!(item.phone_display, "08032458214");
        assert_eq!(item.price, "0.00");

        let found = customers_search(name);
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].id, customer_id);

        let deleted = customer_delete(customer_id);
        assert!(deleted.ok, "{}", deleted.message);
        assert!(!customer_delete(customer_id).ok);
        assert!(customers_list()
            .items
            .iter()
            .all(|item| item.id != customer_id));
    }

    #[test]
    fn customer_create_with_blank_name_writes_nothing() {
        open_test_store();
        let response = customer_create("   ".to_string(), "0803".to_string());
        assert!(!response.ok);
        assert!(response.customer_id.is_none());
    }

    fn open_test_store() -> PathBuf {
        let path = TEST_DB_PATH
            .get_or_init(|| {
                std::env::temp_dir().join(format!("{}.sqlite3", unique_token("tailorbook-ffi")))
            })
            .clone();
        let error = store_open(path.display().to_string());
        assert!(error.is_empty(), "{error}");
        path
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
