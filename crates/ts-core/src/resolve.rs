//! Table resolution: the table-mode state machine.
//!
//! Each call is a pure decision keyed by (table exists, requested mode):
//!
//! ```text
//!              exists                 absent
//! CREATE       TableAlreadyExists     build schema, create
//! APPEND       open                   TableNotFound
//! OVERRIDE     clear, then open       TableNotFound
//! ```
//!
//! # Concurrency
//!
//! The existence check and the action that follows are separate store calls.
//! Two writers resolving the same table concurrently race between them.
//! Nothing here locks; callers must keep a single writer per table. A create
//! that loses the race still fails cleanly because the store rejects a
//! duplicate name, which is reported as [`Error::TableAlreadyExists`].

use tracing::{debug, info, warn};
use ts_common::{Error, Record, Result, StoreError, TableMode};
use ts_config::ClearPolicy;

use crate::clear::clear_table;
use crate::schema::build_schema;
use crate::store::{CreateTableOptions, StoreClient, StoreSession, Table};

/// What the resolver will do once preconditions hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    Create,
    Open,
    ClearThenOpen,
}

/// Decide the action for `mode` given whether `table` exists.
pub fn plan(mode: TableMode, exists: bool, table: &str) -> Result<TableAction> {
    match (mode, exists) {
        (TableMode::Create, true) => Err(Error::TableAlreadyExists {
            table: table.to_string(),
        }),
        (TableMode::Create, false) => Ok(TableAction::Create),
        (TableMode::Append, true) => Ok(TableAction::Open),
        (TableMode::Override, true) => Ok(TableAction::ClearThenOpen),
        (TableMode::Append | TableMode::Override, false) => Err(Error::TableNotFound {
            table: table.to_string(),
            mode,
        }),
    }
}

/// A request for a usable table handle.
#[derive(Debug, Clone, Copy)]
pub struct TableRequest<'a> {
    pub name: &'a str,
    /// Ordered field names; only consulted for CREATE.
    pub fields: &'a [String],
    /// Sample record used to infer column types; only consulted for CREATE.
    pub sample: Option<&'a Record>,
    pub mode: TableMode,
}

/// Knobs that shape resolver side effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    pub clear_policy: ClearPolicy,
    pub num_replicas: Option<u32>,
}

/// Return a table handle for `request`, enforcing the mode's preconditions.
pub fn use_table(
    client: &dyn StoreClient,
    session: &dyn StoreSession,
    request: &TableRequest<'_>,
    options: &ResolveOptions,
) -> Result<Table> {
    let name = request.name;
    let exists = client
        .table_exists(name)
        .map_err(|e| Error::store("table_exists", name, e))?;
    debug!(table = name, mode = %request.mode, exists, "resolving table");

    let action = plan(request.mode, exists, name).map_err(|e| {
        warn!(table = name, mode = %request.mode, error = %e, "table precondition failed");
        e
    })?;

    match action {
        TableAction::Create => {
            let valid_fields = request.fields.first().is_some_and(|f| !f.is_empty());
            if !valid_fields {
                warn!(table = name, "CREATE without a field list");
                return Err(Error::MissingFields {
                    table: name.to_string(),
                });
            }
            create_table(
                client,
                name,
                request.fields,
                request.sample,
                options.num_replicas,
            )
        }
        TableAction::Open => {
            let table = open_table(client, name)?;
            info!(table = name, "opened existing table for append");
            Ok(table)
        }
        TableAction::ClearThenOpen => {
            info!(table = name, "emptying table before overwrite");
            let report = clear_table(client, session, name, options.clear_policy)?;
            if !report.is_complete() {
                return Err(Error::ClearIncomplete {
                    table: name.to_string(),
                    failed: report.failed(),
                    attempted: report.attempted,
                });
            }
            open_table(client, name)
        }
    }
}

/// Build a schema from `fields` and `sample`, then create the table with a
/// range partition on the key column.
pub fn create_table<S: AsRef<str>>(
    client: &dyn StoreClient,
    name: &str,
    fields: &[S],
    sample: Option<&Record>,
    num_replicas: Option<u32>,
) -> Result<Table> {
    let schema = build_schema(fields, sample)?;
    let key = schema.columns()[0].name.clone();

    let mut options = CreateTableOptions::new().set_range_partition_columns(vec![key]);
    if let Some(replicas) = num_replicas {
        options = options.set_num_replicas(replicas);
    }

    info!(table = name, columns = schema.len(), "creating table");
    let table = client
        .create_table(name, &schema, &options)
        .map_err(|e| match e {
            StoreError::TableAlreadyExists(_) => Error::TableAlreadyExists {
                table: name.to_string(),
            },
            other => Error::store("create_table", name, other),
        })?;
    info!(table = name, id = table.id(), "table created");
    Ok(table)
}

pub(crate) fn open_table(client: &dyn StoreClient, name: &str) -> Result<Table> {
    client
        .open_table(name)
        .map_err(|e| Error::store("open_table", name, e))
}
