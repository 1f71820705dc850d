//! Connector facade over a store client.
//!
//! A [`TableConnector`] owns the long-lived store client and the one session
//! used for every mutation. Both are acquired once and reused across table
//! operations.
//!
//! The connector assumes a single writer per table: see the concurrency notes
//! in [`crate::resolve`].

use tracing::{info, info_span, warn};
use ts_common::{Error, Record, Result, SessionId, TableMode, Value};
use ts_config::validate::validate;
use ts_config::{ClearPolicy, ConnectorConfig, TableConfig};

use crate::clear::{self, ClearReport};
use crate::read;
use crate::resolve::{self, ResolveOptions, TableRequest};
use crate::store::{StoreClient, StoreSession, Table};
use crate::write;

/// Table lifecycle, read, clear and write operations on one store.
pub struct TableConnector<C: StoreClient> {
    client: C,
    session: Box<dyn StoreSession>,
    session_id: SessionId,
    options: ResolveOptions,
}

impl<C: StoreClient> TableConnector<C> {
    /// Wrap `client` with default options.
    pub fn new(client: C) -> Self {
        let session = client.new_session();
        let session_id = SessionId::new();
        info!(session = %session_id, "store session opened");
        Self {
            client,
            session,
            session_id,
            options: ResolveOptions::default(),
        }
    }

    /// Wrap `client` with options taken from `config`.
    ///
    /// The config is validated first; every problem found is reported in one
    /// [`Error::Config`].
    pub fn from_config(client: C, config: &ConnectorConfig) -> Result<Self> {
        validate(config).map_err(|errors| {
            let problems = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            warn!(problems = errors.len(), "connector config rejected");
            Error::Config(problems)
        })?;

        let mut connector = Self::new(client).with_clear_policy(config.clear_policy);
        connector.options.num_replicas = config.num_replicas;
        info!(
            session = %connector.session_id,
            masters = %config.master_addresses.join(","),
            clear_policy = %config.clear_policy,
            "connector configured"
        );
        Ok(connector)
    }

    pub fn with_clear_policy(mut self, policy: ClearPolicy) -> Self {
        self.options.clear_policy = policy;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn clear_policy(&self) -> ClearPolicy {
        self.options.clear_policy
    }

    /// Return a usable handle for `name` under `mode`.
    ///
    /// `fields` and `sample` are only consulted for [`TableMode::Create`].
    pub fn use_table(
        &self,
        name: &str,
        fields: &[String],
        sample: Option<&Record>,
        mode: TableMode,
    ) -> Result<Table> {
        let _span = info_span!("use_table", session = %self.session_id, table = name, %mode)
            .entered();
        let request = TableRequest {
            name,
            fields,
            sample,
            mode,
        };
        resolve::use_table(&self.client, self.session.as_ref(), &request, &self.options)
    }

    /// [`use_table`](Self::use_table) driven by a table binding from config.
    pub fn use_configured_table(
        &self,
        table: &TableConfig,
        sample: Option<&Record>,
    ) -> Result<Table> {
        self.use_table(&table.name, &table.fields, sample, table.mode)
    }

    /// Create `name` from a field list and a sample record.
    pub fn create_table<S: AsRef<str>>(
        &self,
        name: &str,
        fields: &[S],
        sample: &Record,
    ) -> Result<Table> {
        resolve::create_table(
            &self.client,
            name,
            fields,
            Some(sample),
            self.options.num_replicas,
        )
    }

    /// Drop `name`.
    pub fn delete_table(&self, name: &str) -> Result<()> {
        info!(session = %self.session_id, table = name, "deleting table");
        self.client.delete_table(name).map_err(|e| {
            warn!(table = name, error = %e, "table delete failed");
            Error::store("delete_table", name, e)
        })?;
        info!(table = name, "table deleted");
        Ok(())
    }

    /// All rows of `name`, in the store's scan order.
    pub fn read_table(&self, name: &str) -> Result<Vec<Record>> {
        read::read_table(&self.client, name)
    }

    /// Delete every row of `name` under the configured policy.
    pub fn clear_table(&self, name: &str) -> Result<ClearReport> {
        let _span = info_span!("clear_table", session = %self.session_id, table = name).entered();
        clear::clear_table(
            &self.client,
            self.session.as_ref(),
            name,
            self.options.clear_policy,
        )
    }

    pub fn insert(&self, table: &Table, record: &Record) -> Result<()> {
        write::insert(self.session.as_ref(), table, record)
    }

    pub fn delete(&self, table: &Table, key: &Value) -> Result<()> {
        write::delete(self.session.as_ref(), table, key)
    }

    /// Flush pending mutations on the shared session.
    pub fn flush(&self) -> Result<()> {
        self.session
            .flush()
            .map_err(|e| Error::store("flush", "*", e))
    }

    /// Column names of `table` in declared order.
    pub fn column_names(table: &Table) -> Vec<String> {
        table.schema().column_names()
    }
}
