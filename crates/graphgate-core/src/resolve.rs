//! List and relationship resolvers.
//!
//! Every list field resolves the same way: fetch the candidates from the store,
//! keep the ones matching `where`, order them by `orderBy`, then cut the
//! `offset`/`limit` window.

use std::collections::BTreeMap;
use std::sync::Arc;

use graphgate_proto::{Edge, EntityId, FilterExpr, Node, OrderBy, Value};

use crate::aggregate::{EdgeAggregate, NodeAggregate};
use crate::config::LimitConfig;
use crate::entity::Entity;
use crate::error::{Error, LoadError, StorageError};
use crate::filter::filter_entities;
use crate::loader::RequestLoaders;
use crate::pagination::{connection, paginate, Connection, ConnectionArgs, CursorCodec, OffsetCursor};
use crate::sort::sort_entities;
use crate::storage::GraphStore;

/// Arguments shared by list fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListArgs {
    pub filter: Option<FilterExpr>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListArgs {
    /// Read `where`, `orderBy`, `limit` and `offset` from resolved field arguments.
    ///
    /// Malformed arguments are treated as absent.
    pub fn from_arguments(arguments: &BTreeMap<String, Value>) -> Self {
        Self {
            filter: arguments.get("where").and_then(FilterExpr::from_where),
            order_by: arguments.get("orderBy").and_then(OrderBy::from_argument),
            limit: arguments.get("limit").and_then(Value::as_i64),
            offset: arguments.get("offset").and_then(Value::as_i64),
        }
    }

    pub fn with_filter(mut self, filter: FilterExpr) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Run filter, sort, offset and limit over fetched candidates.
pub fn resolve_list<E: Entity + Clone>(
    candidates: Vec<E>,
    args: &ListArgs,
    limits: &LimitConfig,
) -> Vec<E> {
    let fetched = candidates.len();
    let matched = filter_entities(candidates, args.filter.as_ref());
    let filtered = matched.len();
    let ordered = match &args.order_by {
        Some(order) => sort_entities(&matched, Some(order)),
        None => matched,
    };
    let page = paginate(ordered, args.offset, args.limit, limits);
    tracing::debug!(fetched, filtered, returned = page.len(), "resolved list");
    page
}

/// Resolves root and relationship fields against a [`GraphStore`].
#[derive(Clone)]
pub struct QueryResolver {
    store: Arc<dyn GraphStore>,
    limits: LimitConfig,
    cursors: Arc<dyn CursorCodec>,
}

impl std::fmt::Debug for QueryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryResolver")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl QueryResolver {
    pub fn new(store: Arc<dyn GraphStore>, limits: LimitConfig) -> Self {
        Self {
            store,
            limits,
            cursors: Arc::new(OffsetCursor),
        }
    }

    /// Replace the cursor codec used by connection fields.
    pub fn with_cursor_codec(mut self, cursors: Arc<dyn CursorCodec>) -> Self {
        self.cursors = cursors;
        self
    }

    pub fn store(&self) -> &Arc<dyn GraphStore> {
        &self.store
    }

    pub fn limits(&self) -> &LimitConfig {
        &self.limits
    }

    pub fn node(&self, id: EntityId) -> Result<Node, StorageError> {
        self.store.node(id)
    }

    pub fn edge(&self, id: EntityId) -> Result<Edge, StorageError> {
        self.store.edge(id)
    }

    /// Nodes carrying `label`.
    pub fn nodes(&self, label: &str, args: &ListArgs) -> Result<Vec<Node>, StorageError> {
        let candidates = self.store.nodes_by_label(label)?;
        Ok(resolve_list(candidates, args, &self.limits))
    }

    pub fn edges(&self, args: &ListArgs) -> Result<Vec<Edge>, StorageError> {
        let candidates = self.store.all_edges()?;
        Ok(resolve_list(candidates, args, &self.limits))
    }

    /// Cursor-paginated nodes carrying `label`, optionally ordered first.
    pub fn node_connection(
        &self,
        label: &str,
        order_by: Option<&OrderBy>,
        args: &ConnectionArgs,
    ) -> Result<Connection<Node>, Error> {
        let nodes = self.store.nodes_by_label(label)?;
        let nodes = match order_by {
            Some(order) => sort_entities(&nodes, Some(order)),
            None => nodes,
        };
        Ok(connection(nodes, args, self.cursors.as_ref())?)
    }

    /// Cursor-paginated edges, optionally ordered first.
    pub fn edge_connection(
        &self,
        order_by: Option<&OrderBy>,
        args: &ConnectionArgs,
    ) -> Result<Connection<Edge>, Error> {
        let edges = self.store.all_edges()?;
        let edges = match order_by {
            Some(order) => sort_entities(&edges, Some(order)),
            None => edges,
        };
        Ok(connection(edges, args, self.cursors.as_ref())?)
    }

    pub fn node_aggregate(&self, label: &str) -> Result<NodeAggregate, StorageError> {
        let nodes = self.store.nodes_by_label(label)?;
        Ok(NodeAggregate::from_nodes(&nodes))
    }

    pub fn edge_aggregate(&self) -> Result<EdgeAggregate, StorageError> {
        let edges = self.store.all_edges()?;
        Ok(EdgeAggregate::from_edges(&edges))
    }

    /// Edges leaving `node_id`, fetched through the request's loaders.
    pub async fn outgoing_edges(
        &self,
        loaders: &RequestLoaders,
        node_id: EntityId,
        args: &ListArgs,
    ) -> Result<Vec<Edge>, LoadError> {
        let candidates = loaders.outgoing.load(node_id).await?;
        Ok(resolve_list(candidates, args, &self.limits))
    }

    /// Edges arriving at `node_id`, fetched through the request's loaders.
    pub async fn incoming_edges(
        &self,
        loaders: &RequestLoaders,
        node_id: EntityId,
        args: &ListArgs,
    ) -> Result<Vec<Edge>, LoadError> {
        let candidates = loaders.incoming.load(node_id).await?;
        Ok(resolve_list(candidates, args, &self.limits))
    }
}
