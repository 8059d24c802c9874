use std::sync::Arc;

use graphgate_proto::{Edge, EntityId, Node};

use super::{LoadResult, Loader};
use crate::config::LoaderConfig;
use crate::storage::GraphStore;

/// The loaders one request resolves relationships through.
///
/// Build a fresh set per request so cached outcomes never outlive it.
#[derive(Clone)]
pub struct RequestLoaders {
    pub nodes: Loader<EntityId, Node>,
    pub outgoing: Loader<EntityId, Vec<Edge>>,
    pub incoming: Loader<EntityId, Vec<Edge>>,
}

impl RequestLoaders {
    pub fn new(store: Arc<dyn GraphStore>, config: LoaderConfig) -> Self {
        let node_store = Arc::clone(&store);
        let outgoing_store = Arc::clone(&store);
        let incoming_store = store;

        Self {
            nodes: Loader::new(
                move |ids: Vec<EntityId>| {
                    let outcomes: Vec<LoadResult<Node>> = ids
                        .into_iter()
                        .map(|id| node_store.node(id).map_err(Into::into))
                        .collect();
                    async move { outcomes }
                },
                config,
            ),
            outgoing: Loader::new(
                move |ids: Vec<EntityId>| {
                    let outcomes: Vec<LoadResult<Vec<Edge>>> = ids
                        .into_iter()
                        .map(|id| outgoing_store.outgoing_edges(id).map_err(Into::into))
                        .collect();
                    async move { outcomes }
                },
                config,
            ),
            incoming: Loader::new(
                move |ids: Vec<EntityId>| {
                    let outcomes: Vec<LoadResult<Vec<Edge>>> = ids
                        .into_iter()
                        .map(|id| incoming_store.incoming_edges(id).map_err(Into::into))
                        .collect();
                    async move { outcomes }
                },
                config,
            ),
        }
    }
}
