use std::collections::{BTreeSet, HashMap, HashSet};

use futures::future::try_join_all;

use crate::error::{GraphError, Result};
use crate::store::DocumentStore;
use crate::util::pseudo_random_coord;

use super::wire::{GraphRequest, GraphResponse, WireEdge, WireNode};

/// Identity attached to an incoming call by the transport layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    uid: Option<String>,
}

impl Caller {
    pub fn authenticated(uid: impl Into<String>) -> Self {
        let uid = uid.into();
        Self {
            uid: (!uid.is_empty()).then_some(uid),
        }
    }

    pub fn anonymous() -> Self {
        Self { uid: None }
    }

    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }
}

pub struct GraphBuilder<S> {
    store: S,
}

impl<S: DocumentStore> GraphBuilder<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Scans every user and their friends, then returns the nodes that sit on
    /// at least one friendship edge. Holds no state between calls.
    pub async fn build_graph(
        &self,
        caller: &Caller,
        request: &GraphRequest,
    ) -> Result<GraphResponse> {
        authorize(caller, request)?;

        let user_ids = self.store.user_ids().await?;
        let friend_lists =
            try_join_all(user_ids.iter().map(|user_id| self.store.friend_ids(user_id))).await?;
        log::debug!(
            "fetched friend lists for {} users on behalf of {}",
            user_ids.len(),
            request.user_id
        );

        let response = assemble(user_ids.into_iter().zip(friend_lists));
        log::info!(
            "graph for {}: {} nodes, {} edges",
            request.user_id,
            response.nodes.len(),
            response.edges.len()
        );
        Ok(response)
    }
}

fn authorize(caller: &Caller, request: &GraphRequest) -> Result<()> {
    match caller.uid() {
        Some(uid) if uid == request.user_id => Ok(()),
        Some(uid) => {
            log::warn!(
                "caller {uid} asked for the graph of {}; rejecting",
                request.user_id
            );
            Err(GraphError::Unauthenticated)
        }
        None => Err(GraphError::Unauthenticated),
    }
}

fn assemble(friend_lists: impl IntoIterator<Item = (String, Vec<String>)>) -> GraphResponse {
    let mut order = Vec::new();
    let mut coords: HashMap<String, (f32, f32)> = HashMap::new();
    let mut edge_keys: BTreeSet<(String, String)> = BTreeSet::new();

    let mut ensure_node = |id: &str| {
        if !coords.contains_key(id) {
            coords.insert(id.to_owned(), pseudo_random_coord(id));
            order.push(id.to_owned());
        }
    };

    for (user_id, friends) in friend_lists {
        ensure_node(&user_id);
        for friend_id in friends {
            ensure_node(&friend_id);
            if friend_id == user_id {
                continue;
            }

            let key = if user_id < friend_id {
                (user_id.clone(), friend_id)
            } else {
                (friend_id, user_id.clone())
            };
            edge_keys.insert(key);
        }
    }

    let connected = edge_keys
        .iter()
        .flat_map(|(a, b)| [a.as_str(), b.as_str()])
        .collect::<HashSet<_>>();

    let nodes = order
        .iter()
        .filter(|id| connected.contains(id.as_str()))
        .filter_map(|id| {
            coords.get(id).map(|&(x, y)| WireNode {
                id: id.clone(),
                x,
                y,
            })
        })
        .collect();

    let edges = edge_keys
        .into_iter()
        .map(|(source, target)| WireEdge { source, target })
        .collect();

    GraphResponse { nodes, edges }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashSet;

    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;

    fn request(user_id: &str) -> GraphRequest {
        GraphRequest {
            user_id: user_id.to_owned(),
        }
    }

    fn scenario_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert_friend("U1", "U2");
        store.insert_friend("U1", "U3");
        store.insert_friend("U2", "U1");
        store.insert_friend("U2", "U4");
        store.insert_user("U3");
        store.insert_user("U4");
        store
    }

    #[derive(Default)]
    struct BrokenStore {
        reads: Cell<usize>,
        fail_friends_only: bool,
    }

    impl DocumentStore for BrokenStore {
        async fn user_ids(&self) -> std::result::Result<Vec<String>, StoreError> {
            self.reads.set(self.reads.get() + 1);
            if self.fail_friends_only {
                Ok(vec!["U1".to_owned(), "U2".to_owned()])
            } else {
                Err(StoreError::Unavailable("connection reset".to_owned()))
            }
        }

        async fn friend_ids(&self, user_id: &str) -> std::result::Result<Vec<String>, StoreError> {
            self.reads.set(self.reads.get() + 1);
            Err(StoreError::FriendsUnavailable {
                user_id: user_id.to_owned(),
                reason: "deadline exceeded".to_owned(),
            })
        }
    }

    #[tokio::test]
    async fn builds_deduplicated_scenario_graph() {
        let builder = GraphBuilder::new(scenario_store());
        let response = builder
            .build_graph(&Caller::authenticated("U1"), &request("U1"))
            .await
            .unwrap();

        let ids = response
            .nodes
            .iter()
            .map(|node| node.id.as_str())
            .collect::<HashSet<_>>();
        assert_eq!(ids, HashSet::from(["U1", "U2", "U3", "U4"]));
        assert_eq!(response.nodes.len(), 4);

        let edges = response
            .edges
            .iter()
            .map(|edge| (edge.source.as_str(), edge.target.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(edges, vec![("U1", "U2"), ("U1", "U3"), ("U2", "U4")]);

        let u1 = &response.nodes[0];
        assert_eq!((u1.x, u1.y), pseudo_random_coord("U1"));
    }

    #[tokio::test]
    async fn isolated_users_and_self_loops_are_dropped() {
        let mut store = scenario_store();
        store.insert_user("loner");
        store.insert_friend("narcissus", "narcissus");

        let builder = GraphBuilder::new(store);
        let response = builder
            .build_graph(&Caller::authenticated("U1"), &request("U1"))
            .await
            .unwrap();

        let connected = response
            .edges
            .iter()
            .flat_map(|edge| [edge.source.as_str(), edge.target.as_str()])
            .collect::<HashSet<_>>();
        for node in &response.nodes {
            assert!(connected.contains(node.id.as_str()), "{} is isolated", node.id);
        }
        assert!(response.nodes.iter().all(|node| node.id != "loner"));
        assert!(response.edges.iter().all(|edge| edge.source != edge.target));

        let mut seen = HashSet::new();
        for edge in &response.edges {
            let key = if edge.source < edge.target {
                (edge.source.as_str(), edge.target.as_str())
            } else {
                (edge.target.as_str(), edge.source.as_str())
            };
            assert!(seen.insert(key), "duplicate edge {key:?}");
        }
    }

    #[tokio::test]
    async fn repeated_calls_return_identical_graphs() {
        let builder = GraphBuilder::new(scenario_store());
        let caller = Caller::authenticated("U2");
        let first = builder.build_graph(&caller, &request("U2")).await.unwrap();
        let second = builder.build_graph(&caller, &request("U2")).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unauthenticated_callers_never_reach_the_store() {
        let builder = GraphBuilder::new(BrokenStore::default());

        for caller in [
            Caller::anonymous(),
            Caller::authenticated(""),
            Caller::authenticated("U9"),
        ] {
            let result = builder.build_graph(&caller, &request("U1")).await;
            let error = result.unwrap_err();
            assert!(matches!(error, GraphError::Unauthenticated));
            assert!(!error.is_retryable());
        }
        assert_eq!(builder.store.reads.get(), 0);
    }

    #[tokio::test]
    async fn store_failures_are_retryable() {
        for fail_friends_only in [false, true] {
            let builder = GraphBuilder::new(BrokenStore {
                fail_friends_only,
                ..BrokenStore::default()
            });
            let error = builder
                .build_graph(&Caller::authenticated("U1"), &request("U1"))
                .await
                .unwrap_err();
            assert!(matches!(error, GraphError::BackendUnavailable(_)));
            assert!(error.is_retryable());
        }
    }

    #[tokio::test]
    async fn empty_store_yields_empty_graph() {
        let builder = GraphBuilder::new(MemoryStore::new());
        let response = builder
            .build_graph(&Caller::authenticated("U1"), &request("U1"))
            .await
            .unwrap();
        assert!(response.is_empty());
        assert!(response.edges.is_empty());
    }
}
