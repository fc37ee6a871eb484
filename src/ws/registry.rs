//! RoomRegistry - live connections and their room memberships
//!
//! Process-local shared state: every connection's attach/join/detach mutates
//! it while the delivery router reads it concurrently. Membership updates go
//! through per-entry DashMap locks, so `members_of` always observes a fully
//! updated set, never a partial one.
//!
//! The surface (`join`, `members_of`, `emit_to_room`) is what a distributed
//! pub/sub backing would have to provide; swapping one in would not touch the
//! router.

use crate::dtos::ServerEvent;
use crate::entities::Identity;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};

/// Process-local connection handle, assigned at attach time.
pub type ConnId = u64;

struct ConnectionEntry {
    identity: Option<Identity>,
    tx: UnboundedSender<ServerEvent>,
    rooms: HashSet<String>,
}

#[derive(Default)]
pub struct RoomRegistry {
    next_id: AtomicU64,
    connections: DashMap<ConnId, ConnectionEntry>,
    rooms: DashMap<String, HashSet<ConnId>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection with its outbound channel and, when the client
    /// presented a valid credential, its identity. Anonymous connections are
    /// permitted; they just cannot be addressed by others.
    #[instrument(skip(self, tx, identity))]
    pub fn attach(&self, tx: UnboundedSender<ServerEvent>, identity: Option<Identity>) -> ConnId {
        let conn_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.connections.insert(
            conn_id,
            ConnectionEntry {
                identity,
                tx,
                rooms: HashSet::new(),
            },
        );
        info!(conn_id, online = self.connections.len(), "connection attached");
        conn_id
    }

    /// Adds `conn_id` to `room`. Idempotent: joining a room twice is a no-op.
    #[instrument(skip(self))]
    pub fn join(&self, conn_id: ConnId, room: &str) {
        let Some(mut entry) = self.connections.get_mut(&conn_id) else {
            warn!(conn_id, "join for unknown connection");
            return;
        };
        if !entry.rooms.insert(room.to_string()) {
            debug!(conn_id, room, "already joined");
            return;
        }
        drop(entry);

        self.rooms.entry(room.to_string()).or_default().insert(conn_id);
        info!(conn_id, room, "joined room");
    }

    /// Snapshot of the connections currently joined to `room`. Empty means
    /// the recipient is offline.
    pub fn members_of(&self, room: &str) -> Vec<ConnId> {
        self.rooms
            .get(room)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Removes the connection and every room membership it holds. Called on
    /// disconnect; there is no narrower leave-room operation.
    #[instrument(skip(self))]
    pub fn detach(&self, conn_id: ConnId) {
        let Some((_, entry)) = self.connections.remove(&conn_id) else {
            return;
        };
        for room in &entry.rooms {
            if let Some(mut members) = self.rooms.get_mut(room) {
                members.remove(&conn_id);
                let emptied = members.is_empty();
                drop(members);
                if emptied {
                    self.rooms.remove_if(room, |_, members| members.is_empty());
                }
            }
        }
        info!(conn_id, online = self.connections.len(), "connection detached");
    }

    pub fn identity_of(&self, conn_id: ConnId) -> Option<Identity> {
        self.connections
            .get(&conn_id)
            .and_then(|entry| entry.identity.clone())
    }

    /// Pushes `event` to every member of `room`, skipping `except` (the
    /// originating connection of a send). Returns how many connections were
    /// reached; members whose channel has gone away are silently skipped,
    /// live delivery is best effort.
    #[instrument(skip(self, event))]
    pub fn emit_to_room(&self, room: &str, except: Option<ConnId>, event: &ServerEvent) -> usize {
        let mut delivered = 0;
        for member in self.members_of(room) {
            if Some(member) == except {
                continue;
            }
            if self.send_to(member, event.clone()) {
                delivered += 1;
            }
        }
        debug!(room, delivered, "room fan-out complete");
        delivered
    }

    /// Pushes `event` to a single connection. Returns false when the
    /// connection is gone or its writer has shut down.
    pub fn send_to(&self, conn_id: ConnId, event: ServerEvent) -> bool {
        match self.connections.get(&conn_id) {
            Some(entry) => {
                if entry.tx.send(event).is_err() {
                    warn!(conn_id, "writer gone, event dropped");
                    false
                } else {
                    true
                }
            }
            None => false,
        }
    }

    pub fn online_count(&self) -> usize {
        self.connections.len()
    }
}
