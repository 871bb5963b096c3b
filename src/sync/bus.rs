//! In-process ändringskanal, ett ämne per entitetstyp
//!
//! Varje skrivning till lagringen publicerar entitetens ämne. Vyer
//! prenumererar på de ämnen de visar och läser om lagringen när en
//! händelse kommer. Händelser bär ingen data.

use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use tracing::debug;

/// Ämne för ändringshändelser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Projects,
    Subprojects,
    Roles,
    Permissions,
    Companies,
    Users,
    Session,
}

impl Topic {
    pub fn all() -> &'static [Topic] {
        &[
            Self::Projects,
            Self::Subprojects,
            Self::Roles,
            Self::Permissions,
            Self::Companies,
            Self::Users,
            Self::Session,
        ]
    }

    /// Signalnamn som skickas vid ändring
    pub fn signal_name(&self) -> &'static str {
        match self {
            Self::Projects => "projectsUpdated",
            Self::Subprojects => "subprojectsUpdated",
            Self::Roles => "rolesUpdated",
            Self::Permissions => "permissionsUpdated",
            Self::Companies => "companiesUpdated",
            Self::Users => "usersUpdated",
            Self::Session => "sessionUpdated",
        }
    }

    /// Ämne för en lagringsnyckel
    pub fn for_key(key: &str) -> Option<Topic> {
        match key {
            "projects" => Some(Self::Projects),
            "subprojects" => Some(Self::Subprojects),
            "userRoles" => Some(Self::Roles),
            "projectPermissions" => Some(Self::Permissions),
            "companies" => Some(Self::Companies),
            "manageTeamsUsers" => Some(Self::Users),
            "isAuthenticated" | "userEmail" => Some(Self::Session),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Topic> {
        match name {
            "projects" => Some(Self::Projects),
            "subprojects" => Some(Self::Subprojects),
            "roles" => Some(Self::Roles),
            "permissions" => Some(Self::Permissions),
            "companies" => Some(Self::Companies),
            "users" => Some(Self::Users),
            "session" => Some(Self::Session),
            _ => None,
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.signal_name())
    }
}

/// Var ändringen kom ifrån
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Skrivning genom samma databashandtag
    Local,
    /// Skrivning från en annan anslutning (annan process eller handtag)
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub topic: Topic,
    pub origin: Origin,
}

struct Subscriber {
    id: u64,
    topics: Vec<Topic>,
    sender: Sender<ChangeEvent>,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

/// Delad ändringskanal. Kloner delar samma prenumeranter.
#[derive(Clone, Default)]
pub struct ChangeBus {
    inner: Arc<Mutex<BusInner>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prenumerera på ett eller flera ämnen
    ///
    /// Prenumerationen avslutas när den returnerade `Subscription` släpps.
    pub fn subscribe(&self, topics: &[Topic]) -> Subscription {
        let (sender, receiver) = mpsc::channel();
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push(Subscriber {
            id,
            topics: topics.to_vec(),
            sender,
        });

        Subscription {
            id,
            topics: topics.to_vec(),
            receiver,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Skicka en händelse till alla prenumeranter på ämnet
    ///
    /// Returnerar antalet prenumeranter som fick händelsen.
    pub fn publish(&self, topic: Topic, origin: Origin) -> usize {
        let event = ChangeEvent { topic, origin };
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        let mut delivered = 0;
        inner.subscribers.retain(|sub| {
            if !sub.topics.contains(&topic) {
                return true;
            }
            // Mottagaren borta utan att Drop körts (t.ex. vid panic)
            match sub.sender.send(event) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            }
        });

        debug!("{} ({:?}) levererad till {} prenumeranter", topic, origin, delivered);
        delivered
    }

    /// Antal aktiva prenumerationer
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribers
            .len()
    }
}

/// Aktiv prenumeration. Avregistreras vid drop.
pub struct Subscription {
    id: u64,
    topics: Vec<Topic>,
    receiver: Receiver<ChangeEvent>,
    bus: Weak<Mutex<BusInner>>,
}

impl Subscription {
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Hämta nästa händelse utan att vänta
    pub fn try_next(&self) -> Option<ChangeEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Töm kön och returnera alla väntande händelser
    pub fn drain(&self) -> Vec<ChangeEvent> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    /// Vänta på nästa händelse högst `timeout`
    pub fn next_timeout(&self, timeout: Duration) -> Option<ChangeEvent> {
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.subscribers.retain(|sub| sub.id != self.id);
        }
    }
}
