//! Registries and types shared by the integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::bail;
use deep_automock::domain::mock::MockControl;
use deep_automock::{TypeDescriptor, TypeRegistry};

pub trait Store: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;
    fn keys(&self) -> Option<Vec<String>>;
}

pub struct StoreProxy(pub MockControl);

impl Store for StoreProxy {
    fn load(&self, _key: &str) -> Option<String> {
        self.0.invoke("load")
    }

    fn keys(&self) -> Option<Vec<String>> {
        self.0.invoke_sequence("keys")
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

pub struct ClockProxy(pub MockControl);

impl Clock for ClockProxy {
    fn now(&self) -> u64 {
        self.0.invoke("now").unwrap_or_default()
    }
}

/// Counts how often it was constructed across the whole test binary.
pub static SHARED_CACHE_BUILDS: AtomicUsize = AtomicUsize::new(0);

pub struct SharedCache {
    pub id: usize,
}

impl SharedCache {
    pub fn new() -> Self {
        Self {
            id: SHARED_CACHE_BUILDS.fetch_add(1, Ordering::SeqCst),
        }
    }
}

pub struct Repository {
    pub store: Arc<dyn Store>,
    pub cache: Arc<SharedCache>,
}

impl Repository {
    pub fn find(&self, key: &str) -> Option<String> {
        self.store.load(key)
    }
}

/// Reaches `SharedCache` and `dyn Store` both directly and through `Repository`.
pub struct Service {
    pub repository: Arc<Repository>,
    pub cache: Arc<SharedCache>,
    pub store: Arc<dyn Store>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Fast,
    Safe,
}

/// Value type the registry knows nothing default about
pub struct Token(pub String);

pub struct Settings {
    pub port: u16,
    pub mode: Mode,
    pub token: Option<Arc<Token>>,
}

pub struct Session {
    pub clock: Arc<dyn Clock>,
    pub token: Option<Arc<Token>>,
}

/// Constructor that always fails
pub struct Broken;

pub struct NeedsBroken {
    pub broken: Arc<Broken>,
}

pub struct Unregistered;

pub struct NeedsUnregistered {
    pub inner: Arc<Unregistered>,
}

pub struct Ouroboros;

pub fn registry() -> TypeRegistry {
    let mut r = TypeRegistry::with_builtins();
    r.register_interface::<dyn Store, _>(|c| Arc::new(StoreProxy(c)) as Arc<dyn Store>);
    r.register_interface::<dyn Clock, _>(|c| Arc::new(ClockProxy(c)) as Arc<dyn Clock>);
    r.register_enum(vec![Mode::Safe, Mode::Fast])
        .expect("enum has members");
    r.register_opaque_value::<Token>();

    r.register_class::<SharedCache>()
        .constructor(Vec::new(), |_| Ok(SharedCache::new()));
    r.register_class::<Repository>().constructor(
        vec![
            TypeDescriptor::of::<dyn Store>(),
            TypeDescriptor::of::<SharedCache>(),
        ],
        |a| {
            Ok(Repository {
                store: a.service(0)?,
                cache: a.get(1)?,
            })
        },
    );
    r.register_class::<Service>().constructor(
        vec![
            TypeDescriptor::of::<Repository>(),
            TypeDescriptor::of::<SharedCache>(),
            TypeDescriptor::of::<dyn Store>(),
            TypeDescriptor::of::<dyn Clock>(),
        ],
        |a| {
            Ok(Service {
                repository: a.get(0)?,
                cache: a.get(1)?,
                store: a.service(2)?,
                clock: a.service(3)?,
            })
        },
    );
    r.register_class::<Settings>().constructor(
        vec![
            TypeDescriptor::of::<u16>(),
            TypeDescriptor::of::<Mode>(),
            TypeDescriptor::of::<Token>(),
        ],
        |a| {
            Ok(Settings {
                port: a.value(0)?,
                mode: a.value(1)?,
                token: a.optional(2)?,
            })
        },
    );
    r.register_class::<Session>().constructor(
        vec![
            TypeDescriptor::of::<dyn Clock>(),
            TypeDescriptor::of::<Token>(),
        ],
        |a| {
            Ok(Session {
                clock: a.service(0)?,
                token: a.optional(1)?,
            })
        },
    );
    r.register_class::<Broken>()
        .constructor(vec![TypeDescriptor::of::<u8>()], |_| -> anyhow::Result<Broken> {
            bail!("disk on fire")
        });
    r.register_class::<NeedsBroken>()
        .constructor(vec![TypeDescriptor::of::<Broken>()], |a| {
            Ok(NeedsBroken { broken: a.get(0)? })
        });
    r.register_class::<NeedsUnregistered>()
        .constructor(vec![TypeDescriptor::of::<Unregistered>()], |a| {
            Ok(NeedsUnregistered { inner: a.get(0)? })
        });
    r.register_class::<Ouroboros>()
        .constructor(vec![TypeDescriptor::of::<Ouroboros>()], |_| Ok(Ouroboros));
    r
}
