//! Sample domain used by the `automock` binary and the integration tests.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::ValueEnum;

use crate::domain::mock::MockControl;
use crate::domain::type_registry::{Args, TypeDescriptor, TypeRegistry};

pub trait IDataProcessor: Send + Sync {
    fn process(&self, items: &[String]) -> Vec<String>;
}

pub trait ILogger: Send + Sync {
    fn log(&self, message: &str);
}

pub trait INetworkManager: Send + Sync {
    /// `None` when the manager has no endpoint list at all
    fn endpoints(&self) -> Option<Vec<String>>;
}

pub trait ISecurityProvider: Send + Sync {
    fn is_authorized(&self, user: &str) -> bool;
}

pub trait IDataSource: Send + Sync {
    fn fetch(&self) -> Vec<String>;
}

struct DataProcessorProxy(MockControl);

impl IDataProcessor for DataProcessorProxy {
    fn process(&self, _items: &[String]) -> Vec<String> {
        self.0.invoke_sequence("process").unwrap_or_default()
    }
}

struct LoggerProxy(MockControl);

impl ILogger for LoggerProxy {
    fn log(&self, _message: &str) {
        let _ = self.0.invoke::<()>("log");
    }
}

struct NetworkManagerProxy(MockControl);

impl INetworkManager for NetworkManagerProxy {
    fn endpoints(&self) -> Option<Vec<String>> {
        self.0.invoke_sequence("endpoints")
    }
}

struct SecurityProviderProxy(MockControl);

impl ISecurityProvider for SecurityProviderProxy {
    fn is_authorized(&self, _user: &str) -> bool {
        self.0.invoke("is_authorized").unwrap_or_default()
    }
}

struct DataSourceProxy(MockControl);

impl IDataSource for DataSourceProxy {
    fn fetch(&self) -> Vec<String> {
        self.0.invoke_sequence("fetch").unwrap_or_default()
    }
}

/// Two constructors; the empty one is preferred.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationManager {
    pub config_path: Option<String>,
}

impl ConfigurationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(config_path: String) -> Self {
        Self {
            config_path: Some(config_path),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DataHandler {
    pub items: Vec<String>,
}

impl DataHandler {
    pub fn new(items: Vec<String>) -> Self {
        Self { items }
    }
}

impl IDataProcessor for DataHandler {
    fn process(&self, items: &[String]) -> Vec<String> {
        self.items.iter().chain(items).cloned().collect()
    }
}

pub struct ApplicationCore {
    pub processor: Arc<dyn IDataProcessor>,
    pub logger: Arc<dyn ILogger>,
    pub config: Arc<ConfigurationManager>,
    pub data_handler: Arc<DataHandler>,
    pub number: i64,
    pub set: HashSet<i32>,
}

pub struct SystemOrchestrator {
    pub processor: Arc<dyn IDataProcessor>,
    pub logger: Arc<dyn ILogger>,
    pub network: Arc<dyn INetworkManager>,
    pub security: Arc<dyn ISecurityProvider>,
    pub config: Arc<ConfigurationManager>,
    pub data_handler: Arc<DataHandler>,
    pub cores: Arc<Vec<Arc<ApplicationCore>>>,
}

impl SystemOrchestrator {
    /// Process the handler's items when `user` is authorized; logs once per run.
    pub fn run(&self, user: &str) -> Vec<String> {
        if !self.security.is_authorized(user) {
            self.logger.log("unauthorized");
            return Vec::new();
        }
        self.logger.log("processing");
        self.processor.process(&self.data_handler.items)
    }
}

impl fmt::Display for SystemOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SystemOrchestrator(config: {}, items: {}, cores: {})",
            self.config.config_path.as_deref().unwrap_or("<default>"),
            self.data_handler.items.len(),
            self.cores.len()
        )
    }
}

#[derive(Debug, Default)]
pub struct Logger {
    lines: Mutex<Vec<String>>,
}

impl Logger {
    pub fn log(&self, line: impl Into<String>) {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(line.into());
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

pub struct Orchestrator {
    pub source: Arc<dyn IDataSource>,
    pub logger: Arc<Logger>,
}

impl Orchestrator {
    pub fn run(&self) -> usize {
        let items = self.source.fetch();
        self.logger.log(format!("fetched {} item(s)", items.len()));
        items.len()
    }
}

/// Only value-like constructor parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSettings {
    pub retries: i32,
    pub host: String,
    pub timeout: f64,
}

pub struct CyclicA {
    pub b: Arc<CyclicB>,
}

pub struct CyclicB {
    pub a: Arc<CyclicA>,
}

/// Registry describing every demo type.
pub fn demo_registry() -> TypeRegistry {
    let mut r = TypeRegistry::with_builtins();
    r.register_interface::<dyn IDataProcessor, _>(|c| Arc::new(DataProcessorProxy(c)) as Arc<dyn IDataProcessor>);
    r.register_interface::<dyn ILogger, _>(|c| Arc::new(LoggerProxy(c)) as Arc<dyn ILogger>);
    r.register_interface::<dyn INetworkManager, _>(|c| {
        Arc::new(NetworkManagerProxy(c)) as Arc<dyn INetworkManager>
    });
    r.register_interface::<dyn ISecurityProvider, _>(|c| {
        Arc::new(SecurityProviderProxy(c)) as Arc<dyn ISecurityProvider>
    });
    r.register_interface::<dyn IDataSource, _>(|c| Arc::new(DataSourceProxy(c)) as Arc<dyn IDataSource>);

    r.register_default::<Vec<String>>();
    r.register_default::<HashSet<i32>>();
    r.register_default::<Vec<Arc<ApplicationCore>>>();
    r.register_default::<Logger>();

    r.register_class::<ConfigurationManager>()
        .constructor(Vec::new(), |_| Ok(ConfigurationManager::new()))
        .constructor(vec![TypeDescriptor::of::<String>()], |a| {
            Ok(ConfigurationManager::with_path(a.value(0)?))
        });

    r.register_class::<DataHandler>()
        .constructor(vec![TypeDescriptor::of::<Vec<String>>()], |a| {
            Ok(DataHandler::new(a.value(0)?))
        });

    r.register_class::<ApplicationCore>().constructor(
        vec![
            TypeDescriptor::of::<dyn IDataProcessor>(),
            TypeDescriptor::of::<dyn ILogger>(),
            TypeDescriptor::of::<ConfigurationManager>(),
            TypeDescriptor::of::<DataHandler>(),
            TypeDescriptor::of::<i64>(),
            TypeDescriptor::of::<HashSet<i32>>(),
        ],
        build_application_core,
    );

    r.register_class::<SystemOrchestrator>().constructor(
        vec![
            TypeDescriptor::of::<dyn IDataProcessor>(),
            TypeDescriptor::of::<dyn ILogger>(),
            TypeDescriptor::of::<dyn INetworkManager>(),
            TypeDescriptor::of::<dyn ISecurityProvider>(),
            TypeDescriptor::of::<ConfigurationManager>(),
            TypeDescriptor::of::<DataHandler>(),
            TypeDescriptor::of::<Vec<Arc<ApplicationCore>>>(),
        ],
        |a| {
            Ok(SystemOrchestrator {
                processor: a.service(0)?,
                logger: a.service(1)?,
                network: a.service(2)?,
                security: a.service(3)?,
                config: a.get(4)?,
                data_handler: a.get(5)?,
                cores: a.get(6)?,
            })
        },
    );

    r.register_class::<Orchestrator>().constructor(
        vec![
            TypeDescriptor::of::<dyn IDataSource>(),
            TypeDescriptor::of::<Logger>(),
        ],
        |a| {
            Ok(Orchestrator {
                source: a.service(0)?,
                logger: a.get(1)?,
            })
        },
    );

    r.register_class::<ConnectionSettings>().constructor(
        vec![
            TypeDescriptor::of::<i32>(),
            TypeDescriptor::of::<String>(),
            TypeDescriptor::of::<f64>(),
        ],
        |a| {
            Ok(ConnectionSettings {
                retries: a.value(0)?,
                host: a.value(1)?,
                timeout: a.value(2)?,
            })
        },
    );

    r.register_class::<CyclicA>()
        .constructor(vec![TypeDescriptor::of::<CyclicB>()], |a| Ok(CyclicA { b: a.get(0)? }));
    r.register_class::<CyclicB>()
        .constructor(vec![TypeDescriptor::of::<CyclicA>()], |a| Ok(CyclicB { a: a.get(0)? }));

    r
}

fn build_application_core(a: &Args) -> Result<ApplicationCore> {
    Ok(ApplicationCore {
        processor: a.service(0)?,
        logger: a.service(1)?,
        config: a.get(2)?,
        data_handler: a.get(3)?,
        number: a.value(4)?,
        set: a.value(5)?,
    })
}

/// Demo types selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum DemoSubject {
    SystemOrchestrator,
    ApplicationCore,
    Orchestrator,
    ConnectionSettings,
    CyclicA,
}

impl DemoSubject {
    pub fn descriptor(&self) -> TypeDescriptor {
        match self {
            DemoSubject::SystemOrchestrator => TypeDescriptor::of::<SystemOrchestrator>(),
            DemoSubject::ApplicationCore => TypeDescriptor::of::<ApplicationCore>(),
            DemoSubject::Orchestrator => TypeDescriptor::of::<Orchestrator>(),
            DemoSubject::ConnectionSettings => TypeDescriptor::of::<ConnectionSettings>(),
            DemoSubject::CyclicA => TypeDescriptor::of::<CyclicA>(),
        }
    }
}
