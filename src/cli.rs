use crate::adapters::observer::{FixtureScript, TracingObserver};
use crate::app::config::ResolverConfig;
use crate::app::dto::{ClassificationReport, ResolutionReport, TreeReport};
use crate::app::engine::AutoMocker;
use crate::demo::{DemoSubject, demo_registry};
use crate::domain::mock::DefaultValue;
use crate::domain::ports::TypeMetadata;
use crate::domain::type_registry::TypeRegistry;
use crate::symbol::TypeSymbol;
use anyhow::{Context as _, Result};
use clap::ValueEnum;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TreeFormat {
    #[default]
    Text,
    Json,
    Dot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Command-line spelling of [`DefaultValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DefaultValueArg {
    Empty,
    Absent,
}

impl From<DefaultValueArg> for DefaultValue {
    fn from(arg: DefaultValueArg) -> Self {
        match arg {
            DefaultValueArg::Empty => DefaultValue::Empty,
            DefaultValueArg::Absent => DefaultValue::Absent,
        }
    }
}

/// Config file (if any) with command-line overrides applied.
pub fn load_config(
    path: Option<&Path>,
    max_nodes: Option<usize>,
    default_value: Option<DefaultValueArg>,
) -> Result<ResolverConfig> {
    let mut config = match path {
        Some(path) => ResolverConfig::from_json_file(path)?,
        None => ResolverConfig::default(),
    };
    if let Some(max_nodes) = max_nodes {
        config = config.with_max_nodes(max_nodes);
    }
    if let Some(default_value) = default_value {
        config = config.with_default_value(default_value.into());
    }
    config.validate()?;
    Ok(config)
}

fn demo_engine(config: ResolverConfig, script: Option<Arc<FixtureScript>>) -> AutoMocker {
    let mut builder = AutoMocker::builder(Arc::new(demo_registry()))
        .config(config)
        .observer(Arc::new(TracingObserver));
    if let Some(script) = script {
        builder = builder.observer(script);
    }
    builder.build()
}

/// Render the dependency tree of a demo subject.
pub fn render_tree(subject: DemoSubject, config: ResolverConfig, format: TreeFormat) -> Result<String> {
    let engine = demo_engine(config, None);
    let tree = engine
        .build_tree_for(subject.descriptor())
        .context("Failed to build dependency tree")?;

    let output = match format {
        TreeFormat::Dot => tree.to_dot(),
        TreeFormat::Json => serde_json::to_string_pretty(&TreeReport::from_tree(&tree))?,
        TreeFormat::Text => {
            let report = TreeReport::from_tree(&tree);
            let mut out = String::new();
            writeln!(out, "Dependency tree ({} nodes, depth {}):", report.node_count, report.depth)?;
            for node in &report.nodes {
                writeln!(
                    out,
                    "{}{} [{}]",
                    "  ".repeat(node.depth),
                    node.short_name,
                    node.strategy.label()
                )?;
            }
            out
        }
    };
    Ok(output)
}

/// Resolve a demo subject and render its construction records.
pub fn render_resolution(
    subject: DemoSubject,
    config: ResolverConfig,
    format: ReportFormat,
    with_script: bool,
) -> Result<String> {
    let script = with_script.then(|| Arc::new(FixtureScript::new()));
    let engine = demo_engine(config, script.clone());
    let result = engine
        .resolve_type(subject.descriptor())
        .context("Failed to resolve subject")?;

    let mut report = ResolutionReport::from_result(&result);
    if let Some(script) = &script {
        report = report.with_script(script.lines());
    }

    let output = match format {
        ReportFormat::Json => serde_json::to_string_pretty(&report)?,
        ReportFormat::Text => {
            let mut out = String::new();
            writeln!(
                out,
                "Resolved {} ({} records, {} mocked)",
                TypeSymbol::parse(&report.subject).short_name(),
                report.record_count,
                report.mocked.len()
            )?;
            for (i, record) in report.records.iter().enumerate() {
                let mut flags = Vec::new();
                if record.mocked {
                    flags.push("mocked");
                }
                if record.absent {
                    flags.push("absent");
                }
                write!(out, "{}. {} [{}]", i + 1, record.short_name, record.strategy.label())?;
                if !flags.is_empty() {
                    write!(out, " ({})", flags.join(", "))?;
                }
                writeln!(out)?;
            }
            if let Some(lines) = &report.script {
                writeln!(out)?;
                writeln!(out, "Fixture script:")?;
                for line in lines {
                    writeln!(out, "    {}", line)?;
                }
            }
            out
        }
    };
    Ok(output)
}

/// Classification of every registered demo type.
pub fn render_classification(format: ReportFormat) -> Result<String> {
    let registry = demo_registry();
    let report = classification_of(&registry);
    let output = match format {
        ReportFormat::Json => serde_json::to_string_pretty(&report)?,
        ReportFormat::Text => {
            let mut out = String::new();
            for item in &report.items {
                writeln!(
                    out,
                    "{:<40} {:<12} {}",
                    item.short_name,
                    format!("{:?}", item.kind).to_lowercase(),
                    item.strategy.label()
                )?;
            }
            out
        }
    };
    Ok(output)
}

fn classification_of(registry: &TypeRegistry) -> ClassificationReport {
    let metadata: &dyn TypeMetadata = registry;
    ClassificationReport::classify_all(metadata, &registry.descriptors())
}
