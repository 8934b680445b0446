//! kg-agent CLI: tool-calling agent over an in-memory knowledge graph.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use kg_agent::agent::tools::{FinalAnswerTool, KgQueryTool, kg_query};
use kg_agent::agent::{Agent, AgentConfig, StepKind, ToolOutput, ToolRegistry};
use kg_agent::error::KgAgentError;
use kg_agent::graph::{Triple, TriplePattern, TripleStore, read_triples};
use kg_agent::message::{JsonSink, MessageSink, StdoutSink};

const DEMO_QUESTION: &str = "Where does Alice's colleague work and where is it located?";

#[derive(Parser)]
#[command(name = "kg-agent", version, about = "Tool-calling agent over a knowledge graph")]
struct Cli {
    /// Agent config file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit agent messages as newline-delimited JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default agent config file.
    Init {
        /// Where to write the config.
        #[arg(long, default_value = "kg-agent.toml")]
        path: PathBuf,
    },

    /// Run the built-in example: three toy triples, kg_query then final_answer.
    Demo,

    /// Run the agent on a question.
    Run {
        /// The question to answer.
        #[arg(long)]
        query: String,

        /// JSON file with triples (defaults to the toy triples).
        #[arg(long)]
        triples: Option<PathBuf>,

        /// Tools to register, in order (comma-separated).
        #[arg(long, default_value = "kg_query,final_answer")]
        tools: String,

        /// Override the configured step bound.
        #[arg(long)]
        max_steps: Option<usize>,
    },

    /// Match a triple pattern against the store.
    Query {
        /// JSON file with triples (defaults to the toy triples).
        #[arg(long)]
        triples: Option<PathBuf>,

        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        predicate: Option<String>,

        #[arg(long)]
        object: Option<String>,
    },

    /// Execute a program against the store.
    Program {
        /// JSON file with triples (defaults to the toy triples).
        #[arg(long)]
        triples: Option<PathBuf>,

        /// Program text.
        program: String,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AgentConfig::load(path).map_err(KgAgentError::from)?,
        None => AgentConfig::default(),
    };
    let sink: Arc<dyn MessageSink> = if cli.json {
        Arc::new(JsonSink)
    } else {
        Arc::new(StdoutSink)
    };

    match cli.command {
        Commands::Init { path } => {
            AgentConfig::default()
                .save(&path)
                .map_err(KgAgentError::from)?;
            println!("Wrote default agent config to {}", path.display());
        }

        Commands::Demo => {
            let store = Arc::new(TripleStore::new());
            store.load(toy_triples());

            let mut tools = ToolRegistry::new();
            tools.register("kg_query", Box::new(KgQueryTool::new(Arc::clone(&store))));
            tools.register("final_answer", Box::new(FinalAnswerTool::new()));

            let mut agent = Agent::new(tools, config).with_sink(sink);
            let result = agent.run(DEMO_QUESTION).map_err(KgAgentError::from)?;
            let rendered = serde_json::to_string(&result).into_diagnostic()?;
            println!("Agent result: {rendered}");
        }

        Commands::Run {
            query,
            triples,
            tools,
            max_steps,
        } => {
            let store = Arc::new(open_store(triples)?);

            let mut registry = ToolRegistry::new();
            for name in tools.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                match name {
                    "kg_query" => registry
                        .register(name, Box::new(KgQueryTool::new(Arc::clone(&store)))),
                    "final_answer" => registry.register(name, Box::new(FinalAnswerTool::new())),
                    other => miette::bail!(
                        "unknown tool \"{}\" (available: kg_query, final_answer)",
                        other
                    ),
                }
            }

            let config = AgentConfig {
                max_steps: max_steps.unwrap_or(config.max_steps),
                ..config
            };
            let mut agent = Agent::new(registry, config).with_sink(sink);
            let report = agent.run_detailed(&query).map_err(KgAgentError::from)?;

            println!(
                "Finished after {} step(s): {:?}",
                report.steps, report.termination
            );
            let rendered = serde_json::to_string_pretty(&report.result).into_diagnostic()?;
            println!("Agent result: {rendered}");
            for step in agent.memory().by_kind(&StepKind::ToolCall) {
                let tool = step.content["tool"].as_str().unwrap_or("?");
                let out = ToolOutput::raw(step.content["out"].clone());
                match tool {
                    "kg_query" => {
                        println!("  {tool}: {} triple(s)", kg_query::result_count(&out))
                    }
                    _ => println!("  {tool}: final={}", out.is_final()),
                }
            }
        }

        Commands::Query {
            triples,
            subject,
            predicate,
            object,
        } => {
            let store = open_store(triples)?;
            let pattern = TriplePattern {
                subject,
                predicate,
                object,
            };
            let hits = store.query(&pattern);
            println!("Matches for {pattern} ({}):", hits.len());
            for t in &hits {
                println!("  {t}");
            }
        }

        Commands::Program { triples, program } => {
            let store = open_store(triples)?;
            let out = store.execute_program(&program);
            let json = serde_json::to_string_pretty(&out).into_diagnostic()?;
            println!("{json}");
        }
    }

    Ok(())
}

/// The three toy triples used by the demo and as the default store.
fn toy_triples() -> Vec<Triple> {
    vec![
        Triple::new("Alice", "knows", "Bob"),
        Triple::new("Bob", "works_at", "CompanyX"),
        Triple::new("CompanyX", "located_in", "CityZ"),
    ]
}

/// Build a store from a triples file, or from the toy triples.
fn open_store(path: Option<PathBuf>) -> Result<TripleStore> {
    let triples = match path {
        Some(path) => read_triples(&path).map_err(KgAgentError::from)?,
        None => toy_triples(),
    };
    let store = TripleStore::new();
    store.load(triples);
    Ok(store)
}
