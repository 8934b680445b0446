//! End-to-end tests for the agent loop.
//!
//! These tests wire a triple store, a tool registry and an agent together
//! and check how runs terminate and what ends up in memory.

use std::sync::Arc;

use serde_json::json;

use kg_agent::agent::tools::{FinalAnswerTool, KgQueryTool};
use kg_agent::agent::{
    Agent, AgentConfig, AgentState, StepKind, Termination, ToolRegistry,
};
use kg_agent::graph::{Triple, TriplePattern, TripleStore};
use kg_agent::message::{AgentMessage, VecSink};

fn toy_store() -> Arc<TripleStore> {
    let store = TripleStore::new();
    store.load([
        ("Alice", "knows", "Bob"),
        ("Bob", "works_at", "CompanyX"),
        ("CompanyX", "located_in", "CityZ"),
    ]);
    Arc::new(store)
}

fn agent_with(tools: ToolRegistry, config: AgentConfig) -> (Agent, Arc<VecSink>) {
    let sink = Arc::new(VecSink::new());
    let agent = Agent::new(tools, config).with_sink(sink.clone());
    (agent, sink)
}

#[test]
fn final_answer_only_terminates_at_first_step() {
    let _store = toy_store();
    let mut tools = ToolRegistry::new();
    tools.register("final_answer", Box::new(FinalAnswerTool::new()));
    let (mut agent, _) = agent_with(tools, AgentConfig::default());

    let result = agent
        .run("Where does Alice's colleague work?")
        .unwrap()
        .expect("final answer");

    assert_eq!(
        result.as_value(),
        &json!({"answer": "SYNTHESIZED_ANSWER based on 1 steps", "final": true})
    );
    assert_eq!(agent.state(), AgentState::TerminatedFinal);

    let steps = agent.memory().steps();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].kind, StepKind::Query);
    assert_eq!(steps[1].kind, StepKind::ToolCall);
    assert_eq!(steps[1].content["tool"], "final_answer");
    assert_eq!(steps[1].content["out"]["final"], true);
}

#[test]
fn query_tool_only_exhausts_step_bound() {
    let store = toy_store();
    let mut tools = ToolRegistry::new();
    tools.register("kg_query", Box::new(KgQueryTool::new(Arc::clone(&store))));
    let config = AgentConfig {
        max_steps: 3,
        ..Default::default()
    };
    let (mut agent, sink) = agent_with(tools, config);

    let report = agent.run_detailed("anything").unwrap();
    assert!(report.result.is_none());
    assert_eq!(report.termination, Termination::StepBound { max_steps: 3 });
    assert_eq!(report.steps, 3);
    assert_eq!(agent.state(), AgentState::TerminatedStepBound);

    let memory = agent.memory();
    assert_eq!(memory.len(), 4);
    assert_eq!(memory.by_kind(&StepKind::Query).len(), 1);
    let calls = memory.by_kind(&StepKind::ToolCall);
    assert_eq!(calls.len(), 3);
    for call in calls {
        assert_eq!(call.content["tool"], "kg_query");
        assert_eq!(call.content["out"]["final"], false);
        assert_eq!(call.content["out"]["results"].as_array().unwrap().len(), 3);
    }

    let tool_calls: Vec<usize> = sink
        .messages()
        .iter()
        .filter_map(|m| match m {
            AgentMessage::ToolCall { step, .. } => Some(*step),
            _ => None,
        })
        .collect();
    assert_eq!(tool_calls, vec![0, 1, 2]);
}

#[test]
fn empty_registry_stops_on_missing_tool() {
    let (mut agent, sink) = agent_with(ToolRegistry::new(), AgentConfig::default());

    let report = agent.run_detailed("anything").unwrap();
    assert!(report.result.is_none());
    assert_eq!(
        report.termination,
        Termination::ToolMissing {
            name: "kg_query".into()
        }
    );
    assert_eq!(report.steps, 0);
    assert_eq!(agent.state(), AgentState::TerminatedToolMissing);
    assert_eq!(agent.memory().len(), 1);
    assert_eq!(agent.memory().steps()[0].kind, StepKind::Query);
    assert!(
        sink.messages()
            .iter()
            .any(|m| matches!(m, AgentMessage::Warning { .. }))
    );
}

#[test]
fn configured_fallback_is_used_on_empty_registry() {
    let config = AgentConfig {
        fallback_tool: "lookup".into(),
        ..Default::default()
    };
    let (mut agent, _) = agent_with(ToolRegistry::new(), config);

    let report = agent.run_detailed("anything").unwrap();
    assert_eq!(
        report.termination,
        Termination::ToolMissing {
            name: "lookup".into()
        }
    );
}

#[test]
fn first_registered_tool_drives_the_loop() {
    // Registration order decides: the query tool never finalizes.
    let store = toy_store();
    let mut tools = ToolRegistry::new();
    tools.register("kg_query", Box::new(KgQueryTool::new(Arc::clone(&store))));
    tools.register("final_answer", Box::new(FinalAnswerTool::new()));
    let (mut agent, _) = agent_with(tools, AgentConfig::default());

    assert!(agent.run("anything").unwrap().is_none());
    assert_eq!(agent.memory().len(), 11);
}

#[test]
fn replacing_first_tool_changes_outcome() {
    let store = toy_store();
    let mut tools = ToolRegistry::new();
    tools.register("step", Box::new(KgQueryTool::new(Arc::clone(&store))));
    tools.register("step", Box::new(FinalAnswerTool::new()));
    let (mut agent, _) = agent_with(tools, AgentConfig::default());

    let out = agent.run("anything").unwrap().expect("final answer");
    assert!(out.is_final());
}

#[test]
fn tools_registered_after_construction_are_visible() {
    let (mut agent, _) = agent_with(ToolRegistry::new(), AgentConfig::default());
    agent
        .tools_mut()
        .register_tool(Box::new(FinalAnswerTool::new()));
    assert_eq!(agent.tools().names(), vec!["final_answer"]);
    assert!(agent.run("q").unwrap().is_some());
}

#[test]
fn store_grows_between_runs() {
    let store = toy_store();
    let mut tools = ToolRegistry::new();
    tools.register("kg_query", Box::new(KgQueryTool::new(Arc::clone(&store))));
    let config = AgentConfig {
        max_steps: 1,
        ..Default::default()
    };
    let (mut agent, _) = agent_with(tools, config);

    agent.run("before").unwrap();
    store.load(vec![Triple::new("CityZ", "in_country", "CountryQ")]);
    agent.run("after").unwrap();

    let calls = agent.memory().by_kind(&StepKind::ToolCall);
    assert_eq!(calls[0].content["out"]["results"].as_array().unwrap().len(), 3);
    assert_eq!(calls[1].content["out"]["results"].as_array().unwrap().len(), 4);
    assert_eq!(
        store.query(&TriplePattern::any().with_subject("CityZ")).len(),
        1
    );
}
