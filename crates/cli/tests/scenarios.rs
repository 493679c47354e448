//! End-to-end scenarios for the switch command assistant.
//!
//! These tests drive the full `ask` pipeline (classification, prompt
//! composition, generation, validation, session and ledger updates) against
//! a scripted provider and an on-disk history file.

use std::sync::{Arc, Mutex};

use switchbot_core::brand::Brand;
use switchbot_core::error::{AskError, ProviderError};
use switchbot_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use switchbot_engine::{Assistant, validate};
use switchbot_history::{HistoryLedger, JsonFileStore};

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted results in sequence and keeps
/// every request it saw.
struct ScriptedProvider {
    results: Mutex<Vec<Result<String, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(results: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            results: Mutex::new(results),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn text(answer: &str) -> Self {
        Self::new(vec![Ok(answer.to_string())])
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, n: usize) -> ProviderRequest {
        self.requests.lock().unwrap()[n].clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len() - 1
        };
        let results = self.results.lock().unwrap();
        let result = results
            .get(call)
            .or_else(|| results.last())
            .cloned()
            .unwrap_or_else(|| Err(ProviderError::Network("script empty".into())));

        result.map(|content| ProviderResponse {
            content,
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock-model".into(),
        })
    }
}

const CISCO_ANSWER: &str = "1. enable\n2. configure terminal\n3. vlan 10\n4. name VLAN_10\n5. exit\n6. end\n7. write memory";

fn assistant(provider: Arc<ScriptedProvider>, dir: &tempfile::TempDir) -> Assistant {
    let store = JsonFileStore::new(dir.path().join("chat_history.json"));
    Assistant::new(provider, Arc::new(HistoryLedger::new(Arc::new(store))))
}

// ── Scenarios ────────────────────────────────────────────────────────────

#[tokio::test]
async fn cisco_request_on_empty_session() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(ScriptedProvider::text(CISCO_ANSWER));
    let assistant = assistant(provider.clone(), &dir);

    let out = assistant.ask("créer vlan cisco", "fresh").await.unwrap();

    assert_eq!(out.brand, Brand::Cisco);
    assert_eq!(out.answer, CISCO_ANSWER);
    assert!(out.warnings.is_empty());

    let request = provider.request(0);
    assert_eq!(request.messages.len(), 2);
    assert!(request.messages[0].content.contains("CISCO IOS - MANDATORY STRUCTURE"));
    assert!(request.messages[1].content.starts_with("créer vlan cisco"));
}

#[tokio::test]
async fn cisco_warnings_follow_structure() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(ScriptedProvider::text(
        "1. configure terminal\n2. vlan 10\n3. end",
    ));
    let assistant = assistant(provider, &dir);

    let out = assistant.ask("créer vlan cisco", "s").await.unwrap();
    assert_eq!(out.warnings.len(), 2);
    assert_eq!(validate(Brand::Cisco, &out.answer), out.warnings);
}

#[tokio::test]
async fn empty_query_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(ScriptedProvider::text(CISCO_ANSWER));
    let assistant = assistant(provider.clone(), &dir);

    let err = assistant.ask("   ", "s").await.unwrap_err();
    assert!(matches!(err, AskError::EmptyQuery));

    assert_eq!(provider.calls(), 0);
    assert!(assistant.session_turns("s").await.is_empty());
    assert!(assistant.list_history().await.is_empty());
    assert!(!dir.path().join("chat_history.json").exists());
}

#[tokio::test]
async fn credential_failure_still_records() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(ScriptedProvider::new(vec![Err(
        ProviderError::AuthenticationFailed("Incorrect API key provided".into()),
    )]));
    let assistant = assistant(provider, &dir);

    let out = assistant.ask("vlan 10 sur junos", "s").await.unwrap();
    assert_eq!(out.brand, Brand::Juniper);
    assert!(out.answer.contains("Invalid API key"));

    let history = assistant.list_history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, out.record_id);
    assert_eq!(history[0].answer, out.answer);
}

#[tokio::test]
async fn conversation_keeps_brand_and_context() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok("1. configure terminal\n2. vlan 10\n3. write memory".into()),
        Ok("1. configure terminal\n2. interface 2\n3. vlan access 10".into()),
    ]));
    let assistant = assistant(provider.clone(), &dir);

    assistant.ask("create vlan 10 on aruba", "lab").await.unwrap();
    let follow = assistant.ask("now put port 2 in it", "lab").await.unwrap();

    assert_eq!(follow.brand, Brand::Hpe);
    let second = provider.request(1);
    // system + previous user/assistant pair + new request
    assert_eq!(second.messages.len(), 4);
    assert!(second.messages[0].content.contains("HPE/ARUBA"));
    assert_eq!(second.messages[1].content, "create vlan 10 on aruba");
}

#[tokio::test]
async fn history_survives_restart_with_increasing_ids() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(ScriptedProvider::text(CISCO_ANSWER));

    let first = assistant(provider.clone(), &dir)
        .ask("vlan cisco", "s")
        .await
        .unwrap();

    let restarted = assistant(provider, &dir);
    let second = restarted.ask("trunk cisco", "s").await.unwrap();
    assert!(second.record_id > first.record_id);

    let history = restarted.list_history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].query, "trunk cisco");
    assert_eq!(history[1].query, "vlan cisco");

    // Sessions are process-local; the restarted assistant starts empty
    // apart from the exchange it just handled.
    assert_eq!(restarted.session_turns("s").await.len(), 2);
}

#[tokio::test]
async fn delete_then_export_reports_missing() {
    let dir = tempfile::tempdir().unwrap();
    let assistant = assistant(Arc::new(ScriptedProvider::text(CISCO_ANSWER)), &dir);
    let out = assistant.ask("vlan cisco", "s").await.unwrap();

    let pdf = switchbot_export::export_pdf(assistant.ledger(), &out.record_id)
        .await
        .unwrap();
    assert!(pdf.starts_with(b"%PDF-"));

    assert!(assistant.delete_history(&out.record_id).await.unwrap());
    assert!(matches!(
        switchbot_export::export_pdf(assistant.ledger(), &out.record_id).await,
        Err(switchbot_export::ExportError::RecordNotFound(_))
    ));
}

#[tokio::test]
async fn corrupt_history_file_is_treated_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("chat_history.json"), "[{ broken").unwrap();
    let assistant = assistant(Arc::new(ScriptedProvider::text(CISCO_ANSWER)), &dir);

    assert!(assistant.list_history().await.is_empty());
    let out = assistant.ask("vlan cisco", "s").await.unwrap();
    assert_eq!(assistant.list_history().await[0].id, out.record_id);
}

#[tokio::test]
async fn concurrent_sessions_all_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let assistant = Arc::new(assistant(
        Arc::new(ScriptedProvider::text(CISCO_ANSWER)),
        &dir,
    ));

    let mut handles = Vec::new();
    for i in 0..10 {
        let assistant = assistant.clone();
        handles.push(tokio::spawn(async move {
            assistant
                .ask(&format!("vlan {i} cisco"), &format!("session-{i}"))
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let history = assistant.list_history().await;
    assert_eq!(history.len(), 10);
    for i in 0..10 {
        assert_eq!(assistant.session_turns(&format!("session-{i}")).await.len(), 2);
    }
}
