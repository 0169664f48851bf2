//! End-to-end tests of the handshake state machine, presence lifecycle,
//! and fanout over an in-memory store and a recording gateway.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use votelive_cache::memory::MemoryKvStore;
use votelive_core::config::AuthConfig;
use votelive_core::result::AppResult;
use votelive_core::traits::{
    ElectionDirectory, KvStore, ManagerTokenDecoder, ViewDirectory, VoterTokenDecoder,
};
use votelive_core::types::{
    AccessTokenClaims, ElectionWithVotes, VoteState, VoteStatus, VoterTokenClaims,
};
use votelive_realtime::gateway::TransportGateway;
use votelive_realtime::presence::PresenceIndex;
use votelive_realtime::protocol::ProtocolEngine;
use votelive_realtime::session::{HandshakeStatus, SessionStore};

/// Gateway that records every frame instead of delivering it.
#[derive(Debug, Default)]
struct RecordingGateway {
    sent: Mutex<Vec<(String, String)>>,
    closed: Mutex<Vec<String>>,
}

impl RecordingGateway {
    fn sent_to(&self, connection_id: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == connection_id)
            .map(|(_, frame)| frame.clone())
            .collect()
    }

    fn closed_ids(&self) -> Vec<String> {
        self.closed.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransportGateway for RecordingGateway {
    async fn send(&self, connection_id: &str, text: &str) -> AppResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((connection_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn close(&self, connection_id: &str) -> AppResult<()> {
        self.closed.lock().unwrap().push(connection_id.to_string());
        Ok(())
    }
}

#[derive(Debug)]
struct StaticManagerTokens;

#[async_trait]
impl ManagerTokenDecoder for StaticManagerTokens {
    async fn decode_access_token(&self, token: &str) -> AppResult<Option<AccessTokenClaims>> {
        Ok((token == "good-access").then(|| AccessTokenClaims {
            sub: "mgr-1".to_string(),
            org_id: None,
            name: None,
            exp: i64::MAX,
        }))
    }
}

/// Accepts tokens of the form `vote:<elec>:<voter>`.
#[derive(Debug)]
struct StaticVoterTokens;

#[async_trait]
impl VoterTokenDecoder for StaticVoterTokens {
    async fn decode_vote_token(&self, token: &str) -> AppResult<Option<VoterTokenClaims>> {
        let mut parts = token.split(':');
        if parts.next() != Some("vote") {
            return Ok(None);
        }
        match (parts.next(), parts.next()) {
            (Some(elec_id), Some(voter_id)) => Ok(Some(VoterTokenClaims {
                elec_id: elec_id.to_string(),
                voter_id: voter_id.to_string(),
                exp: i64::MAX,
            })),
            _ => Ok(None),
        }
    }
}

#[derive(Debug)]
struct StaticElections;

#[async_trait]
impl ElectionDirectory for StaticElections {
    async fn election_info(&self, elec_id: &str) -> AppResult<ElectionWithVotes> {
        Ok(ElectionWithVotes {
            elec_id: elec_id.to_string(),
            title: "Board election".to_string(),
            created_at: 1_700_000_000,
            votes: vec![],
        })
    }

    async fn vote_status(&self, vote_id: &str) -> AppResult<VoteStatus> {
        Ok(VoteStatus {
            vote_id: vote_id.to_string(),
            state: VoteState::Voting,
            voter_count: 10,
            voted_count: 4,
            result: None,
        })
    }
}

#[derive(Debug)]
struct StaticViews;

#[async_trait]
impl ViewDirectory for StaticViews {
    async fn election_for_view(&self, view_id: &str) -> AppResult<Option<String>> {
        Ok((view_id == "view-1").then(|| "e1".to_string()))
    }
}

struct Fixture {
    engine: ProtocolEngine,
    sessions: Arc<SessionStore>,
    presence: PresenceIndex,
    gateway: Arc<RecordingGateway>,
    kv: Arc<dyn KvStore>,
}

fn fixture_with_ttl(ttl: Duration) -> Fixture {
    let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
    let presence = PresenceIndex::new(kv.clone(), ttl);
    let sessions = Arc::new(SessionStore::new(kv.clone(), presence.clone(), ttl));
    let gateway = Arc::new(RecordingGateway::default());

    let engine = ProtocolEngine::new(
        sessions.clone(),
        presence.clone(),
        gateway.clone(),
        Arc::new(StaticManagerTokens),
        Arc::new(StaticVoterTokens),
        Arc::new(StaticElections),
        Arc::new(StaticViews),
        AuthConfig::default(),
    );

    Fixture {
        engine,
        sessions,
        presence,
        gateway,
        kv,
    }
}

fn fixture() -> Fixture {
    fixture_with_ttl(Duration::from_secs(60))
}

fn headers_with_cookie(cookie: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert("cookie".to_string(), cookie.to_string());
    headers
}

async fn connect(fx: &Fixture, connection_id: &str, cookie: &str) {
    fx.engine
        .on_connect(connection_id, &headers_with_cookie(cookie))
        .await
        .unwrap();
}

async fn voter_handshake(fx: &Fixture, connection_id: &str) {
    fx.engine
        .on_message(
            connection_id,
            r#"{"event":"handshake.request","data":{"mode":"voter"}}"#,
        )
        .await;
}

fn last_event(frames: &[String]) -> serde_json::Value {
    serde_json::from_str(frames.last().expect("no outbound frame")).unwrap()
}

#[tokio::test]
async fn connect_without_cookies_is_rejected_with_401() {
    let fx = fixture();
    let rejection = fx
        .engine
        .on_connect("c1", &HashMap::new())
        .await
        .unwrap_err();
    assert_eq!(rejection.status_code, 401);
    assert!(fx.sessions.get("c1").await.unwrap_err().is_no_session());
}

#[tokio::test]
async fn connect_writes_an_idle_session() {
    let fx = fixture();
    connect(&fx, "c1", "vote_token=vote:e1:v1").await;

    let session = fx.sessions.get("c1").await.unwrap();
    assert_eq!(session.handshake_status, HandshakeStatus::Idle);
    assert!(session.elec_id.is_none());
    assert!(session.access_token.is_none());
    assert!(session.voter_token.is_none());
}

#[tokio::test]
async fn voter_handshake_registers_presence() {
    let fx = fixture();
    connect(&fx, "c1", "vote_token=vote:e1:v1").await;
    voter_handshake(&fx, "c1").await;

    let response = last_event(&fx.gateway.sent_to("c1"));
    assert_eq!(response["event"], "handshake.response");
    assert_eq!(response["data"]["result"], true);

    let session = fx.sessions.get("c1").await.unwrap();
    assert_eq!(session.handshake_status, HandshakeStatus::Success);
    assert_eq!(session.elec_id.as_deref(), Some("e1"));

    assert_eq!(
        fx.presence.list_voter_connections("e1").await.unwrap(),
        vec!["c1".to_string()]
    );

    fx.sessions.delete("c1").await.unwrap();
    assert!(
        fx.presence
            .list_voter_connections("e1")
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn manager_handshake_stores_claims_without_election_scope() {
    let fx = fixture();
    connect(&fx, "c1", "access_token=good-access").await;
    fx.engine
        .on_message(
            "c1",
            r#"{"event":"handshake.request","data":{"mode":"manager"}}"#,
        )
        .await;

    let session = fx.sessions.get("c1").await.unwrap();
    assert_eq!(session.handshake_status, HandshakeStatus::Success);
    assert!(session.access_token.is_some());
    assert!(session.voter_token.is_none());
    assert!(session.elec_id.is_none());
}

#[tokio::test]
async fn election_update_request_without_scope_is_dropped_quietly() {
    let fx = fixture();
    connect(&fx, "c1", "access_token=good-access").await;
    fx.engine
        .on_message(
            "c1",
            r#"{"event":"handshake.request","data":{"mode":"manager"}}"#,
        )
        .await;
    let frames_after_handshake = fx.gateway.sent_to("c1").len();

    // Manager sessions have no election scope to answer from.
    fx.engine
        .on_message("c1", r#"{"event":"request.election.update"}"#)
        .await;

    assert_eq!(fx.gateway.sent_to("c1").len(), frames_after_handshake);
    assert!(fx.gateway.closed_ids().is_empty());
    let session = fx.sessions.get("c1").await.unwrap();
    assert_eq!(session.handshake_status, HandshakeStatus::Success);
}

#[tokio::test]
async fn unrecognized_handshake_mode_is_refused_not_dropped() {
    let fx = fixture();
    connect(&fx, "c1", "vote_token=vote:e1:v1").await;

    for raw in [
        r#"{"event":"handshake.request","data":{"mode":"admin"}}"#,
        r#"{"event":"handshake.request"}"#,
    ] {
        fx.engine.on_message("c1", raw).await;
        let response = last_event(&fx.gateway.sent_to("c1"));
        assert_eq!(response["event"], "handshake.response");
        assert_eq!(response["data"]["result"], false);
    }

    assert!(fx.gateway.closed_ids().is_empty());
    let session = fx.sessions.get("c1").await.unwrap();
    assert_eq!(session.handshake_status, HandshakeStatus::Idle);

    // The same connection may still complete a proper handshake.
    voter_handshake(&fx, "c1").await;
    let response = last_event(&fx.gateway.sent_to("c1"));
    assert_eq!(response["data"]["result"], true);
}

#[tokio::test]
async fn viewer_handshake_resolves_election_from_view() {
    let fx = fixture();
    connect(&fx, "c1", "access_token=whatever").await;
    fx.engine
        .on_message(
            "c1",
            r#"{"event":"handshake.request","data":{"mode":"viewer","viewId":"view-1"}}"#,
        )
        .await;

    let session = fx.sessions.get("c1").await.unwrap();
    assert_eq!(session.elec_id.as_deref(), Some("e1"));
    assert_eq!(session.view_id.as_deref(), Some("view-1"));
    assert_eq!(
        fx.presence.list_viewer_connections("e1").await.unwrap(),
        vec!["c1".to_string()]
    );
}

#[tokio::test]
async fn same_voter_on_two_connections_counts_once() {
    let fx = fixture();
    for conn in ["c1", "c2"] {
        connect(&fx, conn, "vote_token=vote:e1:v1").await;
        voter_handshake(&fx, conn).await;
    }

    let mut connections = fx.presence.list_voter_connections("e1").await.unwrap();
    connections.sort();
    assert_eq!(connections, vec!["c1", "c2"]);
    assert_eq!(fx.presence.count_distinct_voters("e1").await.unwrap(), 1);
}

#[tokio::test]
async fn missed_heartbeats_expire_session_and_presence() {
    let fx = fixture_with_ttl(Duration::from_millis(20));
    connect(&fx, "c1", "vote_token=vote:e1:v1").await;
    voter_handshake(&fx, "c1").await;

    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(fx.sessions.get("c1").await.unwrap_err().is_no_session());
    assert!(
        fx.presence
            .list_voter_connections("e1")
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn ping_keeps_session_and_presence_alive() {
    let fx = fixture_with_ttl(Duration::from_millis(60));
    connect(&fx, "c1", "vote_token=vote:e1:v1").await;
    voter_handshake(&fx, "c1").await;

    for _ in 0..4 {
        tokio::time::sleep(Duration::from_millis(30)).await;
        fx.engine.on_message("c1", r#"{"event":"ping"}"#).await;
    }

    assert!(fx.sessions.get("c1").await.is_ok());
    assert_eq!(
        fx.presence.list_voter_connections("e1").await.unwrap(),
        vec!["c1".to_string()]
    );
}

#[tokio::test]
async fn failed_voter_handshake_leaves_session_untouched_and_open() {
    let fx = fixture();
    connect(&fx, "c1", "vote_token=garbage").await;
    voter_handshake(&fx, "c1").await;

    let response = last_event(&fx.gateway.sent_to("c1"));
    assert_eq!(response["data"]["result"], false);

    let session = fx.sessions.get("c1").await.unwrap();
    assert_eq!(session.handshake_status, HandshakeStatus::Idle);
    assert!(session.elec_id.is_none());
    assert!(session.voter_token.is_none());
    assert!(
        fx.presence
            .list_voter_connections("e1")
            .await
            .unwrap()
            .is_empty()
    );
    assert!(fx.gateway.closed_ids().is_empty());
}

#[tokio::test]
async fn unknown_event_is_ignored() {
    let fx = fixture();
    connect(&fx, "c1", "vote_token=vote:e1:v1").await;
    voter_handshake(&fx, "c1").await;
    let frames_before = fx.gateway.sent_to("c1").len();

    fx.engine
        .on_message("c1", r#"{"event":"foo.bar","data":{"x":1}}"#)
        .await;

    assert_eq!(fx.gateway.sent_to("c1").len(), frames_before);
    assert!(fx.sessions.get("c1").await.is_ok());
    assert!(fx.gateway.closed_ids().is_empty());
}

#[tokio::test]
async fn malformed_frame_tears_the_connection_down() {
    let fx = fixture();
    connect(&fx, "c1", "vote_token=vote:e1:v1").await;
    voter_handshake(&fx, "c1").await;

    fx.engine.on_message("c1", "{not json").await;

    assert!(fx.sessions.get("c1").await.unwrap_err().is_no_session());
    assert!(
        fx.presence
            .list_voter_connections("e1")
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(fx.gateway.closed_ids(), vec!["c1".to_string()]);
}

#[tokio::test]
async fn election_update_request_replies_point_to_point() {
    let fx = fixture();
    for conn in ["c1", "c2"] {
        connect(&fx, conn, "vote_token=vote:e1:v1").await;
        voter_handshake(&fx, conn).await;
    }

    fx.engine
        .on_message("c1", r#"{"event":"request.election.update"}"#)
        .await;

    let response = last_event(&fx.gateway.sent_to("c1"));
    assert_eq!(response["event"], "election.update");
    assert_eq!(response["data"]["elecId"], "e1");
    // c2 only ever saw its handshake response
    assert_eq!(fx.gateway.sent_to("c2").len(), 1);
}

#[tokio::test]
async fn votes_status_request_returns_one_snapshot_per_vote() {
    let fx = fixture();
    connect(&fx, "c1", "vote_token=vote:e1:v1").await;
    voter_handshake(&fx, "c1").await;

    fx.engine
        .on_message(
            "c1",
            r#"{"event":"request.votes.update.status","data":{"voteIds":["vt1","vt2"]}}"#,
        )
        .await;

    let response = last_event(&fx.gateway.sent_to("c1"));
    assert_eq!(response["event"], "votes.update.status");
    assert_eq!(response["data"].as_array().unwrap().len(), 2);
    assert_eq!(response["data"][0]["voteId"], "vt1");
    assert_eq!(response["data"][0]["state"], 1);
}

#[tokio::test]
async fn voter_count_request_reports_distinct_voters() {
    let fx = fixture();
    connect(&fx, "c1", "vote_token=vote:e1:v1").await;
    voter_handshake(&fx, "c1").await;
    connect(&fx, "c2", "vote_token=vote:e1:v2").await;
    voter_handshake(&fx, "c2").await;

    fx.engine
        .on_message(
            "c1",
            r#"{"event":"request.election.now.voter.count","data":{"elecId":"e1"}}"#,
        )
        .await;

    let response = last_event(&fx.gateway.sent_to("c1"));
    assert_eq!(response["event"], "election.now.voter.count");
    assert_eq!(response["data"]["count"], 2);
}

#[tokio::test]
async fn disconnect_cleanup_is_idempotent() {
    let fx = fixture();
    connect(&fx, "c1", "vote_token=vote:e1:v1").await;
    voter_handshake(&fx, "c1").await;

    fx.engine.on_disconnect("c1").await;
    fx.engine.on_disconnect("c1").await;

    assert!(fx.sessions.get("c1").await.unwrap_err().is_no_session());
    assert!(fx.kv.keys_matching("WS_ELEC:*").await.unwrap().is_empty());
}
