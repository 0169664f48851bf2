//! Key builders for all VoteLive store entries.
//!
//! Centralising key construction prevents typos and makes it easy to find
//! every key the application uses. The layout is load-bearing: presence
//! queries scan by pattern and recover fields by colon position, so the
//! exact delimiter scheme here is part of the on-store format. The
//! positional accessors below are the only sanctioned way to read fields
//! back out of a scanned key.

// ── Session keys ───────────────────────────────────────────

/// Session record for one live connection.
pub fn ws_session(connection_id: &str) -> String {
    format!("WS_CON:{connection_id}")
}

// ── Presence keys ──────────────────────────────────────────

/// Presence marker: `connection_id` views election `elec_id`.
pub fn ws_election_viewer_connection(elec_id: &str, connection_id: &str) -> String {
    format!("WS_ELEC:{elec_id}:VIEWER:{connection_id}")
}

/// Pattern matching every viewer presence marker of an election.
pub fn ws_election_viewer_wildcard(elec_id: &str) -> String {
    format!("WS_ELEC:{elec_id}:VIEWER:*")
}

/// Presence marker: voter `voter_id` holds `connection_id` in election
/// `elec_id`. One voter may hold several connections, hence both ids.
pub fn ws_election_voter_connection(elec_id: &str, voter_id: &str, connection_id: &str) -> String {
    format!("WS_ELEC:{elec_id}:VOTER:{voter_id}:{connection_id}")
}

/// Pattern matching every voter presence marker of an election.
pub fn ws_election_voter_wildcard(elec_id: &str) -> String {
    format!("WS_ELEC:{elec_id}:VOTER:*")
}

/// Connection id field of a scanned voter presence key.
pub fn voter_key_connection(key: &str) -> Option<&str> {
    key.split(':').nth(4)
}

/// Voter id field of a scanned voter presence key.
pub fn voter_key_voter_id(key: &str) -> Option<&str> {
    key.split(':').nth(3)
}

/// Connection id field of a scanned viewer presence key.
pub fn viewer_key_connection(key: &str) -> Option<&str> {
    key.split(':').nth(3)
}

// ── Vote keys ──────────────────────────────────────────────

/// Set of voter ids that have cast a ballot in a vote.
pub fn voted_voter_list(vote_id: &str) -> String {
    format!("VOTE:{vote_id}:VOTED_VOTERS")
}

/// Cached state snapshot of a vote.
pub fn vote_state(vote_id: &str) -> String {
    format!("VOTE:{vote_id}:STATE")
}

// ── Election keys ──────────────────────────────────────────

/// Cached title of an election.
pub fn election_title(elec_id: &str) -> String {
    format!("ELEC:{elec_id}:TITLE")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_key_format() {
        assert_eq!(ws_session("c-1"), "WS_CON:c-1");
    }

    #[test]
    fn presence_key_formats() {
        assert_eq!(
            ws_election_viewer_connection("e1", "c1"),
            "WS_ELEC:e1:VIEWER:c1"
        );
        assert_eq!(
            ws_election_voter_connection("e1", "v1", "c1"),
            "WS_ELEC:e1:VOTER:v1:c1"
        );
        assert_eq!(ws_election_voter_wildcard("e1"), "WS_ELEC:e1:VOTER:*");
        assert_eq!(ws_election_viewer_wildcard("e1"), "WS_ELEC:e1:VIEWER:*");
    }

    #[test]
    fn positional_extraction_recovers_fields() {
        let voter_key = ws_election_voter_connection("e1", "v1", "c1");
        assert_eq!(voter_key_connection(&voter_key), Some("c1"));
        assert_eq!(voter_key_voter_id(&voter_key), Some("v1"));

        let viewer_key = ws_election_viewer_connection("e1", "c2");
        assert_eq!(viewer_key_connection(&viewer_key), Some("c2"));
    }

    #[test]
    fn vote_and_election_key_formats() {
        assert_eq!(voted_voter_list("v1"), "VOTE:v1:VOTED_VOTERS");
        assert_eq!(vote_state("v1"), "VOTE:v1:STATE");
        assert_eq!(election_title("e1"), "ELEC:e1:TITLE");
    }
}
