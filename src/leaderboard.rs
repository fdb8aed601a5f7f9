//! Leaderboard score submission
//!
//! The leaderboard service stores one row per submission and serves the top
//! scores as a web page. The game only ever posts a finished score; viewing
//! happens in a browser.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Request body accepted by the score ingestion endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub username: String,
    pub score: u64,
}

/// Response body returned by the endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionReply {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Somewhere finished scores go
pub trait ScoreSink {
    fn submit(&mut self, username: &str, score: u64) -> Result<()>;
}

/// Posts scores to the leaderboard service over HTTP
pub struct HttpLeaderboard {
    agent: ureq::Agent,
    endpoint: String,
}

impl HttpLeaderboard {
    pub fn new(endpoint: impl Into<String>) -> Self {
        // Non-2xx statuses come back as responses so the message can be logged
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ScoreSink for HttpLeaderboard {
    fn submit(&mut self, username: &str, score: u64) -> Result<()> {
        let payload = ScoreSubmission {
            username: username.to_string(),
            score,
        };
        log::info!("Submitting score: {} - {}", username, score);

        let mut response = self.agent.post(&self.endpoint).send_json(&payload)?;
        let status = response.status().as_u16();
        if status == 201 {
            log::info!("Score submitted");
            return Ok(());
        }

        let body = response.body_mut().read_to_string().unwrap_or_default();
        let message = serde_json::from_str::<SubmissionReply>(&body)
            .map(|reply| reply.message)
            .unwrap_or(body);
        Err(Error::Rejected { status, message })
    }
}

/// Keeps submissions in memory (offline play, tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryLeaderboard {
    pub submissions: Vec<ScoreSubmission>,
}

impl ScoreSink for MemoryLeaderboard {
    fn submit(&mut self, username: &str, score: u64) -> Result<()> {
        self.submissions.push(ScoreSubmission {
            username: username.to_string(),
            score,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Answer one request with a canned response; yields the request line and body
    fn serve_once(status: &'static str, reply: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line.trim().is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut body = vec![0; content_length];
            reader.read_exact(&mut body).unwrap();

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reply.len(),
                reply
            );
            stream.write_all(response.as_bytes()).unwrap();
            format!("{}{}", request_line, String::from_utf8(body).unwrap())
        });
        (format!("http://{}/api/add_score", addr), handle)
    }

    #[test]
    fn test_created_is_success() {
        let (endpoint, server) = serve_once(
            "201 Created",
            r#"{"status": "success", "message": "Score added successfully"}"#,
        );
        let mut board = HttpLeaderboard::new(endpoint);
        board.submit("NEON", 321).unwrap();

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /api/add_score"));
        let body = &request[request.find('{').unwrap()..];
        let sent: ScoreSubmission = serde_json::from_str(body).unwrap();
        assert_eq!(
            sent,
            ScoreSubmission {
                username: "NEON".to_string(),
                score: 321,
            }
        );
    }

    #[test]
    fn test_client_error_is_rejected_with_message() {
        let (endpoint, server) = serve_once(
            "400 Bad Request",
            r#"{"status": "error", "message": "Score must be an integer"}"#,
        );
        let mut board = HttpLeaderboard::new(endpoint);
        let result = board.submit("NEON", 321);
        server.join().unwrap();

        match result {
            Err(Error::Rejected { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Score must be an integer");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_ok_is_not_created() {
        let (endpoint, server) = serve_once("200 OK", "stored");
        let mut board = HttpLeaderboard::new(endpoint);
        let result = board.submit("NEON", 1);
        server.join().unwrap();
        assert!(matches!(
            result,
            Err(Error::Rejected { status: 200, ref message }) if message == "stored"
        ));
    }

    #[test]
    fn test_payload_shape() {
        let payload = ScoreSubmission {
            username: "NEON".to_string(),
            score: 321,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"username": "NEON", "score": 321}));
    }

    #[test]
    fn test_reply_tolerates_missing_fields() {
        let reply: SubmissionReply =
            serde_json::from_str(r#"{"message": "Score must be an integer"}"#).unwrap();
        assert_eq!(reply.message, "Score must be an integer");
        assert!(reply.status.is_empty());
    }

    #[test]
    fn test_unreachable_server_is_an_error() {
        // Port 9 (discard) on localhost is not expected to speak HTTP
        let mut board = HttpLeaderboard::new("http://127.0.0.1:9/api/add_score");
        assert!(board.submit("ABCD", 10).is_err());
    }

    #[test]
    fn test_memory_sink_appends() {
        let mut board = MemoryLeaderboard::default();
        board.submit("ABCD", 10).unwrap();
        board.submit("ABCD", 10).unwrap();
        assert_eq!(board.submissions.len(), 2);
    }
}
