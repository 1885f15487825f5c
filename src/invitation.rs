use serde::Serialize;
use serde_json::Value;

pub const UNLIMITED: &str = "unlimited";

/// Body of a single `POST /api/invitations` call.
///
/// `None` fields are left out of the payload entirely, the API treats a
/// missing key differently from an explicit value.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct InvitationRequest {
    pub server_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_days: Option<u32>,
    pub duration: String,
    pub unlimited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_ids: Option<Vec<i64>>,
    pub allow_downloads: bool,
    pub allow_live_tv: bool,
    pub allow_mobile_uploads: bool,
}

impl InvitationRequest {
    pub fn new(server_ids: Vec<i64>) -> Self {
        Self {
            server_ids,
            expires_in_days: None,
            duration: UNLIMITED.to_string(),
            unlimited: true,
            library_ids: None,
            allow_downloads: false,
            allow_live_tv: false,
            allow_mobile_uploads: false,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Outcome {
    pub success: bool,
    pub index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    pub fn succeeded(index: u32, data: Value) -> Self {
        Self {
            success: true,
            index,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(index: u32, error: String) -> Self {
        Self {
            success: false,
            index,
            data: None,
            error: Some(error),
        }
    }

    /// `data.invitation.url`, when the response carried one.
    pub fn url(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .get("invitation")?
            .get("url")?
            .as_str()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub results: Vec<Outcome>,
    pub errors: Vec<Outcome>,
    pub total: u32,
    pub successful: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn new(total: u32, results: Vec<Outcome>, errors: Vec<Outcome>) -> Self {
        Self {
            total,
            successful: results.len(),
            failed: errors.len(),
            results,
            errors,
        }
    }

    pub fn urls(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|outcome| outcome.success)
            .filter_map(Outcome::url)
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Process exit status: 1 when any invitation failed.
    pub fn exit_status(&self) -> u8 {
        u8::from(self.has_failures())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_optionals_are_not_serialized() {
        let payload = serde_json::to_value(InvitationRequest::new(vec![1, 2])).unwrap();
        let object = payload.as_object().unwrap();

        assert!(!object.contains_key("expires_in_days"));
        assert!(!object.contains_key("library_ids"));
        assert_eq!(
            payload,
            json!({
                "server_ids": [1, 2],
                "duration": "unlimited",
                "unlimited": true,
                "allow_downloads": false,
                "allow_live_tv": false,
                "allow_mobile_uploads": false,
            })
        );
    }

    #[test]
    fn provided_optionals_are_serialized_even_when_empty() {
        let request = InvitationRequest {
            expires_in_days: Some(30),
            library_ids: Some(vec![]),
            ..InvitationRequest::new(vec![1])
        };
        let payload = serde_json::to_value(request).unwrap();

        assert_eq!(payload["expires_in_days"], json!(30));
        assert_eq!(payload["library_ids"], json!([]));
    }

    #[test]
    fn outcome_omits_missing_side() {
        let ok = serde_json::to_value(Outcome::succeeded(1, json!({"ok": true}))).unwrap();
        let err = serde_json::to_value(Outcome::failed(2, "boom".into())).unwrap();

        assert_eq!(ok, json!({"success": true, "index": 1, "data": {"ok": true}}));
        assert_eq!(err, json!({"success": false, "index": 2, "error": "boom"}));
    }

    #[test]
    fn urls_skip_bodies_without_invitation() {
        let summary = BatchSummary::new(
            3,
            vec![
                Outcome::succeeded(1, json!({"invitation": {"url": "https://a/j/1"}})),
                Outcome::succeeded(2, json!({"message": "created"})),
                Outcome::succeeded(3, json!({"invitation": {"url": "https://a/j/3"}})),
            ],
            vec![],
        );

        assert_eq!(summary.urls(), vec!["https://a/j/1", "https://a/j/3"]);
        assert!(!summary.has_failures());
        assert_eq!(summary.exit_status(), 0);
    }

    #[test]
    fn any_failure_sets_exit_status() {
        let summary = BatchSummary::new(
            2,
            vec![Outcome::succeeded(1, json!({}))],
            vec![Outcome::failed(2, "refused".into())],
        );

        assert!(summary.has_failures());
        assert_eq!(summary.exit_status(), 1);
    }
}
