pub mod error;
pub mod types;

pub use error::{Result, SerpError};
pub use types::{Device, OrganicResult, SerpTaskPayload, STATUS_OK};

use types::ApiBody;

const LIVE_ORGANIC_URL: &str =
    "https://api.dataforseo.com/v3/serp/google/organic/live/regular";

/// Round a requested result count down to the provider's supported depth
/// steps (multiples of 10, clamped to 10..=100). A request for 35 results
/// is issued as depth 30.
pub fn normalize_depth(requested: u32) -> u32 {
    (requested / 10 * 10).clamp(10, 100)
}

pub struct DataForSeoClient {
    client: reqwest::Client,
    login: String,
    password: String,
}

impl DataForSeoClient {
    /// Credentials are session-scoped: one client per submitted form,
    /// never read from process-wide state.
    pub fn new(login: String, password: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            login,
            password,
        }
    }

    /// Fetch organic SERP results via the live/regular endpoint.
    ///
    /// `limit` is the caller's requested result count; the provider is
    /// asked for `normalize_depth(limit)` and the collected list is cut
    /// back to `limit`. Outcome mapping happens here, once: downstream
    /// code only ever sees `Vec<OrganicResult>` or a `SerpError` variant.
    pub async fn live_organic_search(
        &self,
        keyword: &str,
        language_name: Option<&str>,
        location_name: Option<&str>,
        device: Device,
        limit: u32,
    ) -> Result<Vec<OrganicResult>> {
        let payload = SerpTaskPayload {
            keyword: keyword.trim().to_string(),
            device: device.as_str().to_string(),
            os: device.os().to_string(),
            depth: normalize_depth(limit),
            language_name: non_empty(language_name),
            location_name: non_empty(location_name),
        };

        tracing::debug!(
            device = device.as_str(),
            depth = payload.depth,
            "DataForSEO live organic request"
        );

        let resp = self
            .client
            .post(LIVE_ORGANIC_URL)
            .basic_auth(&self.login, Some(&self.password))
            .json(&[&payload])
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SerpError::Auth);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SerpError::Network(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let body: ApiBody = resp.json().await?;
        let results = collect_organic(body)?;

        tracing::info!(count = results.len(), "Fetched organic SERP results");
        Ok(results
            .into_iter()
            .take(limit.max(1) as usize)
            .collect())
    }
}

/// Walk the task/result/items nesting, enforcing provider status codes at
/// both the top level and per task. A failed task never yields a partial
/// list.
fn collect_organic(body: ApiBody) -> Result<Vec<OrganicResult>> {
    if body.status_code != STATUS_OK {
        return Err(SerpError::Task {
            code: body.status_code,
            message: body
                .status_message
                .unwrap_or_else(|| "unknown provider error".to_string()),
        });
    }

    let tasks = body.tasks.unwrap_or_default();
    if tasks.is_empty() {
        return Err(SerpError::Parse(
            "DataForSEO response contains no tasks".to_string(),
        ));
    }

    let mut results = Vec::new();
    for task in tasks {
        if task.status_code != STATUS_OK {
            return Err(SerpError::Task {
                code: task.status_code,
                message: task
                    .status_message
                    .unwrap_or_else(|| "no message available".to_string()),
            });
        }
        for task_result in task.result.unwrap_or_default() {
            for item in task_result.items.unwrap_or_default() {
                if let Some(organic) = item.into_organic() {
                    results.push(organic);
                }
            }
        }
    }

    if results.is_empty() {
        return Err(SerpError::Empty);
    }
    Ok(results)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_rounds_down_to_provider_step() {
        assert_eq!(normalize_depth(35), 30);
        assert_eq!(normalize_depth(10), 10);
        assert_eq!(normalize_depth(19), 10);
        assert_eq!(normalize_depth(100), 100);
    }

    #[test]
    fn depth_clamped_to_supported_range() {
        assert_eq!(normalize_depth(3), 10);
        assert_eq!(normalize_depth(0), 10);
        assert_eq!(normalize_depth(250), 100);
    }

    #[test]
    fn payload_omits_blank_locale_fields() {
        let payload = SerpTaskPayload {
            keyword: "best hiking boots".to_string(),
            device: Device::Desktop.as_str().to_string(),
            os: Device::Desktop.os().to_string(),
            depth: normalize_depth(35),
            language_name: non_empty(Some("  ")),
            location_name: non_empty(Some("Italy")),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["depth"], 30);
        assert_eq!(json["os"], "windows");
        assert!(json.get("language_name").is_none());
        assert_eq!(json["location_name"], "Italy");
    }

    fn parse(body: &str) -> ApiBody {
        serde_json::from_str(body).expect("invalid test JSON")
    }

    #[test]
    fn successful_body_yields_ordered_results() {
        let body = parse(
            r#"{
            "status_code": 20000,
            "tasks": [{
                "status_code": 20000,
                "result": [{
                    "items": [
                        {"type": "organic", "rank_group": 1, "title": "A", "url": "https://a.example", "snippet": "sa"},
                        {"type": "paid", "rank_group": 2, "title": "Ad", "url": "https://ad.example"},
                        {"type": "organic", "rank_group": 2, "title": "B", "url": "https://b.example", "description": "sb"}
                    ]
                }]
            }]
        }"#,
        );

        let results = collect_organic(body).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://a.example");
        assert_eq!(results[1].snippet, "sb");
    }

    #[test]
    fn top_level_failure_maps_to_task_error() {
        let body = parse(r#"{"status_code": 40101, "status_message": "Auth failed"}"#);
        match collect_organic(body) {
            Err(SerpError::Task { code, .. }) => assert_eq!(code, 40101),
            other => panic!("expected Task error, got {other:?}"),
        }
    }

    #[test]
    fn failed_task_never_yields_partial_results() {
        let body = parse(
            r#"{
            "status_code": 20000,
            "tasks": [
                {"status_code": 20000, "result": [{"items": [
                    {"type": "organic", "rank_group": 1, "title": "A", "url": "https://a.example"}
                ]}]},
                {"status_code": 40503, "status_message": "POST Data Is Invalid"}
            ]
        }"#,
        );
        match collect_organic(body) {
            Err(SerpError::Task { code, message }) => {
                assert_eq!(code, 40503);
                assert!(message.contains("Invalid"));
            }
            other => panic!("expected Task error, got {other:?}"),
        }
    }

    #[test]
    fn no_usable_items_maps_to_empty() {
        let body = parse(
            r#"{
            "status_code": 20000,
            "tasks": [{"status_code": 20000, "result": [{"items": [
                {"type": "local_pack", "title": "Maps", "url": "https://maps.example"}
            ]}]}]
        }"#,
        );
        assert!(matches!(collect_organic(body), Err(SerpError::Empty)));
    }
}
