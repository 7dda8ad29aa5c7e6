use serde::{Deserialize, Serialize};

/// Provider status code meaning "task completed successfully".
pub const STATUS_OK: u32 = 20000;

/// Device the SERP should be rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Desktop,
    Mobile,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Desktop => "desktop",
            Device::Mobile => "mobile",
        }
    }

    /// OS the provider expects alongside each device type.
    pub fn os(&self) -> &'static str {
        match self {
            Device::Desktop => "windows",
            Device::Mobile => "android",
        }
    }
}

/// One task in the live/regular request array.
#[derive(Debug, Clone, Serialize)]
pub struct SerpTaskPayload {
    pub keyword: String,
    pub device: String,
    pub os: String,
    pub depth: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
}

/// A non-paid search result entry, ordered by rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganicResult {
    pub position: u32,
    pub title: String,
    pub url: String,
    pub snippet: String,
}

// --- Provider wire format (response side) ---

#[derive(Debug, Deserialize)]
pub struct ApiBody {
    pub status_code: u32,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub tasks: Option<Vec<TaskData>>,
}

#[derive(Debug, Deserialize)]
pub struct TaskData {
    pub status_code: u32,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub result: Option<Vec<TaskResult>>,
}

#[derive(Debug, Deserialize)]
pub struct TaskResult {
    #[serde(default)]
    pub items: Option<Vec<ResultItem>>,
}

/// A raw SERP item. The provider mixes organic entries with ads, maps,
/// people-also-ask blocks and so on; `into_organic` keeps only the kinds
/// that carry competitor page content.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultItem {
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub rank_group: Option<u32>,
    pub rank_absolute: Option<u32>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub snippet: Option<String>,
    pub description: Option<String>,
}

impl ResultItem {
    /// Convert to an OrganicResult, or None for item kinds we don't want
    /// (ads, local packs) and items without a URL.
    pub fn into_organic(self) -> Option<OrganicResult> {
        let url = self.url?;
        if let Some(kind) = self.item_type.as_deref() {
            let kind = kind.to_lowercase();
            let wanted = ["organic", "featured_snippet", "answer_box"]
                .iter()
                .any(|k| kind.contains(k));
            if !wanted {
                return None;
            }
        }
        Some(OrganicResult {
            position: self.rank_group.or(self.rank_absolute).unwrap_or(0),
            title: self.title.unwrap_or_default(),
            url,
            snippet: self.snippet.or(self.description).unwrap_or_default(),
        })
    }
}
