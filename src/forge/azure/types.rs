use serde::{Deserialize, Serialize};

/// Object id used to create or delete refs.
pub const ZERO_OBJECT_ID: &str = "0000000000000000000000000000000000000000";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureRepository {
    pub default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AzureList<T> {
    pub value: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureRef {
    pub name: String,
    pub object_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefUpdate {
    pub name: String,
    pub old_object_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_object_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ItemPath {
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContent {
    pub content: String,
    pub content_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub change_type: String,
    pub item: ItemPath,
    pub new_content: NewContent,
}

#[derive(Debug, Serialize)]
pub struct PushCommit {
    pub comment: String,
    pub parents: Vec<String>,
    pub changes: Vec<Change>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Push {
    pub ref_updates: Vec<RefUpdate>,
    pub commits: Vec<PushCommit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushedCommit {
    pub commit_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PushResponse {
    pub commits: Vec<PushedCommit>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePull {
    pub source_ref_name: String,
    pub target_ref_name: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzurePullRequest {
    pub pull_request_id: u64,
}

#[derive(Debug, Serialize)]
pub struct CreateLabel {
    pub name: String,
}
