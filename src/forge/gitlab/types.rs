use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ProjectInfo {
    pub default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MergeRequestInfo {
    pub iid: u64,
    pub web_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LabelInfo {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatedCommit {
    pub id: String,
}
