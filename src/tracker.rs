use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::config::Config;
use crate::error::{ReportError, Result};
use crate::logging::{debug, obj, v_num, v_str, Domain};
use crate::record::{FieldMap, RawRecord, SearchResponse};

/// Anything that can answer "records for this selector".
#[async_trait]
pub trait IssueSource {
    async fn fetch_records(&self, selector: &str) -> Result<Vec<RawRecord>>;

    /// Human-facing query URL for one group label.
    fn group_link(&self, label: &str) -> String;
}

pub struct JiraClient {
    client: Client,
    cfg: Config,
    fields: FieldMap,
    search_endpoint: Url,
    issues_page: Url,
}

impl JiraClient {
    /// Fails if `tracker_base` is not a usable URL.
    pub fn new(cfg: Config) -> Result<Self> {
        let base = cfg.tracker_base.trim_end_matches('/');
        let search_endpoint = Url::parse(&format!("{}/rest/api/latest/search", base))?;
        let issues_page = Url::parse(&format!("{}/issues/", base))?;
        Ok(Self {
            client: Client::new(),
            fields: cfg.field_map(),
            cfg,
            search_endpoint,
            issues_page,
        })
    }

    pub fn search_jql(&self, selector: &str) -> String {
        format!(
            "project={} and {}={} and issuetype={} and {} is not empty order by key",
            self.cfg.project, self.cfg.selector_clause, selector, self.cfg.issue_type, self.cfg.group_clause
        )
    }

    pub fn search_url(&self, selector: &str) -> Url {
        let mut url = self.search_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("jql", &self.search_jql(selector))
            .append_pair("startAt", "0")
            .append_pair("maxResults", &self.cfg.max_results.to_string())
            .append_pair("fields", &self.fields.request_fields());
        url
    }

    fn group_url(&self, label: &str) -> Url {
        let mut url = self.issues_page.clone();
        url.query_pairs_mut().append_pair(
            "jql",
            &format!(
                "project={} and {}={} and issuetype={}",
                self.cfg.project, self.cfg.group_clause, label, self.cfg.issue_type
            ),
        );
        url
    }
}

#[async_trait]
impl IssueSource for JiraClient {
    async fn fetch_records(&self, selector: &str) -> Result<Vec<RawRecord>> {
        let url = self.search_url(selector);
        let mut req = self.client.get(url.clone());
        match (&self.cfg.tracker_user, &self.cfg.tracker_token) {
            (Some(user), token) => req = req.basic_auth(user, token.as_ref()),
            (None, Some(token)) => req = req.bearer_auth(token),
            (None, None) => {}
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ReportError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = resp.text().await?;
        let records = records_from_body(&body, &self.fields)?;
        debug(
            Domain::Fetch,
            "search_ok",
            obj(&[("selector", v_str(selector)), ("records", v_num(records.len() as f64))]),
        );
        Ok(records)
    }

    fn group_link(&self, label: &str) -> String {
        self.group_url(label).to_string()
    }
}

/// Decode a search response body into records.
pub fn records_from_body(body: &str, fields: &FieldMap) -> Result<Vec<RawRecord>> {
    let resp: SearchResponse = serde_json::from_str(body)?;
    resp.issues.iter().map(|issue| issue.to_record(fields)).collect()
}
