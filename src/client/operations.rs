//! Domain operations: each one maps an action onto an API `mode` and a fixed
//! set of parameters, then returns whatever [`Client::dispatch`] returns.

use tracing::debug;

use super::{Client, Request};
use crate::error::SabError;
use crate::params::{ParamValue, Params};
use crate::response::ApiResponse;
use crate::types::{JobIds, PostProcessing, Priority};

const NAME: &str = "name";
const VALUE: &str = "value";
const VALUE2: &str = "value2";
const PASSWORD: &str = "password";
const DEL_FILES: &str = "del_files";

/// Options shared by [`Client::add_url`] and [`Client::add_localfile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOptions {
    /// Job name; empty means "use the NZB file name". A password can be
    /// appended to the name as `name{{password}}`.
    pub name: String,
    /// Category; `*` means the default category.
    pub category: String,
    /// Post-processing script; `Default` means the category's script.
    pub script: String,
    pub priority: Priority,
    pub post_processing: PostProcessing,
}

impl Default for AddOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: "*".to_string(),
            script: "Default".to_string(),
            priority: Priority::Default,
            post_processing: PostProcessing::Repair,
        }
    }
}

impl AddOptions {
    fn into_params(self, source: &str) -> Params {
        Params::new()
            .with(NAME, source)
            .with("nzbname", self.name)
            .with("cat", self.category)
            .with("script", self.script)
            .with("priority", self.priority)
            .with("pp", self.post_processing)
    }
}

/// Filters for [`Client::history`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Index of the first entry to return.
    pub start: u32,
    /// Maximum number of entries; `0` means no limit.
    pub limit: u32,
    pub category: String,
    pub search: String,
    /// Only return failed jobs.
    pub failed_only: bool,
    /// Only return entries changed since the given history update counter.
    pub last_history_update: bool,
}

impl HistoryQuery {
    fn into_params(self) -> Params {
        Params::new()
            .with("start", self.start)
            .with("limit", self.limit)
            .with("category", self.category)
            .with("search", self.search)
            .with("failed_only", self.failed_only)
            .with("last_history_update", self.last_history_update)
    }
}

impl Client {
    /// Returns `true` when the server answers the `auth` call with a non-empty
    /// body, whatever the HTTP status.
    ///
    /// Transport failures yield `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Any other error from [`dispatch`](Self::dispatch), e.g. an
    /// [`SabError::Api`] for a rejected key.
    pub async fn reachable(&self) -> Result<bool, SabError> {
        match self.auth().await {
            Ok(response) => Ok(!response.is_empty()),
            Err(SabError::HttpStatus { status, body, .. }) => {
                debug!(status, "server answered with a non-success status");
                Ok(!body.trim().is_empty())
            }
            Err(SabError::Transport(error)) => {
                debug!(error = %error, "server not reachable");
                Ok(false)
            }
            Err(error) => Err(error),
        }
    }

    /// Reports which authentication method the server expects.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn auth(&self) -> Result<ApiResponse, SabError> {
        self.dispatch(Request::new("auth")).await
    }

    /// Lists the queue; `params` are passed through (`start`, `limit`, `search`, ...).
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn queue(&self, params: Params) -> Result<ApiResponse, SabError> {
        self.query("queue", params).await
    }

    /// Calls `mode=config` with arbitrary parameters.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn config(&self, params: Params) -> Result<ApiResponse, SabError> {
        self.query("config", params).await
    }

    /// Pauses the whole queue, indefinitely or for `minutes`.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn pause(&self, minutes: Option<u32>) -> Result<ApiResponse, SabError> {
        match minutes {
            Some(minutes) if minutes > 0 => {
                self.config(Params::new().with(NAME, "set_pause").with(VALUE, minutes))
                    .await
            }
            _ => self.dispatch(Request::new("pause")).await,
        }
    }

    /// Resumes the queue.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn resume(&self) -> Result<ApiResponse, SabError> {
        self.dispatch(Request::new("resume")).await
    }

    /// Sets the speed limit: a percentage of the line speed (`50`) or an
    /// absolute value with a unit suffix (`"400K"`, `"2M"`).
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn speedlimit(&self, value: impl Into<ParamValue>) -> Result<ApiResponse, SabError> {
        self.config(Params::new().with(NAME, "speedlimit").with(VALUE, value))
            .await
    }

    /// Returns every status field the server has. `skip_dashboard` avoids the
    /// slow public IPv4 lookup.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn full_status(&self, skip_dashboard: bool) -> Result<ApiResponse, SabError> {
        self.dispatch(Request::new("fullstatus").param("skip_dashboard", skip_dashboard))
            .await
    }

    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn pause_postprocessing(&self) -> Result<ApiResponse, SabError> {
        self.dispatch(Request::new("pause_pp")).await
    }

    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn resume_postprocessing(&self) -> Result<ApiResponse, SabError> {
        self.dispatch(Request::new("resume_pp")).await
    }

    /// Reads all RSS feeds now.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn scan_rss(&self) -> Result<ApiResponse, SabError> {
        self.dispatch(Request::new("rss_now")).await
    }

    /// Scans the watched folder now.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn scan_watchfolder(&self) -> Result<ApiResponse, SabError> {
        self.dispatch(Request::new("watched_now")).await
    }

    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn reset_quota(&self) -> Result<ApiResponse, SabError> {
        self.dispatch(Request::new("reset_quota")).await
    }

    /// Generates a new API key on the server. This client keeps using the old one.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn reset_apikey(&self) -> Result<ApiResponse, SabError> {
        self.config(Params::new().with(NAME, "set_apikey")).await
    }

    /// Generates a new NZB key on the server.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn reset_nzbkey(&self) -> Result<ApiResponse, SabError> {
        self.config(Params::new().with(NAME, "set_nzbkey")).await
    }

    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn pause_jobs(&self, nzo: impl Into<JobIds>) -> Result<ApiResponse, SabError> {
        let nzo = nzo.into();
        self.queue(Params::new().with(NAME, "pause").with(VALUE, &nzo))
            .await
    }

    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn resume_jobs(&self, nzo: impl Into<JobIds>) -> Result<ApiResponse, SabError> {
        let nzo = nzo.into();
        self.queue(Params::new().with(NAME, "resume").with(VALUE, &nzo))
            .await
    }

    /// Removes jobs (or every job with `"all"`) from the queue.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn delete_jobs(
        &self,
        nzo: impl Into<JobIds>,
        delete_files: bool,
    ) -> Result<ApiResponse, SabError> {
        let nzo = nzo.into();
        self.queue(
            Params::new()
                .with(NAME, "delete")
                .with(VALUE, &nzo)
                .with(DEL_FILES, delete_files),
        )
        .await
    }

    /// Removes every job, or only the ones matching `search`.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn purge_queue(
        &self,
        search: Option<&str>,
        delete_files: bool,
    ) -> Result<ApiResponse, SabError> {
        self.queue(
            Params::new()
                .with(NAME, "purge")
                .with(DEL_FILES, delete_files)
                .with_opt("search", search),
        )
        .await
    }

    /// Moves `first` to a queue position, or swaps it with another nzo.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn move_job(
        &self,
        first: &str,
        second: impl Into<ParamValue>,
    ) -> Result<ApiResponse, SabError> {
        self.dispatch(Request::new("switch").param(VALUE, first).param(VALUE2, second))
            .await
    }

    /// Adds an NZB by URL.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn add_url(&self, url: &str, options: AddOptions) -> Result<ApiResponse, SabError> {
        self.query("addurl", options.into_params(url)).await
    }

    /// Adds an NZB from a path the server can read.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn add_localfile(
        &self,
        path: &str,
        options: AddOptions,
    ) -> Result<ApiResponse, SabError> {
        self.query("addlocalfile", options.into_params(path)).await
    }

    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn change_job_category(
        &self,
        nzo: &str,
        category: &str,
    ) -> Result<ApiResponse, SabError> {
        self.dispatch(Request::new("change_cat").param(VALUE, nzo).param(VALUE2, category))
            .await
    }

    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn change_job_script(
        &self,
        nzo: &str,
        script: &str,
    ) -> Result<ApiResponse, SabError> {
        self.dispatch(Request::new("change_cat").param(VALUE, nzo).param(VALUE2, script))
            .await
    }

    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn change_job_priority(
        &self,
        nzo: &str,
        priority: impl Into<ParamValue>,
    ) -> Result<ApiResponse, SabError> {
        self.queue(
            Params::new()
                .with(NAME, "priority")
                .with(VALUE, nzo)
                .with(VALUE2, priority),
        )
        .await
    }

    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn change_job_postprocessing(
        &self,
        nzo: &str,
        post_processing: PostProcessing,
    ) -> Result<ApiResponse, SabError> {
        self.dispatch(
            Request::new("change_pts")
                .param(VALUE, nzo)
                .param(VALUE2, post_processing),
        )
        .await
    }

    /// Renames a job, optionally setting its archive password.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn change_job_name(
        &self,
        nzo: &str,
        name: &str,
        password: Option<&str>,
    ) -> Result<ApiResponse, SabError> {
        self.queue(
            Params::new()
                .with(NAME, "rename")
                .with(VALUE, nzo)
                .with(VALUE2, name)
                .with_opt(PASSWORD, password),
        )
        .await
    }

    /// Lists the files of a job.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn get_files(&self, nzo: &str) -> Result<ApiResponse, SabError> {
        self.dispatch(Request::new("get_files").param(VALUE, nzo)).await
    }

    /// Removes a single file (`nzf`) from a job.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn remove_job_file(&self, nzo: &str, nzf: &str) -> Result<ApiResponse, SabError> {
        self.queue(
            Params::new()
                .with(NAME, "delete")
                .with(VALUE, nzo)
                .with(VALUE2, nzf),
        )
        .await
    }

    /// Deletes history entries: ids, `"all"` or `"failed"`.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn delete_history(&self, nzo: impl Into<JobIds>) -> Result<ApiResponse, SabError> {
        let nzo = nzo.into();
        self.query("history", Params::new().with(NAME, "delete").with(VALUE, &nzo))
            .await
    }

    /// Retries a failed job; `"all"` retries every failed job.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn retry(&self, nzo: &str, password: Option<&str>) -> Result<ApiResponse, SabError> {
        if nzo == "all" {
            return self.dispatch(Request::new("retry_all")).await;
        }
        self.dispatch(
            Request::new("retry")
                .param(VALUE, nzo)
                .param_opt(PASSWORD, password),
        )
        .await
    }

    /// Lists the history.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn history(&self, query: HistoryQuery) -> Result<ApiResponse, SabError> {
        self.query("history", query.into_params()).await
    }

    /// Download statistics in bytes, total and per server.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn server_stats(&self) -> Result<ApiResponse, SabError> {
        self.dispatch(Request::new("server_stats")).await
    }

    /// Reads the whole configuration, one section, or one keyword.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn get_config(
        &self,
        section: Option<&str>,
        keyword: Option<&str>,
    ) -> Result<ApiResponse, SabError> {
        self.dispatch(
            Request::new("get_config")
                .param_opt("section", section)
                .param_opt("keyword", keyword),
        )
        .await
    }

    /// Writes one configuration value.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn set_config(
        &self,
        section: &str,
        keyword: &str,
        value: impl Into<ParamValue>,
    ) -> Result<ApiResponse, SabError> {
        self.dispatch(
            Request::new("set_config")
                .param("section", section)
                .param("keyword", keyword)
                .param(VALUE, value),
        )
        .await
    }

    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn warnings(&self) -> Result<ApiResponse, SabError> {
        self.dispatch(Request::new("warnings")).await
    }

    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub async fn version(&self) -> Result<ApiResponse, SabError> {
        self.dispatch(Request::new("version")).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use super::*;
    use crate::test_support::recording::RecordingTransport;
    use crate::transport::TransportRequest;

    fn setup() -> (Client, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new());
        let client = Client::builder("http://m:8080")
            .api_key("12345")
            .shared_transport(transport.clone())
            .build()
            .unwrap();
        (client, transport)
    }

    /// Query pairs of a request, minus the defaults every request carries.
    fn call_params(request: &TransportRequest) -> BTreeMap<String, String> {
        request
            .url
            .query_pairs()
            .filter(|(key, _)| key != "apikey" && key != "output")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    fn expected(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_every_request_carries_defaults() {
        let (client, transport) = setup();
        client.version().await.unwrap();
        let request = transport.last();
        assert_eq!(request.query_param("apikey").as_deref(), Some("12345"));
        assert_eq!(request.query_param("output").as_deref(), Some("json"));
    }

    #[tokio::test]
    async fn test_argument_free_operations_send_their_mode() {
        let (client, transport) = setup();

        client.auth().await.unwrap();
        client.resume().await.unwrap();
        client.pause_postprocessing().await.unwrap();
        client.resume_postprocessing().await.unwrap();
        client.scan_rss().await.unwrap();
        client.scan_watchfolder().await.unwrap();
        client.reset_quota().await.unwrap();
        client.server_stats().await.unwrap();
        client.warnings().await.unwrap();
        client.version().await.unwrap();

        let modes: Vec<String> = transport
            .requests()
            .iter()
            .map(|r| r.query_param("mode").unwrap())
            .collect();
        assert_eq!(
            modes,
            [
                "auth",
                "resume",
                "pause_pp",
                "resume_pp",
                "rss_now",
                "watched_now",
                "reset_quota",
                "server_stats",
                "warnings",
                "version"
            ]
        );
    }

    #[tokio::test]
    async fn test_pause_indefinite_and_timed() {
        let (client, transport) = setup();

        client.pause(None).await.unwrap();
        assert_eq!(call_params(&transport.last()), expected(&[("mode", "pause")]));

        client.pause(Some(30)).await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[("mode", "config"), ("name", "set_pause"), ("value", "30")])
        );
    }

    #[tokio::test]
    async fn test_speedlimit_accepts_percentage_and_unit() {
        let (client, transport) = setup();

        client.speedlimit(50).await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[("mode", "config"), ("name", "speedlimit"), ("value", "50")])
        );

        client.speedlimit("400K").await.unwrap();
        assert_eq!(transport.last().query_param("value").as_deref(), Some("400K"));
    }

    #[tokio::test]
    async fn test_full_status_encodes_bool() {
        let (client, transport) = setup();
        client.full_status(true).await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[("mode", "fullstatus"), ("skip_dashboard", "1")])
        );
    }

    #[tokio::test]
    async fn test_key_resets_use_config_mode() {
        let (client, transport) = setup();

        client.reset_apikey().await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[("mode", "config"), ("name", "set_apikey")])
        );

        client.reset_nzbkey().await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[("mode", "config"), ("name", "set_nzbkey")])
        );
    }

    #[tokio::test]
    async fn test_job_pause_resume_and_delete() {
        let (client, transport) = setup();

        client.pause_jobs(["a", "b"]).await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[("mode", "queue"), ("name", "pause"), ("value", "a,b")])
        );

        client.resume_jobs("a").await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[("mode", "queue"), ("name", "resume"), ("value", "a")])
        );

        client.delete_jobs("all", true).await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[
                ("mode", "queue"),
                ("name", "delete"),
                ("value", "all"),
                ("del_files", "1")
            ])
        );
    }

    #[tokio::test]
    async fn test_purge_queue_omits_missing_search() {
        let (client, transport) = setup();

        client.purge_queue(None, false).await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[("mode", "queue"), ("name", "purge"), ("del_files", "0")])
        );

        client.purge_queue(Some("linux"), true).await.unwrap();
        assert_eq!(transport.last().query_param("search").as_deref(), Some("linux"));
    }

    #[tokio::test]
    async fn test_move_job_position_or_swap() {
        let (client, transport) = setup();

        client.move_job("a", 0).await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[("mode", "switch"), ("value", "a"), ("value2", "0")])
        );

        client.move_job("a", "b").await.unwrap();
        assert_eq!(transport.last().query_param("value2").as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_add_url_defaults() {
        let (client, transport) = setup();
        client
            .add_url("https://indexer.example/get/1.nzb", AddOptions::default())
            .await
            .unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[
                ("mode", "addurl"),
                ("name", "https://indexer.example/get/1.nzb"),
                ("nzbname", ""),
                ("cat", "*"),
                ("script", "Default"),
                ("priority", "-100"),
                ("pp", "1"),
            ])
        );
    }

    #[tokio::test]
    async fn test_add_localfile_with_options() {
        let (client, transport) = setup();
        let options = AddOptions {
            name: "ubuntu".to_string(),
            category: "software".to_string(),
            priority: Priority::Force,
            post_processing: PostProcessing::RepairUnpackDelete,
            ..AddOptions::default()
        };
        client.add_localfile("/data/ubuntu.nzb", options).await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[
                ("mode", "addlocalfile"),
                ("name", "/data/ubuntu.nzb"),
                ("nzbname", "ubuntu"),
                ("cat", "software"),
                ("script", "Default"),
                ("priority", "2"),
                ("pp", "3"),
            ])
        );
    }

    #[tokio::test]
    async fn test_change_job_operations() {
        let (client, transport) = setup();

        client.change_job_category("a", "tv").await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[("mode", "change_cat"), ("value", "a"), ("value2", "tv")])
        );

        client.change_job_script("a", "notify.py").await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[("mode", "change_cat"), ("value", "a"), ("value2", "notify.py")])
        );

        client.change_job_priority("a", Priority::High).await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[
                ("mode", "queue"),
                ("name", "priority"),
                ("value", "a"),
                ("value2", "1")
            ])
        );

        client
            .change_job_postprocessing("a", PostProcessing::None)
            .await
            .unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[("mode", "change_pts"), ("value", "a"), ("value2", "0")])
        );
    }

    #[tokio::test]
    async fn test_change_job_name_with_and_without_password() {
        let (client, transport) = setup();

        client.change_job_name("a", "renamed", None).await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[
                ("mode", "queue"),
                ("name", "rename"),
                ("value", "a"),
                ("value2", "renamed")
            ])
        );

        client
            .change_job_name("a", "renamed", Some("hunter2"))
            .await
            .unwrap();
        assert_eq!(transport.last().query_param("password").as_deref(), Some("hunter2"));
    }

    #[tokio::test]
    async fn test_files_and_file_removal() {
        let (client, transport) = setup();

        client.get_files("a").await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[("mode", "get_files"), ("value", "a")])
        );

        client.remove_job_file("a", "SABnzbd_nzf_1").await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[
                ("mode", "queue"),
                ("name", "delete"),
                ("value", "a"),
                ("value2", "SABnzbd_nzf_1")
            ])
        );
    }

    #[tokio::test]
    async fn test_delete_history_wildcards() {
        let (client, transport) = setup();

        client.delete_history("failed").await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[("mode", "history"), ("name", "delete"), ("value", "failed")])
        );

        client.delete_history(JobIds::All).await.unwrap();
        assert_eq!(transport.last().query_param("value").as_deref(), Some("all"));
    }

    #[tokio::test]
    async fn test_retry_all_routes_to_retry_all() {
        let (client, transport) = setup();

        client.retry("all", None).await.unwrap();
        assert_eq!(call_params(&transport.last()), expected(&[("mode", "retry_all")]));

        client.retry("X", None).await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[("mode", "retry"), ("value", "X")])
        );

        client.retry("X", Some("secret")).await.unwrap();
        assert_eq!(transport.last().query_param("password").as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_history_defaults() {
        let (client, transport) = setup();
        client.history(HistoryQuery::default()).await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[
                ("mode", "history"),
                ("start", "0"),
                ("limit", "0"),
                ("category", ""),
                ("search", ""),
                ("failed_only", "0"),
                ("last_history_update", "0"),
            ])
        );
    }

    #[tokio::test]
    async fn test_history_failed_only() {
        let (client, transport) = setup();
        client
            .history(HistoryQuery {
                limit: 10,
                failed_only: true,
                ..HistoryQuery::default()
            })
            .await
            .unwrap();
        let request = transport.last();
        assert_eq!(request.query_param("limit").as_deref(), Some("10"));
        assert_eq!(request.query_param("failed_only").as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_get_and_set_config() {
        let (client, transport) = setup();

        client.get_config(None, None).await.unwrap();
        assert_eq!(call_params(&transport.last()), expected(&[("mode", "get_config")]));

        client.get_config(Some("misc"), Some("port")).await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[("mode", "get_config"), ("section", "misc"), ("keyword", "port")])
        );

        client.set_config("misc", "enable_https", false).await.unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[
                ("mode", "set_config"),
                ("section", "misc"),
                ("keyword", "enable_https"),
                ("value", "0")
            ])
        );
    }

    #[tokio::test]
    async fn test_queue_passthrough() {
        let (client, transport) = setup();
        client
            .queue(Params::new().with("start", 0).with("limit", 5).with("search", "iso"))
            .await
            .unwrap();
        assert_eq!(
            call_params(&transport.last()),
            expected(&[("mode", "queue"), ("start", "0"), ("limit", "5"), ("search", "iso")])
        );
    }

    #[tokio::test]
    async fn test_reachable_maps_transport_failure_to_false() {
        use crate::transport::TransportError;

        let (client, transport) = setup();
        assert!(client.reachable().await.unwrap());

        transport.push(Err(TransportError::connect(
            "http://m:8080/sabnzbd/api",
            "connection refused",
        )));
        assert!(!client.reachable().await.unwrap());
    }

    #[tokio::test]
    async fn test_reachable_propagates_api_error() {
        use crate::transport::RawResponse;

        let (client, transport) = setup();
        transport.push(Ok(RawResponse::new(
            200,
            r#"{"error": "API Key Incorrect", "status": false}"#,
        )));
        let error = client.reachable().await.unwrap_err();
        assert_eq!(error.api_message(), Some("API Key Incorrect"));
    }

    #[tokio::test]
    async fn test_non_success_json_answer_is_returned() {
        use crate::transport::RawResponse;

        let (client, transport) = setup();
        transport.push(Ok(RawResponse::new(
            404,
            r#"{"status": false, "error": "not found"}"#,
        )));
        let response = client.queue(Params::new()).await.unwrap();
        assert_eq!(response.status(), 404);
        assert_eq!(response.get("status"), Some(&serde_json::json!(false)));
    }

    #[tokio::test]
    async fn test_reachable_when_server_answers_non_success() {
        use crate::transport::RawResponse;

        let (client, transport) = setup();
        transport.push(Ok(RawResponse::new(
            404,
            r#"{"status": false, "error": "not found"}"#,
        )));
        assert!(client.reachable().await.unwrap());

        transport.push(Ok(RawResponse::new(502, "Bad Gateway")));
        assert!(client.reachable().await.unwrap());

        transport.push(Ok(RawResponse::new(503, "")));
        assert!(!client.reachable().await.unwrap());
    }
}
