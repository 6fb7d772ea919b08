//! Blocking client for the Nozbe API.
//!
//! # Design
//! `NozbeClient` owns its configuration and its transport. Every remote call
//! is a GET whose URL is `<api_url>/<action>[/<positional>][/<k>-<v>...]/key-<api_key>`.
//! `fetch` is deliberately lopsided: a transport failure or non-2xx status is
//! returned as an error, while a body that does not decode as JSON becomes an
//! empty list.
//!
//! The create operations discard the creation response and list again, since
//! the API does not echo the created entity. Nothing reconciles a concurrent
//! change between the two calls.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::action::Action;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, Transport, UreqTransport};
use crate::types::{field_text, into_records, Context, Project, Record, Task};

#[derive(Debug)]
pub struct NozbeClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl NozbeClient<UreqTransport> {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(api_key))
    }

    /// Username and password are accepted for compatibility and never sent.
    pub fn with_credentials(
        api_key: impl Into<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self> {
        Self::from_config(ClientConfig::new(api_key).with_credentials(username, password))
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = UreqTransport::from_config(&config);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> NozbeClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the URL for a named action.
    ///
    /// Fails with `UnsupportedAction` unless `action` is one of the
    /// whitelisted names. Named segments are emitted in slice order.
    pub fn prepare_url(
        &self,
        action: &str,
        positional: Option<&str>,
        named: &[(&str, &str)],
    ) -> Result<String> {
        let action: Action = action.parse().map_err(|e| {
            error!("Unsupported action: {action}");
            e
        })?;
        Ok(self.url_for(action, positional, named))
    }

    pub fn url_for(
        &self,
        action: Action,
        positional: Option<&str>,
        named: &[(&str, &str)],
    ) -> String {
        let mut segments = vec![self.config.api_url.clone(), action.as_str().to_string()];
        if let Some(segment) = positional {
            segments.push(self.segment(segment));
        }
        segments.extend(named.iter().map(|(k, v)| format!("{k}-{}", self.segment(v))));
        segments.push(format!("key-{}", self.config.api_key));
        segments.join("/")
    }

    /// GET `url` and decode the body as JSON.
    ///
    /// An undecodable body yields an empty array instead of an error.
    pub fn fetch(&self, url: &str) -> Result<Value> {
        let shown = self.redact(url);
        info!("Request for url: {shown}");

        let response = self.transport.execute(&HttpRequest::get(url))?;
        if !response.is_success() {
            return Err(ApiError::Http {
                status: response.status,
                body: response.body,
            });
        }

        match serde_json::from_str(&response.body) {
            Ok(value) => Ok(value),
            Err(e) => {
                let content_type = response.header("content-type").unwrap_or("unknown");
                debug!("Response for url {shown} is not JSON ({content_type}): {e}");
                Ok(Value::Array(Vec::new()))
            }
        }
    }

    pub fn list_projects(&self) -> Result<Vec<Project>> {
        self.fetch_records(&self.url_for(Action::Projects, None, &[]))
    }

    pub fn find_project_by_name(&self, name: &str) -> Result<Option<Project>> {
        Ok(self
            .list_projects()?
            .into_iter()
            .find(|project| project.get("name").and_then(Value::as_str) == Some(name)))
    }

    pub fn find_project_by_id(&self, project_id: &str) -> Result<Option<Project>> {
        Ok(self
            .list_projects()?
            .into_iter()
            .find(|project| field_text(project, "id").as_deref() == Some(project_id)))
    }

    /// List the tasks of a project given either its id or its name.
    ///
    /// `id` wins when both are given. A name that matches no project is a
    /// `ProjectNotFound` error.
    pub fn list_project_tasks(&self, id: Option<&str>, name: Option<&str>) -> Result<Vec<Task>> {
        let project_id = match (id, name) {
            (Some(id), _) => id.to_string(),
            (None, Some(name)) => self
                .find_project_by_name(name)?
                .and_then(|project| field_text(&project, "id"))
                .ok_or_else(|| ApiError::ProjectNotFound(name.to_string()))?,
            (None, None) => {
                error!("Project id or name must be provided");
                return Err(ApiError::MissingParameter("id or name"));
            }
        };

        let url = self.url_for(
            Action::Actions,
            None,
            &[("what", "project"), ("id", project_id.as_str())],
        );
        self.fetch_records(&url)
    }

    pub fn list_contexts(&self) -> Result<Vec<Context>> {
        self.fetch_records(&self.url_for(Action::Contexts, None, &[]))
    }

    /// Create a project and return the refreshed project list.
    ///
    /// Without `force`, an existing project with the same name short-circuits
    /// the call and the current list is returned as is.
    pub fn create_project(&self, name: &str, force: bool) -> Result<Vec<Project>> {
        if !force {
            let projects = self.list_projects()?;
            if projects
                .iter()
                .any(|project| project.get("name").and_then(Value::as_str) == Some(name))
            {
                warn!("Project with name \"{name}\" already exists.");
                return Ok(projects);
            }
        }

        self.fetch(&self.url_for(Action::NewProject, None, &[("name", name)]))?;
        self.list_projects()
    }

    /// Create a task in `project_id` and return that project's task list.
    pub fn create_project_task(&self, name: &str, project_id: &str) -> Result<Vec<Task>> {
        let url = self.url_for(
            Action::NewAction,
            None,
            &[("name", name), ("project_id", project_id)],
        );
        self.fetch(&url)?;
        self.list_project_tasks(Some(project_id), None)
    }

    fn fetch_records(&self, url: &str) -> Result<Vec<Record>> {
        let value = self.fetch(url)?;
        Ok(into_records(value).unwrap_or_else(|| {
            debug!("Response for url {} is not a list of objects", self.redact(url));
            Vec::new()
        }))
    }

    fn segment(&self, value: &str) -> String {
        if self.config.percent_encode_segments {
            urlencoding::encode(value).into_owned()
        } else {
            value.to_string()
        }
    }

    /// Hide the trailing API key when a URL is logged.
    fn redact(&self, url: &str) -> String {
        let key_segment = format!("key-{}", self.config.api_key);
        match url.strip_suffix(&key_segment) {
            Some(head) => format!("{head}key-***"),
            None => url.to_string(),
        }
    }
}
