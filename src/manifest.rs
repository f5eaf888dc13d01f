//! Application manifest: the models, request types, routes and factory
//! fixtures of the documented application, plus one configuration per API
//! version. Manifests are JSON or YAML, chosen by file extension.

use crate::config::VersionConfig;
use crate::definitions::example::{FixtureFactory, Record};
use crate::error::{Error, Result};
use crate::model::{ModelDescriptor, ModelRegistry};
use crate::route::{FormRequest, HttpMethod, Route};
use crate::schema::short_name;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub versions: Vec<VersionConfig>,
    pub models: Vec<ModelDescriptor>,
    pub form_requests: Vec<FormRequest>,
    pub routes: Vec<RouteEntry>,
    /// Model name -> example record
    pub factories: IndexMap<String, Record>,
}

/// A route as written in the manifest; the form request is referenced by name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteEntry {
    pub uri: String,
    pub name: Option<String>,
    pub methods: Vec<HttpMethod>,
    pub model: Option<String>,
    pub exceptions: Vec<String>,
    pub form_request: Option<String>,
    pub middleware: Vec<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
}

/// The documented application with its references resolved
pub struct Application {
    pub registry: ModelRegistry,
    pub routes: Vec<Route>,
    pub factory: FixtureFactory,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading manifest: {}", path.display());
        let content = fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Configured versions; a manifest without any documents one default version
    pub fn versions(&self) -> Vec<VersionConfig> {
        if self.versions.is_empty() {
            vec![VersionConfig::default()]
        } else {
            self.versions.clone()
        }
    }

    pub fn version(&self, app_version: &str) -> Result<VersionConfig> {
        self.versions()
            .into_iter()
            .find(|config| config.app_version == app_version)
            .ok_or_else(|| Error::VersionNotFound(app_version.to_string()))
    }

    /// Resolve form request references and build the model registry
    pub fn application(&self) -> Result<Application> {
        let routes = self
            .routes
            .iter()
            .map(|entry| self.resolve_route(entry))
            .collect::<Result<Vec<_>>>()?;

        Ok(Application {
            registry: ModelRegistry::new(self.models.clone()),
            routes,
            factory: FixtureFactory::new(self.factories.clone()),
        })
    }

    fn resolve_route(&self, entry: &RouteEntry) -> Result<Route> {
        let form_request = entry
            .form_request
            .as_deref()
            .map(|name| self.find_form_request(name).cloned())
            .transpose()?;

        Ok(Route {
            uri: entry.uri.clone(),
            name: entry.name.clone(),
            methods: entry.methods.clone(),
            model: entry.model.clone(),
            exceptions: entry.exceptions.clone(),
            form_request,
            middleware: entry.middleware.clone(),
            summary: entry.summary.clone(),
            description: entry.description.clone(),
        })
    }

    fn find_form_request(&self, name: &str) -> Result<&FormRequest> {
        if let Some(request) = self.form_requests.iter().find(|request| request.name == name) {
            return Ok(request);
        }
        if short_name(name) != name {
            return Err(Error::FormRequestNotFound(name.to_string()));
        }

        let mut matches = self
            .form_requests
            .iter()
            .filter(|request| request.short_name() == name);
        match (matches.next(), matches.next()) {
            (Some(request), None) => Ok(request),
            (Some(_), Some(_)) => Err(Error::AmbiguousFormRequest(name.to_string())),
            _ => Err(Error::FormRequestNotFound(name.to_string())),
        }
    }
}
