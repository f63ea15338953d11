use rmcp::model::CallToolResult;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::schema::ToolDescriptor;
use crate::service::WorkspaceService;
use crate::utils::error_result;
use crate::ToolArgs;

/// Every registered service, in registration order.
#[derive(Default)]
pub struct ServiceManager {
    services: Vec<(String, Arc<dyn WorkspaceService>)>,
}

impl ServiceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering a name twice replaces the first service but keeps its slot.
    pub fn register_service(&mut self, name: &str, service: Arc<dyn WorkspaceService>) {
        for tool in service.tools() {
            if let Some((owner, _)) = self
                .services
                .iter()
                .find(|(n, s)| n != name && s.has_tool(&tool.name))
            {
                warn!(
                    "Tool '{}' from service '{}' is already provided by '{}'; calls will go to '{}'",
                    tool.name, name, owner, owner
                );
            }
        }

        match self.services.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = service,
            None => self.services.push((name.to_string(), service)),
        }
        info!("Registered service: {}", name);
    }

    pub fn service_names(&self) -> Vec<&str> {
        self.services.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// All descriptors, service by service. Duplicates are not removed.
    pub fn tools(&self) -> Vec<ToolDescriptor> {
        self.services.iter().flat_map(|(_, s)| s.tools()).collect()
    }

    pub fn service_tools(&self, service: &str) -> Option<Vec<ToolDescriptor>> {
        self.services
            .iter()
            .find(|(n, _)| n == service)
            .map(|(_, s)| s.tools())
    }

    /// Descriptor of the tool that a call to `name` would reach.
    pub fn descriptor(&self, name: &str) -> Option<ToolDescriptor> {
        self.services
            .iter()
            .flat_map(|(_, s)| s.tools())
            .find(|t| t.name == name)
    }

    /// Tool names offered by more than one service.
    pub fn duplicate_tools(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        let mut dups: Vec<String> = Vec::new();
        for tool in self.tools() {
            if seen.contains(&tool.name) {
                if !dups.contains(&tool.name) {
                    dups.push(tool.name);
                }
            } else {
                seen.push(tool.name);
            }
        }
        dups
    }

    /// Route to the first service that lists `name`.
    pub async fn handle_tool_call(&self, name: &str, args: ToolArgs) -> CallToolResult {
        for (service_name, service) in &self.services {
            if service.has_tool(name) {
                debug!("Dispatching '{}' to service '{}'", name, service_name);
                return service.execute(name, args).await;
            }
        }
        error_result(format!("No service found to handle tool '{}'", name))
    }
}
