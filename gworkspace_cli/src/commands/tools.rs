use std::sync::Arc;

use gworkspace_core::google_api::RecordingApi;
use gworkspace_core::{build_service_manager, ServiceManager, ToolDescriptor};

use crate::cli::Cli;
use crate::commands::{CommandError, Result};
use crate::output::{format_output, OutputData, ParamRow, ToolRow};

/// Listing never reaches Google, so no token is needed.
fn offline_manager() -> ServiceManager {
    build_service_manager(Arc::new(RecordingApi::new()))
}

pub async fn run(cli: &Cli, service: Option<&str>) -> Result<()> {
    let manager = offline_manager();
    let tools = collect_rows(&manager, service)?;
    format_output(
        &OutputData::ToolsList {
            service: service.map(str::to_string),
            tools,
        },
        &cli.output,
    )
}

fn collect_rows(manager: &ServiceManager, service: Option<&str>) -> Result<Vec<ToolRow>> {
    let names: Vec<&str> = match service {
        Some(s) => {
            if manager.service_tools(s).is_none() {
                return Err(CommandError::InvalidArgs(format!(
                    "unknown service '{}' (available: {})",
                    s,
                    manager.service_names().join(", ")
                )));
            }
            vec![s]
        }
        None => manager.service_names(),
    };

    Ok(names
        .into_iter()
        .flat_map(|name| {
            manager
                .service_tools(name)
                .unwrap_or_default()
                .into_iter()
                .map(move |d| row(name, &d))
        })
        .collect())
}

fn row(service: &str, descriptor: &ToolDescriptor) -> ToolRow {
    ToolRow {
        service: service.to_string(),
        name: descriptor.name.clone(),
        description: descriptor.description.clone(),
        parameters: descriptor
            .schema
            .params
            .iter()
            .map(|p| ParamRow {
                name: p.name.clone(),
                kind: p.param_type.json_type().to_string(),
                required: p.required,
                default: p.default.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_follow_registration_order() {
        let rows = collect_rows(&offline_manager(), None).unwrap();
        assert_eq!(rows.first().unwrap().name, "slides_create_presentation");
        assert_eq!(rows.last().unwrap().service, "drive");
    }

    #[test]
    fn filter_by_service() {
        let rows = collect_rows(&offline_manager(), Some("sheets")).unwrap();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| r.name.starts_with("sheets_")));
        assert!(collect_rows(&offline_manager(), Some("gmail")).is_err());
    }
}
