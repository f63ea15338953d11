use async_trait::async_trait;
use futures::FutureExt;
use rmcp::model::CallToolResult;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error};

use crate::error::WorkspaceError;
use crate::schema::ToolDescriptor;
use crate::utils::error_result;
use crate::ToolArgs;

/// One tool: a descriptor plus the call it performs.
#[async_trait]
pub trait Command: Send + Sync {
    fn descriptor(&self) -> ToolDescriptor;

    async fn execute(&self, args: &ToolArgs) -> Result<CallToolResult, WorkspaceError>;
}

/// A named group of tools backed by one API surface.
///
/// `execute` never fails: every problem comes back as an `isError` result.
#[async_trait]
pub trait WorkspaceService: Send + Sync {
    fn tools(&self) -> Vec<ToolDescriptor>;

    async fn execute(&self, name: &str, args: ToolArgs) -> CallToolResult;

    fn has_tool(&self, name: &str) -> bool {
        self.tools().iter().any(|t| t.name == name)
    }
}

pub struct CommandService {
    name: String,
    commands: Vec<(String, Box<dyn Command>)>,
}

impl CommandService {
    /// Commands keep their given order. A repeated tool name replaces the
    /// earlier command in its original slot.
    pub fn new(name: &str, commands: Vec<Box<dyn Command>>) -> Self {
        let mut table: Vec<(String, Box<dyn Command>)> = Vec::with_capacity(commands.len());
        for command in commands {
            let tool = command.descriptor().name;
            match table.iter_mut().find(|(n, _)| *n == tool) {
                Some(slot) => slot.1 = command,
                None => table.push((tool, command)),
            }
        }
        Self {
            name: name.to_string(),
            commands: table,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn command(&self, tool: &str) -> Option<&dyn Command> {
        self.commands
            .iter()
            .find(|(n, _)| n == tool)
            .map(|(_, c)| c.as_ref())
    }
}

#[async_trait]
impl WorkspaceService for CommandService {
    fn tools(&self) -> Vec<ToolDescriptor> {
        self.commands.iter().map(|(_, c)| c.descriptor()).collect()
    }

    fn has_tool(&self, name: &str) -> bool {
        self.command(name).is_some()
    }

    async fn execute(&self, name: &str, args: ToolArgs) -> CallToolResult {
        let Some(command) = self.command(name) else {
            return error_result(format!("Unknown tool '{}'", name));
        };
        debug!(service = %self.name, tool = name, "executing command");

        match AssertUnwindSafe(command.execute(&args)).catch_unwind().await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                debug!(tool = name, code = e.code_str(), "command failed: {}", e);
                error_result(e)
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(tool = name, "command panicked: {}", message);
                error_result(message)
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "command panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Param;
    use crate::utils::{is_error, result_text, text_result};

    struct Fixed {
        name: &'static str,
        reply: &'static str,
    }

    #[async_trait]
    impl Command for Fixed {
        fn descriptor(&self) -> ToolDescriptor {
            ToolDescriptor::new(self.name, "fixed", vec![Param::string("x")])
        }

        async fn execute(&self, _args: &ToolArgs) -> Result<CallToolResult, WorkspaceError> {
            match self.reply {
                "panic" => panic!("exploded"),
                "fail" => Err(WorkspaceError::RemoteCall("Failed to do it: 503".into())),
                other => Ok(text_result(other)),
            }
        }
    }

    fn boxed(name: &'static str, reply: &'static str) -> Box<dyn Command> {
        Box::new(Fixed { name, reply })
    }

    #[tokio::test]
    async fn unknown_tool_is_a_structured_failure() {
        let svc = CommandService::new("t", vec![boxed("a", "ok")]);
        let r = svc.execute("zzz", ToolArgs::new()).await;
        assert!(is_error(&r));
        assert_eq!(result_text(&r), "Error: Unknown tool 'zzz'");
    }

    #[tokio::test]
    async fn errors_and_panics_are_contained() {
        let svc = CommandService::new("t", vec![boxed("f", "fail"), boxed("p", "panic")]);

        let r = svc.execute("f", ToolArgs::new()).await;
        assert!(is_error(&r));
        assert_eq!(result_text(&r), "Error: Failed to do it: 503");

        let r = svc.execute("p", ToolArgs::new()).await;
        assert!(is_error(&r));
        assert_eq!(result_text(&r), "Error: exploded");
    }

    #[tokio::test]
    async fn repeated_name_replaces_in_place() {
        let svc = CommandService::new(
            "t",
            vec![boxed("a", "first"), boxed("b", "b"), boxed("a", "second")],
        );
        let names: Vec<String> = svc.tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a", "b"]);
        let r = svc.execute("a", ToolArgs::new()).await;
        assert_eq!(result_text(&r), "second");
    }
}
