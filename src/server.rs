//! MCP stdio adapter over the gateway.
//!
//! Every tool absorbs gateway errors into its text response after logging
//! them; callers only ever receive a string, never a protocol-level fault.

use rmcp::{
    handler::server::router::tool::ToolRouter,
    handler::server::tool::Parameters,
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::future::Future;

use crate::error::Error;
use crate::gateway::Gateway;
use crate::odbc::OdbcDriver;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DatabaseArgs {
    /// The name of the database to use (default: "default")
    #[serde(default)]
    pub database_name: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct QueryArgs {
    /// The SQL query to execute (SELECT only)
    pub sql: String,
    /// The name of the database to use (default: "default")
    #[serde(default)]
    pub database_name: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DescribeTableArgs {
    /// The name of the table to describe
    pub table_name: String,
    /// The name of the database to use (default: "default")
    #[serde(default)]
    pub database_name: Option<String>,
}

/// The MCP-facing tool surface.
pub struct AccessGateway {
    gateway: Gateway<OdbcDriver>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl AccessGateway {
    pub fn new(gateway: Gateway<OdbcDriver>) -> Self {
        Self {
            gateway,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "List all available databases.")]
    async fn list_databases(&self) -> Result<CallToolResult, McpError> {
        Ok(text(self.gateway.list_databases()))
    }

    #[tool(description = "List all tables in the specified Access database.")]
    async fn list_tables(
        &self,
        Parameters(args): Parameters<DatabaseArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(absorb(self.gateway.list_tables(args.database_name.as_deref())))
    }

    #[tool(description = "Execute a SQL SELECT query against the specified Access database.")]
    async fn query(
        &self,
        Parameters(args): Parameters<QueryArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(absorb(
            self.gateway.query(&args.sql, args.database_name.as_deref()),
        ))
    }

    #[tool(
        description = "Get the structure of a specific table including column names and types."
    )]
    async fn describe_table(
        &self,
        Parameters(args): Parameters<DescribeTableArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(absorb(
            self.gateway
                .describe_table(&args.table_name, args.database_name.as_deref()),
        ))
    }

    #[tool(description = "Get information about the database connection configuration.")]
    async fn get_connection_info(
        &self,
        Parameters(args): Parameters<DatabaseArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(absorb(
            self.gateway.connection_info(args.database_name.as_deref()),
        ))
    }
}

#[tool_handler]
impl ServerHandler for AccessGateway {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Read-only gateway to Microsoft Access databases over ODBC. \
                 Use list_databases to see configured databases, list_tables and \
                 describe_table to explore a schema, and query to run SELECT statements."
                    .to_string(),
            ),
        }
    }
}

/// Convert a handler outcome into the tool response, logging any absorbed
/// error at error severity first.
fn absorb(result: Result<String, Error>) -> CallToolResult {
    match result {
        Ok(s) => text(s),
        Err(e) => {
            tracing::error!("{}", e);
            text(e.user_message())
        }
    }
}

fn text(s: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(s)])
}
