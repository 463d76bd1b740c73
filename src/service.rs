use rmcp::{
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
        ServerHandler,
    },
    model::{
        AnnotateAble, CallToolRequestParam, CallToolResult, Content, Implementation,
        ListResourcesResult, ListToolsResult, PaginatedRequestParam, ProtocolVersion, RawResource,
        ReadResourceRequestParam, ReadResourceResult, Resource, ResourceContents,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, ServerInitializeError},
    transport::IntoTransport,
    tool, tool_router, ErrorData as McpError, RoleServer, ServiceExt,
};
use serde_json::json;

use crate::constants::{AGENTS_RESOURCE_URI, SERVER_NAME, SERVER_VERSION, TOOLS_RESOURCE_URI};
use crate::error::GatewayError;
use crate::formatters::pretty_json;
use crate::gateway::Gateway;
use crate::models::{ChatWithAgentRequest, GetWeatherRequest};

const JSON_MIME: &str = "application/json";

/// Stdio tool/resource server over the shared gateway
#[derive(Clone)]
pub struct GatewayService {
    gateway: Gateway,
    tool_router: ToolRouter<Self>,
}

impl GatewayService {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            tool_router: Self::tool_router(),
        }
    }

    fn has_tool(&self, name: &str) -> bool {
        self.tool_router
            .list_all()
            .iter()
            .any(|tool| tool.name == name)
    }

    /// Resources advertised to clients
    pub fn resource_list() -> Vec<Resource> {
        vec![
            json_resource(
                AGENTS_RESOURCE_URI,
                "Available Agents",
                "List of available Mastra agents",
            ),
            json_resource(
                TOOLS_RESOURCE_URI,
                "Available Tools",
                "List of available Mastra tools",
            ),
        ]
    }

    /// Contents of a registry resource
    pub fn read_document(uri: &str) -> Result<ReadResourceResult, GatewayError> {
        let body = match uri {
            AGENTS_RESOURCE_URI => pretty_json(&json!({ "agents": Gateway::agents() }))?,
            TOOLS_RESOURCE_URI => pretty_json(&json!({ "tools": Gateway::tools() }))?,
            _ => return Err(GatewayError::UnknownResource(uri.to_string())),
        };

        let mut contents = ResourceContents::text(body, uri);
        if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
            *mime_type = Some(JSON_MIME.to_string());
        }

        Ok(ReadResourceResult {
            contents: vec![contents],
        })
    }
}

fn json_resource(uri: &str, name: &str, description: &str) -> Resource {
    let mut raw = RawResource::new(uri, name);
    raw.description = Some(description.to_string());
    raw.mime_type = Some(JSON_MIME.to_string());
    raw.no_annotation()
}

/// Tool failures are reported in-band so the caller's model can read them
fn error_result(message: &str) -> CallToolResult {
    let message = if message.is_empty() {
        "Unknown error"
    } else {
        message
    };
    CallToolResult::error(vec![Content::text(format!("Error: {}", message))])
}

fn tool_result(outcome: Result<String, GatewayError>) -> CallToolResult {
    match outcome {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => {
            tracing::warn!("Tool call failed: {}", e);
            error_result(&e.to_string())
        }
    }
}

impl ServerHandler for GatewayService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Weather lookups powered by Open-Meteo and a conversational weather agent. \
                Use get_weather for current conditions and chat_with_agent for questions. \
                The mastra://agents and mastra://tools resources list what is available."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tool_router.list_all()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        if !self.has_tool(&request.name) {
            let err = GatewayError::UnknownTool(request.name.to_string());
            tracing::warn!("{}", err);
            return Ok(error_result(&err.to_string()));
        }

        let call = ToolCallContext::new(self, request, context);
        match self.tool_router.call(call).await {
            Ok(result) => Ok(result),
            // Argument decoding problems land here.
            Err(e) => Ok(error_result(&e.message)),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(Self::resource_list()))
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        tracing::info!("Reading resource: {}", uri);
        Self::read_document(&uri).map_err(|e| McpError::resource_not_found(e.to_string(), None))
    }
}

#[tool_router]
impl GatewayService {
    /// Gets current weather for a place name
    #[tool(description = "Get weather information for a location")]
    pub async fn get_weather(
        &self,
        Parameters(request): Parameters<GetWeatherRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Getting weather for location: {}", request.location);

        let outcome = self
            .gateway
            .weather(&request.location)
            .await
            .and_then(|weather| pretty_json(&weather));

        Ok(tool_result(outcome))
    }

    /// Sends a message to a named agent
    #[tool(description = "Chat with the weather agent")]
    pub async fn chat_with_agent(
        &self,
        Parameters(request): Parameters<ChatWithAgentRequest>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self.gateway.chat(&request.agent, &request.message).await;
        Ok(tool_result(outcome))
    }
}

/// Runs the server on stdin/stdout until the client disconnects
pub async fn serve_stdio(gateway: Gateway) -> anyhow::Result<()> {
    tracing::info!("Mastra MCP server running on stdio");
    serve_transport(gateway, rmcp::transport::stdio()).await
}

/// Serves one client session on `transport`. A peer that hangs up before
/// finishing the handshake ends the session normally.
pub async fn serve_transport<T, E, A>(gateway: Gateway, transport: T) -> anyhow::Result<()>
where
    T: IntoTransport<RoleServer, E, A>,
    E: std::error::Error + Send + Sync + 'static,
{
    let server = match GatewayService::new(gateway).serve(transport).await {
        Ok(server) => server,
        Err(ServerInitializeError::ConnectionClosed(context)) => {
            tracing::info!("Client disconnected before initialization: {}", context);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let reason = server.waiting().await?;
    tracing::info!("Server shutdown complete: {:?}", reason);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(result: &CallToolResult) -> String {
        result.content[0]
            .as_text()
            .map(|t| t.text.clone())
            .expect("text content")
    }

    #[test]
    fn error_results_are_flagged_and_prefixed() {
        let result = error_result("Agent other not found");
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "Error: Agent other not found");

        assert_eq!(text_of(&error_result("")), "Error: Unknown error");
    }

    #[test]
    fn resource_list_is_json_registry_documents() {
        let resources = GatewayService::resource_list();
        let uris: Vec<&str> = resources.iter().map(|r| r.uri.as_str()).collect();
        assert_eq!(uris, vec![AGENTS_RESOURCE_URI, TOOLS_RESOURCE_URI]);
        assert!(resources
            .iter()
            .all(|r| r.mime_type.as_deref() == Some(JSON_MIME)));
    }

    #[test]
    fn reads_tools_document() {
        let result = GatewayService::read_document(TOOLS_RESOURCE_URI).unwrap();
        match &result.contents[0] {
            ResourceContents::TextResourceContents {
                uri,
                mime_type,
                text,
                ..
            } => {
                assert_eq!(uri, TOOLS_RESOURCE_URI);
                assert_eq!(mime_type.as_deref(), Some(JSON_MIME));
                assert_eq!(text, "{\n  \"tools\": [\n    \"weather\"\n  ]\n}");
            }
            other => panic!("unexpected contents: {:?}", other),
        }
    }

    #[test]
    fn unknown_document_is_an_error() {
        let err = GatewayService::read_document("mastra://nope").unwrap_err();
        assert_eq!(err.to_string(), "Unknown resource: mastra://nope");
    }
}
