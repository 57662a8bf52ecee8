/// Model Context Protocol front end
///
/// `protocol` holds the JSON-RPC and MCP wire types; `server` reads requests
/// from stdin and routes `tools/call` to the functions in `crate::tools`.

pub mod protocol;
pub mod server;

pub use server::{tool_definitions, McpServer};
