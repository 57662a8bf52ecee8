/// Integration test harness: on-disk databases, the change feed and the MCP loop
mod basic_integration;
