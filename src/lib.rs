//! # Santuri MCP
//!
//! An MCP server that answers documentation questions by forwarding them to
//! the Santuri API and rendering the replies as Markdown text.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌────────────┐   ┌─────────────┐
//! │ MCP/HTTP │──▶│ ToolRegistry │──▶│ search /   │──▶│  ApiClient  │──▶ Santuri API
//! │ (stdio)  │   │  dispatch    │   │ sources    │   │  (reqwest)  │
//! └──────────┘   └──────────────┘   └────────────┘   └─────────────┘
//!                                         │
//!                                         ▼
//!                                   rendered text
//! ```
//!
//! All retrieval intelligence lives in the remote service. This crate
//! resolves configuration, issues one authenticated request per tool call,
//! and turns the result (or the failure) into a single text block.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Environment-derived connection settings, cached per process |
//! | [`client`] | HTTP gateway and the [`client::DocsApi`] trait |
//! | [`models`] | Wire types for the API |
//! | [`error`] | Gateway and tool error types |
//! | [`search`] | `search_documentation` tool |
//! | [`sources`] | `list_sources` tool |
//! | [`traits`] | Tool trait, context, result envelope, registry |
//! | [`mcp`] | MCP protocol bridge (stdio) |
//! | [`server`] | JSON HTTP tool API |

pub mod client;
pub mod config;
pub mod error;
pub mod mcp;
pub mod models;
pub mod search;
pub mod server;
pub mod sources;
pub mod traits;
