//! Slack bot that resumes paused Kestra executions.
//!
//! Receives Slack webhook deliveries over HTTP. Mentioning the bot with
//! `"<@bot>, will you review Kestra Execution ID: <id>?"` posts a
//! "Resume Workflow" button in the thread; clicking it calls the Kestra
//! resume endpoint and reports the outcome back in the same thread.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod formatter;
pub mod handlers;
pub mod kestra;
pub mod server;
pub mod signature;
pub mod slack_client;
pub mod state;
pub mod trigger;
