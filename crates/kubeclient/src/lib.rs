//! # kubeclient
//!
//! Drive a Kubernetes cluster through its command-line tool (`kubectl` or
//! `oc`) from Rust.
//!
//! This crate provides functionality for:
//! - Creating, replacing and deleting trees of YAML descriptors in a
//!   dependency-friendly order
//! - Waiting, with bounded polling, for deployments, pods, stateful sets and
//!   arbitrary resources to become ready, appear, disappear or be recreated
//! - Temporarily switching namespace or assuming elevated privileges
//!
//! ## Example
//!
//! ```no_run
//! use kubeclient::{Client, Tool};
//!
//! let mut client = Client::new(Tool::Kubectl).expect("kubectl not available");
//!
//! // Everything below runs in the "kafka" namespace
//! let previous = client.set_namespace("kafka").unwrap();
//!
//! client
//!     .create(&["install/cluster-operator"])
//!     .and_then(|c| c.wait_for_deployment("strimzi-cluster-operator"))
//!     .expect("operator did not come up");
//!
//! for pod in client.list("pods").unwrap() {
//!     println!("{pod}");
//! }
//!
//! client.set_namespace(previous).unwrap();
//! ```
//!
//! ## Timeouts
//!
//! Readiness waits poll once a second for up to 570 seconds; deletion and
//! update waits for up to 240 seconds. Override either budget with
//! [`ClientConfig`] and [`WaitConfig`].
//!
//! ```no_run
//! use kubeclient::{Client, ClientConfig, Tool, WaitConfig};
//! use std::time::Duration;
//!
//! let quick = WaitConfig::new(Duration::from_millis(500), Duration::from_secs(60)).unwrap();
//! let client = Client::new(Tool::Oc)
//!     .unwrap()
//!     .with_config(ClientConfig::default().with_readiness(quick));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod client;
pub mod clock;
pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod readiness;
pub mod scope;
pub mod types;
pub mod wait;

pub use batch::{SortOrder, Subcommand};
pub use client::Client;
pub use clock::{Clock, ManualClock, SystemClock};
pub use command::Command;
pub use config::{ClientConfig, DEFAULT_ADMIN_USER};
pub use error::{BatchFailure, Error, ErrorCategory, Result};
pub use executor::{Executor, MockExecutor, MockResponse, ProcessExecutor};
pub use scope::{AdminScope, NamespaceScope};
pub use types::{ExecOutput, Tool};
pub use wait::WaitConfig;
