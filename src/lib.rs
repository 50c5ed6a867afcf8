//! # Resource Adapter Tuner Library
//!
//! This library reconciles the tuning of a messaging resource adapter across
//! a cell/node/server hierarchy. It is used by the `ra-tuner` command-line
//! tool but works against any backend that implements
//! [`directory::DirectoryService`].
//!
//! ## Quick Example
//!
//! ```
//! use ra_tuner::config::TuningSpec;
//! use ra_tuner::directory::MemoryDirectory;
//! use ra_tuner::engine::Reconciler;
//!
//! let mut directory = MemoryDirectory::parse(r#"
//! cell: Cell01
//! runtime_configs:
//!   - id: server1
//!     scope: /Cell:Cell01/Node:Node01/Server:server1/
//!     arguments:
//!       genericJvmArguments: "-Xmx512m"
//!       debugArgs: ""
//! "#).unwrap();
//!
//! let spec = TuningSpec::default();
//! let report = Reconciler::new(&spec).run(&mut directory).unwrap();
//! assert!(report.committed());
//!
//! let args = &directory.topology().runtime_configs[0].arguments["genericJvmArguments"];
//! assert!(args.starts_with("-Xmx512m -Dcom.ibm.mq"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Tuning (`config`)**: the immutable [`config::TuningSpec`] holding the
//!   desired adapter properties and `-D` argument settings, parsed from YAML.
//! - **Directory Service (`directory`)**: the administrative backend trait,
//!   with an in-memory implementation over a YAML topology snapshot.
//! - **Classification (`classify`)**: picks the tuned adapters out of all
//!   adapters of a kind.
//! - **Reconciliation (`reconcile`)**: writes desired values into properties
//!   the adapter actually has.
//! - **Merge (`merge`)**: the pure, idempotent merge of one `-D<key>=<value>`
//!   token into a free-form argument string.
//! - **Engine (`engine`)**: runs all of the above across the hierarchy and
//!   commits once, collecting a [`report::ReconciliationReport`].

pub mod classify;
pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod merge;
pub mod output;
pub mod reconcile;
pub mod report;
pub mod scope;

#[cfg(test)]
mod merge_proptest;
