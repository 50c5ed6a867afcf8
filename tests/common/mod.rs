//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new().with_topology(topologies::CELL);
//! fixture.command().arg("apply").assert().success();
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::topologies;
    pub use super::TestFixture;
}

/// Topology snapshots used across tests.
#[allow(dead_code)]
pub mod topologies {
    /// A cell with MQ adapters at cell, node and server scope, one
    /// unrelated adapter, and two servers.
    pub const CELL: &str = r#"
cell: Cell01
resources:
  - id: mqra-cell
    kind: J2CResourceAdapter
    scope: /Cell:Cell01/
    description: Built In WebSphere MQ Resource Adapter
    properties:
      - { name: maxConnections, value: 10 }
      - { name: connectionConcurrency, value: 5 }
      - { name: reconnectionRetryCount, value: 5 }
      - { name: reconnectionRetryInterval, value: 300000 }
      - { name: startupRetryCount, value: 0 }
      - { name: startupRetryInterval, value: 30000 }
  - id: mqra-node01
    kind: J2CResourceAdapter
    scope: /Cell:Cell01/Node:Node01/
    description: Built In WebSphere MQ Resource Adapter
    properties:
      - { name: maxConnections, value: 10 }
      - { name: connectionConcurrency, value: 5 }
  - id: mqra-server1
    kind: J2CResourceAdapter
    scope: /Cell:Cell01/Node:Node01/Server:server1/
    description: Built In WebSphere MQ Resource Adapter
    properties:
      - { name: maxConnections, value: 10 }
      - { name: startupRetryCount, value: 0 }
  - id: sib-ra
    kind: J2CResourceAdapter
    scope: /Cell:Cell01/
    description: SIB JMS Resource Adapter
    properties:
      - { name: maxConnections, value: 10 }
runtime_configs:
  - id: jvm-server1
    scope: /Cell:Cell01/Node:Node01/Server:server1/
    arguments:
      genericJvmArguments: "-Xmx1024m -Dcom.ibm.mq.cfg.TCP.Connect_Timeout=30 -verbose:gc"
      debugArgs: "-agentlib:jdwp=transport=dt_socket,server=y,suspend=n,address=7777"
  - id: jvm-server2
    scope: /Cell:Cell01/Node:Node02/Server:server2/
    arguments:
      genericJvmArguments: ""
      debugArgs: ""
"#;

    /// The same cell with server2's runtime configuration locked.
    pub const LOCKED_SERVER: &str = r#"
cell: Cell01
resources:
  - id: mqra-cell
    kind: J2CResourceAdapter
    scope: /Cell:Cell01/
    description: Built In WebSphere MQ Resource Adapter
    properties:
      - { name: maxConnections, value: 10 }
runtime_configs:
  - id: jvm-server1
    scope: /Cell:Cell01/Node:Node01/Server:server1/
    arguments:
      genericJvmArguments: ""
  - id: jvm-server2
    scope: /Cell:Cell01/Node:Node02/Server:server2/
    read_only: true
    arguments:
      genericJvmArguments: ""
"#;

    /// MQ adapters where the first refuses writes and the last is writable.
    pub const MIXED_ADAPTERS: &str = r#"
cell: Cell01
resources:
  - id: mqra-locked
    kind: J2CResourceAdapter
    scope: /Cell:Cell01/
    description: Built In WebSphere MQ Resource Adapter
    read_only: true
    properties:
      - { name: maxConnections, value: 10 }
  - id: mqra-node02
    kind: J2CResourceAdapter
    scope: /Cell:Cell01/Node:Node02/
    description: Built In WebSphere MQ Resource Adapter
    properties:
      - { name: maxConnections, value: 10 }
  - id: mqra-server1
    kind: J2CResourceAdapter
    scope: /Cell:Cell01/Node:Node01/Server:server1/
    description: Built In WebSphere MQ Resource Adapter
    properties:
      - { name: maxConnections, value: 10 }
"#;

    /// A tuning file overriding two values and limiting the fields.
    pub const TUNING_OVERRIDE: &str = r#"
properties:
  maxConnections: 500
arguments:
  com.ibm.mq.cfg.TCP.Connect_Timeout: 15
argument_fields: [genericJvmArguments]
"#;
}

/// A temporary directory holding a topology snapshot and optional tuning.
#[allow(dead_code)]
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `topology.yaml` with the given content.
    pub fn with_topology(self, content: &str) -> Self {
        self.temp_dir
            .child("topology.yaml")
            .write_str(content)
            .expect("Failed to write topology");
        self
    }

    /// Write `tuning.yaml` with the given content.
    pub fn with_tuning(self, content: &str) -> Self {
        self.temp_dir
            .child("tuning.yaml")
            .write_str(content)
            .expect("Failed to write tuning");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn topology_path(&self) -> PathBuf {
        self.temp_dir.path().join("topology.yaml")
    }

    pub fn tuning_path(&self) -> PathBuf {
        self.temp_dir.path().join("tuning.yaml")
    }

    pub fn read_topology(&self) -> String {
        std::fs::read_to_string(self.topology_path()).expect("Failed to read topology")
    }

    /// A command for the `ra-tuner` binary running in the fixture directory
    /// with logging and colors quiet.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("ra-tuner");
        cmd.current_dir(self.path())
            .env_remove("RUST_LOG")
            .env_remove("RA_TUNER_TOPOLOGY")
            .env_remove("RA_TUNER_TUNING")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
