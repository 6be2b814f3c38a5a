//! This module provides reusable test utilities:
//! - Mock HTTP servers (EC2 API, instance metadata)
//! - In-memory freeze primitive and snapshot backend
//! - Fake freeze tool scripts

// Not every test binary uses every fixture
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fake_freeze_tool;
pub mod mock_ec2;
pub mod mock_metadata;
pub mod recording;

// Re-export commonly used items
pub use fake_freeze_tool::FakeFreezeTool;
pub use mock_ec2::MockEc2Server;
pub use mock_metadata::MockMetadataServer;
pub use recording::{RecordingFreezer, ScriptedBackend};
