//! Events emitted to the host, and the payload it sends back in remote mode

use gridstate_core::GridState;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EngineResult;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Remote mode: the state changed and the host should fetch this page
    StateChanged(GridState),
    /// A page of rows is ready to render, `total` rows after filtering
    PageComputed { total: usize },
}

/// One page of rows returned by a remote source: `{ "data": [...], "total": n }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemotePage {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub total: usize,
}

impl RemotePage {
    pub fn new(data: Vec<Value>, total: usize) -> Self {
        Self { data, total }
    }

    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
