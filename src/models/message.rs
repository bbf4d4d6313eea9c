//! Management-protocol message kinds exchanged with the upstream.
//!
//! Only the requests the source issues and the replies it understands are
//! modelled; anything else arrives as [`Response::Other`].

use crate::models::ConnectionRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoType {
    ClientList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnoseKind {
    OpenConnections,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    /// Bulk snapshot request.
    GetInfo(InfoType),
    /// Free-text diagnostic request for a single target.
    Diagnose { kind: DiagnoseKind, target: String },
}

impl Request {
    pub fn client_list() -> Self {
        Self::GetInfo(InfoType::ClientList)
    }

    /// Diagnostic request listing the open subscriptions of one connection.
    pub fn open_connections(target: impl Into<String>) -> Self {
        Self::Diagnose {
            kind: DiagnoseKind::OpenConnections,
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    LoginInfo(ConnectionRecord),
    Text(String),
    Other { kind: String },
}

impl Response {
    /// Message kind name, used in protocol error reports.
    pub fn kind(&self) -> &str {
        match self {
            Self::LoginInfo(_) => "LoginInfo",
            Self::Text(_) => "Text",
            Self::Other { kind } => kind,
        }
    }
}
