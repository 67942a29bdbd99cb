use serde_json::{json, Value};

use super::event::Event;

/// NIP-01 client -> relay messages (subset we need).
#[derive(Debug, Clone)]
pub enum ClientMsg {
    Req { sub_id: String, filters: Vec<Value> },
    Close { sub_id: String },
    Event { event: Event },
}

impl ClientMsg {
    /// Wire form: a JSON array led by the command name.
    pub fn to_json(&self) -> String {
        match self {
            Self::Req { sub_id, filters } => {
                let mut arr = vec![json!("REQ"), json!(sub_id)];
                arr.extend(filters.iter().cloned());
                Value::Array(arr).to_string()
            }
            Self::Close { sub_id } => json!(["CLOSE", sub_id]).to_string(),
            Self::Event { event } => json!(["EVENT", event]).to_string(),
        }
    }
}

/// NIP-01 relay -> client messages (subset we need).
#[derive(Debug, Clone)]
pub enum RelayMsg {
    /// ["EVENT", <sub_id>, <event>]
    Event { sub_id: String, event: Event },
    /// ["EOSE", <sub_id>]
    Eose { sub_id: String },
    /// ["NOTICE", <message>]
    Notice { message: String },
    /// ["OK", <event_id>, <accepted>, <message>]
    Ok {
        event_id: String,
        accepted: bool,
        message: String,
    },
    /// ["CLOSED", <sub_id>, <message>]
    Closed { sub_id: String, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ParseRelayMsgError {
    #[error("expected JSON array")]
    NotArray,
    #[error("missing command")]
    MissingCommand,
    #[error("command must be string")]
    CommandNotString,
    #[error("unsupported command: {0}")]
    UnsupportedCommand(String),
    #[error("invalid message: {0}")]
    Invalid(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn str_at(arr: &[Value], idx: usize, what: &str) -> Result<String, ParseRelayMsgError> {
    arr.get(idx)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| ParseRelayMsgError::Invalid(format!("missing {what}")))
}

pub fn parse_relay_msg(text: &str) -> Result<RelayMsg, ParseRelayMsgError> {
    let v: Value = serde_json::from_str(text)?;
    let arr = v.as_array().ok_or(ParseRelayMsgError::NotArray)?;
    let cmd = arr
        .first()
        .ok_or(ParseRelayMsgError::MissingCommand)?
        .as_str()
        .ok_or(ParseRelayMsgError::CommandNotString)?;

    match cmd {
        "EVENT" => {
            let sub_id = str_at(arr, 1, "EVENT sub_id")?;
            let ev_v = arr
                .get(2)
                .ok_or_else(|| ParseRelayMsgError::Invalid("EVENT missing event".into()))?;
            let event: Event = serde_json::from_value(ev_v.clone())?;
            Ok(RelayMsg::Event { sub_id, event })
        }
        "EOSE" => Ok(RelayMsg::Eose {
            sub_id: str_at(arr, 1, "EOSE sub_id")?,
        }),
        "NOTICE" => Ok(RelayMsg::Notice {
            message: str_at(arr, 1, "NOTICE message")?,
        }),
        "OK" => Ok(RelayMsg::Ok {
            event_id: str_at(arr, 1, "OK event id")?,
            accepted: arr
                .get(2)
                .and_then(|v| v.as_bool())
                .ok_or_else(|| ParseRelayMsgError::Invalid("OK missing status".into()))?,
            message: arr
                .get(3)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
        }),
        "CLOSED" => Ok(RelayMsg::Closed {
            sub_id: str_at(arr, 1, "CLOSED sub_id")?,
            message: arr
                .get(2)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
        }),
        other => Err(ParseRelayMsgError::UnsupportedCommand(other.to_string())),
    }
}
