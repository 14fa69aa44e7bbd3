//! Authenticated client for the homeserver's client-server API.

use crate::config::Connection;
use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::debug;

const CLIENT_API: [&str; 3] = ["_matrix", "client", "r0"];

#[derive(Debug, Clone)]
pub struct MatrixClient {
    http: reqwest::Client,
    base: Url,
}

#[derive(Debug, Deserialize)]
struct DirectoryEntry {
    room_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JoinedRooms {
    joined_rooms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct JoinedMembers {
    #[serde(default)]
    joined: BTreeMap<String, Member>,
}

/// Profile of a joined room member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Presence {
    #[serde(default)]
    last_active_ago: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SyncResponse {
    #[serde(default)]
    rooms: SyncRooms,
}

#[derive(Debug, Default, Deserialize)]
struct SyncRooms {
    #[serde(default)]
    join: BTreeMap<String, JoinedRoom>,
}

#[derive(Debug, Default, Deserialize)]
struct JoinedRoom {
    #[serde(default)]
    state: StateEvents,
}

#[derive(Debug, Default, Deserialize)]
struct StateEvents {
    #[serde(default)]
    events: Vec<StateEvent>,
}

#[derive(Debug, Deserialize)]
struct StateEvent {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    state_key: Option<String>,
    #[serde(default)]
    content: Value,
}

impl StateEvent {
    fn is_join_of(&self, user_id: &str) -> bool {
        self.event_type == "m.room.member"
            && self.state_key.as_deref() == Some(user_id)
            && self.content.get("membership").and_then(Value::as_str) == Some("join")
    }
}

#[derive(Debug, Deserialize)]
struct MatrixErrorBody {
    #[serde(default = "unknown_errcode")]
    errcode: String,
    #[serde(default)]
    error: String,
}

fn unknown_errcode() -> String {
    "M_UNKNOWN".to_string()
}

impl MatrixClient {
    pub fn new(connection: &Connection) -> Result<Self> {
        let base = Url::parse(&connection.homeserver).map_err(|e| Error::InvalidHomeserver {
            url: connection.homeserver.clone(),
            message: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidHomeserver {
                url: connection.homeserver.clone(),
                message: "not a base URL".to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", connection.token))
            .map_err(|_| Error::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self { http, base })
    }

    /// Client API URL for the given path segments, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(CLIENT_API).extend(segments);
        }
        url
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::api_error(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| Error::UnexpectedResponse(e.to_string()))
    }

    async fn put<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<Value> {
        debug!(%url, "PUT");
        let response = self.http.put(url).json(body).send().await?;
        Self::write_response(response).await
    }

    async fn post<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<Value> {
        debug!(%url, "POST");
        let response = self.http.post(url).json(body).send().await?;
        Self::write_response(response).await
    }

    async fn write_response(response: reqwest::Response) -> Result<Value> {
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| Error::UnexpectedResponse(e.to_string()))
    }

    async fn api_error(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = response
            .json::<MatrixErrorBody>()
            .await
            .unwrap_or_else(|_| MatrixErrorBody {
                errcode: unknown_errcode(),
                error: "Unknown error".to_string(),
            });
        Error::Api {
            status,
            errcode: body.errcode,
            message: body.error,
        }
    }

    /// Look up the room an alias points to.
    pub async fn resolve_alias(&self, alias: &str) -> Result<String> {
        let entry: DirectoryEntry = self
            .get(self.endpoint(&["directory", "room", alias]))
            .await?;
        entry
            .room_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::UnresolvedAlias(alias.to_string()))
    }

    pub async fn power_levels(&self, room_id: &str) -> Result<Value> {
        self.get(self.power_levels_url(room_id)).await
    }

    pub async fn set_power_levels(&self, room_id: &str, event: &Value) -> Result<()> {
        self.put(self.power_levels_url(room_id), event).await?;
        Ok(())
    }

    fn power_levels_url(&self, room_id: &str) -> Url {
        self.endpoint(&["rooms", room_id, "state", "m.room.power_levels"])
    }

    /// Rooms the token's user has joined.
    pub async fn joined_rooms(&self) -> Result<Vec<String>> {
        let rooms: JoinedRooms = self.get(self.endpoint(&["joined_rooms"])).await?;
        Ok(rooms.joined_rooms)
    }

    pub async fn joined_members(&self, room_id: &str) -> Result<BTreeMap<String, Member>> {
        let members: JoinedMembers = self
            .get(self.endpoint(&["rooms", room_id, "joined_members"]))
            .await?;
        Ok(members.joined)
    }

    /// Set the display name of `user_id`, acting as that user.
    pub async fn set_display_name(&self, user_id: &str, display_name: &str) -> Result<Value> {
        let mut url = self.endpoint(&["profile", user_id, "displayname"]);
        url.query_pairs_mut().append_pair("user_id", user_id);
        self.put(url, &json!({ "displayname": display_name })).await
    }

    /// Milliseconds since the user was last active, if the server knows.
    pub async fn last_active_ago(&self, user_id: &str) -> Result<Option<u64>> {
        let presence: Presence = self
            .get(self.endpoint(&["presence", user_id, "status"]))
            .await?;
        Ok(presence.last_active_ago)
    }

    /// Make `user_id` leave `room_id` by rewriting their membership event.
    pub async fn leave_member(&self, room_id: &str, user_id: &str, reason: &str) -> Result<()> {
        let url = self.endpoint(&["rooms", room_id, "state", "m.room.member", user_id]);
        self.put(url, &json!({ "membership": "leave", "reason": reason }))
            .await?;
        Ok(())
    }

    /// Rooms in which a sync shows `user_id` as joined.
    pub async fn joined_rooms_of(&self, user_id: &str) -> Result<Vec<String>> {
        let sync: SyncResponse = self.get(self.endpoint(&["sync"])).await?;
        Ok(sync
            .rooms
            .join
            .into_iter()
            .filter(|(_, room)| room.state.events.iter().any(|e| e.is_join_of(user_id)))
            .map(|(room_id, _)| room_id)
            .collect())
    }

    pub async fn kick(&self, room_id: &str, user_id: &str, reason: &str) -> Result<()> {
        let url = self.endpoint(&["rooms", room_id, "kick"]);
        self.post(url, &json!({ "user_id": user_id, "reason": reason }))
            .await?;
        Ok(())
    }
}
