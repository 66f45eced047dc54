//! Opaque pagination cursors.
//!
//! A cursor is a stack of [`Frame`]s, each scoped to one resource type and
//! carrying that type's raw upstream `next_page_token`. The stack is
//! serialized as JSON and wrapped in URL-safe base64 so the orchestrator
//! can persist and replay it verbatim.
//!
//! ```rust
//! use zoomsync::cursor;
//! use zoomsync::types::ResourceType;
//!
//! // First call: empty cursor, empty upstream page.
//! let (state, page) = cursor::decode("", ResourceType::User)?;
//! assert_eq!(page, "");
//!
//! // More pages upstream: the next cursor carries the token.
//! let next = cursor::encode(state, "tok-2")?;
//! let (state, page) = cursor::decode(&next, ResourceType::User)?;
//! assert_eq!(page, "tok-2");
//!
//! // Upstream exhausted: terminal (empty) cursor.
//! assert_eq!(cursor::encode(state, "")?, "");
//! # Ok::<(), zoomsync::Error>(())
//! ```

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::types::ResourceType;

/// Pagination state for one resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Resource type the frame belongs to.
    pub resource_type: ResourceType,
    /// Resource the listing is scoped to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Upstream next-page token. Empty means "first page".
    #[serde(default)]
    pub token: String,
}

impl Frame {
    /// Creates a frame on the first page of `resource_type`.
    pub fn new(resource_type: ResourceType) -> Self {
        Self {
            resource_type,
            resource_id: None,
            token: String::new(),
        }
    }
}

/// A stack of pagination frames.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorState {
    frames: Vec<Frame>,
}

impl CursorState {
    /// Creates a state from frames, bottom first.
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    /// Returns the frames, bottom first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Returns the top frame.
    pub fn current(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Pushes a frame.
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Pops the top frame.
    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Returns `true` if the stack holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Recovers pagination state for `resource_type` from an opaque token.
///
/// Returns the state and the upstream page token to request. An empty
/// token starts a fresh stack. If the top frame belongs to a different
/// type, a new frame for `resource_type` is pushed and the other frame is
/// left untouched.
///
/// # Errors
///
/// Returns `MalformedCursor` if a non-empty token cannot be parsed. The
/// cursor is never silently reset.
pub fn decode(token: &str, resource_type: ResourceType) -> Result<(CursorState, String), Error> {
    if token.is_empty() {
        let state = CursorState::from_frames(vec![Frame::new(resource_type)]);
        return Ok((state, String::new()));
    }

    let bytes = URL_SAFE_NO_PAD.decode(token)?;
    let mut state: CursorState = serde_json::from_slice(&bytes).map_err(|e| {
        Error::malformed_cursor(format!("cursor is not a valid frame stack: {}", e)).with_source(e)
    })?;

    let page = match state.current() {
        None => return Err(Error::malformed_cursor("cursor has no frames")),
        Some(frame) if frame.resource_type == resource_type => frame.token.clone(),
        Some(_) => {
            state.push(Frame::new(resource_type));
            String::new()
        }
    };

    Ok((state, page))
}

/// Produces the opaque token that resumes after the page just fetched.
///
/// A non-empty `next_page` replaces the top frame's token. An empty one pops
/// the top frame; the listing then continues only if the new top frame has
/// the same resource type. Otherwise the result is `""`, the terminal
/// cursor, so frames of other types never restart a finished listing.
///
/// # Errors
///
/// Returns an error only if the state cannot be serialized.
pub fn encode(mut state: CursorState, next_page: &str) -> Result<String, Error> {
    if next_page.is_empty() {
        let exhausted = state.pop().map(|frame| frame.resource_type);
        let resumes = state.current().map(|frame| frame.resource_type);
        if exhausted.is_none() || resumes != exhausted {
            return Ok(String::new());
        }
    } else if let Some(frame) = state.frames.last_mut() {
        frame.token = next_page.to_string();
    }

    if state.is_empty() {
        return Ok(String::new());
    }

    let json = serde_json::to_vec(&state)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}
