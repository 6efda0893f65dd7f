//! Turns one raw server line into a [`Message`].
//!
//! Decoding happens in two steps. The `type` field is read first, then
//! only the header fields that type uses. For a successful `Info` line,
//! the action kind then selects an entry in [`PAYLOAD_DECODERS`], and that
//! entry reads only its own kind's fields.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::message::{
    BoardState, ClaimedDestinationTickets, ClaimedRoute, DrawnDestinationTickets,
    DrawnPassengerCar, FinalScore, Joined, Message, ResponsePayload, RouteList,
    TextMessage, TurnRequest, TurnResponse,
};
use crate::{ActionKind, ErrorCode, MessageType, PlayerColor, ProtocolError};

/// Builds the payload for one action kind from the whole message object.
type PayloadDecoder = fn(&Value) -> Result<ResponsePayload, serde_json::Error>;

/// Payload decoders, keyed by action kind. A kind with no entry carries no
/// payload and decodes to [`ResponsePayload::Acknowledged`].
const PAYLOAD_DECODERS: &[(ActionKind, PayloadDecoder)] = &[
    (ActionKind::Join, decode_as::<Joined>),
    (ActionKind::DrawPassengerCars, decode_as::<DrawnPassengerCar>),
    (ActionKind::DrawDestinationTickets, decode_as::<DrawnDestinationTickets>),
    (ActionKind::ClaimDestinationTickets, decode_as::<ClaimedDestinationTickets>),
    (ActionKind::ClaimRoute, decode_as::<ClaimedRoute>),
    (ActionKind::BoardState, decode_as::<BoardState>),
    (ActionKind::ListAllRoutes, decode_as::<RouteList>),
    (ActionKind::FinalScore, decode_as::<FinalScore>),
];

fn decode_as<T>(value: &Value) -> Result<ResponsePayload, serde_json::Error>
where
    T: DeserializeOwned + Into<ResponsePayload>,
{
    T::deserialize(value).map(Into::into)
}

fn payload_decoder(kind: ActionKind) -> Option<PayloadDecoder> {
    PAYLOAD_DECODERS
        .iter()
        .find(|(entry, _)| *entry == kind)
        .map(|(_, decoder)| *decoder)
}

/// Header of a `Request` line.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestHeader {
    turn_type: Option<ActionKind>,
    #[serde(default)]
    player: PlayerColor,
}

/// Header of an `Info` line that answers an action.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutcomeHeader {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    player: PlayerColor,
    error_code: Option<ErrorCode>,
}

/// Decodes a line, falling back to a text message.
///
/// This never fails: a line that is not JSON, has no `type`, or does not
/// match its type's shape comes back as [`Message::Text`] holding the line
/// unchanged. The same line always decodes to the same message.
pub fn decode(line: &str) -> Message {
    match try_decode(line) {
        Ok(message) => message,
        Err(error) => {
            tracing::debug!(%error, line, "line did not decode, treating as text");
            Message::Text(TextMessage::new(line))
        }
    }
}

/// Decodes a line strictly, reporting why it does not match the protocol.
///
/// Only the fields a message type uses are read, so a text line with an
/// unexpected `player` still decodes as text.
pub fn try_decode(line: &str) -> Result<Message, ProtocolError> {
    let value: Value = serde_json::from_str(line)?;

    let kind = field::<String>(&value, "type")?.ok_or(ProtocolError::MissingField("type"))?;
    let message_type: MessageType = kind
        .parse()
        .map_err(|_| ProtocolError::UnknownMessageType(kind.clone()))?;

    match message_type {
        MessageType::Request => {
            let header = RequestHeader::deserialize(&value)?;
            let action = header
                .turn_type
                .ok_or(ProtocolError::MissingField("turnType"))?;
            Ok(Message::Request(TurnRequest::new(header.player, action)))
        }
        MessageType::Info => match field::<ActionKind>(&value, "turnType")? {
            None => Ok(text_message(&value, line)),
            Some(action) => decode_response(action, &value).map(Message::Response),
        },
        MessageType::TextMessage => Ok(text_message(&value, line)),
    }
}

/// Reads one optional top-level field. `null` counts as missing.
fn field<T: DeserializeOwned>(value: &Value, name: &str) -> Result<Option<T>, ProtocolError> {
    match value.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(found) => Ok(Some(T::deserialize(found)?)),
    }
}

fn decode_response(action: ActionKind, value: &Value) -> Result<TurnResponse, ProtocolError> {
    let header = OutcomeHeader::deserialize(value)?;
    if !header.success {
        let code = header
            .error_code
            .ok_or(ProtocolError::MissingField("errorCode"))?;
        return Ok(TurnResponse::failure(action, header.player, code));
    }

    let payload = match payload_decoder(action) {
        Some(decoder) => decoder(value)?,
        None => ResponsePayload::Acknowledged,
    };
    Ok(TurnResponse::success(action, header.player, payload))
}

/// Text from the `text` field, or the whole line when it has none.
fn text_message(value: &Value, line: &str) -> Message {
    let text = value.get("text").and_then(Value::as_str).unwrap_or(line);
    Message::Text(TextMessage::new(text))
}

// =========================================================================
// Tests
// =========================================================================
