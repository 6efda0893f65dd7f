//! Decoded inbound messages.
//!
//! Every type here is created by the [decoder](crate::decode) and is
//! read-only for everyone else: the structs are `#[non_exhaustive]`, so
//! code outside this crate can inspect the public fields but cannot build
//! its own messages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    ActionKind, ClientType, Destination, DestinationTicket, ErrorCode,
    MessageType, PassengerCarColor, PlayerColor, Route,
};

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// One decoded line from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// The server asks a player to act.
    Request(TurnRequest),
    /// The outcome of an action.
    Response(TurnResponse),
    /// Opaque text, including anything that failed to decode.
    Text(TextMessage),
}

impl Message {
    /// The routing tag of this message.
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Request(_) => MessageType::Request,
            Self::Response(_) => MessageType::Info,
            Self::Text(_) => MessageType::TextMessage,
        }
    }

    /// The action kind, for requests and responses.
    pub fn action(&self) -> Option<ActionKind> {
        match self {
            Self::Request(request) => Some(request.action),
            Self::Response(response) => Some(response.action),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(request) => request.fmt(f),
            Self::Response(response) => response.fmt(f),
            Self::Text(text) => text.fmt(f),
        }
    }
}

/// A server prompt for `player` to take a turn of kind `action`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TurnRequest {
    pub player: PlayerColor,
    pub action: ActionKind,
}

impl TurnRequest {
    pub(crate) fn new(player: PlayerColor, action: ActionKind) -> Self {
        Self { player, action }
    }
}

impl fmt::Display for TurnRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request {} for {}", self.action, self.player)
    }
}

/// The server's answer to an action.
///
/// `result` holds the action-specific payload on success and the
/// server's [`ErrorCode`] on failure. Callers must check it themselves;
/// a failed action is delivered the same way as a successful one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TurnResponse {
    pub action: ActionKind,
    /// The acting player (for some kinds, the player whose turn is next).
    pub player: PlayerColor,
    pub result: Result<ResponsePayload, ErrorCode>,
}

impl TurnResponse {
    pub(crate) fn success(
        action: ActionKind,
        player: PlayerColor,
        payload: ResponsePayload,
    ) -> Self {
        Self {
            action,
            player,
            result: Ok(payload),
        }
    }

    pub(crate) fn failure(
        action: ActionKind,
        player: PlayerColor,
        code: ErrorCode,
    ) -> Self {
        Self {
            action,
            player,
            result: Err(code),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The rejection reason, if the action failed.
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.result.as_ref().err().copied()
    }

    /// The payload, if the action succeeded.
    pub fn payload(&self) -> Option<&ResponsePayload> {
        self.result.as_ref().ok()
    }

    /// Consumes the response, yielding the payload on success.
    pub fn into_payload(self) -> Option<ResponsePayload> {
        self.result.ok()
    }
}

impl fmt::Display for TurnResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(_) => write!(f, "{} by {} succeeded", self.action, self.player),
            Err(code) => {
                write!(f, "{} by {} failed: {}", self.action, self.player, code)
            }
        }
    }
}

/// Plain server text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TextMessage {
    pub text: String,
}

impl TextMessage {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl fmt::Display for TextMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Action-specific content of a successful [`TurnResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePayload {
    Join(Joined),
    DrawPassengerCars(DrawnPassengerCar),
    DrawDestinationTickets(DrawnDestinationTickets),
    ClaimDestinationTickets(ClaimedDestinationTickets),
    ClaimRoute(ClaimedRoute),
    BoardState(BoardState),
    ListAllRoutes(RouteList),
    FinalScore(FinalScore),
    /// Success with no payload (e.g. `Turn`).
    Acknowledged,
}

macro_rules! payload_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for ResponsePayload {
                fn from(payload: $ty) -> Self {
                    Self::$variant(payload)
                }
            }
        )*
    };
}

payload_from!(
    Join(Joined),
    DrawPassengerCars(DrawnPassengerCar),
    DrawDestinationTickets(DrawnDestinationTickets),
    ClaimDestinationTickets(ClaimedDestinationTickets),
    ClaimRoute(ClaimedRoute),
    BoardState(BoardState),
    ListAllRoutes(RouteList),
    FinalScore(FinalScore),
);

/// The player's private view of the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct BoardState {
    /// The open cards, in display order.
    #[serde(default)]
    pub face_up_passenger_car_deck: Vec<PassengerCarColor>,
    /// Cards left in the hidden draw pile.
    #[serde(default)]
    pub topdown_passenger_car_deck_count: u32,
    /// Tickets left in the ticket pile.
    #[serde(default)]
    pub destination_ticket_count: u32,
    /// Cards in hand, one count per [`PassengerCarColor`] in declaration order.
    #[serde(default)]
    pub drawn_passenger_cars: Vec<u32>,
    #[serde(default)]
    pub own_destination_tickets: Vec<DestinationTicket>,
    /// Tickets drawn but not yet kept or returned.
    #[serde(default)]
    pub active_destination_tickets: Vec<DestinationTicket>,
    #[serde(default)]
    pub own_routes: Vec<Route>,
    /// Train pieces the player still has.
    #[serde(default)]
    pub left_passenger_cars: u32,
    #[serde(default)]
    pub final_turn: bool,
}

impl BoardState {
    /// Cards in hand of `color`, or 0 if the server sent no count for it.
    pub fn cards_of(&self, color: PassengerCarColor) -> u32 {
        self.drawn_passenger_cars
            .get(color as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Total cards in hand, saturating at `u32::MAX`.
    pub fn hand_size(&self) -> u32 {
        self.drawn_passenger_cars
            .iter()
            .fold(0u32, |total, &count| total.saturating_add(count))
    }
}

/// Result of drawing a passenger car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct DrawnPassengerCar {
    pub drawn_card: PassengerCarColor,
    /// `true` if the card came from the hidden pile.
    #[serde(default)]
    pub hidden_deck: bool,
    /// The open cards after the draw.
    #[serde(default)]
    pub face_up_passenger_car_deck: Vec<PassengerCarColor>,
}

/// Tickets offered after drawing destination tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct DrawnDestinationTickets {
    #[serde(default)]
    pub drawn_cards: Vec<DestinationTicket>,
}

/// Tickets kept after a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct ClaimedDestinationTickets {
    #[serde(default)]
    pub drawn_cards: Vec<DestinationTicket>,
}

/// A route that was just claimed, and the cards spent on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct ClaimedRoute {
    pub d1: Destination,
    pub d2: Destination,
    pub route_color: PassengerCarColor,
    #[serde(default)]
    pub passenger_car_colors: Vec<PassengerCarColor>,
}

impl ClaimedRoute {
    /// Marks the matching route in `routes` as owned by `player`.
    ///
    /// Returns `false` if no unclaimed route of that colour joins the two
    /// cities.
    pub fn apply_to(&self, routes: &mut [Route], player: PlayerColor) -> bool {
        let target = routes.iter_mut().find(|route| {
            route.connects(self.d1, self.d2)
                && route.color == self.route_color
                && !route.is_claimed()
        });
        match target {
            Some(route) => {
                route.claim(player);
                true
            }
            None => false,
        }
    }
}

/// Confirmation of a join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Joined {
    #[serde(default)]
    pub player_name: String,
    pub client_type: ClientType,
}

/// Every route on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct RouteList {
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// One player's end-of-game result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct FinalScore {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub total_score: i32,
    #[serde(default)]
    pub score_passenger_cars: i32,
    #[serde(default)]
    pub longest_route_length: u32,
    /// Whether this player holds the longest continuous route.
    #[serde(default)]
    pub longest_route: bool,
    #[serde(default)]
    pub winner: bool,
    #[serde(default)]
    pub claimed_tickets: Vec<DestinationTicket>,
    #[serde(default)]
    pub not_claimed_tickets: Vec<DestinationTicket>,
}

impl FinalScore {
    pub fn ticket_count(&self) -> usize {
        self.claimed_tickets.len() + self.not_claimed_tickets.len()
    }
}

impl fmt::Display for FinalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(tickets: &[DestinationTicket]) -> String {
            tickets
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        }

        writeln!(f, "Final score for {}", self.name)?;
        writeln!(f, "  total:               {}", self.total_score)?;
        writeln!(f, "  passenger cars:      {}", self.score_passenger_cars)?;
        writeln!(f, "  tickets:             {}", self.ticket_count())?;
        writeln!(f, "  claimed tickets:     {}", join(&self.claimed_tickets))?;
        writeln!(f, "  not claimed tickets: {}", join(&self.not_claimed_tickets))?;
        writeln!(f, "  longest route:       {} ({})", self.longest_route, self.longest_route_length)?;
        write!(f, "  winner:              {}", self.winner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(d1: Destination, d2: Destination, color: PassengerCarColor) -> Route {
        Route::new(d1, d2, 3, color)
    }

    #[test]
    fn test_message_type_tags() {
        let request = Message::Request(TurnRequest::new(PlayerColor::Red, ActionKind::Turn));
        let text = Message::Text(TextMessage::new("hello"));
        assert_eq!(request.message_type(), MessageType::Request);
        assert_eq!(request.action(), Some(ActionKind::Turn));
        assert_eq!(text.message_type(), MessageType::TextMessage);
        assert_eq!(text.action(), None);
    }

    #[test]
    fn test_response_accessors_on_failure() {
        let response = TurnResponse::failure(ActionKind::ClaimRoute, PlayerColor::Red, ErrorCode::NoCardLeft);
        assert!(!response.is_success());
        assert_eq!(response.error_code(), Some(ErrorCode::NoCardLeft));
        assert!(response.payload().is_none());
        assert_eq!(response.to_string(), "ClaimRoute by Red failed: NoCardLeft");
    }

    #[test]
    fn test_response_accessors_on_success() {
        let response = TurnResponse::success(ActionKind::Turn, PlayerColor::Blue, ResponsePayload::Acknowledged);
        assert!(response.is_success());
        assert_eq!(response.error_code(), None);
        assert_eq!(response.into_payload(), Some(ResponsePayload::Acknowledged));
    }

    #[test]
    fn test_board_state_hand_counts() {
        let board: BoardState = serde_json::from_str(
            r#"{"drawnPassengerCars":[1,0,2,0,0,0,0,0,3]}"#,
        )
        .unwrap();
        assert_eq!(board.cards_of(PassengerCarColor::Purple), 1);
        assert_eq!(board.cards_of(PassengerCarColor::Blue), 2);
        assert_eq!(board.cards_of(PassengerCarColor::Rainbow), 3);
        assert_eq!(board.hand_size(), 6);
    }

    #[test]
    fn test_board_state_missing_counts_read_as_zero() {
        let board: BoardState = serde_json::from_str("{}").unwrap();
        assert_eq!(board.cards_of(PassengerCarColor::Green), 0);
        assert_eq!(board.hand_size(), 0);
        assert!(board.own_routes.is_empty());
    }

    #[test]
    fn test_hand_size_saturates_on_absurd_counts() {
        let board: BoardState =
            serde_json::from_str(r#"{"drawnPassengerCars":[4294967295,5,1]}"#).unwrap();
        assert_eq!(board.hand_size(), u32::MAX);
    }

    #[test]
    fn test_claimed_route_marks_matching_route() {
        let claim = ClaimedRoute {
            d1: Destination::Omaha,
            d2: Destination::Denver,
            route_color: PassengerCarColor::Red,
            passenger_car_colors: vec![PassengerCarColor::Red; 3],
        };
        let mut routes = vec![
            route(Destination::Denver, Destination::Omaha, PassengerCarColor::Blue),
            route(Destination::Denver, Destination::Omaha, PassengerCarColor::Red),
        ];

        assert!(claim.apply_to(&mut routes, PlayerColor::Green));
        assert!(!routes[0].is_claimed());
        assert_eq!(routes[1].claimed_by, PlayerColor::Green);

        // Already claimed: a second application finds nothing.
        assert!(!claim.apply_to(&mut routes, PlayerColor::Black));
    }

    #[test]
    fn test_final_score_summary_lists_tickets() {
        let score = FinalScore {
            name: "alice".into(),
            total_score: 42,
            score_passenger_cars: 30,
            longest_route_length: 12,
            longest_route: true,
            winner: true,
            claimed_tickets: vec![DestinationTicket::new(Destination::Denver, Destination::ElPaso, 4)],
            not_claimed_tickets: vec![],
        };
        let summary = score.to_string();
        assert_eq!(score.ticket_count(), 1);
        assert!(summary.contains("Final score for alice"));
        assert!(summary.contains("Denver-ElPaso (4)"));
        assert!(summary.ends_with("winner:              true"));
    }
}
