//! The action dispatcher.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use trackline_protocol::{
    ActionKind, CarSource, ClientType, Command, Destination, Message, PassengerCarColor,
    PlayerColor, TextMessage, TurnRequest, TurnResponse,
};
use trackline_transport::{Transport, TransportError};

use crate::error::DispatchError;
use crate::listeners::{ListenerId, Listeners};
use crate::pending::{PendingActions, ResponseCallback};
use crate::queue::InboundQueue;
use crate::state::DispatchState;

/// Sends actions to the server and routes what comes back.
///
/// Inbound lines are decoded and queued as they arrive; each call to
/// [`update`](Self::update) routes at most one of them. A response goes to
/// the callback registered for its action kind if there is one, otherwise
/// to the response listeners. Turn requests go to the turn-request
/// listeners and text is always logged. A message nobody handles stays at
/// the head of the queue and pauses the dispatcher until
/// [`resume`](Self::resume) is called.
///
/// Only one action per [`ActionKind`] can wait for a callback at a time.
pub struct Dispatcher<T: Transport> {
    transport: T,
    state: DispatchState,
    pending: PendingActions,
    inbound: InboundQueue,
    response_listeners: Listeners<TurnResponse>,
    request_listeners: Listeners<TurnRequest>,
    text_listeners: Listeners<TextMessage>,
}

impl<T: Transport> Dispatcher<T> {
    /// Creates a running dispatcher over an unconnected transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: DispatchState::Running,
            pending: PendingActions::new(),
            inbound: InboundQueue::new(),
            response_listeners: Listeners::new(),
            request_listeners: Listeners::new(),
            text_listeners: Listeners::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Connects the transport and starts receiving lines.
    pub async fn connect(&mut self) -> Result<(), DispatchError> {
        if self.state.is_closed() {
            return Err(DispatchError::Closed);
        }
        if self.transport.is_connected() {
            return Err(TransportError::AlreadyConnected.into());
        }

        let lines = self.inbound.open();
        if let Err(error) = self.transport.connect(lines).await {
            error!(%error, mode = %self.transport.mode(), "could not connect");
            return Err(error.into());
        }
        info!(mode = %self.transport.mode(), "dispatcher connected");
        Ok(())
    }

    /// Closes the dispatcher and its transport.
    ///
    /// Pending callbacks are dropped without being called. Closing twice
    /// is a no-op.
    pub async fn close(&mut self) -> Result<(), DispatchError> {
        if self.state.is_closed() {
            return Ok(());
        }
        self.state = DispatchState::Closed;

        let dropped = self.pending.clear();
        if dropped > 0 {
            debug!(dropped, "dropped pending action callbacks");
        }
        if self.transport.is_connected() {
            self.transport.close().await?;
        }
        info!("dispatcher closed");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Flow control
    // -----------------------------------------------------------------------

    /// Stops routing until [`resume`](Self::resume) is called.
    pub fn pause(&mut self) {
        self.set_paused(None);
    }

    /// Stops routing for `duration`.
    ///
    /// A zero duration is a caller error: it is logged and the dispatcher
    /// pauses until resumed explicitly. A duration too large to represent
    /// as a deadline also pauses until resumed.
    pub fn pause_for(&mut self, duration: Duration) {
        if duration.is_zero() {
            error!("pause duration has to be positive, pausing until resumed");
            self.set_paused(None);
            return;
        }
        match Instant::now().checked_add(duration) {
            Some(until) => self.set_paused(Some(until)),
            None => {
                debug!(?duration, "pause deadline out of range, pausing until resumed");
                self.set_paused(None);
            }
        }
    }

    fn set_paused(&mut self, until: Option<Instant>) {
        if self.state.is_closed() {
            return;
        }
        self.state = DispatchState::Paused { until };
        info!(timed = until.is_some(), "dispatcher paused");
    }

    /// Resumes routing. Does nothing unless paused.
    pub fn resume(&mut self) {
        if self.state.is_paused() {
            self.state = DispatchState::Running;
            info!("dispatcher resumed");
        }
    }

    /// Runs one dispatch tick. Returns `false` once the dispatcher is closed.
    ///
    /// A timed pause whose deadline has passed ends here, and the same
    /// tick goes on to route. When running, newly received lines are
    /// queued and the oldest message is routed. If no handler takes it,
    /// the message stays at the head and the dispatcher pauses.
    pub fn update(&mut self) -> bool {
        match self.state {
            DispatchState::Closed => return false,
            DispatchState::Paused { .. } if self.state.pause_expired(Instant::now()) => {
                self.state = DispatchState::Running;
                info!("pause elapsed, dispatcher resumed");
            }
            DispatchState::Paused { .. } => return true,
            DispatchState::Running => {}
        }

        self.inbound.pull();
        let Some(message) = self.inbound.pop_front() else {
            return true;
        };

        if let Err(message) = self.route(message) {
            info!(%message, queued = self.inbound.len() + 1, "no handler for message, halting");
            self.inbound.push_front(message);
            self.state = DispatchState::Paused { until: None };
        }
        true
    }

    /// Hands `message` to whoever should see it, or gives it back.
    fn route(&mut self, message: Message) -> Result<(), Message> {
        match message {
            Message::Response(response) => {
                if let Some(callback) = self.pending.take(response.action) {
                    debug!(%response, "routing response to action callback");
                    callback(response);
                } else if !self.response_listeners.is_empty() {
                    debug!(%response, "routing response to listeners");
                    self.response_listeners.notify(&response);
                } else {
                    return Err(Message::Response(response));
                }
            }
            Message::Request(request) => {
                if self.request_listeners.is_empty() {
                    return Err(Message::Request(request));
                }
                debug!(%request, "routing turn request to listeners");
                self.request_listeners.notify(&request);
            }
            Message::Text(text) => {
                info!(text = %text, "server message");
                self.text_listeners.notify(&text);
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Sends `command`, registering `callback` for its response.
    ///
    /// # Errors
    /// - [`DispatchError::Closed`] after [`close`](Self::close).
    /// - [`DispatchError::ActionPending`] if an action of the same kind is
    ///   still waiting for its callback. Nothing is sent.
    /// - [`DispatchError::Protocol`] if the command fails validation.
    /// - [`DispatchError::Transport`] if the line cannot be written. The
    ///   callback is discarded.
    pub async fn issue(
        &mut self,
        command: Command,
        callback: Option<ResponseCallback>,
    ) -> Result<(), DispatchError> {
        if self.state.is_closed() {
            return Err(DispatchError::Closed);
        }
        let kind = command.action();
        if self.pending.is_pending(kind) {
            info!(action = %kind, "action is already awaiting a response, ignoring");
            return Err(DispatchError::ActionPending(kind));
        }
        command.validate()?;

        if let Some(callback) = callback {
            if self.pending.register(kind, callback).is_err() {
                return Err(DispatchError::ActionPending(kind));
            }
        }

        let line = command.to_string();
        if let Err(error) = self.transport.send(&line).await {
            warn!(%error, command = %line, "failed to send command");
            self.pending.take(kind);
            return Err(error.into());
        }
        debug!(command = %line, "command sent");
        Ok(())
    }

    /// Joins the game as `name`, optionally asking for a seat colour.
    pub async fn join_game(
        &mut self,
        name: impl Into<String>,
        client_type: ClientType,
        preferred_color: PlayerColor,
        callback: Option<ResponseCallback>,
    ) -> Result<(), DispatchError> {
        let command = Command::Join {
            name: name.into(),
            client_type,
            preferred_color,
        };
        self.issue(command, callback).await
    }

    /// Draws the top card of the hidden pile.
    pub async fn draw_hidden_passenger_car(
        &mut self,
        callback: Option<ResponseCallback>,
    ) -> Result<(), DispatchError> {
        self.issue(Command::DrawPassengerCar(CarSource::Hidden), callback)
            .await
    }

    /// Takes the open card of `color`.
    pub async fn draw_open_passenger_car(
        &mut self,
        color: PassengerCarColor,
        callback: Option<ResponseCallback>,
    ) -> Result<(), DispatchError> {
        self.issue(Command::DrawPassengerCar(CarSource::Open(color)), callback)
            .await
    }

    pub async fn draw_destination_tickets(
        &mut self,
        callback: Option<ResponseCallback>,
    ) -> Result<(), DispatchError> {
        self.issue(Command::DrawDestinationTickets, callback).await
    }

    /// Keeps or returns each of the three offered tickets.
    pub async fn claim_destination_tickets(
        &mut self,
        keep: [bool; 3],
        callback: Option<ResponseCallback>,
    ) -> Result<(), DispatchError> {
        self.issue(Command::ClaimDestinationTickets { keep }, callback)
            .await
    }

    pub async fn claim_route(
        &mut self,
        from: Destination,
        to: Destination,
        color: PassengerCarColor,
        callback: Option<ResponseCallback>,
    ) -> Result<(), DispatchError> {
        self.issue(Command::ClaimRoute { from, to, color }, callback)
            .await
    }

    pub async fn get_board_state(
        &mut self,
        callback: Option<ResponseCallback>,
    ) -> Result<(), DispatchError> {
        self.issue(Command::BoardState, callback).await
    }

    pub async fn get_all_routes(
        &mut self,
        callback: Option<ResponseCallback>,
    ) -> Result<(), DispatchError> {
        self.issue(Command::ListAllRoutes, callback).await
    }

    // -----------------------------------------------------------------------
    // Listeners
    // -----------------------------------------------------------------------

    /// Registers a listener for responses with no pending callback.
    pub fn on_response(
        &mut self,
        listener: impl FnMut(&TurnResponse) + Send + 'static,
    ) -> ListenerId {
        self.response_listeners.add(Box::new(listener))
    }

    /// Registers a listener for turn requests.
    pub fn on_turn_request(
        &mut self,
        listener: impl FnMut(&TurnRequest) + Send + 'static,
    ) -> ListenerId {
        self.request_listeners.add(Box::new(listener))
    }

    /// Registers a listener for server text.
    pub fn on_text(&mut self, listener: impl FnMut(&TextMessage) + Send + 'static) -> ListenerId {
        self.text_listeners.add(Box::new(listener))
    }

    /// Removes a listener. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.response_listeners.remove(id)
            || self.request_listeners.remove(id)
            || self.text_listeners.remove(id)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    /// Whether an action of `kind` is waiting for its callback.
    pub fn is_action_pending(&self, kind: ActionKind) -> bool {
        self.pending.is_pending(kind)
    }

    /// Whether any received message has not been routed yet.
    pub fn has_pending_messages(&self) -> bool {
        self.inbound.has_pending()
    }

    /// The message the next tick will try to route.
    ///
    /// Takes `&mut self` because lines received since the last tick are
    /// decoded and queued first.
    pub fn peek_message(&mut self) -> Option<&Message> {
        self.inbound.pull();
        self.inbound.front()
    }

    /// Removes and returns the oldest message without routing it.
    ///
    /// Works in any state, so a halted dispatcher can be unblocked by
    /// taking the message nobody handled.
    pub fn next_message(&mut self) -> Option<Message> {
        self.inbound.pull();
        self.inbound.pop_front()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
