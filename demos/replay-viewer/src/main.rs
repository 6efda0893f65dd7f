//! Plays back a recorded session log and prints every message.
//!
//! ```text
//! cargo run -p replay-viewer -- demos/replay-viewer/sample.log --delay-ms 0
//! ```

use std::time::Duration;

use clap::Parser;
use trackline::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "replay-viewer")]
#[command(about = "Replay a Trackline session log")]
struct Args {
    /// Session log to replay, one server line per line.
    log: String,

    /// Pause between replayed lines, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Dispatcher tick interval, in milliseconds.
    #[arg(long, default_value_t = 20)]
    tick_ms: u64,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), TracklineError> {
    let args = Args::parse();
    trackline::logging::init(&args.log_level)?;

    let mut client = Client::builder()
        .replay(args.log.clone())
        .replay_delay(Duration::from_millis(args.delay_ms))
        .build()
        .await?;

    client.on_turn_request(|request| println!("turn     {} {}", request.player, request.action));
    client.on_text(|text| println!("text     {text}"));
    client.on_response(print_response);

    let mut ticker = tokio::time::interval(Duration::from_millis(args.tick_ms.max(1)));
    loop {
        ticker.tick().await;
        client.update();
        if !client.transport().is_receiving() && !client.has_pending_messages() {
            break;
        }
    }

    tracing::info!(log = %args.log, "replay finished");
    client.close().await?;
    Ok(())
}

fn print_response(response: &TurnResponse) {
    let Some(payload) = response.payload() else {
        println!("response {response}");
        return;
    };
    match payload {
        ResponsePayload::BoardState(board) => println!(
            "board    {}: {} cards in hand, {} cars left, {} routes",
            response.player,
            board.hand_size(),
            board.left_passenger_cars,
            board.own_routes.len()
        ),
        ResponsePayload::ClaimRoute(claim) => println!(
            "claim    {} {}-{} ({})",
            response.player, claim.d1, claim.d2, claim.route_color
        ),
        ResponsePayload::ListAllRoutes(list) => {
            println!("routes   {} on the board", list.routes.len());
            for route in &list.routes {
                println!("           {route}");
            }
        }
        ResponsePayload::FinalScore(score) => println!("{score}"),
        _ => println!("response {response}"),
    }
}
