//! A scripted lobby session showing the full gate lifecycle without a
//! real game server: register, reconnect frozen, fail a PIN, log in,
//! and one player who idles past the deadline and gets kicked.
//!
//! Run with `RUST_LOG=pingate=debug cargo run -p pin-lobby` to watch
//! the gate's own tracing alongside the script.

use std::net::IpAddr;
use std::time::Duration;

use pingate::{
    DisconnectReason, Enforcer, GateConfig, GateService, GateStore,
    Identity, JoinDecision, LoginAnchor, LoginOutcome,
};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Host integration
// ---------------------------------------------------------------------------

/// Stand-in for the game server's kick call.
struct LobbyKicker;

impl Enforcer for LobbyKicker {
    fn disconnect(&self, identity: &Identity, reason: DisconnectReason) {
        println!(">> [kick] {identity}: {reason}");
    }
}

fn describe(decision: &JoinDecision) -> String {
    match decision {
        JoinDecision::Unregistered => {
            "welcome! register a PIN with /setpin".into()
        }
        JoinDecision::AutoAuthenticated => {
            "welcome back (trusted address)".into()
        }
        JoinDecision::MustAuthenticate { anchor } => match anchor {
            Some(a) => format!(
                "frozen at login anchor ({}, {}, {}) in {} — /login <pin>",
                a.x, a.y, a.z, a.world
            ),
            None => "frozen — /login <pin>".into(),
        },
    }
}

// ---------------------------------------------------------------------------
// The script
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let data_dir = std::env::temp_dir().join("pin-lobby-demo");
    let service = GateService::new(
        GateStore::new(&data_dir),
        GateConfig::default(),
        LobbyKicker,
    )?
    // Short deadline so the idle-kick is watchable.
    .with_auth_deadline(Duration::from_secs(3));

    let steve = Identity::new("steve");
    let alex = Identity::new("alex");
    let home: IpAddr = "203.0.113.7".parse()?;

    service
        .set_login_anchor(LoginAnchor {
            world: "lobby".into(),
            x: 0.5,
            y: 65.0,
            z: 0.5,
        })
        .await?;

    // -- Steve's first visit: register and leave --------------------------
    println!("-- steve joins for the first time");
    println!("   {}", describe(&service.player_joined(&steve, home).await));
    service.set_pin(&steve, "4711").await?;
    println!("   steve sets PIN 4711 and leaves");
    service.player_quit(&steve).await;

    // -- Steve returns: frozen, fumbles once, then logs in ----------------
    println!("-- steve rejoins");
    println!("   {}", describe(&service.player_joined(&steve, home).await));
    match service.login(&steve, "1234").await? {
        LoginOutcome::Incorrect { remaining } => {
            println!("   wrong PIN, {remaining} attempts left");
        }
        other => println!("   unexpected: {other:?}"),
    }
    assert_eq!(service.login(&steve, "4711").await?, LoginOutcome::Success);
    println!("   correct PIN, steve is in");
    println!(
        "   /tp blocked for steve? {}",
        service.command_blocked(&steve, "tp").await
    );
    service.player_quit(&steve).await;

    // -- Steve again, same address: trust window skips the PIN ------------
    println!("-- steve rejoins from the same address");
    println!("   {}", describe(&service.player_joined(&steve, home).await));
    service.player_quit(&steve).await;

    // -- Alex registers, rejoins, and ignores the login prompt ------------
    println!("-- alex joins, registers, rejoins and idles");
    service.player_joined(&alex, "198.51.100.1".parse()?).await;
    service.set_pin(&alex, "9999").await?;
    service.player_quit(&alex).await;
    println!(
        "   {}",
        describe(&service.player_joined(&alex, "198.51.100.1".parse()?).await)
    );
    println!("   waiting for the deadline...");
    tokio::time::sleep(Duration::from_secs(4)).await;
    service.player_quit(&alex).await;

    println!("-- done (state in {})", data_dir.display());
    Ok(())
}
