//! End-to-end tests for `GateService`: real store on a temp directory,
//! recording enforcer, paused Tokio clock for the deadline timers.
//!
//! With `start_paused`, `tokio::time::sleep` in the test body fast-
//! forwards the clock, running any spawned timer whose deadline falls
//! inside the jump. No test here waits wall-clock time.

use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pingate::{
    DisconnectReason, Enforcer, GateConfig, GateError, GateService,
    GateStore, Identity, JoinDecision, LoginAnchor, LoginOutcome,
    PingateError,
};
use tempfile::TempDir;

/// Test double for the host's kick hook: records instead of kicking.
#[derive(Clone, Default)]
struct RecordingEnforcer {
    kicks: Arc<Mutex<Vec<(Identity, DisconnectReason)>>>,
}

impl RecordingEnforcer {
    fn kicks(&self) -> Vec<(Identity, DisconnectReason)> {
        self.kicks.lock().unwrap().clone()
    }
}

impl Enforcer for RecordingEnforcer {
    fn disconnect(&self, identity: &Identity, reason: DisconnectReason) {
        self.kicks.lock().unwrap().push((identity.clone(), reason));
    }
}

fn id(name: &str) -> Identity {
    Identity::new(name)
}

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

/// Service over a fresh temp directory. The `TempDir` guard must stay
/// alive for the duration of the test.
fn service(dir: &TempDir) -> (GateService<RecordingEnforcer>, RecordingEnforcer) {
    let enforcer = RecordingEnforcer::default();
    let service = GateService::new(
        GateStore::new(dir.path()),
        GateConfig::default(),
        enforcer.clone(),
    )
    .unwrap();
    (service, enforcer)
}

// =========================================================================
// The main flow: register, reconnect, login
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_register_then_reconnect_then_login() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service(&dir);
    let steve = id("steve");

    // First visit: unregistered, free to act.
    let decision = service.player_joined(&steve, ip("203.0.113.7")).await;
    assert_eq!(decision, JoinDecision::Unregistered);
    assert!(!service.is_gate_blocking(&steve).await);

    service.set_pin(&steve, "4711").await.unwrap();
    service.player_quit(&steve).await;

    // Second visit: no trusted IP yet (registration clears it), so the
    // gate freezes and demands the PIN.
    let decision = service.player_joined(&steve, ip("203.0.113.7")).await;
    assert_eq!(decision, JoinDecision::MustAuthenticate { anchor: None });
    assert!(service.is_gate_blocking(&steve).await);

    let outcome = service.login(&steve, "4711").await.unwrap();
    assert_eq!(outcome, LoginOutcome::Success);
    assert!(!service.is_gate_blocking(&steve).await);
    assert!(service.is_authenticated(&steve).await);
}

#[tokio::test(start_paused = true)]
async fn test_wrong_pin_counts_down_then_rate_limits() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service(&dir);
    let steve = id("steve");

    service.player_joined(&steve, ip("203.0.113.7")).await;
    service.set_pin(&steve, "4711").await.unwrap();
    service.player_quit(&steve).await;
    service.player_joined(&steve, ip("203.0.113.7")).await;

    for remaining in [2u8, 1, 0] {
        let outcome = service.login(&steve, "0000").await.unwrap();
        assert_eq!(outcome, LoginOutcome::Incorrect { remaining });
    }

    // Fourth attempt: refused outright, even with the right PIN.
    let outcome = service.login(&steve, "4711").await.unwrap();
    assert_eq!(outcome, LoginOutcome::RateLimited);
}

#[tokio::test(start_paused = true)]
async fn test_login_without_credential_reports_no_credential() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service(&dir);
    let steve = id("steve");

    service.player_joined(&steve, ip("203.0.113.7")).await;

    let outcome = service.login(&steve, "4711").await.unwrap();
    assert_eq!(outcome, LoginOutcome::NoCredential);
}

#[tokio::test(start_paused = true)]
async fn test_set_pin_length_policy_enforced() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service(&dir);
    let steve = id("steve");
    service.player_joined(&steve, ip("203.0.113.7")).await;

    let result = service.set_pin(&steve, "123").await;

    assert!(matches!(
        result,
        Err(PingateError::Gate(GateError::InvalidLength { min: 4, max: 16 }))
    ));

    // Reload with looser bounds; the same PIN now passes.
    service
        .reload_config(GateConfig {
            min_pin_len: 3,
            max_pin_len: 16,
        })
        .await;
    service.set_pin(&steve, "123").await.unwrap();
}

// =========================================================================
// Command gating
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_frozen_player_may_only_run_exempt_commands() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service(&dir);
    let steve = id("steve");

    service.player_joined(&steve, ip("203.0.113.7")).await;
    service.set_pin(&steve, "4711").await.unwrap();
    service.player_quit(&steve).await;
    service.player_joined(&steve, ip("203.0.113.7")).await;

    assert!(!service.command_blocked(&steve, "login").await);
    assert!(!service.command_blocked(&steve, "setpin").await);
    assert!(!service.command_blocked(&steve, "LOGIN").await);
    assert!(service.command_blocked(&steve, "tp").await);
    assert!(service.command_blocked(&steve, "home").await);

    service.login(&steve, "4711").await.unwrap();
    assert!(!service.command_blocked(&steve, "tp").await);
}

// =========================================================================
// The deadline timer
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_deadline_kicks_player_still_frozen() {
    let dir = TempDir::new().unwrap();
    let (service, enforcer) = service(&dir);
    let steve = id("steve");

    service.player_joined(&steve, ip("203.0.113.7")).await;
    service.set_pin(&steve, "4711").await.unwrap();
    service.player_quit(&steve).await;
    service.player_joined(&steve, ip("203.0.113.7")).await;

    tokio::time::sleep(Duration::from_secs(61)).await;

    assert_eq!(
        enforcer.kicks(),
        vec![(steve, DisconnectReason::AuthTimeout)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_deadline_noop_after_successful_login() {
    let dir = TempDir::new().unwrap();
    let (service, enforcer) = service(&dir);
    let steve = id("steve");

    service.player_joined(&steve, ip("203.0.113.7")).await;
    service.set_pin(&steve, "4711").await.unwrap();
    service.player_quit(&steve).await;
    service.player_joined(&steve, ip("203.0.113.7")).await;

    tokio::time::sleep(Duration::from_secs(30)).await;
    service.login(&steve, "4711").await.unwrap();
    tokio::time::sleep(Duration::from_secs(120)).await;

    assert!(enforcer.kicks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_deadline_noop_after_quit() {
    let dir = TempDir::new().unwrap();
    let (service, enforcer) = service(&dir);
    let steve = id("steve");

    service.player_joined(&steve, ip("203.0.113.7")).await;
    service.set_pin(&steve, "4711").await.unwrap();
    service.player_quit(&steve).await;
    service.player_joined(&steve, ip("203.0.113.7")).await;

    tokio::time::sleep(Duration::from_secs(30)).await;
    service.player_quit(&steve).await;
    tokio::time::sleep(Duration::from_secs(120)).await;

    assert!(enforcer.kicks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_stale_deadline_does_not_kick_rejoined_player() {
    // Rejoin shortly before the first timer would have fired. The old
    // timer is aborted and replaced; only the new connection's own
    // 60-second window applies.
    let dir = TempDir::new().unwrap();
    let (service, enforcer) = service(&dir);
    let steve = id("steve");

    service.player_joined(&steve, ip("203.0.113.7")).await;
    service.set_pin(&steve, "4711").await.unwrap();
    service.player_quit(&steve).await;

    service.player_joined(&steve, ip("203.0.113.7")).await;
    tokio::time::sleep(Duration::from_secs(59)).await;
    service.player_quit(&steve).await;
    service.player_joined(&steve, ip("203.0.113.7")).await;

    // Past the first connection's deadline, inside the second's.
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(enforcer.kicks().is_empty());

    // The second connection's own deadline still applies.
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(enforcer.kicks().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_custom_deadline_override() {
    let dir = TempDir::new().unwrap();
    let enforcer = RecordingEnforcer::default();
    let service = GateService::new(
        GateStore::new(dir.path()),
        GateConfig::default(),
        enforcer.clone(),
    )
    .unwrap()
    .with_auth_deadline(Duration::from_secs(5));
    let steve = id("steve");

    service.player_joined(&steve, ip("203.0.113.7")).await;
    service.set_pin(&steve, "4711").await.unwrap();
    service.player_quit(&steve).await;
    service.player_joined(&steve, ip("203.0.113.7")).await;

    tokio::time::sleep(Duration::from_secs(6)).await;

    assert_eq!(enforcer.kicks().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_no_deadline_for_unregistered_join() {
    let dir = TempDir::new().unwrap();
    let (service, enforcer) = service(&dir);
    let steve = id("steve");

    service.player_joined(&steve, ip("203.0.113.7")).await;
    tokio::time::sleep(Duration::from_secs(120)).await;

    assert!(enforcer.kicks().is_empty());
}

// =========================================================================
// Persistence across restarts
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_credentials_survive_service_restart() {
    let dir = TempDir::new().unwrap();
    let steve = id("steve");

    {
        let (service, _) = service(&dir);
        service.player_joined(&steve, ip("203.0.113.7")).await;
        service.set_pin(&steve, "4711").await.unwrap();
        service.player_quit(&steve).await;
    }

    // "Restart": a fresh service over the same directory.
    let (service, _) = service(&dir);
    let decision = service.player_joined(&steve, ip("203.0.113.7")).await;
    assert_eq!(decision, JoinDecision::MustAuthenticate { anchor: None });
    assert_eq!(
        service.login(&steve, "4711").await.unwrap(),
        LoginOutcome::Success
    );
}

#[tokio::test(start_paused = true)]
async fn test_trusted_ip_survives_restart_and_auto_authenticates() {
    let dir = TempDir::new().unwrap();
    let steve = id("steve");

    {
        let (service, _) = service(&dir);
        service.player_joined(&steve, ip("203.0.113.7")).await;
        service.set_pin(&steve, "4711").await.unwrap();
        service.player_quit(&steve).await;
        service.player_joined(&steve, ip("203.0.113.7")).await;
        service.login(&steve, "4711").await.unwrap();
        service.player_quit(&steve).await;
    }

    let (service, _) = service(&dir);
    // Same address, well inside 24 hours of the persisted login.
    let decision = service.player_joined(&steve, ip("203.0.113.7")).await;
    assert_eq!(decision, JoinDecision::AutoAuthenticated);

    // Different address: frozen despite the record.
    service.player_quit(&steve).await;
    let decision = service.player_joined(&steve, ip("198.51.100.1")).await;
    assert!(matches!(decision, JoinDecision::MustAuthenticate { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_anchor_persists_and_reaches_frozen_joins() {
    let dir = TempDir::new().unwrap();
    let steve = id("steve");
    let anchor = LoginAnchor {
        world: "lobby".into(),
        x: 100.5,
        y: 65.0,
        z: -20.0,
    };

    {
        let (service, _) = service(&dir);
        service.set_login_anchor(anchor.clone()).await.unwrap();
        service.player_joined(&steve, ip("203.0.113.7")).await;
        service.set_pin(&steve, "4711").await.unwrap();
        service.player_quit(&steve).await;
    }

    let (service, _) = service(&dir);
    let decision = service.player_joined(&steve, ip("203.0.113.7")).await;
    assert_eq!(
        decision,
        JoinDecision::MustAuthenticate {
            anchor: Some(anchor),
        }
    );
}

// =========================================================================
// PIN reset
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_reset_pin_wipes_credential_and_persists() {
    let dir = TempDir::new().unwrap();
    let steve = id("steve");

    {
        let (service, _) = service(&dir);
        service.player_joined(&steve, ip("203.0.113.7")).await;
        service.set_pin(&steve, "4711").await.unwrap();
        service.reset_pin(&steve).await.unwrap();
        assert!(!service.is_gate_blocking(&steve).await);
    }

    // The removal reached disk: after a restart the player is still
    // unregistered.
    let (service, _) = service(&dir);
    let decision = service.player_joined(&steve, ip("203.0.113.7")).await;
    assert_eq!(decision, JoinDecision::Unregistered);
}

#[tokio::test(start_paused = true)]
async fn test_reset_pin_unknown_target_errors() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service(&dir);

    let result = service.reset_pin(&id("nobody")).await;

    assert!(matches!(
        result,
        Err(PingateError::Gate(GateError::NotFound(_)))
    ));
}
