//! Abandoned games settled through the deadline.

use strictly_stakes::{
    Arena, BlockInfo, Call, Event, Identity, MemoryWallet, Outcome, Phase, SessionError,
    TableConfig,
};

const STAKE: u64 = 10;
const WINDOW: u64 = 60;
const ID: &str = "table";

fn seated_at(time: u64) -> Arena {
    let mut arena = Arena::new();
    arena
        .open_session(ID, TableConfig::new(STAKE, WINDOW).unwrap())
        .unwrap();
    let block = BlockInfo::new(1, time);
    arena
        .join_game_as_player1(ID, &Call::new(Identity::from("alice"), STAKE, block))
        .unwrap();
    arena
        .join_game_as_player2(ID, &Call::new(Identity::from("bob"), STAKE, block))
        .unwrap();
    arena
}

#[test]
fn test_third_party_settles_abandoned_game() {
    let mut arena = seated_at(0);
    let mut wallet = MemoryWallet::new();
    arena
        .set_stone(ID, &Call::plain("alice", BlockInfo::new(2, 10)), 1, 1, &mut wallet)
        .unwrap();
    assert_eq!(arena.view(ID).unwrap().deadline, 10 + WINDOW);

    let carol = |time| Call::plain("carol", BlockInfo::new(3, time));

    assert_eq!(
        arena.emergency_cashout(ID, &carol(70), &mut wallet),
        Err(SessionError::DeadlineNotElapsed {
            deadline: 70,
            now: 70
        })
    );

    let events = arena.emergency_cashout(ID, &carol(71), &mut wallet).unwrap();
    assert_eq!(
        events,
        vec![
            Event::GameOverWithDraw,
            Event::PayoutSuccess {
                receiver: Identity::from("alice"),
                amount: STAKE
            },
            Event::PayoutSuccess {
                receiver: Identity::from("bob"),
                amount: STAKE
            },
        ]
    );
    assert_eq!(wallet.balance(&Identity::from("carol")), 0);

    let session = arena.session(ID).unwrap();
    assert_eq!(session.phase(), Phase::Settled);
    assert_eq!(session.outcome(), Some(&Outcome::Abandoned));
    assert_eq!(session.move_counter(), 1);
}

#[test]
fn test_second_timeout_rejected() {
    let mut arena = seated_at(0);
    let mut wallet = MemoryWallet::new();
    let late = Call::plain("carol", BlockInfo::new(9, 1_000));

    arena.emergency_cashout(ID, &late, &mut wallet).unwrap();
    assert_eq!(
        arena.emergency_cashout(ID, &late, &mut wallet),
        Err(SessionError::NotActive)
    );
    assert_eq!(wallet.total_delivered(), 2 * STAKE);
}

#[test]
fn test_move_after_deadline_rejected() {
    let mut arena = seated_at(0);
    let mut wallet = MemoryWallet::new();

    assert_eq!(
        arena.set_stone(ID, &Call::plain("alice", BlockInfo::new(2, 61)), 0, 0, &mut wallet),
        Err(SessionError::DeadlineElapsed {
            deadline: 60,
            now: 61
        })
    );
    // The boundary itself is still inside the window.
    assert!(
        arena
            .set_stone(ID, &Call::plain("alice", BlockInfo::new(2, 60)), 0, 0, &mut wallet)
            .is_ok()
    );
}

#[test]
fn test_timeout_requires_active_game() {
    let mut arena = Arena::new();
    arena
        .open_session(ID, TableConfig::new(STAKE, WINDOW).unwrap())
        .unwrap();
    let mut wallet = MemoryWallet::new();
    assert_eq!(
        arena.emergency_cashout(ID, &Call::plain("carol", BlockInfo::new(1, 500)), &mut wallet),
        Err(SessionError::NotActive)
    );
}

#[test]
fn test_timeout_with_refusing_player_defers_share() {
    let mut arena = seated_at(0);
    let mut wallet = MemoryWallet::new();
    wallet.refuse("bob");

    let events = arena
        .emergency_cashout(ID, &Call::plain("carol", BlockInfo::new(2, 100)), &mut wallet)
        .unwrap();

    assert!(events.contains(&Event::PayoutDeferred {
        receiver: Identity::from("bob"),
        amount: STAKE
    }));
    assert_eq!(wallet.balance(&Identity::from("alice")), STAKE);
    assert_eq!(
        arena.pending_withdrawal(ID, &Identity::from("bob")).unwrap(),
        STAKE
    );
}
