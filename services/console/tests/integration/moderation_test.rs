use chrono::Duration;

use nexza_console::domain::repository::{UserRepository, UsernameRepository};
use nexza_console::domain::types::UserFilter;
use nexza_console::error::ConsoleError;
use nexza_console::infra::memory::MemoryDocumentStore;
use nexza_console::usecase::moderation::{
    DeleteUserUseCase, GetUserUseCase, ListUsersInput, ListUsersUseCase, SetBanUseCase,
};
use nexza_console::usecase::profile::SetUsernameUseCase;
use nexza_domain::clock::Clock;
use nexza_domain::id::IdentityId;
use nexza_domain::username::Username;
use nexza_testing::clock::ManualClock;

use crate::helpers::{ADMIN_EMAIL, profile, user_repo, username_repo};

async fn seed(store: &MemoryDocumentStore, clock: &ManualClock) {
    let users = user_repo(store);
    for (i, (id, email)) in [
        ("uid-1", "alice@x.com"),
        ("uid-2", "bob@y.com"),
        ("uid-3", ADMIN_EMAIL),
    ]
    .into_iter()
    .enumerate()
    {
        let mut p = profile(id, email, clock.now() + Duration::minutes(i as i64));
        p.is_admin = email == ADMIN_EMAIL;
        users.create(&p).await.unwrap();
    }
    users
        .set_banned(&IdentityId::from("uid-2"), true, clock.now())
        .await
        .unwrap();
}

#[tokio::test]
async fn should_list_newest_first_with_stats_over_everyone() {
    let store = MemoryDocumentStore::new();
    let clock = ManualClock::epoch();
    seed(&store, &clock).await;
    let usecase = ListUsersUseCase {
        users: user_repo(&store),
    };

    let out = usecase.execute(ListUsersInput::default()).await.unwrap();
    let ids: Vec<&str> = out.users.iter().map(|u| u.identity_id.as_str()).collect();
    assert_eq!(ids, ["uid-3", "uid-2", "uid-1"]);
    assert_eq!(out.stats.total, 3);
    assert_eq!(out.stats.banned, 1);
    assert_eq!(out.stats.active, 2);
    assert_eq!(out.stats.admins, 1);

    let out = usecase
        .execute(ListUsersInput {
            search: Some(" ALICE ".to_owned()),
            filter: UserFilter::All,
        })
        .await
        .unwrap();
    assert_eq!(out.users.len(), 1);
    assert_eq!(out.stats.total, 3);

    let out = usecase
        .execute(ListUsersInput {
            search: None,
            filter: UserFilter::Banned,
        })
        .await
        .unwrap();
    assert_eq!(out.users.len(), 1);
    assert_eq!(out.users[0].email, "bob@y.com");
}

#[tokio::test]
async fn should_ban_and_unban_with_timestamps() {
    let store = MemoryDocumentStore::new();
    let clock = ManualClock::epoch();
    seed(&store, &clock).await;
    let usecase = SetBanUseCase {
        users: user_repo(&store),
        clock: clock.clone(),
    };
    let target = IdentityId::from("uid-1");

    usecase.execute(&target, true, ADMIN_EMAIL).await.unwrap();
    let banned = user_repo(&store).find(&target).await.unwrap().unwrap();
    assert!(banned.is_banned);
    assert_eq!(banned.banned_at, Some(clock.now()));

    clock.advance(Duration::hours(1));
    usecase.execute(&target, false, ADMIN_EMAIL).await.unwrap();
    let restored = user_repo(&store).find(&target).await.unwrap().unwrap();
    assert!(!restored.is_banned);
    assert_eq!(restored.unbanned_at, Some(clock.now()));

    let missing = usecase
        .execute(&IdentityId::from("ghost"), true, ADMIN_EMAIL)
        .await;
    assert!(matches!(missing, Err(ConsoleError::UserNotFound)));
}

#[tokio::test]
async fn should_release_handle_when_user_is_deleted() {
    let store = MemoryDocumentStore::new();
    let clock = ManualClock::epoch();
    seed(&store, &clock).await;
    let owner = user_repo(&store)
        .find(&IdentityId::from("uid-1"))
        .await
        .unwrap()
        .unwrap();
    SetUsernameUseCase {
        users: user_repo(&store),
        usernames: username_repo(&store),
        clock: clock.clone(),
    }
    .execute(&owner, "112233")
    .await
    .unwrap();

    DeleteUserUseCase {
        users: user_repo(&store),
        usernames: username_repo(&store),
    }
    .execute(&owner.identity_id, ADMIN_EMAIL)
    .await
    .unwrap();

    let get = GetUserUseCase {
        users: user_repo(&store),
    };
    assert!(matches!(
        get.execute(&owner.identity_id).await,
        Err(ConsoleError::UserNotFound)
    ));
    let handle = Username::parse("112233").unwrap();
    assert!(!username_repo(&store).is_taken(&handle).await.unwrap());
}

#[tokio::test]
async fn should_set_handle_once_and_keep_it_unique() {
    let store = MemoryDocumentStore::new();
    let clock = ManualClock::epoch();
    seed(&store, &clock).await;
    let usecase = SetUsernameUseCase {
        users: user_repo(&store),
        usernames: username_repo(&store),
        clock: clock.clone(),
    };
    let users = user_repo(&store);
    let alice = users.find(&IdentityId::from("uid-1")).await.unwrap().unwrap();
    let bob = users.find(&IdentityId::from("uid-2")).await.unwrap().unwrap();

    assert!(matches!(
        usecase.execute(&alice, "12ab56").await,
        Err(ConsoleError::InvalidUsername)
    ));

    let alice = usecase.execute(&alice, "100200").await.unwrap();
    assert_eq!(alice.username.as_ref().map(Username::as_str), Some("100200"));

    assert!(matches!(
        usecase.execute(&alice, "300400").await,
        Err(ConsoleError::UsernameImmutable)
    ));
    assert!(matches!(
        usecase.execute(&bob, "100200").await,
        Err(ConsoleError::UsernameTaken)
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn should_keep_a_single_handle_when_two_requests_race() {
    let store = MemoryDocumentStore::new();
    let clock = ManualClock::epoch();
    seed(&store, &clock).await;
    let alice = user_repo(&store)
        .find(&IdentityId::from("uid-1"))
        .await
        .unwrap()
        .unwrap();

    let mut tasks = Vec::new();
    for handle in ["111111", "222222"] {
        let usecase = SetUsernameUseCase {
            users: user_repo(&store),
            usernames: username_repo(&store),
            clock: clock.clone(),
        };
        let snapshot = alice.clone();
        tasks.push(tokio::spawn(async move {
            (handle, usecase.execute(&snapshot, handle).await)
        }));
    }

    let mut winner = None;
    for task in tasks {
        match task.await.unwrap() {
            (handle, Ok(_)) => {
                assert!(winner.is_none(), "both requests set a handle");
                winner = Some(handle);
            }
            (_, Err(ConsoleError::UsernameImmutable)) => {}
            (_, other) => panic!("unexpected {other:?}"),
        }
    }
    let winner = winner.expect("one request sets the handle");
    let loser = if winner == "111111" { "222222" } else { "111111" };

    let stored = user_repo(&store)
        .find(&alice.identity_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.username.as_ref().map(Username::as_str), Some(winner));

    let usernames = username_repo(&store);
    assert!(usernames.is_taken(&Username::parse(winner).unwrap()).await.unwrap());
    assert!(!usernames.is_taken(&Username::parse(loser).unwrap()).await.unwrap());
}
