use chrono::Duration;

use nexza_console::domain::types::{AdminMessageStatus, Background, MessageStatus};
use nexza_console::error::ConsoleError;
use nexza_console::infra::memory::MemoryDocumentStore;
use nexza_console::infra::repo::{
    DocAdminMessageRepository, DocAnnouncementRepository, DocContactMessageRepository,
};
use nexza_console::usecase::announcement::{
    AnnouncementFeedUseCase, CreateAnnouncementInput, CreateAnnouncementUseCase,
    DeleteAnnouncementUseCase, ListAnnouncementsUseCase,
};
use nexza_console::usecase::contact::{
    DeleteContactMessageUseCase, ListContactInput, ListContactMessagesUseCase,
    SubmitContactInput, SubmitContactUseCase, UpdateContactStatusUseCase,
};
use nexza_console::usecase::direct_message::{
    ComposeDirectMessageUseCase, ComposeInput, InboxUseCase, MarkReadUseCase,
};
use nexza_domain::id::{AnnouncementId, ContactMessageId, IdentityId};
use nexza_testing::clock::ManualClock;

use crate::helpers::{ADMIN_EMAIL, FailingAnnouncementRepo};

fn contact_repo(store: &MemoryDocumentStore) -> DocContactMessageRepository<MemoryDocumentStore> {
    DocContactMessageRepository {
        store: store.clone(),
    }
}

fn dm_repo(store: &MemoryDocumentStore) -> DocAdminMessageRepository<MemoryDocumentStore> {
    DocAdminMessageRepository {
        store: store.clone(),
    }
}

fn announcement_repo(store: &MemoryDocumentStore) -> DocAnnouncementRepository<MemoryDocumentStore> {
    DocAnnouncementRepository {
        store: store.clone(),
    }
}

fn contact(name: &str, email: &str, message: &str, user_id: Option<&str>) -> SubmitContactInput {
    SubmitContactInput {
        name: name.to_owned(),
        email: email.to_owned(),
        message: message.to_owned(),
        user_id: user_id.map(IdentityId::from),
    }
}

// ── Contact messages ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_submit_contact_message_as_waiting() {
    let store = MemoryDocumentStore::new();
    let submit = SubmitContactUseCase {
        messages: contact_repo(&store),
        clock: ManualClock::epoch(),
    };

    let message = submit
        .execute(contact(" Ann ", "ann@x.com", "hello", Some("uid-1")))
        .await
        .unwrap();
    assert_eq!(message.name, "Ann");
    assert_eq!(message.status, MessageStatus::Waiting);
    assert!(message.status_history.is_empty());

    for bad in [
        contact("", "ann@x.com", "hello", None),
        contact("Ann", "ann", "hello", None),
        contact("Ann", "ann@x.com", "   ", None),
    ] {
        assert!(matches!(
            submit.execute(bad).await,
            Err(ConsoleError::InvalidInput(_))
        ));
    }
}

#[tokio::test]
async fn should_filter_search_and_track_status_history() {
    let store = MemoryDocumentStore::new();
    let clock = ManualClock::epoch();
    let submit = SubmitContactUseCase {
        messages: contact_repo(&store),
        clock: clock.clone(),
    };
    let first = submit
        .execute(contact("Ann", "ann@x.com", "one", Some("uid-ann")))
        .await
        .unwrap();
    clock.advance(Duration::minutes(1));
    submit
        .execute(contact("Bo", "bo@y.com", "two", None))
        .await
        .unwrap();

    let update = UpdateContactStatusUseCase {
        messages: contact_repo(&store),
        clock: clock.clone(),
    };
    update
        .execute(first.id, MessageStatus::Pending, ADMIN_EMAIL)
        .await
        .unwrap();
    let updated = update
        .execute(first.id, MessageStatus::Success, ADMIN_EMAIL)
        .await
        .unwrap();
    let trail: Vec<MessageStatus> = updated.status_history.iter().map(|c| c.status).collect();
    assert_eq!(trail, [MessageStatus::Pending, MessageStatus::Success]);

    let list = ListContactMessagesUseCase {
        messages: contact_repo(&store),
    };
    let all = list.execute(ListContactInput::default()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].email, "bo@y.com");

    let done = list
        .execute(ListContactInput {
            status: Some(MessageStatus::Success),
            ..ListContactInput::default()
        })
        .await
        .unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].status_history.len(), 2);

    let by_user = list
        .execute(ListContactInput {
            search: Some("UID-ANN".to_owned()),
            ..ListContactInput::default()
        })
        .await
        .unwrap();
    assert_eq!(by_user.len(), 1);

    let missing = update
        .execute(ContactMessageId::new(), MessageStatus::Approved, ADMIN_EMAIL)
        .await;
    assert!(matches!(missing, Err(ConsoleError::MessageNotFound)));

    let delete = DeleteContactMessageUseCase {
        messages: contact_repo(&store),
    };
    delete.execute(first.id).await.unwrap();
    assert!(matches!(
        delete.execute(first.id).await,
        Err(ConsoleError::MessageNotFound)
    ));
}

// ── Direct messages ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_fan_out_one_message_per_distinct_recipient() {
    let store = MemoryDocumentStore::new();
    let compose = ComposeDirectMessageUseCase {
        messages: dm_repo(&store),
        clock: ManualClock::epoch(),
    };

    let sent = compose
        .execute(
            ComposeInput {
                recipients: vec!["uid-1".into(), "uid-2".into(), "uid-1".into()],
                title: "Hi".to_owned(),
                body: "Welcome".to_owned(),
            },
            ADMIN_EMAIL,
        )
        .await
        .unwrap();
    assert_eq!(sent.len(), 2);

    let inbox = InboxUseCase {
        messages: dm_repo(&store),
    };
    assert_eq!(inbox.execute(&IdentityId::from("uid-1")).await.unwrap().len(), 1);
    assert!(inbox.execute(&IdentityId::from("uid-9")).await.unwrap().is_empty());

    let empty = compose
        .execute(
            ComposeInput {
                recipients: Vec::new(),
                title: "Hi".to_owned(),
                body: "Welcome".to_owned(),
            },
            ADMIN_EMAIL,
        )
        .await;
    assert!(matches!(empty, Err(ConsoleError::InvalidInput(_))));
}

#[tokio::test]
async fn should_only_let_the_recipient_mark_read() {
    let store = MemoryDocumentStore::new();
    let sent = ComposeDirectMessageUseCase {
        messages: dm_repo(&store),
        clock: ManualClock::epoch(),
    }
    .execute(
        ComposeInput {
            recipients: vec!["uid-1".into()],
            title: "Hi".to_owned(),
            body: "Welcome".to_owned(),
        },
        ADMIN_EMAIL,
    )
    .await
    .unwrap();
    let id = sent[0].id;
    let mark = MarkReadUseCase {
        messages: dm_repo(&store),
    };

    assert!(matches!(
        mark.execute(&IdentityId::from("uid-2"), id).await,
        Err(ConsoleError::MessageNotFound)
    ));
    let read = mark.execute(&IdentityId::from("uid-1"), id).await.unwrap();
    assert_eq!(read.status, AdminMessageStatus::Read);
}

// ── Announcements ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_publish_list_and_delete_announcements() {
    let store = MemoryDocumentStore::new();
    let clock = ManualClock::epoch();
    let create = CreateAnnouncementUseCase {
        announcements: announcement_repo(&store),
        clock: clock.clone(),
    };

    let older = create
        .execute(
            CreateAnnouncementInput {
                title: "Maintenance".to_owned(),
                content: "Tonight".to_owned(),
                background: Background::None,
            },
            ADMIN_EMAIL,
        )
        .await
        .unwrap();
    clock.advance(Duration::minutes(1));
    create
        .execute(
            CreateAnnouncementInput {
                title: "Launch".to_owned(),
                content: "Today".to_owned(),
                background: Background::Image {
                    url: "https://cdn.example.com/a.png".to_owned(),
                    blur: 4,
                },
            },
            ADMIN_EMAIL,
        )
        .await
        .unwrap();

    let bad = create
        .execute(
            CreateAnnouncementInput {
                title: "Color".to_owned(),
                content: "x".to_owned(),
                background: Background::Color {
                    color: " ".to_owned(),
                },
            },
            ADMIN_EMAIL,
        )
        .await;
    assert!(matches!(bad, Err(ConsoleError::InvalidInput(_))));

    let feed = AnnouncementFeedUseCase {
        announcements: announcement_repo(&store),
    }
    .execute()
    .await;
    assert!(!feed.degraded);
    let titles: Vec<&str> = feed.announcements.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["Launch", "Maintenance"]);

    let list = ListAnnouncementsUseCase {
        announcements: announcement_repo(&store),
    };
    assert_eq!(list.execute(Some("maint")).await.unwrap().len(), 1);

    let delete = DeleteAnnouncementUseCase {
        announcements: announcement_repo(&store),
    };
    delete.execute(older.id).await.unwrap();
    assert!(matches!(
        delete.execute(AnnouncementId::new()).await,
        Err(ConsoleError::AnnouncementNotFound)
    ));
    assert_eq!(list.execute(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn should_degrade_feed_when_store_fails() {
    let feed = AnnouncementFeedUseCase {
        announcements: FailingAnnouncementRepo,
    }
    .execute()
    .await;
    assert!(feed.degraded);
    assert!(feed.announcements.is_empty());
}
