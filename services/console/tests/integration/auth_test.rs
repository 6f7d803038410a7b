use chrono::Utc;

use nexza_console::domain::repository::{UserRepository, UsernameRepository};
use nexza_console::error::{AccessError, AuthError, CodeError, ConsoleError};
use nexza_console::infra::memory::MemoryDocumentStore;
use nexza_console::infra::repo::{
    DocUserRepository, DocUsernameRepository, DocVerificationCodeRepository,
};
use nexza_console::usecase::auth::{AuthMode, CompleteAuthInput, CompleteAuthUseCase};
use nexza_console::usecase::verification::IssueCodeUseCase;
use nexza_domain::clock::Clock;
use nexza_domain::id::IdentityId;
use nexza_domain::username::Username;
use nexza_session_types::token::validate_session_token;
use nexza_testing::clock::ManualClock;
use nexza_testing::session::TEST_SESSION_SECRET;

use crate::helpers::{
    ADMIN_EMAIL, FakeIdentityProvider, RecordingNotifier, admins, code_repo, profile, user_repo,
    username_repo,
};

type Auth = CompleteAuthUseCase<
    DocVerificationCodeRepository<MemoryDocumentStore>,
    FakeIdentityProvider,
    DocUserRepository<MemoryDocumentStore>,
    DocUsernameRepository<MemoryDocumentStore>,
    ManualClock,
>;

fn auth(store: &MemoryDocumentStore, clock: &ManualClock, provider: FakeIdentityProvider) -> Auth {
    CompleteAuthUseCase {
        codes: code_repo(store),
        provider,
        users: user_repo(store),
        usernames: username_repo(store),
        clock: clock.clone(),
        admins: admins(),
        session_secret: TEST_SESSION_SECRET.to_owned(),
    }
}

async fn issue(store: &MemoryDocumentStore, clock: &ManualClock, email: &str) -> String {
    IssueCodeUseCase {
        codes: code_repo(store),
        notifier: RecordingNotifier::default(),
        clock: clock.clone(),
    }
    .execute(email)
    .await
    .unwrap()
    .code
}

fn input(email: &str, password: &str, code: &str, mode: AuthMode) -> CompleteAuthInput {
    CompleteAuthInput {
        email: email.to_owned(),
        password: password.to_owned(),
        code: code.to_owned(),
        mode,
        username: None,
        mobile: false,
    }
}

#[tokio::test]
async fn should_sign_up_with_verified_email_and_handle() {
    let store = MemoryDocumentStore::new();
    let clock = ManualClock::at(Utc::now());
    let code = issue(&store, &clock, "new@x.com").await;
    let provider = FakeIdentityProvider::default();

    let out = auth(&store, &clock, provider.clone())
        .execute(CompleteAuthInput {
            username: Some("123456".to_owned()),
            mobile: true,
            ..input("New@X.com", "secret1", &code, AuthMode::SignUp)
        })
        .await
        .unwrap();

    assert_eq!(out.profile.email, "new@x.com");
    assert!(out.profile.email_verified);
    assert!(!out.is_admin);
    assert!(provider.accounts.lock().unwrap().contains_key("new@x.com"));

    let stored = user_repo(&store)
        .find(&out.profile.identity_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.username.as_ref().map(Username::as_str), Some("123456"));
    assert!(stored.email_verified);

    let info = validate_session_token(&out.session_token, TEST_SESSION_SECRET).unwrap();
    assert_eq!(info.identity_id, out.profile.identity_id);
    assert!(info.mobile);
    assert_eq!(info.exp, out.session_exp);
}

#[tokio::test]
async fn should_refuse_taken_handle_without_burning_the_code() {
    let store = MemoryDocumentStore::new();
    let clock = ManualClock::at(Utc::now());
    let taken = Username::parse("654321").unwrap();
    username_repo(&store)
        .claim(&taken, &IdentityId::from("uid-owner"), clock.now())
        .await
        .unwrap();
    let code = issue(&store, &clock, "new@x.com").await;
    let usecase = auth(&store, &clock, FakeIdentityProvider::default());

    let result = usecase
        .execute(CompleteAuthInput {
            username: Some("654321".to_owned()),
            ..input("new@x.com", "secret1", &code, AuthMode::SignUp)
        })
        .await;
    assert!(matches!(result, Err(ConsoleError::UsernameTaken)));

    // Same code still works once the handle is dropped.
    usecase
        .execute(input("new@x.com", "secret1", &code, AuthMode::SignUp))
        .await
        .unwrap();
}

#[tokio::test]
async fn should_not_call_provider_when_code_is_wrong() {
    let store = MemoryDocumentStore::new();
    let clock = ManualClock::at(Utc::now());
    let code = issue(&store, &clock, "new@x.com").await;
    let wrong = if code == "000000" { "111111" } else { "000000" };
    let provider = FakeIdentityProvider::default();

    let result = auth(&store, &clock, provider.clone())
        .execute(input("new@x.com", "secret1", wrong, AuthMode::SignUp))
        .await;
    assert!(matches!(
        result,
        Err(ConsoleError::Code(CodeError::Mismatch))
    ));
    assert!(provider.accounts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_surface_provider_errors() {
    let store = MemoryDocumentStore::new();
    let clock = ManualClock::at(Utc::now());

    let code = issue(&store, &clock, "a@x.com").await;
    let result = auth(
        &store,
        &clock,
        FakeIdentityProvider::with_account("a@x.com", "uid-1", "secret1"),
    )
    .execute(input("a@x.com", "wrong-pass", &code, AuthMode::SignIn))
    .await;
    assert!(matches!(
        result,
        Err(ConsoleError::Auth(AuthError::WrongPassword))
    ));

    let code = issue(&store, &clock, "a@x.com").await;
    let result = auth(&store, &clock, FakeIdentityProvider::offline())
        .execute(input("a@x.com", "secret1", &code, AuthMode::SignIn))
        .await;
    assert!(matches!(result, Err(ConsoleError::Auth(AuthError::Network))));
}

#[tokio::test]
async fn should_reject_short_password_before_touching_the_code() {
    let store = MemoryDocumentStore::new();
    let clock = ManualClock::at(Utc::now());
    let code = issue(&store, &clock, "a@x.com").await;
    let usecase = auth(
        &store,
        &clock,
        FakeIdentityProvider::with_account("a@x.com", "uid-1", "secret1"),
    );

    let result = usecase
        .execute(input("a@x.com", "12345", &code, AuthMode::SignIn))
        .await;
    assert!(matches!(result, Err(ConsoleError::InvalidInput(_))));

    usecase
        .execute(input("a@x.com", "secret1", &code, AuthMode::SignIn))
        .await
        .unwrap();
}

#[tokio::test]
async fn should_turn_away_banned_account_at_sign_in() {
    let store = MemoryDocumentStore::new();
    let clock = ManualClock::at(Utc::now());
    let users = user_repo(&store);
    let banned = profile("uid-1", "a@x.com", clock.now());
    users.create(&banned).await.unwrap();
    users
        .set_banned(&banned.identity_id, true, clock.now())
        .await
        .unwrap();
    let code = issue(&store, &clock, "a@x.com").await;

    let result = auth(
        &store,
        &clock,
        FakeIdentityProvider::with_account("a@x.com", "uid-1", "secret1"),
    )
    .execute(input("a@x.com", "secret1", &code, AuthMode::SignIn))
    .await;
    assert!(matches!(
        result,
        Err(ConsoleError::Access(AccessError::Banned))
    ));
}

#[tokio::test]
async fn should_flag_allow_listed_address_as_admin() {
    let store = MemoryDocumentStore::new();
    let clock = ManualClock::at(Utc::now());
    let code = issue(&store, &clock, ADMIN_EMAIL).await;

    let out = auth(
        &store,
        &clock,
        FakeIdentityProvider::with_account(ADMIN_EMAIL, "uid-admin", "secret1"),
    )
    .execute(input(ADMIN_EMAIL, "secret1", &code, AuthMode::SignIn))
    .await
    .unwrap();

    assert!(out.is_admin);
    assert!(out.profile.is_admin);
    assert_eq!(out.profile.identity_id, IdentityId::from("uid-admin"));
}

#[tokio::test]
async fn should_ignore_handle_on_sign_in() {
    let store = MemoryDocumentStore::new();
    let clock = ManualClock::at(Utc::now());
    let code = issue(&store, &clock, "a@x.com").await;

    let out = auth(
        &store,
        &clock,
        FakeIdentityProvider::with_account("a@x.com", "uid-1", "secret1"),
    )
    .execute(CompleteAuthInput {
        username: Some("not-six-digits".to_owned()),
        ..input("a@x.com", "secret1", &code, AuthMode::SignIn)
    })
    .await
    .unwrap();
    assert!(out.profile.username.is_none());
}
