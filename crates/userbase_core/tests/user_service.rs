use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use userbase_core::{
    sum, Context, ContextError, InMemoryUserRepository, NewUser, RepoError, RepoResult,
    ServiceError, User, UserId, UserRepository, UserService, UserValidationError,
};

/// Wraps the in-memory repository and counts every call that reaches storage.
#[derive(Default)]
struct CountingRepository {
    inner: InMemoryUserRepository,
    calls: AtomicUsize,
}

impl CountingRepository {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl UserRepository for CountingRepository {
    fn create(&self, draft: NewUser) -> RepoResult<User> {
        self.touch();
        self.inner.create(draft)
    }

    fn get_by_id(&self, id: UserId) -> RepoResult<User> {
        self.touch();
        self.inner.get_by_id(id)
    }

    fn list(&self) -> Vec<User> {
        self.touch();
        self.inner.list()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Repository whose lookups always fail.
struct FailingRepository;

impl UserRepository for FailingRepository {
    fn create(&self, draft: NewUser) -> RepoResult<User> {
        InMemoryUserRepository::new().create(draft)
    }

    fn get_by_id(&self, id: UserId) -> RepoResult<User> {
        Err(RepoError::NotFound(id))
    }

    fn list(&self) -> Vec<User> {
        Vec::new()
    }

    fn len(&self) -> usize {
        0
    }
}

#[test]
fn register_user_returns_strictly_increasing_ids() {
    let service = UserService::new(InMemoryUserRepository::new());

    let mut last = 0;
    for index in 0..10 {
        let user = service
            .register_user(format!("user{index}"), format!("u{index}@example.com"))
            .unwrap();
        assert!(user.id > last);
        last = user.id;
    }
}

#[test]
fn register_user_rejects_empty_input_without_mutation() {
    let service = UserService::new(CountingRepository::default());
    service.register_user("seed", "seed@example.com").unwrap();
    let calls_before = service.repository().calls();

    let empty_name = service.register_user("", "x@example.com").unwrap_err();
    assert_eq!(
        empty_name,
        ServiceError::Validation(UserValidationError::EmptyName)
    );

    let empty_email = service.register_user("x", "").unwrap_err();
    assert_eq!(
        empty_email,
        ServiceError::Validation(UserValidationError::EmptyEmail)
    );

    assert_eq!(service.repository().len(), 1);
    assert_eq!(service.repository().calls(), calls_before);
}

#[test]
fn get_user_returns_registered_record() {
    let service = UserService::new(InMemoryUserRepository::new());
    let created = service.register_user("Gaurav", "gaurav@example.com").unwrap();

    let fetched = service.get_user(&Context::background(), created.id).unwrap();
    assert_eq!(fetched, created);
}

#[test]
fn get_user_passes_not_found_through() {
    let service = UserService::new(InMemoryUserRepository::new());

    let err = service.get_user(&Context::background(), 7).unwrap_err();
    assert_eq!(err, ServiceError::Repo(RepoError::NotFound(7)));
    assert_eq!(err.to_string(), "user not found: 7");
}

#[test]
fn get_user_surfaces_forced_repository_errors() {
    let service = UserService::new(FailingRepository);
    let created = service.register_user("a", "a@example.com").unwrap();

    let err = service
        .get_user(&Context::background(), created.id)
        .unwrap_err();
    assert!(matches!(err, ServiceError::Repo(RepoError::NotFound(id)) if id == created.id));
}

#[test]
fn expired_context_fails_before_repository_access() {
    let service = UserService::new(CountingRepository::default());
    service.register_user("Gaurav", "gaurav@example.com").unwrap();
    let calls_before = service.repository().calls();

    let (ctx, _cancel) = Context::with_deadline(&Context::background(), Instant::now());
    let err = service.get_user(&ctx, 1).unwrap_err();

    assert_eq!(err, ServiceError::Context(ContextError::DeadlineExceeded));
    assert_eq!(err.to_string(), "context deadline exceeded");
    assert_eq!(service.repository().calls(), calls_before);
    assert_eq!(service.repository().len(), 1);
}

#[test]
fn canceled_context_fails_before_repository_access() {
    let service = UserService::new(CountingRepository::default());
    service.register_user("Gaurav", "gaurav@example.com").unwrap();
    let calls_before = service.repository().calls();

    let (ctx, cancel) = Context::with_timeout(&Context::background(), Duration::from_secs(60));
    assert!(service.get_user(&ctx, 1).is_ok());

    cancel.cancel();
    let err = service.get_user(&ctx, 1).unwrap_err();
    assert_eq!(err, ServiceError::Context(ContextError::Canceled));
    assert_eq!(service.repository().calls(), calls_before + 1);
}

#[test]
fn reference_flow_registers_fetches_and_lists() {
    let repo = Arc::new(InMemoryUserRepository::new());
    let service = UserService::new(Arc::clone(&repo));

    let gaurav = service.register_user("Gaurav", "gaurav@example.com").unwrap();
    let amit = service.register_user("Amit", "amit@example.com").unwrap();
    assert_eq!(gaurav.id, 1);
    assert_eq!(amit.id, 2);

    let (ctx, _cancel) = Context::with_timeout(&Context::background(), Duration::from_secs(2));
    let fetched = service.get_user(&ctx, 1).unwrap();
    assert_eq!(fetched, gaurav);

    let names: HashSet<_> = repo.list().into_iter().map(|user| user.name).collect();
    assert_eq!(
        names,
        HashSet::from(["Gaurav".to_string(), "Amit".to_string()])
    );
    assert_eq!(service.list_users().len(), 2);

    assert_eq!(sum(&[1, 2, 3, 4, 5]), 15);
}
