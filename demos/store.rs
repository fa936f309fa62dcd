use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tsunagi::*;

// Define regular traits and implementor structs

trait Store: Send + Sync {
    fn users(&self) -> Vec<String>;
    fn groups(&self) -> Vec<String>;
}

trait UserRepository: Send + Sync {
    fn find_all(&self) -> Vec<String>;
}

trait GroupRepository: Send + Sync {
    fn find_all(&self) -> Vec<String>;
}

struct StoreOnMemory {
    users: Vec<String>,
    groups: Vec<String>,
}

impl StoreOnMemory {
    fn new() -> Self {
        Self {
            users: vec!["user-1".into(), "user-2".into(), "user-3".into()],
            groups: vec!["group-1".into(), "group-2".into(), "group-3".into()],
        }
    }
}

impl Store for StoreOnMemory {
    fn users(&self) -> Vec<String> {
        self.users.clone()
    }

    fn groups(&self) -> Vec<String> {
        self.groups.clone()
    }
}

struct UserRepositoryOnMemory {
    store: Arc<dyn Store>,
}

impl UserRepository for UserRepositoryOnMemory {
    fn find_all(&self) -> Vec<String> {
        self.store.users()
    }
}

struct GroupRepositoryOnMemory {
    store: Arc<dyn Store>,
}

impl GroupRepositoryOnMemory {
    fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl GroupRepository for GroupRepositoryOnMemory {
    fn find_all(&self) -> Vec<String> {
        self.store.groups()
    }
}

struct ProjectService {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl ProjectService {
    fn find_user(&self) -> Vec<String> {
        self.users.find_all()
    }

    fn find_group(&self) -> Vec<String> {
        self.groups.find_all()
    }
}

// Declare injected fields and trait links

injectable!(UserRepositoryOnMemory { store: Arc<dyn Store> });
injectable!(ProjectService {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
});

implements!(dyn Store => StoreOnMemory);
implements!(dyn UserRepository => UserRepositoryOnMemory);
implements!(dyn GroupRepository => GroupRepositoryOnMemory);

// Declare the bindings, split in two modules

fn storage(binder: &Binder) {
    binder
        .bind::<dyn Store>()
        .to_constructor(StoreOnMemory::new)
        .as_eager_singleton();
}

fn services(binder: &Binder) {
    binder
        .bind::<dyn UserRepository>()
        .to::<UserRepositoryOnMemory>()
        .in_scope(Scope::Singleton);
    binder
        .bind::<dyn GroupRepository>()
        .to_constructor(GroupRepositoryOnMemory::new)
        .in_scope(Scope::Singleton);
    binder.bind_concrete::<ProjectService>().as_eager_singleton();
}

fn main() -> Result<(), WiringError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let injector = create_injector(&[&storage, &services])?;

    let users: Arc<dyn UserRepository> = injector.get()?;
    let groups: Arc<dyn GroupRepository> = injector.get()?;
    let service: Arc<ProjectService> = injector.get()?;

    println!("UserRepository#find_all => {:?}", users.find_all());
    println!("GroupRepository#find_all => {:?}", groups.find_all());
    println!("ProjectService#find_user => {:?}", service.find_user());
    println!("ProjectService#find_group => {:?}", service.find_group());

    Ok(())
}
