//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

pub mod clock {
    //! Controllable time source.

    use std::sync::{Mutex, MutexGuard};

    use chrono::{DateTime, Local, TimeDelta, Utc};
    use mockable::Clock;

    /// Clock whose current instant only moves when told to.
    #[derive(Debug)]
    pub struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        pub fn advance_seconds(&self, seconds: i64) {
            *self.lock_clock() += TimeDelta::seconds(seconds);
        }

        fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
            match self.0.lock() {
                Ok(guard) => guard,
                Err(_) => panic!("clock mutex"),
            }
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock_clock()
        }
    }
}

pub mod keys {
    //! Process-wide RSA key pair for token tests.
    //!
    //! Generating a 2048-bit key is slow, so one pair is shared by every test
    //! in the binary.

    use std::sync::{Arc, OnceLock};

    use crate::domain::SigningKeys;
    use crate::outbound::keys::{KeyPairPem, generate_key_pair};

    struct SharedKeys {
        pem: KeyPairPem,
        signing: Arc<SigningKeys>,
    }

    static SHARED: OnceLock<SharedKeys> = OnceLock::new();

    fn shared() -> &'static SharedKeys {
        SHARED.get_or_init(|| {
            let pem = generate_key_pair().expect("generate test key pair");
            let signing = SigningKeys::from_pem(pem.private_pem.as_bytes(), pem.public_pem.as_bytes())
                .expect("parse test key pair");
            SharedKeys {
                pem,
                signing: Arc::new(signing),
            }
        })
    }

    /// Signing keys shared across tests.
    pub fn test_signing_keys() -> Arc<SigningKeys> {
        Arc::clone(&shared().signing)
    }

    /// PKCS#1 PEM of the shared private key, for hand-crafted tokens.
    pub fn test_private_key_pem() -> &'static str {
        shared().pem.private_pem.as_str()
    }
}

pub mod repositories {
    //! In-memory implementations of the driven persistence ports.

    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard};

    use async_trait::async_trait;

    use crate::domain::ports::{
        RecipePersistenceError, RecipeRepository, UserPersistenceError, UserRepository,
    };
    use crate::domain::{
        Ingredient, IngredientId, IngredientPlan, NewUser, PageRequest, Recipe, RecipeDraft,
        RecipeId, User, UserId, UserName,
    };

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        match mutex.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("repository mutex"),
        }
    }

    fn window<T: Clone>(items: impl Iterator<Item = T>, page: PageRequest) -> Vec<T> {
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(0);
        items.skip(skip).take(take).collect()
    }

    #[derive(Default)]
    struct UserState {
        last_id: i64,
        users: BTreeMap<i64, User>,
    }

    /// User store kept in a mutex-guarded map, ordered by id.
    #[derive(Default)]
    pub struct InMemoryUserRepository {
        state: Mutex<UserState>,
    }

    impl InMemoryUserRepository {
        /// Seed a user with a hashed password.
        pub async fn insert(&self, name: &str, enabled: bool, password: &str) -> User {
            let name = UserName::new(name).expect("valid user name");
            let new_user = NewUser::new(name, enabled, password).expect("valid password");
            self.create(&new_user).await.expect("seed user")
        }

        /// Seed an enabled user that has no password hash.
        pub async fn insert_without_password(&self, name: &str) -> User {
            let name = UserName::new(name).expect("valid user name");
            let mut state = lock(&self.state);
            state.last_id += 1;
            let id = UserId::new(state.last_id).expect("positive id");
            let user = User::new(id, name, true);
            state.users.insert(id.get(), user.clone());
            user
        }
    }

    impl UserState {
        fn name_taken(&self, name: &UserName, except: Option<UserId>) -> bool {
            self.users
                .values()
                .any(|user| user.name() == name && Some(user.id()) != except)
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
            Ok(lock(&self.state).users.get(&id.get()).cloned())
        }

        async fn find_by_name(
            &self,
            name: &UserName,
        ) -> Result<Option<User>, UserPersistenceError> {
            Ok(lock(&self.state)
                .users
                .values()
                .find(|user| user.name() == name)
                .cloned())
        }

        async fn count(&self) -> Result<i64, UserPersistenceError> {
            let count = lock(&self.state).users.len();
            i64::try_from(count).map_err(|err| UserPersistenceError::query(err.to_string()))
        }

        async fn list_page(&self, page: PageRequest) -> Result<Vec<User>, UserPersistenceError> {
            Ok(window(lock(&self.state).users.values().cloned(), page))
        }

        async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
            let mut state = lock(&self.state);
            if state.name_taken(user.name(), None) {
                return Err(UserPersistenceError::duplicate_name(user.name().as_ref()));
            }
            state.last_id += 1;
            let id = UserId::new(state.last_id)
                .map_err(|err| UserPersistenceError::query(err.to_string()))?;
            let created = user.clone().into_user(id);
            state.users.insert(id.get(), created.clone());
            Ok(created)
        }

        async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
            let mut state = lock(&self.state);
            if !state.users.contains_key(&user.id().get()) {
                return Ok(false);
            }
            if state.name_taken(user.name(), Some(user.id())) {
                return Err(UserPersistenceError::duplicate_name(user.name().as_ref()));
            }
            state.users.insert(user.id().get(), user.clone());
            Ok(true)
        }

        async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
            Ok(lock(&self.state).users.remove(&id.get()).is_some())
        }
    }

    #[derive(Default)]
    struct RecipeState {
        last_recipe_id: i64,
        last_ingredient_id: i64,
        recipes: BTreeMap<i64, Recipe>,
    }

    impl RecipeState {
        fn next_ingredient_id(&mut self) -> Result<IngredientId, RecipePersistenceError> {
            self.last_ingredient_id += 1;
            IngredientId::new(self.last_ingredient_id)
                .map_err(|err| RecipePersistenceError::query(err.to_string()))
        }
    }

    /// Recipe store applying the same ingredient reconciliation as the
    /// database adapter.
    #[derive(Default)]
    pub struct InMemoryRecipeRepository {
        state: Mutex<RecipeState>,
    }

    #[async_trait]
    impl RecipeRepository for InMemoryRecipeRepository {
        async fn list_page(&self, page: PageRequest) -> Result<Vec<Recipe>, RecipePersistenceError> {
            Ok(window(lock(&self.state).recipes.values().cloned(), page))
        }

        async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipePersistenceError> {
            Ok(lock(&self.state).recipes.get(&id.get()).cloned())
        }

        async fn create(&self, draft: &RecipeDraft) -> Result<Recipe, RecipePersistenceError> {
            let mut state = lock(&self.state);
            state.last_recipe_id += 1;
            let id = RecipeId::new(state.last_recipe_id)
                .map_err(|err| RecipePersistenceError::query(err.to_string()))?;
            let ingredients = draft
                .ingredients()
                .iter()
                .map(|submitted| {
                    Ok(Ingredient {
                        id: state.next_ingredient_id()?,
                        name: submitted.name.clone(),
                        quantity: submitted.quantity.clone(),
                    })
                })
                .collect::<Result<Vec<_>, RecipePersistenceError>>()?;
            let recipe = Recipe {
                id,
                title: draft.title().to_owned(),
                description: draft.description().to_owned(),
                ingredients,
            };
            state.recipes.insert(id.get(), recipe.clone());
            Ok(recipe)
        }

        async fn update(
            &self,
            id: RecipeId,
            draft: &RecipeDraft,
        ) -> Result<Option<Recipe>, RecipePersistenceError> {
            let mut state = lock(&self.state);
            let Some(existing) = state.recipes.get(&id.get()) else {
                return Ok(None);
            };
            let plan = IngredientPlan::new(&existing.ingredients, draft.ingredients());
            let inserted_ids = plan
                .inserts()
                .iter()
                .map(|_| state.next_ingredient_id())
                .collect::<Result<Vec<_>, _>>()?;
            let ingredients = plan
                .into_ingredients(&inserted_ids)
                .map_err(|err| RecipePersistenceError::query(err.to_string()))?;
            let recipe = Recipe {
                id,
                title: draft.title().to_owned(),
                description: draft.description().to_owned(),
                ingredients,
            };
            state.recipes.insert(id.get(), recipe.clone());
            Ok(Some(recipe))
        }

        async fn delete(&self, id: RecipeId) -> Result<bool, RecipePersistenceError> {
            Ok(lock(&self.state).recipes.remove(&id.get()).is_some())
        }
    }
}

pub use clock::MutableClock;
pub use keys::{test_private_key_pem, test_signing_keys};
pub use repositories::{InMemoryRecipeRepository, InMemoryUserRepository};
