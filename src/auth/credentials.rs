use crate::db::{Identity, Role, UserId};

#[derive(Debug, Clone)]
struct Credential {
    identity: Identity,
    password: String,
}

/// The mock user database. Passwords are kept and compared in plain text.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    credentials: Vec<Credential>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        let mut store = Self::new();
        store.insert(1, "Admin User", "admin@example.com", "admin123", Role::Admin);
        store.insert(2, "Author User", "author@example.com", "author123", Role::Author);
        store.insert(
            3,
            "Reviewer User",
            "reviewer@example.com",
            "reviewer123",
            Role::Reviewer,
        );
        store
    }

    fn insert(&mut self, id: i64, name: &str, email: &str, password: &str, role: Role) {
        self.credentials.push(Credential {
            identity: Identity {
                id: UserId(id),
                name: name.to_string(),
                email: email.to_string(),
                role,
            },
            password: password.to_string(),
        });
    }

    /// Exact match on all three fields; callers cannot tell which one was wrong.
    pub fn authenticate(&self, email: &str, password: &str, role: Role) -> Option<Identity> {
        self.credentials
            .iter()
            .find(|c| c.identity.email == email && c.password == password && c.identity.role == role)
            .map(|c| c.identity.clone())
    }

    /// Adds an author account. `None` when the email is already taken.
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Option<Identity> {
        if self.credentials.iter().any(|c| c.identity.email == email) {
            return None;
        }
        let id = self.credentials.len() as i64 + 1;
        self.insert(id, name, email, password, Role::Author);
        self.find(UserId(id))
    }

    pub fn find(&self, id: UserId) -> Option<Identity> {
        self.credentials
            .iter()
            .find(|c| c.identity.id == id)
            .map(|c| c.identity.clone())
    }

    pub fn reviewers(&self) -> Vec<Identity> {
        self.credentials
            .iter()
            .filter(|c| c.identity.role == Role::Reviewer)
            .map(|c| c.identity.clone())
            .collect()
    }
}
