use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{NewUser, User};
use crate::schema::users;

use super::models::{NewUserRow, UserRow};

fn to_user(row: UserRow) -> Result<User, DomainError> {
    let role = row
        .role
        .parse()
        .map_err(|e: String| DomainError::Internal(format!("user {}: {}", row.id, e)))?;
    Ok(User {
        id: row.id,
        name: row.name,
        email: row.email,
        password_hash: row.password_hash,
        role,
        created_at: row.created_at,
    })
}

#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for DieselUserRepository {
    fn create(&self, user: NewUser) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;
        let id = Uuid::new_v4();
        let inserted = diesel::insert_into(users::table)
            .values(&NewUserRow {
                id,
                name: user.name,
                email: user.email,
                password_hash: user.password_hash,
                role: user.role.as_str().to_string(),
            })
            .execute(&mut conn);

        match inserted {
            Ok(_) => Ok(id),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(DomainError::validation("User already exists"))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get()?;
        users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(to_user)
            .transpose()
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get()?;
        users::table
            .find(id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(to_user)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Role;
    use crate::infrastructure::test_db::setup_db;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Demo User".into(),
            email: email.into(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn create_and_find() {
        let (_container, pool) = setup_db().await;
        let repo = DieselUserRepository::new(pool);

        let id = repo.create(new_user("user@demo.com")).expect("create failed");

        let by_email = repo
            .find_by_email("user@demo.com")
            .expect("find failed")
            .expect("user should exist");
        assert_eq!(by_email.id, id);
        assert_eq!(by_email.role, Role::User);

        let by_id = repo.find_by_id(id).expect("find failed").expect("exists");
        assert_eq!(by_id.email, "user@demo.com");
        assert!(repo.find_by_id(Uuid::new_v4()).expect("find failed").is_none());
    }

    #[tokio::test]
    async fn duplicate_email_hits_unique_index() {
        let (_container, pool) = setup_db().await;
        let repo = DieselUserRepository::new(pool);

        repo.create(new_user("twice@demo.com")).expect("create failed");
        let err = repo.create(new_user("twice@demo.com")).unwrap_err();

        assert!(matches!(err, DomainError::Validation(msg) if msg == "User already exists"));
    }
}
