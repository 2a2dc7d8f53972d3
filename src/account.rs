// User and order lookups

use crate::config::Config;
use crate::error::{Entity, Result, ShopError, require_id};
use crate::models::{Order, Session, User};
use crate::store::RecordStore;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info};

pub struct AccountRepository {
    data_dir: PathBuf,
}

impl AccountRepository {
    pub fn new(config: &Config) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
        }
    }

    /// Match a username/password pair against the `user` collection.
    ///
    /// Passwords are stored and compared in plaintext.
    pub fn login(&self, username: &str, password: &str) -> Result<Session> {
        if username.is_empty() {
            return Err(ShopError::MissingParameter("username"));
        }
        if password.is_empty() {
            return Err(ShopError::MissingParameter("password"));
        }

        let store = RecordStore::<User>::open(&self.data_dir)?;
        let user = store
            .get()?
            .iter()
            .find(|user| user.username == username && user.password == password)
            .ok_or_else(|| ShopError::not_found(Entity::User, username))?;

        info!(uid = user.id, username, "User logged in");
        Ok(Session {
            uid: user.id,
            username: user.username.clone(),
        })
    }

    /// The user's profile (address book)
    pub fn address(&self, uid: u64) -> Result<Value> {
        require_id(uid, "uid")?;

        let store = RecordStore::<User>::open(&self.data_dir)?;
        let user = store
            .get()?
            .iter()
            .find(|user| user.id == uid)
            .ok_or_else(|| ShopError::not_found(Entity::User, uid))?;

        Ok(user.profile.clone())
    }

    /// Orders placed by the user, in collection order
    pub fn orders(&self, uid: u64) -> Result<Vec<Order>> {
        require_id(uid, "uid")?;

        let store = RecordStore::<Order>::open(&self.data_dir)?;
        let orders: Vec<Order> = store.get()?.iter().filter(|order| order.uid == uid).cloned().collect();

        debug!(uid, count = orders.len(), "Listed orders");
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, AccountRepository) {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("user.json"),
            r#"[
                {"id":1,"username":"alice","password":"secret","profile":{"addresses":[{"city":"Lisbon"}]}},
                {"id":2,"username":"bob","password":"hunter2"}
            ]"#,
        )
        .unwrap();
        fs::write(
            temp.path().join("order.json"),
            r#"[
                {"id":1,"uid":1,"total":10},
                {"id":2,"uid":2,"total":20},
                {"id":3,"uid":1,"total":30}
            ]"#,
        )
        .unwrap();
        let repo = AccountRepository::new(&Config::new(temp.path()));
        (temp, repo)
    }

    #[test]
    fn test_login_success() {
        let (_temp, repo) = setup();

        let session = repo.login("alice", "secret").unwrap();
        assert_eq!(
            session,
            Session {
                uid: 1,
                username: "alice".to_string()
            }
        );
    }

    #[test]
    fn test_login_wrong_password() {
        let (_temp, repo) = setup();
        assert_eq!(repo.login("alice", "nope").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_login_missing_parameters() {
        let (_temp, repo) = setup();

        assert!(matches!(repo.login("", "secret"), Err(ShopError::MissingParameter("username"))));
        assert!(matches!(repo.login("alice", ""), Err(ShopError::MissingParameter("password"))));
    }

    #[test]
    fn test_address() {
        let (_temp, repo) = setup();

        assert_eq!(repo.address(1).unwrap(), json!({"addresses": [{"city": "Lisbon"}]}));
        assert_eq!(repo.address(2).unwrap(), Value::Null);
        assert_eq!(repo.address(3).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(repo.address(0).unwrap_err().kind(), ErrorKind::MissingParameter);
    }

    #[test]
    fn test_orders_filtered_by_user() {
        let (_temp, repo) = setup();

        let orders = repo.orders(1).unwrap();
        let ids: Vec<u64> = orders.iter().map(|order| order.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(orders[1].extra.get("total"), Some(&json!(30)));

        assert!(repo.orders(5).unwrap().is_empty());
    }

    #[test]
    fn test_orders_unavailable() {
        let temp = TempDir::new().unwrap();
        let repo = AccountRepository::new(&Config::new(temp.path()));
        assert_eq!(repo.orders(1).unwrap_err().kind(), ErrorKind::StoreUnavailable);
    }
}
