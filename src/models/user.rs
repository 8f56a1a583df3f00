use serde::Serialize;

/// User row as stored in `usuario`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    #[sqlx(rename = "correo")]
    pub email: String,
    /// argon2id PHC string (salt embedded)
    #[sqlx(rename = "clave")]
    pub password_hash: String,
    #[sqlx(rename = "nombre")]
    pub name: String,
    /// Random token identifying the user's session cookie
    #[sqlx(rename = "sesion")]
    pub session_token: String,
}

/// User model without credentials, safe to render or log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            name: record.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_drops_password_hash() {
        let record = UserRecord {
            id: 7,
            email: "ana@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            name: "ANA".to_string(),
            session_token: "5f1c7b1e-0c43-4d7e-9a51-8d4f2f0c9e10".to_string(),
        };

        let user = User::from(record);
        let json = serde_json::to_string(&user).unwrap();

        assert_eq!(user.id, 7);
        assert!(!json.contains("argon2"));
        assert!(!json.contains("5f1c7b1e"));
    }
}
