//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{ActivityLevel, Allergen, Diet, Gender, Role};
use crate::{
    error::{ApiError, ApiResult},
    validation::{non_negative, require_text, validate_email, validate_password, validate_username},
};

/// What a user cannot or will not eat
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DietaryProfile {
    #[serde(default)]
    pub allergies: Vec<Allergen>,
    pub diet: Option<Diet>,
    #[serde(default)]
    pub excluded_ingredients: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Biometrics {
    pub gender: Option<Gender>,
    /// Kilograms
    pub weight: Option<f64>,
    /// Centimetres
    pub height: Option<f64>,
    pub age: Option<u32>,
    pub activity_level: Option<ActivityLevel>,
}

impl Biometrics {
    pub fn validate(&self) -> ApiResult<()> {
        if let Some(weight) = self.weight {
            non_negative("weight", weight)?;
        }
        if let Some(height) = self.height {
            non_negative("height", height)?;
        }
        Ok(())
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub password_hash: String,
    pub email: String,
    pub role: Role,
    pub dietary_profile: DietaryProfile,
    pub biometrics: Biometrics,
    pub created_ingredients: Vec<Uuid>,
    pub created_recipes: Vec<Uuid>,
    pub favorite_recipes: Vec<Uuid>,
    pub saved_menus: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a user from a validated registration and an already hashed password
    pub fn create(new: NewUser, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: new.username.trim().to_string(),
            name: new.name.trim().to_string(),
            password_hash,
            email: new.email.trim().to_string(),
            role,
            dietary_profile: new.dietary_profile,
            biometrics: new.biometrics,
            created_ingredients: Vec::new(),
            created_recipes: Vec::new(),
            favorite_recipes: Vec::new(),
            saved_menus: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Apply a validated update; `password_hash` replaces the stored hash
    pub fn apply(&self, update: UpdateUser, password_hash: Option<String>) -> Self {
        let mut next = self.clone();
        if let Some(username) = update.username {
            next.username = username.trim().to_string();
        }
        if let Some(name) = update.name {
            next.name = name.trim().to_string();
        }
        if let Some(hash) = password_hash {
            next.password_hash = hash;
        }
        if let Some(email) = update.email {
            next.email = email.trim().to_string();
        }
        if let Some(role) = update.role {
            next.role = role;
        }
        if let Some(profile) = update.dietary_profile {
            next.dietary_profile = profile;
        }
        if let Some(biometrics) = update.biometrics {
            next.biometrics = biometrics;
        }
        if let Some(favorites) = update.favorite_recipes {
            next.favorite_recipes = super::dedup(favorites);
        }
        next.updated_at = Utc::now();
        next
    }

    /// Whether the user owns anything that must be handed over on deletion
    pub fn owns_content(&self) -> bool {
        !self.created_ingredients.is_empty() || !self.created_recipes.is_empty()
    }
}

/// Append `id` unless already present
pub fn push_id(list: &mut Vec<Uuid>, id: Uuid) {
    if !list.contains(&id) {
        list.push(id);
    }
}

/// Remove every occurrence of `id`, reporting whether anything changed
pub fn pull_id(list: &mut Vec<Uuid>, id: Uuid) -> bool {
    let before = list.len();
    list.retain(|existing| *existing != id);
    list.len() != before
}

/// New user registration payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub dietary_profile: DietaryProfile,
    #[serde(default)]
    pub biometrics: Biometrics,
}

impl NewUser {
    pub fn validate(&self) -> ApiResult<()> {
        validate_username(self.username.trim()).map_err(|e| ApiError::validation("username", e))?;
        require_text("name", &self.name)?;
        validate_password(&self.password).map_err(|e| ApiError::validation("password", e))?;
        validate_email(self.email.trim()).map_err(|e| ApiError::validation("email", e))?;
        self.biometrics.validate()
    }
}

/// User update payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub dietary_profile: Option<DietaryProfile>,
    pub biometrics: Option<Biometrics>,
    pub favorite_recipes: Option<Vec<Uuid>>,
}

impl UpdateUser {
    pub fn validate(&self) -> ApiResult<()> {
        if let Some(username) = &self.username {
            validate_username(username.trim()).map_err(|e| ApiError::validation("username", e))?;
        }
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(password) = &self.password {
            validate_password(password).map_err(|e| ApiError::validation("password", e))?;
        }
        if let Some(email) = &self.email {
            validate_email(email.trim()).map_err(|e| ApiError::validation("email", e))?;
        }
        if let Some(biometrics) = &self.biometrics {
            biometrics.validate()?;
        }
        Ok(())
    }
}

/// User login credentials
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// User as returned to clients, without the password hash
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub dietary_profile: DietaryProfile,
    pub biometrics: Biometrics,
    pub created_ingredients: Vec<Uuid>,
    pub created_recipes: Vec<Uuid>,
    pub favorite_recipes: Vec<Uuid>,
    pub saved_menus: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            name: user.name,
            email: user.email,
            role: user.role,
            dietary_profile: user.dietary_profile,
            biometrics: user.biometrics,
            created_ingredients: user.created_ingredients,
            created_recipes: user.created_recipes,
            favorite_recipes: user.favorite_recipes,
            saved_menus: user.saved_menus,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> NewUser {
        NewUser {
            username: "testUser".into(),
            name: "Test User".into(),
            password: "Test1234".into(),
            email: "test.user@example.com".into(),
            dietary_profile: DietaryProfile::default(),
            biometrics: Biometrics::default(),
        }
    }

    #[test]
    fn test_registration_validation() {
        assert!(registration().validate().is_ok());

        let mut bad_email = registration();
        bad_email.email = "not-an-email".into();
        let err = bad_email.validate().unwrap_err();
        assert!(matches!(err, ApiError::ValidationFailed { ref field, .. } if field == "email"));

        let mut weak = registration();
        weak.password = "password".into();
        assert!(weak.validate().is_err());

        let mut negative = registration();
        negative.biometrics.weight = Some(-70.0);
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_response_hides_password_hash() {
        let user = User::create(registration(), "$argon2id$hash".into(), Role::Regular);
        let body = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(body.get("passwordHash").is_none());
        assert_eq!(body["role"], "regular");
    }

    #[test]
    fn test_apply_update() {
        let user = User::create(registration(), "old".into(), Role::Regular);
        let favourite = Uuid::new_v4();
        let next = user.apply(
            UpdateUser {
                name: Some(" Renamed ".into()),
                favorite_recipes: Some(vec![favourite, favourite]),
                ..UpdateUser::default()
            },
            Some("new".into()),
        );
        assert_eq!(next.name, "Renamed");
        assert_eq!(next.password_hash, "new");
        assert_eq!(next.favorite_recipes, vec![favourite]);
        assert_eq!(next.username, user.username);
    }

    #[test]
    fn test_id_lists() {
        let id = Uuid::new_v4();
        let mut list = Vec::new();
        push_id(&mut list, id);
        push_id(&mut list, id);
        assert_eq!(list.len(), 1);
        assert!(pull_id(&mut list, id));
        assert!(!pull_id(&mut list, id));
    }
}
