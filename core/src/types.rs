//! Domain DTOs for the Forked API.
//!
//! # Design
//! These types mirror the backend's wire format but are defined
//! independently of the mock-server crate; integration tests catch schema
//! drift. The backend stores documents under `_id` keys and uses Italian
//! field names for ingredient data (`nome`, `quantita`, `unita`); those
//! names are the protocol, so they are expressed here as serde renames
//! rather than leaking into the Rust field names.
//!
//! Entities are constructed by the backend and transported through this
//! layer unchanged. `ingredients` and `instructions` ordering is meaningful
//! and must survive the round-trip, hence plain `Vec`s everywhere.

use serde::{Deserialize, Serialize};

/// One ingredient line of a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "quantita")]
    pub quantity: f64,
    #[serde(rename = "unita")]
    pub unit: String,
}

/// Embedded summary of the user who created a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeCreator {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A recipe as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    #[serde(rename = "creatore")]
    pub creator: RecipeCreator,
}

/// Payload for creating a recipe. Server-assigned fields (id, creator,
/// timestamps) are excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecipe {
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Partial recipe update. Omitted fields are absent from the JSON and left
/// unchanged by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecipe {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<Ingredient>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<String>>,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A user profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(rename = "firstName", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Partial profile update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "firstName", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// One line of a shopping list. Mirrors `Ingredient` plus a checked-off
/// flag, which older list documents may lack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShoppingListItem {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "quantita")]
    pub quantity: f64,
    #[serde(rename = "unita")]
    pub unit: String,
    #[serde(default)]
    pub checked: bool,
}

/// A shopping list as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShoppingList {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: String,
    pub items: Vec<ShoppingListItem>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// Payload for creating a shopping list. Server-assigned fields excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShoppingList {
    pub name: String,
    pub items: Vec<ShoppingListItem>,
}

/// Partial shopping-list update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateShoppingList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ShoppingListItem>>,
}

/// Payload for deriving a shopping list from a recipe. When `name` is absent
/// the key is omitted from the JSON entirely and the backend picks a name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFromRecipe {
    #[serde(rename = "recipeId")]
    pub recipe_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A page of items plus pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

/// Page selector for the paginated recipe listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self { page: 1, limit: 12 }
    }
}

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload for `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
    #[serde(rename = "firstName", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Token and user returned by login and register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResult {
    pub token: String,
    pub user: User,
}

/// Fresh token returned by `GET /auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResult {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_parses_wire_format() {
        let json = r#"{
            "_id": "64f0c2a1e3",
            "name": "Carbonara",
            "ingredients": [
                {"nome": "guanciale", "quantita": 150, "unita": "g"},
                {"nome": "uova", "quantita": 3, "unita": "pz"}
            ],
            "instructions": ["Rosolare il guanciale", "Mantecare"],
            "createdAt": "2024-09-01T10:00:00Z",
            "updatedAt": "2024-09-01T10:00:00Z",
            "creatore": {"id": "u1", "name": "Anna", "email": "anna@example.com"}
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.id, "64f0c2a1e3");
        assert_eq!(recipe.ingredients[0].name, "guanciale");
        assert_eq!(recipe.ingredients[1].quantity, 3.0);
        assert_eq!(recipe.instructions[0], "Rosolare il guanciale");
        assert!(recipe.image_url.is_none());
        assert_eq!(recipe.creator.email, "anna@example.com");
    }

    #[test]
    fn ingredient_order_survives_roundtrip() {
        let names = ["farina", "acqua", "lievito", "sale"];
        let recipe = CreateRecipe {
            name: "Pizza".to_string(),
            ingredients: names
                .iter()
                .map(|n| Ingredient {
                    name: n.to_string(),
                    quantity: 1.0,
                    unit: "qb".to_string(),
                })
                .collect(),
            instructions: vec!["Impastare".to_string(), "Cuocere".to_string()],
            image_url: None,
        };
        let json = serde_json::to_string(&recipe).unwrap();
        let back: CreateRecipe = serde_json::from_str(&json).unwrap();
        let back_names: Vec<&str> = back.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(back_names, names);
        assert_eq!(back.instructions, recipe.instructions);
    }

    #[test]
    fn ingredient_serializes_italian_keys() {
        let ing = Ingredient {
            name: "pomodoro".to_string(),
            quantity: 2.5,
            unit: "kg".to_string(),
        };
        let json = serde_json::to_value(&ing).unwrap();
        assert_eq!(json["nome"], "pomodoro");
        assert_eq!(json["quantita"], 2.5);
        assert_eq!(json["unita"], "kg");
        assert!(json.get("name").is_none());
    }

    #[test]
    fn from_recipe_omits_absent_name() {
        let payload = CreateFromRecipe {
            recipe_id: "r1".to_string(),
            name: None,
        };
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"recipeId":"r1"}"#
        );

        let named = CreateFromRecipe {
            recipe_id: "r1".to_string(),
            name: Some("Spesa".to_string()),
        };
        assert_eq!(
            serde_json::to_string(&named).unwrap(),
            r#"{"recipeId":"r1","name":"Spesa"}"#
        );
    }

    #[test]
    fn update_recipe_skips_unset_fields() {
        let update = UpdateRecipe {
            name: Some("Nuovo nome".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["name"], "Nuovo nome");
        assert!(json.get("ingredients").is_none());
        assert!(json.get("instructions").is_none());
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn shopping_list_item_checked_defaults_false() {
        let item: ShoppingListItem =
            serde_json::from_str(r#"{"nome": "latte", "quantita": 1, "unita": "l"}"#).unwrap();
        assert!(!item.checked);
    }

    #[test]
    fn register_request_omits_absent_names() {
        let req = RegisterRequest {
            email: "a@b.it".to_string(),
            password: "segreto".to_string(),
            username: "anna".to_string(),
            first_name: None,
            last_name: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("firstName").is_none());
        assert!(json.get("lastName").is_none());
    }

    #[test]
    fn list_query_defaults_to_first_page_of_twelve() {
        assert_eq!(ListQuery::default(), ListQuery { page: 1, limit: 12 });
    }

    #[test]
    fn paginated_response_parses_total_pages() {
        let json = r#"{"items": [], "total": 25, "page": 2, "limit": 12, "totalPages": 3}"#;
        let page: PaginatedResponse<Recipe> = serde_json::from_str(json).unwrap();
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
    }
}
