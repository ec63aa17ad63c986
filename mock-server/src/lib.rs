use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
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

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "quantita")]
    pub quantity: f64,
    #[serde(rename = "unita")]
    pub unit: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Creator {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
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
    pub creator: Creator,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
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

#[derive(Clone, Debug, Serialize, Deserialize)]
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

#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated {
    pub items: Vec<Recipe>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

#[derive(Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub username: String,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Deserialize)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateRecipeInput {
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateRecipeInput {
    pub name: Option<String>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub instructions: Option<Vec<String>>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateListInput {
    pub name: String,
    #[serde(default)]
    pub items: Vec<ShoppingListItem>,
}

#[derive(Deserialize)]
pub struct UpdateListInput {
    pub name: Option<String>,
    pub items: Option<Vec<ShoppingListItem>>,
}

#[derive(Deserialize)]
pub struct FromRecipeInput {
    #[serde(rename = "recipeId")]
    pub recipe_id: String,
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    12
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

struct UserRecord {
    user: User,
    password: String,
}

#[derive(Default)]
pub struct Store {
    users: HashMap<String, UserRecord>,
    tokens: HashMap<String, String>,
    recipes: HashMap<String, Recipe>,
    lists: HashMap<String, ShoppingList>,
}

pub type Db = Arc<RwLock<Store>>;

type Failure = (StatusCode, Json<serde_json::Value>);
type ApiResult<T> = Result<Json<T>, Failure>;

fn failure(status: StatusCode, message: &str) -> Failure {
    (status, Json(serde_json::json!({ "message": message })))
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

async fn authenticate(db: &Db, headers: &HeaderMap) -> Result<User, Failure> {
    let unauthorized = || failure(StatusCode::UNAUTHORIZED, "Non autorizzato");
    let token = bearer_token(headers).ok_or_else(unauthorized)?;
    let store = db.read().await;
    store
        .tokens
        .get(token)
        .and_then(|id| store.users.get(id))
        .map(|record| record.user.clone())
        .ok_or_else(unauthorized)
}

fn sorted(mut recipes: Vec<Recipe>) -> Vec<Recipe> {
    recipes.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    recipes
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", get(refresh))
        .route("/user/profile", get(get_profile).put(update_profile))
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route("/recipes/my-recipes", get(my_recipes))
        .route("/recipes/search", get(search_recipes))
        .route("/recipes/user/{id}", get(recipes_by_user))
        .route(
            "/recipes/{id}",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
        .route("/shopping-lists", get(list_shopping_lists).post(create_shopping_list))
        .route("/shopping-lists/from-recipe", post(from_recipe))
        .route(
            "/shopping-lists/{id}",
            get(get_shopping_list)
                .put(update_shopping_list)
                .delete(delete_shopping_list),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- auth ---

async fn register(
    State(db): State<Db>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<AuthResponse>), Failure> {
    let mut store = db.write().await;
    if store
        .users
        .values()
        .any(|record| record.user.email == input.email)
    {
        return Err(failure(StatusCode::CONFLICT, "Email già in uso"));
    }

    let user = User {
        id: new_id(),
        username: input.username,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
    };
    let token = new_id();
    store.tokens.insert(token.clone(), user.id.clone());
    store.users.insert(
        user.id.clone(),
        UserRecord {
            user: user.clone(),
            password: input.password,
        },
    );

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

async fn login(State(db): State<Db>, Json(input): Json<LoginInput>) -> ApiResult<AuthResponse> {
    let mut store = db.write().await;
    let user = store
        .users
        .values()
        .find(|record| record.user.email == input.email && record.password == input.password)
        .map(|record| record.user.clone())
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "Credenziali non valide"))?;

    let token = new_id();
    store.tokens.insert(token.clone(), user.id.clone());
    Ok(Json(AuthResponse { token, user }))
}

async fn refresh(State(db): State<Db>, headers: HeaderMap) -> ApiResult<serde_json::Value> {
    let user = authenticate(&db, &headers).await?;
    let token = new_id();
    db.write().await.tokens.insert(token.clone(), user.id);
    Ok(Json(serde_json::json!({ "token": token })))
}

// --- user ---

async fn get_profile(State(db): State<Db>, headers: HeaderMap) -> ApiResult<User> {
    let user = authenticate(&db, &headers).await?;
    Ok(Json(user))
}

async fn update_profile(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<UpdateUserInput>,
) -> ApiResult<User> {
    let user = authenticate(&db, &headers).await?;
    let mut store = db.write().await;
    let record = store
        .users
        .get_mut(&user.id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Utente non trovato"))?;

    if let Some(username) = input.username {
        record.user.username = username;
    }
    if let Some(email) = input.email {
        record.user.email = email;
    }
    if let Some(first_name) = input.first_name {
        record.user.first_name = Some(first_name);
    }
    if let Some(last_name) = input.last_name {
        record.user.last_name = Some(last_name);
    }
    Ok(Json(record.user.clone()))
}

// --- recipes ---

async fn list_recipes(State(db): State<Db>, Query(query): Query<PageQuery>) -> Json<Paginated> {
    let store = db.read().await;
    let all = sorted(store.recipes.values().cloned().collect());
    let total = all.len() as u64;
    let page = query.page.max(1);
    let limit = query.limit.max(1);
    let total_pages = (total as u32).div_ceil(limit);
    let items = all
        .into_iter()
        .skip(((page - 1) * limit) as usize)
        .take(limit as usize)
        .collect();

    Json(Paginated {
        items,
        total,
        page,
        limit,
        total_pages,
    })
}

async fn my_recipes(State(db): State<Db>, headers: HeaderMap) -> ApiResult<Vec<Recipe>> {
    let user = authenticate(&db, &headers).await?;
    let store = db.read().await;
    let mine = store
        .recipes
        .values()
        .filter(|recipe| recipe.creator.id == user.id)
        .cloned()
        .collect();
    Ok(Json(sorted(mine)))
}

async fn recipes_by_user(State(db): State<Db>, Path(id): Path<String>) -> Json<Vec<Recipe>> {
    let store = db.read().await;
    let theirs = store
        .recipes
        .values()
        .filter(|recipe| recipe.creator.id == id)
        .cloned()
        .collect();
    Json(sorted(theirs))
}

async fn search_recipes(
    State(db): State<Db>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Recipe>> {
    let needle = query.q.to_lowercase();
    let store = db.read().await;
    let matches = store
        .recipes
        .values()
        .filter(|recipe| recipe.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    Json(sorted(matches))
}

async fn get_recipe(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Recipe> {
    let store = db.read().await;
    store
        .recipes
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Ricetta non trovata"))
}

async fn create_recipe(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateRecipeInput>,
) -> Result<(StatusCode, Json<Recipe>), Failure> {
    let user = authenticate(&db, &headers).await?;
    let timestamp = now();
    let recipe = Recipe {
        id: new_id(),
        name: input.name,
        ingredients: input.ingredients,
        instructions: input.instructions,
        image_url: input.image_url,
        created_at: timestamp.clone(),
        updated_at: timestamp,
        creator: Creator {
            id: user.id,
            name: user.username,
            email: user.email,
        },
    };
    db.write().await.recipes.insert(recipe.id.clone(), recipe.clone());
    Ok((StatusCode::CREATED, Json(recipe)))
}

async fn update_recipe(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<UpdateRecipeInput>,
) -> ApiResult<Recipe> {
    let user = authenticate(&db, &headers).await?;
    let mut store = db.write().await;
    let recipe = store
        .recipes
        .get_mut(&id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Ricetta non trovata"))?;
    if recipe.creator.id != user.id {
        return Err(failure(StatusCode::FORBIDDEN, "Non autorizzato"));
    }

    if let Some(name) = input.name {
        recipe.name = name;
    }
    if let Some(ingredients) = input.ingredients {
        recipe.ingredients = ingredients;
    }
    if let Some(instructions) = input.instructions {
        recipe.instructions = instructions;
    }
    if let Some(image_url) = input.image_url {
        recipe.image_url = Some(image_url);
    }
    recipe.updated_at = now();
    Ok(Json(recipe.clone()))
}

async fn delete_recipe(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<serde_json::Value> {
    let user = authenticate(&db, &headers).await?;
    let mut store = db.write().await;
    let recipe = store
        .recipes
        .get(&id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Ricetta non trovata"))?;
    if recipe.creator.id != user.id {
        return Err(failure(StatusCode::FORBIDDEN, "Non autorizzato"));
    }
    store.recipes.remove(&id);
    Ok(Json(serde_json::json!({ "message": "Ricetta eliminata" })))
}

// --- shopping lists ---

async fn list_shopping_lists(
    State(db): State<Db>,
    headers: HeaderMap,
) -> ApiResult<Vec<ShoppingList>> {
    let user = authenticate(&db, &headers).await?;
    let store = db.read().await;
    let mut mine: Vec<ShoppingList> = store
        .lists
        .values()
        .filter(|list| list.user_id == user.id)
        .cloned()
        .collect();
    mine.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(Json(mine))
}

async fn get_shopping_list(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<ShoppingList> {
    let user = authenticate(&db, &headers).await?;
    let store = db.read().await;
    store
        .lists
        .get(&id)
        .filter(|list| list.user_id == user.id)
        .cloned()
        .map(Json)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Lista della spesa non trovata"))
}

async fn create_shopping_list(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateListInput>,
) -> Result<(StatusCode, Json<ShoppingList>), Failure> {
    let user = authenticate(&db, &headers).await?;
    let timestamp = now();
    let list = ShoppingList {
        id: new_id(),
        user_id: user.id,
        name: input.name,
        items: input.items,
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };
    db.write().await.lists.insert(list.id.clone(), list.clone());
    Ok((StatusCode::CREATED, Json(list)))
}

async fn update_shopping_list(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<UpdateListInput>,
) -> ApiResult<ShoppingList> {
    let user = authenticate(&db, &headers).await?;
    let mut store = db.write().await;
    let list = store
        .lists
        .get_mut(&id)
        .filter(|list| list.user_id == user.id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Lista della spesa non trovata"))?;

    if let Some(name) = input.name {
        list.name = name;
    }
    if let Some(items) = input.items {
        list.items = items;
    }
    list.updated_at = now();
    Ok(Json(list.clone()))
}

async fn delete_shopping_list(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<serde_json::Value> {
    let user = authenticate(&db, &headers).await?;
    let mut store = db.write().await;
    let owned = store
        .lists
        .get(&id)
        .is_some_and(|list| list.user_id == user.id);
    if !owned {
        return Err(failure(StatusCode::NOT_FOUND, "Lista della spesa non trovata"));
    }
    store.lists.remove(&id);
    Ok(Json(serde_json::json!({ "message": "Lista eliminata" })))
}

async fn from_recipe(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<FromRecipeInput>,
) -> Result<(StatusCode, Json<ShoppingList>), Failure> {
    let user = authenticate(&db, &headers).await?;
    let mut store = db.write().await;
    let recipe = store
        .recipes
        .get(&input.recipe_id)
        .cloned()
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Ricetta non trovata"))?;

    let items = recipe
        .ingredients
        .iter()
        .map(|ingredient| ShoppingListItem {
            name: ingredient.name.clone(),
            quantity: ingredient.quantity,
            unit: ingredient.unit.clone(),
            checked: false,
        })
        .collect();
    let timestamp = now();
    let list = ShoppingList {
        id: new_id(),
        user_id: user.id,
        name: input.name.unwrap_or(recipe.name),
        items,
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };
    store.lists.insert(list.id.clone(), list.clone());
    Ok((StatusCode::CREATED, Json(list)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_serializes_wire_keys() {
        let recipe = Recipe {
            id: "r1".to_string(),
            name: "Carbonara".to_string(),
            ingredients: vec![Ingredient {
                name: "guanciale".to_string(),
                quantity: 150.0,
                unit: "g".to_string(),
            }],
            instructions: vec!["Rosolare".to_string()],
            image_url: None,
            created_at: "2024-09-01T10:00:00Z".to_string(),
            updated_at: "2024-09-01T10:00:00Z".to_string(),
            creator: Creator {
                id: "u1".to_string(),
                name: "anna".to_string(),
                email: "anna@example.com".to_string(),
            },
        };
        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["_id"], "r1");
        assert_eq!(json["ingredients"][0]["nome"], "guanciale");
        assert_eq!(json["creatore"]["id"], "u1");
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn register_input_name_fields_are_optional() {
        let input: RegisterInput = serde_json::from_str(
            r#"{"email":"a@b.it","password":"segreto","username":"anna"}"#,
        )
        .unwrap();
        assert!(input.first_name.is_none());
        assert!(input.last_name.is_none());
    }

    #[test]
    fn shopping_list_item_checked_defaults_false() {
        let item: ShoppingListItem =
            serde_json::from_str(r#"{"nome":"latte","quantita":1,"unita":"l"}"#).unwrap();
        assert!(!item.checked);
    }

    #[test]
    fn paginated_uses_total_pages_key() {
        let page = Paginated {
            items: Vec::new(),
            total: 25,
            page: 3,
            limit: 12,
            total_pages: 3,
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalPages"], 3);
    }
}
