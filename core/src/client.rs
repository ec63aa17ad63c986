//! Request dispatcher and resource wrappers for the Forked API.
//!
//! # Design
//! `ForkedClient` holds a base URL plus two injected ports: the `TokenStore`
//! credential accessor and the `HttpTransport` that performs the round-trip.
//! Every backend operation is a thin wrapper that supplies a path, a method,
//! and a pre-serialized JSON payload to `call`, which owns header merging,
//! bearer injection, failure normalization, and the typed parse of the
//! response body. Wrappers never validate, retry, or mutate local state; a
//! failure in one call never affects another.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::token::TokenStore;
use crate::transport::{HttpTransport, UreqTransport};
use crate::types::{
    AuthResult, CreateFromRecipe, CreateRecipe, CreateShoppingList, ListQuery, LoginRequest,
    PaginatedResponse, Recipe, RefreshResult, RegisterRequest, ShoppingList, UpdateRecipe,
    UpdateShoppingList, UpdateUser, User,
};

/// Production deployment of the Forked backend.
pub const DEFAULT_BASE_URL: &str = "https://forked-eight.vercel.app/forked";

/// Failure text when an error response carries no readable JSON body.
const UNKNOWN_ERROR: &str = "Errore sconosciuto";

/// Options accepted by [`ForkedClient::call`]: an HTTP method (GET by
/// default), a pre-serialized JSON body, and header overrides applied after
/// the defaults (caller wins on name collision).
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            body: None,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    /// Options carrying `payload` serialized to a JSON body.
    pub fn json<P: Serialize>(method: HttpMethod, payload: &P) -> Result<Self, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(Self {
            method,
            body: Some(body),
            headers: Vec::new(),
        })
    }
}

/// Typed client for the Forked recipe and shopping-list backend.
#[derive(Clone)]
pub struct ForkedClient {
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    transport: Arc<dyn HttpTransport>,
}

impl ForkedClient {
    /// Client against `base_url` using the default blocking transport.
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> Self {
        Self::with_transport(base_url, tokens, Arc::new(UreqTransport::new()))
    }

    /// Client with an injected transport, for tests and custom hosts.
    pub fn with_transport(
        base_url: &str,
        tokens: Arc<dyn TokenStore>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
            transport,
        }
    }

    /// Assemble the outgoing request for `endpoint` without executing it.
    ///
    /// Headers are merged in order: `Content-Type: application/json`, then
    /// `Authorization: Bearer <token>` iff the store holds a token right
    /// now, then caller-supplied overrides, replacing earlier entries on
    /// case-insensitive name collision.
    pub fn build_request(&self, endpoint: &str, options: RequestOptions) -> HttpRequest {
        let mut headers: Vec<(String, String)> = vec![(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )];
        if let Some(token) = self.tokens.token() {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        for (name, value) in options.headers {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
            headers.push((name, value));
        }

        HttpRequest {
            method: options.method,
            path: format!("{}{}", self.base_url, endpoint),
            headers,
            body: options.body,
        }
    }

    /// Issue the request and deserialize the 2xx response body as `T`.
    pub fn call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let response = self.dispatch(endpoint, options)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Issue the request and discard the 2xx response body. Deletions return
    /// whatever JSON the backend felt like sending; nothing in it is needed.
    fn call_discarding(&self, endpoint: &str, options: RequestOptions) -> Result<(), ApiError> {
        self.dispatch(endpoint, options).map(|_| ())
    }

    fn dispatch(&self, endpoint: &str, options: RequestOptions) -> Result<HttpResponse, ApiError> {
        let request = self.build_request(endpoint, options);
        debug!(method = request.method.as_str(), path = %request.path, "dispatching request");

        let response = self.transport.execute(&request)?;
        if !response.is_success() {
            let message = error_message(response.status, &response.body);
            warn!(status = response.status, %message, "request rejected");
            return Err(ApiError::Api {
                status: response.status,
                message,
            });
        }
        Ok(response)
    }

    // ------------------------------------------------------------------
    // User
    // ------------------------------------------------------------------

    pub fn get_profile(&self) -> Result<User, ApiError> {
        self.call("/user/profile", RequestOptions::default())
    }

    pub fn update_profile(&self, update: &UpdateUser) -> Result<User, ApiError> {
        self.call("/user/profile", RequestOptions::json(HttpMethod::Put, update)?)
    }

    // ------------------------------------------------------------------
    // Recipes
    // ------------------------------------------------------------------

    /// Recipes created by the authenticated user.
    pub fn my_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        self.call("/recipes/my-recipes", RequestOptions::default())
    }

    /// Recipes created by another user.
    pub fn recipes_by_user(&self, user_id: &str) -> Result<Vec<Recipe>, ApiError> {
        self.call(&format!("/recipes/user/{user_id}"), RequestOptions::default())
    }

    /// One page of the public recipe listing.
    pub fn all_recipes(&self, query: &ListQuery) -> Result<PaginatedResponse<Recipe>, ApiError> {
        self.call(
            &format!("/recipes?page={}&limit={}", query.page, query.limit),
            RequestOptions::default(),
        )
    }

    pub fn get_recipe(&self, id: &str) -> Result<Recipe, ApiError> {
        self.call(&format!("/recipes/{id}"), RequestOptions::default())
    }

    pub fn create_recipe(&self, recipe: &CreateRecipe) -> Result<Recipe, ApiError> {
        self.call("/recipes", RequestOptions::json(HttpMethod::Post, recipe)?)
    }

    pub fn update_recipe(&self, id: &str, update: &UpdateRecipe) -> Result<Recipe, ApiError> {
        self.call(
            &format!("/recipes/{id}"),
            RequestOptions::json(HttpMethod::Put, update)?,
        )
    }

    pub fn delete_recipe(&self, id: &str) -> Result<(), ApiError> {
        self.call_discarding(
            &format!("/recipes/{id}"),
            RequestOptions {
                method: HttpMethod::Delete,
                ..Default::default()
            },
        )
    }

    /// Free-text recipe search. The query is form-urlencoded, so reserved
    /// characters never appear literally in the path.
    pub fn search_recipes(&self, query: &str) -> Result<Vec<Recipe>, ApiError> {
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.call(&format!("/recipes/search?q={encoded}"), RequestOptions::default())
    }

    // ------------------------------------------------------------------
    // Shopping lists
    // ------------------------------------------------------------------

    pub fn my_shopping_lists(&self) -> Result<Vec<ShoppingList>, ApiError> {
        self.call("/shopping-lists", RequestOptions::default())
    }

    pub fn get_shopping_list(&self, id: &str) -> Result<ShoppingList, ApiError> {
        self.call(&format!("/shopping-lists/{id}"), RequestOptions::default())
    }

    pub fn create_shopping_list(
        &self,
        list: &CreateShoppingList,
    ) -> Result<ShoppingList, ApiError> {
        self.call("/shopping-lists", RequestOptions::json(HttpMethod::Post, list)?)
    }

    pub fn update_shopping_list(
        &self,
        id: &str,
        update: &UpdateShoppingList,
    ) -> Result<ShoppingList, ApiError> {
        self.call(
            &format!("/shopping-lists/{id}"),
            RequestOptions::json(HttpMethod::Put, update)?,
        )
    }

    pub fn delete_shopping_list(&self, id: &str) -> Result<(), ApiError> {
        self.call_discarding(
            &format!("/shopping-lists/{id}"),
            RequestOptions {
                method: HttpMethod::Delete,
                ..Default::default()
            },
        )
    }

    /// Derive a shopping list from a recipe's ingredients. When `name` is
    /// `None` the key is omitted from the payload and the backend names the
    /// list itself.
    pub fn shopping_list_from_recipe(
        &self,
        recipe_id: &str,
        name: Option<&str>,
    ) -> Result<ShoppingList, ApiError> {
        let payload = CreateFromRecipe {
            recipe_id: recipe_id.to_string(),
            name: name.map(str::to_string),
        };
        self.call(
            "/shopping-lists/from-recipe",
            RequestOptions::json(HttpMethod::Post, &payload)?,
        )
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    /// Exchange credentials for a token and user. The token is returned to
    /// the caller; nothing is written to the token store here.
    pub fn login(&self, email: &str, password: &str) -> Result<AuthResult, ApiError> {
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.call("/auth/login", RequestOptions::json(HttpMethod::Post, &payload)?)
    }

    pub fn register(&self, request: &RegisterRequest) -> Result<AuthResult, ApiError> {
        self.call("/auth/register", RequestOptions::json(HttpMethod::Post, request)?)
    }

    pub fn refresh_token(&self) -> Result<RefreshResult, ApiError> {
        self.call("/auth/refresh", RequestOptions::default())
    }
}

/// Derive the human-readable message for a non-2xx response.
///
/// Priority: the error body's `message` field when the body parses as JSON
/// and the field is a non-empty string; the fixed fallback text when the
/// body is not JSON at all; the numeric status when the body parses but
/// carries no usable message.
fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => match value.get("message").and_then(|m| m.as_str()) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => format!("HTTP error! status: {status}"),
        },
        Err(_) => UNKNOWN_ERROR.to_string(),
    }
}
