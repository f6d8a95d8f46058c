//! Cookie jar abstraction and the middleware that sends its cookies with requests.

mod cookie;
mod cookie_error;
mod cookie_middleware;
mod cookie_store;
mod in_memory_cookie_store;

pub use cookie::Cookie;
pub use cookie_error::CookieError;
pub use cookie_middleware::CookieInjectionMiddleware;
pub use cookie_store::CookieStore;
pub use in_memory_cookie_store::InMemoryCookieStore;
