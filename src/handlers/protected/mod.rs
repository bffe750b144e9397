// handlers/protected/mod.rs - Role-gated resource handlers
//
// Every route here sits behind `require_role`: reads need ROLE_USER,
// writes need ROLE_ADMIN.

pub mod help_request;
pub mod resource;

pub const ARTICLES_PATH: &str = "/api/articles";
pub const MENU_ITEM_REVIEWS_PATH: &str = "/api/menuitemreview";
pub const DINING_COMMONS_MENU_ITEMS_PATH: &str = "/api/UCSBDiningCommonsMenuItem";
pub const RECOMMENDATION_REQUESTS_PATH: &str = "/api/recommendationrequest";
pub const HELP_REQUESTS_PATH: &str = "/api/helprequest";
