mod analytics;
mod models;
mod schema;
mod session;
mod store;

pub use analytics::ListenAnalytics;
pub use models::*;
pub use session::ImportSession;
pub use store::SqliteListenStore;
